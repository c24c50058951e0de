//! Integration tests for SQL parsing and extraction

use pretty_assertions::assert_eq;
use sqljoin_core::{unique, Builtins, SqlObject};
use sqljoin_sql::{ObjectExtractor, SqlParser};

const SCHEMA: &str = r#"
CREATE TABLE customers (
    id SERIAL PRIMARY KEY,
    email TEXT NOT NULL
);

CREATE TABLE invoices (
    id SERIAL PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers (id),
    total NUMERIC(10, 2)
);

CREATE VIEW open_invoices AS
SELECT i.id, c.email, pg_catalog.now()
FROM invoices i
JOIN customers c ON c.id = i.customer_id;
"#;

#[test]
fn multi_statement_unit() {
    let parsed = SqlParser::new().parse(SCHEMA, None).unwrap();
    assert_eq!(parsed.statement_count(), 3);

    let objects = ObjectExtractor::extract(&parsed.statements);

    assert_eq!(
        unique(objects.definitions),
        vec![
            SqlObject::table("customers"),
            SqlObject::table("invoices"),
            SqlObject::view("open_invoices"),
        ]
    );

    assert_eq!(
        unique(objects.dependencies),
        vec![
            SqlObject::table("customers"),
            SqlObject::table("invoices"),
            SqlObject::function("now").with_schema("pg_catalog"),
        ]
    );
}

#[test]
fn builtin_references_are_recognised() {
    let parsed = SqlParser::new().parse(SCHEMA, None).unwrap();
    let builtins = Builtins::default();

    let external: Vec<SqlObject> = ObjectExtractor::dependencies(&parsed.statements)
        .into_iter()
        .filter(|dep| builtins.is_satisfied(dep))
        .collect();

    assert_eq!(external, vec![SqlObject::function("now").with_schema("pg_catalog")]);
}

#[test]
fn json_dump_contains_every_statement() {
    let parsed = SqlParser::new().parse(SCHEMA, None).unwrap();
    let json = parsed.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(3));
}
