//! Structural extraction of defined and referenced schema objects
//!
//! Walks parsed statements and reports which tables, views and functions a
//! source unit creates and which ones it needs to exist beforehand.
//!
//! Names are compared the way PostgreSQL resolves them: unquoted identifiers
//! fold to lower case, quoted identifiers are kept exactly as written.

use sqlparser::ast::{
    ColumnOption, CreateFunction, CreateTable, Expr, Function, FunctionArg, FunctionArgExpr,
    FunctionArguments, Ident, ObjectName, Query, Select, SelectItem, SetExpr, Statement,
    TableConstraint, TableFactor, TableWithJoins,
};
use sqljoin_core::{ObjectKind, SqlObject};
use std::collections::HashSet;

/// Objects found in one source unit (may contain duplicates)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedObjects {
    /// Objects the unit provides
    pub definitions: Vec<SqlObject>,

    /// Objects the unit requires
    pub dependencies: Vec<SqlObject>,
}

/// Walks statements collecting definitions and dependencies
#[derive(Debug, Default)]
pub struct ObjectExtractor {
    definitions: Vec<SqlObject>,
    dependencies: Vec<SqlObject>,

    /// CTE names seen so far; references to these are not dependencies
    ctes: HashSet<String>,
}

impl ObjectExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract both lists from a set of statements
    pub fn extract(statements: &[Statement]) -> ExtractedObjects {
        let mut extractor = Self::new();
        for statement in statements {
            extractor.visit_statement(statement);
        }

        ExtractedObjects {
            definitions: extractor.definitions,
            dependencies: extractor.dependencies,
        }
    }

    /// Objects the statements create
    pub fn definitions(statements: &[Statement]) -> Vec<SqlObject> {
        Self::extract(statements).definitions
    }

    /// Objects the statements depend on
    pub fn dependencies(statements: &[Statement]) -> Vec<SqlObject> {
        Self::extract(statements).dependencies
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::CreateTable(create) => self.visit_create_table(create),
            Statement::CreateView { name, query, .. } => {
                self.definitions.push(object_from_name(ObjectKind::View, name));
                self.visit_query(query);
            }
            Statement::CreateFunction(CreateFunction { name, .. }) => {
                self.definitions.push(object_from_name(ObjectKind::Function, name));
            }
            Statement::Query(query) => self.visit_query(query),
            other => {
                tracing::trace!(statement = %other, "statement contributes no objects");
            }
        }
    }

    fn visit_create_table(&mut self, create: &CreateTable) {
        self.definitions.push(object_from_name(ObjectKind::Table, &create.name));

        for column in &create.columns {
            for option in &column.options {
                if let ColumnOption::ForeignKey { foreign_table, .. } = &option.option {
                    self.dependencies.push(object_from_name(ObjectKind::Table, foreign_table));
                }
            }
        }

        for constraint in &create.constraints {
            if let TableConstraint::ForeignKey { foreign_table, .. } = constraint {
                self.dependencies.push(object_from_name(ObjectKind::Table, foreign_table));
            }
        }

        if let Some(query) = &create.query {
            self.visit_query(query);
        }
    }

    fn visit_query(&mut self, query: &Query) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.ctes.insert(normalize(&cte.alias.name));
                self.visit_query(&cte.query);
            }
        }

        self.visit_set_expr(&query.body);
    }

    fn visit_set_expr(&mut self, set_expr: &SetExpr) {
        match set_expr {
            SetExpr::Select(select) => self.visit_select(select),
            SetExpr::Query(query) => self.visit_query(query),
            SetExpr::SetOperation { left, right, .. } => {
                self.visit_set_expr(left);
                self.visit_set_expr(right);
            }
            _ => {}
        }
    }

    fn visit_select(&mut self, select: &Select) {
        for table_with_joins in &select.from {
            self.visit_table_with_joins(table_with_joins);
        }

        // Only a call that is the whole select item is a function dependency
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                    if let Expr::Function(function) = unparenthesized(expr) {
                        self.visit_called_function(function);
                    }
                    self.visit_expr(expr);
                }
                _ => {}
            }
        }

        if let Some(selection) = &select.selection {
            self.visit_expr(selection);
        }
    }

    fn visit_called_function(&mut self, function: &Function) {
        // CURRENT_TIMESTAMP, CURRENT_USER and friends are value keywords
        if matches!(function.args, FunctionArguments::None) {
            return;
        }
        self.dependencies.push(object_from_name(ObjectKind::Function, &function.name));
    }

    fn visit_table_with_joins(&mut self, table_with_joins: &TableWithJoins) {
        self.visit_table_factor(&table_with_joins.relation);
        for join in &table_with_joins.joins {
            self.visit_table_factor(&join.relation);
        }
    }

    fn visit_table_factor(&mut self, table_factor: &TableFactor) {
        match table_factor {
            TableFactor::Table { name, .. } => {
                let object = object_from_name(ObjectKind::Table, name);
                if object.schema.is_none() && self.ctes.contains(&object.name) {
                    return;
                }
                self.dependencies.push(object);
            }
            TableFactor::Derived { subquery, .. } => self.visit_query(subquery),
            TableFactor::NestedJoin { table_with_joins, .. } => {
                self.visit_table_with_joins(table_with_joins);
            }
            _ => {}
        }
    }

    /// Walk an expression for subqueries
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Function(function) => self.visit_function_args(function),
            Expr::Subquery(query) | Expr::Exists { subquery: query, .. } => self.visit_query(query),
            Expr::InSubquery { expr, subquery, .. } => {
                self.visit_expr(expr);
                self.visit_query(subquery);
            }
            Expr::BinaryOp { left, right, .. } => {
                self.visit_expr(left);
                self.visit_expr(right);
            }
            Expr::UnaryOp { expr, .. }
            | Expr::Cast { expr, .. }
            | Expr::Nested(expr)
            | Expr::IsNull(expr)
            | Expr::IsNotNull(expr) => self.visit_expr(expr),
            _ => {}
        }
    }

    fn visit_function_args(&mut self, function: &Function) {
        match &function.args {
            FunctionArguments::List(list) => {
                for arg in &list.args {
                    match arg {
                        FunctionArg::Unnamed(FunctionArgExpr::Expr(expr))
                        | FunctionArg::Named { arg: FunctionArgExpr::Expr(expr), .. } => {
                            self.visit_expr(expr);
                        }
                        _ => {}
                    }
                }
            }
            FunctionArguments::Subquery(query) => self.visit_query(query),
            FunctionArguments::None => {}
        }
    }
}

fn unparenthesized(mut expr: &Expr) -> &Expr {
    while let Expr::Nested(inner) = expr {
        expr = &**inner;
    }
    expr
}

/// Identifier as PostgreSQL resolves it
fn normalize(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

/// Split `schema.name` into an object; the last identifier is the name
fn object_from_name(kind: ObjectKind, name: &ObjectName) -> SqlObject {
    let parts: Vec<String> = name.0.iter().map(normalize).collect();

    match parts.split_last() {
        Some((last, [])) => SqlObject::new(kind, last.as_str()),
        Some((last, qualifier)) => {
            SqlObject::new(kind, last.as_str()).with_schema(qualifier.join("."))
        }
        None => SqlObject::new(kind, name.to_string()),
    }
}
