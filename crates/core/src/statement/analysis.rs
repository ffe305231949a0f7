//! AST walk collecting what the policy needs from one statement.

use std::convert::Infallible;
use std::ops::ControlFlow;

use sqlparser::ast::{
    Expr, ObjectName, Query, SetExpr, Statement as SqlStatement, TableFactor, Visit, Visitor,
};

use super::StatementKind;

const CATALOG_SCHEMAS: [&str; 2] = ["pg_catalog", "information_schema"];

pub(super) struct Analysis {
    pub kind: StatementKind,
    pub relations: Vec<String>,
    pub functions: Vec<String>,
}

pub(super) fn analyze(statement: &SqlStatement) -> Analysis {
    let mut collector = Collector::default();
    let ControlFlow::Continue(()) = Visit::visit(statement, &mut collector);

    let top = collector.kinds.first().copied().unwrap_or(StatementKind::Other);
    // A query only reads if nothing nested in it writes.
    let kind = if top.is_read_only() {
        let nested = collector.kinds.iter().copied().find(|k| !k.is_read_only());
        match nested {
            Some(kind) => kind,
            None if collector.select_into => StatementKind::Schema,
            None => StatementKind::Read,
        }
    } else {
        top
    };

    collector.relations.sort();
    collector.relations.dedup();
    collector.functions.sort();
    collector.functions.dedup();
    Analysis { kind, relations: collector.relations, functions: collector.functions }
}

/// Table name without its schema.
pub(super) fn unqualified(relation: &str) -> &str {
    relation.rsplit('.').next().unwrap_or(relation)
}

pub(super) fn is_catalog_relation(relation: &str) -> bool {
    relation
        .split('.')
        .any(|part| part.starts_with("pg_") || CATALOG_SCHEMAS.contains(&part))
}

fn normalize(name: &ObjectName) -> String {
    name.to_string()
        .split('.')
        .map(|part| part.trim_matches('"').to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

fn kind_of(statement: &SqlStatement) -> StatementKind {
    match statement {
        SqlStatement::Query(_) | SqlStatement::Explain { .. } => StatementKind::Read,
        SqlStatement::Insert { .. } => StatementKind::Insert,
        SqlStatement::Update { .. } => StatementKind::Update,
        SqlStatement::Delete { .. } => StatementKind::Delete,
        SqlStatement::Merge { .. } => StatementKind::Merge,
        SqlStatement::CreateTable { .. }
        | SqlStatement::CreateView { .. }
        | SqlStatement::CreateIndex { .. }
        | SqlStatement::CreateSchema { .. }
        | SqlStatement::CreateSequence { .. }
        | SqlStatement::AlterTable { .. }
        | SqlStatement::AlterIndex { .. }
        | SqlStatement::AlterView { .. }
        | SqlStatement::Drop { .. }
        | SqlStatement::Truncate { .. }
        | SqlStatement::Grant { .. }
        | SqlStatement::Revoke { .. }
        | SqlStatement::Comment { .. } => StatementKind::Schema,
        _ => StatementKind::Other,
    }
}

#[derive(Default)]
struct Collector {
    /// Kind of every statement visited, outermost first.
    kinds: Vec<StatementKind>,
    relations: Vec<String>,
    functions: Vec<String>,
    select_into: bool,
}

impl Visitor for Collector {
    type Break = Infallible;

    fn pre_visit_statement(&mut self, statement: &SqlStatement) -> ControlFlow<Self::Break> {
        self.kinds.push(kind_of(statement));
        if let SqlStatement::Drop { names, .. } = statement {
            self.relations.extend(names.iter().map(normalize));
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        if matches!(query.body.as_ref(), SetExpr::Select(select) if select.into.is_some()) {
            self.select_into = true;
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        self.relations.push(normalize(relation));
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, factor: &TableFactor) -> ControlFlow<Self::Break> {
        match factor {
            TableFactor::Table { name, args: Some(_), .. } | TableFactor::Function { name, .. } => {
                self.functions.push(normalize(name));
            },
            _ => {},
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if let Expr::Function(function) = expr {
            self.functions.push(normalize(&function.name));
        }
        ControlFlow::Continue(())
    }
}
