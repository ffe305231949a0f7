//! Splits oversized VALUES lists into several statements.
//!
//! Each chunk is the original AST with the rows of its first VALUES list
//! replaced, so column lists, `ON CONFLICT`, `RETURNING` and the alias of an
//! `UPDATE ... FROM (VALUES ...) AS v(...)` survive unchanged.

use std::ops::ControlFlow;

use sqlparser::ast::{
    Expr, Query, SetExpr, Statement as SqlStatement, Visit, VisitMut, Visitor, VisitorMut,
};

use super::Statement;

struct FirstValues;

impl Visitor for FirstValues {
    type Break = Vec<Vec<Expr>>;

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        match query.body.as_ref() {
            SetExpr::Values(values) => ControlFlow::Break(values.rows.clone()),
            _ => ControlFlow::Continue(()),
        }
    }
}

struct ReplaceValues<'a>(&'a [Vec<Expr>]);

impl VisitorMut for ReplaceValues<'_> {
    type Break = ();

    fn pre_visit_query(&mut self, query: &mut Query) -> ControlFlow<Self::Break> {
        match query.body.as_mut() {
            SetExpr::Values(values) => {
                values.rows = self.0.to_vec();
                ControlFlow::Break(())
            },
            _ => ControlFlow::Continue(()),
        }
    }
}

/// Rows of the first VALUES list, in visiting order.
pub(super) fn first_values_rows(statement: &SqlStatement) -> Option<Vec<Vec<Expr>>> {
    match Visit::visit(statement, &mut FirstValues) {
        ControlFlow::Break(rows) => Some(rows),
        ControlFlow::Continue(()) => None,
    }
}

pub(super) fn render_row(row: &[Expr]) -> String {
    let values: Vec<String> = row.iter().map(ToString::to_string).collect();
    format!("({})", values.join(", "))
}

/// Splits an INSERT/UPDATE whose VALUES list holds more than `max_tuples`
/// tuples into consecutive statements of at most `max_tuples` tuples each.
///
/// Statements of other kinds, statements without a VALUES list and statements
/// already within the limit are returned unchanged. A limit of zero disables
/// splitting.
#[must_use]
pub fn split_oversized(statement: &Statement, max_tuples: usize) -> Vec<Statement> {
    if max_tuples == 0 || !statement.kind().is_batchable() {
        return vec![statement.clone()];
    }
    let Some(rows) = first_values_rows(&statement.ast) else {
        return vec![statement.clone()];
    };
    if rows.len() <= max_tuples {
        return vec![statement.clone()];
    }

    rows.chunks(max_tuples)
        .map(|chunk| {
            let mut ast = statement.ast.clone();
            let _replaced = VisitMut::visit(&mut ast, &mut ReplaceValues(chunk));
            Statement::from_ast(ast)
        })
        .collect()
}
