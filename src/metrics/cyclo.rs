//! Cyclomatic complexity: 1 plus one per decision point.
//!
//! Decision points are `if` (except error guards), `for`, `range`, and every
//! `case` of a switch or select that is not `default`. Else branches and the
//! boolean operators `&&`/`||` do not count.

use crate::syntax::walk::{inspect, Node};
use crate::syntax::{Block, Statement};

use super::errguard::is_error_guard;

pub fn complexity(body: &Block) -> usize {
    let mut total = 1;

    inspect(body, &mut |node| {
        match node {
            Node::If(stmt) => {
                if is_error_guard(stmt) {
                    return false;
                }
                total += 1;
            }
            Node::Stmt(Statement::Loop(_)) => total += 1,
            Node::Stmt(Statement::Case(clause)) if !clause.is_default() => total += 1,
            Node::Stmt(Statement::Comm(clause)) if !clause.is_default() => total += 1,
            _ => {}
        }
        true
    });

    total
}
