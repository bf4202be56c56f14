//! Maximum control-flow nesting depth.
//!
//! Depth grows by one for the body of each `if`, `else`, `for`, `switch`,
//! `select` and function literal, and by one more for the statements of a
//! case or communication clause. Else-if chains, bare blocks and labels are
//! transparent. Error guards contribute nothing.

use crate::syntax::walk::outer_func_lits;
use crate::syntax::{Block, ElseBranch, IfStmt, Position, Statement};

use super::errguard::is_error_guard;

/// The deepest level reached and where it was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deepest {
    pub position: Position,
    pub depth: usize,
}

impl Deepest {
    fn at(position: Position, depth: usize) -> Self {
        Self { position, depth }
    }

    /// Keep `other` only if it is strictly deeper.
    fn absorb(&mut self, other: Deepest) {
        if other.depth > self.depth {
            *self = other;
        }
    }
}

/// Deepest nesting in a function body, starting from depth 0.
pub fn max_depth(body: &Block) -> Deepest {
    walk_block(body, 0)
}

fn walk_block(block: &Block, depth: usize) -> Deepest {
    let mut deepest = Deepest::at(block.lbrace, depth);
    for stmt in &block.stmts {
        deepest.absorb(walk_stmt(stmt, depth));
    }
    deepest
}

fn walk_stmts(stmts: &[Statement], depth: usize, deepest: &mut Deepest) {
    for stmt in stmts {
        deepest.absorb(walk_stmt(stmt, depth));
    }
}

fn walk_stmt(stmt: &Statement, depth: usize) -> Deepest {
    let mut deepest = Deepest::at(stmt.position(), depth);

    match stmt {
        Statement::If(s) => deepest.absorb(walk_if(s, depth)),
        Statement::Loop(s) => deepest.absorb(walk_block(&s.body, depth + 1)),
        Statement::Switch(s) => deepest.absorb(walk_block(&s.body, depth + 1)),
        Statement::Select(s) => deepest.absorb(walk_block(&s.body, depth + 1)),
        Statement::Case(c) => walk_stmts(&c.body, depth + 1, &mut deepest),
        Statement::Comm(c) => walk_stmts(&c.body, depth + 1, &mut deepest),
        Statement::Block(b) => walk_stmts(&b.stmts, depth, &mut deepest),
        Statement::Labeled(s) => {
            if let Some(inner) = &s.stmt {
                deepest.absorb(walk_stmt(inner, depth));
            }
        }
        Statement::Return(_) | Statement::Simple(_) => {
            deepest.absorb(walk_func_lits(stmt, depth));
        }
    }

    deepest
}

fn walk_if(stmt: &IfStmt, depth: usize) -> Deepest {
    let mut deepest = Deepest::at(stmt.position, depth);
    if is_error_guard(stmt) {
        return deepest;
    }

    if let Some(init) = &stmt.init {
        deepest.absorb(walk_func_lits(init, depth));
    }
    deepest.absorb(walk_block(&stmt.then, depth + 1));
    match &stmt.else_branch {
        Some(ElseBranch::If(else_if)) => deepest.absorb(walk_if(else_if, depth)),
        Some(ElseBranch::Block(b)) => deepest.absorb(walk_block(b, depth + 1)),
        None => {}
    }
    deepest
}

/// Each function literal in `stmt` opens a new level for its body.
fn walk_func_lits(stmt: &Statement, depth: usize) -> Deepest {
    let mut deepest = Deepest::at(stmt.position(), depth);
    outer_func_lits(stmt, |body| deepest.absorb(walk_block(body, depth + 1)));
    deepest
}
