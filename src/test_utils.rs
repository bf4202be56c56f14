//! Helpers for unit tests that parse Go snippets through the real frontend.

use std::path::Path;

use crate::analysis::GoFrontend;
use crate::syntax::{FunctionDecl, IfStmt, SourceFile, Statement};

pub fn parse(src: &str) -> SourceFile {
    GoFrontend::new()
        .parse_source(Path::new("test.go"), src.as_bytes())
        .unwrap()
}

/// The declaration named `name` (method names match without the receiver).
pub fn function(src: &str, name: &str) -> FunctionDecl {
    parse(src)
        .functions
        .into_iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no function {} in source", name))
}

/// The first `if` statement of the first function, searching nested blocks.
pub fn first_if(src: &str) -> IfStmt {
    let file = parse(src);
    let body = file.functions[0].body.as_ref().expect("function has a body");
    find_if(&body.stmts).expect("no if statement in body")
}

fn find_if(stmts: &[Statement]) -> Option<IfStmt> {
    stmts.iter().find_map(|stmt| match stmt {
        Statement::If(s) => Some(s.clone()),
        Statement::Block(b) => find_if(&b.stmts),
        Statement::Loop(s) => find_if(&s.body.stmts),
        Statement::Labeled(s) => s.stmt.as_deref().and_then(|s| find_if(std::slice::from_ref(s))),
        _ => None,
    })
}
