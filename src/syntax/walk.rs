//! Pre-order traversal over lowered statements and expressions.

use super::{Block, ElseBranch, Expr, IfStmt, Statement};

/// A node handed to an [`inspect`] callback.
///
/// Conditionals are passed as [`Node::If`] both at statement level and as
/// else-if branches, so a callback sees every conditional the same way.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    If(&'a IfStmt),
    Stmt(&'a Statement),
    Expr(&'a Expr),
}

/// Visit every node of `block` in pre-order.
///
/// Children of a node are visited only when the callback returns `true` for
/// it. Function literal bodies are part of the traversal.
pub fn inspect<'a, F>(block: &'a Block, f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    walk_stmts(&block.stmts, f);
}

/// Visit `stmt` and its descendants in pre-order.
pub fn inspect_stmt<'a, F>(stmt: &'a Statement, f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    walk_stmt(stmt, f);
}

/// Call `found` with the body of every function literal in `stmt` that is
/// not itself nested inside another function literal.
pub fn outer_func_lits<'a, F>(stmt: &'a Statement, mut found: F)
where
    F: FnMut(&'a Block),
{
    walk_stmt(stmt, &mut |node| match node {
        Node::Expr(Expr::FuncLit(body)) => {
            found(body);
            false
        }
        _ => true,
    });
}

fn walk_stmts<'a, F>(stmts: &'a [Statement], f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    for stmt in stmts {
        walk_stmt(stmt, f);
    }
}

fn walk_stmt<'a, F>(stmt: &'a Statement, f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    if let Statement::If(s) = stmt {
        walk_if(s, f);
        return;
    }
    if !f(Node::Stmt(stmt)) {
        return;
    }

    match stmt {
        Statement::If(_) => {}
        Statement::Loop(s) => {
            walk_exprs(&s.header, f);
            walk_stmts(&s.body.stmts, f);
        }
        Statement::Switch(s) => {
            if let Some(init) = &s.init {
                walk_stmt(init, f);
            }
            if let Some(tag) = &s.tag {
                walk_expr(tag, f);
            }
            walk_stmts(&s.body.stmts, f);
        }
        Statement::Select(s) => walk_stmts(&s.body.stmts, f),
        Statement::Case(c) => {
            walk_exprs(&c.list, f);
            walk_stmts(&c.body, f);
        }
        Statement::Comm(c) => {
            if let Some(comm) = &c.comm {
                walk_stmt(comm, f);
            }
            walk_stmts(&c.body, f);
        }
        Statement::Block(b) => walk_stmts(&b.stmts, f),
        Statement::Labeled(s) => {
            if let Some(inner) = &s.stmt {
                walk_stmt(inner, f);
            }
        }
        Statement::Return(s) => walk_exprs(&s.results, f),
        Statement::Simple(s) => walk_exprs(&s.exprs, f),
    }
}

fn walk_if<'a, F>(stmt: &'a IfStmt, f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    if !f(Node::If(stmt)) {
        return;
    }
    if let Some(init) = &stmt.init {
        walk_stmt(init, f);
    }
    walk_expr(&stmt.cond, f);
    walk_stmts(&stmt.then.stmts, f);
    match &stmt.else_branch {
        Some(ElseBranch::If(else_if)) => walk_if(else_if, f),
        Some(ElseBranch::Block(b)) => walk_stmts(&b.stmts, f),
        None => {}
    }
}

fn walk_exprs<'a, F>(exprs: &'a [Expr], f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    for expr in exprs {
        walk_expr(expr, f);
    }
}

fn walk_expr<'a, F>(expr: &'a Expr, f: &mut F)
where
    F: FnMut(Node<'a>) -> bool,
{
    if !f(Node::Expr(expr)) {
        return;
    }
    match expr {
        Expr::Ident(_) | Expr::BasicLit { .. } => {}
        Expr::CompositeLit { ty, elements } => {
            if let Some(ty) = ty {
                walk_expr(ty, f);
            }
            walk_exprs(elements, f);
        }
        Expr::Call { fun, args } => {
            walk_expr(fun, f);
            walk_exprs(args, f);
        }
        Expr::Selector { x, .. } => walk_expr(x, f),
        Expr::FuncLit(body) => walk_stmts(&body.stmts, f),
        Expr::Binary { x, y, .. } => {
            walk_expr(x, f);
            walk_expr(y, f);
        }
        Expr::Other(children) => walk_exprs(children, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::function;

    #[test]
    fn test_inspect_reaches_calls_in_closures() {
        let func = function(
            r#"
package p

func f() {
    go func() {
        if ok {
            work(1)
        }
    }()
    defer cleanup()
}
"#,
            "f",
        );
        let mut calls = Vec::new();
        inspect(func.body.as_ref().unwrap(), &mut |node| {
            if let Node::Expr(Expr::Call { fun, .. }) = node {
                if let Some(name) = fun.as_ident() {
                    calls.push(name.to_string());
                }
            }
            true
        });
        assert_eq!(calls, vec!["work", "cleanup"]);
    }

    #[test]
    fn test_inspect_prunes_on_false() {
        let func = function(
            r#"
package p

func f() {
    if a {
        if b {
            x()
        }
    }
}
"#,
            "f",
        );
        let mut ifs = 0;
        inspect(func.body.as_ref().unwrap(), &mut |node| {
            if let Node::If(_) = node {
                ifs += 1;
                return false;
            }
            true
        });
        assert_eq!(ifs, 1);
    }

    #[test]
    fn test_outer_func_lits_skips_nested_literals() {
        let func = function(
            r#"
package p

func f() {
    run(func() {
        run(func() {})
    }, func() {})
}
"#,
            "f",
        );
        let body = func.body.as_ref().unwrap();
        let mut count = 0;
        outer_func_lits(&body.stmts[0], |_| count += 1);
        assert_eq!(count, 2);
    }
}
