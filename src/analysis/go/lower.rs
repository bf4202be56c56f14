//! Lowering of tree-sitter-go nodes into [`crate::syntax`] types.
//!
//! Node kinds without a dedicated variant are kept as [`Expr::Other`] with
//! their named children, so nothing that may hold a call or a function
//! literal is dropped.

use tree_sitter::Node;

use crate::analysis::ParsedFile;
use crate::syntax::{
    Binding, Block, CaseClause, CommClause, ElseBranch, Expr, FunctionDecl, IfStmt, LabeledStmt,
    LitKind, LoopKind, LoopStmt, ParamGroup, Position, ReturnStmt, SelectStmt, SimpleKind,
    SimpleStmt, Statement, SwitchKind, SwitchStmt,
};

pub(super) struct Lowerer<'a> {
    file: &'a ParsedFile,
}

impl<'a> Lowerer<'a> {
    pub(super) fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    fn text(&self, node: Node) -> String {
        self.file.node_text(node).to_string()
    }

    /// Lower a `function_declaration` or `method_declaration`.
    pub(super) fn function(&self, node: Node) -> FunctionDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|r| self.receiver(r));
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.param_groups(p))
            .unwrap_or_default();
        let body = node.child_by_field_name("body").map(|b| self.block(b));

        FunctionDecl {
            name,
            receiver,
            position: Position::of(node),
            params,
            body,
            doc: self.doc_comments(node),
            bindings: self.bindings(node),
        }
    }

    /// Display form of the receiver type: `T`, `*T`, generic arguments dropped.
    fn receiver(&self, list: Node) -> Option<String> {
        let mut cursor = list.walk();
        let decl = list
            .named_children(&mut cursor)
            .find(|n| n.kind() == "parameter_declaration")?;
        let ty = decl.child_by_field_name("type")?;
        Some(self.receiver_type(ty))
    }

    fn receiver_type(&self, node: Node) -> String {
        match node.kind() {
            "type_identifier" => self.text(node),
            "pointer_type" => {
                let inner = node
                    .named_child(0)
                    .map(|n| self.receiver_type(n))
                    .unwrap_or_else(|| "?".to_string());
                format!("*{}", inner)
            }
            "generic_type" => node
                .child_by_field_name("type")
                .map(|n| self.receiver_type(n))
                .unwrap_or_else(|| "?".to_string()),
            _ => "?".to_string(),
        }
    }

    fn param_groups(&self, list: Node) -> Vec<ParamGroup> {
        let mut groups = Vec::new();
        let mut cursor = list.walk();

        for child in list.named_children(&mut cursor) {
            let variadic = match child.kind() {
                "parameter_declaration" => false,
                "variadic_parameter_declaration" => true,
                _ => continue,
            };
            let mut name_cursor = child.walk();
            let names = child
                .children_by_field_name("name", &mut name_cursor)
                .map(|n| self.text(n))
                .collect();
            let ty = child
                .child_by_field_name("type")
                .map(|n| self.text(n))
                .unwrap_or_default();
            groups.push(ParamGroup {
                names,
                ty,
                variadic,
            });
        }

        normalize_param_groups(groups)
    }

    /// Names bound anywhere in a declaration, in source order.
    ///
    /// Scopes are not tracked: a name bound twice yields two bindings.
    fn bindings(&self, node: Node) -> Vec<Binding> {
        let mut out = Vec::new();
        self.collect_bindings(node, &mut out);
        out
    }

    fn collect_bindings(&self, node: Node, out: &mut Vec<Binding>) {
        match node.kind() {
            // Parameter names inside type literals bind nothing.
            "function_type" | "interface_type" | "struct_type" => return,
            "parameter_list" => {
                let position = Position::of(node);
                for group in self.param_groups(node) {
                    let ty = if group.variadic {
                        format!("[]{}", group.ty)
                    } else {
                        group.ty
                    };
                    for name in group.names {
                        push_binding(out, name, ty.clone(), position);
                    }
                }
            }
            "var_spec" => {
                let declared = node.child_by_field_name("type").map(|t| self.text(t));
                let values = node
                    .child_by_field_name("value")
                    .map(|v| self.list_items(v))
                    .unwrap_or_default();
                let mut cursor = node.walk();
                let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();
                for (i, name) in names.into_iter().enumerate() {
                    let ty = match &declared {
                        Some(ty) => ty.clone(),
                        None => values.get(i).map(|v| self.inferred_type(*v)).unwrap_or_default(),
                    };
                    push_binding(out, self.text(name), ty, Position::of(name));
                }
            }
            "short_var_declaration" => {
                let names = node
                    .child_by_field_name("left")
                    .map(|l| self.list_items(l))
                    .unwrap_or_default();
                let values = node
                    .child_by_field_name("right")
                    .map(|r| self.list_items(r))
                    .unwrap_or_default();
                for (i, name) in names.iter().enumerate() {
                    // `a, b := f()` leaves both types unknown.
                    let ty = if names.len() == values.len() {
                        self.inferred_type(values[i])
                    } else {
                        String::new()
                    };
                    push_binding(out, self.text(*name), ty, Position::of(*name));
                }
            }
            "range_clause" | "receive_statement" if has_token(node, ":=") => {
                for name in node
                    .child_by_field_name("left")
                    .map(|l| self.list_items(l))
                    .unwrap_or_default()
                {
                    push_binding(out, self.text(name), String::new(), Position::of(name));
                }
            }
            "type_switch_statement" => {
                for name in node
                    .child_by_field_name("alias")
                    .map(|a| self.list_items(a))
                    .unwrap_or_default()
                {
                    push_binding(out, self.text(name), String::new(), Position::of(name));
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_bindings(child, out);
        }
    }

    /// Elements of an `expression_list`, or the node itself otherwise.
    fn list_items<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        if node.kind() != "expression_list" {
            return vec![node];
        }
        let mut cursor = node.walk();
        let items = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .collect();
        items
    }

    /// Type of an initializer when it is evident from syntax alone.
    fn inferred_type(&self, value: Node) -> String {
        match value.kind() {
            "composite_literal" => value
                .child_by_field_name("type")
                .map(|t| self.text(t))
                .unwrap_or_default(),
            "unary_expression" => {
                let operand = value.child_by_field_name("operand");
                let is_addr = value
                    .child_by_field_name("operator")
                    .is_some_and(|op| self.file.node_text(op) == "&");
                match operand {
                    Some(operand) if is_addr && operand.kind() == "composite_literal" => {
                        format!("*{}", self.inferred_type(operand))
                    }
                    _ => String::new(),
                }
            }
            "func_literal" => "func".to_string(),
            "call_expression" => {
                let is_new = value
                    .child_by_field_name("function")
                    .is_some_and(|f| self.file.node_text(f) == "new");
                let arg = value
                    .child_by_field_name("arguments")
                    .and_then(|a| a.named_child(0));
                match arg {
                    Some(arg) if is_new => format!("*{}", self.text(arg)),
                    _ => String::new(),
                }
            }
            _ => String::new(),
        }
    }

    /// The comment lines directly above `node`, in source order.
    ///
    /// A blank line ends the run, and so does a comment trailing code on the
    /// line before it.
    fn doc_comments(&self, node: Node) -> Vec<String> {
        let mut lines = Vec::new();
        let mut next_row = node.start_position().row;
        let mut sibling = node.prev_sibling();

        while let Some(comment) = sibling {
            if comment.kind() != "comment" || next_row > comment.end_position().row + 1 {
                break;
            }
            let before = comment.prev_sibling();
            if let Some(before) = before {
                if before.kind() != "comment"
                    && before.end_position().row == comment.start_position().row
                {
                    break;
                }
            }
            lines.push(self.text(comment));
            next_row = comment.start_position().row;
            sibling = before;
        }

        lines.reverse();
        lines
    }

    pub(super) fn block(&self, node: Node) -> Block {
        Block {
            lbrace: Position::of(node),
            stmts: self.statements(node),
        }
    }

    /// Statements directly under a block or clause.
    ///
    /// Clause headers (`case` values, types, communications) are fields and
    /// are skipped; statement lists are flattened.
    fn statements(&self, node: Node) -> Vec<Statement> {
        let mut stmts = Vec::new();
        self.collect_statements(node, &mut stmts);
        stmts
    }

    fn collect_statements(&self, node: Node, out: &mut Vec<Statement>) {
        let mut cursor = node.walk();
        if !cursor.goto_first_child() {
            return;
        }
        loop {
            let child = cursor.node();
            if child.is_named() && cursor.field_name().is_none() {
                match child.kind() {
                    "statement_list" => self.collect_statements(child, out),
                    "comment" => {}
                    _ => out.push(self.statement(child)),
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    fn statement(&self, node: Node) -> Statement {
        let position = Position::of(node);
        match node.kind() {
            "if_statement" => Statement::If(self.if_stmt(node)),
            "for_statement" => Statement::Loop(self.loop_stmt(node)),
            "expression_switch_statement" | "type_switch_statement" => {
                Statement::Switch(self.switch_stmt(node))
            }
            "select_statement" => Statement::Select(self.select_stmt(node)),
            "block" => Statement::Block(self.block(node)),
            "labeled_statement" | "empty_labeled_statement" => {
                Statement::Labeled(self.labeled_stmt(node))
            }
            "return_statement" => Statement::Return(ReturnStmt {
                position,
                results: self.flat_exprs(node),
            }),
            kind => Statement::Simple(SimpleStmt {
                position,
                kind: simple_kind(kind),
                exprs: self.flat_exprs(node),
            }),
        }
    }

    fn if_stmt(&self, node: Node) -> IfStmt {
        let position = Position::of(node);
        let else_branch = node.child_by_field_name("alternative").map(|alt| {
            if alt.kind() == "if_statement" {
                ElseBranch::If(Box::new(self.if_stmt(alt)))
            } else {
                ElseBranch::Block(self.block(alt))
            }
        });

        IfStmt {
            position,
            init: node
                .child_by_field_name("initializer")
                .map(|n| Box::new(self.statement(n))),
            cond: node
                .child_by_field_name("condition")
                .map(|n| self.expr(n))
                .unwrap_or(Expr::Other(Vec::new())),
            then: node
                .child_by_field_name("consequence")
                .map(|n| self.block(n))
                .unwrap_or_else(|| empty_block(position)),
            else_branch,
        }
    }

    fn loop_stmt(&self, node: Node) -> LoopStmt {
        let position = Position::of(node);
        let body = node.child_by_field_name("body");
        let mut kind = LoopKind::Counted;
        let mut header = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if Some(child) == body || child.kind() == "comment" {
                continue;
            }
            if child.kind() == "range_clause" {
                kind = LoopKind::Range;
            }
            header.push(self.expr(child));
        }

        LoopStmt {
            position,
            kind,
            header,
            body: body
                .map(|b| self.block(b))
                .unwrap_or_else(|| empty_block(position)),
        }
    }

    fn switch_stmt(&self, node: Node) -> SwitchStmt {
        let position = Position::of(node);
        let kind = if node.kind() == "type_switch_statement" {
            SwitchKind::Type
        } else {
            SwitchKind::Expression
        };

        let mut cursor = node.walk();
        let cases = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "expression_case" | "type_case" | "default_case"))
            .map(|c| Statement::Case(self.case_clause(c)))
            .collect();

        SwitchStmt {
            position,
            kind,
            init: node
                .child_by_field_name("initializer")
                .map(|n| Box::new(self.statement(n))),
            tag: node.child_by_field_name("value").map(|n| self.expr(n)),
            body: Block {
                lbrace: lbrace(node),
                stmts: cases,
            },
        }
    }

    fn case_clause(&self, node: Node) -> CaseClause {
        let list = match node.kind() {
            "expression_case" => node
                .child_by_field_name("value")
                .map(|v| self.flat_exprs_of(v))
                .unwrap_or_default(),
            "type_case" => {
                let mut cursor = node.walk();
                let types = node
                    .children_by_field_name("type", &mut cursor)
                    .filter(|t| t.is_named())
                    .map(|t| self.expr(t))
                    .collect();
                types
            }
            _ => Vec::new(),
        };

        CaseClause {
            position: Position::of(node),
            list,
            body: self.statements(node),
        }
    }

    fn select_stmt(&self, node: Node) -> SelectStmt {
        let mut cursor = node.walk();
        let clauses = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "communication_case" | "default_case"))
            .map(|c| {
                Statement::Comm(CommClause {
                    position: Position::of(c),
                    comm: c
                        .child_by_field_name("communication")
                        .map(|n| Box::new(self.statement(n))),
                    body: self.statements(c),
                })
            })
            .collect();

        SelectStmt {
            position: Position::of(node),
            body: Block {
                lbrace: lbrace(node),
                stmts: clauses,
            },
        }
    }

    fn labeled_stmt(&self, node: Node) -> LabeledStmt {
        let label = node
            .child_by_field_name("label")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let stmt = self.statements(node).into_iter().next().map(Box::new);

        LabeledStmt {
            position: Position::of(node),
            label,
            stmt,
        }
    }

    /// Named children of `node` as expressions, with expression lists flattened.
    fn flat_exprs(&self, node: Node) -> Vec<Expr> {
        let mut exprs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "comment" => {}
                "expression_list" => exprs.extend(self.flat_exprs_of(child)),
                _ => exprs.push(self.expr(child)),
            }
        }
        exprs
    }

    /// Elements of an `expression_list`, or the node itself otherwise.
    fn flat_exprs_of(&self, node: Node) -> Vec<Expr> {
        if node.kind() == "expression_list" {
            self.child_exprs(node)
        } else {
            vec![self.expr(node)]
        }
    }

    fn child_exprs(&self, node: Node) -> Vec<Expr> {
        let mut cursor = node.walk();
        let exprs = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() != "comment")
            .map(|c| self.expr(c))
            .collect();
        exprs
    }

    fn expr(&self, node: Node) -> Expr {
        match node.kind() {
            "identifier" | "field_identifier" | "package_identifier" | "type_identifier"
            | "blank_identifier" | "label_name" | "nil" | "true" | "false" | "iota" => {
                Expr::Ident(self.text(node))
            }
            "int_literal" => self.lit(node, LitKind::Int),
            "float_literal" => self.lit(node, LitKind::Float),
            "imaginary_literal" => self.lit(node, LitKind::Imag),
            "rune_literal" => self.lit(node, LitKind::Char),
            "interpreted_string_literal" | "raw_string_literal" => self.lit(node, LitKind::String),
            "composite_literal" => Expr::CompositeLit {
                ty: node
                    .child_by_field_name("type")
                    .map(|t| Box::new(self.expr(t))),
                elements: node
                    .child_by_field_name("body")
                    .map(|b| self.child_exprs(b))
                    .unwrap_or_default(),
            },
            "literal_value" => Expr::CompositeLit {
                ty: None,
                elements: self.child_exprs(node),
            },
            "literal_element" => {
                let mut children = self.child_exprs(node);
                if children.len() == 1 {
                    children.remove(0)
                } else {
                    Expr::Other(children)
                }
            }
            "call_expression" => self.call(node),
            "type_conversion_expression" => Expr::Call {
                fun: Box::new(self.field_expr(node, "type")),
                args: node
                    .child_by_field_name("operand")
                    .map(|o| vec![self.expr(o)])
                    .unwrap_or_default(),
            },
            "selector_expression" => Expr::Selector {
                x: Box::new(self.field_expr(node, "operand")),
                sel: node
                    .child_by_field_name("field")
                    .map(|f| self.text(f))
                    .unwrap_or_default(),
            },
            "func_literal" => {
                let position = Position::of(node);
                Expr::FuncLit(
                    node.child_by_field_name("body")
                        .map(|b| self.block(b))
                        .unwrap_or_else(|| empty_block(position)),
                )
            }
            "binary_expression" => Expr::Binary {
                op: node
                    .child_by_field_name("operator")
                    .map(|o| self.text(o))
                    .unwrap_or_default(),
                x: Box::new(self.field_expr(node, "left")),
                y: Box::new(self.field_expr(node, "right")),
            },
            _ => Expr::Other(self.child_exprs(node)),
        }
    }

    fn lit(&self, node: Node, kind: LitKind) -> Expr {
        Expr::BasicLit {
            kind,
            value: self.text(node),
        }
    }

    fn field_expr(&self, node: Node, field: &str) -> Expr {
        node.child_by_field_name(field)
            .map(|n| self.expr(n))
            .unwrap_or(Expr::Other(Vec::new()))
    }

    fn call(&self, node: Node) -> Expr {
        let fun = match node.child_by_field_name("function") {
            // `new` and `make` may appear as keyword tokens.
            Some(f) if !f.is_named() => Expr::Ident(self.text(f)),
            Some(f) => self.expr(f),
            None => Expr::Other(Vec::new()),
        };
        // An explicit instantiation `f[T](x)` is an index expression, not a name.
        let fun = if node.child_by_field_name("type_arguments").is_some() {
            Expr::Other(vec![fun])
        } else {
            fun
        };
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.child_exprs(a))
            .unwrap_or_default();

        Expr::Call {
            fun: Box::new(fun),
            args,
        }
    }
}

fn simple_kind(kind: &str) -> SimpleKind {
    match kind {
        "assignment_statement" | "short_var_declaration" => SimpleKind::Assign,
        "inc_statement" | "dec_statement" => SimpleKind::IncDec,
        "send_statement" => SimpleKind::Send,
        "receive_statement" => SimpleKind::Receive,
        "go_statement" => SimpleKind::Go,
        "defer_statement" => SimpleKind::Defer,
        "var_declaration" | "const_declaration" | "type_declaration" => SimpleKind::Decl,
        "break_statement" | "continue_statement" | "goto_statement" | "fallthrough_statement" => {
            SimpleKind::Branch
        }
        "empty_statement" => SimpleKind::Empty,
        _ => SimpleKind::Expression,
    }
}

fn push_binding(out: &mut Vec<Binding>, name: String, ty: String, position: Position) {
    if name != "_" {
        out.push(Binding { name, ty, position });
    }
}

/// Whether `node` has an anonymous child token `token`.
fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| !c.is_named() && c.kind() == token);
    found
}

/// Position of the `{` token of a switch or select.
fn lbrace(node: Node) -> Position {
    let mut cursor = node.walk();
    let brace = node.children(&mut cursor).find(|c| c.kind() == "{");
    brace.map(Position::of).unwrap_or_else(|| Position::of(node))
}

fn empty_block(position: Position) -> Block {
    Block {
        lbrace: position,
        stmts: Vec::new(),
    }
}

/// Rebuild Go's field view of a parameter list.
///
/// In `(a, b int)` the grammar may produce a nameless group typed `a`
/// followed by `b int`. When any group is named, every group must be, so
/// such bare identifiers are folded into the next named group.
fn normalize_param_groups(groups: Vec<ParamGroup>) -> Vec<ParamGroup> {
    if groups.iter().all(|g| g.names.is_empty()) {
        return groups;
    }

    let mut normalized = Vec::with_capacity(groups.len());
    let mut pending: Vec<String> = Vec::new();

    for mut group in groups {
        if group.names.is_empty() && !group.variadic && is_identifier(&group.ty) {
            pending.push(group.ty);
            continue;
        }
        if !pending.is_empty() {
            let mut names = std::mem::take(&mut pending);
            names.append(&mut group.names);
            group.names = names;
        }
        normalized.push(group);
    }

    normalized.extend(pending.into_iter().map(|ty| ParamGroup {
        names: Vec::new(),
        ty,
        variadic: false,
    }));
    normalized
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
