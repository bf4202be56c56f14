//! Lowered Go syntax consumed by the metrics engine.
//!
//! The frontend in `crate::analysis` turns tree-sitter parse trees into these
//! types. They are read-only once built: every analyzer borrows them for the
//! duration of one run and never mutates them.
//!
//! Only the node kinds the metrics care about get their own variants. Every
//! other construct is kept as [`Expr::Other`] or [`SimpleStmt`] so that calls
//! and function literals nested inside it stay reachable.

pub mod walk;

use std::fmt;

use serde::Serialize;

/// Source position (1-indexed line and byte column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    /// Start line (1-indexed).
    pub line: usize,
    /// Start column (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset from the start of the file.
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Position of the first byte of a tree-sitter node.
    pub fn of(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        Self {
            line: start.row + 1, // tree-sitter is 0-indexed
            column: start.column + 1,
            offset: node.start_byte(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// An import declared by a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The import path without quotes (e.g. `github.com/pkg/errors`).
    pub path: String,
    /// Explicit name (`foo` in `import foo "bar"`, also `.` and `_`).
    pub alias: Option<String>,
    pub position: Position,
}

impl Import {
    /// The identifier this import is referred to by inside the file.
    ///
    /// Returns `None` for dot and blank imports, which never qualify a call.
    pub fn local_name(&self) -> Option<String> {
        match self.alias.as_deref() {
            Some(".") | Some("_") => None,
            Some(alias) => Some(alias.to_string()),
            None => Some(default_package_name(&self.path)),
        }
    }
}

/// Guess the package name of an import path from its last segment.
///
/// `example.com/foo/v2` -> `foo`, `gopkg.in/yaml.v3` -> `yaml`,
/// `github.com/mattn/go-isatty` -> `isatty`.
pub fn default_package_name(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 1 {
        if let Some(last) = segments.last() {
            if is_major_version(last) {
                segments.pop();
            }
        }
    }
    let last = segments.last().copied().unwrap_or(path);

    let mut name = last;
    if let Some(idx) = name.rfind(".v") {
        if name[idx + 2..].chars().all(|c| c.is_ascii_digit()) && idx + 2 < name.len() {
            name = &name[..idx];
        }
    }
    let name = name.strip_prefix("go-").unwrap_or(name);
    name.replace(['-', '.'], "_")
}

fn is_major_version(segment: &str) -> bool {
    segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit())
}

/// One lowered compilation unit.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File path as given to the frontend.
    pub path: String,
    /// Package name from the package clause.
    pub package: String,
    pub imports: Vec<Import>,
    /// Names of all package-level type declarations in this file.
    pub types: Vec<String>,
    /// Names of all package-level variables in this file.
    pub vars: Vec<String>,
    /// Function and method declarations in source order.
    pub functions: Vec<FunctionDecl>,
}

/// A function or method declaration.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    /// Display form of the receiver type for methods (`T`, `*T`).
    pub receiver: Option<String>,
    /// Position of the `func` keyword.
    pub position: Position,
    pub params: Vec<ParamGroup>,
    /// `None` for declarations without a body (assembly stubs).
    pub body: Option<Block>,
    /// Raw comment lines directly above the declaration, in source order.
    pub doc: Vec<String>,
    /// Names bound inside the declaration, in source order.
    pub bindings: Vec<Binding>,
}

impl FunctionDecl {
    /// Name used in diagnostics: `Receiver.Name` for methods.
    pub fn display_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{}.{}", recv, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// A name bound by a receiver, parameter, result, or local variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    /// Source text of the declared type, or of the type of a `T{}`, `&T{}`
    /// or `new(T)` initializer. `func` for function literals; empty when
    /// unknown.
    pub ty: String,
    pub position: Position,
}

impl Binding {
    /// Whether the bound value is a function.
    pub fn is_func(&self) -> bool {
        self.ty == "func" || self.ty.starts_with("func(")
    }

    /// The named type behind the binding: `pkg.T` or `T`, with pointers and
    /// type arguments dropped. `None` for unknown and unnamed types.
    pub fn named_type(&self) -> Option<&str> {
        let ty = self.ty.trim_start_matches('*').trim();
        let ty = ty.split('[').next().unwrap_or(ty);
        let is_name = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_');
        match ty.split_once('.') {
            Some((qualifier, name)) if is_name(qualifier) && is_name(name) => Some(ty),
            None if is_name(ty) && !matches!(ty, "func" | "map" | "chan" | "struct" | "interface") => {
                Some(ty)
            }
            _ => None,
        }
    }
}

/// Names sharing one declared type, e.g. `a, b int`.
///
/// An empty name list is a single unnamed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamGroup {
    pub names: Vec<String>,
    /// Source text of the declared type.
    pub ty: String,
    pub variadic: bool,
}

/// A `{ ... }` statement list.
#[derive(Debug, Clone)]
pub struct Block {
    /// Position of the opening brace.
    pub lbrace: Position,
    pub stmts: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub enum Statement {
    If(IfStmt),
    Loop(LoopStmt),
    Switch(SwitchStmt),
    Select(SelectStmt),
    Case(CaseClause),
    Comm(CommClause),
    Block(Block),
    Labeled(LabeledStmt),
    Return(ReturnStmt),
    Simple(SimpleStmt),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::If(s) => s.position,
            Statement::Loop(s) => s.position,
            Statement::Switch(s) => s.position,
            Statement::Select(s) => s.position,
            Statement::Case(s) => s.position,
            Statement::Comm(s) => s.position,
            Statement::Block(b) => b.lbrace,
            Statement::Labeled(s) => s.position,
            Statement::Return(s) => s.position,
            Statement::Simple(s) => s.position,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub position: Position,
    pub init: Option<Box<Statement>>,
    pub cond: Expr,
    pub then: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

impl ElseBranch {
    pub fn position(&self) -> Position {
        match self {
            ElseBranch::If(s) => s.position,
            ElseBranch::Block(b) => b.lbrace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// `for init; cond; post {}`, `for cond {}` and `for {}`.
    Counted,
    /// `for k, v := range x {}`.
    Range,
}

#[derive(Debug, Clone)]
pub struct LoopStmt {
    pub position: Position,
    pub kind: LoopKind,
    /// Expressions of the loop clause (init, condition, post, range operands).
    pub header: Vec<Expr>,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchKind {
    Expression,
    Type,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub position: Position,
    pub kind: SwitchKind,
    pub init: Option<Box<Statement>>,
    /// The switch tag, or the operand of `x.(type)` for type switches.
    pub tag: Option<Expr>,
    /// Holds only [`Statement::Case`] entries.
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct SelectStmt {
    pub position: Position,
    /// Holds only [`Statement::Comm`] entries.
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct CaseClause {
    pub position: Position,
    /// Match expressions or types; empty for `default:`.
    pub list: Vec<Expr>,
    pub body: Vec<Statement>,
}

impl CaseClause {
    pub fn is_default(&self) -> bool {
        self.list.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CommClause {
    pub position: Position,
    /// The send or receive operation; `None` for `default:`.
    pub comm: Option<Box<Statement>>,
    pub body: Vec<Statement>,
}

impl CommClause {
    pub fn is_default(&self) -> bool {
        self.comm.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LabeledStmt {
    pub position: Position,
    pub label: String,
    /// A trailing label at the end of a block labels nothing.
    pub stmt: Option<Box<Statement>>,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub position: Position,
    pub results: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimpleKind {
    Expression,
    Assign,
    IncDec,
    Send,
    Receive,
    Go,
    Defer,
    Decl,
    Branch,
    Empty,
}

/// Any statement without nested statement lists of its own.
#[derive(Debug, Clone)]
pub struct SimpleStmt {
    pub position: Position,
    pub kind: SimpleKind,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone)]
pub enum Expr {
    /// Identifiers, including `nil`, `true`, `false` and `iota`.
    Ident(String),
    BasicLit { kind: LitKind, value: String },
    CompositeLit {
        ty: Option<Box<Expr>>,
        elements: Vec<Expr>,
    },
    Call { fun: Box<Expr>, args: Vec<Expr> },
    Selector { x: Box<Expr>, sel: String },
    FuncLit(Block),
    Binary {
        op: String,
        x: Box<Expr>,
        y: Box<Expr>,
    },
    /// Anything else; only its sub-expressions are kept.
    Other(Vec<Expr>),
}

impl Expr {
    pub fn ident(name: &str) -> Self {
        Expr::Ident(name.to_string())
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call { .. })
    }
}
