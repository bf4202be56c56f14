//! Syntactic call resolution for fan-out.
//!
//! Without a type checker, callees are resolved from declarations alone:
//! package-level functions, variables, types and methods of the package
//! being analyzed, the file's imports, and the names bound inside the
//! function being measured.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::metrics::{Callee, SymbolResolver};
use crate::syntax::{Binding, Expr, FunctionDecl, SourceFile};

/// Go builtin functions.
const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Predeclared type names, callable as conversions.
const PREDECLARED_TYPES: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr",
];

/// Identity of a resolved function, method or function value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId {
    /// Import path of the declaring package; empty for the predeclared
    /// `error` interface.
    pub package: String,
    /// `f`, `T.m`, or `name@line:col` for a local function value.
    pub name: String,
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Declarations of one package, merged across its files.
#[derive(Debug, Clone, Default)]
pub struct PackageScope {
    /// Import path of the package.
    pub path: String,
    functions: HashSet<String>,
    vars: HashSet<String>,
    types: HashSet<String>,
    /// Method name to the receiver base types declaring it.
    methods: HashMap<String, BTreeSet<String>>,
}

impl PackageScope {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Build the scope of a package from all of its files.
    pub fn from_files<'a>(path: impl Into<String>, files: impl IntoIterator<Item = &'a SourceFile>) -> Self {
        let mut scope = Self::new(path);
        for file in files {
            scope.add_file(file);
        }
        scope
    }

    pub fn add_file(&mut self, file: &SourceFile) {
        self.types.extend(file.types.iter().cloned());
        self.vars.extend(file.vars.iter().cloned());
        for func in &file.functions {
            match &func.receiver {
                Some(recv) => {
                    let base = recv.trim_start_matches('*').to_string();
                    self.methods.entry(func.name.clone()).or_default().insert(base);
                }
                None => {
                    self.functions.insert(func.name.clone());
                }
            }
        }
    }

    fn has_method(&self, receiver: &str, name: &str) -> bool {
        self.methods
            .get(name)
            .is_some_and(|receivers| receivers.contains(receiver))
    }
}

/// Resolves callees for one file of a package.
///
/// On its own it knows only package-level names; [`GoResolver::in_function`]
/// adds the receiver, parameters and locals of one declaration.
pub struct GoResolver<'a> {
    scope: &'a PackageScope,
    /// Local import name to import path.
    imports: HashMap<String, String>,
}

impl<'a> GoResolver<'a> {
    pub fn new(scope: &'a PackageScope, file: &SourceFile) -> Self {
        let imports = file
            .imports
            .iter()
            .filter_map(|i| i.local_name().map(|name| (name, i.path.clone())))
            .collect();
        Self { scope, imports }
    }

    /// Resolver for calls made inside `func`.
    pub fn in_function<'f>(&'f self, func: &'f FunctionDecl) -> FunctionResolver<'f> {
        FunctionResolver {
            file: self,
            bindings: &func.bindings,
        }
    }

    fn object(&self, package: &str, name: &str) -> Callee<SymbolId> {
        Callee::Object {
            symbol: SymbolId {
                package: package.to_string(),
                name: name.to_string(),
            },
            package: Some(package.to_string()),
        }
    }

    fn resolve_in(&self, callee: &Expr, bindings: &[Binding]) -> Callee<SymbolId> {
        let local = |name: &str| bindings.iter().find(|b| b.name == name);
        match callee {
            // Calling a local name calls the function value it holds.
            Expr::Ident(name) => match local(name) {
                Some(binding) => self.object(
                    &self.scope.path,
                    &format!("{}@{}", binding.name, binding.position),
                ),
                None => self.resolve_ident(name),
            },
            Expr::Selector { x, sel } => match x.as_ident() {
                Some(q) => match local(q) {
                    Some(binding) => self.resolve_method(binding, sel),
                    None => self.resolve_qualified(q, sel),
                },
                None => Callee::Unresolved,
            },
            _ => Callee::Unresolved,
        }
    }

    fn resolve_ident(&self, name: &str) -> Callee<SymbolId> {
        if self.scope.functions.contains(name) || self.scope.vars.contains(name) {
            self.object(&self.scope.path, name)
        } else if self.scope.types.contains(name) || PREDECLARED_TYPES.contains(&name) {
            Callee::TypeName
        } else if BUILTINS.contains(&name) {
            Callee::Builtin
        } else {
            Callee::Unresolved
        }
    }

    /// `pkg.F()` on an import, or the method expression `T.m(recv)`.
    fn resolve_qualified(&self, qualifier: &str, sel: &str) -> Callee<SymbolId> {
        if let Some(path) = self.imports.get(qualifier) {
            return self.object(path, sel);
        }
        if self.scope.has_method(qualifier, sel) {
            return self.object(&self.scope.path, &format!("{}.{}", qualifier, sel));
        }
        Callee::Unresolved
    }

    /// `x.m()` where `x` is bound inside the function.
    fn resolve_method(&self, binding: &Binding, sel: &str) -> Callee<SymbolId> {
        let Some(ty) = binding.named_type() else {
            return Callee::Unresolved;
        };
        match ty.split_once('.') {
            // Methods of imported types belong to the importing path, so
            // standard library receivers are excluded by path like any call.
            Some((qualifier, name)) => match self.imports.get(qualifier) {
                Some(path) => self.object(path, &format!("{}.{}", name, sel)),
                None => Callee::Unresolved,
            },
            None if ty == "error" && sel == "Error" => Callee::Object {
                symbol: SymbolId {
                    package: String::new(),
                    name: "error.Error".to_string(),
                },
                package: None,
            },
            // Promoted and interface methods are not declared on `ty` itself.
            None if self.scope.has_method(ty, sel) => {
                self.object(&self.scope.path, &format!("{}.{}", ty, sel))
            }
            None => Callee::Unresolved,
        }
    }
}

impl SymbolResolver for GoResolver<'_> {
    type Symbol = SymbolId;

    fn resolve(&self, callee: &Expr) -> Callee<SymbolId> {
        self.resolve_in(callee, &[])
    }
}

/// A [`GoResolver`] seeing the names bound inside one function.
pub struct FunctionResolver<'f> {
    file: &'f GoResolver<'f>,
    bindings: &'f [Binding],
}

impl SymbolResolver for FunctionResolver<'_> {
    type Symbol = SymbolId;

    fn resolve(&self, callee: &Expr) -> Callee<SymbolId> {
        self.file.resolve_in(callee, self.bindings)
    }
}
