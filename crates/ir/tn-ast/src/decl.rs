//! Declarations: the named entities a name reference can resolve to

use crate::{BlockId, DeclId, ExprId, ScopeId};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use tn_intern::Symbol;
use tn_span::FileSpan;

/// Semantic type of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Machine integer
    Int,
    /// Truth value
    Bool,
    /// No value; the return type of builtins
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Bool => f.write_str("bool"),
            Self::Void => f.write_str("void"),
        }
    }
}

/// A named program entity
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// Local or global variable
    Variable(VariableDecl),
    /// Function parameter
    Parameter(ParameterDecl),
    /// User function
    Function(FunctionDecl),
    /// Physical storage location; never resolves further
    Register(RegisterDecl),
    /// Primitive operation rendered by the target machine
    Builtin(BuiltinDecl),
}

impl Declaration {
    /// Declared name
    pub fn name(&self) -> Symbol {
        match self {
            Self::Variable(decl) => decl.name,
            Self::Parameter(decl) => decl.name,
            Self::Function(decl) => decl.name,
            Self::Register(decl) => decl.name,
            Self::Builtin(decl) => decl.name,
        }
    }

    /// Source location; registers and builtins have none
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::Variable(decl) => Some(decl.span),
            Self::Parameter(decl) => Some(decl.span),
            Self::Function(decl) => Some(decl.span),
            Self::Register(_) | Self::Builtin(_) => None,
        }
    }

    /// Human-readable kind, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Variable(_) => "variable",
            Self::Parameter(_) => "parameter",
            Self::Function(_) => "function",
            Self::Register(_) => "register",
            Self::Builtin(_) => "builtin",
        }
    }

    /// Whether a call expression may target this declaration
    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Builtin(_))
    }

    /// The builtin operation, if this is a builtin declaration
    pub fn as_builtin(&self) -> Option<Builtin> {
        match self {
            Self::Builtin(decl) => Some(decl.builtin),
            _ => None,
        }
    }
}

/// Variable declaration with an optional initializer
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Declared name
    pub name: Symbol,
    /// Declared type
    pub ty: Type,
    /// Initial value, evaluated in the enclosing scope
    pub initializer: Option<ExprId>,
    /// Source location of the declaration
    pub span: FileSpan,
}

/// Parameter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    /// Declared name
    pub name: Symbol,
    /// Declared type
    pub ty: Type,
    /// Source location of the declaration
    pub span: FileSpan,
}

/// Function declaration; owns the scope holding its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Function name
    pub name: Symbol,
    /// Return type
    pub ty: Type,
    /// Parameter declarations, in order
    pub params: Vec<DeclId>,
    /// Function body
    pub body: BlockId,
    /// Source location of the declaration
    pub span: FileSpan,
    pub(crate) scope: OnceCell<ScopeId>,
}

impl FunctionDecl {
    /// Create a function whose scope is not yet resolved
    pub fn new(name: Symbol, ty: Type, params: Vec<DeclId>, body: BlockId, span: FileSpan) -> Self {
        Self {
            name,
            ty,
            params,
            body,
            span,
            scope: OnceCell::new(),
        }
    }

    /// Parameter scope, once resolved
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get().copied()
    }

    /// Record the parameter scope; returns `false` if one was already set
    #[must_use]
    pub fn set_scope(&self, scope: ScopeId) -> bool {
        self.scope.set(scope).is_ok()
    }
}

/// Machine register
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterDecl {
    /// Register name as written in assembly
    pub name: Symbol,
}

/// Builtin operation visible to every program
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinDecl {
    /// Builtin name
    pub name: Symbol,
    /// Result type
    pub ty: Type,
    /// Which operation this declares
    pub builtin: Builtin,
}

/// The closed set of builtin operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    /// `print(value)`
    Print,
    /// `store(value, address)`
    Store,
    /// `halt()`
    Halt,
}

impl Builtin {
    /// Every builtin, in discriminant order
    pub const ALL: [Self; 3] = [Self::Print, Self::Store, Self::Halt];

    /// Name the builtin is declared under
    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Store => "store",
            Self::Halt => "halt",
        }
    }

    /// Number of operands the builtin takes
    pub fn arity(self) -> usize {
        match self {
            Self::Print => 1,
            Self::Store => 2,
            Self::Halt => 0,
        }
    }

    /// Result type of a call
    pub fn return_type(self) -> Type {
        Type::Void
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
