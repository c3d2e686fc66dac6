//! Blocks, statements and expressions

use crate::{BlockId, DeclId, ExprId, ScopeId, StmtId};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::fmt;
use tn_intern::Symbol;
use tn_span::FileSpan;

/// Braced statement list; owns the scope holding its local declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in order
    pub stmts: Vec<StmtId>,
    /// Source location including the braces
    pub span: FileSpan,
    scope: OnceCell<ScopeId>,
}

impl Block {
    /// Create a block whose scope is not yet resolved
    pub fn new(stmts: Vec<StmtId>, span: FileSpan) -> Self {
        Self {
            stmts,
            span,
            scope: OnceCell::new(),
        }
    }

    /// Local scope, once resolved
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get().copied()
    }

    /// Record the local scope; returns `false` if one was already set
    #[must_use]
    pub fn set_scope(&self, scope: ScopeId) -> bool {
        self.scope.set(scope).is_ok()
    }
}

/// A statement inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Local declaration, visible to the statements after it
    Decl(DeclId),
    /// Expression evaluated for its effect
    Expr(ExprId),
    /// `target = value`
    Assign {
        /// Place being written
        target: ExprId,
        /// Value being stored
        value: ExprId,
    },
    /// Conditional with an optional else branch
    If {
        /// Branch condition
        condition: ExprId,
        /// Taken when the condition holds
        then_block: BlockId,
        /// Taken otherwise
        else_block: Option<BlockId>,
    },
    /// Loop while the condition holds
    While {
        /// Loop condition
        condition: ExprId,
        /// Loop body
        body: BlockId,
    },
    /// Return from the enclosing function
    Return(Option<ExprId>),
    /// Nested block with its own scope
    Block(BlockId),
}

/// An expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Numeral {
        /// Literal value
        value: i64,
        /// Source location
        span: FileSpan,
    },
    /// Reference to a declaration by name
    Name(NameRef),
    /// Binary operation
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: ExprId,
        /// Right operand
        right: ExprId,
        /// Source location
        span: FileSpan,
    },
    /// Call of a function or builtin
    Call {
        /// Name of the callee
        callee: NameRef,
        /// Arguments in order
        args: Vec<ExprId>,
        /// Source location
        span: FileSpan,
    },
}

impl Expr {
    /// Source location of the whole expression
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Numeral { span, .. } | Self::Binary { span, .. } | Self::Call { span, .. } => {
                *span
            }
            Self::Name(name) => name.span,
        }
    }

    /// Human-readable shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Numeral { .. } => "numeral",
            Self::Name(_) => "name",
            Self::Binary { .. } => "binary operation",
            Self::Call { .. } => "call",
        }
    }
}

/// Outcome of resolving a name reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Bound to a visible declaration
    Resolved(DeclId),
    /// Resolution ran and found nothing visible
    Unresolved,
}

/// A use of an identifier
///
/// The binding slot starts empty and is written exactly once by name
/// resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRef {
    /// Identifier as written
    pub name: Symbol,
    /// Source location of the identifier
    pub span: FileSpan,
    binding: OnceCell<Binding>,
}

impl NameRef {
    /// An unvisited reference
    pub fn new(name: Symbol, span: FileSpan) -> Self {
        Self {
            name,
            span,
            binding: OnceCell::new(),
        }
    }

    /// A reference already bound to `decl`, as produced for IR temporaries
    /// and physical registers after linearization
    pub fn bound(name: Symbol, span: FileSpan, decl: DeclId) -> Self {
        let name_ref = Self::new(name, span);
        name_ref.binding.get_or_init(|| Binding::Resolved(decl));
        name_ref
    }

    /// `None` until resolution has visited this reference
    pub fn binding(&self) -> Option<Binding> {
        self.binding.get().copied()
    }

    /// The resolved declaration; `None` if unresolved or not yet visited
    pub fn declaration(&self) -> Option<DeclId> {
        match self.binding.get() {
            Some(Binding::Resolved(decl)) => Some(*decl),
            Some(Binding::Unresolved) | None => None,
        }
    }

    /// Write the binding slot
    ///
    /// Returns `false` if the slot was already written; the first binding is
    /// kept.
    pub fn bind(&self, binding: Binding) -> bool {
        self.binding.set(binding).is_ok()
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Declaration, RegisterDecl};
    use tn_arena::Arena;
    use tn_intern::Interner;
    use tn_span::{FileId, Span};

    fn span() -> FileSpan {
        FileSpan::new(FileId::new(0), Span::new(0, 1))
    }

    #[test]
    fn test_binding_is_written_once() {
        let interner = Interner::new();
        let mut decls = Arena::default();
        let r1 = decls.alloc(Declaration::Register(RegisterDecl {
            name: interner.intern("r1"),
        }));
        let name = NameRef::new(interner.intern("x"), span());

        assert_eq!(name.binding(), None);
        assert!(name.bind(Binding::Unresolved));
        assert!(!name.bind(Binding::Resolved(r1)));
        assert_eq!(name.binding(), Some(Binding::Unresolved));
        assert_eq!(name.declaration(), None);
    }

    #[test]
    fn test_prebound_reference() {
        let interner = Interner::new();
        let mut decls = Arena::default();
        let r1 = decls.alloc(Declaration::Register(RegisterDecl {
            name: interner.intern("r1"),
        }));
        let name = NameRef::bound(interner.intern("r1"), span(), r1);

        assert_eq!(name.declaration(), Some(r1));
        assert!(!name.bind(Binding::Unresolved));
    }
}
