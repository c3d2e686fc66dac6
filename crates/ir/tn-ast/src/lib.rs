//! Program tree consumed by name resolution and rendering
//!
//! The tree is produced by the parser and stored in arenas owned by
//! [`Program`]. Nodes refer to each other through `Idx` handles. Name
//! resolution annotates the tree in place: every [`NameRef`] gets a single
//! [`Binding`], and every scope-owning node (program, function, block) gets
//! the [`ScopeId`] of its scope table.

pub mod builder;
pub mod decl;
pub mod pretty;
pub mod tree;

pub use builder::ProgramBuilder;
pub use decl::{
    Builtin, BuiltinDecl, Declaration, FunctionDecl, ParameterDecl, RegisterDecl, Type,
    VariableDecl,
};
pub use pretty::{ExprDisplay, InstructionDisplay};
pub use tree::{BinaryOp, Binding, Block, Expr, NameRef, Stmt};

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use tn_arena::{Arena, ArenaMap, Idx};
use tn_intern::Interner;

/// Handle to a declaration
pub type DeclId = Idx<Declaration>;
/// Handle to a block
pub type BlockId = Idx<Block>;
/// Handle to a statement
pub type StmtId = Idx<Stmt>;
/// Handle to an expression
pub type ExprId = Idx<Expr>;

/// Identifier of a scope table built by name resolution
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

/// A whole single-file program
#[derive(Debug, Clone)]
pub struct Program {
    /// Top-level declarations in textual order
    pub declarations: Vec<DeclId>,
    /// Builtin declarations, one per [`Builtin`]
    pub builtins: Vec<DeclId>,
    /// Declaration storage, builtins included
    pub decls: Arena<Declaration>,
    /// Block storage
    pub blocks: Arena<Block>,
    /// Statement storage
    pub stmts: Arena<Stmt>,
    /// Expression storage
    pub exprs: Arena<Expr>,
    scope: OnceCell<ScopeId>,
    registers: ArenaMap<DeclId, DeclId>,
}

impl Program {
    /// Create an empty program with every builtin declared
    pub fn new(interner: &Interner) -> Self {
        let mut decls = Arena::default();
        let builtins = Builtin::ALL
            .iter()
            .map(|&builtin| {
                decls.alloc(Declaration::Builtin(BuiltinDecl {
                    name: interner.intern(builtin.name()),
                    ty: builtin.return_type(),
                    builtin,
                }))
            })
            .collect();

        Self {
            declarations: Vec::new(),
            builtins,
            decls,
            blocks: Arena::default(),
            stmts: Arena::default(),
            exprs: Arena::default(),
            scope: OnceCell::new(),
            registers: ArenaMap::default(),
        }
    }

    /// Allocate a declaration node
    pub fn alloc_decl(&mut self, decl: Declaration) -> DeclId {
        self.decls.alloc(decl)
    }

    /// Allocate a block node
    pub fn alloc_block(&mut self, block: Block) -> BlockId {
        self.blocks.alloc(block)
    }

    /// Allocate a statement node
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    /// Allocate an expression node
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    /// Scope table of the program's top level, once resolved
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get().copied()
    }

    /// Record the top-level scope; returns `false` if one was already set
    #[must_use]
    pub fn set_scope(&self, scope: ScopeId) -> bool {
        self.scope.set(scope).is_ok()
    }

    /// Record the register chosen for `decl` by register allocation
    ///
    /// Returns `false` and leaves the table unchanged when `register` is not
    /// a register declaration.
    pub fn assign_register(&mut self, decl: DeclId, register: DeclId) -> bool {
        if !matches!(self.decls[register], Declaration::Register(_)) {
            return false;
        }
        self.registers.insert(decl, register);
        true
    }

    /// The register allocated for `decl`, if any
    pub fn register_of(&self, decl: DeclId) -> Option<DeclId> {
        self.registers.get(decl).copied()
    }

    /// The builtin declaration for `builtin`
    pub fn builtin_decl(&self, builtin: Builtin) -> DeclId {
        self.builtins[builtin as usize]
    }
}
