//! Programmatic construction of program trees
//!
//! Used by tests and by front ends that already hold a parsed tree in some
//! other shape. Every node gets a synthetic span in file 0; spans are laid
//! out left to right in allocation order so diagnostics stay distinguishable.

use crate::{
    BinaryOp, Block, BlockId, DeclId, Declaration, Expr, ExprId, FunctionDecl, NameRef,
    ParameterDecl, Program, RegisterDecl, Stmt, StmtId, Type, VariableDecl,
};
use tn_intern::Interner;
use tn_span::{FileId, FileSpan, Span};

/// Builder for [`Program`]
pub struct ProgramBuilder {
    program: Program,
    interner: Interner,
    file: FileId,
    cursor: u32,
}

impl ProgramBuilder {
    /// Start an empty program with builtins declared
    pub fn new(interner: &Interner) -> Self {
        Self {
            program: Program::new(interner),
            interner: interner.clone(),
            file: FileId::new(0),
            cursor: 0,
        }
    }

    fn next_span(&mut self, len: usize) -> FileSpan {
        let start = self.cursor;
        let end = start + len.max(1) as u32;
        self.cursor = end + 1;
        FileSpan::new(self.file, Span::new(start, end))
    }

    /// Append a declaration to the program's top level
    pub fn top_level(&mut self, decl: DeclId) -> &mut Self {
        self.program.declarations.push(decl);
        self
    }

    /// A variable without an initializer
    pub fn variable(&mut self, ty: Type, name: &str) -> DeclId {
        self.variable_decl(ty, name, None)
    }

    /// A variable initialized from `initializer`
    pub fn variable_with_init(&mut self, ty: Type, name: &str, initializer: ExprId) -> DeclId {
        self.variable_decl(ty, name, Some(initializer))
    }

    fn variable_decl(&mut self, ty: Type, name: &str, initializer: Option<ExprId>) -> DeclId {
        let span = self.next_span(name.len());
        self.program.alloc_decl(Declaration::Variable(VariableDecl {
            name: self.interner.intern(name),
            ty,
            initializer,
            span,
        }))
    }

    /// A function parameter
    pub fn parameter(&mut self, ty: Type, name: &str) -> DeclId {
        let span = self.next_span(name.len());
        self.program.alloc_decl(Declaration::Parameter(ParameterDecl {
            name: self.interner.intern(name),
            ty,
            span,
        }))
    }

    /// A function over `params` with body `body`
    pub fn function(&mut self, ty: Type, name: &str, params: Vec<DeclId>, body: BlockId) -> DeclId {
        let span = self.next_span(name.len());
        let name = self.interner.intern(name);
        self.program
            .alloc_decl(Declaration::Function(FunctionDecl::new(name, ty, params, body, span)))
    }

    /// A physical register; registers never appear in scope tables
    pub fn register(&mut self, name: &str) -> DeclId {
        self.program.alloc_decl(Declaration::Register(RegisterDecl {
            name: self.interner.intern(name),
        }))
    }

    /// Back `decl` with the physical register `register`
    pub fn assign_register(&mut self, decl: DeclId, register: DeclId) -> &mut Self {
        self.program.assign_register(decl, register);
        self
    }

    /// An integer literal
    pub fn numeral(&mut self, value: i64) -> ExprId {
        let span = self.next_span(value.to_string().len());
        self.program.alloc_expr(Expr::Numeral { value, span })
    }

    /// An unresolved name reference
    pub fn name(&mut self, name: &str) -> ExprId {
        let span = self.next_span(name.len());
        let name = self.interner.intern(name);
        self.program.alloc_expr(Expr::Name(NameRef::new(name, span)))
    }

    /// A name reference already bound to `decl`
    pub fn bound_name(&mut self, decl: DeclId) -> ExprId {
        let name = self.program.decls[decl].name();
        let span = self.next_span(self.interner.resolve(&name).len());
        self.program.alloc_expr(Expr::Name(NameRef::bound(name, span, decl)))
    }

    /// A binary operation spanning both operands
    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.program.exprs[left]
            .span()
            .span
            .cover(self.program.exprs[right].span().span);
        let span = FileSpan::new(self.file, span);
        self.program.alloc_expr(Expr::Binary {
            op,
            left,
            right,
            span,
        })
    }

    /// A call with an unresolved callee
    pub fn call(&mut self, callee: &str, args: Vec<ExprId>) -> ExprId {
        let callee_span = self.next_span(callee.len());
        let callee = NameRef::new(self.interner.intern(callee), callee_span);
        let span = args.iter().fold(callee_span.span, |span, &arg| {
            span.cover(self.program.exprs[arg].span().span)
        });
        self.program.alloc_expr(Expr::Call {
            callee,
            args,
            span: FileSpan::new(self.file, span),
        })
    }

    /// A call whose callee is already bound to `decl`
    pub fn bound_call(&mut self, decl: DeclId, args: Vec<ExprId>) -> ExprId {
        let name = self.program.decls[decl].name();
        let callee_span = self.next_span(self.interner.resolve(&name).len());
        self.program.alloc_expr(Expr::Call {
            callee: NameRef::bound(name, callee_span, decl),
            args,
            span: callee_span,
        })
    }

    /// A local declaration statement
    pub fn decl_stmt(&mut self, decl: DeclId) -> StmtId {
        self.program.alloc_stmt(Stmt::Decl(decl))
    }

    /// An expression statement
    pub fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.program.alloc_stmt(Stmt::Expr(expr))
    }

    /// `target = value`
    pub fn assign(&mut self, target: ExprId, value: ExprId) -> StmtId {
        self.program.alloc_stmt(Stmt::Assign { target, value })
    }

    /// An `if` with an optional `else` block
    pub fn if_stmt(
        &mut self,
        condition: ExprId,
        then_block: BlockId,
        else_block: Option<BlockId>,
    ) -> StmtId {
        self.program.alloc_stmt(Stmt::If {
            condition,
            then_block,
            else_block,
        })
    }

    /// A `while` loop
    pub fn while_stmt(&mut self, condition: ExprId, body: BlockId) -> StmtId {
        self.program.alloc_stmt(Stmt::While { condition, body })
    }

    /// A `return`, with or without a value
    pub fn return_stmt(&mut self, value: Option<ExprId>) -> StmtId {
        self.program.alloc_stmt(Stmt::Return(value))
    }

    /// A nested block statement
    pub fn block_stmt(&mut self, block: BlockId) -> StmtId {
        self.program.alloc_stmt(Stmt::Block(block))
    }

    /// A block over `stmts`
    pub fn block(&mut self, stmts: Vec<StmtId>) -> BlockId {
        let span = self.next_span(2);
        self.program.alloc_block(Block::new(stmts, span))
    }

    /// Read access to the program under construction
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Take the finished program
    pub fn finish(self) -> Program {
        self.program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_increase() {
        let interner = Interner::new();
        let mut builder = ProgramBuilder::new(&interner);
        let x = builder.variable(Type::Int, "x");
        let y = builder.variable(Type::Int, "yy");
        let program = builder.finish();

        let x_span = program.decls[x].span().unwrap();
        let y_span = program.decls[y].span().unwrap();
        assert!(x_span.span.end < y_span.span.start);
        assert_eq!(y_span.span.len(), 2);
    }

    #[test]
    fn test_register_assignment_requires_register() {
        let interner = Interner::new();
        let mut builder = ProgramBuilder::new(&interner);
        let x = builder.variable(Type::Int, "x");
        let y = builder.variable(Type::Int, "y");
        let r1 = builder.register("r1");
        let mut program = builder.finish();

        assert!(program.assign_register(x, r1));
        assert!(!program.assign_register(y, x));
        assert_eq!(program.register_of(x), Some(r1));
        assert_eq!(program.register_of(y), None);
    }

    #[test]
    fn test_program_seeds_builtins() {
        let interner = Interner::new();
        let program = Program::new(&interner);

        assert_eq!(program.builtins.len(), crate::Builtin::ALL.len());
        let print = program.builtin_decl(crate::Builtin::Print);
        assert_eq!(interner.resolve(&program.decls[print].name()), "print");
        assert!(program.declarations.is_empty());
    }
}
