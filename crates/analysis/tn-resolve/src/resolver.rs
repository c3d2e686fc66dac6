//! Name resolution pass

use crate::error::{ResolutionError, suggestion_help};
use crate::scope::{AddOutcome, ScopeKind, ScopeTree};
use tn_ast::{
    Binding, BlockId, DeclId, Declaration, Expr, ExprId, NameRef, Program, ScopeId, Stmt, StmtId,
};
use tn_diagnostics::Diagnostics;
use tn_intern::Interner;

/// Name resolver for a whole program
pub struct NameResolver<'a> {
    /// Scope tree being built
    scopes: ScopeTree,
    /// Innermost scope at the current position
    current_scope: ScopeId,
    /// Program being resolved
    program: &'a Program,
    /// String interner for diagnostics
    interner: &'a Interner,
    /// Collected errors and warnings
    diagnostics: &'a mut Diagnostics,
}

impl<'a> NameResolver<'a> {
    /// Resolve every name in `program`
    ///
    /// Declarations are processed in textual order. Each one is added to its
    /// enclosing scope before anything inside it is resolved, so a body sees
    /// itself and everything declared before it, but nothing declared after
    /// it. Problems are reported to `diagnostics`; the whole tree is always
    /// walked.
    ///
    /// Scope ids are recorded on the program, function and block nodes and
    /// index into the returned tree. Resolution runs once per program: the
    /// binding slots it fills cannot be rewritten.
    pub fn resolve(
        program: &'a Program,
        interner: &'a Interner,
        diagnostics: &'a mut Diagnostics,
    ) -> ScopeTree {
        let _span = tracing::debug_span!("resolve").entered();

        let mut scopes = ScopeTree::new(interner);
        let builtin_scope = scopes.create_root(ScopeKind::Builtins);
        for &builtin in &program.builtins {
            scopes.seed(builtin_scope, program.decls[builtin].name(), builtin);
        }
        let program_scope = scopes.create_child(builtin_scope, ScopeKind::Program);
        keep_first_scope("program", program.set_scope(program_scope));

        let mut resolver = Self {
            scopes,
            current_scope: program_scope,
            program,
            interner,
            diagnostics,
        };

        for &decl in &program.declarations {
            resolver.declare(decl);
        }

        tracing::debug!(
            scopes = resolver.scopes.len(),
            errors = resolver.diagnostics.error_count(),
            warnings = resolver.diagnostics.warning_count(),
            "name resolution finished"
        );
        resolver.scopes
    }

    /// Add a declaration to the current scope, then resolve inside it
    fn declare(&mut self, decl_id: DeclId) {
        let program = self.program;
        let decl = &program.decls[decl_id];
        let outcome = self.scopes.add(
            self.current_scope,
            decl.name(),
            decl_id,
            decl.span(),
            self.diagnostics,
        );
        if let AddOutcome::Conflict { existing } = outcome {
            tracing::trace!(?decl_id, ?existing, "declaration discarded");
        }

        match decl {
            Declaration::Variable(variable) => {
                if let Some(initializer) = variable.initializer {
                    self.resolve_expr(initializer);
                }
            }
            Declaration::Function(function) => {
                let function_scope = self
                    .scopes
                    .create_child(self.current_scope, ScopeKind::Function);
                keep_first_scope("function", function.set_scope(function_scope));

                let previous_scope = self.current_scope;
                self.current_scope = function_scope;

                for &param in &function.params {
                    self.declare(param);
                }
                self.resolve_block(function.body);

                self.current_scope = previous_scope;
            }
            Declaration::Parameter(_) | Declaration::Register(_) | Declaration::Builtin(_) => {}
        }
    }

    /// Resolve a block in a fresh child scope
    fn resolve_block(&mut self, block_id: BlockId) {
        let program = self.program;
        let block = &program.blocks[block_id];
        let block_scope = self
            .scopes
            .create_child(self.current_scope, ScopeKind::Block);
        keep_first_scope("block", block.set_scope(block_scope));

        let previous_scope = self.current_scope;
        self.current_scope = block_scope;

        for &stmt_id in &block.stmts {
            self.resolve_stmt(stmt_id);
        }

        self.current_scope = previous_scope;
    }

    /// Resolve a statement
    fn resolve_stmt(&mut self, stmt_id: StmtId) {
        let program = self.program;
        match &program.stmts[stmt_id] {
            Stmt::Decl(decl) => self.declare(*decl),
            Stmt::Expr(expr) => self.resolve_expr(*expr),
            Stmt::Assign { target, value } => {
                self.resolve_expr(*target);
                self.resolve_expr(*value);
            }
            Stmt::If {
                condition,
                then_block,
                else_block,
            } => {
                self.resolve_expr(*condition);
                self.resolve_block(*then_block);
                if let Some(else_block) = else_block {
                    self.resolve_block(*else_block);
                }
            }
            Stmt::While { condition, body } => {
                self.resolve_expr(*condition);
                self.resolve_block(*body);
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expr(*value);
                }
            }
            Stmt::Block(block) => self.resolve_block(*block),
        }
    }

    /// Resolve a single expression
    fn resolve_expr(&mut self, expr_id: ExprId) {
        let program = self.program;
        match &program.exprs[expr_id] {
            Expr::Numeral { .. } => {}
            Expr::Name(name) => self.resolve_name(name),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(*left);
                self.resolve_expr(*right);
            }
            Expr::Call { callee, args, .. } => {
                self.resolve_callee(callee);
                for &arg in args {
                    self.resolve_expr(arg);
                }
            }
        }
    }

    fn resolve_name(&mut self, name: &NameRef) {
        match self.scopes.lookup(self.current_scope, name.name) {
            Some(decl) => self.bind(name, Binding::Resolved(decl)),
            None => {
                let error = ResolutionError::Unresolved {
                    name: self.interner.resolve(&name.name).to_string(),
                    use_site: name.span,
                    help: suggestion_help(&self.scopes.suggestions(self.current_scope, name.name)),
                };
                tracing::debug!(%error, "unresolved name");
                self.diagnostics.report(&error, error.span());
                self.bind(name, Binding::Unresolved);
            }
        }
    }

    /// Resolve a call target; only functions and builtins can be called
    fn resolve_callee(&mut self, callee: &NameRef) {
        let found = self.scopes.lookup(self.current_scope, callee.name);
        let reason = match found {
            Some(decl) if self.program.decls[decl].is_callable() => {
                self.bind(callee, Binding::Resolved(decl));
                return;
            }
            Some(decl) => format!(
                "it is a {}, not a function",
                self.program.decls[decl].kind_name()
            ),
            None => "no function with this name is declared before this point".to_string(),
        };

        let help = if found.is_none() {
            suggestion_help(&self.scopes.suggestions(self.current_scope, callee.name))
        } else {
            None
        };
        let error = ResolutionError::UnresolvedCall {
            name: self.interner.resolve(&callee.name).to_string(),
            reason,
            use_site: callee.span,
            help,
        };
        tracing::debug!(%error, "unresolved call");
        self.diagnostics.report(&error, error.span());
        self.bind(callee, Binding::Unresolved);
    }

    fn bind(&self, name: &NameRef, binding: Binding) {
        if !name.bind(binding) {
            tracing::warn!(
                name = self.interner.resolve(&name.name),
                "name reference visited twice; keeping its first binding"
            );
        }
    }
}

/// Log when a scope slot was already filled by an earlier resolution
fn keep_first_scope(node: &'static str, recorded: bool) {
    if !recorded {
        tracing::warn!(node, "node was already resolved; keeping its original scope");
    }
}
