//! Scope tree for name resolution

use crate::error::{ResolutionError, ShadowWarning, compute_suggestions};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use std::iter;
use tn_ast::{DeclId, ScopeId};
use tn_diagnostics::Diagnostics;
use tn_intern::{Interner, Symbol};
use tn_span::FileSpan;

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Root table holding the builtin declarations
    Builtins,
    /// Program top level
    Program,
    /// Function parameters
    Function,
    /// Block locals
    Block,
}

/// A name bound in a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeEntry {
    /// What the name refers to
    pub decl: DeclId,
    /// Where it was declared
    pub span: Option<FileSpan>,
}

/// A single scope table
#[derive(Debug, Clone)]
pub struct Scope {
    /// Enclosing scope; lookups continue there
    pub parent: Option<ScopeId>,
    /// Kind of scope
    pub kind: ScopeKind,
    /// Names bound directly in this scope, in declaration order
    pub symbols: IndexMap<Symbol, ScopeEntry, FxBuildHasher>,
}

impl Scope {
    fn new(parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            parent,
            kind,
            symbols: IndexMap::default(),
        }
    }
}

/// Result of adding a name to a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The name is new along the whole scope chain
    Inserted,
    /// The name was inserted and hides `outer` from an enclosing scope
    Shadowed {
        /// The hidden declaration
        outer: DeclId,
    },
    /// The name was already bound in this scope; `existing` stays in effect
    Conflict {
        /// The binding that stays in effect
        existing: DeclId,
    },
}

impl AddOutcome {
    /// Whether the new binding took effect
    pub fn is_inserted(self) -> bool {
        !matches!(self, Self::Conflict { .. })
    }
}

/// All scope tables of one program, linked by parent index
///
/// Parents are always created before their children, so every parent link
/// points at an earlier entry and the chain cannot form a cycle.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    interner: Interner,
}

impl ScopeTree {
    /// Create an empty scope tree
    pub fn new(interner: &Interner) -> Self {
        Self {
            scopes: Vec::new(),
            interner: interner.clone(),
        }
    }

    /// Create a scope with no parent
    pub fn create_root(&mut self, kind: ScopeKind) -> ScopeId {
        self.push(Scope::new(None, kind))
    }

    /// Create a child scope
    pub fn create_child(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        self.push(Scope::new(Some(parent), kind))
    }

    fn push(&mut self, scope: Scope) -> ScopeId {
        let scope_id = ScopeId(self.scopes.len() as u32);
        tracing::trace!(?scope_id, kind = ?scope.kind, parent = ?scope.parent, "created scope");
        self.scopes.push(scope);
        scope_id
    }

    /// Bind a name without any conflict or shadow checks
    ///
    /// Used to seed the builtin table. Returns `false` if the name was already
    /// bound in `scope`, in which case the existing binding is kept.
    pub fn seed(&mut self, scope: ScopeId, name: Symbol, decl: DeclId) -> bool {
        let symbols = &mut self.scopes[scope.0 as usize].symbols;
        if symbols.contains_key(&name) {
            return false;
        }
        symbols.insert(name, ScopeEntry { decl, span: None });
        true
    }

    /// Bind `name` to `decl` in `scope`
    ///
    /// A name already bound in `scope` itself is a conflict: an error is
    /// reported and the first binding is kept. A name bound in an enclosing
    /// scope is shadowed: a warning is reported and the new binding takes
    /// effect in `scope` and below. Builtins may be redeclared silently.
    pub fn add(
        &mut self,
        scope: ScopeId,
        name: Symbol,
        decl: DeclId,
        span: Option<FileSpan>,
        diagnostics: &mut Diagnostics,
    ) -> AddOutcome {
        let scope_data = &self.scopes[scope.0 as usize];

        if let Some(existing) = scope_data.symbols.get(&name) {
            let existing = *existing;
            let error = ResolutionError::Conflict {
                name: self.interner.resolve(&name).to_string(),
                first: existing.span,
                second: span,
            };
            tracing::debug!(%error, "rejected redeclaration");
            diagnostics.report(&error, error.span());
            return AddOutcome::Conflict {
                existing: existing.decl,
            };
        }

        let shadowed = scope_data
            .parent
            .and_then(|parent| self.lookup_user_entry(parent, name));

        self.scopes[scope.0 as usize]
            .symbols
            .insert(name, ScopeEntry { decl, span });

        match shadowed {
            Some(outer) => {
                let warning = ShadowWarning {
                    name: self.interner.resolve(&name).to_string(),
                    outer: outer.span,
                    inner: span,
                };
                tracing::debug!(%warning, "shadowing outer declaration");
                diagnostics.report(&warning, span);
                AddOutcome::Shadowed { outer: outer.decl }
            }
            None => AddOutcome::Inserted,
        }
    }

    /// Find `name` starting at `scope` and walking up the scope chain
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<DeclId> {
        self.lookup_entry(scope, name).map(|(_, entry)| entry.decl)
    }

    /// Like [`ScopeTree::lookup`], also returning the scope the name was found in
    pub fn lookup_entry(&self, scope: ScopeId, name: Symbol) -> Option<(ScopeId, ScopeEntry)> {
        self.ancestors(scope).find_map(|scope_id| {
            self.scopes[scope_id.0 as usize]
                .symbols
                .get(&name)
                .map(|entry| (scope_id, *entry))
        })
    }

    /// Lookup that ignores the builtin table
    fn lookup_user_entry(&self, scope: ScopeId, name: Symbol) -> Option<ScopeEntry> {
        self.ancestors(scope)
            .map(|scope_id| &self.scopes[scope_id.0 as usize])
            .filter(|scope_data| scope_data.kind != ScopeKind::Builtins)
            .find_map(|scope_data| scope_data.symbols.get(&name).copied())
    }

    /// `scope` followed by each enclosing scope up to the root
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), move |scope_id| {
            self.scopes[scope_id.0 as usize].parent
        })
    }

    /// Names bound directly in `scope`
    pub fn local_names(&self, scope: ScopeId) -> FxHashSet<Symbol> {
        self.scopes[scope.0 as usize].symbols.keys().copied().collect()
    }

    /// Names bound in `scope` or any enclosing scope, each counted once
    pub fn all_visible_names(&self, scope: ScopeId) -> FxHashSet<Symbol> {
        self.ancestors(scope)
            .flat_map(|scope_id| self.scopes[scope_id.0 as usize].symbols.keys().copied())
            .collect()
    }

    /// Visible names similar to `name`, closest first
    pub fn suggestions(&self, scope: ScopeId, name: Symbol) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let candidates: Vec<&str> = self
            .ancestors(scope)
            .flat_map(|scope_id| self.scopes[scope_id.0 as usize].symbols.keys())
            .filter(|symbol| seen.insert(**symbol))
            .map(|symbol| self.interner.resolve(symbol))
            .collect();

        compute_suggestions(self.interner.resolve(&name), candidates)
    }

    /// Enclosing scope of `scope`; `None` for the root
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope.0 as usize].parent
    }

    /// Get a scope by ID
    #[must_use]
    pub fn get_scope(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.0 as usize]
    }

    /// Number of scopes in the tree
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no scope has been created yet
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
