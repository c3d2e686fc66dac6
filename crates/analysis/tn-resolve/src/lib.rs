//! Name resolution for Tern
//!
//! This crate builds the scope tables of a program and binds every name
//! reference to the declaration it denotes. It runs after parsing and before
//! linearization; rendering later reads the bindings it leaves in the tree.
//!
//! # Architecture
//!
//! - **Scope tree**: one table per scope-owning node (program, function,
//!   block) plus a root table of builtins, linked by parent index
//! - **Name resolver**: walks declarations in textual order, adds each name
//!   before resolving inside it, and binds references
//! - **Resolution diagnostics**: conflicts, shadowing, unresolved names and
//!   unresolved calls, all reported to a [`tn_diagnostics::Diagnostics`] sink
//!
//! # Usage
//!
//! ```rust,ignore
//! use tn_resolve::NameResolver;
//!
//! let mut diagnostics = Diagnostics::new();
//! let scopes = NameResolver::resolve(&program, &interner, &mut diagnostics);
//! if diagnostics.has_errors() {
//!     // Report and stop before rendering
//! }
//! ```

pub mod error;
pub mod resolver;
pub mod scope;

pub use error::{ResolutionError, ShadowWarning};
pub use resolver::NameResolver;
pub use scope::{AddOutcome, Scope, ScopeEntry, ScopeKind, ScopeTree};
