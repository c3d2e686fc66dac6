//! Indexed arena storage for program tree nodes
//!
//! Re-exports `la-arena`: nodes are allocated once and referred to by
//! stable, copyable `Idx` handles, which lets child scopes and name
//! references point back into the tree without owning it.

pub use la_arena::{Arena, ArenaMap, Idx};
