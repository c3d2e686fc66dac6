//! Assembly rendering for Tern
//!
//! Turns a linear IR line sequence into assembly text lines. Labels, branches,
//! jumps, moves and arithmetic share one three-address syntax; builtin calls
//! are delegated to a [`TargetMachine`], which is the only target-specific
//! piece.
//!
//! Operands must already be numerals or names, and every name must be bound
//! and backed by a register. Violations are hard [`RenderError`]s. Constructs
//! that are well formed but have no rendering (user-function calls, for
//! instance) become `<unsupported: ...>` placeholder lines.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tn_render::{render, RenderOptions, TinyMachine};
//!
//! let lines = render(&program, &interner, &TinyMachine, &lir.lines, RenderOptions::default())?;
//! ```

pub mod error;
pub mod machine;
pub mod renderer;

pub use error::RenderError;
pub use machine::{TargetMachine, TinyMachine, check_arity};
pub use renderer::{RenderOptions, Renderer, opcode, render};
