//! Compilation driver for Tern
//!
//! Runs name resolution over a parsed program, decides from the collected
//! diagnostics whether the program may be rendered, and if so renders its
//! linear IR through a target machine.

pub mod config;

pub use config::{CompileConfig, DiagnosticPolicy};

use anyhow::{Context, Result};
use tn_ast::Program;
use tn_diagnostics::{Diagnostic, Diagnostics};
use tn_intern::Interner;
use tn_lir::Lir;
use tn_render::TargetMachine;
use tn_resolve::{NameResolver, ScopeTree};

/// Result of one compilation run
#[derive(Debug)]
pub struct CompileOutput {
    /// Everything reported during the run
    pub diagnostics: Diagnostics,
    /// Scope tables built by resolution
    pub scopes: ScopeTree,
    /// Assembly lines, absent when diagnostics stopped the run
    pub assembly: Option<Vec<String>>,
}

impl CompileOutput {
    /// Whether assembly was produced
    pub fn succeeded(&self) -> bool {
        self.assembly.is_some()
    }

    /// The assembly joined into one newline-terminated text
    pub fn assembly_text(&self) -> Option<String> {
        self.assembly.as_ref().map(|lines| {
            let mut text = lines.join("\n");
            text.push('\n');
            text
        })
    }
}

/// Resolve `program` and render `lir` for `machine`
///
/// Rendering is skipped, leaving `assembly` empty, when resolution reported an
/// error, or any warning under `warnings_as_errors`. The returned `Err` is
/// reserved for render failures, which mean the IR handed in was malformed.
pub fn compile<M: TargetMachine + ?Sized>(
    program: &Program,
    lir: &Lir,
    machine: &M,
    interner: &Interner,
    config: &CompileConfig,
) -> Result<CompileOutput> {
    let _span = tracing::info_span!("compile", lines = lir.len()).entered();

    let mut diagnostics = Diagnostics::new();
    let scopes = NameResolver::resolve(program, interner, &mut diagnostics);
    if config.diagnostics.check_labels {
        check_labels(lir, interner, &mut diagnostics);
    }

    if !may_render(&diagnostics, config.diagnostics) {
        tracing::info!(
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "compilation stopped before rendering"
        );
        return Ok(CompileOutput {
            diagnostics,
            scopes,
            assembly: None,
        });
    }

    let assembly = tn_render::render(program, interner, machine, &lir.lines, config.render)
        .context("Failed to render assembly")?;
    tracing::debug!(lines = assembly.len(), "compilation finished");

    Ok(CompileOutput {
        diagnostics,
        scopes,
        assembly: Some(assembly),
    })
}

fn may_render(diagnostics: &Diagnostics, policy: DiagnosticPolicy) -> bool {
    if diagnostics.has_errors() {
        return false;
    }
    !(policy.warnings_as_errors && diagnostics.warning_count() > 0)
}

/// Report every branch or jump target with no matching label
fn check_labels(lir: &Lir, interner: &Interner, diagnostics: &mut Diagnostics) {
    for target in lir.undefined_targets() {
        let name = interner.resolve(&target);
        tracing::debug!(label = name, "undefined jump target");
        diagnostics.push(
            Diagnostic::error(format!("jump target `{name}` has no label"))
                .with_code("lir::undefined_label"),
        );
    }
}
