//! End-to-end compilation: resolve, gate on diagnostics, render
//!
//! Listings are snapshot-tested with `expect-test`; run with
//! `UPDATE_EXPECT=1` to refresh them after an intentional output change.

use expect_test::{Expect, expect};
use integration_tests::{Compiled, countdown, two_functions};
use tn_ast::Builtin;
use tn_driver::{CompileConfig, CompileOutput, compile};
use tn_intern::Interner;
use tn_render::{RenderError, TargetMachine, TinyMachine, check_arity};

fn compile_fixture(
    fixture: &Compiled,
    interner: &Interner,
    config: &CompileConfig,
) -> CompileOutput {
    compile(&fixture.program, &fixture.lir, &TinyMachine, interner, config).unwrap()
}

fn check_listing(output: &CompileOutput, expected: Expect) {
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    expected.assert_eq(&output.assembly_text().unwrap());
}

#[test]
fn test_countdown_listing() {
    let interner = Interner::new();
    let fixture = countdown(&interner);

    let output = compile_fixture(&fixture, &interner, &CompileConfig::default());

    check_listing(
        &output,
        expect![[r#"
            main::
                mov 10, r1
            top:
                slt r1, 1, r2
                br r2, done
                out r1
                sub r1, 1, r1
                jmp top
            done:
                halt
        "#]],
    );
}

#[test]
fn test_entries_are_separated_and_copies_coalesced() {
    let interner = Interner::new();
    let fixture = two_functions(&interner);

    let output = compile_fixture(&fixture, &interner, &CompileConfig::default());

    check_listing(
        &output,
        expect![[r#"
            twice:
                add r1, r1, rv

            main::
                <unsupported: result := twice(21)>
                st r2, 4096
        "#]],
    );
}

#[test]
fn test_configured_layout() {
    let interner = Interner::new();
    let fixture = countdown(&interner);
    let config = CompileConfig::parse("[render]\nindent_width = 2\n").unwrap();

    let output = compile_fixture(&fixture, &interner, &config);

    let assembly = output.assembly.unwrap();
    assert_eq!(assembly[0], "main::");
    assert_eq!(assembly[1], "  mov 10, r1");
}

/// A target whose store takes the address first
struct AddressFirst;

impl TargetMachine for AddressFirst {
    fn render_builtin(&self, builtin: Builtin, operands: &[String]) -> Result<String, RenderError> {
        check_arity(builtin, operands)?;
        match builtin {
            Builtin::Store => Ok(format!("store [{}] <- {}", operands[1], operands[0])),
            Builtin::Print | Builtin::Halt => Err(RenderError::UnsupportedBuiltin {
                machine: "address-first".to_string(),
                builtin,
            }),
        }
    }
}

#[test]
fn test_custom_target_machine() {
    let interner = Interner::new();
    let fixture = two_functions(&interner);

    let output = compile(
        &fixture.program,
        &fixture.lir,
        &AddressFirst,
        &interner,
        &CompileConfig::default(),
    )
    .unwrap();

    let assembly = output.assembly.unwrap();
    assert_eq!(assembly.last().map(String::as_str), Some("    store [4096] <- r2"));
}

#[test]
fn test_unsupported_builtin_fails_compilation() {
    let interner = Interner::new();
    let fixture = countdown(&interner);

    let error = compile(
        &fixture.program,
        &fixture.lir,
        &AddressFirst,
        &interner,
        &CompileConfig::default(),
    )
    .unwrap_err();

    assert_eq!(
        error.root_cause().to_string(),
        "target `address-first` cannot render builtin `print`"
    );
}

#[test]
fn test_diagnostics_convert_to_codespan() {
    let interner = Interner::new();
    let mut fixture = countdown(&interner);
    // `counter` declared a second time at the top level
    let counter = fixture.program.declarations[0];
    fixture.program.declarations.push(counter);

    let output = compile_fixture(&fixture, &interner, &CompileConfig::default());

    assert!(!output.succeeded());
    let diagnostics = output.diagnostics.to_codespan_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("resolve::conflict"));
    assert!(!diagnostics[0].labels.is_empty());
}
