//! Error types for rendering

use tn_ast::Builtin;

/// Errors that abort rendering
///
/// Each of these points at a defect earlier in the pipeline (linearization,
/// register allocation, or a target machine that does not cover a builtin),
/// not at a problem in user code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum RenderError {
    /// Operand is neither a numeral nor a name
    #[error("operand must be a numeral or a name, found {found} `{expression}`")]
    #[diagnostic(
        code(render::operand_contract),
        help("linearization must reduce operands to numerals and names")
    )]
    OperandContract {
        /// Shape of the offending expression
        found: &'static str,
        /// The offending expression, pretty-printed
        expression: String,
    },

    /// Name reference without a declaration
    #[error("`{name}` is not bound to a declaration")]
    #[diagnostic(
        code(render::unbound_name),
        help("programs with resolution errors must not be rendered")
    )]
    UnboundName {
        /// The unbound name
        name: String,
    },

    /// Declaration without an allocated register
    #[error("{kind} `{name}` has no register assigned")]
    #[diagnostic(code(render::missing_register))]
    MissingRegister {
        /// Declaration kind
        kind: &'static str,
        /// Declaration name
        name: String,
    },

    /// Builtin called with the wrong number of operands
    #[error("builtin `{builtin}` takes {expected} operand(s), found {found}")]
    #[diagnostic(code(render::builtin_arity))]
    BuiltinArity {
        /// The builtin being rendered
        builtin: Builtin,
        /// Operands it takes
        expected: usize,
        /// Operands supplied
        found: usize,
    },

    /// Target machine has no instruction for a builtin
    #[error("target `{machine}` cannot render builtin `{builtin}`")]
    #[diagnostic(code(render::unsupported_builtin))]
    UnsupportedBuiltin {
        /// Target machine name
        machine: String,
        /// The builtin being rendered
        builtin: Builtin,
    },
}
