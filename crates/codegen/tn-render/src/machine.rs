//! Target machine interface

use crate::error::RenderError;
use tn_ast::Builtin;

/// Target-specific formatting of builtin operations
///
/// This is the only target-dependent part of rendering: everything else
/// (labels, branches, moves, arithmetic) uses one three-address syntax.
pub trait TargetMachine {
    /// Format a call to `builtin` whose operands are already rendered
    fn render_builtin(&self, builtin: Builtin, operands: &[String]) -> Result<String, RenderError>;
}

impl<T: TargetMachine + ?Sized> TargetMachine for &T {
    fn render_builtin(&self, builtin: Builtin, operands: &[String]) -> Result<String, RenderError> {
        (**self).render_builtin(builtin, operands)
    }
}

/// Check the operand count of a builtin call
pub fn check_arity(builtin: Builtin, operands: &[String]) -> Result<(), RenderError> {
    if operands.len() == builtin.arity() {
        Ok(())
    } else {
        Err(RenderError::BuiltinArity {
            builtin,
            expected: builtin.arity(),
            found: operands.len(),
        })
    }
}

/// Minimal reference machine
///
/// | builtin | instruction |
/// |---|---|
/// | `print(a)` | `out a` |
/// | `store(v, addr)` | `st v, addr` |
/// | `halt()` | `halt` |
#[derive(Debug, Clone, Copy, Default)]
pub struct TinyMachine;

impl TargetMachine for TinyMachine {
    fn render_builtin(&self, builtin: Builtin, operands: &[String]) -> Result<String, RenderError> {
        check_arity(builtin, operands)?;
        Ok(match builtin {
            Builtin::Print => format!("out {}", operands[0]),
            Builtin::Store => format!("st {}, {}", operands[0], operands[1]),
            Builtin::Halt => "halt".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_tiny_machine_instructions() {
        let machine = TinyMachine;
        assert_eq!(
            machine.render_builtin(Builtin::Print, &operands(&["r1"])),
            Ok("out r1".to_string())
        );
        assert_eq!(
            machine.render_builtin(Builtin::Store, &operands(&["5", "r2"])),
            Ok("st 5, r2".to_string())
        );
        assert_eq!(
            machine.render_builtin(Builtin::Halt, &[]),
            Ok("halt".to_string())
        );
    }

    #[test]
    fn test_arity_mismatch() {
        let error = TinyMachine
            .render_builtin(Builtin::Store, &operands(&["r1"]))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "builtin `store` takes 2 operand(s), found 1"
        );
    }
}
