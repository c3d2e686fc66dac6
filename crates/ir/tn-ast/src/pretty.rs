//! Source-like printing of expressions and assignments

use crate::{Expr, ExprId, Program};
use std::fmt::{self, Write};
use tn_intern::Interner;

/// Displays an expression in source syntax
///
/// Nested binary operations are parenthesized; names print as written,
/// whether or not they are resolved.
pub struct ExprDisplay<'a> {
    program: &'a Program,
    interner: &'a Interner,
    expr: ExprId,
}

impl<'a> ExprDisplay<'a> {
    /// Display `expr` from `program`
    pub fn new(program: &'a Program, interner: &'a Interner, expr: ExprId) -> Self {
        Self {
            program,
            interner,
            expr,
        }
    }
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self.program, self.interner, self.expr, false, f)
    }
}

/// Displays `target := value`
pub struct InstructionDisplay<'a> {
    program: &'a Program,
    interner: &'a Interner,
    target: ExprId,
    value: ExprId,
}

impl<'a> InstructionDisplay<'a> {
    /// Display an assignment of `value` to `target`
    pub fn assign(
        program: &'a Program,
        interner: &'a Interner,
        target: ExprId,
        value: ExprId,
    ) -> Self {
        Self {
            program,
            interner,
            target,
            value,
        }
    }
}

impl fmt::Display for InstructionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self.program, self.interner, self.target, false, f)?;
        f.write_str(" := ")?;
        write_expr(self.program, self.interner, self.value, false, f)
    }
}

fn write_expr<W: Write>(
    program: &Program,
    interner: &Interner,
    expr: ExprId,
    nested: bool,
    writer: &mut W,
) -> fmt::Result {
    match &program.exprs[expr] {
        Expr::Numeral { value, .. } => write!(writer, "{value}"),
        Expr::Name(name) => writer.write_str(interner.resolve(&name.name)),
        Expr::Binary {
            op, left, right, ..
        } => {
            if nested {
                writer.write_char('(')?;
            }
            write_expr(program, interner, *left, true, writer)?;
            write!(writer, " {op} ")?;
            write_expr(program, interner, *right, true, writer)?;
            if nested {
                writer.write_char(')')?;
            }
            Ok(())
        }
        Expr::Call { callee, args, .. } => {
            writer.write_str(interner.resolve(&callee.name))?;
            writer.write_char('(')?;
            for (idx, arg) in args.iter().enumerate() {
                if idx > 0 {
                    writer.write_str(", ")?;
                }
                write_expr(program, interner, *arg, false, writer)?;
            }
            writer.write_char(')')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinaryOp, ProgramBuilder};

    #[test]
    fn test_nested_binary_is_parenthesized() {
        let interner = Interner::new();
        let mut builder = ProgramBuilder::new(&interner);
        let a = builder.name("a");
        let b = builder.name("b");
        let one = builder.numeral(1);
        let sum = builder.binary(BinaryOp::Add, a, b);
        let product = builder.binary(BinaryOp::Mul, sum, one);
        let call = builder.call("g", vec![product, a]);
        let x = builder.name("x");
        let program = builder.finish();

        assert_eq!(
            ExprDisplay::new(&program, &interner, product).to_string(),
            "(a + b) * 1"
        );
        assert_eq!(
            ExprDisplay::new(&program, &interner, call).to_string(),
            "g((a + b) * 1, a)"
        );
        assert_eq!(
            InstructionDisplay::assign(&program, &interner, x, call).to_string(),
            "x := g((a + b) * 1, a)"
        );
    }
}
