//! LIR → assembly text

use crate::error::RenderError;
use crate::machine::TargetMachine;
use serde::{Deserialize, Serialize};
use tn_ast::{
    BinaryOp, DeclId, Declaration, Expr, ExprDisplay, ExprId, InstructionDisplay, NameRef, Program,
};
use tn_intern::Interner;
use tn_lir::{Branch, Instruction, Jump, Label, Line};

/// Output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Indent instructions one level; labels stay flush
    pub indent: bool,
    /// Spaces per indentation level
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: true,
            indent_width: 4,
        }
    }
}

/// Renders a line sequence into assembly, one output line per LIR line
///
/// Exceptions: a move between two names held in the same register emits
/// nothing, and an entry label that is not the first output line is preceded
/// by a blank line.
pub struct Renderer<'a, M: TargetMachine + ?Sized> {
    program: &'a Program,
    interner: &'a Interner,
    machine: &'a M,
    options: RenderOptions,
    output: Vec<String>,
}

impl<'a, M: TargetMachine + ?Sized> Renderer<'a, M> {
    /// Renderer writing for `machine` with the given layout
    pub fn new(
        program: &'a Program,
        interner: &'a Interner,
        machine: &'a M,
        options: RenderOptions,
    ) -> Self {
        Self {
            program,
            interner,
            machine,
            options,
            output: Vec::new(),
        }
    }

    /// Render `lines`, stopping at the first contract violation
    pub fn render(mut self, lines: &[Line]) -> Result<Vec<String>, RenderError> {
        let _span = tracing::debug_span!("render", lines = lines.len()).entered();

        for line in lines {
            self.render_line(line)?;
        }

        tracing::debug!(output = self.output.len(), "rendering finished");
        Ok(self.output)
    }

    fn render_line(&mut self, line: &Line) -> Result<(), RenderError> {
        match line {
            Line::Label(label) => {
                self.render_label(label);
                Ok(())
            }
            Line::Branch(branch) => self.render_branch(branch),
            Line::Jump(jump) => {
                self.render_jump(jump);
                Ok(())
            }
            Line::Instruction(Instruction::Assign { target, value }) => {
                self.render_assign(*target, *value)
            }
            Line::Instruction(Instruction::Call(call)) => self.render_call(*call),
        }
    }

    fn render_label(&mut self, label: &Label) {
        let mut line = format!("{}:", self.interner.resolve(&label.name));
        if label.public {
            line.push(':');
        }
        if label.is_entry() && !self.output.is_empty() {
            self.add_line(String::new(), 0);
        }
        self.add_line(line, 0);
    }

    fn render_branch(&mut self, branch: &Branch) -> Result<(), RenderError> {
        let condition = self.render_operand(branch.condition)?;
        let target = self.interner.resolve(&branch.target);
        self.add_line(format!("br {condition}, {target}"), 1);
        Ok(())
    }

    fn render_jump(&mut self, jump: &Jump) {
        let target = self.interner.resolve(&jump.target);
        self.add_line(format!("jmp {target}"), 1);
    }

    fn render_assign(&mut self, target: ExprId, value: ExprId) -> Result<(), RenderError> {
        let program = self.program;
        let line = match &program.exprs[value] {
            Expr::Numeral { value, .. } => {
                let dest = self.render_operand(target)?;
                format!("mov {value}, {dest}")
            }
            Expr::Name(source) => {
                if let Expr::Name(dest) = &program.exprs[target] {
                    if self.register_for(dest)? == self.register_for(source)? {
                        tracing::trace!(
                            name = self.interner.resolve(&dest.name),
                            "elided move within one register"
                        );
                        return Ok(());
                    }
                }
                let dest = self.render_operand(target)?;
                let src = self.render_operand(value)?;
                format!("mov {src}, {dest}")
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let dest = self.render_operand(target)?;
                let arg1 = self.render_operand(*left)?;
                let arg2 = self.render_operand(*right)?;
                format!("{} {arg1}, {arg2}, {dest}", opcode(*op))
            }
            Expr::Call { .. } => {
                let text = InstructionDisplay::assign(program, self.interner, target, value);
                self.unsupported(&text.to_string());
                return Ok(());
            }
        };
        self.add_line(line, 1);
        Ok(())
    }

    /// Only builtin calls are supported; everything else becomes a placeholder
    fn render_call(&mut self, call: ExprId) -> Result<(), RenderError> {
        let program = self.program;
        if let Expr::Call { callee, args, .. } = &program.exprs[call] {
            let builtin = callee
                .declaration()
                .and_then(|decl| program.decls[decl].as_builtin());
            if let Some(builtin) = builtin {
                let operands = args
                    .iter()
                    .map(|&arg| self.render_operand(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let line = self.machine.render_builtin(builtin, &operands)?;
                self.add_line(line, 1);
                return Ok(());
            }
        }

        let text = ExprDisplay::new(program, self.interner, call);
        self.unsupported(&text.to_string());
        Ok(())
    }

    /// Render a numeral or a name as instruction operand text
    ///
    /// Names render as the register that holds them. Any other expression is
    /// a contract violation from linearization and fails.
    pub fn render_operand(&self, expr: ExprId) -> Result<String, RenderError> {
        match &self.program.exprs[expr] {
            Expr::Numeral { value, .. } => Ok(value.to_string()),
            Expr::Name(name) => {
                let register = self.register_for(name)?;
                let register_name = self.program.decls[register].name();
                Ok(self.interner.resolve(&register_name).to_string())
            }
            other => Err(RenderError::OperandContract {
                found: other.kind_name(),
                expression: ExprDisplay::new(self.program, self.interner, expr).to_string(),
            }),
        }
    }

    /// The physical register a name refers to
    fn register_for(&self, name: &NameRef) -> Result<DeclId, RenderError> {
        let decl = name.declaration().ok_or_else(|| RenderError::UnboundName {
            name: self.interner.resolve(&name.name).to_string(),
        })?;
        match &self.program.decls[decl] {
            Declaration::Register(_) => Ok(decl),
            other => self
                .program
                .register_of(decl)
                .ok_or_else(|| RenderError::MissingRegister {
                    kind: other.kind_name(),
                    name: self.interner.resolve(&other.name()).to_string(),
                }),
        }
    }

    fn unsupported(&mut self, text: &str) {
        tracing::warn!(construct = text, "no rendering for construct; emitting placeholder");
        self.add_line(format!("<unsupported: {text}>"), 1);
    }

    fn add_line(&mut self, line: String, indent: usize) {
        if self.options.indent && indent > 0 && !line.is_empty() {
            let prefix = " ".repeat(self.options.indent_width * indent);
            self.output.push(prefix + &line);
        } else {
            self.output.push(line);
        }
    }
}

/// Three-address mnemonic for a binary operator
///
/// Operators without a dedicated mnemonic are emitted as written.
pub fn opcode(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Lt => "slt",
        BinaryOp::Add => "add",
        BinaryOp::Sub => "sub",
        other => other.symbol(),
    }
}

/// Render `lines` with a fresh [`Renderer`]
pub fn render<M: TargetMachine + ?Sized>(
    program: &Program,
    interner: &Interner,
    machine: &M,
    lines: &[Line],
    options: RenderOptions,
) -> Result<Vec<String>, RenderError> {
    Renderer::new(program, interner, machine, options).render(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TinyMachine;
    use tn_ast::{Builtin, ProgramBuilder, Type};
    use tn_lir::Lir;

    struct Fixture {
        interner: Interner,
        builder: ProgramBuilder,
        x: DeclId,
        y: DeclId,
        a: DeclId,
        b: DeclId,
    }

    /// `x` and `a` live in r1, `y` in r2, `b` in r3
    fn fixture() -> Fixture {
        let interner = Interner::new();
        let mut builder = ProgramBuilder::new(&interner);
        let r1 = builder.register("r1");
        let r2 = builder.register("r2");
        let r3 = builder.register("r3");
        let x = builder.variable(Type::Int, "x");
        let y = builder.variable(Type::Int, "y");
        let a = builder.variable(Type::Int, "a");
        let b = builder.variable(Type::Int, "b");
        builder
            .assign_register(x, r1)
            .assign_register(y, r2)
            .assign_register(a, r1)
            .assign_register(b, r3);
        Fixture {
            interner,
            builder,
            x,
            y,
            a,
            b,
        }
    }

    fn render_lines(f: Fixture, lir: &Lir) -> Result<Vec<String>, RenderError> {
        let program = f.builder.finish();
        render(&program, &f.interner, &TinyMachine, &lir.lines, RenderOptions::default())
    }

    #[test]
    fn test_mov_numeral() {
        let mut f = fixture();
        let target = f.builder.bound_name(f.x);
        let five = f.builder.numeral(5);
        let mut lir = Lir::new();
        lir.push(Instruction::Assign { target, value: five });

        assert_eq!(render_lines(f, &lir).unwrap(), ["    mov 5, r1"]);
    }

    #[test]
    fn test_self_move_is_elided() {
        let mut f = fixture();
        let target = f.builder.bound_name(f.x);
        let source = f.builder.bound_name(f.a);
        let mut lir = Lir::new();
        lir.push(Instruction::Assign { target, value: source });

        assert!(render_lines(f, &lir).unwrap().is_empty());
    }

    #[test]
    fn test_move_between_registers() {
        let mut f = fixture();
        let target = f.builder.bound_name(f.x);
        let source = f.builder.bound_name(f.y);
        let mut lir = Lir::new();
        lir.push(Instruction::Assign { target, value: source });

        assert_eq!(render_lines(f, &lir).unwrap(), ["    mov r2, r1"]);
    }

    #[test]
    fn test_binary_opcodes() {
        let mut f = fixture();
        let mut lir = Lir::new();
        for op in [BinaryOp::Lt, BinaryOp::Add, BinaryOp::Sub, BinaryOp::Mul] {
            let target = f.builder.bound_name(f.y);
            let left = f.builder.bound_name(f.a);
            let right = f.builder.bound_name(f.b);
            let value = f.builder.binary(op, left, right);
            lir.push(Instruction::Assign { target, value });
        }

        assert_eq!(
            render_lines(f, &lir).unwrap(),
            [
                "    slt r1, r3, r2",
                "    add r1, r3, r2",
                "    sub r1, r3, r2",
                "    * r1, r3, r2",
            ]
        );
    }

    #[test]
    fn test_labels() {
        let f = fixture();
        let main = f.interner.intern("main");
        let local = f.interner.intern("local");
        let helper = f.interner.intern("helper");
        let mut lir = Lir::new();
        lir.push(Label::entry(main, true))
            .push(Label::block(local))
            .push(Label::entry(helper, false));

        assert_eq!(
            render_lines(f, &lir).unwrap(),
            ["main::", "local:", "", "helper:"]
        );
    }

    #[test]
    fn test_branch_and_jump() {
        let mut f = fixture();
        let done = f.interner.intern("done");
        let condition = f.builder.bound_name(f.y);
        let mut lir = Lir::new();
        lir.push(Branch { condition, target: done })
            .push(Jump { target: done });

        assert_eq!(
            render_lines(f, &lir).unwrap(),
            ["    br r2, done", "    jmp done"]
        );
    }

    #[test]
    fn test_countdown_listing() {
        let mut f = fixture();
        let main = f.interner.intern("main");
        let top = f.interner.intern("top");
        let done = f.interner.intern("done");
        let halt = f.builder.program().builtin_decl(Builtin::Halt);

        let mut lir = Lir::new();
        let (y, ten) = (f.builder.bound_name(f.y), f.builder.numeral(10));
        lir.push(Label::entry(main, true))
            .push(Instruction::Assign { target: y, value: ten })
            .push(Label::block(top));
        let (b, y1, zero) = (
            f.builder.bound_name(f.b),
            f.builder.bound_name(f.y),
            f.builder.numeral(0),
        );
        let test = f.builder.binary(BinaryOp::Lt, y1, zero);
        lir.push(Instruction::Assign { target: b, value: test });
        let b1 = f.builder.bound_name(f.b);
        lir.push(Branch { condition: b1, target: done });
        let (y2, y3, one) = (
            f.builder.bound_name(f.y),
            f.builder.bound_name(f.y),
            f.builder.numeral(1),
        );
        let dec = f.builder.binary(BinaryOp::Sub, y3, one);
        lir.push(Instruction::Assign { target: y2, value: dec })
            .push(Jump { target: top })
            .push(Label::block(done));
        let call = f.builder.bound_call(halt, vec![]);
        lir.push(Instruction::Call(call));

        let mut listing = render_lines(f, &lir).unwrap().join("\n");
        listing.push('\n');
        expect_test::expect![[r#"
            main::
                mov 10, r2
            top:
                slt r2, 0, r3
                br r3, done
                sub r2, 1, r2
                jmp top
            done:
                halt
        "#]]
        .assert_eq(&listing);
    }

    #[test]
    fn test_without_indentation() {
        let mut f = fixture();
        let target = f.builder.bound_name(f.x);
        let five = f.builder.numeral(5);
        let main = f.interner.intern("main");
        let mut lir = Lir::new();
        lir.push(Label::entry(main, false))
            .push(Instruction::Assign { target, value: five });

        let program = f.builder.finish();
        let options = RenderOptions {
            indent: false,
            ..RenderOptions::default()
        };
        let output = render(&program, &f.interner, &TinyMachine, &lir.lines, options).unwrap();
        assert_eq!(output, ["main:", "mov 5, r1"]);
    }

    #[test]
    fn test_builtin_call_goes_through_machine() {
        let mut f = fixture();
        let print = f.builder.program().builtin_decl(Builtin::Print);
        let arg = f.builder.bound_name(f.b);
        let call = f.builder.bound_call(print, vec![arg]);
        let mut lir = Lir::new();
        lir.push(Instruction::Call(call));

        assert_eq!(render_lines(f, &lir).unwrap(), ["    out r3"]);
    }

    #[test]
    fn test_user_call_is_a_placeholder() {
        let mut f = fixture();
        let body = f.builder.block(vec![]);
        let g = f.builder.function(Type::Void, "g", vec![], body);
        let arg = f.builder.numeral(7);
        let call = f.builder.bound_call(g, vec![arg]);
        let target = f.builder.bound_name(f.x);
        let mut lir = Lir::new();
        lir.push(Instruction::Call(call))
            .push(Instruction::Assign { target, value: call });

        assert_eq!(
            render_lines(f, &lir).unwrap(),
            ["    <unsupported: g(7)>", "    <unsupported: x := g(7)>"]
        );
    }

    #[test]
    fn test_non_operand_is_a_hard_error() {
        let mut f = fixture();
        let left = f.builder.bound_name(f.a);
        let right = f.builder.numeral(1);
        let nested = f.builder.binary(BinaryOp::Add, left, right);
        let mut lir = Lir::new();
        lir.push(Branch {
            condition: nested,
            target: f.interner.intern("done"),
        });

        let error = render_lines(f, &lir).unwrap_err();
        assert_eq!(
            error,
            RenderError::OperandContract {
                found: "binary operation",
                expression: "a + 1".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_register_is_a_hard_error() {
        let mut f = fixture();
        let unallocated = f.builder.variable(Type::Int, "z");
        let target = f.builder.bound_name(unallocated);
        let one = f.builder.numeral(1);
        let mut lir = Lir::new();
        lir.push(Instruction::Assign { target, value: one });

        let error = render_lines(f, &lir).unwrap_err();
        assert_eq!(error.to_string(), "variable `z` has no register assigned");
    }

    #[test]
    fn test_unbound_name_is_a_hard_error() {
        let mut f = fixture();
        let target = f.builder.name("ghost");
        let one = f.builder.numeral(1);
        let mut lir = Lir::new();
        lir.push(Instruction::Assign { target, value: one });

        let error = render_lines(f, &lir).unwrap_err();
        assert!(matches!(error, RenderError::UnboundName { ref name } if name == "ghost"));
    }
}
