//! Shared fixtures for the end-to-end tests
//!
//! Each fixture is a program tree as a front end would hand it over (names
//! unresolved) plus the linear IR a linearizer and register allocator would
//! produce for it. The IR refers to declarations directly, so its names are
//! bound up front.

use tn_ast::{BinaryOp, Builtin, DeclId, Program, ProgramBuilder, Type};
use tn_intern::Interner;
use tn_lir::{Branch, Instruction, Jump, Label, Lir};

/// A program together with its linearized form
pub struct Compiled {
    /// Program tree with names still unresolved
    pub program: Program,
    /// Linear IR with every name bound
    pub lir: Lir,
}

/// ```text
/// int counter;
/// void main() {
///     counter := 10;
///     while counter > 0 {
///         print(counter);
///         counter := counter - 1;
///     }
///     halt();
/// }
/// ```
///
/// `counter` lives in r1; the loop-exit flag introduced by linearization
/// lives in r2.
pub fn countdown(interner: &Interner) -> Compiled {
    let mut b = ProgramBuilder::new(interner);
    let r1 = b.register("r1");
    let r2 = b.register("r2");

    let counter = b.variable(Type::Int, "counter");

    let target = b.name("counter");
    let ten = b.numeral(10);
    let init = b.assign(target, ten);

    let cond_left = b.name("counter");
    let zero = b.numeral(0);
    let condition = b.binary(BinaryOp::Gt, cond_left, zero);
    let print_arg = b.name("counter");
    let print_call = b.call("print", vec![print_arg]);
    let print = b.expr_stmt(print_call);
    let dec_target = b.name("counter");
    let dec_left = b.name("counter");
    let one = b.numeral(1);
    let dec_value = b.binary(BinaryOp::Sub, dec_left, one);
    let dec = b.assign(dec_target, dec_value);
    let loop_body = b.block(vec![print, dec]);
    let loop_stmt = b.while_stmt(condition, loop_body);

    let halt_call = b.call("halt", vec![]);
    let halt = b.expr_stmt(halt_call);
    let body = b.block(vec![init, loop_stmt, halt]);
    let main = b.function(Type::Void, "main", vec![], body);
    b.top_level(counter).top_level(main);

    let flag = b.variable(Type::Bool, "flag");
    b.assign_register(counter, r1).assign_register(flag, r2);

    let main_label = interner.intern("main");
    let top = interner.intern("top");
    let done = interner.intern("done");
    let print_decl = b.program().builtin_decl(Builtin::Print);
    let halt_decl = b.program().builtin_decl(Builtin::Halt);

    let mut lir = Lir::new();
    let (c, ten) = (b.bound_name(counter), b.numeral(10));
    lir.push(Label::entry(main_label, true))
        .push(Instruction::Assign { target: c, value: ten })
        .push(Label::block(top));

    let (f, c, one) = (b.bound_name(flag), b.bound_name(counter), b.numeral(1));
    let exit_test = b.binary(BinaryOp::Lt, c, one);
    let f_cond = b.bound_name(flag);
    lir.push(Instruction::Assign {
        target: f,
        value: exit_test,
    })
    .push(Branch {
        condition: f_cond,
        target: done,
    });

    let c = b.bound_name(counter);
    let print_call = b.bound_call(print_decl, vec![c]);
    let (c_target, c_left, one) = (b.bound_name(counter), b.bound_name(counter), b.numeral(1));
    let decrement = b.binary(BinaryOp::Sub, c_left, one);
    lir.push(Instruction::Call(print_call))
        .push(Instruction::Assign {
            target: c_target,
            value: decrement,
        })
        .push(Jump { target: top })
        .push(Label::block(done));

    let halt_call = b.bound_call(halt_decl, vec![]);
    lir.push(Instruction::Call(halt_call));

    Compiled {
        program: b.finish(),
        lir,
    }
}

/// ```text
/// int twice(int n) {
///     int m := n;
///     return n + m;
/// }
/// void main() {
///     store(twice(21), 4096);
/// }
/// ```
///
/// `n` and `m` share r1 (the copy is coalesced), the result goes to r2.
/// The call to `twice` is outside what the renderer covers.
pub fn two_functions(interner: &Interner) -> Compiled {
    let mut b = ProgramBuilder::new(interner);
    let r1 = b.register("r1");
    let r2 = b.register("r2");
    let rv = b.register("rv");

    let n = b.parameter(Type::Int, "n");
    let m_init = b.name("n");
    let m = b.variable_with_init(Type::Int, "m", m_init);
    let m_decl = b.decl_stmt(m);
    let (sum_left, sum_right) = (b.name("n"), b.name("m"));
    let sum = b.binary(BinaryOp::Add, sum_left, sum_right);
    let ret = b.return_stmt(Some(sum));
    let twice_body = b.block(vec![m_decl, ret]);
    let twice = b.function(Type::Int, "twice", vec![n], twice_body);

    let arg = b.numeral(21);
    let inner = b.call("twice", vec![arg]);
    let address = b.numeral(4096);
    let store_call = b.call("store", vec![inner, address]);
    let store = b.expr_stmt(store_call);
    let main_body = b.block(vec![store]);
    let main = b.function(Type::Void, "main", vec![], main_body);
    b.top_level(twice).top_level(main);

    let result = b.variable(Type::Int, "result");
    b.assign_register(n, r1)
        .assign_register(m, r1)
        .assign_register(result, r2);

    let store_decl = b.program().builtin_decl(Builtin::Store);
    let mut lir = Lir::new();

    let (m_target, n_source) = (b.bound_name(m), b.bound_name(n));
    let (ret_target, sum_left, sum_right) = (b.bound_name(rv), b.bound_name(n), b.bound_name(m));
    let sum = b.binary(BinaryOp::Add, sum_left, sum_right);
    lir.push(Label::entry(interner.intern("twice"), false))
        .push(Instruction::Assign {
            target: m_target,
            value: n_source,
        })
        .push(Instruction::Assign {
            target: ret_target,
            value: sum,
        });

    let (result_target, arg) = (b.bound_name(result), b.numeral(21));
    let call = b.bound_call(twice, vec![arg]);
    let (value, address) = (b.bound_name(result), b.numeral(4096));
    let store_call = b.bound_call(store_decl, vec![value, address]);
    lir.push(Label::entry(interner.intern("main"), true))
        .push(Instruction::Assign {
            target: result_target,
            value: call,
        })
        .push(Instruction::Call(store_call));

    Compiled {
        program: b.finish(),
        lir,
    }
}

/// The declaration a top-level name was given, by position
pub fn top_level(program: &Program, index: usize) -> DeclId {
    program.declarations[index]
}
