use crate::ast::{BinaryOp, Expr, FunctionExpr, Param, Program, Stmt};
use crate::bytecode::OpCode as Op;
use crate::compiler::compile;
use crate::types::Type;
use crate::vm::Vm;

fn lit(v: i32) -> Expr {
    Expr::Literal(Type::I32, v)
}

fn run_to_top(program: &Program) -> i32 {
    let bytecode = compile(program).expect("should compile");
    let mut vm = Vm::new(bytecode);
    let stack = vm.run().expect("should run");
    *stack.last().expect("stack should not be empty")
}

fn main_returning(expr: Expr) -> Program {
    Program {
        statements: vec![Stmt::FunctionDecl {
            name: "main".into(),
            function: FunctionExpr {
                params: vec![],
                return_type: Type::I32,
                body: vec![Stmt::Return(expr)],
            },
        }],
    }
}

#[test]
fn missing_main_is_a_compile_error() {
    let program = Program { statements: vec![] };
    assert!(compile(&program).is_err());
}

#[test]
fn literal_return() {
    let program = main_returning(lit(0));
    assert_eq!(run_to_top(&program), 0);
}

#[test]
fn addition_and_locals() {
    // main: () -> i32 { x: i32 = 3; y: i32 = 4; return x + y + 1; }
    let program = Program {
        statements: vec![Stmt::FunctionDecl {
            name: "main".into(),
            function: FunctionExpr {
                params: vec![],
                return_type: Type::I32,
                body: vec![
                    Stmt::VariableDecl {
                        name: "x".into(),
                        mutable: false,
                        ty: Type::I32,
                        init: lit(3),
                    },
                    Stmt::VariableDecl {
                        name: "y".into(),
                        mutable: false,
                        ty: Type::I32,
                        init: lit(4),
                    },
                    Stmt::Return(Expr::Binary(
                        BinaryOp::Add,
                        Box::new(Expr::Binary(
                            BinaryOp::Add,
                            Box::new(Expr::Variable("x".into())),
                            Box::new(Expr::Variable("y".into())),
                        )),
                        Box::new(lit(1)),
                    )),
                ],
            },
        }],
    };
    assert_eq!(run_to_top(&program), 8);
}

#[test]
fn left_associative_precedence() {
    // main: () -> i32 { x: i32 = 2 * 3 + 4; return x; }
    let program = Program {
        statements: vec![Stmt::FunctionDecl {
            name: "main".into(),
            function: FunctionExpr {
                params: vec![],
                return_type: Type::I32,
                body: vec![
                    Stmt::VariableDecl {
                        name: "x".into(),
                        mutable: false,
                        ty: Type::I32,
                        init: Expr::Binary(
                            BinaryOp::Add,
                            Box::new(Expr::Binary(
                                BinaryOp::Mul,
                                Box::new(lit(2)),
                                Box::new(lit(3)),
                            )),
                            Box::new(lit(4)),
                        ),
                    },
                    Stmt::Return(Expr::Variable("x".into())),
                ],
            },
        }],
    };
    assert_eq!(run_to_top(&program), 10);
}

#[test]
fn reassignment() {
    // main: () -> i32 { x: i32 = 5; x = x + 1; return x; }
    let program = Program {
        statements: vec![Stmt::FunctionDecl {
            name: "main".into(),
            function: FunctionExpr {
                params: vec![],
                return_type: Type::I32,
                body: vec![
                    Stmt::VariableDecl {
                        name: "x".into(),
                        mutable: true,
                        ty: Type::I32,
                        init: lit(5),
                    },
                    Stmt::Assignment {
                        name: "x".into(),
                        value: Expr::Binary(
                            BinaryOp::Add,
                            Box::new(Expr::Variable("x".into())),
                            Box::new(lit(1)),
                        ),
                    },
                    Stmt::Return(Expr::Variable("x".into())),
                ],
            },
        }],
    };
    assert_eq!(run_to_top(&program), 6);
}

#[test]
fn function_call_twice() {
    // add: (a: i32, b: i32) -> i32 { return a + b; }
    // main: () -> i32 { x: i32 = add(1, 2); y: i32 = add(x, 3); return y; }
    let add = Stmt::FunctionDecl {
        name: "add".into(),
        function: FunctionExpr {
            params: vec![
                Param {
                    name: "a".into(),
                    ty: Type::I32,
                },
                Param {
                    name: "b".into(),
                    ty: Type::I32,
                },
            ],
            return_type: Type::I32,
            body: vec![Stmt::Return(Expr::Binary(
                BinaryOp::Add,
                Box::new(Expr::Variable("a".into())),
                Box::new(Expr::Variable("b".into())),
            ))],
        },
    };
    let main = Stmt::FunctionDecl {
        name: "main".into(),
        function: FunctionExpr {
            params: vec![],
            return_type: Type::I32,
            body: vec![
                Stmt::VariableDecl {
                    name: "x".into(),
                    mutable: false,
                    ty: Type::I32,
                    init: Expr::Call("add".into(), vec![lit(1), lit(2)]),
                },
                Stmt::VariableDecl {
                    name: "y".into(),
                    mutable: false,
                    ty: Type::I32,
                    init: Expr::Call(
                        "add".into(),
                        vec![Expr::Variable("x".into()), lit(3)],
                    ),
                },
                Stmt::Return(Expr::Variable("y".into())),
            ],
        },
    };
    let program = Program {
        statements: vec![add, main],
    };
    assert_eq!(run_to_top(&program), 6);
}

#[test]
fn parenthesised_expression() {
    // main: () -> i32 { return (1 + 2) * 3; }
    let program = main_returning(Expr::Binary(
        BinaryOp::Mul,
        Box::new(Expr::Binary(
            BinaryOp::Add,
            Box::new(lit(1)),
            Box::new(lit(2)),
        )),
        Box::new(lit(3)),
    ));
    assert_eq!(run_to_top(&program), 9);
}

#[test]
fn if_statement_is_rejected() {
    let program = Program {
        statements: vec![Stmt::FunctionDecl {
            name: "main".into(),
            function: FunctionExpr {
                params: vec![],
                return_type: Type::I32,
                body: vec![
                    Stmt::If {
                        predicate: lit(1),
                        body: vec![],
                    },
                    Stmt::Return(lit(0)),
                ],
            },
        }],
    };
    assert!(compile(&program).is_err());
}

#[test]
fn undefined_variable_is_a_compile_error() {
    let program = main_returning(Expr::Variable("nope".into()));
    assert!(compile(&program).is_err());
}

#[test]
fn bytecode_only_uses_canonical_opcodes() {
    let program = main_returning(Expr::Binary(
        BinaryOp::Add,
        Box::new(lit(1)),
        Box::new(lit(2)),
    ));
    let bytecode = compile(&program).expect("should compile");
    let canonical = [
        Op::Push as i32,
        Op::Pop as i32,
        Op::Add as i32,
        Op::Mul as i32,
        Op::Dup as i32,
        Op::Swap as i32,
        Op::Jmp as i32,
        Op::Halt as i32,
    ];
    // Walk opcodes, skipping operand words, to check every opcode word is
    // one of the canonical set.
    let mut i = 0;
    while i < bytecode.len() {
        let op = crate::bytecode::OpCode::from_i32(bytecode[i]).expect("valid opcode");
        assert!(canonical.contains(&(op as i32)));
        i += if op.has_operand() { 2 } else { 1 };
    }
}
