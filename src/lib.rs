//! # Osprey
//!
//! A whole-program toolchain for Osprey, a small statically typed scripting
//! language: source text is lexed, parsed into an AST, lowered to bytecode
//! for a stack machine, and executed to produce an integer result.
//!
//! ## Pipeline
//!
//! 1. **Lexer** - tokenizes source text
//! 2. **Parser** - builds an AST from the token stream
//! 3. **Compiler** - lowers the AST to a flat bytecode stream, two-pass
//! 4. **VM** - executes the bytecode against a data stack
//!
//! ## Example
//!
//! ```rust,no_run
//! use osprey_vm::{lexer::tokenize, parser::parse, compiler::compile, vm::Vm};
//!
//! let source = std::fs::read_to_string("program.osp").unwrap();
//! let lexed = tokenize(&source);
//! let program = parse(lexed.tokens).unwrap();
//! let bytecode = compile(&program).unwrap();
//! let mut vm = Vm::new(bytecode);
//! let result = vm.run().unwrap();
//! println!("top of stack: {}", result.last().unwrap());
//! ```

pub mod ast;
pub mod ast_dump;
pub mod bytecode;
pub mod compiler;
pub mod error;
pub mod harness;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;
pub mod vm;
