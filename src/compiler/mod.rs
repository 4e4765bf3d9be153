//! # Bytecode compiler
//!
//! Lowers a parsed [`Program`] to a flat bytecode stream in two passes: the
//! top-level statement list compiles first (so the VM can start executing
//! at offset 0), deferring every function body onto a queue; once the
//! top-level is laid out and a synthetic call to `main` plus `HALT` are
//! emitted, each deferred body is compiled in turn and its forward
//! reference is back-patched to the now-known entry offset.
//!
//! The canonical path emits only `PUSH, POP, ADD, MUL, NOT, NEGATE, DUP,
//! SWAP, JMP, HALT`. Operators and statements the opcode set does not
//! cover in the canonical core (`if`, subtraction, division, modulo,
//! relational and logical operators) are parsed but rejected here with a
//! [`CompileError`], matching `if`'s documented treatment.

pub mod bindings;

#[cfg(test)]
mod tests;

use crate::ast::{BinaryOp, Expr, FunctionExpr, Program, Stmt, UnaryOp};
use crate::bytecode::OpCode;
use crate::error::CompileError;
use bindings::BindingTable;

pub fn compile(program: &Program) -> Result<crate::bytecode::Program, CompileError> {
    let mut compiler = Compiler::new();
    compiler.compile_program(program)?;
    Ok(compiler.instructions)
}

struct Compiler {
    instructions: Vec<i32>,
    bindings: BindingTable,
    deferred: Vec<(FunctionExpr, usize)>,
}

impl Compiler {
    fn new() -> Self {
        Self {
            instructions: Vec::new(),
            bindings: BindingTable::new(),
            deferred: Vec::new(),
        }
    }

    fn compile_program(&mut self, program: &Program) -> Result<(), CompileError> {
        for stmt in &program.statements {
            self.compile_top_level_stmt(stmt)?;
        }

        if self.bindings.offset_of("main").is_none() {
            return Err(CompileError::new("program has no main function"));
        }

        // Snapshot the binding table as it stands right before any call is
        // emitted: this is the one depth every deferred function body is
        // compiled against, since `main`'s single true call site starts
        // from exactly this depth (plus its own return address and
        // arguments). A body that only references its own params and
        // locals is indifferent to the choice of baseline, since those
        // offsets are translation-invariant; only a body that reads an
        // outer binding (as `main`'s does, calling other functions) needs
        // the baseline to match its real call site.
        let snapshot = self.bindings.clone();

        self.compile_call("main", &[])?;
        self.emit(OpCode::Halt);

        let deferred = std::mem::take(&mut self.deferred);
        for (function, patch_idx) in deferred {
            self.bindings = snapshot.clone();
            let entry = self.instructions.len() as i32;
            self.instructions[patch_idx] = entry;
            self.compile_function_body(&function)?;
        }

        Ok(())
    }

    fn compile_top_level_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::FunctionDecl { name, function } => {
                let patch_idx = self.emit_operand(OpCode::Push, 0);
                self.bindings.bind(name.clone());
                self.deferred.push((function.clone(), patch_idx));
                Ok(())
            }
            other => self.compile_stmt(other),
        }
    }

    fn compile_function_body(&mut self, function: &FunctionExpr) -> Result<(), CompileError> {
        self.bindings.bump_depth_untracked(1); // the return address slot
        self.bindings.push_block();
        for param in &function.params {
            self.bindings.apply_delta(1);
            self.bindings.bind(param.name.clone());
        }
        self.compile_function_statements(&function.body)
    }

    /// Compiles a function body's direct statement list, emitting the
    /// calling convention's epilogue at a `return` instead of falling
    /// through to a generic block exit.
    fn compile_function_statements(&mut self, stmts: &[Stmt]) -> Result<(), CompileError> {
        for stmt in stmts {
            if let Stmt::Return(expr) = stmt {
                let n = self.bindings.current_block_size();
                self.compile_expr(expr)?;
                if n > 0 {
                    self.emit_operand(OpCode::Swap, n);
                    self.emit_operand(OpCode::Pop, n);
                }
                self.emit_operand(OpCode::Swap, 1);
                self.emit(OpCode::Jmp);
                return Ok(());
            }
            self.compile_stmt(stmt)?;
        }
        Ok(())
    }

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Block(stmts) => {
                self.bindings.push_block();
                for s in stmts {
                    self.compile_stmt(s)?;
                }
                let n = self.bindings.pop_block();
                if n > 0 {
                    self.emit_operand(OpCode::Pop, n);
                }
                Ok(())
            }
            Stmt::VariableDecl { name, init, .. } => {
                self.compile_expr(init)?;
                self.bindings.bind(name.clone());
                Ok(())
            }
            Stmt::Assignment { name, value } => {
                let old_offset = self
                    .bindings
                    .offset_of(name)
                    .ok_or_else(|| CompileError::new(format!("undefined variable '{name}'")))?;
                self.compile_expr(value)?;
                self.emit_operand(OpCode::Swap, old_offset + 1);
                self.emit_operand(OpCode::Pop, 1);
                Ok(())
            }
            Stmt::If { .. } => Err(CompileError::new(
                "if statement is not supported by the current compiler",
            )),
            Stmt::Return(_) => Err(CompileError::new("return outside of a function body")),
            Stmt::FunctionDecl { .. } => Err(CompileError::new(
                "nested function declarations are not supported",
            )),
        }
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match expr {
            Expr::Literal(_, value) => {
                self.emit_operand(OpCode::Push, *value);
                Ok(())
            }
            Expr::Variable(name) => {
                let offset = self
                    .bindings
                    .offset_of(name)
                    .ok_or_else(|| CompileError::new(format!("undefined variable '{name}'")))?;
                self.emit_operand(OpCode::Dup, offset);
                Ok(())
            }
            Expr::Unary(op, operand) => {
                self.compile_expr(operand)?;
                match op {
                    UnaryOp::Not => self.emit(OpCode::Not),
                    UnaryOp::Negate => self.emit(OpCode::Negate),
                }
                Ok(())
            }
            Expr::Binary(op, left, right) => {
                let opcode = match op {
                    BinaryOp::Add => OpCode::Add,
                    BinaryOp::Mul => OpCode::Mul,
                    _ => {
                        return Err(CompileError::new(format!(
                            "operator {op:?} is not supported by the current compiler"
                        )))
                    }
                };
                self.compile_expr(left)?;
                self.compile_expr(right)?;
                self.emit(opcode);
                Ok(())
            }
            Expr::Call(name, args) => self.compile_call(name, args),
            Expr::Function(_) => Err(CompileError::new(
                "function expressions are only supported as the right-hand side of a declaration",
            )),
        }
    }

    /// Emits the calling convention's caller-side sequence: a return
    /// address, the evaluated arguments, the callee's entry point, and a
    /// jump. Corrects the binding table's predicted depth afterward to the
    /// net +1 the call leaves behind, since the callee's own body and
    /// epilogue are compiled separately and this table cannot see their
    /// effect instruction-by-instruction.
    fn compile_call(&mut self, name: &str, args: &[Expr]) -> Result<(), CompileError> {
        let base_depth = self.bindings.depth();
        let patch_idx = self.emit_operand(OpCode::Push, 0);
        for arg in args {
            self.compile_expr(arg)?;
        }
        let offset = self
            .bindings
            .offset_of(name)
            .ok_or_else(|| CompileError::new(format!("undefined function '{name}'")))?;
        self.emit_operand(OpCode::Dup, offset);
        self.emit(OpCode::Jmp);
        let return_addr = self.instructions.len() as i32;
        self.instructions[patch_idx] = return_addr;
        self.bindings.force_depth(base_depth + 1);
        Ok(())
    }

    fn emit(&mut self, op: OpCode) {
        self.instructions.push(op as i32);
        self.bindings.apply_delta(delta_for(op, None));
    }

    fn emit_operand(&mut self, op: OpCode, operand: i32) -> usize {
        self.instructions.push(op as i32);
        let idx = self.instructions.len();
        self.instructions.push(operand);
        self.bindings.apply_delta(delta_for(op, Some(operand)));
        idx
    }
}

fn delta_for(op: OpCode, operand: Option<i32>) -> i32 {
    match op {
        OpCode::Push | OpCode::Dup | OpCode::Load => 1,
        OpCode::Pop => -operand.expect("POP requires an operand"),
        OpCode::Add | OpCode::Mul | OpCode::Lt | OpCode::Jmp | OpCode::Jz | OpCode::Store => -1,
        OpCode::Swap | OpCode::Halt | OpCode::Not | OpCode::Negate => 0,
    }
}
