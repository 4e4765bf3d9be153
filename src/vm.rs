//! # Virtual machine
//!
//! Executes a flat bytecode program against a single data stack. There is
//! no separate call stack: the calling convention (return addresses,
//! argument frames) is entirely encoded on the data stack by the compiler,
//! and `JMP` is the only control-transfer instruction.

use crate::bytecode::OpCode;
use crate::error::VMError;

const MEMORY_SIZE: usize = 1024;

/// A stack machine over 32-bit signed integers.
pub struct Vm {
    program: crate::bytecode::Program,
    stack: Vec<i32>,
    memory: [i32; MEMORY_SIZE],
    ip: usize,
}

impl Vm {
    #[must_use]
    pub fn new(program: crate::bytecode::Program) -> Self {
        Self {
            program,
            stack: Vec::new(),
            memory: [0; MEMORY_SIZE],
            ip: 0,
        }
    }

    /// Runs the fetch-decode-execute loop until `HALT`. Returns the final
    /// data stack.
    pub fn run(&mut self) -> Result<&[i32], VMError> {
        loop {
            let opcode = self.fetch()?;
            match opcode {
                OpCode::Push => {
                    let v = self.fetch_operand()?;
                    self.stack.push(v);
                }
                OpCode::Pop => {
                    let n = self.fetch_operand()?;
                    self.pop_n(n)?;
                }
                OpCode::Add => {
                    let (a, b) = self.pop_pair()?;
                    self.stack.push(a + b);
                }
                OpCode::Mul => {
                    let (a, b) = self.pop_pair()?;
                    self.stack.push(a * b);
                }
                OpCode::Not => {
                    let v = self.pop()?;
                    self.stack.push(if v == 0 { 1 } else { 0 });
                }
                OpCode::Negate => {
                    let v = self.pop()?;
                    self.stack.push(-v);
                }
                OpCode::Lt => {
                    let (a, b) = self.pop_pair()?;
                    self.stack.push(if a < b { 1 } else { 0 });
                }
                OpCode::Jz => {
                    let target = self.fetch_operand()?;
                    let v = self.pop()?;
                    if v == 0 {
                        self.ip = usize::try_from(target)
                            .map_err(|_| VMError::new("negative jump target"))?;
                    }
                }
                OpCode::Jmp => {
                    let target = self.pop()?;
                    self.ip = usize::try_from(target)
                        .map_err(|_| VMError::new("negative jump target"))?;
                }
                OpCode::Load => {
                    let addr = self.fetch_operand()?;
                    let v = self.memory_at(addr)?;
                    self.stack.push(v);
                }
                OpCode::Store => {
                    let addr = self.fetch_operand()?;
                    let v = self.pop()?;
                    self.memory_set(addr, v)?;
                }
                OpCode::Swap => {
                    let k = self.fetch_operand()?;
                    self.swap(k)?;
                }
                OpCode::Dup => {
                    let k = self.fetch_operand()?;
                    self.dup(k)?;
                }
                OpCode::Halt => return Ok(&self.stack),
            }
        }
    }

    fn fetch(&mut self) -> Result<OpCode, VMError> {
        let word = *self
            .program
            .get(self.ip)
            .ok_or_else(|| VMError::new("instruction pointer ran off the end of the program"))?;
        self.ip += 1;
        OpCode::from_i32(word).ok_or_else(|| VMError::new(format!("unknown opcode {word}")))
    }

    fn fetch_operand(&mut self) -> Result<i32, VMError> {
        let word = *self
            .program
            .get(self.ip)
            .ok_or_else(|| VMError::new("missing operand at end of program"))?;
        self.ip += 1;
        Ok(word)
    }

    fn pop(&mut self) -> Result<i32, VMError> {
        self.stack.pop().ok_or_else(|| VMError::new("stack underflow"))
    }

    /// `ADD`/`MUL`/`LT` pop the right operand first (it was pushed last),
    /// then the left, and must combine them as `left OP right`.
    fn pop_pair(&mut self) -> Result<(i32, i32), VMError> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }

    fn pop_n(&mut self, n: i32) -> Result<(), VMError> {
        let n = usize::try_from(n).map_err(|_| VMError::new("negative pop count"))?;
        if n > self.stack.len() {
            return Err(VMError::new("stack underflow"));
        }
        self.stack.truncate(self.stack.len() - n);
        Ok(())
    }

    fn swap(&mut self, k: i32) -> Result<(), VMError> {
        if k == 0 {
            return Ok(());
        }
        let k = usize::try_from(k).map_err(|_| VMError::new("negative swap offset"))?;
        let len = self.stack.len();
        if k >= len {
            return Err(VMError::new("stack underflow"));
        }
        self.stack.swap(len - 1, len - 1 - k);
        Ok(())
    }

    fn dup(&mut self, k: i32) -> Result<(), VMError> {
        let k = usize::try_from(k).map_err(|_| VMError::new("negative dup offset"))?;
        let len = self.stack.len();
        if k >= len {
            return Err(VMError::new("stack underflow"));
        }
        let v = self.stack[len - 1 - k];
        self.stack.push(v);
        Ok(())
    }

    fn memory_at(&self, addr: i32) -> Result<i32, VMError> {
        let addr = usize::try_from(addr).map_err(|_| VMError::new("negative memory address"))?;
        self.memory
            .get(addr)
            .copied()
            .ok_or_else(|| VMError::new("memory address out of range"))
    }

    fn memory_set(&mut self, addr: i32, value: i32) -> Result<(), VMError> {
        let addr = usize::try_from(addr).map_err(|_| VMError::new("negative memory address"))?;
        let slot = self
            .memory
            .get_mut(addr)
            .ok_or_else(|| VMError::new("memory address out of range"))?;
        *slot = value;
        Ok(())
    }
}
