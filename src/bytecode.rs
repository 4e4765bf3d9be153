//! # Bytecode model
//!
//! A flat sequence of 32-bit signed integers: an opcode word followed by
//! zero or one operand words per the opcode's arity. There is no separate
//! constant pool — small integer operands are inlined directly in the
//! stream.

/// An instruction opcode. Numeric values are fixed by the external
/// interface and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum OpCode {
    Push = 0,
    Pop = 1,
    Add = 2,
    Not = 3,
    Negate = 4,
    Mul = 5,
    Load = 6,
    Store = 7,
    Lt = 8,
    Jz = 9,
    Jmp = 10,
    Halt = 11,
    Swap = 12,
    Dup = 13,
}

impl OpCode {
    /// Whether this opcode is followed by one operand word in the stream.
    #[must_use]
    pub fn has_operand(self) -> bool {
        matches!(
            self,
            OpCode::Push
                | OpCode::Pop
                | OpCode::Load
                | OpCode::Store
                | OpCode::Jz
                | OpCode::Swap
                | OpCode::Dup
        )
    }

    #[must_use]
    pub fn from_i32(value: i32) -> Option<OpCode> {
        let op = match value {
            0 => OpCode::Push,
            1 => OpCode::Pop,
            2 => OpCode::Add,
            3 => OpCode::Not,
            4 => OpCode::Negate,
            5 => OpCode::Mul,
            6 => OpCode::Load,
            7 => OpCode::Store,
            8 => OpCode::Lt,
            9 => OpCode::Jz,
            10 => OpCode::Jmp,
            11 => OpCode::Halt,
            12 => OpCode::Swap,
            13 => OpCode::Dup,
            _ => return None,
        };
        Some(op)
    }
}

/// The flat instruction stream a compiled program is encoded into.
pub type Program = Vec<i32>;
