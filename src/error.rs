//! Error types for each stage of the toolchain.
//!
//! Each phase (lexer, parser, compiler, VM) gets its own error type rather
//! than a shared `ErrorKind` enum: the phases don't share a representation
//! (a `VMError` has no source position, a `CompileError` here is structural
//! rather than positional) and forcing them into one type would mean
//! carrying fields that are meaningless for most variants.

/// A location in the source text, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Unexpected character encountered while tokenising.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lex error ({}:{}): {}",
            self.span.line, self.span.column, self.message
        )
    }
}

/// Unexpected token, missing punctuation, or expectation failure while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "parse error ({}:{}): {}",
            self.span.line, self.span.column, self.message
        )
    }
}

/// Undefined variable, redeclaration, unknown operator, unsupported construct,
/// or a missing `main`. Compile errors are structural — detected against the
/// binding table rather than a specific token — so they carry no span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compile error: {}", self.message)
    }
}

/// Unknown opcode decoded by the VM. Should be unreachable for bytecode
/// produced by this crate's own compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMError {
    pub message: String,
}

impl VMError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for VMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm error: {}", self.message)
    }
}
