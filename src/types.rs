//! # Type model
//!
//! Osprey's static types: the two primitive numeric types, `bool`, and
//! function types built from them. There is no type inference — every
//! variable and function parameter names its type explicitly in source.

/// A resolved Osprey type.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    I32,
    F32,
    Function(FunctionSignature),
}

/// The parameter types (in declaration order) and return type of a function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Type>,
    pub return_type: Box<Type>,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::I32 => write!(f, "i32"),
            Type::F32 => write!(f, "f32"),
            Type::Function(sig) => {
                write!(f, "(")?;
                for (i, p) in sig.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") -> {}", sig.return_type)
            }
        }
    }
}
