//! Type vocabulary shared between the syntax tree and the analysis passes.

use std::fmt;

/// The closed set of types a zabaan expression can have.
///
/// `Unknown` is the permissive placeholder used by gradual typing: it is
/// accepted wherever a concrete type is required and is never itself reported
/// as an error. `Nil` is reserved by the language surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Number,
    String,
    Boolean,
    Array,
    Object,
    Void,
    Nil,
    Unknown,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Number => "number",
            Type::String => "string",
            Type::Boolean => "boolean",
            Type::Array => "array",
            Type::Object => "object",
            Type::Void => "void",
            Type::Nil => "nil",
            Type::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Parameter and return types of a callable symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Type>,
    pub returns: Type,
}

fn sig(params: &[Type], returns: Type) -> FunctionSignature {
    FunctionSignature {
        params: params.to_vec(),
        returns,
    }
}

/// The fixed builtin functions every program can call.
///
/// `dekh`, `lou` and `band` are also keywords; the rest lex as plain
/// identifiers and resolve through the global scope like any other name.
pub fn builtin_signatures() -> Vec<(&'static str, FunctionSignature)> {
    vec![
        ("dekh", sig(&[Type::Unknown], Type::Void)),
        ("lou", sig(&[Type::String], Type::Number)),
        ("nikal", sig(&[Type::Unknown], Type::Number)),
        ("band", sig(&[], Type::Void)),
        ("abs", sig(&[Type::Number], Type::Number)),
        ("sqrt", sig(&[Type::Number], Type::Number)),
        ("pow", sig(&[Type::Number, Type::Number], Type::Number)),
        ("max", sig(&[Type::Number, Type::Number], Type::Number)),
        ("min", sig(&[Type::Number, Type::Number], Type::Number)),
        ("round", sig(&[Type::Number], Type::Number)),
        ("random", sig(&[], Type::Number)),
    ]
}
