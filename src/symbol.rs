//! Symbol model, ported from `original_source/include/symbol.h`.

use std::fmt;

/// A primitive type, plus the two sentinel values the original uses for
/// the program's own pseudo-symbol (`Program`) and for a symbol that
/// could not be typed because of an earlier fault (`Undefined`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimType {
    Integer,
    Boolean,
    Float,
    String,
    Void,
    Program,
    Undefined,
}

impl PrimType {
    pub fn from_keyword(word: &str) -> Option<PrimType> {
        match word {
            "integer" => Some(PrimType::Integer),
            "boolean" => Some(PrimType::Boolean),
            "float" => Some(PrimType::Float),
            "string" => Some(PrimType::String),
            "void" => Some(PrimType::Void),
            _ => None,
        }
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimType::Integer => "integer",
            PrimType::Boolean => "boolean",
            PrimType::Float => "float",
            PrimType::String => "string",
            PrimType::Void => "void",
            PrimType::Program => "program",
            PrimType::Undefined => "undefined",
        };
        write!(f, "{}", name)
    }
}

/// A declared function parameter's or variable's type: base primitive
/// plus array dimension (`0` for a scalar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeName {
    pub base: PrimType,
    pub dim: usize,
}

impl TypeName {
    pub fn scalar(base: PrimType) -> Self {
        TypeName { base, dim: 0 }
    }
}

/// A variable binding: its declared type plus whether it has been
/// assigned a value yet (spec's initialization-before-use rule).
#[derive(Debug, Clone)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: TypeName,
    pub initialized: bool,
}

/// A function binding: its return type plus the parameter signature used
/// for both arity/type checking of calls (`parameters`) and for computing
/// the minimum required argument count (`required`, the count of
/// declaration-form — non-defaulted — parameters).
#[derive(Debug, Clone)]
pub struct FunctionSymbol {
    pub name: String,
    pub return_type: TypeName,
    pub parameters: Vec<TypeName>,
    pub required: usize,
}

/// The placeholder bound in place of a symbol once the first semantic
/// fault has been latched, so later lookups of the same name don't cause
/// a cascade of unrelated errors.
#[derive(Debug, Clone)]
pub struct ErrorSymbol {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Symbol {
    Variable(VariableSymbol),
    Function(FunctionSymbol),
    Error(ErrorSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Variable(v) => &v.name,
            Symbol::Function(f) => &f.name,
            Symbol::Error(e) => &e.name,
        }
    }

    pub fn type_of(&self) -> TypeName {
        match self {
            Symbol::Variable(v) => v.ty,
            Symbol::Function(f) => f.return_type,
            Symbol::Error(_) => TypeName::scalar(PrimType::Undefined),
        }
    }

    pub fn as_variable(&self) -> Option<&VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut VariableSymbol> {
        match self {
            Symbol::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSymbol> {
        match self {
            Symbol::Function(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prim_type_from_keyword_round_trips_display() {
        for word in ["integer", "boolean", "float", "string", "void"] {
            let ty = PrimType::from_keyword(word).unwrap();
            assert_eq!(ty.to_string(), word);
        }
    }

    #[test]
    fn unknown_keyword_is_not_a_prim_type() {
        assert!(PrimType::from_keyword("program").is_none());
    }

    #[test]
    fn error_symbol_types_as_undefined() {
        let sym = Symbol::Error(ErrorSymbol {
            name: "x".into(),
            message: "bad".into(),
        });
        assert_eq!(sym.type_of(), TypeName::scalar(PrimType::Undefined));
    }
}
