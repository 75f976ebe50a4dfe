//! Pure type-checking predicates, transcribed branch-for-branch from
//! `original_source/src/robin/semantic/type_checker.cpp`. Every function
//! here is side-effect free: given the same inputs it always returns the
//! same `PrimType` (or `Undefined` for a type error), with no access to
//! the scope stack or any diagnostic state.

use crate::ast::{AdditiveOp, EqualityOp, MultiplicativeOp, RelationalOp, UnaryOp};
use crate::symbol::PrimType;

pub fn is_number(t: PrimType) -> bool {
    matches!(t, PrimType::Integer | PrimType::Float)
}

/// `x = y`, given the two sides' dimensions: `dim_left != dim_right` is
/// always a mismatch regardless of base type.
pub fn is_valid_assign(left: PrimType, right: PrimType, dim_left: usize, dim_right: usize) -> PrimType {
    if dim_left != dim_right {
        return PrimType::Undefined;
    }
    if (left == PrimType::Boolean || right == PrimType::Boolean) && left != right {
        return PrimType::Undefined;
    }
    if (left == PrimType::String || right == PrimType::String) && left != right {
        return PrimType::Undefined;
    }
    if right == PrimType::Float {
        return right;
    }
    left
}

pub fn is_valid_or_and(left: PrimType, right: PrimType) -> PrimType {
    if left != PrimType::Boolean || right != PrimType::Boolean {
        return PrimType::Undefined;
    }
    PrimType::Boolean
}

pub fn is_valid_equality(left: PrimType, right: PrimType) -> PrimType {
    if (left == PrimType::Boolean || right == PrimType::Boolean) && left != right {
        return PrimType::Undefined;
    }
    if (left == PrimType::String || right == PrimType::String) && left != right {
        return PrimType::Undefined;
    }
    PrimType::Boolean
}

pub fn is_valid_relational(left: PrimType, right: PrimType) -> PrimType {
    if is_number(left) && is_number(right) {
        return PrimType::Boolean;
    }
    PrimType::Undefined
}

pub fn is_valid_addition(left: PrimType, right: PrimType, op: AdditiveOp) -> PrimType {
    match op {
        AdditiveOp::Add => {
            if left == PrimType::String || right == PrimType::String {
                if left != right {
                    return PrimType::Undefined;
                }
            } else if !is_number(left) || !is_number(right) {
                return PrimType::Undefined;
            }
        }
        AdditiveOp::Sub => {
            if !is_number(left) || !is_number(right) {
                return PrimType::Undefined;
            }
        }
    }

    if left == right {
        return left;
    }
    PrimType::Float
}

pub fn is_valid_multiplicative(left: PrimType, right: PrimType, op: MultiplicativeOp) -> PrimType {
    if op == MultiplicativeOp::Mod {
        if left != PrimType::Integer || right != PrimType::Integer {
            return PrimType::Undefined;
        }
        return PrimType::Integer;
    }

    if !is_number(left) || !is_number(right) {
        return PrimType::Undefined;
    }

    if left == right {
        return left;
    }
    PrimType::Float
}

pub fn is_valid_unary(operand: PrimType, op: UnaryOp, dim: usize) -> PrimType {
    match op {
        UnaryOp::Neg => {
            if !is_number(operand) {
                return PrimType::Undefined;
            }
            operand
        }
        UnaryOp::Not => {
            if operand != PrimType::Boolean {
                return PrimType::Undefined;
            }
            operand
        }
        UnaryOp::Increment | UnaryOp::Decrement => {
            if !is_number(operand) {
                return PrimType::Undefined;
            }
            operand
        }
        UnaryOp::Stringify => PrimType::String,
        UnaryOp::Booleanize => PrimType::Boolean,
        UnaryOp::Round => {
            if !is_number(operand) && operand != PrimType::Boolean {
                return PrimType::Undefined;
            }
            PrimType::Integer
        }
        UnaryOp::Length => {
            if dim == 0 && operand != PrimType::String {
                return PrimType::Undefined;
            }
            PrimType::Integer
        }
    }
}

pub fn is_valid_equality_kind(left: PrimType, right: PrimType, _op: EqualityOp) -> PrimType {
    is_valid_equality(left, right)
}

pub fn is_valid_relational_kind(left: PrimType, right: PrimType, _op: RelationalOp) -> PrimType {
    is_valid_relational(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrimType::*;

    #[test]
    fn assign_rejects_dimension_mismatch() {
        assert_eq!(is_valid_assign(Integer, Integer, 0, 1), Undefined);
    }

    #[test]
    fn assign_widens_integer_to_float_on_float_rhs() {
        assert_eq!(is_valid_assign(Integer, Float, 0, 0), Float);
    }

    #[test]
    fn assign_rejects_boolean_with_non_boolean() {
        assert_eq!(is_valid_assign(Boolean, Integer, 0, 0), Undefined);
    }

    #[test]
    fn or_and_require_both_booleans() {
        assert_eq!(is_valid_or_and(Boolean, Boolean), Boolean);
        assert_eq!(is_valid_or_and(Boolean, Integer), Undefined);
    }

    #[test]
    fn equality_rejects_string_vs_non_string() {
        assert_eq!(is_valid_equality(String, Integer), Undefined);
        assert_eq!(is_valid_equality(String, String), Boolean);
    }

    #[test]
    fn relational_requires_numbers() {
        assert_eq!(is_valid_relational(Integer, Float), Boolean);
        assert_eq!(is_valid_relational(String, Integer), Undefined);
    }

    #[test]
    fn addition_allows_string_concat_only_same_type() {
        assert_eq!(is_valid_addition(String, String, AdditiveOp::Add), String);
        assert_eq!(is_valid_addition(String, Integer, AdditiveOp::Add), Undefined);
    }

    #[test]
    fn addition_promotes_mixed_numbers_to_float() {
        assert_eq!(is_valid_addition(Integer, Float, AdditiveOp::Add), Float);
        assert_eq!(is_valid_addition(Integer, Integer, AdditiveOp::Sub), Integer);
    }

    #[test]
    fn modulo_requires_integer_operands() {
        assert_eq!(is_valid_multiplicative(Integer, Integer, MultiplicativeOp::Mod), Integer);
        assert_eq!(is_valid_multiplicative(Float, Integer, MultiplicativeOp::Mod), Undefined);
    }

    #[test]
    fn unary_length_requires_string_only_when_scalar() {
        assert_eq!(is_valid_unary(String, UnaryOp::Length, 0), Integer);
        assert_eq!(is_valid_unary(Integer, UnaryOp::Length, 0), Undefined);
        assert_eq!(is_valid_unary(Integer, UnaryOp::Length, 1), Integer);
    }

    #[test]
    fn unary_round_accepts_numbers_and_booleans() {
        assert_eq!(is_valid_unary(Boolean, UnaryOp::Round, 0), Integer);
        assert_eq!(is_valid_unary(String, UnaryOp::Round, 0), Undefined);
    }
}
