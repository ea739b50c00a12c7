//! Error kinds the complex-lowering pass can halt on.

use thiserror::Error;

use crate::ast::{SourceContext, UnaryOp};

/// A compile error raised by the complex-lowering pass. Both variants are fatal: the pass stops
/// rewriting and the offending node's context is reported to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComplexLowerError {
    /// Any unary operator other than `negate` applied to a complex-valued operand.
    #[error("{context}: unsupported unary operator {op:?} on a complex-valued operand")]
    UnsupportedUnaryOnComplex {
        context: SourceContext,
        op: UnaryOp,
    },

    /// Any binary operator other than add/subtract/multiply/divide/equals/notEquals applied to
    /// complex-valued operands.
    #[error("{context}: illegal binary operator on complex-valued operands")]
    IllegalBinaryOnComplex { context: SourceContext },
}

impl ComplexLowerError {
    pub fn context(&self) -> &SourceContext {
        match self {
            ComplexLowerError::UnsupportedUnaryOnComplex { context, .. } => context,
            ComplexLowerError::IllegalBinaryOnComplex { context, .. } => context,
        }
    }
}
