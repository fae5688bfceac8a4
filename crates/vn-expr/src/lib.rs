mod eval;
mod rpn;
mod token;

pub use eval::{logical, numeric};
pub use token::{tokenize, Operator, Token};

use log::error;
use thiserror::Error;
use vn_core::Value;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    #[error("unknown operator \"{0}\"")]
    UnknownOperator(String),
    #[error("invalid number literal \"{0}\"")]
    InvalidNumber(String),
    #[error("mismatched parenthesis")]
    MismatchedParenthesis,
    #[error("operator \"{0}\" is missing an operand")]
    MissingOperand(&'static str),
    #[error("operator \"{op}\" cannot be applied to {operands}")]
    Unsupported { op: &'static str, operands: String },
}

pub fn try_evaluate(expression: &str) -> Result<Value, ExprError> {
    let tokens = tokenize(expression)?;
    let rpn = rpn::to_rpn(tokens)?;
    eval::run_rpn(rpn)
}

pub fn evaluate(expression: &str) -> Value {
    match try_evaluate(expression) {
        Ok(value) => value,
        Err(err) => {
            error!(target: "vn::expr", "failed to evaluate '{}': {}", expression, err);
            Value::Number(0.0)
        }
    }
}
