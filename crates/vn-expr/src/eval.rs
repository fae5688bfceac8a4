use vn_core::Value;

use crate::token::{Operator, Token};
use crate::ExprError;

const EPSILON: f64 = 0.0001;

pub fn run_rpn(rpn: Vec<Token>) -> Result<Value, ExprError> {
    let mut stack: Vec<Value> = Vec::new();

    for token in rpn {
        match token {
            Token::Number(value) => stack.push(Value::Number(value)),
            Token::Str(value) => stack.push(Value::String(value)),
            Token::Bool(value) => stack.push(Value::Bool(value)),
            Token::Op(op) if op.is_unary() => {
                let operand = stack
                    .pop()
                    .ok_or(ExprError::MissingOperand(op.symbol()))?;
                stack.push(apply_unary(op, operand)?);
            }
            Token::Op(op) => {
                if stack.len() < 2 {
                    return Err(ExprError::MissingOperand(op.symbol()));
                }
                let right = stack.pop().ok_or(ExprError::MissingOperand(op.symbol()))?;
                let left = stack.pop().ok_or(ExprError::MissingOperand(op.symbol()))?;
                stack.push(apply_binary(op, left, right)?);
            }
            Token::OpenParen | Token::CloseParen => return Err(ExprError::MismatchedParenthesis),
        }
    }

    Ok(stack.pop().unwrap_or(Value::Number(0.0)))
}

pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => Some(*number),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        Value::Bool(_) => None,
    }
}

pub fn logical(value: &Value) -> bool {
    match (value, numeric(value)) {
        (_, Some(number)) => number != 0.0,
        (Value::Bool(flag), None) => *flag,
        _ => false,
    }
}

fn apply_unary(op: Operator, operand: Value) -> Result<Value, ExprError> {
    match op {
        Operator::Neg => numeric(&operand)
            .map(|number| Value::Number(-number))
            .ok_or_else(|| ExprError::Unsupported {
                op: op.symbol(),
                operands: operand.type_name().to_string(),
            }),
        _ => Ok(Value::Bool(!logical(&operand))),
    }
}

fn apply_binary(op: Operator, left: Value, right: Value) -> Result<Value, ExprError> {
    if let (Some(a), Some(b)) = (numeric(&left), numeric(&right)) {
        let result = match op {
            Operator::Add => Some(Value::Number(a + b)),
            Operator::Sub => Some(Value::Number(a - b)),
            Operator::Mul => Some(Value::Number(a * b)),
            Operator::Div => Some(Value::Number(if b != 0.0 { a / b } else { 0.0 })),
            Operator::Rem => Some(Value::Number(if b != 0.0 { a % b } else { 0.0 })),
            Operator::Lt => Some(Value::Bool(a < b)),
            Operator::Gt => Some(Value::Bool(a > b)),
            Operator::Le => Some(Value::Bool(a <= b)),
            Operator::Ge => Some(Value::Bool(a >= b)),
            Operator::Eq => Some(Value::Bool((a - b).abs() < EPSILON)),
            Operator::Ne => Some(Value::Bool((a - b).abs() > EPSILON)),
            _ => None,
        };
        if let Some(result) = result {
            return Ok(result);
        }
    }

    match op {
        Operator::And => return Ok(Value::Bool(logical(&left) && logical(&right))),
        Operator::Or => return Ok(Value::Bool(logical(&left) || logical(&right))),
        _ => {}
    }

    match op {
        Operator::Add => Ok(Value::String(format!("{}{}", left, right))),
        Operator::Eq => Ok(Value::Bool(left.to_string() == right.to_string())),
        Operator::Ne => Ok(Value::Bool(left.to_string() != right.to_string())),
        _ => Err(ExprError::Unsupported {
            op: op.symbol(),
            operands: format!("{} and {}", left.type_name(), right.type_name()),
        }),
    }
}
