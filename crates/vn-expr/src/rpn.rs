use crate::token::Token;
use crate::ExprError;

pub fn to_rpn(tokens: Vec<Token>) -> Result<Vec<Token>, ExprError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) | Token::Str(_) | Token::Bool(_) => output.push(token),
            Token::Op(op) => {
                while let Some(Token::Op(top)) = ops.last() {
                    let top = *top;
                    let pops = if op.is_unary() {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if !pops {
                        break;
                    }
                    ops.pop();
                    output.push(Token::Op(top));
                }
                ops.push(Token::Op(op));
            }
            Token::OpenParen => ops.push(Token::OpenParen),
            Token::CloseParen => loop {
                match ops.pop() {
                    Some(Token::OpenParen) => break,
                    Some(other) => output.push(other),
                    None => return Err(ExprError::MismatchedParenthesis),
                }
            },
        }
    }

    while let Some(token) = ops.pop() {
        if token == Token::OpenParen {
            return Err(ExprError::MismatchedParenthesis);
        }
        output.push(token);
    }

    Ok(output)
}
