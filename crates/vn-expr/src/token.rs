use crate::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    Neg,
    Not,
}

impl Operator {
    const BINARY: [(&'static str, Operator); 13] = [
        ("+", Operator::Add),
        ("-", Operator::Sub),
        ("*", Operator::Mul),
        ("/", Operator::Div),
        ("%", Operator::Rem),
        ("<", Operator::Lt),
        (">", Operator::Gt),
        ("<=", Operator::Le),
        (">=", Operator::Ge),
        ("==", Operator::Eq),
        ("!=", Operator::Ne),
        ("&&", Operator::And),
        ("||", Operator::Or),
    ];

    pub fn binary(symbol: &str) -> Option<Self> {
        Self::BINARY
            .iter()
            .find(|(candidate, _)| *candidate == symbol)
            .map(|(_, op)| *op)
    }

    fn unary(symbol: char) -> Option<Self> {
        match symbol {
            '-' => Some(Self::Neg),
            '!' => Some(Self::Not),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Self::Neg | Self::Not => 9,
            Self::Mul | Self::Div | Self::Rem => 8,
            Self::Add | Self::Sub => 7,
            Self::Lt | Self::Gt | Self::Le | Self::Ge => 6,
            Self::Eq | Self::Ne => 5,
            Self::And => 4,
            Self::Or => 3,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(self, Self::Neg | Self::Not)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
            other => Self::BINARY
                .iter()
                .find(|(_, op)| *op == other)
                .map(|(symbol, _)| *symbol)
                .unwrap_or("?"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Bool(bool),
    Op(Operator),
    OpenParen,
    CloseParen,
}

fn is_operator_char(c: char) -> bool {
    "+-*/%&|!=<>".contains(c)
}

pub fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let chars = expr.chars().collect::<Vec<_>>();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '(' {
            tokens.push(Token::OpenParen);
            i += 1;
        } else if c == ')' {
            tokens.push(Token::CloseParen);
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            let text = chars[start..i].iter().collect::<String>();
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(text.clone()))?;
            tokens.push(Token::Number(value));
        } else if c == '"' {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != '"' {
                i += 1;
            }
            tokens.push(Token::Str(chars[start..i].iter().collect()));
            i += 1;
        } else if is_operator_char(c) {
            let start = i;
            while i < chars.len() && is_operator_char(chars[i]) {
                i += 1;
            }
            let run = chars[start..i].iter().collect::<String>();
            let prefix_position = matches!(
                tokens.last(),
                None | Some(Token::Op(_)) | Some(Token::OpenParen)
            );
            push_operator_run(&run, prefix_position, &mut tokens)?;
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word = chars[start..i].iter().collect::<String>();
            if word.eq_ignore_ascii_case("true") {
                tokens.push(Token::Bool(true));
            } else if word.eq_ignore_ascii_case("false") {
                tokens.push(Token::Bool(false));
            } else {
                tokens.push(Token::Str(word));
            }
        } else {
            i += 1;
        }
    }

    Ok(tokens)
}

// A greedy run such as `*-` or `&&!` is a binary operator followed by unary ones.
fn push_operator_run(
    run: &str,
    prefix_position: bool,
    tokens: &mut Vec<Token>,
) -> Result<(), ExprError> {
    let split_at = if prefix_position {
        Some(0)
    } else {
        (1..=run.len())
            .rev()
            .filter(|end| run.is_char_boundary(*end))
            .find(|end| {
                Operator::binary(&run[..*end]).is_some()
                    && run[*end..].chars().all(|c| Operator::unary(c).is_some())
            })
    };
    let Some(split_at) = split_at else {
        return Err(ExprError::UnknownOperator(run.to_string()));
    };

    if split_at > 0 {
        if let Some(op) = Operator::binary(&run[..split_at]) {
            tokens.push(Token::Op(op));
        }
    }
    for c in run[split_at..].chars() {
        let op = Operator::unary(c).ok_or_else(|| ExprError::UnknownOperator(run.to_string()))?;
        tokens.push(Token::Op(op));
    }
    Ok(())
}
