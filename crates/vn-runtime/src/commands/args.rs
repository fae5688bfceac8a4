// Splits on whitespace outside double quotes; quotes stay in the pieces.
pub fn split_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in args.chars() {
        if c == '"' {
            quoted = !quoted;
            current.push(c);
        } else if c.is_whitespace() && !quoted {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

pub fn unquote(text: &str) -> &str {
    text.trim().trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_words_stay_together() {
        assert_eq!(
            split_args(r#""Main Hall" "Open Door"  key"#),
            vec![r#""Main Hall""#, r#""Open Door""#, "key"]
        );
        assert_eq!(
            split_args(r#""Knight" pos:1,2 alias:"Sir Kay""#),
            vec![r#""Knight""#, "pos:1,2", r#"alias:"Sir Kay""#]
        );
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn unquote_trims_every_surrounding_quote() {
        assert_eq!(unquote(r#" "bg_forest" "#), "bg_forest");
        assert_eq!(unquote(r#"""x"""#), "x");
        assert_eq!(unquote("plain"), "plain");
    }
}
