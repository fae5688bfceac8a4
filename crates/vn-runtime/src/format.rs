use std::sync::OnceLock;

use regex::Regex;

fn furigana_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\{([^|]+)\|([^}]+)\}").expect("furigana regex must compile"))
}

fn bold_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold regex must compile"))
}

fn italic_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("italic regex must compile"))
}

// Bold runs before italic so `**` is never read as two italic markers.
pub fn format_rich_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = furigana_regex().replace_all(text, "<ruby=\"$2\">$1</ruby>");
    let text = bold_regex().replace_all(&text, "<b>$1</b>");
    italic_regex().replace_all(&text, "<i>$1</i>").into_owned()
}
