use std::sync::OnceLock;

use regex::Regex;
use vn_core::ScriptLine;

fn label_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\[(\w+)\]$").expect("label regex must compile"))
}

fn command_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^@(\w+)(?:\s+(.*))?$").expect("command regex must compile"))
}

fn dialogue_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"^([^:"]+):\s*(.*)$"#).expect("dialogue regex must compile")
    })
}

fn bare_dialogue_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"^"(.*)"$"#).expect("bare dialogue regex must compile"))
}

pub fn is_comment(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//")
}

pub fn classify_line(raw: &str) -> ScriptLine {
    let line = raw.trim();
    if is_comment(line) {
        return ScriptLine::Comment;
    }

    if let Some(caps) = label_regex().captures(line) {
        return ScriptLine::Label {
            name: caps[1].to_string(),
        };
    }

    if let Some(caps) = command_regex().captures(line) {
        return ScriptLine::Command {
            name: caps[1].to_lowercase(),
            args: caps
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
        };
    }

    if let Some(caps) = dialogue_regex().captures(line) {
        return ScriptLine::Dialogue {
            speaker: Some(caps[1].trim().to_string()),
            text: strip_surrounding_quotes(caps[2].trim()).to_string(),
        };
    }

    if let Some(caps) = bare_dialogue_regex().captures(line) {
        return ScriptLine::Dialogue {
            speaker: None,
            text: caps[1].to_string(),
        };
    }

    ScriptLine::Unknown {
        raw: line.to_string(),
    }
}

pub fn strip_surrounding_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}
