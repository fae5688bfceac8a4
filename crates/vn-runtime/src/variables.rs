use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

pub trait VariableStore: Send {
    fn get(&self, name: &str) -> String;
    fn set(&mut self, name: &str, value: &str);
    fn reset(&mut self);
    fn entries(&self) -> BTreeMap<String, String>;
}

pub fn canonical_key(name: &str) -> String {
    let name = name.trim();
    if name.starts_with('$') {
        name.to_string()
    } else {
        format!("${}", name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryVariables {
    values: BTreeMap<String, String>,
}

impl MemoryVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        let values = entries
            .into_iter()
            .map(|(name, value)| (canonical_key(&name), value))
            .collect();
        Self { values }
    }
}

impl VariableStore for MemoryVariables {
    fn get(&self, name: &str) -> String {
        self.values
            .get(&canonical_key(name))
            .cloned()
            .unwrap_or_default()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.values.insert(canonical_key(name), value.to_string());
    }

    fn reset(&mut self) {
        self.values.clear();
    }

    fn entries(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\{\$([a-zA-Z0-9_]+)\}").expect("placeholder regex must compile")
    })
}

pub fn interpolate(store: &dyn VariableStore, text: &str) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &Captures<'_>| store.get(&caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_canonicalized_with_dollar_prefix() {
        let mut store = MemoryVariables::new();
        store.set("score", "10");
        assert_eq!(store.get("$score"), "10");
        store.set("$name", "Aki");
        assert_eq!(store.get("name"), "Aki");
        assert_eq!(
            store.entries().keys().cloned().collect::<Vec<_>>(),
            vec!["$name".to_string(), "$score".to_string()]
        );
    }

    #[test]
    fn unknown_variables_read_as_empty() {
        let store = MemoryVariables::new();
        assert_eq!(store.get("missing"), "");
    }

    #[test]
    fn reset_clears_all_bindings() {
        let mut store = MemoryVariables::from_entries(BTreeMap::from([(
            "flag".to_string(),
            "true".to_string(),
        )]));
        assert_eq!(store.get("$flag"), "true");
        store.reset();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn interpolation_is_a_single_pass() {
        let mut store = MemoryVariables::new();
        store.set("a", "{$b}");
        store.set("b", "deep");
        store.set("score", "15");
        assert_eq!(interpolate(&store, "{$a}"), "{$b}");
        assert_eq!(interpolate(&store, "{$score} > 10"), "15 > 10");
        assert_eq!(interpolate(&store, "hi {$nobody}!"), "hi !");
        assert_eq!(interpolate(&store, "{$bad-name}"), "{$bad-name}");
    }
}
