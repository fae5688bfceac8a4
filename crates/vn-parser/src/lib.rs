mod line;

pub use line::{classify_line, is_comment, strip_surrounding_quotes};

use std::collections::BTreeMap;

use log::{debug, warn};
use vn_core::{Diagnostic, DiagnosticKind, Program, ProgramLine, ScriptLine};

pub fn compile_program(script_name: &str, source: &str) -> Program {
    let mut lines = Vec::new();
    let mut labels = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for (source_index, physical) in source.split('\n').enumerate() {
        let source_line = source_index + 1;
        for piece in physical.split('\r').filter(|piece| !piece.is_empty()) {
            let index = lines.len();
            let line = classify_line(piece);
            match &line {
                ScriptLine::Label { name } => {
                    if labels.contains_key(name) {
                        warn!(
                            target: "vn::parser",
                            "{}:{}: duplicate label \"{}\" ignored, first definition wins",
                            script_name, source_line, name
                        );
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::Parse,
                            "PARSE_DUPLICATE_LABEL",
                            format!(
                                "Label \"{}\" at source line {} is already defined.",
                                name, source_line
                            ),
                            Some(index),
                        ));
                    } else {
                        labels.insert(name.clone(), index);
                    }
                }
                ScriptLine::Unknown { raw } => {
                    warn!(
                        target: "vn::parser",
                        "{}:{}: unrecognized line \"{}\"",
                        script_name, source_line, raw
                    );
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::Parse,
                        "PARSE_UNKNOWN_LINE",
                        format!("Unrecognized line at source line {}: {}", source_line, raw),
                        Some(index),
                    ));
                }
                _ => {}
            }
            lines.push(ProgramLine {
                line,
                raw: piece.trim().to_string(),
                source_line,
            });
        }
    }

    debug!(
        target: "vn::parser",
        "compiled \"{}\": {} lines, {} labels",
        script_name,
        lines.len(),
        labels.len()
    );

    Program {
        script_name: script_name.to_string(),
        lines,
        labels,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_empty_entries_and_keeps_order() {
        let program = compile_program("main", "[Start]\r\n\r\n@log hi\nNarrator: \"Hello\"\n");
        let kinds = program
            .lines
            .iter()
            .map(|line| line.line.kind_name())
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec!["label", "command", "dialogue"]);
        assert_eq!(program.lines[1].source_line, 3);
        assert_eq!(program.lines[2].source_line, 4);
        assert_eq!(program.script_name, "main");
    }

    #[test]
    fn whitespace_only_lines_stay_as_comments() {
        let program = compile_program("main", "@log a\n   \n@log b");
        assert_eq!(program.len(), 3);
        assert_eq!(program.lines[1].line, ScriptLine::Comment);
    }

    #[test]
    fn first_label_definition_wins() {
        let program = compile_program("main", "[A]\n@log one\n[A]\n@log two\n[B]");
        assert_eq!(program.label_index("A"), Some(0));
        assert_eq!(program.label_index("B"), Some(4));
        assert_eq!(program.labels.len(), 2);
        assert_eq!(program.diagnostics.len(), 1);
        assert_eq!(program.diagnostics[0].code, "PARSE_DUPLICATE_LABEL");
        assert_eq!(program.diagnostics[0].line, Some(2));
    }

    #[test]
    fn unknown_lines_are_kept_and_reported() {
        let program = compile_program("main", "hello world\n@log ok");
        assert_eq!(program.len(), 2);
        assert!(matches!(program.lines[0].line, ScriptLine::Unknown { .. }));
        assert_eq!(program.diagnostics[0].kind, DiagnosticKind::Parse);
        assert_eq!(program.diagnostics[0].code, "PARSE_UNKNOWN_LINE");
    }

    #[test]
    fn lone_carriage_returns_split_lines() {
        let program = compile_program("main", "@log a\r@log b");
        assert_eq!(program.len(), 2);
        assert_eq!(program.lines[1].source_line, 1);
        assert_eq!(program.lines[1].raw, "@log b");
    }

    #[test]
    fn empty_source_compiles_to_empty_program() {
        let program = compile_program("empty", "");
        assert!(program.is_empty());
        assert!(program.diagnostics.is_empty());
    }
}
