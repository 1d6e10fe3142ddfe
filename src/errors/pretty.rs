use crate::compiler::CompileError;
use crate::parser::ParseError;

pub fn underline(line: &str, column: usize) -> String {
    let mut marker = String::new();
    for _ in 1..column {
        marker.push(' ');
    }
    marker.push('^');
    format!("{}\n{}", line, marker)
}

/// Renders a parse error with its location and the offending source line.
pub fn format_parse_error(source_label: &str, source: &str, err: &ParseError) -> String {
    let mut rendered = format!(
        "error: {}\n--> {}:{}:{}",
        err.message, source_label, err.line, err.column
    );
    if let Some(line) = err.line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
        rendered.push('\n');
        rendered.push_str(&underline(line, err.column));
    }
    rendered
}

pub fn format_parse_errors(source_label: &str, source: &str, errors: &[ParseError]) -> Vec<String> {
    errors
        .iter()
        .map(|err| format_parse_error(source_label, source, err))
        .collect()
}

/// One rendered block per underlying failure.
pub fn format_compile_error(source_label: &str, source: &str, err: &CompileError) -> Vec<String> {
    match err {
        CompileError::Parse(errors) => format_parse_errors(source_label, source, errors),
        CompileError::Semantic(errors) => errors
            .iter()
            .map(|err| format!("error: {}\n--> {}", err, source_label))
            .collect(),
        other => vec![format!("error: {}", other)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn underline_points_at_column() {
        assert_eq!(underline("abc", 3), "abc\n  ^");
    }

    #[test]
    fn parse_error_shows_source_line() {
        let source = "float x = 1.0;\nfloat y = ;\n";
        let outcome = parse(source);
        let err = outcome.errors.first().expect("one error");
        let rendered = format_parse_error("input.sdl", source, err);
        assert!(rendered.starts_with("error: Expected expression\n--> input.sdl:2:11"));
        assert!(rendered.ends_with("float y = ;\n          ^"));
    }
}
