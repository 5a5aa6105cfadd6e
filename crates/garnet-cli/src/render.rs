use owo_colors::OwoColorize;

use garnet_syntax::error::{Diagnostic, SyntaxErrorKind};

/// Prints `diag` to stderr with the offending source line.
///
/// `first_line` is the number the source's first line was parsed with, so
/// the line can be found again when `--line` shifted the numbering.
pub fn render_diagnostic(source: &str, first_line: usize, diag: &Diagnostic) {
    let kind = diag.kind();
    eprintln!(
        "{}: {}",
        format!("error[{}]", kind.id()).red().bold(),
        kind.summary().red()
    );
    eprintln!("  --> {}:{}", diag.file(), diag.line());
    if let Some(src_line) = diag
        .line()
        .checked_sub(first_line)
        .and_then(|index| source.lines().nth(index))
    {
        let gutter = format!("{:3} | ", diag.line());
        eprintln!("     |");
        eprintln!("{}{}", gutter.bright_black(), src_line);
        eprintln!("     |");
    }
    eprintln!("  = {}", diag.message());
    if let Some(help) = hint(kind, diag.message()) {
        eprintln!("{}", format!("Help: {}", help).yellow());
    }
}

/// A suggestion for the common mistakes behind each kind.
fn hint(kind: SyntaxErrorKind, message: &str) -> Option<&'static str> {
    let help = match kind {
        SyntaxErrorKind::StringHitsEof => "Check for a missing closing quote or delimiter.",
        SyntaxErrorKind::MultipleAssignmentInConditional => {
            "Assign before the condition, then test the variables."
        }
        SyntaxErrorKind::InvalidAssignment if message.contains("dynamic constant") => {
            "Constants cannot be assigned inside a method; use an instance variable."
        }
        SyntaxErrorKind::InvalidAssignment => "Keywords like self and nil cannot be assigned.",
        SyntaxErrorKind::VoidValueExpression => "A return cannot be used as a value.",
        SyntaxErrorKind::TopLevelReturn => "Return values only from inside a method body.",
        SyntaxErrorKind::GrammarError if message.contains("expecting 'end'") => {
            "Did you forget an 'end' keyword for a def, class or if statement?"
        }
        SyntaxErrorKind::GrammarError if message.contains("unexpected 'end'") => {
            "There is an 'end' without a matching opening keyword."
        }
        SyntaxErrorKind::UnknownEncoding | SyntaxErrorKind::NotAsciiCompatible => {
            "Use a magic comment like `# encoding: utf-8` on the first or second line."
        }
        _ => return None,
    };
    Some(help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_follow_the_message() {
        assert!(hint(SyntaxErrorKind::InvalidAssignment, "dynamic constant assignment")
            .is_some_and(|h| h.contains("instance variable")));
        assert!(hint(SyntaxErrorKind::InvalidAssignment, "Can't assign to nil")
            .is_some_and(|h| h.contains("Keywords")));
        assert!(hint(
            SyntaxErrorKind::GrammarError,
            "syntax error, unexpected end-of-input, expecting 'end'"
        )
        .is_some());
        assert_eq!(hint(SyntaxErrorKind::GrammarError, "syntax error, unexpected ','"), None);
    }
}
