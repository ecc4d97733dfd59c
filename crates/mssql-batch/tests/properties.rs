//! Property-based tests for the batch splitter.

#![allow(clippy::unwrap_used)]

use mssql_batch::split_statements;
use proptest::prelude::*;

/// Statement text that cannot contain a separator line: the characters `g`
/// and `o` are excluded entirely, so no line can spell the token.
fn statement_text() -> impl Strategy<Value = String> {
    "[a-fh-np-zA-FH-NP-Z0-9 ,.;()'*=<>\\-\n\t]{0,60}"
}

/// One of the separator spellings the splitter must recognize.
fn separator_line() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("GO"),
        Just("go"),
        Just("Go"),
        Just("  GO  "),
        Just("\tgo\t"),
    ]
}

proptest! {
    /// An input with no separator line splits to itself, unless it is
    /// whitespace-only, in which case nothing is returned.
    #[test]
    fn input_without_separator_is_singleton(input in statement_text()) {
        let statements = split_statements(&input);
        if input.trim().is_empty() {
            prop_assert!(statements.is_empty());
        } else {
            prop_assert_eq!(statements, vec![input.as_str()]);
        }
    }

    /// Assembling a script from statements and separator lines, then
    /// splitting it, recovers exactly the non-whitespace statements in
    /// their original order. Boundary whitespace is attributed to the
    /// separator match, so statements are compared trimmed.
    #[test]
    fn split_recovers_assembled_statements(
        statements in prop::collection::vec(statement_text(), 0..8),
        separator in separator_line(),
        crlf in any::<bool>(),
    ) {
        let newline = if crlf { "\r\n" } else { "\n" };
        let mut script = String::new();
        for statement in &statements {
            script.push_str(statement);
            script.push_str(newline);
            script.push_str(separator);
            script.push_str(newline);
        }

        let expected: Vec<&str> = statements
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        let actual: Vec<&str> = split_statements(&script)
            .into_iter()
            .map(str::trim)
            .collect();

        prop_assert_eq!(actual, expected);
    }

    /// Splitting is idempotent: every returned fragment contains no
    /// separator line, so re-splitting it yields the fragment itself.
    #[test]
    fn resplitting_a_fragment_is_identity(input in "[a-zA-Z0-9 'GOgo\n\r\t]{0,80}") {
        for fragment in split_statements(&input) {
            prop_assert_eq!(split_statements(fragment), vec![fragment]);
        }
    }

    /// Fragments appear in input order as disjoint substrings: walking the
    /// input with a cursor finds each fragment at or after the end of the
    /// previous one (the partition loses nothing but separators and
    /// whitespace-only pieces).
    #[test]
    fn fragments_are_ordered_disjoint_substrings(input in "[a-zA-Z0-9 'GOgo\n\r\t]{0,80}") {
        let mut cursor = 0;
        for fragment in split_statements(&input) {
            let found = input[cursor..].find(fragment);
            prop_assert!(found.is_some());
            cursor += found.unwrap() + fragment.len();
        }
    }
}
