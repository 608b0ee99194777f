/// Collapses `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Exact comparison modulo line endings and, optionally, letter case.
///
/// There is no whitespace trimming or numeric tolerance: callers that need a
/// looser check must normalise both sides before calling this.
pub fn compare(expected: &str, actual: &str, case_sensitive: bool) -> bool {
    let expected = normalize_line_endings(expected);
    let actual = normalize_line_endings(actual);

    if case_sensitive {
        expected == actual
    } else {
        expected.to_lowercase() == actual.to_lowercase()
    }
}
