use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ESC [ params final-letter; an unterminated sequence runs to the end of the line
    static ref CSI_RE: Regex = Regex::new(r"\x1b\[[^A-Za-z]*[A-Za-z]?").unwrap();
}

/// strip ANSI CSI sequences and control characters from producer output.
/// tabs become a single space so columns in logcat messages stay readable.
pub fn sanitize_control_chars(s: &str) -> String {
    CSI_RE
        .replace_all(s, "")
        .chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

/// true when the line has nothing but whitespace
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_control_chars() {
        let result = sanitize_control_chars("hello\rworld");
        assert_eq!(result, "helloworld");
    }

    #[test]
    fn test_sanitize_replaces_tab() {
        let result = sanitize_control_chars("hello\tworld");
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_sanitize_removes_ansi_escape() {
        let result = sanitize_control_chars("hello\x1b[31mworld");
        assert_eq!(result, "helloworld");
    }

    #[test]
    fn test_sanitize_removes_ansi_with_reset() {
        let result = sanitize_control_chars("hello\x1b[31mred\x1b[0mworld");
        assert_eq!(result, "helloredworld");
    }

    #[test]
    fn test_sanitize_drops_lone_escape_and_unterminated_sequence() {
        assert_eq!(sanitize_control_chars("a\x1bb"), "ab");
        assert_eq!(sanitize_control_chars("tail\x1b[38;5"), "tail");
    }

    #[test]
    fn test_sanitize_keeps_plain_text() {
        let line = "01-01 00:00:00.000 I/ReactNativeJS( 1234): 'hello'";
        assert_eq!(sanitize_control_chars(line), line);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("  \r"));
        assert!(!is_blank(" x "));
    }
}
