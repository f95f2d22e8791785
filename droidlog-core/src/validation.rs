use crate::error::ValidationError;
use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_PACKAGE_NAME_LEN: usize = 100;

lazy_static! {
    static ref PACKAGE_NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").unwrap();
}

/// validate a package name typed by the user, returning it trimmed
pub fn validate_package_name(input: &str) -> Result<&str, ValidationError> {
    let name = input.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty);
    }
    let len = name.chars().count();
    if len > MAX_PACKAGE_NAME_LEN {
        return Err(ValidationError::TooLong {
            len,
            max: MAX_PACKAGE_NAME_LEN,
        });
    }
    if PACKAGE_NAME_RE.is_match(name) {
        return Ok(name);
    }

    // report the first offending character
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_alphabetic() => Err(ValidationError::InvalidStart(first)),
        _ => {
            let bad = chars
                .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
                .unwrap_or('?');
            Err(ValidationError::InvalidCharacter(bad))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_leading_digit() {
        assert_eq!(
            validate_package_name("123bad"),
            Err(ValidationError::InvalidStart('1'))
        );
    }

    #[test]
    fn test_accepts_dots_and_hyphens() {
        assert_eq!(
            validate_package_name("com.example.app-2"),
            Ok("com.example.app-2")
        );
        assert_eq!(validate_package_name("  com.foo_bar  "), Ok("com.foo_bar"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_package_name("   "), Err(ValidationError::Empty));
    }

    #[test]
    fn test_rejects_spaces_inside() {
        assert_eq!(
            validate_package_name("com.example app"),
            Err(ValidationError::InvalidCharacter(' '))
        );
    }

    #[test]
    fn test_length_limit() {
        let ok = format!("a{}", "b".repeat(MAX_PACKAGE_NAME_LEN - 1));
        assert!(validate_package_name(&ok).is_ok());

        let too_long = format!("a{}", "b".repeat(MAX_PACKAGE_NAME_LEN));
        assert_eq!(
            validate_package_name(&too_long),
            Err(ValidationError::TooLong {
                len: MAX_PACKAGE_NAME_LEN + 1,
                max: MAX_PACKAGE_NAME_LEN
            })
        );
    }
}
