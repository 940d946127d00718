//! Utilities for sanitizing error messages.
//!
//! Removes control characters from error messages before they are attached to a
//! result, and truncates very long ones.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Sanitizes an error message by removing control characters.
///
/// Control characters (0x00-0x1F, except newline/tab/carriage return) are removed;
/// everything else, including non-ASCII text, is kept.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| {
            let code = *c as u32;
            code >= 0x20 // Printable ASCII starts at 0x20 (space)
                || code == 0x09 // Tab
                || code == 0x0A // Newline
                || code == 0x0D // Carriage return
        })
        .filter(|c| *c != '\u{7F}')
        .collect()
}

/// Sanitizes and truncates an error message to `MAX_ERROR_MESSAGE_LENGTH` characters.
///
/// Truncated messages end with a note carrying the original length.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let length = sanitized.chars().count();

    if length > MAX_ERROR_MESSAGE_LENGTH {
        // Leave room for the truncation note
        let truncate_len = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
        let head: String = sanitized.chars().take(truncate_len).collect();
        format!(
            "{}... (truncated, original length: {} chars)",
            head, length
        )
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_error_message_removes_control_chars() {
        let input = "Error\x00message\x01with\x02control\x03chars\x7f";
        let output = sanitize_error_message(input);
        assert_eq!(output, "Errormessagewithcontrolchars");
    }

    #[test]
    fn test_sanitize_error_message_preserves_whitespace() {
        let input = "Error\nmessage\twith\r\nbreaks";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_sanitize_error_message_preserves_unicode() {
        let input = "Screenshot unavailable: 测试 🚀";
        assert_eq!(sanitize_error_message(input), input);
    }

    #[test]
    fn test_truncate_long_message_on_char_boundary() {
        let input = "é".repeat(MAX_ERROR_MESSAGE_LENGTH + 10);
        let output = sanitize_and_truncate_error_message(&input);
        assert!(output.starts_with("éé"));
        assert!(output.ends_with(&format!(
            "(truncated, original length: {} chars)",
            MAX_ERROR_MESSAGE_LENGTH + 10
        )));
        assert!(output.chars().count() < MAX_ERROR_MESSAGE_LENGTH);
    }

    #[test]
    fn test_short_message_untouched() {
        assert_eq!(sanitize_and_truncate_error_message("short"), "short");
    }
}
