//! Helpers for Telegram MarkdownV2 messages.
//!
//! Every character in [`SPECIAL_CHARS`] must be escaped outside of entities,
//! otherwise Telegram rejects the whole message.

const SPECIAL_CHARS: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

/// Escapes text so it is displayed literally in MarkdownV2 mode.
///
/// ```
/// use guesthouse_bot::utils::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("01.03.2024 (2 nights)"), "01\\.03\\.2024 \\(2 nights\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL_CHARS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bold entity around escaped text.
pub fn bold(text: &str) -> String {
    format!("*{}*", escape_markdown(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dates_and_amounts() {
        assert_eq!(escape_markdown("05.03.2024"), "05\\.03\\.2024");
        assert_eq!(escape_markdown("+7 912 345-67-89"), "\\+7 912 345\\-67\\-89");
    }

    #[test]
    fn test_escape_guest_text() {
        assert_eq!(escape_markdown("Ivan_Petrov *VIP*"), "Ivan\\_Petrov \\*VIP\\*");
        assert_eq!(escape_markdown("[late] (after 22:00)!"), "\\[late\\] \\(after 22:00\\)\\!");
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_plain_text_untouched() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("Room 3 sea view"), "Room 3 sea view");
        assert_eq!(escape_markdown("Номер №5"), "Номер №5");
    }

    #[test]
    fn test_bold_escapes_content() {
        assert_eq!(bold("Booking #12"), "*Booking \\#12*");
    }
}
