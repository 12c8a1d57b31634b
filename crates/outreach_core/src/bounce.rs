//! Bounce reason classification.

use crate::CellValue;

/// Tokens that mean "no bounce reason" when they are the whole cell.
const EMPTY_TOKENS: &[&str] = &["none", "null"];

/// Whether a cell carries a real bounce reason.
///
/// Blank cells, the not-a-number sentinel, whitespace-only text and the
/// literal tokens `none` / `null` (any case) do not.
///
/// # Examples
///
/// ```
/// use outreach_core::{CellValue, is_nonempty_bounce_reason};
///
/// assert!(is_nonempty_bounce_reason(&CellValue::from("Mailbox full")));
/// assert!(!is_nonempty_bounce_reason(&CellValue::from("  NULL ")));
/// assert!(!is_nonempty_bounce_reason(&CellValue::Number(f64::NAN)));
/// ```
pub fn is_nonempty_bounce_reason(cell: &CellValue) -> bool {
    if cell.is_missing() {
        return false;
    }
    let text = cell.to_string();
    let text = text.trim();
    !text.is_empty()
        && !EMPTY_TOKENS
            .iter()
            .any(|token| text.eq_ignore_ascii_case(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_rejected() {
        let sentinels = [
            CellValue::Null,
            CellValue::Number(f64::NAN),
            CellValue::from(""),
            CellValue::from("   "),
            CellValue::from("none"),
            CellValue::from("None"),
            CellValue::from("NONE"),
            CellValue::from("null"),
            CellValue::from(" Null\t"),
        ];
        for cell in &sentinels {
            assert!(!is_nonempty_bounce_reason(cell), "{:?} should not qualify", cell);
        }
    }

    #[test]
    fn test_real_reasons_are_accepted() {
        assert!(is_nonempty_bounce_reason(&CellValue::from("Invalid address")));
        assert!(is_nonempty_bounce_reason(&CellValue::from("none of the above")));
        assert!(is_nonempty_bounce_reason(&CellValue::Number(550.0)));
        assert!(is_nonempty_bounce_reason(&CellValue::Bool(false)));
    }
}
