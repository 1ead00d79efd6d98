//! # flow — "flowing number" change highlight
//!
//! Each displayed field owns one [`FlowingNumber`].  When its formatted text
//! changes, every char from the first divergent position onward is marked
//! for a hold period (600 ms by default), then the mark clears.  Fields are
//! fully independent: each has its own divergence point and deadline.
//!
//! ```text
//! "29,850,000" → "29,851,000"
//!        ^^^^^ marked (from index 5)
//! ```

use std::time::{Duration, Instant};

/// Char index of the first position where `new` differs from `old`.
///
/// `None` when the strings are equal, or when `new` is a strict prefix of
/// `old` (nothing left in `new` to mark).
pub fn first_divergence(old: &str, new: &str) -> Option<usize> {
    if old == new {
        return None;
    }
    let mut old_chars = old.chars();
    new.chars()
        .enumerate()
        .find(|(_, c)| old_chars.next() != Some(*c))
        .map(|(i, _)| i)
}

#[derive(Debug, Clone)]
pub struct FlowingNumber {
    text:           String,
    highlight_from: Option<usize>,
    expires_at:     Option<Instant>,
}

impl FlowingNumber {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text:           text.into(),
            highlight_from: None,
            expires_at:     None,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text; a divergence restarts the hold timer.
    pub fn update(&mut self, text: String, now: Instant, hold: Duration) {
        if let Some(index) = first_divergence(&self.text, &text) {
            self.highlight_from = Some(index);
            self.expires_at     = Some(now + hold);
        }
        self.text = text;
    }

    /// First marked char index, if the mark is still live at `now`.
    pub fn highlight_from(&self, now: Instant) -> Option<usize> {
        match (self.highlight_from, self.expires_at) {
            (Some(index), Some(deadline)) if now < deadline => Some(index),
            _ => None,
        }
    }

    /// `(steady, changed)` halves of the text at `now`.
    pub fn split(&self, now: Instant) -> (&str, &str) {
        let Some(index) = self.highlight_from(now) else {
            return (&self.text, "");
        };
        let byte = self
            .text
            .char_indices()
            .nth(index)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len());
        self.text.split_at(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(600);

    #[test]
    fn test_last_digit_change() {
        assert_eq!(first_divergence("29850000", "29850001"), Some(7));
    }

    #[test]
    fn test_divergence_edge_cases() {
        assert_eq!(first_divergence("3.35", "3.35"), None);
        assert_eq!(first_divergence("3.35", "4.35"), Some(0));
        // Longer new value: the extra chars are the change.
        assert_eq!(first_divergence("999", "1,000"), Some(0));
        assert_eq!(first_divergence("12", "123"), Some(2));
        // Shorter new value that is a prefix: nothing to mark.
        assert_eq!(first_divergence("123", "12"), None);
        // Multi-byte chars count as one position.
        assert_eq!(first_divergence("රු.10", "රු.11"), Some(4));
    }

    #[test]
    fn test_highlight_clears_after_hold() {
        let t0 = Instant::now();
        let mut field = FlowingNumber::new("29,850,000");

        field.update("29,850,001".into(), t0, HOLD);

        assert_eq!(field.highlight_from(t0), Some(9));
        assert_eq!(field.split(t0), ("29,850,00", "1"));
        assert_eq!(field.highlight_from(t0 + Duration::from_millis(599)), Some(9));
        assert_eq!(field.highlight_from(t0 + HOLD), None);
        assert_eq!(field.split(t0 + HOLD), ("29,850,001", ""));
    }

    #[test]
    fn test_new_change_restarts_timer() {
        let t0 = Instant::now();
        let mut field = FlowingNumber::new("100");

        field.update("101".into(), t0, HOLD);
        let t1 = t0 + Duration::from_millis(400);
        field.update("111".into(), t1, HOLD);

        assert_eq!(field.highlight_from(t0 + Duration::from_millis(700)), Some(1));
        assert_eq!(field.highlight_from(t1 + HOLD), None);
    }

    #[test]
    fn test_unchanged_text_keeps_running_timer() {
        let t0 = Instant::now();
        let mut field = FlowingNumber::new("100");

        field.update("101".into(), t0, HOLD);
        field.update("101".into(), t0 + Duration::from_millis(300), HOLD);

        assert_eq!(field.expires_at, Some(t0 + HOLD));
    }

    #[test]
    fn test_fields_are_independent() {
        let t0 = Instant::now();
        let mut price = FlowingNumber::new("98,500");
        let mut height = FlowingNumber::new("875,000");

        price.update("98,512".into(), t0, HOLD);
        height.update("875,000".into(), t0, HOLD);

        assert_eq!(price.highlight_from(t0), Some(4));
        assert_eq!(height.highlight_from(t0), None);
    }
}
