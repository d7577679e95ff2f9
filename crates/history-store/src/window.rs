//! Fixed-size history window.

/// Number of slots in a history window.
pub const WINDOW_SIZE: usize = 5;

/// A fixed five-slot view of a user's most recent messages.
///
/// Slots are ordered oldest-first, newest-last. When fewer than five
/// messages exist the leading slots are empty strings, so the newest
/// message always sits in the last slot. The prompt template addresses
/// five fixed slots, so padding happens here rather than downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryWindow {
    slots: [String; WINDOW_SIZE],
}

impl HistoryWindow {
    /// A window with all slots empty.
    pub fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|_| String::new()),
        }
    }

    /// Build a window from messages in chronological order.
    ///
    /// Keeps the newest [`WINDOW_SIZE`] messages and front-pads with
    /// empty strings when fewer exist.
    pub fn from_chronological(messages: &[String]) -> Self {
        let mut slots: [String; WINDOW_SIZE] = std::array::from_fn(|_| String::new());
        let tail = if messages.len() > WINDOW_SIZE {
            &messages[messages.len() - WINDOW_SIZE..]
        } else {
            messages
        };
        let offset = WINDOW_SIZE - tail.len();
        for (i, message) in tail.iter().enumerate() {
            slots[offset + i] = message.clone();
        }
        Self { slots }
    }

    /// The five slots, oldest first.
    pub fn slots(&self) -> &[String; WINDOW_SIZE] {
        &self.slots
    }

    /// Whether every slot is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_empty())
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_window() {
        let window = HistoryWindow::empty();
        assert!(window.is_empty());
        assert_eq!(window.slots().len(), WINDOW_SIZE);
    }

    #[test]
    fn test_single_message_front_padded() {
        let window = HistoryWindow::from_chronological(&msgs(&["hello"]));
        assert_eq!(window.slots(), &["", "", "", "", "hello"]);
    }

    #[test]
    fn test_partial_window_keeps_order() {
        let window = HistoryWindow::from_chronological(&msgs(&["m1", "m2", "m3"]));
        assert_eq!(window.slots(), &["", "", "m1", "m2", "m3"]);
    }

    #[test]
    fn test_full_window() {
        let window = HistoryWindow::from_chronological(&msgs(&["m1", "m2", "m3", "m4", "m5"]));
        assert_eq!(window.slots(), &["m1", "m2", "m3", "m4", "m5"]);
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let window =
            HistoryWindow::from_chronological(&msgs(&["m1", "m2", "m3", "m4", "m5", "m6"]));
        assert_eq!(window.slots(), &["m2", "m3", "m4", "m5", "m6"]);
    }
}
