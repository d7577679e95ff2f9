//! Prompt assembly.

use history_store::HistoryWindow;

use crate::api_types::ChatMessage;

/// Build the role-tagged message sequence for one exchange.
///
/// Pure function of its inputs. The ordering is a contract with the
/// completion API: identity, role, addressee, history summary, the
/// history-reading directive, then the user's new message. Absent
/// history slots are empty strings, never omitted, because the history
/// summary addresses five fixed slots.
pub fn build_prompt(
    bot_name: &str,
    bot_role: &str,
    user_name: &str,
    window: &HistoryWindow,
    new_message: &str,
) -> Vec<ChatMessage> {
    let slots = window.slots();

    vec![
        ChatMessage::system(format!("Your name is {}.", bot_name)),
        ChatMessage::system(format!("You are the {}.", bot_role)),
        ChatMessage::system(format!("You are talking with {}.", user_name)),
        ChatMessage::system(format!(
            "Chat history is {}, {}, {}, {}, {}.",
            slots[0], slots[1], slots[2], slots[3], slots[4]
        )),
        ChatMessage::system(
            "Read the chat history from str1 to str5 and reply to the user \
             with a response in the context of the conversation.",
        ),
        ChatMessage::user(new_message),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(texts: &[&str]) -> HistoryWindow {
        let messages: Vec<String> = texts.iter().map(|s| s.to_string()).collect();
        HistoryWindow::from_chronological(&messages)
    }

    #[test]
    fn test_fixed_message_order() {
        let messages = build_prompt(
            "Aki",
            "friendly assistant",
            "Taro",
            &window(&["m1", "m2", "m3", "m4", "m5"]),
            "hello again",
        );

        assert_eq!(messages.len(), 6);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[0].content, "Your name is Aki.");
        assert_eq!(messages[1].content, "You are the friendly assistant.");
        assert_eq!(messages[2].content, "You are talking with Taro.");
        assert_eq!(messages[3].content, "Chat history is m1, m2, m3, m4, m5.");
        assert!(messages[4].content.starts_with("Read the chat history"));
        assert_eq!(messages[5].role, "user");
        assert_eq!(messages[5].content, "hello again");
    }

    #[test]
    fn test_sparse_history_keeps_five_slots() {
        let messages = build_prompt("Aki", "assistant", "Taro", &window(&["hello"]), "hi");

        assert_eq!(messages[3].content, "Chat history is , , , , hello.");
    }

    #[test]
    fn test_deterministic() {
        let w = window(&["a", "b"]);
        let first = build_prompt("N", "R", "U", &w, "msg");
        let second = build_prompt("N", "R", "U", &w, "msg");
        assert_eq!(first, second);
    }
}
