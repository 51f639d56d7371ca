use anyhow::Result;
use chrono::DateTime;

use crate::ChatHistoryGroup;

use super::super::Container;

pub struct HistoryController<'a> {
    container: &'a Container,
}

impl<'a> HistoryController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn history(&self) -> Result<String> {
        let groups = self.container.api().chat_history().await?;
        Ok(format_history(&groups))
    }
}

fn format_history(groups: &[ChatHistoryGroup]) -> String {
    if groups.is_empty() {
        return "No chat history yet.".to_string();
    }

    let mut output = String::new();
    for group in groups {
        output.push_str(&format!("{}\n", group.date));
        for chat in &group.chats {
            let time = DateTime::parse_from_rfc3339(&chat.timestamp)
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|_| chat.timestamp.clone());
            output.push_str(&format!(
                "  [{}] {}  {}\n",
                chat.session_id, time, chat.question
            ));
        }
        output.push('\n');
    }

    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatHistoryEntry;

    #[test]
    fn empty_history_message() {
        assert_eq!(format_history(&[]), "No chat history yet.");
    }

    #[test]
    fn lists_sessions_under_their_date() {
        let groups = vec![ChatHistoryGroup {
            date: "2025-03-01".to_string(),
            chats: vec![ChatHistoryEntry {
                question: "Nairobi expressway costs".to_string(),
                timestamp: "2025-03-01T09:30:00Z".to_string(),
                session_id: 4,
            }],
        }];

        assert_eq!(
            format_history(&groups),
            "2025-03-01\n  [4] 09:30  Nairobi expressway costs"
        );
    }
}
