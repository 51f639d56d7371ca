use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::ChatExchange;

/// A session as listed in the history sidebar: its opening question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryEntry {
    pub question: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub session_id: i64,
}

/// All sessions that started on one UTC calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryGroup {
    pub date: String,
    pub chats: Vec<ChatHistoryEntry>,
}

/// Builds the date-grouped history from raw exchanges.
///
/// Each session contributes one entry, taken from its first exchange. Groups
/// are ordered newest day first and entries inside a group newest first.
pub fn group_by_date(exchanges: &[ChatExchange]) -> Vec<ChatHistoryGroup> {
    let mut openers: HashMap<i64, &ChatExchange> = HashMap::new();
    for exchange in exchanges {
        openers
            .entry(exchange.session_id())
            .and_modify(|current| {
                if (exchange.timestamp(), exchange.chat_id())
                    < (current.timestamp(), current.chat_id())
                {
                    *current = exchange;
                }
            })
            .or_insert(exchange);
    }

    let mut openers: Vec<&ChatExchange> = openers.into_values().collect();
    openers.sort_by(|a, b| {
        b.timestamp()
            .cmp(&a.timestamp())
            .then_with(|| b.session_id().cmp(&a.session_id()))
    });

    let mut groups: Vec<ChatHistoryGroup> = Vec::new();
    for exchange in openers {
        let at = to_datetime(exchange.timestamp());
        let date = at.format("%Y-%m-%d").to_string();
        let entry = ChatHistoryEntry {
            question: exchange.question().to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            session_id: exchange.session_id(),
        };

        match groups.last_mut() {
            Some(group) if group.date == date => group.chats.push(entry),
            _ => groups.push(ChatHistoryGroup {
                date,
                chats: vec![entry],
            }),
        }
    }

    groups
}

fn to_datetime(timestamp: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(timestamp, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-03-01T09:30:00Z
    const MARCH_1: i64 = 1_740_821_400;
    const DAY: i64 = 86_400;

    fn exchange(chat_id: i64, session_id: i64, question: &str, timestamp: i64) -> ChatExchange {
        ChatExchange::reconstitute(
            chat_id,
            session_id,
            question.to_string(),
            "answer".to_string(),
            timestamp,
        )
    }

    #[test]
    fn empty_history_has_no_groups() {
        assert!(group_by_date(&[]).is_empty());
    }

    #[test]
    fn one_entry_per_session_using_first_question() {
        let exchanges = vec![
            exchange(2, 1, "follow-up", MARCH_1 + 60),
            exchange(1, 1, "What happened to the Thika road project?", MARCH_1),
        ];

        let groups = group_by_date(&exchanges);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].date, "2025-03-01");
        assert_eq!(groups[0].chats.len(), 1);
        assert_eq!(
            groups[0].chats[0].question,
            "What happened to the Thika road project?"
        );
        assert_eq!(groups[0].chats[0].timestamp, "2025-03-01T09:30:00Z");
        assert_eq!(groups[0].chats[0].session_id, 1);
    }

    #[test]
    fn groups_are_newest_day_first() {
        let exchanges = vec![
            exchange(1, 1, "day one early", MARCH_1),
            exchange(2, 2, "day one late", MARCH_1 + 3_600),
            exchange(3, 3, "day two", MARCH_1 + DAY),
        ];

        let groups = group_by_date(&exchanges);
        let dates: Vec<&str> = groups.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-02", "2025-03-01"]);

        let day_one: Vec<i64> = groups[1].chats.iter().map(|c| c.session_id).collect();
        assert_eq!(day_one, vec![2, 1]);
    }

    #[test]
    fn same_second_sessions_order_by_id_descending() {
        let exchanges = vec![
            exchange(1, 4, "a", MARCH_1),
            exchange(2, 9, "b", MARCH_1),
        ];

        let groups = group_by_date(&exchanges);
        let ids: Vec<i64> = groups[0].chats.iter().map(|c| c.session_id).collect();
        assert_eq!(ids, vec![9, 4]);
    }

    #[test]
    fn serializes_to_wire_shape() {
        let groups = group_by_date(&[exchange(1, 3, "MP attendance", MARCH_1)]);
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "date": "2025-03-01",
                "chats": [{
                    "question": "MP attendance",
                    "timestamp": "2025-03-01T09:30:00Z",
                    "session_id": 3
                }]
            }])
        );
    }
}
