use serde::{Deserialize, Serialize};

/// A conversation thread. The id is assigned by the storage layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    session_id: i64,
    created_at: i64,
}

impl ChatSession {
    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(session_id: i64, created_at: i64) -> Self {
        Self {
            session_id,
            created_at,
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

/// Current time in unix seconds.
pub fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
