use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use duckdb::{params, Connection, Row};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ChatHistoryRepository;
use crate::domain::{ChatExchange, ChatSession, DomainError};

const EXCHANGE_COLUMNS: &str = "chat_id, session_id, question, answer, asked_at";

pub struct DuckdbChatHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DuckdbChatHistoryRepository {
    pub fn new(db_path: &Path) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::storage(format!("Failed to open DuckDB database: {}", e)))?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, DomainError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            DomainError::storage(format!("Failed to open DuckDB in-memory DB: {}", e))
        })?;
        Self::initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), DomainError> {
        conn.execute_batch(
            r#"
            CREATE SEQUENCE IF NOT EXISTS chat_sessions_seq START 1;
            CREATE SEQUENCE IF NOT EXISTS chat_history_seq START 1;

            CREATE TABLE IF NOT EXISTS chat_sessions (
                session_id BIGINT PRIMARY KEY DEFAULT nextval('chat_sessions_seq'),
                created_at BIGINT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS chat_history (
                chat_id BIGINT PRIMARY KEY DEFAULT nextval('chat_history_seq'),
                session_id BIGINT NOT NULL REFERENCES chat_sessions(session_id),
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                asked_at BIGINT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chat_history_session ON chat_history(session_id);
            "#,
        )
        .map_err(|e| DomainError::storage(format!("Failed to initialize schema: {}", e)))?;

        debug!("DuckDB chat history schema initialized");
        Ok(())
    }

    fn row_to_exchange(row: &Row<'_>) -> duckdb::Result<ChatExchange> {
        Ok(ChatExchange::reconstitute(
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    }

    fn session_exists(conn: &Connection, session_id: i64) -> Result<bool, DomainError> {
        match conn.query_row(
            "SELECT session_id FROM chat_sessions WHERE session_id = ?1",
            params![session_id],
            |row| row.get::<_, i64>(0),
        ) {
            Ok(_) => Ok(true),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to query session: {}",
                e
            ))),
        }
    }
}

#[async_trait]
impl ChatHistoryRepository for DuckdbChatHistoryRepository {
    async fn create_session(&self, created_at: i64) -> Result<ChatSession, DomainError> {
        let conn = self.conn.lock().await;
        let session_id: i64 = conn
            .query_row(
                "INSERT INTO chat_sessions (created_at) VALUES (?1) RETURNING session_id",
                params![created_at],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        debug!("Created session {}", session_id);
        Ok(ChatSession::reconstitute(session_id, created_at))
    }

    async fn start_session(
        &self,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError> {
        let mut conn = self.conn.lock().await;
        let tx = conn
            .transaction()
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let session_id: i64 = tx
            .query_row(
                "INSERT INTO chat_sessions (created_at) VALUES (?1) RETURNING session_id",
                params![timestamp],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to create session: {}", e)))?;

        let chat_id: i64 = tx
            .query_row(
                r#"
                INSERT INTO chat_history (session_id, question, answer, asked_at)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING chat_id
                "#,
                params![session_id, question, answer, timestamp],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to save exchange: {}", e)))?;

        tx.commit()
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        debug!("Started session {} with exchange {}", session_id, chat_id);
        Ok(ChatExchange::reconstitute(
            chat_id,
            session_id,
            question.to_string(),
            answer.to_string(),
            timestamp,
        ))
    }

    async fn find_session(&self, session_id: i64) -> Result<Option<ChatSession>, DomainError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT session_id, created_at FROM chat_sessions WHERE session_id = ?1")
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        match stmt.query_row(params![session_id], |row| {
            Ok(ChatSession::reconstitute(row.get(0)?, row.get(1)?))
        }) {
            Ok(session) => Ok(Some(session)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "Failed to query session: {}",
                e
            ))),
        }
    }

    async fn append_exchange(
        &self,
        session_id: i64,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError> {
        let conn = self.conn.lock().await;
        if !Self::session_exists(&conn, session_id)? {
            return Err(DomainError::not_found(format!(
                "Session not found: {}",
                session_id
            )));
        }

        let chat_id: i64 = conn
            .query_row(
                r#"
                INSERT INTO chat_history (session_id, question, answer, asked_at)
                VALUES (?1, ?2, ?3, ?4)
                RETURNING chat_id
                "#,
                params![session_id, question, answer, timestamp],
                |row| row.get(0),
            )
            .map_err(|e| DomainError::storage(format!("Failed to save exchange: {}", e)))?;

        Ok(ChatExchange::reconstitute(
            chat_id,
            session_id,
            question.to_string(),
            answer.to_string(),
            timestamp,
        ))
    }

    async fn recent_exchanges(
        &self,
        session_id: i64,
        limit: usize,
    ) -> Result<Vec<ChatExchange>, DomainError> {
        // DuckDB rejects LIMIT values outside BIGINT.
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT {} FROM chat_history WHERE session_id = ?1 ORDER BY chat_id DESC LIMIT ?2",
            EXCHANGE_COLUMNS
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map(params![session_id, limit], Self::row_to_exchange)
            .map_err(|e| DomainError::storage(format!("Failed to query exchanges: {}", e)))?;

        let mut exchanges = Vec::new();
        for row in rows {
            exchanges
                .push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        exchanges.reverse();
        Ok(exchanges)
    }

    async fn list_exchanges(&self) -> Result<Vec<ChatExchange>, DomainError> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {} FROM chat_history ORDER BY chat_id", EXCHANGE_COLUMNS);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DomainError::storage(format!("Failed to prepare statement: {}", e)))?;

        let rows = stmt
            .query_map([], Self::row_to_exchange)
            .map_err(|e| DomainError::storage(format!("Failed to query exchanges: {}", e)))?;

        let mut exchanges = Vec::new();
        for row in rows {
            exchanges
                .push(row.map_err(|e| DomainError::storage(format!("Failed to read row: {}", e)))?);
        }
        Ok(exchanges)
    }
}
