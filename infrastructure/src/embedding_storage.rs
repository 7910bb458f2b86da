use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use shared::types::Result;
use std::path::Path;

/// SQLite cache of corpus embeddings, keyed by model name and text hash.
pub struct EmbeddingStorage {
    conn: Connection,
}

pub fn text_hash(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

impl EmbeddingStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open embedding cache {}", db_path.display()))?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    fn setup_db(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS embeddings (
                model TEXT NOT NULL,
                text_hash TEXT NOT NULL,
                text TEXT NOT NULL,
                vector BLOB NOT NULL,
                PRIMARY KEY (model, text_hash)
            );
        ",
        )
    }

    /// Cached vectors for `texts` under `model`, in input order.
    pub fn get_embeddings(&self, model: &str, texts: &[String]) -> Result<Vec<Option<Vec<f32>>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT vector FROM embeddings WHERE model = ?1 AND text_hash = ?2")?;
        let mut found = Vec::with_capacity(texts.len());
        for text in texts {
            let bytes: Option<Vec<u8>> = stmt
                .query_row(params![model, text_hash(text)], |row| row.get(0))
                .optional()?;
            let vector = match bytes {
                Some(bytes) => Some(serde_json::from_slice::<Vec<f32>>(&bytes)?),
                None => None,
            };
            found.push(vector);
        }
        Ok(found)
    }

    pub fn insert_embeddings(&self, model: &str, entries: &[(String, Vec<f32>)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO embeddings (model, text_hash, text, vector) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (text, vector) in entries {
                let vector_bytes = serde_json::to_vec(vector)?;
                stmt.execute(params![model, text_hash(text), text, vector_bytes])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn count(&self, model: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM embeddings WHERE model = ?1",
            params![model],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
