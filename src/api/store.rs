use crate::error::{PlaygroundError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::Path;
use tracing::info;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

const CREATE_TABLES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        video_id TEXT PRIMARY KEY,
        nombre TEXT NOT NULL,
        url TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
    CREATE TABLE IF NOT EXISTS watch_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        video_id TEXT NOT NULL,
        video_nombre TEXT,
        started_at TEXT NOT NULL,
        ended_at TEXT,
        seconds_watched INTEGER NOT NULL DEFAULT 0,
        completed INTEGER NOT NULL DEFAULT 0,
        watch_date TEXT NOT NULL
    );
"#;

fn store_err(err: rusqlite::Error) -> PlaygroundError {
    PlaygroundError::Store(err.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub video_id: String,
    pub nombre: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoTotals {
    pub video_id: String,
    pub video_nombre: Option<String>,
    pub reproducciones: i64,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub watch_date: String,
    pub total_seconds: i64,
    pub sessions: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchSession {
    pub video_id: String,
    pub video_nombre: Option<String>,
    pub started_at: String,
    pub ended_at: Option<String>,
    pub seconds_watched: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopOrder {
    Plays,
    WatchTime,
}

/// Relational store behind the catalog and watch endpoints.
///
/// `rusqlite::Connection` is not `Sync`, so every call goes through one mutex.
pub struct VideoStore {
    conn: Mutex<Connection>,
}

impl VideoStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(store_err)?;
        info!(path = %path.display(), "Video store opened");
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_TABLES_SQL).map_err(store_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn video_exists(&self, video_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT video_id FROM videos WHERE video_id = ?1",
            params![video_id],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map(|found| found.is_some())
        .map_err(store_err)
    }

    pub fn insert_video(&self, video: &Video) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO videos (video_id, nombre, url) VALUES (?1, ?2, ?3)",
            params![video.video_id, video.nombre, video.url],
        )
        .map_err(store_err)?;
        Ok(())
    }

    /// Returns the number of rows removed.
    pub fn delete_video(&self, video_id: &str) -> Result<usize> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM videos WHERE video_id = ?1", params![video_id])
            .map_err(store_err)
    }

    pub fn start_session(
        &self,
        video_id: &str,
        video_name: Option<&str>,
        started_at: NaiveDateTime,
    ) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO watch_sessions (video_id, video_nombre, started_at, watch_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                video_id,
                video_name,
                started_at.format(TIMESTAMP_FORMAT).to_string(),
                started_at.date().format(DATE_FORMAT).to_string(),
            ],
        )
        .map_err(store_err)?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns the number of sessions updated.
    pub fn end_session(
        &self,
        session_id: i64,
        ended_at: NaiveDateTime,
        seconds: i64,
        completed: bool,
    ) -> Result<usize> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE watch_sessions
             SET ended_at = ?1, seconds_watched = ?2, completed = ?3
             WHERE id = ?4",
            params![
                ended_at.format(TIMESTAMP_FORMAT).to_string(),
                seconds,
                completed,
                session_id
            ],
        )
        .map_err(store_err)
    }

    pub fn seconds_on(&self, date: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COALESCE(SUM(seconds_watched), 0) FROM watch_sessions WHERE watch_date = ?1",
            params![date.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )
        .map_err(store_err)
    }

    pub fn seconds_since(&self, from: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT COALESCE(SUM(seconds_watched), 0) FROM watch_sessions WHERE watch_date >= ?1",
            params![from.format(DATE_FORMAT).to_string()],
            |row| row.get(0),
        )
        .map_err(store_err)
    }

    pub fn top_videos(&self, order: TopOrder, limit: usize) -> Result<Vec<VideoTotals>> {
        let order_by = match order {
            TopOrder::Plays => "reproducciones DESC",
            TopOrder::WatchTime => "total_seconds DESC",
        };
        let sql = format!(
            "SELECT video_id, video_nombre, COUNT(*) AS reproducciones,
                    COALESCE(SUM(seconds_watched), 0) AS total_seconds
             FROM watch_sessions
             GROUP BY video_id, video_nombre
             ORDER BY {}
             LIMIT ?1",
            order_by
        );

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(store_err)?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(VideoTotals {
                    video_id: row.get(0)?,
                    video_nombre: row.get(1)?,
                    reproducciones: row.get(2)?,
                    total_seconds: row.get(3)?,
                })
            })
            .map_err(store_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(store_err)
    }

    pub fn daily_totals(&self, from: NaiveDate) -> Result<Vec<DailyTotal>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT watch_date, COALESCE(SUM(seconds_watched), 0), COUNT(*)
                 FROM watch_sessions
                 WHERE watch_date >= ?1
                 GROUP BY watch_date
                 ORDER BY watch_date ASC",
            )
            .map_err(store_err)?;
        let rows = stmt
            .query_map(params![from.format(DATE_FORMAT).to_string()], |row| {
                Ok(DailyTotal {
                    watch_date: row.get(0)?,
                    total_seconds: row.get(1)?,
                    sessions: row.get(2)?,
                })
            })
            .map_err(store_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(store_err)
    }

    pub fn sessions_on(&self, date: NaiveDate) -> Result<Vec<WatchSession>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT video_id, video_nombre, started_at, ended_at, seconds_watched, completed
                 FROM watch_sessions
                 WHERE watch_date = ?1
                 ORDER BY started_at DESC, id DESC",
            )
            .map_err(store_err)?;
        let rows = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
                Ok(WatchSession {
                    video_id: row.get(0)?,
                    video_nombre: row.get(1)?,
                    started_at: row.get(2)?,
                    ended_at: row.get(3)?,
                    seconds_watched: row.get(4)?,
                    completed: row.get(5)?,
                })
            })
            .map_err(store_err)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(store_err)
    }
}
