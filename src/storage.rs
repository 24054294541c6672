use crate::models::{LogEntry, MonthSummary, Subject, SubjectSummary};
use chrono::Utc;
use rusqlite::{params, Connection, Result};
use std::env;
use std::path::{Path, PathBuf};

pub fn resolve_db_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DB_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/study_log.db")
}

pub fn open(path: &Path) -> Result<Connection> {
    Connection::open(path)
}

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS subjects(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS logs(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL,
            duration INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
}

fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn add_subject(conn: &Connection, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO subjects(name, created_at) VALUES (?1, ?2)",
        params![name, timestamp_now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_subjects(conn: &Connection) -> Result<Vec<Subject>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM subjects ORDER BY id")?;
    let rows = stmt.query_map([], |row| {
        Ok(Subject {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn add_log(conn: &Connection, subject_id: i64, duration: i64) -> Result<i64> {
    add_log_at(conn, subject_id, duration, &timestamp_now())
}

pub fn add_log_at(
    conn: &Connection,
    subject_id: i64,
    duration: i64,
    created_at: &str,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO logs(subject_id, duration, created_at) VALUES (?1, ?2, ?3)",
        params![subject_id, duration, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent entries first. Timestamps have second resolution, so the
/// rowid breaks ties between inserts in the same second.
pub fn recent_logs(conn: &Connection, limit: i64) -> Result<Vec<LogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT l.id, s.name, l.duration, l.created_at
         FROM logs l
         JOIN subjects s ON s.id = l.subject_id
         ORDER BY l.created_at DESC, l.id DESC
         LIMIT ?1",
    )?;
    let rows = stmt.query_map([limit], |row| {
        Ok(LogEntry {
            id: row.get(0)?,
            subject: row.get(1)?,
            duration: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn summarize_by_subject(conn: &Connection) -> Result<Vec<SubjectSummary>> {
    let mut stmt = conn.prepare(
        "SELECT s.name, COUNT(1), SUM(l.duration)
         FROM logs l
         JOIN subjects s ON s.id = l.subject_id
         GROUP BY s.id, s.name
         ORDER BY s.name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(SubjectSummary {
            subject: row.get(0)?,
            count: row.get(1)?,
            sum: row.get(2)?,
        })
    })?;
    rows.collect()
}

pub fn summarize_by_month(conn: &Connection) -> Result<Vec<MonthSummary>> {
    let mut stmt = conn.prepare(
        "SELECT strftime('%Y-%m', created_at) AS month, COUNT(1), SUM(duration)
         FROM logs
         GROUP BY month
         ORDER BY month",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(MonthSummary {
            month: row.get(0)?,
            count: row.get(1)?,
            sum: row.get(2)?,
        })
    })?;
    rows.collect()
}
