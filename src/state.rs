use rusqlite::Connection;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. The single connection behind the mutex is also the
/// process-wide concurrency cap: every request serializes on it for the
/// duration of its statement.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}
