//! SQLite connection and schema management
use anyhow::Result;
use tokio_rusqlite::Connection;

/// SQL expression producing a UTC timestamp with millisecond precision
pub const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

/// Strips the optional `sqlite://` scheme from a database URL. Returns
/// `None` when the URL names an in-memory database.
pub fn database_path(database_url: &str) -> Option<&str> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

/// Open an async connection to the database at `database_url`.
pub async fn async_db(database_url: &str) -> Result<Connection> {
    let db = match database_path(database_url) {
        Some(path) => Connection::open(path).await?,
        None => Connection::open_in_memory().await?,
    };
    db.call(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    })
    .await?;
    Ok(db)
}

/// Create all tables if they don't already exist. Safe to run on
/// every startup.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(&format!(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            display_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT ({NOW}),
            last_login TEXT
        );

        CREATE TABLE IF NOT EXISTS emails (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER REFERENCES users(id),
            sender_email TEXT NOT NULL,
            recipient_email TEXT NOT NULL,
            subject TEXT,
            body TEXT,
            is_read INTEGER NOT NULL DEFAULT 0,
            is_starred INTEGER NOT NULL DEFAULT 0,
            labels TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL DEFAULT ({NOW})
        );

        CREATE INDEX IF NOT EXISTS emails_recipient_created_at
            ON emails (recipient_email, created_at);

        CREATE TABLE IF NOT EXISTS attachments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email_id INTEGER REFERENCES emails(id),
            filename TEXT,
            filepath TEXT,
            filesize INTEGER,
            mimetype TEXT,
            uploaded_at TEXT NOT NULL DEFAULT ({NOW})
        );
        "
    ))
}
