use super::{HandleId, SqlHandle};
use crate::core::Result;
use log::debug;
use rusqlite::Connection;
use std::path::Path;

/// Owning database handle
///
/// Wraps a `rusqlite::Connection` and tags it with a [`HandleId`].
/// Transactions, pragmas and everything else stay on the inner connection.
pub struct Database {
    id: HandleId,
    conn: Connection,
}

impl Database {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let db = Self::from_connection(conn);
        debug!("opened {} at {}", db.id, path.as_ref().display());
        Ok(db)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    /// Adopt an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            id: HandleId::allocate(),
            conn,
        }
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl SqlHandle for Database {
    fn handle_id(&self) -> HandleId {
        self.id
    }

    fn execute_sql(&self, sql: &str) -> Result<()> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("id", &self.id).finish_non_exhaustive()
    }
}
