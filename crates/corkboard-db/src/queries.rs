use crate::models::{MessageFeedRow, MessageRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        name: &str,
        password_hash: &str,
        role: &str,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, name, password, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                (id, name, password_hash, role, created_at),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_name(conn, name))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name, password, role, created_at FROM users ORDER BY created_at")?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn admin_exists(&self) -> Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE role = 'ADMIN'",
                [],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    // -- Messages --

    /// Insert a message and return its assigned id.
    pub fn insert_message(&self, content: &str, author_id: &str, created_at: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (content, author_id, created_at) VALUES (?1, ?2, ?3)",
                (content, author_id, created_at),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, content, author_id, created_at FROM messages WHERE id = ?1")?;
            let row = stmt
                .query_row([id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        content: row.get(1)?,
                        author_id: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn delete_message(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    /// Fetch one feed page plus the total message count. Both queries run
    /// under the same lock acquisition, so the count can never disagree with
    /// the page about concurrent inserts.
    pub fn messages_page(&self, limit: u32, offset: u32) -> Result<(Vec<MessageFeedRow>, i64)> {
        self.with_conn(|conn| {
            let rows = query_messages_page(conn, limit, offset)?;
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
            Ok((rows, total))
        })
    }
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        password: row.get(2)?,
        role: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn query_user_by_name(conn: &Connection, name: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, name, password, role, created_at FROM users WHERE name = ?1")?;
    let row = stmt.query_row([name], user_from_row).optional()?;
    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, name, password, role, created_at FROM users WHERE id = ?1")?;
    let row = stmt.query_row([id], user_from_row).optional()?;
    Ok(row)
}

fn query_messages_page(conn: &Connection, limit: u32, offset: u32) -> Result<Vec<MessageFeedRow>> {
    // JOIN users to fetch the author name in a single query (eliminates N+1).
    // Ordered by id, not timestamp: ids are monotonic and give a stable total
    // order even when timestamps collide.
    let mut stmt = conn.prepare(
        "SELECT m.id, m.content, u.name, m.created_at
         FROM messages m
         JOIN users u ON m.author_id = u.id
         ORDER BY m.id DESC
         LIMIT ?1 OFFSET ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![limit, offset], |row| {
            Ok(MessageFeedRow {
                id: row.get(0)?,
                content: row.get(1)?,
                author_name: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
