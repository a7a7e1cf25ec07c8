/// Database row types — these map directly to SQLite rows.
/// Distinct from corkboard-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub content: String,
    pub author_id: String,
    pub created_at: String,
}

/// Feed row: message joined with the author's display name at query time.
pub struct MessageFeedRow {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub created_at: String,
}
