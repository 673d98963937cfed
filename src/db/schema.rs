//! SQL DDL for all AOMIGO tables.
//!
//! Defines the `users_profile`, `topics`, `reviews`, `teaching_sessions`,
//! `posts`, `post_comments`, `post_likes`, `waitlist`, `activity_log`, and
//! `schema_meta` tables. All DDL uses `IF NOT EXISTS` for idempotent
//! initialization.

use rusqlite::Connection;

/// All schema DDL statements for AOMIGO's core tables.
const SCHEMA_SQL: &str = r#"
-- Pet profiles, one per authenticated user
CREATE TABLE IF NOT EXISTS users_profile (
    id TEXT PRIMARY KEY,
    email TEXT,
    pet_name TEXT NOT NULL,
    intelligence INTEGER NOT NULL DEFAULT 0 CHECK(intelligence >= 0 AND intelligence <= 1000),
    health INTEGER NOT NULL DEFAULT 80 CHECK(health >= 0 AND health <= 100),
    level INTEGER NOT NULL DEFAULT 1 CHECK(level >= 1 AND level <= 10),
    day_streak INTEGER NOT NULL DEFAULT 0 CHECK(day_streak >= 0),
    last_activity_date TEXT NOT NULL,
    language_preference TEXT NOT NULL DEFAULT 'en' CHECK(language_preference IN ('en','zh')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Topics the user has taught their pet
CREATE TABLE IF NOT EXISTS topics (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    topic_name TEXT NOT NULL,
    depth INTEGER NOT NULL DEFAULT 1,
    first_learned TEXT NOT NULL,
    last_reviewed TEXT NOT NULL,
    review_count INTEGER NOT NULL DEFAULT 0,
    mastery_level INTEGER NOT NULL DEFAULT 0 CHECK(mastery_level >= 0 AND mastery_level <= 5),
    UNIQUE(user_id, topic_name)
);

CREATE INDEX IF NOT EXISTS idx_topics_user ON topics(user_id);

-- Spaced-repetition reviews; rows are append-only history once completed
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    topic_id TEXT NOT NULL REFERENCES topics(id) ON DELETE CASCADE,
    scheduled_date TEXT NOT NULL,
    interval_days INTEGER NOT NULL,
    completed_at TEXT,
    result TEXT CHECK(result IN ('good','poor','skipped')),
    next_review_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_reviews_user_open ON reviews(user_id, completed_at);
CREATE INDEX IF NOT EXISTS idx_reviews_scheduled ON reviews(scheduled_date);

-- Teaching sessions: what the user taught and how the follow-up went
CREATE TABLE IF NOT EXISTS teaching_sessions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL UNIQUE,
    input_type TEXT NOT NULL CHECK(input_type IN ('text','voice','image')),
    raw_input TEXT NOT NULL,
    extracted_topics TEXT NOT NULL,
    follow_up_question TEXT,
    user_answer TEXT,
    quality_score INTEGER,
    intelligence_gain INTEGER,
    health_change INTEGER,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON teaching_sessions(user_id, created_at);

-- Community feed
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    pet_name TEXT NOT NULL,
    summary_text TEXT NOT NULL,
    topics_learned TEXT NOT NULL,
    likes_count INTEGER NOT NULL DEFAULT 0 CHECK(likes_count >= 0),
    comment_count INTEGER NOT NULL DEFAULT 0 CHECK(comment_count >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at);

CREATE TABLE IF NOT EXISTS post_comments (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    pet_name TEXT NOT NULL,
    content TEXT NOT NULL,
    likes_count INTEGER NOT NULL DEFAULT 0 CHECK(likes_count >= 0),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_post ON post_comments(post_id);

CREATE TABLE IF NOT EXISTS post_likes (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(post_id, user_id)
);

-- Launch waitlist, written by a public endpoint
CREATE TABLE IF NOT EXISTS waitlist (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    name TEXT,
    created_at TEXT NOT NULL
);

-- Append-only record of domain events
CREATE TABLE IF NOT EXISTS activity_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('teach','answer','review_scheduled','review_completed','streak','profile','post','comment','like')),
    user_id TEXT NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
