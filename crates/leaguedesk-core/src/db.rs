//! SQLite connection setup and schema.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::Result;

/// Pool size for file-backed databases.
const MAX_CONNECTIONS: u32 = 8;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    preferred_name TEXT,
    male INTEGER NOT NULL DEFAULT 0,
    height_inches INTEGER,
    skill_setter INTEGER NOT NULL DEFAULT 0,
    skill_hitter INTEGER NOT NULL DEFAULT 0,
    skill_other INTEGER NOT NULL DEFAULT 0,
    picture TEXT,
    role TEXT NOT NULL DEFAULT 'player'
);

CREATE TABLE IF NOT EXISTS seasons (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    year INTEGER NOT NULL,
    phase TEXT NOT NULL DEFAULT 'setup',
    max_players INTEGER,
    week1_date TEXT,
    week2_date TEXT,
    week3_date TEXT,
    draft_date TEXT,
    session_times TEXT NOT NULL DEFAULT '',
    courts INTEGER NOT NULL DEFAULT 4,
    team_male_quota INTEGER NOT NULL DEFAULT 6,
    team_non_male_quota INTEGER NOT NULL DEFAULT 4,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS app_config (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    current_season_id INTEGER REFERENCES seasons(id)
);

CREATE TABLE IF NOT EXISTS divisions (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    name TEXT NOT NULL,
    level INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    division_id INTEGER NOT NULL REFERENCES divisions(id),
    number INTEGER NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    captain_id INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS signups (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    pair_pick_id INTEGER REFERENCES users(id),
    pair_reason TEXT,
    age INTEGER,
    experience TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (season_id, user_id)
);

CREATE TABLE IF NOT EXISTS waitlist (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    approved INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (season_id, user_id)
);

CREATE TABLE IF NOT EXISTS week1_roster (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    session_number INTEGER NOT NULL,
    court_number INTEGER NOT NULL,
    UNIQUE (season_id, user_id)
);

CREATE TABLE IF NOT EXISTS week2_roster (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    division_id INTEGER NOT NULL REFERENCES divisions(id),
    team_number INTEGER NOT NULL,
    UNIQUE (season_id, user_id)
);

CREATE TABLE IF NOT EXISTS evaluations (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    player_id INTEGER NOT NULL REFERENCES users(id),
    evaluator_id INTEGER NOT NULL REFERENCES users(id),
    division_id INTEGER NOT NULL REFERENCES divisions(id),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE (season_id, player_id, evaluator_id)
);

CREATE TABLE IF NOT EXISTS commissioners (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    division_id INTEGER NOT NULL REFERENCES divisions(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    UNIQUE (division_id, user_id)
);

CREATE TABLE IF NOT EXISTS drafts (
    id INTEGER PRIMARY KEY,
    season_id INTEGER NOT NULL REFERENCES seasons(id),
    team_id INTEGER NOT NULL REFERENCES teams(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    round INTEGER NOT NULL,
    overall INTEGER NOT NULL,
    UNIQUE (season_id, user_id)
);

CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    action TEXT NOT NULL,
    detail TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Chronological sort key of a `seasons` row under `alias`: year, then
/// first tryout date (creation time when unscheduled), then id.
fn season_key_columns(alias: &str) -> [String; 3] {
    [
        format!("{}.year", alias),
        format!("COALESCE({a}.week1_date, {a}.created_at)", a = alias),
        format!("{}.id", alias),
    ]
}

/// Row value for comparing seasons, e.g. `(a) < (b)`.
pub(crate) fn season_key(alias: &str) -> String {
    format!("({})", season_key_columns(alias).join(", "))
}

/// `ORDER BY` terms putting seasons in chronological order.
pub(crate) fn season_order(alias: &str, direction: &str) -> String {
    season_key_columns(alias)
        .iter()
        .map(|column| format!("{} {}", column, direction))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Open a pool for the given database URL.
///
/// In-memory databases are per connection, so they get a single
/// long-lived connection.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = url.contains(":memory:");
    let mut pool_options = SqlitePoolOptions::new();
    pool_options = if in_memory {
        pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(MAX_CONNECTIONS)
    };

    let pool = pool_options.connect_with(options).await?;
    info!(url = %url, in_memory, "Connected to database");
    Ok(pool)
}

/// Create any missing tables.
pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    let statements = SCHEMA
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut count = 0;
    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
        count += 1;
    }
    debug!(statements = count, "Schema applied");
    Ok(())
}

/// Fresh in-memory database with the schema applied.
pub async fn memory() -> Result<SqlitePool> {
    let pool = connect("sqlite::memory:").await?;
    migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Seed helpers shared by the data-layer tests.

    use sqlx::SqlitePool;

    pub struct Seeded {
        pub pool: SqlitePool,
        pub season_id: i64,
        pub previous_season_id: i64,
        pub admin_id: i64,
        /// Divisions of the current season, by level
        pub divisions: Vec<i64>,
    }

    pub async fn user(pool: &SqlitePool, email: &str, first: &str, last: &str, male: bool) -> i64 {
        sqlx::query(
            "INSERT INTO users (email, first_name, last_name, male, height_inches, skill_setter, skill_hitter)
             VALUES (?, ?, ?, ?, 70, 0, 1)",
        )
        .bind(email)
        .bind(first)
        .bind(last)
        .bind(male)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    pub async fn season(pool: &SqlitePool, name: &str, year: i64, phase: &str) -> i64 {
        sqlx::query(
            "INSERT INTO seasons (code, name, year, phase, max_players, week1_date, week2_date, session_times, courts)
             VALUES (lower(?), ?, ?, ?, 40, '2025-09-06', '2025-09-13', '6:00pm,7:30pm', 4)",
        )
        .bind(name)
        .bind(name)
        .bind(year)
        .bind(phase)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    pub async fn division(pool: &SqlitePool, season_id: i64, name: &str, level: i64) -> i64 {
        sqlx::query("INSERT INTO divisions (season_id, name, level) VALUES (?, ?, ?)")
            .bind(season_id)
            .bind(name)
            .bind(level)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn team(pool: &SqlitePool, season_id: i64, division_id: i64, number: i64) -> i64 {
        sqlx::query("INSERT INTO teams (season_id, division_id, number, name) VALUES (?, ?, ?, '')")
            .bind(season_id)
            .bind(division_id)
            .bind(number)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    pub async fn signup(pool: &SqlitePool, season_id: i64, user_id: i64) {
        sqlx::query("INSERT INTO signups (season_id, user_id) VALUES (?, ?)")
            .bind(season_id)
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn draft(pool: &SqlitePool, season_id: i64, team_id: i64, user_id: i64) {
        sqlx::query("INSERT INTO drafts (season_id, team_id, user_id, round, overall) VALUES (?, ?, ?, 1, 1)")
            .bind(season_id)
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await
            .unwrap();
    }

    pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    /// A previous "Spring 2025" season and a current "Fall 2025" season in
    /// tryouts with two divisions and an admin account.
    pub async fn seeded() -> Seeded {
        let pool = super::memory().await.unwrap();
        let previous_season_id = season(&pool, "Spring", 2025, "complete").await;
        let season_id = season(&pool, "Fall", 2025, "tryouts").await;
        sqlx::query("INSERT INTO app_config (id, current_season_id) VALUES (1, ?)")
            .bind(season_id)
            .execute(&pool)
            .await
            .unwrap();

        let admin_id = user(&pool, "admin@example.org", "Ada", "Admin", false).await;
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(admin_id)
            .execute(&pool)
            .await
            .unwrap();

        let blue = division(&pool, season_id, "Blue", 1).await;
        let green = division(&pool, season_id, "Green", 2).await;

        Seeded {
            pool,
            season_id,
            previous_season_id,
            admin_id,
            divisions: vec![blue, green],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = memory().await.unwrap();
        migrate(&pool).await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 13);
    }

    #[test]
    fn test_season_key_sql() {
        assert_eq!(
            season_key("se"),
            "(se.year, COALESCE(se.week1_date, se.created_at), se.id)"
        );
        assert_eq!(
            season_order("s", "DESC"),
            "s.year DESC, COALESCE(s.week1_date, s.created_at) DESC, s.id DESC"
        );
    }
}
