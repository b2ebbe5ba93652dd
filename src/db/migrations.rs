use anyhow::Context;
use rusqlite::Connection;

// Migrations are embedded so that a fresh database (including :memory: in
// tests) is fully usable without any files on disk. Applied entries are
// recorded in _migrations and never re-run.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_reservations",
    "CREATE TABLE reservations (
        id               TEXT PRIMARY KEY,
        venue_id         TEXT NOT NULL,
        name             TEXT NOT NULL,
        email            TEXT NOT NULL,
        phone            TEXT NOT NULL,
        date             TEXT NOT NULL,
        time             TEXT NOT NULL,
        guests           INTEGER NOT NULL,
        male_guests      INTEGER,
        female_guests    INTEGER,
        booking_type     TEXT NOT NULL DEFAULT 'standard',
        payment_method   TEXT NOT NULL DEFAULT 'pay-at-venue',
        status           TEXT NOT NULL DEFAULT 'pending',
        table_number     TEXT,
        special_requests TEXT,
        add_ons          TEXT,
        coupon_code      TEXT,
        total_amount     REAL,
        created_at       TEXT NOT NULL,
        updated_at       TEXT NOT NULL
    );
    CREATE INDEX idx_reservations_venue_date ON reservations (venue_id, date);",
)];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}
