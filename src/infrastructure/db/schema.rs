use super::pool::DbPool;
use tracing::info;

// Genre rows are removed by the application on movie delete; the foreign key does not cascade.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        slug TEXT NOT NULL,
        yearofrelease INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS movies_slug_idx
    ON movies
    USING btree (slug)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        movieid UUID REFERENCES movies (id),
        name TEXT NOT NULL
    )
    "#,
];

/// Creates the movie tables and the slug index when they are missing. Safe to run on every start.
pub async fn initialize(pool: &DbPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("✅ Database schema ready");
    Ok(())
}
