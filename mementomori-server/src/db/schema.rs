//! Schema bootstrap
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so it runs on every
//! start. Constraint names are fixed because [`super::repos::DbError`]
//! maps foreign-key violations back to a resource by name.

use sqlx::PgPool;

use super::repos::DbError;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id SERIAL PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL CONSTRAINT users_email_key UNIQUE,
            profile_picture BYTEA
        )
        "#,
    ),
    (
        "folders",
        r#"
        CREATE TABLE IF NOT EXISTS folders (
            folder_id SERIAL PRIMARY KEY,
            user_email TEXT NOT NULL
                CONSTRAINT folders_user_email_fkey REFERENCES users(email) ON DELETE CASCADE,
            folder_name TEXT NOT NULL
        )
        "#,
    ),
    (
        "folders_user_email_idx",
        "CREATE INDEX IF NOT EXISTS folders_user_email_idx ON folders (user_email)",
    ),
    (
        "folders_folder_name_idx",
        "CREATE INDEX IF NOT EXISTS folders_folder_name_idx ON folders (folder_name)",
    ),
    (
        "bubbles",
        r#"
        CREATE TABLE IF NOT EXISTS bubbles (
            bubble_id SERIAL PRIMARY KEY,
            folder_id INTEGER NOT NULL
                CONSTRAINT bubbles_folder_id_fkey REFERENCES folders(folder_id) ON DELETE CASCADE,
            bubble_picture BYTEA NOT NULL,
            bubble_description TEXT NOT NULL
        )
        "#,
    ),
    (
        "bubbles_description_key",
        "CREATE UNIQUE INDEX IF NOT EXISTS bubbles_description_key ON bubbles (bubble_description)",
    ),
    (
        "bubbles_folder_id_idx",
        "CREATE INDEX IF NOT EXISTS bubbles_folder_id_idx ON bubbles (folder_id)",
    ),
    (
        "friends",
        r#"
        CREATE TABLE IF NOT EXISTS friends (
            user_email TEXT NOT NULL
                CONSTRAINT friends_user_email_fkey REFERENCES users(email) ON DELETE CASCADE,
            friend_email TEXT NOT NULL
                CONSTRAINT friends_friend_email_fkey REFERENCES users(email) ON DELETE CASCADE,
            CONSTRAINT friends_pkey PRIMARY KEY (user_email, friend_email)
        )
        "#,
    ),
    (
        "folder_permissions",
        r#"
        CREATE TABLE IF NOT EXISTS folder_permissions (
            folder_id INTEGER NOT NULL
                CONSTRAINT folder_permissions_folder_id_fkey
                REFERENCES folders(folder_id) ON DELETE CASCADE,
            user_email TEXT NOT NULL
                CONSTRAINT folder_permissions_user_email_fkey
                REFERENCES users(email) ON DELETE CASCADE,
            CONSTRAINT folder_permissions_pkey PRIMARY KEY (folder_id, user_email)
        )
        "#,
    ),
    (
        "folder_permissions_user_email_idx",
        "CREATE INDEX IF NOT EXISTS folder_permissions_user_email_idx ON folder_permissions (user_email)",
    ),
];

/// Create tables and indexes that don't exist yet.
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running schema bootstrap...");

    for (name, sql) in STATEMENTS.iter().copied() {
        tracing::debug!(object = name, "ensuring schema object");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!(objects = STATEMENTS.len(), "Schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_precede_their_dependents() {
        let position = |name: &str| {
            STATEMENTS
                .iter()
                .position(|(n, _)| *n == name)
                .unwrap_or_else(|| panic!("{name} missing"))
        };

        assert!(position("users") < position("folders"));
        assert!(position("folders") < position("bubbles"));
        assert!(position("users") < position("friends"));
        assert!(position("folders") < position("folder_permissions"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            assert!(sql.contains("IF NOT EXISTS"), "{name} is not idempotent");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrate_twice_is_noop() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        migrate(&pool).await.expect("first run");
        migrate(&pool).await.expect("second run");
    }
}
