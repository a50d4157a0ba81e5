use sqlx::PgConnection;

use crate::models::User;

/// Find-or-create a guest customer keyed by email.
///
/// Resolution is an exact, case-sensitive match against customer rows. When
/// the email is unseen, a guest customer row is created with the email doubling
/// as username. The partial unique index on (email) WHERE role = 'customer'
/// guarantees at most one row per email even under concurrent callers; a lost
/// insert race falls through to re-selecting the winner's row.
///
/// Runs on a caller-supplied connection so ticket issuance and order placement
/// can invoke it inside their own transactions.
pub async fn resolve_or_create(conn: &mut PgConnection, email: &str) -> Result<User, sqlx::Error> {
    if let Some(user) = find_by_email(conn, email).await? {
        return Ok(user);
    }

    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, username, role, shipping_address, phone_number)
        VALUES ($1, $1, 'customer', '', '')
        ON CONFLICT (email) WHERE role = 'customer' DO NOTHING
        RETURNING id, email, username, role, created_at, is_active,
                  password_hash, shipping_address, phone_number
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    match inserted {
        Some(user) => {
            tracing::info!(%email, "created guest customer");
            Ok(user)
        }
        // Concurrent request created the row between our select and insert
        None => find_by_email(conn, email)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

async fn find_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, username, role, created_at, is_active,
               password_hash, shipping_address, phone_number
        FROM users
        WHERE email = $1 AND role = 'customer'
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await
}
