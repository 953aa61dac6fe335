//! Session lookup for authenticated routes.
//!
//! ARCHITECTURE
//! ============
//! Sessions are issued by the account service that owns sign-in; this server
//! only resolves an opaque token to the principal that owns it. A session
//! counts only while `expires_at` is in the future.

use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Principal attached to an authenticated request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
}

/// Validate a session token and return the associated user.
///
/// # Errors
///
/// Returns a database error if the lookup fails.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.name
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), name: r.get("name") }))
}
