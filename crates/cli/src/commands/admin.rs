//! Privileged user creation command.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};

use fable_core::{Email, UserRole};

use super::{CliError, connect};

/// Create a user with the given role.
///
/// Fails if the email is already registered.
pub async fn create_user(email: &str, password: &str, role: &str) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let role: UserRole = role.parse().map_err(CliError::InvalidRole)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CliError::PasswordHash(e.to_string()))?
        .to_string();

    let pool = connect().await?;
    let mut tx = pool.begin().await?;

    let (user_id,): (i32,) = sqlx::query_as(
        "INSERT INTO users (email, role) VALUES ($1, $2) RETURNING id",
    )
    .bind(&email)
    .bind(role)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO user_password (user_id, password_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(&hash)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(%email, %role, user_id, "user created");
    Ok(())
}
