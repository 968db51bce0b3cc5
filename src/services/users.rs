use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, Claims, TokenUse};
use crate::config;
use crate::database::models::profile::Profile;
use crate::database::models::user::User;
use crate::services::{mailer, ServiceError};

const USER_COLUMNS: &str =
    "id, email, username, password_hash, password_salt, is_verified, created_at, updated_at";

/// Input validation mirrors registration rules: addresses must look like
/// mail addresses, usernames are short alphanumeric handles, passwords need
/// some minimal variety.
pub fn validate_email(email: &str) -> Result<(), ServiceError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));

    if local_ok && domain_ok {
        Ok(())
    } else {
        Err(ServiceError::Validation("Enter a valid email address".into()))
    }
}

pub fn validate_username(username: &str) -> Result<(), ServiceError> {
    if username.len() < 3 {
        return Err(ServiceError::Validation(
            "Username must be at least 3 characters long".into(),
        ));
    }
    if !username.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ServiceError::Validation(
            "Username must contain at least one letter".into(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ServiceError::Validation(
            "Username may only contain letters, numbers and underscores".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 8 {
        return Err(ServiceError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ServiceError::Validation(
            "Password must contain at least one number".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ServiceError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ServiceError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    Ok(())
}

/// Register a new user. The default profile is created explicitly inside
/// the same transaction as the user row, so the two can never diverge.
pub async fn register(
    pool: &PgPool,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(User, Profile), ServiceError> {
    validate_email(email)?;
    validate_username(username)?;
    validate_password(password)?;

    if find_by_email(pool, email).await?.is_some() {
        return Err(ServiceError::Conflict("Email address already in use".into()));
    }
    if find_by_username(pool, username).await?.is_some() {
        return Err(ServiceError::Conflict("Username already in use".into()));
    }

    let salt = auth::new_salt();
    let hash = auth::hash_password(password, &salt);

    let mut tx = pool.begin().await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, username, password_hash, password_salt)
         VALUES ($1, $2, $3, $4)
         RETURNING {USER_COLUMNS}"
    ))
    .bind(email)
    .bind(username)
    .bind(&hash)
    .bind(&salt)
    .fetch_one(&mut *tx)
    .await?;

    let profile = sqlx::query_as::<_, Profile>(
        "INSERT INTO profiles (user_id) VALUES ($1) RETURNING *",
    )
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let claims = Claims::verify(user.id, user.username.clone(), user.email.clone());
    let token = auth::generate_token(&claims)?;
    let link = format!(
        "{}/api/v1/users/verify/{}",
        config::config().server.public_url,
        token
    );
    mailer::send_verification(&user.email, &user.username, &link);

    Ok((user, profile))
}

pub async fn login(pool: &PgPool, email: &str, password: &str) -> Result<User, ServiceError> {
    let user = find_by_email(pool, email)
        .await?
        .ok_or_else(|| ServiceError::Validation("Email address is not registered".into()))?;

    if !auth::verify_password(password, &user.password_salt, &user.password_hash) {
        return Err(ServiceError::Validation("Incorrect password".into()));
    }
    Ok(user)
}

/// Redeem an email-verification token.
pub async fn verify_email(pool: &PgPool, token: &str) -> Result<User, ServiceError> {
    let claims = auth::validate_token(token, TokenUse::Verify)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET is_verified = TRUE, updated_at = now()
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    ))
    .bind(claims.sub)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("User no longer exists".into()))?;

    Ok(user)
}

pub async fn request_password_reset(pool: &PgPool, email: &str) -> Result<(), ServiceError> {
    // A missing address is reported the same as a present one so the
    // endpoint cannot be used to enumerate accounts.
    let Some(user) = find_by_email(pool, email).await? else {
        return Ok(());
    };

    let claims = Claims::password_reset(user.id, user.username.clone(), user.email.clone());
    let token = auth::generate_token(&claims)?;
    let link = format!(
        "{}/api/v1/users/password_reset/{}",
        config::config().server.public_url,
        token
    );
    mailer::send_password_reset(&user.email, &user.username, &link);
    Ok(())
}

pub async fn reset_password(
    pool: &PgPool,
    token: &str,
    new_password: &str,
) -> Result<User, ServiceError> {
    let claims = auth::validate_token(token, TokenUse::PasswordReset)?;
    validate_password(new_password)?;

    let salt = auth::new_salt();
    let hash = auth::hash_password(new_password, &salt);

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET password_hash = $2, password_salt = $3, updated_at = now()
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    ))
    .bind(claims.sub)
    .bind(&hash)
    .bind(&salt)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ServiceError::NotFound("User no longer exists".into()))?;

    Ok(user)
}

pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<User, ServiceError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".into()))
}

/// Partial update of the account record. Each field is validated when
/// present; a password change is re-salted.
pub async fn update(
    pool: &PgPool,
    user_id: Uuid,
    email: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<User, ServiceError> {
    let mut user = get(pool, user_id).await?;

    if let Some(email) = email {
        validate_email(email)?;
        if let Some(existing) = find_by_email(pool, email).await? {
            if existing.id != user_id {
                return Err(ServiceError::Conflict("Email address already in use".into()));
            }
        }
        user.email = email.to_string();
    }
    if let Some(username) = username {
        validate_username(username)?;
        if let Some(existing) = find_by_username(pool, username).await? {
            if existing.id != user_id {
                return Err(ServiceError::Conflict("Username already in use".into()));
            }
        }
        user.username = username.to_string();
    }
    if let Some(password) = password {
        validate_password(password)?;
        user.password_salt = auth::new_salt();
        user.password_hash = auth::hash_password(password, &user.password_salt);
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users
         SET email = $2, username = $3, password_hash = $4, password_salt = $5,
             updated_at = now()
         WHERE id = $1
         RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.password_salt)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ServiceError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, ServiceError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_emails() {
        assert!(validate_email("amina@example.com").is_ok());
        assert!(validate_email("a.b+tag@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in ["", "no-at-sign", "@example.com", "a@", "a@nodot", "a@.com", "a b@x.com"] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn username_rules() {
        assert!(validate_username("amina_42").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("12345").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("Str0ngpass").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("nouppercase1").is_err());
        assert!(validate_password("NOLOWERCASE1").is_err());
        assert!(validate_password("NoNumbersHere").is_err());
    }
}
