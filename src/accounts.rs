//! Identity provider surface: account creation, sign-in/out, sessions.
//!
//! The clinic's identity provider is local: credentials live in the
//! `accounts` table (PBKDF2 password hashes) and authenticated callers
//! hold an opaque bearer token whose SHA-256 hash is stored in
//! `sessions`. The failure kinds mirror what a hosted identity provider
//! surfaces to the user: invalid-email, weak-password,
//! email-already-in-use, configuration-missing, permission-denied,
//! network-unavailable.

use chrono::Utc;
use pbkdf2::pbkdf2_hmac;
use rusqlite::{params, Connection};
use sha2::Sha256;
use uuid::Uuid;

use crate::authorization::initial_role;
use crate::db::repository::{get_profile, insert_profile};
use crate::db::DatabaseError;
use crate::models::UserProfile;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// PBKDF2-SHA256 work factor for stored passwords.
const PBKDF2_ITERATIONS: u32 = 210_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("password too weak: minimum {MIN_PASSWORD_LEN} characters")]
    WeakPassword,

    #[error("email already in use")]
    EmailAlreadyInUse,

    #[error("identity provider not configured")]
    ConfigurationMissing,

    #[error("permission denied")]
    PermissionDenied,

    #[error("network unavailable")]
    NetworkUnavailable,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// A signed-in identity plus its bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub profile: UserProfile,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Registration / sign-in
// ---------------------------------------------------------------------------

/// Create an account and its profile, then open a session.
///
/// The profile role comes from the admin allow-list (keyed by email);
/// everyone else registers as a doctor.
pub fn create_account(
    conn: &Connection,
    name: &str,
    email: &str,
    password: &str,
    admin_emails: &[String],
) -> Result<Session, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    if !is_valid_email(&email) {
        return Err(AuthError::InvalidEmail);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword);
    }
    if account_uid_by_email(conn, &email)?.is_some() {
        return Err(AuthError::EmailAlreadyInUse);
    }

    let uid = Uuid::new_v4().to_string();
    let password_hash = hash_password(password);

    conn.execute(
        "INSERT INTO accounts (uid, email, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![uid, email, password_hash, Utc::now().to_rfc3339()],
    )
    .map_err(DatabaseError::from)?;

    let profile = UserProfile {
        uid: uid.clone(),
        name: name.trim().to_string(),
        email: email.clone(),
        specialty: String::new(),
        role: initial_role(&email, admin_emails),
        signature: None,
    };
    insert_profile(conn, &profile)?;

    let token = open_session(conn, &uid)?;
    tracing::info!(%uid, role = profile.role.as_str(), "account created");
    Ok(Session { profile, token })
}

/// Verify credentials and open a session.
///
/// Wrong email or wrong password are indistinguishable to the caller:
/// both surface as permission-denied.
pub fn sign_in(conn: &Connection, email: &str, password: &str) -> Result<Session, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    let (uid, stored_hash) = account_credentials_by_email(conn, &email)?
        .ok_or(AuthError::PermissionDenied)?;

    if !verify_password(password, &stored_hash) {
        return Err(AuthError::PermissionDenied);
    }

    let profile = get_profile(conn, &uid)?.ok_or(AuthError::PermissionDenied)?;
    let token = open_session(conn, &uid)?;
    tracing::info!(%uid, "sign-in");
    Ok(Session { profile, token })
}

/// Invalidate a bearer token. Unknown tokens are a no-op.
pub fn sign_out(conn: &Connection, token: &str) -> Result<(), AuthError> {
    conn.execute(
        "DELETE FROM sessions WHERE token_hash = ?1",
        params![hash_token(token)],
    )
    .map_err(DatabaseError::from)?;
    Ok(())
}

/// Resolve a bearer token to its profile, or None if the session is
/// unknown or its account was deleted.
pub fn session_profile(
    conn: &Connection,
    token: &str,
) -> Result<Option<UserProfile>, AuthError> {
    let uid: Option<String> = match conn.query_row(
        "SELECT uid FROM sessions WHERE token_hash = ?1",
        params![hash_token(token)],
        |row| row.get(0),
    ) {
        Ok(uid) => Some(uid),
        Err(rusqlite::Error::QueryReturnedNoRows) => None,
        Err(e) => return Err(DatabaseError::from(e).into()),
    };

    match uid {
        Some(uid) => Ok(get_profile(conn, &uid)?),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Password hashing
// ---------------------------------------------------------------------------

/// PBKDF2-SHA256 with a random salt, stored as
/// `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.
fn hash_password(password: &str) -> String {
    use base64::Engine;
    use rand::RngCore;

    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);

    let b64 = base64::engine::general_purpose::STANDARD;
    format!(
        "pbkdf2-sha256${PBKDF2_ITERATIONS}${}${}",
        b64.encode(salt),
        b64.encode(hash)
    )
}

/// Recompute with the stored salt and iteration count, compare in
/// constant time. Malformed stored values verify as false.
fn verify_password(password: &str, stored: &str) -> bool {
    use base64::Engine;
    use subtle::ConstantTimeEq;

    let parts: Vec<&str> = stored.split('$').collect();
    let &[algo, iterations, salt_b64, hash_b64] = parts.as_slice() else {
        return false;
    };
    if algo != "pbkdf2-sha256" {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let b64 = base64::engine::general_purpose::STANDARD;
    let (Ok(salt), Ok(expected)) = (b64.decode(salt_b64), b64.decode(hash_b64)) else {
        return false;
    };

    let mut actual = vec![0u8; expected.len().max(1)];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut actual);
    actual.ct_eq(&expected).into()
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Generate a random bearer token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 of the token, base64-encoded for the sessions table.
pub fn hash_token(token: &str) -> String {
    use base64::Engine;
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize())
}

fn open_session(conn: &Connection, uid: &str) -> Result<String, AuthError> {
    let token = generate_token();
    conn.execute(
        "INSERT INTO sessions (token_hash, uid, created_at)
         VALUES (?1, ?2, ?3)",
        params![hash_token(&token), uid, Utc::now().to_rfc3339()],
    )
    .map_err(DatabaseError::from)?;
    Ok(token)
}

fn account_uid_by_email(conn: &Connection, email: &str) -> Result<Option<String>, AuthError> {
    match conn.query_row(
        "SELECT uid FROM accounts WHERE email = ?1",
        params![email],
        |row| row.get(0),
    ) {
        Ok(uid) => Ok(Some(uid)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e).into()),
    }
}

fn account_credentials_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<(String, String)>, AuthError> {
    match conn.query_row(
        "SELECT uid, password_hash FROM accounts WHERE email = ?1",
        params![email],
        |row| Ok((row.get(0)?, row.get(1)?)),
    ) {
        Ok(pair) => Ok(Some(pair)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e).into()),
    }
}

/// Minimal shape check: local part, '@', domain with a dot.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::UserRole;

    #[test]
    fn register_and_sign_in_round_trip() {
        let conn = open_memory_database().unwrap();
        let session =
            create_account(&conn, "Dra. Ana Souza", "ana@clinic.com", "correct-horse", &[])
                .unwrap();
        assert_eq!(session.profile.role, UserRole::Doctor);
        assert!(!session.token.is_empty());

        let again = sign_in(&conn, "ana@clinic.com", "correct-horse").unwrap();
        assert_eq!(again.profile.uid, session.profile.uid);
        assert_ne!(again.token, session.token);
    }

    #[test]
    fn allowlisted_registration_is_admin() {
        let conn = open_memory_database().unwrap();
        let list = vec!["chefe@clinic.com".to_string()];
        let session =
            create_account(&conn, "Chefe", "Chefe@Clinic.com", "correct-horse", &list).unwrap();
        assert_eq!(session.profile.role, UserRole::Admin);
    }

    #[test]
    fn invalid_email_rejected_before_any_write() {
        let conn = open_memory_database().unwrap();
        for email in ["", "not-an-email", "@clinic.com", "ana@", "ana@nodot"] {
            let err = create_account(&conn, "Ana", email, "correct-horse", &[]).unwrap_err();
            assert!(matches!(err, AuthError::InvalidEmail), "email {email:?}");
        }
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn weak_password_rejected() {
        let conn = open_memory_database().unwrap();
        let err = create_account(&conn, "Ana", "ana@clinic.com", "short", &[]).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword));
    }

    #[test]
    fn duplicate_email_rejected() {
        let conn = open_memory_database().unwrap();
        create_account(&conn, "Ana", "ana@clinic.com", "correct-horse", &[]).unwrap();
        let err = create_account(&conn, "Ana 2", "ANA@clinic.com", "correct-horse", &[])
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyInUse));
    }

    #[test]
    fn wrong_password_is_permission_denied() {
        let conn = open_memory_database().unwrap();
        create_account(&conn, "Ana", "ana@clinic.com", "correct-horse", &[]).unwrap();

        let err = sign_in(&conn, "ana@clinic.com", "wrong-password").unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied));
        // Unknown email is indistinguishable from a wrong password
        let err = sign_in(&conn, "ghost@clinic.com", "correct-horse").unwrap_err();
        assert!(matches!(err, AuthError::PermissionDenied));
    }

    #[test]
    fn session_resolves_until_signed_out() {
        let conn = open_memory_database().unwrap();
        let session =
            create_account(&conn, "Ana", "ana@clinic.com", "correct-horse", &[]).unwrap();

        let profile = session_profile(&conn, &session.token).unwrap().unwrap();
        assert_eq!(profile.email, "ana@clinic.com");

        sign_out(&conn, &session.token).unwrap();
        assert!(session_profile(&conn, &session.token).unwrap().is_none());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        let stored = hash_password("correct-horse");
        assert!(stored.starts_with("pbkdf2-sha256$"));
        assert!(verify_password("correct-horse", &stored));
        assert!(!verify_password("wrong", &stored));
        // Two hashes of the same password differ (random salt)
        assert_ne!(stored, hash_password("correct-horse"));
        // Malformed stored values never verify
        assert!(!verify_password("x", "not-a-hash"));
        assert!(!verify_password("x", "pbkdf2-sha256$abc$!!$!!"));
    }

    #[test]
    fn token_hash_is_stable_and_token_is_not_stored() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));

        let conn = open_memory_database().unwrap();
        let session =
            create_account(&conn, "Ana", "ana@clinic.com", "correct-horse", &[]).unwrap();
        let stored: String = conn
            .query_row("SELECT token_hash FROM sessions", [], |r| r.get(0))
            .unwrap();
        assert_ne!(stored, session.token);
        assert_eq!(stored, hash_token(&session.token));
    }
}
