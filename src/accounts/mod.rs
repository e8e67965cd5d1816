//! User accounts: registration with email activation, token login,
//! and the per-user contact profile.
//!
//! New accounts start inactive. Registration issues a one-time
//! activation token and hands the link to an [`ActivationNotifier`];
//! only activated users can log in or authenticate with a bearer token.

pub mod error;
pub mod notifier;

pub use error::AccountError;
pub use notifier::{ActivationNotice, ActivationNotifier, LogActivationNotifier, NotifyError};

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::crypto::{decode_uid, encode_uid, generate_token, hash_password, hash_token, verify_password};
use crate::db::repository;
use crate::models::enums::{BloodGroup, Gender};
use crate::models::{NewUser, User, UserId, UserProfile, UserProfileView};

pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_NAME_LEN: usize = 150;
pub const MAX_MOBILE_LEN: usize = 12;

const BLANK: &str = "This field may not be blank.";

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern compiles"));

/// One `@`, no whitespace, and a dotted domain without empty labels.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(?:\.[^@\s.]+)+$").expect("email pattern compiles")
});

/// Case-insensitive unique index on `users.email`.
const EMAIL_CONSTRAINT: &str = "idx_users_email";

/// Sign-up form. Missing fields deserialize as empty and fail validation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile_number: String,
    pub blood_group: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub mobile_number: String,
    pub blood_group: String,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: UserId,
}

/// Create an inactive account plus its profile and send the activation link.
///
/// All writes share one transaction that commits only after the notifier
/// accepted the link, so a failed delivery leaves no half-registered user.
pub fn register(
    conn: &Connection,
    input: Registration,
    password_iterations: u32,
    base_url: &str,
    notifier: &dyn ActivationNotifier,
) -> Result<UserId, AccountError> {
    let username = required("username", &input.username)?;
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(too_long("username", MAX_USERNAME_LEN));
    }
    if !USERNAME_PATTERN.is_match(username) {
        return Err(AccountError::invalid(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    let first_name = input.first_name.trim();
    if first_name.chars().count() > MAX_NAME_LEN {
        return Err(too_long("first_name", MAX_NAME_LEN));
    }
    let last_name = input.last_name.trim();
    if last_name.chars().count() > MAX_NAME_LEN {
        return Err(too_long("last_name", MAX_NAME_LEN));
    }
    let email = required("email", &input.email)?;
    if !looks_like_email(email) {
        return Err(AccountError::invalid("email", "Enter a valid email address."));
    }
    let mobile_number = mobile("mobile_number", &input.mobile_number)?;
    let blood_group = blood_group(&input.blood_group)?;
    if input.password.is_empty() {
        return Err(AccountError::invalid("password", BLANK));
    }
    if input.confirm_password.is_empty() {
        return Err(AccountError::invalid("confirm_password", BLANK));
    }

    if repository::username_exists(conn, username)? {
        return Err(duplicate_username());
    }
    if input.password != input.confirm_password {
        return Err(AccountError::invalid("password", "Passwords don't match."));
    }
    if repository::email_exists(conn, email)? {
        return Err(duplicate_email());
    }

    let password_hash = hash_password(&input.password, password_iterations);

    let tx = conn.unchecked_transaction()?;
    let user_id = repository::insert_user(
        &tx,
        &NewUser {
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .map_err(|err| match err.unique_constraint() {
        Some(EMAIL_CONSTRAINT) => duplicate_email(),
        Some(_) => duplicate_username(),
        None => AccountError::Database(err),
    })?;

    repository::upsert_user_profile(
        &tx,
        &UserProfile {
            user_id,
            mobile_number: mobile_number.to_string(),
            blood_group,
            gender: None,
        },
    )?;

    let token = generate_token();
    repository::insert_activation_token(&tx, user_id, &hash_token(&token))?;

    let notice = ActivationNotice {
        username: username.to_string(),
        email: email.to_string(),
        link: activation_link(base_url, user_id, &token),
    };
    notifier.send_activation(&notice).map_err(|err| {
        tracing::error!(user_id = %user_id, error = %err, "Activation notice not delivered");
        AccountError::NotificationFailed(err.to_string())
    })?;

    tx.commit()?;

    tracing::info!(user_id = %user_id, username, "User registered");
    Ok(user_id)
}

/// `{base_url}/users/activate/{uid64}/{token}/`
pub fn activation_link(base_url: &str, user: UserId, token: &str) -> String {
    format!(
        "{}/users/activate/{}/{}/",
        base_url.trim_end_matches('/'),
        encode_uid(user.0),
        token
    )
}

/// Consume an activation token and mark its user active.
pub fn activate(conn: &Connection, uid64: &str, token: &str) -> Result<UserId, AccountError> {
    let user = decode_uid(uid64)
        .map(UserId)
        .ok_or(AccountError::InvalidActivation)?;

    let tx = conn.unchecked_transaction()?;
    if !repository::take_activation_token(&tx, user, &hash_token(token))? {
        tracing::debug!(user_id = %user, "Activation token rejected");
        return Err(AccountError::InvalidActivation);
    }
    repository::activate_user(&tx, user)?;
    tx.commit()?;

    tracing::info!(user_id = %user, "User activated");
    Ok(user)
}

/// Check credentials and issue a fresh bearer token, replacing any earlier one.
pub fn login(conn: &Connection, username: &str, password: &str) -> Result<LoginOutcome, AccountError> {
    let Some(creds) = repository::get_credentials(conn, username)? else {
        tracing::warn!(username, "Login rejected: unknown user");
        return Err(AccountError::InvalidCredentials);
    };

    let matches = verify_password(password, &creds.password_hash).unwrap_or_else(|err| {
        tracing::warn!(user_id = %creds.id, error = %err, "Stored password hash unreadable");
        false
    });
    if !matches || !creds.is_active {
        tracing::warn!(user_id = %creds.id, active = creds.is_active, "Login rejected");
        return Err(AccountError::InvalidCredentials);
    }

    let token = generate_token();
    repository::replace_auth_token(conn, creds.id, &hash_token(&token))?;

    tracing::info!(user_id = %creds.id, "User logged in");
    Ok(LoginOutcome {
        token,
        user_id: creds.id,
    })
}

pub fn logout(conn: &Connection, user: UserId) -> Result<(), AccountError> {
    if repository::delete_auth_token(conn, user)? {
        tracing::info!(user_id = %user, "User logged out");
    }
    Ok(())
}

/// Resolve a bearer token to an active user.
pub fn authenticate(conn: &Connection, token: &str) -> Result<Option<UserId>, AccountError> {
    Ok(repository::user_for_auth_token(conn, &hash_token(token))?)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, AccountError> {
    Ok(repository::list_users(conn)?)
}

pub fn get_user(conn: &Connection, id: i64) -> Result<User, AccountError> {
    repository::get_user(conn, UserId(id))?.ok_or(AccountError::NotFound { entity: "User", id })
}

pub fn get_profile(conn: &Connection, user_id: i64) -> Result<UserProfileView, AccountError> {
    repository::get_user_profile(conn, UserId(user_id))?.ok_or(AccountError::NotFound {
        entity: "UserProfile",
        id: user_id,
    })
}

/// Create or overwrite the profile of `target`. Only its owner may do so.
pub fn save_profile(
    conn: &Connection,
    acting_user: UserId,
    target: i64,
    input: ProfileInput,
) -> Result<UserProfileView, AccountError> {
    if !acting_user.is_same_user(&UserId(target)) {
        return Err(AccountError::Forbidden);
    }

    let mobile_number = mobile("mobile_number", &input.mobile_number)?;
    let blood_group = blood_group(&input.blood_group)?;
    let gender = match input.gender.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<Gender>().map_err(|_| {
            AccountError::invalid("gender", format!("\"{raw}\" is not a valid choice."))
        })?),
    };

    repository::upsert_user_profile(
        conn,
        &UserProfile {
            user_id: acting_user,
            mobile_number: mobile_number.to_string(),
            blood_group,
            gender,
        },
    )?;
    get_profile(conn, target)
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AccountError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AccountError::invalid(field, BLANK));
    }
    Ok(value)
}

fn mobile<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AccountError> {
    let value = required(field, value)?;
    if value.chars().count() > MAX_MOBILE_LEN {
        return Err(too_long(field, MAX_MOBILE_LEN));
    }
    Ok(value)
}

fn blood_group(value: &str) -> Result<BloodGroup, AccountError> {
    let value = required("blood_group", value)?;
    value
        .parse()
        .map_err(|_| AccountError::invalid("blood_group", format!("\"{value}\" is not a valid choice.")))
}

fn too_long(field: &'static str, max: usize) -> AccountError {
    AccountError::invalid(field, format!("Ensure this field has no more than {max} characters."))
}

fn duplicate_username() -> AccountError {
    AccountError::invalid("username", "A user with that username already exists.")
}

fn duplicate_email() -> AccountError {
    AccountError::invalid("email", "Email already exists.")
}

fn looks_like_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}
