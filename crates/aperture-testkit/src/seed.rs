//! Helpers that commit a synthetic identity into real storage and walk
//! it through the state transitions of a working login (hashed
//! password, confirmed email, minted tokens).

use anyhow::{Context, Result};

use aperture_auth::AuthService;
use aperture_db::Database;
use aperture_db::models::{NewUser, UserRow};
use aperture_types::api::TokenBundle;

use crate::identities::TestUser;

/// Insert the identity as-is (explicit id, plaintext password) and hand
/// back the persisted row. Storage-constraint violations such as a
/// duplicate email surface unchanged.
pub fn create_user_db(user: &TestUser, db: &Database) -> Result<UserRow> {
    let id = db.insert_user(&NewUser {
        id: Some(user.id),
        username: &user.username,
        email: &user.email,
        password: &user.password,
        admin: user.admin,
    })?;

    db.user_by_id(id)?
        .with_context(|| format!("user {} vanished right after insert", user.email))
}

/// Same operation for the administrator persona; the record carries its
/// own admin flag.
pub fn create_user_db_admin(admin: &TestUser, db: &Database) -> Result<UserRow> {
    create_user_db(admin, db)
}

/// Persist the identity, then hash its password and mark it confirmed —
/// the state a user reaches after completing email verification.
pub fn login_user_confirmed_true_and_hash_password(
    user: &TestUser,
    db: &Database,
    auth: &AuthService,
) -> Result<UserRow> {
    create_user_db(user, db)?;
    hash_and_confirm(&user.email, db, auth)
}

pub fn login_as_admin(admin: &TestUser, db: &Database, auth: &AuthService) -> Result<UserRow> {
    create_user_db_admin(admin, db)?;
    hash_and_confirm(&admin.email, db, auth)
}

/// Full login seeding: confirmed user with hashed password plus a minted
/// access/refresh pair. The refresh token lands on the row exactly as
/// the login route would store it.
pub fn login_user_token_created(
    user: &TestUser,
    db: &Database,
    auth: &AuthService,
) -> Result<TokenBundle> {
    login_user_confirmed_true_and_hash_password(user, db, auth)?;

    let row = db
        .user_by_email(&user.email)?
        .with_context(|| format!("user {} not found after login seeding", user.email))?;

    let access_token = auth.create_access_token(&row.email)?;
    let refresh_token = auth.create_refresh_token(&row.email)?;
    db.set_refresh_token(&row.email, Some(&refresh_token))?;

    Ok(TokenBundle {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
    })
}

fn hash_and_confirm(email: &str, db: &Database, auth: &AuthService) -> Result<UserRow> {
    // The row was committed a moment ago; if the lookup still misses,
    // fail loudly instead of mutating nothing.
    let row = db
        .user_by_email(email)?
        .with_context(|| format!("user {email} not found after persistence"))?;

    let password_hash = auth.hash_password(&row.password)?;
    db.set_password(email, &password_hash)?;
    db.confirm_email(email)?;

    db.user_by_email(email)?
        .with_context(|| format!("user {email} not found after confirmation"))
}
