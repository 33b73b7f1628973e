//! The seeding/login helpers against a real file-backed test database.

use aperture_auth::AuthService;
use aperture_testkit::harness::{TEST_JWT_SECRET, TestDb, templates};
use aperture_testkit::identities;
use aperture_testkit::seed;

fn test_auth() -> AuthService {
    AuthService::new(TEST_JWT_SECRET)
}

#[test]
fn create_user_db_returns_the_persisted_row() {
    let fixture = TestDb::new().unwrap();
    let user = identities::user();

    let row = seed::create_user_db(&user, &fixture.db).unwrap();

    assert_eq!(row.id, 1);
    assert_eq!(row.username, "example");
    assert_eq!(row.email, "example@example.com");
    // untouched by this helper: plaintext password, unconfirmed
    assert_eq!(row.password, "secret");
    assert!(!row.confirmed);
    assert!(!row.admin);
}

#[test]
fn create_user_db_admin_keeps_the_admin_flag() {
    let fixture = TestDb::new().unwrap();

    let row = seed::create_user_db_admin(&identities::admin(), &fixture.db).unwrap();

    assert_eq!(row.id, 99);
    assert!(row.admin);
}

#[test]
fn duplicate_email_surfaces_the_storage_error() {
    let fixture = TestDb::new().unwrap();
    let user = identities::user();
    seed::create_user_db(&user, &fixture.db).unwrap();

    let mut twin = identities::user();
    twin.id = 2;
    assert!(seed::create_user_db(&twin, &fixture.db).is_err());
}

#[test]
fn confirmed_login_hashes_the_password() {
    let fixture = TestDb::new().unwrap();
    let auth = test_auth();
    let user = identities::user();

    let row =
        seed::login_user_confirmed_true_and_hash_password(&user, &fixture.db, &auth).unwrap();

    assert!(row.confirmed);
    assert_ne!(row.password, user.password);
    assert!(auth.verify_password("secret", &row.password).unwrap());
}

#[test]
fn login_as_admin_confirms_and_hashes() {
    let fixture = TestDb::new().unwrap();
    let auth = test_auth();

    let row = seed::login_as_admin(&identities::admin(), &fixture.db, &auth).unwrap();

    assert_eq!(row.id, 99);
    assert!(row.admin);
    assert!(row.confirmed);
    assert!(auth.verify_password("admin", &row.password).unwrap());
}

#[test]
fn token_login_returns_a_bearer_bundle() {
    let fixture = TestDb::new().unwrap();
    let auth = test_auth();
    let user = identities::user();

    let bundle = seed::login_user_token_created(&user, &fixture.db, &auth).unwrap();

    assert!(!bundle.access_token.is_empty());
    assert!(!bundle.refresh_token.is_empty());
    assert_eq!(bundle.token_type, "bearer");

    // both tokens decode back to the seeded subject
    assert_eq!(
        auth.decode_access_token(&bundle.access_token).unwrap(),
        user.email
    );
    assert_eq!(
        auth.decode_refresh_token(&bundle.refresh_token).unwrap(),
        user.email
    );

    // the persisted row carries the returned refresh token
    let row = fixture.db.user_by_email(&user.email).unwrap().unwrap();
    assert_eq!(
        row.refresh_token.as_deref(),
        Some(bundle.refresh_token.as_str())
    );
}

#[test]
fn fixtures_are_isolated_from_each_other() {
    let first = TestDb::new().unwrap();
    seed::create_user_db(&identities::user(), &first.db).unwrap();

    let second = TestDb::new().unwrap();
    assert!(
        second
            .db
            .user_by_email("example@example.com")
            .unwrap()
            .is_none()
    );
}

#[test]
fn templates_engine_loads_the_fixed_directory() {
    let tera = templates().unwrap();
    assert!(
        tera.get_template_names()
            .any(|name| name == "email_confirmation.html")
    );
}
