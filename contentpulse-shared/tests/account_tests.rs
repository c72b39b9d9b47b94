/// Registration and login against a real database.
///
/// Require PostgreSQL in `DATABASE_URL`; skipped otherwise.

mod common;

use contentpulse_shared::auth::account::{authenticate, register, AccountError, ValidationError};
use contentpulse_shared::models::user::{User, UserRole};

#[tokio::test]
async fn test_register_and_authenticate() {
    let Some(pool) = common::pool().await else { return };
    let username = common::unique("editor");

    let identity = register(&pool, &format!("  {}  ", username), "Calendar42")
        .await
        .unwrap();
    assert_eq!(identity.username, username);
    assert_eq!(identity.role, UserRole::User);

    let stored = User::find_by_id(&pool, identity.id).await.unwrap().unwrap();
    assert_ne!(stored.secret_hash, "Calendar42");
    assert!(stored.last_login.is_none());

    let signed_in = authenticate(&pool, &username, "Calendar42").await.unwrap();
    assert_eq!(signed_in, Some(identity.clone()));

    let stored = User::find_by_id(&pool, identity.id).await.unwrap().unwrap();
    assert!(stored.last_login.is_some());

    assert_eq!(authenticate(&pool, &username, "calendar42").await.unwrap(), None);
    assert_eq!(
        authenticate(&pool, &common::unique("nobody"), "Calendar42")
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn test_register_rejections() {
    let Some(pool) = common::pool().await else { return };
    let username = common::unique("writer");

    let cases = [
        ("Short1", ValidationError::TooShort),
        ("lowercase1", ValidationError::MissingUppercase),
        ("UPPERCASE1", ValidationError::MissingLowercase),
        ("NoDigitsHere", ValidationError::MissingDigit),
    ];
    for (secret, expected) in cases {
        match register(&pool, &username, secret).await {
            Err(AccountError::Validation(got)) => assert_eq!(got, expected, "{}", secret),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    register(&pool, &username, "Editorial9").await.unwrap();
    assert!(matches!(
        register(&pool, &username, "Editorial9").await,
        Err(AccountError::Validation(ValidationError::UsernameTaken))
    ));
}
