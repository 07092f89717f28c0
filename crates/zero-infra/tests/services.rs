//! Service-level tests: core services wired to the in-memory store.

use std::sync::Arc;

use zero_core::DomainError;
use zero_core::domain::{Page, TaskFilter, TaskPatch, TaskState, User, UserInput};
use zero_core::ports::{PasswordService, TokenService};
use zero_core::services::{
    AuthService, EMAIL_TAKEN, TOKEN_TYPE, TaskStore, USERNAME_OR_EMAIL_TAKEN, USERNAME_TAKEN,
    UserDirectory,
};
use zero_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

struct Harness {
    users: UserDirectory,
    tasks: TaskStore,
    auth: AuthService,
    passwords: Arc<Argon2PasswordService>,
}

fn jwt_config(expiration_minutes: i64) -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        expiration_minutes,
        ..JwtConfig::default()
    }
}

fn harness_with(config: JwtConfig) -> Harness {
    let store = InMemoryStore::new();
    let passwords = Arc::new(Argon2PasswordService::new());
    let tokens = Arc::new(JwtTokenService::new(config));

    Harness {
        users: UserDirectory::new(Arc::new(store.users()), passwords.clone()),
        tasks: TaskStore::new(Arc::new(store.tasks())),
        auth: AuthService::new(Arc::new(store.users()), tokens, passwords.clone()),
        passwords,
    }
}

fn harness() -> Harness {
    harness_with(jwt_config(30))
}

fn input(username: &str, email: &str, password: &str) -> UserInput {
    UserInput {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn alice(h: &Harness) -> User {
    h.users
        .create(input("alice", "alice@example.com", "secret"))
        .await
        .unwrap()
}

async fn bob(h: &Harness) -> User {
    h.users
        .create(input("bob", "bob@example.com", "hunter2"))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// User directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_user_stores_hash_not_password() {
    let h = harness();

    let user = alice(&h).await;

    assert_eq!(user.username, "alice");
    assert_ne!(user.password_hash, "secret");
    assert!(h.passwords.verify("secret", &user.password_hash));

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_user_reports_username_before_email() {
    let h = harness();
    alice(&h).await;

    let both = h
        .users
        .create(input("alice", "alice@example.com", "x"))
        .await;
    let email_only = h
        .users
        .create(input("alice2", "alice@example.com", "x"))
        .await;

    assert!(matches!(both, Err(DomainError::Conflict(msg)) if msg == USERNAME_TAKEN));
    assert!(matches!(email_only, Err(DomainError::Conflict(msg)) if msg == EMAIL_TAKEN));
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let h = harness();

    assert!(matches!(
        h.users.get(999).await,
        Err(DomainError::NotFound {
            entity_type: "User",
            id: 999
        })
    ));
}

#[tokio::test]
async fn test_list_users_respects_page() {
    let h = harness();
    alice(&h).await;
    bob(&h).await;

    let first = h.users.list(Page::new(0, 1)).await.unwrap();
    let all = h.users.list(Page::default()).await.unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].username, "alice");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_update_own_account_rehashes_password() {
    let h = harness();
    let user = alice(&h).await;

    let updated = h
        .users
        .update(user.id, input("alicia", "alicia@example.com", "new-secret"), &user)
        .await
        .unwrap();

    assert_eq!(updated.id, user.id);
    assert_eq!(updated.username, "alicia");
    assert!(h.passwords.verify("new-secret", &updated.password_hash));
    assert!(updated.updated_at >= user.updated_at);
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test]
async fn test_update_to_taken_username_conflicts() {
    let h = harness();
    let user = alice(&h).await;
    bob(&h).await;

    let result = h
        .users
        .update(user.id, input("bob", "alice@example.com", "secret"), &user)
        .await;

    assert!(matches!(result, Err(DomainError::Conflict(msg)) if msg == USERNAME_OR_EMAIL_TAKEN));
}

#[tokio::test]
async fn test_update_other_account_is_forbidden() {
    let h = harness();
    let user = alice(&h).await;
    let other = bob(&h).await;

    let result = h
        .users
        .update(other.id, input("bob", "bob@example.com", "pwned"), &user)
        .await;

    assert!(matches!(result, Err(DomainError::Forbidden)));
    assert!(matches!(
        h.users.update(999, input("x", "x@example.com", "x"), &user).await,
        Err(DomainError::Forbidden)
    ));
}

#[tokio::test]
async fn test_delete_other_account_is_forbidden() {
    let h = harness();
    let user = alice(&h).await;
    let other = bob(&h).await;

    assert!(matches!(
        h.users.delete(other.id, &user).await,
        Err(DomainError::Forbidden)
    ));
    assert!(h.users.get(other.id).await.is_ok());
}

#[tokio::test]
async fn test_delete_account_cascades_to_tasks() {
    let h = harness();
    let user = alice(&h).await;
    let other = bob(&h).await;
    h.tasks
        .create(&user, "Mine".into(), "x".into(), None)
        .await
        .unwrap();
    let kept = h
        .tasks
        .create(&other, "Theirs".into(), "x".into(), None)
        .await
        .unwrap();

    h.users.delete(user.id, &user).await.unwrap();

    assert!(matches!(
        h.users.get(user.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(h.tasks.list(&user, &TaskFilter::default()).await.unwrap().is_empty());
    let remaining = h.tasks.list(&other, &TaskFilter::default()).await.unwrap();
    assert_eq!(remaining, vec![kept]);
}

// ---------------------------------------------------------------------------
// Task store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_task_defaults_to_todo() {
    let h = harness();
    let user = alice(&h).await;

    let task = h
        .tasks
        .create(&user, "Test todo".into(), "Test todo description".into(), None)
        .await
        .unwrap();

    assert_eq!(task.owner_id, user.id);
    assert_eq!(task.state, TaskState::Todo);
    assert_eq!(task.created_at, task.updated_at);
}

#[tokio::test]
async fn test_list_tasks_filters_and_paginates() {
    let h = harness();
    let user = alice(&h).await;
    for i in 0..5 {
        h.tasks
            .create(&user, format!("Test todo {i}"), "x".into(), None)
            .await
            .unwrap();
        h.tasks
            .create(&user, format!("Other {i}"), "x".into(), None)
            .await
            .unwrap();
    }

    let by_title = TaskFilter {
        title: Some("Test".to_string()),
        ..Default::default()
    };
    let paged = TaskFilter {
        page: Page::new(0, 2),
        ..Default::default()
    };

    assert_eq!(h.tasks.list(&user, &by_title).await.unwrap().len(), 5);
    assert_eq!(h.tasks.list(&user, &paged).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_tasks_filters_by_state_and_owner() {
    let h = harness();
    let user = alice(&h).await;
    let other = bob(&h).await;
    h.tasks
        .create(&user, "a".into(), "x".into(), Some(TaskState::Draft))
        .await
        .unwrap();
    h.tasks
        .create(&user, "b".into(), "x".into(), Some(TaskState::Done))
        .await
        .unwrap();
    h.tasks
        .create(&other, "c".into(), "x".into(), Some(TaskState::Draft))
        .await
        .unwrap();

    let drafts = TaskFilter {
        state: Some(TaskState::Draft),
        ..Default::default()
    };

    let result = h.tasks.list(&user, &drafts).await.unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "a");
}

#[tokio::test]
async fn test_patch_task_keeps_absent_fields() {
    let h = harness();
    let user = alice(&h).await;
    let task = h
        .tasks
        .create(&user, "Test todo".into(), "Description".into(), None)
        .await
        .unwrap();

    let patched = h
        .tasks
        .update(
            &user,
            task.id,
            TaskPatch {
                title: Some("Updated".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.title, "Updated");
    assert_eq!(patched.description, "Description");
    assert_eq!(patched.state, TaskState::Todo);
    assert!(patched.updated_at >= task.updated_at);
}

#[tokio::test]
async fn test_empty_patch_returns_task_unchanged() {
    let h = harness();
    let user = alice(&h).await;
    let task = h
        .tasks
        .create(&user, "Test todo".into(), "Description".into(), None)
        .await
        .unwrap();

    let same = h
        .tasks
        .update(&user, task.id, TaskPatch::default())
        .await
        .unwrap();

    assert_eq!(same, task);
}

#[tokio::test]
async fn test_other_owners_task_is_not_found() {
    let h = harness();
    let user = alice(&h).await;
    let other = bob(&h).await;
    let task = h
        .tasks
        .create(&other, "Theirs".into(), "x".into(), None)
        .await
        .unwrap();

    let patch = TaskPatch {
        title: Some("Mine now".to_string()),
        ..Default::default()
    };

    assert!(matches!(
        h.tasks.update(&user, task.id, patch).await,
        Err(DomainError::NotFound {
            entity_type: "Task",
            ..
        })
    ));
    assert!(matches!(
        h.tasks.delete(&user, task.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert_eq!(h.tasks.list(&other, &TaskFilter::default()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_task() {
    let h = harness();
    let user = alice(&h).await;
    let task = h
        .tasks
        .create(&user, "Test".into(), "x".into(), None)
        .await
        .unwrap();

    h.tasks.delete(&user, task.id).await.unwrap();

    assert!(h.tasks.list(&user, &TaskFilter::default()).await.unwrap().is_empty());
    assert!(matches!(
        h.tasks.delete(&user, task.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_then_resolve() {
    let h = harness();
    let user = alice(&h).await;

    let token = h.auth.login("alice@example.com", "secret").await.unwrap();

    assert_eq!(token.token_type, TOKEN_TYPE);
    assert_eq!(token.expires_in, 1800);
    let resolved = h.auth.resolve(&token.access_token).await.unwrap();
    assert_eq!(resolved.id, user.id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let h = harness();
    alice(&h).await;

    let wrong_password = h.auth.login("alice@example.com", "wrong").await;
    let unknown_email = h.auth.login("nobody@example.com", "secret").await;

    assert!(matches!(wrong_password, Err(DomainError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(DomainError::InvalidCredentials)));
}

#[tokio::test]
async fn test_refresh_issues_a_usable_token() {
    let h = harness();
    let user = alice(&h).await;

    let token = h.auth.refresh(&user).unwrap();

    assert_eq!(h.auth.resolve(&token.access_token).await.unwrap(), user);
}

#[tokio::test]
async fn test_resolve_rejects_garbage_and_expired_tokens() {
    let h = harness_with(jwt_config(-1));
    let user = alice(&h).await;
    let expired = h.auth.refresh(&user).unwrap();

    assert!(matches!(
        h.auth.resolve(&expired.access_token).await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        h.auth.resolve("not-a-token").await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_resolve_rejects_unknown_subject() {
    let h = harness();
    let tokens = JwtTokenService::new(jwt_config(30));
    let token = tokens.generate_token("ghost@example.com").unwrap();

    assert!(matches!(
        h.auth.resolve(&token).await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_token_of_deleted_user_stops_resolving() {
    let h = harness();
    let user = alice(&h).await;
    let token = h.auth.login("alice@example.com", "secret").await.unwrap();

    h.users.delete(user.id, &user).await.unwrap();

    assert!(matches!(
        h.auth.resolve(&token.access_token).await,
        Err(DomainError::Unauthorized)
    ));
}
