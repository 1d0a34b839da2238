//! Scope name backfill and role binding synthesis against a real (SQLite) store.

mod common;

use std::collections::HashMap;

use common::*;
use oauth_data_migrator::migrators::{MigrationStep, ScopeMigrator};
use oauth_data_migrator::tenant::TenantPolicy;
use tokio_test::assert_ok;

#[tokio::test]
async fn test_roles_become_bindings_in_order() {
    let db = setup_test_db().await;
    let scope_id = insert_scope(&db, "openid", Some("OpenID"), Some("admin,viewer,")).await;

    let ctx = context(db.clone(), HashMap::new(), TenantPolicy::default());
    assert_ok!(ScopeMigrator.migrate(&ctx).await);

    let bindings: Vec<_> = all_bindings(&db)
        .await
        .into_iter()
        .map(|b| (b.scope_id, b.scope_binding))
        .collect();
    assert_eq!(
        bindings,
        vec![
            (scope_id, "admin".to_string()),
            (scope_id, "viewer".to_string()),
            (scope_id, String::new()),
        ]
    );
    // Named scope is left untouched
    assert_eq!(find_scope(&db, scope_id).await.name.as_deref(), Some("OpenID"));
}

#[tokio::test]
async fn test_blank_name_filled_from_key() {
    let db = setup_test_db().await;
    let unnamed = insert_scope(&db, "read_profile", None, None).await;
    let blank = insert_scope(&db, "write_profile", Some("   "), Some("editor")).await;
    let named = insert_scope(&db, "email", Some("Email"), None).await;

    let ctx = context(db.clone(), HashMap::new(), TenantPolicy::default());
    assert_ok!(ScopeMigrator.migrate(&ctx).await);

    assert_eq!(find_scope(&db, unnamed).await.name.as_deref(), Some("read_profile"));
    assert_eq!(find_scope(&db, blank).await.name.as_deref(), Some("write_profile"));
    assert_eq!(find_scope(&db, named).await.name.as_deref(), Some("Email"));

    let bindings = all_bindings(&db).await;
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].scope_id, blank);
    assert_eq!(bindings[0].scope_binding, "editor");
}

#[tokio::test]
async fn test_blank_roles_produce_no_bindings() {
    let db = setup_test_db().await;
    insert_scope(&db, "a", Some("A"), None).await;
    insert_scope(&db, "b", Some("B"), Some("")).await;
    insert_scope(&db, "c", Some("C"), Some(" ")).await;

    let ctx = context(db.clone(), HashMap::new(), TenantPolicy::default());
    assert_ok!(ScopeMigrator.migrate(&ctx).await);

    assert!(all_bindings(&db).await.is_empty());
}

#[tokio::test]
async fn test_duplicate_roles_are_kept() {
    let db = setup_test_db().await;
    let scope_id = insert_scope(&db, "k", Some("K"), Some("admin,admin")).await;

    let ctx = context(db.clone(), HashMap::new(), TenantPolicy::default());
    assert_ok!(ScopeMigrator.migrate(&ctx).await);

    let bindings = all_bindings(&db).await;
    assert_eq!(bindings.len(), 2);
    assert!(bindings.iter().all(|b| b.scope_id == scope_id && b.scope_binding == "admin"));
}

#[tokio::test]
async fn test_empty_scope_table_is_a_no_op() {
    let db = setup_test_db().await;
    let ctx = context(db.clone(), HashMap::new(), TenantPolicy::default());
    assert_ok!(ScopeMigrator.migrate(&ctx).await);
    assert!(all_bindings(&db).await.is_empty());
}
