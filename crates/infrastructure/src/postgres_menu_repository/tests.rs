use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use pannon_application::MenuTreeRepository;
use pannon_domain::{ApplicationId, MenuItemId};

use super::PostgresMenuRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres menu tests: {error}");
    }

    Some(pool)
}

async fn seed_application(pool: &PgPool) -> Uuid {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO applications (name)
        VALUES ($1)
        RETURNING id
        "#,
    )
    .bind(format!("app-{}", Uuid::new_v4()))
    .fetch_one(pool)
    .await;

    assert!(inserted.is_ok());
    inserted.unwrap_or_default()
}

async fn seed_item(pool: &PgPool, application_id: Uuid, parent_id: Option<Uuid>, position: i32) -> Uuid {
    let inserted = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO menu_items (application_id, parent_id, label, position)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(application_id)
    .bind(parent_id)
    .bind(format!("item-{position}"))
    .bind(position)
    .fetch_one(pool)
    .await;

    assert!(inserted.is_ok());
    inserted.unwrap_or_default()
}

#[tokio::test]
async fn children_come_back_in_position_order() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresMenuRepository::new(pool.clone());
    let application_id = seed_application(&pool).await;
    let root = seed_item(&pool, application_id, None, 0).await;
    let second = seed_item(&pool, application_id, Some(root), 2).await;
    let first = seed_item(&pool, application_id, Some(root), 1).await;

    let children = repository.list_children(MenuItemId::from_uuid(root)).await;
    assert!(children.is_ok());
    let child_ids: Vec<Uuid> = children
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.id.as_uuid())
        .collect();

    assert_eq!(child_ids, vec![first, second]);
}

#[tokio::test]
async fn items_resolve_with_their_parent_pointer() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresMenuRepository::new(pool.clone());
    let application_id = seed_application(&pool).await;
    let root = seed_item(&pool, application_id, None, 0).await;
    let child = seed_item(&pool, application_id, Some(root), 1).await;

    let resolved = repository.find_item(MenuItemId::from_uuid(child)).await;
    assert!(resolved.is_ok());
    assert!(resolved.unwrap_or(None).is_some_and(|item| {
        item.parent_id == Some(MenuItemId::from_uuid(root)) && !item.is_root()
    }));

    let absent = repository.find_item(MenuItemId::new()).await;
    assert!(absent.is_ok_and(|item| item.is_none()));

    let listed = repository
        .list_items_for_application(ApplicationId::from_uuid(application_id))
        .await;
    assert!(listed.is_ok_and(|items| items.len() == 2));
}
