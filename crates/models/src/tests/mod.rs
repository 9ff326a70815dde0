//! Entity helper tests against a throwaway SQLite database.

use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

use crate::db::connect_temp_sqlite;
use crate::errors::ModelError;
use crate::{contact, message, user};

#[tokio::test]
async fn contact_insert_and_lookup() -> Result<()> {
    let db = connect_temp_sqlite("models_contact").await?;

    let created = contact::create(&db, Some("Alice".into()), Some("555-0100".into()), Some("hi".into()), None).await?;
    assert!(created.id > 0);
    assert_eq!(created.image_url, None);

    let found = contact::find_by_name(&db, "Alice").await?.expect("contact exists");
    assert_eq!(found.id, created.id);
    // 精确匹配，大小写敏感
    assert!(contact::find_by_name(&db, "alice").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_name_maps_to_duplicate_error() -> Result<()> {
    let db = connect_temp_sqlite("models_dup").await?;
    contact::create(&db, Some("Bob".into()), Some("1".into()), Some("a".into()), None).await?;

    let err = contact::create(&db, Some("Bob".into()), Some("2".into()), Some("b".into()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Duplicate(_)), "got {err:?}");
    assert_eq!(contact::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn missing_required_column_is_rejected_by_store() -> Result<()> {
    let db = connect_temp_sqlite("models_missing").await?;
    let err = contact::create(&db, Some("Carol".into()), None, Some("n".into()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::Db(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn update_and_delete_report_rows_affected() -> Result<()> {
    let db = connect_temp_sqlite("models_update").await?;
    let c = contact::create(&db, Some("Dan".into()), Some("1".into()), Some("n".into()), Some("/uploads/1.png".into())).await?;

    let n = contact::update_text_fields(&db, c.id, Some("Daniel".into()), Some("2".into()), Some("m".into())).await?;
    assert_eq!(n, 1);
    let after = contact::Entity::find_by_id(c.id).one(&db).await?.expect("row");
    assert_eq!(after.contact_name, "Daniel");
    assert_eq!(after.image_url.as_deref(), Some("/uploads/1.png"));

    assert_eq!(contact::update_text_fields(&db, c.id + 100, Some("x".into()), Some("y".into()), Some("z".into())).await?, 0);
    assert_eq!(contact::delete(&db, c.id + 100).await?, 0);
    assert_eq!(contact::delete(&db, c.id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_substring() -> Result<()> {
    let db = connect_temp_sqlite("models_search").await?;
    contact::create(&db, Some("Alice".into()), Some("1".into()), Some("n".into()), None).await?;
    contact::create(&db, Some("Malik".into()), Some("2".into()), Some("n".into()), None).await?;
    contact::create(&db, Some("100%_real".into()), Some("3".into()), Some("n".into()), None).await?;

    let names = |rows: Vec<contact::Model>| rows.into_iter().map(|c| c.contact_name).collect::<Vec<_>>();
    assert_eq!(names(contact::search_by_name(&db, "ALI").await?), vec!["Alice", "Malik"]);
    assert_eq!(names(contact::search_by_name(&db, "alice").await?), vec!["Alice"]);
    assert!(contact::search_by_name(&db, "zzz").await?.is_empty());
    // 通配符按字面量匹配
    assert_eq!(names(contact::search_by_name(&db, "%_").await?), vec!["100%_real"]);
    Ok(())
}

#[tokio::test]
async fn image_url_lookup_distinguishes_missing_contact() -> Result<()> {
    let db = connect_temp_sqlite("models_image").await?;
    contact::create(&db, Some("Eve".into()), Some("1".into()), Some("n".into()), None).await?;

    assert_eq!(contact::find_image_url(&db, "Eve").await?, Some(None));
    assert_eq!(contact::find_image_url(&db, "Nobody").await?, None);
    Ok(())
}

#[tokio::test]
async fn messages_listed_most_recent_first() -> Result<()> {
    let db = connect_temp_sqlite("models_message").await?;
    for text in ["first", "second", "third"] {
        message::create(&db, 7, Some(text.into())).await?;
    }
    message::create(&db, 8, Some("other".into())).await?;

    let rows = message::list_for_contact(&db, 7).await?;
    let texts: Vec<_> = rows.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(texts, vec!["third", "second", "first"]);
    assert!(rows.windows(2).all(|w| w[0].message_timestamp >= w[1].message_timestamp));
    assert!(message::list_for_contact(&db, 999).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn user_lookup_by_username() -> Result<()> {
    let db = connect_temp_sqlite("models_user").await?;
    user::ActiveModel {
        username: Set("admin".into()),
        password: Set("secret".into()),
        role: Set("admin".into()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let rows = user::find_by_username(&db, "admin").await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].role, "admin");
    assert!(user::find_by_username(&db, "ghost").await?.is_empty());
    Ok(())
}
