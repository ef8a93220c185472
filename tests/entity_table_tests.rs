//! Integration tests for the entity table: persistence, filtering,
//! pagination, field access, and daily statistics against the in-memory
//! backend.

mod harness;

use anyhow::Result;
use entable::prelude::*;
use harness::*;

#[tokio::test]
async fn first_save_returns_fresh_id_and_stamps_audit_fields() -> Result<()> {
    let (_store, table) = store_and_table();
    let actor = ActorContext::new(7);

    let first = table.save_single(&sample_entity(&table, "One"), &actor).await?;
    let second = table.save_single(&sample_entity(&table, "Two"), &actor).await?;
    assert_ne!(first, 0);
    assert_ne!(first, second);

    let saved = table.get_single(first).await?;
    assert_eq!(saved.created_by, 7);
    assert_eq!(saved.modified_by, 7);
    assert_eq!(saved.created_date, saved.modified_date);
    Ok(())
}

#[tokio::test]
async fn resave_preserves_created_and_advances_modified() -> Result<()> {
    let (_store, table) = store_and_table();

    let id = table
        .save_single(&sample_entity(&table, "One"), &ActorContext::new(7))
        .await?;
    let original = table.get_single(id).await?;

    let mut edited = original.clone();
    edited.label = "One (edited)".to_string();
    table.save_single(&edited, &ActorContext::new(9)).await?;

    let resaved = table.get_single(id).await?;
    assert_eq!(resaved.created_by, original.created_by);
    assert_eq!(resaved.created_date, original.created_date);
    assert_eq!(resaved.modified_by, 9);
    assert!(resaved.modified_date >= original.modified_date);
    assert_eq!(resaved.label, "One (edited)");
    Ok(())
}

#[tokio::test]
async fn get_single_missing_id_is_not_found() {
    let (_store, table) = store_and_table();
    let err = table.get_single(12345).await.unwrap_err();
    assert!(matches!(
        err,
        EntableError::Entity(EntityError::NotFound { id: 12345, .. })
    ));
}

#[tokio::test]
async fn update_after_row_vanished_is_update_missing() -> Result<()> {
    let (_store, table) = store_and_table();

    let mut ghost = sample_entity(&table, "Ghost");
    ghost.id = 77;
    let err = table
        .save_single(&ghost, &ActorContext::system())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EntableError::Entity(EntityError::UpdateMissing { id: 77, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn like_filter_matches_prefix_only() -> Result<()> {
    let (_store, table) = store_and_table();
    let actor = ActorContext::system();

    for label in ["Skeleton A", "Skeleton B", "Skel", "Unrelated"] {
        table.save_single(&sample_entity(&table, label), &actor).await?;
    }

    let filters = FilterMap::new().with("label-like", "Skeleton");
    let rows = table.fetch_all(&filters, Some(OrderBy::asc("label"))).await?;
    let labels: Vec<&str> = rows.iter().map(|e| e.label.as_str()).collect();

    // Prefix extensions match; shorter strings and unrelated values do not
    assert_eq!(labels, vec!["Skeleton A", "Skeleton B"]);
    Ok(())
}

#[tokio::test]
async fn plain_filter_keys_are_ignored_not_equality() -> Result<()> {
    let (_store, table) = store_and_table();
    let actor = ActorContext::system();

    table.save_single(&sample_entity(&table, "One"), &actor).await?;
    table.save_single(&sample_entity(&table, "Two"), &actor).await?;

    // A plain key never filters; everything comes back
    let filters = FilterMap::new().with("label", "One");
    assert_eq!(table.fetch_all(&filters, None).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn multi_tag_filter_joins_the_side_table() -> Result<()> {
    let (store, table) = store_and_table();
    let actor = ActorContext::system();
    seed_tags(&store).await;

    let tagged = table
        .save_single_with_tags(
            &sample_entity(&table, "Tagged"),
            &[TagSelection::new("labels", vec![3, 4])],
            &actor,
        )
        .await?;
    table.save_single(&sample_entity(&table, "Untagged"), &actor).await?;

    let filters = FilterMap::new().with("multi_tag", "3");
    let rows = table.fetch_all(&filters, None).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, tagged);
    Ok(())
}

#[tokio::test]
async fn save_with_tags_replaces_previous_selection() -> Result<()> {
    let (store, table) = store_and_table();
    let actor = ActorContext::system();
    seed_tags(&store).await;

    let id = table
        .save_single_with_tags(
            &sample_entity(&table, "One"),
            &[TagSelection::new("labels", vec![1, 2])],
            &actor,
        )
        .await?;

    let mut edited = table.get_single(id).await?;
    edited.label = "One v2".to_string();
    table
        .save_single_with_tags(&edited, &[TagSelection::new("labels", vec![2])], &actor)
        .await?;

    let row = table.get_single(id).await?;
    let tags = row.multi_select_field("labels", &store).await?;
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].label, "Software");
    Ok(())
}

#[tokio::test]
async fn select_field_resolves_and_handles_dangling() -> Result<()> {
    let (store, table) = store_and_table();
    seed_tags(&store).await;

    let id = table
        .save_single(&sample_entity(&table, "One"), &ActorContext::system())
        .await?;
    let row = table.get_single(id).await?;

    let tag = row.select_field("category", &store).await?;
    assert_eq!(tag.map(|t| t.label), Some("Hardware".to_string()));

    // Unset key resolves to absent, never an error
    assert!(row.select_field("missing", &store).await?.is_none());

    // Dangling reference resolves to absent
    let mut dangling = table.get_single(id).await?;
    dangling.set_field("category", FieldValue::Tag(999));
    assert!(dangling.select_field("category", &store).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn pagination_counts_and_clamps() -> Result<()> {
    let (_store, table) = store_and_table();
    let actor = ActorContext::system();

    for i in 0..10 {
        table
            .save_single(&sample_entity(&table, &format!("Entity {i:02}")), &actor)
            .await?;
    }

    let paginator = table
        .fetch_paginated(&FilterMap::new(), Some(OrderBy::asc("label")))
        .with_item_count_per_page(3);

    let page = paginator.page(1).await?;
    assert_eq!(page.meta.total, 10);
    assert_eq!(page.meta.total_pages, 4);
    assert_eq!(page.items.len(), 3);
    assert!(page.meta.has_next);
    assert!(!page.meta.has_prev);

    // Page 0 clamps to page 1
    let clamped = paginator.page(0).await?;
    assert_eq!(clamped.meta.page, 1);
    assert_eq!(
        clamped.items[0].label,
        page.items[0].label
    );

    let last = paginator.page(4).await?;
    assert_eq!(last.items.len(), 1);
    assert!(!last.meta.has_next);
    Ok(())
}

#[tokio::test]
async fn daily_stats_counts_new_and_total() -> Result<()> {
    let (store, table) = store_and_table();
    let actor = ActorContext::system();

    for label in ["A", "B", "C"] {
        table.save_single(&sample_entity(&table, label), &actor).await?;
    }

    let daily = table.generate_daily_stats(&store).await?;
    assert_eq!(daily.total, 3);
    assert_eq!(daily.new, 3);

    let records = store.stats_for_key("skeleton-daily").await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].data["new"], 3);
    assert_eq!(records[0].data["total"], 3);
    Ok(())
}
