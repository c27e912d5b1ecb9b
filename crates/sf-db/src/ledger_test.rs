use super::*;
use crate::DuckDbBackend;

fn ledger() -> (Arc<DuckDbBackend>, Ledger) {
    let db = Arc::new(DuckDbBackend::in_memory().unwrap());
    let ledger = Ledger::new(db.clone(), "schemaflow_ledger");
    (db, ledger)
}

fn tags(values: &[u32]) -> Vec<Tag> {
    values.iter().copied().map(Tag::new).collect()
}

#[tokio::test]
async fn test_create_if_missing_is_idempotent() {
    let (_db, ledger) = ledger();
    assert!(!ledger.exists().await.unwrap());
    assert!(ledger.create_if_missing().await.unwrap());
    assert!(ledger.exists().await.unwrap());
    assert!(!ledger.create_if_missing().await.unwrap());
}

#[tokio::test]
async fn test_missing_table_reports_not_initialized() {
    let (_db, ledger) = ledger();
    let err = ledger.applied_tags().await.unwrap_err();
    assert!(
        matches!(err, DbError::LedgerNotInitialized { ref table } if table == "schemaflow_ledger"),
        "got {err:?}"
    );
    assert!(err.to_string().starts_with("[D008]"));

    let err = ledger
        .record_applied(&[(Tag::new(1), PostStatus::NoExist)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::LedgerNotInitialized { .. }));
}

#[tokio::test]
async fn test_record_and_read_back() {
    let (_db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    ledger
        .record_applied(&[
            (Tag::new(2), PostStatus::Pending),
            (Tag::new(1), PostStatus::NoExist),
            (Tag::new(3), PostStatus::NoExist),
        ])
        .await
        .unwrap();

    let applied = ledger.applied_tags().await.unwrap();
    assert_eq!(applied.into_iter().collect::<Vec<_>>(), tags(&[1, 2, 3]));

    let statuses = ledger.post_statuses().await.unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses.get(&Tag::new(2)), Some(&PostStatus::Pending));
}

#[tokio::test]
async fn test_empty_batches_are_noops() {
    let (_db, ledger) = ledger();
    // No table exists, so any issued statement would fail.
    ledger.record_applied(&[]).await.unwrap();
    ledger.remove(&[]).await.unwrap();
    ledger.mark_post_applied(&[]).await.unwrap();
}

#[tokio::test]
async fn test_remove_rows() {
    let (_db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    ledger
        .record_applied(&[
            (Tag::new(1), PostStatus::NoExist),
            (Tag::new(2), PostStatus::NoExist),
            (Tag::new(3), PostStatus::NoExist),
        ])
        .await
        .unwrap();

    ledger.remove(&tags(&[1, 3])).await.unwrap();
    let applied = ledger.applied_tags().await.unwrap();
    assert_eq!(applied.into_iter().collect::<Vec<_>>(), tags(&[2]));
}

#[tokio::test]
async fn test_mark_post_applied() {
    let (_db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    ledger
        .record_applied(&[
            (Tag::new(1), PostStatus::Pending),
            (Tag::new(2), PostStatus::Pending),
        ])
        .await
        .unwrap();

    ledger.mark_post_applied(&tags(&[1])).await.unwrap();
    let statuses = ledger.post_statuses().await.unwrap();
    assert_eq!(statuses.get(&Tag::new(1)), Some(&PostStatus::Applied));
    assert_eq!(statuses.get(&Tag::new(2)), Some(&PostStatus::Pending));
}

#[tokio::test]
async fn test_duplicate_insert_fails() {
    let (_db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    ledger
        .record_applied(&[(Tag::new(1), PostStatus::NoExist)])
        .await
        .unwrap();
    let err = ledger
        .record_applied(&[(Tag::new(1), PostStatus::NoExist)])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}

#[tokio::test]
async fn test_corrupt_post_status() {
    let (db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    db.execute("INSERT INTO schemaflow_ledger (tag, post_status) VALUES (1, 7)")
        .await
        .unwrap();
    let err = ledger.post_statuses().await.unwrap_err();
    assert!(matches!(err, DbError::LedgerCorrupt { .. }));
}

#[tokio::test]
async fn test_negative_tag_is_corrupt() {
    let (db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    db.execute("INSERT INTO schemaflow_ledger (tag) VALUES (-4)")
        .await
        .unwrap();
    let err = ledger.applied_tags().await.unwrap_err();
    assert!(matches!(err, DbError::LedgerCorrupt { .. }));
}

#[tokio::test]
async fn test_tags_beyond_i32_round_trip() {
    let (_db, ledger) = ledger();
    ledger.create_if_missing().await.unwrap();
    ledger
        .record_applied(&[
            (Tag::new(2_147_483_647), PostStatus::NoExist),
            (Tag::new(u32::MAX), PostStatus::Pending),
        ])
        .await
        .unwrap();

    let applied = ledger.applied_tags().await.unwrap();
    assert_eq!(
        applied.into_iter().collect::<Vec<_>>(),
        tags(&[2_147_483_647, u32::MAX])
    );
    ledger.mark_post_applied(&tags(&[u32::MAX])).await.unwrap();
    assert_eq!(
        ledger.post_statuses().await.unwrap().get(&Tag::new(u32::MAX)),
        Some(&PostStatus::Applied)
    );
}
