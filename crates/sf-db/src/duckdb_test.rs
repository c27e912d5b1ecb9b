use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_new_memory_special_case() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();
    assert!(db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_query_integers_count() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(10) t(n)")
        .await
        .unwrap();

    let rows = db
        .query_integers("SELECT COUNT(*) FROM nums", 1)
        .await
        .unwrap();
    assert_eq!(rows, vec![vec![10]]);
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
}

#[tokio::test]
async fn test_execute_returns_affected_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();
    let affected = db
        .execute("INSERT INTO t VALUES (1), (2), (3)")
        .await
        .unwrap();
    assert_eq!(affected, 3);
}

#[tokio::test]
async fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_schema_qualified_relation() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.t (id INT);")
        .await
        .unwrap();
    assert!(db.relation_exists("staging.t").await.unwrap());
    assert!(!db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_query_integers() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE pairs (a INTEGER, b BIGINT); INSERT INTO pairs VALUES (1, 10), (2, 20);")
        .await
        .unwrap();

    let rows = db
        .query_integers("SELECT a, b FROM pairs ORDER BY a", 2)
        .await
        .unwrap();
    assert_eq!(rows, vec![vec![1, 10], vec![2, 20]]);
}

#[tokio::test]
async fn test_query_integers_missing_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db
        .query_integers("SELECT a FROM nowhere", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_invalid_sql_is_execution_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("SELEC 1").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
    assert!(err.to_string().starts_with("[D002]"));
}

#[tokio::test]
async fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE kept (id INT)").await.unwrap();
    }
    let db = DuckDbBackend::from_path(&path).unwrap();
    assert!(db.relation_exists("kept").await.unwrap());
}
