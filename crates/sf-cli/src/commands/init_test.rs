use super::*;
use sf_db::{Database, DuckDbBackend};
use tempfile::tempdir;

fn global(project_dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: project_dir.to_path_buf(),
        conn_string: None,
        conn_key: None,
        output: OutputFormat::Text,
    }
}

#[tokio::test]
async fn test_init_scaffolds_empty_directory() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    let args = InitArgs {
        name: Some("billing".to_string()),
    };
    execute(&args, &global(root)).await.unwrap();

    let config = fs::read_to_string(root.join("schemaflow.yml")).unwrap();
    assert!(config.contains("name: \"billing\""));
    assert!(root.join("deltas").is_dir());

    let db = DuckDbBackend::new(&root.join("app.duckdb").display().to_string()).unwrap();
    assert!(db.relation_exists("schemaflow_ledger").await.unwrap());
}

#[tokio::test]
async fn test_init_keeps_existing_config() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();
    let config = "name: existing\ndeltas_dir: sql\nledger_table: my_ledger\n";
    fs::write(root.join("schemaflow.yml"), config).unwrap();

    execute(&InitArgs::default(), &global(root)).await.unwrap();

    assert_eq!(fs::read_to_string(root.join("schemaflow.yml")).unwrap(), config);
    assert!(root.join("sql").is_dir());
    let db = DuckDbBackend::new(&root.join("app.duckdb").display().to_string()).unwrap();
    assert!(db.relation_exists("my_ledger").await.unwrap());
}

#[tokio::test]
async fn test_init_twice_is_idempotent() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path();

    execute(&InitArgs::default(), &global(root)).await.unwrap();
    execute(&InitArgs::default(), &global(root)).await.unwrap();

    assert!(root.join("deltas").is_dir());
}

#[test]
fn test_default_config_name_escaped() {
    let temp_dir = tempdir().unwrap();
    assert!(write_default_config(temp_dir.path(), Some("say \"hi\"")).unwrap());
    let config = sf_core::Config::load_from_dir(temp_dir.path()).unwrap();
    assert_eq!(config.name, "say \"hi\"");
    assert!(!write_default_config(temp_dir.path(), None).unwrap());
}
