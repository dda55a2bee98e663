//! End-to-end pipeline tests with a stub translator.

use std::path::PathBuf;

use async_trait::async_trait;
use csvql::llm::SqlTranslator;
use csvql::{CsvqlError, Identifier, Pipeline, Result, Store};

/// Translator that returns a canned SQL string.
struct StubTranslator {
    sql: String,
}

#[async_trait]
impl SqlTranslator for StubTranslator {
    async fn translate(
        &self,
        _question: &str,
        _table: &Identifier,
        _columns: &[String],
    ) -> Result<String> {
        Ok(self.sql.clone())
    }
}

/// Translator whose completion service is unreachable.
struct FailingTranslator;

#[async_trait]
impl SqlTranslator for FailingTranslator {
    async fn translate(
        &self,
        _question: &str,
        _table: &Identifier,
        _columns: &[String],
    ) -> Result<String> {
        Err(CsvqlError::TranslatorError(
            "completion service unavailable".to_string(),
        ))
    }
}

fn write_csv(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn data_table() -> Identifier {
    Identifier::normalize("data_table").unwrap()
}

#[tokio::test]
async fn import_then_ask_returns_matching_rows() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        &dir,
        "people.csv",
        "name,age,salary\nAlice,30,6000\nBob,25,4500\n",
    );
    let table = data_table();

    let mut pipeline = Pipeline::with_store(Store::open_in_memory().unwrap());
    let loaded = pipeline.import(&csv, &table).unwrap();
    assert_eq!(loaded, 2);

    let translator = StubTranslator {
        sql: "SELECT * FROM data_table WHERE CAST(salary AS REAL) > 5000".to_string(),
    };
    let output = pipeline
        .ask(&translator, "who earns more than 5000", &table)
        .await
        .unwrap();

    assert_eq!(output.columns, vec!["name", "age", "salary"]);
    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.rows[0][0], serde_json::json!("Alice"));
    assert_eq!(output.rows[0][2], serde_json::json!("6000"));
}

#[tokio::test]
async fn reimport_with_new_header_extends_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = data_table();
    let mut pipeline = Pipeline::with_store(Store::open_in_memory().unwrap());

    let first = write_csv(
        &dir,
        "people.csv",
        "name,age,salary\nAlice,30,6000\nBob,25,4500\n",
    );
    pipeline.import(&first, &table).unwrap();

    let second = write_csv(
        &dir,
        "people2.csv",
        "name,age,salary,department\nCarol,41,7000,Sales\n",
    );
    pipeline.import(&second, &table).unwrap();

    // Prior rows survive with NULL in the new column; new row has a value.
    let output = pipeline
        .run_sql("SELECT name, department FROM data_table ORDER BY name")
        .unwrap();
    assert_eq!(output.columns, vec!["name", "department"]);
    assert_eq!(output.rows.len(), 3);
    assert_eq!(output.rows[0][1], serde_json::Value::Null); // Alice
    assert_eq!(output.rows[1][1], serde_json::Value::Null); // Bob
    assert_eq!(output.rows[2][1], serde_json::json!("Sales")); // Carol
}

#[tokio::test]
async fn translator_failure_aborts_only_that_question() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, "people.csv", "name,age\nAlice,30\n");
    let table = data_table();

    let mut pipeline = Pipeline::with_store(Store::open_in_memory().unwrap());
    pipeline.import(&csv, &table).unwrap();

    let err = pipeline
        .ask(&FailingTranslator, "anything", &table)
        .await
        .unwrap_err();
    assert!(matches!(err, CsvqlError::TranslatorError(_)));

    // Store and data remain usable for the next query.
    let output = pipeline
        .run_sql("SELECT COUNT(*) FROM data_table")
        .unwrap();
    assert_eq!(output.rows[0][0], serde_json::json!(1));
}

#[tokio::test]
async fn guard_rejects_generated_writes() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, "people.csv", "name,age\nAlice,30\n");
    let table = data_table();

    let mut pipeline = Pipeline::with_store(Store::open_in_memory().unwrap());
    pipeline.import(&csv, &table).unwrap();

    let translator = StubTranslator {
        sql: "DROP TABLE data_table".to_string(),
    };
    let err = pipeline
        .ask(&translator, "drop everything", &table)
        .await
        .unwrap_err();
    assert!(matches!(err, CsvqlError::QueryError(_)));

    // Table untouched.
    let output = pipeline
        .run_sql("SELECT COUNT(*) FROM data_table")
        .unwrap();
    assert_eq!(output.rows[0][0], serde_json::json!(1));
}

#[tokio::test]
async fn ask_against_missing_table_is_schema_error() {
    let pipeline = Pipeline::with_store(Store::open_in_memory().unwrap());
    let translator = StubTranslator {
        sql: "SELECT 1".to_string(),
    };

    let err = pipeline
        .ask(&translator, "anything", &data_table())
        .await
        .unwrap_err();
    assert!(matches!(err, CsvqlError::SchemaError(_)));
}

#[test]
fn imported_rows_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir, "people.csv", "name,age\nAlice,30\nBob,25\n");
    let db_path = dir.path().join("test.db");
    let table = data_table();

    {
        let mut pipeline = Pipeline::open(&db_path).unwrap();
        pipeline.import(&csv, &table).unwrap();
    }

    let pipeline = Pipeline::open(&db_path).unwrap();
    let output = pipeline
        .run_sql("SELECT name FROM data_table ORDER BY name")
        .unwrap();
    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.rows[0][0], serde_json::json!("Alice"));
}
