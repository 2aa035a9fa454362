//! `mb` commands driven through `run` with an in-memory backend

use clap::Parser;
use mb_cli::{run, Cli, CliConfig, Status};
use mb_client::{MemorySchemaStore, SchemaStore};
use mb_schema::{MasterSummary, SchemaGraph};
use mb_test_utils::{wizard_master_json, HR_DOCUMENT_JSON, HR_DOCUMENT_YAML, MINIMAL_JSON};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

async fn mb(args: &[&str], store: &dyn SchemaStore) -> (anyhow::Result<Status>, String) {
    mb_with(args, &CliConfig::default(), store).await
}

async fn mb_with(args: &[&str], config: &CliConfig, store: &dyn SchemaStore) -> (anyhow::Result<Status>, String) {
    let cli = Cli::parse_from(std::iter::once("mb").chain(args.iter().copied()));
    let mut out = Vec::new();
    let status = run(cli.command, config, store, &mut out).await;
    (status, String::from_utf8(out).unwrap())
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn masters(names: &[&str]) -> Vec<MasterSummary> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| serde_json::from_value(json!({"id": i + 1, "name": name, "display_name": name})).unwrap())
        .collect()
}

#[tokio::test]
async fn validate_reports_warnings_and_counts() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.json", HR_DOCUMENT_JSON);
    let store = MemorySchemaStore::new();

    let (status, out) = mb(&["validate", arg(&doc)], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert!(out.contains(r#"warning: Relationship: Target master "locations" not found in imported masters"#));
    assert!(out.ends_with("ok: 3 master(s), 2 relationship(s)\n"), "{out}");
}

#[tokio::test]
async fn validate_fails_on_broken_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "broken.json", r#"{"masters": [{"fields": []}]}"#);
    let store = MemorySchemaStore::new();

    let (status, out) = mb(&["validate", arg(&doc)], &store).await;
    assert_eq!(status.unwrap(), Status::Failure);
    assert!(out.lines().any(|l| l.starts_with("error: ")), "{out}");
    assert!(out.contains("invalid: "));
}

#[tokio::test]
async fn unknown_extension_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.xml", "<masters/>");
    let (status, _) = mb(&["validate", arg(&doc)], &MemorySchemaStore::new()).await;
    assert!(format!("{:#}", status.unwrap_err()).contains("hr.xml"));
}

#[tokio::test]
async fn import_merges_into_existing_graph() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.json", HR_DOCUMENT_JSON);
    let existing = write(&dir, "base.yaml", HR_DOCUMENT_YAML);
    let store = MemorySchemaStore::new();

    let (status, out) = mb(&["import", arg(&doc), "--merge-into", arg(&existing)], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    let graph: SchemaGraph = serde_json::from_str(&out).unwrap();
    let names: Vec<&str> = graph.master_names().collect();
    assert_eq!(names, ["departments", "employees", "leave_types"]);
}

#[tokio::test]
async fn import_replaces_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "min.json", MINIMAL_JSON);
    let (status, out) = mb(&["import", arg(&doc)], &MemorySchemaStore::new()).await;
    assert_eq!(status.unwrap(), Status::Success);
    let graph: SchemaGraph = serde_json::from_str(&out).unwrap();
    assert_eq!(graph.master_count(), 1);
    assert_eq!(graph.relationship_count(), 0);
}

#[tokio::test]
async fn export_to_stdout_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.json", HR_DOCUMENT_JSON);
    let store = MemorySchemaStore::new();

    let (status, out) = mb(&["export", arg(&doc), "-f", "sql"], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert!(out.contains("CREATE TABLE departments ("));

    let target = dir.path().join("models.py");
    let (status, out) = mb(&["export", arg(&doc), "-f", "django", "-o", arg(&target)], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert_eq!(out.trim_end(), arg(&target));
    assert!(std::fs::read_to_string(&target).unwrap().contains("class Departments(models.Model):"));

    let csv_dir = dir.path().join("templates");
    let (status, out) = mb(&["export", arg(&doc), "-f", "csv", "-o", arg(&csv_dir)], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert_eq!(out.lines().count(), 3);
    assert!(csv_dir.join("departments_template.csv").is_file());
}

#[tokio::test]
async fn export_uses_configured_default_format() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.json", HR_DOCUMENT_JSON);
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();
    let config = CliConfig::from_toml("[export]\ndefault_format = \"sqlalchemy\"\n").unwrap();

    let (status, out) = mb_with(
        &["export", arg(&doc), "-o", arg(&out_dir), "--base-name", "hr"],
        &config,
        &MemorySchemaStore::new(),
    )
    .await;
    assert_eq!(status.unwrap(), Status::Success);
    assert_eq!(out.trim_end(), arg(&out_dir.join("hr.py")));
}

#[tokio::test]
async fn export_refuses_invalid_document() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "broken.json", r#"{"masters": "nope"}"#);
    let (status, out) = mb(&["export", arg(&doc), "-f", "json"], &MemorySchemaStore::new()).await;
    assert!(format!("{:#}", status.unwrap_err()).contains("error(s)"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn suggest_report_lists_rules() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "employees.json", &wizard_master_json().to_string());

    let (status, out) = mb(&["suggest", arg(&doc)], &MemorySchemaStore::new()).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert!(out.starts_with("Master: employees\nRelationships (3):\n"), "{out}");
    assert!(out.contains("  department_id -> departments.id [high]"));
    assert!(out.contains("Indexes (6, 5 accepted):"));
    assert!(out.contains("  [ ] joined_on (btree, medium) Date fields used in range queries"));
}

#[tokio::test]
async fn suggest_check_targets_against_backend() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "employees.json", &wizard_master_json().to_string());
    let store = MemorySchemaStore::with_masters(masters(&["departments", "members"]));

    let (status, out) = mb(&["suggest", arg(&doc), "--json", "--check-targets"], &store).await;
    assert_eq!(status.unwrap(), Status::Failure);
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["unknownTargets"], json!(["leaves"]));
    assert_eq!(report["payload"]["name"], "employees");
    assert_eq!(report["relationships"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn suggest_submit_creates_master() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "employees.json", &wizard_master_json().to_string());
    let store = MemorySchemaStore::with_masters(masters(&["departments", "members", "leaves"]));

    let (status, out) = mb(&["suggest", arg(&doc), "--submit"], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert!(out.ends_with("created master employees (id 4)\n"), "{out}");
    let names: Vec<String> = store.list_masters().await.unwrap().into_iter().map(|m| m.name).collect();
    assert_eq!(names, ["departments", "members", "leaves", "employees"]);
}

#[tokio::test]
async fn schema_commands_round_trip_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "hr.yaml", HR_DOCUMENT_YAML);
    let store = MemorySchemaStore::new();

    let (status, out) = mb(&["schemas", "list"], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert_eq!(out, "no schemas\n");

    let (status, out) = mb(&["schemas", "save", arg(&doc), "-n", "HR", "-d", "people"], &store).await;
    assert_eq!(status.unwrap(), Status::Success);
    assert_eq!(out, "saved schema 1 \"HR\" (version 1)\n");

    let (_, out) = mb(&["schemas", "save", arg(&doc), "-n", "HR", "--id", "1"], &store).await;
    assert_eq!(out, "saved schema 1 \"HR\" (version 2)\n");

    let (_, out) = mb(&["schemas", "duplicate", "1"], &store).await;
    assert_eq!(out, "duplicated schema 1 as 2 \"HR_copy\"\n");

    let (_, out) = mb(&["schemas", "show", "1"], &store).await;
    let graph: SchemaGraph = serde_json::from_str(&out).unwrap();
    assert_eq!(graph.master_count(), 2);

    let (_, out) = mb(&["schemas", "delete", "2"], &store).await;
    assert_eq!(out, "deleted schema 2\n");

    let (_, out) = mb(&["schemas", "list"], &store).await;
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("HR") && out.contains("v2"));
}

#[tokio::test]
async fn missing_schema_is_reported() {
    let (status, _) = mb(&["schemas", "show", "99"], &MemorySchemaStore::new()).await;
    let message = format!("{:#}", status.unwrap_err());
    assert!(message.contains("schema 99") && message.contains("Not found."), "{message}");
}
