//! Subcommand execution
//!
//! Every command writes its result to `out` and logs through `tracing`, so
//! tests can drive [`run`] with a buffer and an in-memory store.

use crate::cli::{Command, SchemaCommand};
use crate::config::CliConfig;
use anyhow::{bail, Context, Result};
use mb_client::SchemaStore;
use mb_io::{ExportArtifact, ExportContext, ExportFormat, ImportMode, ImportResult, Importer};
use mb_schema::{sample_graph, MergePolicy, SchemaGraph, SchemaId};
use mb_wizard::WizardPlan;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// Outcome of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The command ran but found problems (invalid document, unknown targets)
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => Self::SUCCESS,
            Status::Failure => Self::FAILURE,
        }
    }
}

/// Execute one command
///
/// # Errors
/// Unreadable input, documents that cannot be imported, and backend failures
pub async fn run(
    command: Command,
    config: &CliConfig,
    store: &dyn SchemaStore,
    out: &mut dyn Write,
) -> Result<Status> {
    match command {
        Command::Validate { file } => validate(&file, out),
        Command::Import {
            file,
            merge_into,
            replace_duplicates,
        } => import(&file, merge_into.as_deref(), replace_duplicates, out),
        Command::Export {
            file,
            format,
            out: dest,
            base_name,
        } => {
            let format = format.unwrap_or(config.export.default_format);
            export(&file, format, dest, &base_name, out)
        }
        Command::Suggest {
            file,
            json,
            check_targets,
            submit,
        } => suggest(&file, json, check_targets, submit, store, out).await,
        Command::Sample => {
            write_json(out, &sample_graph())?;
            Ok(Status::Success)
        }
        Command::Schemas(command) => schemas(command, store, out).await,
    }
}

fn read_import(path: &Path) -> Result<ImportResult> {
    Importer::new()
        .import_file(path)
        .with_context(|| format!("cannot import {}", path.display()))
}

/// Import `path` as a graph, refusing documents with errors
fn load_graph(path: &Path) -> Result<SchemaGraph> {
    let result = read_import(path)?;
    if !result.is_importable() {
        bail!(
            "{} has {} error(s):\n  {}",
            path.display(),
            result.errors.len(),
            result.errors.join("\n  ")
        );
    }
    for warning in &result.warnings {
        warn!(file = %path.display(), "{warning}");
    }
    Ok(result.graph)
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn validate(path: &Path, out: &mut dyn Write) -> Result<Status> {
    let result = read_import(path)?;
    for error in &result.errors {
        writeln!(out, "error: {error}")?;
    }
    for warning in &result.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    if result.is_importable() {
        writeln!(
            out,
            "ok: {} master(s), {} relationship(s)",
            result.graph.master_count(),
            result.graph.relationship_count()
        )?;
        Ok(Status::Success)
    } else {
        writeln!(out, "invalid: {} error(s)", result.errors.len())?;
        Ok(Status::Failure)
    }
}

fn import(path: &Path, merge_into: Option<&Path>, replace: bool, out: &mut dyn Write) -> Result<Status> {
    let result = read_import(path)?;
    for warning in &result.warnings {
        warn!(file = %path.display(), "{warning}");
    }

    let (mut graph, mode) = match merge_into {
        Some(existing) => {
            let policy = if replace {
                MergePolicy::ReplaceDuplicates
            } else {
                MergePolicy::SkipDuplicates
            };
            (load_graph(existing)?, ImportMode::Merge(policy))
        }
        None => (SchemaGraph::new(), ImportMode::Replace),
    };

    let outcome = result
        .apply(&mut graph, mode)
        .with_context(|| format!("cannot import {}", path.display()))?;
    if !outcome.skipped.is_empty() {
        warn!(masters = %outcome.skipped.join(", "), "skipped masters that already exist");
    }
    write_json(out, &graph)?;
    Ok(Status::Success)
}

fn export(
    path: &Path,
    format: ExportFormat,
    dest: Option<PathBuf>,
    base_name: &str,
    out: &mut dyn Write,
) -> Result<Status> {
    let graph = load_graph(path)?;
    let ctx = ExportContext::now().with_base_name(base_name);
    let artifacts = mb_io::export(format, &graph, &ctx)?;

    match dest {
        Some(dir) if format == ExportFormat::CsvTemplate || dir.is_dir() => write_to_dir(&dir, &artifacts, out)?,
        None if format == ExportFormat::CsvTemplate => write_to_dir(Path::new("."), &artifacts, out)?,
        Some(file) => {
            let content: String = artifacts.iter().map(|a| a.content.as_str()).collect();
            std::fs::write(&file, content).with_context(|| format!("cannot write {}", file.display()))?;
            info!(path = %file.display(), format = ?format, "export written");
            writeln!(out, "{}", file.display())?;
        }
        None => {
            for artifact in &artifacts {
                out.write_all(artifact.content.as_bytes())?;
            }
        }
    }
    Ok(Status::Success)
}

fn write_to_dir(dir: &Path, artifacts: &[ExportArtifact], out: &mut dyn Write) -> Result<()> {
    for written in mb_io::write_artifacts(dir, artifacts)? {
        writeln!(out, "{}", written.display())?;
    }
    Ok(())
}

async fn suggest(
    path: &Path,
    as_json: bool,
    check_targets: bool,
    submit: bool,
    store: &dyn SchemaStore,
    out: &mut dyn Write,
) -> Result<Status> {
    let text = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let plan = WizardPlan::from_json(&text).with_context(|| format!("{} is not a master document", path.display()))?;

    let unknown = if check_targets || submit {
        let masters = store.list_masters().await.context("cannot list backend masters")?;
        plan.unknown_targets(&masters)
    } else {
        Vec::new()
    };

    let payload = plan.finalize()?;
    if as_json {
        write_json(
            out,
            &json!({
                "master": plan.master_name(),
                "relationships": plan.relationships(),
                "indexes": plan.indexes(),
                "unknownTargets": unknown,
                "payload": &payload,
            }),
        )?;
    } else {
        write_report(&plan, &unknown, out)?;
    }

    if submit {
        if !unknown.is_empty() {
            warn!(targets = %unknown.join(", "), "submitting with relationships to unknown masters");
        }
        let created = store
            .create_master(&payload)
            .await
            .context("cannot create master")?;
        writeln!(
            out,
            "created master {} (id {})",
            plan.master_name().unwrap_or_default(),
            created.get("id").unwrap_or(&serde_json::Value::Null)
        )?;
        return Ok(Status::Success);
    }

    Ok(if unknown.is_empty() {
        Status::Success
    } else {
        Status::Failure
    })
}

fn write_report(plan: &WizardPlan, unknown: &[String], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Master: {}", plan.master_name().unwrap_or("(unnamed)"))?;

    writeln!(out, "Relationships ({}):", plan.relationships().len())?;
    for rel in plan.relationships() {
        writeln!(
            out,
            "  {} -> {}.{} [{}] {}",
            rel.field_name,
            rel.suggested_master,
            rel.suggested_field,
            rel.confidence.as_str(),
            rel.reason
        )?;
    }

    writeln!(
        out,
        "Indexes ({}, {} accepted):",
        plan.indexes().len(),
        plan.accepted_indexes().count()
    )?;
    for index in plan.indexes() {
        writeln!(
            out,
            "  [{}] {} ({}, {}) {}",
            if index.accepted { 'x' } else { ' ' },
            index.field_name,
            index.index_type.as_str(),
            index.priority.as_str(),
            index.reason
        )?;
    }

    if !unknown.is_empty() {
        writeln!(out, "Unknown targets: {}", unknown.join(", "))?;
    }
    Ok(())
}

async fn schemas(command: SchemaCommand, store: &dyn SchemaStore, out: &mut dyn Write) -> Result<Status> {
    match command {
        SchemaCommand::List => {
            let records = store.list_schemas().await.context("cannot list schemas")?;
            if records.is_empty() {
                writeln!(out, "no schemas")?;
            }
            for r in records {
                writeln!(
                    out,
                    "{:>4}  {:<24}  v{:<3}  {:>3} masters  {:>3} relationships  {}",
                    r.id,
                    r.name,
                    r.version,
                    r.master_count,
                    r.relationship_count,
                    r.updated_at.format("%Y-%m-%d %H:%M")
                )?;
            }
        }
        SchemaCommand::Show { id } => {
            let record = store.get_schema(id).await.with_context(|| missing(id))?;
            write_json(out, record.graph())?;
        }
        SchemaCommand::Save {
            file,
            name,
            description,
            id,
        } => {
            let graph = load_graph(&file)?;
            let record = store
                .save_schema(&name, &description, graph, id)
                .await
                .with_context(|| format!("cannot save schema {name:?}"))?;
            writeln!(
                out,
                "saved schema {} {:?} (version {})",
                record.id, record.name, record.version
            )?;
        }
        SchemaCommand::Delete { id } => {
            store.delete_schema(id).await.with_context(|| missing(id))?;
            writeln!(out, "deleted schema {id}")?;
        }
        SchemaCommand::Duplicate { id } => {
            let copy = store.duplicate_schema(id).await.with_context(|| missing(id))?;
            writeln!(out, "duplicated schema {id} as {} {:?}", copy.id, copy.name)?;
        }
        SchemaCommand::Masters => {
            let masters = store.list_masters().await.context("cannot list backend masters")?;
            for m in masters {
                writeln!(out, "{:>4}  {:<24}  {}", m.id, m.name, m.display_name)?;
            }
        }
    }
    Ok(Status::Success)
}

fn missing(id: SchemaId) -> String {
    format!("schema {id}")
}
