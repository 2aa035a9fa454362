//! Master Builder document I/O
//!
//! Ingress and egress for [`mb_schema::SchemaGraph`]:
//!
//! - [`import`]: parse, validate and convert schema documents (JSON or YAML)
//! - [`parsers`]: extension-keyed parser registry
//! - [`export`]: JSON, SQL DDL, Django, SQLAlchemy and CSV template generators
//!
//! # Example
//!
//! ```rust
//! use mb_io::export::{generate_export, ExportContext, ExportFormat};
//! use mb_io::import::import_json;
//!
//! let json = generate_export(ExportFormat::Json, &mb_schema::sample_graph(), &ExportContext::now()).unwrap();
//! let back = import_json(&json);
//! assert!(back.is_importable());
//! assert_eq!(back.graph.master_count(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;

pub mod export;
pub mod import;
pub mod parsers;

pub use error::{ExportError, IoError, ParseError, Result};
pub use export::{export, generate_export, ExportArtifact, ExportContext, ExportFormat, Exporter};
pub use import::{check_duplicates, import_any, import_json, import_yaml, ImportMode, ImportResult, Importer};
/// Grid placement shared with [`mb_schema::SchemaGraph::add_master`]
pub use mb_schema::auto_layout_position;
pub use parsers::{default_parsers, ParserRegistry, SchemaParser};

/// Write export artifacts into `dir`, returning the written paths
///
/// # Errors
/// [`IoError::Write`] on the first file that cannot be written
pub fn write_artifacts(dir: &std::path::Path, artifacts: &[ExportArtifact]) -> Result<Vec<std::path::PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::write(dir, e))?;
    artifacts
        .iter()
        .map(|artifact| {
            let path = dir.join(&artifact.file_name);
            std::fs::write(&path, &artifact.content).map_err(|e| IoError::write(&path, e))?;
            tracing::debug!(path = %path.display(), bytes = artifact.content.len(), "wrote export file");
            Ok(path)
        })
        .collect()
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
