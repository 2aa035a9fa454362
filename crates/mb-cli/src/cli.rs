//! Command-line arguments

use clap::{Parser, Subcommand};
use mb_io::ExportFormat;
use mb_schema::SchemaId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mb")]
#[command(author, version, about = "Visual Master Builder: schema import, suggestions and code generation", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./master-builder.toml when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a schema document and list its problems
    Validate {
        /// JSON or YAML document
        file: PathBuf,
    },

    /// Convert a schema document into a diagram graph
    Import {
        /// JSON or YAML document
        file: PathBuf,

        /// Existing diagram graph to merge into instead of replacing
        #[arg(long, value_name = "GRAPH")]
        merge_into: Option<PathBuf>,

        /// With --merge-into, imported masters overwrite existing ones
        #[arg(long, requires = "merge_into")]
        replace_duplicates: bool,
    },

    /// Generate code or documents from a schema document or diagram graph
    Export {
        /// Schema document or diagram graph
        file: PathBuf,

        /// json, sql, django, sqlalchemy or csv (default from config)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output file, or directory for csv templates
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Base name of generated files
        #[arg(long, default_value = mb_io::export::DEFAULT_BASE_NAME)]
        base_name: String,
    },

    /// Suggest relationships and indexes for one master document
    Suggest {
        /// Master document (`{name, fields: [...]}`)
        file: PathBuf,

        /// Print the suggestions and creation payload as JSON
        #[arg(long)]
        json: bool,

        /// Compare suggested targets with the backend's masters
        #[arg(long)]
        check_targets: bool,

        /// Create the master on the backend
        #[arg(long)]
        submit: bool,
    },

    /// Print the built-in sample graph
    Sample,

    /// Work with schemas stored on the backend
    #[command(subcommand)]
    Schemas(SchemaCommand),
}

#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// List active schemas
    List,

    /// Print a stored schema's diagram graph
    Show { id: SchemaId },

    /// Store a schema document or diagram graph
    Save {
        file: PathBuf,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Update this schema instead of creating a new one
        #[arg(long)]
        id: Option<SchemaId>,
    },

    /// Delete a schema
    Delete { id: SchemaId },

    /// Copy a schema under a new name
    Duplicate { id: SchemaId },

    /// List masters defined on the backend
    Masters,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_format() {
        let cli = Cli::parse_from(["mb", "export", "hr.yaml", "-f", "django", "-o", "models.py"]);
        match cli.command {
            Command::Export { format, out, base_name, .. } => {
                assert_eq!(format, Some(ExportFormat::Django));
                assert_eq!(out.as_deref(), Some(std::path::Path::new("models.py")));
                assert_eq!(base_name, "schema");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn replace_duplicates_requires_merge_target() {
        assert!(Cli::try_parse_from(["mb", "import", "a.json", "--replace-duplicates"]).is_err());
        assert!(Cli::try_parse_from(["mb", "import", "a.json", "--merge-into", "g.json", "--replace-duplicates"]).is_ok());
    }

    #[test]
    fn schema_subcommands() {
        let cli = Cli::parse_from(["mb", "-v", "schemas", "save", "g.json", "--name", "HR", "--id", "4"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Schemas(SchemaCommand::Save { id: Some(4), ref name, .. }) if name == "HR"
        ));
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
