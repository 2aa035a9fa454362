//! PostgreSQL DDL

use super::naming::sql_literal;
use super::{ExportContext, ExportFormat, TextExporter};
use crate::error::ExportError;
use mb_schema::{Field, FieldType, SchemaGraph};
use std::fmt::Write as _;

const DEFAULT_VARCHAR: u32 = 255;

fn sql_type(field: &Field) -> String {
    match field.field_type {
        FieldType::Text => format!("VARCHAR({})", field.max_length.unwrap_or(DEFAULT_VARCHAR)),
        FieldType::Email => "VARCHAR(255)".to_string(),
        FieldType::Url => "VARCHAR(500)".to_string(),
        FieldType::Number => "DECIMAL(10,2)".to_string(),
        FieldType::Uuid => "UUID".to_string(),
        FieldType::Date => "DATE".to_string(),
        FieldType::Datetime => "TIMESTAMP".to_string(),
        FieldType::Boolean => "BOOLEAN".to_string(),
        FieldType::Json => "JSONB".to_string(),
    }
}

fn column(field: &Field) -> String {
    let mut constraints = Vec::new();
    if field.is_primary {
        constraints.push("PRIMARY KEY".to_string());
    } else {
        if field.required {
            constraints.push("NOT NULL".to_string());
        }
        if field.unique {
            constraints.push("UNIQUE".to_string());
        }
    }
    if let Some(default) = field.default_value.as_deref().filter(|d| !d.is_empty()) {
        constraints.push(format!("DEFAULT {}", sql_literal(default)));
    }

    let mut line = format!("    {} {}", field.name, sql_type(field));
    if !constraints.is_empty() {
        line.push(' ');
        line.push_str(&constraints.join(" "));
    }
    line
}

/// `CREATE TABLE` per master, then foreign keys and their indexes
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlExporter;

impl TextExporter for SqlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Sql
    }

    fn render(&self, graph: &SchemaGraph, ctx: &ExportContext) -> Result<String, ExportError> {
        let mut sql = String::new();
        // fmt::Write into a String cannot fail.
        let _ = writeln!(sql, "-- Generated SQL DDL for PostgreSQL");
        let _ = writeln!(sql, "-- Generated at: {}", ctx.timestamp());
        let _ = writeln!(sql, "-- Total tables: {}\n", graph.master_count());

        for (i, node) in graph.nodes().iter().enumerate() {
            let _ = writeln!(sql, "-- Table {}: {}", i + 1, node.label());
            let _ = writeln!(sql, "CREATE TABLE {} (", node.id);
            let columns: Vec<String> = node.fields().iter().map(column).collect();
            sql.push_str(&columns.join(",\n"));
            sql.push_str("\n);\n\n");

            if !node.data.description.is_empty() {
                let _ = writeln!(
                    sql,
                    "COMMENT ON TABLE {} IS {};\n",
                    node.id,
                    sql_literal(&node.data.description)
                );
            }
        }

        if graph.edges().is_empty() {
            return Ok(sql);
        }

        sql.push_str("-- Foreign Key Constraints\n");
        for edge in graph.edges() {
            let source_field = edge.source_field();
            let _ = writeln!(sql, "ALTER TABLE {}", edge.source);
            let _ = writeln!(sql, "    ADD CONSTRAINT fk_{}_{}", edge.source, source_field);
            let _ = writeln!(sql, "    FOREIGN KEY ({source_field})");
            let _ = writeln!(sql, "    REFERENCES {}({})", edge.target, edge.target_field());
            let _ = writeln!(sql, "    ON DELETE {}", edge.on_delete().as_sql());
            let _ = writeln!(sql, "    ON UPDATE {};\n", edge.on_update().as_sql());
        }

        sql.push_str("-- Indexes for Foreign Keys\n");
        for edge in graph.edges() {
            let source_field = edge.source_field();
            let _ = writeln!(
                sql,
                "CREATE INDEX idx_{}_{} ON {}({});",
                edge.source, source_field, edge.source, source_field
            );
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mb_schema::{MasterSettings, MasterSpec};
    use pretty_assertions::assert_eq;

    fn ctx() -> ExportContext {
        ExportContext::at(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn sample_ddl() {
        let sql = SqlExporter.render(&SchemaGraph::sample(), &ctx()).unwrap();
        let expected = "\
-- Generated SQL DDL for PostgreSQL
-- Generated at: 2024-05-01T12:00:00.000Z
-- Total tables: 2

-- Table 1: Departments
CREATE TABLE departments (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    code VARCHAR(255) NOT NULL UNIQUE,
    head_name VARCHAR(255)
);

-- Table 2: Employees
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    first_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    dept_id UUID NOT NULL
);

-- Foreign Key Constraints
ALTER TABLE employees
    ADD CONSTRAINT fk_employees_dept_id
    FOREIGN KEY (dept_id)
    REFERENCES departments(id)
    ON DELETE CASCADE
    ON UPDATE CASCADE;

-- Indexes for Foreign Keys
CREATE INDEX idx_employees_dept_id ON employees(dept_id);
";
        assert_eq!(sql, expected);
    }

    #[test]
    fn literals_are_escaped() {
        let mut graph = SchemaGraph::new();
        graph
            .add_master(
                MasterSpec::new("people", "People")
                    .with_settings(MasterSettings::new("People").with_description("O'Neil's list")),
            )
            .unwrap();
        graph
            .add_field(
                "people",
                Field::new("nick", FieldType::Text)
                    .with_max_length(40)
                    .with_default("it's me"),
            )
            .unwrap();
        let sql = SqlExporter.render(&graph, &ctx()).unwrap();
        assert!(sql.contains("    nick VARCHAR(40) DEFAULT 'it''s me'"));
        assert!(sql.contains("COMMENT ON TABLE people IS 'O''Neil''s list';"));
        assert!(!sql.contains("Foreign Key"));
    }
}
