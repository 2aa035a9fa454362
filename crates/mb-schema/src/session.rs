//! Editing session with unsaved-change tracking

use crate::fingerprint::SchemaFingerprint;
use crate::graph::SchemaGraph;
use crate::record::{SchemaId, SchemaRecord};

/// The graph under edit plus what it was last loaded from or saved as
#[derive(Debug, Clone)]
pub struct EditorSession {
    graph: SchemaGraph,
    schema_id: Option<SchemaId>,
    name: String,
    description: String,
    baseline: SchemaFingerprint,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(SchemaGraph::new())
    }
}

impl EditorSession {
    /// Session over an unsaved graph; the graph itself is the baseline
    #[must_use]
    pub fn new(graph: SchemaGraph) -> Self {
        let baseline = graph.fingerprint();
        Self {
            graph,
            schema_id: None,
            name: String::new(),
            description: String::new(),
            baseline,
        }
    }

    /// Session opened from a stored record
    #[must_use]
    pub fn from_record(record: SchemaRecord) -> Self {
        let mut session = Self::new(record.schema_data.graph);
        session.schema_id = Some(record.id);
        session.name = record.name;
        session.description = record.description;
        session
    }

    /// Current graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    /// Mutable graph for editing operations
    #[inline]
    pub fn graph_mut(&mut self) -> &mut SchemaGraph {
        &mut self.graph
    }

    /// Replace the graph wholesale (import in replace mode)
    pub fn replace_graph(&mut self, graph: SchemaGraph) {
        self.graph = graph;
    }

    /// Record id, if loaded or saved before
    #[inline]
    #[must_use]
    pub fn schema_id(&self) -> Option<SchemaId> {
        self.schema_id
    }

    /// Record name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the graph differs from the last loaded/saved state
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.graph.fingerprint() != self.baseline
    }

    /// Rebase on a record returned by a save
    pub fn mark_saved(&mut self, record: &SchemaRecord) {
        self.schema_id = Some(record.id);
        self.name.clone_from(&record.name);
        self.description.clone_from(&record.description);
        self.baseline = record.schema_data.graph.fingerprint();
        tracing::debug!(schema = record.id, fingerprint = %self.baseline.short(), "session saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MasterSpec;
    use crate::record::SchemaData;
    use chrono::Utc;

    fn record_of(graph: SchemaGraph) -> SchemaRecord {
        SchemaRecord {
            id: 42,
            name: "HR".into(),
            description: String::new(),
            schema_data: SchemaData::stamped(graph),
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 1,
            is_active: true,
            master_count: 0,
            relationship_count: 0,
        }
    }

    #[test]
    fn edits_make_session_dirty_until_saved() {
        let mut session = EditorSession::new(SchemaGraph::sample());
        assert!(!session.is_dirty());

        session
            .graph_mut()
            .add_master(MasterSpec::new("locations", "Locations"))
            .unwrap();
        assert!(session.is_dirty());

        let saved = record_of(session.graph().clone());
        session.mark_saved(&saved);
        assert!(!session.is_dirty());
        assert_eq!(session.schema_id(), Some(42));
        assert_eq!(session.name(), "HR");
    }

    #[test]
    fn reverting_an_edit_clears_dirty() {
        let mut session = EditorSession::new(SchemaGraph::sample());
        session.graph_mut().duplicate_master("departments").unwrap();
        session.graph_mut().remove_master("departments_copy").unwrap();
        assert!(!session.is_dirty());
    }

    #[test]
    fn from_record_is_clean() {
        let session = EditorSession::from_record(record_of(SchemaGraph::sample()));
        assert!(!session.is_dirty());
        assert_eq!(session.graph().master_count(), 2);
    }
}
