//! The in-memory master/relationship graph
//!
//! [`SchemaGraph`] holds the diagram nodes (one per master) and edges (one per
//! relationship) of an editing session, and implements the editor's CRUD
//! operations on top of them.
//!
//! # Invariants
//! - Node ids are unique
//! - Field names are unique within a master
//! - At most one primary key field per master
//! - Failed operations leave the graph unchanged

use crate::error::{GraphError, GraphResult};
use crate::fingerprint::SchemaFingerprint;
use crate::handle::{field_from_handle, source_handle, target_handle};
use crate::layout::next_free_slot;
use crate::model::{
    is_valid_identifier, Field, MasterSettings, ReferentialAction, Relationship, RelationshipKind,
    DEFAULT_ICON,
};
use serde::{Deserialize, Serialize};

/// Diagram node type used for masters
pub const MASTER_NODE_TYPE: &str = "masterNode";

/// Diagram edge type used for relationships
pub const RELATIONSHIP_EDGE_TYPE: &str = "smoothstep";

const DUPLICATE_OFFSET: f64 = 50.0;

/// 2-D diagram position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create position
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Position shifted by the given deltas
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

const fn default_true() -> bool {
    true
}

fn default_node_type() -> String {
    MASTER_NODE_TYPE.to_string()
}

fn default_edge_type() -> String {
    RELATIONSHIP_EDGE_TYPE.to_string()
}

/// Master attributes stored in a node's `data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    pub label: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default = "default_true")]
    pub searchable: bool,
    #[serde(default = "default_true")]
    pub exportable: bool,
    #[serde(default)]
    pub soft_delete: bool,
}

impl MasterData {
    /// Build node data from settings and fields
    #[must_use]
    pub fn new(settings: MasterSettings, fields: Vec<Field>) -> Self {
        Self {
            label: settings.display_name,
            icon: settings.icon,
            description: settings.description,
            fields,
            searchable: settings.searchable,
            exportable: settings.exportable,
            soft_delete: settings.soft_delete,
        }
    }

    /// Current settings
    #[must_use]
    pub fn settings(&self) -> MasterSettings {
        MasterSettings {
            display_name: self.label.clone(),
            icon: self.icon.clone(),
            description: self.description.clone(),
            searchable: self.searchable,
            exportable: self.exportable,
            soft_delete: self.soft_delete,
        }
    }

    fn apply(&mut self, settings: MasterSettings) {
        self.label = settings.display_name;
        self.icon = settings.icon;
        self.description = settings.description;
        self.searchable = settings.searchable;
        self.exportable = settings.exportable;
        self.soft_delete = settings.soft_delete;
    }
}

/// Diagram node representing one master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterNode {
    pub id: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub kind: String,
    #[serde(default)]
    pub position: Position,
    pub data: MasterData,
}

impl MasterNode {
    /// Create a master node
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        settings: MasterSettings,
        fields: Vec<Field>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind: default_node_type(),
            position,
            data: MasterData::new(settings, fields),
        }
    }

    /// Display label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.data.label
    }

    /// Ordered fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.data.fields
    }

    /// Field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.data.fields.iter().find(|f| f.name == name)
    }

    /// The primary key field, if any
    #[must_use]
    pub fn primary_field(&self) -> Option<&Field> {
        self.data.fields.iter().find(|f| f.is_primary)
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.data.fields.iter().position(|f| f.name == name)
    }

    // Reject `candidate` as primary when another field (other than `skip`) already is.
    fn check_primary(&self, candidate: &Field, skip: Option<usize>) -> GraphResult<()> {
        if !candidate.is_primary {
            return Ok(());
        }
        let existing = self
            .data
            .fields
            .iter()
            .enumerate()
            .find(|(i, f)| f.is_primary && Some(*i) != skip);
        match existing {
            Some((_, f)) => Err(GraphError::DuplicatePrimary {
                master: self.id.clone(),
                existing: f.name.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Diagram edge representing one relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "type", default = "default_edge_type")]
    pub kind: String,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Relationship>,
}

impl RelationshipEdge {
    /// Create an edge from `source` carrying `relationship`
    ///
    /// The target master and both handles are taken from the relationship.
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>, relationship: Relationship) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: relationship.target_master.clone(),
            source_handle: Some(source_handle(&relationship.source_field)),
            target_handle: Some(target_handle(&relationship.target_field)),
            kind: default_edge_type(),
            animated: true,
            label: Some(relationship.kind.to_string()),
            data: Some(relationship),
        }
    }

    /// Field on the source master
    ///
    /// Resolved from the source handle, then the edge data, then `id`.
    #[must_use]
    pub fn source_field(&self) -> String {
        match (self.source_handle.as_deref(), &self.data) {
            (Some(h), _) if !h.is_empty() => field_from_handle(Some(h)),
            (_, Some(d)) if !d.source_field.is_empty() => d.source_field.clone(),
            _ => field_from_handle(None),
        }
    }

    /// Field on the target master
    #[must_use]
    pub fn target_field(&self) -> String {
        match (self.target_handle.as_deref(), &self.data) {
            (Some(h), _) if !h.is_empty() => field_from_handle(Some(h)),
            (_, Some(d)) if !d.target_field.is_empty() => d.target_field.clone(),
            _ => field_from_handle(None),
        }
    }

    /// Cardinality from the data, else the label, else one-to-many
    #[must_use]
    pub fn relationship_kind(&self) -> RelationshipKind {
        self.data
            .as_ref()
            .map(|d| d.kind)
            .or_else(|| self.label.as_deref().and_then(|l| l.parse().ok()))
            .unwrap_or_default()
    }

    /// On-delete action (default `CASCADE`)
    #[must_use]
    pub fn on_delete(&self) -> ReferentialAction {
        self.data.as_ref().map(|d| d.on_delete).unwrap_or_default()
    }

    /// On-update action (default `CASCADE`)
    #[must_use]
    pub fn on_update(&self) -> ReferentialAction {
        self.data.as_ref().map(|d| d.on_update).unwrap_or_default()
    }

    /// Reverse accessor name, if set
    #[must_use]
    pub fn related_name(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.related_name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Fully resolved relationship, filling gaps from handles and defaults
    #[must_use]
    pub fn resolved(&self) -> Relationship {
        Relationship {
            source_field: self.source_field(),
            target_master: self.target.clone(),
            target_field: self.target_field(),
            kind: self.relationship_kind(),
            on_delete: self.on_delete(),
            on_update: self.on_update(),
            related_name: self.related_name().unwrap_or_default().to_string(),
        }
    }

    /// Whether the edge starts or ends at `master`
    #[inline]
    #[must_use]
    pub fn touches(&self, master: &str) -> bool {
        self.source == master || self.target == master
    }

    /// Whether either end of the edge is `master.field`
    #[must_use]
    pub fn references_field(&self, master: &str, field: &str) -> bool {
        (self.source == master && self.source_field() == field)
            || (self.target == master && self.target_field() == field)
    }

    fn rename_field(&mut self, master: &str, old: &str, new: &str) {
        if self.source == master && self.source_field() == old {
            self.source_handle = Some(source_handle(new));
            if let Some(data) = self.data.as_mut() {
                data.source_field = new.to_string();
            }
        }
        if self.target == master && self.target_field() == old {
            self.target_handle = Some(target_handle(new));
            if let Some(data) = self.data.as_mut() {
                data.target_field = new.to_string();
            }
        }
    }
}

/// Request to create a master node
#[derive(Debug, Clone, PartialEq)]
pub struct MasterSpec {
    pub name: String,
    pub settings: MasterSettings,
    /// `None` places the master in the next free grid slot
    pub position: Option<Position>,
}

impl MasterSpec {
    /// Spec with default settings and automatic placement
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: MasterSettings::new(display_name),
            position: None,
        }
    }

    /// With settings
    #[must_use]
    pub fn with_settings(mut self, settings: MasterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// At position
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// A drag between two field handles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub source_field: String,
    pub target: String,
    pub target_field: String,
}

impl Connection {
    /// Create connection
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        source_field: impl Into<String>,
        target: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_field: source_field.into(),
            target: target.into(),
            target_field: target_field.into(),
        }
    }
}

/// How merging treats masters already present in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Keep the existing master, drop the imported one
    #[default]
    SkipDuplicates,
    /// Drop the existing master, keep the imported one
    ReplaceDuplicates,
}

/// What a merge did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: Vec<String>,
    pub skipped: Vec<String>,
    pub replaced: Vec<String>,
    pub edges_added: usize,
}

/// Ordered masters and relationships of one editing session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaGraph {
    #[serde(default)]
    nodes: Vec<MasterNode>,
    #[serde(default)]
    edges: Vec<RelationshipEdge>,
}

impl SchemaGraph {
    /// Empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph from pre-built nodes and edges (no invariant checks)
    #[inline]
    #[must_use]
    pub fn from_parts(nodes: Vec<MasterNode>, edges: Vec<RelationshipEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Split into nodes and edges
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Vec<MasterNode>, Vec<RelationshipEdge>) {
        (self.nodes, self.edges)
    }

    /// Master nodes in insertion order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[MasterNode] {
        &self.nodes
    }

    /// Relationship edges in insertion order
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    /// Number of masters
    #[inline]
    #[must_use]
    pub fn master_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships
    #[inline]
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.edges.len()
    }

    /// Check for no masters and no relationships
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Master ids in order
    pub fn master_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&MasterNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edge by id
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&RelationshipEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Edges leaving `master`
    pub fn outgoing<'a>(&'a self, master: &'a str) -> impl Iterator<Item = &'a RelationshipEdge> {
        self.edges.iter().filter(move |e| e.source == master)
    }

    /// First edge leaving `master` from `field`
    #[must_use]
    pub fn edge_for_field(&self, master: &str, field: &str) -> Option<&RelationshipEdge> {
        self.edges
            .iter()
            .find(|e| e.source == master && e.source_field() == field)
    }

    /// Content fingerprint of the graph
    #[must_use]
    pub fn fingerprint(&self) -> SchemaFingerprint {
        SchemaFingerprint::of(self)
    }

    fn node_index(&self, id: &str) -> GraphResult<usize> {
        self.nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::MasterNotFound(id.to_string()))
    }

    fn edge_index(&self, id: &str) -> GraphResult<usize> {
        self.edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| GraphError::RelationshipNotFound(id.to_string()))
    }

    fn require_field(&self, master: &str, field: &str) -> GraphResult<()> {
        let idx = self.node_index(master)?;
        if self.nodes[idx].field(field).is_none() {
            return Err(GraphError::field_not_found(master, field));
        }
        Ok(())
    }

    /// Add a master with the default `id` primary key
    ///
    /// # Errors
    /// Invalid name, empty display name, or an existing master with that name
    pub fn add_master(&mut self, spec: MasterSpec) -> GraphResult<&MasterNode> {
        if !is_valid_identifier(&spec.name) {
            return Err(GraphError::InvalidIdentifier {
                kind: "master",
                name: spec.name,
            });
        }
        if spec.settings.display_name.trim().is_empty() {
            return Err(GraphError::MissingLabel("display name"));
        }
        if self.node(&spec.name).is_some() {
            return Err(GraphError::MasterExists(spec.name));
        }

        let position = spec.position.unwrap_or_else(|| {
            let occupied: Vec<Position> = self.nodes.iter().map(|n| n.position).collect();
            next_free_slot(&occupied)
        });
        tracing::debug!(master = %spec.name, x = position.x, y = position.y, "adding master");
        self.nodes.push(MasterNode::new(
            spec.name,
            spec.settings,
            vec![Field::primary_id()],
            position,
        ));
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Replace a master's settings
    ///
    /// # Errors
    /// Unknown master or empty display name
    pub fn update_master(&mut self, id: &str, settings: MasterSettings) -> GraphResult<()> {
        if settings.display_name.trim().is_empty() {
            return Err(GraphError::MissingLabel("display name"));
        }
        let idx = self.node_index(id)?;
        self.nodes[idx].data.apply(settings);
        Ok(())
    }

    /// Remove a master and every relationship touching it
    ///
    /// # Errors
    /// Unknown master
    pub fn remove_master(&mut self, id: &str) -> GraphResult<MasterNode> {
        let idx = self.node_index(id)?;
        let node = self.nodes.remove(idx);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        tracing::debug!(
            master = id,
            edges_removed = before - self.edges.len(),
            "removed master"
        );
        Ok(node)
    }

    /// Copy a master under a fresh `<id>_copy` name, offset on the diagram
    ///
    /// Relationships are not copied.
    ///
    /// # Errors
    /// Unknown master
    pub fn duplicate_master(&mut self, id: &str) -> GraphResult<&MasterNode> {
        let idx = self.node_index(id)?;
        let mut copy = self.nodes[idx].clone();

        let mut candidate = format!("{id}_copy");
        let mut n = 2;
        while self.node(&candidate).is_some() {
            candidate = format!("{id}_copy_{n}");
            n += 1;
        }

        copy.id = candidate;
        copy.data.label = format!("{} (Copy)", copy.data.label);
        copy.position = copy.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
        self.nodes.push(copy);
        Ok(&self.nodes[self.nodes.len() - 1])
    }

    /// Append a field to a master
    ///
    /// # Errors
    /// Unknown master, invalid or duplicate name, empty label, second primary key
    pub fn add_field(&mut self, master: &str, mut field: Field) -> GraphResult<()> {
        let idx = self.node_index(master)?;
        validate_field_text(&field)?;

        let node = &self.nodes[idx];
        if node.field(&field.name).is_some() {
            return Err(GraphError::FieldExists {
                master: master.to_string(),
                field: field.name,
            });
        }
        node.check_primary(&field, None)?;

        if field.is_primary {
            field.required = true;
            field.unique = true;
        }
        self.nodes[idx].data.fields.push(field);
        Ok(())
    }

    /// Replace the field called `name`
    ///
    /// A rename is propagated to the handles of relationships using the field.
    ///
    /// # Errors
    /// Unknown master or field, invalid or clashing name, second primary key
    pub fn update_field(&mut self, master: &str, name: &str, mut field: Field) -> GraphResult<()> {
        let idx = self.node_index(master)?;
        validate_field_text(&field)?;

        let node = &self.nodes[idx];
        let pos = node
            .field_index(name)
            .ok_or_else(|| GraphError::field_not_found(master, name))?;
        if field.name != name && node.field(&field.name).is_some() {
            return Err(GraphError::FieldExists {
                master: master.to_string(),
                field: field.name,
            });
        }
        node.check_primary(&field, Some(pos))?;

        if field.is_primary {
            field.required = true;
            field.unique = true;
        }
        let renamed = field.name != name;
        let new_name = field.name.clone();
        self.nodes[idx].data.fields[pos] = field;

        if renamed {
            for edge in &mut self.edges {
                edge.rename_field(master, name, &new_name);
            }
        }
        Ok(())
    }

    /// Remove a non-primary field and the relationships that use it
    ///
    /// # Errors
    /// Unknown master or field, or the field is the primary key
    pub fn remove_field(&mut self, master: &str, name: &str) -> GraphResult<Field> {
        let idx = self.node_index(master)?;
        let node = &self.nodes[idx];
        let pos = node
            .field_index(name)
            .ok_or_else(|| GraphError::field_not_found(master, name))?;
        if node.data.fields[pos].is_primary {
            return Err(GraphError::PrimaryKeyDeletion {
                master: master.to_string(),
                field: name.to_string(),
            });
        }

        let field = self.nodes[idx].data.fields.remove(pos);
        self.edges.retain(|e| !e.references_field(master, name));
        Ok(field)
    }

    /// Create a relationship between two existing fields
    ///
    /// The relationship's field and target names are overwritten from `connection`.
    ///
    /// # Errors
    /// Either master or field does not exist
    pub fn connect(
        &mut self,
        connection: Connection,
        mut relationship: Relationship,
    ) -> GraphResult<&RelationshipEdge> {
        self.require_field(&connection.source, &connection.source_field)?;
        self.require_field(&connection.target, &connection.target_field)?;

        relationship.source_field = connection.source_field;
        relationship.target_master = connection.target;
        relationship.target_field = connection.target_field;

        let id = format!("e{}", ulid::Ulid::new().to_string().to_lowercase());
        tracing::debug!(
            edge = %id,
            source = %connection.source,
            target = %relationship.target_master,
            "connecting masters"
        );
        self.edges
            .push(RelationshipEdge::new(id, connection.source, relationship));
        Ok(&self.edges[self.edges.len() - 1])
    }

    /// Replace the relationship carried by an edge
    ///
    /// # Errors
    /// Unknown edge, or the new target master/fields do not exist
    pub fn update_relationship(&mut self, edge_id: &str, relationship: Relationship) -> GraphResult<()> {
        let idx = self.edge_index(edge_id)?;
        let source = self.edges[idx].source.clone();
        self.require_field(&source, &relationship.source_field)?;
        self.require_field(&relationship.target_master, &relationship.target_field)?;

        let id = self.edges[idx].id.clone();
        self.edges[idx] = RelationshipEdge::new(id, source, relationship);
        Ok(())
    }

    /// Remove a relationship
    ///
    /// # Errors
    /// Unknown edge
    pub fn remove_relationship(&mut self, edge_id: &str) -> GraphResult<RelationshipEdge> {
        let idx = self.edge_index(edge_id)?;
        Ok(self.edges.remove(idx))
    }

    /// Ids of masters present in both graphs, in `imported` order
    #[must_use]
    pub fn duplicates(&self, imported: &SchemaGraph) -> Vec<String> {
        imported
            .master_names()
            .filter(|id| self.node(id).is_some())
            .map(str::to_string)
            .collect()
    }

    /// Append another graph's masters and relationships
    ///
    /// Imported edges whose id is already taken are dropped.
    pub fn merge(&mut self, imported: SchemaGraph, policy: MergePolicy) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let (nodes, edges) = imported.into_parts();

        for node in nodes {
            let exists = self.node(&node.id).is_some();
            match (exists, policy) {
                (false, _) => {
                    outcome.added.push(node.id.clone());
                    self.nodes.push(node);
                }
                (true, MergePolicy::SkipDuplicates) => outcome.skipped.push(node.id),
                (true, MergePolicy::ReplaceDuplicates) => {
                    self.nodes.retain(|n| n.id != node.id);
                    outcome.replaced.push(node.id.clone());
                    self.nodes.push(node);
                }
            }
        }

        for edge in edges {
            if self.edge(&edge.id).is_none() {
                self.edges.push(edge);
                outcome.edges_added += 1;
            }
        }

        tracing::debug!(
            added = outcome.added.len(),
            skipped = outcome.skipped.len(),
            replaced = outcome.replaced.len(),
            edges = outcome.edges_added,
            "merged graph"
        );
        outcome
    }
}

fn validate_field_text(field: &Field) -> GraphResult<()> {
    if !is_valid_identifier(&field.name) {
        return Err(GraphError::InvalidIdentifier {
            kind: "field",
            name: field.name.clone(),
        });
    }
    if field.label.trim().is_empty() {
        return Err(GraphError::MissingLabel("field label"));
    }
    Ok(())
}
