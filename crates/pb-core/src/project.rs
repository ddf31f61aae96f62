//! Canvas graph model for PB projects.
//!
//! The project is a DAG where nodes are typed canvas entities (palette
//! instances dropped onto the SVG canvas) and graph edges represent
//! parent→child containment (groups). Semantic links between entities are
//! stored separately on `CanvasGraph.links`. The schema engine only ever
//! reads node type references and link labels — it never mutates entities.

use crate::id::Name;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::HashMap;

// ─── Nodes ───────────────────────────────────────────────────────────────

/// The node kinds on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Root of the project.
    Root,

    /// A palette-instance element (shape, icon, template drop).
    Element,

    /// A group — contains children.
    Group,

    /// A text node. The only kind that satisfies the default
    /// attribute-match predicate.
    Text { content: String },
}

/// A single entity on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasNode {
    /// The entity's id. Drag-dropped nodes get auto-ids.
    pub id: Name,

    /// Type reference into the palette, by registry name. `Name::empty()`
    /// means "no type / unset".
    pub ty: Name,

    /// What kind of element this is.
    pub kind: NodeKind,
}

impl CanvasNode {
    pub fn new(id: Name, ty: Name, kind: NodeKind) -> Self {
        Self { id, ty, kind }
    }

    /// A text node with an auto-generated id.
    pub fn text(ty: Name, content: &str) -> Self {
        Self::new(
            Name::with_prefix("text"),
            ty,
            NodeKind::Text {
                content: content.to_string(),
            },
        )
    }

    /// An element node with an auto-generated id.
    pub fn element(ty: Name) -> Self {
        Self::new(Name::with_prefix("node"), ty, NodeKind::Element)
    }
}

// ─── Links ───────────────────────────────────────────────────────────────

/// A semantic link between two canvas entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: Name,
    pub from: Name,
    pub to: Name,

    /// Type reference into the palette, if the link was created from a
    /// typed palette item.
    pub ty: Option<Name>,

    /// The link's label: either a schema property name chosen from the
    /// matcher's valid set, or ad hoc free text typed by the user.
    pub label: Option<String>,
}

impl Link {
    pub fn new(from: Name, to: Name) -> Self {
        Self {
            id: Name::with_prefix("link"),
            from,
            to,
            ty: None,
            label: None,
        }
    }

    pub fn with_label(from: Name, to: Name, label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::new(from, to)
        }
    }
}

// ─── Canvas Graph ────────────────────────────────────────────────────────

/// The complete project graph: a containment DAG of `CanvasNode` values
/// plus the list of semantic links between them.
#[derive(Debug, Clone)]
pub struct CanvasGraph {
    /// The underlying directed graph (parent → child containment).
    pub graph: StableDiGraph<CanvasNode, ()>,

    /// The root node index.
    pub root: NodeIndex,

    /// Index from entity id → NodeIndex for fast lookup.
    pub id_index: HashMap<Name, NodeIndex>,

    /// Semantic links between entities.
    pub links: Vec<Link>,
}

impl CanvasGraph {
    /// Create a new empty canvas graph with a root node.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root_node = CanvasNode::new(Name::intern("root"), Name::empty(), NodeKind::Root);
        let root = graph.add_node(root_node);

        let mut id_index = HashMap::new();
        id_index.insert(Name::intern("root"), root);

        Self {
            graph,
            root,
            id_index,
            links: Vec::new(),
        }
    }

    /// Add a node as a child of `parent`. Returns the new node's index.
    pub fn add_node(&mut self, parent: NodeIndex, node: CanvasNode) -> NodeIndex {
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    /// Remove a node, dropping its incident links and keeping the
    /// `id_index` synchronized.
    pub fn remove_node(&mut self, idx: NodeIndex) -> Option<CanvasNode> {
        let removed = self.graph.remove_node(idx);
        if let Some(removed_node) = &removed {
            self.id_index.remove(&removed_node.id);
            let id = removed_node.id;
            self.links.retain(|l| l.from != id && l.to != id);
        }
        removed
    }

    /// Look up a node by its id.
    pub fn get_by_id(&self, id: Name) -> Option<&CanvasNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Look up a node mutably by its id.
    pub fn get_by_id_mut(&mut self, id: Name) -> Option<&mut CanvasNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    /// Get the index for an entity id.
    pub fn index_of(&self, id: Name) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Get the parent index of a node.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Get children of a node in document (insertion) order.
    ///
    /// Sorts by `NodeIndex` so the result is deterministic regardless of
    /// how `petgraph` iterates its adjacency list on different targets.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Add a link. Returns its id.
    pub fn add_link(&mut self, link: Link) -> Name {
        let id = link.id;
        self.links.push(link);
        id
    }

    /// Remove a link by id.
    pub fn remove_link(&mut self, id: Name) -> Option<Link> {
        let pos = self.links.iter().position(|l| l.id == id)?;
        Some(self.links.remove(pos))
    }

    /// Look up a link by id.
    pub fn get_link(&self, id: Name) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Look up a link mutably by id.
    pub fn get_link_mut(&mut self, id: Name) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.id == id)
    }

    /// All links between two entities, in insertion order.
    pub fn links_between(&self, from: Name, to: Name) -> Vec<&Link> {
        self.links
            .iter()
            .filter(|l| l.from == from && l.to == to)
            .collect()
    }

    /// Rebuild the `id_index` (needed after bulk graph surgery).
    pub fn rebuild_index(&mut self) {
        self.id_index.clear();
        for idx in self.graph.node_indices() {
            let id = self.graph[idx].id;
            self.id_index.insert(id, idx);
        }
    }
}

impl Default for CanvasGraph {
    fn default() -> Self {
        Self::new()
    }
}
