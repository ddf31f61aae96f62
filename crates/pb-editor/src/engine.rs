//! Editing engine: applies canvas mutations and answers link-label queries
//! for popup UIs.
//!
//! The engine owns the authoritative `CanvasGraph` and the current palette
//! snapshot. Canvas interactions (drop, connect, relabel, delete) arrive as
//! `GraphMutation` values; each application returns the inverse mutation so
//! the command stack can undo it.
//!
//! Resolution failures never escape to the UI: a query that fails (unknown
//! type, cyclic palette) is logged and answered with "no valid labels", so
//! a broken palette degrades the popup instead of crashing the session.

use pb_core::matcher::{unique_text_link_labels_in_use, valid_labels_between};
use pb_core::{CanvasGraph, CanvasNode, Link, Name, Palette};
use petgraph::graph::NodeIndex;

/// A single reversible edit to the canvas graph.
#[derive(Debug, Clone)]
pub enum GraphMutation {
    /// Drop a node under `parent_id` (falls back to the root when the
    /// parent is unknown — matches drop-on-empty-canvas).
    AddNode { parent_id: Name, node: CanvasNode },

    /// Delete a node and its incident links.
    RemoveNode { id: Name },

    /// Re-create a deleted node together with the links that were dropped
    /// with it. Only produced as the inverse of `RemoveNode`.
    RestoreNode {
        parent_id: Name,
        node: CanvasNode,
        links: Vec<Link>,
    },

    /// Connect two nodes.
    AddLink { link: Link },

    /// Delete a link.
    RemoveLink { id: Name },

    /// Set or clear a link's label.
    SetLinkLabel { id: Name, label: Option<String> },

    /// Re-type a node (palette item changed in the edit popup).
    SetNodeType { id: Name, ty: Name },
}

/// The editing engine: authoritative graph + palette snapshot.
pub struct EditEngine {
    /// The current palette. Replaced wholesale on palette swap/import.
    pub palette: Palette,

    /// The canvas graph (single source of truth).
    pub graph: CanvasGraph,
}

impl EditEngine {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            graph: CanvasGraph::new(),
        }
    }

    /// Swap in a new palette snapshot. The graph is untouched; stale type
    /// references simply stop resolving (and label queries degrade to
    /// empty, per the error policy).
    pub fn replace_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Apply a mutation, returning its inverse for the undo stack.
    /// `None` means the mutation was a no-op (target missing).
    pub fn apply_mutation(&mut self, mutation: GraphMutation) -> Option<GraphMutation> {
        match mutation {
            GraphMutation::AddNode { parent_id, node } => {
                let parent_idx = self.graph.index_of(parent_id).unwrap_or(self.graph.root);
                let id = node.id;
                self.graph.add_node(parent_idx, node);
                Some(GraphMutation::RemoveNode { id })
            }
            GraphMutation::RemoveNode { id } => {
                let idx = match self.graph.index_of(id) {
                    Some(idx) => idx,
                    None => {
                        log::warn!("RemoveNode: unknown node \"{id}\"");
                        return None;
                    }
                };
                let parent_id = self.parent_id_of(idx);
                // Capture incident links before remove_node drops them.
                let links: Vec<Link> = self
                    .graph
                    .links
                    .iter()
                    .filter(|l| l.from == id || l.to == id)
                    .cloned()
                    .collect();
                let node = self.graph.remove_node(idx)?;
                Some(GraphMutation::RestoreNode {
                    parent_id,
                    node,
                    links,
                })
            }
            GraphMutation::RestoreNode {
                parent_id,
                node,
                links,
            } => {
                let parent_idx = self.graph.index_of(parent_id).unwrap_or(self.graph.root);
                let id = node.id;
                self.graph.add_node(parent_idx, node);
                for link in links {
                    self.graph.add_link(link);
                }
                Some(GraphMutation::RemoveNode { id })
            }
            GraphMutation::AddLink { link } => {
                let id = self.graph.add_link(link);
                Some(GraphMutation::RemoveLink { id })
            }
            GraphMutation::RemoveLink { id } => match self.graph.remove_link(id) {
                Some(link) => Some(GraphMutation::AddLink { link }),
                None => {
                    log::warn!("RemoveLink: unknown link \"{id}\"");
                    None
                }
            },
            GraphMutation::SetLinkLabel { id, label } => {
                let Some(link) = self.graph.get_link_mut(id) else {
                    log::warn!("SetLinkLabel: unknown link \"{id}\"");
                    return None;
                };
                let previous = std::mem::replace(&mut link.label, label);
                Some(GraphMutation::SetLinkLabel {
                    id,
                    label: previous,
                })
            }
            GraphMutation::SetNodeType { id, ty } => {
                let Some(node) = self.graph.get_by_id_mut(id) else {
                    log::warn!("SetNodeType: unknown node \"{id}\"");
                    return None;
                };
                let previous = std::mem::replace(&mut node.ty, ty);
                Some(GraphMutation::SetNodeType { id, ty: previous })
            }
        }
    }

    // ─── Label queries (popup backing) ───────────────────────────────────

    /// Valid schema labels for a link from `src_id` to `tgt_id`, sorted.
    ///
    /// A failed resolution (unknown endpoint, unregistered type, cyclic
    /// palette) is logged and answered with the empty list.
    pub fn label_choices(&self, src_id: Name, tgt_id: Name) -> Vec<String> {
        let (Some(src), Some(tgt)) = (self.graph.get_by_id(src_id), self.graph.get_by_id(tgt_id))
        else {
            log::warn!("label_choices: unknown endpoint \"{src_id}\" → \"{tgt_id}\"");
            return Vec::new();
        };
        match valid_labels_between(&self.palette, src, tgt) {
            Ok(labels) => labels,
            Err(err) => {
                log::warn!("label_choices: resolution failed: {err}");
                Vec::new()
            }
        }
    }

    /// Free-text labels already in use on the canvas with no schema
    /// backing, offered alongside schema labels by the popup.
    pub fn adhoc_label_suggestions(&self) -> Vec<String> {
        unique_text_link_labels_in_use(&self.palette, &self.graph)
    }

    /// Whether `label` is one of the schema-valid choices for a link.
    /// Free-text labels are still allowed; callers use this to mark them.
    pub fn label_is_schema_backed(&self, src_id: Name, tgt_id: Name, label: &str) -> bool {
        self.label_choices(src_id, tgt_id).iter().any(|l| l == label)
    }

    fn parent_id_of(&self, idx: NodeIndex) -> Name {
        self.graph
            .parent(idx)
            .map(|pidx| self.graph.graph[pidx].id)
            .unwrap_or(Name::intern("root"))
    }
}
