//! Relation matcher: which properties are valid as link labels between two
//! concrete canvas entities.
//!
//! Given a source and target node, the matcher collects every property
//! declared anywhere in the source type's ancestor-or-self closure, then
//! filters: attribute properties (`range == ""`) match when the target
//! satisfies the attribute predicate (default: target is a text node);
//! relation properties match when their range is in the target type's
//! ancestor-or-self closure.
//!
//! Candidates are iterated in palette load order, so first-writer-wins
//! merging is deterministic across calls. Results feed link-label selection
//! popups in the UI layer.

use crate::error::SchemaError;
use crate::hierarchy::ancestors_of;
use crate::id::Name;
use crate::palette::Palette;
use crate::project::{CanvasGraph, CanvasNode, NodeKind};
use crate::properties::{ResolvedProperty, properties_of};
use std::collections::{HashMap, HashSet};

/// Predicate deciding whether a node can be the target of an attribute
/// (literal-valued) property.
pub type AttributePredicate = fn(&CanvasNode) -> bool;

/// The default attribute predicate: only text nodes hold literal values.
pub fn is_text_node(node: &CanvasNode) -> bool {
    matches!(node.kind, NodeKind::Text { .. })
}

/// Valid properties between two entities, full detail, using the default
/// attribute predicate.
///
/// # Errors
/// `NotFound` if either endpoint's type is unregistered; `CycleDetected`
/// on cyclic inheritance.
pub fn valid_properties_between(
    palette: &Palette,
    source: &CanvasNode,
    target: &CanvasNode,
) -> Result<HashMap<Name, ResolvedProperty>, SchemaError> {
    valid_properties_between_with(palette, source, target, is_text_node)
}

/// Valid properties between two entities with a custom attribute predicate.
pub fn valid_properties_between_with(
    palette: &Palette,
    source: &CanvasNode,
    target: &CanvasNode,
    is_attribute_target: AttributePredicate,
) -> Result<HashMap<Name, ResolvedProperty>, SchemaError> {
    let src_closure = ancestors_of(palette, source.ty, true)?;
    let tgt_closure = ancestors_of(palette, target.ty, true)?;

    // Candidate set: every registered type whose schema type-name resolves
    // into the source closure, in load order. Same first-writer-wins rule
    // as the aggregator, applied across the whole candidate set.
    let mut candidates: HashMap<Name, ResolvedProperty> = HashMap::new();
    for def in palette.types() {
        let Some(schema) = &def.schema else {
            continue;
        };
        if !src_closure.contains(&schema.type_name) {
            continue;
        }
        for (prop, resolved) in properties_of(palette, def)? {
            candidates.entry(prop).or_insert(resolved);
        }
    }

    let mut out = HashMap::new();
    for (prop, resolved) in candidates {
        let keep = if resolved.is_attribute() {
            is_attribute_target(target)
        } else {
            tgt_closure.contains(&resolved.range)
        };
        if keep {
            out.insert(prop, resolved);
        }
    }
    Ok(out)
}

/// Valid link-label names between two entities, sorted ascending.
pub fn valid_labels_between(
    palette: &Palette,
    source: &CanvasNode,
    target: &CanvasNode,
) -> Result<Vec<String>, SchemaError> {
    let props = valid_properties_between(palette, source, target)?;
    let mut labels: Vec<String> = props.keys().map(|n| n.as_str().to_string()).collect();
    labels.sort();
    Ok(labels)
}

// ─── Registry-wide queries ───────────────────────────────────────────────

/// Every distinct schema type name in the palette, plus one empty-string
/// sentinel representing "no type / unset", sorted ascending.
///
/// The sentinel is pushed before sorting, so it lands first — the order
/// type-selection dropdowns rely on.
pub fn list_all_type_names(palette: &Palette) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names: Vec<String> = Vec::new();
    for def in palette.types() {
        if let Some(schema) = &def.schema
            && seen.insert(schema.type_name)
        {
            names.push(schema.type_name.as_str().to_string());
        }
    }
    names.push(String::new());
    names.sort();
    names
}

/// Labels actually used by links in the live graph that have no schema
/// backing anywhere in the palette — ad hoc free-text labels the user
/// typed. No duplicates; first-encountered order over the link list.
pub fn unique_text_link_labels_in_use(palette: &Palette, graph: &CanvasGraph) -> Vec<String> {
    let declared = palette.declared_property_names();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for link in &graph.links {
        let Some(label) = &link.label else {
            continue;
        };
        let name = Name::intern(label);
        if declared.contains(&name) {
            continue;
        }
        if seen.insert(name) {
            out.push(label.clone());
        }
    }
    out
}
