//! Property aggregator: merges a type's own declared properties with
//! properties inherited from its ancestors.
//!
//! Merge discipline is single-assignment: the walk goes depth-first from
//! the subject type, parents in declared order, and a key is only ever
//! written once. Properties found at the subject (or via an earlier parent
//! branch) permanently shadow same-named properties from more distant
//! ancestors.

use crate::error::SchemaError;
use crate::id::Name;
use crate::palette::{Palette, TypeDefinition};
use std::collections::{HashMap, HashSet};

/// A property after aggregation. `domain` records which type in the
/// hierarchy the property was sourced from — assigned here, never authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedProperty {
    /// Empty string for attributes; otherwise the required type of the
    /// far end of the relation.
    pub range: Name,
    /// Registry name of the definition that declared the property.
    pub domain: Name,
}

impl ResolvedProperty {
    pub fn is_attribute(&self) -> bool {
        self.range.is_empty()
    }
}

/// Aggregate `def`'s own properties with everything inherited from its
/// ancestor chain, first-writer-wins.
///
/// # Errors
/// `CycleDetected` on cyclic inheritance. Unregistered parents are skipped.
pub fn properties_of(
    palette: &Palette,
    def: &TypeDefinition,
) -> Result<HashMap<Name, ResolvedProperty>, SchemaError> {
    let mut out = HashMap::new();
    let mut on_path = HashSet::new();
    aggregate(palette, def, &mut out, &mut on_path)?;
    Ok(out)
}

fn aggregate(
    palette: &Palette,
    def: &TypeDefinition,
    out: &mut HashMap<Name, ResolvedProperty>,
    on_path: &mut HashSet<Name>,
) -> Result<(), SchemaError> {
    let Some(schema) = &def.schema else {
        return Ok(());
    };
    if !on_path.insert(def.name) {
        return Err(SchemaError::CycleDetected { name: def.name });
    }

    // Own level first: these entries shadow anything inherited below.
    for (&prop, spec) in &schema.properties {
        out.entry(prop).or_insert(ResolvedProperty {
            range: spec.range,
            domain: def.name,
        });
    }

    for parent in &schema.parents {
        if let Some(parent_def) = palette.get(*parent) {
            aggregate(palette, parent_def, out, on_path)?;
        }
    }

    on_path.remove(&def.name);
    Ok(())
}
