//! Hierarchy resolver: ancestor and descendant closures over the palette's
//! parent/child type graph.
//!
//! Traversal rules:
//! - Parents missing from the registry are skipped silently — palettes may
//!   reference optional plugin-provided parent types that are not loaded.
//! - A type without a schema contributes nothing: it is never an ancestor
//!   or descendant, and its own closures are empty.
//! - The parent graph must be a DAG. Re-entering a type already on the
//!   current walk path fails with `CycleDetected` instead of recursing
//!   forever.

use crate::error::SchemaError;
use crate::id::Name;
use crate::palette::Palette;
use std::collections::HashSet;

/// Ancestor-or-self closure of `type_name`.
///
/// Depth-first over `parents` with post-order insertion. Intermediate
/// ancestors are always included; `include_self` only controls whether the
/// subject itself is. Diamond inheritance is deduplicated by membership
/// check, so each ancestor appears once regardless of how many paths reach
/// it.
///
/// # Errors
/// - `NotFound` if `type_name` is not registered
/// - `CycleDetected` on cyclic inheritance
pub fn ancestors_of(
    palette: &Palette,
    type_name: Name,
    include_self: bool,
) -> Result<HashSet<Name>, SchemaError> {
    let def = palette
        .get(type_name)
        .ok_or(SchemaError::NotFound { name: type_name })?;

    let mut out = HashSet::new();
    let Some(schema) = &def.schema else {
        // Not resolvable into the hierarchy — empty even with include_self.
        return Ok(out);
    };

    let mut on_path = HashSet::from([type_name]);
    for parent in &schema.parents {
        collect_ancestors(palette, *parent, &mut out, &mut on_path)?;
    }

    if include_self {
        out.insert(type_name);
    }
    Ok(out)
}

fn collect_ancestors(
    palette: &Palette,
    name: Name,
    out: &mut HashSet<Name>,
    on_path: &mut HashSet<Name>,
) -> Result<(), SchemaError> {
    if out.contains(&name) {
        return Ok(()); // already reached via another branch
    }
    // Dead-end branches: unregistered or schema-less parents.
    let Some(def) = palette.get(name) else {
        return Ok(());
    };
    let Some(schema) = &def.schema else {
        return Ok(());
    };

    if !on_path.insert(name) {
        return Err(SchemaError::CycleDetected { name });
    }
    for parent in &schema.parents {
        collect_ancestors(palette, *parent, out, on_path)?;
    }
    on_path.remove(&name);

    out.insert(name);
    Ok(())
}

/// Descendant-or-self closure of `type_name`, sorted lexicographically.
///
/// The sort is a determinism contract: UI layers display subtype listings
/// in this order.
///
/// # Errors
/// - `NotFound` if `type_name` is not registered
/// - `CycleDetected` on cyclic inheritance
pub fn descendants_of(
    palette: &Palette,
    type_name: Name,
    include_self: bool,
) -> Result<Vec<Name>, SchemaError> {
    let def = palette
        .get(type_name)
        .ok_or(SchemaError::NotFound { name: type_name })?;

    let mut out = HashSet::new();
    if def.schema.is_some() {
        let mut on_path = HashSet::from([type_name]);
        for &child in palette.children_of(type_name) {
            collect_descendants(palette, child, &mut out, &mut on_path)?;
        }
        if include_self {
            out.insert(type_name);
        }
    }

    let mut sorted: Vec<Name> = out.into_iter().collect();
    sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Ok(sorted)
}

fn collect_descendants(
    palette: &Palette,
    name: Name,
    out: &mut HashSet<Name>,
    on_path: &mut HashSet<Name>,
) -> Result<(), SchemaError> {
    if out.contains(&name) {
        return Ok(());
    }
    if !on_path.insert(name) {
        return Err(SchemaError::CycleDetected { name });
    }
    out.insert(name);
    for &child in palette.children_of(name) {
        collect_descendants(palette, child, out, on_path)?;
    }
    on_path.remove(&name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{TypeDefinition, TypeSchema};
    use pretty_assertions::assert_eq;

    fn def(name: &str, parents: &[&str]) -> TypeDefinition {
        let mut schema = TypeSchema::new(Name::intern(name));
        schema.parents = parents.iter().map(|p| Name::intern(p)).collect();
        TypeDefinition::with_schema(Name::intern(name), schema)
    }

    fn names(set: &HashSet<Name>) -> Vec<&str> {
        let mut v: Vec<&str> = set.iter().map(|n| n.as_str()).collect();
        v.sort();
        v
    }

    #[test]
    fn no_parents_closure_is_self_or_empty() {
        let palette = Palette::new(vec![def("Animal", &[])]);
        let animal = Name::intern("Animal");

        let with_self = ancestors_of(&palette, animal, true).unwrap();
        assert_eq!(names(&with_self), vec!["Animal"]);

        let without_self = ancestors_of(&palette, animal, false).unwrap();
        assert!(without_self.is_empty());
    }

    #[test]
    fn include_self_only_controls_the_subject() {
        let palette = Palette::new(vec![
            def("Animal", &[]),
            def("Mammal", &["Animal"]),
            def("Dog", &["Mammal"]),
        ]);
        let dog = Name::intern("Dog");

        // Intermediate ancestors always present.
        let strict = ancestors_of(&palette, dog, false).unwrap();
        assert_eq!(names(&strict), vec!["Animal", "Mammal"]);

        let closure = ancestors_of(&palette, dog, true).unwrap();
        assert_eq!(names(&closure), vec!["Animal", "Dog", "Mammal"]);
    }

    #[test]
    fn diamond_inheritance_deduplicates() {
        // D → B, C; B → A; C → A
        let palette = Palette::new(vec![
            def("A", &[]),
            def("B", &["A"]),
            def("C", &["A"]),
            def("D", &["B", "C"]),
        ]);
        let closure = ancestors_of(&palette, Name::intern("D"), true).unwrap();
        assert_eq!(names(&closure), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn unregistered_parent_is_a_dead_end() {
        let palette = Palette::new(vec![def("Dog", &["PluginAnimal"])]);
        let closure = ancestors_of(&palette, Name::intern("Dog"), true).unwrap();
        assert_eq!(names(&closure), vec!["Dog"]);
    }

    #[test]
    fn schema_less_types_are_excluded_from_traversal() {
        let palette = Palette::new(vec![
            TypeDefinition::new(Name::intern("Sticker")),
            def("Dog", &["Sticker"]),
        ]);

        // A schema-less parent contributes nothing as an ancestor.
        let closure = ancestors_of(&palette, Name::intern("Dog"), true).unwrap();
        assert_eq!(names(&closure), vec!["Dog"]);

        // And its own closures are empty, even with include_self.
        let own = ancestors_of(&palette, Name::intern("Sticker"), true).unwrap();
        assert!(own.is_empty());
        let desc = descendants_of(&palette, Name::intern("Sticker"), true).unwrap();
        assert!(desc.is_empty());
    }

    #[test]
    fn unknown_subject_is_not_found() {
        let palette = Palette::new(vec![def("Animal", &[])]);
        let ghost = Name::intern("Ghost");
        assert_eq!(
            ancestors_of(&palette, ghost, true),
            Err(SchemaError::NotFound { name: ghost })
        );
        assert_eq!(
            descendants_of(&palette, ghost, true),
            Err(SchemaError::NotFound { name: ghost })
        );
    }

    #[test]
    fn cycle_fails_fast() {
        let palette = Palette::new(vec![def("A", &["B"]), def("B", &["A"])]);
        let result = ancestors_of(&palette, Name::intern("A"), true);
        assert!(matches!(result, Err(SchemaError::CycleDetected { .. })));

        let result = descendants_of(&palette, Name::intern("A"), true);
        assert!(matches!(result, Err(SchemaError::CycleDetected { .. })));
    }

    #[test]
    fn self_cycle_fails_fast() {
        let palette = Palette::new(vec![def("Ouroboros", &["Ouroboros"])]);
        let result = ancestors_of(&palette, Name::intern("Ouroboros"), true);
        assert!(matches!(result, Err(SchemaError::CycleDetected { .. })));
    }

    #[test]
    fn descendants_are_sorted_lexicographically() {
        let palette = Palette::new(vec![
            def("Animal", &[]),
            def("Zebra", &["Animal"]),
            def("Cat", &["Animal"]),
            def("Dog", &["Animal"]),
            def("Puppy", &["Dog"]),
        ]);
        let desc = descendants_of(&palette, Name::intern("Animal"), true).unwrap();
        let got: Vec<&str> = desc.iter().map(|n| n.as_str()).collect();
        assert_eq!(got, vec!["Animal", "Cat", "Dog", "Puppy", "Zebra"]);

        let strict = descendants_of(&palette, Name::intern("Animal"), false).unwrap();
        let got: Vec<&str> = strict.iter().map(|n| n.as_str()).collect();
        assert_eq!(got, vec!["Cat", "Dog", "Puppy", "Zebra"]);
    }
}
