//! The palette: the catalog of node/link type definitions available to a
//! project.
//!
//! A palette is loaded once (normally from a JSON document shipped by the
//! host) and replaced wholesale when the user swaps or imports a palette —
//! there is no partial-mutation API. All schema queries read the palette
//! through the indexes built here.

use crate::id::Name;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

// ─── Type definitions ────────────────────────────────────────────────────

/// A relation- or attribute-valued property declared on a type schema.
///
/// `range` is either the empty string ("this is a literal attribute") or a
/// type name ("valid only when the far end resolves to that type or one of
/// its subtypes").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(default = "Name::empty")]
    pub range: Name,
}

impl PropertySpec {
    pub fn attribute() -> Self {
        Self {
            range: Name::empty(),
        }
    }

    pub fn relation(range: Name) -> Self {
        Self { range }
    }

    /// Attribute properties carry a literal value instead of pointing at
    /// another typed entity.
    pub fn is_attribute(&self) -> bool {
        self.range.is_empty()
    }
}

/// The optional inheritance + property metadata attached to a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSchema {
    /// Normally equal to the owning definition's registry name, but the
    /// palette is externally supplied and a mismatch must be tolerated.
    /// Candidate selection in the matcher keys off this field.
    pub type_name: Name,

    /// Direct parent type names, in declared order. Multiple inheritance
    /// is allowed.
    #[serde(default)]
    pub parents: SmallVec<[Name; 2]>,

    /// Property name → spec. Keys are unique within one type; insertion
    /// order is irrelevant.
    #[serde(default)]
    pub properties: HashMap<Name, PropertySpec>,
}

impl TypeSchema {
    pub fn new(type_name: Name) -> Self {
        Self {
            type_name,
            parents: SmallVec::new(),
            properties: HashMap::new(),
        }
    }
}

/// A single palette entry: a named node/link template, optionally carrying
/// a schema that places it in the inheritance hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Unique registry key.
    pub name: Name,

    /// Inheritance + property metadata. Entries without a schema are plain
    /// visual templates: they contribute nothing to hierarchy traversal.
    #[serde(default)]
    pub schema: Option<TypeSchema>,
}

impl TypeDefinition {
    pub fn new(name: Name) -> Self {
        Self { name, schema: None }
    }

    pub fn with_schema(name: Name, schema: TypeSchema) -> Self {
        Self {
            name,
            schema: Some(schema),
        }
    }
}

// ─── Palette (type registry) ─────────────────────────────────────────────

/// Wire shape of a palette document: `{ "types": [ ... ] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PaletteDoc {
    types: Vec<TypeDefinition>,
}

/// The type registry. Holds definitions in load order (which fixes the
/// enumeration order all merge determinism depends on) plus lookup indexes
/// built once per snapshot.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    /// Definitions in load order.
    types: Vec<TypeDefinition>,

    /// Registry key → position in `types`.
    by_name: HashMap<Name, usize>,

    /// Direct-subtype adjacency: parent name → child registry keys, in
    /// load order. Built once here so descendant queries don't rescan the
    /// whole registry.
    children: HashMap<Name, Vec<Name>>,
}

impl Palette {
    /// Build a palette from a list of definitions.
    ///
    /// Duplicate registry keys keep the first definition; later duplicates
    /// are dropped with a warning so enumeration order stays equal to load
    /// order.
    pub fn new(defs: Vec<TypeDefinition>) -> Self {
        let mut types: Vec<TypeDefinition> = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());

        for def in defs {
            if by_name.contains_key(&def.name) {
                log::warn!(
                    "Duplicate palette type \"{}\" — keeping the first definition",
                    def.name
                );
                continue;
            }
            by_name.insert(def.name, types.len());
            types.push(def);
        }

        let mut children: HashMap<Name, Vec<Name>> = HashMap::new();
        for def in &types {
            if let Some(schema) = &def.schema {
                for parent in &schema.parents {
                    children.entry(*parent).or_default().push(def.name);
                }
            }
        }

        Self {
            types,
            by_name,
            children,
        }
    }

    /// Parse a palette from its JSON document form.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        let doc: PaletteDoc = serde_json::from_str(source)?;
        Ok(Self::new(doc.types))
    }

    /// All definitions, in load order.
    pub fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    /// Look up a definition by registry key. `None` means the caller asked
    /// for an unregistered type — query entry points turn this into
    /// `SchemaError::NotFound`.
    pub fn get(&self, name: Name) -> Option<&TypeDefinition> {
        self.by_name.get(&name).map(|&i| &self.types[i])
    }

    /// Whether `name` is a registered type.
    pub fn contains(&self, name: Name) -> bool {
        self.by_name.contains_key(&name)
    }

    /// Direct subtypes of `name` (types whose schema lists it as a parent),
    /// in load order.
    pub fn children_of(&self, name: Name) -> &[Name] {
        self.children.get(&name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every property name declared by any schema in the registry. Labels
    /// outside this set are ad hoc free-text labels with no schema backing.
    pub fn declared_property_names(&self) -> HashSet<Name> {
        let mut names = HashSet::new();
        for def in &self.types {
            if let Some(schema) = &def.schema {
                names.extend(schema.properties.keys().copied());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn def(name: &str, parents: &[&str]) -> TypeDefinition {
        let mut schema = TypeSchema::new(Name::intern(name));
        schema.parents = parents.iter().map(|p| Name::intern(p)).collect();
        TypeDefinition::with_schema(Name::intern(name), schema)
    }

    #[test]
    fn lookup_and_order() {
        let palette = Palette::new(vec![def("Animal", &[]), def("Dog", &["Animal"])]);
        assert!(palette.get(Name::intern("Dog")).is_some());
        assert!(palette.get(Name::intern("Cat")).is_none());

        let order: Vec<&str> = palette.types().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(order, vec!["Animal", "Dog"]);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let mut second = def("Animal", &[]);
        second.schema.as_mut().unwrap().parents.push(Name::intern("Thing"));

        let palette = Palette::new(vec![def("Animal", &[]), second]);
        assert_eq!(palette.types().len(), 1);
        let kept = palette.get(Name::intern("Animal")).unwrap();
        assert!(kept.schema.as_ref().unwrap().parents.is_empty());
    }

    #[test]
    fn children_index_in_load_order() {
        let palette = Palette::new(vec![
            def("Animal", &[]),
            def("Dog", &["Animal"]),
            def("Cat", &["Animal"]),
        ]);
        let kids: Vec<&str> = palette
            .children_of(Name::intern("Animal"))
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(kids, vec!["Dog", "Cat"]);
        assert!(palette.children_of(Name::intern("Dog")).is_empty());
    }

    #[test]
    fn parse_json_palette() {
        let source = r#"{
            "types": [
                { "name": "Animal", "schema": { "typeName": "Animal" } },
                {
                    "name": "Dog",
                    "schema": {
                        "typeName": "Dog",
                        "parents": ["Animal"],
                        "properties": { "name": { "range": "" } }
                    }
                },
                { "name": "Sticker" }
            ]
        }"#;

        let palette = Palette::from_json(source).unwrap();
        assert_eq!(palette.types().len(), 3);

        let dog = palette.get(Name::intern("Dog")).unwrap();
        let schema = dog.schema.as_ref().unwrap();
        assert_eq!(schema.parents.as_slice(), &[Name::intern("Animal")]);
        let prop = schema.properties.get(&Name::intern("name")).unwrap();
        assert!(prop.is_attribute());

        // Schema-less entries are plain visual templates.
        assert!(palette.get(Name::intern("Sticker")).unwrap().schema.is_none());
    }

    #[test]
    fn declared_property_names_spans_registry() {
        let mut animal = def("Animal", &[]);
        animal
            .schema
            .as_mut()
            .unwrap()
            .properties
            .insert(Name::intern("owner"), PropertySpec::relation(Name::intern("Person")));
        let mut dog = def("Dog", &["Animal"]);
        dog.schema
            .as_mut()
            .unwrap()
            .properties
            .insert(Name::intern("name"), PropertySpec::attribute());

        let palette = Palette::new(vec![animal, dog]);
        let declared = palette.declared_property_names();
        assert!(declared.contains(&Name::intern("owner")));
        assert!(declared.contains(&Name::intern("name")));
        assert!(!declared.contains(&Name::intern("likes")));
    }
}
