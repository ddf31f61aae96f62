pub mod error;
pub mod hierarchy;
pub mod id;
pub mod matcher;
pub mod palette;
pub mod project;
pub mod properties;

pub use error::SchemaError;
pub use hierarchy::{ancestors_of, descendants_of};
pub use id::Name;
pub use matcher::{
    is_text_node, list_all_type_names, unique_text_link_labels_in_use, valid_labels_between,
    valid_properties_between, valid_properties_between_with,
};
pub use palette::{Palette, PropertySpec, TypeDefinition, TypeSchema};
pub use project::{CanvasGraph, CanvasNode, Link, NodeKind};
pub use properties::{ResolvedProperty, properties_of};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
