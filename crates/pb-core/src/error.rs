//! Error taxonomy for schema resolution queries.
//!
//! Every error here is local to a single query call: callers (popup / UI
//! code) treat a failed resolution as "no valid labels" and inform the
//! user — a failure never takes down the editing session.

use crate::id::Name;
use thiserror::Error;

/// A failed schema resolution query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The subject type name is not present in the palette.
    #[error("Type \"{name}\" is not registered in the palette")]
    NotFound { name: Name },

    /// A type was re-entered while its own ancestor chain was still being
    /// walked. The parent graph must be a DAG.
    #[error("Cyclic inheritance detected: \"{name}\" is its own ancestor")]
    CycleDetected { name: Name },
}
