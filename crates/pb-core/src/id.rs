use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for names — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier used for type names, property names,
/// and canvas entity ids. Internally a `Spur` index — 4 bytes, Copy, Eq,
/// Hash in O(1).
///
/// The empty string is a valid `Name`: it is the attribute-range sentinel
/// and the "no type / unset" entry in type-name listings.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name(Spur);

impl Name {
    /// Intern a new string as a Name, or return existing if already interned.
    pub fn intern(s: &str) -> Self {
        Name(INTERNER.get_or_intern(s))
    }

    /// The empty-string sentinel (attribute range, unset type).
    pub fn empty() -> Self {
        Self::intern("")
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Whether this is the empty-string sentinel.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Generate a unique id with a kind prefix (e.g. `node_1`, `link_2`).
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("{prefix}_{n}"))
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Name::intern(&s))
    }
}
