//! Registry of known source types.
//!
//! The process-wide registry starts with the built-in sources and grows as
//! the embedding program calls [`register`]. Entries are kept in
//! registration order and are never removed. Registering the same type twice
//! stores it twice.
//!
//! ```
//! use licensed_sources::source::registry;
//!
//! for source_type in registry::list() {
//!     println!("{} ({})", source_type.type_name(), source_type.full_type());
//! }
//! ```

use super::{manifest, SourceType};
use std::sync::{Once, PoisonError, RwLock};
use tracing::debug;

/// An ordered, append-only list of source types.
pub struct SourceRegistry {
    entries: RwLock<Vec<SourceType>>,
}

impl SourceRegistry {
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Appends `source_type`.
    pub fn register(&self, source_type: SourceType) {
        debug!(source = %source_type, name = source_type.name(), "registering source type");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source_type);
    }

    /// Returns all registered source types in registration order.
    pub fn list(&self) -> Vec<SourceType> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns every source type whose full type or short type is `query`,
    /// in registration order. A short type selects all of its versions.
    pub fn matching(&self, query: &str) -> Vec<SourceType> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|source_type| source_type.full_type() == query || source_type.type_name() == query)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Source types shipped with this crate.
pub fn builtin_sources() -> Vec<SourceType> {
    vec![manifest::SOURCE_TYPE]
}

static SOURCES: SourceRegistry = SourceRegistry::new();
static BUILTINS: Once = Once::new();

fn global() -> &'static SourceRegistry {
    BUILTINS.call_once(|| {
        for source_type in builtin_sources() {
            SOURCES.register(source_type);
        }
    });
    &SOURCES
}

/// Adds `source_type` to the process-wide registry.
///
/// Call once per source type during start-up. Registration is not
/// deduplicated.
pub fn register(source_type: SourceType) {
    global().register(source_type);
}

/// Returns every source type in the process-wide registry.
pub fn list() -> Vec<SourceType> {
    global().list()
}

/// Looks up source types in the process-wide registry by full or short type.
pub fn matching(query: &str) -> Vec<SourceType> {
    global().matching(query)
}
