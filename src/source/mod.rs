//! Dependency sources.
//!
//! A source enumerates the dependencies one package ecosystem contributes to a
//! project. Each source is described by a [`SourceType`], registered in the
//! [`registry`], and run through a [`LoadedSource`] which caches its output and
//! applies the configured ignore rules.
//!
//! # Writing a source
//!
//! ```
//! use licensed_sources::config::Config;
//! use licensed_sources::error::Result;
//! use licensed_sources::source::{registry, Source, SourceType};
//! use licensed_sources::Dependency;
//!
//! struct Bundler;
//!
//! impl Source for Bundler {
//!     fn is_enabled(&self) -> bool {
//!         true
//!     }
//!
//!     fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>> {
//!         Ok(vec![Some(Dependency::new("rails"))])
//!     }
//! }
//!
//! fn build(_config: &Config) -> Box<dyn Source> {
//!     Box::new(Bundler)
//! }
//!
//! const BUNDLER: SourceType = SourceType::new("Bundler", build);
//! registry::register(BUNDLER);
//!
//! assert_eq!(BUNDLER.type_name(), "bundler");
//! assert!(registry::list().contains(&BUNDLER));
//! ```

mod loaded;
pub mod manifest;
pub mod registry;

pub use loaded::{load_sources, skipped_sources, LoadedSource};
pub use manifest::ManifestSource;
pub use registry::SourceRegistry;

use crate::config::Config;
use crate::error::Result;
use crate::model::Dependency;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Namespace that may prefix a declared source name, e.g. `Sources::Yarn::V1`.
pub const SOURCE_NAMESPACE: &str = "Sources";

/// Trait implemented by every dependency source.
pub trait Source {
    /// Returns whether this source applies to the current environment,
    /// e.g. because its manifest file is present.
    ///
    /// Sources are inert unless they opt in.
    fn is_enabled(&self) -> bool {
        false
    }

    /// Enumerates every dependency of the project.
    ///
    /// `None` entries are allowed and are dropped before callers see the
    /// list, as are dependencies with a blank name.
    ///
    /// # Errors
    ///
    /// Returns an error when the ecosystem's data cannot be read. The error
    /// reaches the caller of [`LoadedSource::dependencies`] unchanged.
    fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>>;
}

/// Constructor stored in a [`SourceType`].
pub type SourceBuilder = fn(&Config) -> Box<dyn Source>;

/// Describes a kind of source: its declared name and how to build it.
///
/// The short and full type identifiers are derived from the declared name,
/// so `Yarn::V1` becomes type `yarn` and full type `yarn/v1`.
#[derive(Clone, Copy)]
pub struct SourceType {
    name: &'static str,
    segments: Option<&'static [&'static str]>,
    builder: SourceBuilder,
}

impl SourceType {
    /// Creates a source type from its structural name, with `::` separating
    /// nested names (`"Yarn::Berry"`).
    pub const fn new(name: &'static str, builder: SourceBuilder) -> Self {
        Self {
            name,
            segments: None,
            builder,
        }
    }

    /// Replaces the derived identifier segments.
    ///
    /// The first segment becomes the type and all of them, joined with `/`,
    /// the full type.
    pub const fn with_type_and_version(mut self, segments: &'static [&'static str]) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Returns the declared structural name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the identifier segments: the type, then any version names.
    pub fn type_and_version(&self) -> Vec<String> {
        match self.segments {
            Some(segments) => segments.iter().map(|s| s.to_string()).collect(),
            None => derive_type_and_version(self.name),
        }
    }

    /// Returns the short type, used for ignore rules and source switches.
    pub fn type_name(&self) -> String {
        self.type_and_version()
            .into_iter()
            .next()
            .unwrap_or_default()
    }

    /// Returns the `/`-joined type, which tells versions of a source apart.
    pub fn full_type(&self) -> String {
        self.type_and_version().join("/")
    }

    /// Builds a fresh source instance.
    pub fn build(&self, config: &Config) -> Box<dyn Source> {
        (self.builder)(config)
    }
}

impl PartialEq for SourceType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.segments == other.segments
    }
}

impl Eq for SourceType {}

impl fmt::Debug for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceType")
            .field("name", &self.name)
            .field("full_type", &self.full_type())
            .finish()
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_type())
    }
}

static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid regex"));
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"));

/// Converts a structural name into snake-cased identifier segments.
///
/// `NPMLock` becomes `["npm_lock"]` and `Sources::Yarn::V1` becomes
/// `["yarn", "v1"]`.
pub fn derive_type_and_version(name: &str) -> Vec<String> {
    let name = name
        .strip_prefix(SOURCE_NAMESPACE)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(name);

    let name = ACRONYM_BOUNDARY.replace_all(name, "${1}_${2}");
    let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");

    name.to_lowercase()
        .split("::")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl Source for Inert {
        fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>> {
            Ok(Vec::new())
        }
    }

    fn build_inert(_config: &Config) -> Box<dyn Source> {
        Box::new(Inert)
    }

    #[test]
    fn test_derive_splits_acronyms() {
        assert_eq!(derive_type_and_version("NPMLock"), vec!["npm_lock"]);
        assert_eq!(derive_type_and_version("NPM"), vec!["npm"]);
        assert_eq!(derive_type_and_version("HTTPServer2"), vec!["http_server2"]);
    }

    #[test]
    fn test_derive_splits_camel_case() {
        assert_eq!(derive_type_and_version("YarnV1"), vec!["yarn_v1"]);
        assert_eq!(derive_type_and_version("GoModules"), vec!["go_modules"]);
        assert_eq!(derive_type_and_version("Bundler"), vec!["bundler"]);
    }

    #[test]
    fn test_derive_splits_nested_names() {
        assert_eq!(derive_type_and_version("Yarn::V1"), vec!["yarn", "v1"]);
        assert_eq!(
            derive_type_and_version("Yarn::BerryLock"),
            vec!["yarn", "berry_lock"]
        );
    }

    #[test]
    fn test_derive_strips_namespace() {
        assert_eq!(
            derive_type_and_version("Sources::Yarn::V1"),
            vec!["yarn", "v1"]
        );
        // only a leading namespace segment is stripped
        assert_eq!(
            derive_type_and_version("SourcesCache"),
            vec!["sources_cache"]
        );
    }

    #[test]
    fn test_type_and_full_type_follow_segments() {
        let source_type = SourceType::new("Yarn::V1", build_inert);

        assert_eq!(source_type.type_and_version(), vec!["yarn", "v1"]);
        assert_eq!(source_type.type_name(), source_type.type_and_version()[0]);
        assert_eq!(
            source_type.full_type(),
            source_type.type_and_version().join("/")
        );
        assert_eq!(source_type.to_string(), "yarn/v1");
    }

    #[test]
    fn test_override_segments() {
        let source_type =
            SourceType::new("PnpmWorkspace", build_inert).with_type_and_version(&["pnpm", "v8"]);

        assert_eq!(source_type.type_name(), "pnpm");
        assert_eq!(source_type.full_type(), "pnpm/v8");
        assert_eq!(source_type.name(), "PnpmWorkspace");
    }

    #[test]
    fn test_derivation_is_stable() {
        let source_type = SourceType::new("NPMLock", build_inert);

        assert_eq!(source_type.full_type(), source_type.full_type());
        assert_eq!(source_type.type_name(), "npm_lock");
    }

    #[test]
    fn test_default_is_enabled_is_false() {
        let source = SourceType::new("Inert", build_inert).build(&Config::default());

        assert!(!source.is_enabled());
    }

    #[test]
    fn test_equality_ignores_builder() {
        fn other_builder(_config: &Config) -> Box<dyn Source> {
            Box::new(Inert)
        }

        assert_eq!(
            SourceType::new("Yarn::V1", build_inert),
            SourceType::new("Yarn::V1", other_builder)
        );
        assert_ne!(
            SourceType::new("Yarn::V1", build_inert),
            SourceType::new("Yarn::V2", build_inert)
        );
    }
}
