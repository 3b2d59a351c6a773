use super::{Source, SourceType};
use crate::config::{Config, Configuration, IgnoreCriteria};
use crate::error::Result;
use crate::model::Dependency;
use tracing::debug;

/// A source instance bound to the configuration of one run.
///
/// The source's dependencies are enumerated once, on the first call to
/// [`dependencies`](Self::dependencies), and kept for the life of the value.
/// Ignore rules are applied on every call, so a rule added to the
/// configuration between calls takes effect without enumerating again.
///
/// `dependencies` needs `&mut self`; share a `LoadedSource` across threads
/// only behind a lock.
pub struct LoadedSource<'a> {
    source_type: SourceType,
    config: &'a dyn Configuration,
    source: Box<dyn Source>,
    cached: Option<Vec<Dependency>>,
}

impl<'a> LoadedSource<'a> {
    pub fn new(
        source_type: SourceType,
        config: &'a dyn Configuration,
        source: Box<dyn Source>,
    ) -> Self {
        Self {
            source_type,
            config,
            source,
            cached: None,
        }
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn config(&self) -> &'a dyn Configuration {
        self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_enabled()
    }

    /// True once dependencies have been enumerated successfully.
    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Returns every dependency that is not ignored by the configuration.
    ///
    /// # Errors
    ///
    /// Returns the source's enumeration error. Nothing is cached in that
    /// case, so a later call enumerates again.
    pub fn dependencies(&mut self) -> Result<Vec<Dependency>> {
        let source_type = self.source_type.type_name();
        let config = self.config;

        let dependencies = self
            .cached_dependencies()?
            .iter()
            .filter(|dependency| !is_ignored_by(config, &source_type, dependency))
            .cloned()
            .collect();

        Ok(dependencies)
    }

    /// Returns whether the configuration ignores `dependency` for this
    /// source's short type.
    pub fn is_ignored(&self, dependency: &Dependency) -> bool {
        is_ignored_by(self.config, &self.source_type.type_name(), dependency)
    }

    fn cached_dependencies(&mut self) -> Result<&[Dependency]> {
        if self.cached.is_none() {
            let enumerated = self.source.enumerate_dependencies()?;
            let total = enumerated.len();

            let dependencies: Vec<Dependency> = enumerated
                .into_iter()
                .flatten()
                .filter(|dependency| !dependency.is_placeholder())
                .collect();

            debug!(
                source = %self.source_type,
                enumerated = total,
                kept = dependencies.len(),
                "enumerated dependencies"
            );

            self.cached = Some(dependencies);
        }

        Ok(self.cached.as_deref().unwrap_or_default())
    }
}

fn is_ignored_by(config: &dyn Configuration, source_type: &str, dependency: &Dependency) -> bool {
    config.is_ignored(&IgnoreCriteria {
        source_type,
        name: &dependency.name,
    })
}

/// Builds every source in `source_types` that should run for `config`.
///
/// A source is skipped when the configuration switches its type off or when
/// the source reports itself as not enabled.
pub fn load_sources<'a>(config: &'a Config, source_types: &[SourceType]) -> Vec<LoadedSource<'a>> {
    source_types
        .iter()
        .filter_map(|source_type| {
            if !config.source_enabled(&source_type.type_name()) {
                debug!(source = %source_type, "disabled by configuration");
                return None;
            }

            let loaded = LoadedSource::new(*source_type, config, source_type.build(config));
            if !loaded.is_enabled() {
                debug!(source = %source_type, "not enabled for this project");
                return None;
            }

            Some(loaded)
        })
        .collect()
}

/// Returns the entries of `source_types` that did not make it into `loaded`.
pub fn skipped_sources(source_types: &[SourceType], loaded: &[LoadedSource<'_>]) -> Vec<SourceType> {
    source_types
        .iter()
        .filter(|source_type| !loaded.iter().any(|l| l.source_type() == **source_type))
        .copied()
        .collect()
}
