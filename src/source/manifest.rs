use super::{Source, SourceType};
use crate::config::{Config, ManifestDependency};
use crate::error::Result;
use crate::model::{Dependency, DependencyMetadata};
use std::io;
use std::path::PathBuf;
use tracing::warn;

/// Dependencies declared by hand in the `[manifest]` configuration section.
///
/// Useful for vendored code that no package manager knows about.
pub struct ManifestSource {
    entries: Vec<ManifestDependency>,
    root: PathBuf,
}

pub const SOURCE_TYPE: SourceType = SourceType::new("Manifest", build);

fn build(config: &Config) -> Box<dyn Source> {
    let root = resolve_root(std::env::current_dir());
    Box::new(ManifestSource::new(config.manifest.dependencies.clone(), root))
}

fn resolve_root(current_dir: io::Result<PathBuf>) -> PathBuf {
    current_dir.unwrap_or_else(|e| {
        warn!(error = %e, "cannot read working directory, resolving manifest paths against \".\"");
        PathBuf::from(".")
    })
}

impl ManifestSource {
    /// Creates a manifest source whose relative paths resolve against `root`.
    pub fn new(entries: Vec<ManifestDependency>, root: PathBuf) -> Self {
        Self { entries, root }
    }

    fn to_dependency(&self, entry: &ManifestDependency) -> Option<Dependency> {
        if entry.name.trim().is_empty() {
            warn!("skipping manifest dependency without a name");
            return None;
        }

        let mut dependency = Dependency::new(entry.name.trim()).with_metadata(DependencyMetadata {
            homepage: entry.homepage.clone(),
            summary: None,
            license: entry.license.clone(),
        });

        if let Some(version) = &entry.version {
            dependency = dependency.with_version(version);
        }

        if let Some(path) = &entry.path {
            let resolved = self.root.join(path);
            if !resolved.exists() {
                dependency = dependency.with_error(format!("path does not exist: {}", path.display()));
            }
            dependency = dependency.with_path(resolved);
        }

        Some(dependency)
    }
}

impl Source for ManifestSource {
    fn is_enabled(&self) -> bool {
        !self.entries.is_empty()
    }

    fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>> {
        Ok(self
            .entries
            .iter()
            .map(|entry| self.to_dependency(entry))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::LoadedSource;
    use std::fs;

    fn entry(name: &str) -> ManifestDependency {
        ManifestDependency {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_type_names() {
        assert_eq!(SOURCE_TYPE.type_name(), "manifest");
        assert_eq!(SOURCE_TYPE.full_type(), "manifest");
    }

    #[test]
    fn test_root_falls_back_when_working_directory_is_unreadable() {
        let unreadable = Err(io::Error::new(io::ErrorKind::NotFound, "directory was removed"));

        assert_eq!(resolve_root(unreadable), PathBuf::from("."));
        assert_eq!(resolve_root(Ok(PathBuf::from("/srv/app"))), PathBuf::from("/srv/app"));
    }

    #[test]
    fn test_enabled_only_with_entries() {
        let empty = ManifestSource::new(Vec::new(), PathBuf::from("."));
        let declared = ManifestSource::new(vec![entry("left-pad")], PathBuf::from("."));

        assert!(!empty.is_enabled());
        assert!(declared.is_enabled());
    }

    #[test]
    fn test_build_reads_config() {
        let mut config = Config::default();
        assert!(!SOURCE_TYPE.build(&config).is_enabled());

        config.manifest.dependencies.push(entry("left-pad"));
        assert!(SOURCE_TYPE.build(&config).is_enabled());
    }

    #[test]
    fn test_unnamed_entries_are_placeholders() {
        let source = ManifestSource::new(vec![entry("left-pad"), entry("  ")], PathBuf::from("."));

        let enumerated = source.enumerate_dependencies().unwrap();
        assert_eq!(enumerated.len(), 2);
        assert!(enumerated[1].is_none());
    }

    #[test]
    fn test_copies_declared_fields() {
        let source = ManifestSource::new(
            vec![ManifestDependency {
                name: "left-pad".to_string(),
                version: Some("1.3.0".to_string()),
                path: None,
                homepage: Some("https://github.com/left-pad/left-pad".to_string()),
                license: Some("WTFPL".to_string()),
            }],
            PathBuf::from("."),
        );

        let dependency = source.enumerate_dependencies().unwrap().remove(0).unwrap();
        assert_eq!(dependency.version.as_deref(), Some("1.3.0"));
        assert_eq!(dependency.metadata.license.as_deref(), Some("WTFPL"));
        assert!(dependency.errors.is_empty());
    }

    #[test]
    fn test_missing_path_is_recorded_on_dependency() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("vendored")).unwrap();

        let present = ManifestDependency {
            path: Some(PathBuf::from("vendored")),
            ..entry("vendored")
        };
        let missing = ManifestDependency {
            path: Some(PathBuf::from("gone")),
            ..entry("gone")
        };
        let source = ManifestSource::new(vec![present, missing], dir.path().to_path_buf());

        let dependencies: Vec<Dependency> = source
            .enumerate_dependencies()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();

        assert!(dependencies[0].errors.is_empty());
        assert_eq!(dependencies[0].path, Some(dir.path().join("vendored")));
        assert_eq!(dependencies[1].errors, vec!["path does not exist: gone".to_string()]);
    }

    #[test]
    fn test_ignore_rules_apply_to_manifest() {
        let mut config = Config::default();
        config.ignore("manifest", "left-pad");
        let source = ManifestSource::new(vec![entry("left-pad"), entry("is-even")], PathBuf::from("."));

        let mut loaded = LoadedSource::new(SOURCE_TYPE, &config, Box::new(source));
        let dependencies = loaded.dependencies().unwrap();

        assert_eq!(dependencies, vec![Dependency::new("is-even")]);
    }
}
