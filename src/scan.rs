//! Runs loaded sources and collects their dependencies.

use crate::model::{ScanResult, SourceReport};
use crate::source::LoadedSource;
use tracing::{debug, warn};

/// Collects the dependencies of every source in order.
///
/// A failing source is recorded in its report and does not stop the others.
pub fn run_sources(sources: &mut [LoadedSource<'_>]) -> ScanResult {
    let reports = sources
        .iter_mut()
        .map(|loaded| {
            let source_type = loaded.source_type();
            match loaded.dependencies() {
                Ok(dependencies) => {
                    debug!(
                        source = %source_type,
                        count = dependencies.len(),
                        "collected dependencies"
                    );
                    SourceReport::new(source_type.type_name(), source_type.full_type(), dependencies)
                }
                Err(e) => {
                    warn!(source = %source_type, error = %e, "source failed");
                    SourceReport::failed(source_type.type_name(), source_type.full_type(), e.to_string())
                }
            }
        })
        .collect();

    ScanResult::new(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{Result, SourceError};
    use crate::model::Dependency;
    use crate::source::{Source, SourceType};

    struct Npm;

    impl Source for Npm {
        fn is_enabled(&self) -> bool {
            true
        }

        fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>> {
            Ok(vec![Some(Dependency::new("react")), Some(Dependency::new("left-pad"))])
        }
    }

    struct Broken;

    impl Source for Broken {
        fn enumerate_dependencies(&self) -> Result<Vec<Option<Dependency>>> {
            Err(SourceError::failed("pip", "requirements.txt is unreadable"))
        }
    }

    fn build_npm(_config: &Config) -> Box<dyn Source> {
        Box::new(Npm)
    }

    fn build_broken(_config: &Config) -> Box<dyn Source> {
        Box::new(Broken)
    }

    #[test]
    fn test_failures_do_not_stop_other_sources() {
        let mut config = Config::default();
        config.ignore("npm", "left-pad");

        let npm = SourceType::new("NPM", build_npm);
        let pip = SourceType::new("Pip", build_broken);
        let mut sources = vec![
            LoadedSource::new(pip, &config, pip.build(&config)),
            LoadedSource::new(npm, &config, npm.build(&config)),
        ];

        let result = run_sources(&mut sources);

        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].source_type, "pip");
        assert_eq!(
            result.sources[0].error.as_deref(),
            Some("pip source failed: requirements.txt is unreadable")
        );
        assert_eq!(result.sources[1].dependencies, vec![Dependency::new("react")]);
        assert_eq!(result.dependency_count(), 1);
    }
}
