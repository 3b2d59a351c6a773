use super::Dependency;
use serde::{Deserialize, Serialize};

/// The outcome of running one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    pub source_type: String,
    pub full_type: String,
    pub dependencies: Vec<Dependency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn new(
        source_type: impl Into<String>,
        full_type: impl Into<String>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            full_type: full_type.into(),
            dependencies,
            error: None,
        }
    }

    pub fn failed(
        source_type: impl Into<String>,
        full_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            full_type: full_type.into(),
            dependencies: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    pub sources: Vec<SourceReport>,
}

impl ScanResult {
    pub fn new(sources: Vec<SourceReport>) -> Self {
        Self { sources }
    }

    pub fn dependency_count(&self) -> usize {
        self.sources.iter().map(|s| s.dependencies.len()).sum()
    }

    pub fn has_errors(&self) -> bool {
        self.sources.iter().any(|s| s.error.is_some())
    }
}
