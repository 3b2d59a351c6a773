pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod scan;
pub mod source;

pub use config::{Config, Configuration, IgnoreCriteria};
pub use error::SourceError;
pub use model::{Dependency, DependencyMetadata, ScanResult, SourceReport};
pub use source::{LoadedSource, Source, SourceType};
