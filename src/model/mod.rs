//! Core data types for dependencies and scan results.
//!
//! - [`Dependency`] - A package discovered by a source
//! - [`DependencyMetadata`] - Optional descriptive fields of a dependency
//! - [`ScanResult`] - Dependencies grouped by the source that produced them
//!
//! # Example
//!
//! ```
//! use licensed_sources::{Dependency, ScanResult, SourceReport};
//!
//! let dependency = Dependency::new("left-pad").with_version("1.3.0");
//! let report = SourceReport::new("npm", "npm", vec![dependency]);
//! let result = ScanResult::new(vec![report]);
//!
//! assert_eq!(result.dependency_count(), 1);
//! ```

mod dependency;
mod report;

pub use dependency::*;
pub use report::*;
