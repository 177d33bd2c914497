//! Loading of COCO object-detection annotations with label-balanced
//! sampling.
//!
//! The loader parses a COCO JSON document into per-image annotation
//! records. Instead of taking annotations in file order, they are grouped
//! per category and drained round-robin (optionally weighted by each
//! category's original frequency) until a target count is reached, so the
//! resulting split does not simply mirror whatever label dominates the
//! file. Results are persisted through a pluggable cache store and reused
//! on the next run.

pub mod cache;
pub mod coco;
pub mod error;
pub mod loader;
pub mod logging;
pub mod record;
pub mod sampler;

pub use cache::{CacheRecord, CacheStore, FileCacheStore, MemoryCacheStore};
pub use error::LoadError;
pub use loader::{load_annotations, LoadOptions, LoadResult};
pub use logging::init_logging;
pub use record::{ImageRecord, ObjectBox};
pub use sampler::{sample, CategoryGroup, SampleOutcome};
