use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading and sampling a COCO annotation file.
///
/// There is no retry or partial-result path: either the whole load succeeds
/// and gets cached, or it fails with one of these and nothing is written.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not structurally valid COCO (missing `categories`,
    /// `images` or `annotations`, or a field of the wrong shape).
    #[error("annotation file is not valid COCO structure: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// An annotation references a category id absent from the category list.
    #[error("annotation references unknown category id {category_id}")]
    UnknownCategory { category_id: i64 },

    /// An annotation references an image id absent from the images list.
    #[error("annotation references image id {image_id} which has no image record")]
    DanglingImageReference { image_id: i64 },

    /// The document carries zero annotations, so there is nothing to sample
    /// and per-category ratios would divide by zero.
    #[error("annotation file contains no annotations")]
    EmptyInput,

    /// A cache blob exists at the key but cannot be deserialized. Surfaced
    /// loudly instead of falling back to re-parsing, so a stale or damaged
    /// cache never gets masked.
    #[error("cache blob at {path} could not be deserialized: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode cache record: {0}")]
    CacheEncode(#[source] serde_json::Error),
}
