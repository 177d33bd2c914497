//! Output data model: per-image records with their selected objects.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single selected object: category name plus its bounding box, with the
/// four corners rounded to the nearest integer from the float input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectBox {
    pub name: String,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

/// One image and the objects the sampler selected for it.
///
/// `filename` is the image base directory joined with the file name stored
/// in the annotation document. `objects` is in selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: PathBuf,
    pub width: u32,
    pub height: u32,
    pub objects: Vec<ObjectBox>,
}
