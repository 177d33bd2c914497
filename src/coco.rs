//! Serde data model for the raw COCO annotation schema.
//!
//! Only the fields this crate consumes are declared; real COCO files carry
//! plenty more (`info`, `licenses`, segmentation data) and serde skips them.
// http://cocodataset.org/#format-data

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CocoDocument {
    pub categories: Vec<CocoCategory>,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
}

#[derive(Debug, Deserialize)]
pub struct CocoCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CocoImage {
    pub id: i64,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct CocoAnnotation {
    pub image_id: i64,
    pub category_id: i64,
    pub bbox: [f64; 4],
}
