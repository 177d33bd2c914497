//! Annotation loader: parses a COCO document, runs the balanced sampler
//! over its annotations and reassembles the selection into per-image
//! records, with the result cached through an injected [`CacheStore`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::cache::{CacheRecord, CacheStore};
use crate::coco::CocoDocument;
use crate::error::LoadError;
use crate::record::{ImageRecord, ObjectBox};
use crate::sampler::{sample, CategoryGroup};

/// Knobs for one load.
///
/// `split_len` defaults to the total raw annotation count, which drains
/// every category completely. `seed` pins the shuffle so repeated loads
/// produce identical selections; `None` draws from entropy.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub split_len: Option<usize>,
    pub keep_original_dist: bool,
    pub seed: Option<u64>,
}

/// Output of a load: the per-image records and the final per-category
/// selected counts. Matches what the cache blob stores.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadResult {
    pub images: Vec<ImageRecord>,
    pub seen_labels: HashMap<String, usize>,
    pub split_len: usize,
}

/// An annotation bound to its owning image id, before reassembly.
#[derive(Debug, Clone)]
struct PendingBox {
    image_id: i64,
    object: ObjectBox,
}

/// Load a COCO annotation file, balance-sample its annotations and return
/// the per-image records plus per-category selected counts.
///
/// If a cache record exists at `cache_key` it is returned directly and the
/// source file is never touched. Otherwise the document is parsed,
/// sampled, persisted through `store`, and returned. The cache is written
/// only after everything else succeeded, so a failed load leaves no blob.
pub fn load_annotations(
    coco_path: &Path,
    img_dir: &Path,
    store: &dyn CacheStore,
    cache_key: &Path,
    options: &LoadOptions,
) -> Result<LoadResult, LoadError> {
    if let Some(cached) = store.get(cache_key)? {
        info!("Reusing cached annotations from {:?}", cache_key);
        return Ok(LoadResult {
            images: cached.images,
            seen_labels: cached.seen_labels,
            split_len: cached.split_len,
        });
    }

    let contents = fs::read_to_string(coco_path).map_err(|e| LoadError::Io {
        path: coco_path.to_path_buf(),
        source: e,
    })?;
    let document: CocoDocument =
        serde_json::from_str(&contents).map_err(LoadError::MalformedInput)?;

    // Category groups keep the order of the document's category list, which
    // fixes the round-robin visiting order in the sampler.
    let mut category_names: HashMap<i64, String> = HashMap::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup<PendingBox>> = Vec::new();
    for cat in &document.categories {
        category_names.insert(cat.id, cat.name.clone());
        group_index.insert(cat.name.clone(), groups.len());
        groups.push(CategoryGroup {
            name: cat.name.clone(),
            items: Vec::new(),
        });
    }

    let mut image_records: HashMap<i64, ImageRecord> = HashMap::new();
    for img in &document.images {
        image_records.insert(
            img.id,
            ImageRecord {
                filename: img_dir.join(&img.file_name),
                width: img.width,
                height: img.height,
                objects: Vec::new(),
            },
        );
    }

    // Referential integrity is checked for every annotation up front, not
    // lazily on selection, so a bad document fails before anything is
    // sampled or cached.
    for ann in &document.annotations {
        let name = category_names
            .get(&ann.category_id)
            .ok_or(LoadError::UnknownCategory {
                category_id: ann.category_id,
            })?;
        if !image_records.contains_key(&ann.image_id) {
            return Err(LoadError::DanglingImageReference {
                image_id: ann.image_id,
            });
        }
        let object = ObjectBox {
            name: name.clone(),
            xmin: ann.bbox[0].round() as i64,
            ymin: ann.bbox[1].round() as i64,
            xmax: ann.bbox[2].round() as i64,
            ymax: ann.bbox[3].round() as i64,
        };
        groups[group_index[name]].items.push(PendingBox {
            image_id: ann.image_id,
            object,
        });
    }

    let total: usize = groups.iter().map(|g| g.items.len()).sum();
    let split_len = options.split_len.unwrap_or(total);

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcome = sample(groups, split_len, options.keep_original_dist, &mut rng)?;
    let selected_total = outcome.selected.len();

    // Reattach selected annotations to their images. An image surfaces the
    // first time one of its annotations is drawn; images that received no
    // selection are left out of the output entirely.
    let mut ordered_ids: Vec<i64> = Vec::new();
    for pending in outcome.selected {
        if let Some(record) = image_records.get_mut(&pending.image_id) {
            if record.objects.is_empty() {
                ordered_ids.push(pending.image_id);
            }
            record.objects.push(pending.object);
        }
    }
    let images: Vec<ImageRecord> = ordered_ids
        .iter()
        .filter_map(|id| image_records.remove(id))
        .collect();

    let seen_labels: HashMap<String, usize> = outcome.counts.iter().cloned().collect();

    info!("Total images: {}", images.len());
    info!("Total annotations: {}", selected_total);
    info!("Tag distribution:");
    for (name, count) in &outcome.counts {
        info!("  {}: {}", name, count);
    }

    let record = CacheRecord {
        images,
        seen_labels,
        split_len,
    };
    store.put(cache_key, &record)?;

    Ok(LoadResult {
        images: record.images,
        seen_labels: record.seen_labels,
        split_len: record.split_len,
    })
}
