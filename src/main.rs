use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};

use coco_balance::{init_logging, load_annotations, FileCacheStore, LoadOptions};

fn main() -> ExitCode {
    init_logging();

    let mut args = std::env::args().skip(1);
    let (coco_path, img_dir, cache_path) = match (args.next(), args.next(), args.next()) {
        (Some(coco), Some(imgs), Some(cache)) => {
            (PathBuf::from(coco), PathBuf::from(imgs), PathBuf::from(cache))
        }
        _ => {
            eprintln!("usage: coco-balance <annotations.json> <image-dir> <cache-file> [split-len]");
            return ExitCode::FAILURE;
        }
    };

    let split_len = match args.next() {
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                eprintln!("split-len must be a positive integer, got {:?}", raw);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    info!("Loading annotations from {:?}", coco_path);
    let options = LoadOptions {
        split_len,
        ..Default::default()
    };
    match load_annotations(&coco_path, &img_dir, &FileCacheStore, &cache_path, &options) {
        Ok(result) => {
            info!(
                "Loaded {} images covering {} categories",
                result.images.len(),
                result.seen_labels.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Load failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
