//! Benchmark inputs for scenepool.
//!
//! - [`layout_report`]: a raw engine layout report with `entries` block
//!   entries, in either shape.
//! - [`override_document`]: a parsed override document with `keys`
//!   entries mixing numbers, digit strings, and non-quantity values.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use scenepool_core::{BlockTier, SceneType, KIB};
use serde_json::{json, Map, Value};

/// Build a layout report with `entries` entries. Every tenth entry is
/// missing its count, as drifted engine schemas produce.
pub fn layout_report(entries: usize, as_mapping: bool) -> Value {
    let items = (0..entries).map(|i| {
        let size = (i as u64 % 64 + 1) * KIB;
        if i % 10 == 9 {
            json!({ "block_size": size })
        } else {
            json!({ "block_size": size, "block_count": (i % 32 + 1) as u64 })
        }
    });
    if as_mapping {
        let map: Map<String, Value> = items
            .enumerate()
            .map(|(i, v)| (format!("class_{i}"), v))
            .collect();
        Value::Object(map)
    } else {
        Value::Array(items.collect())
    }
}

/// Build an override document object with `keys` entries, starting with
/// the per-tier keys of every known scene.
pub fn override_document(keys: usize) -> Map<String, Value> {
    let mut doc = Map::new();
    for scene in SceneType::KNOWN {
        doc.insert(scene.total_memory_key(), json!((1u64 << 30).to_string()));
        for tier in BlockTier::ALL {
            doc.insert(scenepool_config::block_size_key(&scene, tier), json!(64 * KIB));
            doc.insert(scenepool_config::block_count_key(&scene, tier), json!("16"));
        }
    }
    let mut i = 0;
    while doc.len() < keys {
        let value = match i % 3 {
            0 => json!(i),
            1 => json!(i.to_string()),
            _ => json!({ "note": "unrelated" }),
        };
        let key = if i % 3 == 2 {
            format!("EXTRA_{i}")
        } else {
            format!("EXTRA_{i}_COUNT")
        };
        doc.insert(key, value);
        i += 1;
    }
    doc
}
