//! Cache-invalidation signalling after a successful move.
//!
//! Folder stats are computed per storage source, so invalidations are never
//! merged across sources: each distinct source id gets its own event carrying
//! only the folders that belong to it. The emitter has no knowledge of its
//! consumers; it only guarantees the events go out synchronously, before any
//! reload request.

use std::collections::{HashMap, HashSet};

use stowage_events::{Event, EventBus};

/// Publish one [`Event::CacheInvalidated`] per distinct storage source,
/// carrying that source's affected folders. Duplicate (folder, source) pairs
/// are dropped; first-seen order is preserved for both sources and folders.
pub fn invalidate_folders(events: &EventBus, pairs: &[(String, String)]) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut source_order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<String>> = HashMap::new();

    for (folder, source_id) in pairs {
        if !seen.insert((folder.as_str(), source_id.as_str())) {
            continue;
        }
        if !grouped.contains_key(source_id.as_str()) {
            source_order.push(source_id.as_str());
        }
        grouped
            .entry(source_id.as_str())
            .or_default()
            .push(folder.clone());
    }

    for source_id in source_order {
        if let Some(folders) = grouped.remove(source_id) {
            events.publish(Event::CacheInvalidated {
                folders,
                source_id: source_id.to_string(),
            });
        }
    }
}
