//! Derive an implementation id from a report's path.
//!
//! Toolchain reports carry no explicit identity, so the id is inferred from
//! the directory layout. Trees that do not follow the assumed layout can
//! make two implementations collide on one id.

use crate::utils::config::IdentityConfig;
use log::{debug, warn};
use std::path::{Component, Path};

/// Id used when nothing in the path can name the implementation
pub const UNKNOWN_ID: &str = "unknown";

/// Resolve the implementation id for a report path
///
/// **Public** - main entry point for identity inference
///
/// # Algorithm
/// 1. For each marker in priority order, find the first path component
///    containing it; the component just before it is the id.
/// 2. Otherwise use the ancestor at `fallback_parent_index` in the
///    report's parent chain.
/// 3. For paths too shallow for step 2, use the file stem.
///
/// # Example
/// ```ignore
/// let id = resolve_implementation_id(
///     Path::new("HLS/perf_opt1/proj_peakPicker/solution1/impl/report/verilog/export_impl.rpt"),
///     &IdentityConfig::default(),
/// );
/// assert_eq!(id, "perf_opt1");
/// ```
pub fn resolve_implementation_id(path: &Path, config: &IdentityConfig) -> String {
    if let Some(id) = id_from_markers(path, &config.markers) {
        debug!("Resolved {} -> {} (marker)", path.display(), id);
        return id;
    }

    if let Some(id) = id_from_ancestor(path, config.fallback_parent_index) {
        debug!("Resolved {} -> {} (ancestor)", path.display(), id);
        return id;
    }

    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_ID.to_string());

    warn!(
        "Report path {} is too shallow to infer an implementation, using '{}'",
        path.display(),
        fallback
    );
    fallback
}

/// Step 1: component preceding the first marker match
fn id_from_markers(path: &Path, markers: &[String]) -> Option<String> {
    let components: Vec<Component<'_>> = path.components().collect();

    for marker in markers {
        for (i, component) in components.iter().enumerate() {
            if i == 0 || !component_name(component).is_some_and(|n| n.contains(marker.as_str())) {
                continue;
            }

            // A marker right under the filesystem root has no usable predecessor
            if let Some(prev) = component_name(&components[i - 1]) {
                return Some(prev);
            }
        }
    }

    None
}

/// Step 2: fixed ancestor in the parent chain
fn id_from_ancestor(path: &Path, index: usize) -> Option<String> {
    path.ancestors()
        .skip(1)
        .nth(index)
        .and_then(|ancestor| ancestor.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

fn component_name(component: &Component<'_>) -> Option<String> {
    match component {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}
