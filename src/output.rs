//! Console rendering of search results

use indexmap::IndexMap;

use crate::search::aggregator::SearchResult;
use crate::search::types::{PackageInfo, ThreadingSupport};
use crate::version::grouper::VersionGroup;

/// Renders the whole result mapping for human consumption
pub fn render_results(results: &IndexMap<String, SearchResult>) -> String {
    let mut out = String::new();
    for (name, result) in results {
        if result.found() {
            out.push_str(&format!(
                "\nFound '{}' in {} registr{}:\n",
                name,
                result.infos.len(),
                if result.infos.len() == 1 { "y" } else { "ies" }
            ));
            for info in &result.infos {
                out.push_str(&render_package(info));
            }
        } else if result.checked_everywhere() {
            out.push_str(&format!("\n'{name}' was not found in any registry.\n"));
        } else {
            out.push_str(&format!(
                "\n'{name}' was not found, but {} registr{} could not be checked:\n",
                result.errors.len(),
                if result.errors.len() == 1 {
                    "y"
                } else {
                    "ies"
                }
            ));
        }
        for err in &result.errors {
            out.push_str(&format!("  ! {err}\n"));
        }
    }
    out
}

fn render_package(info: &PackageInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n[{}] {}\n", info.repository, info.name));
    if !info.url.is_empty() {
        out.push_str(&format!("  URL: {}\n", info.url));
    }
    if info.description.is_empty() {
        out.push_str("  Description: No description available\n");
    } else {
        out.push_str(&format!("  Description: {}\n", info.description));
    }
    out.push_str(&format!("  Latest version: {}\n", info.latest_version));
    out.push_str(&format!(
        "  Version counts: {} major.minor, {} total\n",
        info.version_groups.len(),
        info.versions.len()
    ));
    out.push_str(&format!(
        "  Versions by major.minor: {}\n",
        format_version_groups(&info.version_groups)
    ));
    out.push_str(&format!("  License: {}\n", info.license));
    match info.threading {
        ThreadingSupport::Explicit => {
            out.push_str("  Threading: supported\n");
            if !info.threading_flags.is_empty() {
                out.push_str(&format!(
                    "  Thread flags: {}\n",
                    info.threading_flags.join(", ")
                ));
            }
        }
        ThreadingSupport::NotDetected => {
            out.push_str("  Threading: no explicit support found\n");
        }
        ThreadingSupport::Unknown => {
            out.push_str("  Threading: unknown\n");
        }
    }
    out
}

/// Compact one-line form: lone versions stay bare, groups with several
/// members are braced
fn format_version_groups(groups: &[VersionGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            if group.versions.len() == 1 && group.versions[0] == group.key {
                group.key.clone()
            } else {
                format!("{{{}}}", group.versions.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
