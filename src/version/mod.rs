//! Version parsing, ordering and grouping

pub mod grouper;

pub use grouper::{VersionGroup, compare_versions, group_versions, latest_version};
