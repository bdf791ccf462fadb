//! Version grouping and ordering across heterogeneous version schemes
//!
//! Registries report semantic versions, date-based versions, single
//! integers and free-form tags. Everything here is a total order with
//! documented fallbacks so that malformed input can never fail a search:
//!
//! - A version is split into a leading run of dot-separated numeric
//!   components plus a verbatim suffix (`"1.2.3-rc1"` -> `[1, 2, 3]`,
//!   `"-rc1"`). One leading `v`/`V` is stripped when a digit follows.
//! - Versions compare by numeric components first, then suffix
//!   lexicographically, then the longer (more specific) raw string wins.
//!   A version with no numeric prefix has an empty component list and so
//!   orders before numeric versions; among themselves such versions
//!   compare as plain strings.
//! - Groups are keyed by the raw `major.minor` prefix when one exists
//!   (sliced from the string, so `2021.04` keeps its zero padding),
//!   otherwise the whole raw string is its own key.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Versions sharing one major.minor key, members ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionGroup {
    /// `major.minor`, or the raw version string when it has no such prefix
    pub key: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedVersion<'a> {
    raw: &'a str,
    nums: Vec<u64>,
    suffix: &'a str,
}

impl<'a> ParsedVersion<'a> {
    fn parse(raw: &'a str) -> Self {
        let body = strip_v_prefix(raw);

        let mut nums = Vec::new();
        let mut consumed = 0;
        for part in body.split('.') {
            match part.parse::<u64>() {
                // Overflowing or non-numeric parts end the numeric prefix
                // and fall through to the lexicographic suffix rule.
                Ok(n) if !part.is_empty() => {
                    nums.push(n);
                    consumed += part.len() + 1;
                }
                _ => {
                    // "3-rc1": keep the digit run, push the rest into the suffix
                    let digits: usize = part.chars().take_while(|c| c.is_ascii_digit()).count();
                    if digits > 0 && digits < part.len() {
                        if let Ok(n) = part[..digits].parse::<u64>() {
                            nums.push(n);
                            consumed += digits;
                        }
                    }
                    break;
                }
            }
        }

        let suffix = &body[consumed.min(body.len())..];
        Self { raw, nums, suffix }
    }

    /// Group key: the raw `major.minor` prefix when present, else the raw
    /// string. Slicing the raw text (rather than re-formatting parsed
    /// numbers) keeps zero-padded schemes intact: `2021.04` stays `2021.04`.
    fn group_key(&self) -> String {
        static MAJOR_MINOR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^\d+\.\d+").expect("major.minor pattern is valid"));

        match MAJOR_MINOR.find(strip_v_prefix(self.raw)) {
            Some(m) => m.as_str().to_string(),
            None => self.raw.to_string(),
        }
    }
}

impl Ord for ParsedVersion<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nums
            .cmp(&other.nums)
            .then_with(|| self.suffix.cmp(other.suffix))
            .then_with(|| self.raw.len().cmp(&other.raw.len()))
            .then_with(|| self.raw.cmp(other.raw))
    }
}

impl PartialOrd for ParsedVersion<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn strip_v_prefix(raw: &str) -> &str {
    match raw.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => raw,
    }
}

/// Compares two raw version strings under the grouper's total order
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    ParsedVersion::parse(a).cmp(&ParsedVersion::parse(b))
}

/// Partitions versions into major.minor groups, ascending by key
///
/// Every input version lands in exactly one group; duplicates within a
/// group are collapsed. Grouping an already-grouped set again yields the
/// same groups.
pub fn group_versions(versions: &[String]) -> Vec<VersionGroup> {
    let mut parsed: Vec<ParsedVersion> = versions.iter().map(|v| ParsedVersion::parse(v)).collect();
    parsed.sort();

    let mut groups: Vec<(ParsedVersion, VersionGroup)> = Vec::new();
    for version in parsed {
        let key = version.group_key();
        if let Some(idx) = groups.iter().position(|(_, g)| g.key == key) {
            let group = &mut groups[idx].1;
            if !group.versions.iter().any(|v| v == version.raw) {
                group.versions.push(version.raw.to_string());
            }
        } else {
            let members = vec![version.raw.to_string()];
            groups.push((
                version,
                VersionGroup {
                    key,
                    versions: members,
                },
            ));
        }
    }

    // Group order follows the order of each group's first (smallest) member,
    // which sorts two-component keys numerically and everything else by the
    // same fallback rules as full versions.
    groups.sort_by(|(a, _), (b, _)| a.cmp(b));
    groups.into_iter().map(|(_, g)| g).collect()
}

/// Greatest version under the total order, `None` for an empty set
pub fn latest_version(versions: &[String]) -> Option<String> {
    versions
        .iter()
        .max_by(|a, b| compare_versions(a, b))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn owned(versions: &[&str]) -> Vec<String> {
        versions.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn groups_by_major_minor_ascending() {
        let versions = owned(&["0.10.1", "0.11.2", "0.11.3", "0.12.1"]);
        let groups = group_versions(&versions);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["0.10", "0.11", "0.12"]);
        assert_eq!(groups[1].versions, vec!["0.11.2", "0.11.3"]);
        assert_eq!(latest_version(&versions), Some("0.12.1".to_string()));
    }

    #[test]
    fn single_component_versions_form_their_own_groups() {
        let versions = owned(&["1", "2", "10"]);
        let groups = group_versions(&versions);

        assert_eq!(groups.len(), 3);
        // Numeric, not lexicographic: 10 beats 2
        assert_eq!(latest_version(&versions), Some("10".to_string()));
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "10"]);
    }

    #[test]
    fn grouping_partitions_the_input_exactly() {
        let versions = owned(&["1.2.3", "1.2.4", "2.0", "banana", "v3.1.0", "2021.04"]);
        let groups = group_versions(&versions);

        let mut members: Vec<String> = groups.iter().flat_map(|g| g.versions.clone()).collect();
        members.sort();
        let mut input = versions.clone();
        input.sort();
        assert_eq!(members, input);
    }

    #[test]
    fn grouping_is_idempotent() {
        let versions = owned(&["0.9", "0.9.1", "1.0.0", "1.0.0-rc1", "5"]);
        let groups = group_versions(&versions);
        let flattened: Vec<String> = groups.iter().flat_map(|g| g.versions.clone()).collect();

        assert_eq!(group_versions(&flattened), groups);
    }

    #[test]
    fn v_prefix_joins_the_numeric_group() {
        let versions = owned(&["v1.2.0", "1.2.1"]);
        let groups = group_versions(&versions);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "1.2");
    }

    #[rstest]
    #[case("1.2.3", "1.2.4", Ordering::Less)]
    #[case("1.10.0", "1.9.0", Ordering::Greater)] // numeric, not lexicographic
    #[case("10", "2", Ordering::Greater)]
    #[case("1.2.3", "1.2.3", Ordering::Equal)]
    #[case("1.2.3-rc1", "1.2.3-rc2", Ordering::Less)] // same prefix, suffix lex
    #[case("1.2.3", "1.2.3-rc1", Ordering::Less)] // empty suffix sorts first
    #[case("v2.0", "1.9", Ordering::Greater)]
    #[case("alpha", "beta", Ordering::Less)] // no numeric prefix, plain lex
    #[case("beta", "1.0", Ordering::Less)] // unparsed orders before numeric
    fn comparison_cases(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare_versions(a, b), expected);
    }

    #[rstest]
    #[case("")]
    #[case("....")]
    #[case("v")]
    #[case("🦀.1.2")]
    #[case("99999999999999999999999999.1")] // u64 overflow
    #[case("1.2.3.4.5.6.7.8.9.10.11.12.13.14.15.16.17.18.19.20")]
    fn malformed_versions_never_panic(#[case] raw: &str) {
        let versions = vec![raw.to_string(), "1.0".to_string()];
        let groups = group_versions(&versions);

        let total: usize = groups.iter().map(|g| g.versions.len()).sum();
        assert_eq!(total, 2);
        assert!(latest_version(&versions).is_some());
    }

    #[test]
    fn duplicate_versions_collapse_within_a_group() {
        let versions = owned(&["1.2.0", "1.2.0", "1.2.1"]);
        let groups = group_versions(&versions);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].versions, vec!["1.2.0", "1.2.1"]);
    }

    #[test]
    fn date_based_versions_group_by_year_month() {
        let versions = owned(&["2021.04", "2021.05", "2022.01.1"]);
        let groups = group_versions(&versions);

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["2021.04", "2021.05", "2022.01"]);
        assert_eq!(latest_version(&versions), Some("2022.01.1".to_string()));
    }

    #[test]
    fn zero_padded_keys_keep_their_padding() {
        // The key is sliced from the raw string, not rebuilt from parsed
        // numbers, so calendar-style versions stay recognizable.
        let versions = owned(&["2021.04", "2021.04.2"]);
        let groups = group_versions(&versions);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "2021.04");
        assert_eq!(groups[0].versions, vec!["2021.04", "2021.04.2"]);
    }

    #[test]
    fn prerelease_suffix_does_not_leak_into_the_key() {
        let versions = owned(&["1.2-rc1", "1.2.0"]);
        let groups = group_versions(&versions);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "1.2");
    }
}
