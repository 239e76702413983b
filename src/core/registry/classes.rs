//! Digest-keyed equivalence classes.

use super::DuplicateGroup;
use crate::core::hasher::Digest;
use std::collections::HashMap;
use std::path::PathBuf;

/// Files sharing one digest, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    pub digest: Digest,
    pub members: Vec<PathBuf>,
}

impl EquivalenceClass {
    /// A class is worth reporting once it has two or more members
    pub fn is_interesting(&self) -> bool {
        self.members.len() >= 2
    }
}

/// Mapping from digest to the files that produced it.
///
/// Classes are stored in a vector in first-seen order, with a digest index
/// on the side, so iteration is deterministic for a given discovery order.
#[derive(Debug, Default)]
pub struct Registry {
    index: HashMap<Digest, usize>,
    classes: Vec<EquivalenceClass>,
    total_files: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `path` to the class for `digest`, creating the class if needed
    pub fn record(&mut self, digest: Digest, path: PathBuf) {
        let slot = match self.index.get(&digest) {
            Some(&slot) => slot,
            None => {
                self.classes.push(EquivalenceClass {
                    digest,
                    members: Vec::new(),
                });
                let slot = self.classes.len() - 1;
                self.index.insert(digest, slot);
                slot
            }
        };

        self.classes[slot].members.push(path);
        self.total_files += 1;
    }

    /// Every class with two or more members, in class-discovery order
    pub fn snapshot_interesting(&self) -> Vec<DuplicateGroup> {
        self.classes
            .iter()
            .filter(|class| class.is_interesting())
            .map(|class| DuplicateGroup {
                digest: class.digest.to_hex(),
                paths: class.members.clone(),
            })
            .collect()
    }

    /// The interesting classes as feed lines: a header per group, then its paths
    pub fn render_interesting(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for group in self.snapshot_interesting() {
            lines.push(group.header());
            lines.extend(group.paths.iter().map(|p| p.display().to_string()));
        }
        lines
    }

    /// Look up the class for one digest
    pub fn class(&self, digest: &Digest) -> Option<&EquivalenceClass> {
        self.index.get(digest).map(|&slot| &self.classes[slot])
    }

    /// Number of distinct digests recorded
    pub fn distinct_digests(&self) -> usize {
        self.classes.len()
    }

    /// Number of paths recorded across all classes
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Forget every class (start of a new scan)
    pub fn clear(&mut self) {
        self.index.clear();
        self.classes.clear();
        self.total_files = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::DIGEST_LEN;

    fn digest(byte: u8) -> Digest {
        Digest::from_bytes([byte; DIGEST_LEN])
    }

    #[test]
    fn single_members_are_not_interesting() {
        let mut registry = Registry::new();
        registry.record(digest(1), PathBuf::from("a.txt"));
        registry.record(digest(2), PathBuf::from("b.txt"));

        assert!(registry.snapshot_interesting().is_empty());
        assert!(registry.render_interesting().is_empty());
        assert_eq!(registry.distinct_digests(), 2);
    }

    #[test]
    fn members_keep_discovery_order() {
        let mut registry = Registry::new();
        registry.record(digest(1), PathBuf::from("z.txt"));
        registry.record(digest(1), PathBuf::from("a.txt"));
        registry.record(digest(1), PathBuf::from("m.txt"));

        let groups = registry.snapshot_interesting();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups[0].paths,
            vec![
                PathBuf::from("z.txt"),
                PathBuf::from("a.txt"),
                PathBuf::from("m.txt"),
            ]
        );
    }

    #[test]
    fn classes_keep_first_seen_order() {
        let mut registry = Registry::new();
        registry.record(digest(9), PathBuf::from("late-1"));
        registry.record(digest(3), PathBuf::from("early-1"));
        registry.record(digest(3), PathBuf::from("early-2"));
        registry.record(digest(9), PathBuf::from("late-2"));

        let groups = registry.snapshot_interesting();
        assert_eq!(groups[0].digest, digest(9).to_hex());
        assert_eq!(groups[1].digest, digest(3).to_hex());
    }

    #[test]
    fn total_files_matches_recorded_paths() {
        let mut registry = Registry::new();
        registry.record(digest(1), PathBuf::from("a"));
        registry.record(digest(1), PathBuf::from("b"));
        registry.record(digest(2), PathBuf::from("c"));

        let across_classes: usize = [digest(1), digest(2)]
            .iter()
            .filter_map(|d| registry.class(d))
            .map(|class| class.members.len())
            .sum();
        assert_eq!(registry.total_files(), 3);
        assert_eq!(across_classes, 3);
    }

    #[test]
    fn render_lists_header_then_paths() {
        let mut registry = Registry::new();
        registry.record(digest(1), PathBuf::from("a.txt"));
        registry.record(digest(2), PathBuf::from("c.txt"));
        registry.record(digest(1), PathBuf::from("b.txt"));

        let lines = registry.render_interesting();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("2 files have identical content"));
        assert_eq!(lines[1], "a.txt");
        assert_eq!(lines[2], "b.txt");
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = Registry::new();
        registry.record(digest(1), PathBuf::from("a"));
        registry.record(digest(1), PathBuf::from("b"));

        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.total_files(), 0);
        assert!(registry.class(&digest(1)).is_none());
    }
}
