//! Clue ledger: an unbalanced binary search tree of collected clues.
//!
//! Clues are kept in lexicographic order and never duplicated. The tree is not
//! rebalanced, so a sorted insertion sequence degenerates into a list; every walk
//! over it (insert, traversal, release) is iterative for that reason.

use std::cmp::Ordering;

use tracing::{debug, instrument};

/// Owned link to a subtree; `None` is the empty tree.
pub type ClueLink = Option<Box<ClueEntry>>;

/// Node of the ledger.
#[derive(Debug)]
pub struct ClueEntry {
    pub clue: String,
    left: ClueLink,
    right: ClueLink,
}

impl ClueEntry {
    fn new(clue: &str) -> Self {
        Self {
            clue: clue.to_string(),
            left: None,
            right: None,
        }
    }

    pub fn left(&self) -> Option<&ClueEntry> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&ClueEntry> {
        self.right.as_deref()
    }
}

// Post-order release without recursion: children go before their parent.
impl Drop for ClueEntry {
    fn drop(&mut self) {
        let mut stack: Vec<Box<ClueEntry>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());

        while let Some(mut entry) = stack.pop() {
            if entry.left.is_some() || entry.right.is_some() {
                let (left, right) = (entry.left.take(), entry.right.take());
                stack.push(entry);
                stack.extend(right);
                stack.extend(left);
            }
        }
    }
}

/// Insert `clue` below `root`, returning the root to keep and whether the clue was new.
///
/// An equal clue anywhere on the search path stops the insertion and leaves the tree
/// untouched. The returned root always replaces the caller's previous one; it only
/// differs from it when `root` was empty.
pub fn insert(mut root: ClueLink, clue: &str) -> (ClueLink, bool) {
    let was_new = insert_into(&mut root, clue);
    (root, was_new)
}

fn insert_into(mut slot: &mut ClueLink, clue: &str) -> bool {
    while let Some(entry) = slot {
        match clue.cmp(entry.clue.as_str()) {
            Ordering::Less => slot = &mut entry.left,
            Ordering::Greater => slot = &mut entry.right,
            Ordering::Equal => return false,
        }
    }
    *slot = Some(Box::new(ClueEntry::new(clue)));
    true
}

/// Ascending walk over the subtree rooted at `root`.
pub fn in_order(root: Option<&ClueEntry>) -> InOrder<'_> {
    InOrder::new(root)
}

/// Number of distinct clues below `root`.
pub fn count(root: Option<&ClueEntry>) -> usize {
    in_order(root).count()
}

/// Lazy in-order iterator; create a new one to restart.
pub struct InOrder<'a> {
    stack: Vec<&'a ClueEntry>,
}

impl<'a> InOrder<'a> {
    fn new(root: Option<&'a ClueEntry>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a ClueEntry>) {
        while let Some(entry) = node {
            self.stack.push(entry);
            node = entry.left();
        }
    }
}

impl<'a> Iterator for InOrder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.push_left_spine(entry.right());
        Some(entry.clue.as_str())
    }
}

/// Sorted, deduplicated store of the clues collected during one game.
#[derive(Debug, Default)]
pub struct ClueLedger {
    root: ClueLink,
    len: usize,
}

impl ClueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a clue. Returns `false` if it was already in the ledger.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, clue: &str) -> bool {
        let (root, was_new) = insert(self.root.take(), clue);
        self.root = root;
        if was_new {
            self.len += 1;
            debug!(clue, total = self.len, "new clue recorded");
        }
        was_new
    }

    pub fn contains(&self, clue: &str) -> bool {
        let mut node = self.root();
        while let Some(entry) = node {
            node = match clue.cmp(entry.clue.as_str()) {
                Ordering::Less => entry.left(),
                Ordering::Greater => entry.right(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    pub fn iter(&self) -> InOrder<'_> {
        in_order(self.root())
    }

    /// Number of distinct clues; always equals the length of [`ClueLedger::iter`].
    pub fn count(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&ClueEntry> {
        self.root.as_deref()
    }

    /// Release every entry; a no-op on an empty ledger.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a ClueLedger {
    type Item = &'a str;
    type IntoIter = InOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_empty_tree_when_inserting_then_creates_root() {
        let (root, was_new) = insert(None, "knife");
        assert!(was_new);
        assert_eq!(root.as_ref().map(|e| e.clue.as_str()), Some("knife"));
        assert_eq!(count(root.as_deref()), 1);
    }

    #[test]
    fn given_existing_clue_when_inserting_again_then_reports_known() {
        let (root, _) = insert(None, "m");
        let (root, _) = insert(root, "c");
        let (root, _) = insert(root, "x");
        let (root, was_new) = insert(root, "c");
        assert!(!was_new);
        assert_eq!(in_order(root.as_deref()).collect::<Vec<_>>(), ["c", "m", "x"]);
    }

    #[test]
    fn given_non_empty_tree_when_inserting_then_root_is_unchanged() {
        let (root, _) = insert(None, "m");
        let (root, _) = insert(root, "a");
        assert_eq!(root.as_ref().unwrap().clue, "m");
        assert_eq!(root.as_ref().unwrap().left().unwrap().clue, "a");
    }

    #[rstest]
    #[case(&["b", "a", "c"], &["a", "b", "c"])]
    #[case(&["a", "b", "c", "d"], &["a", "b", "c", "d"])]
    #[case(&["d", "c", "b", "a"], &["a", "b", "c", "d"])]
    #[case(&["Zebra", "apple", "Apple"], &["Apple", "Zebra", "apple"])]
    #[case(&["x", "x", "x"], &["x"])]
    fn given_insertions_when_walking_then_sorted_and_unique(
        #[case] inserted: &[&str],
        #[case] expected: &[&str],
    ) {
        let mut ledger = ClueLedger::new();
        for clue in inserted {
            ledger.insert(clue);
        }
        assert_eq!(ledger.iter().collect::<Vec<_>>(), expected);
        assert_eq!(ledger.count(), expected.len());
    }

    #[test]
    fn given_ledger_when_iterating_twice_then_restarts() {
        let mut ledger = ClueLedger::new();
        ledger.insert("b");
        ledger.insert("a");
        let first: Vec<_> = ledger.iter().collect();
        let second: Vec<_> = (&ledger).into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn given_ledger_when_checking_membership_then_finds_only_inserted() {
        let mut ledger = ClueLedger::new();
        ledger.insert("glove");
        ledger.insert("ash");
        assert!(ledger.contains("glove"));
        assert!(ledger.contains("ash"));
        assert!(!ledger.contains("rope"));
    }

    #[test]
    fn given_empty_ledger_when_clearing_then_noop() {
        let mut ledger = ClueLedger::new();
        ledger.clear();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.count(), 0);
        assert_eq!(ledger.iter().next(), None);
    }

    #[test]
    fn given_degenerate_ledger_when_dropping_then_does_not_overflow_stack() {
        let mut ledger = ClueLedger::new();
        for i in 0..10_000 {
            ledger.insert(&format!("{i:08}"));
        }
        assert_eq!(ledger.count(), 10_000);
        assert_eq!(ledger.iter().next(), Some("00000000"));
        ledger.clear();
        assert!(ledger.is_empty());
    }
}
