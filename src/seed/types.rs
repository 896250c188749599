//! The seed set value type.

use crate::graph::Node;
use crate::model::NodeCosts;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// A candidate seed set with its provenance.
///
/// Carries three things:
///
/// - the **current members**, replaced in place by the influenced closure
///   when the search loop evaluates the individual;
/// - the **initial members**, captured at construction and never changed;
/// - the **permutation**, the total node ordering the set was derived from,
///   which recombination reads through [`SeedSet::permutation`].
///
/// Equality and hashing look at the current members only. Two seed sets
/// with the same members and different permutations are duplicates, which
/// is what population deduplication relies on.
#[derive(Debug, Clone)]
pub struct SeedSet<N: Node> {
    members: BTreeSet<N>,
    initial: Vec<N>,
    permutation: Vec<N>,
}

impl<N: Node> SeedSet<N> {
    /// Creates a seed set from its members and the ordering that produced it.
    pub fn new(members: impl IntoIterator<Item = N>, permutation: Vec<N>) -> Self {
        let members: BTreeSet<N> = members.into_iter().collect();
        let initial = members.iter().copied().collect();
        Self {
            members,
            initial,
            permutation,
        }
    }

    /// Current members, in ascending order.
    pub fn members(&self) -> &BTreeSet<N> {
        &self.members
    }

    /// Current members as a vector, in ascending order.
    pub fn member_vec(&self) -> Vec<N> {
        self.members.iter().copied().collect()
    }

    /// Members as they were at construction.
    pub fn initial_members(&self) -> &[N] {
        &self.initial
    }

    /// The node ordering this set was derived from.
    pub fn permutation(&self) -> &[N] {
        &self.permutation
    }

    /// Replaces the current members, leaving the initial set and the
    /// permutation untouched.
    pub fn replace_members(&mut self, members: impl IntoIterator<Item = N>) {
        self.members = members.into_iter().collect();
    }

    /// Whether `node` is a current member.
    pub fn contains(&self, node: N) -> bool {
        self.members.contains(&node)
    }

    /// Number of current members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no current members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Summed cost of the current members.
    pub fn cost(&self, costs: &NodeCosts<N>) -> u64 {
        costs.cost_of(&self.members)
    }

    /// Summed cost of the initial members.
    pub fn initial_cost(&self, costs: &NodeCosts<N>) -> u64 {
        costs.cost_of(&self.initial)
    }
}

impl<N: Node> PartialEq for SeedSet<N> {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl<N: Node> Eq for SeedSet<N> {}

impl<N: Node> Hash for SeedSet<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.members.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_permutation() {
        let a = SeedSet::new([3, 1], vec![1, 3, 2, 0]);
        let b = SeedSet::new([1, 3], vec![0, 2, 3, 1]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        assert!(set.insert(a));
        assert!(!set.insert(b));
    }

    #[test]
    fn test_replace_keeps_initial_and_permutation() {
        let mut s = SeedSet::new([2], vec![2, 0, 1]);
        s.replace_members([0, 1, 2]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.initial_members(), &[2]);
        assert_eq!(s.permutation(), &[2, 0, 1]);
        assert_ne!(s, SeedSet::new([2], vec![2, 0, 1]));
    }

    #[test]
    fn test_cost() {
        let costs: NodeCosts<char> = [('a', 10), ('b', 20), ('c', 30)].into_iter().collect();
        let mut s = SeedSet::new(['a', 'c'], vec!['a', 'b', 'c']);
        assert_eq!(s.cost(&costs), 40);
        s.replace_members(['a', 'b', 'c']);
        assert_eq!(s.cost(&costs), 60);
        assert_eq!(s.initial_cost(&costs), 40);
    }
}
