/*!
Equalities between individuals.

A partition of (some) individuals into disjoint sets, where each individual in a set must take the same value as every other individual in the set.
Individuals which do not appear in any set are related only to themselves.

Sets are few and small, so the partition is kept as a list of sets and each query is a linear scan.

```rust
# use csfs::db::equalities::VariableEqualities;
let mut equalities = VariableEqualities::default();
assert!(equalities.add(2, 5));
assert!(equalities.add(5, 9));
assert!(!equalities.add(9, 2));

assert!(equalities.exists_pair(2, 9));
assert!(!equalities.exists_pair(2, 3));
```
*/

use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableEqualities {
    sets: Vec<BTreeSet<usize>>,
}

impl VariableEqualities {
    /// Relates `x` and `y`, returning true if the two were not already related.
    pub fn add(&mut self, x: usize, y: usize) -> bool {
        if x == y {
            return false;
        }

        let x_index = self.position(x);
        let y_index = self.position(y);

        match (x_index, y_index) {
            (Some(x_index), Some(y_index)) if x_index == y_index => false,

            (None, None) => {
                self.sets.push(BTreeSet::from([x, y]));
                true
            }

            (Some(index), None) => {
                self.sets[index].insert(y);
                true
            }

            (None, Some(index)) => {
                self.sets[index].insert(x);
                true
            }

            (Some(x_index), Some(y_index)) => {
                let (keep, take) = (x_index.min(y_index), x_index.max(y_index));
                let taken = self.sets.swap_remove(take);
                self.sets[keep].extend(taken);
                true
            }
        }
    }

    fn position(&self, x: usize) -> Option<usize> {
        self.sets.iter().position(|set| set.contains(&x))
    }

    /// Whether `x` is related to some other individual.
    pub fn exists(&self, x: usize) -> bool {
        self.position(x).is_some()
    }

    /// Whether `x` and `y` are related.
    pub fn exists_pair(&self, x: usize, y: usize) -> bool {
        x == y || self.sets.iter().any(|set| set.contains(&x) && set.contains(&y))
    }

    /// The set containing `x`, if `x` is related to some other individual.
    pub fn class_of(&self, x: usize) -> Option<&BTreeSet<usize>> {
        self.sets.iter().find(|set| set.contains(&x))
    }

    /// Relates every pair related in `other`.
    pub fn merge(&mut self, other: &VariableEqualities) {
        for (x, y) in other.pairs() {
            self.add(x, y);
        }
    }

    /// Pairs of the least member of each set and each other member of the set.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::default();
        for set in &self.sets {
            let mut members = set.iter();
            if let Some(least) = members.next() {
                pairs.extend(members.map(|member| (*least, *member)));
            }
        }
        pairs
    }

    pub fn sets(&self) -> &[BTreeSet<usize>] {
        &self.sets
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The equalities as a string, with each set written as a chain `i(a) = i(b) = ...`.
    pub fn equalities_string(&self) -> String {
        self.sets
            .iter()
            .map(|set| {
                set.iter()
                    .map(|individual| format!("i({individual})"))
                    .collect::<Vec<_>>()
                    .join(" = ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_sets() {
        let mut equalities = VariableEqualities::default();
        assert!(equalities.add(0, 1));
        assert!(equalities.add(2, 3));
        assert_eq!(equalities.sets().len(), 2);

        assert!(equalities.add(3, 0));
        assert_eq!(equalities.sets().len(), 1);
        assert!(equalities.exists_pair(1, 2));
    }

    #[test]
    fn self_relation() {
        let mut equalities = VariableEqualities::default();
        assert!(!equalities.add(4, 4));
        assert!(equalities.is_empty());
        assert!(!equalities.exists(4));
        assert!(equalities.exists_pair(4, 4));
    }

    #[test]
    fn replay() {
        let mut a = VariableEqualities::default();
        a.add(1, 2);
        a.add(2, 7);

        let mut b = VariableEqualities::default();
        b.add(7, 8);
        b.merge(&a);

        assert_eq!(b.class_of(8), Some(&BTreeSet::from([1, 2, 7, 8])));
        assert_eq!(a.pairs(), vec![(1, 2), (1, 7)]);
        assert_eq!(a.equalities_string(), "i(1) = i(2) = i(7)");
    }
}
