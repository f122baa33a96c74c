/*!
An indicator set over marker states.

A cut over the states S forbids any pattern which is entirely contained in S.
Or, written as a constraint over pattern size *k*:

```text
  Σ_{s ∈ S} m(s) ≤ k - 1
```

Cuts are fixed length vectors of booleans, one for each state, together with a count of the states in the cut.
The count is kept with each mutation, so size queries are constant time.

# Ordering

Cuts are ordered first by size and then lexicographically by content, with `false < true`.
As such, iterating over an ordered collection of cuts visits smaller cuts first.

```rust
# use csfs::structures::cut::Cut;
let small = Cut::from_elements(4, &[3]);
let large = Cut::from_elements(4, &[0, 1]);
assert!(small < large);

let a = Cut::from_elements(4, &[0, 3]);
let b = Cut::from_elements(4, &[1, 2]);
assert!(b < a);
```

# Contract

Indices outside the length of a cut, and comparisons of cuts with different lengths, are bugs and panic.
*/

use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cut {
    states: Vec<bool>,
    size: usize,
}

impl Cut {
    /// An empty cut over `length` states.
    pub fn new(length: usize) -> Self {
        Cut {
            states: vec![false; length],
            size: 0,
        }
    }

    /// A cut over `length` states containing each of the given elements.
    pub fn from_elements(length: usize, elements: &[usize]) -> Self {
        let mut cut = Cut::new(length);
        for element in elements {
            cut.add(*element);
        }
        cut
    }

    /// A cut from an indicator vector.
    pub fn from_indicators(states: Vec<bool>) -> Self {
        let size = states.iter().filter(|state| **state).count();
        Cut { states, size }
    }

    /// Adds `state` to the cut, returning true if the cut did not already contain `state`.
    pub fn add(&mut self, state: usize) -> bool {
        if self.states[state] {
            false
        } else {
            self.states[state] = true;
            self.size += 1;
            true
        }
    }

    /// Removes `state` from the cut, returning true if the cut contained `state`.
    pub fn remove(&mut self, state: usize) -> bool {
        if self.states[state] {
            self.states[state] = false;
            self.size -= 1;
            true
        } else {
            false
        }
    }

    /// Sets membership of `state`, returning true if membership changed.
    pub fn set(&mut self, state: usize, value: bool) -> bool {
        match value {
            true => self.add(state),
            false => self.remove(state),
        }
    }

    pub fn clear(&mut self) {
        self.states.iter_mut().for_each(|state| *state = false);
        self.size = 0;
    }

    pub fn contains(&self, state: usize) -> bool {
        self.states[state]
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The count of states in the cut.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The count of states the cut ranges over, in or out of the cut.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// The Hamming distance between two cuts.
    pub fn distance(&self, other: &Cut) -> usize {
        assert_eq!(self.len(), other.len(), "Distance between cuts of different lengths");
        self.states
            .iter()
            .zip(other.states.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// The count of states in both cuts.
    pub fn cardinality_of_intersection(&self, other: &Cut) -> usize {
        assert_eq!(self.len(), other.len(), "Intersection of cuts of different lengths");
        let (smaller, larger) = match self.size <= other.size {
            true => (self, other),
            false => (other, self),
        };
        smaller.iter_elements().filter(|state| larger.states[*state]).count()
    }

    /// Whether every state of the cut is a state of `other`.
    pub fn is_subset_of(&self, other: &Cut) -> bool {
        assert_eq!(self.len(), other.len(), "Subset check of cuts of different lengths");
        self.size <= other.size
            && self
                .states
                .iter()
                .zip(other.states.iter())
                .all(|(mine, theirs)| !mine || *theirs)
    }

    /// A fresh cut containing the states of both cuts.
    pub fn union(&self, other: &Cut) -> Cut {
        assert_eq!(self.len(), other.len(), "Union of cuts of different lengths");
        Cut::from_indicators(
            self.states
                .iter()
                .zip(other.states.iter())
                .map(|(a, b)| *a || *b)
                .collect(),
        )
    }

    /// An iterator over the states of the cut, in ascending order.
    pub fn iter_elements(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter_map(|(state, present)| present.then_some(state))
    }

    /// The states of the cut, in ascending order.
    pub fn true_elements(&self) -> Vec<usize> {
        self.iter_elements().collect()
    }

    /// The states of the cut as a space separated string.
    pub fn marker_number_string(&self) -> String {
        self.iter_elements()
            .map(|state| state.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The indicator vector of the cut as a string of 0s and 1s.
    pub fn binary_string(&self) -> String {
        self.states
            .iter()
            .map(|state| if *state { '1' } else { '0' })
            .collect()
    }
}

impl PartialOrd for Cut {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cut {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert_eq!(self.len(), other.len());
        self.size
            .cmp(&other.size)
            .then_with(|| self.states.cmp(&other.states))
    }
}

impl std::fmt::Display for Cut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.marker_number_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_tracks_mutation() {
        let mut cut = Cut::new(6);
        assert!(cut.add(2));
        assert!(!cut.add(2));
        assert!(cut.set(4, true));
        assert_eq!(cut.size(), 2);

        assert!(cut.remove(2));
        assert!(!cut.remove(2));
        assert!(!cut.set(4, true));
        assert_eq!(cut.size(), 1);

        cut.clear();
        assert!(cut.is_empty());
    }

    #[test]
    fn distance_and_merge() {
        let a = Cut::from_elements(6, &[1, 3, 5]);
        let b = Cut::from_elements(6, &[2, 3, 5]);

        assert_eq!(a.distance(&b), 2);
        assert_eq!(a.union(&b).true_elements(), vec![1, 2, 3, 5]);
        assert_eq!(a.cardinality_of_intersection(&b), 2);
    }

    #[test]
    fn subsets() {
        let small = Cut::from_elements(5, &[0, 1]);
        let large = Cut::from_elements(5, &[0, 1, 2]);

        assert!(small.is_subset_of(&large));
        assert!(small.is_subset_of(&small));
        assert!(!large.is_subset_of(&small));
    }

    #[test]
    fn strings() {
        let cut = Cut::from_elements(4, &[0, 2]);
        assert_eq!(cut.marker_number_string(), "0 2");
        assert_eq!(cut.binary_string(), "1010");
        assert_eq!(format!("{cut}"), "{0 2}");
    }

    #[test]
    #[should_panic]
    fn out_of_range() {
        let mut cut = Cut::new(3);
        cut.add(3);
    }
}
