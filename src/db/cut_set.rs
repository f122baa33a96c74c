/*!
A database of cuts.

# Overview

The cut set stores each cut issued during a search, as an antichain.
That is, no stored cut is a subset of any other stored cut.

This is sufficient, as a cut forbids every pattern it contains.
So, if cut A is a subset of cut B every pattern forbidden by A is also forbidden by B, and A is redundant.[^note]

[^note]: Note, the redundant cut is the *smaller* cut, and a superset is kept in place of a subset.
  This differs from the subsumption of clauses, though the reasoning is the same.

Cuts are stored in a [BTreeSet], and so are ordered by [size and content](crate::structures::cut::Cut).
Checks for subsets use this order to short-circuit.
A cut may only be a subset of a cut of greater or equal size, and only contain cuts of lesser or equal size.

# Hoisted markers

When a marker is fixed to zero it can not be part of any pattern, and so may be added to any cut without weakening the cut.
Such markers are kept in every cut, including each cut added later.
Keeping fixed markers in every cut keeps the antichain small, as two cuts which differ only on fixed markers are merged.

# Merging

If the set grows too large, two close cuts may be replaced by their union.
As the union is a superset of both cuts this weakens the constraints of the set, though the patterns which were forbidden by only one of the merged cuts are left to the sparse subproblem of the union.

# Invariants

<div class="warning">
For any two cuts A and B in the set, A is not a subset of B.
</div>

<div class="warning">
Every hoisted marker is contained in every cut of the set.
</div>

```rust
# use csfs::db::cut_set::CutSet;
# use csfs::structures::cut::Cut;
let mut cut_set = CutSet::default();
assert!(cut_set.add(Cut::from_elements(4, &[0, 1])));
assert!(cut_set.add(Cut::from_elements(4, &[0, 1, 2])));
assert!(!cut_set.add(Cut::from_elements(4, &[0, 2])));

assert_eq!(cut_set.num_cuts(), 1);
assert!(!cut_set.exists(&Cut::from_elements(4, &[0, 1, 3])));
```
*/

use std::collections::BTreeSet;

use crate::{misc::log::targets::CUT_SET, structures::cut::Cut};

#[derive(Clone, Debug, Default)]
pub struct CutSet {
    cuts: BTreeSet<Cut>,

    /// Markers kept in every cut.
    markers_in_all_cuts: BTreeSet<usize>,
}

impl CutSet {
    /// Adds `cut` to the set, returning true if the cut was added.
    ///
    /// A cut is not added if it is a subset of some stored cut.
    /// Otherwise, hoisted markers are added to the cut, any stored subsets of the cut are removed, and the cut is stored.
    pub fn add(&mut self, mut cut: Cut) -> bool {
        if self.superset_of(&cut).is_some() {
            log::trace!(target: CUT_SET, "Skipped {cut}");
            return false;
        }

        for marker in &self.markers_in_all_cuts {
            cut.add(*marker);
        }

        let subsets = self
            .cuts
            .iter()
            .take_while(|stored| stored.size() < cut.size())
            .filter(|stored| stored.is_subset_of(&cut))
            .cloned()
            .collect::<Vec<_>>();

        for subset in subsets {
            log::trace!(target: CUT_SET, "Removed {subset}, contained in {cut}");
            self.cuts.remove(&subset);
        }

        log::trace!(target: CUT_SET, "Added {cut}");
        self.cuts.insert(cut);
        true
    }

    /// Some stored cut which contains `cut`, if one exists.
    fn superset_of(&self, cut: &Cut) -> Option<&Cut> {
        self.cuts
            .iter()
            .rev()
            .take_while(|stored| stored.size() >= cut.size())
            .find(|stored| cut.is_subset_of(stored))
    }

    /// Whether some stored cut contains `cut`.
    pub fn exists(&self, cut: &Cut) -> bool {
        self.superset_of(cut).is_some()
    }

    /// Whether some stored cut contains each of the given markers.
    pub fn exists_elements(&self, markers: &[usize]) -> bool {
        self.cuts
            .iter()
            .rev()
            .take_while(|stored| stored.size() >= markers.len())
            .any(|stored| markers.iter().all(|marker| stored.contains(*marker)))
    }

    /// Keeps `marker` in every cut, now and later, returning true if the marker was not already kept.
    ///
    /// Stored cuts without the marker are taken out of the set, extended, and added again.
    pub fn keep_marker_in_all_cuts(&mut self, marker: usize) -> bool {
        if !self.markers_in_all_cuts.insert(marker) {
            return false;
        }

        let lacking = self
            .cuts
            .iter()
            .filter(|cut| !cut.contains(marker))
            .cloned()
            .collect::<Vec<_>>();

        for cut in &lacking {
            self.cuts.remove(cut);
        }

        log::trace!(target: CUT_SET, "Keeping {marker} in all cuts, extending {} cuts", lacking.len());

        for mut cut in lacking {
            cut.add(marker);
            self.add(cut);
        }

        true
    }

    pub fn markers_kept_in_all_cuts(&self) -> &BTreeSet<usize> {
        &self.markers_in_all_cuts
    }

    pub fn num_cuts(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// The size of the largest stored cut, or zero if no cut is stored.
    pub fn max_size(&self) -> usize {
        self.cuts.last().map_or(0, Cut::size)
    }

    /// An iterator over stored cuts, from smallest to largest.
    pub fn iter(&self) -> impl Iterator<Item = &Cut> {
        self.cuts.iter()
    }

    /// The greatest count of states shared by `cut` and some stored cut.
    pub fn greatest_cardinality_of_intersection(&self, cut: &Cut) -> usize {
        self.cuts
            .iter()
            .map(|stored| stored.cardinality_of_intersection(cut))
            .max()
            .unwrap_or(0)
    }

    /// The union of the two closest cuts of the set, if the set contains at least two cuts.
    ///
    /// Closeness is Hamming distance, with ties broken by difference in size and then by order in the set.
    pub fn merged_cut_of_closest_pair(&self) -> Option<Cut> {
        let cuts = self.cuts.iter().collect::<Vec<_>>();
        let mut closest: Option<(usize, usize, &Cut, &Cut)> = None;

        for (index, first) in cuts.iter().enumerate() {
            for second in cuts.iter().skip(index + 1) {
                closest = closer_pair(closest, first, second);
            }
        }

        closest.map(|(_, _, first, second)| first.union(second))
    }

    /// The union of some smallest cut of the set and the cut closest to it, if the set contains at least two cuts.
    ///
    /// Closeness is as for [merged_cut_of_closest_pair](CutSet::merged_cut_of_closest_pair).
    pub fn merged_cut_containing_smallest(&self) -> Option<Cut> {
        let smallest_size = self.cuts.first()?.size();
        let mut closest: Option<(usize, usize, &Cut, &Cut)> = None;

        for smallest in self.cuts.iter().take_while(|cut| cut.size() == smallest_size) {
            for other in self.cuts.iter().filter(|other| *other != smallest) {
                closest = closer_pair(closest, smallest, other);
            }
        }

        closest.map(|(_, _, first, second)| first.union(second))
    }

    /// The cuts of the set as a matrix of 0s and 1s, a row for each cut.
    pub fn matrix_string(&self) -> String {
        self.cuts
            .iter()
            .map(|cut| cut.binary_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The closer of the current pair and the pair (first, second), keeping the current pair on ties.
/// Pairs at distance zero are never chosen.
fn closer_pair<'c>(
    current: Option<(usize, usize, &'c Cut, &'c Cut)>,
    first: &'c Cut,
    second: &'c Cut,
) -> Option<(usize, usize, &'c Cut, &'c Cut)> {
    let distance = first.distance(second);
    if distance == 0 {
        return current;
    }
    let size_difference = first.size().abs_diff(second.size());

    match current {
        Some((best_distance, best_difference, _, _))
            if (best_distance, best_difference) <= (distance, size_difference) =>
        {
            current
        }
        _ => Some((distance, size_difference, first, second)),
    }
}
