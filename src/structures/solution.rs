//! A pattern found by a solve, with its objective value.
//!
//! Solutions are ordered by objective value, and then by pattern.

use std::cmp::Ordering;

use crate::structures::cut::Cut;

#[derive(Clone, Debug)]
pub struct Solution {
    markers: Vec<usize>,
    obj_value: f64,
}

impl Solution {
    /// A solution with the given markers, which are sorted.
    pub fn new(mut markers: Vec<usize>, obj_value: f64) -> Self {
        markers.sort_unstable();
        Solution { markers, obj_value }
    }

    pub fn markers(&self) -> &[usize] {
        &self.markers
    }

    pub fn obj_value(&self) -> f64 {
        self.obj_value
    }

    pub fn size(&self) -> usize {
        self.markers.len()
    }

    /// Whether every state of the cut is part of the pattern.
    /// If so, the pattern violates the cut.
    pub fn contains_cut(&self, cut: &Cut) -> bool {
        cut.iter_elements()
            .all(|state| self.markers.binary_search(&state).is_ok())
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Solution {}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.obj_value
            .total_cmp(&other.obj_value)
            .then_with(|| self.markers.cmp(&other.markers))
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let markers = self
            .markers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{markers} ({:.6})", self.obj_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_containment() {
        let solution = Solution::new(vec![4, 1], 0.5);
        assert_eq!(solution.markers(), &[1, 4]);

        assert!(solution.contains_cut(&Cut::from_elements(6, &[1, 4])));
        assert!(!solution.contains_cut(&Cut::from_elements(6, &[1, 2, 4])));
    }

    #[test]
    fn ordered_by_objective() {
        let low = Solution::new(vec![0, 1], 0.25);
        let high = Solution::new(vec![0, 2], 0.5);
        assert!(low < high);
    }
}
