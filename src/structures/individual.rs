/*!
An individual, together with a bound on the marker states it may still contribute to a pattern.

The count of remaining markers of an individual is the count of states carried by the individual which are not fixed to zero.
If this count falls below the pattern size the individual cannot carry any pattern, and so may be fixed to zero.
*/

use std::cmp::Ordering;

use crate::structures::domain::{Domain, Group};

#[derive(Clone, Debug)]
pub struct Individual {
    id: usize,
    group: Group,
    domain: Domain,
    num_remaining_markers: usize,
}

impl Individual {
    pub fn new(id: usize, group: Group, num_remaining_markers: usize) -> Self {
        Individual {
            id,
            group,
            domain: Domain::Free,
            num_remaining_markers,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_zero(&self) -> bool {
        self.domain.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.domain.is_one()
    }

    pub fn is_set(&self) -> bool {
        self.domain.is_set()
    }

    /// Fixes the individual, returning true if the individual was free.
    pub fn set(&mut self, value: bool) -> bool {
        self.domain.fix(value)
    }

    pub fn num_remaining_markers(&self) -> usize {
        self.num_remaining_markers
    }

    pub fn decrement_remaining_markers(&mut self) {
        assert!(
            self.num_remaining_markers > 0,
            "Remaining markers of individual {} below zero",
            self.id
        );
        self.num_remaining_markers -= 1;
    }
}

/// Orders by count of remaining markers, and then by id.
pub fn by_remaining_markers(a: &Individual, b: &Individual) -> Ordering {
    a.num_remaining_markers
        .cmp(&b.num_remaining_markers)
        .then(a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orderings() {
        let a = Individual::new(0, Group::One, 3);
        let b = Individual::new(1, Group::Two, 2);
        let c = Individual::new(2, Group::One, 2);

        assert_eq!(by_remaining_markers(&a, &b), Ordering::Greater);
        assert_eq!(by_remaining_markers(&b, &c), Ordering::Less);
    }
}
