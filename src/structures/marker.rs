//! A marker state, together with counts of the individuals in each group which carry the state and may still carry a pattern.

use crate::structures::domain::{Domain, Group};

#[derive(Clone, Debug)]
pub struct Marker {
    id: usize,

    /// The count of group one individuals carrying the state which are not fixed to zero.
    num_grp_one_carrying: usize,

    /// The count of group two individuals carrying the state which are not fixed to zero.
    num_grp_two_carrying: usize,

    domain: Domain,
}

impl Marker {
    pub fn new(id: usize, num_grp_one_carrying: usize, num_grp_two_carrying: usize) -> Self {
        Marker {
            id,
            num_grp_one_carrying,
            num_grp_two_carrying,
            domain: Domain::Free,
        }
    }

    pub fn id(&self) -> usize {
        self.id
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

    /// Fixes the marker, returning true if the marker was free.
    pub fn set(&mut self, value: bool) -> bool {
        self.domain.fix(value)
    }

    pub fn num_grp_one_carrying(&self) -> usize {
        self.num_grp_one_carrying
    }

    pub fn num_grp_two_carrying(&self) -> usize {
        self.num_grp_two_carrying
    }

    pub fn num_carrying(&self, group: Group) -> usize {
        match group {
            Group::One => self.num_grp_one_carrying,
            Group::Two => self.num_grp_two_carrying,
        }
    }

    pub fn decrement_carrying(&mut self, group: Group) {
        let count = match group {
            Group::One => &mut self.num_grp_one_carrying,
            Group::Two => &mut self.num_grp_two_carrying,
        };
        assert!(*count > 0, "Carrying count of marker {} below zero", self.id);
        *count -= 1;
    }

    pub fn increment_carrying(&mut self, group: Group) {
        match group {
            Group::One => self.num_grp_one_carrying += 1,
            Group::Two => self.num_grp_two_carrying += 1,
        }
    }
}
