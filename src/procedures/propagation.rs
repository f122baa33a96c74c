/*!
Propagation of fixed domains.

# Overview

Fixing a marker or individual may lead to further fixes:

- A marker fixed to zero is [kept in every cut](crate::db::cut_set::CutSet::keep_marker_in_all_cuts), and each carrier has one less remaining marker.
  A free carrier with fewer remaining markers than the pattern size is fixed to zero.
- A marker fixed to one excludes every individual which does not carry the marker, and each such free individual is fixed to zero.
- An individual fixed to zero no longer counts as a carrier of its markers.
  If the individual is in group one, any free marker whose group one carrying ratio falls below the [pruning threshold](crate::context::SearchContext::pruning_threshold) is fixed to zero.
- An individual fixed to one excludes every marker it does not carry, and each such free marker is fixed to zero.

# Implementation

Following the consequence queue of a solver, a fix updates a domain immediately and is pushed to the [fix queue](crate::context::SearchContext::fix_q).
Consequences of the fix are examined when the fix is taken from the queue, and may push further fixes.

```rust,ignore
if ctx.value_and_queue(Fix::Marker(marker, false)) {
    ctx.apply_fixes();
}
```

As domains only change from free to fixed, each marker and individual is queued at most once, and the queue is exhausted after at most as many fixes as there are markers and individuals.
And, as each rule only fixes a domain to zero when some count falls below a bound, the fixed point reached does not depend on the order fixes are applied in.

# Invariants

<div class="warning">
A domain is queued exactly when the domain changes from free to fixed.
</div>

<div class="warning">
When the queue is empty, the consequences of every fix have been applied.
</div>

Fixing a domain to the value opposite to a value already fixed is a bug, and panics.
*/

use crate::{
    context::SearchContext, misc::log::targets::PROPAGATION, structures::domain::Group,
};

/// A fix of a marker or an individual to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fix {
    Marker(usize, bool),
    Individual(usize, bool),
}

impl std::fmt::Display for Fix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fix::Marker(marker, value) => write!(f, "m({marker}) = {}", *value as u8),
            Fix::Individual(individual, value) => write!(f, "i({individual}) = {}", *value as u8),
        }
    }
}

impl SearchContext {
    /// Fixes `marker` to `value` and applies all consequences, returning true if the marker was free.
    pub fn fix_marker(&mut self, marker: usize, value: bool) -> bool {
        let fixed = self.value_and_queue(Fix::Marker(marker, value));
        self.apply_fixes();
        fixed
    }

    /// Fixes `individual` to `value` and applies all consequences, returning true if the individual was free.
    pub fn fix_individual(&mut self, individual: usize, value: bool) -> bool {
        let fixed = self.value_and_queue(Fix::Individual(individual, value));
        self.apply_fixes();
        fixed
    }

    /// Updates the domain of the fix, and queues the fix if the domain was free.
    ///
    /// Returns true if the fix was queued.
    pub fn value_and_queue(&mut self, fix: Fix) -> bool {
        let fresh = match fix {
            Fix::Marker(marker, value) => self.markers[marker].set(value),
            Fix::Individual(individual, value) => self.individuals[individual].set(value),
        };

        if fresh {
            log::trace!(target: PROPAGATION, "Queued {fix}");
            self.fix_q.push_back(fix);
        }

        fresh
    }

    /// Applies the consequences of each queued fix, until the queue is empty.
    pub fn apply_fixes(&mut self) {
        while let Some(fix) = self.fix_q.pop_front() {
            match fix {
                Fix::Marker(marker, false) => self.marker_zero_consequences(marker),
                Fix::Marker(marker, true) => self.marker_one_consequences(marker),
                Fix::Individual(individual, false) => self.individual_zero_consequences(individual),
                Fix::Individual(individual, true) => self.individual_one_consequences(individual),
            }
        }
    }

    fn marker_zero_consequences(&mut self, marker: usize) {
        self.cut_set.keep_marker_in_all_cuts(marker);

        let pattern_size = self.pattern_size();
        let data = self.data.clone();

        for individual in data.carriers(marker) {
            let the_individual = &mut self.individuals[individual];
            the_individual.decrement_remaining_markers();

            if !the_individual.is_set() && the_individual.num_remaining_markers() < pattern_size {
                self.value_and_queue(Fix::Individual(individual, false));
            }
        }
    }

    fn marker_one_consequences(&mut self, marker: usize) {
        for individual in 0..self.individuals.len() {
            if !self.individuals[individual].is_set() && !self.data.carries(marker, individual) {
                self.value_and_queue(Fix::Individual(individual, false));
            }
        }
    }

    fn individual_zero_consequences(&mut self, individual: usize) {
        let group = self.individuals[individual].group();
        let threshold = self.pruning_threshold();
        let data = self.data.clone();

        for marker in data.carried_by(individual) {
            self.markers[marker].decrement_carrying(group);

            if group == Group::One
                && !self.markers[marker].is_set()
                && self.grp_one_ratio(marker) < threshold
            {
                self.value_and_queue(Fix::Marker(marker, false));
            }
        }
    }

    fn individual_one_consequences(&mut self, individual: usize) {
        for marker in 0..self.markers.len() {
            if !self.markers[marker].is_set() && !self.data.carries(marker, individual) {
                self.value_and_queue(Fix::Marker(marker, false));
            }
        }
    }

    /// Fixes to zero each free marker whose group one carrying ratio is below the pruning threshold.
    ///
    /// Returns true if some marker was fixed.
    pub fn fix_markers_below_threshold(&mut self) -> bool {
        let threshold = self.pruning_threshold();
        let mut fixed = false;

        for marker in 0..self.markers.len() {
            if !self.markers[marker].is_set() && self.grp_one_ratio(marker) < threshold {
                fixed |= self.value_and_queue(Fix::Marker(marker, false));
            }
        }

        self.apply_fixes();
        fixed
    }

    /// Fixes to zero each free individual with fewer remaining markers than the pattern size.
    ///
    /// Returns true if some individual was fixed.
    pub fn fix_individuals_without_pattern(&mut self) -> bool {
        let pattern_size = self.pattern_size();
        let mut fixed = false;

        for individual in 0..self.individuals.len() {
            let the_individual = &self.individuals[individual];
            if !the_individual.is_set() && the_individual.num_remaining_markers() < pattern_size {
                fixed |= self.value_and_queue(Fix::Individual(individual, false));
            }
        }

        self.apply_fixes();
        fixed
    }

    /// Fixes `individual`, and each individual equal to `individual`, to zero.
    ///
    /// Returns true if some individual was fixed.
    pub fn fix_individual_and_equals_to_zero(&mut self, individual: usize) -> bool {
        let mut members = vec![individual];
        if let Some(class) = self.equalities.class_of(individual) {
            members.extend(class.iter().copied());
        }

        let mut fixed = false;
        for member in members {
            fixed |= self.value_and_queue(Fix::Individual(member, false));
        }

        self.apply_fixes();
        fixed
    }
}
