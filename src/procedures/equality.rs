/*!
Detection of equal individuals.

Two individuals which carry the same markers, setting aside markers fixed to zero, carry exactly the same patterns of the remaining search space.
So, in any pattern the two take the same value, and the relaxation may be given an equality constraint between the two.

Individuals are sorted by count of remaining markers, as individuals with differing counts cannot be equal.
Within each run of individuals with the same count, each pair is compared.
*/

use crate::{
    context::SearchContext, misc::log::targets::EQUALITY, structures::individual,
};

impl SearchContext {
    /// Records an equality between each pair of individuals carrying the same markers not fixed to zero.
    ///
    /// Returns true if some new equality was recorded.
    pub fn detect_equalities(&mut self) -> bool {
        let mut sorted = self.individuals.iter().collect::<Vec<_>>();
        sorted.sort_by(|a, b| individual::by_remaining_markers(a, b));

        let mut found = Vec::default();

        for run in sorted.chunk_by(|a, b| a.num_remaining_markers() == b.num_remaining_markers()) {
            if run.len() < 2 {
                continue;
            }

            let carried = run
                .iter()
                .map(|individual| {
                    self.data
                        .carried_by(individual.id())
                        .filter(|marker| !self.markers[*marker].is_zero())
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>();

            for (x_index, x_markers) in carried.iter().enumerate() {
                for (y_index, y_markers) in carried.iter().enumerate().skip(x_index + 1) {
                    if x_markers == y_markers {
                        found.push((run[x_index].id(), run[y_index].id()));
                    }
                }
            }
        }

        let mut fresh = false;
        for (x, y) in found {
            if self.equalities.add(x, y) {
                log::trace!(target: EQUALITY, "i({x}) = i({y})");
                fresh = true;
            }
        }

        fresh
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::Config, dataset::Dataset, structures::domain::Group};

    #[test]
    fn equal_after_fixing() {
        let states = vec![
            vec![true, true, false, true],
            vec![true, false, true, false],
            vec![false, true, true, true],
            vec![true, true, true, true],
        ];
        let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
        let data = Dataset::new(states, groups, 2).expect("valid");
        let mut ctx = SearchContext::from_config(Config::default(), Arc::new(data));

        assert!(ctx.detect_equalities());
        assert!(ctx.equalities.exists_pair(1, 3));
        assert!(!ctx.equalities.exists(0));

        ctx.fix_marker(1, false);
        ctx.fix_marker(2, false);
        assert!(ctx.individuals[2].is_zero());

        assert!(ctx.detect_equalities());
        assert!(ctx.equalities.exists_pair(0, 1));
        assert!(ctx.equalities.exists_pair(0, 3));
        assert!(!ctx.detect_equalities());
    }
}
