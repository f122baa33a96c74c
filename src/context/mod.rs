/*!
The context of a search.

A context holds everything the controller knows about the search space which remains:
- The [dataset], shared with workers.
- The domain of each [marker](Marker) and [individual](Individual), with the counters used for pruning.
- The [cut set](CutSet) of cuts issued so far.
- [Equalities](VariableEqualities) found between individuals.
- The current lower and upper bound.

Only the controller mutates a context, and all mutation of domains passes through the [propagation procedures](crate::procedures::propagation).

# Example

```rust
# use std::sync::Arc;
# use csfs::config::Config;
# use csfs::context::SearchContext;
# use csfs::dataset::Dataset;
# use csfs::structures::domain::Group;
let states = vec![
    vec![true, true, false],
    vec![false, true, true],
    vec![true, false, true],
];
let groups = vec![Group::One, Group::One, Group::Two];
let data = Arc::new(Dataset::new(states, groups, 2).expect("valid"));

let mut ctx = SearchContext::from_config(Config::default(), data);
assert!(ctx.fix_marker(0, false));
assert!(ctx.individuals[0].is_zero());
assert!(ctx.cut_set.markers_kept_in_all_cuts().contains(&0));
```
*/

use std::{collections::VecDeque, sync::Arc};

use crate::{
    config::Config,
    dataset::Dataset,
    db::{cut_set::CutSet, equalities::VariableEqualities},
    procedures::propagation::Fix,
    structures::{
        domain::{Domain, Group},
        individual::Individual,
        marker::Marker,
    },
};

pub struct SearchContext {
    pub config: Config,

    pub data: Arc<Dataset>,

    pub markers: Vec<Marker>,

    pub individuals: Vec<Individual>,

    pub cut_set: CutSet,

    pub equalities: VariableEqualities,

    /// The objective value of the best pattern found, or a threshold when collecting solutions.
    pub lb: f64,

    /// A bound on the objective value of any pattern not yet examined.
    pub ub: f64,

    /// Fixes whose consequences are yet to be applied.
    pub fix_q: VecDeque<Fix>,
}

impl SearchContext {
    /// A context with every marker and individual free, and bounds from the configuration.
    pub fn from_config(config: Config, data: Arc<Dataset>) -> Self {
        let markers = (0..data.num_states())
            .map(|state| {
                let mut marker = Marker::new(state, 0, 0);
                for individual in data.carriers(state) {
                    marker.increment_carrying(data.group(individual));
                }
                marker
            })
            .collect();

        let individuals = (0..data.num_individuals())
            .map(|individual| {
                let carried = data.carried_by(individual).count();
                Individual::new(individual, data.group(individual), carried)
            })
            .collect();

        SearchContext {
            lb: config.initial_lower_bound(),
            ub: config.starting_upper_bound.value,
            config,
            data,
            markers,
            individuals,
            cut_set: CutSet::default(),
            equalities: VariableEqualities::default(),
            fix_q: VecDeque::default(),
        }
    }

    /// Applies the initial round of pruning, from the configured bounds alone.
    pub fn initialise(&mut self) {
        if self.fix_markers_below_threshold() {
            log::debug!("Fixed markers below the initial threshold");
        }
        if self.fix_individuals_without_pattern() {
            log::debug!("Fixed individuals without a pattern");
        }
        self.detect_equalities();
    }

    pub fn pattern_size(&self) -> usize {
        self.data.pattern_size()
    }

    /// The ratio below which the group one carrying ratio of a marker leads the marker to be fixed to zero.
    pub fn pruning_threshold(&self) -> f64 {
        self.config.pruning_threshold(self.lb)
    }

    /// The ratio of group one individuals not fixed to zero which carry `marker`.
    pub fn grp_one_ratio(&self, marker: usize) -> f64 {
        self.markers[marker].num_grp_one_carrying() as f64 / self.data.num_grp_one() as f64
    }

    pub fn marker_domains(&self) -> Vec<Domain> {
        self.markers.iter().map(Marker::domain).collect()
    }

    pub fn individual_domains(&self) -> Vec<Domain> {
        self.individuals.iter().map(Individual::domain).collect()
    }

    /// Free individuals of group one.
    pub fn free_grp_one(&self) -> impl Iterator<Item = &Individual> {
        self.individuals
            .iter()
            .filter(|individual| individual.group() == Group::One && !individual.is_set())
    }

    /// Counts of free markers and free individuals.
    pub fn free_counts(&self) -> (usize, usize) {
        (
            self.markers.iter().filter(|m| !m.is_set()).count(),
            self.individuals.iter().filter(|i| !i.is_set()).count(),
        )
    }
}
