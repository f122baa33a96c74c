/*!
The data a search is over.

A dataset is a matrix of marker states by individuals, where entry (*s*, *j*) is true if individual *j* carries state *s*, together with the group of each individual.

A dataset is immutable once built, and is shared between the controller and every worker.

Datasets may be built directly, or [read](Dataset::read) from a table of expression values.

```rust
# use csfs::dataset::Dataset;
# use csfs::structures::domain::Group;
let states = vec![
    vec![true, true, false, false],
    vec![true, false, true, false],
    vec![true, true, true, true],
];
let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
let dataset = Dataset::new(states, groups, 2).expect("valid dataset");

assert_eq!(dataset.objective_of(&[0, 2]), 1.0);
assert_eq!(dataset.objective_of(&[1, 2]), 0.0);
```
*/

mod read;

use crate::{
    structures::domain::Group,
    types::err::{self, DataError, ErrorKind},
};

#[derive(Clone, Debug)]
pub struct Dataset {
    /// Rows of states, each with a column for each individual.
    states: Vec<Vec<bool>>,

    groups: Vec<Group>,

    num_grp_one: usize,
    num_grp_two: usize,

    pattern_size: usize,

    /// A label for each state, used when reporting patterns.
    state_labels: Vec<String>,

    /// Whether group one is the cases, used when reporting patterns.
    risk: bool,
}

impl Dataset {
    /// A dataset from rows of states and the group of each individual.
    pub fn new(
        states: Vec<Vec<bool>>,
        groups: Vec<Group>,
        pattern_size: usize,
    ) -> Result<Self, ErrorKind> {
        if states.iter().any(|row| row.len() != groups.len()) {
            return Err(err::ErrorKind::from(DataError::RaggedMatrix));
        }

        let num_grp_one = groups.iter().filter(|g| **g == Group::One).count();
        let num_grp_two = groups.len() - num_grp_one;

        if num_grp_one == 0 || num_grp_two == 0 {
            return Err(err::ErrorKind::from(DataError::EmptyGroup));
        }

        if pattern_size == 0 || pattern_size > states.len() {
            return Err(err::ErrorKind::from(DataError::PatternSize));
        }

        let state_labels = (0..states.len()).map(|s| format!("State_{s}")).collect();

        Ok(Dataset {
            states,
            groups,
            num_grp_one,
            num_grp_two,
            pattern_size,
            state_labels,
            risk: true,
        })
    }

    /// Replaces the label of each state.
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        debug_assert_eq!(labels.len(), self.states.len());
        self.state_labels = labels;
        self
    }

    /// Notes whether group one is the cases or the controls.
    pub fn with_risk(mut self, risk: bool) -> Self {
        self.risk = risk;
        self
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_individuals(&self) -> usize {
        self.groups.len()
    }

    pub fn num_grp_one(&self) -> usize {
        self.num_grp_one
    }

    pub fn num_grp_two(&self) -> usize {
        self.num_grp_two
    }

    pub fn num_in(&self, group: Group) -> usize {
        match group {
            Group::One => self.num_grp_one,
            Group::Two => self.num_grp_two,
        }
    }

    pub fn pattern_size(&self) -> usize {
        self.pattern_size
    }

    pub fn risk(&self) -> bool {
        self.risk
    }

    pub fn group(&self, individual: usize) -> Group {
        self.groups[individual]
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Whether `individual` carries `state`.
    pub fn carries(&self, state: usize, individual: usize) -> bool {
        self.states[state][individual]
    }

    /// The states carried by `individual`.
    pub fn carried_by(&self, individual: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.states.len()).filter(move |state| self.states[*state][individual])
    }

    /// The individuals carrying `state`.
    pub fn carriers(&self, state: usize) -> impl Iterator<Item = usize> + '_ {
        self.states[state]
            .iter()
            .enumerate()
            .filter_map(|(individual, carries)| carries.then_some(individual))
    }

    /// Whether `individual` carries every state of `pattern`.
    pub fn carries_pattern(&self, pattern: &[usize], individual: usize) -> bool {
        pattern.iter().all(|state| self.states[*state][individual])
    }

    /// The count of individuals in each group carrying every state of `pattern`.
    pub fn count_carriers(&self, pattern: &[usize]) -> (usize, usize) {
        let mut counts = (0, 0);
        for individual in 0..self.groups.len() {
            if self.carries_pattern(pattern, individual) {
                match self.groups[individual] {
                    Group::One => counts.0 += 1,
                    Group::Two => counts.1 += 1,
                }
            }
        }
        counts
    }

    /// The objective value of `pattern`.
    pub fn objective_of(&self, pattern: &[usize]) -> f64 {
        let (one, two) = self.count_carriers(pattern);
        one as f64 / self.num_grp_one as f64 - two as f64 / self.num_grp_two as f64
    }

    pub fn state_label(&self, state: usize) -> &str {
        &self.state_labels[state]
    }

    /// The state matrix as a string, a row for each state.
    pub fn matrix_string(&self) -> String {
        self.states
            .iter()
            .enumerate()
            .map(|(state, row)| {
                let row = row
                    .iter()
                    .map(|carries| if *carries { "1" } else { "0" })
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("State_{state}: {row}")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed() {
        let groups = vec![Group::One, Group::Two];
        assert_eq!(
            Dataset::new(vec![vec![true]], groups.clone(), 1).err(),
            Some(ErrorKind::Data(DataError::RaggedMatrix))
        );
        assert_eq!(
            Dataset::new(vec![vec![true, false]], vec![Group::One, Group::One], 1).err(),
            Some(ErrorKind::Data(DataError::EmptyGroup))
        );
        assert_eq!(
            Dataset::new(vec![vec![true, false]], groups, 2).err(),
            Some(ErrorKind::Data(DataError::PatternSize))
        );
    }

    #[test]
    fn carriers() {
        let states = vec![vec![true, false, true], vec![true, true, true]];
        let groups = vec![Group::One, Group::One, Group::Two];
        let dataset = Dataset::new(states, groups, 2).expect("valid");

        assert_eq!(dataset.carriers(0).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(dataset.carried_by(1).collect::<Vec<_>>(), vec![1]);
        assert_eq!(dataset.count_carriers(&[0, 1]), (1, 1));
        assert_eq!(dataset.objective_of(&[0, 1]), -0.5);
    }
}
