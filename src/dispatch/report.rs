//! Details on what a search has found.

use crate::{dataset::Dataset, procedures::cut_creation::CutSource};

/// Reports from a search.
#[derive(Clone, Debug)]
pub enum Report {
    /// A pattern found by a solve.
    Solution(PatternSummary),

    /// The bounds at the end of an iteration, with the source of the cut issued, if any.
    Bounds {
        iteration: usize,
        ub: f64,
        lb: f64,
        source: Option<CutSource>,
    },

    /// When collecting solutions above a threshold, the bounds met above the threshold.
    TrueConvergence { ub: f64, lb: f64 },

    /// No further dispatches will be sent regarding the search.
    Finish(Outcome),
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The upper bound met the lower bound, or the threshold.
    Converged,

    /// A limit on iterations or time was reached first.
    Stopped,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Converged => write!(f, "Converged"),
            Self::Stopped => write!(f, "Stopped"),
        }
    }
}

/// A pattern, together with the carriers of the pattern in each group.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSummary {
    pub markers: Vec<usize>,

    /// A label for each marker of the pattern.
    pub labels: Vec<String>,

    pub grp_one_carriers: usize,
    pub grp_two_carriers: usize,

    pub grp_one_ratio: f64,
    pub grp_two_ratio: f64,

    pub obj_value: f64,

    /// Whether group one is the cases.
    pub risk: bool,
}

impl PatternSummary {
    pub fn of(data: &Dataset, markers: &[usize]) -> Self {
        let (grp_one_carriers, grp_two_carriers) = data.count_carriers(markers);
        let grp_one_ratio = grp_one_carriers as f64 / data.num_grp_one() as f64;
        let grp_two_ratio = grp_two_carriers as f64 / data.num_grp_two() as f64;

        PatternSummary {
            markers: markers.to_vec(),
            labels: markers
                .iter()
                .map(|marker| data.state_label(*marker).to_string())
                .collect(),
            grp_one_carriers,
            grp_two_carriers,
            grp_one_ratio,
            grp_two_ratio,
            obj_value: grp_one_ratio - grp_two_ratio,
            risk: data.risk(),
        }
    }
}

impl std::fmt::Display for PatternSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (grp_one, grp_two) = match self.risk {
            true => ("cases", "controls"),
            false => ("controls", "cases"),
        };

        writeln!(f, "Pattern possessed by:")?;
        writeln!(f, "\t{} ({:.5}) {grp_one}", self.grp_one_carriers, self.grp_one_ratio)?;
        writeln!(f, "\t{} ({:.5}) {grp_two}", self.grp_two_carriers, self.grp_two_ratio)?;
        write!(f, "\tobjective value: {:.9}", self.obj_value)?;
        for (marker, label) in self.markers.iter().zip(&self.labels) {
            write!(f, "\n\t{marker}\t{label}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::domain::Group;

    #[test]
    fn summary_counts() {
        let states = vec![
            vec![true, true, false, true],
            vec![true, false, false, true],
            vec![false, true, true, false],
        ];
        let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
        let data = Dataset::new(states, groups, 2).expect("valid");

        let summary = PatternSummary::of(&data, &[0, 1]);
        assert_eq!(summary.grp_one_carriers, 1);
        assert_eq!(summary.grp_two_carriers, 1);
        assert_eq!(summary.obj_value, 0.0);
        assert_eq!(summary.labels.len(), 2);
    }
}
