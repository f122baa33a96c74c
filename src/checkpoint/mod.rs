/*!
Checkpoints of a search.

A checkpoint records enough of a search to resume the search later:
- Completed cuts, whose subproblems have been solved.
- Uncompleted cuts, issued though without an answer.
- Fixes of markers and individuals, and equalities between individuals.
- The lower and upper bound.

Checkpoints are [written](Checkpoint::write) and [read](Checkpoint::read) as text:

```text
START_COMPLETED_CUTS:

Cut_0: m(1) + m(3) <= 1
Individuals_Set: i(3) = 0
                 i(2) = i(5)
Markers_Set: m(0) = 0
Upper_Bound: 0.5
Lower_Bound: 0.25

START_UNCOMPLETED_CUTS:

Cut_1: m(2) + m(4) <= 1
```

# Resuming

A checkpoint is [restored](Checkpoint::restore) to a fresh context by:
1. Adding each completed cut to the cut set.
2. Fixing each marker and individual in turn, with consequences propagated after each fix.
   A fix which conflicts with an earlier fix, or a consequence of an earlier fix, is skipped with a warning.
3. Recording each equality.
4. Raising the lower bound and lowering the upper bound to those of the checkpoint.

Uncompleted cuts are left to the controller, which issues these before any new cut.
*/

mod read;
mod write;

use std::path::Path;

use crate::{
    context::SearchContext,
    misc::log::targets::CHECKPOINT,
    procedures::propagation::Fix,
    structures::cut::Cut,
    types::err::{self, ErrorKind, IoError},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Checkpoint {
    /// Markers of each completed cut.
    pub completed: Vec<Vec<usize>>,

    /// Markers of each uncompleted cut.
    pub uncompleted: Vec<Vec<usize>>,

    pub marker_fixes: Vec<(usize, bool)>,

    pub individual_fixes: Vec<(usize, bool)>,

    /// Pairs of equal individuals.
    pub equalities: Vec<(usize, usize)>,

    pub lb: Option<f64>,

    pub ub: Option<f64>,
}

impl Checkpoint {
    /// A checkpoint of `ctx`, with each cut of `uncompleted` noted as uncompleted.
    ///
    /// Uncompleted cuts are noted with every hoisted marker, as stored.
    pub fn of<'c>(ctx: &SearchContext, uncompleted: impl IntoIterator<Item = &'c Cut>) -> Self {
        let uncompleted = uncompleted
            .into_iter()
            .map(|cut| {
                let mut cut = cut.clone();
                for marker in ctx.cut_set.markers_kept_in_all_cuts() {
                    cut.add(*marker);
                }
                cut.true_elements()
            })
            .collect::<Vec<_>>();

        let completed = ctx
            .cut_set
            .iter()
            .map(Cut::true_elements)
            .filter(|cut| !uncompleted.contains(cut))
            .collect();

        let marker_fixes = ctx
            .markers
            .iter()
            .filter_map(|marker| marker.domain().value().map(|value| (marker.id(), value)))
            .collect();

        let individual_fixes = ctx
            .individuals
            .iter()
            .filter_map(|individual| {
                individual
                    .domain()
                    .value()
                    .map(|value| (individual.id(), value))
            })
            .collect();

        Checkpoint {
            completed,
            uncompleted,
            marker_fixes,
            individual_fixes,
            equalities: ctx.equalities.pairs(),
            lb: Some(ctx.lb),
            ub: Some(ctx.ub),
        }
    }

    /// Restores the checkpoint to `ctx`, returning the uncompleted cuts.
    pub fn restore(&self, ctx: &mut SearchContext) -> Vec<Cut> {
        let num_markers = ctx.markers.len();

        for cut in &self.completed {
            ctx.cut_set.add(Cut::from_elements(num_markers, cut));
        }

        for (marker, value) in &self.marker_fixes {
            match ctx.markers[*marker].domain().value() {
                Some(fixed) if fixed != *value => {
                    log::warn!(target: CHECKPOINT, "Skipped m({marker}) = {}, as fixed to {}", *value as u8, fixed as u8);
                }
                _ => {
                    ctx.value_and_queue(Fix::Marker(*marker, *value));
                    ctx.apply_fixes();
                }
            }
        }

        for (individual, value) in &self.individual_fixes {
            match ctx.individuals[*individual].domain().value() {
                Some(fixed) if fixed != *value => {
                    log::warn!(target: CHECKPOINT, "Skipped i({individual}) = {}, as fixed to {}", *value as u8, fixed as u8);
                }
                _ => {
                    ctx.value_and_queue(Fix::Individual(*individual, *value));
                    ctx.apply_fixes();
                }
            }
        }

        for (x, y) in &self.equalities {
            ctx.equalities.add(*x, *y);
        }

        if let Some(lb) = self.lb {
            ctx.lb = ctx.lb.max(lb);
        }
        if let Some(ub) = self.ub {
            ctx.ub = ctx.ub.min(ub);
        }

        log::info!(
            target: CHECKPOINT,
            "Restored {} completed cuts and {} uncompleted cuts",
            self.completed.len(),
            self.uncompleted.len()
        );

        self.uncompleted
            .iter()
            .map(|cut| Cut::from_elements(num_markers, cut))
            .collect()
    }

    /// Writes the checkpoint to the file at `path`.
    pub fn write_file(&self, path: impl AsRef<Path>, pattern_size: usize) -> Result<(), ErrorKind> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| IoError::new(path, &e))?;
        let mut writer = std::io::BufWriter::new(file);

        match self.write(&mut writer, pattern_size) {
            Ok(()) => {
                log::info!(target: CHECKPOINT, "Wrote checkpoint to {}", path.display());
                Ok(())
            }
            Err(e) => Err(err::ErrorKind::from(IoError::new(path, &e))),
        }
    }

    /// Reads a checkpoint from the file at `path`, for a dataset of the given dimensions.
    pub fn read_file(
        path: impl AsRef<Path>,
        num_states: usize,
        num_individuals: usize,
    ) -> Result<Checkpoint, ErrorKind> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| IoError::new(path, &e))?;
        Checkpoint::read(std::io::BufReader::new(file), num_states, num_individuals)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::Config, dataset::Dataset, structures::domain::Group};

    fn context() -> SearchContext {
        let states = vec![
            vec![true, true, false, true],
            vec![true, false, true, true],
            vec![false, true, true, true],
            vec![true, true, true, false],
            vec![false, false, true, true],
        ];
        let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
        let data = Dataset::new(states, groups, 2).expect("valid");
        SearchContext::from_config(Config::default(), Arc::new(data))
    }

    #[test]
    fn snapshot_and_restore() {
        let mut ctx = context();
        ctx.cut_set.add(Cut::from_elements(5, &[0, 1]));
        ctx.cut_set.add(Cut::from_elements(5, &[2, 3]));
        ctx.fix_marker(4, false);
        ctx.equalities.add(0, 1);
        ctx.lb = 0.25;
        ctx.ub = 0.75;

        let in_flight = Cut::from_elements(5, &[2, 3, 4]);
        let checkpoint = Checkpoint::of(&ctx, [&Cut::from_elements(5, &[2, 3])]);
        assert_eq!(checkpoint.completed, vec![vec![0, 1, 4]]);
        assert_eq!(checkpoint.uncompleted, vec![vec![2, 3, 4]]);
        assert_eq!(checkpoint.marker_fixes, vec![(4, false)]);

        let mut fresh = context();
        let uncompleted = checkpoint.restore(&mut fresh);

        assert_eq!(uncompleted, vec![in_flight]);
        assert!(fresh.markers[4].is_zero());
        assert!(fresh.cut_set.exists_elements(&[0, 1, 4]));
        assert!(fresh.equalities.exists_pair(0, 1));
        assert_eq!(fresh.lb, 0.25);
        assert_eq!(fresh.ub, 0.75);
    }

    #[test]
    fn bounds_only_tighten() {
        let mut ctx = context();
        ctx.lb = 0.5;
        ctx.ub = 0.6;

        let checkpoint = Checkpoint {
            lb: Some(0.25),
            ub: Some(0.75),
            ..Default::default()
        };
        checkpoint.restore(&mut ctx);
        assert_eq!(ctx.lb, 0.5);
        assert_eq!(ctx.ub, 0.6);
    }

    #[test]
    fn conflicting_consequence_is_skipped() {
        let mut ctx = context();
        assert!(!ctx.data.carries(0, 2));

        let checkpoint = Checkpoint {
            marker_fixes: vec![(0, true)],
            individual_fixes: vec![(2, true)],
            ..Default::default()
        };
        checkpoint.restore(&mut ctx);

        assert!(ctx.markers[0].is_one());
        assert!(ctx.individuals[2].is_zero());
    }

    #[test]
    fn consequences_of_a_fixed_individual_leave_fixed_markers() {
        let mut ctx = context();
        assert!(!ctx.data.carries(0, 2));

        let checkpoint = Checkpoint {
            individual_fixes: vec![(2, true)],
            ..Default::default()
        };
        ctx.markers[0].set(true);
        checkpoint.restore(&mut ctx);

        assert!(ctx.markers[0].is_one());
        assert!(ctx.individuals[2].is_one());
    }
}
