/*!
Creation of cuts.

# Overview

Each iteration of a search issues one cut, and the cut decides the sparse subproblem handed to a worker.
A cut is created from one of three sources:

- **Relaxation**: markers are taken in order of relaxation value, highest first, until the next marker has a value of zero.
  If the cut found is contained in some stored cut, random markers are added until it is not.
- **Merge**: once the cut set holds [enough cuts](crate::config::Config::max_num_cuts), the union of the two closest stored cuts.
- **Individual**: the markers still carried by the free group one individual with the fewest remaining markers.
  After the subproblem of such a cut is solved, every pattern carried by the individual has been examined, and the individual may be fixed to zero.

Early on, relaxation values give useful guidance.
Though, as individuals lose markers, cuts from individuals become small and cheap to solve.
So, once the creator begins to use individuals it continues to do so for the rest of the search.

The switch is made when either:
- Some free group one individual has no more remaining markers than the largest stored cut.
- A cut from the relaxation or a merge is at least half the size of the smallest count of remaining markers of a free group one individual.

If no free group one individual remains, the relaxation is used regardless.
*/

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    context::SearchContext,
    misc::log::targets::CUT_CREATOR,
    structures::{cut::Cut, individual},
};

/// The source a cut was created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CutSource {
    /// Relaxation values.
    Relaxation,

    /// A merge of two stored cuts.
    Merge,

    /// The remaining markers of the individual.
    Individual(usize),
}

impl std::fmt::Display for CutSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relaxation => write!(f, "relaxation"),
            Self::Merge => write!(f, "merge"),
            Self::Individual(individual) => write!(f, "individual {individual}"),
        }
    }
}

pub struct CutCreator {
    /// Whether cuts are created from individuals, which once set remains set.
    use_individuals: bool,

    rng: StdRng,
}

impl CutCreator {
    pub fn new(seed: u64) -> Self {
        CutCreator {
            use_individuals: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn using_individuals(&self) -> bool {
        self.use_individuals
    }

    /// Creates a cut, given the relaxation value of each marker and the cap on the count of cuts.
    pub fn create_cut(
        &mut self,
        ctx: &SearchContext,
        marker_values: &[f64],
        max_num_cuts: usize,
    ) -> (Cut, CutSource) {
        if !self.use_individuals && Self::individual_within_max_size(ctx) {
            log::debug!(target: CUT_CREATOR, "Switching to cuts from individuals");
            self.use_individuals = true;
        }

        if self.use_individuals {
            if let Some((cut, individual)) = Self::from_individuals(ctx) {
                return (cut, CutSource::Individual(individual));
            }
        }

        let (cut, source) = match ctx.cut_set.num_cuts() >= max_num_cuts {
            true => match ctx.cut_set.merged_cut_of_closest_pair() {
                Some(cut) => (cut, CutSource::Merge),
                None => (self.from_relaxation(ctx, marker_values), CutSource::Relaxation),
            },
            false => (self.from_relaxation(ctx, marker_values), CutSource::Relaxation),
        };

        if !self.use_individuals {
            if let Some(switch_size) = Self::min_cut_size_to_switch(ctx) {
                if cut.size() >= switch_size {
                    log::debug!(target: CUT_CREATOR, "Switching to cuts from individuals, at a cut of size {}", cut.size());
                    self.use_individuals = true;

                    if let Some((cut, individual)) = Self::from_individuals(ctx) {
                        return (cut, CutSource::Individual(individual));
                    }
                }
            }
        }

        (cut, source)
    }

    /// A cut from relaxation values, extended with random markers if required.
    fn from_relaxation(&mut self, ctx: &SearchContext, marker_values: &[f64]) -> Cut {
        let mut order = (0..marker_values.len()).collect::<Vec<_>>();
        order.sort_by(|a, b| marker_values[*b].total_cmp(&marker_values[*a]));

        let mut cut = Cut::new(ctx.markers.len());
        let mut position = 0;

        while let Some(marker) = order.get(position) {
            position += 1;
            if !ctx.markers[*marker].is_zero() {
                cut.add(*marker);
            }

            match order.get(position) {
                Some(next) if marker_values[*next] > 0.0 => {}
                _ => break,
            }
        }

        if ctx.cut_set.exists(&cut) {
            let mut remaining = order.split_off(position);
            remaining.shuffle(&mut self.rng);

            for marker in remaining {
                if ctx.markers[marker].is_zero() {
                    continue;
                }
                cut.add(marker);
                if !ctx.cut_set.exists(&cut) {
                    break;
                }
            }

            log::trace!(target: CUT_CREATOR, "Extended a stored cut to {cut}");
        }

        cut
    }

    /// The markers not fixed to zero of the free group one individual with the fewest remaining markers.
    fn from_individuals(ctx: &SearchContext) -> Option<(Cut, usize)> {
        let chosen = ctx
            .free_grp_one()
            .min_by(|a, b| individual::by_remaining_markers(a, b))?;

        let mut cut = Cut::new(ctx.markers.len());
        for marker in ctx.data.carried_by(chosen.id()) {
            if !ctx.markers[marker].is_zero() {
                cut.add(marker);
            }
        }

        Some((cut, chosen.id()))
    }

    fn individual_within_max_size(ctx: &SearchContext) -> bool {
        let max_size = ctx.cut_set.max_size();
        ctx.free_grp_one()
            .any(|individual| individual.num_remaining_markers() <= max_size)
    }

    /// Half the fewest remaining markers of a free group one individual, if some such individual exists.
    fn min_cut_size_to_switch(ctx: &SearchContext) -> Option<usize> {
        ctx.free_grp_one()
            .map(|individual| individual.num_remaining_markers())
            .min()
            .map(|fewest| fewest / 2)
    }
}
