use std::sync::Arc;

use csfs::{
    config::Config,
    context::SearchContext,
    dataset::Dataset,
    structures::domain::{Domain, Group},
};

use rand::{rngs::StdRng, Rng, SeedableRng};

fn context(states: Vec<Vec<bool>>, groups: Vec<Group>, pattern_size: usize) -> SearchContext {
    let data = Dataset::new(states, groups, pattern_size).expect("valid dataset");
    SearchContext::from_config(Config::default(), Arc::new(data))
}

fn random_context(rng: &mut StdRng) -> SearchContext {
    let states = (0..10)
        .map(|_| (0..12).map(|_| rng.gen_bool(0.6)).collect())
        .collect();
    let groups = [Group::One; 6].into_iter().chain([Group::Two; 6]).collect();
    context(states, groups, 3)
}

fn domains(ctx: &SearchContext) -> (Vec<Domain>, Vec<Domain>) {
    (ctx.marker_domains(), ctx.individual_domains())
}

/// Every domain fixed in `before` has the same value in `after`.
fn assert_monotone(before: &[Domain], after: &[Domain]) {
    for (was, now) in before.iter().zip(after) {
        if was.is_set() {
            assert_eq!(was, now);
        }
    }
}

/// Counts kept by markers and individuals agree with the domains.
fn assert_counts(ctx: &SearchContext) {
    for marker in &ctx.markers {
        let carriers = ctx
            .data
            .carriers(marker.id())
            .filter(|individual| !ctx.individuals[*individual].is_zero());
        let (one, two): (Vec<usize>, Vec<usize>) =
            carriers.partition(|individual| ctx.data.group(*individual) == Group::One);

        assert_eq!(marker.num_grp_one_carrying(), one.len());
        assert_eq!(marker.num_grp_two_carrying(), two.len());
    }

    for individual in &ctx.individuals {
        let remaining = ctx
            .data
            .carried_by(individual.id())
            .filter(|marker| !ctx.markers[*marker].is_zero())
            .count();
        assert_eq!(individual.num_remaining_markers(), remaining);
    }
}

mod cascades {
    use super::*;

    #[test]
    fn marker_fix_drops_individual() {
        let states = vec![
            vec![true, true, true, true, true, true, true, false],
            vec![true, true, true, true, true, true, false, false],
            vec![true, true, true, true, false, true, true, false],
            vec![true, true, true, true, true, false, true, false],
            vec![false, false, false, false, false, false, false, true],
            vec![true, false, true, false, false, false, false, true],
        ];
        let groups = [Group::One; 4].into_iter().chain([Group::Two; 4]).collect();
        let mut ctx = context(states, groups, 2);

        assert_eq!(ctx.individuals[7].num_remaining_markers(), 2);
        assert_eq!(ctx.markers[5].num_grp_two_carrying(), 1);

        assert!(ctx.fix_marker(4, false));

        assert!(ctx.individuals[7].is_zero());
        assert_eq!(ctx.individuals[7].num_remaining_markers(), 1);
        assert_eq!(ctx.markers[4].num_grp_two_carrying(), 0);
        assert_eq!(ctx.markers[5].num_grp_two_carrying(), 0);
        assert_eq!(ctx.markers[5].num_grp_one_carrying(), 2);
        assert!(ctx.cut_set.markers_kept_in_all_cuts().contains(&4));

        assert_eq!(ctx.individual_domains().iter().filter(|d| d.is_set()).count(), 1);
        assert_counts(&ctx);
    }

    #[test]
    fn individual_one_fixes_uncarried() {
        let states = vec![
            vec![true, false, true, false],
            vec![true, true, false, true],
            vec![false, true, true, true],
            vec![true, true, true, false],
        ];
        let groups = vec![Group::One, Group::One, Group::Two, Group::Two];
        let mut ctx = context(states, groups, 2);

        assert!(ctx.fix_individual(0, true));
        assert!(ctx.individuals[0].is_one());
        assert!(ctx.markers[2].is_zero());
        assert!(!ctx.markers[0].is_set());
        assert_counts(&ctx);
    }
}

mod properties {
    use super::*;

    #[test]
    fn domains_are_monotone() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..20 {
            let mut ctx = random_context(&mut rng);
            ctx.initialise();

            for _ in 0..12 {
                let (markers_before, individuals_before) = domains(&ctx);

                match rng.gen_bool(0.5) {
                    true => ctx.fix_marker(rng.gen_range(0..ctx.markers.len()), false),
                    false => ctx.fix_individual(rng.gen_range(0..ctx.individuals.len()), false),
                };

                let (markers_after, individuals_after) = domains(&ctx);
                assert_monotone(&markers_before, &markers_after);
                assert_monotone(&individuals_before, &individuals_after);
                assert!(ctx.fix_q.is_empty());
            }

            assert_counts(&ctx);
        }
    }

    #[test]
    fn cascades_reach_a_fixed_point() {
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let mut ctx = random_context(&mut rng);
            ctx.initialise();

            for _ in 0..6 {
                match rng.gen_bool(0.5) {
                    true => ctx.fix_marker(rng.gen_range(0..ctx.markers.len()), false),
                    false => ctx.fix_individual(rng.gen_range(0..ctx.individuals.len()), false),
                };
            }

            let before = domains(&ctx);
            assert!(!ctx.fix_markers_below_threshold());
            assert!(!ctx.fix_individuals_without_pattern());
            assert_eq!(domains(&ctx), before);
        }
    }

    #[test]
    fn equal_individuals_follow_fixes() {
        let states = vec![
            vec![false, true, false, false, true, false],
            vec![true, true, true, false, false, false],
            vec![true, true, true, true, false, false],
            vec![true, false, false, true, true, true],
            vec![false, false, false, true, true, true],
        ];
        let groups = [Group::One; 3].into_iter().chain([Group::Two; 3]).collect();
        let mut ctx = context(states, groups, 2);

        assert!(!ctx.detect_equalities());
        ctx.fix_marker(0, false);

        // Individuals 1 and 2 now carry the same remaining markers, as do 4 and 5.
        assert!(ctx.detect_equalities());
        assert!(ctx.equalities.exists_pair(1, 2));
        assert!(ctx.equalities.exists_pair(4, 5));
        assert!(!ctx.equalities.exists(0));

        assert!(ctx.fix_individual_and_equals_to_zero(4));
        assert!(ctx.individuals[5].is_zero());
        assert!(!ctx.individuals[1].is_set());
    }
}
