//! Property tests for diffusion, budget filling and recombination, plus the
//! reference scenarios on small hand-built inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use u_influence::diffusion::threshold_diffusion;
use u_influence::graph::{AdjacencyGraph, Graph};
use u_influence::model::{generate_nodes_cost, CostModelConfig, InfluenceState, NodeCosts};
use u_influence::random::create_rng;
use u_influence::recombine::{position_combine, GenerationOption, Recombiner};
use u_influence::seed::{budget_fill, random_permutation, KeyScaling, SeedSet};
use u_influence::InfluenceError;

fn random_instance(seed: u64, n: usize, p: f64) -> AdjacencyGraph<usize> {
    let mut rng = create_rng(seed);
    AdjacencyGraph::gnp(n, p, &mut rng)
}

proptest! {
    #[test]
    fn proptest_diffusion_monotone(
        seed in 0u64..1000,
        n in 2usize..40,
        p in 0.0f64..0.3,
        k in 1usize..10,
    ) {
        let graph = random_instance(seed, n, p);
        let mut rng = create_rng(seed + 1);
        let (_, thresholds) = CostModelConfig::default().generate(&graph, &mut rng);

        let small: Vec<usize> = (0..k.min(n) / 2).collect();
        let large: Vec<usize> = (0..k.min(n)).collect();

        let a = threshold_diffusion(&graph, &small, &mut InfluenceState::new(&graph), &thresholds);
        let b = threshold_diffusion(&graph, &large, &mut InfluenceState::new(&graph), &thresholds);

        let a_set: HashSet<usize> = a.influenced.iter().copied().collect();
        let b_set: HashSet<usize> = b.influenced.iter().copied().collect();
        prop_assert!(small.iter().all(|s| a_set.contains(s)));
        prop_assert!(a_set.is_subset(&b_set));
        prop_assert!(a.history.windows(2).all(|w| w[0] <= w[1]));

        // every pass keeps the previous active set and only adds new nodes
        let mut active: HashSet<usize> = large.iter().copied().collect();
        prop_assert_eq!(b.activations.len(), b.steps);
        for (step, added) in b.activations.iter().enumerate() {
            prop_assert!(!added.is_empty());
            for node in added {
                prop_assert!(active.insert(*node));
            }
            prop_assert_eq!(active.len(), b.history[step + 1]);
        }
        prop_assert_eq!(active, b_set);
    }

    #[test]
    fn proptest_diffusion_terminates(
        seed in 0u64..1000,
        n in 1usize..50,
        p in 0.0f64..0.5,
    ) {
        let graph = random_instance(seed, n, p);
        let mut rng = create_rng(seed);
        let (_, thresholds) = CostModelConfig::default().generate(&graph, &mut rng);
        let mut state = InfluenceState::new(&graph);

        let d = threshold_diffusion(&graph, &[0], &mut state, &thresholds);
        prop_assert!(d.steps <= graph.number_of_nodes());
        prop_assert_eq!(d.history.len(), d.steps + 1);
        prop_assert_eq!(state.influenced_count(), d.score());
    }

    #[test]
    fn proptest_budget_respected(
        seed in 0u64..1000,
        n in 1usize..60,
        frac in 0.0f64..=1.0,
    ) {
        let graph = random_instance(seed, n, 0.1);
        let mut rng = create_rng(seed);
        let costs = generate_nodes_cost(graph.nodes(), 1, 20, &mut rng);
        let budget = (costs.total() as f64 * frac) as u64;
        let ordering = random_permutation(&graph, &mut rng);

        let set = budget_fill(ordering, &costs, budget).unwrap();
        if budget == costs.total() {
            prop_assert_eq!(set.len(), n);
        } else {
            prop_assert!(set.cost(&costs) <= budget);
        }
    }

    #[test]
    fn proptest_infeasible_budget_detected(
        seed in 0u64..1000,
        n in 1usize..30,
        extra in 1u64..100,
    ) {
        let mut rng = create_rng(seed);
        let costs = generate_nodes_cost(0..n, 1, 10, &mut rng);
        let ordering: Vec<usize> = (0..n).collect();

        let err = budget_fill(ordering, &costs, costs.total() + extra).unwrap_err();
        prop_assert_eq!(
            err,
            InfluenceError::InfeasibleBudget {
                requested: costs.total() + extra,
                available: costs.total(),
            }
        );
    }

    #[test]
    fn proptest_equality_ignores_permutation(seed in 0u64..1000, n in 2usize..30) {
        let graph = random_instance(seed, n, 0.1);
        let mut rng = create_rng(seed);
        let members: Vec<usize> = (0..n / 2).collect();

        let a = SeedSet::new(members.iter().copied(), random_permutation(&graph, &mut rng));
        let b = SeedSet::new(members.iter().rev().copied(), random_permutation(&graph, &mut rng));
        prop_assert_eq!(&a, &b);

        let set: HashSet<SeedSet<usize>> = [a, b].into_iter().collect();
        prop_assert_eq!(set.len(), 1);
    }

    #[test]
    fn proptest_recombination_closed(
        seed in 0u64..1000,
        n in 2usize..50,
        frac in 0.05f64..0.9,
    ) {
        let graph = random_instance(seed, n, 0.1);
        let mut rng = create_rng(seed);
        let costs = generate_nodes_cost(graph.nodes(), 1, 10, &mut rng);
        let budget = ((costs.total() as f64 * frac) as u64).max(1);

        let p1 = budget_fill(random_permutation(&graph, &mut rng), &costs, budget).unwrap();
        let p2 = budget_fill(random_permutation(&graph, &mut rng), &costs, budget).unwrap();

        let merged = position_combine(p1.permutation(), p2.permutation(), &mut rng).unwrap();
        let mut sorted = merged.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());

        for option in [
            GenerationOption::Recombined,
            GenerationOption::Degree,
            GenerationOption::DegreeCost,
        ] {
            let recombiner = Recombiner::new(&graph, &costs, budget, option)
                .with_scaling(KeyScaling::new((0.5, 1.5), (0.5, 1.5)));
            let child = recombiner.recombine(&p1, &p2, &mut rng).unwrap();
            prop_assert!(child.members().iter().all(|m| *m < n));
            if budget < costs.total() {
                prop_assert!(child.cost(&costs) <= budget);
            }
        }
    }
}

#[test]
fn path_with_unit_thresholds_reaches_everything() {
    let graph = AdjacencyGraph::path(5);
    let thresholds = u_influence::model::NodeThresholds::uniform(&graph, 1);
    let mut state = InfluenceState::new(&graph);

    let d = threshold_diffusion(&graph, &[0], &mut state, &thresholds);
    assert_eq!(d.influenced, vec![0, 1, 2, 3, 4]);
    assert_eq!(d.steps, 4);
}

#[test]
fn path_with_threshold_two_stays_put() {
    let graph = AdjacencyGraph::path(5);
    let thresholds = u_influence::model::NodeThresholds::uniform(&graph, 2);
    let mut state = InfluenceState::new(&graph);

    let d = threshold_diffusion(&graph, &[0], &mut state, &thresholds);
    assert_eq!(d.influenced, vec![0]);
    assert_eq!(d.steps, 0);
}

#[test]
fn budget_fill_skips_what_does_not_fit() {
    let costs: NodeCosts<char> = [('A', 10), ('B', 20), ('C', 30)].into_iter().collect();
    let set = budget_fill(vec!['B', 'C', 'A'], &costs, 30).unwrap();
    assert_eq!(set.member_vec(), vec!['A', 'B']);
    assert_eq!(set.cost(&costs), 30);
}
