//! Budget filling: turning a node ordering into a seed set.

use super::types::SeedSet;
use crate::error::{InfluenceError, Result};
use crate::graph::Node;
use crate::model::NodeCosts;
use std::collections::HashSet;

/// Walks `ordering` and greedily takes every node that still fits in the
/// budget.
///
/// Each position is visited once; a node that does not fit is skipped and
/// never reconsidered. The walk stops when the running cost reaches the
/// budget or the ordering runs out.
///
/// When the total cost of all nodes equals the budget exactly, the result
/// is every node. The returned seed set keeps `ordering` as its permutation.
///
/// # Errors
/// [`InfluenceError::InfeasibleBudget`] when `budget` exceeds the total
/// cost of all nodes.
pub fn budget_fill<N: Node>(
    ordering: Vec<N>,
    costs: &NodeCosts<N>,
    budget: u64,
) -> Result<SeedSet<N>> {
    check_feasible(costs, budget)?;
    if costs.total() == budget {
        return Ok(SeedSet::new(ordering.clone(), ordering));
    }

    let mut members = HashSet::new();
    let mut spent = 0u64;

    for &node in &ordering {
        if spent >= budget {
            break;
        }
        let cost = costs.cost(node);
        if !members.contains(&node) && spent + cost <= budget {
            members.insert(node);
            spent += cost;
        }
    }

    Ok(SeedSet::new(members, ordering))
}

/// Splits one ordering into up to `count` disjoint seed sets.
///
/// Positions taken by an earlier set are excluded from the walks of later
/// sets, so repeated fills partition the same global order. Stops early
/// once a walk yields nothing.
///
/// # Errors
/// [`InfluenceError::InfeasibleBudget`] when `budget` exceeds the total
/// cost of all nodes.
pub fn partition_fill<N: Node>(
    ordering: Vec<N>,
    costs: &NodeCosts<N>,
    budget: u64,
    count: usize,
) -> Result<Vec<SeedSet<N>>> {
    check_feasible(costs, budget)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    if costs.total() == budget {
        return Ok(vec![SeedSet::new(ordering.clone(), ordering)]);
    }

    let mut excluded = vec![false; ordering.len()];
    let mut sets = Vec::with_capacity(count);

    for _ in 0..count {
        let (members, taken) = fill_excluding(&ordering, costs, budget, &excluded);
        if members.is_empty() {
            break;
        }
        for pos in taken {
            excluded[pos] = true;
        }
        sets.push(SeedSet::new(members, ordering.clone()));
    }

    Ok(sets)
}

/// One budget walk skipping excluded positions. Returns the members and the
/// positions they were taken from.
fn fill_excluding<N: Node>(
    ordering: &[N],
    costs: &NodeCosts<N>,
    budget: u64,
    excluded: &[bool],
) -> (Vec<N>, Vec<usize>) {
    let mut members = Vec::new();
    let mut taken = Vec::new();
    let mut seen = HashSet::new();
    let mut spent = 0u64;

    for (pos, &node) in ordering.iter().enumerate() {
        if spent >= budget {
            break;
        }
        if excluded[pos] {
            continue;
        }
        let cost = costs.cost(node);
        if !seen.contains(&node) && spent + cost <= budget {
            seen.insert(node);
            members.push(node);
            taken.push(pos);
            spent += cost;
        }
    }

    (members, taken)
}

fn check_feasible<N: Node>(costs: &NodeCosts<N>, budget: u64) -> Result<()> {
    if budget > costs.total() {
        return Err(InfluenceError::InfeasibleBudget {
            requested: budget,
            available: costs.total(),
        });
    }
    Ok(())
}
