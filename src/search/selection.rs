//! Truncation selection for the search loop.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Indices of the best `floor(len / 2)` scores, best first.
///
/// Ranking uses a max-heap on `(score, Reverse(index))`: higher scores come
/// first and equal scores favor the lower original index.
///
/// # Examples
///
/// ```
/// use u_influence::search::select_top_half;
///
/// assert_eq!(select_top_half(&[3, 7, 7, 1, 5]), vec![1, 2]);
/// ```
pub fn select_top_half(scores: &[usize]) -> Vec<usize> {
    select_top(scores, scores.len() / 2)
}

/// Indices of the best `k` scores, best first, lower index on ties.
pub fn select_top(scores: &[usize], k: usize) -> Vec<usize> {
    let mut heap: BinaryHeap<(usize, Reverse<usize>)> = scores
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, Reverse(i)))
        .collect();

    let mut top = Vec::with_capacity(k.min(scores.len()));
    while top.len() < k {
        match heap.pop() {
            Some((_, Reverse(i))) => top.push(i),
            None => break,
        }
    }
    top
}
