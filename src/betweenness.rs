//! A module for computing the accumulated path-count betweenness, optionally across threads.

use std::{
    collections::VecDeque,
    panic,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Instant,
};

use log::{debug, trace};

const MIN_NUM_THREADS: usize = 1;
const MAX_NUM_THREADS: usize = 128;

/// Runs one breadth-first traversal from `source` and returns the `paths` counter of every node.
///
/// A node reached for the first time inherits the counter of the node being expanded. A node
/// reached again (the source included) accumulates it, regardless of whether the edge lies on a
/// shortest path.
fn paths_from_source(source: usize, indices: &[Vec<usize>]) -> Vec<f64> {
    let num_nodes = indices.len();

    let mut visited = vec![false; num_nodes];
    let mut paths = vec![0.0; num_nodes];
    let mut queue = VecDeque::with_capacity(num_nodes);

    visited[source] = true;
    paths[source] = 1.0;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        for &next in &indices[current] {
            if visited[next] {
                paths[next] += paths[current];
            } else {
                visited[next] = true;
                paths[next] = paths[current];
                queue.push_back(next);
            }
        }
    }

    paths
}

/// Adds one source's counters to the running totals, skipping the source itself.
fn accumulate(source: usize, paths: &[f64], totals: &mut [f64]) {
    for (v, (total, count)) in totals.iter_mut().zip(paths).enumerate() {
        if v != source {
            *total += count;
        }
    }
}

/// Computes the score of every node by treating each one as a traversal source in turn.
pub fn compute_betweenness(indices: &[Vec<usize>]) -> Vec<f64> {
    let num_nodes = indices.len();
    let mut totals = vec![0.0; num_nodes];

    for source in 0..num_nodes {
        let paths = paths_from_source(source, indices);
        accumulate(source, &paths, &mut totals);
    }

    totals
}

/// The worker task: claims the next unprocessed source from the shared counter until none are
/// left, and hands back each source's counters tagged with the source index.
fn betweenness_task(counter: &AtomicUsize, indices: &[Vec<usize>]) -> Vec<(usize, Vec<f64>)> {
    let start = Instant::now();
    let num_nodes = indices.len();
    let mut results = Vec::new();

    loop {
        let source = counter.fetch_add(1, Ordering::Relaxed);
        if source >= num_nodes {
            break;
        }

        if source % 100 == 0 {
            trace!("betweenness: source {}, elapsed {:?}", source, start.elapsed());
        }

        results.push((source, paths_from_source(source, indices)));
    }

    results
}

/// Computes the same scores as [`compute_betweenness`] across `num_threads` workers.
///
/// Workers only compute the per-source counters; summing is done afterwards in source order, so
/// floating point accumulation happens in exactly the same sequence as the single-threaded
/// version.
pub fn compute_betweenness_parallel(indices: Vec<Vec<usize>>, mut num_threads: usize) -> Vec<f64> {
    num_threads = num_threads.clamp(MIN_NUM_THREADS, MAX_NUM_THREADS);
    let start = Instant::now();

    let num_nodes = indices.len();
    let counter = AtomicUsize::new(0);
    let (counter, indices) = (&counter, &indices);

    let mut per_source: Vec<Option<Vec<f64>>> = vec![None; num_nodes];

    thread::scope(|scope| {
        let handles: Vec<_> = (0..num_threads)
            .map(|_| scope.spawn(move || betweenness_task(counter, indices)))
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(results) => {
                    for (source, paths) in results {
                        per_source[source] = Some(paths);
                    }
                }
                Err(payload) => panic::resume_unwind(payload),
            }
        }
    });

    let mut totals = vec![0.0; num_nodes];
    for (source, paths) in per_source.iter().enumerate() {
        if let Some(paths) = paths {
            accumulate(source, paths, &mut totals);
        }
    }

    debug!(
        "betweenness: {} sources on {} threads in {:?}",
        num_nodes,
        num_threads,
        start.elapsed()
    );

    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisits_accumulate() {
        // a - b - c - d
        let indices = vec![vec![1], vec![0, 2], vec![1, 3], vec![2]];

        assert_eq!(paths_from_source(0, &indices), vec![2.0, 2.0, 2.0, 1.0]);
        assert_eq!(paths_from_source(1, &indices), vec![1.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn self_loop_doubles_its_own_counter() {
        // a - b, with a self-loop on b.
        let indices = vec![vec![1], vec![0, 1, 1]];

        // From a: b inherits 1, then a is revisited (+1), then b twice (1 -> 2 -> 4).
        assert_eq!(paths_from_source(0, &indices), vec![2.0, 4.0]);
    }

    #[test]
    fn unreachable_nodes_stay_at_zero() {
        let indices = vec![vec![1], vec![0], vec![]];

        assert_eq!(paths_from_source(0, &indices), vec![2.0, 1.0, 0.0]);
        assert_eq!(compute_betweenness(&indices), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn empty() {
        assert!(compute_betweenness(&[]).is_empty());
        assert!(compute_betweenness_parallel(vec![], 4).is_empty());
    }
}
