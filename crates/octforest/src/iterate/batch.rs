//! Parallel traversal of per-rank views.
//!
//! Each rank of a partitioned forest is traversed independently, the way
//! each process would run [`iterate`] on its own slice. Runs are spread over
//! the rayon pool and returned in rank order.

use web_time::Instant;

use rayon::prelude::*;

use super::{iterate, Visitor};
use crate::dim::Dim;
use crate::forest::{Forest, GhostLayer};

/// Result of traversing one rank's view.
#[derive(Debug)]
pub struct RankRun<V> {
  pub rank: usize,
  pub visitor: V,
  pub timing_us: u64,
}

/// Traverse every `(forest, ghost)` view in parallel with a fresh visitor
/// from `make(rank)`.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "iterate::ranks"))]
pub fn iterate_ranks<D, V, F>(views: &[(Forest<D>, GhostLayer<D>)], make: F) -> Vec<RankRun<V>>
where
  D: Dim,
  V: Visitor<D> + Send,
  F: Fn(usize) -> V + Sync,
{
  if views.is_empty() {
    return Vec::new();
  }

  views
    .par_iter()
    .map(|(forest, ghost)| {
      let start = Instant::now();
      let mut visitor = make(forest.rank());
      iterate(forest, Some(ghost), &mut visitor);
      RankRun {
        rank: forest.rank(),
        visitor,
        timing_us: start.elapsed().as_micros() as u64,
      }
    })
    .collect()
}
