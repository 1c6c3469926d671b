//! Tier cache - memoized child splits of search areas.
//!
//! Sibling search branches (a face next to a volume, an edge next to a
//! face, ...) keep asking for the same split of the same quadrant range.
//! Each level has a small ring of recent splits keyed by the range's
//! sequence and first index; a miss overwrites the oldest entry.
//!
//! ```text
//!   level 3 ring:  [ key | bounds ] [ key | bounds ] ... (next -> oldest)
//! ```

use crate::connectivity::TreeId;
use crate::dim::Dim;
use crate::quadrant::{split_by_child, ChildBounds, Quadrant, MAX_CHILD_BOUNDS};

/// Quadrant sequence an index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum SeqId {
  Local(TreeId),
  Ghost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TierKey {
  seq: SeqId,
  first: usize,
}

#[derive(Clone, Copy, Debug)]
struct Tier {
  key: Option<TierKey>,
  bounds: ChildBounds,
}

#[derive(Clone, Debug)]
struct TierRing {
  next: usize,
  tiers: Vec<Tier>,
}

#[derive(Clone, Debug)]
pub(crate) struct TierCache {
  rings: Vec<TierRing>,
  hits: usize,
  misses: usize,
}

impl TierCache {
  /// One ring per level below `QMAX_LEVEL`; rings are twice as large when
  /// ghost ranges compete with local ones.
  pub fn new<D: Dim>(num_ranks: usize) -> Self {
    let capacity = if num_ranks == 1 { D::CHILDREN } else { 2 * D::CHILDREN };
    let ring = TierRing {
      next: 0,
      tiers: vec![
        Tier {
          key: None,
          bounds: [0; MAX_CHILD_BOUNDS],
        };
        capacity
      ],
    };
    Self {
      rings: vec![ring; D::QMAX_LEVEL as usize],
      hits: 0,
      misses: 0,
    }
  }

  /// Child bounds of `view` (the range starting at `first` in `seq`) split
  /// at `level`, shifted by `first`.
  pub fn split<D: Dim>(&mut self, seq: SeqId, first: usize, view: &[Quadrant<D>], level: usize) -> ChildBounds {
    if view.is_empty() {
      return [first; MAX_CHILD_BOUNDS];
    }
    let compute = |view: &[Quadrant<D>]| {
      let mut bounds = split_by_child(view, level as u8);
      for b in bounds.iter_mut() {
        *b += first;
      }
      bounds
    };

    let Some(ring) = self.rings.get_mut(level) else {
      self.misses += 1;
      return compute(view);
    };
    let key = TierKey { seq, first };
    let limit = ring.tiers.len();

    for i in 0..limit {
      match ring.tiers[i].key {
        None => {
          debug_assert_eq!(ring.next, i);
          let bounds = compute(view);
          ring.tiers[i] = Tier { key: Some(key), bounds };
          ring.next = (i + 1) % limit;
          self.misses += 1;
          return bounds;
        }
        Some(k) if k == key => {
          self.hits += 1;
          return ring.tiers[i].bounds;
        }
        Some(_) => {}
      }
    }

    let bounds = compute(view);
    ring.tiers[ring.next] = Tier { key: Some(key), bounds };
    ring.next = (ring.next + 1) % limit;
    self.misses += 1;
    bounds
  }

  #[cfg_attr(not(any(test, feature = "tracing")), allow(dead_code))]
  pub fn hits(&self) -> usize {
    self.hits
  }

  #[cfg_attr(not(any(test, feature = "tracing")), allow(dead_code))]
  pub fn misses(&self) -> usize {
    self.misses
  }
}

#[cfg(test)]
#[path = "tier_test.rs"]
mod tier_test;
