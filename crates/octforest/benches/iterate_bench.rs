//! Traversal benchmarks.
//!
//! Compares the volume-only fast path with a full topology traversal on:
//! - **uniform**: every tree refined to the same level
//! - **shell**: uniform plus one extra level on a spherical shell (hanging
//!   faces and edges everywhere along it)
//! - **brick**: a 2x2x2 brick, so inter-tree faces, edges and corners are hit
//!
//! A last group runs four partitioned ranks serially and through
//! `iterate_ranks`.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec3;
use octforest::{
  iterate, iterate_ranks, BrickConfig, Connectivity, CornerInfo, EdgeInfo, FaceInfo, Forest, Visitor, Visits,
  VolumeInfo, D3,
};

// =============================================================================
// Counting visitor
// =============================================================================

#[derive(Default)]
struct Counter {
  visits: Visits,
  volumes: usize,
  faces: usize,
  edges: usize,
  corners: usize,
}

impl Counter {
  fn new(visits: Visits) -> Self {
    Self {
      visits,
      ..Default::default()
    }
  }

  fn total(&self) -> usize {
    self.volumes + self.faces + self.edges + self.corners
  }
}

impl Visitor<D3> for Counter {
  fn visits(&self) -> Visits {
    self.visits
  }

  fn volume(&mut self, _info: &VolumeInfo<'_, D3>) {
    self.volumes += 1;
  }

  fn face(&mut self, info: &FaceInfo<'_, D3>) {
    self.faces += info.sides.len();
  }

  fn edge(&mut self, info: &EdgeInfo<'_, D3>) {
    self.edges += info.sides.len();
  }

  fn corner(&mut self, info: &CornerInfo<'_, D3>) {
    self.corners += info.sides.len();
  }
}

// =============================================================================
// Forests
// =============================================================================

fn uniform(level: u8) -> Forest<D3> {
  Forest::uniform(Arc::new(Connectivity::unit()), level)
}

/// Uniform forest with the octants crossing a sphere refined once.
fn shell(level: u8) -> Forest<D3> {
  let mut forest = uniform(level);
  let center = DVec3::splat(0.5);
  forest.refine(|_, q| {
    let (lo, hi) = q.unit_bounds();
    let nearest = center.clamp(lo, hi).distance(center);
    let farthest = (lo - center).abs().max((hi - center).abs()).length();
    nearest <= 0.35 && farthest >= 0.35
  });
  forest
}

fn brick(level: u8) -> Forest<D3> {
  let conn = Connectivity::brick(&BrickConfig::new([2, 2, 2])).expect("valid brick");
  Forest::uniform(Arc::new(conn), level)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_volume_vs_full(c: &mut Criterion) {
  let mut group = c.benchmark_group("iterate");
  let cases = [("uniform", uniform(4)), ("shell", shell(4)), ("brick", brick(3))];

  for (name, forest) in &cases {
    group.bench_with_input(BenchmarkId::new("volumes", name), forest, |b, forest| {
      b.iter(|| {
        let mut counter = Counter::new(Visits::NONE.with_volume());
        iterate(black_box(forest), None, &mut counter);
        black_box(counter.total())
      })
    });

    group.bench_with_input(BenchmarkId::new("faces", name), forest, |b, forest| {
      b.iter(|| {
        let mut counter = Counter::new(Visits::NONE.with_face());
        iterate(black_box(forest), None, &mut counter);
        black_box(counter.total())
      })
    });

    group.bench_with_input(BenchmarkId::new("all", name), forest, |b, forest| {
      b.iter(|| {
        let mut counter = Counter::new(Visits::ALL);
        iterate(black_box(forest), None, &mut counter);
        black_box(counter.total())
      })
    });
  }

  group.finish();
}

fn bench_ranks(c: &mut Criterion) {
  let mut group = c.benchmark_group("ranks");
  let views = shell(4).partition(4).expect("non-zero rank count");

  group.bench_function("serial", |b| {
    b.iter(|| {
      let mut total = 0;
      for (forest, ghost) in &views {
        let mut counter = Counter::new(Visits::ALL);
        iterate(forest, Some(ghost), &mut counter);
        total += counter.total();
      }
      black_box(total)
    })
  });

  group.bench_function("parallel", |b| {
    b.iter(|| {
      let runs = iterate_ranks(black_box(&views), |_| Counter::new(Visits::ALL));
      black_box(runs.iter().map(|run| run.visitor.total()).sum::<usize>())
    })
  });

  group.finish();
}

criterion_group!(benches, bench_volume_vs_full, bench_ranks);
criterion_main!(benches);
