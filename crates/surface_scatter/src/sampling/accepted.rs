//! Append-only set of accepted samples with minimum-distance queries.
use std::f32::consts::SQRT_2;
use std::iter;

use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::geometry::Bounds;

/// Largest neighbor grid allocated before falling back to a linear scan.
///
/// Each cell costs one `u32`, so the cap bounds the up-front allocation to 16 MiB.
const MAX_GRID_CELLS: usize = 1 << 22;

/// End of a cell chain.
const NO_POINT: u32 = u32::MAX;

/// Strategy used to find accepted samples near a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeighborSearch {
    /// Compare against every accepted sample. O(n) per query.
    #[default]
    Linear,
    /// Bucket samples in a horizontal grid with cell size `radius / sqrt(2)` and only
    /// compare against the surrounding 5x5 cells.
    Grid,
}

/// Accepted samples in acceptance order.
///
/// Points are never removed during a run. Indices returned by [`AcceptedPoints::push`]
/// stay valid until [`AcceptedPoints::clear`].
#[derive(Debug, Clone, Default)]
pub struct AcceptedPoints {
    points: Vec<Vec3>,
    grid: Option<NeighborGrid>,
}

impl AcceptedPoints {
    /// Creates an empty set answering queries with a linear scan.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            grid: None,
        }
    }

    /// Creates an empty set using `search`. Grid search buckets the footprint of `bounds`
    /// for queries with a separation of at most `radius`.
    pub fn with_search(search: NeighborSearch, bounds: &Bounds, radius: f32) -> Self {
        let grid = match search {
            NeighborSearch::Linear => None,
            NeighborSearch::Grid => NeighborGrid::new(bounds, radius),
        };
        Self {
            points: Vec::new(),
            grid,
        }
    }

    /// Search strategy actually in use.
    pub fn search(&self) -> NeighborSearch {
        if self.grid.is_some() {
            NeighborSearch::Grid
        } else {
            NeighborSearch::Linear
        }
    }

    /// Appends a sample and returns its index.
    pub fn push(&mut self, point: Vec3) -> usize {
        let index = self.points.len();
        self.points.push(point);
        if let Some(grid) = &mut self.grid {
            if !grid.insert(point, index) {
                warn!(
                    "Neighbor grid is full at {} samples; using linear search.",
                    index
                );
                self.grid = None;
            }
        }
        index
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec3> + '_ {
        self.points.iter()
    }

    pub fn into_vec(self) -> Vec<Vec3> {
        self.points
    }

    /// Removes every sample, keeping the search strategy.
    pub fn clear(&mut self) {
        self.points.clear();
        if let Some(grid) = &mut self.grid {
            grid.clear();
        }
    }

    /// Returns the distance to the closest sample strictly closer than `radius`, if any.
    ///
    /// `radius` must not exceed the radius the grid was built for.
    pub fn closest_within(&self, p: Vec3, radius: f32) -> Option<f32> {
        let radius_squared = radius * radius;
        let closest = match &self.grid {
            Some(grid) => grid
                .neighbors(p)
                .map(|i| self.points[i].distance_squared(p))
                .reduce(f32::min),
            None => self
                .points
                .iter()
                .map(|q| q.distance_squared(p))
                .reduce(f32::min),
        }?;
        (closest < radius_squared).then(|| closest.sqrt())
    }
}

/// Uniform horizontal grid over the bounds footprint.
///
/// Cells hold the newest point index and every point links to the previous point of its
/// cell, so an empty grid costs one `u32` per cell.
#[derive(Debug, Clone)]
struct NeighborGrid {
    origin: Vec2,
    cell_size: f32,
    width: usize,
    depth: usize,
    heads: Vec<u32>,
    next: Vec<u32>,
}

impl NeighborGrid {
    fn new(bounds: &Bounds, radius: f32) -> Option<Self> {
        let cell_size = radius / SQRT_2;
        let size = bounds.size();
        let width = ((size.x / cell_size).ceil() as usize).saturating_add(1);
        let depth = ((size.z / cell_size).ceil() as usize).saturating_add(1);
        let cell_count = width.checked_mul(depth).filter(|&n| n <= MAX_GRID_CELLS);
        let Some(cell_count) = cell_count else {
            warn!(
                "Neighbor grid of {}x{} cells is too large; using linear search.",
                width, depth
            );
            return None;
        };

        let min = bounds.min();
        Some(Self {
            origin: Vec2::new(min.x, min.z),
            cell_size,
            width,
            depth,
            heads: vec![NO_POINT; cell_count],
            next: Vec::new(),
        })
    }

    #[inline]
    fn cell_of(&self, p: Vec3) -> usize {
        let (x, z) = self.coords_of(p);
        z * self.width + x
    }

    #[inline]
    fn coords_of(&self, p: Vec3) -> (usize, usize) {
        let x = ((p.x - self.origin.x) / self.cell_size).floor() as isize;
        let z = ((p.z - self.origin.y) / self.cell_size).floor() as isize;
        (
            x.clamp(0, self.width as isize - 1) as usize,
            z.clamp(0, self.depth as isize - 1) as usize,
        )
    }

    /// Links point `index` into its cell. Returns `false` once indices no longer fit a
    /// `u32` chain.
    fn insert(&mut self, p: Vec3, index: usize) -> bool {
        if index >= NO_POINT as usize || index != self.next.len() {
            return false;
        }
        let cell = self.cell_of(p);
        self.next.push(self.heads[cell]);
        self.heads[cell] = index as u32;
        true
    }

    fn chain(&self, head: u32) -> impl Iterator<Item = usize> + '_ {
        let first = (head != NO_POINT).then_some(head);
        iter::successors(first, move |&i| {
            let next = self.next[i as usize];
            (next != NO_POINT).then_some(next)
        })
        .map(|i| i as usize)
    }

    fn neighbors(&self, p: Vec3) -> impl Iterator<Item = usize> + '_ {
        let (cx, cz) = self.coords_of(p);
        let x_range = cx.saturating_sub(2)..(cx + 3).min(self.width);
        let z_range = cz.saturating_sub(2)..(cz + 3).min(self.depth);
        z_range.flat_map(move |z| {
            x_range
                .clone()
                .flat_map(move |x| self.chain(self.heads[z * self.width + x]))
        })
    }

    fn clear(&mut self) {
        self.heads.fill(NO_POINT);
        self.next.clear();
    }
}
