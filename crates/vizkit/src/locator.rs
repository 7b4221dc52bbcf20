//! Uniform spatial subdivision of a poly data's cells.
//!
//! The bounding box is split into `2^level` buckets per axis and every
//! triangle is filed under each bucket its bounding box overlaps. Coarser
//! levels are views of the finest grid: a bucket is occupied when any of
//! the finer buckets inside it is.

use std::collections::HashMap;

use crate::math::{Bounds, Vec3};
use crate::polydata::PolyData;

/// Buckets per axis never exceed `2^MAX_LEVEL_LIMIT`.
const MAX_LEVEL_LIMIT: u32 = 8;

#[derive(Debug, Clone)]
pub struct CellLocator {
    data: PolyData,
    number_of_cells_per_node: usize,
    max_level: u32,
    automatic: bool,

    level: u32,
    bounds: Bounds,
    /// Cell ids per finest-level bucket, x fastest.
    buckets: Vec<Vec<usize>>,
    built: bool,
}

impl Default for CellLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl CellLocator {
    pub fn new() -> Self {
        Self {
            data: PolyData::new(),
            number_of_cells_per_node: 25,
            max_level: MAX_LEVEL_LIMIT,
            automatic: true,
            level: 0,
            bounds: Bounds::empty(),
            buckets: Vec::new(),
            built: false,
        }
    }

    /// Replaces the indexed data. The locator must be rebuilt.
    pub fn set_data_set(&mut self, data: PolyData) {
        self.data = data;
        self.built = false;
    }

    pub fn data_set(&self) -> &PolyData {
        &self.data
    }

    /// Target bucket occupancy used to pick the level automatically.
    pub fn set_number_of_cells_per_node(&mut self, n: usize) {
        self.number_of_cells_per_node = n.max(1);
        self.built = false;
    }

    /// Deepest level the locator may build, at most 8.
    pub fn set_max_level(&mut self, level: u32) {
        self.max_level = level.min(MAX_LEVEL_LIMIT);
        self.built = false;
    }

    /// When off, the locator always builds `max_level`.
    pub fn set_automatic(&mut self, automatic: bool) {
        self.automatic = automatic;
        self.built = false;
    }

    /// Level of the built tree; 0 before [`CellLocator::build_locator`].
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Level that keeps buckets near `number_of_cells_per_node` cells.
    fn automatic_level(&self) -> u32 {
        let cells = self.data.triangles.len() as f64;
        let ratio = cells / self.number_of_cells_per_node as f64;
        if ratio <= 1.0 {
            return 0;
        }
        (ratio.ln() / 8f64.ln()).ceil() as u32
    }

    /// Picks the level and files every triangle into the finest buckets.
    pub fn build_locator(&mut self) {
        let wanted = if self.automatic { self.automatic_level() } else { self.max_level };
        self.level = wanted.min(self.max_level);
        self.bounds = padded_bounds(&self.data.bounds());
        let n = divisions(self.level);
        self.buckets = vec![Vec::new(); n * n * n];

        if !self.bounds.is_empty() {
            for (cell, t) in self.data.triangles.iter().enumerate() {
                let mut cell_bounds = Bounds::empty();
                for &i in t {
                    if let Some(p) = self.data.points.get(i as usize) {
                        cell_bounds.add_point(*p);
                    }
                }
                if cell_bounds.is_empty() {
                    continue;
                }
                let b = &cell_bounds.0;
                let lo = self.bucket_of(Vec3::new(b[0], b[2], b[4]), n);
                let hi = self.bucket_of(Vec3::new(b[1], b[3], b[5]), n);
                for k in lo[2]..=hi[2] {
                    for j in lo[1]..=hi[1] {
                        for i in lo[0]..=hi[0] {
                            self.buckets[i + n * (j + n * k)].push(cell);
                        }
                    }
                }
            }
        }
        self.built = true;
        log::debug!(
            "cell locator built: {} cells, level {}, {} non-empty buckets",
            self.data.triangles.len(),
            self.level,
            self.buckets.iter().filter(|b| !b.is_empty()).count()
        );
    }

    /// Bucket index of `p` on an `n`-per-axis grid, clamped to the grid.
    fn bucket_of(&self, p: Vec3, n: usize) -> [usize; 3] {
        let b = &self.bounds.0;
        let axis = |v: f64, lo: f64, hi: f64| {
            let t = ((v - lo) / (hi - lo) * n as f64).floor();
            if t.is_nan() { 0 } else { (t.max(0.0) as usize).min(n - 1) }
        };
        [axis(p.x, b[0], b[1]), axis(p.y, b[2], b[3]), axis(p.z, b[4], b[5])]
    }

    /// Cells filed under the finest bucket containing `p`. Empty when the
    /// locator is not built or `p` lies outside its bounds.
    pub fn cells_near(&self, p: Vec3) -> &[usize] {
        let b = &self.bounds.0;
        let inside = (b[0]..=b[1]).contains(&p.x) && (b[2]..=b[3]).contains(&p.y) && (b[4]..=b[5]).contains(&p.z);
        if !self.built || !inside {
            return &[];
        }
        let n = divisions(self.level);
        let [i, j, k] = self.bucket_of(p, n);
        &self.buckets[i + n * (j + n * k)]
    }

    /// True when the bucket `(i, j, k)` of an `n`-per-axis grid at `level`
    /// holds any cell.
    fn occupied(&self, level: u32, [i, j, k]: [usize; 3]) -> bool {
        let n = divisions(self.level);
        let step = 1 << (self.level - level);
        (k * step..(k + 1) * step).any(|z| {
            (j * step..(j + 1) * step)
                .any(|y| (i * step..(i + 1) * step).any(|x| !self.buckets[x + n * (y + n * z)].is_empty()))
        })
    }

    /// Outline of the occupied buckets at `level` as line cells.
    ///
    /// Only faces between an occupied bucket and an empty one (or the
    /// outside) are drawn. Levels above the built level are clamped to it.
    pub fn generate_representation(&self, level: u32) -> PolyData {
        let mut out = PolyData::new();
        if !self.built || self.bounds.is_empty() {
            return out;
        }
        let level = level.min(self.level);
        let n = divisions(level);
        let occupancy: Vec<bool> = (0..n * n * n)
            .map(|idx| self.occupied(level, [idx % n, (idx / n) % n, idx / (n * n)]))
            .collect();
        let filled = |i: isize, j: isize, k: isize| {
            let range = 0..n as isize;
            range.contains(&i)
                && range.contains(&j)
                && range.contains(&k)
                && occupancy[i as usize + n * (j as usize + n * k as usize)]
        };

        let mut corners: HashMap<[usize; 3], u32> = HashMap::new();
        let mut lines: Vec<[u32; 2]> = Vec::new();
        let b = self.bounds.0;
        let mut corner = |c: [usize; 3], points: &mut Vec<Vec3>| -> u32 {
            *corners.entry(c).or_insert_with(|| {
                points.push(Vec3::new(
                    grid_coord(b[0], b[1], c[0], n),
                    grid_coord(b[2], b[3], c[1], n),
                    grid_coord(b[4], b[5], c[2], n),
                ));
                (points.len() - 1) as u32
            })
        };

        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    if !occupancy[i + n * (j + n * k)] {
                        continue;
                    }
                    let (si, sj, sk) = (i as isize, j as isize, k as isize);
                    for axis in 0..3 {
                        for side in [0usize, 1] {
                            let mut neighbour = [si, sj, sk];
                            neighbour[axis] += if side == 0 { -1 } else { 1 };
                            if filled(neighbour[0], neighbour[1], neighbour[2]) {
                                continue;
                            }
                            for quad_edge in face_edges([i, j, k], axis, side) {
                                let a = corner(quad_edge[0], &mut out.points);
                                let c = corner(quad_edge[1], &mut out.points);
                                lines.push(if a < c { [a, c] } else { [c, a] });
                            }
                        }
                    }
                }
            }
        }
        lines.sort_unstable();
        lines.dedup();
        out.lines = lines;
        out
    }
}

fn divisions(level: u32) -> usize {
    1 << level
}

/// Coordinate of grid line `c` of `n` between `lo` and `hi`, exact at both ends.
fn grid_coord(lo: f64, hi: f64, c: usize, n: usize) -> f64 {
    if c >= n { hi } else { lo + (hi - lo) * c as f64 / n as f64 }
}

/// Data bounds with flat axes opened up so every axis has a positive span.
fn padded_bounds(bounds: &Bounds) -> Bounds {
    if bounds.is_empty() {
        return *bounds;
    }
    let mut b = bounds.0;
    let pad = bounds.diagonal_length().max(1.0) * 1e-3;
    for axis in 0..3 {
        if b[2 * axis + 1] - b[2 * axis] <= 0.0 {
            b[2 * axis] -= pad;
            b[2 * axis + 1] += pad;
        }
    }
    Bounds(b)
}

/// The four grid-corner edges of face `side` (0 = low, 1 = high) of bucket
/// `cell`, normal to `axis`.
fn face_edges(cell: [usize; 3], axis: usize, side: usize) -> [[[usize; 3]; 2]; 4] {
    let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
    let at = |du: usize, dv: usize| {
        let mut c = cell;
        c[axis] += side;
        c[u] += du;
        c[v] += dv;
        c
    };
    let quad = [at(0, 0), at(1, 0), at(1, 1), at(0, 1)];
    [[quad[0], quad[1]], [quad[1], quad[2]], [quad[2], quad[3]], [quad[3], quad[0]]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polydata::SphereSource;

    fn sphere(res: u32) -> PolyData {
        SphereSource { theta_resolution: res, phi_resolution: res, ..SphereSource::default() }.output()
    }

    fn built(data: PolyData, level: Option<u32>) -> CellLocator {
        let mut locator = CellLocator::new();
        locator.set_data_set(data);
        if let Some(level) = level {
            locator.set_automatic(false);
            locator.set_max_level(level);
        }
        locator.build_locator();
        locator
    }

    /// Two small triangles, one near (0,0,0), the other near `far`.
    fn two_corners(far: Vec3) -> PolyData {
        let mut pd = PolyData::new();
        pd.points = vec![
            Vec3::ZERO,
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(0.0, 0.1, 0.0),
            far,
            far - Vec3::new(0.1, 0.0, 0.0),
            far - Vec3::new(0.0, 0.1, 0.0),
        ];
        pd.triangles = vec![[0, 1, 2], [3, 4, 5]];
        pd
    }

    #[test]
    fn automatic_level_follows_cell_count() {
        let coarse = sphere(10);
        assert_eq!(coarse.triangles.len(), 160);
        assert_eq!(built(coarse.clone(), None).level(), 1);

        let fine = sphere(64);
        assert_eq!(fine.triangles.len(), 7936);
        assert_eq!(built(fine, None).level(), 3);

        let mut sparse = CellLocator::new();
        sparse.set_data_set(coarse);
        sparse.set_number_of_cells_per_node(500);
        sparse.build_locator();
        assert_eq!(sparse.level(), 0);
    }

    #[test]
    fn max_level_caps_the_automatic_level() {
        let mut locator = CellLocator::new();
        locator.set_data_set(sphere(64));
        locator.set_max_level(2);
        locator.build_locator();
        assert_eq!(locator.level(), 2);
    }

    #[test]
    fn level_zero_is_the_bounding_box() {
        let data = sphere(10);
        let bounds = data.bounds();
        let pd = built(data, None).generate_representation(0);
        assert_eq!(pd.points.len(), 8);
        assert_eq!(pd.lines.len(), 12);
        assert!(pd.triangles.is_empty());
        assert_eq!(pd.bounds(), bounds);
    }

    #[test]
    fn full_shell_outlines_only_the_outside() {
        // Every octant of a sphere holds some of its surface.
        let pd = built(sphere(10), None).generate_representation(1);
        assert_eq!(pd.points.len(), 26);
        assert_eq!(pd.lines.len(), 48);
    }

    #[test]
    fn diagonal_buckets_share_one_corner() {
        let locator = built(two_corners(Vec3::new(1.0, 1.0, 1.0)), Some(1));
        let pd = locator.generate_representation(1);
        assert_eq!(pd.points.len(), 15);
        assert_eq!(pd.lines.len(), 24);
    }

    #[test]
    fn adjacent_buckets_merge_into_one_box() {
        let mut data = two_corners(Vec3::new(1.0, 0.1, 0.0));
        // Stretch the bounds so the second triangle lands in bucket (1, 0, 0).
        data.points.push(Vec3::new(0.0, 1.0, 1.0));
        let locator = built(data, Some(1));
        let pd = locator.generate_representation(1);
        assert_eq!(pd.points.len(), 12);
        assert_eq!(pd.lines.len(), 20);
    }

    #[test]
    fn requested_level_is_clamped_to_the_built_one() {
        let locator = built(sphere(10), None);
        assert_eq!(locator.generate_representation(5), locator.generate_representation(1));
    }

    #[test]
    fn cells_are_found_by_position() {
        let locator = built(two_corners(Vec3::new(1.0, 1.0, 1.0)), Some(2));
        assert_eq!(locator.cells_near(Vec3::new(0.01, 0.01, 0.0)), &[0]);
        assert_eq!(locator.cells_near(Vec3::new(0.99, 0.99, 1.0)), &[1]);
        assert!(locator.cells_near(Vec3::new(0.5, 0.5, 0.5)).is_empty());
        assert!(locator.cells_near(Vec3::new(5.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn unbuilt_locator_has_no_representation() {
        let mut locator = CellLocator::new();
        locator.set_data_set(sphere(10));
        assert!(!locator.is_built());
        assert!(locator.generate_representation(0).is_empty());
    }
}
