//! Uniform-grid spatial index over one width's rectangles.
//!
//! Snapshots hold a few hundred to a few thousand rectangles, so a bucketed
//! grid with a linear scan per bucket is plenty; the index only has to answer
//! "which rectangles intersect this one" without an O(n^2) full cross product.

use reflow_core::Rectangle;

const CELL: f64 = 256.0;

#[derive(Debug)]
pub struct SpatialIndex {
    rects: Vec<Rectangle>,
    cells: hashbrown::HashMap<(i64, i64), Vec<usize>, rustc_hash::FxBuildHasher>,
    /// Finite extent of the whole set. Cell coordinates are clamped to this on
    /// both insert and query, so the unbounded-bottom root still shares a cell
    /// with everything below its visible extent; the pairwise `intersects`
    /// check does the exact filtering.
    max_cell_x: i64,
    max_cell_y: i64,
}

impl SpatialIndex {
    pub fn build(rects: &[Rectangle]) -> Self {
        let mut max_x: f64 = 0.0;
        let mut max_y: f64 = 0.0;
        for rect in rects {
            if rect.max_x.is_finite() {
                max_x = max_x.max(rect.max_x);
            }
            if rect.max_y.is_finite() {
                max_y = max_y.max(rect.max_y);
            }
        }
        let mut index = Self {
            rects: rects.to_vec(),
            cells: hashbrown::HashMap::default(),
            max_cell_x: (max_x / CELL).floor() as i64,
            max_cell_y: (max_y / CELL).floor() as i64,
        };
        for (i, rect) in rects.iter().enumerate() {
            for cell in index.cells_of(rect) {
                index.cells.entry(cell).or_default().push(i);
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Indices of all rectangles intersecting `rect`, excluding `exclude`,
    /// ascending and without duplicates.
    pub fn intersecting(&self, rect: &Rectangle, exclude: Option<usize>) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for cell in self.cells_of(rect) {
            let Some(bucket) = self.cells.get(&cell) else {
                continue;
            };
            for &i in bucket {
                if Some(i) == exclude {
                    continue;
                }
                if self.rects[i].intersects(rect) {
                    out.push(i);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    fn cells_of(&self, rect: &Rectangle) -> Vec<(i64, i64)> {
        let xs = span(rect.min_x, rect.max_x, self.max_cell_x);
        let ys = span(rect.min_y, rect.max_y, self.max_cell_y);
        let mut out = Vec::with_capacity((xs.len() * ys.len()).max(1));
        for y in ys {
            for x in &xs {
                out.push((*x, y));
            }
        }
        out
    }
}

fn span(min: f64, max: f64, clamp: i64) -> Vec<i64> {
    let lo = cell_coord(min, clamp);
    let hi = cell_coord(max, clamp).max(lo);
    (lo..=hi).collect()
}

fn cell_coord(value: f64, clamp: i64) -> i64 {
    if value.is_nan() {
        return 0;
    }
    let cell = (value / CELL).floor();
    let cell = if cell.is_finite() { cell as i64 } else { clamp };
    cell.clamp(-clamp - 1, clamp)
}
