//! Polygon and line rasterization on the integer pixel grid.
//!
//! Vertices are `Point2<f64>` with `x = col` and `y = row`.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub row: i64,
    pub col: i64,
}

impl Pixel {
    #[inline]
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Nearest pixel to a sub-pixel point.
    #[inline]
    pub fn nearest(p: Point2<f64>) -> Self {
        Self {
            row: p.y.round() as i64,
            col: p.x.round() as i64,
        }
    }

    #[inline]
    pub fn to_point(self) -> Point2<f64> {
        Point2::new(self.col as f64, self.row as f64)
    }
}

/// Pixels whose centers lie inside the polygon (even-odd crossing test).
///
/// The test is half-open: a center exactly on a left or top edge counts as
/// inside, one on a right or bottom edge does not. Output is row-major:
/// ascending row, then ascending column.
pub fn fill_polygon(vertices: &[Point2<f64>]) -> Vec<Pixel> {
    if vertices.len() < 3 || vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
        return Vec::new();
    }

    let (mut min_r, mut max_r) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_c, mut max_c) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in vertices {
        min_r = min_r.min(v.y);
        max_r = max_r.max(v.y);
        min_c = min_c.min(v.x);
        max_c = max_c.max(v.x);
    }

    let mut out = Vec::new();
    for row in min_r.ceil() as i64..=max_r.floor() as i64 {
        for col in min_c.ceil() as i64..=max_c.floor() as i64 {
            if point_in_polygon(vertices, col as f64, row as f64) {
                out.push(Pixel { row, col });
            }
        }
    }
    out
}

/// Closed, ordered boundary of the polygon through its rounded vertices.
pub fn polygon_perimeter(vertices: &[Point2<f64>]) -> Vec<Pixel> {
    let corners: Vec<Pixel> = vertices.iter().map(|&v| Pixel::nearest(v)).collect();
    let mut out: Vec<Pixel> = Vec::new();
    for (k, &a) in corners.iter().enumerate() {
        let b = corners[(k + 1) % corners.len()];
        for p in line(a, b) {
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
    }
    // The closing segment ends on the first vertex.
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// Bresenham line from `a` to `b`, both endpoints included.
pub fn line(a: Pixel, b: Pixel) -> Vec<Pixel> {
    let dr = (b.row - a.row).abs();
    let dc = (b.col - a.col).abs();
    let sr = if b.row >= a.row { 1 } else { -1 };
    let sc = if b.col >= a.col { 1 } else { -1 };

    let mut out = Vec::with_capacity((dr.max(dc) + 1) as usize);
    let (mut r, mut c) = (a.row, a.col);
    let mut err = dc - dr;
    loop {
        out.push(Pixel { row: r, col: c });
        if r == b.row && c == b.col {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dr {
            err -= dr;
            c += sc;
        }
        if e2 < dc {
            err += dc;
            r += sr;
        }
    }
    out
}

fn point_in_polygon(vertices: &[Point2<f64>], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > y) != (vj.y > y) && x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
