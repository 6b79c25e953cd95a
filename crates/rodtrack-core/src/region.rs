//! Marker region model: filled sample plus display outline.
//!
//! Both parts keep a centroid/offset decomposition. Offsets stay
//! floating-point, so repeated re-posing never compounds rounding error;
//! rounding happens only when pixels are sampled.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::pose::{Pose, PosePlacer};
use crate::raster::{fill_polygon, polygon_perimeter, Pixel};

/// Errors returned while defining a marker region.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegionError {
    #[error("region polygon with {vertices} vertices covers no pixels")]
    EmptyRegion { vertices: usize },
}

fn centroid_of(points: &[Point2<f64>]) -> Point2<f64> {
    let n = points.len().max(1) as f64;
    let sum = points
        .iter()
        .fold(Vector2::zeros(), |acc: Vector2<f64>, p| acc + p.coords);
    Point2::from(sum / n)
}

fn offsets_from(points: &[Point2<f64>], centroid: Point2<f64>) -> Vec<Vector2<f64>> {
    points.iter().map(|p| p - centroid).collect()
}

/// Set of (sub-)pixel coordinates currently believed to belong to the marker.
///
/// Invariant: `coords[i] == centroid + offsets[i]` after every mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionSample {
    coords: Vec<Point2<f64>>,
    centroid: Point2<f64>,
    offsets: Vec<Vector2<f64>>,
}

impl RegionSample {
    /// Build a sample from absolute coordinates (`x = col`, `y = row`).
    pub fn from_coords(coords: Vec<Point2<f64>>) -> Result<Self, RegionError> {
        if coords.is_empty() {
            return Err(RegionError::EmptyRegion { vertices: 0 });
        }
        let mut sample = Self {
            coords,
            centroid: Point2::origin(),
            offsets: Vec::new(),
        };
        sample.recenter();
        Ok(sample)
    }

    pub fn from_pixels(pixels: &[Pixel]) -> Result<Self, RegionError> {
        Self::from_coords(pixels.iter().map(|p| p.to_point()).collect())
    }

    /// Recompute centroid and offsets from the current coordinates.
    pub fn recenter(&mut self) -> Point2<f64> {
        self.centroid = centroid_of(&self.coords);
        self.offsets = offsets_from(&self.coords, self.centroid);
        self.centroid
    }

    /// New snapshot with `pose` applied about the current centroid.
    pub fn transformed(&self, pose: &Pose) -> RegionSample {
        let coords = pose.apply(self.centroid, &self.offsets);
        let mut next = Self {
            coords,
            centroid: self.centroid,
            offsets: Vec::new(),
        };
        next.recenter();
        next
    }

    #[inline]
    pub fn coords(&self) -> &[Point2<f64>] {
        &self.coords
    }

    #[inline]
    pub fn centroid(&self) -> Point2<f64> {
        self.centroid
    }

    #[inline]
    pub fn offsets(&self) -> &[Vector2<f64>] {
        &self.offsets
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates rounded to the nearest pixel.
    pub fn pixels(&self) -> Vec<Pixel> {
        self.coords.iter().map(|&p| Pixel::nearest(p)).collect()
    }
}

/// Ordered polygon vertices used for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerOutline {
    vertices: Vec<Point2<f64>>,
    centroid: Point2<f64>,
    offsets: Vec<Vector2<f64>>,
}

impl MarkerOutline {
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        let centroid = centroid_of(&vertices);
        let offsets = offsets_from(&vertices, centroid);
        Self {
            vertices,
            centroid,
            offsets,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn centroid(&self) -> Point2<f64> {
        self.centroid
    }

    #[inline]
    pub fn offsets(&self) -> &[Vector2<f64>] {
        &self.offsets
    }

    /// New outline with `pose` applied about an arbitrary pivot.
    pub fn posed_about(&self, pivot: Point2<f64>, pose: &Pose) -> MarkerOutline {
        let placer = PosePlacer::new(pose, pivot);
        let vertices = self.vertices.iter().map(|v| placer.place(&(v - pivot))).collect();
        MarkerOutline::new(vertices)
    }

    /// Boundary pixels of the outline.
    pub fn perimeter(&self) -> Vec<Pixel> {
        polygon_perimeter(&self.vertices)
    }
}

/// Rotated rectangle anchored at one corner.
///
/// Side `w` runs along `(cos a, −sin a)` in (col, row) terms and side `l`
/// along `(sin a, cos a)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectSpec {
    /// Anchor column.
    pub x: f64,
    /// Anchor row.
    pub y: f64,
    pub w: f64,
    pub l: f64,
    /// Rotation in radians.
    #[serde(default)]
    pub angle: f64,
}

impl RectSpec {
    /// Corners in drawing order.
    pub fn vertices(&self) -> [Point2<f64>; 4] {
        let (s, c) = self.angle.sin_cos();
        let (x, y, w, l) = (self.x, self.y, self.w, self.l);
        [
            Point2::new(x, y),
            Point2::new(x + w * c, y - w * s),
            Point2::new(x + w * c + l * s, y - w * s + l * c),
            Point2::new(x + l * s, y + l * c),
        ]
    }
}

/// Tracked marker: filled sample and outline, always moved together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerRegion {
    pub sample: RegionSample,
    pub outline: MarkerOutline,
}

impl MarkerRegion {
    /// Rasterize the polygon interior into the sample; keep the vertices as outline.
    pub fn define(vertices: &[Point2<f64>]) -> Result<Self, RegionError> {
        let pixels = fill_polygon(vertices);
        if pixels.is_empty() {
            return Err(RegionError::EmptyRegion {
                vertices: vertices.len(),
            });
        }
        Ok(Self {
            sample: RegionSample::from_pixels(&pixels)?,
            outline: MarkerOutline::new(vertices.to_vec()),
        })
    }

    pub fn from_rect(rect: &RectSpec) -> Result<Self, RegionError> {
        Self::define(&rect.vertices())
    }

    /// New snapshot with both parts posed about the sample centroid.
    pub fn transformed(&self, pose: &Pose) -> MarkerRegion {
        MarkerRegion {
            outline: self.outline.posed_about(self.sample.centroid(), pose),
            sample: self.sample.transformed(pose),
        }
    }
}
