use serde::{Deserialize, Serialize};

/// A planar point. `x` is longitude and `y` latitude when built from a position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Reads the first two ordinates of a `[lon, lat, (alt)]` position.
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [x, y, ..] => Some(Self::new(*x, *y)),
            _ => None,
        }
    }

    /// Straight-line distance on raw coordinate values, no earth curvature.
    pub fn planar_distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Lon/lat extents. Starts inverted, so the first included point sets both corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min = Vec2::new(self.min.x.min(point.x), self.min.y.min(point.y));
        self.max = Vec2::new(self.max.x.max(point.x), self.max.y.max(point.y));
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        if !other.is_empty() {
            out.include_point(other.min);
            out.include_point(other.max);
        }
        out
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.min.x + self.max.x) * 0.5, (self.min.y + self.max.y) * 0.5)
    }

    /// Width and height in degrees; zero for an empty box.
    pub fn span(&self) -> Vec2 {
        if self.is_empty() {
            return Vec2::new(0.0, 0.0);
        }
        Vec2::new(self.max.x - self.min.x, self.max.y - self.min.y)
    }
}

/// Sum of planar distances between consecutive positions.
///
/// Positions with fewer than two ordinates are skipped. Fewer than two usable
/// positions yield `0.0`.
pub fn polyline_length(positions: &[Vec<f64>]) -> f64 {
    let points: Vec<Vec2> = positions
        .iter()
        .filter_map(|p| Vec2::from_position(p))
        .collect();
    points
        .windows(2)
        .fold(0.0, |acc, w| acc + w[0].planar_distance(w[1]))
}
