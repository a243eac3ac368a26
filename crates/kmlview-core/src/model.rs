use crate::geom::{BBox2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `[longitude, latitude]` with an optional trailing altitude.
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    pub fn bbox(&self) -> BBox2 {
        let mut bbox = BBox2::empty();
        match self {
            Geometry::Point { coordinates } => include_position(&mut bbox, coordinates),
            Geometry::LineString { coordinates } => {
                for p in coordinates {
                    include_position(&mut bbox, p);
                }
            }
            Geometry::Polygon { coordinates } => {
                for p in coordinates.iter().flatten() {
                    include_position(&mut bbox, p);
                }
            }
            Geometry::GeometryCollection { geometries } => {
                for g in geometries {
                    bbox = bbox.union(&g.bbox());
                }
            }
        }
        bbox
    }
}

fn include_position(bbox: &mut BBox2, position: &[f64]) {
    if let Some(p) = Vec2::from_position(position) {
        bbox.include_point(p);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn extents(&self) -> Option<BBox2> {
        let bbox = self
            .features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .fold(BBox2::empty(), |acc, g| acc.union(&g.bbox()));
        if bbox.is_empty() { None } else { Some(bbox) }
    }
}
