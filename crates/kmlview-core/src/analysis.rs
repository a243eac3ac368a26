use crate::geom::polyline_length;
use crate::model::{FeatureCollection, Geometry};
use crate::report::LineDetail;

#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Also report LineStrings that sit inside a GeometryCollection
    /// (a Placemark with a MultiGeometry of several members).
    pub descend_into_collections: bool,
}

pub struct Analyzer {
    cfg: AnalysisConfig,
}

impl Analyzer {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    /// One record per LineString, in feature order. Lengths are planar sums on
    /// raw lon/lat degrees, so they only approximate distance over small extents.
    pub fn line_details(&self, collection: &FeatureCollection) -> Vec<LineDetail> {
        let mut details = Vec::new();
        for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
            self.collect(geometry, &mut details);
        }
        details
    }

    fn collect(&self, geometry: &Geometry, out: &mut Vec<LineDetail>) {
        match geometry {
            Geometry::LineString { coordinates } => out.push(LineDetail {
                kind: geometry.type_name().to_string(),
                length: polyline_length(coordinates),
                coordinates: coordinates.clone(),
            }),
            Geometry::GeometryCollection { geometries } if self.cfg.descend_into_collections => {
                for g in geometries {
                    self.collect(g, out);
                }
            }
            _ => {}
        }
    }
}

pub fn line_details(collection: &FeatureCollection, cfg: &AnalysisConfig) -> Vec<LineDetail> {
    Analyzer::new(cfg.clone()).line_details(collection)
}
