use crate::model::{FeatureCollection, Position};
use serde::{Deserialize, Serialize};

/// Element-type counts from a blind tag-name scan of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCounts {
    pub placemarks: usize,
    pub line_strings: usize,
    pub points: usize,
    pub polygons: usize,
    pub multi_geometries: usize,
}

impl SummaryCounts {
    /// `(key, count)` rows in display order.
    pub fn rows(&self) -> [(&'static str, usize); 5] {
        [
            ("placemarks", self.placemarks),
            ("lineStrings", self.line_strings),
            ("points", self.points),
            ("polygons", self.polygons),
            ("multiGeometries", self.multi_geometries),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub length: f64,
    pub coordinates: Vec<Position>,
}

/// Everything derived from one successfully loaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub collection: FeatureCollection,
    pub summary: SummaryCounts,
    pub details: Vec<LineDetail>,
}

/// The machine-readable report written by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub summary: SummaryCounts,
    pub details: &'a [LineDetail],
}

impl Analysis {
    pub fn report(&self) -> AnalysisReport<'_> {
        AnalysisReport {
            summary: self.summary,
            details: &self.details,
        }
    }
}
