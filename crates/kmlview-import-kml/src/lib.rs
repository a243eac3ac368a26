//! KML loading: file read, XML parse, tag summary and conversion into the
//! feature collection model.

use kml::types::{Coord, Geometry as KmlGeometry, Placemark};
use kml::Kml;
use kmlview_core::analysis::{line_details, AnalysisConfig};
use kmlview_core::error::LoadError;
use kmlview_core::model::{Feature, FeatureCollection, Geometry, Position};
use kmlview_core::report::{Analysis, SummaryCounts};
use roxmltree::{Document, ParsingOptions};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// A well-formed XML tree borrowed from the file text.
pub struct RawDocument<'input> {
    doc: Document<'input>,
}

impl<'input> RawDocument<'input> {
    pub fn text(&self) -> &'input str {
        self.doc.input_text()
    }
}

pub fn read_kml_text(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| LoadError::Decode {
        message: e.to_string(),
    })?;
    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    debug!(path = %path.display(), bytes = text.len(), "read KML text");
    Ok(text)
}

pub fn parse(text: &str) -> Result<RawDocument<'_>, LoadError> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, opts).map_err(|e| LoadError::Parse {
        message: e.to_string(),
    })?;
    Ok(RawDocument { doc })
}

/// Counts element tags by local name anywhere in the tree. Nesting and context
/// are ignored, so e.g. a `Point` inside a `Style` block is counted too.
pub fn summarize(raw: &RawDocument<'_>) -> SummaryCounts {
    let mut counts = SummaryCounts::default();
    for node in raw.doc.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "Placemark" => counts.placemarks += 1,
            "LineString" => counts.line_strings += 1,
            "Point" => counts.points += 1,
            "Polygon" => counts.polygons += 1,
            "MultiGeometry" => counts.multi_geometries += 1,
            _ => {}
        }
    }
    counts
}

/// Hands the document to the `kml` crate and flattens every Placemark, in
/// document order, into one feature.
pub fn convert(raw: &RawDocument<'_>) -> Result<FeatureCollection, LoadError> {
    let kml = raw.text().parse::<Kml>().map_err(|e| LoadError::Convert {
        message: e.to_string(),
    })?;
    let mut features = Vec::new();
    walk(&kml, &mut features);
    debug!(features = features.len(), "converted KML placemarks");
    Ok(FeatureCollection { features })
}

pub fn analyze(text: &str, cfg: &AnalysisConfig) -> Result<Analysis, LoadError> {
    let raw = parse(text)?;
    let collection = convert(&raw)?;
    let summary = summarize(&raw);
    let details = line_details(&collection, cfg);
    info!(
        placemarks = summary.placemarks,
        features = collection.features.len(),
        line_strings = details.len(),
        "analyzed KML"
    );
    Ok(Analysis {
        collection,
        summary,
        details,
    })
}

pub fn load_kml(path: &Path, cfg: &AnalysisConfig) -> Result<Analysis, LoadError> {
    let text = read_kml_text(path)?;
    analyze(&text, cfg)
}

fn walk(node: &Kml, out: &mut Vec<Feature>) {
    match node {
        Kml::KmlDocument(doc) => {
            for element in &doc.elements {
                walk(element, out);
            }
        }
        Kml::Document { elements, .. } => {
            for element in elements {
                walk(element, out);
            }
        }
        Kml::Folder(folder) => {
            for element in &folder.elements {
                walk(element, out);
            }
        }
        Kml::Placemark(placemark) => out.push(placemark_feature(placemark)),
        _ => {}
    }
}

fn placemark_feature(placemark: &Placemark) -> Feature {
    let mut properties = BTreeMap::new();
    if let Some(name) = &placemark.name {
        properties.insert("name".to_string(), name.clone());
    }
    if let Some(description) = &placemark.description {
        properties.insert("description".to_string(), description.clone());
    }
    Feature {
        id: placemark.attrs.get("id").cloned(),
        geometry: placemark.geometry.as_ref().and_then(convert_geometry),
        properties,
    }
}

fn convert_geometry(geometry: &KmlGeometry) -> Option<Geometry> {
    match geometry {
        KmlGeometry::Point(point) => Some(Geometry::Point {
            coordinates: position(&point.coord),
        }),
        KmlGeometry::LineString(line) => Some(Geometry::LineString {
            coordinates: line.coords.iter().map(position).collect(),
        }),
        KmlGeometry::LinearRing(ring) => Some(Geometry::LineString {
            coordinates: ring.coords.iter().map(position).collect(),
        }),
        KmlGeometry::Polygon(polygon) => {
            let rings = std::iter::once(&polygon.outer)
                .chain(polygon.inner.iter())
                .map(|ring| ring.coords.iter().map(position).collect())
                .collect();
            Some(Geometry::Polygon { coordinates: rings })
        }
        KmlGeometry::MultiGeometry(multi) => {
            let mut members = Vec::new();
            flatten_members(&multi.geometries, &mut members);
            match members.len() {
                0 => None,
                1 => members.pop(),
                _ => Some(Geometry::GeometryCollection { geometries: members }),
            }
        }
        _ => None,
    }
}

/// Nested MultiGeometries contribute their own members, never a nested collection.
fn flatten_members(geometries: &[KmlGeometry], out: &mut Vec<Geometry>) {
    for geometry in geometries {
        match geometry {
            KmlGeometry::MultiGeometry(inner) => flatten_members(&inner.geometries, out),
            other => out.extend(convert_geometry(other)),
        }
    }
}

fn position(coord: &Coord) -> Position {
    match coord.z {
        Some(z) => vec![coord.x, coord.y, z],
        None => vec![coord.x, coord.y],
    }
}
