use kmlview_core::analysis::AnalysisConfig;
use kmlview_core::error::LoadError;
use kmlview_core::model::Geometry;
use kmlview_import_kml::{analyze, convert, parse, summarize};

const SINGLE_LINE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark id="route-1">
      <name>Route</name>
      <LineString>
        <coordinates>0,0 0,3 4,3</coordinates>
      </LineString>
    </Placemark>
  </Document>
</kml>"#;

const MIXED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Folder>
      <name>Stops</name>
      <Placemark>
        <name>A</name>
        <Point><coordinates>1,2,30</coordinates></Point>
      </Placemark>
      <Folder>
        <Placemark>
          <name>Leg 1</name>
          <LineString><coordinates>0,0 3,4</coordinates></LineString>
        </Placemark>
      </Folder>
    </Folder>
    <Placemark>
      <name>Area</name>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing><coordinates>0,0 1,0 1,1 0,1 0,0</coordinates></LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
    <Placemark>
      <name>Combo</name>
      <MultiGeometry>
        <Point><coordinates>5,5</coordinates></Point>
        <LineString><coordinates>5,5 6,5</coordinates></LineString>
      </MultiGeometry>
    </Placemark>
    <Placemark>
      <name>Leg 2</name>
      <LineString><coordinates>10,10 10,12</coordinates></LineString>
    </Placemark>
  </Document>
</kml>"#;

#[test]
fn end_to_end_single_line_string() {
    let analysis = analyze(SINGLE_LINE, &AnalysisConfig::default()).expect("analysis");

    assert_eq!(1, analysis.summary.placemarks);
    assert_eq!(1, analysis.summary.line_strings);
    assert_eq!(0, analysis.summary.points);
    assert_eq!(0, analysis.summary.polygons);
    assert_eq!(0, analysis.summary.multi_geometries);

    assert_eq!(1, analysis.details.len());
    assert_eq!("LineString", analysis.details[0].kind);
    assert_eq!(7.0, analysis.details[0].length);

    let feature = &analysis.collection.features[0];
    assert_eq!(Some("route-1"), feature.id.as_deref());
    assert_eq!(Some("Route"), feature.properties.get("name").map(String::as_str));
}

#[test]
fn counts_every_tag_regardless_of_nesting() {
    let raw = parse(MIXED).expect("well-formed");
    let summary = summarize(&raw);

    assert_eq!(5, summary.placemarks);
    assert_eq!(3, summary.line_strings);
    assert_eq!(2, summary.points);
    assert_eq!(1, summary.polygons);
    assert_eq!(1, summary.multi_geometries);
}

#[test]
fn counts_tags_inside_non_geometry_blocks() {
    let text = r#"<kml><Document>
        <Schema><Point/></Schema>
        <Style id="s"><Placemark/></Style>
        <Placemark><Point><coordinates>1,1</coordinates></Point></Placemark>
    </Document></kml>"#;
    let raw = parse(text).expect("well-formed");
    let summary = summarize(&raw);

    assert_eq!(2, summary.placemarks);
    assert_eq!(2, summary.points);
}

#[test]
fn converts_placemarks_in_document_order() {
    let raw = parse(MIXED).expect("well-formed");
    let collection = convert(&raw).expect("convert");

    let kinds: Vec<_> = collection
        .features
        .iter()
        .map(|f| f.geometry.as_ref().map(Geometry::type_name))
        .collect();
    assert_eq!(
        vec![
            Some("Point"),
            Some("LineString"),
            Some("Polygon"),
            Some("GeometryCollection"),
            Some("LineString"),
        ],
        kinds
    );

    match &collection.features[0].geometry {
        Some(Geometry::Point { coordinates }) => assert_eq!(&vec![1.0, 2.0, 30.0], coordinates),
        other => panic!("expected point, got {other:?}"),
    }
    match &collection.features[2].geometry {
        Some(Geometry::Polygon { coordinates }) => {
            assert_eq!(1, coordinates.len());
            assert_eq!(5, coordinates[0].len());
        }
        other => panic!("expected polygon, got {other:?}"),
    }
}

#[test]
fn details_follow_feature_order_and_skip_collections_by_default() {
    let analysis = analyze(MIXED, &AnalysisConfig::default()).expect("analysis");

    let lengths: Vec<f64> = analysis.details.iter().map(|d| d.length).collect();
    assert_eq!(vec![5.0, 2.0], lengths);
}

#[test]
fn details_can_descend_into_multi_geometry() {
    let cfg = AnalysisConfig {
        descend_into_collections: true,
    };
    let analysis = analyze(MIXED, &cfg).expect("analysis");

    let lengths: Vec<f64> = analysis.details.iter().map(|d| d.length).collect();
    assert_eq!(vec![5.0, 1.0, 2.0], lengths);
}

#[test]
fn single_member_multi_geometry_collapses() {
    let text = r#"<kml><Placemark><MultiGeometry>
        <LineString><coordinates>0,0 3,4</coordinates></LineString>
    </MultiGeometry></Placemark></kml>"#;
    let analysis = analyze(text, &AnalysisConfig::default()).expect("analysis");

    assert_eq!(1, analysis.summary.multi_geometries);
    assert_eq!(1, analysis.details.len());
    assert_eq!(5.0, analysis.details[0].length);
}

#[test]
fn placemark_without_geometry_has_no_details() {
    let text = r#"<kml><Document><Placemark><name>Empty</name></Placemark></Document></kml>"#;
    let analysis = analyze(text, &AnalysisConfig::default()).expect("analysis");

    assert_eq!(1, analysis.summary.placemarks);
    assert_eq!(1, analysis.collection.features.len());
    assert!(analysis.collection.features[0].geometry.is_none());
    assert!(analysis.details.is_empty());
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let err = analyze("<kml><Placemark></kml>", &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "got {err:?}");
    assert_eq!("parse", err.stage());
}

#[test]
fn empty_input_is_a_parse_error() {
    let err = analyze("", &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "got {err:?}");
}

#[test]
fn nested_multi_geometry_is_flattened() {
    let text = r#"<kml><Placemark><MultiGeometry>
        <MultiGeometry>
            <LineString><coordinates>0,0 3,4</coordinates></LineString>
            <Point><coordinates>1,1</coordinates></Point>
        </MultiGeometry>
        <Point><coordinates>2,2</coordinates></Point>
    </MultiGeometry></Placemark></kml>"#;
    let cfg = AnalysisConfig {
        descend_into_collections: true,
    };
    let analysis = analyze(text, &cfg).expect("analysis");

    match &analysis.collection.features[0].geometry {
        Some(Geometry::GeometryCollection { geometries }) => {
            let kinds: Vec<_> = geometries.iter().map(Geometry::type_name).collect();
            assert_eq!(vec!["LineString", "Point", "Point"], kinds);
        }
        other => panic!("expected flat collection, got {other:?}"),
    }
    assert_eq!(2, analysis.summary.multi_geometries);
    assert_eq!(1, analysis.details.len());
    assert_eq!(5.0, analysis.details[0].length);
}

#[test]
fn nested_multi_geometry_with_one_member_collapses() {
    let text = r#"<kml><Placemark><MultiGeometry><MultiGeometry>
        <Point><coordinates>1,1</coordinates></Point>
    </MultiGeometry></MultiGeometry></Placemark></kml>"#;
    let analysis = analyze(text, &AnalysisConfig::default()).expect("analysis");

    assert!(matches!(
        analysis.collection.features[0].geometry,
        Some(Geometry::Point { .. })
    ));
}

#[test]
fn unreadable_coordinates_are_a_convert_error() {
    let text = r#"<kml><Placemark><Point><coordinates>abc,def</coordinates></Point></Placemark></kml>"#;
    let err = analyze(text, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Convert { .. }), "got {err:?}");
    assert_eq!("convert", err.stage());
}

#[test]
fn well_formed_non_kml_is_a_convert_error() {
    let err = analyze("<foo/>", &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Convert { .. }), "got {err:?}");
    assert_eq!("convert", err.stage());
}
