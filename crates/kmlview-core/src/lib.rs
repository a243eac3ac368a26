//! Data model, line-length analysis and view state for the KML viewer.

pub mod analysis;
pub mod error;
pub mod geom;
pub mod model;
pub mod report;
pub mod view;
