use crate::error::LoadError;
use crate::model::FeatureCollection;
use crate::report::{Analysis, LineDetail, SummaryCounts};

/// Presentation state: the latest analysis, the latest failure and the two
/// table toggles. Each axis changes only through its own method.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    current: Option<Analysis>,
    last_error: Option<LoadError>,
    summary_visible: bool,
    details_visible: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_data(&self) -> bool {
        self.current.is_some()
    }

    pub fn summary_visible(&self) -> bool {
        self.summary_visible
    }

    pub fn details_visible(&self) -> bool {
        self.details_visible
    }

    pub fn toggle_summary(&mut self) {
        self.summary_visible = !self.summary_visible;
    }

    pub fn toggle_details(&mut self) {
        self.details_visible = !self.details_visible;
    }

    /// Stores a load outcome. A failure keeps the previously loaded analysis.
    pub fn apply(&mut self, outcome: Result<Analysis, LoadError>) {
        match outcome {
            Ok(analysis) => {
                self.current = Some(analysis);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err),
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    /// `None` means nothing has been loaded yet.
    pub fn collection(&self) -> Option<&FeatureCollection> {
        self.current.as_ref().map(|a| &a.collection)
    }

    /// Counts to show, zeros before the first load; `None` when hidden.
    pub fn summary_table(&self) -> Option<SummaryCounts> {
        if !self.summary_visible {
            return None;
        }
        Some(self.current.as_ref().map(|a| a.summary).unwrap_or_default())
    }

    /// Rows to show; `None` when hidden or when there are no line strings.
    pub fn details_table(&self) -> Option<&[LineDetail]> {
        if !self.details_visible {
            return None;
        }
        self.current
            .as_ref()
            .map(|a| a.details.as_slice())
            .filter(|d| !d.is_empty())
    }
}
