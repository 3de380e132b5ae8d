//! Search results list.
//!
//! Stateless: the caller owns the results and the selected index. The list
//! only decides what to show for them and reports clicks.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use eframe::egui::{self, ScrollArea, Sense};
use serde::{Deserialize, Serialize};

use crate::{FloatbarError, Result};

/// Shown when the list is visible but has nothing in it.
pub const EMPTY_STATE_TEXT: &str = "No results found";

/// Default height cap as a fraction of the screen height (60vh).
const DEFAULT_MAX_HEIGHT_FRACTION: f32 = 0.6;

const ROW_HEIGHT: f32 = 40.0;

/// A metadata value: text or a number.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::Number(n) if n.fract() == 0.0 && n.is_finite() => {
                write!(f, "{}", *n as i64)
            }
            MetadataValue::Number(n) => write!(f, "{}", n),
            MetadataValue::Text(s) => f.write_str(s),
        }
    }
}

/// A single entry in a result set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Unique within its result set
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            icon: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// One-line `key: value` rendering of the metadata, in key order.
    pub fn metadata_line(&self) -> Option<String> {
        if self.metadata.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .metadata
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect();
        Some(parts.join(" · "))
    }
}

/// Parse a JSON array of results, rejecting duplicate ids.
pub fn parse_results(json: &str) -> Result<Vec<SearchResult>> {
    let results: Vec<SearchResult> = serde_json::from_str(json)
        .map_err(|e| FloatbarError::Results(format!("Failed to parse results: {}", e)))?;

    let mut seen = HashSet::new();
    for result in &results {
        if !seen.insert(result.id.as_str()) {
            return Err(FloatbarError::Results(format!(
                "Duplicate result id: {}",
                result.id
            )));
        }
    }
    Ok(results)
}

/// Load a result fixture file.
pub fn load_results(path: &Path) -> Result<Vec<SearchResult>> {
    let text = std::fs::read_to_string(path)?;
    let results = parse_results(&text)?;
    tracing::info!("Loaded {} results from {:?}", results.len(), path);
    Ok(results)
}

/// One rendered row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRow<'a> {
    pub index: usize,
    pub result: &'a SearchResult,
    pub selected: bool,
}

/// What the list renders for a given input.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsProjection<'a> {
    /// Nothing at all, not even a hidden surface
    Hidden,
    /// A single empty-state indicator
    Empty,
    Rows(Vec<ResultRow<'a>>),
}

/// Map inputs to what is rendered. Out-of-range or negative selections
/// select nothing.
pub fn project(
    results: &[SearchResult],
    is_visible: bool,
    selected_index: Option<isize>,
) -> ResultsProjection<'_> {
    if !is_visible {
        return ResultsProjection::Hidden;
    }
    if results.is_empty() {
        return ResultsProjection::Empty;
    }

    let selected = selected_index.and_then(|i| usize::try_from(i).ok());
    ResultsProjection::Rows(
        results
            .iter()
            .enumerate()
            .map(|(index, result)| ResultRow {
                index,
                result,
                selected: selected == Some(index),
            })
            .collect(),
    )
}

/// Results list widget.
pub struct SearchResultsList<'a> {
    results: &'a [SearchResult],
    is_visible: bool,
    selected_index: Option<isize>,
    max_height: Option<f32>,
    on_result_click: Option<Box<dyn FnMut(&SearchResult) + 'a>>,
}

impl<'a> SearchResultsList<'a> {
    pub fn new(results: &'a [SearchResult], is_visible: bool) -> Self {
        Self {
            results,
            is_visible,
            selected_index: None,
            max_height: None,
            on_result_click: None,
        }
    }

    pub fn selected_index(mut self, index: Option<isize>) -> Self {
        self.selected_index = index;
        self
    }

    pub fn max_height(mut self, height: f32) -> Self {
        self.max_height = Some(height);
        self
    }

    pub fn on_result_click(mut self, on_click: impl FnMut(&SearchResult) + 'a) -> Self {
        self.on_result_click = Some(Box::new(on_click));
        self
    }

    pub fn projection(&self) -> ResultsProjection<'a> {
        project(self.results, self.is_visible, self.selected_index)
    }

    /// Report a click on the row at `index`. Returns false when there is no
    /// such row on screen.
    pub fn click(&mut self, index: usize) -> bool {
        if !self.is_visible {
            return false;
        }
        let Some(result) = self.results.get(index) else {
            return false;
        };
        if let Some(on_click) = self.on_result_click.as_mut() {
            on_click(result);
        }
        true
    }

    /// Display the list.
    pub fn show(mut self, ui: &mut egui::Ui) {
        let rows = match self.projection() {
            ResultsProjection::Hidden => return,
            ResultsProjection::Empty => {
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.weak(EMPTY_STATE_TEXT);
                    ui.add_space(8.0);
                });
                return;
            }
            ResultsProjection::Rows(rows) => rows,
        };

        let max_height = self
            .max_height
            .unwrap_or_else(|| ui.ctx().screen_rect().height() * DEFAULT_MAX_HEIGHT_FRACTION);
        let mut clicked_index = None;

        ScrollArea::vertical()
            .max_height(max_height)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for row in &rows {
                    let response = ui.horizontal(|ui| {
                        ui.set_min_height(ROW_HEIGHT);
                        if row.selected {
                            let rect = ui.available_rect_before_wrap();
                            ui.painter().rect_filled(
                                rect,
                                0.0,
                                ui.visuals().selection.bg_fill,
                            );
                        }

                        if row.result.icon.is_some() {
                            ui.weak("▲");
                        }

                        ui.vertical(|ui| {
                            ui.strong(&row.result.title);
                            if let Some(description) = &row.result.description {
                                ui.weak(description);
                            }
                            if let Some(metadata) = row.result.metadata_line() {
                                ui.small(metadata);
                            }
                        });
                    });

                    let id = egui::Id::new(("result", row.result.id.as_str()));
                    if ui.interact(response.response.rect, id, Sense::click()).clicked() {
                        clicked_index = Some(row.index);
                    }
                }
            });

        if let Some(index) = clicked_index {
            self.click(index);
        }
    }
}
