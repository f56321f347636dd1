use shopit_model::Transcript;

use super::{Artifact, Selector, Widget, extract, render};
use crate::payload::Ingredient;

const DEFAULT_TITLE: &str = "Artifacts";

/// One row of the artifact list used for manual selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelEntry {
    /// Call id of the artifact.
    pub call_id: String,
    /// Display label.
    pub label: String,
    /// Whether this row is the active artifact.
    pub selected: bool,
}

/// State of the artifacts side panel.
///
/// Call [`ArtifactsPanel::update`] with every transcript snapshot. Each
/// update re-derives the list and re-applies the snap rule, so any
/// transcript change, streamed text included, resets a manual selection
/// to the newest artifact.
#[derive(Clone, Debug, Default)]
pub struct ArtifactsPanel {
    artifacts: Vec<Artifact>,
    selector: Selector,
    list_open: bool,
    minimized: bool,
}

impl ArtifactsPanel {
    /// Creates an empty, hidden panel.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derives the artifacts from `transcript`.
    ///
    /// Returns `true` if the artifact list or the selection changed.
    pub fn update(&mut self, transcript: &Transcript) -> bool {
        let artifacts = extract(transcript);
        let list_changed = artifacts != self.artifacts;
        if list_changed {
            debug!(
                "artifact list changed: {} -> {}",
                self.artifacts.len(),
                artifacts.len()
            );
            self.artifacts = artifacts;
        }
        let selection_changed = self.selector.sync(&self.artifacts);
        list_changed || selection_changed
    }

    /// Returns the artifacts, newest first.
    #[inline]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Returns the list rows for manual selection.
    pub fn entries(&self) -> Vec<PanelEntry> {
        let selected = self.selector.selected();
        self.artifacts
            .iter()
            .map(|a| PanelEntry {
                call_id: a.call_id().to_owned(),
                label: a.label().to_owned(),
                selected: selected == Some(a.call_id()),
            })
            .collect()
    }

    /// Selects an artifact and closes the list drawer.
    pub fn select(&mut self, call_id: &str) -> bool {
        let selected = self.selector.select(&self.artifacts, call_id);
        if selected {
            self.list_open = false;
        }
        selected
    }

    /// Returns the active artifact.
    #[inline]
    pub fn active(&self) -> Option<&Artifact> {
        self.selector.active(&self.artifacts)
    }

    /// Renders the active artifact.
    pub fn active_widget(&self, cart_items: &[Ingredient]) -> Option<Widget> {
        self.active().map(|artifact| render(artifact, cart_items))
    }

    /// Returns the header title.
    pub fn title(&self) -> &str {
        self.active().map(Artifact::label).unwrap_or(DEFAULT_TITLE)
    }

    /// The panel is hidden entirely while there are no artifacts.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.artifacts.is_empty()
    }

    /// Opens or closes the list drawer.
    #[inline]
    pub fn toggle_list(&mut self) {
        self.list_open = !self.list_open;
    }

    /// Returns `true` if the list drawer is open.
    #[inline]
    pub fn is_list_open(&self) -> bool {
        self.list_open
    }

    /// Collapses the panel into its minimized bar.
    #[inline]
    pub fn minimize(&mut self) {
        self.minimized = true;
    }

    /// Expands a minimized panel.
    #[inline]
    pub fn expand(&mut self) {
        self.minimized = false;
    }

    /// Returns `true` if the panel is minimized.
    #[inline]
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}
