use super::Artifact;

/// Tracks the active artifact over a changing artifact list.
///
/// The selector snaps to the newest artifact every time the list is
/// recomputed, overriding a manual selection. A manual selection lasts
/// until the next recomputation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    selected: Option<String>,
}

impl Selector {
    /// Creates a selector with nothing selected.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected call id.
    #[inline]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Applies the snap rule for a freshly derived list.
    ///
    /// `artifacts` must be ordered newest first. Returns `true` if the
    /// selection changed.
    pub fn sync(&mut self, artifacts: &[Artifact]) -> bool {
        let newest = artifacts.first().map(Artifact::call_id);
        if self.selected.as_deref() == newest {
            return false;
        }
        trace!("selection snaps to {newest:?}");
        self.selected = newest.map(ToOwned::to_owned);
        true
    }

    /// Selects an artifact by call id.
    ///
    /// Unknown ids are ignored and `false` is returned.
    pub fn select(&mut self, artifacts: &[Artifact], call_id: &str) -> bool {
        if !artifacts.iter().any(|a| a.call_id() == call_id) {
            debug!("ignoring selection of unknown artifact {call_id}");
            return false;
        }
        self.selected = Some(call_id.to_owned());
        true
    }

    /// Resolves the selected artifact in `artifacts`.
    pub fn active<'a>(&self, artifacts: &'a [Artifact]) -> Option<&'a Artifact> {
        let selected = self.selected.as_deref()?;
        artifacts.iter().find(|a| a.call_id() == selected)
    }
}
