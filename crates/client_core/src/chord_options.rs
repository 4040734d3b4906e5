use shared::domain::{ChordFilter, NO_CHORD_FILTER};

/// Option list and selection of the chord selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordOptions {
    options: Vec<String>,
    selected: ChordFilter,
}

impl Default for ChordOptions {
    fn default() -> Self {
        Self {
            options: vec![NO_CHORD_FILTER.to_string()],
            selected: ChordFilter::Any,
        }
    }
}

impl ChordOptions {
    /// Always starts with the sentinel.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> &ChordFilter {
        &self.selected
    }

    pub fn select(&mut self, filter: ChordFilter) {
        self.selected = filter;
    }

    /// Rebuilds the options from `chords`, keeping backend order. Returns the
    /// previous filter when it is not valid for the new list and was reset.
    pub fn apply(&mut self, chords: &[String]) -> Option<String> {
        self.options.clear();
        self.options.push(NO_CHORD_FILTER.to_string());
        self.options.extend(chords.iter().cloned());

        let stale = match &self.selected {
            ChordFilter::Chord(name) if !chords.contains(name) => Some(name.clone()),
            _ => None,
        };
        if stale.is_some() {
            self.selected = ChordFilter::Any;
        }
        stale
    }
}

#[cfg(test)]
#[path = "tests/chord_options_tests.rs"]
mod tests;
