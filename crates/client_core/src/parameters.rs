//! Current selection and change notifications.

use std::{fmt, str::FromStr};

use shared::{
    domain::{parse_fret_count, ChordFilter, ScaleQuery},
    error::ValidationError,
};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Root,
    ScaleType,
    Tuning,
    Frets,
    ChordFilter,
}

impl ParameterField {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterField::Root => "root",
            ParameterField::ScaleType => "scale",
            ParameterField::Tuning => "tuning",
            ParameterField::Frets => "frets",
            ParameterField::ChordFilter => "chord",
        }
    }
}

impl FromStr for ParameterField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "root" => Ok(ParameterField::Root),
            "scale" | "type" => Ok(ParameterField::ScaleType),
            "tuning" => Ok(ParameterField::Tuning),
            "frets" => Ok(ParameterField::Frets),
            "chord" => Ok(ParameterField::ChordFilter),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Root, scale, tuning or frets changed: the valid chord set may differ.
    ChordContext,
    /// Only the chord filter (or nothing) changed.
    FilterOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterChange {
    pub query: ScaleQuery,
    pub kind: ChangeKind,
}

pub struct ParameterModel {
    query: ScaleQuery,
    subscriber: Option<mpsc::UnboundedSender<ParameterChange>>,
}

impl ParameterModel {
    pub fn new(initial: ScaleQuery) -> Self {
        Self {
            query: initial,
            subscriber: None,
        }
    }

    /// Single consumer: a new subscription replaces the previous one.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ParameterChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);
        rx
    }

    pub fn current_query(&self) -> ScaleQuery {
        self.query.clone()
    }

    /// Parses and applies one field. On error nothing changes and nothing is
    /// published.
    pub fn update(&mut self, field: ParameterField, value: &str) -> Result<(), ValidationError> {
        let mut next = self.query.clone();
        match field {
            ParameterField::Root => next.root = value.trim().parse()?,
            ParameterField::ScaleType => next.scale_type = value.parse()?,
            ParameterField::Tuning => next.tuning = value.parse()?,
            ParameterField::Frets => next.frets = parse_fret_count(value)?,
            ParameterField::ChordFilter => next.chord_filter = ChordFilter::parse(value),
        }

        let kind = if next.same_chord_context(&self.query) {
            ChangeKind::FilterOnly
        } else {
            ChangeKind::ChordContext
        };
        self.query = next;
        self.publish(ParameterChange {
            query: self.query.clone(),
            kind,
        });
        Ok(())
    }

    /// Clears the filter without notifying. Used when the selector has
    /// already been reset, so no new request is wanted.
    pub fn reset_chord_filter(&mut self) {
        self.query.chord_filter = ChordFilter::Any;
    }

    fn publish(&mut self, change: ParameterChange) {
        let Some(tx) = &self.subscriber else {
            return;
        };
        if tx.send(change).is_err() {
            debug!("parameter subscriber dropped");
            self.subscriber = None;
        }
    }
}

#[cfg(test)]
#[path = "tests/parameters_tests.rs"]
mod tests;
