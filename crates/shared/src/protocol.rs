use serde::{Deserialize, Serialize};

use crate::domain::ScaleQuery;

/// JSON diagram endpoint: picture plus chord list.
pub const DIAGRAM_PATH: &str = "/api/scale";
/// Image-only endpoint for static embedding.
pub const STATIC_DIAGRAM_PATH: &str = "/scale";

pub const PARAM_ROOT: &str = "root";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_TUNING: &str = "tuning";
pub const PARAM_FRETS: &str = "frets";
pub const PARAM_CHORD: &str = "chord";

/// Success body of [`DIAGRAM_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEnvelope {
    /// Base64 (standard alphabet) encoded image bytes.
    pub picture: String,
    pub chords: Vec<String>,
}

fn query_pairs(query: &ScaleQuery, with_chord: bool) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        (PARAM_ROOT, query.root.as_str().to_string()),
        (PARAM_TYPE, query.scale_type.as_str().to_string()),
        (PARAM_TUNING, query.tuning.to_string()),
        (PARAM_FRETS, query.frets.to_string()),
    ];
    if with_chord {
        if let Some(chord) = query.chord_filter.chord() {
            pairs.push((PARAM_CHORD, chord.to_string()));
        }
    }
    pairs
}

fn encode_pairs(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Query string (without the leading `?`) for [`DIAGRAM_PATH`]. Every value is
/// percent-encoded, spaces as `%20`. `chord` only appears when a filter is set.
pub fn encode_diagram_query(query: &ScaleQuery) -> String {
    encode_pairs(&query_pairs(query, true))
}

/// Query string for [`STATIC_DIAGRAM_PATH`], which takes no chord filter.
pub fn encode_static_query(query: &ScaleQuery) -> String {
    encode_pairs(&query_pairs(query, false))
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
