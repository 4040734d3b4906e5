use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Selector value meaning "highlight the whole scale, no chord".
pub const NO_CHORD_FILTER: &str = "-";
pub const STANDARD_TUNING: &str = "E A D G B E";
pub const DEFAULT_FRETS: u32 = 12;

macro_rules! pitch_classes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PitchClass {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl PitchClass {
            pub const ALL: [PitchClass; 12] = [$(PitchClass::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(PitchClass::$variant => $name,)+
                }
            }
        }
    };
}

pitch_classes!(
    A => "A",
    ASharp => "A#",
    B => "B",
    C => "C",
    CSharp => "C#",
    D => "D",
    DSharp => "D#",
    E => "E",
    F => "F",
    FSharp => "F#",
    G => "G",
    GSharp => "G#",
);

impl FromStr for PitchClass {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PitchClass::ALL
            .into_iter()
            .find(|note| note.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownNote(value.to_string()))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScaleType {
    #[default]
    #[serde(rename = "minor")]
    Minor,
    #[serde(rename = "major")]
    Major,
    #[serde(rename = "harmonic minor")]
    HarmonicMinor,
}

impl ScaleType {
    pub const ALL: [ScaleType; 3] = [ScaleType::Minor, ScaleType::Major, ScaleType::HarmonicMinor];

    /// Name as understood by the diagram backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleType::Minor => "minor",
            ScaleType::Major => "major",
            ScaleType::HarmonicMinor => "harmonic minor",
        }
    }
}

impl FromStr for ScaleType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "minor" => Ok(ScaleType::Minor),
            "major" => Ok(ScaleType::Major),
            "harmonic minor" | "harmonic-minor" | "harmonic_minor" => Ok(ScaleType::HarmonicMinor),
            other => Err(ValidationError::UnknownScaleType(other.to_string())),
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open-string pitch classes, one per string, in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tuning(Vec<PitchClass>);

impl Tuning {
    pub fn new(strings: Vec<PitchClass>) -> Result<Self, ValidationError> {
        if strings.is_empty() {
            return Err(ValidationError::EmptyTuning);
        }
        Ok(Self(strings))
    }

    pub fn standard() -> Self {
        Self(vec![
            PitchClass::E,
            PitchClass::A,
            PitchClass::D,
            PitchClass::G,
            PitchClass::B,
            PitchClass::E,
        ])
    }

    pub fn strings(&self) -> &[PitchClass] {
        &self.0
    }
}

impl FromStr for Tuning {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let strings = value
            .split_whitespace()
            .enumerate()
            .map(|(idx, note)| {
                note.parse::<PitchClass>()
                    .map_err(|_| ValidationError::InvalidTuningNote {
                        string: idx + 1,
                        note: note.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(strings)
    }
}

impl fmt::Display for Tuning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, note) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            f.write_str(note.as_str())?;
        }
        Ok(())
    }
}

pub fn parse_fret_count(value: &str) -> Result<NonZeroU32, ValidationError> {
    value
        .trim()
        .parse::<NonZeroU32>()
        .map_err(|_| ValidationError::InvalidFretCount(value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ChordFilter {
    #[default]
    Any,
    Chord(String),
}

impl ChordFilter {
    /// Empty input and the sentinel both clear the filter.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == NO_CHORD_FILTER {
            ChordFilter::Any
        } else {
            ChordFilter::Chord(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChordFilter::Any => NO_CHORD_FILTER,
            ChordFilter::Chord(name) => name,
        }
    }

    pub fn chord(&self) -> Option<&str> {
        match self {
            ChordFilter::Any => None,
            ChordFilter::Chord(name) => Some(name),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ChordFilter::Chord(_))
    }
}

impl fmt::Display for ChordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fields that decide which chords are valid. Everything in a
/// [`ScaleQuery`] except the chord filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordContext {
    pub root: PitchClass,
    pub scale_type: ScaleType,
    pub tuning: Tuning,
    pub frets: NonZeroU32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScaleQuery {
    pub root: PitchClass,
    pub scale_type: ScaleType,
    pub tuning: Tuning,
    pub frets: NonZeroU32,
    pub chord_filter: ChordFilter,
}

impl Default for ScaleQuery {
    fn default() -> Self {
        Self {
            root: PitchClass::A,
            scale_type: ScaleType::Minor,
            tuning: Tuning::standard(),
            frets: NonZeroU32::new(DEFAULT_FRETS).unwrap_or(NonZeroU32::MIN),
            chord_filter: ChordFilter::Any,
        }
    }
}

impl ScaleQuery {
    pub fn chord_context(&self) -> ChordContext {
        ChordContext {
            root: self.root,
            scale_type: self.scale_type,
            tuning: self.tuning.clone(),
            frets: self.frets,
        }
    }

    pub fn same_chord_context(&self, other: &ScaleQuery) -> bool {
        self.root == other.root
            && self.scale_type == other.scale_type
            && self.tuning == other.tuning
            && self.frets == other.frets
    }

    pub fn title(&self) -> String {
        format!("{} {}", self.root, self.scale_type)
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
