use super::*;

#[test]
fn parses_all_twelve_pitch_classes() {
    for name in ["A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#"] {
        let note: PitchClass = name.parse().expect("pitch class");
        assert_eq!(note.as_str(), name);
    }
}

#[test]
fn rejects_unknown_and_flat_notes() {
    assert_eq!(
        "H".parse::<PitchClass>(),
        Err(ValidationError::UnknownNote("H".to_string()))
    );
    assert!("Bb".parse::<PitchClass>().is_err());
    assert!("a".parse::<PitchClass>().is_err());
}

#[test]
fn scale_type_accepts_hyphenated_harmonic_minor() {
    assert_eq!(
        "harmonic-minor".parse::<ScaleType>(),
        Ok(ScaleType::HarmonicMinor)
    );
    assert_eq!(
        "harmonic minor".parse::<ScaleType>(),
        Ok(ScaleType::HarmonicMinor)
    );
    assert_eq!(ScaleType::HarmonicMinor.as_str(), "harmonic minor");
    assert!("dorian".parse::<ScaleType>().is_err());
}

#[test]
fn tuning_round_trips_through_display() {
    let tuning: Tuning = "E  A D G B E".parse().expect("tuning");
    assert_eq!(tuning, Tuning::standard());
    assert_eq!(tuning.to_string(), STANDARD_TUNING);
}

#[test]
fn tuning_rejects_empty_and_reports_bad_string() {
    assert_eq!("   ".parse::<Tuning>(), Err(ValidationError::EmptyTuning));
    assert_eq!(
        "E A X".parse::<Tuning>(),
        Err(ValidationError::InvalidTuningNote {
            string: 3,
            note: "X".to_string()
        })
    );
}

#[test]
fn fret_count_must_be_positive() {
    assert_eq!(parse_fret_count("22").map(|f| f.get()), Ok(22));
    assert!(parse_fret_count("0").is_err());
    assert!(parse_fret_count("-3").is_err());
    assert!(parse_fret_count("twelve").is_err());
}

#[test]
fn chord_filter_sentinel_and_empty_mean_any() {
    assert_eq!(ChordFilter::parse("-"), ChordFilter::Any);
    assert_eq!(ChordFilter::parse(""), ChordFilter::Any);
    assert_eq!(ChordFilter::parse(" Amin7 "), ChordFilter::Chord("Amin7".into()));
    assert_eq!(ChordFilter::Any.as_str(), NO_CHORD_FILTER);
}

#[test]
fn default_query_is_a_minor_standard_twelve_frets() {
    let query = ScaleQuery::default();
    assert_eq!(query.root, PitchClass::A);
    assert_eq!(query.scale_type, ScaleType::Minor);
    assert_eq!(query.tuning, Tuning::standard());
    assert_eq!(query.frets.get(), DEFAULT_FRETS);
    assert_eq!(query.chord_filter, ChordFilter::Any);
    assert_eq!(query.title(), "A minor");
}

#[test]
fn chord_context_ignores_only_the_filter() {
    let base = ScaleQuery::default();

    let mut filtered = base.clone();
    filtered.chord_filter = ChordFilter::Chord("Am".into());
    assert_ne!(base, filtered);
    assert!(base.same_chord_context(&filtered));
    assert_eq!(base.chord_context(), filtered.chord_context());

    let mut more_frets = base.clone();
    more_frets.frets = parse_fret_count("22").expect("frets");
    assert!(!base.same_chord_context(&more_frets));
}
