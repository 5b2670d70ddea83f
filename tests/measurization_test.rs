// Test bar assembly: splitting flat event streams into full, tied bars

use piano_notation_wasm::ir::{
    chunk, content_events, create_bars, reciprocal_chunk, set_time_signature, simplify, Bar, Clef,
};
use piano_notation_wasm::models::{Duration, KeySignature, MusicalEvent, NoteName, TimeSignature};

/// Helper to create a single-pitch event
fn note(name: NoteName, duration: Duration) -> MusicalEvent {
    MusicalEvent::note(name, duration)
}

/// Helper to create a single-pitch event tied to the next one
fn tied(name: NoteName, duration: Duration) -> MusicalEvent {
    MusicalEvent::note(name, duration).tied(true)
}

fn ts(beat_count: u32, beat_unit: Duration) -> TimeSignature {
    TimeSignature::new(beat_count, beat_unit).unwrap()
}

fn bars_in(events: &[MusicalEvent], time_signature: TimeSignature) -> Vec<Bar> {
    create_bars(events, time_signature, Clef::Treble, KeySignature::default()).unwrap()
}

#[test]
fn test_two_wholes_in_three_four() {
    let events = vec![note(NoteName::C, Duration::Whole), note(NoteName::E, Duration::Whole)];
    let bars = bars_in(&events, ts(3, Duration::Quarter));

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].events, vec![
        tied(NoteName::C, Duration::Quarter),
        tied(NoteName::C, Duration::Half),
    ]);
    assert_eq!(bars[1].events, vec![
        note(NoteName::C, Duration::Quarter),
        tied(NoteName::E, Duration::Half),
    ]);
    assert_eq!(bars[2].events, vec![
        note(NoteName::E, Duration::Half),
        MusicalEvent::pause(Duration::Quarter),
    ]);
}

#[test]
fn test_no_events_no_bars() {
    assert!(bars_in(&[], ts(7, Duration::Eighth)).is_empty());
}

#[test]
fn test_whole_note_in_three_sixteen() {
    let bars = bars_in(&[note(NoteName::C, Duration::Whole)], ts(3, Duration::Sixteenth));

    assert_eq!(bars.len(), 6);
    for bar in &bars[..5] {
        assert_eq!(bar.events, vec![
            tied(NoteName::C, Duration::Sixteenth),
            tied(NoteName::C, Duration::Eighth),
        ]);
    }
    assert_eq!(bars[5].events, vec![
        note(NoteName::C, Duration::Sixteenth),
        MusicalEvent::pause(Duration::Eighth),
    ]);
}

#[test]
fn test_reciprocal_chunk_of_empty_three_four() {
    assert_eq!(reciprocal_chunk(&[], 24).unwrap(), vec![
        MusicalEvent::pause(Duration::Quarter),
        MusicalEvent::pause(Duration::Half),
    ]);
}

#[test]
fn test_resign_four_four_to_two_four() {
    let four_quarters = vec![note(NoteName::C, Duration::Quarter); 4];
    let bar = Bar::new(ts(4, Duration::Quarter), Clef::Treble, KeySignature::default(), four_quarters);

    let bars = set_time_signature(&[bar], 0, ts(2, Duration::Quarter)).unwrap();

    assert_eq!(bars.len(), 2);
    for bar in &bars {
        assert_eq!(bar.time_signature, ts(2, Duration::Quarter));
        assert_eq!(bar.events, vec![note(NoteName::C, Duration::Quarter); 2]);
    }
}

#[test]
fn test_every_bar_is_full() {
    let events = vec![
        note(NoteName::C, Duration::Eighth),
        MusicalEvent::chord(vec![NoteName::E, NoteName::G], Duration::Half).unwrap(),
        tied(NoteName::D, Duration::Sixteenth),
        note(NoteName::D, Duration::Whole),
        MusicalEvent::pause(Duration::ThirtySecond),
        note(NoteName::B, Duration::Quarter),
    ];
    for signature in [
        ts(4, Duration::Quarter),
        ts(3, Duration::Quarter),
        ts(7, Duration::Eighth),
        ts(5, Duration::Sixteenth),
        ts(2, Duration::Whole),
    ] {
        let bars = bars_in(&events, signature);
        assert!(bars.iter().all(|bar| bar.is_full()), "underfull bar in {}", signature);
        assert_eq!(content_events(&bars), simplify(&events), "content lost in {}", signature);
    }
}

#[test]
fn test_chunk_conserves_units() {
    let events = vec![note(NoteName::A, Duration::Half), note(NoteName::B, Duration::Eighth)];
    let sizes = [3, 9, 1, 7];
    let chunks = chunk(&events, &sizes).unwrap();

    assert_eq!(chunks.len(), sizes.len());
    for (piece, &size) in chunks.iter().zip(sizes.iter()) {
        let units: usize = piece.iter().map(|e| e.elementary_units()).sum();
        assert_eq!(units, size);
    }
}

#[test]
fn test_tie_across_bar_line_stays_on_pitch() {
    // A half note starting on beat four crosses into the next bar
    let events = vec![
        note(NoteName::C, Duration::Half),
        note(NoteName::D, Duration::Quarter),
        note(NoteName::E, Duration::Half),
    ];
    let bars = bars_in(&events, ts(4, Duration::Quarter));

    assert_eq!(bars[0].events.last(), Some(&tied(NoteName::E, Duration::Quarter)));
    assert_eq!(bars[1].events.first(), Some(&note(NoteName::E, Duration::Quarter)));
}

#[test]
fn test_longer_signature_needs_fewer_bars() {
    let events = vec![note(NoteName::G, Duration::Quarter); 12];
    let bars = bars_in(&events, ts(2, Duration::Quarter));
    assert_eq!(bars.len(), 6);

    let resigned = set_time_signature(&bars, 0, ts(3, Duration::Quarter)).unwrap();
    assert_eq!(resigned.len(), 4);
    assert!(resigned.iter().all(|bar| bar.is_full() && bar.padding_units == 0));
}

#[test]
fn test_resign_drops_padding_before_rebarring() {
    // Five quarters in 4/4 leave three quarters of padding in bar two
    let events = vec![note(NoteName::F, Duration::Quarter); 5];
    let bars = bars_in(&events, ts(4, Duration::Quarter));
    assert_eq!(bars[1].padding_units, 24);

    // In 5/4 everything fits in one bar with no rests at all
    let resigned = set_time_signature(&bars, 0, ts(5, Duration::Quarter)).unwrap();
    assert_eq!(resigned.len(), 1);
    assert_eq!(resigned[0].events, events);
    assert_eq!(resigned[0].padding_units, 0);
}

#[test]
fn test_resign_keeps_bar_clef_and_key() {
    let key = KeySignature::major(NoteName::Eb).unwrap();
    let events = vec![note(NoteName::Eb, Duration::Whole); 2];
    let bars = create_bars(&events, ts(4, Duration::Quarter), Clef::Bass, key).unwrap();

    let resigned = set_time_signature(&bars, 1, ts(2, Duration::Quarter)).unwrap();

    assert_eq!(resigned.len(), 3);
    assert_eq!(resigned[0], bars[0]);
    assert!(resigned.iter().all(|bar| bar.clef == Clef::Bass && bar.key_signature == key));
}

#[test]
fn test_resign_rejects_padding_over_real_notes() {
    // Bars arriving from JavaScript claim the final note is padding
    let json = r#"[{
        "timeSignature": "2/4",
        "clef": "treble",
        "keySignature": "C",
        "events": [
            {"notes": ["C"], "duration": "quarter", "tiedToNext": false},
            {"notes": ["E"], "duration": "quarter", "tiedToNext": false}
        ],
        "paddingUnits": 8
    }]"#;
    let bars: Vec<Bar> = serde_json::from_str(json).unwrap();
    assert!(bars.into_iter().map(Bar::validated).any(|bar| bar.is_err()));
}

#[test]
fn test_validated_bar_resigns_without_losing_notes() {
    let bars = bars_in(&[note(NoteName::C, Duration::Quarter)], ts(2, Duration::Quarter));
    let validated: Vec<Bar> = bars.into_iter().map(|bar| bar.validated().unwrap()).collect();
    assert_eq!(validated[0].padding_units, 8);

    let resigned = set_time_signature(&validated, 0, ts(1, Duration::Quarter)).unwrap();
    assert_eq!(resigned.len(), 1);
    assert_eq!(resigned[0].events, vec![note(NoteName::C, Duration::Quarter)]);
}
