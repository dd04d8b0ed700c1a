use super::*;

#[test]
fn defaults_validate() {
    SessionConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg = SessionConfig::from_json_str(
        r#"{ "anchor_count": 12, "cap": { "live_elements": 50 }, "dispatch": { "lattice": 0.2 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.anchor_count, 12);
    assert_eq!(cfg.cap, CapPolicy::LiveElements(50));
    assert_eq!(cfg.dispatch.lattice, 0.2);
    assert_eq!(cfg.dispatch.line, 0.35);
    assert_eq!(cfg.line_steps, 900);
    assert_eq!(cfg.seed, None);
}

#[test]
fn json_round_trip_preserves_every_field() {
    let cfg = SessionConfig {
        anchor_layout: AnchorLayout::Regenerate,
        vanishing: VanishingStyle::Fixed,
        resize: ResizePolicy::Reset,
        ..SessionConfig::default()
    }
    .with_seed(42);
    let json = cfg.to_json_pretty().unwrap();
    let back = SessionConfig::from_json_str(&json).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn zero_step_counts_are_rejected() {
    let cfg = SessionConfig {
        arc_steps: 0,
        ..SessionConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("arc_steps"));

    let cfg = SessionConfig {
        lattice_frame_delay: 0,
        ..SessionConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn overfull_dispatch_table_is_rejected() {
    let cfg = SessionConfig {
        dispatch: DispatchWeights {
            line: 0.9,
            arc: 0.2,
            ..DispatchWeights::default()
        },
        ..SessionConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_cap_and_bad_probability_are_rejected() {
    let cfg = SessionConfig {
        cap: CapPolicy::PointerPresses(0),
        ..SessionConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = SessionConfig {
        thick_stroke_chance: 1.5,
        ..SessionConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SessionConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, KandinskyError::Serde(_)));
}
