use super::*;

#[test]
fn effect_set_tracks_membership() {
    let mut set = EffectSet::empty();
    assert!(set.is_empty());
    set.insert(Effect::SineLine);
    set.insert(Effect::HollowLine);
    assert!(set.contains(Effect::SineLine));
    assert!(!set.contains(Effect::Noise));
    assert_eq!(
        set.iter().collect::<Vec<_>>(),
        vec![Effect::HollowLine, Effect::SineLine]
    );
    set.remove(Effect::SineLine);
    assert_eq!(set, EffectSet::empty().with(Effect::HollowLine));
    assert_eq!(EffectSet::all().iter().count(), 4);
}

#[test]
fn effect_set_serializes_as_snake_case_names() {
    let set = EffectSet::empty().with(Effect::Noise).with(Effect::SlimLine);
    let json = serde_json::to_string(&set).unwrap();
    assert_eq!(json, r#"["slim_line","noise"]"#);

    let back: EffectSet = serde_json::from_str(r#"["noise","hollow_line","noise"]"#).unwrap();
    assert_eq!(back, EffectSet::empty().with(Effect::Noise).with(Effect::HollowLine));
    assert!(serde_json::from_str::<EffectSet>(r#"["glitter"]"#).is_err());
}

#[test]
fn char_opts_fill_missing_fields_from_defaults() {
    let opts: CharCaptchaOpts = serde_json::from_str(
        r##"{"width": 150, "effects": ["sine_line"], "bg_color": "#ffeeddcc"}"##,
    )
    .unwrap();
    assert_eq!(opts.width, 150);
    assert_eq!(opts.height, 80);
    assert_eq!(opts.effects, EffectSet::empty().with(Effect::SineLine));
    assert_eq!(
        opts.bg_color,
        Some(Rgba8 {
            r: 0xff,
            g: 0xee,
            b: 0xdd,
            a: 0xcc
        })
    );
    assert!(opts.fonts.is_empty());
}

#[test]
fn digit_and_audio_defaults() {
    let digits: DigitCaptchaOpts = serde_json::from_str("{}").unwrap();
    assert_eq!(digits, DigitCaptchaOpts::default());
    assert_eq!((digits.width, digits.height, digits.dot_count), (240, 80, 80));
    assert_eq!(digits.max_skew, 0.7);

    let audio: AudioCaptchaOpts = serde_json::from_str(r#"{"language": "ja"}"#).unwrap();
    assert_eq!(audio.language, "ja");
    assert_eq!(AudioCaptchaOpts::default().language, "en");
}
