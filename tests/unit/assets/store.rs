use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "captchakit_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn tone_set(base: u8) -> DigitSoundSet {
    DigitSoundSet::new(
        (0..DIGIT_COUNT as u8)
            .map(|d| Sound::from_samples(vec![base.wrapping_add(d); 100 + usize::from(d)]))
            .collect(),
    )
    .unwrap()
}

fn write_wav(path: &Path, samples: &[i8]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: crate::audio::sound::SAMPLE_RATE,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        w.write_sample(s).unwrap();
    }
    w.finalize().unwrap();
}

#[test]
fn digit_sound_set_requires_ten_non_empty_sounds() {
    assert!(DigitSoundSet::new(vec![Sound::silence(4); 9]).is_err());
    let mut sounds = vec![Sound::silence(4); 10];
    sounds[3] = Sound::default();
    assert!(DigitSoundSet::new(sounds).is_err());

    let set = tone_set(130);
    assert_eq!(set.sounds().len(), 10);
    assert_eq!(set.get(9).unwrap().len(), 109);
    assert!(matches!(set.get(10), Err(CaptchaError::Configuration(_))));
}

#[test]
fn unknown_language_falls_back_but_explicit_lookup_does_not() {
    let store = AssetStore::builder()
        .sound_set("en", tone_set(130))
        .sound_set("ja", tone_set(150))
        .build();

    assert_eq!(store.digit_sounds("ja").unwrap(), &tone_set(150));
    assert_eq!(store.digit_sounds("xx").unwrap(), &tone_set(130));
    assert!(matches!(
        store.sound_set("xx"),
        Err(CaptchaError::AssetLookup(_))
    ));
}

#[test]
fn missing_default_language_is_a_lookup_error() {
    let store = AssetStore::builder()
        .sound_set("ja", tone_set(150))
        .build();
    assert!(matches!(
        store.digit_sounds("xx"),
        Err(CaptchaError::AssetLookup(_))
    ));

    let store = AssetStore::builder()
        .sound_set("ja", tone_set(150))
        .default_language("ja")
        .build();
    assert_eq!(store.digit_sounds("xx").unwrap(), &tone_set(150));
}

#[test]
fn font_selection_defaults_to_all_and_rejects_unknown_names() {
    let empty = AssetStore::builder().build();
    assert!(matches!(
        empty.fonts::<&str>(&[]),
        Err(CaptchaError::AssetLookup(_))
    ));

    let bytes = std::fs::read("tests/data/fonts/DejaVuSans.ttf").unwrap();
    let store = AssetStore::builder()
        .font(FontAsset::from_bytes("DejaVuSans.ttf", bytes).unwrap())
        .build();
    assert_eq!(store.fonts::<&str>(&[]).unwrap().len(), 1);
    assert_eq!(store.fonts(&["DejaVuSans.ttf"]).unwrap()[0].name(), "DejaVuSans.ttf");
    assert!(matches!(
        store.fonts(&["missing.ttf"]),
        Err(CaptchaError::AssetLookup(_))
    ));
}

#[test]
fn fs_provider_loads_fonts_and_sound_sets() {
    let tmp = temp_dir("fs_provider");
    std::fs::create_dir_all(tmp.join("fonts")).unwrap();
    std::fs::copy(
        "tests/data/fonts/DejaVuSans.ttf",
        tmp.join("fonts").join("DejaVuSans.ttf"),
    )
    .unwrap();
    let en = tmp.join("sounds").join("en");
    std::fs::create_dir_all(&en).unwrap();
    for d in 0..DIGIT_COUNT {
        write_wav(&en.join(format!("{d}.wav")), &[0, 10, -10, d as i8]);
    }

    let provider = FsAssetProvider::new(&tmp);
    let store = AssetStore::prepare(&provider, &["DejaVuSans.ttf"], &["en"]).unwrap();
    assert!(store.font("DejaVuSans.ttf").unwrap().family().contains("DejaVu"));
    let set = store.sound_set("en").unwrap();
    assert_eq!(set.get(7).unwrap().samples(), &[128, 138, 118, 135]);

    assert!(matches!(
        provider.load_font("nope.ttf"),
        Err(CaptchaError::AssetLookup(_))
    ));
    assert!(matches!(
        provider.load_sound_set("ru"),
        Err(CaptchaError::AssetLookup(_))
    ));
    assert!(matches!(
        provider.load_sound_set("../en"),
        Err(CaptchaError::Configuration(_))
    ));

    std::fs::remove_file(en.join("4.wav")).unwrap();
    assert!(matches!(
        provider.load_sound_set("en"),
        Err(CaptchaError::AssetLookup(_))
    ));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn normalize_rel_path_rejects_escapes() {
    assert_eq!(normalize_rel_path("a\\b.ttf").unwrap(), "a/b.ttf");
    assert_eq!(normalize_rel_path("./a//b.ttf").unwrap(), "a/b.ttf");
    assert!(normalize_rel_path("/abs.ttf").is_err());
    assert!(normalize_rel_path("../x.ttf").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn store_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AssetStore>();
    assert_send_sync::<FontAsset>();
}
