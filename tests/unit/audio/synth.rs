use super::*;

fn tone_set() -> DigitSoundSet {
    DigitSoundSet::new(
        (0..10u8)
            .map(|d| {
                let samples = (0..400 + usize::from(d) * 10)
                    .map(|i| if i % 2 == 0 { 128 + 40 } else { 128 - 40 })
                    .collect();
                Sound::from_samples(samples)
            })
            .collect(),
    )
    .unwrap()
}

fn fixed_len() -> usize {
    3 * beep().len() + 2 * PRELUDE_SILENCE + ending_beep().len()
}

#[test]
fn body_is_bracketed_by_beeps() {
    let rng = RandomSource::os();
    let audio = AudioCaptcha::with_sounds(&rng, &tone_set(), &[1, 2, 3]).unwrap();
    let body = audio.body();
    let lead = beep();
    let tail = ending_beep();

    assert_eq!(&body[..lead.len()], lead.samples());
    let second = lead.len() + PRELUDE_SILENCE;
    assert!(body[lead.len()..second].iter().all(|&s| s == SILENCE));
    assert_eq!(&body[second..second + lead.len()], lead.samples());
    assert_eq!(&body[body.len() - tail.len()..], tail.samples());
}

#[test]
fn body_length_covers_digits_and_gaps() {
    let rng = RandomSource::os();
    let set = tone_set();
    let audio = AudioCaptcha::with_sounds(&rng, &set, &[0, 9]).unwrap();
    let background = audio.body().len() - fixed_len();

    let min_digits = ((400.0 / 1.10) as usize) + ((490.0 / 1.10) as usize);
    assert!(background >= min_digits + 3 * 8_000);
    assert!(background <= 422 + 516 + 3 * 16_000);
}

#[test]
fn encoded_len_matches_container_bytes() {
    let rng = RandomSource::os();
    let audio = AudioCaptcha::with_sounds(&rng, &tone_set(), &[4]).unwrap();
    let wav = audio.encode().unwrap();
    assert_eq!(wav.len(), audio.encoded_len());

    let mut out = Vec::new();
    let written = audio.write_to(&mut out).unwrap();
    assert_eq!(written as usize, out.len());
    assert_eq!(out, wav);
    assert_eq!(audio.mime_type(), "audio/wav");
}

#[test]
fn rejects_empty_and_out_of_range_digits() {
    let rng = RandomSource::os();
    assert!(matches!(
        AudioCaptcha::with_sounds(&rng, &tone_set(), &[]),
        Err(CaptchaError::Configuration(_))
    ));
    assert!(matches!(
        AudioCaptcha::with_sounds(&rng, &tone_set(), &[3, 10]),
        Err(CaptchaError::Configuration(_))
    ));
}

#[test]
fn unknown_language_uses_default_sound_set() {
    let store = AssetStore::builder().sound_set("en", tone_set()).build();
    let rng = RandomSource::os();
    let audio = AudioCaptcha::new(&rng, &store, &[1, 2, 3], "xx").unwrap();
    assert!(audio.body().len() > fixed_len());

    let empty = AssetStore::builder().build();
    assert!(matches!(
        AudioCaptcha::new(&rng, &empty, &[1], "en"),
        Err(CaptchaError::AssetLookup(_))
    ));
}

#[test]
fn white_noise_stays_in_a_narrow_band() {
    let noise = white_noise(&RandomSource::os(), 5_000, NOISE_LEVEL).unwrap();
    assert_eq!(noise.len(), 5_000);
    assert!(noise.samples().iter().all(|&s| (126..=129).contains(&s)));
}

#[test]
fn background_decoys_are_quiet() {
    let bg = background_sound(&RandomSource::os(), &tone_set(), 16_000).unwrap();
    assert_eq!(bg.len(), 16_000);
    // Decoys at <= 8% of a +-40 tone add at most a few steps on top of the noise band.
    assert!(bg.samples().iter().all(|&s| (96..=160).contains(&s)));
}

#[test]
fn background_shorter_than_a_decoy_is_still_filled() {
    let bg = background_sound(&RandomSource::os(), &tone_set(), 900).unwrap();
    assert_eq!(bg.len(), 900);
}

#[test]
fn randomized_digit_sound_stays_within_speed_bounds() {
    let rng = RandomSource::os();
    let base = Sound::from_samples(vec![170; 1_000]);
    for _ in 0..20 {
        let snd = randomized_digit_sound(&rng, &base).unwrap();
        assert!((909..=1053).contains(&snd.len()), "len {}", snd.len());
    }
}

#[test]
fn entropy_failure_aborts_assembly() {
    assert!(matches!(
        AudioCaptcha::with_sounds(&RandomSource::failing(), &tone_set(), &[1]),
        Err(CaptchaError::RandomnessUnavailable(_))
    ));
}
