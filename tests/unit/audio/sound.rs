use super::*;

#[test]
fn change_speed_identity_preserves_length_and_content() {
    let src: Vec<u8> = (0..=255u8).cycle().take(1001).collect();
    let out = change_speed(&src, 1.0);
    assert_eq!(out.len(), src.len());
    assert_eq!(out, src);
}

#[test]
fn change_speed_scales_length_inversely() {
    let src = vec![100u8; 1000];
    assert_eq!(change_speed(&src, 2.0).len(), 500);
    assert_eq!(change_speed(&src, 0.5).len(), 2000);
    assert_eq!(change_speed(&src, 1.1).len(), 909);
    assert_eq!(change_speed(&src, 0.95).len(), 1053);
    assert_eq!(change_speed(&src, 0.0).len(), 1000);
    assert!(change_speed(&[], 1.5).is_empty());
}

#[test]
fn change_speed_samples_by_index_mapping() {
    let src = [10u8, 20, 30, 40];
    assert_eq!(change_speed(&src, 2.0), vec![10, 30]);
    assert_eq!(change_speed(&src, 0.5), vec![10, 10, 20, 20, 30, 30, 40, 40]);
}

#[test]
fn mix_saturates_instead_of_wrapping() {
    let mut dst = [250u8, 5, 128, 200, 60];
    let src = [250u8, 5, 128, 100, 200];
    mix_sound(&mut dst, &src);
    assert_eq!(dst, [255, 0, 128, 172, 132]);
}

#[test]
fn mix_never_leaves_sample_range_for_any_pair() {
    for a in (0..=255u8).step_by(5) {
        for b in (0..=255u8).step_by(5) {
            let mut dst = [a];
            mix_sound(&mut dst, &[b]);
            let expected = (i16::from(a) + i16::from(b) - 128).clamp(0, 255);
            assert_eq!(i16::from(dst[0]), expected);
        }
    }
}

#[test]
fn mix_touches_only_the_overlap() {
    let mut dst = vec![128u8; 3];
    mix_sound(&mut dst, &[138, 138, 138, 138, 138]);
    assert_eq!(dst, vec![138, 138, 138]);

    let mut snd = Sound::silence(4);
    snd.mix_at(2, &Sound::from_samples(vec![130, 130, 130]));
    assert_eq!(snd.samples(), &[128, 128, 130, 130]);
    snd.mix_at(10, &Sound::from_samples(vec![255]));
    assert_eq!(snd.samples(), &[128, 128, 130, 130]);
}

#[test]
fn set_level_scales_around_midpoint_and_clips() {
    let mut s = [128u8, 138, 118, 250, 0];
    set_level(&mut s, 2.0);
    assert_eq!(s, [128, 148, 108, 255, 0]);

    let mut s = [228u8, 28];
    set_level(&mut s, 0.05);
    assert_eq!(s, [133, 123]);
}

#[test]
fn reversed_plays_backwards() {
    let s = Sound::from_samples(vec![1, 2, 3]);
    assert_eq!(s.reversed().samples(), &[3, 2, 1]);
}

#[test]
fn fixed_tones_have_fixed_lengths() {
    assert_eq!(beep().len(), 1_200);
    assert_eq!(ending_beep().len(), 3_200);
    assert_eq!(beep(), beep());
    assert_eq!(beep().samples()[0], SILENCE);
}
