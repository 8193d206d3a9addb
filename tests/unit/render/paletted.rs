use super::*;

fn canvas(w: u32, h: u32) -> PalettedCanvas {
    PalettedCanvas::new(&RandomSource::os(), w, h, 20, 0.7).unwrap()
}

fn count(c: &PalettedCanvas, idx: u8) -> usize {
    c.indices().iter().filter(|&&i| i == idx).count()
}

#[test]
fn calculate_sizes_fits_six_digits_into_240_by_80() {
    let layout = calculate_sizes(240, 80, 6).unwrap();
    assert!(layout.dot_size >= 1);
    assert!(layout.row_width(6) <= 240);
    assert_eq!(
        layout,
        DigitLayout {
            dot_size: 2,
            cell_width: 24,
            cell_height: 40
        }
    );
}

#[test]
fn calculate_sizes_uses_width_fit_for_tall_canvases() {
    let layout = calculate_sizes(100, 400, 4).unwrap();
    // border 25, width fit: 50 / 4 = 12.5 wide, 18.75 tall.
    assert_eq!(layout.cell_height, 18);
    assert_eq!(layout.dot_size, 1);
    assert_eq!(layout.cell_width, 11);
}

#[test]
fn calculate_sizes_floors_dot_size_and_rejects_zero_count() {
    assert_eq!(calculate_sizes(10, 10, 8).unwrap().dot_size, 1);
    assert!(matches!(
        calculate_sizes(240, 80, 0),
        Err(CaptchaError::Configuration(_))
    ));
}

#[test]
fn new_validates_inputs() {
    let rng = RandomSource::os();
    assert!(PalettedCanvas::new(&rng, 0, 5, 10, 0.5).is_err());
    assert!(PalettedCanvas::new(&rng, 5, 5, 0, 0.5).is_err());
    assert!(PalettedCanvas::new(&rng, 5, 5, 10, f64::NAN).is_err());
    let c = PalettedCanvas::new(&rng, 5, 4, 10, 0.5).unwrap();
    assert_eq!(c.palette().len(), 11);
    assert_eq!(c.indices().len(), 20);
    assert_eq!(count(&c, BACKGROUND_INDEX), 20);
}

#[test]
fn out_of_range_access_is_ignored() {
    let mut c = canvas(4, 4);
    c.set_index(-1, 0, 3);
    c.set_index(4, 0, 3);
    c.set_index(0, 4, 3);
    assert_eq!(count(&c, 3), 0);
    assert_eq!(c.index_at(-5, 2), BACKGROUND_INDEX);
    assert_eq!(c.index_at(2, 99), BACKGROUND_INDEX);
}

#[test]
fn midpoint_circle_is_symmetric_and_filled() {
    let mut c = canvas(21, 21);
    c.draw_circle(10, 10, 5, 2);
    for (x, y) in [(10, 5), (10, 15), (5, 10), (15, 10), (10, 10), (8, 12)] {
        assert_eq!(c.index_at(x, y), 2, "({x}, {y})");
    }
    for (x, y) in [(10, 4), (16, 10), (5, 5), (15, 15)] {
        assert_eq!(c.index_at(x, y), BACKGROUND_INDEX, "({x}, {y})");
    }
    for y in 0..21 {
        for x in 0..21 {
            assert_eq!(c.index_at(x, y), c.index_at(20 - x, y));
            assert_eq!(c.index_at(x, y), c.index_at(x, 20 - y));
        }
    }
}

#[test]
fn radius_zero_circle_is_a_single_dot() {
    let mut c = canvas(5, 5);
    c.draw_circle(2, 2, 0, 4);
    assert_eq!(count(&c, 4), 1);
    assert_eq!(c.index_at(2, 2), 4);
}

#[test]
fn fill_with_circles_uses_foreground_indices() {
    let mut c = canvas(60, 40);
    c.fill_with_circles(&RandomSource::os(), 30, 4).unwrap();
    assert!(count(&c, BACKGROUND_INDEX) < 60 * 40);
    assert!(c.indices().iter().all(|&i| usize::from(i) < c.palette().len()));
}

#[test]
fn fill_with_circles_keeps_every_circle_on_canvas() {
    let rng = RandomSource::os();
    // On 3x3 the only center that fits a radius-1 circle is (1, 1): a full plus.
    for _ in 0..100 {
        let mut c = PalettedCanvas::new(&rng, 3, 3, 1, 0.0).unwrap();
        c.fill_with_circles(&rng, 1, 1).unwrap();
        for (x, y) in [(0, 1), (2, 1), (1, 0), (1, 2), (1, 1)] {
            assert_eq!(c.index_at(x, y), PRIMARY_INDEX, "({x}, {y})");
        }
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(c.index_at(x, y), BACKGROUND_INDEX, "({x}, {y})");
        }
    }
}

#[test]
fn oversized_radii_and_coordinates_are_clipped() {
    let rng = RandomSource::os();
    let mut c = canvas(10, 10);
    c.fill_with_circles(&rng, 5, i32::MAX).unwrap();
    assert!(c.indices().iter().all(|&i| usize::from(i) < c.palette().len()));

    let mut c = canvas(10, 10);
    c.draw_circle(i32::MAX - 1, i32::MIN + 1, 3, PRIMARY_INDEX);
    c.draw_circle(5, 5, -4, PRIMARY_INDEX);
    assert_eq!(count(&c, PRIMARY_INDEX), 0);

    c.set_dot_size(i32::MAX);
    assert_eq!(c.dot_size(), 10);
    c.draw_digit(&rng, 8, i32::MAX - 5, 0).unwrap();
}

#[test]
fn draw_digit_paints_primary_dots_only() {
    let mut c = canvas(60, 60);
    c.set_dot_size(2);
    c.draw_digit(&RandomSource::os(), 8, 10, 10).unwrap();
    let primary = count(&c, PRIMARY_INDEX);
    assert!(primary > 30);
    assert_eq!(primary + count(&c, BACKGROUND_INDEX), 60 * 60);
}

#[test]
fn draw_digit_rejects_non_digits() {
    let mut c = canvas(30, 30);
    assert!(matches!(
        c.draw_digit(&RandomSource::os(), 10, 0, 0),
        Err(CaptchaError::Configuration(_))
    ));
}

#[test]
fn strike_through_crosses_every_column() {
    let mut c = canvas(200, 80);
    c.set_dot_size(3);
    c.strike_through(&RandomSource::os()).unwrap();
    let covered = (25..175)
        .filter(|&x| (0..80).any(|y| c.index_at(x, y) == PRIMARY_INDEX))
        .count();
    assert_eq!(covered, 150);
}

#[test]
fn zero_amplitude_distort_is_identity() {
    let mut c = canvas(50, 30);
    c.fill_with_circles(&RandomSource::os(), 20, 6).unwrap();
    for period in [150.0, 1.0, 0.0, -3.0] {
        let before = c.indices().to_vec();
        c.distort(0.0, period);
        assert_eq!(c.indices(), &before[..], "period {period}");
    }
}

#[test]
fn distort_shifts_and_fills_from_background() {
    let mut c = canvas(20, 20);
    for y in 0..20 {
        for x in 0..20 {
            c.set_index(x, y, 2);
        }
    }
    // Large period keeps sin(y*dx) ~ y*dx; amplitude 6 pushes reads off the right edge.
    c.distort(6.0, 4.0 * 20.0);
    assert!(count(&c, BACKGROUND_INDEX) > 0);
    assert!(count(&c, 2) > 0);
    assert_eq!(c.indices().len(), 400);
}

#[test]
fn huge_distort_amplitude_reads_background() {
    let mut c = canvas(20, 20);
    c.fill_with_circles(&RandomSource::os(), 10, 4).unwrap();
    c.distort(1e10, 100.0);
    assert_eq!(c.indices().len(), 400);
    c.distort(f64::MAX, 100.0);
    c.distort(f64::INFINITY, 7.0);
    assert_eq!(count(&c, BACKGROUND_INDEX), 400);
}

#[test]
fn entropy_failure_aborts_drawing() {
    let mut c = canvas(30, 30);
    let rng = RandomSource::failing();
    assert!(matches!(
        c.fill_with_circles(&rng, 1, 3),
        Err(CaptchaError::RandomnessUnavailable(_))
    ));
    assert!(matches!(
        c.draw_digit(&rng, 1, 0, 0),
        Err(CaptchaError::RandomnessUnavailable(_))
    ));
    assert!(matches!(
        c.strike_through(&rng),
        Err(CaptchaError::RandomnessUnavailable(_))
    ));
    assert!(matches!(
        PalettedCanvas::new(&rng, 5, 5, 3, 0.1),
        Err(CaptchaError::RandomnessUnavailable(_))
    ));
}

#[test]
fn encodes_indexed_png_with_transparent_background() {
    let mut c = canvas(32, 16);
    c.draw_circle(16, 8, 3, PRIMARY_INDEX);
    let bytes = c.encode().unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (32, 16));
    assert_eq!(img.get_pixel(0, 0).0[3], 0);
    let p = c.palette().primary();
    assert_eq!(img.get_pixel(16, 8).0, [p.r, p.g, p.b, 255]);
}
