use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn hsl_primaries_convert_exactly() {
    assert_eq!(Hsla::hsl(0.0, 100.0, 50.0).to_rgba8(), [255, 0, 0, 255]);
    assert_eq!(Hsla::hsl(120.0, 100.0, 50.0).to_rgba8(), [0, 255, 0, 255]);
    assert_eq!(Hsla::hsl(240.0, 100.0, 50.0).to_rgba8(), [0, 0, 255, 255]);
    assert_eq!(Hsla::new(0.0, 0.0, 100.0, 0.5).to_rgba8(), [255, 255, 255, 128]);
    assert_eq!(Hsla::hsl(-120.0, 100.0, 50.0).to_hex(), "#0000ff");
}

#[test]
fn premultiplied_conversion_scales_channels() {
    let p = Hsla::new(0.0, 100.0, 50.0, 0.5).to_premul();
    assert_eq!(p.a, 128);
    assert_eq!(p.r, 128);
    assert_eq!(p.g, 0);
}

#[test]
fn brightness_matches_hsb_value() {
    assert!(approx(Hsla::hsl(0.0, 100.0, 50.0).brightness(), 100.0));
    assert!(approx(Hsla::hsl(0.0, 0.0, 10.0).brightness(), 10.0));
    assert!(approx(Hsla::hsl(200.0, 50.0, 20.0).brightness(), 30.0));
}

#[test]
fn hsb_round_trip_preserves_brightness() {
    let c = Hsla::from_hsb(40.0, 20.0, 90.0, 1.0);
    assert!((c.brightness() - 90.0).abs() < 1e-9);
    assert!(approx(c.h, 40.0));
}

#[test]
fn hue_distance_wraps() {
    assert!(approx(hue_distance(350.0, 10.0), 20.0));
    assert!(approx(hue_distance(0.0, 180.0), 180.0));
    assert!(approx(hue_distance(-30.0, 30.0), 60.0));
}

#[test]
fn scheme_offsets_follow_harmony_rules() {
    let mut rng = SessionRng::seeded(5);
    let hues = |p: &Palette| p.colors().iter().map(|c| c.h).collect::<Vec<_>>();

    let p = Palette::from_scheme(&mut rng, Scheme::Complementary, 10.0);
    assert_eq!(hues(&p), vec![10.0, 190.0, 10.0, 190.0, 10.0]);

    let p = Palette::from_scheme(&mut rng, Scheme::SplitComplementary, 0.0);
    assert_eq!(hues(&p), vec![0.0, 150.0, 210.0, 0.0, 150.0]);

    let p = Palette::from_scheme(&mut rng, Scheme::Triadic, 300.0);
    assert_eq!(hues(&p), vec![300.0, 60.0, 180.0, 300.0, 60.0]);

    let p = Palette::from_scheme(&mut rng, Scheme::Analogous, 20.0);
    assert_eq!(hues(&p), vec![320.0, 350.0, 20.0, 50.0, 80.0]);

    for c in p.colors() {
        assert!((40.0..95.0).contains(&c.s));
        assert!((30.0..90.0).contains(&c.l));
    }
}

#[test]
fn colorful_filter_is_idempotent() {
    for seed in 0..20 {
        let mut rng = SessionRng::seeded(seed);
        let palette = Palette::harmonious(&mut rng);
        let once = palette.colorful();
        let twice = once.colorful();
        assert_eq!(once, twice);
        assert!(once.colors().iter().all(is_colorful));
    }
}

#[test]
fn harmonious_palette_has_anchors_and_separated_families() {
    let mut rng = SessionRng::seeded(11);
    let p = Palette::harmonious(&mut rng);
    assert_eq!(p.colors()[0], Hsla::hsl(0.0, 0.0, 10.0));
    assert_eq!(p.colors()[1].l, 90.0);
    assert!(p.len() >= 2 + 5);
    assert!(!is_colorful(&p.colors()[0]));
    for c in &p.colors()[2..] {
        assert!((65.0..=100.0).contains(&c.s));
        assert!((30.0..=75.0).contains(&c.l));
    }
}

#[test]
fn pickers_fall_back_on_empty_palettes() {
    let mut rng = SessionRng::seeded(3);
    let empty = Palette::default();
    let c = pick_colorful(&mut rng, &empty);
    assert!((70.0..100.0).contains(&c.s));

    let only_black = Palette::new(vec![Hsla::hsl(0.0, 0.0, 5.0)]);
    assert_eq!(pick_colorful(&mut rng, &only_black), Hsla::hsl(0.0, 0.0, 5.0));

    let first = first_skeleton_color(&mut rng, &only_black);
    assert!((40.0..70.0).contains(&first.l));
}

#[test]
fn rogue_color_perturbs_collisions() {
    let red = Hsla::hsl(0.0, 80.0, 50.0);
    let single = Palette::new(vec![red]);
    let mut hits = 0;
    for seed in 0..200 {
        let mut rng = SessionRng::seeded(seed);
        let c = rogue_color(&mut rng, Some(&single), Some(red));
        assert_ne!(c, red);
        if c.h == 80.0 {
            hits += 1;
            assert!(approx(c.s, 68.0));
            assert!(approx(c.l, 57.5));
        }
    }
    // Roughly one in five draws samples the palette and collides.
    assert!(hits > 10, "hits={hits}");
}

#[test]
fn palette_variety_second_skeleton_excludes_first() {
    let a = Hsla::hsl(10.0, 70.0, 40.0);
    let b = Hsla::hsl(200.0, 70.0, 40.0);
    let palette = Palette::new(vec![a, b]);
    for seed in 0..30 {
        let mut rng = SessionRng::seeded(seed);
        assert_eq!(contrasting_color(&mut rng, a, &palette, ColorVariety::Palette), b);
    }

    let lonely = Palette::new(vec![a]);
    let mut rng = SessionRng::seeded(1);
    let c = contrasting_color(&mut rng, a, &lonely, ColorVariety::Palette);
    assert!(approx(hue_distance(c.h, a.h), 180.0));
}

#[test]
fn halo_source_falls_back_to_self() {
    let pale = Palette::new(vec![Hsla::hsl(0.0, 10.0, 50.0)]);
    assert_eq!(pale.halo_source(), pale);
}
