use super::*;

#[test]
fn rdbu_endpoints_and_center() {
    assert_eq!(Colormap::RdBu.sample(0.0), [103, 0, 31, 255]);
    assert_eq!(Colormap::RdBu.sample(0.5), [247, 247, 247, 255]);
    assert_eq!(Colormap::RdBu.sample(1.0), [5, 48, 97, 255]);
}

#[test]
fn reversed_map_mirrors() {
    for &t in &[0.0, 0.13, 0.5, 0.77, 1.0] {
        assert_eq!(Colormap::RdBuR.sample(t), Colormap::RdBu.sample(1.0 - t));
    }
}

#[test]
fn out_of_range_is_clamped() {
    assert_eq!(Colormap::Gray.sample(-3.0), [0, 0, 0, 255]);
    assert_eq!(Colormap::Gray.sample(7.0), [255, 255, 255, 255]);
}

#[test]
fn non_finite_maps_to_bad_color() {
    assert_eq!(Colormap::RdBu.sample(f64::NAN), BAD_RGBA);
    assert_eq!(Colormap::Gray.sample_symmetric(f64::NAN, 0.0), BAD_RGBA);
}

#[test]
fn symmetric_range_centers_zero() {
    assert_eq!(
        Colormap::RdBu.sample_symmetric(0.0, 2.0),
        Colormap::RdBu.sample(0.5)
    );
    assert_eq!(
        Colormap::RdBu.sample_symmetric(-2.0, 2.0),
        Colormap::RdBu.sample(0.0)
    );
    assert_eq!(
        Colormap::RdBu.sample_symmetric(5.0, 0.0),
        Colormap::RdBu.sample(0.5)
    );
}

#[test]
fn gray_is_monotonic() {
    let mut prev = 0u8;
    for i in 0..=100 {
        let c = Colormap::Gray.sample(f64::from(i) / 100.0);
        assert!(c[0] >= prev);
        prev = c[0];
    }
}

#[test]
fn parses_matplotlib_names() {
    assert_eq!("RdBu".parse::<Colormap>().unwrap(), Colormap::RdBu);
    assert_eq!("RdBu_r".parse::<Colormap>().unwrap(), Colormap::RdBuR);
    assert_eq!("gray".parse::<Colormap>().unwrap(), Colormap::Gray);
    assert!("viridis".parse::<Colormap>().is_err());

    let c: Colormap = serde_json::from_str("\"RdBu_r\"").unwrap();
    assert_eq!(c, Colormap::RdBuR);
}
