use super::*;
use ndarray::array;

fn style(ppc: u32) -> FrameStyle {
    FrameStyle {
        cmap: Colormap::Gray,
        vmax: 1.0,
        pixels_per_cell: ppc,
        cbar: false,
        outline_alpha: 0.5,
    }
}

#[test]
fn phase_snapshot_rotates_through_quarter_turns() {
    let val = array![[Complex64::new(1.0, 0.0), Complex64::new(0.0, 2.0)]];
    let s0 = phase_snapshot(val.view(), 0, 4);
    let s1 = phase_snapshot(val.view(), 1, 4);
    let s2 = phase_snapshot(val.view(), 2, 4);

    assert!((s0[[0, 0]] - 1.0).abs() < 1e-12);
    assert!((s0[[0, 1]] - 0.0).abs() < 1e-12);
    // exp(i*pi/2) = i: (1)(i) -> re 0, (2i)(i) -> -2.
    assert!(s1[[0, 0]].abs() < 1e-12);
    assert!((s1[[0, 1]] + 2.0).abs() < 1e-12);
    assert!((s2[[0, 0]] + 1.0).abs() < 1e-12);
}

#[test]
fn vmax_defaults_to_largest_magnitude() {
    let val = array![[Complex64::new(3.0, 4.0), Complex64::new(-1.0, 0.0)]];
    assert!((field_vmax(val.view(), None) - 5.0).abs() < 1e-12);
    assert_eq!(field_vmax(val.view(), Some(2.0)), 2.0);
}

#[test]
fn orientation_is_x_right_y_up() {
    // values[[i, j]]: i is x, j is y.
    let values = array![[-1.0, 1.0], [1.0, 1.0]];
    let frame = render_field(values.view(), &style(1), None).unwrap();
    assert_eq!((frame.width, frame.height), (2, 2));
    // (x=0, y=0) is the bottom-left pixel.
    assert_eq!(frame.pixel(0, 1), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(1, 1), [255, 255, 255, 255]);
}

#[test]
fn cells_are_scaled_up() {
    let values = array![[0.0], [1.0], [-1.0]];
    let frame = render_field(values.view(), &style(3), None).unwrap();
    assert_eq!((frame.width, frame.height), (9, 3));
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(frame.pixel(x, y), Colormap::Gray.sample(0.5));
            assert_eq!(frame.pixel(x + 3, y), [255, 255, 255, 255]);
            assert_eq!(frame.pixel(x + 6, y), [0, 0, 0, 255]);
        }
    }
}

#[test]
fn colorbar_adds_a_gradient_strip() {
    let values = Array2::<f64>::zeros((5, 2));
    let st = FrameStyle {
        cbar: true,
        ..style(2)
    };
    let frame = render_field(values.view(), &st, None).unwrap();
    assert_eq!(frame.width, 10);
    assert_eq!(frame.height, 4 + CBAR_GAP_PX + CBAR_HEIGHT_PX);
    let bar_y = frame.height - 1;
    assert_eq!(frame.pixel(0, bar_y), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(9, bar_y), [255, 255, 255, 255]);
    assert_eq!(frame.pixel(3, 4), CBAR_GAP_RGBA);
}

#[test]
fn outline_darkens_boundary_pixels_only() {
    let values = Array2::<f64>::from_elem((4, 1), 1.0);
    let outline = array![[1.0], [1.0], [5.0], [5.0]];
    let o = Outline::new(outline.view(), OutlineLevel::Auto).unwrap();
    let frame = render_field(values.view(), &style(2), Some(&o)).unwrap();

    let white = [255, 255, 255, 255];
    let half = [128, 128, 128, 255];
    // The boundary between cell 1 and cell 2 sits between pixel columns 3 and 4.
    assert_eq!(frame.pixel(3, 0), half);
    assert_eq!(frame.pixel(3, 1), half);
    assert_eq!(frame.pixel(2, 0), white);
    assert_eq!(frame.pixel(4, 0), white);
    assert_eq!(frame.pixel(7, 1), white);
}

#[test]
fn zero_level_outlines_a_binary_mask() {
    let values = Array2::<f64>::zeros((4, 1));
    let outline = array![[0.0], [0.0], [1.0], [1.0]];
    let o = Outline::new(outline.view(), OutlineLevel::Value(0.0)).unwrap();
    let st = FrameStyle {
        outline_alpha: 1.0,
        ..style(1)
    };
    let frame = render_field(values.view(), &st, Some(&o)).unwrap();

    let mid = Colormap::Gray.sample(0.5);
    assert_eq!(frame.pixel(0, 0), mid);
    assert_eq!(frame.pixel(1, 0), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(2, 0), mid);
    assert_eq!(frame.pixel(3, 0), mid);
}

#[test]
fn cells_equal_to_the_level_count_as_below() {
    let outline = array![[0.0, 0.5], [1.0, -1.0]];
    let o = Outline::new(outline.view(), OutlineLevel::Value(0.0)).unwrap();
    assert_eq!(o.above, array![[false, true], [true, false]]);
}

#[test]
fn auto_level_needs_finite_values() {
    let outline = array![[f64::NAN]];
    assert!(Outline::new(outline.view(), OutlineLevel::Auto).is_none());
}

#[test]
fn outline_shape_must_match() {
    let values = Array2::<f64>::zeros((3, 3));
    let outline = Array2::<f64>::zeros((2, 3));
    let o = Outline::new(outline.view(), OutlineLevel::Value(0.5)).unwrap();
    let err = render_field(values.view(), &style(1), Some(&o)).unwrap_err();
    assert!(matches!(err, InvdesError::Shape(_)));
}

#[test]
fn empty_field_is_rejected() {
    let values = Array2::<f64>::zeros((0, 3));
    assert!(render_field(values.view(), &style(1), None).is_err());
}
