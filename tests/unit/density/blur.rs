use super::*;
use ndarray::array;

fn naive_full_then_crop(x: &Array2<f64>, k: &Array2<f64>, radius: usize) -> Array2<f64> {
    let (rows, cols) = x.dim();
    let (kr, kc) = k.dim();
    let mut full = Array2::<f64>::zeros((rows + kr - 1, cols + kc - 1));
    for ((a, b), &v) in x.indexed_iter() {
        for ((p, q), &w) in k.indexed_iter() {
            full[[a + p, b + q]] += v * w;
        }
    }
    full.slice(s![radius..radius + rows, radius..radius + cols])
        .to_owned()
}

fn pattern(rows: usize, cols: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        (((i * 7 + j * 13) % 11) as f64) / 10.0
    })
}

#[test]
fn kernel_sums_to_one_with_odd_side() {
    for radius in 0..8 {
        let k = create_blur_kernel(radius);
        assert_eq!(k.dim(), (2 * radius + 1, 2 * radius + 1));
        assert!((k.sum() - 1.0).abs() < 1e-12, "radius {radius}");
    }
}

#[test]
fn kernel_radius_zero_is_a_single_cell() {
    assert_eq!(create_blur_kernel(0), array![[1.0]]);
}

#[test]
fn small_radii_fill_the_square() {
    let k = create_blur_kernel(2);
    assert!(k.iter().all(|&v| (v - 1.0 / 25.0).abs() < 1e-15));
}

#[test]
fn radius_three_drops_the_corners() {
    let k = create_blur_kernel(3);
    let on = k.iter().filter(|&&v| v > 0.0).count();
    assert_eq!(on, 45);
    assert_eq!(k[[0, 0]], 0.0);
    assert_eq!(k[[6, 6]], 0.0);
    assert!(k[[0, 1]] > 0.0);
    assert!(k[[3, 3]] > 0.0);
}

#[test]
fn kernel_is_symmetric() {
    let k = create_blur_kernel(5);
    assert_eq!(k, k.t());
    assert_eq!(k, k.slice(s![..;-1, ..]));
}

#[test]
fn radius_zero_returns_input() {
    let x = pattern(6, 4);
    let out = operator_blur(&x, BlurOpts { radius: 0, n: 3 });
    assert_eq!(out, x);
}

#[test]
fn preserves_shape() {
    let x = pattern(9, 5);
    let out = operator_blur(&x, BlurOpts { radius: 3, n: 2 });
    assert_eq!(out.dim(), x.dim());
}

#[test]
fn matches_naive_full_convolution() {
    let x = pattern(8, 11);
    for radius in 1..4 {
        let k = create_blur_kernel(radius);
        let expected = naive_full_then_crop(&x, &k, radius);
        let out = operator_blur(&x, BlurOpts { radius, n: 1 });
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}

#[test]
fn repeated_passes_compound() {
    let x = pattern(10, 10);
    let twice = operator_blur(&x, BlurOpts { radius: 1, n: 2 });
    let once = operator_blur(&x, BlurOpts { radius: 1, n: 1 });
    let again = operator_blur(&once, BlurOpts { radius: 1, n: 1 });
    assert_eq!(twice, again);
}

#[test]
fn interior_impulse_spreads_and_keeps_mass() {
    let mut x = Array2::<f64>::zeros((11, 11));
    x[[5, 5]] = 1.0;
    let out = operator_blur(&x, BlurOpts { radius: 2, n: 1 });
    assert!((out.sum() - 1.0).abs() < 1e-12);
    assert_eq!(out.iter().filter(|&&v| v > 0.0).count(), 25);
    assert!((out[[3, 3]] - 1.0 / 25.0).abs() < 1e-15);
}

#[test]
fn constant_field_stays_constant_away_from_borders() {
    let x = Array2::<f64>::from_elem((12, 12), 0.7);
    let out = operator_blur(&x, BlurOpts { radius: 2, n: 1 });
    assert!((out[[6, 6]] - 0.7).abs() < 1e-12);
    // Zero padding pulls the corner down.
    assert!(out[[0, 0]] < 0.7);
}

#[test]
fn input_smaller_than_kernel_is_fine() {
    let x = array![[1.0, 0.0], [0.0, 0.0]];
    let out = operator_blur(&x, BlurOpts { radius: 3, n: 1 });
    assert_eq!(out.dim(), (2, 2));
    assert!(out.iter().all(|&v| (v - 1.0 / 45.0).abs() < 1e-15));
}

#[test]
fn vjp_is_the_adjoint() {
    let x = pattern(7, 9);
    let y = Array2::from_shape_fn((7, 9), |(i, j)| ((i as f64) - 2.5) * 0.3 + (j as f64).sin());
    let opts = BlurOpts { radius: 2, n: 2 };

    let lhs = (&operator_blur(&x, opts) * &y).sum();
    let rhs = (&x * &operator_blur_vjp(&y, opts)).sum();
    assert!((lhs - rhs).abs() < 1e-10, "{lhs} vs {rhs}");
}

#[test]
fn shift_range_covers_overlap() {
    assert_eq!(shift_range(0, 5), (0, 0, 5));
    assert_eq!(shift_range(2, 5), (2, 0, 3));
    assert_eq!(shift_range(-2, 5), (0, 2, 3));
    assert_eq!(shift_range(5, 5), (0, 0, 0));
    assert_eq!(shift_range(-7, 5), (0, 0, 0));
}
