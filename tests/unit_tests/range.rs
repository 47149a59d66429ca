use fenris_functions::constant::ConstantFunction;
use fenris_functions::range::{DerivativeRangeSelector, RangeSelector};
use fenris_functions::{DerivativeRange, Shape, SmoothFunction};
use nalgebra::{DVector, Matrix2, Matrix2x3, Matrix3x2, SMatrix};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use util::assert_approx_matrix_eq;

/// Static to dynamic and back for values and derivatives of shape $D \to R \times C$, with entries
/// taken from `entries` in the dynamic layout.
fn check_round_trip<const D: usize, const R: usize, const C: usize>(entries: &[f64]) -> Result<(), TestCaseError> {
    let value = SMatrix::<f64, R, C>::from_fn(|i, j| entries[i * C + j]);
    let dynamic = RangeSelector::to_dynamic(&value);
    prop_assert_eq!(dynamic.as_slice(), &entries[..R * C]);
    prop_assert_eq!(RangeSelector::<f64, R, C>::from_dynamic(&dynamic).unwrap(), value);

    let derivative = DerivativeRange::<f64, D, R, C>::from_fn(|i, j, k| entries[(i * C + j) * D + k]);
    let dynamic = DerivativeRangeSelector::to_dynamic(&derivative);
    prop_assert_eq!(dynamic.as_slice(), &entries[..D * R * C]);
    prop_assert_eq!(
        DerivativeRangeSelector::<f64, D, R, C>::from_dynamic(&dynamic).unwrap(),
        derivative
    );
    Ok(())
}

proptest! {
    #[test]
    fn round_trip_is_identity_for_all_shapes(entries in vec(-10.0..10.0f64, 18)) {
        // Scalar, vector and matrix valued functions
        check_round_trip::<1, 1, 1>(&entries)?;
        check_round_trip::<2, 1, 1>(&entries)?;
        check_round_trip::<3, 3, 1>(&entries)?;
        check_round_trip::<1, 2, 3>(&entries)?;
        check_round_trip::<3, 2, 3>(&entries)?;
        check_round_trip::<3, 3, 2>(&entries)?;
    }

    #[test]
    fn value_round_trip_is_identity(entries in vec(-10.0..10.0f64, 6)) {
        let value = Matrix2x3::from_row_slice(&entries);
        let dynamic = RangeSelector::to_dynamic(&value);
        // Row-major layout
        prop_assert_eq!(dynamic.as_slice(), entries.as_slice());
        prop_assert_eq!(RangeSelector::<f64, 2, 3>::from_dynamic(&dynamic).unwrap(), value);
    }

    #[test]
    fn derivative_round_trip_is_identity(entries in vec(-10.0..10.0f64, 12)) {
        let derivative = DerivativeRange::<f64, 2, 3, 2>::from_fn(|i, j, k| entries[(i * 2 + j) * 2 + k]);
        let dynamic = DerivativeRangeSelector::to_dynamic(&derivative);
        prop_assert_eq!(dynamic.as_slice(), entries.as_slice());
        prop_assert_eq!(
            DerivativeRangeSelector::<f64, 2, 3, 2>::from_dynamic(&dynamic).unwrap(),
            derivative
        );
    }
}

#[test]
fn convert_requires_ensured_size() {
    let value = Matrix3x2::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
    let mut dynamic = DVector::zeros(0);
    RangeSelector::<f64, 3, 2>::ensure_size(&mut dynamic);
    RangeSelector::convert(&value, &mut dynamic);
    assert_eq!(dynamic, DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    assert_eq!(RangeSelector::<f64, 3, 2>::size(), 6);
    assert_eq!(DerivativeRangeSelector::<f64, 2, 3, 2>::size(), 12);
}

#[test]
fn transform_gradients_applies_chain_rule() {
    let jacobian = Matrix2::new(1.0, 2.0, 3.0, 4.0);
    let a = Matrix2::new(0.5, -1.0, 2.0, 0.0);
    let derivative: DerivativeRange<f64, 2, 2, 1> = jacobian.into();
    let transformed = derivative.transform_gradients(&a);
    assert_approx_matrix_eq!(*transformed.column(0), jacobian * a, abstol = 1e-14);
}

#[test]
fn axes_and_columns_describe_the_same_derivative() {
    let axes = [
        Matrix2x3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
        Matrix2x3::new(-1.0, -2.0, -3.0, -4.0, -5.0, -6.0),
    ];
    let derivative = DerivativeRange::from_axes(&axes);
    assert_eq!(derivative.axis(0), axes[0]);
    assert_eq!(derivative.axis(1), axes[1]);
    assert_eq!(derivative.get(1, 2, 1), -6.0);
    assert_eq!(derivative.max_abs(), 6.0);
    assert_eq!((derivative + derivative).axis(0), axes[0] * 2.0);
    assert_eq!((-derivative).axis(1), axes[0]);
}

#[test]
fn static_shapes_are_known_at_compile_time() {
    const SHAPE: Shape = Shape::of::<3, 2, 1>();
    assert_eq!(SHAPE, Shape::new(3, 2, 1));
    assert_eq!(SHAPE.derivative_size(), 6);

    let f = ConstantFunction::<f64, 3, 2, 2>::new(SMatrix::zeros());
    assert_eq!(f.shape(), Shape::of::<3, 2, 2>());
    assert!(Shape::try_new(2, 0, 1).unwrap_err().is_shape_mismatch());
}
