use fenris_functions::element::{ElementGeometry, Quad4d2Element, Segment1dElement, Tri3d2Element};
use fenris_functions::lambda::SmoothLambdaFunction;
use fenris_functions::localizable::{AsLocalizable, LocalFunction};
use fenris_functions::{DerivativeRange, Parameter, ParameterType, SmoothFunction};
use matrixcompare::assert_scalar_eq;
use nalgebra::{Matrix1, Point1, Point2, Vector2};
use proptest::prelude::*;
use util::{assert_approx_matrix_eq, finite_difference_jacobian};

/// $f(x) = [x_0^2 x_1, x_0 + x_1^3]$ with all derivatives.
fn cubic() -> SmoothLambdaFunction<f64, 2, 2, 1> {
    let partial = |beta: [usize; 2], x: &Point2<f64>| -> Vector2<f64> {
        let first = match beta {
            [0, 0] => x[0] * x[0] * x[1],
            [1, 0] => 2.0 * x[0] * x[1],
            [0, 1] => x[0] * x[0],
            [2, 0] => 2.0 * x[1],
            [1, 1] => 2.0 * x[0],
            [2, 1] => 2.0,
            _ => 0.0,
        };
        let second = match beta {
            [0, 0] => x[0] + x[1].powi(3),
            [1, 0] => 1.0,
            [0, 1] => 3.0 * x[1] * x[1],
            [0, 2] => 6.0 * x[1],
            [0, 3] => 6.0,
            _ => 0.0,
        };
        Vector2::new(first, second)
    };
    SmoothLambdaFunction::<f64, 2, 2, 1>::new(3)
        .with_evaluate(move |x, _| partial([0, 0], x))
        .with_jacobian(move |x, _| DerivativeRange::from_axes(&[partial([1, 0], x), partial([0, 1], x)]))
        .with_derivative(move |alpha, x, _| {
            let [a0, a1] = *alpha;
            DerivativeRange::from_axes(&[partial([a0 + 1, a1], x), partial([a0, a1 + 1], x)])
        })
        .with_name("cubic")
}

#[test]
fn localized_segment_evaluates_at_mapped_point() {
    let f = SmoothLambdaFunction::<f64, 1, 1, 1>::new(1)
        .with_evaluate(|x, param| Matrix1::new(x[0] + param.scalar("_t").unwrap()))
        .with_parameter_type(ParameterType::empty().with("_t", 1));
    let param = Parameter::empty().with("_t", [1.0]);

    for offset in [-2.0, 0.0, 3.5] {
        let element = Segment1dElement::from_interval([offset - 1.0, offset + 1.0]);
        let local = f.local_function(&element);
        let value = local.evaluate(&Point1::new(0.3), &param).unwrap();
        assert_scalar_eq!(value[0], offset + 1.3, comp = abs, tol = 1e-12);
    }
}

#[test]
fn localizable_rebinds_to_new_elements() {
    let f = cubic();
    let localizable = f.as_localizable::<Tri3d2Element<f64>>();
    let param = Parameter::empty();
    let xi = Point2::new(-0.2, 0.1);

    let first = Tri3d2Element::reference();
    let second = Tri3d2Element::from_vertices([Point2::new(1.0, 1.0), Point2::new(3.0, 1.0), Point2::new(1.0, 2.0)]);
    for element in [first, second] {
        let local = localizable.local_function(&element);
        let x = element.map_reference_coords(&xi);
        assert_eq!(local.element(), &element);
        assert_eq!(local.evaluate(&xi, &param).unwrap(), f.evaluate(&x, &param).unwrap());
        assert_eq!(local.jacobian(&xi, &param).unwrap(), f.jacobian(&x, &param).unwrap());
        assert_eq!(local.order(&param).unwrap(), 3);
    }
}

#[test]
fn reference_jacobian_on_bilinear_quad_matches_finite_differences() {
    let f = cubic();
    let element = Quad4d2Element::from_vertices([
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.2),
        Point2::new(2.5, 1.8),
        Point2::new(-0.3, 1.2),
    ]);
    assert!(!element.is_affine());
    let local = f.local_function(&element);
    let param = Parameter::empty();

    for xi in [Point2::new(0.0, 0.0), Point2::new(-0.7, 0.4), Point2::new(0.9, -0.9)] {
        let composed = |eta: &Vector2<f64>| local.evaluate(&Point2::from(*eta), &param).unwrap();
        let expected = finite_difference_jacobian(composed, &xi.coords, 1e-6);
        let reference_jacobian = local.reference_jacobian(&xi, &param).unwrap();
        assert_approx_matrix_eq!(reference_jacobian.column(0), &expected, abstol = 1e-6);
        // The zero multi-index gives the reference jacobian also on non-affine elements
        assert_eq!(local.reference_derivative(&[0, 0], &xi, &param).unwrap(), reference_jacobian);
    }
}

#[test]
fn higher_reference_derivatives_on_non_affine_elements_are_not_implemented() {
    let f = cubic();
    let element = Quad4d2Element::from_vertices([
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.5, 1.5),
        Point2::new(0.0, 1.0),
    ]);
    let err = f
        .local_function(&element)
        .reference_derivative(&[1, 0], &Point2::origin(), &Parameter::empty())
        .unwrap_err();
    assert!(err.is_not_implemented());
    assert!(err.to_string().contains("cubic"));
}

#[test]
fn second_reference_derivative_on_affine_triangle() {
    let f = cubic();
    let element = Tri3d2Element::from_vertices([Point2::new(0.5, -0.5), Point2::new(2.0, 0.0), Point2::new(0.0, 1.5)]);
    let local = f.local_function(&element);
    let param = Parameter::empty();

    for xi in [Point2::new(-0.5, -0.5), Point2::new(0.2, -0.6)] {
        for (alpha, axis) in [([1, 0], 0), ([0, 1], 1)] {
            let reference_partial =
                |eta: &Vector2<f64>| local.reference_jacobian(&Point2::from(*eta), &param).unwrap().axis(axis);
            let expected = finite_difference_jacobian(reference_partial, &xi.coords, 1e-6);
            let derivative = local.reference_derivative(&alpha, &xi, &param).unwrap();
            assert_approx_matrix_eq!(derivative.column(0), &expected, abstol = 1e-5);
        }
    }
}

#[test]
fn third_reference_derivative_on_affine_triangle() {
    // On the reference triangle x = (xi + 1) / 2, so every reference derivative of order n picks up 2^-n
    let f = cubic();
    let element = Tri3d2Element::<f64>::from_vertices([Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)]);
    let local = f.local_function(&element);
    let param = Parameter::empty();
    let xi = Point2::new(-0.3, 0.1);
    let x = element.map_reference_coords(&xi);

    let alpha = [1, 1];
    let global = f.derivative(&alpha, &x, &param).unwrap();
    let reference = local.reference_derivative(&alpha, &xi, &param).unwrap();
    assert_approx_matrix_eq!(reference.column(0), &(global.column(0) * 0.125), abstol = 1e-12);
}

proptest! {
    #[test]
    fn localization_on_affine_elements_agrees_with_global_evaluation(
        element in any::<Tri3d2Element<f64>>(),
        xi in [-1.0..0.0, -1.0..0.0],
    ) {
        let f = cubic();
        let local = f.local_function(&element);
        let param = Parameter::empty();
        let xi = Point2::new(xi[0], xi[1]);

        let j = element.reference_jacobian(&xi);
        let b = element.map_reference_coords(&Point2::origin());
        let x = Point2::from(j * xi.coords + b.coords);
        let local_value = local.evaluate(&xi, &param).unwrap();
        let global_value = f.evaluate(&x, &param).unwrap();
        let scale = 1.0 + global_value.abs().max();
        prop_assert!((local_value - global_value).abs().max() <= 1e-10 * scale);

        // Chain rule with the constant element jacobian
        let expected = f.jacobian(&x, &param).unwrap().transform_gradients(&j);
        let reference_jacobian = local.reference_jacobian(&xi, &param).unwrap();
        prop_assert!((reference_jacobian.column(0) - expected.column(0)).abs().max() <= 1e-10 * scale.max(expected.max_abs()));
    }
}
