use fenris_functions::combined::{
    difference, divergence, function_scalar_product, product, scalar_product, sum, Combination,
};
use fenris_functions::constant::ConstantFunction;
use fenris_functions::lambda::SmoothLambdaFunction;
use fenris_functions::{DerivativeRange, Parameter, ParameterType, Parametric, SmoothFunction};
use nalgebra::{Matrix1, Point2, SMatrix, Vector2};
use util::{assert_approx_matrix_eq, finite_difference_gradient, finite_difference_jacobian};

/// $\partial^\beta x^e$ for a monomial in two variables.
fn monomial_partial(exponents: [u32; 2], beta: [usize; 2], x: &Point2<f64>) -> f64 {
    (0..2).fold(1.0, |acc, i| {
        let (e, b) = (exponents[i] as usize, beta[i]);
        if b > e {
            return 0.0;
        }
        let falling_factorial = ((e - b + 1)..=e).product::<usize>() as f64;
        acc * falling_factorial * x[i].powi((e - b) as i32)
    })
}

/// A function whose entries are the monomials $x^{e_{ij}}$, with all derivatives.
fn monomials<const R: usize, const C: usize>(
    name: &str,
    exponents: [[[u32; 2]; C]; R],
) -> SmoothLambdaFunction<f64, 2, R, C> {
    let order = exponents.iter().flatten().map(|e| (e[0] + e[1]) as usize).max().unwrap_or(0);
    SmoothLambdaFunction::<f64, 2, R, C>::new(order)
        .with_evaluate(move |x, _| SMatrix::from_fn(|i, j| monomial_partial(exponents[i][j], [0, 0], x)))
        .with_jacobian(move |x, _| {
            DerivativeRange::from_fn(|i, j, k| {
                let mut beta = [0, 0];
                beta[k] += 1;
                monomial_partial(exponents[i][j], beta, x)
            })
        })
        .with_derivative(move |alpha, x, _| {
            DerivativeRange::from_fn(|i, j, k| {
                let mut beta = *alpha;
                beta[k] += 1;
                monomial_partial(exponents[i][j], beta, x)
            })
        })
        .with_name(name)
}

fn sample_points() -> Vec<Point2<f64>> {
    vec![Point2::new(0.3, -1.2), Point2::new(1.5, 0.7), Point2::new(-0.8, 2.1)]
}

#[test]
fn sum_and_difference_are_pointwise() {
    let f = monomials("f", [[[2, 0]], [[1, 1]]]);
    let g = monomials("g", [[[0, 3]], [[1, 0]]]);
    let param = Parameter::empty();

    let f_plus_g = sum(&f, &g).unwrap();
    let f_minus_g = difference(&f, &g).unwrap();
    assert_eq!(f_plus_g.name(), "(f + g)");
    assert_eq!(f_minus_g.name(), "(f - g)");
    assert_eq!(f_plus_g.type_name(), Combination::Sum.type_name());
    assert_eq!(f_minus_g.order(&param).unwrap(), 3);

    for x in sample_points() {
        let (fx, gx) = (f.evaluate(&x, &param).unwrap(), g.evaluate(&x, &param).unwrap());
        assert_eq!(f_plus_g.evaluate(&x, &param).unwrap(), fx + gx);
        assert_eq!(f_minus_g.evaluate(&x, &param).unwrap(), fx - gx);

        let (df, dg) = (f.jacobian(&x, &param).unwrap(), g.jacobian(&x, &param).unwrap());
        assert_eq!(f_plus_g.jacobian(&x, &param).unwrap(), df + dg);
        assert_eq!(f_minus_g.jacobian(&x, &param).unwrap(), df - dg);

        let alpha = [0, 1];
        let expected = g.derivative(&alpha, &x, &param).unwrap() - f.derivative(&alpha, &x, &param).unwrap();
        assert_eq!(difference(&g, &f).unwrap().derivative(&alpha, &x, &param).unwrap(), expected);
    }
}

#[test]
fn product_of_constants() {
    let five = ConstantFunction::<f64, 2, 1, 1>::from_scalar(5.0).with_name("five");
    let two = ConstantFunction::<f64, 2, 1, 1>::from_scalar(2.0).with_name("two");
    let ten = product(five, two).unwrap();
    let param = Parameter::empty();
    let x = Point2::new(0.5, 0.25);

    assert_eq!(ten.name(), "(five * two)");
    assert_eq!(ten.evaluate(&x, &param).unwrap(), Matrix1::new(10.0));
    assert_eq!(ten.jacobian(&x, &param).unwrap(), DerivativeRange::zeros());
    assert_eq!(ten.order(&param).unwrap(), 0);
}

#[test]
fn scalar_product_satisfies_product_rule() {
    let s = monomials("s", [[[1, 2]]]);
    let f = monomials("f", [[[2, 0]], [[0, 1]]]);
    let sf = scalar_product(&s, &f).unwrap();
    let param = Parameter::empty();
    assert_eq!(sf.order(&param).unwrap(), 5);

    for x in sample_points() {
        let value = |y: &Vector2<f64>| sf.evaluate(&Point2::from(*y), &param).unwrap();
        let expected = finite_difference_jacobian(value, &x.coords, 1e-6);
        let jacobian = sf.jacobian(&x, &param).unwrap();
        assert_approx_matrix_eq!(jacobian.column(0), &expected, abstol = 1e-6);

        // Second derivatives from the Leibniz rule against differences of the jacobian
        for (alpha, axis) in [([1, 0], 0), ([0, 1], 1)] {
            let partial = |y: &Vector2<f64>| sf.jacobian(&Point2::from(*y), &param).unwrap().axis(axis);
            let expected = finite_difference_jacobian(partial, &x.coords, 1e-6);
            let derivative = sf.derivative(&alpha, &x, &param).unwrap();
            assert_approx_matrix_eq!(derivative.column(0), &expected, abstol = 1e-5);
        }
    }
}

#[test]
fn scalar_broadcasts_from_the_right() {
    let f = monomials("f", [[[2, 0], [1, 1]], [[0, 1], [3, 0]]]);
    let s = monomials("s", [[[1, 2]]]);
    let fs = function_scalar_product(&f, &s).unwrap();
    let sf = scalar_product(&s, &f).unwrap();
    let param = Parameter::empty();
    assert_eq!(fs.name(), "(f * s)");
    assert_eq!(fs.type_name(), Combination::Product.type_name());
    assert_eq!(fs.order(&param).unwrap(), 6);

    for x in sample_points() {
        let expected = f.evaluate(&x, &param).unwrap() * s.evaluate(&x, &param).unwrap()[0];
        assert_approx_matrix_eq!(fs.evaluate(&x, &param).unwrap(), expected, abstol = 1e-12);

        for (i, j) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            let entry = |y: &Vector2<f64>| fs.evaluate(&Point2::from(*y), &param).unwrap()[(i, j)];
            let gradient = finite_difference_gradient(entry, &x.coords, 1e-6);
            assert_approx_matrix_eq!(fs.jacobian_component(&x, i, j, &param).unwrap(), gradient, abstol = 1e-5);
        }

        for alpha in [[0, 0], [1, 0], [1, 1], [0, 2]] {
            let derivative = fs.derivative(&alpha, &x, &param).unwrap();
            let expected = sf.derivative(&alpha, &x, &param).unwrap();
            for j in 0..2 {
                assert_approx_matrix_eq!(derivative.column(j), expected.column(j), abstol = 1e-10);
            }
        }
    }
}

#[test]
fn matrix_product_satisfies_product_rule() {
    // Row vector times column vector
    let a = monomials("a", [[[1, 0], [0, 2]]]);
    let b = monomials("b", [[[1, 1]], [[3, 0]]]);
    let ab = product(&a, &b).unwrap();
    let param = Parameter::empty();

    for x in sample_points() {
        let expected = x[0] * x[0] * x[1] + x[1] * x[1] * x[0].powi(3);
        assert_approx_matrix_eq!(ab.evaluate(&x, &param).unwrap(), Matrix1::new(expected), abstol = 1e-12);

        let scalar = |y: &Vector2<f64>| ab.evaluate(&Point2::from(*y), &param).unwrap()[0];
        let gradient = finite_difference_gradient(scalar, &x.coords, 1e-6);
        assert_approx_matrix_eq!(ab.jacobian_component(&x, 0, 0, &param).unwrap(), gradient, abstol = 1e-6);

        let d_x1 = |y: &Vector2<f64>| ab.jacobian(&Point2::from(*y), &param).unwrap().get(0, 0, 1);
        let expected = finite_difference_gradient(d_x1, &x.coords, 1e-6);
        let derivative = ab.derivative_component(&[0, 1], &x, 0, 0, &param).unwrap();
        assert_approx_matrix_eq!(derivative, expected, abstol = 1e-5);
    }
}

#[test]
fn divergence_is_the_trace_of_the_jacobian() {
    let v = monomials("v", [[[2, 1]], [[1, 2]]]);
    let div = divergence(&v);
    let param = Parameter::empty();
    assert_eq!(div.name(), "div(v)");
    assert_eq!(div.order(&param).unwrap(), 2);

    for x in sample_points() {
        let trace = v.jacobian(&x, &param).unwrap().column(0).trace();
        assert_approx_matrix_eq!(div.evaluate(&x, &param).unwrap(), Matrix1::new(trace), abstol = 1e-12);
        // div v = 2 x0 x1 + 2 x0 x1
        assert_approx_matrix_eq!(div.evaluate(&x, &param).unwrap(), Matrix1::new(4.0 * x[0] * x[1]), abstol = 1e-12);

        let scalar = |y: &Vector2<f64>| div.evaluate(&Point2::from(*y), &param).unwrap()[0];
        let gradient = finite_difference_gradient(scalar, &x.coords, 1e-6);
        assert_approx_matrix_eq!(div.jacobian_component(&x, 0, 0, &param).unwrap(), gradient, abstol = 1e-6);
        assert_approx_matrix_eq!(
            div.derivative_component(&[1, 0], &x, 0, 0, &param).unwrap(),
            Vector2::new(0.0, 4.0),
            abstol = 1e-12
        );
    }
}

#[test]
fn combinations_merge_parameter_types() {
    let shifted = SmoothLambdaFunction::<f64, 2, 1, 1>::new(1)
        .with_evaluate(|x, param| Matrix1::new(x[0] + param.scalar("_t").unwrap()))
        .with_parameter_type(ParameterType::empty().with("_t", 1));
    let scaled = SmoothLambdaFunction::<f64, 2, 1, 1>::new(1)
        .with_evaluate(|x, param| Matrix1::new(x[1] * param.scalar("mu").unwrap()))
        .with_parameter_type(ParameterType::empty().with("mu", 1));

    let combined = sum(&shifted, &scaled).unwrap();
    assert!(combined.is_parametric());
    assert_eq!(combined.parameter_type(), &ParameterType::empty().with("_t", 1).with("mu", 1));

    let param = Parameter::empty().with("_t", [1.0]).with("mu", [2.0]);
    assert_eq!(combined.evaluate(&Point2::new(0.5, 3.0), &param).unwrap(), Matrix1::new(7.5));

    let only_t = Parameter::empty().with("_t", [1.0]);
    assert!(combined.evaluate(&Point2::new(0.5, 3.0), &only_t).unwrap_err().is_parameter_mismatch());

    let conflicting = SmoothLambdaFunction::<f64, 2, 1, 1>::new(1)
        .with_parameter_type(ParameterType::empty().with("_t", 2));
    assert!(sum(&shifted, &conflicting).unwrap_err().is_parameter_mismatch());
}

#[test]
fn missing_capabilities_propagate() {
    let f = SmoothLambdaFunction::<f64, 2, 1, 1>::new(1)
        .with_evaluate(|x, _| Matrix1::new(x[0]))
        .with_name("values_only");
    let g = ConstantFunction::<f64, 2, 1, 1>::from_scalar(1.0);
    let f_plus_g = sum(&f, &g).unwrap();
    let param = Parameter::empty();
    let x = Point2::new(1.0, 2.0);

    assert_eq!(f_plus_g.evaluate(&x, &param).unwrap(), Matrix1::new(2.0));
    let err = f_plus_g.jacobian(&x, &param).unwrap_err();
    assert!(err.is_not_implemented());
    assert!(err.to_string().contains("values_only"));
}
