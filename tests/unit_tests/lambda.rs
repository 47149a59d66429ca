use fenris_functions::error::Capability;
use fenris_functions::lambda::SmoothLambdaFunction;
use fenris_functions::{DerivativeRange, Parameter, ParameterType, Parametric, SmoothFunction};
use nalgebra::{Matrix1, Point1, Point2, Vector2};

#[test]
fn lambda_without_evaluate_is_not_implemented() {
    let f = SmoothLambdaFunction::<f64, 2, 1, 1>::new(2).with_name("no_values");
    let param = Parameter::empty();
    assert_eq!(f.order(&param).unwrap(), 2);
    assert!(!f.provides(Capability::Evaluate));

    let err = f.evaluate(&Point2::origin(), &param).unwrap_err();
    assert!(err.is_not_implemented());
    assert!(err.to_string().contains("no_values"));
    assert!(f.jacobian(&Point2::origin(), &param).unwrap_err().is_not_implemented());
    assert!(f.derivative(&[1, 1], &Point2::origin(), &param).unwrap_err().is_not_implemented());
}

#[test]
fn lambda_identification() {
    let f = SmoothLambdaFunction::<f64, 1, 1, 1>::new(0);
    assert_eq!(f.name(), "smooth_lambda_function");
    assert_eq!(f.type_name(), "smooth_lambda_function");
    assert_eq!(SmoothLambdaFunction::<f64, 1, 1, 1>::STATIC_ID, "fenris.functions.smooth.lambda");
}

#[test]
fn parametric_lambda_checks_parameter_before_evaluation() {
    let f = SmoothLambdaFunction::<f64, 1, 1, 1>::with_order_fn(|param| param.get("degree").map_or(0, |d| d[0] as usize))
        .with_evaluate(|x, param| {
            // The parameter is checked before we get here
            Matrix1::new(x[0] + param.scalar("_t").unwrap())
        })
        .with_parameter_type(ParameterType::empty().with("_t", 1).with("degree", 1));
    assert!(f.is_parametric());

    let param = Parameter::empty().with("_t", [1.0]).with("degree", [3.0]);
    assert_eq!(f.order(&param).unwrap(), 3);
    assert_eq!(f.evaluate(&Point1::new(0.25), &param).unwrap()[0], 1.25);

    let missing = Parameter::empty().with("degree", [3.0]);
    assert!(f.evaluate(&Point1::new(0.25), &missing).unwrap_err().is_parameter_mismatch());
    assert!(f.order(&Parameter::empty()).unwrap_err().is_parameter_mismatch());
}

#[test]
fn lambda_with_all_capabilities() {
    // f(x) = [x0 x1, x0 + x1]
    let f = SmoothLambdaFunction::<f64, 2, 2, 1>::new(2)
        .with_evaluate(|x, _| Vector2::new(x[0] * x[1], x[0] + x[1]))
        .with_jacobian(|x, _| DerivativeRange::from_fn(|i, _, k| if i == 0 { x[1 - k] } else { 1.0 }))
        .with_derivative(|alpha, x, _| {
            DerivativeRange::from_fn(|i, _, k| {
                let mut beta = *alpha;
                beta[k] += 1;
                match (i, beta) {
                    (0, [1, 0]) => x[1],
                    (0, [0, 1]) => x[0],
                    (0, [1, 1]) => 1.0,
                    (1, [1, 0]) | (1, [0, 1]) => 1.0,
                    _ => 0.0,
                }
            })
        });
    let param = Parameter::empty();
    let x = Point2::new(2.0, 3.0);
    assert_eq!(f.evaluate(&x, &param).unwrap(), Vector2::new(6.0, 5.0));
    assert_eq!(f.jacobian_component(&x, 0, 0, &param).unwrap(), Vector2::new(3.0, 2.0));
    assert_eq!(f.derivative_component(&[1, 0], &x, 0, 0, &param).unwrap(), Vector2::new(0.0, 1.0));
    assert_eq!(f.derivative(&[0, 0], &x, &param).unwrap(), f.jacobian(&x, &param).unwrap());
    assert_eq!(f.derivative_component(&[0, 1], &x, 1, 0, &param).unwrap(), Vector2::zeros());
    assert!(f.provides(Capability::Derivative));
}
