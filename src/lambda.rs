//! Smooth functions defined by closures.
use crate::error::{Capability, FunctionError};
use crate::function::SmoothFunction;
use crate::parameter::{Parameter, ParameterType, Parametric};
use crate::range::{assert_positive_dimensions, DerivativeRange};
use crate::Real;
use nalgebra::{Point, SMatrix};
use std::fmt;
use std::fmt::{Debug, Formatter};

pub type OrderLambda = Box<dyn Fn(&Parameter) -> usize + Send + Sync>;
pub type EvaluateLambda<T, const D: usize, const R: usize, const C: usize> =
    Box<dyn Fn(&Point<T, D>, &Parameter) -> SMatrix<T, R, C> + Send + Sync>;
pub type JacobianLambda<T, const D: usize, const R: usize, const C: usize> =
    Box<dyn Fn(&Point<T, D>, &Parameter) -> DerivativeRange<T, D, R, C> + Send + Sync>;
pub type DerivativeLambda<T, const D: usize, const R: usize, const C: usize> =
    Box<dyn Fn(&[usize; D], &Point<T, D>, &Parameter) -> DerivativeRange<T, D, R, C> + Send + Sync>;

/// A smooth function whose behavior is given by closures.
///
/// Evaluation, jacobian and derivative closures are optional. Capabilities without a closure fail with
/// [`FunctionError::NotImplemented`], just like the defaults of [`SmoothFunction`]. The parameter is
/// checked against the declared parameter type before any closure is called, and the closures receive
/// the checked parameter.
///
/// ```
/// use fenris_functions::lambda::SmoothLambdaFunction;
/// use fenris_functions::nalgebra::{Matrix1, Point1};
/// use fenris_functions::{Parameter, ParameterType, SmoothFunction};
///
/// let f = SmoothLambdaFunction::<f64, 1, 1, 1>::new(1)
///     .with_evaluate(|x, param| Matrix1::new(x[0] + param.scalar("_t").unwrap()))
///     .with_parameter_type(ParameterType::empty().with("_t", 1));
///
/// let param = Parameter::empty().with("_t", [1.0]);
/// let value = f.evaluate(&Point1::new(0.5), &param).unwrap();
/// assert_eq!(value[0], 1.5);
/// ```
pub struct SmoothLambdaFunction<T, const D: usize, const R: usize, const C: usize>
where
    T: Real,
{
    order: OrderLambda,
    evaluate: Option<EvaluateLambda<T, D, R, C>>,
    jacobian: Option<JacobianLambda<T, D, R, C>>,
    derivative: Option<DerivativeLambda<T, D, R, C>>,
    parameter_type: ParameterType,
    name: String,
}

impl<T, const D: usize, const R: usize, const C: usize> SmoothLambdaFunction<T, D, R, C>
where
    T: Real,
{
    pub const STATIC_ID: &'static str = "fenris.functions.smooth.lambda";
    pub const DEFAULT_NAME: &'static str = "smooth_lambda_function";

    /// A function with a fixed order and no capabilities.
    pub fn new(order: usize) -> Self {
        Self::with_order_fn(move |_| order)
    }

    /// A function whose order depends on the parameter.
    pub fn with_order_fn(order: impl Fn(&Parameter) -> usize + Send + Sync + 'static) -> Self {
        assert_positive_dimensions::<D, R, C>();
        Self {
            order: Box::new(order),
            evaluate: None,
            jacobian: None,
            derivative: None,
            parameter_type: ParameterType::empty(),
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    pub fn with_evaluate(
        mut self,
        evaluate: impl Fn(&Point<T, D>, &Parameter) -> SMatrix<T, R, C> + Send + Sync + 'static,
    ) -> Self {
        self.evaluate = Some(Box::new(evaluate));
        self
    }

    pub fn with_jacobian(
        mut self,
        jacobian: impl Fn(&Point<T, D>, &Parameter) -> DerivativeRange<T, D, R, C> + Send + Sync + 'static,
    ) -> Self {
        self.jacobian = Some(Box::new(jacobian));
        self
    }

    pub fn with_derivative(
        mut self,
        derivative: impl Fn(&[usize; D], &Point<T, D>, &Parameter) -> DerivativeRange<T, D, R, C> + Send + Sync + 'static,
    ) -> Self {
        self.derivative = Some(Box::new(derivative));
        self
    }

    pub fn with_parameter_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = parameter_type;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn provides(&self, capability: Capability) -> bool {
        match capability {
            Capability::Evaluate => self.evaluate.is_some(),
            Capability::Jacobian => self.jacobian.is_some(),
            Capability::Derivative => self.derivative.is_some(),
        }
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Debug for SmoothLambdaFunction<T, D, R, C>
where
    T: Real,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoothLambdaFunction")
            .field("name", &self.name)
            .field("parameter_type", &self.parameter_type)
            .field("evaluate", &self.evaluate.is_some())
            .field("jacobian", &self.jacobian.is_some())
            .field("derivative", &self.derivative.is_some())
            .finish()
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Parametric for SmoothLambdaFunction<T, D, R, C>
where
    T: Real,
{
    fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }
}

impl<T, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C> for SmoothLambdaFunction<T, D, R, C>
where
    T: Real,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok((self.order)(&param))
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let evaluate = self
            .evaluate
            .as_ref()
            .ok_or_else(|| FunctionError::not_implemented(&self.name, Capability::Evaluate))?;
        Ok(evaluate(x, &param))
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let jacobian = self
            .jacobian
            .as_ref()
            .ok_or_else(|| FunctionError::not_implemented(&self.name, Capability::Jacobian))?;
        Ok(jacobian(x, &param))
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let derivative = self
            .derivative
            .as_ref()
            .ok_or_else(|| FunctionError::not_implemented(&self.name, Capability::Derivative))?;
        Ok(derivative(alpha, x, &param))
    }

    fn type_name(&self) -> &str {
        Self::DEFAULT_NAME
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn static_id() -> &'static str {
        Self::STATIC_ID
    }
}
