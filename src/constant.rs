//! Constant functions.
use crate::config::Configuration;
use crate::error::FunctionError;
use crate::function::SmoothFunction;
use crate::parameter::{Parameter, Parametric};
use crate::provider::ConfigurableFunction;
use crate::range::{assert_positive_dimensions, DerivativeRange};
use crate::Real;
use nalgebra::{Point, SMatrix, Scalar};

/// A function with the same value everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantFunction<T: Scalar, const D: usize, const R: usize, const C: usize> {
    value: SMatrix<T, R, C>,
    name: String,
}

impl<T: Scalar, const D: usize, const R: usize, const C: usize> ConstantFunction<T, D, R, C> {
    pub const STATIC_ID: &'static str = "fenris.functions.constant";

    /// A function with the given value everywhere.
    ///
    /// Zero dimensions are rejected at compile time:
    ///
    /// ```compile_fail
    /// use fenris_functions::constant::ConstantFunction;
    /// use fenris_functions::nalgebra::SMatrix;
    ///
    /// let _ = ConstantFunction::<f64, 2, 0, 1>::new(SMatrix::zeros());
    /// ```
    pub fn new(value: SMatrix<T, R, C>) -> Self {
        assert_positive_dimensions::<D, R, C>();
        Self {
            value,
            name: Self::STATIC_ID.to_string(),
        }
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn value(&self) -> &SMatrix<T, R, C> {
        &self.value
    }
}

impl<T: Real, const D: usize, const R: usize, const C: usize> ConstantFunction<T, D, R, C> {
    /// A constant with every component equal to `value`.
    pub fn from_scalar(value: T) -> Self {
        Self::new(SMatrix::repeat(value))
    }
}

impl<T: Scalar, const D: usize, const R: usize, const C: usize> Parametric for ConstantFunction<T, D, R, C> {}

impl<T: Real, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C>
    for ConstantFunction<T, D, R, C>
{
    fn order(&self, _param: &Parameter) -> Result<usize, FunctionError> {
        Ok(0)
    }

    fn evaluate(&self, _x: &Point<T, D>, _param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        Ok(self.value)
    }

    fn jacobian(&self, _x: &Point<T, D>, _param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        Ok(DerivativeRange::zeros())
    }

    fn derivative(
        &self,
        _alpha: &[usize; D],
        _x: &Point<T, D>,
        _param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        Ok(DerivativeRange::zeros())
    }

    fn type_name(&self) -> &str {
        Self::STATIC_ID
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn static_id() -> &'static str {
        Self::STATIC_ID
    }
}

/// Reads `key` as either a single value for every component or all `R * C` components in
/// row-major order.
pub(crate) fn matrix_from_config<T: Real, const R: usize, const C: usize>(
    config: &Configuration,
    key: &str,
) -> Result<SMatrix<T, R, C>, FunctionError> {
    let entries: Vec<f64> = config.get_list(key)?;
    let entries: Vec<T> = entries.into_iter().map(nalgebra::convert).collect();
    match entries.len() {
        1 => Ok(SMatrix::repeat(entries[0])),
        n if n == R * C => Ok(SMatrix::from_row_slice(&entries)),
        n => Err(FunctionError::invalid_configuration(
            key,
            format!("expected 1 or {} entries, got {n}", R * C),
        )),
    }
}

impl<T: Real, const D: usize, const R: usize, const C: usize> ConfigurableFunction for ConstantFunction<T, D, R, C> {
    /// `value = 1` and the static id as name.
    fn default_config() -> Configuration {
        Configuration::new()
            .with("value", "1")
            .with("name", Self::STATIC_ID)
    }

    fn from_config(config: &Configuration) -> Result<Self, FunctionError> {
        let value = matrix_from_config(config, "value")?;
        let name: String = config.get_or("name", Self::STATIC_ID.to_string())?;
        Ok(Self::new(value).with_name(name))
    }
}
