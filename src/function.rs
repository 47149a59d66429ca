//! The smooth function contract.
use crate::error::{Capability, FunctionError};
use crate::parameter::{Parameter, Parametric};
use crate::range::{DerivativeRange, DerivativeRangeSelector, RangeSelector, Shape};
use crate::util::is_zero_multi_index;
use crate::Real;
use nalgebra::{DVector, Point, SMatrix, SVector};
use std::sync::Arc;

/// Type and default name of smooth functions.
pub const SMOOTH_FUNCTION_ID: &str = "fenris.functions.smooth";

/// A smooth function $f: \mathbb{R}^d \to \mathbb{R}^{r \times r_C}$ defined in global coordinates.
///
/// Only [`order`](Self::order) must be implemented. Evaluation and differentiation are capabilities
/// that a function may or may not provide: the default implementations return
/// [`FunctionError::NotImplemented`], which callers can probe with
/// [`FunctionError::is_not_implemented`].
///
/// Every method takes a [`Parameter`], which must satisfy the function's declared
/// [`ParameterType`](crate::ParameterType). Non-parametric functions accept any parameter, in
/// particular the empty one.
///
/// Derivatives follow one convention throughout: [`derivative`](Self::derivative) with multi-index
/// $\alpha$ returns the gradient of $\partial^\alpha f$, so that the zero multi-index yields the
/// [`jacobian`](Self::jacobian).
pub trait SmoothFunction<T, const D: usize, const R: usize, const C: usize>: Parametric
where
    T: Real,
{
    /// The order of the function, e.g. its polynomial degree.
    ///
    /// Used by callers to choose integration rules.
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError>;

    fn evaluate(&self, _x: &Point<T, D>, _param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        Err(FunctionError::not_implemented(self.name(), Capability::Evaluate))
    }

    fn jacobian(&self, _x: &Point<T, D>, _param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        Err(FunctionError::not_implemented(self.name(), Capability::Jacobian))
    }

    /// The gradient of the partial derivative $\partial^\alpha f$ at `x`.
    fn derivative(
        &self,
        _alpha: &[usize; D],
        _x: &Point<T, D>,
        _param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        Err(FunctionError::not_implemented(self.name(), Capability::Derivative))
    }

    fn type_name(&self) -> &str {
        SMOOTH_FUNCTION_ID
    }

    fn name(&self) -> &str {
        SMOOTH_FUNCTION_ID
    }

    fn static_id() -> &'static str
    where
        Self: Sized,
    {
        SMOOTH_FUNCTION_ID
    }

    fn shape(&self) -> Shape {
        Shape::of::<D, R, C>()
    }

    /// Evaluates entry `(row, col)` of the value at `x`.
    fn evaluate_component(
        &self,
        x: &Point<T, D>,
        row: usize,
        col: usize,
        param: &Parameter,
    ) -> Result<T, FunctionError> {
        check_component_index::<D, R, C>(row, col, "evaluate_component")?;
        Ok(self.evaluate(x, param)?[(row, col)])
    }

    /// The gradient of entry `(row, col)` at `x`.
    fn jacobian_component(
        &self,
        x: &Point<T, D>,
        row: usize,
        col: usize,
        param: &Parameter,
    ) -> Result<SVector<T, D>, FunctionError> {
        check_component_index::<D, R, C>(row, col, "jacobian_component")?;
        Ok(self.jacobian(x, param)?.single(row, col))
    }

    fn derivative_component(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        row: usize,
        col: usize,
        param: &Parameter,
    ) -> Result<SVector<T, D>, FunctionError> {
        check_component_index::<D, R, C>(row, col, "derivative_component")?;
        Ok(self.derivative(alpha, x, param)?.single(row, col))
    }

    /// Evaluates into a dynamic vector, see [`RangeSelector`] for the layout.
    fn evaluate_into(&self, x: &Point<T, D>, result: &mut DVector<T>, param: &Parameter) -> Result<(), FunctionError> {
        let value = self.evaluate(x, param)?;
        RangeSelector::<T, R, C>::ensure_size(result);
        RangeSelector::convert(&value, result);
        Ok(())
    }

    /// Computes the jacobian into a dynamic vector, see [`DerivativeRangeSelector`] for the layout.
    fn jacobian_into(&self, x: &Point<T, D>, result: &mut DVector<T>, param: &Parameter) -> Result<(), FunctionError> {
        let jacobian = self.jacobian(x, param)?;
        DerivativeRangeSelector::<T, D, R, C>::ensure_size(result);
        DerivativeRangeSelector::convert(&jacobian, result);
        Ok(())
    }

    fn derivative_into(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        result: &mut DVector<T>,
        param: &Parameter,
    ) -> Result<(), FunctionError> {
        let derivative = self.derivative(alpha, x, param)?;
        DerivativeRangeSelector::<T, D, R, C>::ensure_size(result);
        DerivativeRangeSelector::convert(&derivative, result);
        Ok(())
    }
}

#[cfg(not(feature = "disable-checks"))]
fn check_component_index<const D: usize, const R: usize, const C: usize>(
    row: usize,
    col: usize,
    method: &str,
) -> Result<(), FunctionError> {
    if row < R && col < C {
        Ok(())
    } else {
        Err(FunctionError::shape_mismatch(
            format!("in {method}"),
            format!("this function maps from u: {D} -> {R}x{C} and you are trying to access u_{row}_{col}"),
        ))
    }
}

#[cfg(feature = "disable-checks")]
fn check_component_index<const D: usize, const R: usize, const C: usize>(
    _row: usize,
    _col: usize,
    _method: &str,
) -> Result<(), FunctionError> {
    Ok(())
}

/// The gradient of $\partial^\alpha f$, using the jacobian for the zero multi-index.
///
/// Functions commonly implement [`SmoothFunction::jacobian`] without a general
/// [`SmoothFunction::derivative`], so combinations of functions go through this helper.
pub fn derivative_or_jacobian<T, F, const D: usize, const R: usize, const C: usize>(
    function: &F,
    alpha: &[usize; D],
    x: &Point<T, D>,
    param: &Parameter,
) -> Result<DerivativeRange<T, D, R, C>, FunctionError>
where
    T: Real,
    F: SmoothFunction<T, D, R, C> + ?Sized,
{
    if is_zero_multi_index(alpha) {
        function.jacobian(x, param)
    } else {
        function.derivative(alpha, x, param)
    }
}

/// Evaluates the partial derivative $\partial^\beta f$ at `x`.
///
/// The zero multi-index yields the value of `f` itself.
pub fn evaluate_partial<T, F, const D: usize, const R: usize, const C: usize>(
    function: &F,
    beta: &[usize; D],
    x: &Point<T, D>,
    param: &Parameter,
) -> Result<SMatrix<T, R, C>, FunctionError>
where
    T: Real,
    F: SmoothFunction<T, D, R, C> + ?Sized,
{
    match beta.iter().position(|&b| b > 0) {
        None => function.evaluate(x, param),
        Some(axis) => {
            let mut alpha = *beta;
            alpha[axis] -= 1;
            Ok(derivative_or_jacobian(function, &alpha, x, param)?.axis(axis))
        }
    }
}

macro_rules! impl_smooth_function_for_pointer {
    ($pointer:ty) => {
        impl<T, F, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C> for $pointer
        where
            T: Real,
            F: SmoothFunction<T, D, R, C> + ?Sized,
        {
            fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
                F::order(self, param)
            }

            fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
                F::evaluate(self, x, param)
            }

            fn jacobian(
                &self,
                x: &Point<T, D>,
                param: &Parameter,
            ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
                F::jacobian(self, x, param)
            }

            fn derivative(
                &self,
                alpha: &[usize; D],
                x: &Point<T, D>,
                param: &Parameter,
            ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
                F::derivative(self, alpha, x, param)
            }

            fn type_name(&self) -> &str {
                F::type_name(self)
            }

            fn name(&self) -> &str {
                F::name(self)
            }

            fn shape(&self) -> Shape {
                F::shape(self)
            }

            fn evaluate_component(
                &self,
                x: &Point<T, D>,
                row: usize,
                col: usize,
                param: &Parameter,
            ) -> Result<T, FunctionError> {
                F::evaluate_component(self, x, row, col, param)
            }

            fn jacobian_component(
                &self,
                x: &Point<T, D>,
                row: usize,
                col: usize,
                param: &Parameter,
            ) -> Result<SVector<T, D>, FunctionError> {
                F::jacobian_component(self, x, row, col, param)
            }

            fn derivative_component(
                &self,
                alpha: &[usize; D],
                x: &Point<T, D>,
                row: usize,
                col: usize,
                param: &Parameter,
            ) -> Result<SVector<T, D>, FunctionError> {
                F::derivative_component(self, alpha, x, row, col, param)
            }

            fn evaluate_into(
                &self,
                x: &Point<T, D>,
                result: &mut DVector<T>,
                param: &Parameter,
            ) -> Result<(), FunctionError> {
                F::evaluate_into(self, x, result, param)
            }

            fn jacobian_into(
                &self,
                x: &Point<T, D>,
                result: &mut DVector<T>,
                param: &Parameter,
            ) -> Result<(), FunctionError> {
                F::jacobian_into(self, x, result, param)
            }

            fn derivative_into(
                &self,
                alpha: &[usize; D],
                x: &Point<T, D>,
                result: &mut DVector<T>,
                param: &Parameter,
            ) -> Result<(), FunctionError> {
                F::derivative_into(self, alpha, x, result, param)
            }
        }
    };
}

impl_smooth_function_for_pointer!(&F);
impl_smooth_function_for_pointer!(Box<F>);
impl_smooth_function_for_pointer!(Arc<F>);
