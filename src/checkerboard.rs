//! Piecewise constant functions on a tensor-product partition of a box.
use crate::config::Configuration;
use crate::error::FunctionError;
use crate::function::SmoothFunction;
use crate::parameter::{Parameter, Parametric};
use crate::provider::ConfigurableFunction;
use crate::range::{assert_positive_dimensions, DerivativeRange};
use crate::Real;
use log::warn;
use nalgebra::{try_convert, Point, SMatrix, Scalar};

/// A function that is constant on every cell of a uniform partition of the box spanned by
/// `lower_left` and `upper_right`.
///
/// The box is divided into `num_elements[k]` cells along axis `k`, and cells are numbered with
/// axis 0 varying fastest. Points outside of the box are clamped to the nearest cell.
///
/// Derivatives are zero everywhere, including across cell boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerboardFunction<T: Scalar, const D: usize, const R: usize, const C: usize> {
    lower_left: Point<T, D>,
    upper_right: Point<T, D>,
    num_elements: [usize; D],
    values: Vec<SMatrix<T, R, C>>,
    name: String,
}

impl<T: Real, const D: usize, const R: usize, const C: usize> CheckerboardFunction<T, D, R, C> {
    pub const STATIC_ID: &'static str = "fenris.functions.checkerboard";

    /// # Errors
    ///
    /// Returns [`FunctionError::InvalidConfiguration`] if the box is empty, if an axis has no cells
    /// or if the number of values does not match the number of cells.
    pub fn new(
        lower_left: Point<T, D>,
        upper_right: Point<T, D>,
        num_elements: [usize; D],
        values: Vec<SMatrix<T, R, C>>,
    ) -> Result<Self, FunctionError> {
        assert_positive_dimensions::<D, R, C>();
        if (0..D).any(|k| upper_right[k] <= lower_left[k]) {
            return Err(FunctionError::invalid_configuration(
                "upper_right",
                "upper right corner must be strictly greater than the lower left corner",
            ));
        }
        if num_elements.iter().any(|&n| n == 0) {
            return Err(FunctionError::invalid_configuration(
                "num_elements",
                "every axis needs at least one cell",
            ));
        }
        let num_cells: usize = num_elements.iter().product();
        if values.len() != num_cells {
            return Err(FunctionError::invalid_configuration(
                "values",
                format!("expected one value per cell ({num_cells}), got {}", values.len()),
            ));
        }
        Ok(Self {
            lower_left,
            upper_right,
            num_elements,
            values,
            name: Self::STATIC_ID.to_string(),
        })
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn num_cells(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[SMatrix<T, R, C>] {
        &self.values
    }

    /// The index of the cell containing `x`.
    pub fn cell_index(&self, x: &Point<T, D>) -> usize {
        let mut index = 0;
        let mut stride = 1;
        for k in 0..D {
            let n = self.num_elements[k];
            let extent = self.upper_right[k] - self.lower_left[k];
            let relative = (x[k] - self.lower_left[k]) / extent;
            if relative < T::zero() || relative > T::one() {
                warn!(
                    "Point {:?} lies outside of checkerboard '{}', using the closest cell",
                    x.coords.as_slice(),
                    self.name
                );
            }
            let scaled = try_convert::<T, f64>(relative).unwrap_or(0.0) * n as f64;
            let i = if scaled <= 0.0 {
                0
            } else {
                (scaled.floor() as usize).min(n - 1)
            };
            index += i * stride;
            stride *= n;
        }
        index
    }
}

impl<T: Scalar, const D: usize, const R: usize, const C: usize> Parametric for CheckerboardFunction<T, D, R, C> {}

impl<T: Real, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C>
    for CheckerboardFunction<T, D, R, C>
{
    fn order(&self, _param: &Parameter) -> Result<usize, FunctionError> {
        Ok(0)
    }

    fn evaluate(&self, x: &Point<T, D>, _param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        Ok(self.values[self.cell_index(x)])
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

impl<T: Real, const D: usize, const R: usize, const C: usize> ConfigurableFunction
    for CheckerboardFunction<T, D, R, C>
{
    /// The unit box with two cells per axis and the values $1, 2, \dots, 2^d$.
    fn default_config() -> Configuration {
        let list = |entries: Vec<String>| format!("[{}]", entries.join(" "));
        let num_cells = 1usize << D;
        Configuration::new()
            .with("lower_left", list(vec!["0.0".to_string(); D]))
            .with("upper_right", list(vec!["1.0".to_string(); D]))
            .with("num_elements", list(vec!["2".to_string(); D]))
            .with("values", list((1..=num_cells).map(|v| format!("{v}.0")).collect()))
            .with("name", Self::STATIC_ID)
    }

    /// `values` holds either one entry per cell, used for every component, or `R * C` entries per
    /// cell in row-major order.
    fn from_config(config: &Configuration) -> Result<Self, FunctionError> {
        let point = |key: &str| -> Result<Point<T, D>, FunctionError> {
            let coords: Vec<f64> = config.get_list_of_len(key, D)?;
            Ok(Point::from_slice(
                &coords.into_iter().map(nalgebra::convert).collect::<Vec<T>>(),
            ))
        };
        let lower_left = point("lower_left")?;
        let upper_right = point("upper_right")?;
        let num_elements: Vec<usize> = config.get_list_of_len("num_elements", D)?;
        let num_elements: [usize; D] = std::array::from_fn(|k| num_elements[k]);
        let num_cells: usize = num_elements.iter().product();

        let entries: Vec<f64> = config.get_list("values")?;
        let values = if entries.len() == num_cells {
            entries
                .into_iter()
                .map(|v| SMatrix::repeat(nalgebra::convert(v)))
                .collect()
        } else if entries.len() == num_cells * R * C {
            entries
                .chunks(R * C)
                .map(|chunk| SMatrix::from_row_slice(&chunk.iter().copied().map(nalgebra::convert).collect::<Vec<T>>()))
                .collect()
        } else {
            return Err(FunctionError::invalid_configuration(
                "values",
                format!(
                    "expected {num_cells} or {} entries for {num_cells} cells, got {}",
                    num_cells * R * C,
                    entries.len()
                ),
            ));
        };

        let name: String = config.get_or("name", Self::STATIC_ID.to_string())?;
        Ok(Self::new(lower_left, upper_right, num_elements, values)?.with_name(name))
    }
}
