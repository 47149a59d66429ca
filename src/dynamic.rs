//! Smooth functions with runtime shapes.
//!
//! [`DynamicFunction`] erases the dimensions of a [`SmoothFunction`] so that functions of different
//! shapes can be stored side by side, for example in a [`FunctionRegistry`], and combined at runtime.
//! Points and multi-indices are passed as slices and values as flat vectors in the layout of
//! [`RangeSelector`] and [`DerivativeRangeSelector`]. Shapes are validated when functions are
//! combined, and when points or multi-indices are passed in.
use crate::combined::Combination;
use crate::error::FunctionError;
use crate::function::{derivative_or_jacobian, SmoothFunction, SMOOTH_FUNCTION_ID};
use crate::grid::GridView;
use crate::io::vtk::{FunctionDataSetBuilder, OutputFormat};
use crate::parameter::{Parameter, ParameterType};
use crate::range::{assert_positive_dimensions, DerivativeRangeSelector, RangeSelector, Shape};
use crate::util::binomial;
use crate::Real;
use itertools::Itertools;
use nalgebra::{DMatrix, DVector, Point};
use num::ToPrimitive;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ops::{Add, Mul, Sub};
use std::path::Path;
use std::sync::Arc;

/// Object-safe interface of smooth functions with runtime shapes.
///
/// Implemented for every [`SmoothFunction`] through [`DynamicFunction::new`], and by the runtime
/// combinations of this module.
pub trait DynamicSmoothFunction<T>: Send + Sync {
    fn shape(&self) -> Shape;

    fn name(&self) -> &str;

    fn type_name(&self) -> &str;

    fn parameter_type(&self) -> &ParameterType;

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError>;

    /// The value as a vector of length $r r_C$.
    fn evaluate(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError>;

    /// The gradient of $\partial^\alpha f$ as a vector of length $d r r_C$.
    ///
    /// `alpha` has length $d$, and the zero multi-index yields the jacobian.
    fn derivative(&self, alpha: &[usize], x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError>;
}

fn check_point_len<T>(shape: &Shape, x: &[T]) -> Result<(), FunctionError> {
    if x.len() == shape.domain_dim {
        Ok(())
    } else {
        Err(FunctionError::shape_mismatch(
            format!("for a function with shape {shape}"),
            format!("point has {} coordinates", x.len()),
        ))
    }
}

fn check_multi_index_len(shape: &Shape, alpha: &[usize]) -> Result<(), FunctionError> {
    if alpha.len() == shape.domain_dim {
        Ok(())
    } else {
        Err(FunctionError::shape_mismatch(
            format!("for a function with shape {shape}"),
            format!("multi-index has {} entries", alpha.len()),
        ))
    }
}

/// A statically shaped function behind the dynamic interface.
struct Erased<F, T, const D: usize, const R: usize, const C: usize> {
    function: F,
    marker: PhantomData<fn() -> T>,
}

impl<F, T, const D: usize, const R: usize, const C: usize> DynamicSmoothFunction<T> for Erased<F, T, D, R, C>
where
    T: Real,
    F: SmoothFunction<T, D, R, C> + Send + Sync,
{
    fn shape(&self) -> Shape {
        self.function.shape()
    }

    fn name(&self) -> &str {
        self.function.name()
    }

    fn type_name(&self) -> &str {
        self.function.type_name()
    }

    fn parameter_type(&self) -> &ParameterType {
        self.function.parameter_type()
    }

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        self.function.order(param)
    }

    fn evaluate(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        check_point_len(&self.shape(), x)?;
        let value = self.function.evaluate(&Point::from_slice(x), param)?;
        Ok(RangeSelector::to_dynamic(&value))
    }

    fn derivative(&self, alpha: &[usize], x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        let shape = self.shape();
        check_point_len(&shape, x)?;
        check_multi_index_len(&shape, alpha)?;
        let alpha: [usize; D] = std::array::from_fn(|k| alpha[k]);
        let derivative = derivative_or_jacobian(&self.function, &alpha, &Point::from_slice(x), param)?;
        Ok(DerivativeRangeSelector::to_dynamic(&derivative))
    }
}

/// The value of $\partial^\beta f$ as an $r \times r_C$ matrix.
fn partial<T: Real>(
    function: &dyn DynamicSmoothFunction<T>,
    beta: &[usize],
    x: &[T],
    param: &Parameter,
) -> Result<DMatrix<T>, FunctionError> {
    let shape = function.shape();
    let (r, c, d) = (shape.range_dim, shape.range_cols, shape.domain_dim);
    match beta.iter().position(|&b| b > 0) {
        None => {
            let value = function.evaluate(x, param)?;
            Ok(DMatrix::from_row_slice(r, c, value.as_slice()))
        }
        Some(axis) => {
            let mut alpha = beta.to_vec();
            alpha[axis] -= 1;
            let derivative = function.derivative(&alpha, x, param)?;
            Ok(DMatrix::from_fn(r, c, |i, j| derivative[(i * c + j) * d + axis]))
        }
    }
}

/// Row-major flattening of `matrix`, matching the layout of [`RangeSelector`].
fn flatten<T: Real>(matrix: &DMatrix<T>) -> DVector<T> {
    DVector::from_iterator(matrix.len(), matrix.transpose().iter().copied())
}

/// Assembles a derivative from its partial derivatives along every axis.
fn from_axes<T: Real>(shape: &Shape, axes: &[DMatrix<T>]) -> DVector<T> {
    let d = shape.domain_dim;
    let c = shape.range_cols;
    DVector::from_fn(shape.derivative_size(), |index, _| {
        let (component, k) = (index / d, index % d);
        axes[k][(component / c, component % c)]
    })
}

/// Matrix product with scalar operands broadcast.
fn multiply<T: Real>(left: &DMatrix<T>, right: &DMatrix<T>) -> DMatrix<T> {
    if left.len() == 1 {
        right * left[(0, 0)]
    } else if right.len() == 1 {
        left * right[(0, 0)]
    } else {
        left * right
    }
}

struct Combined<T> {
    combination: Combination,
    left: DynamicFunction<T>,
    right: Option<DynamicFunction<T>>,
    shape: Shape,
    parameter_type: ParameterType,
    name: String,
}

impl<T: Real> Combined<T> {
    fn right(&self) -> &DynamicFunction<T> {
        self.right.as_ref().unwrap_or(&self.left)
    }

    /// The partial derivative $\partial^\gamma (f g)$ by the general Leibniz rule.
    fn leibniz_partial(&self, gamma: &[usize], x: &[T], param: &Parameter) -> Result<DMatrix<T>, FunctionError> {
        let left = self.left.inner.as_ref();
        let right = self.right().inner.as_ref();
        let mut result = DMatrix::zeros(self.shape.range_dim, self.shape.range_cols);
        for beta in gamma.iter().map(|&g| 0..=g).multi_cartesian_product() {
            let complement: Vec<usize> = gamma.iter().zip(&beta).map(|(g, b)| g - b).collect();
            let coefficient = gamma
                .iter()
                .zip(&beta)
                .map(|(&g, &b)| binomial(g, b))
                .product::<usize>();
            let coefficient = T::from_usize(coefficient).expect("Binomial coefficient must fit in T");
            let term = multiply(&partial(left, &beta, x, param)?, &partial(right, &complement, x, param)?);
            result += term * coefficient;
        }
        Ok(result)
    }

    fn combined_partial(&self, gamma: &[usize], x: &[T], param: &Parameter) -> Result<DMatrix<T>, FunctionError> {
        match self.combination {
            Combination::Sum => Ok(partial(self.left.inner.as_ref(), gamma, x, param)?
                + partial(self.right().inner.as_ref(), gamma, x, param)?),
            Combination::Difference => Ok(partial(self.left.inner.as_ref(), gamma, x, param)?
                - partial(self.right().inner.as_ref(), gamma, x, param)?),
            Combination::Product => self.leibniz_partial(gamma, x, param),
            Combination::Divergence => {
                let mut divergence = T::zero();
                for i in 0..self.shape.domain_dim {
                    let mut beta = gamma.to_vec();
                    beta[i] += 1;
                    divergence += partial(self.left.inner.as_ref(), &beta, x, param)?[(i, 0)];
                }
                Ok(DMatrix::from_element(1, 1, divergence))
            }
        }
    }
}

impl<T: Real> DynamicSmoothFunction<T> for Combined<T> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.combination.type_name()
    }

    fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = &param.check_against(&self.parameter_type)?;
        let left = self.left.order(param)?;
        match self.combination {
            Combination::Sum | Combination::Difference => Ok(left.max(self.right().order(param)?)),
            Combination::Product => Ok(left + self.right().order(param)?),
            Combination::Divergence => Ok(left.saturating_sub(1)),
        }
    }

    fn evaluate(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        check_point_len(&self.shape, x)?;
        let param = &param.check_against(&self.parameter_type)?;
        let zero = vec![0; self.shape.domain_dim];
        Ok(flatten(&self.combined_partial(&zero, x, param)?))
    }

    fn derivative(&self, alpha: &[usize], x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        check_point_len(&self.shape, x)?;
        check_multi_index_len(&self.shape, alpha)?;
        let param = &param.check_against(&self.parameter_type)?;
        let axes = (0..self.shape.domain_dim)
            .map(|k| {
                let mut gamma = alpha.to_vec();
                gamma[k] += 1;
                self.combined_partial(&gamma, x, param)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(from_axes(&self.shape, &axes))
    }
}

struct Renamed<T> {
    function: DynamicFunction<T>,
    name: String,
}

impl<T: Real> DynamicSmoothFunction<T> for Renamed<T> {
    fn shape(&self) -> Shape {
        self.function.shape()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.function.type_name()
    }

    fn parameter_type(&self) -> &ParameterType {
        self.function.parameter_type()
    }

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        self.function.order(param)
    }

    fn evaluate(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        self.function.evaluate(x, param)
    }

    fn derivative(&self, alpha: &[usize], x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        self.function.derivative(alpha, x, param)
    }
}

/// A shared smooth function with a runtime shape.
///
/// Cloning is cheap and shares the underlying function. Combinations keep their operands alive.
///
/// ```
/// use fenris_functions::constant::ConstantFunction;
/// use fenris_functions::dynamic::DynamicFunction;
/// use fenris_functions::nalgebra::Matrix1;
/// use fenris_functions::Parameter;
///
/// let five = DynamicFunction::new(ConstantFunction::<f64, 2, 1, 1>::new(Matrix1::new(5.0)));
/// let two = DynamicFunction::new(ConstantFunction::<f64, 2, 1, 1>::new(Matrix1::new(2.0)));
/// let product = (&five * &two).unwrap();
/// let value = product.evaluate(&[0.25, 0.5], &Parameter::empty()).unwrap();
/// assert_eq!(value[0], 10.0);
/// ```
#[derive(Clone)]
pub struct DynamicFunction<T> {
    inner: Arc<dyn DynamicSmoothFunction<T>>,
}

impl<T> Debug for DynamicFunction<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicFunction")
            .field("name", &self.inner.name())
            .field("shape", &self.inner.shape())
            .finish()
    }
}

impl<T: Real> DynamicFunction<T> {
    pub fn new<F, const D: usize, const R: usize, const C: usize>(function: F) -> Self
    where
        F: SmoothFunction<T, D, R, C> + Send + Sync + 'static,
    {
        assert_positive_dimensions::<D, R, C>();
        Self::from_dynamic(Arc::new(Erased {
            function,
            marker: PhantomData,
        }))
    }

    pub fn from_dynamic(function: Arc<dyn DynamicSmoothFunction<T>>) -> Self {
        Self { inner: function }
    }

    pub fn static_id() -> &'static str {
        SMOOTH_FUNCTION_ID
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self::from_dynamic(Arc::new(Renamed {
            function: self,
            name: name.into(),
        }))
    }

    pub fn shape(&self) -> Shape {
        self.inner.shape()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn type_name(&self) -> &str {
        self.inner.type_name()
    }

    pub fn parameter_type(&self) -> &ParameterType {
        self.inner.parameter_type()
    }

    pub fn is_parametric(&self) -> bool {
        !self.parameter_type().is_empty()
    }

    pub fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        self.inner.order(param)
    }

    pub fn evaluate(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        self.inner.evaluate(x, param)
    }

    pub fn jacobian(&self, x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        self.inner.derivative(&vec![0; self.shape().domain_dim], x, param)
    }

    pub fn derivative(&self, alpha: &[usize], x: &[T], param: &Parameter) -> Result<DVector<T>, FunctionError> {
        self.inner.derivative(alpha, x, param)
    }

    /// Writes the function, sampled on every element of `grid`, to a VTK file.
    ///
    /// With `subsampling`, every element is refined once before sampling. Fails if the domain
    /// dimension of the function is not the dimension of the grid.
    pub fn visualize<G, const D: usize>(
        &self,
        grid: &G,
        path: impl AsRef<Path>,
        subsampling: bool,
        format: OutputFormat,
    ) -> eyre::Result<()>
    where
        T: ToPrimitive,
        G: GridView<T, D>,
    {
        FunctionDataSetBuilder::from_grid(grid)
            .with_subsampling(subsampling)
            .try_export_dynamic(self, path, format)
    }

    pub fn evaluate_component(&self, x: &[T], row: usize, col: usize, param: &Parameter) -> Result<T, FunctionError> {
        let shape = self.shape();
        if row >= shape.range_dim || col >= shape.range_cols {
            return Err(FunctionError::shape_mismatch(
                format!("for a function with shape {shape}"),
                format!("component ({row}, {col}) does not exist"),
            ));
        }
        Ok(self.evaluate(x, param)?[row * shape.range_cols + col])
    }

    fn combine(
        combination: Combination,
        left: &Self,
        right: Option<&Self>,
        shape: Shape,
    ) -> Result<Self, FunctionError> {
        let parameter_type = match right {
            Some(right) => left.parameter_type().merged(right.parameter_type())?,
            None => left.parameter_type().clone(),
        };
        let name = combination.combined_name(left.name(), right.map(|f| f.name()).unwrap_or_default());
        Ok(Self::from_dynamic(Arc::new(Combined {
            combination,
            left: left.clone(),
            right: right.cloned(),
            shape,
            parameter_type,
            name,
        })))
    }

    fn same_domain(&self, other: &Self, context: &str) -> Result<(), FunctionError> {
        if self.shape().domain_dim == other.shape().domain_dim {
            Ok(())
        } else {
            Err(FunctionError::shape_mismatch(
                context,
                format!("domains differ: {} and {}", self.shape(), other.shape()),
            ))
        }
    }

    fn same_shape(&self, other: &Self, context: &str) -> Result<(), FunctionError> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(FunctionError::shape_mismatch(
                context,
                format!("{} and {}", self.shape(), other.shape()),
            ))
        }
    }

    pub fn sum(&self, other: &Self) -> Result<Self, FunctionError> {
        self.same_shape(other, "when adding functions")?;
        Self::combine(Combination::Sum, self, Some(other), self.shape())
    }

    pub fn difference(&self, other: &Self) -> Result<Self, FunctionError> {
        self.same_shape(other, "when subtracting functions")?;
        Self::combine(Combination::Difference, self, Some(other), self.shape())
    }

    /// The matrix product, or the scaled function if one of the operands is scalar.
    pub fn product(&self, other: &Self) -> Result<Self, FunctionError> {
        let context = "when multiplying functions";
        self.same_domain(other, context)?;
        let (left, right) = (self.shape(), other.shape());
        let shape = if left.is_scalar() {
            right
        } else if right.is_scalar() {
            left
        } else if left.range_cols == right.range_dim {
            Shape {
                range_cols: right.range_cols,
                ..left
            }
        } else {
            return Err(FunctionError::shape_mismatch(
                context,
                format!("{left} and {right} cannot be multiplied"),
            ));
        };
        Self::combine(Combination::Product, self, Some(other), shape)
    }

    /// The divergence of a function mapping $\mathbb{R}^d$ to $\mathbb{R}^d$.
    pub fn divergence(&self) -> Result<Self, FunctionError> {
        let shape = self.shape();
        if shape.range_dim != shape.domain_dim || shape.range_cols != 1 {
            return Err(FunctionError::shape_mismatch(
                "when taking the divergence",
                format!("divergence needs a function {0} -> {0}x1, got {shape}", shape.domain_dim),
            ));
        }
        Self::combine(Combination::Divergence, self, None, Shape {
            range_dim: 1,
            ..shape
        })
    }
}

impl<T: Real> Add for &DynamicFunction<T> {
    type Output = Result<DynamicFunction<T>, FunctionError>;

    fn add(self, rhs: Self) -> Self::Output {
        self.sum(rhs)
    }
}

impl<T: Real> Sub for &DynamicFunction<T> {
    type Output = Result<DynamicFunction<T>, FunctionError>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.difference(rhs)
    }
}

impl<T: Real> Mul for &DynamicFunction<T> {
    type Output = Result<DynamicFunction<T>, FunctionError>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.product(rhs)
    }
}

/// Dynamic functions stored by name.
#[derive(Debug, Clone)]
pub struct FunctionRegistry<T> {
    functions: BTreeMap<String, DynamicFunction<T>>,
}

impl<T> Default for FunctionRegistry<T> {
    fn default() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }
}

impl<T: Real> FunctionRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `function` under `name`, returning the function previously stored there.
    pub fn register(&mut self, name: impl Into<String>, function: DynamicFunction<T>) -> Option<DynamicFunction<T>> {
        self.functions.insert(name.into(), function)
    }

    pub fn get(&self, name: &str) -> Option<&DynamicFunction<T>> {
        self.functions.get(name)
    }

    /// Like [`get`](Self::get), but fails with [`FunctionError::UnknownFunction`].
    pub fn try_get(&self, name: &str) -> Result<&DynamicFunction<T>, FunctionError> {
        self.get(name).ok_or_else(|| FunctionError::UnknownFunction {
            id: name.to_string(),
            available: self.names().map(String::from).collect(),
        })
    }

    pub fn remove(&mut self, name: &str) -> Option<DynamicFunction<T>> {
        self.functions.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
