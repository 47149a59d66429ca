//! Value and derivative representations of smooth functions.
//!
//! A function with shape $(d, r, r_C)$ maps $\mathbb{R}^d$ into $r \times r_C$ matrices. Values are
//! represented statically by `SMatrix<T, R, C>` and derivatives by [`DerivativeRange`]. Both can be
//! converted to and from flat dynamic vectors in row-major order, see [`RangeSelector`] and
//! [`DerivativeRangeSelector`].
use crate::error::FunctionError;
use crate::Real;
use nalgebra::{DVector, SMatrix, SVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::{Add, Mul, Neg, Sub};

/// Runtime description of the shape of a function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub domain_dim: usize,
    pub range_dim: usize,
    pub range_cols: usize,
}

/// Fails to compile when instantiated with a zero dimension.
struct PositiveDimensions<const D: usize, const R: usize, const C: usize>;

impl<const D: usize, const R: usize, const C: usize> PositiveDimensions<D, R, C> {
    const ASSERT: () = assert!(D >= 1 && R >= 1 && C >= 1, "Shape dimensions must be positive");
}

/// Rejects a zero dimension when instantiated.
///
/// Constructors of statically sized functions call this, so that a function with a zero
/// dimension cannot be created.
pub const fn assert_positive_dimensions<const D: usize, const R: usize, const C: usize>() {
    PositiveDimensions::<D, R, C>::ASSERT
}

impl Shape {
    /// The shape $D \to R \times C$ of a statically sized function.
    ///
    /// Instantiating this with a zero dimension is a compile-time error.
    pub const fn of<const D: usize, const R: usize, const C: usize>() -> Self {
        assert_positive_dimensions::<D, R, C>();
        Self {
            domain_dim: D,
            range_dim: R,
            range_cols: C,
        }
    }

    /// # Panics
    ///
    /// Panics if any of the dimensions is zero.
    pub fn new(domain_dim: usize, range_dim: usize, range_cols: usize) -> Self {
        Self::try_new(domain_dim, range_dim, range_cols).expect("Shape dimensions must be positive")
    }

    pub fn try_new(domain_dim: usize, range_dim: usize, range_cols: usize) -> Result<Self, FunctionError> {
        if domain_dim == 0 || range_dim == 0 || range_cols == 0 {
            Err(FunctionError::shape_mismatch(
                "when constructing a shape",
                format!("dimensions must be positive, got {domain_dim} -> {range_dim}x{range_cols}"),
            ))
        } else {
            Ok(Self {
                domain_dim,
                range_dim,
                range_cols,
            })
        }
    }

    /// Number of components of a value.
    pub fn range_size(&self) -> usize {
        self.range_dim * self.range_cols
    }

    /// Number of components of a first derivative.
    pub fn derivative_size(&self) -> usize {
        self.domain_dim * self.range_size()
    }

    pub fn is_scalar(&self) -> bool {
        self.range_dim == 1 && self.range_cols == 1
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}x{}", self.domain_dim, self.range_dim, self.range_cols)
    }
}

/// First derivatives of an $r \times r_C$ matrix-valued function on $\mathbb{R}^d$.
///
/// For every entry $(i, j)$ of the value, the derivative holds the gradient
/// $\nabla f_{ij} \in \mathbb{R}^d$. Entry $(i, j)$ along axis $k$ is stored as
/// `columns[j][(i, k)]`, so that for vector-valued functions the single column block is the usual
/// $r \times d$ Jacobian matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DerivativeRange<T, const D: usize, const R: usize, const C: usize> {
    columns: [SMatrix<T, R, D>; C],
}

impl<T, const D: usize, const R: usize, const C: usize> DerivativeRange<T, D, R, C>
where
    T: Real,
{
    pub fn zeros() -> Self {
        Self {
            columns: [SMatrix::zeros(); C],
        }
    }

    pub fn from_columns(columns: [SMatrix<T, R, D>; C]) -> Self {
        Self { columns }
    }

    /// Constructs the derivative from a closure `f(row, col, axis)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut result = Self::zeros();
        for (j, column) in result.columns.iter_mut().enumerate() {
            for i in 0..R {
                for k in 0..D {
                    column[(i, k)] = f(i, j, k);
                }
            }
        }
        result
    }

    /// Constructs the derivative from its partial derivatives along every axis.
    pub fn from_axes(axes: &[SMatrix<T, R, C>; D]) -> Self {
        Self::from_fn(|i, j, k| axes[k][(i, j)])
    }

    pub fn columns(&self) -> &[SMatrix<T, R, D>; C] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> &SMatrix<T, R, D> {
        &self.columns[col]
    }

    pub fn column_mut(&mut self, col: usize) -> &mut SMatrix<T, R, D> {
        &mut self.columns[col]
    }

    /// The derivative of entry `(row, col)` along `axis`.
    pub fn get(&self, row: usize, col: usize, axis: usize) -> T {
        self.columns[col][(row, axis)]
    }

    pub fn set(&mut self, row: usize, col: usize, axis: usize, value: T) {
        self.columns[col][(row, axis)] = value;
    }

    /// The gradient of entry `(row, col)`.
    pub fn single(&self, row: usize, col: usize) -> SVector<T, D> {
        self.columns[col].row(row).transpose()
    }

    /// The partial derivative of the whole value along `axis`.
    pub fn axis(&self, axis: usize) -> SMatrix<T, R, C> {
        SMatrix::from_fn(|i, j| self.columns[j][(i, axis)])
    }

    pub fn set_axis(&mut self, axis: usize, partial: &SMatrix<T, R, C>) {
        for (j, column) in self.columns.iter_mut().enumerate() {
            for i in 0..R {
                column[(i, axis)] = partial[(i, j)];
            }
        }
    }

    /// Applies the linear map `matrix` to every gradient.
    ///
    /// Used to change variables, e.g. to pull gradients back to reference coordinates.
    pub fn transform_gradients<const E: usize>(&self, matrix: &SMatrix<T, D, E>) -> DerivativeRange<T, E, R, C> {
        let mut result = DerivativeRange::zeros();
        for (target, source) in result.columns.iter_mut().zip(&self.columns) {
            *target = source * matrix;
        }
        result
    }

    pub fn map(&self, mut f: impl FnMut(T) -> T) -> Self {
        let mut result = *self;
        for column in &mut result.columns {
            column.apply(|x| *x = f(*x));
        }
        result
    }

    pub fn max_abs(&self) -> T {
        self.columns
            .iter()
            .map(|column| column.amax())
            .fold(T::zero(), |a, b| a.max(b))
    }
}

impl<T, const D: usize, const R: usize> From<SMatrix<T, R, D>> for DerivativeRange<T, D, R, 1>
where
    T: Real,
{
    fn from(jacobian: SMatrix<T, R, D>) -> Self {
        Self::from_columns([jacobian])
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Add for DerivativeRange<T, D, R, C>
where
    T: Real,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j, k| self.get(i, j, k) + rhs.get(i, j, k))
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Sub for DerivativeRange<T, D, R, C>
where
    T: Real,
{
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_fn(|i, j, k| self.get(i, j, k) - rhs.get(i, j, k))
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Neg for DerivativeRange<T, D, R, C>
where
    T: Real,
{
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.map(|x| -x)
    }
}

impl<T, const D: usize, const R: usize, const C: usize> Mul<T> for DerivativeRange<T, D, R, C>
where
    T: Real,
{
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        self.map(|x| x * rhs)
    }
}

/// Conversions between static values `SMatrix<T, R, C>` and flat dynamic vectors.
///
/// The dynamic layout is row-major: entry $(i, j)$ is stored at index $i r_C + j$.
#[derive(Debug)]
pub struct RangeSelector<T, const R: usize, const C: usize>(PhantomData<T>);

impl<T, const R: usize, const C: usize> RangeSelector<T, R, C>
where
    T: Real,
{
    /// Evaluates to `()` for positive `R` and `C`, and fails to compile otherwise.
    pub const VALID_SHAPE: () = PositiveDimensions::<1, R, C>::ASSERT;

    pub fn size() -> usize {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SHAPE;
        R * C
    }

    /// Resizes `dynamic` to exactly $r r_C$ entries.
    pub fn ensure_size(dynamic: &mut DVector<T>) {
        let size = Self::size();
        if dynamic.len() != size {
            dynamic.resize_vertically_mut(size, T::zero());
        }
    }

    /// Copies `value` into `dynamic` in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `dynamic` does not have exactly $r r_C$ entries.
    pub fn convert(value: &SMatrix<T, R, C>, dynamic: &mut DVector<T>) {
        assert_eq!(dynamic.len(), Self::size(), "Dynamic value must have r * rC entries");
        for i in 0..R {
            for j in 0..C {
                dynamic[i * C + j] = value[(i, j)];
            }
        }
    }

    pub fn to_dynamic(value: &SMatrix<T, R, C>) -> DVector<T> {
        let mut dynamic = DVector::zeros(Self::size());
        Self::convert(value, &mut dynamic);
        dynamic
    }

    pub fn from_dynamic(dynamic: &DVector<T>) -> Result<SMatrix<T, R, C>, FunctionError> {
        if dynamic.len() != Self::size() {
            return Err(FunctionError::shape_mismatch(
                "when converting a dynamic value",
                format!("expected {R}x{C} = {} entries, got {}", Self::size(), dynamic.len()),
            ));
        }
        Ok(SMatrix::from_fn(|i, j| dynamic[i * C + j]))
    }
}

/// Conversions between static derivatives [`DerivativeRange`] and flat dynamic vectors.
///
/// The dynamic layout is row, then column, then domain axis: the derivative of entry $(i, j)$ along
/// axis $k$ is stored at index $(i r_C + j) d + k$.
#[derive(Debug)]
pub struct DerivativeRangeSelector<T, const D: usize, const R: usize, const C: usize>(PhantomData<T>);

impl<T, const D: usize, const R: usize, const C: usize> DerivativeRangeSelector<T, D, R, C>
where
    T: Real,
{
    /// Evaluates to `()` for positive `D`, `R` and `C`, and fails to compile otherwise.
    pub const VALID_SHAPE: () = PositiveDimensions::<D, R, C>::ASSERT;

    pub fn size() -> usize {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_SHAPE;
        D * R * C
    }

    pub fn ensure_size(dynamic: &mut DVector<T>) {
        let size = Self::size();
        if dynamic.len() != size {
            dynamic.resize_vertically_mut(size, T::zero());
        }
    }

    /// # Panics
    ///
    /// Panics if `dynamic` does not have exactly $d r r_C$ entries.
    pub fn convert(derivative: &DerivativeRange<T, D, R, C>, dynamic: &mut DVector<T>) {
        assert_eq!(dynamic.len(), Self::size(), "Dynamic derivative must have d * r * rC entries");
        for i in 0..R {
            for j in 0..C {
                for k in 0..D {
                    dynamic[(i * C + j) * D + k] = derivative.get(i, j, k);
                }
            }
        }
    }

    pub fn to_dynamic(derivative: &DerivativeRange<T, D, R, C>) -> DVector<T> {
        let mut dynamic = DVector::zeros(Self::size());
        Self::convert(derivative, &mut dynamic);
        dynamic
    }

    pub fn from_dynamic(dynamic: &DVector<T>) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        if dynamic.len() != Self::size() {
            return Err(FunctionError::shape_mismatch(
                "when converting a dynamic derivative",
                format!("expected {D}x{R}x{C} = {} entries, got {}", Self::size(), dynamic.len()),
            ));
        }
        Ok(DerivativeRange::from_fn(|i, j, k| dynamic[(i * C + j) * D + k]))
    }
}
