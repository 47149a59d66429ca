//! Binding global smooth functions to single elements.
//!
//! A smooth function is defined in global coordinates $x$, while element-local computations such as
//! quadrature work in reference coordinates $\xi$. A [`LocalizedSmoothFunction`] evaluates a global
//! function at $x(\xi)$ for one element. Besides the global derivatives at $x(\xi)$, it provides the
//! derivatives with respect to $\xi$ through the chain rule.
//!
//! Localized functions are cheap views holding two references. Binding a function to a new element
//! is a matter of calling [`SmoothFunctionAsLocalizable::local_function`] again.
use crate::element::ElementGeometry;
use crate::error::{Capability, FunctionError};
use crate::function::{evaluate_partial, SmoothFunction};
use crate::grid::GridView;
use crate::io::vtk::{FunctionDataSetBuilder, OutputFormat};
use crate::parameter::Parameter;
use crate::range::DerivativeRange;
use crate::util::{is_zero_multi_index, multi_index_axes};
use crate::Real;
use itertools::Itertools;
use nalgebra::{Point, SMatrix};
use num::ToPrimitive;
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::path::Path;

/// A function that lives on a single element and is evaluated in reference coordinates.
pub trait LocalFunction<T, const D: usize, const R: usize, const C: usize>
where
    T: Real,
{
    type Element: ElementGeometry<T, D>;

    fn element(&self) -> &Self::Element;

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError>;

    /// The value at the global point $x(\xi)$.
    fn evaluate(&self, xi: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError>;

    /// The jacobian with respect to global coordinates, evaluated at $x(\xi)$.
    fn jacobian(&self, xi: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError>;

    /// The gradient of $\partial_x^\alpha f$ with respect to global coordinates, evaluated at $x(\xi)$.
    fn derivative(
        &self,
        alpha: &[usize; D],
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError>;

    /// The jacobian of $\xi \mapsto f(x(\xi))$.
    fn reference_jacobian(
        &self,
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError>;

    /// The gradient of $\partial_\xi^\alpha (f \circ x)$ with respect to $\xi$.
    fn reference_derivative(
        &self,
        alpha: &[usize; D],
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError>;
}

/// A smooth function bound to one element.
pub struct LocalizedSmoothFunction<'f, 'e, F: ?Sized, E> {
    function: &'f F,
    element: &'e E,
}

impl<'f, 'e, F: ?Sized, E> Clone for LocalizedSmoothFunction<'f, 'e, F, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'f, 'e, F: ?Sized, E> Copy for LocalizedSmoothFunction<'f, 'e, F, E> {}

impl<'f, 'e, F: ?Sized, E: Debug> Debug for LocalizedSmoothFunction<'f, 'e, F, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalizedSmoothFunction")
            .field("element", self.element)
            .finish_non_exhaustive()
    }
}

impl<'f, 'e, F: ?Sized, E> LocalizedSmoothFunction<'f, 'e, F, E> {
    pub fn new(function: &'f F, element: &'e E) -> Self {
        Self { function, element }
    }

    pub fn function(&self) -> &'f F {
        self.function
    }
}

impl<'f, 'e, T, F, E, const D: usize, const R: usize, const C: usize> LocalFunction<T, D, R, C>
    for LocalizedSmoothFunction<'f, 'e, F, E>
where
    T: Real,
    F: SmoothFunction<T, D, R, C> + ?Sized,
    E: ElementGeometry<T, D>,
{
    type Element = E;

    fn element(&self) -> &E {
        self.element
    }

    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        self.function.order(param)
    }

    fn evaluate(&self, xi: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let x = self.element.map_reference_coords(xi);
        self.function.evaluate(&x, param)
    }

    fn jacobian(&self, xi: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let x = self.element.map_reference_coords(xi);
        self.function.jacobian(&x, param)
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let x = self.element.map_reference_coords(xi);
        self.function.derivative(alpha, &x, param)
    }

    fn reference_jacobian(
        &self,
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let x = self.element.map_reference_coords(xi);
        let j = self.element.reference_jacobian(xi);
        Ok(self.function.jacobian(&x, param)?.transform_gradients(&j))
    }

    /// On affine elements with $x(\xi) = A \xi + b$ we have
    /// $\partial_{\xi_{m_1}} \cdots \partial_{\xi_{m_n}} f = \sum_{i_1, \dots, i_n} A_{i_1 m_1} \cdots A_{i_n m_n}
    /// \partial_{x_{i_1}} \cdots \partial_{x_{i_n}} f$.
    ///
    /// Higher reference derivatives on non-affine elements also involve derivatives of the geometry
    /// and are not supported.
    fn reference_derivative(
        &self,
        alpha: &[usize; D],
        xi: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        if is_zero_multi_index(alpha) {
            return self.reference_jacobian(xi, param);
        }
        if !self.element.is_affine() {
            return Err(FunctionError::not_implemented(
                format!("{} (localized to a non-affine element)", self.function.name()),
                Capability::Derivative,
            ));
        }

        let x = self.element.map_reference_coords(xi);
        let a = self.element.reference_jacobian(xi);
        let alpha_axes = multi_index_axes(alpha);
        let mut partials: BTreeMap<[usize; D], SMatrix<T, R, C>> = BTreeMap::new();
        let mut result = DerivativeRange::zeros();

        for k in 0..D {
            let mut reference_axes = alpha_axes.clone();
            reference_axes.push(k);
            let mut partial = SMatrix::<T, R, C>::zeros();
            for global_axes in itertools::repeat_n(0..D, reference_axes.len()).multi_cartesian_product() {
                let coefficient = global_axes
                    .iter()
                    .zip(&reference_axes)
                    .fold(T::one(), |acc, (&i, &m)| acc * a[(i, m)]);
                if coefficient == T::zero() {
                    continue;
                }
                let mut beta = [0; D];
                for &i in &global_axes {
                    beta[i] += 1;
                }
                let value = match partials.get(&beta) {
                    Some(value) => *value,
                    None => {
                        let value = evaluate_partial(self.function, &beta, &x, param)?;
                        partials.insert(beta, value);
                        value
                    }
                };
                partial += value * coefficient;
            }
            result.set_axis(k, &partial);
        }
        Ok(result)
    }
}

/// Turns a global smooth function into a source of element-local functions.
pub struct SmoothFunctionAsLocalizable<'f, F: ?Sized, E> {
    function: &'f F,
    marker: PhantomData<fn() -> E>,
}

impl<'f, F: ?Sized, E> Clone for SmoothFunctionAsLocalizable<'f, F, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'f, F: ?Sized, E> Copy for SmoothFunctionAsLocalizable<'f, F, E> {}

impl<'f, F: ?Sized, E> Debug for SmoothFunctionAsLocalizable<'f, F, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmoothFunctionAsLocalizable").finish_non_exhaustive()
    }
}

impl<'f, F: ?Sized, E> SmoothFunctionAsLocalizable<'f, F, E> {
    pub fn new(function: &'f F) -> Self {
        Self {
            function,
            marker: PhantomData,
        }
    }

    pub fn function(&self) -> &'f F {
        self.function
    }

    /// Binds the function to `element`.
    pub fn local_function<'e>(&self, element: &'e E) -> LocalizedSmoothFunction<'f, 'e, F, E> {
        LocalizedSmoothFunction::new(self.function, element)
    }

    /// Writes the function, sampled on every element of `grid`, to a VTK file.
    ///
    /// With `subsampling`, every element is refined once before sampling.
    pub fn visualize<T, G, const D: usize, const R: usize, const C: usize>(
        &self,
        grid: &G,
        path: impl AsRef<Path>,
        subsampling: bool,
        format: OutputFormat,
    ) -> eyre::Result<()>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D, Element = E>,
        E: ElementGeometry<T, D>,
        F: SmoothFunction<T, D, R, C>,
    {
        FunctionDataSetBuilder::from_grid(grid)
            .with_subsampling(subsampling)
            .try_export(self.function, path, format)
    }
}

/// Extension methods for binding smooth functions to elements.
pub trait AsLocalizable<T, const D: usize, const R: usize, const C: usize>: SmoothFunction<T, D, R, C>
where
    T: Real,
{
    fn as_localizable<E>(&self) -> SmoothFunctionAsLocalizable<'_, Self, E>
    where
        E: ElementGeometry<T, D>,
    {
        SmoothFunctionAsLocalizable::new(self)
    }

    fn local_function<'e, E>(&self, element: &'e E) -> LocalizedSmoothFunction<'_, 'e, Self, E>
    where
        E: ElementGeometry<T, D>,
    {
        LocalizedSmoothFunction::new(self, element)
    }

    /// See [`SmoothFunctionAsLocalizable::visualize`].
    fn visualize<G>(&self, grid: &G, path: impl AsRef<Path>, subsampling: bool, format: OutputFormat) -> eyre::Result<()>
    where
        T: ToPrimitive,
        G: GridView<T, D>,
    {
        FunctionDataSetBuilder::from_grid(grid)
            .with_subsampling(subsampling)
            .try_export(self, path, format)
    }
}

impl<T, F, const D: usize, const R: usize, const C: usize> AsLocalizable<T, D, R, C> for F
where
    T: Real,
    F: SmoothFunction<T, D, R, C> + ?Sized,
{
}
