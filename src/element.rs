//! Element geometries: maps from reference cells to physical elements.
//!
//! Reference cells follow the usual fenris conventions: the segment is $[-1, 1]$, quadrilaterals and
//! hexahedra are $[-1, 1]^d$, and simplices have their right-angle corner at $(-1, \dots, -1)$.
use crate::error::FunctionError;
use crate::Real;
use fenris_optimize::calculus::VectorFunctionBuilder;
use fenris_optimize::newton::{newton, NewtonSettings};
use itertools::Itertools;
use nalgebra::{distance, DVector, DVectorView, DVectorViewMut, Point, SMatrix, SVector};
use numeric_literals::replace_float_literals;
use std::error::Error;

mod hexahedron;
mod quadrilateral;
mod segment;
mod tetrahedron;
mod triangle;

pub use hexahedron::*;
pub use quadrilateral::*;
pub use segment::*;
pub use tetrahedron::*;
pub use triangle::*;

/// The reference cell an element is mapped from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceCell {
    Segment,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
}

#[rustfmt::skip]
const HEXAHEDRON_VERTICES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
];

impl ReferenceCell {
    pub fn dimension(&self) -> usize {
        match self {
            ReferenceCell::Segment => 1,
            ReferenceCell::Triangle | ReferenceCell::Quadrilateral => 2,
            ReferenceCell::Tetrahedron | ReferenceCell::Hexahedron => 3,
        }
    }

    pub fn is_simplex(&self) -> bool {
        matches!(
            self,
            ReferenceCell::Segment | ReferenceCell::Triangle | ReferenceCell::Tetrahedron
        )
    }

    /// Reference vertex coordinates, padded with zeros to three dimensions.
    pub fn vertex_coords(&self) -> &'static [[f64; 3]] {
        match self {
            ReferenceCell::Segment => &[[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
            ReferenceCell::Triangle => &[[-1.0, -1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, 1.0, 0.0]],
            ReferenceCell::Quadrilateral => &[
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ],
            ReferenceCell::Tetrahedron => &[
                [-1.0, -1.0, -1.0],
                [1.0, -1.0, -1.0],
                [-1.0, 1.0, -1.0],
                [-1.0, -1.0, 1.0],
            ],
            ReferenceCell::Hexahedron => &HEXAHEDRON_VERTICES,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_coords().len()
    }

    /// # Panics
    ///
    /// Panics if `D` is not the dimension of the cell.
    pub fn reference_vertices<T: Real, const D: usize>(&self) -> Vec<Point<T, D>> {
        assert_eq!(D, self.dimension(), "Point dimension must match the cell dimension");
        self.vertex_coords()
            .iter()
            .map(|coords| padded_to_point(coords))
            .collect()
    }

    /// The barycenter of the reference cell.
    ///
    /// # Panics
    ///
    /// Panics if `D` is not the dimension of the cell.
    pub fn reference_center<T: Real, const D: usize>(&self) -> Point<T, D> {
        let vertices = self.reference_vertices::<T, D>();
        let n = T::from_usize(vertices.len()).expect("Vertex count must fit in T");
        let sum = vertices
            .iter()
            .fold(SVector::<T, D>::zeros(), |acc, v| acc + v.coords);
        Point::from(sum / n)
    }
}

/// Converts padded reference coordinates to a point of dimension `D`.
pub(crate) fn padded_to_point<T: Real, const D: usize>(coords: &[f64; 3]) -> Point<T, D> {
    Point::from(SVector::from_fn(|i, _| {
        T::from_f64(coords[i]).expect("Literal must fit in T")
    }))
}

/// The geometry of an element, mapping reference coordinates $\xi$ to global coordinates $x(\xi)$.
pub trait ElementGeometry<T, const D: usize>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell;

    /// Maps reference coordinates to global coordinates.
    fn map_reference_coords(&self, xi: &Point<T, D>) -> Point<T, D>;

    /// The Jacobian $\partial x / \partial \xi$ of the reference-to-global map.
    fn reference_jacobian(&self, xi: &Point<T, D>) -> SMatrix<T, D, D>;

    /// The largest distance between two vertices.
    fn diameter(&self) -> T;

    /// Whether the reference-to-global map is affine, i.e. has a constant Jacobian.
    fn is_affine(&self) -> bool;

    /// The global position of the center of the reference cell.
    fn center(&self) -> Point<T, D> {
        self.map_reference_coords(&self.reference_cell().reference_center())
    }

    /// Maps global coordinates to reference coordinates.
    fn map_physical_coords(&self, x: &Point<T, D>) -> Result<Point<T, D>, FunctionError> {
        map_physical_coordinates(self, x)
    }
}

/// Linear Lagrange basis function on $[-1, 1]$ with value 1 at `alpha`.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn phi_linear_1d<T: Real>(alpha: T, xi: T) -> T {
    (1.0 + alpha * xi) / 2.0
}

#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn phi_linear_1d_grad<T: Real>(alpha: T) -> T {
    alpha / 2.0
}

/// The point $\sum_n \phi_n x_n$ for vertices $x_n$ and basis values $\phi_n$.
pub(crate) fn interpolate_vertices<T: Real, const D: usize, const N: usize>(
    vertices: &[Point<T, D>; N],
    phi: &[T; N],
) -> Point<T, D> {
    let coords = vertices
        .iter()
        .zip(phi)
        .fold(SVector::zeros(), |acc, (v, &phi)| acc + v.coords * phi);
    Point::from(coords)
}

/// The Jacobian $\sum_n x_n \nabla \phi_n^T$ for vertices $x_n$ and basis gradients $\nabla \phi_n$.
pub(crate) fn vertex_jacobian<T: Real, const D: usize, const N: usize>(
    vertices: &[Point<T, D>; N],
    gradients: &[SVector<T, D>; N],
) -> SMatrix<T, D, D> {
    vertices
        .iter()
        .zip(gradients)
        .fold(SMatrix::zeros(), |acc, (v, grad)| acc + v.coords * grad.transpose())
}

pub(crate) fn vertex_diameter<T: Real, const D: usize>(vertices: &[Point<T, D>]) -> T {
    vertices
        .iter()
        .tuple_combinations()
        .map(|(x, y)| distance(x, y))
        .fold(T::zero(), |a, b| a.max(b))
}

/// Whether the map of `element` agrees with its linearization at the reference center in every
/// reference vertex.
///
/// For multilinear elements this is equivalent to the map being affine.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub(crate) fn is_affine_on_vertices<T, E, const D: usize>(element: &E) -> bool
where
    T: Real,
    E: ElementGeometry<T, D> + ?Sized,
{
    let cell = element.reference_cell();
    let xi_c = cell.reference_center::<T, D>();
    let x_c = element.map_reference_coords(&xi_c);
    let j = element.reference_jacobian(&xi_c);
    let tolerance = 1e-10 * element.diameter();
    cell.reference_vertices::<T, D>().iter().all(|xi| {
        let linearized = x_c + j * (xi.coords - xi_c.coords);
        distance(&linearized, &element.map_reference_coords(xi)) <= tolerance
    })
}

/// Maps global coordinates `x` to reference coordinates of `element`.
///
/// Affine elements are inverted directly. For other elements, we solve $x(\xi) - x = 0$ with
/// Newton's method started in the reference center. Since `x` is expected to lie in the element, the
/// diameter of the element gives a representative scale for the residual, and we stop once
/// $\| x(\xi) - x \| \leq \epsilon \operatorname{diam}$.
#[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
pub fn map_physical_coordinates<T, E, const D: usize>(
    element: &E,
    x: &Point<T, D>,
) -> Result<Point<T, D>, FunctionError>
where
    T: Real,
    E: ElementGeometry<T, D> + ?Sized,
{
    let xi_c = element.reference_cell().reference_center::<T, D>();

    if element.is_affine() {
        let j_inv = element
            .reference_jacobian(&xi_c)
            .try_inverse()
            .ok_or_else(|| FunctionError::GeometryMapping {
                details: "reference Jacobian is not invertible".to_string(),
            })?;
        let rhs = x.coords - element.map_reference_coords(&xi_c).coords;
        return Ok(xi_c + j_inv * rhs);
    }

    let f = VectorFunctionBuilder::with_dimension(D)
        .with_function(|f: &mut DVectorViewMut<T>, xi: &DVectorView<T>| {
            f.copy_from(&(element.map_reference_coords(&view_to_point(xi)).coords - x.coords));
        })
        .with_jacobian_solver(|sol: &mut DVectorViewMut<T>, xi: &DVectorView<T>, rhs: &DVectorView<T>| {
            let j_inv = element
                .reference_jacobian(&view_to_point(xi))
                .try_inverse()
                .ok_or_else(|| Box::<dyn Error>::from("Reference Jacobian not invertible"))?;
            sol.copy_from(&(j_inv * SVector::<T, D>::from_fn(|i, _| rhs[i])));
            Ok(())
        });

    let settings = NewtonSettings {
        max_iterations: Some(20),
        tolerance: 1e-12 * element.diameter(),
    };

    let mut xi = DVector::<T>::from_column_slice(xi_c.coords.as_slice());
    let mut f_val = DVector::<T>::zeros(D);
    let mut dx = DVector::<T>::zeros(D);
    newton(f, &mut xi, &mut f_val, &mut dx, settings).map_err(|err| FunctionError::GeometryMapping {
        details: err.to_string(),
    })?;

    Ok(view_to_point(&DVectorView::from(&xi)))
}

fn view_to_point<T: Real, const D: usize>(xi: &DVectorView<T>) -> Point<T, D> {
    Point::from(SVector::from_fn(|i, _| xi[i]))
}
