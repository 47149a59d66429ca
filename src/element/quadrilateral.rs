use crate::element::{interpolate_vertices, is_affine_on_vertices, vertex_diameter, vertex_jacobian};
use crate::element::{ElementGeometry, ReferenceCell};
use crate::Real;
use nalgebra::{Matrix2, Point2, Scalar, Vector2};
use numeric_literals::replace_float_literals;

/// A bilinear quadrilateral in two dimensions, mapped from $[-1, 1]^2$.
///
/// Vertices are ordered counter-clockwise, starting from the image of $(-1, -1)$.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Quad4d2Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 4],
}

impl<T> Quad4d2Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 4]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<T>; 4] {
        &self.vertices
    }
}

impl<T> Quad4d2Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([
            Point2::new(-1.0, -1.0),
            Point2::new(1.0, -1.0),
            Point2::new(1.0, 1.0),
            Point2::new(-1.0, 1.0),
        ])
    }
}

impl<T> ElementGeometry<T, 2> for Quad4d2Element<T>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell {
        ReferenceCell::Quadrilateral
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        // N_{alpha, beta}([alpha, beta]) = 1 with alpha, beta = 1 or -1
        let phi = |alpha, beta| (1.0 + alpha * xi[0]) * (1.0 + beta * xi[1]) / 4.0;
        let phi = [
            phi(-1.0, -1.0),
            phi( 1.0, -1.0),
            phi( 1.0,  1.0),
            phi(-1.0,  1.0),
        ];
        interpolate_vertices(&self.vertices, &phi)
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, xi: &Point2<T>) -> Matrix2<T> {
        let phi_grad = |alpha, beta|
            Vector2::new(
                alpha * (1.0 + beta * xi[1]) / 4.0,
                beta * (1.0 + alpha * xi[0]) / 4.0,
            );
        let gradients = [
            phi_grad(-1.0, -1.0),
            phi_grad( 1.0, -1.0),
            phi_grad( 1.0,  1.0),
            phi_grad(-1.0,  1.0),
        ];
        vertex_jacobian(&self.vertices, &gradients)
    }

    fn diameter(&self) -> T {
        vertex_diameter(&self.vertices)
    }

    /// Parallelograms are affine.
    fn is_affine(&self) -> bool {
        is_affine_on_vertices::<T, _, 2>(self)
    }
}
