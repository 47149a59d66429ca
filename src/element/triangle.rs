use crate::element::{interpolate_vertices, vertex_diameter, vertex_jacobian, ElementGeometry, ReferenceCell};
use crate::Real;
use nalgebra::{Matrix2, Point2, Scalar, Vector2};
use numeric_literals::replace_float_literals;

/// A linear triangle in two dimensions.
///
/// The reference element is chosen to be the triangle defined by the corners
/// (-1, -1), (1, -1), (-1, 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tri3d2Element<T>
where
    T: Scalar,
{
    vertices: [Point2<T>; 3],
}

impl<T> Tri3d2Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point2<T>; 3]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2<T>; 3] {
        &self.vertices
    }
}

impl<T> Tri3d2Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([Point2::new(-1.0, -1.0), Point2::new(1.0, -1.0), Point2::new(-1.0, 1.0)])
    }

    /// Signed area, positive for counter-clockwise vertices.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn signed_area(&self) -> T {
        let [a, b, c] = &self.vertices;
        let ab = b - a;
        let ac = c - a;
        0.5 * (ab.x * ac.y - ab.y * ac.x)
    }
}

impl<T> ElementGeometry<T, 2> for Tri3d2Element<T>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell {
        ReferenceCell::Triangle
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn map_reference_coords(&self, xi: &Point2<T>) -> Point2<T> {
        let phi = [
            -0.5 * xi.x - 0.5 * xi.y,
            0.5 * xi.x + 0.5,
            0.5 * xi.y + 0.5,
        ];
        interpolate_vertices(&self.vertices, &phi)
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, _xi: &Point2<T>) -> Matrix2<T> {
        let gradients = [Vector2::new(-0.5, -0.5), Vector2::new(0.5, 0.0), Vector2::new(0.0, 0.5)];
        vertex_jacobian(&self.vertices, &gradients)
    }

    fn diameter(&self) -> T {
        vertex_diameter(&self.vertices)
    }

    fn is_affine(&self) -> bool {
        true
    }
}
