use crate::element::{interpolate_vertices, vertex_diameter, vertex_jacobian, ElementGeometry, ReferenceCell};
use crate::Real;
use nalgebra::{Matrix3, Point3, Scalar, Vector3};
use numeric_literals::replace_float_literals;

/// A linear tetrahedron.
///
/// The reference element has the corners (-1, -1, -1), (1, -1, -1), (-1, 1, -1) and (-1, -1, 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tet4Element<T>
where
    T: Scalar,
{
    vertices: [Point3<T>; 4],
}

impl<T> Tet4Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point3<T>; 4]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point3<T>; 4] {
        &self.vertices
    }
}

impl<T> Tet4Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ])
    }
}

impl<T> ElementGeometry<T, 3> for Tet4Element<T>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell {
        ReferenceCell::Tetrahedron
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn map_reference_coords(&self, xi: &Point3<T>) -> Point3<T> {
        let phi = [
            -0.5 * (1.0 + xi.x + xi.y + xi.z),
            0.5 * (1.0 + xi.x),
            0.5 * (1.0 + xi.y),
            0.5 * (1.0 + xi.z),
        ];
        interpolate_vertices(&self.vertices, &phi)
    }

    #[rustfmt::skip]
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, _xi: &Point3<T>) -> Matrix3<T> {
        let gradients = [
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new( 0.5,  0.0,  0.0),
            Vector3::new( 0.0,  0.5,  0.0),
            Vector3::new( 0.0,  0.0,  0.5),
        ];
        vertex_jacobian(&self.vertices, &gradients)
    }

    fn diameter(&self) -> T {
        vertex_diameter(&self.vertices)
    }

    fn is_affine(&self) -> bool {
        true
    }
}
