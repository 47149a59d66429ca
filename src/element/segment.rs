use crate::element::{interpolate_vertices, vertex_diameter, vertex_jacobian, ElementGeometry, ReferenceCell};
use crate::element::{phi_linear_1d, phi_linear_1d_grad};
use crate::Real;
use nalgebra::{Matrix1, Point1, Scalar, Vector1};
use numeric_literals::replace_float_literals;

/// A segment in one dimension.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment1dElement<T>
where
    T: Scalar,
{
    vertices: [Point1<T>; 2],
}

impl<T: Scalar> Segment1dElement<T> {
    pub fn from_vertices(vertices: [Point1<T>; 2]) -> Self {
        Self { vertices }
    }

    pub fn from_interval(interval: [T; 2]) -> Self {
        Self::from_vertices([Point1::new(interval[0].clone()), Point1::new(interval[1].clone())])
    }

    pub fn vertices(&self) -> &[Point1<T>; 2] {
        &self.vertices
    }
}

impl<T: Real> Segment1dElement<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_interval([-1.0, 1.0])
    }
}

impl<T> ElementGeometry<T, 1> for Segment1dElement<T>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell {
        ReferenceCell::Segment
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn map_reference_coords(&self, xi: &Point1<T>) -> Point1<T> {
        let phi = [phi_linear_1d(-1.0, xi[0]), phi_linear_1d(1.0, xi[0])];
        interpolate_vertices(&self.vertices, &phi)
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_jacobian(&self, _xi: &Point1<T>) -> Matrix1<T> {
        let gradients = [
            Vector1::new(phi_linear_1d_grad(-1.0)),
            Vector1::new(phi_linear_1d_grad(1.0)),
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
