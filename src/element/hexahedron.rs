use crate::element::{interpolate_vertices, is_affine_on_vertices, vertex_diameter, vertex_jacobian};
use crate::element::{phi_linear_1d, phi_linear_1d_grad, ElementGeometry, ReferenceCell};
use crate::Real;
use nalgebra::{Matrix3, Point3, Scalar, Vector3};
use numeric_literals::replace_float_literals;

/// A trilinear hexahedron, mapped from $[-1, 1]^3$.
///
/// Vertices follow the VTK ordering: the bottom face $\xi_3 = -1$ counter-clockwise, then the top
/// face in the same order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Hex8Element<T>
where
    T: Scalar,
{
    vertices: [Point3<T>; 8],
}

impl<T> Hex8Element<T>
where
    T: Scalar,
{
    pub fn from_vertices(vertices: [Point3<T>; 8]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point3<T>; 8] {
        &self.vertices
    }
}

impl<T> Hex8Element<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn reference() -> Self {
        Self::from_vertices([
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ])
    }
}

/// The reference coordinates of vertex `i`, which are also the signs of its basis function.
fn vertex_signs<T: Real>(i: usize) -> [T; 3] {
    ReferenceCell::Hexahedron.vertex_coords()[i].map(|s| T::from_f64(s).expect("Literal must fit in T"))
}

impl<T> ElementGeometry<T, 3> for Hex8Element<T>
where
    T: Real,
{
    fn reference_cell(&self) -> ReferenceCell {
        ReferenceCell::Hexahedron
    }

    fn map_reference_coords(&self, xi: &Point3<T>) -> Point3<T> {
        let phi_1d = phi_linear_1d;
        let phi = std::array::from_fn(|i| {
            let [alpha, beta, gamma] = vertex_signs::<T>(i);
            phi_1d(alpha, xi[0]) * phi_1d(beta, xi[1]) * phi_1d(gamma, xi[2])
        });
        interpolate_vertices(&self.vertices, &phi)
    }

    fn reference_jacobian(&self, xi: &Point3<T>) -> Matrix3<T> {
        let phi_1d = phi_linear_1d;
        let grad_1d = phi_linear_1d_grad;
        let gradients = std::array::from_fn(|i| {
            let [alpha, beta, gamma] = vertex_signs::<T>(i);
            Vector3::new(
                grad_1d(alpha) * phi_1d(beta, xi[1]) * phi_1d(gamma, xi[2]),
                phi_1d(alpha, xi[0]) * grad_1d(beta) * phi_1d(gamma, xi[2]),
                phi_1d(alpha, xi[0]) * phi_1d(beta, xi[1]) * grad_1d(gamma),
            )
        });
        vertex_jacobian(&self.vertices, &gradients)
    }

    fn diameter(&self) -> T {
        vertex_diameter(&self.vertices)
    }

    /// Parallelepipeds are affine.
    fn is_affine(&self) -> bool {
        is_affine_on_vertices::<T, _, 3>(self)
    }
}
