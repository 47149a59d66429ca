//! Strategies for points and non-degenerate elements.
use crate::element::{Hex8Element, Quad4d2Element, ReferenceCell, Segment1dElement, Tet4Element, Tri3d2Element};
use ::proptest::prelude::*;
use nalgebra::{Point1, Point2, Point3, Rotation3, Vector2, Vector3};
use std::f64::consts::PI;

pub fn point1() -> impl Strategy<Value = Point1<f64>> {
    (-10.0..10.0).prop_map(Point1::new)
}

pub fn point2() -> impl Strategy<Value = Point2<f64>> {
    // Pick a reasonably small range to pick coordinates from,
    // otherwise we can easily get floating point numbers that are
    // so ridiculously large as to break anything we might want to do with them
    let range = -10.0..10.0;
    [range.clone(), range].prop_map(|[x, y]| Point2::new(x, y))
}

pub fn point3() -> impl Strategy<Value = Point3<f64>> {
    let range = -10.0..10.0;
    [range.clone(), range.clone(), range].prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Edge lengths far enough from zero for the elements to be well conditioned.
fn edge_length() -> impl Strategy<Value = f64> {
    0.5..5.0
}

/// Two edge vectors spanning a counter-clockwise corner with an angle bounded away from 0 and $\pi$.
fn ccw_edges_2d() -> impl Strategy<Value = (Vector2<f64>, Vector2<f64>)> {
    (edge_length(), edge_length(), 0.0..2.0 * PI, 0.3..(PI - 0.3)).prop_map(|(l1, l2, theta, phi)| {
        let u = Vector2::new(theta.cos(), theta.sin()) * l1;
        let v = Vector2::new((theta + phi).cos(), (theta + phi).sin()) * l2;
        (u, v)
    })
}

/// Three edge vectors with positive triple product.
fn positive_edges_3d() -> impl Strategy<Value = [Vector3<f64>; 3]> {
    let angles = [0.0..2.0 * PI, 0.0..2.0 * PI, 0.0..2.0 * PI];
    let tilt = [-0.5..0.5, -0.5..0.5];
    (edge_length(), edge_length(), edge_length(), 0.3..(PI - 0.3), tilt, angles).prop_map(
        |(l1, l2, l3, phi, [t1, t2], [roll, pitch, yaw])| {
            let rotation = Rotation3::from_euler_angles(roll, pitch, yaw);
            let e1 = Vector3::x() * l1;
            let e2 = Vector3::new(phi.cos(), phi.sin(), 0.0) * l2;
            let e3 = Vector3::new(t1, t2, 1.0).normalize() * l3;
            [rotation * e1, rotation * e2, rotation * e3]
        },
    )
}

impl Arbitrary for Segment1dElement<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point1(), edge_length())
            .prop_map(|(a, length)| Segment1dElement::from_vertices([a, Point1::new(a.x + length)]))
            .boxed()
    }
}

impl Arbitrary for Tri3d2Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point2(), ccw_edges_2d())
            .prop_map(|(a, (u, v))| Tri3d2Element::from_vertices([a, a + u, a + v]))
            .boxed()
    }
}

impl Arbitrary for Quad4d2Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Parallelograms with a perturbed third vertex. The perturbation is small enough to keep the
    /// quadrilateral convex, so in general the element is not affine.
    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point2(), ccw_edges_2d(), [-1.0..1.0, -1.0..1.0])
            .prop_map(|(a, (u, v), [w1, w2])| {
                let scale = 0.1 * u.norm().min(v.norm()) * (u.perp(&v) / (u.norm() * v.norm()));
                let w = Vector2::new(w1, w2) * scale;
                Quad4d2Element::from_vertices([a, a + u, a + u + v + w, a + v])
            })
            .boxed()
    }
}

impl Arbitrary for Tet4Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point3(), positive_edges_3d())
            .prop_map(|(a, [e1, e2, e3])| Tet4Element::from_vertices([a, a + e1, a + e2, a + e3]))
            .boxed()
    }
}

impl Arbitrary for Hex8Element<f64> {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Parallelepipeds.
    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (point3(), positive_edges_3d())
            .prop_map(|(a, edges)| {
                let vertices = std::array::from_fn(|i| {
                    let signs = ReferenceCell::Hexahedron.vertex_coords()[i];
                    (0..3).fold(a, |x, k| x + edges[k] * (0.5 * (signs[k] + 1.0)))
                });
                Hex8Element::from_vertices(vertices)
            })
            .boxed()
    }
}
