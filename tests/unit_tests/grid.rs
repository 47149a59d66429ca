use fenris_functions::element::ElementGeometry;
use fenris_functions::grid::procedural::{
    create_rectangular_uniform_quad_mesh_2d, create_uniform_interval_mesh_1d, create_unit_box_uniform_hex_mesh_3d,
    create_unit_square_uniform_quad_mesh_2d, create_unit_square_uniform_tri_mesh_2d,
};
use fenris_functions::grid::{GridView, Quad4Connectivity, Tri3Connectivity};
use matrixcompare::assert_scalar_eq;
use nalgebra::{Point1, Point2};

#[test]
fn interval_mesh() {
    let mesh = create_uniform_interval_mesh_1d(-1.0, 1.0, 4);
    assert_eq!(mesh.vertices().len(), 5);
    assert_eq!(mesh.num_elements(), 4);
    let element = mesh.element(1).unwrap();
    assert_eq!(element.center(), Point1::new(-0.25));
    assert!(mesh.element(4).is_none());

    let empty = create_uniform_interval_mesh_1d(0.0, 1.0, 0);
    assert_eq!(empty.num_elements(), 0);
}

#[test]
fn rectangular_quad_mesh() {
    let mesh = create_rectangular_uniform_quad_mesh_2d(&Point2::new(0.0, 0.0), &Point2::new(3.0, 1.0), [3, 2]);
    assert_eq!(mesh.vertices().len(), 12);
    assert_eq!(mesh.num_elements(), 6);
    assert_eq!(mesh.connectivity()[0], Quad4Connectivity([0, 1, 5, 4]));

    // Elements are numbered row by row
    let element = mesh.element(4).unwrap();
    assert_eq!(element.center(), Point2::new(1.5, 0.75));
    assert_scalar_eq!(element.diameter(), 1.25f64.sqrt(), comp = abs, tol = 1e-14);
}

#[test]
fn unit_square_meshes() {
    let quads = create_unit_square_uniform_quad_mesh_2d::<f64>(4);
    assert_eq!(quads.num_elements(), 16);
    assert_eq!(quads.vertices().len(), 25);

    let triangles = create_unit_square_uniform_tri_mesh_2d::<f64>(4);
    assert_eq!(triangles.num_elements(), 32);
    assert_eq!(triangles.vertices(), quads.vertices());
    assert_eq!(triangles.connectivity()[0], Tri3Connectivity([0, 1, 5]));

    // The triangles cover the square, with positive orientation
    let total_area: f64 = (0..triangles.num_elements())
        .map(|i| triangles.element(i).unwrap().signed_area())
        .sum();
    assert_scalar_eq!(total_area, 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn unit_box_hex_mesh() {
    let mesh = create_unit_box_uniform_hex_mesh_3d::<f64>(2);
    assert_eq!(mesh.num_elements(), 8);
    assert_eq!(mesh.vertices().len(), 27);
    for i in 0..mesh.num_elements() {
        let element = mesh.element(i).unwrap();
        assert!(element.is_affine());
        let j = element.reference_jacobian(&nalgebra::Point3::origin());
        assert_scalar_eq!(j.determinant(), 0.25f64.powi(3), comp = abs, tol = 1e-14);
    }
}
