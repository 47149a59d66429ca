//! Basic procedural mesh generation routines.
use crate::grid::{
    Hex8Connectivity, HexMesh, IntervalMesh, Mesh, Quad4Connectivity, QuadMesh2d, Segment2Connectivity,
    TriangleMesh2d,
};
use crate::Real;
use nalgebra::{Point1, Point2, Point3};

fn to_real<T: Real>(i: usize) -> T {
    T::from_usize(i).expect("Must be able to fit usize in T")
}

/// Uniform subdivision of the interval `[a, b]` into `cells` segments.
pub fn create_uniform_interval_mesh_1d<T: Real>(a: T, b: T, cells: usize) -> IntervalMesh<T> {
    if cells == 0 {
        return Mesh::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }
    let h = (b - a) / to_real(cells);
    let vertices = (0..=cells).map(|i| Point1::new(a + h * to_real(i))).collect();
    let segments = (0..cells).map(|i| Segment2Connectivity([i, i + 1])).collect();
    Mesh::from_vertices_and_connectivity(vertices, segments)
}

/// Axis-aligned uniform quad mesh of the rectangle spanned by `lower_left` and `upper_right`.
///
/// Vertices are numbered row by row starting in the lower left corner, and every quad is ordered
/// counter-clockwise.
pub fn create_rectangular_uniform_quad_mesh_2d<T: Real>(
    lower_left: &Point2<T>,
    upper_right: &Point2<T>,
    cells: [usize; 2],
) -> QuadMesh2d<T> {
    let [num_cells_x, num_cells_y] = cells;
    if num_cells_x == 0 || num_cells_y == 0 {
        return Mesh::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let extents = upper_right - lower_left;
    let hx = extents.x / to_real(num_cells_x);
    let hy = extents.y / to_real(num_cells_y);

    let mut vertices = Vec::with_capacity((num_cells_x + 1) * (num_cells_y + 1));
    for j in 0..=num_cells_y {
        for i in 0..=num_cells_x {
            vertices.push(Point2::new(
                lower_left.x + hx * to_real(i),
                lower_left.y + hy * to_real(j),
            ));
        }
    }

    let to_global_vertex_index = |i, j| (num_cells_x + 1) * j + i;
    let mut cells = Vec::with_capacity(num_cells_x * num_cells_y);
    for j in 0..num_cells_y {
        for i in 0..num_cells_x {
            cells.push(Quad4Connectivity([
                to_global_vertex_index(i, j),
                to_global_vertex_index(i + 1, j),
                to_global_vertex_index(i + 1, j + 1),
                to_global_vertex_index(i, j + 1),
            ]));
        }
    }

    Mesh::from_vertices_and_connectivity(vertices, cells)
}

pub fn create_unit_square_uniform_quad_mesh_2d<T: Real>(cells_per_dim: usize) -> QuadMesh2d<T> {
    create_rectangular_uniform_quad_mesh_2d(
        &Point2::origin(),
        &Point2::new(T::one(), T::one()),
        [cells_per_dim, cells_per_dim],
    )
}

pub fn create_unit_square_uniform_tri_mesh_2d<T: Real>(cells_per_dim: usize) -> TriangleMesh2d<T> {
    create_unit_square_uniform_quad_mesh_2d(cells_per_dim).split_into_triangles()
}

/// Uniform hexahedral mesh of the unit cube $[0, 1]^3$.
pub fn create_unit_box_uniform_hex_mesh_3d<T: Real>(cells_per_dim: usize) -> HexMesh<T> {
    let n = cells_per_dim;
    if n == 0 {
        return Mesh::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let h = T::one() / to_real(n);
    let mut vertices = Vec::with_capacity((n + 1).pow(3));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(h * to_real(i), h * to_real(j), h * to_real(k)));
            }
        }
    }

    let index = |i, j, k| (n + 1) * (n + 1) * k + (n + 1) * j + i;
    let mut cells = Vec::with_capacity(n.pow(3));
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                cells.push(Hex8Connectivity([
                    index(i, j, k),
                    index(i + 1, j, k),
                    index(i + 1, j + 1, k),
                    index(i, j + 1, k),
                    index(i, j, k + 1),
                    index(i + 1, j, k + 1),
                    index(i + 1, j + 1, k + 1),
                    index(i, j + 1, k + 1),
                ]));
            }
        }
    }

    Mesh::from_vertices_and_connectivity(vertices, cells)
}
