//! Minimal grids: vertices together with element connectivity.
use crate::element::{ElementGeometry, Hex8Element, Quad4d2Element, Segment1dElement, Tet4Element, Tri3d2Element};
use crate::Real;
use nalgebra::{Point, Scalar};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod procedural;

/// Connectivity of a single element: indices into the vertices of a mesh.
pub trait ElementConnectivity<T, const D: usize>: Debug + Clone
where
    T: Real,
{
    type Element: ElementGeometry<T, D>;

    fn vertex_indices(&self) -> &[usize];

    /// Constructs the element from the mesh vertices.
    ///
    /// Returns `None` if an index is out of bounds.
    fn element(&self, vertices: &[Point<T, D>]) -> Option<Self::Element>;
}

/// Gathers the vertices with the given indices.
fn gather_vertices<T: Scalar, const D: usize, const N: usize>(
    vertices: &[Point<T, D>],
    indices: &[usize; N],
) -> Option<[Point<T, D>; N]> {
    let mut gathered = Vec::with_capacity(N);
    for &index in indices {
        gathered.push(vertices.get(index)?.clone());
    }
    gathered.try_into().ok()
}

macro_rules! impl_connectivity {
    ($connectivity:ident, $element:ident, $dim:expr, $num_vertices:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $connectivity(pub [usize; $num_vertices]);

        impl<T> ElementConnectivity<T, $dim> for $connectivity
        where
            T: Real,
        {
            type Element = $element<T>;

            fn vertex_indices(&self) -> &[usize] {
                &self.0
            }

            fn element(&self, vertices: &[Point<T, $dim>]) -> Option<Self::Element> {
                gather_vertices(vertices, &self.0).map($element::from_vertices)
            }
        }
    };
}

impl_connectivity!(Segment2Connectivity, Segment1dElement, 1, 2, "Connectivity of a segment in 1D.");
impl_connectivity!(Tri3Connectivity, Tri3d2Element, 2, 3, "Connectivity of a linear triangle in 2D.");
impl_connectivity!(Quad4Connectivity, Quad4d2Element, 2, 4, "Connectivity of a bilinear quadrilateral in 2D.");
impl_connectivity!(Tet4Connectivity, Tet4Element, 3, 4, "Connectivity of a linear tetrahedron.");
impl_connectivity!(Hex8Connectivity, Hex8Element, 3, 8, "Connectivity of a trilinear hexahedron.");

/// A collection of elements that can be visited one by one.
pub trait GridView<T, const D: usize>
where
    T: Real,
{
    type Element: ElementGeometry<T, D>;

    fn num_elements(&self) -> usize;

    fn element(&self, index: usize) -> Option<Self::Element>;
}

/// Index-based mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh<T: Scalar, const D: usize, Connectivity> {
    vertices: Vec<Point<T, D>>,
    connectivity: Vec<Connectivity>,
}

pub type IntervalMesh<T> = Mesh<T, 1, Segment2Connectivity>;
pub type TriangleMesh2d<T> = Mesh<T, 2, Tri3Connectivity>;
pub type QuadMesh2d<T> = Mesh<T, 2, Quad4Connectivity>;
pub type TetMesh<T> = Mesh<T, 3, Tet4Connectivity>;
pub type HexMesh<T> = Mesh<T, 3, Hex8Connectivity>;

impl<T: Scalar, const D: usize, Connectivity> Mesh<T, D, Connectivity> {
    pub fn from_vertices_and_connectivity(vertices: Vec<Point<T, D>>, connectivity: Vec<Connectivity>) -> Self {
        Self { vertices, connectivity }
    }

    pub fn vertices(&self) -> &[Point<T, D>] {
        &self.vertices
    }

    pub fn connectivity(&self) -> &[Connectivity] {
        &self.connectivity
    }
}

impl<T, const D: usize, C> GridView<T, D> for Mesh<T, D, C>
where
    T: Real,
    C: ElementConnectivity<T, D>,
{
    type Element = C::Element;

    fn num_elements(&self) -> usize {
        self.connectivity.len()
    }

    fn element(&self, index: usize) -> Option<Self::Element> {
        self.connectivity.get(index)?.element(&self.vertices)
    }
}

impl<T: Real> QuadMesh2d<T> {
    /// Splits every quadrilateral into two triangles along the diagonal from its second to its
    /// fourth vertex.
    pub fn split_into_triangles(&self) -> TriangleMesh2d<T> {
        let triangles = self
            .connectivity
            .iter()
            .flat_map(|Quad4Connectivity([a, b, c, d])| {
                [Tri3Connectivity([*a, *b, *d]), Tri3Connectivity([*c, *d, *b])]
            })
            .collect();
        Mesh::from_vertices_and_connectivity(self.vertices.clone(), triangles)
    }
}
