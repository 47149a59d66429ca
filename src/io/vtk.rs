//! Sampling smooth functions on grids and writing the samples as VTK unstructured grids.
//!
//! Every element is written as its own set of cells with its own points, so that the output also
//! represents functions that are discontinuous across element boundaries.
use crate::dynamic::DynamicFunction;
use crate::element::{padded_to_point, ElementGeometry, ReferenceCell};
use crate::error::FunctionError;
use crate::function::SmoothFunction;
use crate::grid::GridView;
use crate::localizable::{LocalFunction, LocalizedSmoothFunction};
use crate::parameter::Parameter;
use crate::Real;
use eyre::{eyre, WrapErr};
use itertools::Itertools;
use log::info;
use nalgebra::Point;
use num::ToPrimitive;
use std::fs;
use std::path::Path;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, Piece, UnstructuredGridPiece,
    Version, VertexNumbers, Vtk,
};

/// Encoding of exported VTK files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Binary,
    Ascii,
}

pub fn vtk_cell_type(cell: ReferenceCell) -> CellType {
    match cell {
        ReferenceCell::Segment => CellType::Line,
        ReferenceCell::Triangle => CellType::Triangle,
        ReferenceCell::Quadrilateral => CellType::Quad,
        ReferenceCell::Tetrahedron => CellType::Tetra,
        ReferenceCell::Hexahedron => CellType::Hexahedron,
    }
}

fn midpoint(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    std::array::from_fn(|i| 0.5 * (a[i] + b[i]))
}

/// The reference cells obtained by refining the reference cell once.
///
/// Every sub-cell is of the same type as `cell` and given by its padded reference vertices.
pub fn refine_reference_cell(cell: ReferenceCell) -> Vec<Vec<[f64; 3]>> {
    let v = cell.vertex_coords();
    match cell {
        ReferenceCell::Triangle => {
            let (m01, m12, m02) = (midpoint(&v[0], &v[1]), midpoint(&v[1], &v[2]), midpoint(&v[0], &v[2]));
            vec![
                vec![v[0], m01, m02],
                vec![m01, v[1], m12],
                vec![m02, m12, v[2]],
                vec![m01, m12, m02],
            ]
        }
        ReferenceCell::Tetrahedron => {
            let m = |i: usize, j: usize| midpoint(&v[i], &v[j]);
            let (m01, m02, m03, m12, m13, m23) = (m(0, 1), m(0, 2), m(0, 3), m(1, 2), m(1, 3), m(2, 3));
            // Four corner tetrahedra, then the inner octahedron split along the diagonal m02-m13
            vec![
                vec![v[0], m01, m02, m03],
                vec![m01, v[1], m12, m13],
                vec![m02, m12, v[2], m23],
                vec![m03, m13, m23, v[3]],
                vec![m01, m02, m03, m13],
                vec![m01, m12, m02, m13],
                vec![m02, m03, m13, m23],
                vec![m02, m13, m12, m23],
            ]
        }
        ReferenceCell::Segment | ReferenceCell::Quadrilateral | ReferenceCell::Hexahedron => {
            // Tensor product cells are split into 2^d scaled copies of [-1, 1]^d
            let dim = cell.dimension();
            itertools::repeat_n(vec![-1.0, 0.0], dim)
                .multi_cartesian_product()
                .map(|offset| {
                    v.iter()
                        .map(|vertex| {
                            std::array::from_fn(|i| if i < dim { offset[i] + 0.5 * (vertex[i] + 1.0) } else { 0.0 })
                        })
                        .collect()
                })
                .collect()
        }
    }
}

fn reference_sampling_cells(cell: ReferenceCell, subsampling: bool) -> Vec<Vec<[f64; 3]>> {
    if subsampling {
        refine_reference_cell(cell)
    } else {
        vec![cell.vertex_coords().to_vec()]
    }
}

fn to_f64<T: ToPrimitive>(value: T) -> eyre::Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| eyre!("value cannot be represented as f64"))
}

fn scalar_attribute(name: impl Into<String>, data: Vec<f64>) -> Attribute {
    Attribute::DataArray(DataArray {
        name: name.into(),
        elem: ElementType::Scalars {
            num_comp: 1,
            lookup_table: None,
        },
        data: data.into(),
    })
}

/// Builds a VTK data set by sampling a function in the vertices of every element of a grid.
///
/// A function with a single component is written as one point attribute named after the function.
/// Otherwise every component $(i, j)$ becomes its own attribute `{name}_{i}_{j}`. The index of the
/// element every cell belongs to is written as the cell attribute `element_index`.
pub struct FunctionDataSetBuilder<'a, G> {
    grid: &'a G,
    subsampling: bool,
    parameter: Parameter,
    // Only used for exporting directly to file
    title: Option<String>,
}

impl<'a, G> FunctionDataSetBuilder<'a, G> {
    pub fn from_grid(grid: &'a G) -> Self {
        Self {
            grid,
            subsampling: false,
            parameter: Parameter::empty(),
            title: None,
        }
    }

    /// Refine every element once before sampling.
    pub fn with_subsampling(self, subsampling: bool) -> Self {
        Self { subsampling, ..self }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    /// The parameter the function is evaluated with.
    pub fn with_parameter(self, parameter: Parameter) -> Self {
        Self { parameter, ..self }
    }

    pub fn try_build<T, F, const D: usize, const R: usize, const C: usize>(&self, function: &F) -> eyre::Result<DataSet>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D>,
        F: SmoothFunction<T, D, R, C> + ?Sized,
    {
        self.build_from_samples(function.name(), R, C, |element, xi| {
            let value = LocalizedSmoothFunction::new(function, element).evaluate(xi, &self.parameter)?;
            Ok(value.transpose().iter().copied().collect())
        })
    }

    /// Builds the data set of a function whose shape is only known at runtime.
    ///
    /// Fails if the domain dimension of the function is not the dimension of the grid.
    pub fn try_build_dynamic<T, const D: usize>(&self, function: &DynamicFunction<T>) -> eyre::Result<DataSet>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D>,
    {
        let shape = function.shape();
        if shape.domain_dim != D {
            return Err(eyre!(
                "cannot sample '{}' with shape {shape} on a {D}-dimensional grid",
                function.name()
            ));
        }
        self.build_from_samples(function.name(), shape.range_dim, shape.range_cols, |element, xi| {
            let x = element.map_reference_coords(xi);
            let value = function.evaluate(x.coords.as_slice(), &self.parameter)?;
            Ok(value.iter().copied().collect())
        })
    }

    /// Samples `sample` in the (refined) reference vertices of every element.
    ///
    /// `sample` returns the $r \times r_C$ value in row-major order.
    fn build_from_samples<T, const D: usize>(
        &self,
        name: &str,
        range_dim: usize,
        range_cols: usize,
        mut sample: impl FnMut(&G::Element, &Point<T, D>) -> Result<Vec<T>, FunctionError>,
    ) -> eyre::Result<DataSet>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D>,
    {
        if D > 3 {
            return Err(eyre!("unable to visualize functions on {D}-dimensional domains"));
        }

        let mut points = Vec::new();
        // Legacy layout: N, i_1, i_2, ... i_N for every cell
        let mut vertices: Vec<u32> = Vec::new();
        let mut cell_types = Vec::new();
        let mut element_indices = Vec::new();
        let mut components = vec![Vec::new(); range_dim * range_cols];
        let mut num_points = 0u32;

        for element_index in 0..self.grid.num_elements() {
            let element = self
                .grid
                .element(element_index)
                .ok_or_else(|| eyre!("grid has no element with index {element_index}"))?;
            let reference_cell = element.reference_cell();

            for corners in reference_sampling_cells(reference_cell, self.subsampling) {
                vertices.push(corners.len().try_into()?);
                for corner in &corners {
                    let xi = padded_to_point::<T, D>(corner);
                    let x = element.map_reference_coords(&xi);
                    let value = sample(&element, &xi)
                        .wrap_err_with(|| format!("failed to evaluate '{name}' in element {element_index}"))?;

                    for k in 0..3 {
                        points.push(if k < D { to_f64(x[k])? } else { 0.0 });
                    }
                    for (component, entry) in components.iter_mut().zip(value) {
                        component.push(to_f64(entry)?);
                    }
                    vertices.push(num_points);
                    num_points += 1;
                }
                cell_types.push(vtk_cell_type(reference_cell));
                element_indices.push(element_index as u64);
            }
        }

        let point_attributes = if components.len() == 1 {
            components
                .into_iter()
                .map(|data| scalar_attribute(name, data))
                .collect()
        } else {
            components
                .into_iter()
                .enumerate()
                .map(|(index, data)| {
                    scalar_attribute(format!("{name}_{}_{}", index / range_cols, index % range_cols), data)
                })
                .collect()
        };
        let element_index_attribute = Attribute::DataArray(DataArray {
            name: "element_index".to_string(),
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data: element_indices.into(),
        });

        let piece = UnstructuredGridPiece {
            points: points.into(),
            cells: Cells {
                cell_verts: VertexNumbers::Legacy {
                    num_cells: cell_types.len().try_into()?,
                    vertices,
                },
                types: cell_types,
            },
            data: Attributes {
                point: point_attributes,
                cell: vec![element_index_attribute],
            },
        };

        Ok(DataSet::UnstructuredGrid {
            meta: None,
            pieces: vec![Piece::Inline(Box::new(piece))],
        })
    }

    /// Builds the data set and writes it to `path`.
    ///
    /// The extension `.vtk` is appended if `path` has none, and missing parent directories are
    /// created.
    pub fn try_export<T, F, const D: usize, const R: usize, const C: usize>(
        &self,
        function: &F,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> eyre::Result<()>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D>,
        F: SmoothFunction<T, D, R, C> + ?Sized,
    {
        let dataset = self.try_build(function)?;
        self.write(dataset, function.name(), self.grid.num_elements(), path.as_ref(), format)
    }

    /// Same as [`try_export`](Self::try_export) for a function whose shape is only known at runtime.
    pub fn try_export_dynamic<T, const D: usize>(
        &self,
        function: &DynamicFunction<T>,
        path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> eyre::Result<()>
    where
        T: Real + ToPrimitive,
        G: GridView<T, D>,
    {
        let dataset = self.try_build_dynamic(function)?;
        self.write(dataset, function.name(), self.grid.num_elements(), path.as_ref(), format)
    }

    fn write(
        &self,
        dataset: DataSet,
        name: &str,
        num_elements: usize,
        path: &Path,
        format: OutputFormat,
    ) -> eyre::Result<()> {
        let mut filepath = path.to_path_buf();
        if filepath.extension().is_none() {
            filepath.set_extension("vtk");
        }
        if let Some(parent) = filepath.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .wrap_err_with(|| format!("failed to create directory {}", parent.display()))?;
            }
        }

        let fallback_title = filepath
            .file_stem()
            .map(|os_str| os_str.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        let vtk = Vtk {
            version: Version { major: 4, minor: 1 },
            title: self.title.clone().unwrap_or(fallback_title),
            byte_order: ByteOrder::BigEndian,
            data: dataset,
            file_path: None,
        };
        let result = match format {
            OutputFormat::Binary => vtk.export(&filepath),
            OutputFormat::Ascii => vtk.export_ascii(&filepath),
        };
        result.map_err(|err| eyre!("failed to write {}: {}", filepath.display(), err))?;

        info!("Wrote '{}' on {} elements to {}", name, num_elements, filepath.display());
        Ok(())
    }
}
