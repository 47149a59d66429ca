use crate::output_path;
use fenris_functions::grid::procedural::{create_unit_box_uniform_hex_mesh_3d, create_unit_square_uniform_quad_mesh_2d};
use fenris_functions::dynamic::DynamicFunction;
use fenris_functions::grid::GridView;
use fenris_functions::io::vtk::{FunctionDataSetBuilder, OutputFormat};
use fenris_functions::lambda::SmoothLambdaFunction;
use fenris_functions::localizable::AsLocalizable;
use fenris_functions::{Parameter, ParameterType};
use nalgebra::{Matrix1, Vector2};
use std::fs;
use vtkio::model::{Attribute, DataSet, Piece, VertexNumbers};

fn pressure() -> SmoothLambdaFunction<f64, 2, 1, 1> {
    SmoothLambdaFunction::<f64, 2, 1, 1>::new(2)
        .with_evaluate(|x, _| Matrix1::new(x[0] * x[1]))
        .with_name("pressure")
}

fn velocity() -> SmoothLambdaFunction<f64, 2, 2, 1> {
    SmoothLambdaFunction::<f64, 2, 2, 1>::new(1)
        .with_evaluate(|x, _| Vector2::new(x[1], -x[0]))
        .with_name("velocity")
}

fn unstructured_piece(dataset: &DataSet) -> &vtkio::model::UnstructuredGridPiece {
    match dataset {
        DataSet::UnstructuredGrid { pieces, .. } => match &pieces[0] {
            Piece::Inline(piece) => &**piece,
            _ => panic!("expected inline piece"),
        },
        _ => panic!("expected unstructured grid"),
    }
}

fn attribute_names(attributes: &[Attribute]) -> Vec<String> {
    attributes
        .iter()
        .map(|attribute| match attribute {
            Attribute::DataArray(array) => array.name.clone(),
            Attribute::Field { name, .. } => name.clone(),
        })
        .collect()
}

#[test]
fn data_set_has_disconnected_points_per_element() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(3);
    let dataset = FunctionDataSetBuilder::from_grid(&mesh).try_build(&pressure()).unwrap();
    let piece = unstructured_piece(&dataset);

    assert_eq!(piece.cells.types.len(), 9);
    assert_eq!(piece.points.len(), 9 * 4 * 3);
    match &piece.cells.cell_verts {
        VertexNumbers::Legacy { num_cells, vertices } => {
            assert_eq!(*num_cells, 9);
            assert_eq!(vertices.len(), 9 * 5);
        }
        _ => panic!("expected legacy vertex numbers"),
    }
    assert_eq!(attribute_names(&piece.data.point), vec!["pressure"]);
    assert_eq!(attribute_names(&piece.data.cell), vec!["element_index"]);
}

#[test]
fn subsampling_refines_every_element() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(2);
    let dataset = FunctionDataSetBuilder::from_grid(&mesh)
        .with_subsampling(true)
        .try_build(&velocity())
        .unwrap();
    let piece = unstructured_piece(&dataset);
    assert_eq!(piece.cells.types.len(), 4 * 4);
    assert_eq!(attribute_names(&piece.data.point), vec!["velocity_0_0", "velocity_1_0"]);

    let triangles = mesh.split_into_triangles();
    let dataset = FunctionDataSetBuilder::from_grid(&triangles)
        .with_subsampling(true)
        .try_build(&pressure())
        .unwrap();
    assert_eq!(unstructured_piece(&dataset).cells.types.len(), triangles.num_elements() * 4);

    let hexes = create_unit_box_uniform_hex_mesh_3d::<f64>(1);
    let constant = SmoothLambdaFunction::<f64, 3, 1, 1>::new(0).with_evaluate(|_, _| Matrix1::new(1.0));
    let dataset = FunctionDataSetBuilder::from_grid(&hexes)
        .with_subsampling(true)
        .try_build(&constant)
        .unwrap();
    assert_eq!(unstructured_piece(&dataset).cells.types.len(), 8);
}

#[test]
fn build_fails_for_functions_without_values() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(1);
    let no_values = SmoothLambdaFunction::<f64, 2, 1, 1>::new(0).with_name("no_values");
    let err = FunctionDataSetBuilder::from_grid(&mesh)
        .try_build(&no_values)
        .unwrap_err();
    assert!(format!("{err:#}").contains("no_values"));
}

#[test]
fn parametric_functions_use_the_builder_parameter() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(1);
    let shifted = SmoothLambdaFunction::<f64, 2, 1, 1>::new(1)
        .with_evaluate(|x, param| Matrix1::new(x[0] + param.scalar("_t").unwrap()))
        .with_parameter_type(ParameterType::empty().with("_t", 1));

    assert!(FunctionDataSetBuilder::from_grid(&mesh).try_build(&shifted).is_err());
    let dataset = FunctionDataSetBuilder::from_grid(&mesh)
        .with_parameter(Parameter::empty().with("_t", [2.0]))
        .try_build(&shifted)
        .unwrap();
    assert_eq!(unstructured_piece(&dataset).cells.types.len(), 1);
}

#[test]
fn export_writes_ascii_file_with_attribute_names() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(2);
    let path = output_path("export_writes_ascii_file_with_attribute_names", "velocity");
    velocity().visualize(&mesh, &path, false, OutputFormat::Ascii).unwrap();

    let written = path.with_extension("vtk");
    let contents = fs::read_to_string(&written).unwrap();
    assert!(contents.contains("velocity_0_0"));
    assert!(contents.contains("velocity_1_0"));
    assert!(contents.contains("element_index"));
}

#[test]
fn export_binary_file_with_title() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(2);
    let path = output_path("export_binary_file_with_title", "pressure.vtk");
    let f = pressure();
    FunctionDataSetBuilder::from_grid(&mesh)
        .with_title("pressure field")
        .try_export(&f, &path, OutputFormat::Binary)
        .unwrap();
    assert!(path.exists());

    let localizable_path = output_path("export_binary_file_with_title", "pressure_subsampled.vtk");
    f.as_localizable()
        .visualize(&mesh, &localizable_path, true, OutputFormat::default())
        .unwrap();
    assert!(localizable_path.exists());
}

#[test]
fn dynamic_functions_are_sampled_like_static_ones() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(2);
    let builder = FunctionDataSetBuilder::from_grid(&mesh).with_subsampling(true);
    let expected = builder.try_build(&velocity()).unwrap();
    let dynamic = builder.try_build_dynamic(&DynamicFunction::new(velocity())).unwrap();

    let (expected, dynamic) = (unstructured_piece(&expected), unstructured_piece(&dynamic));
    assert_eq!(dynamic.cells.types.len(), 16);
    assert_eq!(dynamic.points, expected.points);
    assert_eq!(dynamic.data, expected.data);
    assert_eq!(attribute_names(&dynamic.data.point), vec!["velocity_0_0", "velocity_1_0"]);
}

#[test]
fn dynamic_functions_must_match_the_grid_dimension() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(1);
    let volumetric = DynamicFunction::new(
        SmoothLambdaFunction::<f64, 3, 1, 1>::new(0)
            .with_evaluate(|_, _| Matrix1::new(1.0))
            .with_name("volumetric"),
    );
    let err = FunctionDataSetBuilder::from_grid(&mesh)
        .try_build_dynamic(&volumetric)
        .unwrap_err();
    assert!(format!("{err:#}").contains("volumetric"));
}

#[test]
fn dynamic_visualize_writes_combined_functions() {
    let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(2);
    let path = output_path("dynamic_visualize_writes_combined_functions", "scaled");
    let scaled = (&DynamicFunction::new(pressure()) * &DynamicFunction::new(velocity()))
        .unwrap()
        .with_name("scaled");
    scaled.visualize(&mesh, &path, false, OutputFormat::Ascii).unwrap();

    let contents = fs::read_to_string(path.with_extension("vtk")).unwrap();
    assert!(contents.contains("scaled_0_0"));
    assert!(contents.contains("scaled_1_0"));
    assert!(contents.contains("element_index"));
}
