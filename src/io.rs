//! Output of smooth functions to file formats understood by visualization tools.
pub mod vtk;
