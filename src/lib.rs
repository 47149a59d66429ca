//! Smooth functions for finite element computations.
//!
//! A [`SmoothFunction`] is defined in global coordinates and may be evaluated, differentiated to
//! arbitrary order and queried component by component. Functions can be bound to single elements
//! through the [`localizable`] module, combined algebraically through the [`combined`] module and
//! handled with runtime shapes through the [`dynamic`] module.
use nalgebra::RealField;

pub mod checkerboard;
pub mod combined;
pub mod config;
pub mod constant;
pub mod dynamic;
pub mod element;
pub mod error;
pub mod function;
pub mod grid;
pub mod io;
pub mod lambda;
pub mod localizable;
pub mod parameter;
pub mod provider;
pub mod range;
pub mod util;

#[cfg(feature = "proptest")]
pub mod proptest;

pub extern crate nalgebra;
pub extern crate vtkio;

pub use error::FunctionError;
pub use function::SmoothFunction;
pub use parameter::{Parameter, ParameterType, Parametric};
pub use range::{DerivativeRange, Shape};

/// Real scalar type used throughout the crate.
///
/// A trait alias for the bounds every function, element and grid in this crate needs.
pub trait Real: RealField + Copy {}

impl<T> Real for T where T: RealField + Copy {}
