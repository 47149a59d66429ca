//! Errors produced by smooth functions and their collaborators.
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A capability that a smooth function may or may not provide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Evaluate,
    Jacobian,
    Derivative,
}

impl Capability {
    /// The name of the method that provides this capability.
    pub fn method_name(&self) -> &'static str {
        match self {
            Capability::Evaluate => "evaluate",
            Capability::Jacobian => "jacobian",
            Capability::Derivative => "derivative",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Evaluate => write!(f, "evaluations"),
            Capability::Jacobian => write!(f, "jacobians"),
            Capability::Derivative => write!(f, "derivatives"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FunctionError {
    /// The function does not provide the requested capability.
    NotImplemented { function: String, capability: Capability },
    /// A component index or a combination of shapes is inconsistent with the declared shape.
    ShapeMismatch { context: String, details: String },
    /// The supplied parameter does not match the declared parameter type.
    ParameterMismatch { details: String },
    /// A configuration entry is missing or malformed.
    InvalidConfiguration { key: String, details: String },
    /// A function identifier that no provider knows about.
    UnknownFunction { id: String, available: Vec<String> },
    /// The inverse of an element's reference-to-global map could not be computed.
    GeometryMapping { details: String },
}

impl FunctionError {
    pub fn not_implemented(function: impl Into<String>, capability: Capability) -> Self {
        Self::NotImplemented {
            function: function.into(),
            capability,
        }
    }

    pub fn shape_mismatch(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            details: details.into(),
        }
    }

    pub fn parameter_mismatch(details: impl Into<String>) -> Self {
        Self::ParameterMismatch { details: details.into() }
    }

    pub fn invalid_configuration(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            key: key.into(),
            details: details.into(),
        }
    }

    /// Returns `true` if the error signals a missing capability rather than a failure.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    pub fn is_parameter_mismatch(&self) -> bool {
        matches!(self, Self::ParameterMismatch { .. })
    }
}

impl Display for FunctionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented { function, capability } => write!(
                f,
                "function '{function}' does not provide {capability}, \
                 implement `{}` to provide them",
                capability.method_name()
            ),
            Self::ShapeMismatch { context, details } => write!(f, "shapes do not match {context}: {details}"),
            Self::ParameterMismatch { details } => write!(f, "parameter mismatch: {details}"),
            Self::InvalidConfiguration { key, details } => {
                write!(f, "invalid configuration for key '{key}': {details}")
            }
            Self::UnknownFunction { id, available } => write!(
                f,
                "unknown function '{id}' requested, available functions are: {}",
                available.join(", ")
            ),
            Self::GeometryMapping { details } => write!(f, "failed to map to reference coordinates: {details}"),
        }
    }
}

impl Error for FunctionError {}
