//! Runtime parameters of parametric functions.
//!
//! A [`ParameterType`] declares the names and sizes of the values a function needs in addition to
//! the evaluation point, and a [`Parameter`] supplies these values at every call.
use crate::error::FunctionError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Names and sizes of the values a parametric function expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterType {
    sizes: BTreeMap<String, usize>,
}

static EMPTY_PARAMETER_TYPE: ParameterType = ParameterType::empty();

impl ParameterType {
    pub const fn empty() -> Self {
        Self { sizes: BTreeMap::new() }
    }

    /// Declares the parameter `key` with `size` values.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn with(mut self, key: impl Into<String>, size: usize) -> Self {
        self.insert(key, size);
        self
    }

    /// Declares the parameter `key` with `size` values, returning the previously declared size.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn insert(&mut self, key: impl Into<String>, size: usize) -> Option<usize> {
        assert!(size > 0, "Parameters must have at least one value");
        self.sizes.insert(key.into(), size)
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.sizes.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sizes.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.sizes.iter().map(|(key, size)| (key.as_str(), *size))
    }

    /// Union of two parameter types.
    ///
    /// Fails if the same name is declared with different sizes.
    pub fn merged(&self, other: &ParameterType) -> Result<ParameterType, FunctionError> {
        let mut merged = self.clone();
        for (key, size) in other.iter() {
            match merged.get(key) {
                Some(existing) if existing != size => {
                    return Err(FunctionError::parameter_mismatch(format!(
                        "parameter '{key}' is declared with {existing} and with {size} values"
                    )));
                }
                _ => {
                    merged.insert(key, size);
                }
            }
        }
        Ok(merged)
    }
}

impl Display for ParameterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, size)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {size}")?;
        }
        write!(f, "}}")
    }
}

/// Named values supplied to a parametric function at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameter {
    values: BTreeMap<String, Vec<f64>>,
}

impl Parameter {
    pub const fn empty() -> Self {
        Self { values: BTreeMap::new() }
    }

    pub fn with(mut self, key: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        self.set(key, values);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, values: impl Into<Vec<f64>>) -> Option<Vec<f64>> {
        self.values.insert(key.into(), values.into())
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Returns the first value of the parameter `key`.
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|values| values.first().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The parameter type this parameter satisfies exactly.
    pub fn parameter_type(&self) -> ParameterType {
        let mut parameter_type = ParameterType::empty();
        for (key, values) in self.values.iter().filter(|(_, values)| !values.is_empty()) {
            parameter_type.insert(key.clone(), values.len());
        }
        parameter_type
    }

    /// Restricts this parameter to the entries declared in `parameter_type`.
    ///
    /// Every declared name must be present with the declared number of values. Entries that are not
    /// declared are dropped, since combined functions receive the parameters of all their operands.
    pub fn check_against(&self, parameter_type: &ParameterType) -> Result<Parameter, FunctionError> {
        let mut checked = Parameter::empty();
        for (key, size) in parameter_type.iter() {
            let values = self.get(key).ok_or_else(|| {
                FunctionError::parameter_mismatch(format!(
                    "missing parameter '{key}' ({size} values expected by {parameter_type})"
                ))
            })?;
            if values.len() != size {
                return Err(FunctionError::parameter_mismatch(format!(
                    "parameter '{key}' has {} values, but {size} are expected",
                    values.len()
                )));
            }
            checked.set(key, values);
        }
        Ok(checked)
    }
}

/// Functions whose values depend on a runtime [`Parameter`].
pub trait Parametric {
    /// The declared parameter type. Empty by default.
    fn parameter_type(&self) -> &ParameterType {
        &EMPTY_PARAMETER_TYPE
    }

    fn is_parametric(&self) -> bool {
        !self.parameter_type().is_empty()
    }

    /// Validates `param` against the declared parameter type.
    ///
    /// Returns the parameter restricted to the declared entries.
    fn parse_and_check(&self, param: &Parameter) -> Result<Parameter, FunctionError> {
        param.check_against(self.parameter_type())
    }
}

impl<P> Parametric for &P
where
    P: Parametric + ?Sized,
{
    fn parameter_type(&self) -> &ParameterType {
        P::parameter_type(self)
    }

    fn parse_and_check(&self, param: &Parameter) -> Result<Parameter, FunctionError> {
        P::parse_and_check(self, param)
    }
}

impl<P> Parametric for Box<P>
where
    P: Parametric + ?Sized,
{
    fn parameter_type(&self) -> &ParameterType {
        P::parameter_type(self)
    }

    fn parse_and_check(&self, param: &Parameter) -> Result<Parameter, FunctionError> {
        P::parse_and_check(self, param)
    }
}

impl<P> Parametric for Arc<P>
where
    P: Parametric + ?Sized,
{
    fn parameter_type(&self) -> &ParameterType {
        P::parameter_type(self)
    }

    fn parse_and_check(&self, param: &Parameter) -> Result<Parameter, FunctionError> {
        P::parse_and_check(self, param)
    }
}
