//! Creating functions from string identifiers and configurations.
use crate::checkerboard::CheckerboardFunction;
use crate::config::Configuration;
use crate::constant::ConstantFunction;
use crate::error::FunctionError;
use crate::function::SmoothFunction;
use crate::Real;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// A function that can be constructed from a [`Configuration`].
pub trait ConfigurableFunction: Sized {
    /// A configuration from which [`from_config`](Self::from_config) succeeds.
    fn default_config() -> Configuration;

    fn from_config(config: &Configuration) -> Result<Self, FunctionError>;
}

pub type BoxedSmoothFunction<T, const D: usize, const R: usize, const C: usize> =
    Box<dyn SmoothFunction<T, D, R, C> + Send + Sync>;

type Factory<T, const D: usize, const R: usize, const C: usize> =
    fn(&Configuration) -> Result<BoxedSmoothFunction<T, D, R, C>, FunctionError>;

struct Entry<T, const D: usize, const R: usize, const C: usize> {
    id: &'static str,
    default_config: fn() -> Configuration,
    create: Factory<T, D, R, C>,
}

fn create_boxed<T, F, const D: usize, const R: usize, const C: usize>(
    config: &Configuration,
) -> Result<BoxedSmoothFunction<T, D, R, C>, FunctionError>
where
    T: Real,
    F: ConfigurableFunction + SmoothFunction<T, D, R, C> + Send + Sync + 'static,
{
    Ok(Box::new(F::from_config(config)?))
}

/// Creates functions by their static id.
///
/// The default provider knows [`CheckerboardFunction`] and [`ConstantFunction`], further
/// configurable functions can be added with [`register`](Self::register).
pub struct FunctionsProvider<T, const D: usize, const R: usize, const C: usize> {
    entries: Vec<Entry<T, D, R, C>>,
}

impl<T, const D: usize, const R: usize, const C: usize> Debug for FunctionsProvider<T, D, R, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionsProvider")
            .field("available", &self.entries.iter().map(|entry| entry.id).collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Real, const D: usize, const R: usize, const C: usize> Default for FunctionsProvider<T, D, R, C> {
    fn default() -> Self {
        let mut provider = Self::empty();
        provider.register::<CheckerboardFunction<T, D, R, C>>();
        provider.register::<ConstantFunction<T, D, R, C>>();
        provider
    }
}

impl<T: Real, const D: usize, const R: usize, const C: usize> FunctionsProvider<T, D, R, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that knows no functions.
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Makes `F` available under its static id, replacing a function previously registered
    /// under the same id.
    pub fn register<F>(&mut self) -> &mut Self
    where
        F: ConfigurableFunction + SmoothFunction<T, D, R, C> + Send + Sync + 'static,
    {
        let entry = Entry {
            id: F::static_id(),
            default_config: F::default_config,
            create: create_boxed::<T, F, D, R, C>,
        };
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// The ids of all known functions, in registration order.
    pub fn available(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    fn entry(&self, id: &str) -> Result<&Entry<T, D, R, C>, FunctionError> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| FunctionError::UnknownFunction {
                id: id.to_string(),
                available: self.available().into_iter().map(String::from).collect(),
            })
    }

    pub fn default_config(&self, id: &str) -> Result<Configuration, FunctionError> {
        Ok((self.entry(id)?.default_config)())
    }

    /// Creates the function `id`.
    ///
    /// Keys missing from `config` are taken from the function's default configuration.
    pub fn create(&self, id: &str, config: &Configuration) -> Result<BoxedSmoothFunction<T, D, R, C>, FunctionError> {
        let entry = self.entry(id)?;
        let config = (entry.default_config)().merged(config);
        (entry.create)(&config)
    }

    pub fn create_default(&self, id: &str) -> Result<BoxedSmoothFunction<T, D, R, C>, FunctionError> {
        let entry = self.entry(id)?;
        (entry.create)(&(entry.default_config)())
    }
}
