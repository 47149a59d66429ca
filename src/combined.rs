//! Algebraic combinations of smooth functions.
//!
//! Combined functions own their operands, which may be values, references, `Box`es or `Arc`s of
//! smooth functions. Shape compatibility is enforced by the trait bounds of the constructors, so an
//! incompatible combination does not compile. For combinations whose shapes are only known at
//! runtime, see [`DynamicFunction`](crate::dynamic::DynamicFunction).
//!
//! Every evaluation evaluates the operands at the same point with the same parameter. The parameter
//! type of a combination is the union of the parameter types of its operands.
use crate::error::FunctionError;
use crate::function::{derivative_or_jacobian, evaluate_partial, SmoothFunction};
use crate::parameter::{Parameter, ParameterType, Parametric};
use crate::range::DerivativeRange;
use crate::util::{add_unit, checked_difference, multi_binomial, sub_multi_indices};
use crate::Real;
use nalgebra::{Matrix1, Point, SMatrix};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

/// The algebraic operation of a combined function.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Combination {
    Sum,
    Difference,
    Product,
    Divergence,
}

impl Combination {
    pub fn type_name(&self) -> &'static str {
        match self {
            Combination::Sum => "fenris.functions.combined.sum",
            Combination::Difference => "fenris.functions.combined.difference",
            Combination::Product => "fenris.functions.combined.product",
            Combination::Divergence => "fenris.functions.combined.divergence",
        }
    }

    pub(crate) fn combined_name(&self, left: &str, right: &str) -> String {
        match self {
            Combination::Sum => format!("({left} + {right})"),
            Combination::Difference => format!("({left} - {right})"),
            Combination::Product => format!("({left} * {right})"),
            Combination::Divergence => format!("div({left})"),
        }
    }
}

impl Display for Combination {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Combination::Sum => write!(f, "sum"),
            Combination::Difference => write!(f, "difference"),
            Combination::Product => write!(f, "product"),
            Combination::Divergence => write!(f, "divergence"),
        }
    }
}

/// Marker types selecting the operation of a [`CombinedFunction`].
pub trait CombinationOperator {
    const COMBINATION: Combination;
}

#[derive(Debug, Copy, Clone)]
pub struct Sum;

#[derive(Debug, Copy, Clone)]
pub struct Difference;

/// Matrix product of an $r \times K$ and a $K \times r_C$ valued function.
#[derive(Debug, Copy, Clone)]
pub struct Product<const K: usize>;

/// Product of a scalar function with a function of any shape.
#[derive(Debug, Copy, Clone)]
pub struct ScalarProduct;

/// Product of a function of any shape with a scalar function.
#[derive(Debug, Copy, Clone)]
pub struct FunctionScalarProduct;

impl CombinationOperator for Sum {
    const COMBINATION: Combination = Combination::Sum;
}

impl CombinationOperator for Difference {
    const COMBINATION: Combination = Combination::Difference;
}

impl<const K: usize> CombinationOperator for Product<K> {
    const COMBINATION: Combination = Combination::Product;
}

impl CombinationOperator for ScalarProduct {
    const COMBINATION: Combination = Combination::Product;
}

impl CombinationOperator for FunctionScalarProduct {
    const COMBINATION: Combination = Combination::Product;
}

/// A function combining two operands with the operation `Op`.
#[derive(Debug, Clone)]
pub struct CombinedFunction<L, Rt, Op> {
    left: L,
    right: Rt,
    parameter_type: ParameterType,
    name: String,
    marker: PhantomData<Op>,
}

pub type SumFunction<L, Rt> = CombinedFunction<L, Rt, Sum>;
pub type DifferenceFunction<L, Rt> = CombinedFunction<L, Rt, Difference>;
pub type ProductFunction<L, Rt, const K: usize> = CombinedFunction<L, Rt, Product<K>>;
pub type ScalarProductFunction<S, F> = CombinedFunction<S, F, ScalarProduct>;
pub type FunctionScalarProductFunction<F, S> = CombinedFunction<F, S, FunctionScalarProduct>;

impl<L, Rt, Op> CombinedFunction<L, Rt, Op>
where
    Op: CombinationOperator,
{
    fn combine(
        left: L,
        right: Rt,
        left_name: &str,
        right_name: &str,
        left_type: &ParameterType,
        right_type: &ParameterType,
    ) -> Result<Self, FunctionError> {
        let parameter_type = left_type.merged(right_type)?;
        Ok(Self {
            name: Op::COMBINATION.combined_name(left_name, right_name),
            left,
            right,
            parameter_type,
            marker: PhantomData,
        })
    }

    pub fn combination(&self) -> Combination {
        Op::COMBINATION
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &Rt {
        &self.right
    }

    pub fn into_operands(self) -> (L, Rt) {
        (self.left, self.right)
    }

    /// Replaces the generated name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<L, Rt> SumFunction<L, Rt> {
    /// # Errors
    ///
    /// Fails if the operands declare the same parameter with different sizes.
    pub fn new<T, const D: usize, const R: usize, const C: usize>(left: L, right: Rt) -> Result<Self, FunctionError>
    where
        T: Real,
        L: SmoothFunction<T, D, R, C>,
        Rt: SmoothFunction<T, D, R, C>,
    {
        let (left_name, right_name) = (left.name().to_string(), right.name().to_string());
        let (left_type, right_type) = (left.parameter_type().clone(), right.parameter_type().clone());
        Self::combine(left, right, &left_name, &right_name, &left_type, &right_type)
    }
}

impl<L, Rt> DifferenceFunction<L, Rt> {
    /// # Errors
    ///
    /// Fails if the operands declare the same parameter with different sizes.
    pub fn new<T, const D: usize, const R: usize, const C: usize>(left: L, right: Rt) -> Result<Self, FunctionError>
    where
        T: Real,
        L: SmoothFunction<T, D, R, C>,
        Rt: SmoothFunction<T, D, R, C>,
    {
        let (left_name, right_name) = (left.name().to_string(), right.name().to_string());
        let (left_type, right_type) = (left.parameter_type().clone(), right.parameter_type().clone());
        Self::combine(left, right, &left_name, &right_name, &left_type, &right_type)
    }
}

impl<L, Rt, const K: usize> ProductFunction<L, Rt, K> {
    /// # Errors
    ///
    /// Fails if the operands declare the same parameter with different sizes.
    pub fn new<T, const D: usize, const R: usize, const C: usize>(left: L, right: Rt) -> Result<Self, FunctionError>
    where
        T: Real,
        L: SmoothFunction<T, D, R, K>,
        Rt: SmoothFunction<T, D, K, C>,
    {
        let (left_name, right_name) = (left.name().to_string(), right.name().to_string());
        let (left_type, right_type) = (left.parameter_type().clone(), right.parameter_type().clone());
        Self::combine(left, right, &left_name, &right_name, &left_type, &right_type)
    }
}

impl<S, F> ScalarProductFunction<S, F> {
    /// # Errors
    ///
    /// Fails if the operands declare the same parameter with different sizes.
    pub fn new<T, const D: usize, const R: usize, const C: usize>(scalar: S, function: F) -> Result<Self, FunctionError>
    where
        T: Real,
        S: SmoothFunction<T, D, 1, 1>,
        F: SmoothFunction<T, D, R, C>,
    {
        let (left_name, right_name) = (scalar.name().to_string(), function.name().to_string());
        let (left_type, right_type) = (scalar.parameter_type().clone(), function.parameter_type().clone());
        Self::combine(scalar, function, &left_name, &right_name, &left_type, &right_type)
    }
}

impl<F, S> FunctionScalarProductFunction<F, S> {
    /// # Errors
    ///
    /// Fails if the operands declare the same parameter with different sizes.
    pub fn new<T, const D: usize, const R: usize, const C: usize>(function: F, scalar: S) -> Result<Self, FunctionError>
    where
        T: Real,
        F: SmoothFunction<T, D, R, C>,
        S: SmoothFunction<T, D, 1, 1>,
    {
        let (left_name, right_name) = (function.name().to_string(), scalar.name().to_string());
        let (left_type, right_type) = (function.parameter_type().clone(), scalar.parameter_type().clone());
        Self::combine(function, scalar, &left_name, &right_name, &left_type, &right_type)
    }
}

impl<L, Rt, Op> Parametric for CombinedFunction<L, Rt, Op> {
    fn parameter_type(&self) -> &ParameterType {
        &self.parameter_type
    }
}

impl<T, L, Rt, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C> for SumFunction<L, Rt>
where
    T: Real,
    L: SmoothFunction<T, D, R, C>,
    Rt: SmoothFunction<T, D, R, C>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.order(&param)?.max(self.right.order(&param)?))
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.evaluate(x, &param)? + self.right.evaluate(x, &param)?)
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.jacobian(x, &param)? + self.right.jacobian(x, &param)?)
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let left = derivative_or_jacobian(&self.left, alpha, x, &param)?;
        let right = derivative_or_jacobian(&self.right, alpha, x, &param)?;
        Ok(left + right)
    }

    fn type_name(&self) -> &str {
        Combination::Sum.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, L, Rt, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C> for DifferenceFunction<L, Rt>
where
    T: Real,
    L: SmoothFunction<T, D, R, C>,
    Rt: SmoothFunction<T, D, R, C>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.order(&param)?.max(self.right.order(&param)?))
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.evaluate(x, &param)? - self.right.evaluate(x, &param)?)
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.jacobian(x, &param)? - self.right.jacobian(x, &param)?)
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let left = derivative_or_jacobian(&self.left, alpha, x, &param)?;
        let right = derivative_or_jacobian(&self.right, alpha, x, &param)?;
        Ok(left - right)
    }

    fn type_name(&self) -> &str {
        Combination::Difference.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, L, Rt, const D: usize, const R: usize, const K: usize, const C: usize> SmoothFunction<T, D, R, C>
    for ProductFunction<L, Rt, K>
where
    T: Real,
    L: SmoothFunction<T, D, R, K>,
    Rt: SmoothFunction<T, D, K, C>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.order(&param)? + self.right.order(&param)?)
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.evaluate(x, &param)? * self.right.evaluate(x, &param)?)
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let (a, da) = (self.left.evaluate(x, &param)?, self.left.jacobian(x, &param)?);
        let (b, db) = (self.right.evaluate(x, &param)?, self.right.jacobian(x, &param)?);
        Ok(DerivativeRange::from_fn(|i, j, k| {
            (0..K).fold(T::zero(), |acc, l| {
                acc + da.get(i, l, k) * b[(l, j)] + a[(i, l)] * db.get(l, j, k)
            })
        }))
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        leibniz_derivative(
            alpha,
            |beta| evaluate_partial(&self.left, beta, x, &param),
            |beta| evaluate_partial(&self.right, beta, x, &param),
            |a, b| a * b,
        )
    }

    fn type_name(&self) -> &str {
        Combination::Product.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, S, F, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C> for ScalarProductFunction<S, F>
where
    T: Real,
    S: SmoothFunction<T, D, 1, 1>,
    F: SmoothFunction<T, D, R, C>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.order(&param)? + self.right.order(&param)?)
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let s = self.left.evaluate(x, &param)?[(0, 0)];
        Ok(self.right.evaluate(x, &param)? * s)
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let (s, ds) = (self.left.evaluate(x, &param)?[(0, 0)], self.left.jacobian(x, &param)?);
        let (f, df) = (self.right.evaluate(x, &param)?, self.right.jacobian(x, &param)?);
        Ok(DerivativeRange::from_fn(|i, j, k| {
            ds.get(0, 0, k) * f[(i, j)] + s * df.get(i, j, k)
        }))
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        leibniz_derivative(
            alpha,
            |beta| evaluate_partial(&self.left, beta, x, &param),
            |beta| evaluate_partial(&self.right, beta, x, &param),
            |s, f| *f * s[(0, 0)],
        )
    }

    fn type_name(&self) -> &str {
        Combination::Product.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T, F, S, const D: usize, const R: usize, const C: usize> SmoothFunction<T, D, R, C>
    for FunctionScalarProductFunction<F, S>
where
    T: Real,
    F: SmoothFunction<T, D, R, C>,
    S: SmoothFunction<T, D, 1, 1>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        let param = self.parse_and_check(param)?;
        Ok(self.left.order(&param)? + self.right.order(&param)?)
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<SMatrix<T, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let f = self.left.evaluate(x, &param)?;
        Ok(f * self.right.evaluate(x, &param)?[(0, 0)])
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        let (f, df) = (self.left.evaluate(x, &param)?, self.left.jacobian(x, &param)?);
        let (s, ds) = (self.right.evaluate(x, &param)?[(0, 0)], self.right.jacobian(x, &param)?);
        Ok(DerivativeRange::from_fn(|i, j, k| {
            df.get(i, j, k) * s + f[(i, j)] * ds.get(0, 0, k)
        }))
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, R, C>, FunctionError> {
        let param = self.parse_and_check(param)?;
        leibniz_derivative(
            alpha,
            |beta| evaluate_partial(&self.left, beta, x, &param),
            |beta| evaluate_partial(&self.right, beta, x, &param),
            |f, s| *f * s[(0, 0)],
        )
    }

    fn type_name(&self) -> &str {
        Combination::Product.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The gradient of $\partial^\alpha (a b)$ by the general Leibniz rule
/// $\partial^\gamma (a b) = \sum_{\beta \leq \gamma} \binom{\gamma}{\beta} \partial^\beta a \, \partial^{\gamma - \beta} b$,
/// where the product of values is given by `multiply`.
#[allow(clippy::type_complexity)]
fn leibniz_derivative<
    T,
    const D: usize,
    const R1: usize,
    const C1: usize,
    const R2: usize,
    const C2: usize,
    const R: usize,
    const C: usize,
>(
    alpha: &[usize; D],
    left_partial: impl Fn(&[usize; D]) -> Result<SMatrix<T, R1, C1>, FunctionError>,
    right_partial: impl Fn(&[usize; D]) -> Result<SMatrix<T, R2, C2>, FunctionError>,
    multiply: impl Fn(&SMatrix<T, R1, C1>, &SMatrix<T, R2, C2>) -> SMatrix<T, R, C>,
) -> Result<DerivativeRange<T, D, R, C>, FunctionError>
where
    T: Real,
{
    let mut left_cache = BTreeMap::new();
    let mut right_cache = BTreeMap::new();
    let mut axes = [SMatrix::<T, R, C>::zeros(); D];
    for (k, partial) in axes.iter_mut().enumerate() {
        let gamma = add_unit(alpha, k);
        for beta in sub_multi_indices(&gamma) {
            let Some(rest) = checked_difference(&gamma, &beta) else {
                continue;
            };
            let a = memoized(&mut left_cache, beta, &left_partial)?;
            let b = memoized(&mut right_cache, rest, &right_partial)?;
            *partial += multiply(&a, &b) * multi_binomial::<T, D>(&gamma, &beta);
        }
    }
    Ok(DerivativeRange::from_axes(&axes))
}

fn memoized<M: Copy, const D: usize>(
    cache: &mut BTreeMap<[usize; D], M>,
    index: [usize; D],
    compute: impl Fn(&[usize; D]) -> Result<M, FunctionError>,
) -> Result<M, FunctionError> {
    if let Some(value) = cache.get(&index) {
        return Ok(*value);
    }
    let value = compute(&index)?;
    cache.insert(index, value);
    Ok(value)
}

/// The divergence $\nabla \cdot f = \sum_i \partial_i f_i$ of a function $f: \mathbb{R}^d \to \mathbb{R}^d$.
///
/// Only functions whose range dimension equals the domain dimension have a divergence:
///
/// ```compile_fail
/// use fenris_functions::combined::DivergenceFunction;
/// use fenris_functions::constant::ConstantFunction;
/// use fenris_functions::nalgebra::Vector3;
///
/// let f = ConstantFunction::<f64, 2, 3, 1>::new(Vector3::zeros());
/// let div = DivergenceFunction::new(f);
/// ```
///
/// The jacobian and derivatives of the divergence require second and higher derivatives of the
/// operand.
#[derive(Debug, Clone)]
pub struct DivergenceFunction<F> {
    function: F,
    name: String,
}

impl<F> DivergenceFunction<F> {
    pub fn new<T, const D: usize>(function: F) -> Self
    where
        T: Real,
        F: SmoothFunction<T, D, D, 1>,
    {
        let name = Combination::Divergence.combined_name(function.name(), "");
        Self { function, name }
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    pub fn into_inner(self) -> F {
        self.function
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Parametric for DivergenceFunction<F>
where
    F: Parametric,
{
    fn parameter_type(&self) -> &ParameterType {
        self.function.parameter_type()
    }

    fn parse_and_check(&self, param: &Parameter) -> Result<Parameter, FunctionError> {
        self.function.parse_and_check(param)
    }
}

impl<F> DivergenceFunction<F> {
    /// The trace of the partial derivatives $\partial^{\alpha + e_k + e_i} f_i$, summed over $i$.
    fn divergence_partial<T, const D: usize>(
        &self,
        alpha: &[usize; D],
        axis: usize,
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<T, FunctionError>
    where
        T: Real,
        F: SmoothFunction<T, D, D, 1>,
    {
        let gamma = add_unit(alpha, axis);
        let mut trace = T::zero();
        for i in 0..D {
            trace += evaluate_partial(&self.function, &add_unit(&gamma, i), x, param)?[(i, 0)];
        }
        Ok(trace)
    }
}

impl<T, F, const D: usize> SmoothFunction<T, D, 1, 1> for DivergenceFunction<F>
where
    T: Real,
    F: SmoothFunction<T, D, D, 1>,
{
    fn order(&self, param: &Parameter) -> Result<usize, FunctionError> {
        Ok(self.function.order(param)?.saturating_sub(1))
    }

    fn evaluate(&self, x: &Point<T, D>, param: &Parameter) -> Result<Matrix1<T>, FunctionError> {
        let jacobian = self.function.jacobian(x, param)?;
        Ok(Matrix1::new(jacobian.column(0).trace()))
    }

    fn jacobian(&self, x: &Point<T, D>, param: &Parameter) -> Result<DerivativeRange<T, D, 1, 1>, FunctionError> {
        self.derivative(&[0; D], x, param)
    }

    fn derivative(
        &self,
        alpha: &[usize; D],
        x: &Point<T, D>,
        param: &Parameter,
    ) -> Result<DerivativeRange<T, D, 1, 1>, FunctionError> {
        let mut result = DerivativeRange::zeros();
        for k in 0..D {
            result.set(0, 0, k, self.divergence_partial(alpha, k, x, param)?);
        }
        Ok(result)
    }

    fn type_name(&self) -> &str {
        Combination::Divergence.type_name()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn sum<T, L, Rt, const D: usize, const R: usize, const C: usize>(
    left: L,
    right: Rt,
) -> Result<SumFunction<L, Rt>, FunctionError>
where
    T: Real,
    L: SmoothFunction<T, D, R, C>,
    Rt: SmoothFunction<T, D, R, C>,
{
    SumFunction::new(left, right)
}

pub fn difference<T, L, Rt, const D: usize, const R: usize, const C: usize>(
    left: L,
    right: Rt,
) -> Result<DifferenceFunction<L, Rt>, FunctionError>
where
    T: Real,
    L: SmoothFunction<T, D, R, C>,
    Rt: SmoothFunction<T, D, R, C>,
{
    DifferenceFunction::new(left, right)
}

pub fn product<T, L, Rt, const D: usize, const R: usize, const K: usize, const C: usize>(
    left: L,
    right: Rt,
) -> Result<ProductFunction<L, Rt, K>, FunctionError>
where
    T: Real,
    L: SmoothFunction<T, D, R, K>,
    Rt: SmoothFunction<T, D, K, C>,
{
    ProductFunction::new(left, right)
}

pub fn scalar_product<T, S, F, const D: usize, const R: usize, const C: usize>(
    scalar: S,
    function: F,
) -> Result<ScalarProductFunction<S, F>, FunctionError>
where
    T: Real,
    S: SmoothFunction<T, D, 1, 1>,
    F: SmoothFunction<T, D, R, C>,
{
    ScalarProductFunction::new(scalar, function)
}

/// The product $f s$ of a function of any shape with a scalar function.
pub fn function_scalar_product<T, F, S, const D: usize, const R: usize, const C: usize>(
    function: F,
    scalar: S,
) -> Result<FunctionScalarProductFunction<F, S>, FunctionError>
where
    T: Real,
    F: SmoothFunction<T, D, R, C>,
    S: SmoothFunction<T, D, 1, 1>,
{
    FunctionScalarProductFunction::new(function, scalar)
}

pub fn divergence<T, F, const D: usize>(function: F) -> DivergenceFunction<F>
where
    T: Real,
    F: SmoothFunction<T, D, D, 1>,
{
    DivergenceFunction::new(function)
}
