//! Multi-index helpers for partial derivatives.
//!
//! A multi-index $\alpha \in \mathbb{N}^d$ identifies the partial derivative
//! $\partial^\alpha = \partial_1^{\alpha_1} \cdots \partial_d^{\alpha_d}$.
use crate::Real;
use itertools::Itertools;

/// The total order $|\alpha| = \sum_i \alpha_i$.
pub fn multi_index_order<const D: usize>(alpha: &[usize; D]) -> usize {
    alpha.iter().sum()
}

pub fn is_zero_multi_index<const D: usize>(alpha: &[usize; D]) -> bool {
    alpha.iter().all(|&a| a == 0)
}

/// Returns $\alpha + e_k$.
pub fn add_unit<const D: usize>(alpha: &[usize; D], axis: usize) -> [usize; D] {
    let mut result = *alpha;
    result[axis] += 1;
    result
}

/// Returns $\alpha - \beta$, or `None` if $\beta \not\leq \alpha$.
pub fn checked_difference<const D: usize>(alpha: &[usize; D], beta: &[usize; D]) -> Option<[usize; D]> {
    let mut result = [0; D];
    for i in 0..D {
        result[i] = alpha[i].checked_sub(beta[i])?;
    }
    Some(result)
}

/// All multi-indices $\beta$ with $\beta \leq \alpha$ componentwise.
pub fn sub_multi_indices<const D: usize>(alpha: &[usize; D]) -> impl Iterator<Item = [usize; D]> {
    alpha
        .iter()
        .map(|&a| 0..=a)
        .multi_cartesian_product()
        .map(|beta| {
            let mut result = [0; D];
            result.copy_from_slice(&beta);
            result
        })
}

/// Binomial coefficient $\binom{n}{k}$.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// The multi-binomial coefficient $\binom{\alpha}{\beta} = \prod_i \binom{\alpha_i}{\beta_i}$.
pub fn multi_binomial<T: Real, const D: usize>(alpha: &[usize; D], beta: &[usize; D]) -> T {
    alpha
        .iter()
        .zip(beta)
        .map(|(&a, &b)| binomial(a, b))
        .map(|c| T::from_usize(c).expect("Binomial coefficient must fit in T"))
        .fold(T::one(), |acc, c| acc * c)
}

/// Expands $\alpha$ into the sequence of axes it differentiates along, e.g. $(2, 0, 1) \mapsto (0, 0, 2)$.
pub fn multi_index_axes<const D: usize>(alpha: &[usize; D]) -> Vec<usize> {
    alpha
        .iter()
        .enumerate()
        .flat_map(|(axis, &count)| std::iter::repeat(axis).take(count))
        .collect()
}
