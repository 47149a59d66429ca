//! Test helpers shared by the tests and benchmarks of the workspace.
use nalgebra::{SMatrix, SVector};

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
}

/// Central finite difference approximation of the Jacobian of `f` at `x`.
///
/// Column `k` of the result approximates $\partial f / \partial x_k$.
pub fn finite_difference_jacobian<const D: usize, const M: usize>(
    f: impl Fn(&SVector<f64, D>) -> SVector<f64, M>,
    x: &SVector<f64, D>,
    h: f64,
) -> SMatrix<f64, M, D> {
    let mut jacobian = SMatrix::<f64, M, D>::zeros();
    for k in 0..D {
        let mut x_plus = *x;
        let mut x_minus = *x;
        x_plus[k] += h;
        x_minus[k] -= h;
        let column = (f(&x_plus) - f(&x_minus)) / (2.0 * h);
        jacobian.set_column(k, &column);
    }
    jacobian
}

/// Central finite difference approximation of the gradient of a scalar function.
pub fn finite_difference_gradient<const D: usize>(
    f: impl Fn(&SVector<f64, D>) -> f64,
    x: &SVector<f64, D>,
    h: f64,
) -> SVector<f64, D> {
    finite_difference_jacobian(|y| SVector::<f64, 1>::new(f(y)), x, h).transpose()
}
