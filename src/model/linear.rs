//! Linear least-squares regression.
//!
//! Solves the normal equations `(XᵀX + αI) w = Xᵀy` on centered data, by
//! Cholesky decomposition with a Gauss-Jordan fallback for matrices that are
//! not numerically positive definite. Rank-deficient systems (collinear
//! columns, such as one-hot blocks next to an intercept) get the
//! minimum-norm solution from an eigendecomposition of `XᵀX`.

use super::Estimator;
use crate::data::FeatureMatrix;
use crate::preprocessing::error::{PreprocessingError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Relative pivot tolerance below which a system is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Upper bound on Jacobi sweeps; convergence is quadratic, so this is slack.
const MAX_JACOBI_SWEEPS: usize = 100;

/// Solve symmetric positive-definite system Ax = b using Cholesky decomposition.
/// Returns `None` if the matrix is not positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }

            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= PIVOT_TOLERANCE * a[[i, i]].abs() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Solve Ax = b by Gauss-Jordan elimination with partial pivoting.
/// Returns `None` if the matrix is singular.
fn gauss_jordan_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let scale = a.iter().fold(0.0f64, |m, v| m.max(v.abs()));

    // Augmented matrix [A | b]
    let mut aug = Array2::<f64>::zeros((n, n + 1));
    aug.slice_mut(ndarray::s![.., ..n]).assign(a);
    aug.column_mut(n).assign(b);

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..=n {
                aug.swap([col, j], [max_row, j]);
            }
        }

        let pivot = aug[[col, col]];
        if pivot.abs() <= PIVOT_TOLERANCE * scale {
            return None;
        }
        for j in 0..=n {
            aug[[col, j]] /= pivot;
        }

        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..=n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    Some(aug.column(n).to_owned())
}

/// Eigenvalues and eigenvectors (as columns) of a symmetric matrix by cyclic
/// Jacobi rotations.
fn symmetric_eigen(a: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    let mut a = a.clone();
    let mut v = Array2::<f64>::eye(n);
    let total: f64 = a.iter().map(|x| x * x).sum();

    for _ in 0..MAX_JACOBI_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off <= f64::EPSILON * f64::EPSILON * total {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let (akp, akq) = (a[[k, p]], a[[k, q]]);
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let (apk, aqk) = (a[[p, k]], a[[q, k]]);
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                for k in 0..n {
                    let (vkp, vkq) = (v[[k, p]], v[[k, q]]);
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}

/// Minimum-norm solution of the symmetric positive semi-definite system
/// Ax = b, dropping eigen-directions whose eigenvalue is negligible.
/// Returns `None` if the result is not finite.
fn min_norm_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let (eigenvalues, eigenvectors) = symmetric_eigen(a);
    let largest = eigenvalues.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let cutoff = PIVOT_TOLERANCE * largest;

    let mut x = Array1::<f64>::zeros(a.nrows());
    for (i, &lambda) in eigenvalues.iter().enumerate() {
        if lambda <= cutoff {
            continue;
        }
        let direction = eigenvectors.column(i);
        x.scaled_add(direction.dot(b) / lambda, &direction);
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Ordinary least squares with optional L2 (ridge) penalty.
///
/// # Example
/// ```rust
/// use featurecraft::data::FeatureMatrix;
/// use featurecraft::model::{Estimator, LinearRegression};
///
/// let x = FeatureMatrix::from_columns(vec![
///     ("sqft".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
/// ]).unwrap();
/// let y = [3.0, 5.0, 7.0, 9.0];
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
///
/// let predicted = model.predict(&x).unwrap();
/// assert!((predicted[0] - 3.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearRegression {
    fit_intercept: bool,
    alpha: f64,
    coefficients: Option<Array1<f64>>,
    intercept: f64,
    columns: Vec<String>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Create a new unfitted model with an intercept and no penalty.
    pub fn new() -> Self {
        Self {
            fit_intercept: true,
            alpha: 0.0,
            coefficients: None,
            intercept: 0.0,
            columns: Vec::new(),
        }
    }

    /// Enable/disable fitting intercept.
    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Set regularization strength (ridge regression).
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fitted coefficients, one per input column.
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Fitted intercept (0 when `fit_intercept` is off).
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Returns `true` once [`Estimator::fit`] has succeeded.
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Coefficient of determination R² on `x`, `y`.
    pub fn score(&self, x: &FeatureMatrix, y: &[f64]) -> Result<f64> {
        let predicted = self.predict(x)?;
        check_targets(x, y)?;

        let y = Array1::from(y.to_vec());
        let y_mean = y.mean().unwrap_or(0.0);
        let ss_res = (&predicted - &y).mapv(|v| v * v).sum();
        let ss_tot = y.mapv(|v| (v - y_mean) * (v - y_mean)).sum();

        if ss_tot == 0.0 {
            return Ok(1.0);
        }
        Ok(1.0 - ss_res / ss_tot)
    }
}

fn check_targets(x: &FeatureMatrix, y: &[f64]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(PreprocessingError::ShapeMismatch {
            expected: format!("{} targets", x.n_rows()),
            got: format!("{} targets", y.len()),
        });
    }
    Ok(())
}

impl Estimator for LinearRegression {
    fn name(&self) -> &'static str {
        "LinearRegression"
    }

    fn fit(&mut self, x: &FeatureMatrix, y: &[f64]) -> Result<()> {
        if x.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit LinearRegression on empty data".to_string(),
            ));
        }
        check_targets(x, y)?;
        if !(self.alpha >= 0.0) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "LinearRegression alpha must be non-negative, got {}",
                self.alpha
            )));
        }
        if x.has_missing() || y.iter().any(|v| v.is_nan()) {
            return Err(PreprocessingError::MissingValues(
                "LinearRegression cannot fit on data with missing values".to_string(),
            ));
        }

        let y = Array1::from(y.to_vec());
        let (x_centered, y_centered, x_mean, y_mean) = if self.fit_intercept {
            let n = x.n_rows() as f64;
            let x_mean = x.values().sum_axis(Axis(0)) / n;
            let y_mean = y.sum() / n;
            let x_centered = x.values() - &x_mean.view().insert_axis(Axis(0));
            (x_centered, &y - y_mean, x_mean, y_mean)
        } else {
            let zeros = Array1::zeros(x.n_columns());
            (x.values().clone(), y, zeros, 0.0)
        };

        // (X^T X + alpha*I) * w = X^T y
        let mut xtx = x_centered.t().dot(&x_centered);
        for i in 0..x.n_columns() {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_centered.t().dot(&y_centered);

        if xtx.iter().chain(xty.iter()).any(|v| !v.is_finite()) {
            return Err(PreprocessingError::Numerical(
                "LinearRegression normal equations overflow".to_string(),
            ));
        }

        let coefficients = match cholesky_solve(&xtx, &xty) {
            Some(w) => w,
            None => {
                tracing::debug!("Cholesky failed, falling back to Gauss-Jordan");
                match gauss_jordan_solve(&xtx, &xty) {
                    Some(w) => w,
                    None => {
                        tracing::debug!("rank-deficient system, using minimum-norm solution");
                        min_norm_solve(&xtx, &xty).ok_or_else(|| {
                            PreprocessingError::Numerical(
                                "Least squares solution is not finite".to_string(),
                            )
                        })?
                    }
                }
            }
        };

        self.intercept = y_mean - coefficients.dot(&x_mean);
        self.coefficients = Some(coefficients);
        self.columns = x.columns().to_vec();

        tracing::debug!(
            features = self.columns.len(),
            rows = x.n_rows(),
            alpha = self.alpha,
            intercept = self.intercept,
            "fitted LinearRegression"
        );
        Ok(())
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| PreprocessingError::NotFitted(self.name().to_string()))?;
        x.ensure_columns(&self.columns)?;
        if x.has_missing() {
            return Err(PreprocessingError::MissingValues(
                "LinearRegression cannot predict on data with missing values".to_string(),
            ));
        }

        Ok(x.values().dot(coefficients) + self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::SerializableParams;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    fn line() -> (FeatureMatrix, Vec<f64>) {
        // y = 2x + 1
        let x = FeatureMatrix::from_columns(vec![("x".to_string(), vec![1.0, 2.0, 3.0, 4.0])])
            .unwrap();
        (x, vec![3.0, 5.0, 7.0, 9.0])
    }

    #[test]
    fn test_linear_regression_simple() {
        let (x, y) = line();
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        assert_close(model.coefficients().unwrap()[0], 2.0);
        assert_close(model.intercept(), 1.0);
        assert_close(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_linear_regression_multivariate() {
        // y = 1 + 2a - 3b
        let x = FeatureMatrix::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![2.0, 1.0],
                vec![3.0, 5.0],
                vec![4.0, 2.0],
            ],
        )
        .unwrap();
        let y: Vec<f64> = x.to_rows().iter().map(|r| 1.0 + 2.0 * r[0] - 3.0 * r[1]).collect();

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let w = model.coefficients().unwrap();
        assert_close(w[0], 2.0);
        assert_close(w[1], -3.0);
        assert_close(model.intercept(), 1.0);
    }

    #[test]
    fn test_linear_regression_without_intercept() {
        let x = FeatureMatrix::from_columns(vec![("x".to_string(), vec![1.0, 2.0, 3.0])]).unwrap();
        let mut model = LinearRegression::new().with_fit_intercept(false);
        model.fit(&x, &[2.0, 4.0, 6.0]).unwrap();

        assert_close(model.coefficients().unwrap()[0], 2.0);
        assert_eq!(model.intercept(), 0.0);
    }

    #[test]
    fn test_ridge_regression_shrinks() {
        let (x, y) = line();
        let mut ols = LinearRegression::new();
        let mut ridge = LinearRegression::new().with_alpha(10.0);
        ols.fit(&x, &y).unwrap();
        ridge.fit(&x, &y).unwrap();

        let w_ols = ols.coefficients().unwrap()[0];
        let w_ridge = ridge.coefficients().unwrap()[0];
        // centered x has sum of squares 5: w = 10 / (5 + 10)
        assert_close(w_ridge, 10.0 / 15.0);
        assert!(w_ridge.abs() < w_ols.abs());
    }

    #[test]
    fn test_predict_before_fit() {
        let (x, _) = line();
        assert!(matches!(
            LinearRegression::new().predict(&x),
            Err(PreprocessingError::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_target_length_mismatch() {
        let (x, _) = line();
        assert!(matches!(
            LinearRegression::new().fit(&x, &[1.0, 2.0]),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_with_missing_values() {
        let x = FeatureMatrix::from_columns(vec![("x".to_string(), vec![1.0, f64::NAN])]).unwrap();
        assert!(matches!(
            LinearRegression::new().fit(&x, &[1.0, 2.0]),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_predict_with_missing_values() {
        let (x, y) = line();
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let test = FeatureMatrix::from_columns(vec![("x".to_string(), vec![f64::NAN])]).unwrap();
        assert!(matches!(
            model.predict(&test),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_predict_column_mismatch() {
        let (x, y) = line();
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let test = FeatureMatrix::from_columns(vec![("z".to_string(), vec![1.0])]).unwrap();
        assert!(matches!(
            model.predict(&test),
            Err(PreprocessingError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        // constant column centers to zero
        let x = FeatureMatrix::from_columns(vec![
            ("x".to_string(), vec![1.0, 2.0, 3.0]),
            ("c".to_string(), vec![5.0, 5.0, 5.0]),
        ])
        .unwrap();
        let y = [1.0, 2.0, 3.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();
        let w = model.coefficients().unwrap();
        assert_close(w[0], 1.0);
        assert_close(w[1], 0.0);
        assert_close(model.intercept(), 0.0);

        let mut ridge = LinearRegression::new().with_alpha(0.1);
        ridge.fit(&x, &y).unwrap();
        assert_close(ridge.coefficients().unwrap()[1], 0.0);
    }

    #[test]
    fn test_duplicated_column_splits_weight() {
        let (_, y) = line();
        let doubled = FeatureMatrix::from_columns(vec![
            ("x".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("copy".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap();

        let mut model = LinearRegression::new();
        model.fit(&doubled, &y).unwrap();

        // minimum norm: the weight 2 is shared evenly
        let w = model.coefficients().unwrap();
        assert_close(w[0], 1.0);
        assert_close(w[1], 1.0);
        assert_close(model.intercept(), 1.0);
        assert_close(model.score(&doubled, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_one_hot_block_with_intercept() {
        // three indicator columns always sum to one
        let x = FeatureMatrix::from_rows(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
            ],
        )
        .unwrap();
        let y = [100.0, 200.0, 300.0, 100.0, 200.0];

        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let predicted = model.predict(&x).unwrap();
        for (p, t) in predicted.iter().zip(&y) {
            assert!((p - t).abs() < 1e-8, "{} != {}", p, t);
        }
        // the null direction (1, 1, 1) carries no weight
        assert!(model.coefficients().unwrap().sum().abs() < 1e-8);
    }

    #[test]
    fn test_overflowing_system() {
        let x = FeatureMatrix::from_columns(vec![("x".to_string(), vec![1e200, -1e200, 0.0])])
            .unwrap();
        assert!(matches!(
            LinearRegression::new().fit(&x, &[1.0, 2.0, 3.0]),
            Err(PreprocessingError::Numerical(_))
        ));
    }

    #[test]
    fn test_symmetric_eigen() {
        let a = ndarray::arr2(&[[2.0, 1.0], [1.0, 2.0]]);
        let (values, vectors) = symmetric_eigen(&a);

        let mut sorted = values.to_vec();
        sorted.sort_by(|x, y| x.partial_cmp(y).unwrap());
        assert_close(sorted[0], 1.0);
        assert_close(sorted[1], 3.0);
        for i in 0..2 {
            let v = vectors.column(i);
            let av = a.dot(&v);
            assert_close(av[0], values[i] * v[0]);
            assert_close(av[1], values[i] * v[1]);
        }
    }

    #[test]
    fn test_gauss_jordan_solve() {
        // not symmetric, so only the fallback applies
        let a = ndarray::arr2(&[[0.0, 2.0], [1.0, 1.0]]);
        let b = ndarray::arr1(&[4.0, 3.0]);
        let x = gauss_jordan_solve(&a, &b).unwrap();
        assert_close(x[0], 1.0);
        assert_close(x[1], 2.0);
        assert!(cholesky_solve(&a, &b).is_none());
    }

    #[test]
    fn test_refit_replaces_coefficients() {
        let (x, y) = line();
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let flipped: Vec<f64> = y.iter().map(|v| -v).collect();
        model.fit(&x, &flipped).unwrap();
        assert_close(model.coefficients().unwrap()[0], -2.0);
    }

    #[test]
    fn test_invalid_alpha() {
        let (x, y) = line();
        assert!(matches!(
            LinearRegression::new().with_alpha(-1.0).fit(&x, &y),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_linear_regression_bytes_round_trip() {
        let (x, y) = line();
        let mut model = LinearRegression::new();
        model.fit(&x, &y).unwrap();

        let restored = LinearRegression::from_bytes(&model.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.predict(&x).unwrap(), model.predict(&x).unwrap());
    }
}
