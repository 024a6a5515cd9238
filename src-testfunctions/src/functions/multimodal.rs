use ndarray::Array1;

/// Quadratic-cosine function: sum of x^2 - 100*cos(x)^2 - 100*cos(x^2/30), shifted by 1400
/// Global minimum: f(x) = 1400 - 200 * n at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn quadratic_cosine(x: &Array1<f64>) -> f64 {
    let sum: f64 = x
        .iter()
        .map(|&xi| xi * xi - 100.0 * xi.cos().powi(2) - 100.0 * (xi * xi / 30.0).cos())
        .sum();
    sum + 1400.0
}

/// Rastrigin function - highly multimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum: f64 = x
        .iter()
        .map(|&xi| xi.powi(2) - 10.0 * (2.0 * std::f64::consts::PI * xi).cos())
        .sum();
    10.0 * n + sum
}

/// Ackley function - nearly flat outer region with a deep central hole
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi.powi(2)).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * std::f64::consts::PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + std::f64::consts::E
}
