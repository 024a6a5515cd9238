//! Benchmark cost functions for the rde optimizer
//!
//! Functions are plain `fn(&Array1<f64>) -> f64` and are organized by category:
//!
//! - **Unimodal**: Single global optimum functions (sphere, rosenbrock, etc.)
//! - **Multimodal**: Multiple local minima functions (quadratic-cosine, rastrigin, ackley)
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use rde_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! let result = sphere(&x);
//! assert_eq!(result, 0.0);
//!
//! // Get function metadata
//! let bounds = get_function_bounds("sphere");
//! assert!(bounds.is_some());
//! ```

use ndarray::Array1;
use std::collections::HashMap;

pub mod functions;
pub use functions::*;

/// Signature shared by every benchmark function
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Metadata for a test function including bounds and known optimum
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// The function itself
    pub function: TestFunction,
    /// Bounds used for each dimension (min, max)
    pub bounds: (f64, f64),
    /// Global minimum location and value, as a function of the dimension
    pub global_minimum: fn(usize) -> (Vec<f64>, f64),
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Typical dimension(s) for the function
    pub dimensions: Vec<usize>,
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let entries = [
        FunctionMetadata {
            name: "sphere".to_string(),
            function: sphere,
            bounds: (-5.12, 5.12),
            global_minimum: |n| (vec![0.0; n], 0.0),
            description: "N-dimensional convex bowl".to_string(),
            multimodal: false,
            dimensions: vec![2, 5, 10],
        },
        FunctionMetadata {
            name: "quadratic".to_string(),
            function: quadratic,
            bounds: (-10.0, 10.0),
            global_minimum: |n| (vec![0.0; n], 0.0),
            description: "Sum of squares over a symmetric box".to_string(),
            multimodal: false,
            dimensions: vec![2],
        },
        FunctionMetadata {
            name: "sum_squares".to_string(),
            function: sum_squares,
            bounds: (-10.0, 10.0),
            global_minimum: |n| (vec![0.0; n], 0.0),
            description: "Index-weighted sum of squares".to_string(),
            multimodal: false,
            dimensions: vec![2, 5, 10],
        },
        FunctionMetadata {
            name: "rosenbrock".to_string(),
            function: rosenbrock,
            bounds: (-5.0, 10.0),
            global_minimum: |n| (vec![1.0; n], 0.0),
            description: "Curved valley, hard to follow for greedy search".to_string(),
            multimodal: false,
            dimensions: vec![2, 5],
        },
        FunctionMetadata {
            name: "quadratic_cosine".to_string(),
            function: quadratic_cosine,
            bounds: (-100.0, 100.0),
            global_minimum: |n| (vec![0.0; n], 1400.0 - 200.0 * n as f64),
            description: "Quadratic bowl with cosine ripples, shifted by 1400".to_string(),
            multimodal: true,
            dimensions: vec![2, 4],
        },
        FunctionMetadata {
            name: "rastrigin".to_string(),
            function: rastrigin,
            bounds: (-5.12, 5.12),
            global_minimum: |n| (vec![0.0; n], 0.0),
            description: "Highly multimodal with a regular lattice of local minima".to_string(),
            multimodal: true,
            dimensions: vec![2, 5, 10],
        },
        FunctionMetadata {
            name: "ackley".to_string(),
            function: ackley,
            bounds: (-32.768, 32.768),
            global_minimum: |n| (vec![0.0; n], 0.0),
            description: "N-dimensional multimodal function".to_string(),
            multimodal: true,
            dimensions: vec![2, 5, 10],
        },
    ];

    entries
        .into_iter()
        .map(|meta| (meta.name.clone(), meta))
        .collect()
}

/// Helper function to get the per-dimension bounds of a function from metadata
/// Returns None if function is not found in metadata
pub fn get_function_bounds(function_name: &str) -> Option<(f64, f64)> {
    get_function_metadata()
        .get(function_name)
        .map(|meta| meta.bounds)
}

/// Helper function to get bounds repeated over `n` dimensions
/// Returns default bounds if function is not found
pub fn get_function_bounds_vec(
    function_name: &str,
    n: usize,
    default_bounds: (f64, f64),
) -> Vec<(f64, f64)> {
    vec![get_function_bounds(function_name).unwrap_or(default_bounds); n]
}
