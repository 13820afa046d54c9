//! Bounded Nelder-Mead minimization for smoothing parameter estimation.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex converged before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Convergence tolerance on objective spread and simplex size.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Relative step used to build the initial simplex.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Simplex vertices kept sorted by objective value, best first.
struct Simplex<'a> {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
    bounds: Option<&'a [(f64, f64)]>,
}

impl<'a> Simplex<'a> {
    fn new<F>(objective: &F, initial: &[f64], bounds: Option<&'a [(f64, f64)]>, step: f64) -> Self
    where
        F: Fn(&[f64]) -> f64,
    {
        let start = clamp_to(initial, bounds);
        let mut vertices = vec![start.clone()];
        for i in 0..start.len() {
            let mut vertex = start.clone();
            vertex[i] += if start[i].abs() > 1e-10 {
                step * start[i].abs()
            } else {
                step
            };
            // A vertex pushed onto a bound collapses the simplex; step inward instead.
            let clamped = clamp_to(&vertex, bounds);
            if (clamped[i] - start[i]).abs() < 1e-12 {
                vertex[i] = start[i] - step.max(step * start[i].abs());
            }
            vertices.push(clamp_to(&vertex, bounds));
        }
        let values = vertices.iter().map(|v| objective(v)).collect();

        let mut simplex = Self {
            vertices,
            values,
            bounds,
        };
        simplex.sort();
        simplex
    }

    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        self.vertices = order.iter().map(|&i| self.vertices[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.values.len() - 1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let dims = self.vertices[0].len();
        let count = self.worst() as f64;
        let mut centroid = vec![0.0; dims];
        for vertex in &self.vertices[..self.worst()] {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    /// Point at `from + coef * (to - from)`, clamped to bounds.
    fn towards(&self, from: &[f64], to: &[f64], coef: f64) -> Vec<f64> {
        let point: Vec<f64> = from
            .iter()
            .zip(to)
            .map(|(f, t)| f + coef * (t - f))
            .collect();
        clamp_to(&point, self.bounds)
    }

    fn replace_worst(&mut self, vertex: Vec<f64>, value: f64) {
        let worst = self.worst();
        self.vertices[worst] = vertex;
        self.values[worst] = value;
    }

    fn shrink<F: Fn(&[f64]) -> f64>(&mut self, objective: &F, sigma: f64) {
        let best = self.vertices[0].clone();
        for i in 1..self.vertices.len() {
            let shrunk = self.towards(&best, &self.vertices[i], sigma);
            self.values[i] = objective(&shrunk);
            self.vertices[i] = shrunk;
        }
    }

    fn has_converged(&self, tolerance: f64) -> bool {
        let spread = self.values[self.worst()] - self.values[0];
        if spread.abs() < tolerance {
            return true;
        }
        let best = &self.vertices[0];
        self.vertices.iter().all(|v| {
            v.iter()
                .zip(best)
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt()
                < tolerance
        })
    }
}

/// Minimize `objective` starting from `initial`, optionally within per-dimension bounds.
///
/// # Example
/// ```
/// use holtwinters_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 0.4).powi(2) + (x[1] - 0.2).powi(2),
///     &[0.5, 0.5],
///     Some(&[(0.0, 1.0), (0.0, 1.0)]),
///     NelderMeadConfig::default(),
/// );
///
/// assert!((result.optimal_point[0] - 0.4).abs() < 1e-3);
/// assert!((result.optimal_point[1] - 0.2).abs() < 1e-3);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    if initial.is_empty() {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let mut simplex = Simplex::new(&objective, initial, bounds, config.initial_step);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        if simplex.has_converged(config.tolerance) {
            converged = true;
            break;
        }
        iterations += 1;

        let worst = simplex.worst();
        let centroid = simplex.centroid();
        let reflected = simplex.towards(&centroid, &simplex.vertices[worst], -config.alpha);
        let reflected_value = objective(&reflected);

        if reflected_value < simplex.values[0] {
            let expanded = simplex.towards(&centroid, &reflected, config.gamma);
            let expanded_value = objective(&expanded);
            if expanded_value < reflected_value {
                simplex.replace_worst(expanded, expanded_value);
            } else {
                simplex.replace_worst(reflected, reflected_value);
            }
        } else if reflected_value < simplex.values[worst - 1] {
            simplex.replace_worst(reflected, reflected_value);
        } else {
            let (target, target_value) = if reflected_value < simplex.values[worst] {
                (reflected, reflected_value)
            } else {
                (simplex.vertices[worst].clone(), simplex.values[worst])
            };
            let contracted = simplex.towards(&centroid, &target, config.rho);
            let contracted_value = objective(&contracted);
            if contracted_value < target_value {
                simplex.replace_worst(contracted, contracted_value);
            } else {
                simplex.shrink(&objective, config.sigma);
            }
        }

        simplex.sort();
    }

    NelderMeadResult {
        optimal_point: simplex.vertices[0].clone(),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}

fn clamp_to(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(bounds) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match bounds.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}
