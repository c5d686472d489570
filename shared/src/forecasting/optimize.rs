//! Bounded Nelder-Mead simplex minimizer used for model parameter estimation

use std::cmp::Ordering;

/// Box constraints for each parameter
#[derive(Debug, Clone)]
pub(crate) struct Bounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl Bounds {
    /// Same interval for every dimension
    pub fn uniform(dim: usize, lower: f64, upper: f64) -> Self {
        Self {
            lower: vec![lower; dim],
            upper: vec![upper; dim],
        }
    }

    fn clamp(&self, point: &mut [f64]) {
        for (i, v) in point.iter_mut().enumerate() {
            *v = v.clamp(self.lower[i], self.upper[i]);
        }
    }
}

/// Best point found by the simplex search
#[derive(Debug, Clone)]
pub(crate) struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
}

/// Objective values that are NaN or infinite rank as worst possible
fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::MAX
    }
}

fn by_value(a: &(Vec<f64>, f64), b: &(Vec<f64>, f64)) -> Ordering {
    a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal)
}

/// Minimize `f` inside `bounds`, starting from `initial`
///
/// Stops after `max_iter` iterations or when the simplex diameter drops below `tol`.
pub(crate) fn nelder_mead<F>(
    f: F,
    initial: &[f64],
    bounds: &Bounds,
    max_iter: usize,
    tol: f64,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    let eval = |p: &[f64]| sanitize(f(p));

    let mut start = initial.to_vec();
    bounds.clamp(&mut start);

    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
    simplex.push((start.clone(), eval(&start)));
    for i in 0..dim {
        let step = (bounds.upper[i] - bounds.lower[i]) * 0.1;
        let mut vertex = start.clone();
        vertex[i] = (vertex[i] + step).min(bounds.upper[i]);
        if (vertex[i] - start[i]).abs() < 1e-12 {
            vertex[i] = (start[i] - step).max(bounds.lower[i]);
        }
        let value = eval(&vertex);
        simplex.push((vertex, value));
    }

    for _ in 0..max_iter {
        simplex.sort_by(by_value);

        let diameter = simplex[0]
            .0
            .iter()
            .zip(simplex[dim].0.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        if diameter < tol {
            break;
        }

        let mut centroid = vec![0.0; dim];
        for (vertex, _) in &simplex[..dim] {
            for (c, v) in centroid.iter_mut().zip(vertex) {
                *c += v / dim as f64;
            }
        }

        let toward = |from: &[f64], coefficient: f64| -> Vec<f64> {
            let mut p: Vec<f64> = centroid
                .iter()
                .zip(from)
                .map(|(&c, &x)| c + coefficient * (x - c))
                .collect();
            bounds.clamp(&mut p);
            p
        };

        let worst = simplex[dim].clone();
        let reflected = toward(&worst.0, -1.0);
        let f_reflected = eval(&reflected);

        if f_reflected < simplex[0].1 {
            let expanded = toward(&worst.0, -2.0);
            let f_expanded = eval(&expanded);
            simplex[dim] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
            continue;
        }

        if f_reflected < simplex[dim - 1].1 {
            simplex[dim] = (reflected, f_reflected);
            continue;
        }

        let (base, f_base) = if f_reflected < worst.1 {
            (reflected, f_reflected)
        } else {
            worst
        };
        let contracted = toward(&base, 0.5);
        let f_contracted = eval(&contracted);
        if f_contracted < f_base {
            simplex[dim] = (contracted, f_contracted);
            continue;
        }

        // Shrink toward the best vertex
        let best = simplex[0].0.clone();
        for (vertex, value) in simplex.iter_mut().skip(1) {
            for (x, b) in vertex.iter_mut().zip(&best) {
                *x = 0.5 * (*x + b);
            }
            bounds.clamp(vertex);
            *value = eval(vertex);
        }
    }

    simplex.sort_by(by_value);
    let (point, value) = simplex.swap_remove(0);
    Minimum { point, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimizes_quadratic() {
        let bounds = Bounds::uniform(2, -5.0, 5.0);
        let min = nelder_mead(
            |p| (p[0] - 1.5).powi(2) + (p[1] + 0.5).powi(2),
            &[0.0, 0.0],
            &bounds,
            500,
            1e-10,
        );
        assert!((min.point[0] - 1.5).abs() < 1e-4);
        assert!((min.point[1] + 0.5).abs() < 1e-4);
        assert!(min.value < 1e-8);
    }

    #[test]
    fn test_respects_bounds() {
        let bounds = Bounds::uniform(1, -0.9, 0.9);
        let min = nelder_mead(|p| (p[0] - 3.0).powi(2), &[0.0], &bounds, 200, 1e-10);
        assert!(min.point[0] <= 0.9 + 1e-12);
        assert!((min.point[0] - 0.9).abs() < 1e-4);
    }

    #[test]
    fn test_non_finite_objective_is_avoided() {
        let bounds = Bounds::uniform(1, -1.0, 1.0);
        let min = nelder_mead(
            |p| if p[0] > 0.0 { f64::NAN } else { (p[0] + 0.5).powi(2) },
            &[-0.1],
            &bounds,
            300,
            1e-10,
        );
        assert!(min.value.is_finite());
        assert!((min.point[0] + 0.5).abs() < 1e-3);
    }
}
