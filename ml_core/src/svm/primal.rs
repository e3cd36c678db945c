use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, seq::SliceRandom};

use crate::FitStats;

const SUFFICIENT_DECREASE: f32 = 0.01;
const MAX_LINE_SEARCH_STEPS: usize = 30;

/// Primal coordinate descent for the squared hinge loss.
///
/// Each pass visits the features in a fresh random order and takes a Newton step
/// along one weight at a time, backtracking until the objective decreases enough.
/// `slack[i] = 1 - y_i * w.x_i` is kept up to date so a step costs one pass over
/// a single column. Stops once the largest partial derivative seen in a pass is
/// within `tol` times the largest one of the first pass.
///
/// # Returns
/// The weights (one per column of `x`) and the solver statistics.
pub(super) fn solve<R: Rng>(
    x: ArrayView2<'_, f32>,
    y: ArrayView1<'_, f32>,
    c: f32,
    tol: f32,
    max_iter: usize,
    rng: &mut R,
) -> (Array1<f32>, FitStats) {
    let n_features = x.ncols();

    let mut w = Array1::<f32>::zeros(n_features);
    let mut slack = Array1::<f32>::ones(x.nrows());
    let mut order: Vec<usize> = (0..n_features).collect();
    let mut initial_grad = None;

    for iter in 0..max_iter {
        order.shuffle(rng);
        let mut max_grad = 0.0_f32;

        for &j in &order {
            let xj = x.column(j);
            let (d1, d2) = derivatives(w[j], xj, y, slack.view(), c);
            max_grad = max_grad.max(d1.abs());

            if d1.abs() <= f32::EPSILON {
                continue;
            }

            let step = line_search(w[j], -d1 / d2, xj, y, slack.view(), c);
            if step != 0.0 {
                w[j] += step;
                slack.zip_mut_with(&(&xj * &y), |s, &xy| *s -= step * xy);
            }
        }

        log::debug!("primal iteration {iter}: max partial derivative {max_grad}");

        let threshold = *initial_grad.get_or_insert(max_grad) * tol;
        if max_grad <= threshold || max_grad <= f32::EPSILON {
            return (w, FitStats::new(iter + 1, true));
        }
    }

    (w, FitStats::new(max_iter, false))
}

/// First and (generalized) second derivative of the objective along weight `wj`.
fn derivatives(
    wj: f32,
    xj: ArrayView1<'_, f32>,
    y: ArrayView1<'_, f32>,
    slack: ArrayView1<'_, f32>,
    c: f32,
) -> (f32, f32) {
    let (mut d1, mut d2) = (0.0, 0.0);

    for ((&xij, &yi), &si) in xj.iter().zip(y).zip(slack) {
        if si > 0.0 {
            d1 += yi * xij * si;
            d2 += xij * xij;
        }
    }

    (wj - 2.0 * c * d1, 1.0 + 2.0 * c * d2)
}

/// Change of the objective when moving weight `wj` by `z`.
fn delta(
    wj: f32,
    z: f32,
    xj: ArrayView1<'_, f32>,
    y: ArrayView1<'_, f32>,
    slack: ArrayView1<'_, f32>,
    c: f32,
) -> f32 {
    let loss: f32 = xj
        .iter()
        .zip(y)
        .zip(slack)
        .map(|((&xij, &yi), &si)| {
            let moved = (si - z * yi * xij).max(0.0);
            let current = si.max(0.0);
            moved * moved - current * current
        })
        .sum();

    0.5 * (wj + z) * (wj + z) - 0.5 * wj * wj + c * loss
}

/// Halves the Newton step `d` until it yields a sufficient decrease.
///
/// # Returns
/// The accepted step, or `0.0` if none was found.
fn line_search(
    wj: f32,
    d: f32,
    xj: ArrayView1<'_, f32>,
    y: ArrayView1<'_, f32>,
    slack: ArrayView1<'_, f32>,
    c: f32,
) -> f32 {
    let mut z = d;
    for _ in 0..MAX_LINE_SEARCH_STEPS {
        if delta(wj, z, xj, y, slack, c) <= -SUFFICIENT_DECREASE * z * z {
            return z;
        }
        z *= 0.5;
    }

    0.0
}
