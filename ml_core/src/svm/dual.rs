use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, seq::SliceRandom};

use crate::FitStats;

/// Dual coordinate descent for the squared hinge loss.
///
/// Each pass visits the dual variables in a fresh random order and minimizes the
/// dual objective along one of them in closed form, keeping `w = sum a_i y_i x_i`
/// up to date. Stops once the spread of the projected gradients is within `tol`.
///
/// # Returns
/// The primal weights (one per column of `x`) and the solver statistics.
pub(super) fn solve<R: Rng>(
    x: ArrayView2<'_, f32>,
    y: ArrayView1<'_, f32>,
    c: f32,
    tol: f32,
    max_iter: usize,
    rng: &mut R,
) -> (Array1<f32>, FitStats) {
    let (n_samples, n_features) = x.dim();
    let diag = 0.5 / c;

    let q_diag: Vec<f32> = x.rows().into_iter().map(|xi| xi.dot(&xi) + diag).collect();
    let mut alpha = vec![0.0_f32; n_samples];
    let mut w = Array1::<f32>::zeros(n_features);
    let mut order: Vec<usize> = (0..n_samples).collect();

    for iter in 0..max_iter {
        order.shuffle(rng);

        let mut pg_max = f32::NEG_INFINITY;
        let mut pg_min = f32::INFINITY;

        for &i in &order {
            let xi = x.row(i);
            let yi = y[i];

            let g = yi * w.dot(&xi) - 1.0 + alpha[i] * diag;
            let pg = if alpha[i] == 0.0 { g.min(0.0) } else { g };

            pg_max = pg_max.max(pg);
            pg_min = pg_min.min(pg);

            if pg.abs() > 1e-12 {
                let old = alpha[i];
                alpha[i] = (old - g / q_diag[i]).max(0.0);
                w.scaled_add((alpha[i] - old) * yi, &xi);
            }
        }

        log::debug!("dual iteration {iter}: projected gradient spread {}", pg_max - pg_min);

        if pg_max - pg_min <= tol {
            return (w, FitStats::new(iter + 1, true));
        }
    }

    (w, FitStats::new(max_iter, false))
}
