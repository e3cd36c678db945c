/// Statistics produced by a single call to a solver.
///
/// This type keeps fields private to allow evolving the internal counters
/// without breaking the public API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitStats {
    iterations: usize,
    converged: bool,
}

impl FitStats {
    /// Creates a new `FitStats`.
    ///
    /// # Args
    /// * `iterations` - Number of outer iterations the solver ran.
    /// * `converged` - Whether the stopping criterion was met before the budget ran out.
    ///
    /// # Returns
    /// A `FitStats` instance containing the provided counters.
    pub fn new(iterations: usize, converged: bool) -> Self {
        Self {
            iterations,
            converged,
        }
    }

    /// Returns the number of outer iterations the solver ran.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns whether the solver met its tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }
}
