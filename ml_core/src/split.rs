use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{Dataset, MlError, Result};

/// The outcome of partitioning a dataset into training and test samples.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
    /// Whether class proportions were preserved.
    pub stratified: bool,
}

/// Returns whether stratification can be used for the given class counts.
///
/// It requires at least two present classes, each with at least two samples.
pub fn can_stratify(class_counts: &[usize]) -> bool {
    let present: Vec<usize> = class_counts.iter().copied().filter(|&c| c > 0).collect();
    present.len() >= 2 && present.iter().all(|&c| c >= 2)
}

/// Partitions `dataset` into a training and a test set.
///
/// `ceil(len * test_size)` samples go to the test set and the rest to the
/// training set. When `can_stratify` holds the class proportions are kept in both
/// partitions, otherwise samples are drawn from a single random permutation.
/// The same `seed` always yields the same partitions.
///
/// # Errors
/// Returns `MlError::InvalidInput` if `test_size` is not in `(0, 1)`, or
/// `MlError::EmptySplit` if either partition would end up empty.
pub fn train_test_split(dataset: &Dataset, test_size: f32, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(MlError::InvalidInput("test_size must be in (0, 1)"));
    }

    let n_samples = dataset.len();
    let n_test = (n_samples as f64 * test_size as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);

    if n_train == 0 || n_test == 0 {
        return Err(MlError::EmptySplit {
            n_samples,
            n_train,
            n_test,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let class_counts = dataset.class_counts();
    let stratified = can_stratify(&class_counts);

    let (mut train_idx, mut test_idx) = if stratified {
        stratified_indices(dataset, &class_counts, n_test, &mut rng)
    } else {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);
        let train = indices.split_off(n_test);
        (train, indices)
    };

    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    log::debug!(
        "split {n_samples} samples into train={} test={} (stratified={stratified})",
        train_idx.len(),
        test_idx.len()
    );

    Ok(TrainTestSplit {
        train: dataset.select(&train_idx),
        test: dataset.select(&test_idx),
        stratified,
    })
}

fn stratified_indices(
    dataset: &Dataset,
    class_counts: &[usize],
    n_test: usize,
    rng: &mut StdRng,
) -> (Vec<usize>, Vec<usize>) {
    let test_per_class = allocate(class_counts, n_test);
    let mut train = Vec::with_capacity(dataset.len() - n_test);
    let mut test = Vec::with_capacity(n_test);

    for (class, &n_class_test) in test_per_class.iter().enumerate() {
        let mut members: Vec<usize> = dataset
            .labels()
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label as usize == class)
            .map(|(i, _)| i)
            .collect();

        members.shuffle(rng);
        let rest = members.split_off(n_class_test);
        test.extend(members);
        train.extend(rest);
    }

    (train, test)
}

/// Distributes `total` draws among classes proportionally to `counts`.
///
/// Every class first gets the floor of its share; the leftover draws go to the
/// classes with the largest fractional remainders, lower class first on ties.
fn allocate(counts: &[usize], total: usize) -> Vec<usize> {
    let n: usize = counts.iter().sum();
    let shares: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 * total as f64 / n as f64)
        .collect();

    let mut alloc: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();
    let mut leftover = total - alloc.iter().sum::<usize>();

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = shares[a] - shares[a].floor();
        let rb = shares[b] - shares[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });

    for class in order.into_iter().cycle() {
        if leftover == 0 {
            break;
        }
        if alloc[class] < counts[class] {
            alloc[class] += 1;
            leftover -= 1;
        }
    }

    alloc
}
