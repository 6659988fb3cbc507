//! Hand-off to a match-winner classifier.
//!
//! The dataset is split into train/test rows with a seeded shuffle and
//! fed to any `Classifier`. `ImpliedOddsClassifier` is the market
//! baseline a learned model has to beat; `MajorityClassifier` is the
//! floor that ignores features entirely.

pub mod evaluate;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::{Dataset, MatchRow};

pub use evaluate::{evaluate, EvaluationReport};

/// Seed used when none is given, so splits are reproducible.
pub const DEFAULT_SEED: u64 = 1234;
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Rows partitioned for fitting and scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<MatchRow>,
    pub test: Vec<MatchRow>,
}

/// Shuffle rows with `seed` and move `test_fraction` of them (rounded up)
/// into the test set. The fraction is clamped to `[0, 1]`.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Split {
    let mut rows = dataset.rows().to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    let fraction = test_fraction.clamp(0.0, 1.0);
    let n_test = ((rows.len() as f64) * fraction).ceil() as usize;
    let test = rows.split_off(rows.len() - n_test.min(rows.len()));
    Split { train: rows, test }
}

/// Fit `classifier` on the train rows, then score it on the test rows.
pub fn fit_and_evaluate<C: Classifier + ?Sized>(classifier: &mut C, split: &Split) -> EvaluationReport {
    let train = Dataset::from_rows(split.train.clone());
    classifier.fit(&train.features(), &train.labels());
    evaluate(&*classifier, &split.test)
}

/// A binary classifier over match feature vectors.
pub trait Classifier {
    /// Fit on feature rows `x` with labels `y` (1 = team A won).
    fn fit(&mut self, x: &[Vec<f64>], y: &[u8]);

    /// Probability that team A wins.
    fn predict_proba(&self, features: &[f64]) -> f64;

    fn predict(&self, features: &[f64]) -> u8 {
        u8::from(self.predict_proba(features) >= 0.5)
    }

    fn name(&self) -> &str;
}

/// Predicts from the consensus prices alone: implied probabilities
/// `1/odds`, normalised to remove the overround.
#[derive(Debug, Clone, Default)]
pub struct ImpliedOddsClassifier;

impl Classifier for ImpliedOddsClassifier {
    fn fit(&mut self, _x: &[Vec<f64>], _y: &[u8]) {}

    fn predict_proba(&self, features: &[f64]) -> f64 {
        let (Some(&a), Some(&b)) = (features.first(), features.get(1)) else {
            return 0.5;
        };
        if a <= 0.0 || b <= 0.0 {
            return 0.5;
        }
        let (pa, pb) = (1.0 / a, 1.0 / b);
        pa / (pa + pb)
    }

    fn name(&self) -> &str {
        "implied-odds"
    }
}

/// Predicts the share of team-A wins seen in training for every row.
#[derive(Debug, Clone)]
pub struct MajorityClassifier {
    a_win_rate: f64,
}

impl Default for MajorityClassifier {
    fn default() -> Self {
        Self { a_win_rate: 0.5 }
    }
}

impl Classifier for MajorityClassifier {
    fn fit(&mut self, _x: &[Vec<f64>], y: &[u8]) {
        if y.is_empty() {
            return;
        }
        let wins = y.iter().filter(|&&label| label == 1).count();
        self.a_win_rate = wins as f64 / y.len() as f64;
    }

    fn predict_proba(&self, _features: &[f64]) -> f64 {
        self.a_win_rate
    }

    fn name(&self) -> &str {
        "majority"
    }
}
