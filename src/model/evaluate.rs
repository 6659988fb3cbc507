//! Classifier scoring on held-out rows.

use super::Classifier;
use crate::dataset::MatchRow;

/// Accuracy and calibration of a classifier on a set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub classifier: String,
    pub samples: usize,
    /// Share of rows where the predicted winner won.
    pub accuracy: f64,
    /// Brier = (1/N) * Σ(predicted - outcome)²
    /// Lower is better. 0.0 = perfect, 0.25 = coin flip.
    pub brier: f64,
    /// Rows where team A won.
    pub a_win_rate: f64,
}

pub fn evaluate<C: Classifier + ?Sized>(classifier: &C, rows: &[MatchRow]) -> EvaluationReport {
    if rows.is_empty() {
        return EvaluationReport {
            classifier: classifier.name().to_string(),
            samples: 0,
            accuracy: 0.0,
            brier: 0.0,
            a_win_rate: 0.0,
        };
    }

    let mut correct = 0usize;
    let mut brier_sum = 0.0_f64;
    let mut a_wins = 0usize;

    for row in rows {
        let features = row.features();
        let p = classifier.predict_proba(&features);
        let outcome = f64::from(row.result);
        if classifier.predict(&features) == row.result {
            correct += 1;
        }
        if row.result == 1 {
            a_wins += 1;
        }
        brier_sum += (p - outcome).powi(2);
    }

    let n = rows.len() as f64;
    EvaluationReport {
        classifier: classifier.name().to_string(),
        samples: rows.len(),
        accuracy: correct as f64 / n,
        brier: brier_sum / n,
        a_win_rate: a_wins as f64 / n,
    }
}
