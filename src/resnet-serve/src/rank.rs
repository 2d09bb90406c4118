//! Score post-processing: softmax and top-N label ranking.

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::{ClassifyError, Result};

/// A single ranked prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Human-readable class label.
    pub class: String,

    /// Softmax probability of the class.
    pub prob: f32,
}

/// Numerically stable softmax.
///
/// The maximum score is subtracted before exponentiating so large-magnitude
/// inputs cannot overflow to infinity.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    exps.into_iter().map(|e| e / sum).collect()
}

/// Rank the `n` most probable classes.
///
/// The ranking is a stable full sort of indices by descending probability,
/// so classes with exactly equal probability come out in ascending index
/// order. Asking for more classes than the label set holds is an
/// `InvalidArgument` failure, never a silent truncation.
pub fn top_classes(n: usize, probs: &[f32], labels: &[String]) -> Result<Vec<Classification>> {
    if probs.len() != labels.len() {
        return Err(ClassifyError::InvalidArgument(format!(
            "got {} scores for {} labels",
            probs.len(),
            labels.len()
        )));
    }
    if n > labels.len() {
        return Err(ClassifyError::InvalidArgument(format!(
            "requested top {} of {} classes",
            n,
            labels.len()
        )));
    }

    let mut order: Vec<usize> = (0..probs.len()).collect();
    order.sort_by(|&a, &b| probs[b].partial_cmp(&probs[a]).unwrap_or(Ordering::Equal));

    Ok(order[..n]
        .iter()
        .map(|&i| Classification {
            class: labels[i].clone(),
            prob: probs[i],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[0.1, 0.9, 0.05, -3.2]);
        let sum: f32 = probs.iter().sum();

        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| *p >= 0.0 && *p <= 1.0));
    }

    #[test]
    fn softmax_stays_finite_for_large_scores() {
        let probs = softmax(&[1000.0, 1000.0, 1000.0]);

        assert!(probs.iter().all(|p| p.is_finite()));
        for p in &probs {
            assert!((p - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ranking_is_descending_and_argmax_first() {
        let probs = softmax(&[0.3, 2.5, -1.0, 0.7]);
        let ranked = top_classes(4, &probs, &labels(&["a", "b", "c", "d"])).unwrap();

        assert_eq!(ranked[0].class, "b");
        for pair in ranked.windows(2) {
            assert!(pair[0].prob >= pair[1].prob);
        }
    }

    #[test]
    fn equal_probabilities_keep_ascending_index_order() {
        let ranked = top_classes(3, &[0.25, 0.25, 0.5], &labels(&["a", "b", "c"])).unwrap();

        assert_eq!(ranked[0].class, "c");
        assert_eq!(ranked[1].class, "a");
        assert_eq!(ranked[2].class, "b");
    }

    #[test]
    fn top_n_beyond_label_set_is_rejected() {
        let err = top_classes(4, &[0.2, 0.3, 0.5], &labels(&["a", "b", "c"])).unwrap_err();

        match err {
            ClassifyError::InvalidArgument(_) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn score_label_length_mismatch_is_rejected() {
        let err = top_classes(1, &[0.5, 0.5], &labels(&["only"])).unwrap_err();

        match err {
            ClassifyError::InvalidArgument(_) => {}
            other => panic!("expected InvalidArgument, got {:?}", other),
        }
    }
}
