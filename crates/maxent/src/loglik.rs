//! Conditional log-likelihood of a labeled corpus under a log-linear model.
//!
//! With `s(d, c) = Σ_{i ∈ F(d,c)} x[i]`, the model assigns
//! `P(c | d; x) = exp(s(d, c)) / Σ_c' exp(s(d, c'))`. The objective value is
//! `Σ_d log P(gold_d | d; x)`; the gradient handed to the optimizer is that of
//! its negation:
//!
//! ```text
//! r[i] = −numerators[i] + Σ_{(d, c) : i ∈ F(d,c)} P(c | d; x)
//! ```
//!
//! The gradient runs in two parallel passes over the shared worker pool:
//! P(c | d) for contiguous document blocks, then a gather over the inverted
//! index for contiguous feature blocks. Probabilities use log-sum-exp with the
//! per-document maximum subtracted, so large weights do not overflow.
use crate::corpus::{Corpus, Document};
use crate::error::{ConfigError, CorpusError};
use crate::math::ProbabilityMatrix;
use crate::optim::Objective;
use crate::parallel::WorkerPool;

#[derive(Debug, Clone)]
pub struct ConditionalLogLikelihood {
    docs: Vec<Document>,
    feature_map: Vec<String>,
    class_map: Vec<String>,
    /// Occurrences of each feature under the gold class of its document.
    numerators: Vec<f64>,
    /// For each feature, the flat `class * num_docs + doc` keys where it fires.
    inverted: Vec<Vec<usize>>,
    probabilities: ProbabilityMatrix,
    threads: usize,
}

impl ConditionalLogLikelihood {
    pub fn new(corpus: Corpus) -> Self {
        let (docs, feature_map, class_map) = corpus.into_parts();
        let num_docs = docs.len();
        let num_classes = class_map.len();
        let dim = feature_map.len();

        let mut numerators = vec![0.0; dim];
        let mut inverted: Vec<Vec<usize>> = vec![Vec::new(); dim];
        for (d, doc) in docs.iter().enumerate() {
            for &i in doc.features(doc.class()) {
                numerators[i] += 1.0;
            }
            for c in 0..num_classes {
                for &i in doc.features(c) {
                    inverted[i].push(c * num_docs + d);
                }
            }
        }

        log::debug!(
            "Inverted index holds {} (class, document) entries",
            inverted.iter().map(Vec::len).sum::<usize>()
        );

        Self {
            docs,
            feature_map,
            class_map,
            numerators,
            inverted,
            probabilities: ProbabilityMatrix::new(num_classes, num_docs),
            threads: 1,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        Ok(Self::new(Corpus::from_json_str(json)?))
    }

    /// Feature-space dimension.
    pub fn dim(&self) -> usize {
        self.feature_map.len()
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_classes(&self) -> usize {
        self.class_map.len()
    }

    pub fn feature_map(&self) -> &[String] {
        &self.feature_map
    }

    pub fn class_map(&self) -> &[String] {
        &self.class_map
    }

    pub fn feature_name(&self, i: usize) -> Option<&str> {
        self.feature_map.get(i).map(String::as_str)
    }

    pub fn class_name(&self, c: usize) -> Option<&str> {
        self.class_map.get(c).map(String::as_str)
    }

    pub fn numerators(&self) -> &[f64] {
        &self.numerators
    }

    /// Flat `(class, document)` keys at which feature `i` fires, in index order.
    pub fn inverted(&self, i: usize) -> &[usize] {
        &self.inverted[i]
    }

    /// Workers used by [`gradient`](Self::gradient).
    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn set_threads(&mut self, threads: usize) {
        self.threads = threads;
    }

    /// Conditional probabilities cached by the latest gradient evaluation.
    pub fn probabilities(&self) -> &ProbabilityMatrix {
        &self.probabilities
    }

    /// Compute the gradient on a pool of [`threads`](Self::threads) workers.
    pub fn gradient(&mut self, x: &[f64], r: &mut [f64]) -> Result<(), ConfigError> {
        let pool = WorkerPool::new(self.threads)?;
        self.grad(x, r, &pool);
        Ok(())
    }

    fn compute_probabilities(&mut self, x: &[f64], pool: &WorkerPool) {
        let docs = &self.docs;
        let num_classes = self.class_map.len();
        let block_len = pool.block_len(docs.len());
        let blocks = self.probabilities.doc_blocks_mut(block_len);

        pool.for_each(blocks, |mut block| {
            let mut scores = vec![0.0; num_classes];
            for d in block.docs() {
                let log_z = log_partition(&docs[d], x, &mut scores);
                for (c, s) in scores.iter().enumerate() {
                    block.set(c, d, (s - log_z).exp());
                }
            }
        });
    }

    fn gather(&self, r: &mut [f64], pool: &WorkerPool) {
        let numerators = &self.numerators;
        let inverted = &self.inverted;
        let p = self.probabilities.as_slice();

        pool.for_each_block(r, |start, block| {
            for (offset, ri) in block.iter_mut().enumerate() {
                let i = start + offset;
                let mut acc = -numerators[i];
                for &key in &inverted[i] {
                    acc += p[key];
                }
                *ri = acc;
            }
        });
    }
}

/// Fill `scores[c]` with s(d, c) and return log Σ_c exp(s(d, c)).
fn log_partition(doc: &Document, x: &[f64], scores: &mut [f64]) -> f64 {
    let mut max = f64::NEG_INFINITY;
    for (c, s) in scores.iter_mut().enumerate() {
        *s = doc.features(c).iter().map(|&i| x[i]).sum();
        max = max.max(*s);
    }
    let sum: f64 = scores.iter().map(|s| (s - max).exp()).sum();
    max + sum.ln()
}

impl Objective for ConditionalLogLikelihood {
    fn value(&self, x: &[f64]) -> f64 {
        let mut scores = vec![0.0; self.class_map.len()];
        self.docs
            .iter()
            .map(|doc| {
                let log_z = log_partition(doc, x, &mut scores);
                scores[doc.class()] - log_z
            })
            .sum()
    }

    fn grad(&mut self, x: &[f64], r: &mut [f64], pool: &WorkerPool) {
        debug_assert_eq!(x.len(), self.dim());
        debug_assert_eq!(r.len(), self.dim());
        self.compute_probabilities(x, pool);
        log::trace!("Probability matrix filled for {} documents", self.docs.len());
        self.gather(r, pool);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_WAY: &str = r#"[
        {"A": ["a"], "B": ["b"], "__label__": "A"},
        {"A": ["b"], "B": ["a"], "__label__": "B"}
    ]"#;

    #[test]
    fn precomputed_tables() {
        let objective = ConditionalLogLikelihood::from_json_str(TWO_WAY).unwrap();
        assert_eq!(objective.dim(), 2);
        // "a" fires for the gold class of both documents, "b" for neither.
        assert_eq!(objective.numerators(), &[2.0, 0.0]);
        // keys are class * 2 + doc
        assert_eq!(objective.inverted(0), &[0, 3]);
        assert_eq!(objective.inverted(1), &[2, 1]);
    }

    #[test]
    fn duplicate_features_count_twice() {
        let json = r#"[{"A": ["a", "a"], "B": ["a"], "__label__": "A"}]"#;
        let mut objective = ConditionalLogLikelihood::from_json_str(json).unwrap();
        assert_eq!(objective.numerators(), &[2.0]);
        assert_eq!(objective.inverted(0), &[0, 0, 1]);

        let x = [0.5];
        let mut r = [0.0];
        objective.gradient(&x, &mut r).unwrap();
        let p_a = 1.0_f64.exp() / (1.0_f64.exp() + 0.5_f64.exp());
        let expected = -2.0 + 2.0 * p_a + (1.0 - p_a);
        assert!((r[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn value_at_origin_is_uniform() {
        let objective = ConditionalLogLikelihood::from_json_str(TWO_WAY).unwrap();
        let expected = 2.0 * 0.5_f64.ln();
        assert!((objective.value(&[0.0, 0.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn gradient_at_origin() {
        let mut objective = ConditionalLogLikelihood::from_json_str(TWO_WAY).unwrap();
        let mut r = [0.0; 2];
        objective.gradient(&[0.0, 0.0], &mut r).unwrap();
        assert!((r[0] + 1.0).abs() < 1e-12);
        assert!((r[1] - 1.0).abs() < 1e-12);
        assert!((objective.probabilities().get(0, 0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn large_weights_stay_finite() {
        let mut objective = ConditionalLogLikelihood::from_json_str(TWO_WAY).unwrap();
        let x = [900.0, -900.0];
        let mut r = [0.0; 2];
        objective.gradient(&x, &mut r).unwrap();
        assert!(r.iter().all(|v| v.is_finite()));
        assert!(r[0].abs() < 1e-12 && r[1].abs() < 1e-12);
        assert!(objective.value(&x).is_finite());
    }
}
