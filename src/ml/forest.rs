//! Random forest classifier
//!
//! Bagged CART trees split on Gini impurity, with a random subset of
//! candidate features at every node. Trees are grown in parallel; each tree
//! draws its own seed from the forest seed so a fitted forest is fully
//! reproducible.

use crate::error::{FatigueError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Forest hyper-parameters
#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_estimators: usize,
    /// Unlimited when `None`
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Candidate features per split; `None` means floor(sqrt(n_features))
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 300,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Class frequencies of the training samples that reached this leaf
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct TreeParams {
    max_depth: Option<usize>,
    min_samples_split: usize,
    min_samples_leaf: usize,
    max_features: usize,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// Single CART classification tree
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    fn fit<R: Rng>(
        x: &[Vec<f64>],
        y: &[usize],
        samples: Vec<usize>,
        n_classes: usize,
        params: TreeParams,
        rng: &mut R,
    ) -> Self {
        let mut builder = TreeBuilder {
            x,
            y,
            n_classes,
            params,
            nodes: Vec::new(),
        };
        builder.build(samples, 0, rng);
        Self {
            nodes: builder.nodes,
        }
    }

    /// Leaf class distribution for one row
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

struct TreeBuilder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    n_classes: usize,
    params: TreeParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn build<R: Rng>(&mut self, samples: Vec<usize>, depth: usize, rng: &mut R) -> usize {
        let counts = self.class_counts(&samples);
        let node_idx = self.nodes.len();

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let too_small = samples.len() < self.params.min_samples_split
            || samples.len() < 2 * self.params.min_samples_leaf;

        if pure || depth_reached || too_small {
            self.nodes.push(leaf(&counts, samples.len()));
            return node_idx;
        }

        let Some(split) = self.best_split(&samples, rng) else {
            self.nodes.push(leaf(&counts, samples.len()));
            return node_idx;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.x[i][split.feature] <= split.threshold);

        // Reserve the slot, children are appended after it
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let left = self.build(left_samples, depth + 1, rng);
        let right = self.build(right_samples, depth + 1, rng);
        self.nodes[node_idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split<R: Rng>(&self, samples: &[usize], rng: &mut R) -> Option<SplitCandidate> {
        let n_features = self.x[samples[0]].len();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0;
        let mut order = samples.to_vec();

        // Keep drawing past constant features until enough informative ones were tried
        for feature in features {
            if visited >= self.params.max_features {
                break;
            }
            order.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let first = self.x[order[0]][feature];
            let last = self.x[order[order.len() - 1]][feature];
            if first == last {
                continue;
            }
            visited += 1;

            if let Some(candidate) = self.scan_feature(feature, &order) {
                if best.as_ref().map_or(true, |b| candidate.impurity < b.impurity) {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Sweep sorted samples, scoring every threshold between distinct values
    fn scan_feature(&self, feature: usize, order: &[usize]) -> Option<SplitCandidate> {
        let n = order.len();
        let min_leaf = self.params.min_samples_leaf;
        let total = self.class_counts(order);
        let mut left = vec![0usize; self.n_classes];
        let mut best: Option<SplitCandidate> = None;

        for pos in 1..n {
            left[self.y[order[pos - 1]]] += 1;

            let prev = self.x[order[pos - 1]][feature];
            let next = self.x[order[pos]][feature];
            if prev == next || pos < min_leaf || n - pos < min_leaf {
                continue;
            }

            let right: Vec<usize> = total.iter().zip(&left).map(|(t, l)| t - l).collect();
            let impurity = (pos as f64 * gini(&left, pos)
                + (n - pos) as f64 * gini(&right, n - pos))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = prev + (next - prev) / 2.0;
                if threshold >= next {
                    threshold = prev;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }

        best
    }

    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in samples {
            counts[self.y[i]] += 1;
        }
        counts
    }
}

fn leaf(counts: &[usize], total: usize) -> Node {
    let total = total.max(1) as f64;
    Node::Leaf {
        distribution: counts.iter().map(|&c| c as f64 / total).collect(),
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Ensemble of bagged decision trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForest {
    /// Fit on rows `x` with class indices `y` in `0..n_classes`
    pub fn fit(config: ForestConfig, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Result<Self> {
        let first = x.first().ok_or(FatigueError::EmptyDataset)?;
        let n_features = first.len();
        if y.len() != x.len() {
            return Err(FatigueError::DimensionMismatch {
                expected: x.len(),
                actual: y.len(),
            });
        }
        if let Some(row) = x.iter().find(|r| r.len() != n_features) {
            return Err(FatigueError::DimensionMismatch {
                expected: n_features,
                actual: row.len(),
            });
        }
        if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
            return Err(FatigueError::DimensionMismatch {
                expected: n_classes,
                actual: label + 1,
            });
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            min_samples_leaf: config.min_samples_leaf.max(1),
            max_features: config
                .max_features
                .unwrap_or_else(|| (n_features as f64).sqrt().floor() as usize)
                .clamp(1, n_features),
        };

        let mut seeder = StdRng::seed_from_u64(config.seed);
        let seeds: Vec<u64> = (0..config.n_estimators.max(1)).map(|_| seeder.random()).collect();
        let n = x.len();
        let bootstrap = config.bootstrap;

        let trees: Vec<DecisionTree> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut rng = StdRng::seed_from_u64(seed);
                let samples: Vec<usize> = if bootstrap {
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x, y, samples, n_classes, params, &mut rng)
            })
            .collect();

        tracing::debug!(
            trees = trees.len(),
            n_features,
            max_features = params.max_features,
            "Random forest fitted"
        );

        Ok(Self {
            trees,
            n_classes,
            n_features,
        })
    }

    /// Mean of the per-tree leaf distributions
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_features {
            return Err(FatigueError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let mut probs = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, t) in probs.iter_mut().zip(tree.predict_proba(row)) {
                *p += t;
            }
        }
        let n = self.trees.len() as f64;
        probs.iter_mut().for_each(|p| *p /= n);
        Ok(probs)
    }

    /// Most probable class; ties go to the lower index
    pub fn predict(&self, row: &[f64]) -> Result<usize> {
        let probs = self.predict_proba(row)?;
        Ok(argmax(&probs))
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
