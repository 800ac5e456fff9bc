use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Fraction of class-1 training cases that reached this leaf
        p_one: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Binary CART tree grown with Gini impurity.
///
/// Cases with `x[feature] <= threshold` go left. At every node variables are
/// visited in random order until `max_features` of them have offered a valid
/// split; variables that are constant within the node do not count.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    max_depth: usize,
    max_features: usize,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

fn gini(ones: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = ones as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

impl DecisionTree {
    pub fn new(max_depth: usize, max_features: usize) -> Self {
        Self {
            nodes: Vec::new(),
            max_depth,
            max_features: max_features.max(1),
        }
    }

    /// Grow the tree on the cases listed in `samples` (repeats allowed, as in
    /// a bootstrap draw).
    pub fn fit<R: Rng>(
        &mut self,
        data: &[f64],
        labels: &[u8],
        n_vars: usize,
        samples: Vec<usize>,
        rng: &mut R,
    ) {
        self.nodes.clear();
        if samples.is_empty() {
            self.nodes.push(Node::Leaf { p_one: 0.0 });
            return;
        }
        self.grow(data, labels, n_vars, samples, 0, rng);
    }

    /// Probability of class 1 for a single case.
    pub fn predict_proba_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Leaf { p_one }) => return *p_one,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
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

    fn grow<R: Rng>(
        &mut self,
        data: &[f64],
        labels: &[u8],
        n_vars: usize,
        samples: Vec<usize>,
        depth: usize,
        rng: &mut R,
    ) -> usize {
        let n = samples.len();
        let ones = samples.iter().filter(|&&i| labels[i] == 1).count();
        let node_idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            p_one: ones as f64 / n as f64,
        });

        if depth >= self.max_depth || n < 2 || ones == 0 || ones == n {
            return node_idx;
        }

        let Some(best) = self.best_split(data, labels, n_vars, &samples, rng) else {
            return node_idx;
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| data[i * n_vars + best.feature] <= best.threshold);

        let left = self.grow(data, labels, n_vars, left_samples, depth + 1, rng);
        let right = self.grow(data, labels, n_vars, right_samples, depth + 1, rng);
        self.nodes[node_idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn best_split<R: Rng>(
        &self,
        data: &[f64],
        labels: &[u8],
        n_vars: usize,
        samples: &[usize],
        rng: &mut R,
    ) -> Option<BestSplit> {
        let n = samples.len();
        let total_ones = samples.iter().filter(|&&i| labels[i] == 1).count();
        let mut features: Vec<usize> = (0..n_vars).collect();
        features.shuffle(rng);
        let mut visited = 0;
        let mut best: Option<BestSplit> = None;

        let mut order: Vec<(f64, u8)> = Vec::with_capacity(n);
        for feature in features {
            if visited >= self.max_features {
                break;
            }
            order.clear();
            order.extend(
                samples
                    .iter()
                    .map(|&i| (data[i * n_vars + feature], labels[i])),
            );
            order.sort_by(|a, b| a.0.total_cmp(&b.0));
            if order[0].0 >= order[n - 1].0 {
                continue;
            }
            visited += 1;

            let mut left_ones = 0;
            for k in 0..n - 1 {
                left_ones += usize::from(order[k].1);
                let (lo, hi) = (order[k].0, order[k + 1].0);
                if lo >= hi {
                    continue;
                }

                let n_left = k + 1;
                let n_right = n - n_left;
                let impurity = (n_left as f64 * gini(left_ones, n_left)
                    + n_right as f64 * gini(total_ones - left_ones, n_right))
                    / n as f64;

                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    let mut threshold = 0.5 * (lo + hi);
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }

        best
    }
}
