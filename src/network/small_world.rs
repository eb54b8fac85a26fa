//! Watts-Strogatz style small-world topology over node indices.

use std::collections::BTreeSet;

use rand::Rng;

/// Uniform draws tried before falling back to scanning every node.
const REWIRE_ATTEMPTS: usize = 32;

/// Small-world generator parameters.
///
/// Each node is first linked to its `degree / 2` clockwise neighbours on a
/// ring. Every lattice link is then rewired to a uniformly chosen new target
/// with probability `beta`. With `symmetric` set, every link is emitted in
/// both directions and rewiring moves both directions together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmallWorld {
    pub degree: usize,
    pub beta: f64,
    pub symmetric: bool,
}

impl Default for SmallWorld {
    fn default() -> Self {
        Self {
            degree: 2,
            beta: 0.1,
            symmetric: true,
        }
    }
}

impl SmallWorld {
    pub fn new(degree: usize, beta: f64, symmetric: bool) -> Self {
        Self {
            degree,
            beta,
            symmetric,
        }
    }

    fn key(&self, a: usize, b: usize) -> (usize, usize) {
        if self.symmetric { (a.min(b), a.max(b)) } else { (a, b) }
    }

    /// Uniform new target for `source` that is neither `source` nor already
    /// linked to it. Rejection sampling first; a full scan only when the node
    /// is nearly saturated.
    fn rewire_target<R: Rng + ?Sized>(
        &self,
        n: usize,
        source: usize,
        present: &BTreeSet<(usize, usize)>,
        rng: &mut R,
    ) -> Option<usize> {
        let free = |k: usize| k != source && !present.contains(&self.key(source, k));
        for _ in 0..REWIRE_ATTEMPTS {
            let k = rng.random_range(0..n);
            if free(k) {
                return Some(k);
            }
        }
        let candidates: Vec<usize> = (0..n).filter(|&k| free(k)).collect();
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        }
    }

    /// Generates directed edges over nodes `0..n`.
    ///
    /// Never produces self-loops or duplicate edges. Fewer than two nodes
    /// yield no edges.
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<(usize, usize)> {
        if n < 2 {
            return Vec::new();
        }
        let half = self.degree / 2;

        let mut links: Vec<(usize, usize)> = Vec::with_capacity(n * half);
        let mut present: BTreeSet<(usize, usize)> = BTreeSet::new();
        for i in 0..n {
            for j in 1..=half {
                let t = (i + j) % n;
                if t != i && present.insert(self.key(i, t)) {
                    links.push((i, t));
                }
            }
        }

        for link in &mut links {
            if rng.random::<f64>() >= self.beta {
                continue;
            }
            let (source, old_target) = *link;
            let Some(new_target) = self.rewire_target(n, source, &present, rng) else {
                continue;
            };
            present.remove(&self.key(source, old_target));
            present.insert(self.key(source, new_target));
            *link = (source, new_target);
        }

        let mut edges = Vec::with_capacity(if self.symmetric { 2 * links.len() } else { links.len() });
        for (a, b) in links {
            edges.push((a, b));
            if self.symmetric {
                edges.push((b, a));
            }
        }
        edges
    }
}
