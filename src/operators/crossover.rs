//! Crossover operators
//!
//! Blend crossover for real vectors and one-point subtree exchange for
//! expression trees.

use rand::Rng;

use crate::error::{OperatorError, OperatorResult};
use crate::genome::real_vector::RealVector;
use crate::genome::traits::{EvolutionaryGenome, RealValuedGenome};
use crate::genome::tree::TreeGenome;
use crate::operators::traits::CrossoverOperator;

/// Blend crossover
///
/// For every gene a factor `γ` is drawn uniformly from `[-α, 1 + α]` and the
/// children become `(1 - γ)·a + γ·b` and `γ·a + (1 - γ)·b`. Children may land
/// outside the parents' interval and are not clamped.
#[derive(Clone, Debug)]
pub struct BlendCrossover {
    /// Extension factor (typically 0.5)
    pub alpha: f64,
}

impl BlendCrossover {
    /// Create a new blend crossover
    pub fn new(alpha: f64) -> Self {
        assert!(alpha >= 0.0, "Alpha must be non-negative");
        Self { alpha }
    }
}

impl Default for BlendCrossover {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CrossoverOperator<RealVector> for BlendCrossover {
    fn crossover<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<(RealVector, RealVector)> {
        if parent1.dimension() != parent2.dimension() {
            return OperatorResult::Failed(OperatorError::CrossoverFailed(format!(
                "parent dimensions differ: {} vs {}",
                parent1.dimension(),
                parent2.dimension()
            )));
        }

        let (child1, child2): (Vec<f64>, Vec<f64>) = parent1
            .genes()
            .iter()
            .zip(parent2.genes())
            .map(|(&a, &b)| {
                let gamma = (1.0 + 2.0 * self.alpha) * rng.gen::<f64>() - self.alpha;
                ((1.0 - gamma) * a + gamma * b, gamma * a + (1.0 - gamma) * b)
            })
            .unzip();

        OperatorResult::Success((RealVector::new(child1), RealVector::new(child2)))
    }
}

/// One-point subtree crossover
///
/// Picks one non-root node in each parent and swaps the subtrees rooted
/// there. If either parent is a single leaf the parents are returned
/// unchanged.
#[derive(Clone, Debug, Default)]
pub struct OnePointSubtreeCrossover;

impl OnePointSubtreeCrossover {
    /// Create a new subtree crossover
    pub fn new() -> Self {
        Self
    }
}

impl CrossoverOperator<TreeGenome> for OnePointSubtreeCrossover {
    fn crossover<R: Rng>(
        &self,
        parent1: &TreeGenome,
        parent2: &TreeGenome,
        rng: &mut R,
    ) -> OperatorResult<(TreeGenome, TreeGenome)> {
        let mut child1 = parent1.clone();
        let mut child2 = parent2.clone();

        let (Some(pos1), Some(pos2)) = (
            parent1.random_branch_position(rng),
            parent2.random_branch_position(rng),
        ) else {
            return OperatorResult::Success((child1, child2));
        };

        let (Some(sub1), Some(sub2)) = (
            parent1.root.get_subtree(&pos1),
            parent2.root.get_subtree(&pos2),
        ) else {
            return OperatorResult::Failed(OperatorError::CrossoverFailed(
                "crossover point outside tree".to_string(),
            ));
        };

        child1.root.replace_subtree(&pos1, sub2.clone());
        child2.root.replace_subtree(&pos2, sub1.clone());

        OperatorResult::Success((child1, child2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::primitives::PrimitiveSet;
    use crate::genome::tree::TreeNode;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_blend_children_sum_matches_parents() {
        // (1-γ)a + γb + γa + (1-γ)b = a + b for every gene
        let mut rng = StdRng::seed_from_u64(12);
        let a = RealVector::new(vec![0.1, 0.9, 0.5, 0.0]);
        let b = RealVector::new(vec![0.7, 0.2, 0.5, 1.0]);

        let (c1, c2) = BlendCrossover::default()
            .crossover(&a, &b, &mut rng)
            .genome()
            .unwrap();

        for i in 0..4 {
            assert_relative_eq!(c1[i] + c2[i], a[i] + b[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_blend_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = RealVector::new(vec![0.0]);
        let b = RealVector::new(vec![1.0]);
        let blend = BlendCrossover::new(0.5);

        for _ in 0..500 {
            let (c1, c2) = blend.crossover(&a, &b, &mut rng).genome().unwrap();
            for child in [c1, c2] {
                assert!(child[0] >= -0.5 - 1e-12 && child[0] <= 1.5 + 1e-12);
            }
        }
    }

    #[test]
    fn test_blend_identical_parents() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = RealVector::new(vec![0.3, 0.4]);
        let (c1, c2) = BlendCrossover::default()
            .crossover(&a, &a, &mut rng)
            .genome()
            .unwrap();
        for i in 0..2 {
            assert_relative_eq!(c1[i], a[i], epsilon = 1e-12);
            assert_relative_eq!(c2[i], a[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_blend_dimension_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = RealVector::new(vec![0.0, 1.0]);
        let b = RealVector::new(vec![0.0]);
        assert!(!BlendCrossover::default().crossover(&a, &b, &mut rng).is_ok());
    }

    #[test]
    fn test_subtree_crossover_preserves_validity_and_size() {
        let set = PrimitiveSet::arithmetic(1);
        let mut rng = StdRng::seed_from_u64(99);
        let crossover = OnePointSubtreeCrossover::new();

        for _ in 0..200 {
            let p1 = TreeGenome::generate_half_and_half(&mut rng, &set, 1, 3);
            let p2 = TreeGenome::generate_half_and_half(&mut rng, &set, 1, 3);
            let (c1, c2) = crossover.crossover(&p1, &p2, &mut rng).genome().unwrap();

            assert!(c1.validate(&set).is_ok());
            assert!(c2.validate(&set).is_ok());
            assert_eq!(c1.size() + c2.size(), p1.size() + p2.size());
        }
    }

    #[test]
    fn test_subtree_crossover_leaf_parent_unchanged() {
        let set = PrimitiveSet::arithmetic(1);
        let mut rng = StdRng::seed_from_u64(1);
        let leaf = TreeGenome::new(TreeNode::variable(0));
        let other = TreeGenome::generate_full(&mut rng, &set, 2, 2);

        let (c1, c2) = OnePointSubtreeCrossover::new()
            .crossover(&leaf, &other, &mut rng)
            .genome()
            .unwrap();
        assert_eq!(c1, leaf);
        assert_eq!(c2, other);
    }

    #[test]
    fn test_subtree_crossover_leaves_parents_intact() {
        let set = PrimitiveSet::arithmetic(1);
        let mut rng = StdRng::seed_from_u64(4);
        let p1 = TreeGenome::generate_full(&mut rng, &set, 3, 3);
        let p2 = TreeGenome::generate_full(&mut rng, &set, 3, 3);
        let (before1, before2) = (p1.clone(), p2.clone());

        let _ = OnePointSubtreeCrossover::new().crossover(&p1, &p2, &mut rng);
        assert_eq!(p1, before1);
        assert_eq!(p2, before2);
    }
}
