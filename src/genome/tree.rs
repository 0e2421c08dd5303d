//! Tree genomes for genetic programming
//!
//! Expression trees whose internal nodes reference a [`PrimitiveSet`] by tag
//! and whose leaves are input variables or ephemeral constants. Depth is
//! counted in edges: a lone leaf has depth 0.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::primitives::{PrimitiveId, PrimitiveSet, Terminal};
use crate::genome::traits::EvolutionaryGenome;

/// A node in a GP tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf
    Terminal(Terminal),
    /// Internal node applying a registered primitive to its children
    Function(PrimitiveId, Vec<TreeNode>),
}

impl TreeNode {
    /// Create a variable leaf
    pub fn variable(index: usize) -> Self {
        Self::Terminal(Terminal::Variable(index))
    }

    /// Create a constant leaf
    pub fn constant(value: f64) -> Self {
        Self::Terminal(Terminal::Erc(value))
    }

    /// Create a function node
    pub fn function(id: PrimitiveId, children: Vec<Self>) -> Self {
        Self::Function(id, children)
    }

    /// Check if this is a leaf
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Depth of this subtree in edges
    pub fn depth(&self) -> usize {
        match self {
            Self::Terminal(_) => 0,
            Self::Function(_, children) => {
                1 + children.iter().map(|c| c.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Number of nodes in this subtree
    pub fn size(&self) -> usize {
        match self {
            Self::Terminal(_) => 1,
            Self::Function(_, children) => 1 + children.iter().map(|c| c.size()).sum::<usize>(),
        }
    }

    /// All node paths in preorder; the root is the empty path
    pub fn positions(&self) -> Vec<Vec<usize>> {
        let mut positions = Vec::with_capacity(self.size());
        self.collect_positions(&mut Vec::new(), &mut positions);
        positions
    }

    fn collect_positions(&self, path: &mut Vec<usize>, positions: &mut Vec<Vec<usize>>) {
        positions.push(path.clone());
        if let Self::Function(_, children) = self {
            for (i, child) in children.iter().enumerate() {
                path.push(i);
                child.collect_positions(path, positions);
                path.pop();
            }
        }
    }

    /// Get the subtree at the given path
    pub fn get_subtree(&self, path: &[usize]) -> Option<&Self> {
        match (path.split_first(), self) {
            (None, _) => Some(self),
            (Some((&idx, rest)), Self::Function(_, children)) => {
                children.get(idx).and_then(|c| c.get_subtree(rest))
            }
            (Some(_), Self::Terminal(_)) => None,
        }
    }

    /// Replace the subtree at the given path, returning the old subtree
    pub fn replace_subtree(&mut self, path: &[usize], new_subtree: Self) -> Option<Self> {
        match path.split_first() {
            None => Some(std::mem::replace(self, new_subtree)),
            Some((&idx, rest)) => match self {
                Self::Function(_, children) => children
                    .get_mut(idx)
                    .and_then(|c| c.replace_subtree(rest, new_subtree)),
                Self::Terminal(_) => None,
            },
        }
    }

    fn evaluate(&self, primitives: &PrimitiveSet, inputs: &[f64]) -> f64 {
        match self {
            Self::Terminal(Terminal::Variable(i)) => inputs.get(*i).copied().unwrap_or(0.0),
            Self::Terminal(Terminal::Erc(c)) => *c,
            Self::Function(id, children) => {
                let args: Vec<f64> = children
                    .iter()
                    .map(|c| c.evaluate(primitives, inputs))
                    .collect();
                primitives
                    .get(*id)
                    .map_or(f64::NAN, |primitive| primitive.apply(&args))
            }
        }
    }

    fn validate(&self, primitives: &PrimitiveSet) -> Result<(), GenomeError> {
        match self {
            Self::Terminal(Terminal::Variable(i)) if *i >= primitives.num_inputs() => {
                Err(GenomeError::InvalidStructure(format!(
                    "variable {} out of range for {} inputs",
                    i,
                    primitives.num_inputs()
                )))
            }
            Self::Terminal(_) => Ok(()),
            Self::Function(id, children) => {
                let primitive = primitives
                    .get(*id)
                    .ok_or(GenomeError::UnknownPrimitive(id.0))?;
                if primitive.arity != children.len() {
                    return Err(GenomeError::ArityMismatch {
                        primitive: primitive.name.clone(),
                        expected: primitive.arity,
                        actual: children.len(),
                    });
                }
                children.iter().try_for_each(|c| c.validate(primitives))
            }
        }
    }

    fn write_expr(&self, primitives: &PrimitiveSet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(t) => write!(f, "{}", primitives.terminal_name(t)),
            Self::Function(id, children) => {
                match primitives.get(*id) {
                    Some(p) => write!(f, "{}(", p.name)?,
                    None => write!(f, "#{}(", id.0)?,
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    child.write_expr(primitives, f)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Expression tree genome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeGenome {
    /// Root node of the tree
    pub root: TreeNode,
}

impl TreeGenome {
    /// Wrap a root node
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Depth of the tree in edges
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of nodes in the tree
    pub fn size(&self) -> usize {
        self.root.size()
    }

    /// Evaluate the tree against one sample of input values.
    ///
    /// Every registered primitive is total, so the result is a plain number;
    /// it may still be non-finite when intermediate values overflow. A tag
    /// missing from `primitives` evaluates to NaN.
    pub fn evaluate(&self, primitives: &PrimitiveSet, inputs: &[f64]) -> f64 {
        self.root.evaluate(primitives, inputs)
    }

    /// Check every node against the registry: known tags, matching arity,
    /// variables within the input count.
    pub fn validate(&self, primitives: &PrimitiveSet) -> Result<(), GenomeError> {
        self.root.validate(primitives)
    }

    /// Render as a nested call expression, e.g. `add(mul(x, 0.25), x)`
    pub fn display<'a>(&'a self, primitives: &'a PrimitiveSet) -> impl fmt::Display + 'a {
        ExpressionDisplay {
            node: &self.root,
            primitives,
        }
    }

    /// Grow a tree where every leaf sits at the same depth, drawn uniformly
    /// from `[min_depth, max_depth]`.
    pub fn generate_full<R: Rng>(
        rng: &mut R,
        primitives: &PrimitiveSet,
        min_depth: usize,
        max_depth: usize,
    ) -> Self {
        let height = rng.gen_range(min_depth..=max_depth.max(min_depth));
        Self::new(Self::full_node(rng, primitives, height, 0))
    }

    fn full_node<R: Rng>(
        rng: &mut R,
        primitives: &PrimitiveSet,
        height: usize,
        depth: usize,
    ) -> TreeNode {
        if depth >= height {
            return TreeNode::Terminal(primitives.random_terminal(rng));
        }
        let id = primitives.random_primitive(rng);
        let arity = primitives.arity(id).unwrap_or(0);
        let children = (0..arity)
            .map(|_| Self::full_node(rng, primitives, height, depth + 1))
            .collect();
        TreeNode::Function(id, children)
    }

    /// Grow a tree whose branches stop independently. A target depth is
    /// drawn from `[min_depth, max_depth]`; below `min_depth` branches always
    /// continue, and past it each node becomes a leaf with probability
    /// rising linearly until the target depth forces one.
    pub fn generate_grow<R: Rng>(
        rng: &mut R,
        primitives: &PrimitiveSet,
        min_depth: usize,
        max_depth: usize,
    ) -> Self {
        let height = rng.gen_range(min_depth..=max_depth.max(min_depth));
        Self::new(Self::grow_node(rng, primitives, min_depth, height, 0))
    }

    fn grow_node<R: Rng>(
        rng: &mut R,
        primitives: &PrimitiveSet,
        min_depth: usize,
        height: usize,
        depth: usize,
    ) -> TreeNode {
        let stop = if depth >= height {
            true
        } else if depth < min_depth {
            false
        } else {
            let span = (height - min_depth + 1) as f64;
            let p = (depth - min_depth + 1) as f64 / span;
            rng.gen::<f64>() < p.max(primitives.terminal_ratio())
        };
        if stop {
            return TreeNode::Terminal(primitives.random_terminal(rng));
        }
        let id = primitives.random_primitive(rng);
        let arity = primitives.arity(id).unwrap_or(0);
        let children = (0..arity)
            .map(|_| Self::grow_node(rng, primitives, min_depth, height, depth + 1))
            .collect();
        TreeNode::Function(id, children)
    }

    /// Pick full or grow with equal odds
    pub fn generate_half_and_half<R: Rng>(
        rng: &mut R,
        primitives: &PrimitiveSet,
        min_depth: usize,
        max_depth: usize,
    ) -> Self {
        if rng.gen() {
            Self::generate_full(rng, primitives, min_depth, max_depth)
        } else {
            Self::generate_grow(rng, primitives, min_depth, max_depth)
        }
    }

    /// A node path drawn uniformly over all nodes, root included
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        let mut positions = self.root.positions();
        let idx = rng.gen_range(0..positions.len());
        positions.swap_remove(idx)
    }

    /// A node path drawn uniformly over all nodes except the root, or `None`
    /// for a single-leaf tree
    pub fn random_branch_position<R: Rng>(&self, rng: &mut R) -> Option<Vec<usize>> {
        let mut positions = self.root.positions();
        if positions.len() < 2 {
            return None;
        }
        let idx = rng.gen_range(1..positions.len());
        Some(positions.swap_remove(idx))
    }
}

struct ExpressionDisplay<'a> {
    node: &'a TreeNode,
    primitives: &'a PrimitiveSet,
}

impl fmt::Display for ExpressionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.write_expr(self.primitives, f)
    }
}

impl EvolutionaryGenome for TreeGenome {
    type Allele = TreeNode;

    fn dimension(&self) -> usize {
        self.size()
    }
}
