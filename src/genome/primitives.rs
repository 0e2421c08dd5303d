//! Primitive registry for expression trees
//!
//! A `PrimitiveSet` is a lookup table from a numeric tag to an operator with
//! a fixed arity and a total evaluation rule. Trees store only the tag, so
//! evaluation is a table dispatch rather than anything late-bound.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, GenomeError};
use crate::genome::bounds::Bounds;

/// Evaluation rule of a primitive. Must return a value for every input.
pub type PrimitiveFn = fn(&[f64]) -> f64;

/// Division that yields 1 when the divisor is zero
pub fn safe_div(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        1.0
    } else {
        x / y
    }
}

/// Natural logarithm that yields 0 for non-positive input
pub fn safe_log(x: f64) -> f64 {
    if x > 0.0 {
        x.ln()
    } else {
        0.0
    }
}

fn add(args: &[f64]) -> f64 {
    args[0] + args[1]
}

fn sub(args: &[f64]) -> f64 {
    args[0] - args[1]
}

fn mul(args: &[f64]) -> f64 {
    args[0] * args[1]
}

fn neg(args: &[f64]) -> f64 {
    -args[0]
}

fn protected_div(args: &[f64]) -> f64 {
    safe_div(args[0], args[1])
}

fn protected_log(args: &[f64]) -> f64 {
    safe_log(args[0])
}

/// Tag identifying a primitive inside its registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(pub usize);

/// An operator available to internal tree nodes
#[derive(Clone)]
pub struct Primitive {
    /// Display name, unique within a set
    pub name: String,
    /// Number of children a node using this primitive must have
    pub arity: usize,
    func: PrimitiveFn,
}

impl Primitive {
    /// Apply the evaluation rule. `args.len()` must equal `arity`.
    pub fn apply(&self, args: &[f64]) -> f64 {
        (self.func)(args)
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A leaf value chosen when a tree is grown
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Terminal {
    /// Input variable by position
    Variable(usize),
    /// Ephemeral random constant, fixed when the leaf was created
    Erc(f64),
}

/// Registry of operators, input variables and the ephemeral constant range
#[derive(Clone, Debug)]
pub struct PrimitiveSet {
    primitives: Vec<Primitive>,
    variables: Vec<String>,
    erc: Option<Bounds>,
}

impl PrimitiveSet {
    /// Create an empty set with `num_inputs` variables named `ARG0`, `ARG1`, ...
    pub fn new(num_inputs: usize) -> Self {
        Self {
            primitives: Vec::new(),
            variables: (0..num_inputs).map(|i| format!("ARG{}", i)).collect(),
            erc: None,
        }
    }

    /// The arithmetic set used for traffic-count regression: add, sub, mul,
    /// neg, guarded division and guarded logarithm, plus ephemeral constants
    /// in [-0.5, 0.5].
    pub fn arithmetic(num_inputs: usize) -> Self {
        let mut set = Self::new(num_inputs);
        let ops: [(&str, usize, PrimitiveFn); 6] = [
            ("add", 2, add),
            ("sub", 2, sub),
            ("mul", 2, mul),
            ("neg", 1, neg),
            ("safe_div", 2, protected_div),
            ("safe_log", 1, protected_log),
        ];
        for (name, arity, func) in ops {
            set.primitives.push(Primitive {
                name: name.to_string(),
                arity,
                func,
            });
        }
        set.erc = Some(Bounds::new(-0.5, 0.5));
        set
    }

    /// Register a primitive. Arity zero and duplicate names are rejected.
    pub fn add_primitive(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        func: PrimitiveFn,
    ) -> Result<PrimitiveId, EvolutionError> {
        let name = name.into();
        if arity == 0 {
            return Err(EvolutionError::Configuration(format!(
                "primitive '{}' must take at least one argument",
                name
            )));
        }
        if self.primitives.iter().any(|p| p.name == name) {
            return Err(EvolutionError::Configuration(format!(
                "primitive '{}' registered twice",
                name
            )));
        }
        self.primitives.push(Primitive { name, arity, func });
        Ok(PrimitiveId(self.primitives.len() - 1))
    }

    /// Enable ephemeral constants drawn uniformly from `[min, max]`
    pub fn with_ephemeral_constant(mut self, min: f64, max: f64) -> Result<Self, EvolutionError> {
        self.erc = Some(Bounds::try_new(min, max)?);
        Ok(self)
    }

    /// Rename an input variable
    pub fn rename_argument(&mut self, index: usize, name: impl Into<String>) -> Result<(), EvolutionError> {
        let slot = self.variables.get_mut(index).ok_or_else(|| {
            EvolutionError::Configuration(format!("no input variable at position {}", index))
        })?;
        *slot = name.into();
        Ok(())
    }

    /// Check that the registry can build trees
    pub fn validate(&self) -> Result<(), EvolutionError> {
        if self.primitives.is_empty() {
            return Err(EvolutionError::Configuration(
                "primitive set has no operators".to_string(),
            ));
        }
        if self.variables.is_empty() && self.erc.is_none() {
            return Err(EvolutionError::Configuration(
                "primitive set has no terminals".to_string(),
            ));
        }
        if let Some(p) = self.primitives.iter().find(|p| p.arity == 0) {
            return Err(EvolutionError::Configuration(format!(
                "primitive '{}' has arity 0",
                p.name
            )));
        }
        Ok(())
    }

    /// Look up a primitive by tag
    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    /// Look up a primitive tag by name
    pub fn id_of(&self, name: &str) -> Option<PrimitiveId> {
        self.primitives
            .iter()
            .position(|p| p.name == name)
            .map(PrimitiveId)
    }

    /// Arity of a primitive, checked against the registry
    pub fn arity(&self, id: PrimitiveId) -> Result<usize, GenomeError> {
        self.get(id)
            .map(|p| p.arity)
            .ok_or(GenomeError::UnknownPrimitive(id.0))
    }

    /// All registered primitives in tag order
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Names of the input variables
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of input variables
    pub fn num_inputs(&self) -> usize {
        self.variables.len()
    }

    /// Ephemeral constant range, if enabled
    pub fn erc_range(&self) -> Option<Bounds> {
        self.erc
    }

    /// Ratio of terminal kinds to all node kinds
    pub fn terminal_ratio(&self) -> f64 {
        let terminals = self.variables.len() + usize::from(self.erc.is_some());
        terminals as f64 / (terminals + self.primitives.len()) as f64
    }

    /// Pick a primitive uniformly
    pub fn random_primitive<R: Rng>(&self, rng: &mut R) -> PrimitiveId {
        PrimitiveId(rng.gen_range(0..self.primitives.len()))
    }

    /// Pick a leaf: a variable or a fresh ephemeral constant with equal odds
    /// when both are available.
    pub fn random_terminal<R: Rng>(&self, rng: &mut R) -> Terminal {
        match (self.variables.is_empty(), self.erc) {
            (false, Some(range)) => {
                if rng.gen::<bool>() {
                    Terminal::Variable(rng.gen_range(0..self.variables.len()))
                } else {
                    Terminal::Erc(range.sample(rng))
                }
            }
            (false, None) => Terminal::Variable(rng.gen_range(0..self.variables.len())),
            (true, Some(range)) => Terminal::Erc(range.sample(rng)),
            // validate() rules this out; fall back to a neutral constant
            (true, None) => Terminal::Erc(0.0),
        }
    }

    /// Display name for a terminal
    pub fn terminal_name(&self, terminal: &Terminal) -> String {
        match terminal {
            Terminal::Variable(i) => self
                .variables
                .get(*i)
                .cloned()
                .unwrap_or_else(|| format!("ARG{}", i)),
            Terminal::Erc(c) => format!("{}", c),
        }
    }
}
