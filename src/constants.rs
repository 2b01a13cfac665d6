//! Centralized constants for percevo evolution parameters.
//!
//! All default parameters are defined here with the `PERCEVO_` prefix, and are picked up by
//! [crate::config::PopulationConfig::default].

// ============================================================================
// Population Parameters
// ============================================================================

/// Number of agents alive in every generation
pub const PERCEVO_MAX_POPULATION: usize = 50;

/// Number of top ranked agents carried over unchanged into the next generation
pub const PERCEVO_KEEP_BEST: usize = 10;

// ============================================================================
// Topology Parameters
// ============================================================================

/// Number of sensory inputs, not counting the bias
pub const PERCEVO_SENSORY: usize = 4;

/// Number of output units for the single output variant
pub const PERCEVO_SINGLE_ACTION: usize = 1;

/// Number of output units for the multi output variant
pub const PERCEVO_MULTI_ACTION: usize = 3;

/// Bound of the uniform distribution fresh weights are drawn from, as `[-x, x]`
pub const PERCEVO_WEIGHT_INIT_BOUND: f64 = 1.0;

/// Constant input fed to the bias weight
pub const PERCEVO_BIAS_INPUT: f64 = 1.0;

// ============================================================================
// Mutation Parameters
// ============================================================================

/// Bound of a single weight perturbation, as `[-x, x]`
pub const PERCEVO_MUTATION_RATE: f64 = 0.1;

/// Probability that any given weight is perturbed, single output variant
pub const PERCEVO_SINGLE_MUTATION_PROB: f64 = 0.02;

/// Probability that any given weight is perturbed, multi output variant
pub const PERCEVO_MULTI_MUTATION_PROB: f64 = 0.2;

/// Fitness every agent starts an evaluation episode with
pub const PERCEVO_BASELINE_FITNESS: f64 = 0.0;
