use crate::{
    constants::*,
    error::{Error, Result},
    reproduce::Mutation,
};
use serde::{Deserialize, Serialize};

/// Everything a [crate::Population] needs to know up front. Fields left out of JSON fall back
/// to their `PERCEVO_` defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Agents alive in every generation
    pub max_population: usize,
    /// Top agents carried over unmutated
    pub keep_best: usize,
    /// Input size, not counting the bias
    pub sensory: usize,
    /// Output size
    pub action: usize,
    /// Bound of a single weight perturbation
    pub mutation_rate: f64,
    /// Chance of perturbing any one weight
    pub mutation_probability: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            max_population: PERCEVO_MAX_POPULATION,
            keep_best: PERCEVO_KEEP_BEST,
            sensory: PERCEVO_SENSORY,
            action: PERCEVO_SINGLE_ACTION,
            mutation_rate: PERCEVO_MUTATION_RATE,
            mutation_probability: PERCEVO_SINGLE_MUTATION_PROB,
        }
    }
}

impl PopulationConfig {
    /// One output unit, rarely mutated
    pub fn single_output(sensory: usize) -> Self {
        Self {
            sensory,
            ..Self::default()
        }
    }

    /// Three output units, mutated ten times as often as [PopulationConfig::single_output]
    pub fn multi_output(sensory: usize) -> Self {
        Self {
            sensory,
            action: PERCEVO_MULTI_ACTION,
            mutation_probability: PERCEVO_MULTI_MUTATION_PROB,
            ..Self::default()
        }
    }

    pub fn with_population(mut self, max_population: usize, keep_best: usize) -> Self {
        self.max_population = max_population;
        self.keep_best = keep_best;
        self
    }

    pub fn with_mutation(mut self, rate: f64, probability: f64) -> Self {
        self.mutation_rate = rate;
        self.mutation_probability = probability;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_population == 0 {
            return Err(Error::InvalidConfig("max_population must be positive".into()));
        }

        if self.keep_best == 0 {
            return Err(Error::InvalidConfig("keep_best must be positive".into()));
        }

        if self.keep_best > self.max_population {
            return Err(Error::InvalidConfig(format!(
                "keep_best {} exceeds max_population {}",
                self.keep_best, self.max_population
            )));
        }

        if self.action == 0 {
            return Err(Error::InvalidConfig("action must be positive".into()));
        }

        self.mutation().map(|_| ())
    }

    /// The mutation policy described by this config
    pub fn mutation(&self) -> Result<Mutation> {
        Mutation::new(self.mutation_probability, self.mutation_rate)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
