//! Managing agents at the global population scale: bootstrapping, ranking and breeding whole
//! generations.

use crate::{
    agent::Agent,
    config::PopulationConfig,
    constants::PERCEVO_BASELINE_FITNESS,
    error::{Error, Result},
    network::Network,
    random::{default_rng, WyRng},
    reproduce::{rank, reproduce, Mutation},
};
use log::{debug, info, trace};
use rand::Rng;

/// Every agent of the current generation, along with the single rng all randomness is drawn
/// from. Its size is fixed at `max_population` once populated.
#[derive(Debug)]
pub struct Population<R: Rng = WyRng> {
    config: PopulationConfig,
    mutation: Mutation,
    agents: Vec<Agent>,
    generation: usize,
    rng: R,
}

impl Population<WyRng> {
    /// An empty population drawing from a system seeded [WyRng]
    pub fn with_default_rng(config: PopulationConfig) -> Result<Self> {
        Self::new(config, default_rng())
    }
}

impl<R: Rng> Population<R> {
    /// An empty population at generation 0. Call [Population::populate] before evaluating it.
    pub fn new(config: PopulationConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mutation: config.mutation()?,
            config,
            agents: Vec::new(),
            generation: 0,
            rng,
        })
    }

    /// Adopt an existing generation of agents, who must fill the population exactly and
    /// share its dimensions
    pub fn from_agents(config: PopulationConfig, agents: Vec<Agent>, rng: R) -> Result<Self> {
        let mut pop = Self::new(config, rng)?;
        if agents.len() != pop.config.max_population {
            return Err(Error::PopulationSize {
                expected: pop.config.max_population,
                found: agents.len(),
            });
        }

        check_dimensions(&pop.config, &agents)?;
        pop.agents = agents;
        Ok(pop)
    }

    /// Fill the population with fresh agents. Only valid once, while it's still empty.
    pub fn populate(&mut self) -> Result<()> {
        if !self.agents.is_empty() {
            return Err(Error::AlreadyPopulated);
        }

        let PopulationConfig {
            max_population,
            sensory,
            action,
            ..
        } = self.config;
        self.agents = (0..max_population)
            .map(|_| Agent::new(sensory, action, &mut self.rng))
            .collect();

        trace!("populated {max_population} agents of {sensory} -> {action}");
        Ok(())
    }

    /// Rank the current generation by fitness, keep the best unchanged, and fill the rest
    /// with mutated offspring of those best. Every agent of the previous generation is
    /// dropped.
    pub fn next_generation(&mut self) -> Result<()> {
        if self.agents.is_empty() {
            return Err(Error::NotPopulated);
        }
        check_dimensions(&self.config, &self.agents)?;

        self.rank();
        let best = self.agents[0].fitness;
        let next = reproduce(
            &self.agents,
            self.config.max_population,
            self.config.keep_best,
            &self.mutation,
            &mut self.rng,
        )?;

        info!(
            "generation {}: best fitness {best}, mutation rate {}",
            self.generation, self.config.mutation_rate
        );
        for (idx, agent) in next.iter().take(2).enumerate() {
            debug!(
                "generation {} agent {idx}: {}",
                self.generation,
                agent.brain().to_json()?
            );
        }

        self.agents = next;
        self.generation += 1;
        Ok(())
    }

    /// Stable sort of the current generation, fittest first
    pub fn rank(&mut self) {
        rank(&mut self.agents);
    }

    /// Put every agent back at the baseline fitness, ready for a new evaluation
    pub fn reset_fitness(&mut self) {
        for agent in self.agents.iter_mut() {
            agent.fitness = PERCEVO_BASELINE_FITNESS;
        }
    }

    /// The fittest agent, first among equals. NaN fitness only wins if every agent has it.
    pub fn fittest(&self) -> Option<&Agent> {
        fittest(&self.agents)
    }

    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[inline]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[inline]
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Every agent must share the configured dimensions, whoever put it there
fn check_dimensions(config: &PopulationConfig, agents: &[Agent]) -> Result<()> {
    for agent in agents {
        if agent.sensory() != config.sensory {
            return Err(Error::DimensionMismatch {
                expected: config.sensory,
                found: agent.sensory(),
            });
        }
        if agent.action() != config.action {
            return Err(Error::DimensionMismatch {
                expected: config.action,
                found: agent.action(),
            });
        }
    }
    Ok(())
}

pub(crate) fn fittest(agents: &[Agent]) -> Option<&Agent> {
    agents.iter().fold(None, |best: Option<&Agent>, agent| match best {
        Some(b) if b.fitness >= agent.fitness || agent.fitness.is_nan() => Some(b),
        _ => Some(agent),
    })
}
