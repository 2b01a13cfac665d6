//! The contract between the evolutionary engine and whatever world its agents live in. A
//! [Scenario] scores one brain per call. [evolve] drives a [Population] through generations of
//! scoring and breeding until some hook says to stop.

use crate::{
    agent::Agent,
    error::{Error, Result},
    network::Network,
    population::{fittest, Population},
};
use core::ops::ControlFlow;
use log::info;
use rand::Rng;

pub trait Scenario {
    /// The (sensory, action) sizes this scenario feeds and reads
    fn io(&self) -> (usize, usize);

    /// Called once before every generation is evaluated, so a scenario may vary its world
    fn reset(&mut self, _generation: usize) {}

    /// Run one full episode with `brain` in control, returning its fitness. Higher is better.
    fn eval(&mut self, brain: &mut impl Network) -> Result<f64>;
}

/// A snapshot of an evaluated generation, handed to every hook before it's bred
#[derive(Debug)]
pub struct Stats<'a> {
    pub generation: usize,
    pub agents: &'a [Agent],
}

impl Stats<'_> {
    pub fn fittest(&self) -> Option<&Agent> {
        fittest(self.agents)
    }

    pub fn any_fitter_than(&self, target: f64) -> bool {
        self.agents.iter().any(|a| a.fitness > target)
    }

    pub fn mean_fitness(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.;
        }
        self.agents.iter().map(|a| a.fitness).sum::<f64>() / self.agents.len() as f64
    }
}

pub type Hook = Box<dyn FnMut(&Stats<'_>) -> ControlFlow<()>>;

/// Hooks run in order after every evaluation. The first to break stops evolution.
#[derive(Default)]
pub struct EvolutionHooks {
    hooks: Vec<Hook>,
}

impl EvolutionHooks {
    pub fn new(hooks: Vec<Hook>) -> Self {
        Self { hooks }
    }

    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    fn fire(&mut self, stats: &Stats<'_>) -> ControlFlow<()> {
        for hook in self.hooks.iter_mut() {
            if hook(stats).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EvolutionTarget {
    /// Stop once any agent is at least this fit
    Fitness(f64),
    /// Stop once this generation has been evaluated
    Generation(usize),
}

impl EvolutionTarget {
    pub fn satisfied(&self, stats: &Stats<'_>) -> bool {
        match self {
            Self::Fitness(t) => stats.agents.iter().any(|a| a.fitness >= *t),
            Self::Generation(t) => stats.generation >= *t,
        }
    }

    pub fn hook(self) -> Hook {
        Box::new(move |stats: &Stats<'_>| {
            if self.satisfied(stats) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
    }
}

/// Evolve `population` against `scenario` until a hook breaks, populating it first if it's
/// empty. The generation that triggered the break is left evaluated and unbred, and its index
/// is returned.
pub fn evolve<S: Scenario, R: Rng>(
    scenario: &mut S,
    population: &mut Population<R>,
    hooks: &mut EvolutionHooks,
) -> Result<usize> {
    let (sensory, action) = scenario.io();
    let config = population.config();
    if sensory != config.sensory {
        return Err(Error::DimensionMismatch {
            expected: config.sensory,
            found: sensory,
        });
    }
    if action != config.action {
        return Err(Error::DimensionMismatch {
            expected: config.action,
            found: action,
        });
    }

    if population.is_empty() {
        population.populate()?;
    }

    loop {
        let generation = population.generation();
        population.reset_fitness();
        scenario.reset(generation);
        for agent in population.agents_mut() {
            agent.fitness = scenario.eval(agent)?;
        }

        let stats = Stats {
            generation,
            agents: population.agents(),
        };
        if let Some(best) = stats.fittest() {
            info!(
                "evaluated generation {generation}: best {}, mean {:.3}",
                best.fitness,
                stats.mean_fitness()
            );
        }

        if hooks.fire(&stats).is_break() {
            break Ok(generation);
        }

        population.next_generation()?;
    }
}
