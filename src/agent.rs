//! A single candidate solution, pairing a [Perceptron] with its fitness.

use crate::{
    constants::PERCEVO_BASELINE_FITNESS,
    error::Result,
    network::{Network, Perceptron},
    reproduce::Mutation,
};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Agent {
    brain: Perceptron,
    /// Set by whoever evaluates this agent, higher is better. Never read by the agent itself.
    pub fitness: f64,
}

impl Agent {
    /// A fresh agent with random weights
    pub fn new(sensory: usize, action: usize, rng: &mut impl Rng) -> Self {
        Self::from_brain(Perceptron::new(sensory, action, rng))
    }

    pub fn from_brain(brain: Perceptron) -> Self {
        Self {
            brain,
            fitness: PERCEVO_BASELINE_FITNESS,
        }
    }

    /// An unmutated copy of `source`'s weights, sharing nothing with it
    pub fn elite(source: &Agent) -> Self {
        Self::from_brain(source.brain.clone())
    }

    /// A copy of `parent`'s weights, where every weight may be independently perturbed
    pub fn offspring(parent: &Agent, mutation: &Mutation, rng: &mut impl Rng) -> Self {
        let mut child = Self::elite(parent);
        mutation.apply(child.brain_mut().weights_mut(), rng);
        child
    }

    #[inline]
    pub fn brain(&self) -> &Perceptron {
        &self.brain
    }

    #[inline]
    pub(crate) fn brain_mut(&mut self) -> &mut Perceptron {
        &mut self.brain
    }

    #[inline]
    pub fn weights(&self) -> &[f64] {
        self.brain.weights()
    }
}

impl Network for Agent {
    fn sensory(&self) -> usize {
        self.brain.sensory()
    }

    fn action(&self) -> usize {
        self.brain.action()
    }

    fn think(&mut self, input: &[f64]) -> Result<&[f64]> {
        self.brain.think(input)
    }

    fn output(&self) -> &[f64] {
        self.brain.output()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::random::WyRng;

    #[test]
    fn test_fresh_agent() {
        let agent = Agent::new(6, 1, &mut WyRng::seeded(1));
        assert_eq!(agent.fitness, 0.);
        assert_eq!(agent.weights().len(), 7);
        assert_eq!(agent.brain().sensory(), 6);
    }

    #[test]
    fn test_elite_is_independent() {
        let mut source = Agent::from_brain(Perceptron::from_units(vec![vec![1., 1., 1.]]).unwrap());
        source.fitness = 10.;

        let mut clone = Agent::elite(&source);
        assert_eq!(clone.weights(), source.weights());
        assert_eq!(clone.fitness, 0.);

        clone.brain_mut().weights_mut()[0] = 5.;
        clone.fitness = 3.;
        assert_eq!(source.weights(), &[1., 1., 1.]);
        assert_eq!(source.fitness, 10.);
    }

    #[test]
    fn test_think_delegates() {
        let mut agent = Agent::new(3, 2, &mut WyRng::seeded(2));
        let mut twin = agent.brain().clone();
        let want = twin.think(&[0.1, 0.2, 0.3]).unwrap().to_vec();
        assert_eq!(agent.think(&[0.1, 0.2, 0.3]).unwrap(), &want[..]);
        assert_eq!(Network::output(&agent), &want[..]);
        assert!(agent.think(&[0.1]).is_err());
    }

    #[test]
    fn test_offspring_bounded() {
        let mut rng = WyRng::seeded(3);
        let parent = Agent::new(6, 3, &mut rng);
        let mutation = Mutation::new(0.5, 0.05).unwrap();
        for _ in 0..200 {
            let child = Agent::offspring(&parent, &mutation, &mut rng);
            assert_eq!(child.weights().len(), parent.weights().len());
            assert_eq!(child.fitness, 0.);
            for (c, p) in child.weights().iter().zip(parent.weights()) {
                assert!((c - p).abs() <= 0.05 + 1e-12, "{c} drifted from {p}");
            }
        }
    }

    #[test]
    fn test_offspring_never_mutated() {
        let mut rng = WyRng::seeded(4);
        let parent = Agent::new(6, 1, &mut rng);
        let mutation = Mutation::new(0., 1.).unwrap();
        for _ in 0..50 {
            assert_eq!(
                Agent::offspring(&parent, &mutation, &mut rng).weights(),
                parent.weights()
            );
        }
    }
}
