//! Functions related to ranking agents and breeding the next generation from them.

use crate::{
    agent::Agent,
    error::{Error, Result},
    random::Happens,
};
use core::cmp::Ordering;
use rand::{seq::IndexedRandom, Rng};
use rand_distr::{Distribution, Uniform};

/// Per-weight mutation policy. Every weight is independently perturbed with `probability`, by
/// some value uniformly drawn from `[-magnitude, magnitude]`.
#[derive(Debug, Clone)]
pub struct Mutation {
    probability: f64,
    magnitude: f64,
    perturb: Uniform<f64>,
}

impl Mutation {
    pub fn new(probability: f64, magnitude: f64) -> Result<Self> {
        if !(0. ..=1.).contains(&probability) {
            return Err(Error::InvalidConfig(format!(
                "mutation probability {probability} outside of [0, 1]"
            )));
        }

        if !magnitude.is_finite() || magnitude < 0. {
            return Err(Error::InvalidConfig(format!(
                "mutation rate {magnitude} must be finite and non-negative"
            )));
        }

        let perturb = Uniform::new_inclusive(-magnitude, magnitude)
            .map_err(|e| Error::InvalidConfig(format!("mutation rate {magnitude}: {e}")))?;

        Ok(Self {
            probability,
            magnitude,
            perturb,
        })
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Perturb weights in place. Callers own `weights`, it's never a live parent's
    pub fn apply(&self, weights: &mut [f64], rng: &mut impl Rng) {
        for w in weights.iter_mut() {
            if rng.happens(self.probability) {
                *w += self.perturb.sample(rng);
            }
        }
    }
}

/// NaN fitness ranks below anything else
#[inline]
fn rank_key(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

/// Sort agents by descending fitness. The sort is stable, so equally fit agents keep their
/// relative order.
pub fn rank(agents: &mut [Agent]) {
    agents.sort_by(|l, r| {
        rank_key(r.fitness)
            .partial_cmp(&rank_key(l.fitness))
            .unwrap_or(Ordering::Equal)
    });
}

fn reproduce_elite(elite: &[Agent]) -> impl Iterator<Item = Agent> + '_ {
    elite.iter().map(Agent::elite)
}

fn reproduce_offspring(
    elite: &[Agent],
    size: usize,
    mutation: &Mutation,
    rng: &mut impl Rng,
) -> Result<Vec<Agent>> {
    if size == 0 {
        return Ok(vec![]);
    }

    if elite.is_empty() {
        return Err(Error::NotPopulated);
    }

    (0..size)
        .map(|_| {
            let parent = elite.choose(rng).ok_or(Error::NotPopulated)?;
            Ok(Agent::offspring(parent, mutation, rng))
        })
        .collect()
}

/// Breed `size` agents from `ranked`, which must already be in [rank] order. The first
/// `keep_best` children are exact copies of the top `keep_best` agents, and the rest are
/// mutated offspring of parents uniformly picked among them.
pub fn reproduce(
    ranked: &[Agent],
    size: usize,
    keep_best: usize,
    mutation: &Mutation,
    rng: &mut impl Rng,
) -> Result<Vec<Agent>> {
    if ranked.is_empty() {
        return Err(Error::NotPopulated);
    }

    if keep_best == 0 || keep_best > ranked.len() || keep_best > size {
        return Err(Error::InvalidConfig(format!(
            "cannot keep the best {keep_best} of {} agents into a generation of {size}",
            ranked.len()
        )));
    }

    let elite = &ranked[..keep_best];
    let mut pop = Vec::with_capacity(size);
    pop.extend(reproduce_elite(elite));
    pop.extend(reproduce_offspring(elite, size - keep_best, mutation, rng)?);

    Ok(pop)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{network::Perceptron, random::WyRng, test_t};
    use rand::{rngs::StdRng, SeedableRng};

    fn agent(weights: Vec<f64>, fitness: f64) -> Agent {
        let mut a = Agent::from_brain(Perceptron::from_units(vec![weights]).unwrap());
        a.fitness = fitness;
        a
    }

    #[test]
    fn test_mutation_rejects_bad_params() {
        assert!(Mutation::new(-0.1, 0.1).is_err());
        assert!(Mutation::new(1.1, 0.1).is_err());
        assert!(Mutation::new(f64::NAN, 0.1).is_err());
        assert!(Mutation::new(0.1, -0.1).is_err());
        assert!(Mutation::new(0.1, f64::INFINITY).is_err());
        assert!(Mutation::new(0.1, f64::NAN).is_err());
        assert!(Mutation::new(0., 0.).is_ok());
        assert!(Mutation::new(1., 0.3).is_ok());
    }

    test_t!(mutation_always[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(1);
        let mutation = Mutation::new(1., 0.2).unwrap();
        let mut weights = vec![0.; 1000];
        mutation.apply(&mut weights, &mut rng);
        assert!(weights.iter().all(|w| w.abs() <= 0.2));
        assert!(weights.iter().filter(|w| **w != 0.).count() > 990);
        assert!(weights.iter().any(|w| *w > 0.1));
        assert!(weights.iter().any(|w| *w < -0.1));
    });

    test_t!(mutation_rare[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(2);
        let mutation = Mutation::new(0.02, 0.1).unwrap();
        let mut weights = vec![0.; 10_000];
        mutation.apply(&mut weights, &mut rng);
        let changed = weights.iter().filter(|w| **w != 0.).count();
        assert!((100..300).contains(&changed), "{changed} weights changed");
    });

    #[test]
    fn test_rank_descending_stable() {
        let mut agents = vec![
            agent(vec![0.], 1.),
            agent(vec![1.], 5.),
            agent(vec![2.], f64::NAN),
            agent(vec![3.], 5.),
            agent(vec![4.], -2.),
            agent(vec![5.], 1.),
        ];
        rank(&mut agents);
        let order = agents.iter().map(|a| a.weights()[0]).collect::<Vec<_>>();
        assert_eq!(order, vec![1., 3., 0., 5., 4., 2.]);
    }

    #[test]
    fn test_rank_all_equal_keeps_order() {
        let mut agents = (0..10).map(|i| agent(vec![i as f64], 0.)).collect::<Vec<_>>();
        rank(&mut agents);
        for (i, a) in agents.iter().enumerate() {
            assert_eq!(a.weights()[0], i as f64);
        }
    }

    #[test]
    fn test_reproduce_sizes() {
        let mut rng = WyRng::seeded(3);
        let mutation = Mutation::new(0.2, 0.1).unwrap();
        let ranked = (0..10)
            .map(|_| Agent::new(2, 1, &mut rng))
            .collect::<Vec<_>>();

        for (size, keep) in [(10, 1), (10, 10), (10, 3), (25, 4), (1, 1)] {
            let pop = reproduce(&ranked, size, keep, &mutation, &mut rng).unwrap();
            assert_eq!(pop.len(), size);
            for (child, parent) in pop.iter().zip(&ranked[..keep]) {
                assert_eq!(child.weights(), parent.weights());
            }
            assert!(pop.iter().all(|a| a.fitness == 0.));
        }
    }

    #[test]
    fn test_reproduce_offspring_from_elite_only() {
        let mut rng = WyRng::seeded(4);
        let mutation = Mutation::new(0.5, 0.01).unwrap();
        let ranked = vec![
            agent(vec![10., 10.], 3.),
            agent(vec![-10., -10.], 2.),
            agent(vec![0., 0.], 1.),
        ];

        let pop = reproduce(&ranked, 200, 2, &mutation, &mut rng).unwrap();
        let (mut high, mut low) = (0, 0);
        for child in &pop[2..] {
            let w = child.weights();
            if (w[0] - 10.).abs() <= 0.01 + 1e-12 && (w[1] - 10.).abs() <= 0.01 + 1e-12 {
                high += 1;
            } else if (w[0] + 10.).abs() <= 0.01 + 1e-12 && (w[1] + 10.).abs() <= 0.01 + 1e-12 {
                low += 1;
            } else {
                panic!("offspring {w:?} strayed from every elite");
            }
        }
        assert_eq!(high + low, 198);
        assert!(high > 50 && low > 50, "{high} / {low}");
    }

    #[test]
    fn test_reproduce_errors() {
        let mut rng = WyRng::seeded(5);
        let mutation = Mutation::new(0.2, 0.1).unwrap();
        let ranked = vec![agent(vec![0.], 0.), agent(vec![1.], 0.)];

        assert!(matches!(
            reproduce(&[], 4, 1, &mutation, &mut rng),
            Err(Error::NotPopulated)
        ));
        assert!(matches!(
            reproduce(&ranked, 4, 0, &mutation, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            reproduce(&ranked, 4, 3, &mutation, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            reproduce(&ranked, 1, 2, &mutation, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }
}
