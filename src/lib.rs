//! Elitist neuroevolution of single layer perceptrons.
//!
//! A [Population] of [Agent]s, each owning one [Perceptron], is scored by some external world
//! (see [Scenario]) and bred into the next generation by keeping its best agents unchanged
//! and filling the rest with their mutated offspring.

pub mod agent;
pub mod config;
pub mod constants;
pub mod error;
mod macros;
pub mod network;
pub mod population;
pub mod random;
pub mod reproduce;
pub mod scenario;
mod serialize;

pub use agent::Agent;
pub use config::PopulationConfig;
pub use error::{Error, Result};
pub use network::{activate, Network, Perceptron};
pub use population::Population;
pub use random::{default_rng, WyRng};
pub use reproduce::Mutation;
pub use scenario::{evolve, EvolutionHooks, EvolutionTarget, Scenario, Stats};
