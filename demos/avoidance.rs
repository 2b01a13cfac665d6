//! Headless wall dodging. A ball sits near the bottom of the field while walls with a single
//! hole fall towards it; every frame the ball survives is one point of fitness.
//!
//! `cargo run --example avoidance` evolves single output brains, where the output is read as
//! left / stay / right thirds. Pass `multi` to evolve three output brains instead, whose
//! strongest output picks the move.

use core::ops::ControlFlow;
use log::{info, LevelFilter};
use percevo::{
    evolve, scenario::Hook, EvolutionHooks, EvolutionTarget, Network, Population,
    PopulationConfig, Scenario, Stats, WyRng,
};
use rand::{Rng, SeedableRng};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const WIDTH: f64 = 500.;
const HEIGHT: f64 = 600.;
const BALL_SIZE: f64 = 30.;
const BALL_SPEED: f64 = 10.;
const BALL_Y: f64 = HEIGHT - 50.;
const WALL_HEIGHT: f64 = 40.;
const WALL_SPEED: f64 = 5.;
const HOLE_WIDTH: f64 = 100.;
const HOLE_MARGIN: f64 = 50.;
const SPAWN_INTERVAL: usize = 50;
const MAX_FRAMES: usize = 5_000;

const POPULATION: usize = 100;
const KEEP_BEST: usize = 5;
const MUTATION_RATE: f64 = 0.005;
const GENERATIONS: usize = 200;

#[derive(Debug, Clone, Copy)]
enum Move {
    Left,
    Stay,
    Right,
}

impl Move {
    fn single(out: f64) -> Self {
        if out > 0.66 {
            Self::Right
        } else if out <= 0.33 {
            Self::Left
        } else {
            Self::Stay
        }
    }

    fn strongest(out: &[f64]) -> Self {
        let idx = out
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |(bi, bv), (i, v)| if *v > bv { (i, *v) } else { (bi, bv) })
            .0;
        [Self::Left, Self::Stay, Self::Right][idx.min(2)]
    }
}

/// The hole's left edge, and how far the wall has fallen
#[derive(Debug, Clone, Copy)]
struct Wall {
    x: f64,
    y: f64,
}

struct Avoidance {
    multi: bool,
    seed: u64,
    episode: u64,
}

impl Avoidance {
    fn new(multi: bool, seed: u64) -> Self {
        Self {
            multi,
            seed,
            episode: seed,
        }
    }

    fn closest_above(walls: &[Wall]) -> Option<&Wall> {
        walls
            .iter()
            .filter(|w| w.y < BALL_Y)
            .min_by(|l, r| (BALL_Y - l.y).total_cmp(&(BALL_Y - r.y)))
    }

    fn sense(x: f64, walls: &[Wall]) -> [f64; 6] {
        let mut input = [0.; 6];
        input[0] = x / WIDTH;
        if let Some(wall) = Self::closest_above(walls) {
            input[1] = wall.x / WIDTH;
            input[2] = wall.y / HEIGHT;
            input[3] = wall.x / WIDTH;
            input[4] = (wall.x + HOLE_WIDTH) / WIDTH;
            input[5] = (BALL_Y - wall.y) / HEIGHT;
        }
        input
    }

    fn crashed(x: f64, walls: &[Wall]) -> bool {
        walls.iter().any(|wall| {
            wall.y + WALL_HEIGHT >= BALL_Y
                && !(wall.x < x && x < wall.x + HOLE_WIDTH - BALL_SIZE)
        })
    }
}

impl Scenario for Avoidance {
    fn io(&self) -> (usize, usize) {
        (6, if self.multi { 3 } else { 1 })
    }

    fn reset(&mut self, generation: usize) {
        self.episode = self.seed ^ (generation as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    }

    fn eval(&mut self, brain: &mut impl Network) -> percevo::Result<f64> {
        // every agent of a generation dodges the same walls
        let mut world = WyRng::seed_from_u64(self.episode);
        let mut walls: Vec<Wall> = Vec::new();
        let mut x = WIDTH / 2.;
        let mut score = 0.;

        for frame in 0..MAX_FRAMES {
            if frame % SPAWN_INTERVAL == 0 {
                walls.push(Wall {
                    x: world.random_range(HOLE_MARGIN..=WIDTH - HOLE_WIDTH - HOLE_MARGIN).floor(),
                    y: 0.,
                });
            }

            for wall in walls.iter_mut() {
                wall.y += WALL_SPEED;
            }
            walls.retain(|w| w.y < HEIGHT);

            let out = brain.think(&Self::sense(x, &walls))?;
            let decision = if self.multi {
                Move::strongest(out)
            } else {
                Move::single(out[0])
            };
            match decision {
                Move::Right if x < WIDTH - BALL_SIZE => x += BALL_SPEED,
                Move::Left if x > 0. => x -= BALL_SPEED,
                _ => {}
            }

            score += 1.;
            if Self::crashed(x, &walls) {
                break;
            }
        }

        Ok(score)
    }
}

fn report(stats: &Stats<'_>) -> ControlFlow<()> {
    if stats.generation % 10 == 0 {
        if let Some(best) = stats.fittest() {
            info!(
                "generation {}: best survived {} frames, mean {:.1}",
                stats.generation,
                best.fitness,
                stats.mean_fitness()
            );
        }
    }
    ControlFlow::Continue(())
}

/// Logs every generation that beats the longest survival seen so far
fn records() -> Hook {
    let mut record = 0.;
    Box::new(move |stats: &Stats<'_>| {
        if stats.any_fitter_than(record) {
            if let Some(best) = stats.fittest() {
                record = best.fitness;
                info!("generation {}: new record of {record} frames", stats.generation);
            }
        }
        ControlFlow::Continue(())
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let multi = std::env::args().any(|arg| arg == "multi");
    let seed = percevo::random::seed_urandom().unwrap_or(0x5eed);
    let mut scenario = Avoidance::new(multi, seed);
    let (sensory, _) = scenario.io();

    let preset = if multi {
        PopulationConfig::multi_output(sensory)
    } else {
        PopulationConfig::single_output(sensory)
    };
    let config = PopulationConfig {
        max_population: POPULATION,
        keep_best: KEEP_BEST,
        mutation_rate: MUTATION_RATE,
        ..preset
    };

    let mut population = Population::new(config, WyRng::seeded(seed))?;
    let mut hooks = EvolutionHooks::new(vec![
        Box::new(report) as Hook,
        records(),
        EvolutionTarget::Fitness(MAX_FRAMES as f64).hook(),
        EvolutionTarget::Generation(GENERATIONS).hook(),
    ]);

    let generation = evolve(&mut scenario, &mut population, &mut hooks)?;
    if let Some(champ) = population.fittest() {
        info!(
            "stopped at generation {generation}, champion survived {} frames",
            champ.fitness
        );
        info!("champion weights: {}", champ.brain().to_json()?);
    }

    Ok(())
}
