use super::{activate::sigmoid, Network};
use crate::{
    constants::{PERCEVO_BIAS_INPUT, PERCEVO_WEIGHT_INIT_BOUND},
    error::{Error, Result},
    serialize::{deserialize_matrix_rows, serialize_matrix},
};
use rand::Rng;
use rulinalg::matrix::{BaseMatrix, Matrix};
use serde::{Deserialize, Serialize};

/// A single layer perceptron. Every output unit owns one weight vector of `sensory + 1`
/// weights, the last of which is the bias.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Weights")]
pub struct Perceptron {
    /// Nd weights, one row per action unit, indexed as [unit, input]
    #[serde(serialize_with = "serialize_matrix")]
    w: Matrix<f64>,
    /// Most recent output, only for inspection
    #[serde(skip)]
    last: Vec<f64>,
}

/// What a [Perceptron] is read back from. The output cache is rebuilt, never stored.
#[derive(Deserialize)]
struct Weights {
    #[serde(deserialize_with = "deserialize_matrix_rows")]
    w: Matrix<f64>,
}

impl From<Weights> for Perceptron {
    fn from(Weights { w }: Weights) -> Self {
        Self {
            last: vec![0.; w.rows()],
            w,
        }
    }
}

/// The input with the constant bias input appended, leaving the original untouched
pub fn with_bias(input: &[f64]) -> Vec<f64> {
    let mut biased = Vec::with_capacity(input.len() + 1);
    biased.extend_from_slice(input);
    biased.push(PERCEVO_BIAS_INPUT);
    biased
}

impl Perceptron {
    /// A fresh perceptron, every weight drawn uniformly from `[-1, 1]`
    pub fn new(sensory: usize, action: usize, rng: &mut impl Rng) -> Self {
        let cols = sensory + 1;
        let data: Vec<f64> = (0..action * cols)
            .map(|_| rng.random_range(-PERCEVO_WEIGHT_INIT_BOUND..=PERCEVO_WEIGHT_INIT_BOUND))
            .collect();
        Self {
            w: Matrix::new(action, cols, data),
            last: vec![0.; action],
        }
    }

    /// A perceptron with explicit weight vectors, one per output unit. Each vector carries its
    /// bias last, so the sensory size is one less than the vector length.
    pub fn from_units(units: Vec<Vec<f64>>) -> Result<Self> {
        let cols = match units.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => return Err(Error::MalformedWeights("empty weight vector".into())),
            None => return Err(Error::MalformedWeights("no output units".into())),
        };

        if let Some(bad) = units.iter().find(|u| u.len() != cols) {
            return Err(Error::MalformedWeights(format!(
                "weight vector of {} where {cols} expected",
                bad.len()
            )));
        }

        let action = units.len();
        Ok(Self {
            w: Matrix::new(action, cols, units.concat()),
            last: vec![0.; action],
        })
    }

    /// Every weight, row major, one output unit after another
    #[inline]
    pub fn weights(&self) -> &[f64] {
        self.w.data()
    }

    #[inline]
    pub(crate) fn weights_mut(&mut self) -> &mut [f64] {
        self.w.mut_data()
    }

    /// The weight vector of each output unit, bias last
    pub fn units(&self) -> impl Iterator<Item = &[f64]> {
        self.w.data().chunks_exact(self.w.cols())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Network for Perceptron {
    #[inline]
    fn sensory(&self) -> usize {
        self.w.cols() - 1
    }

    #[inline]
    fn action(&self) -> usize {
        self.w.rows()
    }

    fn think(&mut self, input: &[f64]) -> Result<&[f64]> {
        if input.len() != self.sensory() {
            return Err(Error::DimensionMismatch {
                expected: self.sensory(),
                found: input.len(),
            });
        }

        let biased = with_bias(input);
        self.last.clear();
        self.last.extend(
            self.w
                .data()
                .chunks_exact(self.w.cols())
                .map(|unit| sigmoid(unit.iter().zip(&biased).map(|(w, x)| w * x).sum())),
        );

        Ok(&self.last)
    }

    #[inline]
    fn output(&self) -> &[f64] {
        &self.last
    }
}

impl PartialEq for Perceptron {
    fn eq(&self, other: &Self) -> bool {
        self.w.rows() == other.w.rows()
            && self.w.cols() == other.w.cols()
            && self.w.data() == other.w.data()
    }
}
