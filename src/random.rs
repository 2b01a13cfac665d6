use rand::{Rng, RngCore, SeedableRng};
use std::{
    fs::File,
    io::{self, Read},
    time::{SystemTime, UNIX_EPOCH},
};

/// Roll for some event that happens with probability `p`. `p` of 0 never happens, and `p` of 1
/// always happens.
pub trait Happens: RngCore {
    fn happens(&mut self, p: f64) -> bool;
}

impl<T: RngCore> Happens for T {
    fn happens(&mut self, p: f64) -> bool {
        p > self.random::<f64>()
    }
}

/// wyrand, small and fast. Good enough for evolution, never for anything secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let lim = chunk.len();
            chunk.copy_from_slice(&self.next_u64().to_le_bytes()[..lim]);
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

fn seed_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

/// A [WyRng] seeded from the system. Use [WyRng::seeded] for runs that need to be repeated.
pub fn default_rng() -> WyRng {
    WyRng::seeded(seed_urandom().unwrap_or_else(|_| seed_clock()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_t;
    use core::iter::once;
    use rand::rngs::StdRng;

    fn assert_within_deviation(p: f64, range: f64, rng: &mut impl Happens) {
        let samples = 10_000.;
        let expected = p * samples;
        let max_deviation = expected * range;
        for _ in 0..100 {
            let incidence = once(())
                .cycle()
                .take(samples as usize)
                .filter(|()| rng.happens(p))
                .count() as f64;
            assert!(
                (expected - incidence).abs() < max_deviation,
                "{p}: {incidence} != {expected} ± {max_deviation}"
            );
        }
    }

    test_t!(deviation[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(7);
        for p in [0.02, 0.2, 0.5, 0.9] {
            assert_within_deviation(p, 0.33, &mut rng);
        }
    });

    test_t!(happens_bounds[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(11);
        for _ in 0..1000 {
            assert!(!rng.happens(0.));
            assert!(rng.happens(1.));
        }
    });

    #[test]
    fn test_wyrng_seeded_repeats() {
        let mut l = WyRng::seeded(42);
        let mut r = WyRng::seeded(42);
        for _ in 0..100 {
            assert_eq!(l.next_u64(), r.next_u64());
        }
        assert_ne!(WyRng::seeded(1).next_u64(), WyRng::seeded(2).next_u64());
    }

    #[test]
    fn test_wyrng_fill_bytes() {
        let mut rng = WyRng::seeded(3);
        let want = {
            let mut twin = WyRng::seeded(3);
            let mut v = twin.next_u64().to_le_bytes().to_vec();
            v.extend_from_slice(&twin.next_u64().to_le_bytes()[..3]);
            v
        };

        let mut buf = [0u8; 11];
        rng.fill_bytes(&mut buf);
        assert_eq!(&buf[..], &want[..]);

        rng.fill_bytes(&mut []);
    }

    #[test]
    fn test_wyrng_from_seed() {
        let mut l = WyRng::from_seed(9u64.to_le_bytes());
        let mut r = WyRng::seeded(9);
        assert_eq!(l.next_u64(), r.next_u64());
    }
}
