//! Random number generation for path tracing.
//!
//! [`XorShift`] is a small, seedable xorshift128 generator. It is not
//! cryptographically secure; it is fast and reproduces the same stream for
//! the same seed. It implements [`RngCore`], so every sampling helper here
//! works with it or with any other `rand` generator.

use crate::error::{RenderError, Result};
use lumen_math::Vec3;
use rand::{RngCore, SeedableRng};
use std::f32::consts::PI;

/// 1 / (i32::MAX + 1): scales a 31-bit value into [0, 1).
const REAL_UNIT_INT: f64 = 1.0 / (i32::MAX as f64 + 1.0);

/// 1 / (u32::MAX + 1): scales a 32-bit value into [0, 1).
const REAL_UNIT_UINT: f64 = 1.0 / (u32::MAX as f64 + 1.0);

// Only `x` is seeded; the rest of the state is fixed and non-zero.
const SEED_Y: u32 = 842_502_087;
const SEED_Z: u32 = 3_579_807_591;
const SEED_W: u32 = 273_326_509;

const MASK_31: u32 = 0x7FFF_FFFF;

/// Seedable four-word xorshift generator.
#[derive(Debug, Clone)]
pub struct XorShift {
    seed: u32,
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl XorShift {
    /// Create a generator with the given seed.
    pub fn new(seed: u32) -> Self {
        let mut rng = Self {
            seed,
            x: 0,
            y: 0,
            z: 0,
            w: 0,
        };
        rng.set_seed(seed);
        rng
    }

    /// The seed this generator was last initialized with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Reinitialize the generator. The stream restarts from the beginning.
    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.x = seed;
        self.y = SEED_Y;
        self.z = SEED_Z;
        self.w = SEED_W;
    }

    #[inline]
    fn step(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = (self.w ^ (self.w >> 19)) ^ (t ^ (t >> 8));
        self.w
    }

    /// Next non-negative integer in [0, i32::MAX).
    pub fn next_int(&mut self) -> i32 {
        loop {
            let rtn = self.step() & MASK_31;
            // i32::MAX itself is outside the range; draw again
            if rtn != MASK_31 {
                return rtn as i32;
            }
        }
    }

    /// Next integer in [0, bound).
    ///
    /// A bound of zero always yields zero.
    pub fn next_int_bounded(&mut self, bound: i32) -> Result<i32> {
        if bound < 0 {
            return Err(RenderError::InvalidArgument {
                name: "bound",
                message: format!("must be >= 0, got {bound}"),
            });
        }

        let unit = REAL_UNIT_INT * f64::from(self.step() & MASK_31);
        Ok((unit * f64::from(bound)) as i32)
    }

    /// Next integer in [low, high).
    ///
    /// `low == high` always yields `low`.
    pub fn next_int_range(&mut self, low: i32, high: i32) -> Result<i32> {
        if low > high {
            return Err(RenderError::InvalidArgument {
                name: "low",
                message: format!("must be <= high, got {low} > {high}"),
            });
        }

        let bits = self.step();
        match high.checked_sub(low) {
            Some(range) => {
                let unit = REAL_UNIT_INT * f64::from(bits & MASK_31);
                Ok(low + (unit * f64::from(range)) as i32)
            }
            None => {
                // Range exceeds i32::MAX: use all 32 bits and widen
                let range = i64::from(high) - i64::from(low);
                let unit = REAL_UNIT_UINT * f64::from(bits);
                Ok((i64::from(low) + (unit * range as f64) as i64) as i32)
            }
        }
    }

    /// Next double in [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        gen_f64(self)
    }

    /// Next float in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        gen_f32(self)
    }
}

impl Default for XorShift {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RngCore for XorShift {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.step());
        let hi = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Generate a double in [0, 1) from the low 31 bits of the next word.
#[inline]
pub fn gen_f64<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    REAL_UNIT_INT * f64::from(rng.next_u32() & MASK_31)
}

/// Generate a float in [0, 1).
///
/// Values that round up to 1.0 when narrowed are redrawn.
#[inline]
pub fn gen_f32<R: RngCore + ?Sized>(rng: &mut R) -> f32 {
    loop {
        let value = gen_f64(rng) as f32;
        if value < 1.0 {
            return value;
        }
    }
}

/// Random point inside the unit sphere, by rejection sampling.
///
/// Materials and the camera lens use this sampler.
pub fn random_in_unit_sphere<R: RngCore + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let p = 2.0 * Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng)) - Vec3::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random point on the surface of the unit sphere.
///
/// Closed-form inverse-CDF sampling, so it never rejects a draw.
pub fn random_on_unit_sphere<R: RngCore + ?Sized>(rng: &mut R) -> Vec3 {
    let u = gen_f32(rng);
    let v = gen_f32(rng);

    let phi = (2.0 * v - 1.0).acos();
    let theta = 2.0 * PI * u;

    Vec3::new(
        theta.cos() * phi.sin(),
        theta.sin() * phi.sin(),
        phi.cos(),
    )
}
