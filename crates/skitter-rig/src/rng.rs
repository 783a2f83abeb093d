//! RNG trait abstraction for gait jitter
//!
//! Legs pick new stride goals with a small random offset. The source is
//! injected so simulations can be seeded and tests can pin the jitter.

/// Random source for stride goal jitter
pub trait GaitRng {
    /// Generate random f32 in [0.0, 1.0)
    fn unit(&mut self) -> f32;

    /// Generate random f32 in [-1.0, 1.0)
    fn jitter(&mut self) -> f32 {
        2.0 * self.unit() - 1.0
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> GaitRng for T {
    fn unit(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
