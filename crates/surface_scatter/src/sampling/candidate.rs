//! Annulus candidate generation around an accepted sample.
use glam::Vec3;
use rand::RngCore;

use crate::sampling::rand01;

/// Draws candidates at a uniform bearing and a uniform distance in `[radius, 2 * radius)`.
///
/// Offsets are horizontal. The candidate keeps the seed's `y`, which only serves as a
/// placeholder until the candidate is projected onto the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateGenerator {
    pub radius: f32,
}

impl CandidateGenerator {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }

    pub fn generate(&self, seed: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let bearing = (rand01(rng) * 360.0).to_radians();
        let distance = self.radius + rand01(rng) * self.radius;
        let (sin, cos) = bearing.sin_cos();
        seed + Vec3::new(cos * distance, 0.0, sin * distance)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::test_rng::FixedRng;

    #[test]
    fn candidates_fall_in_annulus_and_keep_seed_height() {
        let generator = CandidateGenerator::new(0.25);
        let seed = Vec3::new(3.0, -7.5, 1.0);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let c = generator.generate(seed, &mut rng);
            assert_eq!(c.y, seed.y);
            let d = Vec2::new(c.x - seed.x, c.z - seed.z).length();
            assert!(d >= 0.25 - 1e-5 && d < 0.5 + 1e-5, "distance {d}");
        }
    }

    #[test]
    fn zero_draws_give_inner_radius_along_x() {
        let generator = CandidateGenerator::new(2.0);
        let mut rng = FixedRng { value: 0 };
        let c = generator.generate(Vec3::ZERO, &mut rng);
        assert_eq!(c, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn bearings_cover_all_quadrants() {
        let generator = CandidateGenerator::new(1.0);
        let mut rng = StdRng::seed_from_u64(77);
        let mut quadrants = [false; 4];
        for _ in 0..200 {
            let c = generator.generate(Vec3::ZERO, &mut rng);
            let q = match (c.x >= 0.0, c.z >= 0.0) {
                (true, true) => 0,
                (false, true) => 1,
                (false, false) => 2,
                (true, false) => 3,
            };
            quadrants[q] = true;
        }
        assert!(quadrants.iter().all(|&hit| hit));
    }
}
