//! Weight vector operations for the genetic algorithm.
//!
//! Network parameters are signed, so every operation keeps weights inside the
//! symmetric range `[-max_weight, max_weight]`.
//!
//! - [`random`] draws an initial vector
//! - [`blx_alpha`] blends two parents (BLX-α crossover)
//! - [`mutate`] adds Gaussian noise to a random subset of weights

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use flappy_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f32 + 1.0), 3);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Draws `len` weights uniformly from `[-max_weight, max_weight]`.
pub fn random<R>(rng: &mut R, max_weight: f32, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-max_weight..=max_weight), len)
}

/// Performs BLX-α crossover between two parents.
///
/// For each position the child is drawn uniformly from the parents' range
/// widened by `alpha` times its length on both sides, then clamped:
///
/// ```text
/// d     = |x2 - x1|
/// child ~ U[min - α·d, max + α·d]  clamped to [-max_weight, max_weight]
/// ```
///
/// # Panics
///
/// Panics if the parents have different lengths.
pub fn blx_alpha<R>(p1: &[f32], p2: &[f32], alpha: f32, max_weight: f32, rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    from_fn(
        |i| {
            let min = f32::min(p1[i], p2[i]);
            let max = f32::max(p1[i], p2[i]);
            let d = max - min;
            rng.random_range((min - alpha * d)..=(max + alpha * d))
                .clamp(-max_weight, max_weight)
        },
        p1.len(),
    )
}

/// Adds `N(0, sigma)` noise to each weight with probability `rate`, clamping
/// the result.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or if `rate` is outside `[0, 1]`.
pub fn mutate<R>(weights: &mut [f32], sigma: f32, max_weight: f32, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).expect("mutation sigma must be finite and non-negative");
    for w in weights {
        if rng.random_bool(rate.into()) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_is_signed_and_bounded() {
        let mut rng = Pcg32::seed_from_u64(1);
        let weights = random(&mut rng, 2.0, 1000);
        assert_eq!(weights.len(), 1000);
        assert!(weights.iter().all(|w| (-2.0..=2.0).contains(w)));
        assert!(weights.iter().any(|&w| w < 0.0));
        assert!(weights.iter().any(|&w| w > 0.0));
    }

    #[test]
    fn test_blx_alpha_stays_in_widened_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        let p1 = [-1.0, 0.0, 0.5];
        let p2 = [1.0, 0.0, 0.9];
        for _ in 0..200 {
            let child = blx_alpha(&p1, &p2, 0.5, 10.0, &mut rng);
            assert!((-2.0..=2.0).contains(&child[0]));
            assert_eq!(child[1], 0.0);
            assert!((0.3..=1.1).contains(&child[2]));
        }
    }

    #[test]
    fn test_blx_alpha_clamps() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let child = blx_alpha(&[-1.0], &[1.0], 2.0, 1.5, &mut rng);
            assert!((-1.5..=1.5).contains(&child[0]));
        }
    }

    #[test]
    #[should_panic(expected = "assertion `left == right` failed")]
    fn test_blx_alpha_rejects_mismatched_parents() {
        let mut rng = Pcg32::seed_from_u64(4);
        let _ = blx_alpha(&[0.0, 1.0], &[0.0], 0.5, 1.0, &mut rng);
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let original = vec![0.25; 100];

        let mut weights = original.clone();
        mutate(&mut weights, 1.0, 1.0, 0.0, &mut rng);
        assert_eq!(weights, original);

        let mut weights = original.clone();
        mutate(&mut weights, 1.0, 1.0, 1.0, &mut rng);
        assert!(weights.iter().zip(&original).all(|(a, b)| a != b));
        assert!(weights.iter().all(|w| (-1.0..=1.0).contains(w)));
    }
}
