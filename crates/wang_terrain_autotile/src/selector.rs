//! Weighted variant selection
//!
//! Several tiles may share one signature. The pick is weighted by each tile's
//! probability and driven entirely by the rng the caller passes in.

use rand::Rng;
use std::sync::Arc;
use wang_terrain_core::{TerrainError, TileSetModel};

/// Pick one tile id from `(tile_id, weight)` pairs with probability
/// `weight / total`.
///
/// Weights must be finite and positive. Equal weights take a plain uniform
/// draw.
pub fn choose_weighted(candidates: &[(u32, f32)], rng: &mut impl Rng) -> Result<u32, TerrainError> {
    let Some(&(first_id, first_weight)) = candidates.first() else {
        return Err(TerrainError::EmptyCandidates);
    };

    if let Some(&(tile_id, weight)) = candidates
        .iter()
        .find(|(_, weight)| !weight.is_finite() || *weight <= 0.0)
    {
        return Err(TerrainError::InvalidWeight { tile_id, weight });
    }

    if candidates.len() == 1 {
        return Ok(first_id);
    }

    if candidates.iter().all(|&(_, weight)| weight == first_weight) {
        let index = rng.gen_range(0..candidates.len());
        return Ok(candidates[index].0);
    }

    let total: f64 = candidates.iter().map(|&(_, weight)| weight as f64).sum();
    let mut pick = rng.gen_range(0.0..total);
    for &(tile_id, weight) in candidates {
        let weight = weight as f64;
        if pick < weight {
            return Ok(tile_id);
        }
        pick -= weight;
    }

    // Rounding can leave a sliver past the last weight
    Ok(candidates[candidates.len() - 1].0)
}

/// Weighted choice among tiles sharing a signature, weights taken from the
/// tileset's tile probabilities
#[derive(Debug, Clone)]
pub struct VariantSelector {
    model: Arc<TileSetModel>,
}

impl VariantSelector {
    pub fn new(model: Arc<TileSetModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<TileSetModel> {
        &self.model
    }

    /// Choose one of `candidates`
    pub fn select(&self, candidates: &[u32], rng: &mut impl Rng) -> Result<u32, TerrainError> {
        let weighted = candidates
            .iter()
            .map(|&id| self.model.tile(id).map(|tile| (id, tile.probability)))
            .collect::<Result<Vec<_>, TerrainError>>()?;
        choose_weighted(&weighted, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use wang_terrain_core::{TileSetSource, WangSetKind, WangSetSource};

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    /// Grass variants from terrain-v7: three tiles sharing one full-corner signature
    fn grass_variants() -> Arc<TileSetModel> {
        let source = TileSetSource::new("terrain-v7", 2048)
            .with_probability(611, 0.25)
            .with_probability(612, 0.25)
            .with_probability(613, 0.25)
            .with_probability(700, 3.0)
            .with_wang_set(
                WangSetSource::new("Ground", WangSetKind::Corner)
                    .with_color("Grass")
                    .with_tile(611, [0, 1, 0, 1, 0, 1, 0, 1])
                    .with_tile(612, [0, 1, 0, 1, 0, 1, 0, 1])
                    .with_tile(613, [0, 1, 0, 1, 0, 1, 0, 1]),
            );
        Arc::new(TileSetModel::from_source(&source).unwrap())
    }

    #[test]
    fn test_equal_probabilities_pick_uniformly() {
        let selector = VariantSelector::new(grass_variants());
        let candidates = [611, 612, 613];
        let mut rng = seeded_rng();
        let mut counts = [0u32; 3];

        const DRAWS: u32 = 100_000;
        for _ in 0..DRAWS {
            let tile = selector.select(&candidates, &mut rng).unwrap();
            counts[(tile - 611) as usize] += 1;
        }

        for count in counts {
            let share = count as f64 / DRAWS as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.01, "share {share} too far from 1/3");
        }
    }

    #[test]
    fn test_weighted_frequencies_converge() {
        let candidates = [(10, 1.0), (11, 2.0), (12, 3.0), (13, 4.0)];
        let mut rng = seeded_rng();
        let mut observed = [0f64; 4];

        const DRAWS: usize = 60_000;
        for _ in 0..DRAWS {
            let tile = choose_weighted(&candidates, &mut rng).unwrap();
            observed[(tile - 10) as usize] += 1.0;
        }

        let total_weight: f64 = candidates.iter().map(|&(_, w)| w as f64).sum();
        let chi_squared: f64 = candidates
            .iter()
            .zip(observed)
            .map(|(&(_, weight), seen)| {
                let expected = DRAWS as f64 * weight as f64 / total_weight;
                (seen - expected).powi(2) / expected
            })
            .sum();

        // 3 degrees of freedom, p = 0.001
        assert!(chi_squared < 16.27, "chi-squared {chi_squared} rejects the weights");
    }

    #[test]
    fn test_selection_uses_tile_probability() {
        let selector = VariantSelector::new(grass_variants());
        let mut rng = seeded_rng();

        // 700 weighs 3.0 against 0.25, so it should win about 92% of the time
        let wins = (0..10_000)
            .filter(|_| selector.select(&[611, 700], &mut rng).unwrap() == 700)
            .count();
        assert!((8_800..9_600).contains(&wins), "tile 700 won {wins} times");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let selector = VariantSelector::new(grass_variants());
        let draw = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..32)
                .map(|_| selector.select(&[611, 612, 613], &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
    }

    #[test]
    fn test_single_candidate() {
        let selector = VariantSelector::new(grass_variants());
        assert_eq!(selector.select(&[42], &mut seeded_rng()).unwrap(), 42);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut rng = seeded_rng();

        assert!(matches!(choose_weighted(&[], &mut rng), Err(TerrainError::EmptyCandidates)));
        for bad in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                choose_weighted(&[(1, 1.0), (2, bad)], &mut rng),
                Err(TerrainError::InvalidWeight { tile_id: 2, .. })
            ));
        }

        let selector = VariantSelector::new(grass_variants());
        assert!(matches!(
            selector.select(&[611, 5000], &mut rng),
            Err(TerrainError::UnknownTile(5000))
        ));
        assert!(matches!(selector.select(&[], &mut rng), Err(TerrainError::EmptyCandidates)));
    }
}
