/*!
This module handles random generation of [`ShapeKind`]s.
*/

use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    Rng,
};

use crate::ShapeKind;

/// Handles the information of which shapes to spawn during a game.
///
/// To actually generate [`ShapeKind`]s, the [`ShapeGenerator::with_rng`] method needs to be used to
/// yield a [`WithRng`] that implements [`Iterator`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeGenerator {
    /// Uniformly random shape generator.
    #[default]
    Uniform,
    /// Standard 'bag' generator.
    ///
    /// Hands out one of each [`ShapeKind`] in random order before any kind repeats.
    Bag {
        /// The number of each shape kind left in the bag.
        shapes_left: [u32; 7],
    },
}

impl ShapeGenerator {
    /// Initialize an instance of the [`ShapeGenerator::Uniform`] variant.
    pub const fn uniform() -> Self {
        Self::Uniform
    }

    /// Initialize a full instance of the [`ShapeGenerator::Bag`] variant.
    pub const fn bag() -> Self {
        Self::Bag {
            shapes_left: [1; 7],
        }
    }

    /// Draws the next shape kind.
    pub fn generate<R: Rng>(&mut self, rng: &mut R) -> ShapeKind {
        match self {
            ShapeGenerator::Uniform => {
                ShapeKind::VARIANTS[rng.random_range(0..ShapeKind::VARIANTS.len())]
            }
            ShapeGenerator::Bag { shapes_left } => {
                if shapes_left.iter().all(|&n| n == 0) {
                    *shapes_left = [1; 7];
                }
                let idx = match WeightedIndex::new(shapes_left.iter()) {
                    Ok(weights) => weights.sample(rng),
                    Err(_) => rng.random_range(0..ShapeKind::VARIANTS.len()),
                };
                // Take out of the bag and refill once empty.
                shapes_left[idx] = shapes_left[idx].saturating_sub(1);
                if shapes_left.iter().sum::<u32>() == 0 {
                    *shapes_left = [1; 7];
                }
                ShapeKind::VARIANTS[idx]
            }
        }
    }

    /// Method that allows `ShapeGenerator` to be used as [`Iterator`].
    pub fn with_rng<'a, 'b, R: Rng>(&'a mut self, rng: &'b mut R) -> WithRng<'a, 'b, R> {
        WithRng {
            shape_generator: self,
            rng,
        }
    }
}

/// Struct produced from [`ShapeGenerator::with_rng`] which implements [`Iterator`].
pub struct WithRng<'a, 'b, R: Rng> {
    /// Selected shape generator to use as information source.
    pub shape_generator: &'a mut ShapeGenerator,
    /// Random number generator for raw source of randomness.
    pub rng: &'b mut R,
}

impl<R: Rng> Iterator for WithRng<'_, '_, R> {
    type Item = ShapeKind;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.shape_generator.generate(&mut *self.rng))
    }
}
