use rand::Rng;
use rand::prelude::*;

use super::*;

/// Purely random placement: each mine lands on a uniformly drawn cell, redrawing on collision.
#[derive(Debug)]
pub struct RandomLayoutGenerator<'a, R: ?Sized> {
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RandomLayoutGenerator<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + ?Sized> LayoutGenerator for RandomLayoutGenerator<'_, R> {
    fn generate(&mut self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;

        let (size_x, size_y) = config.size;
        let mut mine_mask: Array2<Option<u8>> = Array2::default(config.size.to_nd_index());
        let mut collisions = 0u32;

        for _ in 0..config.mines {
            loop {
                let coords = (
                    self.rng.random_range(0..size_x),
                    self.rng.random_range(0..size_y),
                );
                let variant = self.rng.random_range(0..config.variants);
                let slot = &mut mine_mask[coords.to_nd_index()];
                if slot.is_none() {
                    *slot = Some(variant);
                    break;
                }
                collisions += 1;
            }
        }

        log::debug!(
            "Seeded {} mines on {}x{} board, {} collisions redrawn",
            config.mines,
            size_x,
            size_y,
            collisions
        );
        Ok(MineLayout::from_mine_mask(&mine_mask))
    }
}
