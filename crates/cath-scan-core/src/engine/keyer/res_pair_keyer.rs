use super::{CellIndex, CloseKeyParts, DynKeyerPart, Key, MAX_KEY_ARITY};
use crate::engine::config::ConfigError;
use std::fmt;

/// An ordered composite of keyer parts, one lattice dimension per part.
pub struct ResPairKeyer<E, C> {
    parts: Vec<Box<dyn DynKeyerPart<E, C>>>,
}

impl<E, C> ResPairKeyer<E, C> {
    pub fn builder() -> ResPairKeyerBuilder<E, C> {
        ResPairKeyerBuilder::new()
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.parts.len()
    }

    pub fn part_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|part| part.name()).collect()
    }

    pub fn make_key(&self, entry: &E) -> Key {
        let mut cells = [0; MAX_KEY_ARITY];
        for (cell, part) in cells.iter_mut().zip(&self.parts) {
            *cell = part.make_key_part(entry);
        }
        Key::from_array(cells, self.arity())
    }

    /// Lazily enumerates the cross product of every part's close cells.
    ///
    /// Each part's list is computed up front; the keys themselves are produced on demand.
    pub fn make_close_keys(&self, entry: &E, criteria: &C) -> Result<CloseKeys, ConfigError> {
        let lists = self
            .parts
            .iter()
            .map(|part| part.make_close_key_parts(entry, criteria))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CloseKeys::new(lists))
    }

    pub fn make_min_close_key(&self, entry: &E, criteria: &C) -> Result<Key, ConfigError> {
        self.make_bounding_key(entry, criteria, |cells| cells.iter().copied().min())
    }

    pub fn make_max_close_key(&self, entry: &E, criteria: &C) -> Result<Key, ConfigError> {
        self.make_bounding_key(entry, criteria, |cells| cells.iter().copied().max())
    }

    fn make_bounding_key(
        &self,
        entry: &E,
        criteria: &C,
        pick: impl Fn(&[CellIndex]) -> Option<CellIndex>,
    ) -> Result<Key, ConfigError> {
        let mut cells = [0; MAX_KEY_ARITY];
        for (cell, part) in cells.iter_mut().zip(&self.parts) {
            let close = part.make_close_key_parts(entry, criteria)?;
            *cell = pick(&close).unwrap_or_else(|| part.make_key_part(entry));
        }
        Ok(Key::from_array(cells, self.arity()))
    }
}

impl<E, C> fmt::Debug for ResPairKeyer<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResPairKeyer")
            .field("parts", &self.parts)
            .finish()
    }
}

pub struct ResPairKeyerBuilder<E, C> {
    parts: Vec<Box<dyn DynKeyerPart<E, C>>>,
}

impl<E, C> Default for ResPairKeyerBuilder<E, C> {
    fn default() -> Self {
        Self { parts: Vec::new() }
    }
}

impl<E, C> ResPairKeyerBuilder<E, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part<P: DynKeyerPart<E, C> + 'static>(mut self, part: P) -> Self {
        self.parts.push(Box::new(part));
        self
    }

    pub fn build(self) -> Result<ResPairKeyer<E, C>, ConfigError> {
        let found = self.parts.len();
        if found == 0 || found > MAX_KEY_ARITY {
            return Err(ConfigError::InvalidKeyerArity {
                found,
                max: MAX_KEY_ARITY,
            });
        }
        Ok(ResPairKeyer { parts: self.parts })
    }
}

/// Odometer over per-dimension close cells; the last dimension turns fastest.
#[derive(Debug, Clone)]
pub struct CloseKeys {
    lists: Vec<CloseKeyParts>,
    positions: Vec<usize>,
    exhausted: bool,
}

impl CloseKeys {
    fn new(lists: Vec<CloseKeyParts>) -> Self {
        let exhausted = lists.iter().any(Vec::is_empty);
        let positions = vec![0; lists.len()];
        Self {
            lists,
            positions,
            exhausted,
        }
    }

    /// Total number of keys, including any already yielded.
    pub fn total(&self) -> usize {
        self.lists.iter().map(Vec::len).product()
    }

    fn current(&self) -> Key {
        let mut cells = [0; MAX_KEY_ARITY];
        for ((cell, list), &position) in cells.iter_mut().zip(&self.lists).zip(&self.positions) {
            *cell = list[position];
        }
        Key::from_array(cells, self.lists.len())
    }

    fn advance(&mut self) {
        for dim in (0..self.lists.len()).rev() {
            self.positions[dim] += 1;
            if self.positions[dim] < self.lists[dim].len() {
                return;
            }
            self.positions[dim] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for CloseKeys {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        if self.exhausted {
            return None;
        }
        let key = self.current();
        self.advance();
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::protein::test_fixtures::{helix, strand};
    use crate::core::utils::angle::Angle;
    use crate::engine::criteria::{QuadCriteria, make_default_quad_criteria};
    use crate::engine::keyer::parts::{AngleKeyerPart, AxisKeyerPart, IndexDirectionKeyerPart};
    use crate::engine::res_pair::SingleStrucResPair;

    type Keyer = ResPairKeyer<SingleStrucResPair, QuadCriteria>;

    fn full_keyer(view_width: f32, angle_degrees: f32) -> Keyer {
        let angle = Angle::from_degrees(angle_degrees);
        ResPairKeyer::builder()
            .part(AngleKeyerPart::from_phi(angle).unwrap())
            .part(AngleKeyerPart::from_psi(angle).unwrap())
            .part(AngleKeyerPart::to_phi(angle).unwrap())
            .part(AngleKeyerPart::to_psi(angle).unwrap())
            .part(IndexDirectionKeyerPart)
            .part(AxisKeyerPart::x(view_width).unwrap())
            .part(AxisKeyerPart::y(view_width).unwrap())
            .part(AxisKeyerPart::z(view_width).unwrap())
            .build()
            .unwrap()
    }

    fn sample_pairs() -> Vec<SingleStrucResPair> {
        let mut pairs = Vec::new();
        for protein in [helix("h", 14), strand("s", 14)] {
            for (from, to) in [(0, 13), (13, 0), (2, 9), (6, 5), (11, 1)] {
                pairs.push(SingleStrucResPair::from_protein(&protein, from, to).unwrap());
            }
        }
        pairs
    }

    #[test]
    fn builder_rejects_empty_and_oversized_keyers() {
        let empty = Keyer::builder().build();
        assert!(matches!(
            empty,
            Err(ConfigError::InvalidKeyerArity { found: 0, .. })
        ));

        let mut builder = Keyer::builder();
        for _ in 0..=MAX_KEY_ARITY {
            builder = builder.part(AxisKeyerPart::x(1.0).unwrap());
        }
        assert!(matches!(
            builder.build(),
            Err(ConfigError::InvalidKeyerArity { found: 9, max: 8 })
        ));
    }

    #[test]
    fn part_names_follow_insertion_order() {
        let keyer = full_keyer(10.0, 120.0);
        assert_eq!(
            keyer.part_names(),
            vec![
                "from_phi",
                "from_psi",
                "to_phi",
                "to_psi",
                "index_direction",
                "view_x",
                "view_y",
                "view_z"
            ]
        );
        assert_eq!(keyer.arity(), 8);
    }

    #[test]
    fn close_keys_always_include_the_entry_key() {
        let criteria = make_default_quad_criteria();
        for (view_width, angle_degrees) in [(10.0, 120.0), (3.0, 45.0)] {
            let keyer = full_keyer(view_width, angle_degrees);
            for pair in sample_pairs() {
                let key = keyer.make_key(&pair);
                let mut close = keyer.make_close_keys(&pair, &criteria).unwrap();
                assert!(close.any(|k| k == key), "missing {key} for {pair:?}");
            }
        }
    }

    #[test]
    fn close_keys_enumerate_the_full_cross_product_without_repeats() {
        let criteria = make_default_quad_criteria();
        let keyer = full_keyer(3.0, 45.0);
        let pair = sample_pairs()[2];
        let close = keyer.make_close_keys(&pair, &criteria).unwrap();
        let total = close.total();
        let keys: Vec<Key> = close.collect();
        assert_eq!(keys.len(), total);
        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), total);
    }

    #[test]
    fn close_keys_are_produced_lazily() {
        let criteria = make_default_quad_criteria();
        let keyer = full_keyer(0.5, 7.0);
        let pair = sample_pairs()[0];
        let mut close = keyer.make_close_keys(&pair, &criteria).unwrap();
        assert!(close.total() > 1_000_000);
        assert_eq!(close.by_ref().take(3).count(), 3);
        assert!(close.next().is_some());
    }

    #[test]
    fn bounding_keys_enclose_every_close_key() {
        let criteria = make_default_quad_criteria();
        let keyer = full_keyer(4.0, 60.0);
        for pair in sample_pairs() {
            let min = keyer.make_min_close_key(&pair, &criteria).unwrap();
            let max = keyer.make_max_close_key(&pair, &criteria).unwrap();
            for key in keyer.make_close_keys(&pair, &criteria).unwrap() {
                assert_eq!(key.elementwise_max(&min), key);
                assert_eq!(key.elementwise_min(&max), key);
            }
        }
    }

    #[test]
    fn debug_lists_parts() {
        let keyer: Keyer = ResPairKeyer::builder()
            .part(AxisKeyerPart::x(1.0).unwrap())
            .build()
            .unwrap();
        assert!(format!("{keyer:?}").contains("AxisKeyerPart"));
    }
}
