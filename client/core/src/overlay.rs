//! Bounded Overlay Caches
//!
//! A sparse, capacity-bounded coloring of field cells. Two independent
//! instances exist with identical shape and different semantics:
//!
//! - **Decoration**: ambient low-opacity colors, continuously regenerated by
//!   the decoration painter.
//! - **Paint**: claimed cells, rebuilt wholesale from each authoritative
//!   snapshot's claims.
//!
//! # Eviction
//!
//! The map never grows past its capacity. Eviction is FIFO by first
//! insertion, not LRU: when a *new* key arrives at capacity, the oldest
//! entry (first in iteration order) is removed. Overwriting an existing key
//! replaces its color but keeps its original insertion slot and never
//! evicts. There is no read-side eviction and no TTL; insertion pressure is
//! the only driver.

use indexmap::IndexMap;
use rand::Rng;

use crate::coord::Position;

/// Capacity-bounded, insertion-ordered mapping from cell to CSS color.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayCache {
    entries: IndexMap<Position, String>,
    capacity: usize,
}

impl OverlayCache {
    /// Create an empty cache. A capacity of zero is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// The maximum number of entries the cache will hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity, evicting oldest entries if the cache shrank.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.shift_remove_index(0);
        }
    }

    /// Insert or overwrite the color at `position`.
    ///
    /// An existing key keeps its insertion slot. A new key at capacity
    /// evicts the oldest entry first, so the size never exceeds capacity.
    pub fn upsert(&mut self, position: Position, color: String) {
        if let Some(slot) = self.entries.get_mut(&position) {
            *slot = color;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(position, color);
    }

    /// The color at `position`, if any.
    #[must_use]
    pub fn get(&self, position: &Position) -> Option<&str> {
        self.entries.get(position).map(String::as_str)
    }

    /// Number of colored cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no cell is colored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries outside `[0, field_size)²`, preserving insertion order.
    pub fn retain_within(&mut self, field_size: u32) {
        self.entries
            .retain(|position, _| position.x < field_size && position.y < field_size);
    }

    /// Entries in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&Position, &str)> {
        self.entries.iter().map(|(p, c)| (p, c.as_str()))
    }

    /// Entries as `(canonical cell key, color)`, for key-addressed
    /// renderers.
    pub fn iter_keyed(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.entries.iter().map(|(p, c)| (p.key(), c.as_str()))
    }
}

/// Random ambient decoration color: random hue, bounded saturation, fixed
/// lightness, fixed low alpha.
#[must_use]
pub fn decoration_color<R: Rng>(rng: &mut R) -> String {
    let hue = rng.gen_range(0..360);
    let saturation = rng.gen_range(40..80);
    format!("hsla({hue}, {saturation}%, 60%, 0.07)")
}

/// Color of a painted (claimed) cell: the claim's hue at fixed saturation,
/// fixed lightness, half opacity.
#[must_use]
pub fn paint_color(hue: f32) -> String {
    format!("hsla({hue}, 70%, 30%, 0.5)")
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pos(x: u32, y: u32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn insertion_beyond_capacity_evicts_oldest_first() {
        let mut cache = OverlayCache::new(3);
        cache.upsert(pos(0, 0), "a".into());
        cache.upsert(pos(1, 0), "b".into());
        cache.upsert(pos(2, 0), "c".into());
        cache.upsert(pos(3, 0), "d".into());

        assert_eq!(cache.len(), 3);
        assert!(cache.get(&pos(0, 0)).is_none());
        let order: Vec<Position> = cache.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![pos(1, 0), pos(2, 0), pos(3, 0)]);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut cache = OverlayCache::new(4);
        for x in 0..100 {
            cache.upsert(pos(x, 0), "c".into());
            assert!(cache.len() <= 4);
        }
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn overwrite_keeps_insertion_slot_and_does_not_evict() {
        let mut cache = OverlayCache::new(2);
        cache.upsert(pos(0, 0), "old".into());
        cache.upsert(pos(1, 0), "b".into());

        // Overwrite the oldest entry, then insert a new key: the overwritten
        // entry must still be the one evicted (FIFO, not LRU).
        cache.upsert(pos(0, 0), "new".into());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&pos(0, 0)), Some("new"));

        cache.upsert(pos(2, 0), "c".into());
        assert!(cache.get(&pos(0, 0)).is_none());
        assert_eq!(cache.get(&pos(1, 0)), Some("b"));
        assert_eq!(cache.get(&pos(2, 0)), Some("c"));
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let mut cache = OverlayCache::new(0);
        cache.upsert(pos(0, 0), "a".into());
        cache.upsert(pos(1, 0), "b".into());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&pos(1, 0)), Some("b"));
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut cache = OverlayCache::new(4);
        for x in 0..4 {
            cache.upsert(pos(x, 0), "c".into());
        }
        cache.set_capacity(2);
        let order: Vec<Position> = cache.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![pos(2, 0), pos(3, 0)]);
    }

    #[test]
    fn retain_within_drops_out_of_bounds_cells() {
        let mut cache = OverlayCache::new(10);
        cache.upsert(pos(0, 0), "a".into());
        cache.upsert(pos(5, 2), "b".into());
        cache.upsert(pos(2, 5), "c".into());
        cache.retain_within(5);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&pos(0, 0)), Some("a"));
    }

    #[test]
    fn keyed_iteration_uses_the_canonical_cell_key() {
        let mut cache = OverlayCache::new(4);
        cache.upsert(pos(3, 7), "a".into());
        cache.upsert(pos(0, 1), "b".into());

        let keyed: Vec<(String, String)> = cache
            .iter_keyed()
            .map(|(k, c)| (k, c.to_string()))
            .collect();
        assert_eq!(
            keyed,
            vec![
                ("3,7".to_string(), "a".to_string()),
                ("0,1".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn decoration_color_is_low_alpha_hsla() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let color = decoration_color(&mut rng);
            assert!(color.starts_with("hsla("));
            assert!(color.ends_with(", 60%, 0.07)"));
        }
    }

    #[test]
    fn paint_color_is_half_opacity_at_fixed_saturation() {
        assert_eq!(paint_color(120.0), "hsla(120, 70%, 30%, 0.5)");
        assert_eq!(paint_color(37.5), "hsla(37.5, 70%, 30%, 0.5)");
    }
}
