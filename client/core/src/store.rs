//! Field Store
//!
//! The process-wide shared field state: grid size, entity rosters, and the
//! two overlay caches. Exactly one writer is active at a time — the
//! synchronization client in online mode, the simulators in offline mode —
//! while the render projection and any number of other readers poll.
//!
//! [`FieldStore`] is a cheap-to-clone handle; every operation takes the
//! inner lock exactly once, so each write (including a full snapshot
//! application) is atomic from a reader's perspective.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::FieldConfig;
use crate::coord::Position;
use crate::entity::{Crab, Food};
use crate::overlay::{paint_color, OverlayCache};
use crate::protocol::StateSnapshot;

/// Everything the render projection reads each frame.
#[derive(Debug)]
pub struct FieldState {
    field_size: u32,
    food_cap: usize,
    decoration_ratio: f64,
    crabs: Vec<Crab>,
    foods: Vec<Food>,
    decoration: OverlayCache,
    paint: OverlayCache,
}

impl FieldState {
    fn new(config: &FieldConfig) -> Self {
        Self {
            field_size: config.field_size,
            food_cap: config.food_cap,
            decoration_ratio: config.decoration_ratio,
            crabs: Vec::new(),
            foods: Vec::new(),
            decoration: OverlayCache::new(config.decoration_capacity()),
            paint: OverlayCache::new(config.paint_capacity()),
        }
    }

    /// Grid dimension, cells per side.
    #[must_use]
    pub fn field_size(&self) -> u32 {
        self.field_size
    }

    /// Current crab roster.
    #[must_use]
    pub fn crabs(&self) -> &[Crab] {
        &self.crabs
    }

    /// Current food roster, most recently spawned first.
    #[must_use]
    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    /// The ambient decoration overlay.
    #[must_use]
    pub fn decoration(&self) -> &OverlayCache {
        &self.decoration
    }

    /// The painted-cell overlay.
    #[must_use]
    pub fn paint(&self) -> &OverlayCache {
        &self.paint
    }

    /// Adopt a new grid size: re-derive overlay capacities and drop
    /// decoration entries outside the new bounds.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn resize(&mut self, field_size: u32) {
        self.field_size = field_size;
        let cells = f64::from(field_size) * f64::from(field_size);
        let decoration_capacity = ((cells * self.decoration_ratio).floor() as usize).max(1);
        self.decoration.set_capacity(decoration_capacity);
        self.decoration.retain_within(field_size);
        self.paint
            .set_capacity(((field_size as usize) * (field_size as usize)).max(1));
    }
}

/// Shared handle to the field state.
#[derive(Clone)]
pub struct FieldStore {
    inner: Arc<RwLock<FieldState>>,
}

impl FieldStore {
    /// Create an empty store sized by `config`.
    #[must_use]
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FieldState::new(config))),
        }
    }

    /// Read the state under the lock without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&FieldState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Current grid dimension.
    #[must_use]
    pub fn field_size(&self) -> u32 {
        self.inner.read().field_size
    }

    /// Snapshot of the crab roster.
    #[must_use]
    pub fn crabs(&self) -> Vec<Crab> {
        self.inner.read().crabs.clone()
    }

    /// Snapshot of the food roster, most recently spawned first.
    #[must_use]
    pub fn foods(&self) -> Vec<Food> {
        self.inner.read().foods.clone()
    }

    /// Wholesale-replace the crab roster.
    pub fn replace_crabs(&self, crabs: Vec<Crab>) {
        self.inner.write().crabs = crabs;
    }

    /// Wholesale-replace the food roster.
    pub fn replace_foods(&self, foods: Vec<Food>) {
        self.inner.write().foods = foods;
    }

    /// Apply a pure per-crab transform. Every crab sees the same pre-tick
    /// snapshot; there is no intra-tick ordering dependency between crabs.
    pub fn mutate_crabs(&self, mut f: impl FnMut(&Crab) -> Crab) {
        let mut state = self.inner.write();
        let next: Vec<Crab> = state.crabs.iter().map(&mut f).collect();
        state.crabs = next;
    }

    /// Prepend a freshly spawned food item.
    ///
    /// Refuses (returning `false`, no error) once the store holds the
    /// configured cap. Duplicate positions are permitted.
    pub fn try_spawn_food(&self, food: Food) -> bool {
        let mut state = self.inner.write();
        if state.foods.len() >= state.food_cap {
            return false;
        }
        state.foods.insert(0, food);
        true
    }

    /// Upsert an ambient decoration color.
    pub fn decorate(&self, position: Position, color: String) {
        self.inner.write().decoration.upsert(position, color);
    }

    /// Apply a full authoritative snapshot under one lock acquisition.
    ///
    /// Field size, crab roster, and food roster are wholesale-replaced, and
    /// the paint overlay is rebuilt from scratch out of the snapshot's
    /// claims. The decoration overlay is untouched except for dropping
    /// entries a smaller grid can no longer address.
    pub fn apply_snapshot(&self, snapshot: StateSnapshot) {
        let mut state = self.inner.write();
        if snapshot.size != state.field_size {
            state.resize(snapshot.size);
        }
        state.crabs = snapshot.crabs;
        state.foods = snapshot.foods;
        state.paint.clear();
        for claim in snapshot.paints {
            state.paint.upsert(claim.position, paint_color(claim.hue));
        }
    }
}
