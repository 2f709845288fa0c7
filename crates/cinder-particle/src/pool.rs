//! Arena pool of particles.
//!
//! Particles live in a `Vec` of slots addressed by [`ParticleHandle`]. The
//! pool tracks which slots are active and which are free; particles carry no
//! membership links of their own. After each [`ParticlePool::update`] the
//! pool sweeps every particle that is no longer active onto the free list, so
//! `active_count() + free_count() == capacity()` holds between calls.
//! [`ParticlePool::kill`] ends a life early and frees the slot immediately.

use cinder_common::ParticleHandle;
use tracing::debug;

use crate::behavior::ParticleBehavior;
use crate::config::ParticleTemplate;
use crate::particle::{LifecycleState, Particle};
use crate::sprite::DisplayTree;

/// Owns every particle of one emitter.
#[derive(Debug)]
pub struct ParticlePool<B: ParticleBehavior + Default> {
    slots: Vec<Particle<B>>,
    active: Vec<ParticleHandle>,
    free: Vec<ParticleHandle>,
    recycled: Vec<ParticleHandle>,
}

impl<B: ParticleBehavior + Default> Default for ParticlePool<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ParticleBehavior + Default> ParticlePool<B> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty pool with room for `capacity` particles.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            free: Vec::new(),
            recycled: Vec::new(),
        }
    }

    /// Takes a free particle (or allocates one), configures it from
    /// `template`, lets `setup` set per-spawn fields, then calls `init`.
    pub fn spawn(
        &mut self,
        template: &ParticleTemplate,
        setup: impl FnOnce(&mut Particle<B>),
    ) -> ParticleHandle {
        let handle = if let Some(handle) = self.free.pop() {
            debug!(slot = handle.index(), "Reusing particle slot");
            handle
        } else {
            let handle = ParticleHandle::from_index(self.slots.len());
            self.slots.push(Particle::new(handle, B::default()));
            debug!(slot = handle.index(), total = self.slots.len(), "Grew particle pool");
            handle
        };

        let particle = &mut self.slots[handle.index()];
        particle.apply_template(template);
        setup(particle);
        particle.init();

        self.active.push(handle);
        handle
    }

    /// Advances every active particle by `delta` seconds.
    ///
    /// Every particle that is no longer active afterwards moves to the free
    /// list, including ones killed outside the pool. Returns how many left
    /// the active list.
    pub fn update(&mut self, delta: f32) -> usize {
        let Self {
            slots,
            active,
            free,
            recycled,
        } = self;

        for handle in active.iter() {
            if let Some(particle) = slots.get_mut(handle.index()) {
                particle.update(delta, &mut *recycled);
            }
        }

        let before = free.len();
        active.retain(|handle| {
            let alive = slots
                .get(handle.index())
                .is_some_and(|p| p.state() == LifecycleState::Active);
            if !alive {
                free.push(*handle);
            }
            alive
        });
        recycled.clear();

        free.len() - before
    }

    /// Kills a live particle and returns its slot to the free list at once.
    ///
    /// Returns false if `handle` does not name an active particle.
    pub fn kill(&mut self, handle: ParticleHandle) -> bool {
        let Some(particle) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if !particle.state().is_active() {
            return false;
        }

        particle.kill(&mut self.recycled);
        self.active.retain(|h| *h != handle);
        self.free.append(&mut self.recycled);
        true
    }

    /// Looks up a particle.
    #[must_use]
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle<B>> {
        if !handle.is_valid() {
            return None;
        }
        self.slots.get(handle.index())
    }

    /// Looks up a particle mutably.
    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle<B>> {
        if !handle.is_valid() {
            return None;
        }
        self.slots.get_mut(handle.index())
    }

    /// Iterates over active particles in spawn order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Particle<B>> + '_ {
        self.active
            .iter()
            .filter_map(|handle| self.slots.get(handle.index()))
    }

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of particles waiting for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total particles ever allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Destroys every particle, live or pooled, and empties the pool.
    pub fn destroy_all(&mut self, display: &mut impl DisplayTree) {
        let count = self.slots.len();
        for particle in self.slots.drain(..) {
            particle.destroy(display);
        }
        self.active.clear();
        self.free.clear();
        self.recycled.clear();
        debug!(count, "Destroyed particle pool");
    }
}
