//! Weighted populations of machines or tapes.
//!
//! A population maps each distinct entity to a real-valued abundance.
//! Entities are keyed by their canonical integer encoding and kept in key
//! order, so iteration (and therefore sampling) is reproducible for a
//! given random source.

// Weights are truncated to whole units for drawing
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::chem::{Machine, Tape};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::fmt;

/// Something that can live in a [`Population`].
pub trait Entity: Clone + fmt::Debug {
    /// Canonical value identifying the entity. Equal keys are the same entity.
    type Key: Ord + Copy + fmt::Debug;

    /// This entity's key.
    fn key(&self) -> Self::Key;

    /// Human-readable label used in snapshots.
    fn label(&self) -> String;
}

impl Entity for Machine {
    type Key = u16;

    fn key(&self) -> u16 {
        self.encoding()
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

impl Entity for Tape {
    type Key = u64;

    fn key(&self) -> u64 {
        self.value()
    }

    fn label(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone)]
struct Slot<E> {
    entity: E,
    weight: f64,
}

/// A weighted multiset of entities.
#[derive(Debug, Clone)]
pub struct Population<E: Entity> {
    slots: BTreeMap<E::Key, Slot<E>>,
}

impl<E: Entity> Default for Population<E> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<E: Entity> Population<E> {
    /// Create an empty population.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase `entity`'s weight by `amount`, inserting it if absent.
    pub fn add(&mut self, entity: E, amount: f64) {
        self.slots
            .entry(entity.key())
            .or_insert_with(|| Slot { entity, weight: 0.0 })
            .weight += amount;
    }

    /// Multiply every weight by `1 - rate`.
    pub fn decay(&mut self, rate: f64) {
        let factor = 1.0 - rate;
        for slot in self.slots.values_mut() {
            slot.weight *= factor;
        }
    }

    /// Remove every entity lighter than `threshold`. Returns how many were removed.
    pub fn prune(&mut self, threshold: f64) -> usize {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.weight >= threshold);
        before - self.slots.len()
    }

    /// Draw `k` entities with probability proportional to weight.
    ///
    /// Draw points are uniform integers below the truncated total weight.
    /// They are sorted, assigned to entities in one pass over the
    /// cumulative weights, and the picks are shuffled. An entity can be
    /// drawn more than once. Returns nothing when the truncated total is
    /// zero or not finite.
    pub fn sample<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<E> {
        let total = self.total_weight().floor();
        if !total.is_finite() || total < 1.0 {
            return Vec::new();
        }
        let upper = total as u64;

        let mut draws: Vec<u64> = (0..k).map(|_| rng.gen_range(0..upper)).collect();
        draws.sort_unstable();
        let mut draws = draws.into_iter().peekable();

        let mut picks = Vec::with_capacity(k);
        let mut cumulative = 0.0;
        for slot in self.slots.values() {
            if draws.peek().is_none() {
                break;
            }
            cumulative += slot.weight;
            while draws.next_if(|&d| (d as f64) < cumulative).is_some() {
                picks.push(slot.entity.clone());
            }
        }

        picks.shuffle(rng);
        picks
    }

    /// Whether no entity remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.slots.values().map(|slot| slot.weight).sum()
    }

    /// Weight of `entity`, or `None` if absent.
    #[must_use]
    pub fn weight(&self, entity: &E) -> Option<f64> {
        self.slots.get(&entity.key()).map(|slot| slot.weight)
    }

    /// Entities and their weights, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&E, f64)> {
        self.slots.values().map(|slot| (&slot.entity, slot.weight))
    }

    /// Labels and weights, in key order.
    #[must_use]
    pub fn labelled(&self) -> BTreeMap<String, f64> {
        self.entries().map(|(e, w)| (e.label(), w)).collect()
    }
}

impl<E: Entity> FromIterator<(E, f64)> for Population<E> {
    fn from_iter<I: IntoIterator<Item = (E, f64)>>(iter: I) -> Self {
        let mut population = Self::new();
        for (entity, weight) in iter {
            population.add(entity, weight);
        }
        population
    }
}
