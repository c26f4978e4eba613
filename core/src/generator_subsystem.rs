//! Emergency generator: feeds new incidents into the store.
//!
//! Every `interval_ticks` the generator rolls once; on success, and only
//! while fewer than `max_open` emergencies are active or assigned, it
//! creates one emergency.
//!
//! Selection is deterministic round-robin, not random:
//!   - the type cursor walks the catalog in order,
//!   - the description cursor is shared across types and advances on
//!     every call, indexing into that type's description list,
//!   - each type's descriptions and priorities are shuffled once, when
//!     the generator is built, and its priority is the first entry of
//!     that shuffle for the whole session.
//!
//! Execution: every tick (acts on interval boundaries).
//! Depends on: none.

use crate::{
    config::GenerationConfig,
    emergency::{Emergency, EmergencyKind, Priority},
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    store::SimStore,
    subsystem::SimSubsystem,
    types::{Millis, Tick, TICK_MS},
};

struct CatalogEntry {
    kind: EmergencyKind,
    descriptions: Vec<&'static str>,
    priority: Priority,
}

pub struct GeneratorSubsystem {
    config: GenerationConfig,
    catalog: Vec<CatalogEntry>,
    type_cursor: usize,
    description_cursor: usize,
}

impl GeneratorSubsystem {
    /// `rng` must be the session-setup stream; the catalog order it
    /// produces is fixed for the rest of the session.
    pub fn new(config: GenerationConfig, rng: &mut SubsystemRng) -> Self {
        let catalog = EmergencyKind::ALL
            .iter()
            .map(|&kind| {
                let mut descriptions = kind.descriptions().to_vec();
                rng.shuffle(&mut descriptions);
                let mut priorities = kind.allowed_priorities().to_vec();
                rng.shuffle(&mut priorities);
                CatalogEntry {
                    kind,
                    descriptions,
                    // allowed_priorities() is never empty.
                    priority: priorities[0],
                }
            })
            .collect();

        Self {
            config,
            catalog,
            type_cursor: 0,
            description_cursor: 0,
        }
    }

    /// The priority every emergency of `kind` gets this session.
    pub fn session_priority(&self, kind: EmergencyKind) -> Option<Priority> {
        self.catalog.iter().find(|c| c.kind == kind).map(|c| c.priority)
    }

    /// Build the next emergency in catalog order. Advances both cursors.
    pub fn generate(&mut self, seq: u64, now: Millis) -> Emergency {
        let entry = &self.catalog[self.type_cursor % self.catalog.len()];
        let description = entry.descriptions[self.description_cursor % entry.descriptions.len()];
        let emergency = Emergency::new(seq, entry.kind, description, entry.priority, now);

        self.type_cursor += 1;
        self.description_cursor += 1;
        emergency
    }
}

impl SimSubsystem for GeneratorSubsystem {
    fn name(&self) -> &'static str {
        "generator"
    }

    fn update(
        &mut self,
        tick: Tick,
        store: &mut SimStore,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        if !tick.is_multiple_of(self.config.interval_ticks) {
            return Ok(vec![]);
        }
        if !rng.chance(self.config.probability) {
            return Ok(vec![]);
        }

        let open = store.open_emergency_count();
        if open >= self.config.max_open {
            log::debug!("tick={tick} generator: cap reached ({open} open), skipping");
            return Ok(vec![]);
        }

        let seq = store.next_emergency_seq();
        let emergency = self.generate(seq, tick * TICK_MS);

        log::info!(
            "tick={tick} generator: {} [{:?}] {} - {}",
            emergency.id, emergency.priority, emergency.kind.label(), emergency.description
        );

        let event = SimEvent::EmergencyGenerated {
            tick,
            emergency_id: emergency.id.clone(),
            kind: emergency.kind,
            priority: emergency.priority,
            description: emergency.description.clone(),
        };
        store.insert_emergency(emergency);
        Ok(vec![event])
    }
}
