//! Contact detection and the collision event log.
//!
//! A contact is two live bodies closer than twice the body radius.  Only the
//! tick on which a pair *starts* touching produces an event; a pair that
//! stays in contact is not reported again until it has separated.

use std::collections::{HashMap, VecDeque};

use taxi_agent::AgentStore;
use taxi_core::{AgentId, Tick};

#[cfg(feature = "fx-hash")]
pub(crate) type PairSet = rustc_hash::FxHashSet<(AgentId, AgentId)>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type PairSet = std::collections::HashSet<(AgentId, AgentId)>;

/// Pair key with the lower ID first.
#[inline]
fn pair(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
    if a <= b { (a, b) } else { (b, a) }
}

// ── CollisionEvent ────────────────────────────────────────────────────────────

/// One new contact between two agents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollisionEvent {
    pub tick: Tick,
    /// Sim time in seconds.
    pub time: f32,
    /// Lower ID of the pair.
    pub a: AgentId,
    pub b: AgentId,
    /// `"<a name> collided with <b name>"`.
    pub message: String,
}

impl CollisionEvent {
    pub fn new(tick: Tick, time: f32, a: AgentId, b: AgentId, store: &AgentStore) -> Self {
        let (a, b) = pair(a, b);
        let name = |x: AgentId| store.name.get(x.index()).map(String::as_str).unwrap_or("?");
        let message = format!("{} collided with {}", name(a), name(b));
        Self { tick, time, a, b, message }
    }

    pub fn involves(&self, agent: AgentId) -> bool {
        self.a == agent || self.b == agent
    }
}

// ── CollisionLog ──────────────────────────────────────────────────────────────

/// Bounded history of recent collisions plus the last event per pair.
///
/// Events older than `expiry_secs` are no longer "recent" but stay in the
/// per-pair table; the history drops its oldest entry once `capacity` is
/// reached.
#[derive(Clone, Debug)]
pub struct CollisionLog {
    pub capacity: usize,
    pub expiry_secs: f32,
    events: VecDeque<CollisionEvent>,
    last_by_pair: HashMap<(AgentId, AgentId), CollisionEvent>,
}

impl Default for CollisionLog {
    fn default() -> Self {
        Self::new(32, 3.0)
    }
}

impl CollisionLog {
    pub fn new(capacity: usize, expiry_secs: f32) -> Self {
        Self {
            capacity: capacity.max(1),
            expiry_secs,
            events: VecDeque::new(),
            last_by_pair: HashMap::new(),
        }
    }

    pub fn record(&mut self, event: CollisionEvent) {
        self.last_by_pair.insert(pair(event.a, event.b), event.clone());
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter()
    }

    /// Events that have not yet expired at `now`, oldest first.
    pub fn recent(&self, now: f32) -> impl Iterator<Item = &CollisionEvent> {
        let expiry = self.expiry_secs;
        self.events.iter().filter(move |e| now - e.time <= expiry)
    }

    /// Message of the newest unexpired event.
    pub fn latest_message(&self, now: f32) -> Option<&str> {
        self.recent(now).last().map(|e| e.message.as_str())
    }

    /// Last event between `a` and `b` in either order, however old.
    pub fn last_between(&self, a: AgentId, b: AgentId) -> Option<&CollisionEvent> {
        self.last_by_pair.get(&pair(a, b))
    }

    /// Last event between `a` and `b`, unless it expired before `now`.
    pub fn unexpired_between(&self, a: AgentId, b: AgentId, now: f32) -> Option<&CollisionEvent> {
        self.last_between(a, b).filter(|e| now - e.time <= self.expiry_secs)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Contact detection ─────────────────────────────────────────────────────────

/// All pairs of live agents whose bodies overlap, lower ID first.
pub(crate) fn touching_pairs(store: &AgentStore, body_radius: f32) -> Vec<(AgentId, AgentId)> {
    let reach2 = (2.0 * body_radius) * (2.0 * body_radius);
    let live: Vec<AgentId> = store.agent_ids().filter(|&a| store.is_alive(a)).collect();
    let mut out = Vec::new();
    for (i, &a) in live.iter().enumerate() {
        let pa = store.position[a.index()];
        for &b in &live[i + 1..] {
            if (store.position[b.index()] - pa).flat().length_sq() < reach2 {
                out.push((a, b));
            }
        }
    }
    out
}
