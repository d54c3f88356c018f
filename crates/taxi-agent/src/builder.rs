//! Fluent builder for constructing an `AgentStore`.
//!
//! # Usage
//!
//! ```rust
//! use taxi_agent::AgentStoreBuilder;
//! use taxi_core::Vec3;
//!
//! let mut b = AgentStoreBuilder::new();
//! let a = b.add_agent("Taxi A", Vec3::ground(0.0, 0.0), 0.0);
//! let c = b.add_agent("", Vec3::ground(4.0, 0.0), 0.0);
//! let store = b.build();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(store.name[a.index()], "Taxi A");
//! assert_eq!(store.name[c.index()], "Agent 1"); // blank names get a default
//! ```

use taxi_core::{AgentId, Vec3};

use crate::{AgentStore, TelemetryConfig};

/// Fluent builder for [`AgentStore`].
///
/// `AgentId`s are assigned sequentially from 0 in `add_agent` order.
#[derive(Default)]
pub struct AgentStoreBuilder {
    names:     Vec<String>,
    positions: Vec<Vec3>,
    yaws:      Vec<f32>,
    telemetry: TelemetryConfig,
}

impl AgentStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed measurement settings for every agent.
    pub fn telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry = config;
        self
    }

    /// Add one agent at `position` facing `yaw`.
    ///
    /// A blank `name` is replaced with `"Agent <id>"`.
    pub fn add_agent(&mut self, name: impl Into<String>, position: Vec3, yaw: f32) -> AgentId {
        let id = AgentId(self.names.len() as u32);
        let name = name.into();
        let name = if name.trim().is_empty() { format!("Agent {}", id.0) } else { name };
        self.names.push(name);
        self.positions.push(position);
        self.yaws.push(yaw);
        id
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    /// Construct the store.  Telemetry starts at zero and every status at
    /// `Idle`.
    pub fn build(self) -> AgentStore {
        AgentStore::new(self.names, self.positions, self.yaws, self.telemetry)
    }
}
