/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

// PEAS - Performance, Environment, Action, Sensing
//
// Performance is the share of the area left without dust when the power or time budget runs out.
// The environment is a grid of cells with elevation deltas and hidden dust weights. The agent can
// rotate, move, vacuum at two pressures and sense; every action costs power and one tick.

pub mod actuators;
pub mod agent_state;
pub mod area;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod policy;
pub mod sensors;
pub mod settings;
pub mod simulation;

pub use actuators::{Action, ActuatorController, Outcome};
pub use agent_state::AgentState;
pub use area::{Area, AreaError, Cell, Elevation, Pressure, Texture};
pub use error::SimulationError;
pub use geometry::{Coord, Heading, Side};
pub use loader::{load_area, load_settings, parse_area, parse_settings, LoadError};
pub use policy::{DecisionEngine, Mode};
pub use sensors::{ElevationReading, Percept, SensorSuite};
pub use settings::{DeviceConfig, Settings};
pub use simulation::{CleaningAgent, Report, Simulation, Step, Termination};

pub type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Percept, the Agent returns an Action, or `None` once it has nothing left to do.
///
/// Notice that the Agent is not aware of the area or of its own budget. Its only interface is the
/// Percept coming in and the Action going out; anything it wants to remember about the area it
/// has to build up from those.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept) -> Option<Self::Action>;

    /// Called by the simulation when the budget runs out. Further calls to `act` should return
    /// `None`.
    fn halt(&mut self) {}
}
