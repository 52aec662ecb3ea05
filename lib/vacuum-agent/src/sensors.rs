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

//! What the agent is allowed to know about the area.
//!
//! Sensors never expose a dust weight, only whether dust is present, and elevation only as the
//! delta relative to the current cell.

use crate::actuators::Outcome;
use crate::agent_state::AgentState;
use crate::area::Area;
use crate::error::SimulationError;
use crate::geometry::{Coord, Heading};
use crate::settings::Settings;

/// Result of looking towards a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElevationReading {
    /// Signed height change to the neighbor.
    Delta(i32),

    /// There is no neighbor in that direction.
    Boundary,
}

impl ElevationReading {
    /// Whether a device that can climb `max_climb` may cross here.
    pub fn is_passable(self, max_climb: i32) -> bool {
        match self {
            ElevationReading::Delta(delta) => delta.abs() <= max_climb,
            ElevationReading::Boundary => false,
        }
    }
}

/// Everything the policy receives at the start of a step: the per-step dirt reading, the device's
/// own odometry, and the outcome of the previous action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percept {
    /// Where the device is.
    pub position: Coord,

    /// Which way it faces.
    pub heading: Heading,

    /// Dirt sensor reading for the current cell.
    pub has_dust: bool,

    /// What the previous action did, if there was one.
    pub last_outcome: Option<Outcome>,
}

/// Budget-charging, read-only view of the area around the device.
pub struct SensorSuite<'a> {
    area: &'a Area,
    settings: &'a Settings,
    max_climb: i32,
}

impl<'a> SensorSuite<'a> {
    pub fn new(area: &'a Area, settings: &'a Settings, max_climb: i32) -> Self {
        Self {
            area,
            settings,
            max_climb,
        }
    }

    /// Whether the current cell has dust.
    pub fn sense_dirt(&self, agent: &mut AgentState) -> Result<bool, SimulationError> {
        self.charge(agent)?;
        self.dirt_at(agent.position())
    }

    /// Elevation delta from the current cell towards `heading`.
    pub fn sense_elevation(
        &self,
        agent: &mut AgentState,
        heading: Heading,
    ) -> Result<ElevationReading, SimulationError> {
        self.charge(agent)?;
        self.elevation_at(agent.position(), heading)
    }

    /// Whether a move towards `heading` would be refused.
    pub fn sense_bump(
        &self,
        agent: &mut AgentState,
        heading: Heading,
    ) -> Result<bool, SimulationError> {
        self.charge(agent)?;
        let passable = self
            .area
            .can_traverse(agent.position(), heading, self.max_climb)?;
        Ok(!passable)
    }

    fn charge(&self, agent: &mut AgentState) -> Result<(), SimulationError> {
        if agent.remaining_power() <= 0.0 {
            return Err(SimulationError::PowerExhausted);
        }
        agent.charge(self.settings.sensor_read_cost);
        Ok(())
    }

    // uncharged reads, shared with actuators that perform sensing actions.

    pub(crate) fn dirt_at(&self, coord: Coord) -> Result<bool, SimulationError> {
        Ok(self.area.cell(coord)?.has_dust())
    }

    pub(crate) fn elevation_at(
        &self,
        coord: Coord,
        heading: Heading,
    ) -> Result<ElevationReading, SimulationError> {
        let cell = self.area.cell(coord)?;
        match coord.step(heading) {
            Some(next) if self.area.contains(next) => {}
            _ => return Ok(ElevationReading::Boundary),
        }
        Ok(ElevationReading::Delta(cell.elevation().toward(heading)))
    }
}
