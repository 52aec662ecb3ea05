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

//! Actions and the controller that carries them out.
//!
//! Every actuator call costs its own price, then one tick of time and the idle draw for that
//! tick. Nothing is refused for lack of power: the battery is clamped at zero and the exhaustion
//! is left on [`AgentState`] for the simulation to notice.

use crate::agent_state::AgentState;
use crate::area::{Area, Pressure};
use crate::error::SimulationError;
use crate::geometry::{Coord, Heading, Side};
use crate::sensors::{ElevationReading, SensorSuite};
use crate::settings::Settings;

/// Everything the agent can ask the device to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RotateLeft,
    RotateRight,
    MoveForward,
    VacuumNormal,
    VacuumHeavy,
    SenseDirt,
    SenseElevation(Heading),
    Idle,
}

impl Action {
    /// The rotation towards `side`.
    pub fn rotate(side: Side) -> Self {
        match side {
            Side::Left => Action::RotateLeft,
            Side::Right => Action::RotateRight,
        }
    }

    /// Own cost of the action, excluding the idle draw of its tick.
    pub fn cost(&self, settings: &Settings) -> f64 {
        match self {
            Action::RotateLeft | Action::RotateRight => settings.rotation_cost,
            Action::MoveForward => settings.movement_cost,
            Action::VacuumNormal => settings.vacuum_cost(Pressure::Normal),
            Action::VacuumHeavy => settings.vacuum_cost(Pressure::Heavy),
            Action::SenseDirt | Action::SenseElevation(_) => settings.sensor_read_cost,
            Action::Idle => settings.misc_action_cost,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::RotateLeft => write!(f, "RotateLeft"),
            Action::RotateRight => write!(f, "RotateRight"),
            Action::MoveForward => write!(f, "MoveForward"),
            Action::VacuumNormal => write!(f, "VacuumNormal"),
            Action::VacuumHeavy => write!(f, "VacuumHeavy"),
            Action::SenseDirt => write!(f, "SenseDirt"),
            Action::SenseElevation(heading) => write!(f, "SenseElevation({})", heading),
            Action::Idle => write!(f, "Idle"),
        }
    }
}

/// What an executed action did. Fed back to the agent with the next percept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Now facing this heading.
    Rotated(Heading),

    /// Moved one cell.
    Moved { from: Coord, to: Coord },

    /// The move was refused; the device stayed on `at`.
    Blocked { at: Coord, heading: Heading },

    /// A vacuum pass ran; `has_dust` is the cell's state afterwards.
    Vacuumed { pressure: Pressure, has_dust: bool },

    /// Dirt sensor reading.
    Dirt(bool),

    /// Elevation sensor reading towards `heading`.
    Elevation {
        heading: Heading,
        reading: ElevationReading,
    },

    /// Nothing happened.
    Idled,
}

/// State-changing operations on the device. The only writer to the area.
pub struct ActuatorController<'a> {
    area: &'a mut Area,
    settings: &'a Settings,
    max_climb: i32,
}

impl<'a> ActuatorController<'a> {
    pub fn new(area: &'a mut Area, settings: &'a Settings, max_climb: i32) -> Self {
        Self {
            area,
            settings,
            max_climb,
        }
    }

    /// Turn 90 degrees. Returns the new heading.
    pub fn rotate(&mut self, agent: &mut AgentState, side: Side) -> Heading {
        agent.charge(self.settings.rotation_cost);
        agent.rotate(side);
        self.finish_tick(agent);
        agent.heading()
    }

    /// Try to move one cell forward. The movement cost is paid even when the move is refused.
    /// Returns whether the device moved.
    pub fn move_forward(&mut self, agent: &mut AgentState) -> Result<bool, SimulationError> {
        agent.charge(self.settings.movement_cost);
        let from = agent.position();
        let heading = agent.heading();
        let target = match from.step(heading) {
            Some(next) if self.area.can_traverse(from, heading, self.max_climb)? => Some(next),
            _ => None,
        };
        if let Some(next) = target {
            agent.move_to(next);
        }
        self.finish_tick(agent);
        Ok(target.is_some())
    }

    /// One vacuum pass over the current cell. The cell counts as covered whether or not the dust
    /// came up. Returns whether dust remains.
    pub fn vacuum(
        &mut self,
        agent: &mut AgentState,
        pressure: Pressure,
    ) -> Result<bool, SimulationError> {
        agent.charge(self.settings.vacuum_cost(pressure));
        let here = agent.position();
        let had_dust = self.area.cell(here)?.has_dust();
        let has_dust = self.area.apply_vacuum(here, pressure)?;
        agent.record_vacuum(here, had_dust && !has_dust);
        self.finish_tick(agent);
        Ok(has_dust)
    }

    /// Carry out any action.
    pub fn execute(
        &mut self,
        agent: &mut AgentState,
        action: Action,
    ) -> Result<Outcome, SimulationError> {
        let outcome = match action {
            Action::RotateLeft => Outcome::Rotated(self.rotate(agent, Side::Left)),
            Action::RotateRight => Outcome::Rotated(self.rotate(agent, Side::Right)),
            Action::MoveForward => {
                let from = agent.position();
                if self.move_forward(agent)? {
                    Outcome::Moved {
                        from,
                        to: agent.position(),
                    }
                } else {
                    Outcome::Blocked {
                        at: from,
                        heading: agent.heading(),
                    }
                }
            }
            Action::VacuumNormal => Outcome::Vacuumed {
                pressure: Pressure::Normal,
                has_dust: self.vacuum(agent, Pressure::Normal)?,
            },
            Action::VacuumHeavy => Outcome::Vacuumed {
                pressure: Pressure::Heavy,
                has_dust: self.vacuum(agent, Pressure::Heavy)?,
            },
            Action::SenseDirt => {
                agent.charge(self.settings.sensor_read_cost);
                let has_dust = self.sensors().dirt_at(agent.position())?;
                self.finish_tick(agent);
                Outcome::Dirt(has_dust)
            }
            Action::SenseElevation(heading) => {
                agent.charge(self.settings.sensor_read_cost);
                let reading = self.sensors().elevation_at(agent.position(), heading)?;
                self.finish_tick(agent);
                Outcome::Elevation { heading, reading }
            }
            Action::Idle => {
                agent.charge(self.settings.misc_action_cost);
                self.finish_tick(agent);
                Outcome::Idled
            }
        };
        Ok(outcome)
    }

    fn sensors(&self) -> SensorSuite<'_> {
        SensorSuite::new(&*self.area, self.settings, self.max_climb)
    }

    fn finish_tick(&self, agent: &mut AgentState) {
        agent.tick(self.settings.idle_draw_per_tick);
    }
}
