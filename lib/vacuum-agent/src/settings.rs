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

use serde::{Deserialize, Serialize};

use crate::area::Pressure;
use crate::geometry::{Coord, Heading};

/// Costs and the time budget of a run, in the order they appear in a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of ticks the run may last. Fractions are dropped.
    pub time_budget: f64,

    /// Power per 90 degree rotation.
    pub rotation_cost: f64,

    /// Power per forward move attempt.
    pub movement_cost: f64,

    /// Power per normal-pressure vacuum pass.
    pub normal_vacuum_cost: f64,

    /// Power per heavy-pressure vacuum pass.
    pub heavy_vacuum_cost: f64,

    /// Power drawn every tick on top of the action's own cost.
    pub idle_draw_per_tick: f64,

    /// Power per sensor read.
    pub sensor_read_cost: f64,

    /// Power for anything else, e.g. idling.
    pub misc_action_cost: f64,
}

impl Settings {
    /// Number of values in a settings file.
    pub const FIELD_COUNT: usize = 8;

    /// Build settings from file order.
    pub fn from_values(values: [f64; Settings::FIELD_COUNT]) -> Self {
        let [
            time_budget,
            rotation_cost,
            movement_cost,
            normal_vacuum_cost,
            heavy_vacuum_cost,
            idle_draw_per_tick,
            sensor_read_cost,
            misc_action_cost,
        ] = values;
        Self {
            time_budget,
            rotation_cost,
            movement_cost,
            normal_vacuum_cost,
            heavy_vacuum_cost,
            idle_draw_per_tick,
            sensor_read_cost,
            misc_action_cost,
        }
    }

    /// Field names paired with their values, in file order.
    pub fn named_values(&self) -> [(&'static str, f64); Settings::FIELD_COUNT] {
        [
            ("time budget", self.time_budget),
            ("rotation cost", self.rotation_cost),
            ("movement cost", self.movement_cost),
            ("normal vacuum cost", self.normal_vacuum_cost),
            ("heavy vacuum cost", self.heavy_vacuum_cost),
            ("idle draw per tick", self.idle_draw_per_tick),
            ("sensor read cost", self.sensor_read_cost),
            ("misc action cost", self.misc_action_cost),
        ]
    }

    /// Whole ticks available to the run.
    pub fn time_budget_ticks(&self) -> u64 {
        if self.time_budget.is_finite() && self.time_budget > 0.0 {
            self.time_budget.floor() as u64
        } else {
            0
        }
    }

    /// Cost of one vacuum pass at `pressure`.
    pub fn vacuum_cost(&self, pressure: Pressure) -> f64 {
        match pressure {
            Pressure::Normal => self.normal_vacuum_cost,
            Pressure::Heavy => self.heavy_vacuum_cost,
        }
    }
}

/// Physical properties of the device that the settings file does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Largest absolute elevation delta the device can cross.
    pub max_climb: i32,

    /// Power available at the start of the run.
    pub battery_capacity: f64,

    /// Cell the agent starts on.
    pub origin: Coord,

    /// Heading the agent starts with.
    pub start_heading: Heading,
}

impl DeviceConfig {
    /// Default climb limit.
    pub const DEFAULT_MAX_CLIMB: i32 = 3;

    /// Default battery capacity.
    pub const DEFAULT_BATTERY_CAPACITY: f64 = 1000.0;
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            max_climb: DeviceConfig::DEFAULT_MAX_CLIMB,
            battery_capacity: DeviceConfig::DEFAULT_BATTERY_CAPACITY,
            origin: Coord::new(0, 0),
            start_heading: Heading::North,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_keeps_file_order() {
        let settings = Settings::from_values([100.0, 1.0, 2.0, 3.0, 4.0, 0.5, 0.25, 0.125]);
        assert_eq!(settings.time_budget, 100.0);
        assert_eq!(settings.rotation_cost, 1.0);
        assert_eq!(settings.movement_cost, 2.0);
        assert_eq!(settings.vacuum_cost(Pressure::Normal), 3.0);
        assert_eq!(settings.vacuum_cost(Pressure::Heavy), 4.0);
        assert_eq!(settings.idle_draw_per_tick, 0.5);
        assert_eq!(settings.sensor_read_cost, 0.25);
        assert_eq!(settings.misc_action_cost, 0.125);
    }

    #[test]
    fn test_time_budget_drops_fractions() {
        let mut settings = Settings::from_values([10.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(settings.time_budget_ticks(), 10);
        settings.time_budget = -3.0;
        assert_eq!(settings.time_budget_ticks(), 0);
    }
}
