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

use crate::geometry::{Coord, Heading, Side};
use crate::HashSet;

/// Physical state of the device: where it is, which way it faces, and what is left of its budget.
///
/// Only sensors and actuators change it. Power and time only ever go down and stop at zero.
#[derive(Debug, Clone)]
pub struct AgentState {
    position: Coord,
    heading: Heading,
    remaining_power: f64,
    remaining_time: u64,
    elapsed_time: u64,
    power_charged: f64,
    power_consumed: f64,
    visited: HashSet<Coord>,
    coverage: HashSet<Coord>,
    cleaned: HashSet<Coord>,
    power_exhausted: bool,
    time_exhausted: bool,
}

impl AgentState {
    /// Place the device on `origin` with a full budget.
    pub fn new(origin: Coord, heading: Heading, power: f64, time: u64) -> Self {
        let remaining_power = power.max(0.0);
        let mut visited = HashSet::default();
        visited.insert(origin);
        Self {
            position: origin,
            heading,
            remaining_power,
            remaining_time: time,
            elapsed_time: 0,
            power_charged: 0.0,
            power_consumed: 0.0,
            visited,
            coverage: HashSet::default(),
            cleaned: HashSet::default(),
            power_exhausted: remaining_power <= 0.0,
            time_exhausted: time == 0,
        }
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn remaining_power(&self) -> f64 {
        self.remaining_power
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn elapsed_time(&self) -> u64 {
        self.elapsed_time
    }

    /// Sum of every cost charged, before clamping at zero.
    pub fn power_charged(&self) -> f64 {
        self.power_charged
    }

    /// Power actually taken from the battery.
    pub fn power_consumed(&self) -> f64 {
        self.power_consumed
    }

    /// Cells the device has stood on.
    pub fn visited(&self) -> &HashSet<Coord> {
        &self.visited
    }

    /// Cells where a vacuum pass was attempted, successful or not.
    pub fn coverage(&self) -> &HashSet<Coord> {
        &self.coverage
    }

    /// Cells whose dust was removed by this device.
    pub fn cleaned(&self) -> &HashSet<Coord> {
        &self.cleaned
    }

    pub fn is_power_exhausted(&self) -> bool {
        self.power_exhausted
    }

    pub fn is_time_exhausted(&self) -> bool {
        self.time_exhausted
    }

    pub(crate) fn charge(&mut self, cost: f64) {
        self.power_charged += cost;
        let deducted = cost.min(self.remaining_power);
        self.remaining_power -= deducted;
        self.power_consumed += deducted;
        if self.remaining_power <= 0.0 {
            self.remaining_power = 0.0;
            self.power_exhausted = true;
        }
    }

    // one elapsed time unit plus the idle draw for it, charged after the action itself.
    pub(crate) fn tick(&mut self, idle_draw: f64) {
        self.elapsed_time += 1;
        self.remaining_time = self.remaining_time.saturating_sub(1);
        if self.remaining_time == 0 {
            self.time_exhausted = true;
        }
        self.charge(idle_draw);
    }

    pub(crate) fn rotate(&mut self, side: Side) {
        self.heading = self.heading.turn(side);
    }

    pub(crate) fn move_to(&mut self, coord: Coord) {
        self.position = coord;
        self.visited.insert(coord);
    }

    pub(crate) fn record_vacuum(&mut self, coord: Coord, removed_dust: bool) {
        self.coverage.insert(coord);
        if removed_dust {
            self.cleaned.insert(coord);
        }
    }
}
