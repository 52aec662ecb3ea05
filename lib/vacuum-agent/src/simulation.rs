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
use tracing::{debug, info};

use crate::actuators::{Action, ActuatorController, Outcome};
use crate::agent_state::AgentState;
use crate::area::Area;
use crate::error::SimulationError;
use crate::sensors::{Percept, SensorSuite};
use crate::settings::{DeviceConfig, Settings};
use crate::Agent;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// The battery ran out.
    PowerExhausted,

    /// The time budget ran out.
    TimeExhausted,

    /// The agent had nothing left to do.
    CoverageComplete,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::PowerExhausted => write!(f, "power exhausted"),
            Termination::TimeExhausted => write!(f, "time exhausted"),
            Termination::CoverageComplete => write!(f, "coverage complete"),
        }
    }
}

/// End-of-run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub termination: Termination,
    pub steps: u64,
    pub time_elapsed: u64,
    pub power_consumed: f64,
    pub power_charged: f64,
    pub cells_cleaned: usize,
    pub cells_uncleanable: usize,
    pub cells_visited: usize,
    pub cells_unreachable: usize,
    pub cleanliness_percent: f64,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        s.push_str(&format!("termination: {}\n", self.termination));
        s.push_str(&format!("steps: {}\n", self.steps));
        s.push_str(&format!("time elapsed: {}\n", self.time_elapsed));
        s.push_str(&format!("power consumed: {:.2}\n", self.power_consumed));
        s.push_str(&format!("power charged: {:.2}\n", self.power_charged));
        s.push_str(&format!("cells cleaned: {}\n", self.cells_cleaned));
        s.push_str(&format!("cells uncleanable: {}\n", self.cells_uncleanable));
        s.push_str(&format!("cells visited: {}\n", self.cells_visited));
        s.push_str(&format!("cells unreachable: {}\n", self.cells_unreachable));
        s.push_str(&format!("cleanliness: {:.2}%", self.cleanliness_percent));
        write!(f, "{}", s)
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Finished(Termination),
}

/// An [`Agent`] that drives the cleaning device and keeps track of the cells it gave up on.
pub trait CleaningAgent: Agent<Action = Action, Percept = Percept> {
    /// Cells the agent has given up on cleaning.
    fn uncleanable_cells(&self) -> usize;
}

/// A Simulation runs a single Agent over an area in Performance, Environment, Action, Sensing
/// (PEAS) cycles until the budget runs out or the agent is done.
///
/// Each step reads the dirt sensor, asks the agent for one action, executes it, and checks the
/// budget. The Simulation owns the device's state and the agent, and borrows the area for the
/// whole run; only the actuators write to it.
pub struct Simulation<'a, _Agent>
where
    _Agent: CleaningAgent,
{
    area: &'a mut Area,
    settings: &'a Settings,
    device: DeviceConfig,
    agent_state: AgentState,
    agent: _Agent,
    last_outcome: Option<Outcome>,
    steps: u64,
    termination: Option<Termination>,
}

impl<'a, _Agent> Simulation<'a, _Agent>
where
    _Agent: CleaningAgent,
{
    /// Place the device on `device.origin` with a full battery and the settings' time budget.
    pub fn new(
        area: &'a mut Area,
        settings: &'a Settings,
        device: DeviceConfig,
        agent: _Agent,
    ) -> Result<Self, SimulationError> {
        if !area.contains(device.origin) {
            return Err(SimulationError::OutOfBounds(device.origin));
        }
        let agent_state = AgentState::new(
            device.origin,
            device.start_heading,
            device.battery_capacity,
            settings.time_budget_ticks(),
        );
        Ok(Self {
            area,
            settings,
            device,
            agent_state,
            agent,
            last_outcome: None,
            steps: 0,
            termination: None,
        })
    }

    /// Run one sense, decide, act cycle.
    pub fn step(&mut self) -> Result<Step, SimulationError> {
        if let Some(termination) = self.termination {
            return Ok(Step::Finished(termination));
        }
        if let Some(termination) = self.exhaustion() {
            return Ok(self.finish(termination));
        }

        let sensors = SensorSuite::new(&*self.area, self.settings, self.device.max_climb);
        let has_dust = match sensors.sense_dirt(&mut self.agent_state) {
            Ok(has_dust) => has_dust,
            Err(SimulationError::PowerExhausted) => {
                return Ok(self.finish(Termination::PowerExhausted))
            }
            Err(err) => return Err(err),
        };
        let percept = Percept {
            position: self.agent_state.position(),
            heading: self.agent_state.heading(),
            has_dust,
            last_outcome: self.last_outcome,
        };

        let Some(action) = self.agent.act(&percept) else {
            return Ok(self.finish(Termination::CoverageComplete));
        };
        let mut actuators =
            ActuatorController::new(&mut *self.area, self.settings, self.device.max_climb);
        let outcome = actuators.execute(&mut self.agent_state, action)?;
        debug!(step = self.steps, %action, ?outcome, "executed");
        self.last_outcome = Some(outcome);
        self.steps += 1;

        match self.exhaustion() {
            Some(termination) => Ok(self.finish(termination)),
            None => Ok(Step::Continue),
        }
    }

    /// Step until the run ends.
    pub fn run(&mut self) -> Result<Report, SimulationError> {
        loop {
            if let Step::Finished(termination) = self.step()? {
                return Ok(self.report_for(termination));
            }
        }
    }

    /// The final report, once the run has ended.
    pub fn report(&self) -> Option<Report> {
        self.termination.map(|termination| self.report_for(termination))
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn area(&self) -> &Area {
        &*self.area
    }

    pub fn agent_state(&self) -> &AgentState {
        &self.agent_state
    }

    pub fn agent(&self) -> &_Agent {
        &self.agent
    }

    // power before time, so a step that drains both reports the battery.
    fn exhaustion(&self) -> Option<Termination> {
        if self.agent_state.is_power_exhausted() {
            Some(Termination::PowerExhausted)
        } else if self.agent_state.is_time_exhausted() {
            Some(Termination::TimeExhausted)
        } else {
            None
        }
    }

    fn finish(&mut self, termination: Termination) -> Step {
        self.agent.halt();
        self.termination = Some(termination);
        info!(
            %termination,
            steps = self.steps,
            elapsed = self.agent_state.elapsed_time(),
            remaining_power = self.agent_state.remaining_power(),
            "simulation finished"
        );
        Step::Finished(termination)
    }

    fn report_for(&self, termination: Termination) -> Report {
        let visited = self.agent_state.visited().len();
        Report {
            termination,
            steps: self.steps,
            time_elapsed: self.agent_state.elapsed_time(),
            power_consumed: self.agent_state.power_consumed(),
            power_charged: self.agent_state.power_charged(),
            cells_cleaned: self.agent_state.cleaned().len(),
            cells_uncleanable: self.agent.uncleanable_cells(),
            cells_visited: visited,
            cells_unreachable: self.area.len().saturating_sub(visited),
            cleanliness_percent: self.area.cleanliness_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::area::Cell;
    use crate::geometry::Coord;
    use crate::policy::DecisionEngine;

    // an agent that idles forever.
    struct Idler;

    impl Agent for Idler {
        type Action = Action;
        type Percept = Percept;

        fn act(&mut self, _percept: &Self::Percept) -> Option<Self::Action> {
            Some(Action::Idle)
        }
    }

    impl CleaningAgent for Idler {
        fn uncleanable_cells(&self) -> usize {
            0
        }
    }

    // an agent that gives up on the cells it is told about and stops.
    struct Quitter(usize);

    impl Agent for Quitter {
        type Action = Action;
        type Percept = Percept;

        fn act(&mut self, _percept: &Self::Percept) -> Option<Self::Action> {
            None
        }
    }

    impl CleaningAgent for Quitter {
        fn uncleanable_cells(&self) -> usize {
            self.0
        }
    }

    fn settings(time_budget: f64) -> Settings {
        Settings::from_values([time_budget, 1.0, 1.0, 1.0, 2.0, 0.5, 0.5, 1.0])
    }

    fn single(dust_grams: f64) -> Area {
        Area::from_cells([(Coord::new(0, 0), Cell::flat(dust_grams))]).expect("valid area")
    }

    #[test]
    fn test_origin_outside_area_is_rejected() {
        let mut area = single(0.0);
        let settings = settings(10.0);
        let device = DeviceConfig {
            origin: Coord::new(5, 5),
            ..DeviceConfig::default()
        };
        let result = Simulation::new(&mut area, &settings, device, Idler);
        assert!(matches!(
            result,
            Err(SimulationError::OutOfBounds(coord)) if coord == Coord::new(5, 5)
        ));
    }

    #[test]
    fn test_time_budget_ends_run() {
        let mut area = single(0.0);
        let settings = settings(3.0);
        let mut simulation =
            Simulation::new(&mut area, &settings, DeviceConfig::default(), Idler)
                .expect("origin in area");
        let report = simulation.run().expect("run succeeds");
        assert_eq!(report.termination, Termination::TimeExhausted);
        assert_eq!(report.steps, 3);
        assert_eq!(report.time_elapsed, 3);
        // per step: dirt read 0.5, idle 1.0, idle draw 0.5.
        assert_abs_diff_eq!(report.power_charged, 6.0);
        assert_abs_diff_eq!(report.power_consumed, 6.0);
    }

    #[test]
    fn test_zero_time_budget_finishes_before_acting() {
        let mut area = single(1.0);
        let settings = settings(0.0);
        let mut simulation =
            Simulation::new(&mut area, &settings, DeviceConfig::default(), Idler)
                .expect("origin in area");
        assert_eq!(
            simulation.step(),
            Ok(Step::Finished(Termination::TimeExhausted))
        );
        assert_eq!(simulation.steps(), 0);
        assert_eq!(simulation.agent_state().power_charged(), 0.0);
    }

    #[test]
    fn test_power_takes_precedence_over_time() {
        let mut area = single(0.0);
        let settings = settings(1.0);
        let device = DeviceConfig {
            battery_capacity: 1.0,
            ..DeviceConfig::default()
        };
        let mut simulation =
            Simulation::new(&mut area, &settings, device, Idler).expect("origin in area");
        let report = simulation.run().expect("run succeeds");
        assert_eq!(report.termination, Termination::PowerExhausted);
        assert_eq!(simulation.agent_state().remaining_time(), 0);
    }

    #[test]
    fn test_finished_simulation_stays_finished() {
        let mut area = single(1.0);
        let settings = settings(100.0);
        let mut simulation = Simulation::new(
            &mut area,
            &settings,
            DeviceConfig::default(),
            DecisionEngine::new(3),
        )
        .expect("origin in area");
        let report = simulation.run().expect("run succeeds");
        assert_eq!(report.termination, Termination::CoverageComplete);
        assert_eq!(report.cells_cleaned, 1);
        assert_abs_diff_eq!(report.cleanliness_percent, 100.0);

        let steps = simulation.steps();
        assert_eq!(
            simulation.step(),
            Ok(Step::Finished(Termination::CoverageComplete))
        );
        assert_eq!(simulation.steps(), steps);
        assert_eq!(simulation.report(), Some(report));
    }

    #[test]
    fn test_report_takes_uncleanable_count_from_agent() {
        let mut area = single(9.0);
        let settings = settings(10.0);
        let mut simulation =
            Simulation::new(&mut area, &settings, DeviceConfig::default(), Quitter(2))
                .expect("origin in area");
        let report = simulation.run().expect("run succeeds");
        assert_eq!(report.termination, Termination::CoverageComplete);
        assert_eq!(report.steps, 0);
        assert_eq!(report.cells_uncleanable, 2);
        assert_eq!(report.cells_cleaned, 0);
    }

    #[test]
    fn test_report_display() {
        let report = Report {
            termination: Termination::CoverageComplete,
            steps: 12,
            time_elapsed: 12,
            power_consumed: 20.5,
            power_charged: 20.5,
            cells_cleaned: 2,
            cells_uncleanable: 1,
            cells_visited: 3,
            cells_unreachable: 0,
            cleanliness_percent: 200.0 / 3.0,
        };
        let text = report.to_string();
        assert!(text.starts_with("termination: coverage complete\n"));
        assert!(text.contains("cells uncleanable: 1\n"));
        assert!(text.ends_with("cleanliness: 66.67%"));
    }
}
