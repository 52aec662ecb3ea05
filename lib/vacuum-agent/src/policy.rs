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

//! The cleaning policy.
//!
//! The agent cannot sense how much dust a cell holds, so it probes: a cheap normal pass first,
//! a heavy pass only if dust is still sensed afterwards, and after that the cell is given up on
//! for good. Coverage is a depth-first walk over an explicit frontier stack. Each new cell is
//! surveyed by sensing elevation towards N, E, S, W; passable unvisited neighbors are pushed so
//! that the first of them in that order is explored first. When the next frontier cell is not
//! adjacent the agent backtracks to it along a shortest path of edges it has already sensed.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::actuators::{Action, Outcome};
use crate::geometry::{Coord, Heading};
use crate::sensors::Percept;
use crate::simulation::CleaningAgent;
use crate::{Agent, HashMap, HashSet};

/// Policy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Surveying the current cell or stepping onto an adjacent unvisited one.
    Exploring,

    /// Dust was sensed and a normal-pressure pass has been issued.
    Cleaning,

    /// Normal pressure was not enough and a heavy-pressure pass has been issued.
    ProbingPressure,

    /// Backtracking through visited cells towards the next frontier cell.
    Returning,

    /// Nothing left to do, or the budget ran out.
    Done,
}

// what the agent has learned about a visited cell. `exits` is indexed by `Heading::index`.
#[derive(Debug, Clone, Copy, Default)]
struct CellMemory {
    exits: [Option<bool>; 4],
    surveyed: bool,
}

/// Depth-first coverage agent with probe-then-commit vacuuming.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    max_climb: i32,
    mode: Mode,
    memory: HashMap<Coord, CellMemory>,
    frontier: Vec<Coord>,
    plan: VecDeque<Heading>,
    target: Option<Coord>,
    uncleanable: HashSet<Coord>,
}

impl DecisionEngine {
    /// `max_climb` is the device's declared climb capability, used to judge elevation readings.
    pub fn new(max_climb: i32) -> Self {
        Self {
            max_climb,
            mode: Mode::Exploring,
            memory: HashMap::default(),
            frontier: Vec::new(),
            plan: VecDeque::new(),
            target: None,
            uncleanable: HashSet::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Cells where dust survived both pressures.
    pub fn uncleanable(&self) -> &HashSet<Coord> {
        &self.uncleanable
    }

    /// Whether the agent has stood on `coord`.
    pub fn has_visited(&self, coord: Coord) -> bool {
        self.memory.contains_key(&coord)
    }

    /// Cells waiting to be explored, next one last. May hold stale entries for cells visited
    /// since they were pushed.
    pub fn frontier(&self) -> &[Coord] {
        &self.frontier
    }

    fn absorb(&mut self, percept: &Percept) {
        self.memory.entry(percept.position).or_default();
        match percept.last_outcome {
            Some(Outcome::Elevation { heading, reading }) => {
                let passable = reading.is_passable(self.max_climb);
                self.memory.entry(percept.position).or_default().exits[heading.index()] =
                    Some(passable);
            }
            Some(Outcome::Moved { .. }) => {
                self.plan.pop_front();
                if self.plan.is_empty() {
                    self.target = None;
                }
            }
            Some(Outcome::Blocked { at, heading }) => {
                debug!(%at, %heading, "move refused, forgetting the edge");
                self.memory.entry(at).or_default().exits[heading.index()] = Some(false);
                self.plan.clear();
                if let Some(target) = self.target.take() {
                    if !self.memory.contains_key(&target) {
                        self.frontier.push(target);
                    }
                }
            }
            _ => {}
        }
    }

    fn clean(&mut self, percept: &Percept) -> Option<Action> {
        let here = percept.position;
        if !percept.has_dust {
            if matches!(self.mode, Mode::Cleaning | Mode::ProbingPressure) {
                debug!(%here, "cell is clean");
                self.mode = Mode::Exploring;
            }
            return None;
        }
        if self.uncleanable.contains(&here) {
            return None;
        }
        match self.mode {
            Mode::Cleaning => {
                self.mode = Mode::ProbingPressure;
                Some(Action::VacuumHeavy)
            }
            Mode::ProbingPressure => {
                warn!(%here, "dust survived heavy pressure, giving up on cell");
                self.uncleanable.insert(here);
                self.mode = Mode::Exploring;
                None
            }
            _ => {
                debug!(%here, "dust sensed");
                self.mode = Mode::Cleaning;
                Some(Action::VacuumNormal)
            }
        }
    }

    fn survey(&mut self, here: Coord) -> Option<Action> {
        let memory = self.memory.entry(here).or_default();
        if memory.surveyed {
            return None;
        }
        if let Some(heading) = Heading::PRIORITY
            .into_iter()
            .find(|heading| memory.exits[heading.index()].is_none())
        {
            self.mode = Mode::Exploring;
            return Some(Action::SenseElevation(heading));
        }
        memory.surveyed = true;
        let exits = memory.exits;

        // reverse priority, so the first passable heading ends up on top of the stack.
        for heading in Heading::PRIORITY.into_iter().rev() {
            if exits[heading.index()] != Some(true) {
                continue;
            }
            if let Some(next) = here.step(heading) {
                if !self.memory.contains_key(&next) {
                    self.frontier.push(next);
                }
            }
        }
        None
    }

    fn navigate(&mut self, here: Coord, facing: Heading) -> Option<Action> {
        loop {
            if let Some(&next) = self.plan.front() {
                self.mode = if self.plan.len() > 1 {
                    Mode::Returning
                } else {
                    Mode::Exploring
                };
                return Some(match facing.turn_toward(next) {
                    Some(side) => Action::rotate(side),
                    None => Action::MoveForward,
                });
            }

            let Some(target) = self.next_target() else {
                info!(
                    visited = self.memory.len(),
                    uncleanable = self.uncleanable.len(),
                    "coverage complete"
                );
                self.mode = Mode::Done;
                return None;
            };
            match self.route(here, target) {
                Some(path) => {
                    debug!(%here, %target, steps = path.len(), "heading for frontier cell");
                    self.plan = path;
                    self.target = Some(target);
                }
                None => debug!(%target, "no known route, dropping frontier cell"),
            }
        }
    }

    fn next_target(&mut self) -> Option<Coord> {
        while let Some(candidate) = self.frontier.pop() {
            if !self.memory.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    // breadth-first over visited cells using only exits sensed as passable.
    fn route(&self, from: Coord, to: Coord) -> Option<VecDeque<Heading>> {
        let mut came_from: HashMap<Coord, (Coord, Heading)> = HashMap::default();
        let mut seen: HashSet<Coord> = HashSet::default();
        let mut queue = VecDeque::from([from]);
        seen.insert(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = VecDeque::new();
                let mut cursor = to;
                while let Some(&(previous, heading)) = came_from.get(&cursor) {
                    path.push_front(heading);
                    cursor = previous;
                }
                return Some(path);
            }
            let Some(memory) = self.memory.get(&current) else {
                continue;
            };
            for heading in Heading::PRIORITY {
                if memory.exits[heading.index()] != Some(true) {
                    continue;
                }
                let Some(next) = current.step(heading) else {
                    continue;
                };
                if (next == to || self.memory.contains_key(&next)) && seen.insert(next) {
                    came_from.insert(next, (current, heading));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

impl Agent for DecisionEngine {
    type Action = Action;
    type Percept = Percept;

    fn act(&mut self, percept: &Self::Percept) -> Option<Self::Action> {
        if self.mode == Mode::Done {
            return None;
        }
        self.absorb(percept);
        let action = self
            .clean(percept)
            .or_else(|| self.survey(percept.position))
            .or_else(|| self.navigate(percept.position, percept.heading));
        if let Some(action) = action {
            debug!(position = %percept.position, mode = ?self.mode, %action, "decided");
        }
        action
    }

    fn halt(&mut self) {
        self.plan.clear();
        self.target = None;
        self.mode = Mode::Done;
    }
}

impl CleaningAgent for DecisionEngine {
    fn uncleanable_cells(&self) -> usize {
        self.uncleanable.len()
    }
}
