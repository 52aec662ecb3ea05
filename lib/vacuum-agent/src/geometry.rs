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

//! Grid coordinates and the four compass headings.

use serde::{Deserialize, Serialize};

/// Location of a cell. North is `+y` and east is `+x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: i32,

    /// Row.
    pub y: i32,
}

impl Coord {
    /// Create a new coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring coordinate one cell away in `heading`, or `None` past the edge of the
    /// `i32` grid.
    pub fn step(self, heading: Heading) -> Option<Self> {
        let (dx, dy) = heading.offset();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Which way a rotation turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Counter-clockwise.
    Left,

    /// Clockwise.
    Right,
}

/// Compass heading of the agent, or the direction of a sensor or a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Towards `+y`.
    North,

    /// Towards `+x`.
    East,

    /// Towards `-y`.
    South,

    /// Towards `-x`.
    West,
}

impl Heading {
    /// Fixed tie-break order used wherever headings are enumerated.
    pub const PRIORITY: [Heading; 4] = [
        Heading::North,
        Heading::East,
        Heading::South,
        Heading::West,
    ];

    /// Position of the heading in [`Heading::PRIORITY`].
    pub fn index(self) -> usize {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    /// Unit offset `(dx, dy)` of one step in this heading.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }

    /// The heading 90 degrees counter-clockwise.
    pub fn left(self) -> Self {
        Heading::PRIORITY[(self.index() + 3) % 4]
    }

    /// The heading 90 degrees clockwise.
    pub fn right(self) -> Self {
        Heading::PRIORITY[(self.index() + 1) % 4]
    }

    /// Rotate by 90 degrees to `side`.
    pub fn turn(self, side: Side) -> Self {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    /// First rotation on the shortest way from `self` to `target`, or `None` when already facing
    /// it. A half turn starts clockwise.
    pub fn turn_toward(self, target: Heading) -> Option<Side> {
        if self == target {
            None
        } else if self.left() == target {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heading::North => write!(f, "N"),
            Heading::East => write!(f, "E"),
            Heading::South => write!(f, "S"),
            Heading::West => write!(f, "W"),
        }
    }
}
