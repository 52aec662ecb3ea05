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

use crate::area::AreaError;
use crate::geometry::Coord;

/// Simulation error.
///
/// `OutOfBounds` is fatal. `PowerExhausted` is how sensors refuse to read on an empty battery; the
/// simulation turns it into a normal end of run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// A coordinate outside the loaded area was used.
    #[error("coordinate is outside the area: {0}")]
    OutOfBounds(Coord),

    /// The area itself is unusable.
    #[error(transparent)]
    Area(AreaError),

    /// No power is left.
    #[error("power exhausted")]
    PowerExhausted,
}

impl From<AreaError> for SimulationError {
    fn from(error: AreaError) -> Self {
        match error {
            AreaError::NotFound(coord) => SimulationError::OutOfBounds(coord),
            other => SimulationError::Area(other),
        }
    }
}
