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

//! The area being cleaned: ground truth the agent never sees directly.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, Heading};
use crate::HashMap;

/// Area error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AreaError {
    /// No cell is loaded at this coordinate.
    #[error("no cell at {0}")]
    NotFound(Coord),

    /// Two cells share a coordinate.
    #[error("duplicate cell at {0}")]
    DuplicateCell(Coord),

    /// An area needs at least one cell.
    #[error("area has no cells")]
    Empty,
}

/// Surface texture of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Texture {
    /// Hard floor, code `H`.
    Hard,

    /// Soft floor such as carpet, code `S`.
    Soft,
}

impl Texture {
    /// Parse the single-letter code used by area files.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" | "h" => Some(Texture::Hard),
            "S" | "s" => Some(Texture::Soft),
            _ => None,
        }
    }
}

/// Vacuuming intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pressure {
    /// Cheap, lifts dust lighter than [`Pressure::NORMAL_CAPACITY_GRAMS`].
    Normal,

    /// Expensive, lifts dust up to and including [`Pressure::HEAVY_CAPACITY_GRAMS`].
    Heavy,
}

impl Pressure {
    /// Normal pressure clears weights strictly below this.
    pub const NORMAL_CAPACITY_GRAMS: f64 = 2.0;

    /// Heavy pressure clears weights up to this, inclusive. Anything heavier never comes up.
    pub const HEAVY_CAPACITY_GRAMS: f64 = 5.0;

    /// Whether one pass at this pressure lifts `grams` of dust.
    pub fn clears(self, grams: f64) -> bool {
        match self {
            Pressure::Normal => grams < Pressure::NORMAL_CAPACITY_GRAMS,
            Pressure::Heavy => grams <= Pressure::HEAVY_CAPACITY_GRAMS,
        }
    }
}

/// Signed height change from a cell to each of its four neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Elevation {
    /// Towards the west neighbor.
    pub left: i32,

    /// Towards the east neighbor.
    pub right: i32,

    /// Towards the north neighbor.
    pub up: i32,

    /// Towards the south neighbor.
    pub down: i32,
}

impl Elevation {
    /// Same delta on all four sides.
    pub fn uniform(delta: i32) -> Self {
        Self {
            left: delta,
            right: delta,
            up: delta,
            down: delta,
        }
    }

    /// The delta stored for leaving the cell in `heading`.
    pub fn toward(&self, heading: Heading) -> i32 {
        match heading {
            Heading::North => self.up,
            Heading::East => self.right,
            Heading::South => self.down,
            Heading::West => self.left,
        }
    }
}

/// One grid location. The dust weight is private to the area; the outside world only learns
/// whether there is dust at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    elevation: Elevation,
    texture: Texture,
    dust_grams: f64,
}

impl Cell {
    /// Create a cell. Negative weights are treated as no dust.
    pub fn new(elevation: Elevation, texture: Texture, dust_grams: f64) -> Self {
        Self {
            elevation,
            texture,
            dust_grams: dust_grams.max(0.0),
        }
    }

    /// A level hard-floor cell carrying `dust_grams`.
    pub fn flat(dust_grams: f64) -> Self {
        Self::new(Elevation::default(), Texture::Hard, dust_grams)
    }

    /// Elevation deltas to the neighbors.
    pub fn elevation(&self) -> &Elevation {
        &self.elevation
    }

    /// Surface texture.
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Whether any dust remains.
    pub fn has_dust(&self) -> bool {
        self.dust_grams > 0.0
    }
}

/// Sparse grid of cells keyed by coordinate. Holes in the grid are simply missing keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    cells: HashMap<Coord, Cell>,
}

impl Area {
    /// Build an area, rejecting duplicates and empty input.
    pub fn from_cells<I>(cells: I) -> Result<Self, AreaError>
    where
        I: IntoIterator<Item = (Coord, Cell)>,
    {
        let mut map = HashMap::default();
        for (coord, cell) in cells {
            if map.insert(coord, cell).is_some() {
                return Err(AreaError::DuplicateCell(coord));
            }
        }
        if map.is_empty() {
            return Err(AreaError::Empty);
        }
        Ok(Self { cells: map })
    }

    /// Get a cell.
    pub fn cell(&self, coord: Coord) -> Result<&Cell, AreaError> {
        self.cells.get(&coord).ok_or(AreaError::NotFound(coord))
    }

    /// Whether a cell is loaded at `coord`.
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed area; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All coordinates, sorted row-major from south-west.
    pub fn coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self.cells.keys().copied().collect();
        coords.sort_unstable_by_key(|c| (c.y, c.x));
        coords
    }

    /// Whether the device can leave `from` in `heading`: the neighbor must exist and the
    /// absolute delta recorded on `from` must not exceed `max_climb`.
    pub fn can_traverse(
        &self,
        from: Coord,
        heading: Heading,
        max_climb: i32,
    ) -> Result<bool, AreaError> {
        let cell = self.cell(from)?;
        match from.step(heading) {
            Some(next) if self.contains(next) => {}
            _ => return Ok(false),
        }
        Ok(cell.elevation.toward(heading).abs() <= max_climb)
    }

    /// Run one vacuum pass over `coord`. Dust within the pressure's capacity is removed
    /// completely, otherwise nothing changes. Returns whether dust remains afterwards.
    pub fn apply_vacuum(&mut self, coord: Coord, pressure: Pressure) -> Result<bool, AreaError> {
        let cell = self
            .cells
            .get_mut(&coord)
            .ok_or(AreaError::NotFound(coord))?;
        if cell.has_dust() && pressure.clears(cell.dust_grams) {
            cell.dust_grams = 0.0;
        }
        Ok(cell.has_dust())
    }

    /// Number of cells that still carry dust.
    pub fn dusty_count(&self) -> usize {
        self.cells.values().filter(|c| c.has_dust()).count()
    }

    /// Percentage of cells without dust, 0 to 100.
    pub fn cleanliness_percent(&self) -> f64 {
        if self.cells.is_empty() {
            return 100.0;
        }
        let total = self.cells.len() as f64;
        let clean = total - self.dusty_count() as f64;
        clean / total * 100.0
    }
}

/// Most grid positions the dust map lays out before it lists cells row by row instead.
const DUST_MAP_GRID_LIMIT: usize = 10_000;

// dust map with north at the top: remaining grams per cell, '-' for holes. Only rows and
// columns holding a loaded cell are drawn, with the column coordinates on the last line.
impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: BTreeSet<i32> = self.cells.keys().map(|c| c.y).collect();
        let columns: BTreeSet<i32> = self.cells.keys().map(|c| c.x).collect();
        let label_width = rows
            .iter()
            .map(|y| y.to_string().len())
            .max()
            .unwrap_or(0)
            .max(4);
        let mut s = String::new();

        if rows.len().saturating_mul(columns.len()) > DUST_MAP_GRID_LIMIT {
            let mut cells: Vec<(&Coord, &Cell)> = self.cells.iter().collect();
            cells.sort_unstable_by_key(|(c, _)| (Reverse(c.y), c.x));
            let mut row = None;
            for (coord, cell) in cells {
                if row != Some(coord.y) {
                    if row.is_some() {
                        s.push('\n');
                    }
                    s.push_str(&format!("{:>w$} |", coord.y, w = label_width));
                    row = Some(coord.y);
                }
                s.push_str(&format!(" {}:{:.1}", coord.x, cell.dust_grams));
            }
            return write!(f, "{}", s);
        }

        let width = columns
            .iter()
            .map(|x| x.to_string().len())
            .max()
            .unwrap_or(0)
            .max(5);
        for &y in rows.iter().rev() {
            s.push_str(&format!("{:>w$} |", y, w = label_width));
            for &x in &columns {
                match self.cells.get(&Coord::new(x, y)) {
                    Some(cell) => s.push_str(&format!(" {:>w$.1}", cell.dust_grams, w = width)),
                    None => s.push_str(&format!(" {:>w$}", "-", w = width)),
                }
            }
            s.push('\n');
        }
        s.push_str(&format!("{:>w$} |", "x", w = label_width));
        for x in &columns {
            s.push_str(&format!(" {:>w$}", x, w = width));
        }
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn single(dust_grams: f64) -> Area {
        Area::from_cells([(Coord::new(0, 0), Cell::flat(dust_grams))]).expect("valid area")
    }

    fn pair_with_delta(delta: i32) -> Area {
        Area::from_cells([
            (
                Coord::new(0, 0),
                Cell::new(Elevation::uniform(delta), Texture::Soft, 0.0),
            ),
            (Coord::new(1, 0), Cell::flat(0.0)),
        ])
        .expect("valid area")
    }

    #[test]
    fn test_missing_cell_is_not_found() {
        let area = single(0.0);
        assert_eq!(
            area.cell(Coord::new(3, 3)),
            Err(AreaError::NotFound(Coord::new(3, 3)))
        );
    }

    #[test]
    fn test_duplicate_and_empty_areas_are_rejected() {
        let duplicate = Area::from_cells([
            (Coord::new(0, 0), Cell::flat(0.0)),
            (Coord::new(0, 0), Cell::flat(1.0)),
        ]);
        assert_eq!(duplicate, Err(AreaError::DuplicateCell(Coord::new(0, 0))));
        assert_eq!(
            Area::from_cells(Vec::<(Coord, Cell)>::new()),
            Err(AreaError::Empty)
        );
    }

    #[test]
    fn test_can_traverse_respects_climb_limit() {
        assert_eq!(
            pair_with_delta(3).can_traverse(Coord::new(0, 0), Heading::East, 3),
            Ok(true)
        );
        assert_eq!(
            pair_with_delta(-3).can_traverse(Coord::new(0, 0), Heading::East, 3),
            Ok(true)
        );
        assert_eq!(
            pair_with_delta(4).can_traverse(Coord::new(0, 0), Heading::East, 3),
            Ok(false)
        );
        assert_eq!(
            pair_with_delta(-4).can_traverse(Coord::new(0, 0), Heading::East, 3),
            Ok(false)
        );
    }

    #[test]
    fn test_can_traverse_off_the_edge_is_false() {
        let area = pair_with_delta(0);
        assert_eq!(area.can_traverse(Coord::new(0, 0), Heading::North, 3), Ok(false));
        assert_eq!(area.can_traverse(Coord::new(1, 0), Heading::West, 3), Ok(true));
        assert_eq!(
            area.can_traverse(Coord::new(5, 0), Heading::West, 3),
            Err(AreaError::NotFound(Coord::new(5, 0)))
        );
    }

    #[test]
    fn test_can_traverse_past_the_grid_edge_is_false() {
        let edge = Coord::new(i32::MAX, 0);
        let area = Area::from_cells([
            (Coord::new(i32::MAX - 1, 0), Cell::flat(0.0)),
            (edge, Cell::flat(0.0)),
        ])
        .expect("valid area");
        assert_eq!(area.can_traverse(edge, Heading::East, 3), Ok(false));
        assert_eq!(area.can_traverse(edge, Heading::West, 3), Ok(true));
    }

    #[test]
    fn test_vacuum_capacity_boundaries() {
        let mut area = single(2.0);
        assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Normal), Ok(true));
        assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Heavy), Ok(false));

        let mut area = single(5.0);
        assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Heavy), Ok(false));

        let mut area = single(5.01);
        assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Heavy), Ok(true));
    }

    #[test]
    fn test_cleanliness_percent() {
        let mut area = Area::from_cells([
            (Coord::new(0, 0), Cell::flat(1.0)),
            (Coord::new(1, 0), Cell::flat(0.0)),
            (Coord::new(2, 0), Cell::flat(0.0)),
            (Coord::new(3, 0), Cell::flat(9.0)),
        ])
        .expect("valid area");
        assert_eq!(area.dusty_count(), 2);
        assert!((area.cleanliness_percent() - 50.0).abs() < 1e-9);
        area.apply_vacuum(Coord::new(0, 0), Pressure::Normal)
            .expect("cell exists");
        assert!((area.cleanliness_percent() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_marks_holes() {
        let area = Area::from_cells([
            (Coord::new(0, 0), Cell::flat(1.5)),
            (Coord::new(1, 1), Cell::flat(0.0)),
        ])
        .expect("valid area");
        let rendered = area.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("   1 |"), "{}", rendered);
        assert!(lines[0].contains('-'), "{}", rendered);
        assert!(lines[1].contains("1.5"), "{}", rendered);
        assert_eq!(lines[2], "   x |     0     1");
    }

    #[test]
    fn test_display_skips_empty_rows_and_columns() {
        let area = Area::from_cells([
            (Coord::new(-1_000_000_000, 0), Cell::flat(1.0)),
            (Coord::new(1_000_000_000, 0), Cell::flat(2.0)),
            (Coord::new(0, 2_000_000), Cell::flat(0.0)),
        ])
        .expect("valid area");
        let rendered = area.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3, "{}", rendered);
        assert!(lines[0].starts_with("2000000 |"), "{}", rendered);
        assert!(lines[1].starts_with("      0 |"), "{}", rendered);
        assert!(lines[1].contains("1.0") && lines[1].contains("2.0"), "{}", rendered);
        assert!(lines[2].contains("-1000000000"), "{}", rendered);
        assert!(rendered.len() < 200, "{}", rendered);
    }

    #[test]
    fn test_display_lists_cells_when_grid_is_too_large() {
        let area = Area::from_cells((0..200).map(|i| (Coord::new(i * 1000, i), Cell::flat(0.5))))
            .expect("valid area");
        let rendered = area.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 200);
        assert_eq!(lines[0], " 199 | 199000:0.5");
        assert_eq!(lines[199], "   0 | 0:0.5");
    }

    proptest! {
        #[test]
        fn test_heavy_dust_is_never_cleaned(
            grams in 5.0001f64..1000.0,
            heavy_first in any::<bool>(),
            attempts in 1usize..8,
        ) {
            let mut area = single(grams);
            for i in 0..attempts {
                let pressure = if (i % 2 == 0) == heavy_first { Pressure::Heavy } else { Pressure::Normal };
                prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), pressure), Ok(true));
            }
        }

        #[test]
        fn test_light_dust_needs_one_normal_pass(grams in 0.0f64..2.0) {
            let mut area = single(grams);
            prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Normal), Ok(false));
        }

        #[test]
        fn test_medium_dust_needs_heavy(grams in 2.0f64..=5.0, normal_passes in 1usize..5) {
            let mut area = single(grams);
            for _ in 0..normal_passes {
                prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Normal), Ok(true));
            }
            prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Heavy), Ok(false));
        }

        #[test]
        fn test_vacuum_is_idempotent_once_clean(grams in 0.0f64..=5.0, extra in 1usize..5) {
            let mut area = single(grams);
            prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Heavy), Ok(false));
            let snapshot = area.clone();
            for _ in 0..extra {
                prop_assert_eq!(area.apply_vacuum(Coord::new(0, 0), Pressure::Normal), Ok(false));
                prop_assert_eq!(&area, &snapshot);
            }
        }
    }
}
