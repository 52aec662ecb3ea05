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

//! Reading the area and settings files.
//!
//! The area file is a CSV with one row per cell:
//!
//! ```text
//! XCoordination,YCoordination,DeltaL,DeltaR,DeltaU,DeltaD,Texture,DustWeight
//! 0,0,0,1,0,0,H,1.5
//! ```
//!
//! The settings file holds one number per line, in the order of [`Settings::from_values`].
//! Both are validated completely before anything is built.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::area::{Area, AreaError, Cell, Elevation, Texture};
use crate::geometry::Coord;
use crate::settings::Settings;
use crate::HashSet;

/// Input file error. Line numbers are 1-based and count the header row.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The row is not valid CSV or a field has the wrong type.
    #[error("line {line}: {source}")]
    Csv { line: u64, source: csv::Error },

    /// Texture codes are `H` or `S`.
    #[error("line {line}: unknown texture {code:?}")]
    UnknownTexture { line: u64, code: String },

    /// Dust weight must be finite and non-negative.
    #[error("line {line}: invalid dust weight {weight}")]
    InvalidDustWeight { line: u64, weight: f64 },

    /// Two rows share a coordinate.
    #[error("line {line}: duplicate cell at {coord}")]
    DuplicateCell { line: u64, coord: Coord },

    /// The area could not be built.
    #[error(transparent)]
    Area(#[from] AreaError),

    /// A settings line is not a number.
    #[error("line {line}: not a number: {text:?}")]
    NotNumeric { line: usize, text: String },

    /// The settings file is too short.
    #[error("expected {expected} settings, found {found}")]
    MissingSettings { found: usize, expected: usize },

    /// A setting is negative or not finite.
    #[error("invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}

#[derive(Debug, Deserialize)]
struct AreaRow {
    #[serde(rename = "XCoordination")]
    x: i32,
    #[serde(rename = "YCoordination")]
    y: i32,
    #[serde(rename = "DeltaL")]
    left: i32,
    #[serde(rename = "DeltaR")]
    right: i32,
    #[serde(rename = "DeltaU")]
    up: i32,
    #[serde(rename = "DeltaD")]
    down: i32,
    #[serde(rename = "Texture")]
    texture: String,
    #[serde(rename = "DustWeight")]
    dust_weight: f64,
}

fn csv_error(source: csv::Error) -> LoadError {
    let line = source.position().map_or(0, |position| position.line());
    LoadError::Csv { line, source }
}

/// Parse an area from CSV.
pub fn parse_area<R: Read>(reader: R) -> Result<Area, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut cells = Vec::new();
    let mut seen: HashSet<Coord> = HashSet::default();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(csv_error)? {
        let line = record.position().map_or(0, |position| position.line());
        let row: AreaRow = record
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Csv { line, source })?;

        let coord = Coord::new(row.x, row.y);
        let Some(texture) = Texture::from_code(&row.texture) else {
            return Err(LoadError::UnknownTexture {
                line,
                code: row.texture,
            });
        };
        if !row.dust_weight.is_finite() || row.dust_weight < 0.0 {
            return Err(LoadError::InvalidDustWeight {
                line,
                weight: row.dust_weight,
            });
        }
        if !seen.insert(coord) {
            return Err(LoadError::DuplicateCell { line, coord });
        }

        let elevation = Elevation {
            left: row.left,
            right: row.right,
            up: row.up,
            down: row.down,
        };
        cells.push((coord, Cell::new(elevation, texture, row.dust_weight)));
    }

    let area = Area::from_cells(cells)?;
    debug!(cells = area.len(), dusty = area.dusty_count(), "area parsed");
    Ok(area)
}

/// Load an area from a CSV file.
pub fn load_area(path: impl AsRef<Path>) -> Result<Area, LoadError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_area(file)
}

/// Parse settings, one number per line. Blank lines are skipped and anything after the last
/// setting is ignored.
pub fn parse_settings(text: &str) -> Result<Settings, LoadError> {
    let mut values = Vec::with_capacity(Settings::FIELD_COUNT);
    for (index, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if values.len() == Settings::FIELD_COUNT {
            warn!(line = index + 1, text = trimmed, "ignoring extra settings line");
            continue;
        }
        let value: f64 = trimmed.parse().map_err(|_| LoadError::NotNumeric {
            line: index + 1,
            text: trimmed.to_string(),
        })?;
        values.push(value);
    }

    let values: [f64; Settings::FIELD_COUNT] = values.try_into().map_err(|found: Vec<f64>| {
        LoadError::MissingSettings {
            found: found.len(),
            expected: Settings::FIELD_COUNT,
        }
    })?;
    let settings = Settings::from_values(values);
    for (name, value) in settings.named_values() {
        if !value.is_finite() || value < 0.0 {
            return Err(LoadError::InvalidSetting { name, value });
        }
    }
    Ok(settings)
}

/// Load settings from a file.
pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text)
}
