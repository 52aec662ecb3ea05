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

//! Run the cleaning agent over an area file with a settings file and print how it did.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vacuum_agent::{
    load_area, load_settings, Coord, DecisionEngine, DeviceConfig, Simulation, Step,
};

const PROGRESS_INTERVAL: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "vacuum-sim")]
#[command(about = "Simulate a cleaning agent on an area with a power and time budget")]
struct Cli {
    /// Log every decision and print the dust map with progress updates
    #[arg(long, short)]
    verbose: bool,

    /// Settings file, one value per line
    #[arg(long, short, default_value = "setting.txt")]
    settings: PathBuf,

    /// Area file (CSV)
    #[arg(long, short, default_value = "area.csv")]
    area: PathBuf,

    /// Largest elevation delta the device can cross
    #[arg(long, default_value_t = DeviceConfig::DEFAULT_MAX_CLIMB)]
    max_climb: i32,

    /// Initial battery power
    #[arg(long, default_value_t = DeviceConfig::DEFAULT_BATTERY_CAPACITY)]
    battery: f64,

    /// Starting cell x coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_x: i32,

    /// Starting cell y coordinate
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start_y: i32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            max_climb: self.max_climb,
            battery_capacity: self.battery,
            origin: Coord::new(self.start_x, self.start_y),
            ..DeviceConfig::default()
        }
    }
}

fn log_progress(simulation: &Simulation<'_, DecisionEngine>, verbose: bool) {
    let state = simulation.agent_state();
    info!(
        step = simulation.steps(),
        position = %state.position(),
        heading = %state.heading(),
        mode = ?simulation.agent().mode(),
        remaining_power = state.remaining_power(),
        remaining_time = state.remaining_time(),
        cleaned = state.cleaned().len(),
        "progress"
    );
    if verbose {
        info!("dust map:\n{}", simulation.area());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;
    for (name, value) in settings.named_values() {
        debug!(setting = name, value, "setting loaded");
    }
    let mut area = load_area(&cli.area)
        .with_context(|| format!("loading area from {}", cli.area.display()))?;
    info!(cells = area.len(), dusty = area.dusty_count(), "area loaded");

    let device = cli.device_config();
    let agent = DecisionEngine::new(device.max_climb);
    let mut simulation =
        Simulation::new(&mut area, &settings, device, agent).context("starting simulation")?;

    while let Step::Continue = simulation.step().context("simulation step failed")? {
        if simulation.steps() % PROGRESS_INTERVAL == 0 {
            log_progress(&simulation, cli.verbose);
        }
    }
    let report = simulation.report().context("simulation ended without a report")?;
    if cli.verbose {
        info!("final dust map:\n{}", simulation.area());
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
