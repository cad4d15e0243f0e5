/*
 * Copyright (c) 2025 Clément GRENNERAT
 *
 * This program is free software: you can redistribute it and/or modify it under the terms of the
 * GNU General Public License as published by the Free Software Foundation, version 3.
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
 * even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
 * See the GNU General Public License for more details.
 * You should have received a copy of the GNU General Public License along with this program.
 * If not, see https://www.gnu.org/licenses/.
 *
 */

pub mod error;
pub mod loader;
pub mod model;
pub mod scheduler;

pub use error::{Error, Result};

use crate::model::configuration::SchedulerConfig;
use crate::scheduler::projector::{self, ScheduleReport};
use crate::scheduler::search::{SolveStatus, Solver};
use std::io::Read;
use std::path::Path;

/// Outcome of one complete scheduling run: the frozen instance, the final
/// assignment, the solve status and the projected report.
pub struct SolveResult {
    pub instance: model::instance::Instance,
    pub assignment: model::instance::Assignment,
    pub status: SolveStatus,
    pub total_cost: i64,
    pub report: ScheduleReport,
}

/// Runs a full scheduling cycle from tabular readers: load, solve, project.
/// `repartition` may be absent, in which case the loader synthesizes a single
/// catch-all piece over the discovered musicians.
pub fn schedule<R1: Read, R2: Read>(
    repartition: Option<R1>,
    availability: R2,
    config: &SchedulerConfig,
) -> Result<SolveResult> {
    config.validate()?;
    let instance = loader::load_from_readers(repartition, availability)?;
    let mut solver = Solver::new(&instance, config);
    let outcome = solver.solve();
    let report = projector::project(&instance, &outcome.assignment, outcome.status);
    Ok(SolveResult {
        assignment: outcome.assignment,
        status: outcome.status,
        total_cost: outcome.cost,
        report,
        instance,
    })
}

/// Same as [`schedule`], reading the two tables from filesystem paths.
pub fn schedule_files(
    repartition: Option<&Path>,
    availability: &Path,
    config: &SchedulerConfig,
) -> Result<SolveResult> {
    let repartition = match repartition {
        Some(path) => Some(std::fs::File::open(path)?),
        None => None,
    };
    let availability = std::fs::File::open(availability)?;
    schedule(repartition, availability, config)
}
