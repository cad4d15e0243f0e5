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

use clap::Parser;
use log::{info, LevelFilter};
use repetition_scheduler_core::model::configuration::{AbsenceMode, SchedulerConfig};
use repetition_scheduler_core::scheduler::export;
use std::path::PathBuf;

/// Rehearsal planner: assigns pieces to slots from a repartition table and
/// an availability table, and prints the resulting planning as JSON.
#[derive(Parser, Debug)]
#[command(name = "repetition-scheduler", version)]
struct Args {
    /// Availability table (CSV)
    #[arg(long)]
    disponibilites: PathBuf,

    /// Repartition table (CSV). Without it a single catch-all piece over
    /// every respondent is planned.
    #[arg(long)]
    repartition: Option<PathBuf>,

    /// Cost of a "maybe" answer per required musician
    #[arg(long, default_value_t = 10)]
    maybe_penalty: i64,

    /// Rehearsals per musician per day before the overload penalty applies
    #[arg(long, default_value_t = 3)]
    max_load: i64,

    /// Weight of each rehearsal above the daily cap
    #[arg(long, default_value_t = 50)]
    load_penalty: i64,

    /// Reward for adjacent rehearsals sharing a musician
    #[arg(long, default_value_t = 20)]
    group_bonus: i64,

    /// Absence handling: strict or flexible
    #[arg(long, default_value = "flexible")]
    mode_absence: String,

    /// Tolerated absences per slot in flexible mode
    #[arg(long, default_value_t = 2)]
    seuil_absence: i64,

    /// Slot tolerating more absences; repeatable. Accepts
    /// "LUN_04_16:00-18:00", "LUN_4_16_18" or "Lundi 04 16:00-18:00".
    #[arg(long = "creneau-special")]
    creneaux_speciaux: Vec<String>,

    /// Tolerated absences on special slots
    #[arg(long, default_value_t = 5)]
    seuil_absence_special: i64,

    /// Wall-clock budget of the search, in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Fixed random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Also write the workbook rendering into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if let Err(error) = run(args) {
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let absence_mode = match args.mode_absence.as_str() {
        "strict" => AbsenceMode::Strict,
        "flexible" => AbsenceMode::Flexible,
        other => return Err(format!("unknown absence mode '{}'", other).into()),
    };
    let config = SchedulerConfig {
        maybe_penalty: args.maybe_penalty,
        max_load: args.max_load,
        load_penalty: args.load_penalty,
        group_bonus: args.group_bonus,
        absence_mode,
        absence_threshold: args.seuil_absence,
        special_slots: args.creneaux_speciaux,
        special_absence_threshold: args.seuil_absence_special,
        generation_time_limit: args.timeout,
        seed: args.seed,
    };

    info!(
        "planning {:?} with maybe_penalty={} max_load={} load_penalty={} group_bonus={} timeout={}s",
        args.disponibilites,
        config.maybe_penalty,
        config.max_load,
        config.load_penalty,
        config.group_bonus,
        config.generation_time_limit
    );

    let result = repetition_scheduler_core::schedule_files(
        args.repartition.as_deref(),
        &args.disponibilites,
        &config,
    )?;

    info!(
        "{}: {}/{} pieces assigned (cost {})",
        result.status.label(),
        result.report.assigned,
        result.report.total,
        result.total_cost
    );

    if let Some(directory) = &args.export_dir {
        std::fs::create_dir_all(directory)?;
        let path = export::export_workbook(
            &result.instance,
            &result.assignment,
            result.status,
            &config,
            directory,
            "planning",
        )?;
        info!("exported {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&result.report)?);
    Ok(())
}
