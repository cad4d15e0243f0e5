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

//! Tabular ingestion: turns the repartition and availability tables into a
//! frozen [`Instance`]. The container is CSV; only the normalization rules
//! in this module are the contract, so future containers can be swapped in
//! behind [`load_from_readers`].

mod availability;
mod repartition;

use crate::error::Result;
use crate::model::instance::Instance;
use log::info;
use std::io::Read;
use std::path::Path;

/// Title of the catch-all piece synthesized when no repartition rows exist.
const DEFAULT_PIECE: &str = "Session_Planning";

/// Loads both tables and finalizes the instance. `repartition` may be
/// absent; if no pieces were provided but musicians exist, a single
/// catch-all piece over every musician is synthesized.
pub fn load_from_readers<R1: Read, R2: Read>(
    repartition: Option<R1>,
    availability: R2,
) -> Result<Instance> {
    let mut diagnostics = Vec::new();

    let (mut pieces, mut musicians) = match repartition {
        Some(reader) => repartition::parse(&read_table(reader)?, &mut diagnostics)?,
        None => (Vec::new(), Vec::new()),
    };

    let table = read_table(availability)?;
    let parsed = availability::parse(&table, &mut diagnostics)?;
    for name in parsed.musicians {
        if !musicians.contains(&name) {
            musicians.push(name);
        }
    }

    if pieces.is_empty() && !musicians.is_empty() {
        info!(
            "no pieces provided, synthesizing '{}' over {} musicians",
            DEFAULT_PIECE,
            musicians.len()
        );
        pieces.push((DEFAULT_PIECE.into(), musicians.clone()));
    }

    Instance::build(
        musicians,
        pieces,
        parsed.slots,
        parsed.availability,
        diagnostics,
    )
}

/// Path-based variant of [`load_from_readers`].
pub fn load_from_paths(repartition: Option<&Path>, availability: &Path) -> Result<Instance> {
    let repartition = match repartition {
        Some(path) => Some(std::fs::File::open(path)?),
        None => None,
    };
    load_from_readers(repartition, std::fs::File::open(availability)?)
}

/// Reads a whole CSV table into rows of trimmed-length cells. Rows may have
/// uneven lengths; downstream code indexes defensively.
fn read_table<R: Read>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Python-style title casing: first letter of every alphabetic run is
/// uppercased, the rest lowercased. Applied to every musician name so both
/// tables agree on identity.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alphabetic = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alphabetic {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(c);
            prev_alphabetic = false;
        }
    }
    out
}
