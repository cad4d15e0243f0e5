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

use crate::error::{Error, Result};
use crate::scheduler::slot;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Parameter bundle of one scheduling run. Built once by the caller and
/// treated as immutable by every component.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SchedulerConfig {
    /// Cost added per required musician answering "maybe" at the chosen slot.
    pub maybe_penalty: i64,
    /// Daily rehearsal count per musician above which the overload penalty applies.
    pub max_load: i64,
    /// Weight of each load unit above `max_load`.
    pub load_penalty: i64,
    /// Cost reduction per adjacent-slot co-occurrence of a shared musician.
    pub group_bonus: i64,
    pub absence_mode: AbsenceMode,
    /// Tolerated "no" answers per slot in flexible mode.
    pub absence_threshold: i64,
    /// Slots where `special_absence_threshold` applies instead. Any of the
    /// accepted alias spellings; normalized to canonical ids before use.
    pub special_slots: Vec<String>,
    pub special_absence_threshold: i64,
    /// Wall-clock budget of the search, in seconds. Also bounds the number
    /// of restarts.
    pub generation_time_limit: u64,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AbsenceMode {
    /// A "no" answer on a non-special slot is weighted out of reach.
    Strict,
    /// Absences are tolerated up to `absence_threshold` per slot.
    Flexible,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            maybe_penalty: 10,
            max_load: 3,
            load_penalty: 50,
            group_bonus: 20,
            absence_mode: AbsenceMode::Flexible,
            absence_threshold: 2,
            special_slots: Vec::new(),
            special_absence_threshold: 5,
            generation_time_limit: 30,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Rejects bundles the search cannot run with. Called once at the start
    /// of a run; all later code may assume the ranges hold.
    pub fn validate(&self) -> Result<()> {
        if self.maybe_penalty < 0 {
            return Err(Error::ConfigurationOutOfRange(format!(
                "maybe_penalty must be >= 0, got {}",
                self.maybe_penalty
            )));
        }
        if self.load_penalty < 0 {
            return Err(Error::ConfigurationOutOfRange(format!(
                "load_penalty must be >= 0, got {}",
                self.load_penalty
            )));
        }
        if self.group_bonus < 0 {
            return Err(Error::ConfigurationOutOfRange(format!(
                "group_bonus must be >= 0, got {}",
                self.group_bonus
            )));
        }
        if self.absence_threshold < 0 || self.special_absence_threshold < 0 {
            return Err(Error::ConfigurationOutOfRange(format!(
                "absence thresholds must be >= 0, got {} and {}",
                self.absence_threshold, self.special_absence_threshold
            )));
        }
        if self.max_load < 1 {
            return Err(Error::ConfigurationOutOfRange(format!(
                "max_load must be >= 1, got {}",
                self.max_load
            )));
        }
        if self.generation_time_limit == 0 {
            return Err(Error::ConfigurationOutOfRange(
                "generation_time_limit must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Normalizes the configured special slots to canonical ids.
    /// Unrecognized spellings are dropped with a warning.
    pub fn special_slot_set(&self) -> HashSet<Box<str>> {
        let mut set = HashSet::new();
        for raw in &self.special_slots {
            match slot::normalize_special_slot(raw) {
                Some(id) => {
                    set.insert(id);
                }
                None => warn!("ignoring unrecognized special slot '{}'", raw),
            }
        }
        set
    }
}
