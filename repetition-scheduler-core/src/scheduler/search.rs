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

//! Greedy seeding plus iterative min-conflicts repair, wrapped in a restart
//! loop bounded by wall-clock time. Single-threaded; one solver owns its
//! assignment and conflict map end to end.

use crate::model::configuration::SchedulerConfig;
use crate::model::instance::{Assignment, Instance, PieceId};
use crate::scheduler::cost::CostEvaluator;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cmp::Reverse;
use std::time::{Duration, Instant};

/// Repair steps per restart.
pub const MAX_ITERATIONS: usize = 10_000;
/// A seeded piece must cost strictly less than this; greediness knob only.
const SEED_THRESHOLD: i64 = 1_000;
/// Flat cost of the unassigned candidate during repair.
const UNASSIGNED_CANDIDATE_COST: i64 = 500;
/// Weight of an unassigned piece in total-cost accounting.
const UNASSIGNED_FINAL_COST: i64 = 1_000;
/// Conflict value of an unassigned piece, keeping it in the repair pool.
const UNASSIGNED_CONFLICT: i64 = 10_000;
/// Conflicted pieces the random pick draws from.
const TOP_CONFLICTED: usize = 3;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    /// A zero-conflict assignment was reached.
    Optimal,
    /// The budget ran out; the best assignment ever seen is returned.
    Feasible,
    /// No assignment was ever kept.
    Infeasible,
}

impl SolveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
        }
    }
}

pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Assignment,
    /// Total cost of the returned assignment, unassigned pieces counted at
    /// their accounting weight.
    pub cost: i64,
}

pub struct Solver<'a> {
    instance: &'a Instance,
    config: &'a SchedulerConfig,
    evaluator: CostEvaluator<'a>,
    assignment: Assignment,
    /// Per-piece cost under the current assignment.
    conflicts: Vec<i64>,
    rng: StdRng,
}

impl<'a> Solver<'a> {
    pub fn new(instance: &'a Instance, config: &'a SchedulerConfig) -> Solver<'a> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Solver {
            evaluator: CostEvaluator::new(instance, config),
            assignment: Assignment::empty(instance.pieces().len()),
            conflicts: vec![0; instance.pieces().len()],
            instance,
            config,
            rng,
        }
    }

    /// Runs the restart loop until a perfect assignment, the restart bound,
    /// or the wall-clock budget. Never raises on timeout; the best kept
    /// assignment (or the current one if none was kept) is returned.
    pub fn solve(&mut self) -> SolveOutcome {
        let started = Instant::now();
        let budget = Duration::from_secs(self.config.generation_time_limit);
        let max_restarts = self.config.generation_time_limit as usize;

        let mut best: Option<(i64, Assignment)> = None;

        for restart in 0..max_restarts {
            if started.elapsed() > budget {
                info!("time limit reached after {} restart(s)", restart);
                break;
            }
            debug!("restart {}/{}", restart + 1, max_restarts);
            self.seed_assignment();

            let mut perfect = false;
            for iteration in 0..MAX_ITERATIONS {
                if started.elapsed() > budget {
                    break;
                }
                if self.repair_step() {
                    info!("perfect assignment found after {} iteration(s)", iteration);
                    perfect = true;
                    break;
                }
            }

            if perfect {
                return SolveOutcome {
                    status: SolveStatus::Optimal,
                    assignment: self.assignment.clone(),
                    cost: self.total_cost(),
                };
            }

            let cost = self.total_cost();
            if best.as_ref().is_none_or(|(best_cost, _)| cost < *best_cost) {
                debug!("restart {} improved best cost to {}", restart + 1, cost);
                best = Some((cost, self.assignment.clone()));
            }
        }

        match best {
            Some((cost, assignment)) => {
                info!(
                    "best kept assignment: {}/{} pieces, cost {}",
                    assignment.assigned_count(),
                    self.instance.pieces().len(),
                    cost
                );
                self.assignment = assignment.clone();
                SolveOutcome {
                    status: SolveStatus::Feasible,
                    assignment,
                    cost,
                }
            }
            None => {
                warn!("no assignment was ever kept");
                SolveOutcome {
                    status: SolveStatus::Infeasible,
                    assignment: self.assignment.clone(),
                    cost: self.total_cost(),
                }
            }
        }
    }

    /// Greedy seeding: pieces in descending member count each take their
    /// cheapest slot, if cheap enough. Starts from an empty assignment and a
    /// cold cache.
    fn seed_assignment(&mut self) {
        self.assignment = Assignment::empty(self.instance.pieces().len());
        self.evaluator.invalidate();

        let mut order: Vec<PieceId> = (0..self.instance.pieces().len()).collect();
        order.sort_by_key(|&p| Reverse(self.instance.pieces()[p].members.len()));

        for piece in order {
            let mut best_slot = None;
            let mut min_cost = i64::MAX;
            for slot in 0..self.instance.slots().len() {
                let cost = self.evaluator.cost(&self.assignment, piece, slot);
                if cost < min_cost {
                    min_cost = cost;
                    best_slot = Some(slot);
                }
            }
            if let Some(slot) = best_slot {
                if min_cost < SEED_THRESHOLD {
                    self.assignment.set(piece, Some(slot));
                }
            }
        }
        self.update_conflicts();
    }

    /// One min-conflicts step. Returns true when no piece is in conflict.
    fn repair_step(&mut self) -> bool {
        let mut conflicted: Vec<(PieceId, i64)> = self
            .conflicts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(p, &c)| (p, c))
            .collect();
        if conflicted.is_empty() {
            return true;
        }
        conflicted.sort_by_key(|&(_, c)| Reverse(c));

        let top = conflicted.len().min(TOP_CONFLICTED);
        let (piece, _) = conflicted[self.rng.random_range(0..top)];

        let mut choice = None;
        let mut min_cost = i64::MAX;
        for slot in 0..self.instance.slots().len() {
            let cost = self.evaluator.cost(&self.assignment, piece, slot);
            if cost < min_cost {
                min_cost = cost;
                choice = Some(slot);
            }
        }
        // Unassigned stays a first-class candidate so the engine can drop a
        // piece whose cheapest slot is worse than the placeholder.
        if UNASSIGNED_CANDIDATE_COST < min_cost {
            choice = None;
        }

        if choice != self.assignment.get(piece) {
            self.assignment.set(piece, choice);
            self.update_conflicts();
        }
        false
    }

    /// Recomputes every conflict value from scratch on a cleared cache.
    fn update_conflicts(&mut self) {
        self.evaluator.invalidate();
        for piece in 0..self.instance.pieces().len() {
            self.conflicts[piece] = match self.assignment.get(piece) {
                Some(slot) => self.evaluator.cost(&self.assignment, piece, slot),
                None => UNASSIGNED_CONFLICT,
            };
        }
    }

    /// Total cost of the current assignment, with unassigned pieces at their
    /// accounting weight.
    fn total_cost(&mut self) -> i64 {
        let mut total = 0;
        for piece in 0..self.instance.pieces().len() {
            total += match self.assignment.get(piece) {
                Some(slot) => self.evaluator.cost(&self.assignment, piece, slot),
                None => UNASSIGNED_FINAL_COST,
            };
        }
        total
    }
}
