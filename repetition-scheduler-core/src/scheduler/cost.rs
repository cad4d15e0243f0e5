use crate::model::configuration::{AbsenceMode, SchedulerConfig};
use crate::model::instance::{Assignment, Availability, Instance, MusicianId, PieceId, SlotId};
use crate::scheduler::slot::Day;
use std::collections::{HashMap, HashSet};

/// Weight of one absence on a strict non-special slot, and of each absence
/// above the tolerated threshold. Large enough to dominate every soft term.
pub const HARD_ABSENCE_PENALTY: i64 = 10_000;
/// Weight of one tolerated absence.
pub const SOFT_ABSENCE_PENALTY: i64 = 100;
/// Weight of a second piece sharing a slot. Dominant term: guarantees slot
/// exclusivity in any sub-optimal minimum.
pub const SLOT_CLASH_PENALTY: i64 = 100_000_000;

/// Computes the cost of placing a piece at a slot under the current
/// assignment, memoized on (piece, slot). Values depend on every other
/// assignment, so the cache must be cleared on each commit; the owner calls
/// [`CostEvaluator::invalidate`] for that.
pub struct CostEvaluator<'a> {
    instance: &'a Instance,
    config: &'a SchedulerConfig,
    /// Per-slot flag: does the relaxed absence threshold apply here.
    special: Vec<bool>,
    cache: HashMap<(PieceId, SlotId), i64>,
}

impl<'a> CostEvaluator<'a> {
    pub fn new(instance: &'a Instance, config: &'a SchedulerConfig) -> CostEvaluator<'a> {
        let special_ids: HashSet<Box<str>> = config.special_slot_set();
        let special = instance
            .slots()
            .iter()
            .map(|s| special_ids.contains(&s.id))
            .collect();
        CostEvaluator {
            instance,
            config,
            special,
            cache: HashMap::new(),
        }
    }

    pub fn is_special(&self, slot: SlotId) -> bool {
        self.special[slot]
    }

    /// Drops every memoized value. Must be called whenever `assignment`
    /// changes between cost queries.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Cost of `piece` at `slot` under `assignment`. The piece's own current
    /// placement never contributes to its own cost, so callers may evaluate
    /// candidates without temporarily moving the piece.
    pub fn cost(&mut self, assignment: &Assignment, piece: PieceId, slot: SlotId) -> i64 {
        if let Some(&cached) = self.cache.get(&(piece, slot)) {
            return cached;
        }

        let members = &self.instance.pieces()[piece].members;
        let special = self.special[slot];
        let threshold = if special {
            self.config.special_absence_threshold
        } else {
            self.config.absence_threshold
        };

        let mut cost = 0i64;
        let mut absents = 0i64;
        for &m in members {
            match self.instance.availability(m, slot) {
                Availability::No => {
                    absents += 1;
                    if self.config.absence_mode == AbsenceMode::Strict && !special {
                        cost += HARD_ABSENCE_PENALTY;
                    } else {
                        cost += SOFT_ABSENCE_PENALTY;
                    }
                }
                Availability::Maybe => cost += self.config.maybe_penalty,
                Availability::Yes => {}
            }
        }
        if (self.config.absence_mode != AbsenceMode::Strict || special) && absents > threshold {
            cost += (absents - threshold) * HARD_ABSENCE_PENALTY;
        }

        for (other, other_slot) in assignment.iter() {
            if other != piece && other_slot == Some(slot) {
                cost += SLOT_CLASH_PENALTY;
            }
        }

        let day = self.instance.slots()[slot].day;
        for &m in members {
            let mut load = self.daily_load(assignment, m, day, piece);
            // Needed at this very slot by another piece counts once more.
            if self
                .instance
                .pieces_of(m)
                .iter()
                .any(|&p| p != piece && assignment.get(p) == Some(slot))
            {
                load += 1;
            }
            if load >= self.config.max_load {
                cost += self.config.load_penalty * (load - self.config.max_load + 1);
            }
        }

        let cost = (cost - self.grouping_bonus(assignment, piece, slot)).max(0);
        self.cache.insert((piece, slot), cost);
        cost
    }

    /// Number of `musician`'s other pieces currently assigned to the day.
    fn daily_load(
        &self,
        assignment: &Assignment,
        musician: MusicianId,
        day: Day,
        exclude: PieceId,
    ) -> i64 {
        let mut load = 0;
        for &p in self.instance.pieces_of(musician) {
            if p == exclude {
                continue;
            }
            if let Some(s) = assignment.get(p) {
                if self.instance.slots()[s].day == day {
                    load += 1;
                }
            }
        }
        load
    }

    /// Reward for every shared musician already placed in one of the two
    /// neighbouring slots of the same day. A day with a single position
    /// yields no bonus.
    fn grouping_bonus(&self, assignment: &Assignment, piece: PieceId, slot: SlotId) -> i64 {
        let day_slots = self.instance.day_slots(self.instance.slots()[slot].day);
        let position = self.instance.day_position(slot);
        let mut bonus = 0;
        for &m in &self.instance.pieces()[piece].members {
            for neighbour in [position.checked_sub(1), Some(position + 1)] {
                let Some(adjacent) = neighbour.and_then(|i| day_slots.get(i)) else {
                    continue;
                };
                for &p in self.instance.pieces_of(m) {
                    if p != piece && assignment.get(p) == Some(*adjacent) {
                        bonus += self.config.group_bonus;
                    }
                }
            }
        }
        bonus
    }
}
