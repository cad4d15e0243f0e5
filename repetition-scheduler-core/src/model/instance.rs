use crate::error::{Error, Result};
use crate::scheduler::slot::{self, Day, Slot};
use log::info;
use std::collections::{BTreeSet, HashMap};

pub type MusicianId = usize;
pub type PieceId = usize;
pub type SlotId = usize;

/// A musician's declared stance on a slot. Missing answers default to `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Yes,
    Maybe,
    No,
}

impl Availability {
    /// Lower-case label used in the result record.
    pub fn label(self) -> &'static str {
        match self {
            Availability::Yes => "yes",
            Availability::Maybe => "maybe",
            Availability::No => "no",
        }
    }

    /// Normalizes a raw table cell. `yes`/`oui` and `maybe`/`peut-être` are
    /// recognized case-insensitively; anything else, including blanks, is `No`.
    pub fn from_cell(raw: &str) -> Availability {
        match raw.trim().to_lowercase().as_str() {
            "yes" | "oui" => Availability::Yes,
            "maybe" | "peut-être" => Availability::Maybe,
            _ => Availability::No,
        }
    }
}

/// A titled musical item and the musicians required to play it.
/// Members are kept in first-occurrence order, deduplicated.
#[derive(Debug, Clone)]
pub struct Piece {
    pub title: Box<str>,
    pub members: Vec<MusicianId>,
}

/// Frozen output of the loader: domain entities plus the derived indexes the
/// search and the projector work from. Immutable for the whole run.
#[derive(Debug)]
pub struct Instance {
    /// Sorted by name; ids are positions in this list.
    musicians: Vec<Box<str>>,
    pieces: Vec<Piece>,
    /// Globally sorted by (day of month, start time).
    slots: Vec<Slot>,
    /// Dense musician-major availability matrix.
    availability: Vec<Availability>,
    slot_index: HashMap<Box<str>, SlotId>,
    /// Slots sharing a day code share a bucket, in global slot order.
    slots_by_day: HashMap<Day, Vec<SlotId>>,
    /// Position of each slot inside its day bucket.
    day_position: Vec<usize>,
    /// Pieces each musician plays, in piece order.
    musician_pieces: Vec<Vec<PieceId>>,
    date_to_week: HashMap<u32, u32>,
    weeks: Vec<u32>,
    /// Non-fatal anomalies accumulated at load time.
    pub diagnostics: Vec<String>,
}

impl Instance {
    /// Assembles and indexes an instance from normalized raw parts.
    /// `availability` maps musician name -> canonical slot id -> answer;
    /// entries for unknown musicians or slots are ignored.
    pub fn build(
        musicians: Vec<Box<str>>,
        pieces: Vec<(Box<str>, Vec<Box<str>>)>,
        slots: Vec<Slot>,
        availability: HashMap<Box<str>, HashMap<Box<str>, Availability>>,
        diagnostics: Vec<String>,
    ) -> Result<Instance> {
        let mut musicians = musicians;
        musicians.sort();
        musicians.dedup();
        if musicians.is_empty() {
            return Err(Error::InputShape("no musicians discovered".into()));
        }

        // Keep first occurrence of each slot id, then order globally.
        let mut slots = slots;
        let mut seen = BTreeSet::new();
        slots.retain(|s| seen.insert(s.id.clone()));
        slots.sort_by_key(Slot::sort_key);
        if slots.is_empty() {
            return Err(Error::InputShape("no slots discovered".into()));
        }

        let musician_index: HashMap<&str, MusicianId> = musicians
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_ref(), i))
            .collect();
        let slot_index: HashMap<Box<str>, SlotId> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let pieces: Vec<Piece> = pieces
            .into_iter()
            .map(|(title, members)| {
                let mut ids = Vec::with_capacity(members.len());
                for name in &members {
                    if let Some(&id) = musician_index.get(name.as_ref()) {
                        if !ids.contains(&id) {
                            ids.push(id);
                        }
                    }
                }
                Piece { title, members: ids }
            })
            .filter(|p| !p.members.is_empty())
            .collect();

        let mut musician_pieces = vec![Vec::new(); musicians.len()];
        for (piece_id, piece) in pieces.iter().enumerate() {
            for &m in &piece.members {
                musician_pieces[m].push(piece_id);
            }
        }

        let mut matrix = vec![Availability::No; musicians.len() * slots.len()];
        for (name, answers) in &availability {
            let Some(&m) = musician_index.get(name.as_ref()) else {
                continue;
            };
            for (slot_id, answer) in answers {
                if let Some(&s) = slot_index.get(slot_id) {
                    matrix[m * slots.len() + s] = *answer;
                }
            }
        }

        let mut slots_by_day: HashMap<Day, Vec<SlotId>> = HashMap::new();
        let mut day_position = vec![0; slots.len()];
        for (i, s) in slots.iter().enumerate() {
            let bucket = slots_by_day.entry(s.day).or_default();
            day_position[i] = bucket.len();
            bucket.push(i);
        }

        let dates: BTreeSet<u32> = slots.iter().map(|s| s.date).collect();
        let base = *dates.first().expect("slots are non-empty");
        let date_to_week: HashMap<u32, u32> =
            dates.iter().map(|&d| (d, slot::week_of(d, base))).collect();
        let mut weeks: Vec<u32> = date_to_week.values().copied().collect();
        weeks.sort_unstable();
        weeks.dedup();

        info!(
            "instance ready: {} musicians, {} pieces, {} slots over {} week(s)",
            musicians.len(),
            pieces.len(),
            slots.len(),
            weeks.len()
        );

        Ok(Instance {
            musicians,
            pieces,
            slots,
            availability: matrix,
            slot_index,
            slots_by_day,
            day_position,
            musician_pieces,
            date_to_week,
            weeks,
            diagnostics,
        })
    }

    pub fn musicians(&self) -> &[Box<str>] {
        &self.musicians
    }
    pub fn musician_name(&self, m: MusicianId) -> &str {
        &self.musicians[m]
    }
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
    pub fn slot_index(&self, id: &str) -> Option<SlotId> {
        self.slot_index.get(id).copied()
    }
    pub fn availability(&self, m: MusicianId, s: SlotId) -> Availability {
        self.availability[m * self.slots.len() + s]
    }
    /// Slots on the given day code, in global order.
    pub fn day_slots(&self, day: Day) -> &[SlotId] {
        self.slots_by_day.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }
    /// Position of a slot inside its day bucket.
    pub fn day_position(&self, s: SlotId) -> usize {
        self.day_position[s]
    }
    pub fn pieces_of(&self, m: MusicianId) -> &[PieceId] {
        &self.musician_pieces[m]
    }
    pub fn week_of_date(&self, date: u32) -> u32 {
        self.date_to_week[&date]
    }
    pub fn weeks(&self) -> &[u32] {
        &self.weeks
    }
}

/// Current mapping from pieces to slots. Mutated only by the search engine;
/// the projector reads a frozen copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    slots: Vec<Option<SlotId>>,
}

impl Assignment {
    pub fn empty(pieces: usize) -> Assignment {
        Assignment {
            slots: vec![None; pieces],
        }
    }
    pub fn get(&self, p: PieceId) -> Option<SlotId> {
        self.slots[p]
    }
    pub fn set(&mut self, p: PieceId, s: Option<SlotId>) {
        self.slots[p] = s;
    }
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Option<SlotId>)> + '_ {
        self.slots.iter().copied().enumerate()
    }
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
    /// First piece assigned to the slot, in piece order.
    pub fn piece_at(&self, slot: SlotId) -> Option<PieceId> {
        self.slots.iter().position(|&s| s == Some(slot))
    }
}
