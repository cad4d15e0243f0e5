use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Day of week of a rehearsal slot. Ordering follows the French convention,
/// Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Lun,
    Mar,
    Mer,
    Jeu,
    Ven,
    Sam,
    Dim,
}

/// (day, canonical code, display name, ordering key).
const DAY_TABLE: [(Day, &str, &str, u8); 7] = [
    (Day::Lun, "LUN", "Lundi", 1),
    (Day::Mar, "MAR", "Mardi", 2),
    (Day::Mer, "MER", "Mercredi", 3),
    (Day::Jeu, "JEU", "Jeudi", 4),
    (Day::Ven, "VEN", "Vendredi", 5),
    (Day::Sam, "SAM", "Samedi", 6),
    (Day::Dim, "DIM", "Dimanche", 7),
];

lazy_static! {
    static ref DAY_BY_CODE: HashMap<&'static str, Day> =
        HashMap::from_iter(DAY_TABLE.iter().map(|(d, code, _, _)| (*code, *d)));
    /// Lowercase full names and three-letter abbreviations.
    static ref DAY_BY_NAME: HashMap<String, Day> = {
        let mut map = HashMap::new();
        for (day, code, name, _) in DAY_TABLE {
            map.insert(name.to_lowercase(), day);
            map.insert(code.to_lowercase(), day);
        }
        map
    };
}

impl Day {
    pub fn code(self) -> &'static str {
        DAY_TABLE[self.order() as usize - 1].1
    }
    pub fn name(self) -> &'static str {
        DAY_TABLE[self.order() as usize - 1].2
    }
    /// Monday = 1 ... Sunday = 7.
    pub fn order(self) -> u8 {
        match self {
            Day::Lun => 1,
            Day::Mar => 2,
            Day::Mer => 3,
            Day::Jeu => 4,
            Day::Ven => 5,
            Day::Sam => 6,
            Day::Dim => 7,
        }
    }
    /// Exact uppercase code, as found in canonical slot ids.
    pub fn from_code(code: &str) -> Option<Day> {
        DAY_BY_CODE.get(code).copied()
    }
    /// Case-insensitive full name or three-letter abbreviation.
    pub fn from_name(name: &str) -> Option<Day> {
        DAY_BY_NAME.get(&name.to_lowercase()).copied()
    }
}

/// A rehearsal opportunity, identified by its canonical id
/// `DAY_DD_HH:MM-HH:MM` (e.g. `LUN_05_14:00-16:00`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: Box<str>,
    pub day: Day,
    /// Day of month.
    pub date: u32,
    pub start_hour: u32,
    pub start_minute: u32,
    pub end_hour: u32,
    pub end_minute: u32,
}

impl Slot {
    pub fn new(
        day: Day,
        date: u32,
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Slot {
        let id = format!(
            "{}_{:02}_{:02}:{:02}-{:02}:{:02}",
            day.code(),
            date,
            start_hour,
            start_minute,
            end_hour,
            end_minute
        )
        .into_boxed_str();
        Slot {
            id,
            day,
            date,
            start_hour,
            start_minute,
            end_hour,
            end_minute,
        }
    }

    /// Parses a canonical slot id back into its parts. Formatting the result
    /// yields the input string again for any canonical id.
    pub fn parse(id: &str) -> Option<Slot> {
        let mut parts = id.split('_');
        let day = Day::from_code(parts.next()?)?;
        let date = parts.next()?.parse::<u32>().ok()?;
        let range = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        let (h1, m1, h2, m2) = parse_time_range(range)?;
        Some(Slot::new(day, date, h1, m1, h2, m2))
    }

    /// Parses a free-text slot label as found in table headers and embedded
    /// cells: a day prefix (`lun.`, dot optional, case-insensitive), a
    /// day-of-month, then an `H:MM-H:MM` range anywhere in the remaining
    /// text. Returns `None` for anything that does not carry all three.
    pub fn from_label(text: &str) -> Option<Slot> {
        let cleaned = text.replace(['\n', '\r'], " ");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        for (i, token) in tokens.iter().enumerate() {
            let Some(day) = Day::from_name(token.trim_end_matches('.')) else {
                continue;
            };
            let Some(next) = tokens.get(i + 1) else {
                continue;
            };
            let digits: String = next.chars().take_while(char::is_ascii_digit).collect();
            let Ok(date) = digits.parse::<u32>() else {
                continue;
            };
            // The range is searched only past the day-of-month digits.
            let mut tail = next[digits.len()..].to_string();
            for token in &tokens[i + 2..] {
                tail.push(' ');
                tail.push_str(token);
            }
            if let Some((h1, m1, h2, m2)) = parse_time_range(&tail) {
                return Some(Slot::new(day, date, h1, m1, h2, m2));
            }
        }
        None
    }

    /// Global ordering key: day of month, then start time.
    pub fn sort_key(&self) -> (u32, u32, u32) {
        (self.date, self.start_hour, self.start_minute)
    }

    /// Display pair, e.g. ("Lundi 05", "14:00-16:00").
    pub fn display_day(&self) -> String {
        format!("{} {:02}", self.day.name(), self.date)
    }
    pub fn display_hours(&self) -> String {
        format!(
            "{:02}:{:02}-{:02}:{:02}",
            self.start_hour, self.start_minute, self.end_hour, self.end_minute
        )
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Scans `text` for the first `H:MM-H:MM` range, tolerating spaces around
/// the dash. Returns (start hour, start minute, end hour, end minute).
pub(crate) fn parse_time_range(text: &str) -> Option<(u32, u32, u32, u32)> {
    let bytes = text.as_bytes();
    for at in 0..bytes.len() {
        let Some((h1, m1, mut i)) = parse_clock(bytes, at) else {
            continue;
        };
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if i >= bytes.len() || bytes[i] != b'-' {
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i] == b' ' {
            i += 1;
        }
        if let Some((h2, m2, _)) = parse_clock(bytes, i) {
            return Some((h1, m1, h2, m2));
        }
    }
    None
}

/// Parses `H:MM` or `HH:MM` starting at `at`. Returns the clock value and the
/// index just past it.
fn parse_clock(bytes: &[u8], at: usize) -> Option<(u32, u32, usize)> {
    let mut i = at;
    while i < bytes.len() && bytes[i].is_ascii_digit() && i - at < 2 {
        i += 1;
    }
    if i == at {
        return None;
    }
    let hour: u32 = std::str::from_utf8(&bytes[at..i]).ok()?.parse().ok()?;
    if i >= bytes.len() || bytes[i] != b':' {
        return None;
    }
    i += 1;
    let minute_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i - minute_start != 2 {
        return None;
    }
    let minute: u32 = std::str::from_utf8(&bytes[minute_start..i]).ok()?.parse().ok()?;
    Some((hour, minute, i))
}

/// Normalizes one special-slot spelling to a canonical id. Accepted forms:
/// `LUN_04_16:00-18:00`, the shorthand `LUN_4_16_18` (hours on the dot), and
/// the free form `"Lundi 04 16:00-18:00"` with case-insensitive day names.
pub fn normalize_special_slot(raw: &str) -> Option<Box<str>> {
    let cleaned = raw.trim().to_lowercase();
    if cleaned.contains('_') {
        let parts: Vec<&str> = cleaned.split('_').collect();
        if parts.len() < 3 {
            return None;
        }
        let day = Day::from_name(parts[0])?;
        let date = parts[1].parse::<u32>().ok()?;
        let (h1, m1, h2, m2) = if parts[2].contains(':') {
            parse_time_range(parts[2])?
        } else if parts.len() == 4 {
            let h1 = parts[2].parse::<u32>().ok()?;
            let h2 = parts[3].parse::<u32>().ok()?;
            (h1, 0, h2, 0)
        } else {
            return None;
        };
        return Some(Slot::new(day, date, h1, m1, h2, m2).id);
    }
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }
    let day = Day::from_name(tokens[0])?;
    let date = tokens[1].parse::<u32>().ok()?;
    let (h1, m1, h2, m2) = parse_time_range(&tokens[2..].join(" "))?;
    Some(Slot::new(day, date, h1, m1, h2, m2).id)
}

/// Week number of a day-of-month, relative to the earliest observed date.
pub fn week_of(date: u32, base: u32) -> u32 {
    ((date - base) / 7) + 1
}
