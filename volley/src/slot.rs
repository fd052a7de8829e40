use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A rotation slot, i.e. the rotational role of a player.
///
/// The numbering follows the usual rotation order, starting with the server's
/// position in the right back and continuing counter-clockwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Slot {
    RightBack = 1,
    RightFront = 2,
    MiddleFront = 3,
    LeftFront = 4,
    LeftBack = 5,
    MiddleBack = 6,
}

/// The row of a [slot](Slot).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Row {
    /// Closer to the net.
    Front,
    Back,
}

/// The column of a [slot](Slot), seen from the team's own side facing the net.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Left,
    Middle,
    Right,
}

pub static ALL_SLOTS: [Slot; 6] = [
    Slot::RightBack,
    Slot::RightFront,
    Slot::MiddleFront,
    Slot::LeftFront,
    Slot::LeftBack,
    Slot::MiddleBack,
];

// The tables below are indexed by `slot.index()`, i.e. in the order of ALL_SLOTS.

const ROWS: [Row; 6] = [Row::Back, Row::Front, Row::Front, Row::Front, Row::Back, Row::Back];

const COLUMNS: [Column; 6] = [
    Column::Right,
    Column::Right,
    Column::Middle,
    Column::Left,
    Column::Left,
    Column::Middle,
];

const COUNTERPARTS: [Slot; 6] = [
    Slot::RightFront,
    Slot::RightBack,
    Slot::MiddleBack,
    Slot::LeftBack,
    Slot::LeftFront,
    Slot::MiddleFront,
];

const LEFT_IN_ROW: [Option<Slot>; 6] = [
    Some(Slot::MiddleBack),
    Some(Slot::MiddleFront),
    Some(Slot::LeftFront),
    None,
    None,
    Some(Slot::LeftBack),
];

const RIGHT_IN_ROW: [Option<Slot>; 6] = [
    None,
    None,
    Some(Slot::RightFront),
    Some(Slot::MiddleFront),
    Some(Slot::MiddleBack),
    Some(Slot::RightBack),
];

/// The slots whose positions constrain a slot: its row neighbors and its counterpart.
const DEPENDENCIES: [&[Slot]; 6] = [
    &[Slot::MiddleBack, Slot::RightFront],
    &[Slot::MiddleFront, Slot::RightBack],
    &[Slot::LeftFront, Slot::RightFront, Slot::MiddleBack],
    &[Slot::MiddleFront, Slot::LeftBack],
    &[Slot::MiddleBack, Slot::LeftFront],
    &[Slot::LeftBack, Slot::RightBack, Slot::MiddleFront],
];

const FRONT_ROW: [Slot; 3] = [Slot::LeftFront, Slot::MiddleFront, Slot::RightFront];
const BACK_ROW: [Slot; 3] = [Slot::LeftBack, Slot::MiddleBack, Slot::RightBack];

impl Slot {
    /// The slot number, 1 to 6.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Zero-based index, for lookup tables.
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn row(self) -> Row {
        ROWS[self.index()]
    }

    pub fn column(self) -> Column {
        COLUMNS[self.index()]
    }

    pub fn is_front_row(self) -> bool {
        self.row() == Row::Front
    }

    /// The slot in the same column of the other row (4↔5, 3↔6, 2↔1).
    pub fn counterpart(self) -> Slot {
        COUNTERPARTS[self.index()]
    }

    /// The left-hand neighbor in the row. The leftmost slot wraps around to the rightmost.
    pub fn left_neighbor(self) -> Slot {
        self.left_in_row().unwrap_or_else(|| self.row().slots()[2])
    }

    /// The right-hand neighbor in the row. The rightmost slot wraps around to the leftmost.
    pub fn right_neighbor(self) -> Slot {
        self.right_in_row().unwrap_or_else(|| self.row().slots()[0])
    }

    /// The adjacent slot to the left in the row, without wrapping around.
    pub fn left_in_row(self) -> Option<Slot> {
        LEFT_IN_ROW[self.index()]
    }

    /// The adjacent slot to the right in the row, without wrapping around.
    pub fn right_in_row(self) -> Option<Slot> {
        RIGHT_IN_ROW[self.index()]
    }

    /// All slots whose positions narrow down where this slot may stand.
    pub fn dependencies(self) -> &'static [Slot] {
        DEPENDENCIES[self.index()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::RightBack => "Right Back",
            Slot::RightFront => "Right Front",
            Slot::MiddleFront => "Middle Front",
            Slot::LeftFront => "Left Front",
            Slot::LeftBack => "Left Back",
            Slot::MiddleBack => "Middle Back",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Slot::RightBack => "RB",
            Slot::RightFront => "RF",
            Slot::MiddleFront => "MF",
            Slot::LeftFront => "LF",
            Slot::LeftBack => "LB",
            Slot::MiddleBack => "MB",
        }
    }
}

impl Row {
    /// The slots of this row, ordered from left to right.
    pub fn slots(self) -> &'static [Slot; 3] {
        match self {
            Row::Front => &FRONT_ROW,
            Row::Back => &BACK_ROW,
        }
    }

    pub fn contains(self, slot: Slot) -> bool {
        slot.row() == self
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.number())
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Row::Front => write!(f, "front row"),
            Row::Back => write!(f, "back row"),
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Left => write!(f, "left"),
            Column::Middle => write!(f, "middle"),
            Column::Right => write!(f, "right"),
        }
    }
}

/// The error type for converting numbers and labels into a [`Slot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidSlot {
    OutOfRange(u8),
    UnknownLabel(String),
}

impl std::error::Error for InvalidSlot {}

impl std::fmt::Display for InvalidSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSlot::OutOfRange(n) => {
                write!(f, "Rotation slot must be between 1 and 6, got {}", n)
            }
            InvalidSlot::UnknownLabel(s) => write!(f, "'{}' is not a rotation slot", s),
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = InvalidSlot;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1..=6 => Ok(ALL_SLOTS[n as usize - 1]),
            _ => Err(InvalidSlot::OutOfRange(n)),
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        slot.number()
    }
}

/// Accepts slot numbers ("4") as well as short labels ("LF", case-insensitive).
impl FromStr for Slot {
    type Err = InvalidSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<u8>() {
            return Slot::try_from(n);
        }
        ALL_SLOTS
            .iter()
            .copied()
            .find(|slot| slot.short_label().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidSlot::UnknownLabel(String::from(s)))
    }
}

/// A fixed-size table with at most one entry per slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotMap<T> {
    entries: [Option<T>; 6],
}

impl<T> Default for SlotMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Default::default(),
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.entries[slot.index()].as_ref()
    }

    /// Returns the previous entry, if any.
    pub fn insert(&mut self, slot: Slot, value: T) -> Option<T> {
        self.entries[slot.index()].replace(value)
    }

    pub fn remove(&mut self, slot: Slot) -> Option<T> {
        self.entries[slot.index()].take()
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.entries[slot.index()].is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates in slot number order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &T)> {
        ALL_SLOTS
            .iter()
            .zip(self.entries.iter())
            .filter_map(|(&slot, entry)| entry.as_ref().map(|value| (slot, value)))
    }
}

impl<T> FromIterator<(Slot, T)> for SlotMap<T> {
    fn from_iter<I: IntoIterator<Item = (Slot, T)>>(iter: I) -> Self {
        let mut map = SlotMap::new();
        for (slot, value) in iter {
            map.insert(slot, value);
        }
        map
    }
}
