use serde::Serialize;

use crate::{Player, Position, Row, Slot};

/// A player involved in a violation, as seen at the time of the check.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Offender {
    pub slot: Slot,
    pub name: String,
    pub position: Position,
}

impl From<&Player> for Offender {
    fn from(player: &Player) -> Self {
        Self {
            slot: player.slot,
            name: String::from(player.display_name()),
            position: player.position,
        }
    }
}

impl std::fmt::Display for Offender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.slot.label(), self.slot.number())
    }
}

/// Why a lineup could not be checked at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineupDefect {
    WrongPlayerCount { count: usize },
    DuplicateSlot { slot: Slot, count: usize },
    MissingSlot { slot: Slot },
    NoServer,
}

impl std::fmt::Display for LineupDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineupDefect::WrongPlayerCount { count } => {
                write!(f, "A lineup needs exactly 6 players, but {} were given", count)
            }
            LineupDefect::DuplicateSlot { slot, count } => {
                write!(f, "Slot {} is taken by {} players", slot, count)
            }
            LineupDefect::MissingSlot { slot } => write!(f, "Nobody is in slot {}", slot),
            LineupDefect::NoServer => write!(f, "No player is marked as the server"),
        }
    }
}

/// A broken overlap rule, or a reason why the rules could not be applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    /// Two adjacent players of a row are not in left-to-right order.
    RowOrder {
        row: Row,
        left: Offender,
        right: Offender,
    },
    /// A front row player is not closer to the net than their back row counterpart.
    FrontBack { front: Offender, back: Offender },
    MultipleServers { servers: Vec<Offender> },
    InvalidLineup { defect: LineupDefect },
}

/// The kind of a [`Violation`], without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    RowOrder,
    FrontBack,
    MultipleServers,
    InvalidLineup,
}

impl ViolationCode {
    /// Structural problems make the whole lineup unusable, not just one pair of players.
    pub fn is_structural(self) -> bool {
        matches!(self, ViolationCode::MultipleServers | ViolationCode::InvalidLineup)
    }
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ViolationCode::RowOrder => "ROW_ORDER",
            ViolationCode::FrontBack => "FRONT_BACK",
            ViolationCode::MultipleServers => "MULTIPLE_SERVERS",
            ViolationCode::InvalidLineup => "INVALID_LINEUP",
        };
        f.write_str(code)
    }
}

impl Violation {
    pub fn code(&self) -> ViolationCode {
        match self {
            Violation::RowOrder { .. } => ViolationCode::RowOrder,
            Violation::FrontBack { .. } => ViolationCode::FrontBack,
            Violation::MultipleServers { .. } => ViolationCode::MultipleServers,
            Violation::InvalidLineup { .. } => ViolationCode::InvalidLineup,
        }
    }

    /// The slots involved.
    pub fn slots(&self) -> Vec<Slot> {
        match self {
            Violation::RowOrder { left, right, .. } => vec![left.slot, right.slot],
            Violation::FrontBack { front, back } => vec![front.slot, back.slot],
            Violation::MultipleServers { servers } => servers.iter().map(|s| s.slot).collect(),
            Violation::InvalidLineup { defect } => match defect {
                LineupDefect::DuplicateSlot { slot, .. } | LineupDefect::MissingSlot { slot } => {
                    vec![*slot]
                }
                LineupDefect::WrongPlayerCount { .. } | LineupDefect::NoServer => Vec::new(),
            },
        }
    }

    /// The positions of the two players of a pairwise violation.
    pub fn coordinates(&self) -> Option<(Position, Position)> {
        match self {
            Violation::RowOrder { left, right, .. } => Some((left.position, right.position)),
            Violation::FrontBack { front, back } => Some((front.position, back.position)),
            Violation::MultipleServers { .. } | Violation::InvalidLineup { .. } => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::RowOrder { row, left, right } => {
                write!(f, "{} must be to the left of {} in the {}", left, right, row)
            }
            Violation::FrontBack { front, back } => {
                write!(f, "{} must be closer to the net than {}", front, back)
            }
            Violation::MultipleServers { servers } => {
                write!(f, "Only one player may serve, but {} are serving: ", servers.len())?;
                for (idx, server) in servers.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", server)?;
                }
                Ok(())
            }
            Violation::InvalidLineup { defect } => write!(f, "Invalid lineup: {}", defect),
        }
    }
}
