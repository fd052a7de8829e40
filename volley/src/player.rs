use serde::{Deserialize, Serialize};

use crate::{Slot, SlotMap};

/// Width of the court (sideline to sideline), in meters.
pub const COURT_WIDTH: f64 = 9.0;
/// Depth of one half of the court (net to endline), in meters.
pub const COURT_DEPTH: f64 = 9.0;
/// Depth including the service zone behind the endline.
pub const SERVICE_ZONE_DEPTH: f64 = 11.0;
/// Distance of the attack line from the net.
pub const ATTACK_LINE: f64 = 3.0;

/// A point on one half of the court, in meters.
///
/// `x` runs from the left sideline (0) to the right sideline (9), `y` from
/// the net (0) to the endline (9) and on into the service zone (up to 11).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// One player on the court.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Opaque identifier, not interpreted by the rules.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Free-form role tag, e.g. "setter" or "libero".
    #[serde(default)]
    pub role: String,
    pub slot: Slot,
    pub position: Position,
    #[serde(default)]
    pub is_server: bool,
}

impl Player {
    /// A player without identity, named after its slot.
    pub fn at(slot: Slot, x: f64, y: f64) -> Self {
        Self {
            id: slot.number().to_string(),
            name: String::from(slot.short_label()),
            role: String::new(),
            slot,
            position: Position::new(x, y),
            is_server: false,
        }
    }

    pub fn serving(mut self) -> Self {
        self.is_server = true;
        self
    }

    /// The name to show in messages. Falls back to the slot label.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.slot.short_label()
        } else {
            &self.name
        }
    }
}

/// The positions of a lineup, by slot. Later duplicates win.
pub fn positions_by_slot(lineup: &[Player]) -> SlotMap<Position> {
    lineup.iter().map(|p| (p.slot, p.position)).collect()
}

/// Finds the player in a slot.
pub fn player_in_slot(lineup: &[Player], slot: Slot) -> Option<&Player> {
    lineup.iter().find(|p| p.slot == slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_player_with_defaults() {
        let player: Player =
            serde_json::from_str(r#"{"slot": 4, "position": {"x": 1.5, "y": 2.0}}"#).unwrap();
        assert_eq!(player.slot, Slot::LeftFront);
        assert_eq!(player.position, Position::new(1.5, 2.0));
        assert!(!player.is_server);
        assert_eq!(player.display_name(), "LF");
    }

    #[test]
    fn position_display_rounds_to_centimeters() {
        assert_eq!(Position::new(1.0, 2.456).to_string(), "(1.00, 2.46)");
    }
}
