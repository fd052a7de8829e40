use serde::Serialize;

use crate::{Position, Slot, Tolerance, COURT_DEPTH, COURT_WIDTH, SERVICE_ZONE_DEPTH};

/// Why a player's movable area was narrowed down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "slot", rename_all = "snake_case")]
pub enum ConstraintReason {
    /// The server may stand anywhere on the court or in the service zone.
    ServerExempt,
    RightOf(Slot),
    LeftOf(Slot),
    InFrontOf(Slot),
    Behind(Slot),
    Conflicting,
}

impl std::fmt::Display for ConstraintReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintReason::ServerExempt => {
                write!(f, "Server is exempt from overlap rules")
            }
            ConstraintReason::RightOf(slot) => write!(f, "Must be right of {}", slot),
            ConstraintReason::LeftOf(slot) => write!(f, "Must be left of {}", slot),
            ConstraintReason::InFrontOf(slot) => write!(f, "Must be in front of {}", slot),
            ConstraintReason::Behind(slot) => write!(f, "Must be behind {}", slot),
            ConstraintReason::Conflicting => write!(f, "Conflicting constraints detected"),
        }
    }
}

/// The area in which a player may stand, in meters.
///
/// The bounds form an _inclusive_ range. They can be inverted
/// (`min_x > max_x`) when the other players are in an illegal formation;
/// in that case `reasons` contains [`ConstraintReason::Conflicting`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub is_constrained: bool,
    pub reasons: Vec<ConstraintReason>,
}

impl PositionBounds {
    /// The court without the service zone.
    pub fn court() -> Self {
        Self {
            min_x: 0.0,
            max_x: COURT_WIDTH,
            min_y: 0.0,
            max_y: COURT_DEPTH,
            is_constrained: false,
            reasons: Vec::new(),
        }
    }

    /// The court including the service zone.
    pub fn extended() -> Self {
        Self {
            max_y: SERVICE_ZONE_DEPTH,
            ..Self::court()
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn is_inverted(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Whether the point lies within the bounds, give or take the tolerance.
    pub fn contains(&self, position: Position, tolerance: Tolerance) -> bool {
        tolerance.is_within_range(position.x, self.min_x, self.max_x)
            && tolerance.is_within_range(position.y, self.min_y, self.max_y)
    }

    /// Clamps each coordinate into the bounds independently.
    pub fn clamp(&self, position: Position, tolerance: Tolerance) -> Position {
        Position {
            x: tolerance.clamp(position.x, self.min_x, self.max_x),
            y: tolerance.clamp(position.y, self.min_y, self.max_y),
        }
    }

    pub fn constrain(&mut self, reason: ConstraintReason) {
        self.reasons.push(reason);
        self.is_constrained = true;
    }
}
