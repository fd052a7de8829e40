use tracing::debug;

use crate::{player_in_slot, ConstraintReason, Player, Position, PositionBounds, Slot, Tolerance};

/// Calculates the area where `slot` may stand, given the other players.
///
/// The server may go anywhere on the court and into the service zone. Everyone
/// else has to stay right of their left-hand row neighbor, left of their
/// right-hand row neighbor, and in front of (front row) or behind (back row)
/// their counterpart, each by at least the tolerance. Constraints coming from
/// a serving neighbor are ignored.
///
/// `others` may contain an entry for `slot` itself, it is not looked at.
pub fn calculate_valid_bounds(slot: Slot, others: &[Player], is_server: bool) -> PositionBounds {
    if is_server {
        let mut bounds = PositionBounds::extended();
        bounds.reasons.push(ConstraintReason::ServerExempt);
        return bounds;
    }

    let epsilon = Tolerance::default().epsilon;
    let not_serving = |s: Slot| player_in_slot(others, s).filter(|p| !p.is_server);
    let mut bounds = PositionBounds::court();

    if let Some(left) = slot.left_in_row().and_then(not_serving) {
        bounds.min_x = bounds.min_x.max(left.position.x + epsilon);
        bounds.constrain(ConstraintReason::RightOf(left.slot));
    }
    if let Some(right) = slot.right_in_row().and_then(not_serving) {
        bounds.max_x = bounds.max_x.min(right.position.x - epsilon);
        bounds.constrain(ConstraintReason::LeftOf(right.slot));
    }
    if let Some(counterpart) = not_serving(slot.counterpart()) {
        if slot.is_front_row() {
            bounds.max_y = bounds.max_y.min(counterpart.position.y - epsilon);
            bounds.constrain(ConstraintReason::InFrontOf(counterpart.slot));
        } else {
            bounds.min_y = bounds.min_y.max(counterpart.position.y + epsilon);
            bounds.constrain(ConstraintReason::Behind(counterpart.slot));
        }
    }

    if bounds.is_inverted() {
        debug!(slot = slot.number(), ?bounds, "Conflicting constraints");
        bounds.constrain(ConstraintReason::Conflicting);
    }
    bounds
}

/// Whether `position` lies within the valid bounds of `slot` and on the court
/// (or in the service zone, for the server).
///
/// The bounds already keep the tolerance away from every neighbor, so they
/// are checked exactly. A valid position never breaks the overlap rules.
pub fn is_position_valid(
    slot: Slot,
    position: Position,
    others: &[Player],
    is_server: bool,
) -> bool {
    let bounds = calculate_valid_bounds(slot, others, is_server);
    is_within_bounds(&bounds, position, is_server)
}

/// Moves `target` into the valid bounds of `slot`, one axis at a time.
///
/// Valid positions are returned unchanged.
pub fn snap_to_valid_position(
    slot: Slot,
    target: Position,
    others: &[Player],
    is_server: bool,
) -> Position {
    let bounds = calculate_valid_bounds(slot, others, is_server);
    snap_into_bounds(&bounds, target)
}

const EXACT: Tolerance = Tolerance::new(0.0);

pub(crate) fn is_within_bounds(
    bounds: &PositionBounds,
    position: Position,
    is_server: bool,
) -> bool {
    let absolute = if is_server {
        PositionBounds::extended()
    } else {
        PositionBounds::court()
    };
    absolute.contains(position, EXACT) && bounds.contains(position, EXACT)
}

pub(crate) fn snap_into_bounds(bounds: &PositionBounds, target: Position) -> Position {
    if bounds.contains(target, EXACT) {
        // The bounds never reach outside the court, so this is enough.
        return target;
    }
    bounds.clamp(target, EXACT)
}
