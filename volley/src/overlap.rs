use serde::Serialize;
use tracing::debug;

use crate::{
    LineupDefect, Offender, Player, Position, Row, Slot, SlotMap, Tolerance, Violation, ALL_SLOTS,
};

/// The number of players on court for one team.
pub const LINEUP_SIZE: usize = 6;

/// The judgment on a lineup.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OverlapResult {
    pub is_legal: bool,
    pub violations: Vec<Violation>,
}

impl OverlapResult {
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self {
            is_legal: violations.is_empty(),
            violations,
        }
    }
}

/// Checks a lineup against the overlap rules.
///
/// First the lineup itself is validated: it needs six players, one per
/// slot, exactly one of them serving. If that fails, only those structural
/// violations are reported. Otherwise the rows must be in left-to-right
/// order and every front row player must be closer to the net than their
/// counterpart in the back row. The server is exempt: a row containing the
/// server is not checked for order, and neither is the server's
/// front/back pair.
///
/// ```
/// # use volley::{check_overlap, Player, Slot};
/// let lineup = [
///     Player::at(Slot::LeftFront, 4.5, 1.5),
///     Player::at(Slot::MiddleFront, 1.5, 1.5),
///     Player::at(Slot::RightFront, 7.0, 1.5),
///     Player::at(Slot::LeftBack, 1.5, 6.0),
///     Player::at(Slot::MiddleBack, 4.5, 6.0),
///     Player::at(Slot::RightBack, 7.5, 10.0).serving(),
/// ];
/// let result = check_overlap(&lineup);
/// assert!(!result.is_legal);
/// assert_eq!(result.violations[0].slots(), vec![Slot::LeftFront, Slot::MiddleFront]);
/// ```
pub fn check_overlap(lineup: &[Player]) -> OverlapResult {
    check_overlap_with(lineup, Tolerance::default())
}

/// Like [`check_overlap()`], with a custom tolerance.
pub fn check_overlap_with(lineup: &[Player], tolerance: Tolerance) -> OverlapResult {
    let structural = structural_violations(lineup);
    if !structural.is_empty() {
        debug!(
            violations = structural.len(),
            "Lineup is malformed, skipping geometric checks"
        );
        return OverlapResult::from_violations(structural);
    }

    let by_slot: SlotMap<&Player> = lineup.iter().map(|p| (p.slot, p)).collect();
    let mut violations = Vec::new();
    for row in [Row::Front, Row::Back] {
        check_row_order(row, &by_slot, tolerance, &mut violations);
    }
    for &front_slot in Row::Front.slots() {
        check_front_back(front_slot, &by_slot, tolerance, &mut violations);
    }
    OverlapResult::from_violations(violations)
}

/// Whether `slot` may stand at `candidate`, given the other players.
///
/// `others` may or may not contain an entry for `slot` itself; it is
/// replaced by the candidate. As long as the resulting lineup has fewer than
/// six players, every position counts as legal.
pub fn is_position_legal(
    slot: Slot,
    candidate: Position,
    others: &[Player],
    is_server: bool,
) -> bool {
    let mut moved = others
        .iter()
        .find(|p| p.slot == slot)
        .cloned()
        .unwrap_or_else(|| Player::at(slot, candidate.x, candidate.y));
    moved.position = candidate;
    moved.is_server = is_server;

    let mut lineup: Vec<Player> = others.iter().filter(|p| p.slot != slot).cloned().collect();
    lineup.push(moved);
    if lineup.len() < LINEUP_SIZE {
        return true;
    }
    check_overlap(&lineup).is_legal
}

fn structural_violations(lineup: &[Player]) -> Vec<Violation> {
    if lineup.len() != LINEUP_SIZE {
        return vec![Violation::InvalidLineup {
            defect: LineupDefect::WrongPlayerCount {
                count: lineup.len(),
            },
        }];
    }

    let mut violations = Vec::new();
    let mut counts = [0usize; LINEUP_SIZE];
    for player in lineup {
        counts[player.slot.index()] += 1;
    }
    for slot in ALL_SLOTS {
        let defect = match counts[slot.index()] {
            0 => LineupDefect::MissingSlot { slot },
            1 => continue,
            count => LineupDefect::DuplicateSlot { slot, count },
        };
        violations.push(Violation::InvalidLineup { defect });
    }

    let mut servers: Vec<Offender> = lineup
        .iter()
        .filter(|p| p.is_server)
        .map(Offender::from)
        .collect();
    servers.sort_by_key(|s| s.slot);
    match servers.len() {
        0 => violations.push(Violation::InvalidLineup {
            defect: LineupDefect::NoServer,
        }),
        1 => {}
        _ => violations.push(Violation::MultipleServers { servers }),
    }
    violations
}

// The whole row is skipped as soon as one of its players is serving, not just
// the pairs involving the server.
fn check_row_order(
    row: Row,
    by_slot: &SlotMap<&Player>,
    tolerance: Tolerance,
    violations: &mut Vec<Violation>,
) {
    let players: Vec<&Player> = row
        .slots()
        .iter()
        .filter_map(|&slot| by_slot.get(slot).copied())
        .collect();
    if players.iter().any(|p| p.is_server) {
        return;
    }
    for pair in players.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if !tolerance.is_ordered(left.position.x, right.position.x) {
            violations.push(Violation::RowOrder {
                row,
                left: Offender::from(left),
                right: Offender::from(right),
            });
        }
    }
}

fn check_front_back(
    front_slot: Slot,
    by_slot: &SlotMap<&Player>,
    tolerance: Tolerance,
    violations: &mut Vec<Violation>,
) {
    let (Some(&front), Some(&back)) = (
        by_slot.get(front_slot),
        by_slot.get(front_slot.counterpart()),
    ) else {
        return;
    };
    if front.is_server || back.is_server {
        return;
    }
    if !tolerance.is_ordered(front.position.y, back.position.y) {
        violations.push(Violation::FrontBack {
            front: Offender::from(front),
            back: Offender::from(back),
        });
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::{reference_lineup, with_position, LegalLineup};
    use crate::ViolationCode;

    quickcheck! {
        fn generated_legal_lineups_are_legal(input: LegalLineup) -> bool {
            check_overlap(&input.players).is_legal
        }

        fn structural_violations_short_circuit(input: LegalLineup) -> bool {
            let mut players = input.players;
            for p in players.iter_mut() {
                p.is_server = true;
            }
            // Scramble the geometry as well, it must not be looked at.
            players[0].position.x = f64::NAN;
            let result = check_overlap(&players);
            result.violations.len() == 1
                && result.violations[0].code() == ViolationCode::MultipleServers
        }
    }

    #[test]
    fn reference_formation_is_legal() {
        let result = check_overlap(&reference_lineup());
        assert!(result.is_legal);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn reversed_front_row_pair() {
        let mut lineup = reference_lineup();
        lineup = with_position(lineup, Slot::LeftFront, 4.5, 1.5);
        lineup = with_position(lineup, Slot::MiddleFront, 1.5, 1.0);
        lineup = with_position(lineup, Slot::RightFront, 7.0, 1.5);
        let result = check_overlap(&lineup);
        assert!(!result.is_legal);
        assert_eq!(result.violations.len(), 1);
        let violation = &result.violations[0];
        assert_eq!(violation.code(), ViolationCode::RowOrder);
        assert_eq!(violation.slots(), vec![Slot::LeftFront, Slot::MiddleFront]);
        assert_eq!(
            violation.coordinates(),
            Some((Position::new(4.5, 1.5), Position::new(1.5, 1.0)))
        );
    }

    #[test]
    fn two_servers() {
        let mut lineup = reference_lineup();
        lineup[0].is_server = true;
        let result = check_overlap(&lineup);
        assert_eq!(result.violations.len(), 1);
        let violation = &result.violations[0];
        assert_eq!(violation.code(), ViolationCode::MultipleServers);
        let mut slots = violation.slots();
        slots.sort();
        let mut expected = vec![lineup[0].slot, Slot::RightBack];
        expected.sort();
        assert_eq!(slots, expected);
    }

    #[test]
    fn no_server() {
        let mut lineup = reference_lineup();
        for p in lineup.iter_mut() {
            p.is_server = false;
        }
        let result = check_overlap(&lineup);
        assert_eq!(
            result.violations,
            vec![Violation::InvalidLineup {
                defect: LineupDefect::NoServer
            }]
        );
    }

    #[test]
    fn wrong_player_count() {
        let lineup = reference_lineup();
        let result = check_overlap(&lineup[..5]);
        assert_eq!(
            result.violations,
            vec![Violation::InvalidLineup {
                defect: LineupDefect::WrongPlayerCount { count: 5 }
            }]
        );
    }

    #[test]
    fn duplicate_slot() {
        let mut lineup = reference_lineup();
        let idx = lineup
            .iter()
            .position(|p| p.slot == Slot::MiddleBack)
            .unwrap();
        lineup[idx].slot = Slot::LeftBack;
        let result = check_overlap(&lineup);
        assert_eq!(
            result.violations,
            vec![
                Violation::InvalidLineup {
                    defect: LineupDefect::DuplicateSlot {
                        slot: Slot::LeftBack,
                        count: 2
                    }
                },
                Violation::InvalidLineup {
                    defect: LineupDefect::MissingSlot {
                        slot: Slot::MiddleBack
                    }
                },
            ]
        );
    }

    #[test]
    fn server_is_exempt_in_every_slot() {
        for server_slot in ALL_SLOTS {
            let mut lineup: Vec<Player> = reference_lineup()
                .into_iter()
                .map(|mut p| {
                    p.is_server = p.slot == server_slot;
                    p
                })
                .collect();
            // Put the server on the wrong side of its row and behind its counterpart.
            let x = if server_slot.column() == crate::Column::Left {
                8.5
            } else {
                0.5
            };
            lineup = with_position(lineup, server_slot, x, 10.0);
            let result = check_overlap(&lineup);
            assert!(
                result.is_legal,
                "server in {:?}: {:?}",
                server_slot, result.violations
            );
        }
    }

    #[test]
    fn server_exemption_covers_the_whole_row() {
        // The two non-serving back row players are swapped, but the row contains the server.
        let mut lineup = reference_lineup();
        lineup = with_position(lineup, Slot::LeftBack, 4.5, 6.5);
        lineup = with_position(lineup, Slot::MiddleBack, 1.5, 7.0);
        assert!(check_overlap(&lineup).is_legal);

        // The front row is still checked.
        lineup = with_position(lineup, Slot::RightFront, 4.0, 1.5);
        let result = check_overlap(&lineup);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].slots(),
            vec![Slot::MiddleFront, Slot::RightFront]
        );
    }

    #[test]
    fn front_back_violation() {
        let lineup = with_position(reference_lineup(), Slot::MiddleFront, 4.5, 7.5);
        let result = check_overlap(&lineup);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code(), ViolationCode::FrontBack);
        assert_eq!(
            result.violations[0].slots(),
            vec![Slot::MiddleFront, Slot::MiddleBack]
        );
    }

    #[test]
    fn tolerance_boundary() {
        let lineup = reference_lineup();
        let lf_x = 1.5;
        let at_boundary = with_position(lineup.clone(), Slot::MiddleFront, lf_x + 0.03, 1.0);
        assert!(check_overlap(&at_boundary).is_legal);

        let past_boundary = with_position(lineup, Slot::MiddleFront, lf_x + 0.03 - 0.031, 1.0);
        let result = check_overlap(&past_boundary);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code(), ViolationCode::RowOrder);
    }

    #[test]
    fn front_back_tolerance_boundary() {
        let lineup = reference_lineup();
        let mb_y = 7.0;
        let at_boundary = with_position(lineup.clone(), Slot::MiddleFront, 4.5, mb_y - 0.03);
        assert!(check_overlap(&at_boundary).is_legal);

        let past_boundary = with_position(lineup, Slot::MiddleFront, 4.5, mb_y - 0.03 + 0.031);
        let result = check_overlap(&past_boundary);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code(), ViolationCode::FrontBack);
        assert_eq!(
            result.violations[0].slots(),
            vec![Slot::MiddleFront, Slot::MiddleBack]
        );
    }

    #[test]
    fn back_row_tolerance_boundary() {
        // The right front serves, so the back row is checked.
        let mut lineup = with_position(reference_lineup(), Slot::RightBack, 7.5, 7.0);
        for player in lineup.iter_mut() {
            player.is_server = player.slot == Slot::RightFront;
        }
        assert!(check_overlap(&lineup).is_legal);

        let lb_x = 1.5;
        let at_boundary = with_position(lineup.clone(), Slot::MiddleBack, lb_x + 0.03, 7.0);
        assert!(check_overlap(&at_boundary).is_legal);

        let past_boundary = with_position(lineup, Slot::MiddleBack, lb_x + 0.03 - 0.031, 7.0);
        let result = check_overlap(&past_boundary);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0],
            Violation::RowOrder {
                row: Row::Back,
                left: Offender::from(&past_boundary[3]),
                right: Offender::from(&past_boundary[4]),
            }
        );
    }

    #[test]
    fn nan_coordinates_fail_the_rules() {
        let lineup = with_position(reference_lineup(), Slot::MiddleFront, f64::NAN, 1.0);
        let result = check_overlap(&lineup);
        assert!(!result.is_legal);
        assert!(result
            .violations
            .iter()
            .all(|v| v.code() == ViolationCode::RowOrder));
    }

    #[test]
    fn single_position_check() {
        let lineup = reference_lineup();
        let others: Vec<Player> = lineup
            .iter()
            .filter(|p| p.slot != Slot::LeftFront)
            .cloned()
            .collect();
        assert!(is_position_legal(
            Slot::LeftFront,
            Position::new(1.0, 1.0),
            &others,
            false
        ));
        assert!(!is_position_legal(
            Slot::LeftFront,
            Position::new(5.0, 1.0),
            &others,
            false
        ));
        // The full lineup may be passed as well, the slot's entry is replaced.
        assert!(!is_position_legal(
            Slot::LeftFront,
            Position::new(5.0, 1.0),
            &lineup,
            false
        ));
    }

    #[test]
    fn incomplete_lineup_defaults_to_legal() {
        let others = vec![Player::at(Slot::MiddleFront, 4.5, 1.0)];
        assert!(is_position_legal(
            Slot::LeftFront,
            Position::new(8.0, 8.0),
            &others,
            false
        ));
    }
}
