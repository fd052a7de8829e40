use serde::Serialize;

use crate::{LineupDefect, Position, Slot, SlotMap, Violation, ViolationCode, EPSILON};

/// Renders a violation as a sentence, including coordinates.
///
/// Coordinates are taken from `positions_by_slot` where available, and from
/// the violation itself otherwise.
pub fn explain_violation(violation: &Violation, positions_by_slot: &SlotMap<Position>) -> String {
    let at = |slot: Slot, recorded: Position| {
        positions_by_slot.get(slot).copied().unwrap_or(recorded)
    };
    match violation {
        Violation::RowOrder { row, left, right } => {
            let left_pos = at(left.slot, left.position);
            let right_pos = at(right.slot, right.position);
            format!(
                "{} is at x = {:.2} m, but must stay to the left of {} at x = {:.2} m in the {}.",
                left, left_pos.x, right, right_pos.x, row
            )
        }
        Violation::FrontBack { front, back } => {
            let front_pos = at(front.slot, front.position);
            let back_pos = at(back.slot, back.position);
            format!(
                "{} is at y = {:.2} m, but must be closer to the net than {} at y = {:.2} m.",
                front, front_pos.y, back, back_pos.y
            )
        }
        Violation::MultipleServers { servers } => {
            let list = servers
                .iter()
                .map(|s| format!("{} at {}", s, at(s.slot, s.position)))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Only one player can serve, but {} are marked as serving: {}.",
                servers.len(),
                list
            )
        }
        Violation::InvalidLineup { defect } => format!("The lineup cannot be checked. {}.", defect),
    }
}

/// A violation together with how far off the players are.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailedViolation {
    pub violation: Violation,
    /// Signed distance between the two players along the rule's axis, where
    /// positive means "in the right order".
    pub separation: Option<f64>,
    pub required_separation: f64,
    pub detail: String,
}

pub fn generate_detailed_violations(violations: &[Violation]) -> Vec<DetailedViolation> {
    violations
        .iter()
        .map(|violation| {
            let separation = match violation {
                Violation::RowOrder { left, right, .. } => Some(right.position.x - left.position.x),
                Violation::FrontBack { front, back } => Some(back.position.y - front.position.y),
                Violation::MultipleServers { .. } | Violation::InvalidLineup { .. } => None,
            };
            let detail = match separation {
                Some(sep) => format!(
                    "{}: current separation {:.2}m, minimum required {:.2}m",
                    violation, sep, EPSILON
                ),
                None => violation.to_string(),
            };
            DetailedViolation {
                violation: violation.clone(),
                separation,
                required_separation: EPSILON,
                detail,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Minor,
    Major,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::None => "none",
            Severity::Minor => "minor",
            Severity::Major => "major",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// Aggregate view of a list of violations.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ViolationSummary {
    pub total: usize,
    pub row_order: usize,
    pub front_back: usize,
    pub multiple_servers: usize,
    pub invalid_lineup: usize,
    /// Every slot involved in at least one violation, in slot order.
    pub slots: Vec<Slot>,
    pub severity: Severity,
}

impl ViolationSummary {
    pub fn count(&self, code: ViolationCode) -> usize {
        match code {
            ViolationCode::RowOrder => self.row_order,
            ViolationCode::FrontBack => self.front_back,
            ViolationCode::MultipleServers => self.multiple_servers,
            ViolationCode::InvalidLineup => self.invalid_lineup,
        }
    }
}

/// Structural problems are critical; otherwise one broken rule is minor, two
/// or three are major, and more than that is critical.
pub fn severity(violations: &[Violation]) -> Severity {
    if violations.iter().any(|v| v.code().is_structural()) {
        return Severity::Critical;
    }
    match violations.len() {
        0 => Severity::None,
        1 => Severity::Minor,
        2 | 3 => Severity::Major,
        _ => Severity::Critical,
    }
}

pub fn get_violation_summary(violations: &[Violation]) -> ViolationSummary {
    let mut summary = ViolationSummary {
        total: violations.len(),
        severity: severity(violations),
        ..ViolationSummary::default()
    };
    let mut involved = SlotMap::new();
    for violation in violations {
        match violation.code() {
            ViolationCode::RowOrder => summary.row_order += 1,
            ViolationCode::FrontBack => summary.front_back += 1,
            ViolationCode::MultipleServers => summary.multiple_servers += 1,
            ViolationCode::InvalidLineup => summary.invalid_lineup += 1,
        }
        for slot in violation.slots() {
            involved.insert(slot, ());
        }
    }
    summary.slots = involved.iter().map(|(slot, _)| slot).collect();
    summary
}

fn tip(violation: &Violation) -> String {
    match violation {
        Violation::RowOrder { left, right, .. } => format!(
            "Move {} further left or {} further right.",
            left.name, right.name
        ),
        Violation::FrontBack { front, back } => format!(
            "Move {} closer to the net or {} further back.",
            front.name, back.name
        ),
        Violation::MultipleServers { .. } => {
            String::from("Mark only the player in the service zone as the server.")
        }
        Violation::InvalidLineup { defect } => match defect {
            LineupDefect::WrongPlayerCount { .. } => {
                String::from("Put exactly six players on the court.")
            }
            LineupDefect::DuplicateSlot { .. } | LineupDefect::MissingSlot { .. } => {
                String::from("Assign each rotation slot from 1 to 6 to exactly one player.")
            }
            LineupDefect::NoServer => String::from("Mark one player as the server."),
        },
    }
}

/// Numbered messages with a tip for each violation, for showing to users.
pub fn generate_user_friendly_messages(violations: &[Violation]) -> Vec<String> {
    if violations.is_empty() {
        return vec![String::from("All players are in legal positions.")];
    }
    let mut messages = Vec::with_capacity(violations.len() + 1);
    let plural = if violations.len() == 1 { "" } else { "s" };
    messages.push(format!(
        "Found {} overlap problem{} ({}):",
        violations.len(),
        plural,
        severity(violations)
    ));
    for (idx, violation) in violations.iter().enumerate() {
        messages.push(format!("{}. {}. Tip: {}", idx + 1, violation, tip(violation)));
    }
    messages
}
