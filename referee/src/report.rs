use serde::Serialize;
use volley::{
    describe_pattern, explain_violation, generate_detailed_violations,
    generate_user_friendly_messages, get_violation_summary, positions_by_slot, OverlapResult,
    Player, Position, PositionBounds, Slot, ViolationSummary,
};

/// Everything `check` knows about one lineup, for JSON output.
#[derive(Serialize)]
pub struct CheckReport<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub result: &'a OverlapResult,
    pub summary: ViolationSummary,
    pub formation: String,
}

impl<'a> CheckReport<'a> {
    pub fn new(name: &'a str, lineup: &[Player], result: &'a OverlapResult) -> Self {
        Self {
            name,
            result,
            summary: get_violation_summary(&result.violations),
            formation: describe_pattern(lineup),
        }
    }
}

pub fn render_check(name: &str, lineup: &[Player], result: &OverlapResult) -> String {
    let verdict = if result.is_legal { "legal" } else { "ILLEGAL" };
    let mut lines = vec![
        format!("{}: {}", name, verdict),
        format!("  {}", describe_pattern(lineup)),
    ];
    for message in generate_user_friendly_messages(&result.violations) {
        lines.push(format!("  {}", message));
    }
    if !result.is_legal {
        let positions = positions_by_slot(lineup);
        let detailed = generate_detailed_violations(&result.violations);
        for (violation, detailed) in result.violations.iter().zip(detailed) {
            lines.push(format!("  - {}", explain_violation(violation, &positions)));
            if detailed.separation.is_some() {
                lines.push(format!("    {}", detailed.detail));
            }
        }
    }
    lines.join("\n") + "\n"
}

pub fn render_bounds(slot: Slot, bounds: &PositionBounds) -> String {
    let mut lines = vec![format!(
        "{}: x in [{:.2}, {:.2}], y in [{:.2}, {:.2}]",
        slot, bounds.min_x, bounds.max_x, bounds.min_y, bounds.max_y
    )];
    if !bounds.is_constrained {
        lines.push(String::from("  Unconstrained"));
    }
    for reason in &bounds.reasons {
        lines.push(format!("  {}", reason));
    }
    lines.join("\n") + "\n"
}

pub fn render_snap(slot: Slot, target: Position, snapped: Position, was_valid: bool) -> String {
    if was_valid {
        format!("{}: {} is valid\n", slot, target)
    } else {
        format!("{}: {} is not valid, snapped to {}\n", slot, target, snapped)
    }
}

#[cfg(test)]
mod tests {
    use volley::{calculate_valid_bounds, check_overlap};

    use super::*;
    use crate::lineup_file::sample_lineup;

    fn lineup() -> Vec<Player> {
        sample_lineup("base_rotation.json").unwrap().players
    }

    #[test]
    fn legal_lineup_report() {
        let lineup = lineup();
        let text = render_check("base", &lineup, &check_overlap(&lineup));
        assert!(text.starts_with("base: legal\n"));
        assert!(text.contains("All players are in legal positions."));
        assert!(!text.contains("  - "));
    }

    #[test]
    fn illegal_lineup_report() {
        let mut lineup = lineup();
        lineup[0].position.x = 5.0;
        let result = check_overlap(&lineup);
        let text = render_check("swapped", &lineup, &result);
        assert!(text.starts_with("swapped: ILLEGAL\n"));
        assert!(text.contains("Found 1 overlap problem (minor):"));
        assert!(text.contains("minimum required 0.03m"));

        let json = serde_json::to_value(CheckReport::new("swapped", &lineup, &result)).unwrap();
        assert_eq!(json["is_legal"], false);
        assert_eq!(json["violations"][0]["code"], "ROW_ORDER");
        assert_eq!(json["summary"]["total"], 1);
    }

    #[test]
    fn bounds_report_lists_reasons() {
        let lineup = lineup();
        let text = render_bounds(
            Slot::MiddleFront,
            &calculate_valid_bounds(Slot::MiddleFront, &lineup, false),
        );
        assert!(text.starts_with("Middle Front (3): x in [1.53, 7.47]"));
        assert!(text.contains("Must be right of Left Front (4)"));
    }
}
