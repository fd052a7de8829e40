use serde::Serialize;

use crate::{Column, Player, Position, Row, Slot, ATTACK_LINE, COURT_WIDTH};

/// The zone of the court a position falls into.
///
/// Rows are split at the attack line, columns are three equal strips.
pub fn classify_position(position: Position) -> (Row, Column) {
    let row = if position.y <= ATTACK_LINE {
        Row::Front
    } else {
        Row::Back
    };
    let third = COURT_WIDTH / 3.0;
    let column = if position.x < third {
        Column::Left
    } else if position.x < 2.0 * third {
        Column::Middle
    } else {
        Column::Right
    };
    (row, column)
}

/// How the players are arranged, independent of whether that is legal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FormationAnalysis {
    /// Front row slots sorted by their actual x coordinate, left to right.
    pub front_row_order: Vec<Slot>,
    pub back_row_order: Vec<Slot>,
    /// Slots standing between the net and the attack line.
    pub in_front_zone: Vec<Slot>,
    /// A column zone holding three or more players, if any.
    pub stacked: Option<Column>,
    /// Slots standing in a different column zone than their slot's column.
    pub out_of_column: Vec<Slot>,
    pub server: Option<Slot>,
}

impl FormationAnalysis {
    pub fn is_standard(&self) -> bool {
        self.out_of_column.is_empty() && self.stacked.is_none()
    }
}

fn actual_order(lineup: &[Player], row: Row) -> Vec<Slot> {
    let mut players: Vec<&Player> = lineup.iter().filter(|p| row.contains(p.slot)).collect();
    players.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    players.iter().map(|p| p.slot).collect()
}

pub fn analyze_formation(lineup: &[Player]) -> FormationAnalysis {
    let mut per_column = [0usize; 3];
    let mut in_front_zone = Vec::new();
    let mut out_of_column = Vec::new();
    for player in lineup {
        let (row, column) = classify_position(player.position);
        per_column[column as usize] += 1;
        if row == Row::Front {
            in_front_zone.push(player.slot);
        }
        if column != player.slot.column() {
            out_of_column.push(player.slot);
        }
    }
    in_front_zone.sort();
    out_of_column.sort();
    let stacked = [Column::Left, Column::Middle, Column::Right]
        .into_iter()
        .find(|&c| per_column[c as usize] >= 3);

    FormationAnalysis {
        front_row_order: actual_order(lineup, Row::Front),
        back_row_order: actual_order(lineup, Row::Back),
        in_front_zone,
        stacked,
        out_of_column,
        server: lineup.iter().find(|p| p.is_server).map(|p| p.slot),
    }
}

/// A one-paragraph description of the formation, for diagnostics.
pub fn describe_pattern(lineup: &[Player]) -> String {
    let analysis = analyze_formation(lineup);
    let labels = |slots: &[Slot]| {
        slots
            .iter()
            .map(|s| s.short_label())
            .collect::<Vec<_>>()
            .join(" ")
    };
    let mut description = format!(
        "Front row (left to right): {}. Back row (left to right): {}.",
        labels(&analysis.front_row_order),
        labels(&analysis.back_row_order)
    );
    if let Some(column) = analysis.stacked {
        description += &format!(" Stacked on the {} side.", column);
    }
    if analysis.is_standard() {
        description += " Standard base positions.";
    } else if !analysis.out_of_column.is_empty() {
        description += &format!(
            " Switched out of their column: {}.",
            labels(&analysis.out_of_column)
        );
    }
    match analysis.server {
        Some(slot) => description += &format!(" {} serves.", slot.short_label()),
        None => description += " Nobody serves.",
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::{reference_lineup, with_position};

    #[test]
    fn classify_zones() {
        assert_eq!(
            classify_position(Position::new(1.0, 1.0)),
            (Row::Front, Column::Left)
        );
        assert_eq!(
            classify_position(Position::new(4.5, 3.0)),
            (Row::Front, Column::Middle)
        );
        assert_eq!(
            classify_position(Position::new(8.0, 6.0)),
            (Row::Back, Column::Right)
        );
    }

    #[test]
    fn reference_formation_is_standard() {
        let analysis = analyze_formation(&reference_lineup());
        assert!(analysis.is_standard());
        assert_eq!(
            analysis.front_row_order,
            vec![Slot::LeftFront, Slot::MiddleFront, Slot::RightFront]
        );
        assert_eq!(analysis.server, Some(Slot::RightBack));
        assert_eq!(
            describe_pattern(&reference_lineup()),
            "Front row (left to right): LF MF RF. Back row (left to right): LB MB RB. \
             Standard base positions. RB serves."
        );
    }

    #[test]
    fn detects_a_stack() {
        let mut lineup = with_position(reference_lineup(), Slot::MiddleFront, 7.0, 1.0);
        lineup = with_position(lineup, Slot::MiddleBack, 6.5, 7.0);
        let analysis = analyze_formation(&lineup);
        assert_eq!(analysis.stacked, Some(Column::Right));
        assert_eq!(analysis.out_of_column, vec![Slot::MiddleFront, Slot::MiddleBack]);
        assert!(describe_pattern(&lineup).contains("Stacked on the right side."));
    }
}
