use quickcheck::{Arbitrary, Gen};

use crate::{Player, Position, Row, Slot, ALL_SLOTS};

/// A serving formation: front row close to the net, server in the service zone.
///
/// Listed front row first, left to right, then the back row.
pub fn reference_lineup() -> Vec<Player> {
    let named = |slot: Slot, name: &str, x: f64, y: f64| Player {
        id: format!("p{}", slot as u8),
        name: String::from(name),
        role: String::new(),
        ..Player::at(slot, x, y)
    };
    vec![
        named(Slot::LeftFront, "Ana", 1.5, 1.5),
        named(Slot::MiddleFront, "Bea", 4.5, 1.0),
        named(Slot::RightFront, "Cleo", 7.5, 1.5),
        named(Slot::LeftBack, "Dana", 1.5, 6.5),
        named(Slot::MiddleBack, "Eve", 4.5, 7.0),
        named(Slot::RightBack, "Fay", 7.5, 10.0).serving(),
    ]
}

pub fn with_position(mut lineup: Vec<Player>, slot: Slot, x: f64, y: f64) -> Vec<Player> {
    for player in lineup.iter_mut().filter(|p| p.slot == slot) {
        player.position = Position::new(x, y);
    }
    lineup
}

/// A uniformly random number in `[min, max]`, in centimeter steps.
pub fn coordinate(g: &mut Gen, min: f64, max: f64) -> f64 {
    let steps = ((max - min) * 100.0).round() as u32;
    min + (u32::arbitrary(g) % (steps + 1)) as f64 / 100.0
}

impl Arbitrary for Slot {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&ALL_SLOTS).unwrap()
    }
}

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        Position::new(coordinate(g, 0.0, 9.0), coordinate(g, 0.0, 9.0))
    }
}

/// A legal lineup with one random server.
///
/// The three columns are kept at least 0.2 m apart and the front row stays
/// in front of y = 4, the back row behind y = 4.5.
#[derive(Clone, Debug)]
pub struct LegalLineup {
    pub players: Vec<Player>,
}

impl Arbitrary for LegalLineup {
    fn arbitrary(g: &mut Gen) -> Self {
        let server = Slot::arbitrary(g);
        let mut players = Vec::with_capacity(6);
        for row in [Row::Front, Row::Back] {
            let xs = [
                coordinate(g, 0.0, 2.8),
                coordinate(g, 3.0, 5.8),
                coordinate(g, 6.0, 9.0),
            ];
            for (&slot, x) in row.slots().iter().zip(xs) {
                let y = match row {
                    Row::Front => coordinate(g, 0.0, 4.0),
                    Row::Back => coordinate(g, 4.5, 9.0),
                };
                let mut player = Player::at(slot, x, y);
                player.is_server = slot == server;
                players.push(player);
            }
        }
        LegalLineup { players }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        quickcheck::empty_shrinker()
    }
}
