use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};
use volley::{
    player_in_slot, CacheStats, Clock, OverlapResult, Player, Position, RulesEngine, Slot,
};

/// How far the pointer moves at most per step, in meters along each axis.
const MAX_STEP: f64 = 0.5;

#[derive(Debug, Serialize)]
pub struct DragReport {
    pub slot: Slot,
    pub steps: usize,
    /// Steps where the pointer left the valid area and had to be snapped.
    pub snapped_steps: usize,
    pub start: Position,
    pub dropped_at: Position,
    pub result: OverlapResult,
    pub cache: CacheStats,
}

/// Drags the player in `slot` along a random pointer path and drops them.
///
/// Every step asks the engine whether the pointer is on a valid spot and
/// snaps it otherwise, like a user interface would. The player stays at the
/// last snapped position, which is written into `lineup`.
pub fn simulate_drag<C: Clock>(
    engine: &mut RulesEngine<C>,
    lineup: &mut [Player],
    slot: Slot,
    steps: usize,
    rng: &mut StdRng,
) -> anyhow::Result<DragReport> {
    let Some(player) = player_in_slot(lineup, slot) else {
        anyhow::bail!("Nobody plays in {}", slot);
    };
    let start = player.position;
    debug!(slot = slot.number(), %start, steps, "Starting drag");

    let mut pointer = start;
    let mut held = start;
    let mut snapped_steps = 0;
    for step in 0..steps {
        pointer = Position::new(
            pointer.x + rng.gen_range(-MAX_STEP..=MAX_STEP),
            pointer.y + rng.gen_range(-MAX_STEP..=MAX_STEP),
        );
        held = if engine.is_valid_position(slot, pointer, lineup) {
            pointer
        } else {
            snapped_steps += 1;
            engine.snap_to_valid_position(slot, pointer, lineup)
        };
        trace!(step, %pointer, %held);
    }

    engine.move_player(lineup, slot, held);
    let result = engine.validate_lineup(lineup);
    Ok(DragReport {
        slot,
        steps,
        snapped_steps,
        start,
        dropped_at: held,
        result,
        cache: engine.cache_stats(),
    })
}
