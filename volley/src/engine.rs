use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cache::{CacheConfig, CacheStats, Clock, PerformanceCache, SystemClock};
use crate::constraints::{is_within_bounds, snap_into_bounds};
use crate::{player_in_slot, OverlapResult, Player, Position, PositionBounds, Slot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
}

/// The entry point for user interfaces.
///
/// Wraps the rules in a [`PerformanceCache`], so that the same questions
/// asked over and over during a drag gesture are answered cheaply. All
/// queries take the full lineup; the player in `slot` is the one being moved.
pub struct RulesEngine<C: Clock = SystemClock> {
    cache: PerformanceCache<C>,
}

impl RulesEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            cache: PerformanceCache::new(config.cache),
        }
    }
}

impl Default for RulesEngine<SystemClock> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<C: Clock> RulesEngine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        Self {
            cache: PerformanceCache::with_clock(config.cache, clock),
        }
    }

    pub fn validate_lineup(&mut self, lineup: &[Player]) -> OverlapResult {
        self.cache.validate(lineup)
    }

    /// The area the player in `slot` may be dragged to.
    ///
    /// A slot missing from the lineup is treated as a non-server.
    pub fn get_player_constraints(&mut self, slot: Slot, lineup: &[Player]) -> PositionBounds {
        let is_server = is_serving(lineup, slot);
        self.cache.constraints(slot, lineup, is_server)
    }

    pub fn is_valid_position(&mut self, slot: Slot, point: Position, lineup: &[Player]) -> bool {
        let is_server = is_serving(lineup, slot);
        let bounds = self.cache.constraints(slot, lineup, is_server);
        is_within_bounds(&bounds, point, is_server)
    }

    pub fn snap_to_valid_position(
        &mut self,
        slot: Slot,
        point: Position,
        lineup: &[Player],
    ) -> Position {
        let is_server = is_serving(lineup, slot);
        let bounds = self.cache.constraints(slot, lineup, is_server);
        snap_into_bounds(&bounds, point)
    }

    /// Moves the player in `slot` and drops the cache entries that depended on
    /// their old position. Returns `false` if nobody is in that slot.
    pub fn move_player(&mut self, lineup: &mut [Player], slot: Slot, to: Position) -> bool {
        let Some(player) = lineup.iter_mut().find(|p| p.slot == slot) else {
            return false;
        };
        trace!(slot = slot.number(), x = to.x, y = to.y, "Moving player");
        player.position = to;
        self.cache.invalidate_slot(slot);
        true
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }
}

fn is_serving(lineup: &[Player], slot: Slot) -> bool {
    player_in_slot(lineup, slot).map_or(false, |p| p.is_server)
}
