//! Overlap rules for a volleyball team's six players on court.
//!
//! [`check_overlap()`] judges a full lineup, [`calculate_valid_bounds()`]
//! tells where a single player may move without breaking the rules, and
//! [`RulesEngine`] bundles both behind a cache for interactive use.
pub use bounds::*;
pub use cache::*;
pub use constraints::*;
pub use engine::*;
pub use explain::*;
pub use formation::*;
pub use overlap::*;
pub use player::*;
pub use slot::*;
pub use tolerance::*;
pub use transform::*;
pub use violation::*;

#[cfg(test)]
mod arbitrary;
mod bounds;
mod cache;
mod constraints;
mod engine;
mod explain;
mod formation;
mod overlap;
mod player;
mod slot;
mod tolerance;
mod transform;
mod violation;
