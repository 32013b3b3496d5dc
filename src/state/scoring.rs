//! Score rules.
//!
//! Gains pay twice what regressions cost. Finishing a level pays a bonus that
//! grows with the level.

/// Points per position gained by a move.
pub const REWARD_PER_POSITION: i32 = 10;

/// Points lost per position given up by a move.
pub const PENALTY_PER_POSITION: i32 = 5;

/// Completion bonus at level 0.
pub const LEVEL_BONUS_BASE: i32 = 200;

/// Extra completion bonus per level.
pub const LEVEL_BONUS_STEP: i32 = 100;

/// Score delta for a move that took the correct count from `old_correct` to
/// `new_correct`.
pub fn evaluate_move(old_correct: usize, new_correct: usize) -> i32 {
    let change = new_correct as i32 - old_correct as i32;
    if change > 0 {
        change * REWARD_PER_POSITION
    } else if change < 0 {
        change * PENALTY_PER_POSITION
    } else {
        0
    }
}

/// Bonus for completing `level`.
pub fn evaluate_level_bonus(level: u32) -> i32 {
    LEVEL_BONUS_BASE + level as i32 * LEVEL_BONUS_STEP
}
