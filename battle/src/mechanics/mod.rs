//! Combat mechanics: status ticks, damage, capture, experience

pub mod capture;
pub mod damage;
pub mod experience;
pub mod status_tick;

pub use capture::{attempt_capture, CaptureAttempt};
pub use damage::{compute_damage, DamageOutcome};
pub use experience::{
    distribute_experience, experience_threshold, level_from_experience, ExperienceGain,
};
pub use status_tick::{start_of_turn_tick, StatusTick};
