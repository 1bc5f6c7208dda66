//! Domain definitions.

pub mod office;
pub mod rate;
pub mod schedule;

pub use self::{
    office::Office,
    rate::RatePair,
    schedule::{DaySchedule, WeekSchedule},
};
