//! Sheet layout builders.
//!
//! This module handles:
//! - Month facts from the Gregorian calendar
//! - The calendar grid, legend block and highlight rules
//! - The static instructions sheet
//! - The tracker sheet that counts legend values

mod calendar;
mod dates;
mod instructions;
mod tracker;

pub use calendar::{layout_calendar, CalendarLayout, CalendarSpec, CALENDAR_SHEET_NAME};
pub use dates::{month_facts, month_title, MonthFacts, MONTH_NAMES, WEEKDAY_NAMES};
pub use instructions::{layout_instructions, INSTRUCTIONS_SHEET_NAME};
pub use tracker::{layout_tracker, TRACKER_SHEET_NAME};
