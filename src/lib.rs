pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod streak;
pub mod ui;

pub use client::{HabitRemote, RemoteHabitClient};
pub use config::HabitConfig;
pub use controller::HabitStateController;
pub use errors::{HabitError, HabitResult, Operation};
pub use models::{DerivedHabitView, Habit, NewHabit};
pub use streak::{Clock, FixedClock, ReferenceDate, SystemClock, days_elapsed_at};
