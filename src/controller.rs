//! Session-local habit state.
//!
//! The held list is only ever replaced by the result of a successful list
//! call. Every mutation is followed by a full reload, and the presentation
//! callback sees each stored list exactly once, in server order.
//!
//! Overlapping operations are not ordered unless single-flight mode is on:
//! the list stored last is whichever reload finished last.

use crate::client::HabitRemote;
use crate::errors::HabitResult;
use crate::models::{DerivedHabitView, Habit, NewHabit, derive_views};
use crate::streak::{Clock, SystemClock};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

pub type Presenter = Box<dyn Fn(&[DerivedHabitView]) + Send + Sync>;

pub struct HabitStateController<R> {
    remote: R,
    clock: Arc<dyn Clock>,
    habits: Mutex<Vec<Habit>>,
    flight: Option<Mutex<()>>,
    presenter: Presenter,
}

impl<R: HabitRemote> HabitStateController<R> {
    pub fn new<F>(remote: R, presenter: F) -> Self
    where
        F: Fn(&[DerivedHabitView]) + Send + Sync + 'static,
    {
        Self {
            remote,
            clock: Arc::new(SystemClock),
            habits: Mutex::new(Vec::new()),
            flight: None,
            presenter: Box::new(presenter),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// When enabled, each public operation runs to completion before the next starts.
    pub fn serialized(mut self, enabled: bool) -> Self {
        self.flight = enabled.then(|| Mutex::new(()));
        self
    }

    pub async fn add(&self, habit: &NewHabit) -> HabitResult<()> {
        let _flight = self.begin().await;
        self.remote.create_habit(habit).await.inspect_err(|err| {
            warn!(name = %habit.name, "add failed: {err}");
        })?;
        info!(name = %habit.name, "habit created");
        self.reload().await
    }

    pub async fn refresh(&self) -> HabitResult<()> {
        let _flight = self.begin().await;
        self.reload().await
    }

    pub async fn update_streak(&self, name: &str) -> HabitResult<()> {
        let _flight = self.begin().await;
        self.remote.update_streak(name).await.inspect_err(|err| {
            warn!(name, "streak update failed: {err}");
        })?;
        info!(name, "streak updated");
        self.reload().await
    }

    /// Snapshot of the list from the last successful reload.
    pub async fn habits(&self) -> Vec<Habit> {
        self.habits.lock().await.clone()
    }

    /// Derives views from the held list against the clock, without a network call.
    pub async fn views(&self) -> Vec<DerivedHabitView> {
        let habits = self.habits.lock().await;
        derive_views(&habits, self.clock.now())
    }

    async fn begin(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.flight {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    async fn reload(&self) -> HabitResult<()> {
        let fetched = self.remote.list_habits().await.inspect_err(|err| {
            warn!("refresh failed, keeping current list: {err}");
        })?;

        let mut habits = self.habits.lock().await;
        *habits = fetched;
        let views = derive_views(&habits, self.clock.now());
        info!(count = views.len(), "habits refreshed");
        (self.presenter)(&views);
        Ok(())
    }
}
