use crate::config::{HabitConfig, normalize_api_url};
use crate::errors::{HabitError, HabitResult, Operation};
use crate::models::{Habit, NewHabit, StreakUpdate};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// The remote habit collection as the controller sees it.
#[async_trait]
pub trait HabitRemote: Send + Sync {
    async fn create_habit(&self, habit: &NewHabit) -> HabitResult<()>;
    async fn list_habits(&self) -> HabitResult<Vec<Habit>>;
    async fn update_streak(&self, name: &str) -> HabitResult<()>;
}

#[async_trait]
impl<T> HabitRemote for Arc<T>
where
    T: HabitRemote + ?Sized,
{
    async fn create_habit(&self, habit: &NewHabit) -> HabitResult<()> {
        (**self).create_habit(habit).await
    }

    async fn list_habits(&self) -> HabitResult<Vec<Habit>> {
        (**self).list_habits().await
    }

    async fn update_streak(&self, name: &str) -> HabitResult<()> {
        (**self).update_streak(name).await
    }
}

/// HTTP client for `<base>/habits`. One round trip per call; no retries.
#[derive(Debug, Clone)]
pub struct RemoteHabitClient {
    http: Client,
    base_url: String,
}

impl RemoteHabitClient {
    pub fn new(base_url: &str) -> HabitResult<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_api_url(base_url)?,
        })
    }

    pub fn from_config(config: &HabitConfig) -> HabitResult<Self> {
        Self::new(&config.api_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn habits_url(&self) -> String {
        format!("{}/habits", self.base_url)
    }
}

#[async_trait]
impl HabitRemote for RemoteHabitClient {
    async fn create_habit(&self, habit: &NewHabit) -> HabitResult<()> {
        debug!(name = %habit.name, "creating habit");
        let response = self
            .http
            .post(self.habits_url())
            .json(habit)
            .send()
            .await
            .map_err(|err| transport_error(Operation::Create, err))?;
        ensure_success(Operation::Create, response)?;
        Ok(())
    }

    async fn list_habits(&self) -> HabitResult<Vec<Habit>> {
        debug!("listing habits");
        let response = self
            .http
            .get(self.habits_url())
            .send()
            .await
            .map_err(|err| transport_error(Operation::List, err))?;
        let body = ensure_success(Operation::List, response)?
            .bytes()
            .await
            .map_err(|err| transport_error(Operation::List, err))?;

        let habits: Vec<Habit> = serde_json::from_slice(&body).map_err(|source| {
            warn!("habit list payload rejected: {source}");
            HabitError::Decode {
                operation: Operation::List,
                source,
            }
        })?;
        for habit in habits.iter().filter(|habit| habit.complete_date.instant().is_none()) {
            warn!(name = %habit.name, date = %habit.complete_date, "unrecognized completeDate");
        }
        Ok(habits)
    }

    async fn update_streak(&self, name: &str) -> HabitResult<()> {
        debug!(name, "updating streak");
        let response = self
            .http
            .put(format!("{}/streak", self.habits_url()))
            .json(&StreakUpdate { name })
            .send()
            .await
            .map_err(|err| transport_error(Operation::Update, err))?;
        ensure_success(Operation::Update, response)?;
        Ok(())
    }
}

fn ensure_success(operation: Operation, response: Response) -> HabitResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    warn!(%operation, %status, "remote rejected habit request");
    Err(HabitError::remote(operation, format!("status {status}")))
}

fn transport_error(operation: Operation, err: reqwest::Error) -> HabitError {
    warn!(%operation, "habit request failed: {err}");
    HabitError::remote(operation, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_urls() {
        let client = RemoteHabitClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.habits_url(), "http://localhost:3000/habits");
    }

    #[test]
    fn rejects_invalid_base() {
        assert!(matches!(
            RemoteHabitClient::new("localhost"),
            Err(HabitError::Config(_))
        ));
    }
}
