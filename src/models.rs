use crate::errors::{HabitError, HabitResult};
use crate::streak::ReferenceDate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation payload for `POST /habits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(rename = "completeDate")]
    pub complete_date: ReferenceDate,
    #[serde(rename = "habitNameIcon")]
    pub icon: String,
}

impl NewHabit {
    /// Builds a habit from raw form input. Every field is trimmed and must be
    /// non-empty; the date must parse.
    pub fn new(name: &str, complete_date: &str, icon: &str) -> HabitResult<Self> {
        let name = required("name", name)?;
        let icon = required("icon", icon)?;
        let complete_date: ReferenceDate = required("complete date", complete_date)?.parse()?;
        Ok(Self {
            name,
            complete_date,
            icon,
        })
    }
}

fn required(field: &str, value: &str) -> HabitResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HabitError::invalid(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

/// A habit as listed by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub name: String,
    #[serde(rename = "completeDate")]
    pub complete_date: ReferenceDate,
    #[serde(rename = "habitNameIcon")]
    pub icon: String,
    pub streak: i64,
}

#[derive(Debug, Serialize)]
pub struct StreakUpdate<'a> {
    pub name: &'a str,
}

/// A listed habit plus elapsed days, computed for one render. Elapsed days
/// are `None` only when the server's date text was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedHabitView {
    #[serde(flatten)]
    pub habit: Habit,
    #[serde(rename = "daysElapsed")]
    pub days_elapsed: Option<i64>,
}

impl DerivedHabitView {
    pub fn at(habit: &Habit, now: DateTime<Utc>) -> Self {
        Self {
            days_elapsed: habit.complete_date.days_elapsed(now),
            habit: habit.clone(),
        }
    }
}

/// Derives views in list order.
pub fn derive_views(habits: &[Habit], now: DateTime<Utc>) -> Vec<DerivedHabitView> {
    habits
        .iter()
        .map(|habit| DerivedHabitView::at(habit, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_habit_trims_and_validates() {
        let habit = NewHabit::new("  Run ", " 2024-01-01", "walk ").unwrap();
        assert_eq!(habit.name, "Run");
        assert_eq!(habit.complete_date.as_str(), "2024-01-01");
        assert_eq!(habit.icon, "walk");

        assert!(matches!(
            NewHabit::new(" ", "2024-01-01", "walk"),
            Err(HabitError::InvalidHabit(_))
        ));
        assert!(NewHabit::new("Run", "", "walk").is_err());
        assert!(NewHabit::new("Run", "2024-01-01", "").is_err());
        assert!(NewHabit::new("Run", "soon", "walk").is_err());
    }

    #[test]
    fn new_habit_uses_wire_names() {
        let habit = NewHabit::new("Run", "2024-01-01", "walk").unwrap();
        let value = serde_json::to_value(&habit).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Run",
                "completeDate": "2024-01-01",
                "habitNameIcon": "walk"
            })
        );
    }

    #[test]
    fn habit_list_parses_and_derives_in_order() {
        let habits: Vec<Habit> = serde_json::from_str(
            r#"[
                {"name":"Run","completeDate":"2024-01-01","habitNameIcon":"walk","streak":4},
                {"name":"Read","completeDate":"2024-01-09","habitNameIcon":"book","streak":0}
            ]"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();

        let views = derive_views(&habits, now);
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].habit.name, "Run");
        assert_eq!(views[0].days_elapsed, Some(9));
        assert_eq!(views[0].habit.streak, 4);
        assert_eq!(views[1].habit.name, "Read");
        assert_eq!(views[1].days_elapsed, Some(1));
    }

    #[test]
    fn unrecognized_date_degrades_only_its_own_entry() {
        let habits: Vec<Habit> = serde_json::from_str(
            r#"[
                {"name":"Run","completeDate":"2024-01-01","habitNameIcon":"walk","streak":4},
                {"name":"Read","completeDate":"2024-01-09 08:00:00","habitNameIcon":"book","streak":1},
                {"name":"Swim","completeDate":"last spring","habitNameIcon":"water","streak":0}
            ]"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();

        let views = derive_views(&habits, now);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].days_elapsed, Some(9));
        assert_eq!(views[1].days_elapsed, Some(1));
        assert_eq!(views[2].habit.name, "Swim");
        assert_eq!(views[2].habit.complete_date.as_str(), "last spring");
        assert_eq!(views[2].days_elapsed, None);
        assert_eq!(serde_json::to_value(&views[2]).unwrap()["daysElapsed"], serde_json::Value::Null);
    }

    #[test]
    fn view_serializes_flat() {
        let habit: Habit = serde_json::from_value(serde_json::json!({
            "name": "Run",
            "completeDate": "2024-01-01",
            "habitNameIcon": "walk",
            "streak": 2
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        let value = serde_json::to_value(DerivedHabitView::at(&habit, now)).unwrap();
        assert_eq!(value["daysElapsed"], 3);
        assert_eq!(value["habitNameIcon"], "walk");
        assert_eq!(value["streak"], 2);
    }
}
