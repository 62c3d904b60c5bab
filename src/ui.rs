use crate::models::DerivedHabitView;

pub fn render_card(view: &DerivedHabitView) -> String {
    CARD_TEMPLATE
        .replace("{{ICON}}", &view.habit.icon)
        .replace("{{NAME}}", &view.habit.name)
        .replace("{{DATE}}", view.habit.complete_date.as_str())
        .replace("{{DAYS}}", &days_label(view.days_elapsed))
        .replace("{{STREAK}}", &view.habit.streak.to_string())
}

pub fn render_habits(views: &[DerivedHabitView]) -> String {
    if views.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    views.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

fn days_label(days: Option<i64>) -> String {
    let Some(days) = days else {
        return "unknown".to_string();
    };
    if days.abs() == 1 {
        format!("{days} day")
    } else {
        format!("{days} days")
    }
}

const EMPTY_MESSAGE: &str = "No habits yet. Add one with `habit_tracker add <name> <date> <icon>`.\n";

const CARD_TEMPLATE: &str = "[{{ICON}}-outline] {{NAME}}
  Stop Date: {{DATE}}
  Streak: {{DAYS}}
  Updates: {{STREAK}}
";
