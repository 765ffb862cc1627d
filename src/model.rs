use serde::{Deserialize, Serialize};

/// Cooking time (minutes) that signals "leftovers from an earlier day"
/// instead of a new recipe.
pub const LEFTOVERS_MINUTES: u32 = 10;

/// One weekday's preferences collected by the wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub eaters: Vec<String>,
    pub cooking_time: u32,
    #[serde(default)]
    pub no_meal: bool,
}

impl DayPlan {
    pub fn new(day: impl Into<String>, eaters: Vec<String>, cooking_time: u32) -> Self {
        DayPlan {
            day: day.into(),
            eaters,
            cooking_time,
            no_meal: false,
        }
    }

    /// Add or remove an eater, preserving order and rejecting duplicates.
    pub fn toggle_eater(&mut self, name: &str) {
        if let Some(pos) = self.eaters.iter().position(|e| e == name) {
            self.eaters.remove(pos);
        } else {
            self.eaters.push(name.to_string());
        }
    }

    pub fn is_leftovers(&self) -> bool {
        self.cooking_time <= LEFTOVERS_MINUTES
    }
}

/// Snapshot of the whole week's answers, taken once at form submission.
/// Revision requests reuse the same snapshot plus new feedback text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyData {
    #[serde(default)]
    pub feedback: String,
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub available_ingredients: String,
    #[serde(default)]
    pub requested_ingredients: String,
    #[serde(default)]
    pub other_requests: String,
    #[serde(default)]
    pub pasted_history: String,
}

/// The three free-text documents the prompt draws on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentData {
    pub requirements: String,
    pub nutrition_info: String,
    pub history: String,
}
