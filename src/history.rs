//! Folds an approved plan into the rolling history document, which keeps
//! one line per week and at most the 10 most recent weeks.

/// Week entries retained in the history document.
const MAX_HISTORY_WEEKS: usize = 10;

/// Week label from the plan's first level-1 heading, e.g. "Uge 36" out of
/// "# Uge 36 (31/8-4/9)".
pub fn week_label(plan: &str) -> Option<String> {
    let title = plan.lines().find_map(|l| l.strip_prefix("# "))?;
    let rest = title.strip_prefix("Uge ")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("Uge {}", digits))
}

/// Dish names from the meal-plan section: the text after the final colon
/// of each day line. Leftovers and no-plan days are not dishes.
pub fn extract_dishes(plan: &str) -> Vec<String> {
    let Some(body) = meal_plan_body(plan) else {
        return Vec::new();
    };

    body.iter()
        .filter_map(|line| line.rsplit_once(':').map(|(_, dish)| dish.trim()))
        .filter(|dish| {
            let lower = dish.to_lowercase();
            !dish.is_empty() && !lower.contains("rester") && !lower.contains("ingen madplan")
        })
        .map(str::to_string)
        .collect()
}

/// Lines of the meal-plan section body, or None when the heading is absent.
fn meal_plan_body(plan: &str) -> Option<Vec<&str>> {
    let lines: Vec<&str> = plan.lines().collect();
    let start = lines.iter().position(|line| {
        line.strip_prefix("## ")
            .map(|h| h.to_lowercase().contains("måltidsplan"))
            .unwrap_or(false)
    })?;
    let body: Vec<&str> = lines[start + 1..]
        .iter()
        .take_while(|line| !line.starts_with("## "))
        .copied()
        .collect();
    Some(body)
}

/// Merge a week's dishes into the history text: any existing line for the
/// same week label is replaced, the new line goes first, and the list is
/// capped at the retention window.
pub fn merge_history(history: &str, label: &str, dishes: &[String]) -> String {
    let new_line = format!("- {}: {}", label, dishes.join(", "));
    let same_week_prefix = format!("- {}:", label);

    let mut lines: Vec<String> = vec![new_line];
    lines.extend(
        history
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(&same_week_prefix))
            .map(str::to_string),
    );
    lines.truncate(MAX_HISTORY_WEEKS);
    lines.join("\n")
}

/// Fold an approved plan into the history document. Returns the updated
/// history, or None when the plan has no usable week title or dishes
/// (approval is then a silent no-op).
pub fn fold_plan_into_history(plan: &str, history: &str) -> Option<String> {
    let label = week_label(plan)?;
    let dishes = extract_dishes(plan);
    if dishes.is_empty() {
        return None;
    }
    Some(merge_history(history, &label, &dishes))
}
