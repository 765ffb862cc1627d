use chrono::{Datelike, Duration, NaiveDate};

/// Planning weeks run Sunday through Thursday.
const PLANNED_DAYS: i64 = 4;

/// The week the next plan covers: start/end dates plus the Danish week label.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningWeek {
    pub week_number: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PlanningWeek {
    /// Label used in the plan title and in history lines, e.g. "Uge 36".
    pub fn label(&self) -> String {
        format!("Uge {}", self.week_number)
    }

    /// Danish short date range, e.g. "31/8-4/9".
    pub fn date_range(&self) -> String {
        format!("{}-{}", format_short(self.start), format_short(self.end))
    }
}

fn format_short(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

/// Compute the upcoming planning week from the given date.
///
/// The plan always covers the *next* Sunday-Thursday stretch: if `today`
/// is itself a Sunday we still advance a full week. The week number uses
/// day-of-year arithmetic with Sunday-indexed weekdays, matching the
/// labels already stored in the history document.
pub fn next_planning_week(today: NaiveDate) -> PlanningWeek {
    let days_until_sunday = (7 - today.weekday().num_days_from_sunday() as i64) % 7;
    let advance = if days_until_sunday == 0 {
        7
    } else {
        days_until_sunday
    };
    let start = today + Duration::days(advance);
    let end = start + Duration::days(PLANNED_DAYS);

    let jan_first = NaiveDate::from_ymd_opt(start.year(), 1, 1)
        .expect("january 1st always exists");
    let past_days = (start - jan_first).num_days();
    let offset = jan_first.weekday().num_days_from_sunday() as i64;
    let week_number = ((past_days + offset + 1) as f64 / 7.0).ceil() as u32;

    PlanningWeek {
        week_number,
        start,
        end,
    }
}
