use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::config::Settings;
use crate::model::{DayPlan, WeeklyData};

const MIN_MINUTES: u32 = 10;
const MAX_MINUTES: u32 = 90;

/// Step-by-step preference wizard, the terminal counterpart of the old
/// multi-step form. Generic over the input stream so tests can drive it
/// with a `Cursor`.
pub struct FormWizard<'a, R: BufRead> {
    input: R,
    settings: &'a Settings,
}

impl<'a> FormWizard<'a, io::StdinLock<'a>> {
    pub fn from_stdin(settings: &'a Settings) -> FormWizard<'a, io::StdinLock<'a>> {
        FormWizard {
            input: io::stdin().lock(),
            settings,
        }
    }
}

impl<'a, R: BufRead> FormWizard<'a, R> {
    pub fn new(input: R, settings: &'a Settings) -> Self {
        FormWizard { input, settings }
    }

    /// Walk every step and return the finished snapshot.
    pub fn run(&mut self) -> Result<WeeklyData> {
        println!("{}", "Planlæg din uge".cyan().bold());
        println!(
            "{}",
            "Fortæl os dine præferencer for den kommende uge.".dimmed()
        );
        println!();

        let pasted_history = self.read_multiline(
            "Indsæt de sidste 2 måneders madplaner for at undgå gentagelser",
        )?;
        let feedback =
            self.read_multiline("Feedback på sidste uges plan - noget du var glad for eller utilfreds med?")?;

        let mut days = Vec::new();
        for day_name in &self.settings.days {
            days.push(self.read_day(day_name)?);
        }

        let available_ingredients =
            self.read_multiline("Hvilke relevante råvarer har du allerede?")?;
        let requested_ingredients =
            self.read_multiline("Ingredienser eller retter som skal indgå i ugens madplan?")?;
        let other_requests =
            self.read_multiline("Andre kommentarer eller ønsker til madplanen?")?;

        Ok(WeeklyData {
            feedback,
            days,
            available_ingredients,
            requested_ingredients,
            other_requests,
            pasted_history,
        })
    }

    fn read_day(&mut self, day_name: &str) -> Result<DayPlan> {
        println!();
        println!("{}", day_name.green().bold());

        let no_meal = self.read_line(&format!("  Ingen madplan for {}? (j/N)", day_name))?;
        if is_yes(&no_meal) {
            let mut day = DayPlan::new(day_name, Vec::new(), self.settings.default_cooking_time);
            day.no_meal = true;
            return Ok(day);
        }

        let answer = self.read_line(&format!(
            "  Hvem spiser med? [{}]",
            self.settings.household.join(", ")
        ))?;
        let eaters = parse_eaters(&answer, &self.settings.household);

        let answer = self.read_line(&format!(
            "  Maksimal tilberedningstid i minutter (10 = rester) [{}]",
            self.settings.default_cooking_time
        ))?;
        let cooking_time = parse_minutes(&answer, self.settings.default_cooking_time);

        Ok(DayPlan::new(day_name, eaters, cooking_time))
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{} ", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        // EOF counts as an empty answer so piped input can stop early.
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn read_multiline(&mut self, prompt: &str) -> Result<String> {
        println!("{} {}", prompt.cyan(), "(afslut med tom linje)".dimmed());

        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            let read = self.input.read_line(&mut line)?;
            let trimmed = line.trim_end();
            if read == 0 || trimmed.is_empty() {
                break;
            }
            lines.push(trimmed.to_string());
        }
        Ok(lines.join("\n"))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "j" | "ja" | "y" | "yes")
}

/// Interpret the eater answer: blank means the whole household, "ingen"
/// means nobody, otherwise a comma-separated list. Names matching a
/// household member case-insensitively are canonicalized; unknown names
/// (guests) are kept as typed. Duplicates are dropped, order preserved.
pub fn parse_eaters(answer: &str, household: &[String]) -> Vec<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return household.to_vec();
    }
    if answer.eq_ignore_ascii_case("ingen") {
        return Vec::new();
    }

    let mut eaters: Vec<String> = Vec::new();
    for name in answer.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let canonical = household
            .iter()
            .find(|member| member.to_lowercase() == name.to_lowercase())
            .cloned()
            .unwrap_or_else(|| name.to_string());
        if !eaters.contains(&canonical) {
            eaters.push(canonical);
        }
    }
    eaters
}

/// Parse the cooking-time answer, falling back to the default and clamping
/// to the slider range of the old form (10-90 minutes).
pub fn parse_minutes(answer: &str, default: u32) -> u32 {
    let minutes = answer.trim().parse::<u32>().unwrap_or(default);
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

/// Non-interactive input: a `WeeklyData` snapshot from a JSON file.
pub fn load_weekly_data(path: &Path) -> Result<WeeklyData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid weekly data in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_parse_eaters_blank_means_everyone() {
        let s = settings();
        assert_eq!(parse_eaters("", &s.household), s.household);
        assert_eq!(parse_eaters("   ", &s.household), s.household);
    }

    #[test]
    fn test_parse_eaters_ingen_means_nobody() {
        let s = settings();
        assert!(parse_eaters("ingen", &s.household).is_empty());
        assert!(parse_eaters("INGEN", &s.household).is_empty());
    }

    #[test]
    fn test_parse_eaters_canonicalizes_and_keeps_guests() {
        let s = settings();
        let eaters = parse_eaters("thor, line, Mormor", &s.household);
        assert_eq!(eaters, vec!["Thor", "Line", "Mormor"]);
    }

    #[test]
    fn test_parse_eaters_dedups() {
        let s = settings();
        let eaters = parse_eaters("Thor, thor, Thor", &s.household);
        assert_eq!(eaters, vec!["Thor"]);
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("45", 30), 45);
        assert_eq!(parse_minutes("", 30), 30);
        assert_eq!(parse_minutes("sludder", 30), 30);
        assert_eq!(parse_minutes("5", 30), 10);
        assert_eq!(parse_minutes("200", 30), 90);
    }

    #[test]
    fn test_wizard_full_run() {
        let script = "\
- Uge 34: Kylling i karry

Lasagnen var for tør

n
Thor, Line
45
j
n

10
n
ingen
30
n
Thor
25
500g hakket svinekød

en ret med laks

gerne noget asiatisk
";
        let s = settings();
        let mut wizard = FormWizard::new(Cursor::new(script), &s);
        let data = wizard.run().unwrap();

        assert_eq!(data.pasted_history, "- Uge 34: Kylling i karry");
        assert_eq!(data.feedback, "Lasagnen var for tør");
        assert_eq!(data.days.len(), 5);

        assert_eq!(data.days[0].eaters, vec!["Thor", "Line"]);
        assert_eq!(data.days[0].cooking_time, 45);
        assert!(!data.days[0].no_meal);

        assert!(data.days[1].no_meal);

        // Blank eater answer means the whole household eats.
        assert_eq!(data.days[2].eaters, s.household);
        assert!(data.days[2].is_leftovers());

        assert!(data.days[3].eaters.is_empty());

        assert_eq!(data.days[4].eaters, vec!["Thor"]);
        assert_eq!(data.days[4].cooking_time, 25);

        assert_eq!(data.available_ingredients, "500g hakket svinekød");
        assert_eq!(data.requested_ingredients, "en ret med laks");
        assert_eq!(data.other_requests, "gerne noget asiatisk");
    }

    #[test]
    fn test_wizard_eof_everywhere_still_returns_snapshot() {
        let s = settings();
        let mut wizard = FormWizard::new(Cursor::new(""), &s);
        let data = wizard.run().unwrap();
        assert_eq!(data.days.len(), 5);
        assert!(data.feedback.is_empty());
    }
}
