//! Splits a generated plan into its four tabbed sections by matching the
//! numbered `## N. ...` headings against fixed Danish keywords. Heading
//! wording varies between generations, so matching is case-insensitive
//! substring, never exact equality.

pub const PLAN_MISSING: &str = "Kunne ikke finde måltidsplanen.";
pub const RECIPES_MISSING: &str = "Kunne ikke finde opskrifter.";
pub const SHOPPING_MISSING: &str = "Kunne ikke finde indkøbslisten.";
pub const NUTRITION_MISSING: &str = "Kunne ikke finde ernæringstabeller.";

#[derive(Debug, Clone)]
pub struct PlanSections {
    pub plan: String,
    pub recipes: String,
    pub shopping: String,
    pub nutrition: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Plan,
    Recipes,
    Shopping,
    Nutrition,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Plan,
        SectionKind::Recipes,
        SectionKind::Shopping,
        SectionKind::Nutrition,
    ];

    /// Tab label shown in the terminal.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Plan => "Madplan",
            SectionKind::Recipes => "Opskrifter",
            SectionKind::Shopping => "Indkøbsliste",
            SectionKind::Nutrition => "Ernæring",
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            SectionKind::Plan => "måltidsplan",
            SectionKind::Recipes => "opskrift",
            SectionKind::Shopping => "indkøbsliste",
            SectionKind::Nutrition => "ernæring",
        }
    }

    fn matches(&self, heading: &str) -> bool {
        heading.to_lowercase().contains(self.keyword())
    }
}

impl PlanSections {
    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Plan => &self.plan,
            SectionKind::Recipes => &self.recipes,
            SectionKind::Shopping => &self.shopping,
            SectionKind::Nutrition => &self.nutrition,
        }
    }
}

/// True for the section headings the prompt asks for: `## 1. ...`.
fn is_numbered_heading(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("## ") else {
        return false;
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    !digits.is_empty() && rest[digits.len()..].starts_with(". ")
}

/// Split the generated markdown into the four named sections.
///
/// The first level-1 heading is the overall week title and is prepended to
/// the meal-plan section. Unmatched sections keep their placeholder text;
/// if the meal-plan heading is missing entirely but a title exists, the
/// whole document is shown as the meal-plan section instead.
pub fn extract_sections(markdown: &str) -> PlanSections {
    let mut sections = PlanSections {
        plan: PLAN_MISSING.to_string(),
        recipes: RECIPES_MISSING.to_string(),
        shopping: SHOPPING_MISSING.to_string(),
        nutrition: NUTRITION_MISSING.to_string(),
    };

    let main_title = markdown
        .lines()
        .find(|line| line.starts_with("# "))
        .unwrap_or("");

    let lines: Vec<&str> = markdown.lines().collect();
    let boundaries: Vec<usize> = (0..lines.len())
        .filter(|&i| is_numbered_heading(lines[i]))
        .collect();

    for (idx, &start) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(idx + 1)
            .copied()
            .unwrap_or(lines.len());
        let heading = lines[start];
        let content = lines[start..end].join("\n").trim_end().to_string();

        for kind in SectionKind::ALL {
            if kind.matches(heading) {
                match kind {
                    SectionKind::Plan => {
                        sections.plan = format!("{}\n\n{}", main_title, content);
                    }
                    SectionKind::Recipes => sections.recipes = content.clone(),
                    SectionKind::Shopping => sections.shopping = content.clone(),
                    SectionKind::Nutrition => sections.nutrition = content.clone(),
                }
                break;
            }
        }
    }

    // Best-effort degradation: show everything rather than nothing.
    if sections.plan == PLAN_MISSING && !main_title.is_empty() {
        sections.plan = markdown.to_string();
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Uge 36 (31/8-4/9)

## 1. Måltidsplan for ugen
- Søndag (Thor, Line): Kylling i karry

## 2. Opskrifter
### Kylling i karry
- 400g kylling

## 3. Indkøbsliste
- Kylling

## 4. Ernæringstabeller
| Ingrediens | Kalorier |
| --- | --- |
| Kylling | 660 |";

    #[test]
    fn test_all_four_sections_found() {
        let sections = extract_sections(SAMPLE);
        assert!(sections.plan.contains("Kylling i karry"));
        assert!(sections.recipes.contains("400g kylling"));
        assert!(sections.shopping.contains("## 3. Indkøbsliste"));
        assert!(sections.nutrition.contains("| Kylling | 660 |"));
    }

    #[test]
    fn test_sections_exclude_each_other() {
        let sections = extract_sections(SAMPLE);
        assert!(!sections.recipes.contains("Indkøbsliste"));
        assert!(!sections.shopping.contains("Ernæringstabeller"));
        assert!(!sections.nutrition.contains("Opskrifter"));
        assert!(!sections.plan.contains("Opskrifter"));
    }

    #[test]
    fn test_title_prepended_to_plan_only() {
        let sections = extract_sections(SAMPLE);
        assert!(sections.plan.starts_with("# Uge 36"));
        assert!(!sections.recipes.contains("# Uge 36"));
    }

    #[test]
    fn test_order_does_not_matter() {
        let reordered = "\
# Uge 36

## 1. Ernæringstabeller
tal

## 2. Måltidsplan for ugen
retter

## 3. Opskrifter
opskrift

## 4. Indkøbsliste
varer";
        let sections = extract_sections(reordered);
        assert!(sections.plan.contains("retter"));
        assert!(sections.nutrition.contains("tal"));
        assert!(sections.recipes.contains("opskrift"));
        assert!(sections.shopping.contains("varer"));
    }

    #[test]
    fn test_missing_section_gets_placeholder() {
        let without_shopping = "\
# Uge 36

## 1. Måltidsplan for ugen
retter

## 2. Opskrifter
opskrift

## 3. Ernæringstabeller
tal";
        let sections = extract_sections(without_shopping);
        assert_eq!(sections.shopping, SHOPPING_MISSING);
    }

    #[test]
    fn test_heading_match_is_case_insensitive() {
        let md = "# Uge 1\n\n## 1. MÅLTIDSPLAN\nretter";
        let sections = extract_sections(md);
        assert!(sections.plan.contains("retter"));
    }

    #[test]
    fn test_fallback_to_full_document() {
        let md = "# Uge 36\n\nBare løs tekst uden sektioner.";
        let sections = extract_sections(md);
        assert_eq!(sections.plan, md);
        assert_eq!(sections.recipes, RECIPES_MISSING);
    }

    #[test]
    fn test_no_title_no_fallback() {
        let md = "Ingen overskrifter her.";
        let sections = extract_sections(md);
        assert_eq!(sections.plan, PLAN_MISSING);
    }
}
