use crate::model::{DayPlan, DocumentData, WeeklyData};
use crate::week::PlanningWeek;

/// One prompt line per planned day.
///
/// A no-meal day gets the fixed marker line and nothing else; a leftovers
/// day (cooking time at the 10 minute threshold) is flagged explicitly so
/// the model reuses an earlier dish instead of inventing a new one.
pub fn day_line(day: &DayPlan) -> String {
    if day.no_meal {
        return format!("- {}: Ingen madplan for denne dag.", day.day);
    }

    let eaters = if day.eaters.is_empty() {
        "Ingen".to_string()
    } else {
        day.eaters.join(", ")
    };

    if day.is_leftovers() {
        format!(
            "- {}: {} spiser med. Tilberedningstid: {} minutter (rester fra en tidligere dag).",
            day.day, eaters, day.cooking_time
        )
    } else {
        format!(
            "- {}: {} spiser med. Tilberedningstid: {} minutter.",
            day.day, eaters, day.cooking_time
        )
    }
}

fn or_ingen(text: &str) -> &str {
    if text.trim().is_empty() {
        "Ingen"
    } else {
        text
    }
}

/// Assemble the full Danish instruction payload for the model.
///
/// Pure string templating: the pasted history wins over the stored history
/// when non-blank, and the revision suffix is appended only when revision
/// feedback is supplied.
pub fn build_prompt(
    data: &WeeklyData,
    documents: &DocumentData,
    week: &PlanningWeek,
    revision_feedback: Option<&str>,
) -> String {
    let day_lines = data
        .days
        .iter()
        .map(day_line)
        .collect::<Vec<_>>()
        .join("\n");

    let effective_history = if data.pasted_history.trim().is_empty() {
        documents.history.as_str()
    } else {
        data.pasted_history.as_str()
    };

    let feedback = if data.feedback.trim().is_empty() {
        "Ingen feedback givet."
    } else {
        data.feedback.as_str()
    };

    let base = format!(
        r###"Du er en specialiseret AI-agent, der skal generere en ugentlig madplan. Din opgave er at levere en komplet pakke, der består af en madplan, ernæringsoversigt, opskrifter og en indkøbsliste.

Her er dine instruktioner, som skal følges præcist:

0. Tag højde for feedback på sidste uges madplan. Brug denne feedback til at forbedre den nye plan.
Feedback: "{feedback}"

1. Hent data fra mine kilder. Jeg har givet dig indholdet af de nødvendige kilder nedenfor. Brug udelukkende disse data.

Kilde 1: "Weekly Meal Planner Data" (seneste række):
{day_lines}

Her er yderligere ønsker for ugen:
- Råvarer som brugeren allerede har til rådighed: "{available}"
- Ønskede ingredienser/retter der skal indgå i planen: "{requested}"
- Andre kommentarer til madplanen: "{other}"

Kilde 2: "Krav til madplan":
{requirements}

Kilde 3: "Næringsindhold og vitaminer i aftensmad til madplan":
{nutrition}

Kilde 4: "Næringsindhold af råvarer":
Brug udelukkende data fra dette Google Sheet til alle næringsberegninger: https://maddata.dk/. Ignorer alle andre kilder til næringsdata.

Kilde 5: "Madplan og Indkøbsliste" (Historik):
{history}

2. Generér madplanen
Udarbejd en madplan for aftensmad fra søndag til torsdag.
Krav til madplan:
- Retterne skal være tilpasset de specifikke tidsrammer og ønsker fra "Weekly Meal Planner Data".
- Retterne skal overholde ALLE regler specificeret i "Krav til madplan" (Kilde 2). Dette er et absolut krav, som ikke kan fraviges. Især reglen om INTET OKSEKØD.
- Tag højde for brugerens "Ønskede ingredienser/retter" og "Andre kommentarer".
- Hvis en dag er markeret med "Ingen madplan", skal du skrive dette i planen og ikke generere en ret.
- Hvis tilberedningstiden for en dag er 10 minutter, betyder det, at der skal spises rester. Planlæg ikke en ny ret for den dag.
- **Portionsberegning for Rester:** Hvis en ret skal bruges til rester dagen efter (fordi dagen efter har en tilberedningstid på 10 minutter), skal du beregne det samlede antal portioner ved at lægge antallet af spisende gæster fra *begge* dage sammen. Eksempel: Hvis der er 4 personer, der spiser på tilberedningsdagen, og 3 personer, der spiser rester dagen efter, skal opskriften laves til i alt 7 portioner. Angiv dette tydeligt i opskriften.
- Prioritér at bruge de råvarer, der er angivet som tilængelige ("Råvarer som brugeren allerede har til rådighed").
- Lav en fuldstændig beregning af næringsværdi for alle måltider, inkluderende alle råvarer, baseret på Kilde 4.
- Retterne skal følge kravene i "Næringsindhold og vitaminer i aftensmad til madplan".
- Der skal ikke være nogle retter, som vi har lavet de sidste 2 måneder (brug historikken). Dette er for at sikre så stor smagsvarians som muligt.
- Hvis måltiderne ikke lever op til kravene, startes der forfra med "2. Generér madplanen".

3. Generer ernæringstabeller:
For hver ret:
- Lav en tabel i Markdown med kolonner: Ingrediens | Mængde (g/ml) | Kalorier | Protein (g) | Kulhydrat (g) | Fedt (g)
- Sidste række: SUM for hele retten.
- Skriv separat kalorier og protein pr. portion.
- Én decimal på alle tal.
- Vis som tabel.
- Vigtigt: Dobbelttjek alle dine ernæringsberegninger. Summen af ingrediensernes næringsindhold skal nøjagtigt matche totalen for retten. Portionens næringsindhold skal være totalen divideret med antallet af portioner. Vær ekstremt omhyggelig med disse beregninger, da nøjagtighed er afgørende.

4. Obligatorisk Kvalitetstjek (INTERN PROCES):
Før du genererer det endelige output, SKAL du udføre følgende selvkontrol:
- **Konsistens:** Er ingredienserne og mængderne i opskrifterne identiske med dem, der bruges i ernæringstabellerne?
- **Indkøbsliste:** Stemmer den samlede mængde på indkøbslisten overens med det, der kræves i opskrifterne (fratrukket de varer, brugeren allerede har)?
- **Portioner:** Er portionsstørrelsen i opskriften korrekt beregnet, især for retter med rester?
- **Regler:** Er ALLE regler fra "Krav til madplan" overholdt?
Hvis du finder den mindste uoverensstemmelse, skal du rette den, FØR du fortsætter til næste trin.

5. Generer de fire outputs i Markdown format. Følg denne struktur nøje for at sikre korrekt formatering ved kopiering til Google Docs:
- Start med den følgende overordnede titel for ugen: # {week_label} ({date_range})
- Brug derefter overskrifter (f.eks. "## 1. Måltidsplan for ugen") til at adskille de fire sektioner.
- I opskrifter og indkøbsliste, brug fed skrift (f.eks. **Ingredienser:** eller **Frugt & Grønt:**) for underoverskrifter.

De fire sektioner er:
1. Måltidsplan for ugen: Præsenter madplanen med en ret for hver dag fra søndag til torsdag. For hver dag, angiv hvem der spiser med i parentes (f.eks. Mandag (Thor, Line, Vigga): ...). Hvis der er rester, eller ingen madplan, skal dette tydeligt fremgå.
2. Opskrifter: Udskriv en fuld opskrift for hver ret.
3. Indkøbsliste: Generér en samlet indkøbsliste for alle ugens retter. Listen skal sorteres i de specificerede kategorier (Frugt & Grønt, Kød & Fisk, Mejeri & Æg, Tørvarer, Andet) og må ikke inkludere de råvarer, der er angivet som tilgængelige ("Råvarer som brugeren allerede har til rådighed"). Inkluder mængder af de enkelte råvarer. Tilføj en note til sidst med en overskrift som "**Forventes i husholdningen:**" og list de basisvarer (fra "Krav til madplan"), som ikke er på listen.
4. Ernæringstabeller: Ernæringstabeller som beskrevet i punkt 3."###,
        feedback = feedback,
        day_lines = day_lines,
        available = or_ingen(&data.available_ingredients),
        requested = or_ingen(&data.requested_ingredients),
        other = or_ingen(&data.other_requests),
        requirements = documents.requirements,
        nutrition = documents.nutrition_info,
        history = effective_history,
        week_label = week.label(),
        date_range = week.date_range(),
    );

    match revision_feedback {
        Some(feedback) if !feedback.trim().is_empty() => format!(
            "{}\n\nIMPORTANT: The user has reviewed the plan you just generated and provided the following feedback. Please generate a NEW, updated plan that incorporates these changes:\n\"{}\"",
            base, feedback
        ),
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::next_planning_week;
    use chrono::NaiveDate;

    fn week() -> PlanningWeek {
        next_planning_week(NaiveDate::from_ymd_opt(2025, 8, 27).unwrap())
    }

    fn sample_data() -> WeeklyData {
        WeeklyData {
            feedback: String::new(),
            days: vec![
                DayPlan::new("Søndag", vec!["Thor".into(), "Line".into()], 45),
                DayPlan::new("Mandag", vec!["Thor".into()], 10),
                {
                    let mut d = DayPlan::new("Tirsdag", vec!["Line".into()], 30);
                    d.no_meal = true;
                    d
                },
            ],
            available_ingredients: String::new(),
            requested_ingredients: String::new(),
            other_requests: String::new(),
            pasted_history: String::new(),
        }
    }

    fn docs() -> DocumentData {
        DocumentData {
            requirements: "KRAV".into(),
            nutrition_info: "TABEL".into(),
            history: "- Uge 34: Kylling i karry".into(),
        }
    }

    #[test]
    fn test_no_meal_line_has_marker_only() {
        let mut day = DayPlan::new("Tirsdag", vec!["Thor".into(), "Line".into()], 45);
        day.no_meal = true;

        let line = day_line(&day);
        assert_eq!(line, "- Tirsdag: Ingen madplan for denne dag.");
        assert!(!line.contains("Tilberedningstid"));
        assert!(!line.contains("Thor"));
    }

    #[test]
    fn test_leftovers_day_is_flagged() {
        let line = day_line(&DayPlan::new("Mandag", vec!["Thor".into()], 10));
        assert!(line.contains("rester fra en tidligere dag"));
        assert!(line.contains("10 minutter"));
    }

    #[test]
    fn test_regular_day_lists_eaters_and_time() {
        let line = day_line(&DayPlan::new(
            "Søndag",
            vec!["Thor".into(), "Line".into()],
            45,
        ));
        assert_eq!(
            line,
            "- Søndag: Thor, Line spiser med. Tilberedningstid: 45 minutter."
        );
    }

    #[test]
    fn test_empty_eaters_renders_ingen() {
        let line = day_line(&DayPlan::new("Onsdag", vec![], 30));
        assert!(line.contains("Ingen spiser med"));
    }

    #[test]
    fn test_prompt_contains_week_title_and_sources() {
        let prompt = build_prompt(&sample_data(), &docs(), &week(), None);
        assert!(prompt.contains("# Uge 36 (31/8-4/9)"));
        assert!(prompt.contains("KRAV"));
        assert!(prompt.contains("TABEL"));
        assert!(prompt.contains("- Uge 34: Kylling i karry"));
        assert!(prompt.contains("Feedback: \"Ingen feedback givet.\""));
        assert!(!prompt.contains("IMPORTANT: The user has reviewed"));
    }

    #[test]
    fn test_pasted_history_overrides_stored() {
        let mut data = sample_data();
        data.pasted_history = "- Uge 35: Laks i ovn".into();

        let prompt = build_prompt(&data, &docs(), &week(), None);
        assert!(prompt.contains("- Uge 35: Laks i ovn"));
        assert!(!prompt.contains("- Uge 34: Kylling i karry"));
    }

    #[test]
    fn test_blank_pasted_history_uses_stored() {
        let mut data = sample_data();
        data.pasted_history = "   \n".into();

        let prompt = build_prompt(&data, &docs(), &week(), None);
        assert!(prompt.contains("- Uge 34: Kylling i karry"));
    }

    #[test]
    fn test_revision_feedback_appends_suffix() {
        let prompt = build_prompt(&sample_data(), &docs(), &week(), Some("Udskift lasagnen"));
        assert!(prompt.contains("IMPORTANT: The user has reviewed"));
        assert!(prompt.ends_with("\"Udskift lasagnen\""));
    }

    #[test]
    fn test_deterministic() {
        let a = build_prompt(&sample_data(), &docs(), &week(), None);
        let b = build_prompt(&sample_data(), &docs(), &week(), None);
        assert_eq!(a, b);
    }
}
