use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;

use crate::config::Config;
use crate::documents::DocumentStore;
use crate::export;
use crate::generator::{GeminiClient, GenerationResult};
use crate::history;
use crate::model::{DocumentData, WeeklyData};
use crate::prompt::build_prompt;
use crate::render;
use crate::sections::{extract_sections, SectionKind};
use crate::week::{next_planning_week, PlanningWeek};

/// Progress messages cycled while the generation request is in flight.
const LOADING_MESSAGES: [&str; 6] = [
    "Finder de bedste opskrifter...",
    "Beregner næringsindhold...",
    "Tjekker dit køleskab for ingredienser...",
    "Sikrer variation fra tidligere uger...",
    "Skriver din indkøbsliste...",
    "Lægger sidste hånd på værket...",
];

const LOADING_INTERVAL: Duration = Duration::from_millis(2500);

/// One full planning session: generate, review, revise, approve, export.
pub struct PlanSession {
    config: Config,
    store: DocumentStore,
    documents: DocumentData,
    client: GeminiClient,
    week: PlanningWeek,
}

impl PlanSession {
    pub fn new(config: Config, model: Option<String>) -> Result<Self> {
        // Missing credential is fatal before any prompt is built.
        let api_key = config.api_key()?;
        let model = model.unwrap_or_else(|| config.settings.model.clone());

        let store = DocumentStore::new(config.documents_file());
        let documents = store.load();
        let week = next_planning_week(Local::now().date_naive());

        Ok(PlanSession {
            config,
            store,
            documents,
            client: GeminiClient::new(api_key, model),
            week,
        })
    }

    /// Drive the session to completion. The snapshot is immutable: every
    /// revision reuses it with new feedback text appended.
    pub async fn run(&mut self, data: WeeklyData) -> Result<()> {
        println!();
        println!(
            "{} {} ({})",
            "Planlægger".cyan().bold(),
            self.week.label().cyan().bold(),
            self.week.date_range()
        );

        let mut revision_feedback: Option<String> = None;

        loop {
            let prompt = build_prompt(
                &data,
                &self.documents,
                &self.week,
                revision_feedback.as_deref(),
            );

            match self.generate_with_progress(&prompt).await {
                GenerationResult::Plan(plan) => {
                    std::fs::write(self.config.last_plan_file(), &plan)
                        .context("Failed to save the generated plan")?;

                    match self.review(&plan)? {
                        Review::Revise(feedback) => {
                            revision_feedback = Some(feedback);
                            continue;
                        }
                        Review::Done => return Ok(()),
                    }
                }
                result => {
                    // Error state: show the message and a retry affordance.
                    let message = result
                        .failure_message()
                        .unwrap_or_else(|| "Ukendt fejl.".to_string());
                    println!();
                    println!("{}", "Der opstod en fejl".red().bold());
                    println!("{}", message.red());

                    if !ask_yes_no("Prøv igen?")? {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Single request with the loading carousel running beside it. The
    /// caller still awaits sequentially; no second request can start.
    async fn generate_with_progress(&self, prompt: &str) -> GenerationResult {
        println!();
        println!("{}", "Din personlige madplan er på vej!".green().bold());

        let carousel = tokio::spawn(async {
            let mut index = 0;
            let mut ticker = tokio::time::interval(LOADING_INTERVAL);
            loop {
                ticker.tick().await;
                println!("  {}", LOADING_MESSAGES[index % LOADING_MESSAGES.len()].dimmed());
                index += 1;
            }
        });

        let result = self.client.generate(prompt).await;
        carousel.abort();
        result
    }

    /// Show the plan and loop on review commands until the user revises,
    /// approves or leaves.
    fn review(&mut self, plan: &str) -> Result<Review> {
        let sections = extract_sections(plan);

        println!();
        println!("{}", "Din madplan er klar!".green().bold());
        println!();
        println!("{}", render::render(sections.get(SectionKind::Plan)));
        print_review_help();

        let stdin = io::stdin();
        let mut lines = stdin.lock();

        loop {
            print!("{} ", "madplan>".green().bold());
            io::stdout().flush()?;

            let mut line = String::new();
            if lines.read_line(&mut line)? == 0 {
                return Ok(Review::Done);
            }
            let command = line.trim();

            match command.to_lowercase().as_str() {
                "" => {}
                "1" | "madplan" => self.show_section(&sections, SectionKind::Plan),
                "2" | "opskrifter" => self.show_section(&sections, SectionKind::Recipes),
                "3" | "indkob" | "indkøb" => self.show_section(&sections, SectionKind::Shopping),
                "4" | "ernaering" | "ernæring" => {
                    self.show_section(&sections, SectionKind::Nutrition)
                }
                "opdater" => {
                    println!(
                        "{}",
                        "Hvad skal ændres? F.eks. 'Udskift lasagnen med en fiskeret'.".cyan()
                    );
                    let mut feedback = String::new();
                    lines.read_line(&mut feedback)?;
                    let feedback = feedback.trim();
                    if feedback.is_empty() {
                        println!("{}", "Ingen feedback givet - planen beholdes.".yellow());
                    } else {
                        return Ok(Review::Revise(feedback.to_string()));
                    }
                }
                "godkend" => {
                    self.finalize(plan)?;
                    if ask_yes_no_from(&mut lines, "Eksporter planen som .md og .html?")? {
                        self.export(plan)?;
                    }
                    return Ok(Review::Done);
                }
                "eksporter" => self.export(plan)?,
                "hjælp" | "hjaelp" | "help" => print_review_help(),
                "afslut" => return Ok(Review::Done),
                other => {
                    println!(
                        "{} {}",
                        "Ukendt kommando:".yellow(),
                        other
                    );
                    print_review_help();
                }
            }
        }
    }

    fn show_section(&self, sections: &crate::sections::PlanSections, kind: SectionKind) {
        println!();
        println!("{}", format!("── {} ──", kind.label()).cyan().bold());
        println!("{}", render::render(sections.get(kind)));
    }

    /// Approval: fold the week's dishes into the history document and
    /// persist. A plan without a usable title or dishes is a silent no-op.
    fn finalize(&mut self, plan: &str) -> Result<()> {
        if let Some(updated) = history::fold_plan_into_history(plan, &self.documents.history) {
            self.documents.history = updated;
            self.store.save(&self.documents)?;
            println!("{}", "Madplan godkendt! Historikken er opdateret.".green().bold());
        } else {
            println!("{}", "Madplan godkendt.".green().bold());
        }
        Ok(())
    }

    fn export(&self, plan: &str) -> Result<()> {
        let out_dir = std::env::current_dir().context("No working directory")?;
        let (md, html) = export::write_exports(plan, &out_dir)?;
        println!(
            "{} {} {} {}",
            "Skrev".green(),
            md.display(),
            "og".green(),
            html.display()
        );
        Ok(())
    }
}

enum Review {
    Revise(String),
    Done,
}

fn print_review_help() {
    println!("{}", "Kommandoer:".dimmed());
    println!(
        "{}",
        "  1 madplan | 2 opskrifter | 3 indkob | 4 ernaering - vis sektion".dimmed()
    );
    println!(
        "{}",
        "  opdater - giv feedback og generér igen | godkend - godkend og gem historik".dimmed()
    );
    println!("{}", "  eksporter - skriv .md og .html | afslut".dimmed());
}

fn ask_yes_no(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    ask_yes_no_from(&mut lock, question)
}

fn ask_yes_no_from<R: BufRead>(input: &mut R, question: &str) -> Result<bool> {
    print!("{} (j/N) ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_lowercase().as_str(),
        "j" | "ja" | "y" | "yes"
    ))
}
