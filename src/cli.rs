use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;

use crate::config::Config;
use crate::documents::{default_documents, DocumentStore};
use crate::export;
use crate::form::{load_weekly_data, FormWizard};
use crate::planner::PlanSession;
use crate::render;
use crate::sections::{extract_sections, SectionKind};

#[derive(Parser)]
#[command(name = "madplan")]
#[command(about = "AI madplanlægger - personlig madplan, opskrifter og indkøbsliste")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Planlæg ugen: indsaml præferencer og generér madplanen
    Plan {
        /// Læs ugens svar fra en JSON-fil i stedet for den interaktive guide
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Gemini-model der skal bruges
        #[arg(short, long)]
        model: Option<String>,
        /// Datamappe (standard: platformens config-mappe)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Vis en gemt madplan i terminalen
    Show {
        /// Markdown-fil med planen; udelades den, vises den senest genererede
        file: Option<PathBuf>,
        /// Vis kun én sektion
        #[arg(short, long)]
        section: Option<SectionArg>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Eksportér en gemt madplan som madplan.md og madplan.html
    Export {
        file: Option<PathBuf>,
        /// Mappe filerne skrives til (standard: arbejdsmappen)
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Se eller redigér dokumenterne bag prompten
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Vis historikken over tidligere ugers retter
    History {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DocsCommands {
    /// Udskriv et dokument
    Show { which: DocKind },
    /// Erstat et dokument med indholdet af en fil (eller stdin)
    Set {
        which: DocKind,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Gendan standarddokumenterne
    Reset { which: Option<DocKind> },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DocKind {
    Requirements,
    Nutrition,
    History,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SectionArg {
    Plan,
    Opskrifter,
    Indkob,
    Ernaering,
}

impl From<SectionArg> for SectionKind {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Plan => SectionKind::Plan,
            SectionArg::Opskrifter => SectionKind::Recipes,
            SectionArg::Indkob => SectionKind::Shopping,
            SectionArg::Ernaering => SectionKind::Nutrition,
        }
    }
}

pub async fn run(args: Args) -> Result<()> {
    match args.command {
        Commands::Plan {
            input,
            model,
            data_dir,
        } => handle_plan(input, model, data_dir).await,
        Commands::Show {
            file,
            section,
            data_dir,
        } => handle_show(file, section, data_dir),
        Commands::Export {
            file,
            out,
            data_dir,
        } => handle_export(file, out, data_dir),
        Commands::Docs { command, data_dir } => handle_docs(command, data_dir),
        Commands::History { data_dir } => handle_history(data_dir),
    }
}

async fn handle_plan(
    input: Option<PathBuf>,
    model: Option<String>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let config = Config::new(data_dir)?;

    let data = match input {
        Some(path) => load_weekly_data(&path)?,
        None => FormWizard::from_stdin(&config.settings).run()?,
    };

    let mut session = PlanSession::new(config, model)?;
    session.run(data).await
}

/// Resolve the plan file argument, defaulting to the last generated plan.
fn read_plan(file: Option<PathBuf>, data_dir: Option<PathBuf>) -> Result<String> {
    let path = match file {
        Some(path) => path,
        None => Config::new(data_dir)?.last_plan_file(),
    };
    std::fs::read_to_string(&path)
        .with_context(|| format!("Kunne ikke læse {}", path.display()))
}

fn handle_show(
    file: Option<PathBuf>,
    section: Option<SectionArg>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let plan = read_plan(file, data_dir)?;

    match section {
        Some(arg) => {
            let sections = extract_sections(&plan);
            println!("{}", render::render(sections.get(arg.into())));
        }
        None => println!("{}", render::render(&plan)),
    }
    Ok(())
}

fn handle_export(
    file: Option<PathBuf>,
    out: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let plan = read_plan(file, data_dir)?;
    let out_dir = match out {
        Some(dir) => dir,
        None => std::env::current_dir().context("No working directory")?,
    };

    let (md, html) = export::write_exports(&plan, &out_dir)?;
    println!(
        "{} {} {} {}",
        "Skrev".green(),
        md.display(),
        "og".green(),
        html.display()
    );
    Ok(())
}

fn handle_docs(command: DocsCommands, data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let store = DocumentStore::new(config.documents_file());
    let mut documents = store.load();

    match command {
        DocsCommands::Show { which } => {
            let content = match which {
                DocKind::Requirements => &documents.requirements,
                DocKind::Nutrition => &documents.nutrition_info,
                DocKind::History => &documents.history,
            };
            println!("{}", content);
        }
        DocsCommands::Set { which, file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Kunne ikke læse {}", path.display()))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Kunne ikke læse fra stdin")?;
                    buffer
                }
            };
            let content = content.trim_end().to_string();
            match which {
                DocKind::Requirements => documents.requirements = content,
                DocKind::Nutrition => documents.nutrition_info = content,
                DocKind::History => documents.history = content,
            }
            store.save(&documents)?;
            println!("{}", "Dokumentet er gemt.".green());
        }
        DocsCommands::Reset { which } => {
            let defaults = default_documents();
            match which {
                Some(DocKind::Requirements) => documents.requirements = defaults.requirements,
                Some(DocKind::Nutrition) => documents.nutrition_info = defaults.nutrition_info,
                Some(DocKind::History) => documents.history = defaults.history,
                None => documents = defaults,
            }
            store.save(&documents)?;
            println!("{}", "Standarddokumenterne er gendannet.".green());
        }
    }
    Ok(())
}

fn handle_history(data_dir: Option<PathBuf>) -> Result<()> {
    let config = Config::new(data_dir)?;
    let store = DocumentStore::new(config.documents_file());
    let documents = store.load();

    println!("{}", "Historik".cyan().bold());
    println!("{}", render::render(&documents.history));
    Ok(())
}
