use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rx_core::config::{cream_applications_per_tube_from_env_value, language_from_env_value};
use rx_core::constants::{CREAM_APPLICATIONS_PER_TUBE_ENV, LANGUAGE_ENV};
use rx_core::{
    calculate_duration, detect_form_from_name, extract_age_number, render, to_latin_digits,
    DocumentFormat, DosagePresentation, EligibilityOutcome, EngineConfig, PharmaceuticalForm,
    PrescriptionLine, QuantityCalculator, Session,
};

#[derive(Parser)]
#[command(name = "rx")]
#[command(about = "Prescription eligibility and dosage calculator")]
struct Cli {
    /// Presentation language (en or ar); overrides RX_LANGUAGE
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Cream applications per tube; overrides RX_CREAM_APPLICATIONS_PER_TUBE
    #[arg(long, global = true)]
    cream_applications_per_tube: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an age from free text
    Age {
        /// Age text, e.g. "25 years" or "٢٥ سنة"
        text: String,
    },
    /// Convert Arabic-Indic digits to Latin digits
    Digits { text: String },
    /// Infer the pharmaceutical form from an item name
    Form { name: String },
    /// Show the dosage input label, helper text and placeholder
    Label {
        /// Form tag (TABLET, SYRUP, ...)
        #[arg(long)]
        form: Option<String>,
        /// Medicine name, used when no form is given
        #[arg(long)]
        name: Option<String>,
    },
    /// Days of treatment covered by the available quantity
    Duration {
        #[arg(long)]
        available: f64,
        #[arg(long)]
        dosage: Option<f64>,
        #[arg(long)]
        times_per_day: Option<f64>,
    },
    /// Quantity required for a treatment course
    Quantity {
        /// Form tag (TABLET, SYRUP, ...)
        #[arg(long)]
        form: Option<String>,
        /// Medicine name, used when no form is given
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        dosage: Option<f64>,
        #[arg(long)]
        times_per_day: Option<f64>,
        /// Treatment duration in days
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Evaluate a session document (YAML or JSON)
    Eligible {
        /// Path to the session document
        path: PathBuf,
        /// Reference date for ages computed from birth dates (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct Report<'a> {
    outcome: &'a EligibilityOutcome,
    lines: Vec<PrescriptionLine>,
}

/// Resolve engine configuration once: flags win over the environment.
fn resolve_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let per_tube = match cli.cream_applications_per_tube {
        Some(n) => n,
        None => cream_applications_per_tube_from_env_value(
            std::env::var(CREAM_APPLICATIONS_PER_TUBE_ENV).ok(),
        )?,
    };
    let language = language_from_env_value(
        cli.lang
            .clone()
            .or_else(|| std::env::var(LANGUAGE_ENV).ok()),
    )?;

    Ok(EngineConfig::new(per_tube, language)?)
}

fn parse_form(tag: Option<&str>) -> anyhow::Result<Option<PharmaceuticalForm>> {
    match tag {
        None => Ok(None),
        Some(tag) => match PharmaceuticalForm::from_tag(tag) {
            Some(form) => Ok(Some(form)),
            None => bail!("unknown form '{tag}'"),
        },
    }
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_string(), |v| v.to_string())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rx=info".parse()?)
                .add_directive("rx_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(resolve_config(&cli)?);
    tracing::debug!(?cfg, "engine configuration resolved");
    let calculator = QuantityCalculator::new(cfg.clone());

    match cli.command {
        Some(Commands::Age { text }) => {
            println!("{}", show(extract_age_number(Some(&text))));
        }
        Some(Commands::Digits { text }) => {
            println!("{}", to_latin_digits(Some(&text)));
        }
        Some(Commands::Form { name }) => {
            println!("{}", show(detect_form_from_name(&name)));
        }
        Some(Commands::Label { form, name }) => {
            let form = parse_form(form.as_deref())?;
            let p = DosagePresentation::new(form, name.as_deref(), cfg.language());
            println!("Form: {}", show(p.form));
            println!("Label: {}", p.label);
            println!("Helper: {}", p.helper_text);
            println!("Placeholder: {}", p.placeholder);
            println!("Per day: {}", p.per_day);
        }
        Some(Commands::Duration {
            available,
            dosage,
            times_per_day,
        }) => {
            println!("{}", show(calculate_duration(available, dosage, times_per_day)));
        }
        Some(Commands::Quantity {
            form,
            name,
            dosage,
            times_per_day,
            duration,
        }) => {
            let form = rx_core::resolve_form(parse_form(form.as_deref())?, name.as_deref());
            let quantity = calculator.required_quantity(form, dosage, times_per_day, duration);
            println!("{}", show(quantity));
        }
        Some(Commands::Eligible { path, today, json }) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let format = DocumentFormat::from_extension(path.extension().and_then(|e| e.to_str()));
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());

            let session = Session::parse(&text, format, today)
                .with_context(|| format!("invalid session document {}", path.display()))?;
            let outcome = session.evaluate();
            let lines = session.prescription_lines(&outcome, &calculator);

            if json {
                let report = Report {
                    outcome: &outcome,
                    lines,
                };
                println!("{}", render(&report, DocumentFormat::Json)?);
                return Ok(());
            }

            match outcome.reason() {
                Some(reason) => println!("Not eligible: {reason}"),
                None => {
                    println!(
                        "Showing {} of {} items:",
                        outcome.items().len(),
                        outcome.total()
                    );
                    for item in outcome.items() {
                        println!("  {} [{}]", item.name, show(item.resolved_form()));
                    }
                }
            }

            for line in lines {
                println!(
                    "Order: {} form={} duration={} quantity={}",
                    line.item_name,
                    show(line.form),
                    show(line.duration),
                    show(line.quantity)
                );
            }
        }
        None => {
            println!("Use 'rx --help' for commands");
        }
    }

    Ok(())
}
