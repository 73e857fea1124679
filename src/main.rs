use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use home_price_widget::api::{EstimatorApi, HttpEstimatorApi};
use home_price_widget::config::Config;
use home_price_widget::diagnostics;
use home_price_widget::form::inputs::clamp_sqft_input;
use home_price_widget::form::{ChoiceGroup, FormController, FormInput};
use home_price_widget::interrupt::Interrupts;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "home-price-widget", version, about = "Estimate home prices from the terminal")]
struct Cli {
    /// Base URL of the estimation service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Seconds to wait for each request
    #[arg(long, global = true)]
    timeout_secs: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and print the location list
    Locations {
        /// Print the select control markup instead of plain labels
        #[arg(long)]
        html: bool,
    },
    /// Submit a single estimate
    Estimate {
        #[arg(long, allow_hyphen_values = true)]
        sqft: String,
        #[arg(long)]
        bhk: Option<String>,
        #[arg(long)]
        bath: Option<String>,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Load locations, then keep asking for inputs and estimating
    Interactive,
    /// Check whether the estimation service is ready
    Health,
}

type Controller = FormController<HttpEstimatorApi>;

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_logging();
    diagnostics::install_panic_hook();

    let cli = Cli::parse();
    let config = Config::from_env()
        .and_then(|config| config.with_overrides(cli.api_url.as_deref(), cli.timeout_secs.as_deref()))
        .context("Failed to load configuration")?;

    info!("🏠 Home Price Widget using {}", config.api_base_url);

    let api = Arc::new(HttpEstimatorApi::new(&config)?);
    let mut controller = FormController::new(api, config.request_timeout);
    let mut interrupts = Interrupts::listen();

    match cli.command {
        Command::Locations { html } => {
            controller.on_page_load();
            settle(&mut controller, &mut interrupts).await;

            let select = &controller.page().locations;
            if html {
                println!("{}", select.to_html());
            } else {
                for label in select.labels() {
                    println!("{}", label);
                }
            }
        }
        Command::Estimate { sqft, bhk, bath, location } => {
            let mut form = FormInput {
                sqft,
                location,
                ..FormInput::default()
            };
            if let Some(bhk) = bhk {
                select_choice(&mut form.bhk, &bhk);
            }
            if let Some(bath) = bath {
                select_choice(&mut form.bath, &bath);
            }

            if controller.on_clicked_estimate_price(&form).is_err() {
                for alert in controller.page_mut().take_alerts() {
                    eprintln!("{}", alert);
                }
                std::process::exit(2);
            }
            settle(&mut controller, &mut interrupts).await;
            println!("{}", controller.page().results);
        }
        Command::Interactive => run_interactive(&mut controller, &mut interrupts).await?,
        Command::Health => {
            let report = tokio::select! {
                report = controller.api().health() => report?,
                _ = interrupts.next() => {
                    warn!("Interrupted, health check abandoned");
                    return Ok(());
                }
            };
            println!("Status: {}", report.status);
            println!("Artifacts loaded: {}", report.artifacts_loaded);
            if let Some(checked_at) = report.checked_at() {
                println!("Checked at: {}", checked_at.to_rfc3339());
            }
            if !report.is_healthy() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Wait for outstanding requests; Ctrl-C cancels them
async fn settle(controller: &mut Controller, interrupts: &mut Interrupts) {
    let interrupted = controller.settle_until(interrupts.next()).await;
    if interrupted {
        warn!("Interrupted, outstanding requests cancelled");
    }
}

fn select_choice(group: &mut ChoiceGroup, value: &str) {
    if !group.select(value.trim()) {
        warn!("{:?} is not a valid {} option", value, group.name);
    }
}

async fn run_interactive(controller: &mut Controller, interrupts: &mut Interrupts) -> Result<()> {
    controller.on_page_load();
    settle(controller, interrupts).await;

    let locations: Vec<String> = controller
        .page()
        .locations
        .locations()
        .map(str::to_string)
        .collect();

    if locations.is_empty() {
        let status = controller.page().locations.labels().join(", ");
        warn!("No locations available ({}), estimates will be rejected", status);
    } else {
        for (i, name) in locations.iter().enumerate() {
            println!("{:>4}. {}", i + 1, name);
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(sqft) = prompt(&mut lines, interrupts, "\nSquare footage (q to quit): ").await? else {
            break;
        };
        if sqft.trim().eq_ignore_ascii_case("q") {
            break;
        }

        let mut form = FormInput {
            sqft: clamp_sqft_input(&sqft),
            ..FormInput::default()
        };

        let Some(bhk) = prompt(&mut lines, interrupts, "BHK (1-5): ").await? else { break };
        if !bhk.trim().is_empty() {
            select_choice(&mut form.bhk, &bhk);
        }

        let Some(bath) = prompt(&mut lines, interrupts, "Bathrooms (1-5): ").await? else { break };
        if !bath.trim().is_empty() {
            select_choice(&mut form.bath, &bath);
        }

        let Some(choice) = prompt(&mut lines, interrupts, "Location (number or name): ").await? else { break };
        form.location = resolve_location(&locations, choice.trim());

        if controller.on_clicked_estimate_price(&form).is_err() {
            for alert in controller.page_mut().take_alerts() {
                println!("⚠️  {}", alert);
            }
            continue;
        }
        println!("{}", controller.page().results);
        settle(controller, interrupts).await;
        println!("{}", controller.page().results);
    }

    Ok(())
}

/// Next input line; `None` on end of input or Ctrl-C
async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    interrupts: &mut Interrupts,
    label: &str,
) -> Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    tokio::select! {
        line = lines.next_line() => Ok(line?),
        _ = interrupts.next() => {
            println!();
            info!("Interrupted, leaving interactive mode");
            Ok(None)
        }
    }
}

/// A 1-based index into `locations`, or an exact location name
fn resolve_location(locations: &[String], choice: &str) -> String {
    if let Ok(index) = choice.parse::<usize>() {
        if let Some(name) = index.checked_sub(1).and_then(|i| locations.get(i)) {
            return name.clone();
        }
    }
    locations
        .iter()
        .find(|name| name.as_str() == choice)
        .cloned()
        .unwrap_or_default()
}
