mod dashboard;

pub use dashboard::render_plan;

use crate::{config::Settings, types::TripPlan, web};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// CLI entry point for the travel-crew binary
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("serve", _)) => {
            let settings = Settings::from_env()?;
            info!(model = %settings.llm.model, base_url = %settings.llm.base_url, "Starting server");
            web::serve(settings).await?;
        }
        Some(("plan", args)) => plan(args).await?,
        Some((other, _)) => bail!("unknown subcommand {other}"),
        None => bail!("a subcommand is required"),
    }

    Ok(())
}

fn command() -> Command {
    Command::new("travel-crew")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-agent travel planner")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("serve").about("Start the planning HTTP API"))
        .subcommand(
            Command::new("plan")
                .about("Request a trip plan from a running server and print it")
                .arg(
                    Arg::new("destination")
                        .help("Destination city/country")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("start")
                        .short('s')
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .help("First day of the trip")
                        .required(true),
                )
                .arg(
                    Arg::new("end")
                        .short('e')
                        .long("end")
                        .value_name("YYYY-MM-DD")
                        .help("Last day of the trip")
                        .required(true),
                )
                .arg(
                    Arg::new("budget")
                        .short('b')
                        .long("budget")
                        .value_name("USD")
                        .help("Total budget")
                        .default_value("3000"),
                )
                .arg(
                    Arg::new("preference")
                        .short('p')
                        .long("preference")
                        .value_name("TAG")
                        .help("Interest such as museums or food; repeat for more")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("travelers")
                        .short('t')
                        .long("travelers")
                        .value_name("COUNT")
                        .default_value("1"),
                )
                .arg(
                    Arg::new("url")
                        .short('u')
                        .long("url")
                        .value_name("URL")
                        .help("Base URL of the planning API")
                        .default_value(DEFAULT_API_URL),
                ),
        )
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{name}"))
}

async fn plan(args: &ArgMatches) -> anyhow::Result<()> {
    let start: NaiveDate = required(args, "start")?
        .parse()
        .context("--start must be YYYY-MM-DD")?;
    let end: NaiveDate = required(args, "end")?
        .parse()
        .context("--end must be YYYY-MM-DD")?;
    let budget: f64 = required(args, "budget")?
        .parse()
        .context("--budget must be a number")?;
    let travelers: u32 = required(args, "travelers")?
        .parse()
        .context("--travelers must be a whole number")?;
    let preferences: Vec<String> = args
        .get_many::<String>("preference")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let body = json!({
        "destination": required(args, "destination")?,
        "start_date": start,
        "end_date": end,
        "budget": budget,
        "preferences": preferences,
        "travelers": travelers,
    });

    let url = format!("{}/api/plan", required(args, "url")?.trim_end_matches('/'));
    info!("Requesting plan from {}", url);

    let response = reqwest::Client::new()
        .post(&url)
        .json(&body)
        .send()
        .await
        .with_context(|| format!("could not reach {url}; is `travel-crew serve` running?"))?;

    let status = response.status();
    if !status.is_success() {
        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|value| value["detail"].as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        error!("Plan request failed: {}", detail);
        bail!("plan request failed ({status}): {detail}");
    }

    let plan: TripPlan = response.json().await.context("invalid plan response")?;
    println!("{}", render_plan(&plan));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_arguments_parse() {
        let matches = command()
            .try_get_matches_from([
                "travel-crew",
                "plan",
                "Paris",
                "--start",
                "2025-01-10",
                "--end",
                "2025-01-17",
                "-p",
                "museums",
                "-p",
                "food",
            ])
            .unwrap();

        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "plan");
        assert_eq!(required(args, "destination").unwrap(), "Paris");
        assert_eq!(required(args, "budget").unwrap(), "3000");
        assert_eq!(required(args, "url").unwrap(), DEFAULT_API_URL);
        let preferences: Vec<&str> = args
            .get_many::<String>("preference")
            .unwrap()
            .map(String::as_str)
            .collect();
        assert_eq!(preferences, vec!["museums", "food"]);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(command().try_get_matches_from(["travel-crew"]).is_err());
    }
}
