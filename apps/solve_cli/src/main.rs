use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpSolveClient, SolveResult, SolveWorkflow, SolverSession};
use shared::domain::FieldName;
use tracing_subscriber::EnvFilter;

/// Solve a linear ODE with constant coefficients through the remote solver.
#[derive(Parser, Debug)]
struct Args {
    /// Overrides the solver server from dsolve.toml / environment.
    #[arg(long)]
    server_url: Option<String>,
    /// Equation order; unusable values fall back to 2.
    #[arg(long, default_value = "2")]
    degree: String,
    /// Coefficient of the i-th derivative as `i=value`; repeatable.
    #[arg(long = "coeff", value_parser = parse_assignment)]
    coefficients: Vec<(u32, String)>,
    /// Initial value of the i-th derivative at 0 as `i=value`; repeatable.
    #[arg(long = "ic", value_parser = parse_assignment)]
    initial_conditions: Vec<(u32, String)>,
    /// Print the request body instead of sending it.
    #[arg(long)]
    dry_run: bool,
}

fn parse_assignment(raw: &str) -> Result<(u32, String), String> {
    let (order, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `order=value`, got `{raw}`"))?;
    let order = order
        .trim()
        .parse::<u32>()
        .map_err(|err| format!("invalid derivative order `{order}`: {err}"))?;
    Ok((order, value.trim().to_string()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load solver settings")?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let client = HttpSolveClient::from_settings(&settings)?;
    tracing::info!(endpoint = %client.endpoint(), "using solve endpoint");
    let session = SolverSession::new(client, SolveWorkflow::new(settings.stale_policy));

    let degree = session.change_degree(&args.degree).await;
    for (order, value) in &args.coefficients {
        let name = FieldName::coefficient(*order).to_string();
        session
            .set_field(&name, value)
            .await
            .with_context(|| format!("coefficient {order} is out of range for degree {degree}"))?;
    }
    for (order, value) in &args.initial_conditions {
        let name = FieldName::initial_condition(*order).to_string();
        session.set_field(&name, value).await.with_context(|| {
            format!("initial condition {order} is out of range for degree {degree}")
        })?;
    }

    let snapshot = session.snapshot().await;
    println!("Equation: {}", snapshot.fields.equation_text());
    let conditions: Vec<String> = snapshot
        .fields
        .initial_conditions()
        .iter()
        .map(|field| format!("{} = {}", field.label, field.value))
        .collect();
    println!("Initial conditions: {}", conditions.join(", "));

    if args.dry_run {
        let request = session.preview_request().await?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(ExitCode::SUCCESS);
    }

    let report = session.submit().await?;
    let view = session.snapshot().await.view;
    println!("{}", view.display);
    if !view.plain.is_empty() && view.plain != view.display {
        println!("{}", view.plain);
    }

    Ok(match report.result {
        SolveResult::Success { .. } => ExitCode::SUCCESS,
        SolveResult::ServiceFailure { .. } | SolveResult::TransportFailure => ExitCode::FAILURE,
    })
}
