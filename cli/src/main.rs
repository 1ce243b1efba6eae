use anyhow::Context;
use clap::Parser;
use lotus_core::{
    application::{LotusService, create_service},
    domain::{
        common::LotusConfig,
        knowledge_base::IngredientSearchService,
        risk_assessment::RiskAssessmentService,
        scan::ScanService,
    },
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command, LogArgs};

mod args;

fn init_logger(args: &LogArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.level.as_str()));

    // results go to stdout, logs to stderr
    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(service: LotusService, command: Command) -> Result<(), anyhow::Error> {
    match command {
        Command::Scan { image, user_id } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("failed to read image {}", image.display()))?;
            let result = service.scan_image(bytes, user_id).await?;
            print_json(&result)
        }
        Command::Assess { ingredients, user_id } => {
            let result = service.assess_from_ingredients(ingredients, user_id).await?;
            print_json(&result)
        }
        Command::Barcode { barcode, user_id } => {
            let result = service.assess_barcode(barcode, user_id).await?;
            print_json(&result)
        }
        Command::Search {
            query,
            limit,
            risk_level,
            by_name,
        } => {
            if by_name {
                let results = service.search_ingredients_by_name(query, limit).await?;
                print_json(&results)
            } else {
                let results = service.search_ingredients(query, limit, risk_level).await?;
                print_json(&results)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    init_logger(&args.log);

    let command = args.command.clone();
    let config = LotusConfig::from(args);
    let service = create_service(config).await?;

    info!(command = command_name(&command), "running");
    run(service, command).await.inspect_err(|e| error!("{:#}", e))
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Scan { .. } => "scan",
        Command::Assess { .. } => "assess",
        Command::Barcode { .. } => "barcode",
        Command::Search { .. } => "search",
    }
}
