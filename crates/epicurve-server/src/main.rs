use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use epicurve_core::{
    control_specs, EpicurveConfig, JsonFileRenderer, LatestFrame, RecomputeController, Renderer,
};
use epicurve_ingest::{load_datasets, DefaultFetcher};
use epicurve_model::{ParameterValue, Region};
use epicurve_server::{init_logging, serve, LogFormat};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Command::new("epicurve")
        .version(epicurve_server::VERSION)
        .about("Smoothed per-capita COVID-19 curves with lag and multiplier projections")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log output format: text or json"),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the chart page and its assets")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory to serve"),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Listen port"),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Load every source and write one render frame as JSON")
                .arg(
                    Arg::new("region")
                        .long("region")
                        .help("Region to render"),
                )
                .arg(
                    Arg::new("start-date")
                        .long("start-date")
                        .help("First displayed date, YYYY-MM-DD"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .action(ArgAction::Append)
                        .value_name("NAME=VALUE")
                        .help("Set a control, e.g. smoothingDays=14 (repeatable)"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file"),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .action(ArgAction::SetTrue)
                        .help("Write compact JSON"),
                ),
        )
        .subcommand(
            Command::new("controls")
                .about("Print the control surface")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print as JSON"),
                ),
        );

    let matches = cli.get_matches();
    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    init_logging(format)?;

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EpicurveConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => EpicurveConfig::default(),
    };

    match matches.subcommand() {
        Some(("serve", args)) => run_serve(config, args).await,
        Some(("render", args)) => run_render(&config, args).await,
        Some(("controls", args)) => run_controls(&config, args.get_flag("json")).await,
        _ => unreachable!("subcommand is required"),
    }
}

async fn run_serve(config: EpicurveConfig, args: &ArgMatches) -> Result<()> {
    let mut server = config.server;
    if let Some(root) = args.get_one::<PathBuf>("root") {
        server = server.with_root(root);
    }
    if let Some(port) = args.get_one::<u16>("port") {
        server = server.with_port(*port);
    }
    serve(&server).await.context("static server failed")
}

async fn run_render(config: &EpicurveConfig, args: &ArgMatches) -> Result<()> {
    let mut settings = Vec::new();
    if let Some(region) = args.get_one::<String>("region") {
        settings.push(("region".to_string(), region.clone()));
    }
    if let Some(start) = args.get_one::<String>("start-date") {
        settings.push(("startDate".to_string(), start.clone()));
    }
    for raw in args.get_many::<String>("set").into_iter().flatten() {
        settings.push(split_setting(raw)?);
    }

    let mut controller =
        RecomputeController::load(config, &DefaultFetcher::new(), LatestFrame::new())
            .await
            .context("loading datasets")?;
    for (name, value) in &settings {
        controller
            .apply_control_input(name, value)
            .with_context(|| format!("applying {name}={value}"))?;
    }
    controller.recompute()?;

    let Some(frame) = controller.renderer_mut().take() else {
        bail!("no frame was rendered");
    };
    let out = args
        .get_one::<PathBuf>("out")
        .context("--out is required")?;
    let mut renderer = JsonFileRenderer::new(out);
    if args.get_flag("compact") {
        renderer = renderer.compact();
    }
    renderer.render(&frame)?;
    println!("{} days for {} written to {}", frame.days.len(), frame.region, out.display());
    Ok(())
}

async fn run_controls(config: &EpicurveConfig, json: bool) -> Result<()> {
    let datasets = load_datasets(&DefaultFetcher::new(), &config.sources, &config.ingest_options())
        .await
        .context("loading datasets")?;
    let specs = control_specs(&datasets.regions, &config.parameters);

    if json {
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }
    for spec in &specs {
        let value = match &spec.value {
            ParameterValue::Number(n) => n.to_string(),
            ParameterValue::Text(t) => t.clone(),
        };
        println!("{:<24} {:<22} {}", spec.label, spec.name.as_str(), value);
    }
    println!(
        "regions: {}",
        datasets
            .regions
            .iter()
            .map(Region::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn split_setting(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => bail!("expected NAME=VALUE, got '{raw}'"),
    }
}
