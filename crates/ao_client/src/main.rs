use std::path::PathBuf;
use std::process;

use ao_client::edit::{apply_edit, EDIT_HELP};
use ao_client::report::render_report;
use ao_client::settings::{load_experiment_or_default, save_download, save_experiment};
use ao_client::{AppPaths, ClientSettings, SimulationClient};
use ao_sim::aggregate::ResultsReport;
use tracing::info;

fn usage() -> ! {
    eprintln!("ao-sim (talks to the simulation service @ $AO_SIM_URL, default http://127.0.0.1:8000)");
    eprintln!("Usage: ao-sim [--url URL] [--config FILE] [--out FILE] <command> [args]\n");
    eprintln!("Commands:");
    eprintln!("  init                        Write a default experiment file");
    eprintln!("  show                        Print the saved experiment");
    eprintln!("  set <field> <value...>      Edit the saved experiment:");
    eprintln!("{EDIT_HELP}");
    eprintln!("  request                     Print the compiled request body");
    eprintln!("  run                         Run the experiment and print a report");
    eprintln!("  csv | json                  Run and save the CSV/JSON export");
    eprintln!("  paths                       Show data directory and file paths");
    process::exit(1);
}

struct Cli {
    url: Option<String>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    args: Vec<String>,
}

fn parse_args() -> Cli {
    let mut cli = Cli {
        url: None,
        config: None,
        out: None,
        args: Vec::new(),
    };

    let mut it = std::env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--url" => cli.url = Some(it.next().unwrap_or_else(|| usage())),
            "--config" => cli.config = Some(PathBuf::from(it.next().unwrap_or_else(|| usage()))),
            "--out" => cli.out = Some(PathBuf::from(it.next().unwrap_or_else(|| usage()))),
            "-h" | "--help" => usage(),
            _ => cli.args.push(a),
        }
    }

    if cli.args.is_empty() {
        usage();
    }
    cli
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = parse_args();
    let paths = AppPaths::new()?;
    let config_path = cli.config.clone().unwrap_or_else(|| paths.experiment_file());

    let mut settings = ClientSettings::from_env();
    if let Some(url) = &cli.url {
        settings = settings.with_base_url(url);
    }

    match cli.args[0].as_str() {
        "init" => {
            let config = ao_sim::config::ExperimentConfig::default();
            save_experiment(&config_path, &config)?;
            println!("{}", config_path.display());
        }
        "show" => {
            let config = load_experiment_or_default(&config_path)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        "set" => {
            let config = load_experiment_or_default(&config_path)?;
            let config = apply_edit(config, &cli.args[1..])?;
            save_experiment(&config_path, &config)?;
            info!("updated {}", config_path.display());
        }
        "request" => {
            let config = load_experiment_or_default(&config_path)?;
            println!("{}", serde_json::to_string_pretty(&config.compile())?);
        }
        "run" => {
            let request = load_experiment_or_default(&config_path)?.compile();
            let client = SimulationClient::new(&settings)?;
            info!(url = client.base_url(), "running simulation");
            let response = client.simulate(&request).await?;
            print!("{}", render_report(&ResultsReport::build(&response, &request)));
        }
        "csv" => {
            let request = load_experiment_or_default(&config_path)?.compile();
            let client = SimulationClient::new(&settings)?;
            let body = client.download_csv(&request).await?;
            let out = cli.out.clone().unwrap_or_else(|| paths.csv_download());
            save_download(&out, &body)?;
            println!("{}", out.display());
        }
        "json" => {
            let request = load_experiment_or_default(&config_path)?.compile();
            let client = SimulationClient::new(&settings)?;
            let body = client.download_json(&request).await?;
            let out = cli.out.clone().unwrap_or_else(|| paths.json_download());
            save_download(&out, &body)?;
            println!("{}", out.display());
        }
        "paths" => {
            println!("Data directory: {}", paths.data_dir().display());
            println!("Experiment:     {}", config_path.display());
            println!("CSV download:   {}", paths.csv_download().display());
            println!("JSON download:  {}", paths.json_download().display());
            println!("Service URL:    {}", settings.base_url);
        }
        _ => usage(),
    }

    Ok(())
}
