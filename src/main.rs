use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueHint};
use serde_json::Value;
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use trace_visualizer::models::datasets::traces::DisplayNode;
use trace_visualizer::runner::RunnerClient;
use trace_visualizer::runner::catalog::TestCatalog;
use trace_visualizer::storage::history::TraceHistory;
use trace_visualizer::utils::load_config;
use trace_visualizer::visualizer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML config file
    #[clap(long, short, value_hint = ValueHint::FilePath, default_value = "config.yml")]
    config: PathBuf,
    /// Write the display tree to this file instead of stdout
    #[clap(long, short, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a trace saved as JSON (frame list, single frame, or `{"trace": [...]}`)
    Render {
        #[clap(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// List the tests the runner knows about
    Tests,
    /// Run one test on the runner and render its last run
    Run { src: String, test: String },
    /// Compile (or with `--load`, load already compiled) sources, then list tests
    Compile {
        #[clap(long)]
        src_dir: Option<String>,
        #[clap(long)]
        load: bool,
    },
    /// Simulate a mined transaction and render its trace
    Sim { hash: String },
    /// Render a stored trace, or list stored labels when none is given
    History { label: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the rendered tree can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => {
            info!("Config loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load config: {}", e);
            return Err(anyhow!(e));
        }
    };

    match args.command {
        Command::Render { path } => {
            let contents = fs::read_to_string(&path)?;
            let trace: Value = serde_json::from_str(&contents)?;
            let tree = visualizer::visualize(trace, &config.style)?;
            emit(&tree, args.output.as_ref())
        }
        Command::Tests => {
            let client = RunnerClient::new(&config)?;
            print_catalog(&client.list_tests().await?);
            Ok(())
        }
        Command::Run { src, test } => {
            let client = RunnerClient::new(&config)?;
            let catalog = client.list_tests().await?;
            let test = catalog.resolve(&src, &test)?;
            let runs = client.run_test(&test).await?;

            let mut history = TraceHistory::load(config.history_path())?;
            for run in &runs {
                history.record(run);
            }
            history.save()?;

            let last = runs
                .last()
                .ok_or_else(|| anyhow!("Runner returned no runs"))?;
            info!("Rendering run {}", last.label);
            let tree = visualizer::visualize(last.trace.clone(), &config.style)?;
            emit(&tree, args.output.as_ref())
        }
        Command::Compile { src_dir, load } => {
            let src_dir = src_dir
                .or_else(|| config.src_dir.clone())
                .ok_or_else(|| anyhow!("No source directory given and none configured"))?;
            let client = RunnerClient::new(&config)?;
            let catalog = if load {
                client.load_compiled(&src_dir).await?
            } else {
                client.compile(&src_dir).await?
            };
            print_catalog(&catalog);
            Ok(())
        }
        Command::Sim { hash } => {
            let client = RunnerClient::new(&config)?;
            let run = client.simulate(&hash).await?;

            let mut history = TraceHistory::load(config.history_path())?;
            history.record(&run);
            history.save()?;

            let tree = visualizer::visualize(run.trace, &config.style)?;
            emit(&tree, args.output.as_ref())
        }
        Command::History { label } => {
            let history = TraceHistory::load(config.history_path())?;
            match label {
                Some(label) => {
                    let trace = history.get(&label)?.clone();
                    let tree = visualizer::visualize(trace, &config.style)?;
                    emit(&tree, args.output.as_ref())
                }
                None => {
                    for label in history.labels() {
                        println!("{}", label);
                    }
                    Ok(())
                }
            }
        }
    }
}

fn emit(tree: &DisplayNode, output: Option<&PathBuf>) -> Result<()> {
    let rendered = serde_json::to_string_pretty(tree)?;
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!("Display tree written to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn print_catalog(catalog: &TestCatalog) {
    if catalog.is_empty() {
        info!("No tests found");
        return;
    }
    for source in catalog.sources() {
        println!("{}", source.label);
        for test in catalog.tests_for(&source.full) {
            println!("  {}", test);
        }
    }
}
