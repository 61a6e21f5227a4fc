#![cfg(not(tarpaulin_include))]

use genealogy::config::{Config, OutputFormat};
use genealogy::downloader::{to_csv, to_json};
use genealogy::loader::{load_cells, load_snapshot};
use genealogy::saving::save_snapshot;
use genealogy::{
    ExpansionState, HierarchyRenderer, PyramidRenderer, Result, SummaryRenderer, TextTreeRenderer,
    build, inspect,
};
use log::info;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "genealogy".to_string());

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", Config::usage(&program));
            return ExitCode::from(2);
        }
    };

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&config) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("could not build network view: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<String> {
    let mut snapshot = load_snapshot(&config.input)?;
    if let Some(cells) = &config.cells {
        snapshot.cells = load_cells(cells)?;
    }
    info!(
        "loaded {} people and {} cells from {}",
        snapshot.people.len(),
        snapshot.cells.len(),
        config.input.display()
    );

    if let Some(cache) = &config.cache {
        save_snapshot(&snapshot, cache)?;
        info!("snapshot cached at {}", cache.display());
    }

    let people = snapshot.denormalized_people();
    let report = inspect(&people, config.mode);
    report.log_warnings();

    let view = build(&people, config.mode);

    let mut expanded: ExpansionState = config.expand.iter().cloned().collect();
    if config.expand_all {
        expanded.expand_all(&view);
    }

    let output = match config.format {
        OutputFormat::Tree => TextTreeRenderer::default().render(&view, &expanded),
        OutputFormat::Pyramid => PyramidRenderer.render(&view, &expanded),
        OutputFormat::Summary => SummaryRenderer { top: config.top }.render(&view, &expanded),
        OutputFormat::Csv => to_csv(&view),
        OutputFormat::Json => {
            let mut json = to_json(&view, Some(&report))?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}
