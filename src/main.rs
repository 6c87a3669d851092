//! Headless chart driver.
//!
//! Loads candles from a JSON API response or a CSV file, applies indicators
//! and prints the resulting pane layout.
//!
//! Usage: charter-cli <candles.json|candles.csv> [--indicator SPEC]... [options]

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use charter::{ChartSession, HeadlessSurface, SeriesData};
use charter_config::Config;
use charter_core::{SeriesKey, Timeframe};
use charter_data::{CsvLoader, DataSource, JsonLoader};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <candles.json|candles.csv> [options]", program);
    eprintln!("Options:");
    eprintln!("  --indicator SPEC   add an indicator, e.g. sma:20, ema:9, rsi, macd, vwap, volume");
    eprintln!("  --config PATH      config file (default: ./config.toml, then user config dir)");
    eprintln!("  --symbol NAME      symbol for CSV input (default from config)");
    eprintln!("  --timeframe TF     timeframe label (default from config)");
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let data_path = Path::new(&args[1]);
    let mut indicators = Vec::new();
    let mut config_path = None;
    let mut symbol = None;
    let mut timeframe = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--indicator" if i + 1 < args.len() => {
                indicators.push(args[i + 1].clone());
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--symbol" if i + 1 < args.len() => {
                symbol = Some(args[i + 1].clone());
                i += 2;
            }
            "--timeframe" if i + 1 < args.len() => {
                let tf: Timeframe = args[i + 1].parse().map_err(anyhow::Error::msg)?;
                timeframe = Some(tf);
                i += 2;
            }
            other => bail!("unexpected argument {other:?}"),
        }
    }

    let config = match config_path {
        Some(path) => Config::load(&path).with_context(|| format!("loading config {path}"))?,
        None => Config::load_default(),
    };

    let extension = data_path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let (ticker, candles) = match extension {
        "json" => {
            let response = JsonLoader::new(data_path).load_response()?;
            (response.ticker, response.candles)
        }
        "csv" => {
            let candles = CsvLoader::new(data_path).load()?;
            let ticker = symbol.clone().unwrap_or_else(|| config.general.default_symbol.clone());
            (ticker, candles)
        }
        _ => bail!("unsupported input {}: expected .json or .csv", data_path.display()),
    };

    let key = SeriesKey::new(
        symbol.unwrap_or(ticker),
        timeframe.unwrap_or(config.general.default_timeframe),
    );

    let mut session = ChartSession::new(HeadlessSurface::new(), &config)?;
    session.set_on_color_assigned(Box::new(|id, color| log::info!("{} drawn in {}", id, color)));
    session.load_series(key.clone(), candles)?;

    for spec in &indicators {
        session
            .add_indicator_str(spec)
            .with_context(|| format!("adding indicator {spec:?}"))?;
    }

    println!("{} ({} candles)", key, session.candles().len());
    if let Some(last) = session.candles().last() {
        if let Some(readout) = session.crosshair(last.time) {
            let change = readout
                .change_pct
                .map(|c| format!("{c:+.2}%"))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "last: O {:.2} H {:.2} L {:.2} C {:.2} ({})",
                readout.open, readout.high, readout.low, readout.close, change
            );
        }
    }

    let surface = session.surface();
    for pane in surface.pane_ids() {
        let Some(state) = surface.pane(pane) else { continue };
        let axis = if state.time_axis_visible { ", time axis" } else { "" };
        println!("pane {} {:?} {:?}{}", pane.0, state.config.role, state.config.title, axis);
        for series in surface.series_on(pane) {
            let Some(series) = surface.series(series) else { continue };
            let last = match &series.data {
                SeriesData::Candles(c) => c.last().map(|c| c.close),
                SeriesData::Line(p) | SeriesData::Histogram(p) => p.last().map(|p| p.value),
            };
            let last = last.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<16} {:>6} points, last {}",
                series.config.title,
                series.data.len(),
                last
            );
        }
    }

    for instance in session.registry().iter() {
        let color = instance
            .color
            .map(|c| c.to_string())
            .unwrap_or_else(|| "fixed".to_string());
        println!("{} {} {}", instance.id, instance.spec.label(), color);
    }

    Ok(())
}
