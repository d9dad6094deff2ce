//! # Bendline CLI
//!
//! Terminal front-end for the profile digitizer. Useful for scripting,
//! regression checks and feeding geometry to document generators without a
//! window:
//!
//! - `snap` - project a single point around an anchor
//! - `replay` - run a JSON input script through a digitizer instance
//! - `export` - turn a saved profile document into a geometry model
//!
//! All results are printed as JSON on stdout. Set `RUST_LOG=debug` to trace
//! the digitizer's state transitions on stderr.

mod script;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use profile_core::config::DigitizerConfig;
use profile_core::document::{load_document, save_document, ProfileDocument};
use profile_core::export::{export, GeometryModel};
use profile_core::geometry::{Point, Segment};
use profile_core::render::{CanvasSize, DrawCommand, Renderer};
use profile_core::snap;

#[derive(Parser, Debug)]
#[command(name = "profile_cli")]
#[command(version, about = "Sheet-metal profile digitizer (scripted)")]
struct Cli {
    /// TOML configuration file (render style, export tick layout)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Snap a raw point around an anchor onto the nearest canonical direction
    Snap {
        /// Anchor as `x,y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        anchor: Point,
        /// Raw pointer position as `x,y`
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        point: Point,
    },

    /// Replay a JSON input script and print the resulting profile
    Replay {
        /// Script file (JSON array of steps)
        script: PathBuf,
        /// Save the resulting profile document here
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
        /// Document name used when saving
        #[arg(long, default_value = "Untitled")]
        name: String,
        /// Also print the draw commands for a canvas of this size (`WxH`)
        #[arg(long, value_parser = parse_size)]
        canvas: Option<CanvasSize>,
    },

    /// Export a saved profile document as a geometry model
    Export {
        /// Profile document (JSON)
        document: PathBuf,
        /// Comma-separated true lengths, overriding the ones in the document
        #[arg(long, value_delimiter = ',')]
        lengths: Option<Vec<f64>>,
    },
}

#[derive(Serialize)]
struct SnapOutput {
    anchor: Point,
    raw: Point,
    snapped: Point,
    angle_deg: f64,
    length: f64,
}

#[derive(Serialize)]
struct ReplayOutput {
    segments: Vec<Segment>,
    anchor: Option<Point>,
    drawing_state: profile_core::DrawingState,
    notifications: usize,
    geometry: GeometryModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    draw_commands: Option<Vec<DrawCommand>>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DigitizerConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Command::Snap { anchor, point } => {
            let snapped = snap::project(anchor, point);
            let segment = Segment::between(anchor, snapped);
            print_json(&SnapOutput {
                anchor,
                raw: point,
                snapped,
                angle_deg: segment.angle_deg(),
                length: segment.length(),
            })
        }
        Command::Replay {
            script,
            save,
            name,
            canvas,
        } => {
            let source = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            let steps = script::parse_script(&source)
                .with_context(|| format!("invalid script {}", script.display()))?;

            let run = script::run_script(&steps, ProfileDocument::new(name));
            info!(
                "replayed {} step(s): {} segment(s), {} notification(s)",
                steps.len(),
                run.tracker.segments().len(),
                run.notifications
            );

            if let Some(path) = save {
                save_document(&run.document, &path)
                    .with_context(|| format!("failed to save {}", path.display()))?;
                info!("saved profile to {}", path.display());
            }

            let draw_commands = canvas.map(|size| {
                let mut renderer = Renderer::new(config.render.clone());
                renderer.resize(size);
                renderer.commands(&run.tracker)
            });

            print_json(&ReplayOutput {
                segments: run.tracker.segments().to_vec(),
                anchor: run.tracker.anchor(),
                drawing_state: run.tracker.drawing_state(),
                notifications: run.notifications,
                geometry: export(run.tracker.segments(), None, &config.export)?,
                draw_commands,
            })
        }
        Command::Export { document, lengths } => {
            let mut doc = load_document(&document)
                .with_context(|| format!("failed to load {}", document.display()))?;
            if lengths.is_some() {
                doc.set_true_lengths(lengths);
            }
            if !doc.true_lengths_aligned() {
                bail!(
                    "{}: true lengths do not match the {} segment(s)",
                    document.display(),
                    doc.segments.len()
                );
            }
            print_json(&doc.geometry(&config.export)?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate `{}`: {}", v, e))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn parse_size(s: &str) -> Result<CanvasSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected `WxH`, got `{}`", s))?;
    let dim = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad dimension `{}`: {}", v, e))
    };
    Ok(CanvasSize::new(dim(w)?, dim(h)?))
}
