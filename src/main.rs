//! Ortho Router CLI
//!
//! Usage:
//!   ortho-router [OPTIONS] [FILE]
//!
//! Reads a routing scenario in TOML from a file or stdin and prints the
//! computed waypoints, one `x,y` pair per line.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use ortho_router::{route, EdgeStyle, EdgeStyleKind, Point, RouteRequest, TerminalRef};

#[derive(Parser)]
#[command(name = "ortho-router")]
#[command(about = "Orthogonal edge routing for diagram layouts")]
struct Cli {
    /// Scenario file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Edge style file (TOML format), replaces the scenario's style table
    #[arg(short, long)]
    style: Option<PathBuf>,
}

/// One routing scenario: a strategy, two terminals and optional hints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Scenario {
    kind: EdgeStyleKind,

    #[serde(default = "default_scale")]
    scale: f64,

    #[serde(default)]
    style: EdgeStyle,

    source: Option<TerminalRef>,
    target: Option<TerminalRef>,

    #[serde(default)]
    hints: Vec<Point>,
}

fn default_scale() -> f64 {
    1.0
}

fn main() {
    let cli = Cli::parse();

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut scenario: Scenario = match toml::from_str(&source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing scenario: {}", e);
            std::process::exit(1);
        }
    };

    // Load style override
    if let Some(path) = &cli.style {
        scenario.style = match EdgeStyle::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading style '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        };
    }

    let request = RouteRequest::new(
        &scenario.style,
        scenario.scale,
        scenario.source.as_ref(),
        scenario.target.as_ref(),
        &scenario.hints,
    );

    let mut waypoints = Vec::new();
    route(scenario.kind, &request, &mut waypoints);

    for p in &waypoints {
        println!("{},{}", p.x, p.y);
    }
}

fn print_intro() {
    println!(
        r#"Ortho Router - Orthogonal edge routing for diagram layouts

USAGE:
    ortho-router [OPTIONS] [FILE]
    cat scenario.toml | ortho-router

OPTIONS:
    -s, --style    Edge style file (TOML), replaces the scenario's style
    -h, --help     Print help

SCENARIO FORMAT (TOML):
    kind = "orthogonal"        # elbow | side-to-side | top-to-bottom |
                               # entity-relation | loop | segment | orthogonal
    scale = 1.0

    [source.fixed]
    bounds = {{ x = 0.0, y = 0.0, width = 100.0, height = 40.0 }}

    [target.floating]
    x = 300.0
    y = 220.0

    # hints = [{{ x = 150.0, y = 20.0 }}]
    # [style]
    # segment = 30.0

The computed waypoints are printed one 'x,y' pair per line; an edge that
cannot be routed prints nothing."#
    );
}
