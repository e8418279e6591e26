// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use saferoute::occurrence::{load_index, JsonRecordSource};
use saferoute::{
    EngineOptions, GeoJsonRenderer, GraphFormat, RouteRequest, RouteResponse, SafeRouter,
    Snapshot, DEFAULT_RENDER_CEILING, DEFAULT_STEP_LIMIT,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RouterArgs {
    /// The path to the road network (OSM XML or JSON graph, optionally compressed)
    #[arg(long, env = "SAFEROUTE_GRAPH")]
    graph: PathBuf,

    /// The path to the crime occurrence records (JSON array or JSON Lines, optionally compressed)
    #[arg(long, env = "SAFEROUTE_OCCURRENCES")]
    occurrences: Option<PathBuf>,

    /// Maximum number of nodes expanded by a single route search
    #[arg(long, env = "SAFEROUTE_STEP_LIMIT", default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,

    /// Excluded streets are only drawn on the map if there are fewer of them than this
    #[arg(long, env = "SAFEROUTE_RENDER_CEILING", default_value_t = DEFAULT_RENDER_CEILING)]
    render_ceiling: usize,

    /// Attach a GeoJSON map of the route to every response
    #[arg(long)]
    map: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Calculate a single route and print the response
    Route {
        #[command(flatten)]
        router: RouterArgs,

        /// Name of the street where the route starts
        origin: String,

        /// Name of the street where the route ends
        destination: String,

        /// Streets with more recorded occurrences than this are avoided
        max_crime_occurrences: u64,
    },

    /// Read route requests as JSON Lines from stdin and print one response per line
    Batch {
        #[command(flatten)]
        router: RouterArgs,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    match Cli::parse().command {
        Command::Route {
            router,
            origin,
            destination,
            max_crime_occurrences,
        } => {
            let router = build_router(&router)?;
            let response = router.calculate_route(&RouteRequest {
                origin_street: origin,
                destination_street: destination,
                max_crime_occurrences,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Batch { router } => {
            let router = build_router(&router)?;
            let mut lines = io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?;
            lines.retain(|line| !line.trim().is_empty());

            let responses: Vec<RouteResponse> = lines
                .par_iter()
                .map(|line| handle_line(&router, line))
                .collect();

            let mut out = io::stdout().lock();
            for response in &responses {
                serde_json::to_writer(&mut out, response)?;
                out.write_all(b"\n")?;
            }
            out.flush()?;
        }
    }

    Ok(())
}

fn build_router(args: &RouterArgs) -> Result<SafeRouter, Box<dyn Error>> {
    let graph = saferoute::load_graph(&args.graph, GraphFormat::Auto)?;

    let index = match &args.occurrences {
        Some(path) => load_index(&JsonRecordSource::new(path)),
        None => {
            log::warn!("no occurrence records given - every street counts as safe");
            Default::default()
        }
    };

    let options = EngineOptions {
        step_limit: args.step_limit,
        render_ceiling: args.render_ceiling,
    };
    let router = SafeRouter::new(Snapshot::new(graph, index), options);
    Ok(if args.map {
        router.with_renderer(GeoJsonRenderer)
    } else {
        router
    })
}

fn handle_line(router: &SafeRouter, line: &str) -> RouteResponse {
    match serde_json::from_str::<RouteRequest>(line) {
        Ok(request) => router.calculate_route(&request),
        Err(e) => RouteResponse::error(format!("invalid request: {}", e)),
    }
}
