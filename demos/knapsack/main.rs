// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This example shows how to solve a knapsack instance read from file with
//! any of the three explorers. Set `RUST_LOG=debug` (or `trace`) to watch
//! the search progress.

use std::time::Instant;

use clap::{Parser, ValueEnum};
use knapsack_bnb::{run, Concurrency, SearchConfigBuilder};
use tracing_subscriber::EnvFilter;

use crate::io_utils::read_instance;

mod io_utils;

/// The explorer used to solve the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExplorerKind {
    Sequential,
    Parallel,
    Distributed,
}

/// This structure uses `clap-derive` annotations and define the arguments that can
/// be passed on to the executable solver.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the instance file
    fname: String,
    /// The explorer to use
    #[clap(short, long, value_enum, default_value = "sequential")]
    explorer: ExplorerKind,
    /// The number of worker threads of the parallel explorer (defaults to
    /// the number of hardware threads)
    #[clap(short, long)]
    threads: Option<usize>,
    /// The number of ranks of the distributed explorer
    #[clap(short, long, default_value = "4")]
    ranks: usize,
    /// Enumerate every feasible node instead of pruning the hopeless ones
    #[clap(long)]
    no_pruning: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let instance = match read_instance(&args.fname) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("could not read {}: {}", args.fname, e);
            std::process::exit(1);
        }
    };

    let concurrency = match args.explorer {
        ExplorerKind::Sequential  => Concurrency::Sequential,
        ExplorerKind::Parallel    => Concurrency::Parallel,
        ExplorerKind::Distributed => Concurrency::Distributed { ranks: args.ranks },
    };
    let mut builder = SearchConfigBuilder::default();
    builder.concurrency(concurrency).pruning(!args.no_pruning);
    if let Some(threads) = args.threads {
        builder.nb_threads(threads);
    }
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let outcome = match run(&instance.items, instance.capacity, &config) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("search failed: {}", e);
            std::process::exit(1);
        }
    };
    let duration = start.elapsed();

    println!("Duration:   {:.3} seconds", duration.as_secs_f32());
    println!("Objective:  {}",            outcome.optimal_value);
    println!("Weight:     {} / {}",       outcome.total_weight(), instance.capacity);
    println!("Explored:   {}",            outcome.statistics.explored);
    println!("Pruned:     {}",            outcome.statistics.pruned);
    println!("Selected:");
    for item in outcome.selected.iter() {
        println!("  #{:<6} value {:>10} weight {:>10}", item.id, item.value, item.weight);
    }
}
