use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use spooky_chess::board::Board;
use spooky_chess::error::Error;
use spooky_chess::fen::STARTING_FEN;
use spooky_chess::perft::{perft, perft_divide};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Count perft nodes for a position, for timing and profiling move generation.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Position to search from.
    #[arg(long, default_value = STARTING_FEN)]
    fen: String,

    /// Plies to search.
    #[arg(long, default_value_t = 5)]
    depth: u32,

    /// Print the node count below each root move.
    #[arg(long)]
    divide: bool,
}

fn run(args: &Args) -> Result<u64, Error> {
    let board = Board::from_fen(&args.fen)?;
    info!(fen = %board.to_fen(), depth = args.depth, "starting perft");

    if args.divide {
        let counts = perft_divide(&board, args.depth)?;
        for (mv, nodes) in &counts {
            println!("{}: {}", mv, nodes);
        }
        Ok(counts.iter().map(|(_, nodes)| nodes).sum())
    } else {
        Ok(perft(&board, args.depth)?)
    }
}

#[hotpath::main]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let start = Instant::now();

    match run(&args) {
        Ok(nodes) => {
            let elapsed = start.elapsed();
            let nps = nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
            info!(nodes, ?elapsed, nps = nps as u64, "perft finished");
            println!("{}", nodes);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "perft failed");
            ExitCode::FAILURE
        }
    }
}
