//! Load a text network, print it, and optionally query it interactively.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use pert_network::logging::parse_verbosity;
use pert_network::shell::{render_network, Session, HELP};
use pert_network::{Network, NetworkConfig};

#[derive(Parser, Debug)]
#[command(name = "pert", about = "PERT/CPM analysis of activity-on-arc networks")]
struct Args {
    /// Network file: initial time, terminal time, then `trigger completion duration` lines
    network: PathBuf,

    /// Read commands from stdin after printing the network
    #[arg(short, long)]
    interactive: bool,

    /// Print the critical path after the summary
    #[arg(short, long)]
    critical: bool,

    /// Diagnostics on stderr: 0-3 or silent, changes, checks, debug
    #[arg(short, long, default_value_t = 0, value_parser = parse_verbosity)]
    verbosity: u8,

    /// Fail path enumeration beyond this many paths
    #[arg(long)]
    path_limit: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let text = match fs::read_to_string(&args.network) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Cannot read {}: {}", args.network.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let config = NetworkConfig {
        verbosity: args.verbosity,
        path_limit: args.path_limit,
    };
    let network: Network<i64, i64> = match Network::from_txt_with_config(&text, config) {
        Ok(network) => network,
        Err(err) => {
            eprintln!("{}: {}", args.network.display(), err);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", render_network(&network));

    let session = Session::new(network);
    if args.critical {
        if let pert_network::shell::Reply::Output(text) = session.handle_line("critical_path") {
            println!("{}\n", text);
        }
    }

    if args.interactive {
        println!("{}\n", HELP);
        let stdin = io::stdin();
        if let Err(err) = session.run(stdin.lock(), io::stdout()) {
            eprintln!("I/O error: {}", err);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
