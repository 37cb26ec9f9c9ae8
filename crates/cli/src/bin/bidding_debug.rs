use clap::Parser;
use cli::bidding_utils::*;
use engine::{BidRequest, Engine, SystemConfig};
use std::path::PathBuf;
use types::io::identifier;
use types::{Auction, Board};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bid a board with the engine and explain each call", long_about = None)]
struct Args {
    /// The board identifier (e.g. 11-decde22e0d283f55b36244ab45:1H,P)
    identifier: Option<String>,

    /// Optional call number to show the full trace for
    #[arg(short, long)]
    call: Option<usize>,

    /// A test case string in JSON format: '["Hand", "ExpectedBid", "Auction"?, "Vulnerability"?]'
    #[arg(short, long)]
    test_case: Option<String>,

    /// Bidding system file (YAML); the bundled standard system if omitted
    #[arg(short, long, env = "BIDDING_SYSTEM")]
    system: Option<PathBuf>,

    /// Print decision traces as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Dump the effective system configuration as YAML and exit
    #[arg(long)]
    show_system: bool,
}

fn load_engine(args: &Args) -> Result<Engine, String> {
    let config = match &args.system {
        Some(path) => SystemConfig::from_path(path),
        None => SystemConfig::standard(),
    }
    .map_err(|e| format!("Error: {e}"))?;
    Engine::new(config).map_err(|e| format!("Error: {e}"))
}

fn print_trace(args: &Args, idx: usize, trace: &engine::DecisionTrace) {
    if args.json {
        match serde_json::to_string_pretty(trace) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    } else {
        print!("{}", format_full_trace(idx, trace));
    }
}

/// Decide one call for the test case's hand and compare it to the expectation.
fn run_test_case(engine: &Engine, args: &Args, json: &str) -> Result<(), String> {
    let case = parse_test_case(json)?;
    println!("Test Case: {json}");
    println!(
        "Dealer: {:?}  Vulnerability: {:?}",
        case.auction.dealer, case.auction.vulnerability
    );
    println!();
    print!("{}", format_table_header());
    let mut idx = replay_history(&case.auction);

    let request = BidRequest::for_current_player(case.hand, case.auction);
    let position = request.position;
    let (result, trace) = engine.decide_with_trace(&request);
    idx += 1;
    if args.call.map_or(true, |n| n == idx) {
        print_trace(args, idx, &trace);
    }
    let decision = result.map_err(|e| format!("Error: {e}"))?;
    println!("{}", format_decision_row(idx, position, &decision));

    if let Some(expected) = case.expected {
        println!("EXPECTED: {}", expected.render());
        if decision.call == expected {
            println!("RESULT: MATCH");
        } else {
            println!("RESULT: MISMATCH");
        }
    }
    Ok(())
}

/// Print the calls already made, returning how many there were.
fn replay_history(auction: &Auction) -> usize {
    for (idx, (pos, call)) in auction.iter().enumerate() {
        println!("{}", format_row(idx + 1, pos, &call.render(), "", "(History)"));
    }
    auction.len()
}

/// Bid the rest of a board, every seat played by the engine.
fn run_board(
    engine: &Engine,
    args: &Args,
    board: &Board,
    mut auction: Auction,
) -> Result<(), String> {
    println!("Dealer: {:?}", board.dealer);
    println!("Vulnerability: {:?}", board.vulnerability);
    println!("\nHands:");
    print!("{}", format_hands_table(board));
    println!();
    print!("{}", format_table_header());

    let mut idx = replay_history(&auction);
    while !auction.is_finished() {
        let position = auction.current_player();
        let request = BidRequest::new(board.hand(position).clone(), auction.clone(), position);
        let (result, trace) = engine.decide_with_trace(&request);
        idx += 1;
        if args.call == Some(idx) {
            print_trace(args, idx, &trace);
        }
        let decision = result.map_err(|e| format!("Error at call {idx}: {e}"))?;
        println!("{}", format_decision_row(idx, position, &decision));
        auction.add_call(decision.call).map_err(|e| format!("Error: {e}"))?;
    }

    match auction.final_contract() {
        Some(contract) => println!("\nContract: {contract:?}"),
        None => println!("\nPassed out"),
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), String> {
    let engine = load_engine(args)?;
    if args.show_system {
        let yaml = serde_yaml::to_string(engine.config()).map_err(|e| format!("Error: {e}"))?;
        print!("{yaml}");
        return Ok(());
    }

    if let Some(json) = &args.test_case {
        return run_test_case(&engine, args, json);
    }
    let Some(id) = &args.identifier else {
        return Err("Error: Must provide either an identifier or a --test-case.".to_string());
    };
    let (board, auction) =
        identifier::import_board(id).map_err(|e| format!("Error: Invalid identifier: {e}"))?;
    println!("Board: {id}");
    let auction =
        auction.unwrap_or_else(|| Auction::with_vulnerability(board.dealer, board.vulnerability));
    run_board(&engine, args, &board, auction)
}

fn main() {
    init_tracing();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
