use clap::Parser;
use cli::bidding_utils::init_tracing;
use engine::{generate_random_board, BidRequest, Engine, Role, SystemConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};
use types::io::identifier;
use types::{Auction, Board, Call};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bid random boards with the engine in all four seats and summarize the auctions"
)]
struct Args {
    /// Number of random boards to bid
    #[arg(short = 'n', long, default_value_t = 200)]
    count: usize,

    /// Random seed for reproducible runs (random if omitted, always printed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Bidding system file (YAML); the bundled standard system if omitted
    #[arg(long, env = "BIDDING_SYSTEM")]
    system: Option<PathBuf>,

    /// Print every auction, not just the summary
    #[arg(short, long)]
    verbose: bool,

    /// Max failing boards shown
    #[arg(long, default_value_t = 3)]
    examples: usize,
}

// ── types ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    boards: usize,
    calls: usize,
    passed_out: usize,
    games: usize,
    slams: usize,
    /// Calls selected per rule module.
    by_source: BTreeMap<String, usize>,
    /// Non-pass calls per role of the bidder.
    by_role: BTreeMap<String, usize>,
    failures: Vec<String>,
}

// ── board bidding ──────────────────────────────────────────────────────

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Opener => "Opening",
        Role::OpenerRebid => "Opener Rebid",
        Role::Responder => "Response",
        Role::Overcaller => "Overcall",
        Role::Advancer => "Advance",
    }
}

fn render_auction(auction: &Auction) -> String {
    auction
        .calls()
        .iter()
        .map(|c| c.render())
        .collect::<Vec<_>>()
        .join(" ")
}

fn bid_board(engine: &Engine, board: &Board, board_number: u32, tally: &mut Tally, verbose: bool) {
    tally.boards += 1;
    let mut auction = Auction::with_vulnerability(board.dealer, board.vulnerability);
    while !auction.is_finished() {
        let position = auction.current_player();
        let request = BidRequest::new(board.hand(position).clone(), auction.clone(), position);
        let role = engine.features(&request).role();
        let decision = match engine.decide(&request) {
            Ok(d) => d,
            Err(e) => {
                let id = identifier::export_board(board, board_number, Some(&auction));
                warn!(board = %id, error = %e, "decision failed");
                tally.failures.push(format!("{id}: {e}"));
                return;
            }
        };
        tally.calls += 1;
        *tally
            .by_source
            .entry(decision.source.unwrap_or("-").to_string())
            .or_default() += 1;
        if decision.call != Call::Pass {
            *tally.by_role.entry(role_name(role).to_string()).or_default() += 1;
        }
        if let Err(e) = auction.add_call(decision.call) {
            let id = identifier::export_board(board, board_number, Some(&auction));
            tally.failures.push(format!("{id}: {e}"));
            return;
        }
    }

    match auction.final_contract() {
        None => tally.passed_out += 1,
        Some(contract) if contract.is_slam() => tally.slams += 1,
        Some(contract) if contract.is_game() => tally.games += 1,
        Some(_) => {}
    }
    if verbose {
        println!(
            "{}: {}",
            identifier::export_board(board, board_number, None),
            render_auction(&auction)
        );
    }
}

// ── report ─────────────────────────────────────────────────────────────

fn pct(n: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * n as f64 / total as f64
    }
}

fn print_histogram(title: &str, counts: &BTreeMap<String, usize>) {
    let mut rows: Vec<_> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
    let total: usize = counts.values().sum();
    let max_count = rows.first().map(|(_, n)| **n).unwrap_or(1);
    let bar_width = 20;

    println!("{title}:");
    for (name, n) in rows {
        let bar_len = (n * bar_width / max_count).max(1);
        println!(
            "  {:<32} {:>5}  {:<20} ({:>4.1}%)",
            name,
            n,
            "\u{2588}".repeat(bar_len),
            pct(*n, total)
        );
    }
    println!();
}

fn report(seed: u64, tally: &Tally, examples: usize) {
    let finished = tally.boards - tally.failures.len();
    println!("Seed: {seed}");
    println!(
        "Boards: {} | Calls: {} | Failed: {}",
        tally.boards,
        tally.calls,
        tally.failures.len()
    );
    println!(
        "Passed out: {} ({:.1}%) | Games: {} ({:.1}%) | Slams: {} ({:.1}%)",
        tally.passed_out,
        pct(tally.passed_out, finished),
        tally.games,
        pct(tally.games, finished),
        tally.slams,
        pct(tally.slams, finished),
    );
    println!();
    print_histogram("Calls by source", &tally.by_source);
    print_histogram("Bids by role", &tally.by_role);

    if !tally.failures.is_empty() {
        println!("Failures:");
        for f in tally.failures.iter().take(examples) {
            println!("    {f}");
        }
        if tally.failures.len() > examples {
            println!("    ... and {} more", tally.failures.len() - examples);
        }
    }
}

// ── main ───────────────────────────────────────────────────────────────

fn main() {
    init_tracing();
    let args = Args::parse();

    let config = match &args.system {
        Some(path) => SystemConfig::from_path(path),
        None => SystemConfig::standard(),
    };
    let engine = match config.map_err(Into::into).and_then(Engine::new) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    eprintln!("Seed: {seed} | Boards: {}", args.count);
    info!(seed, count = args.count, modules = engine.registry().len(), "simulating");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tally = Tally::default();
    for i in 0..args.count {
        let n = rng.gen_range(1..=16);
        let board = generate_random_board(n, &mut rng);
        bid_board(&engine, &board, n, &mut tally, args.verbose);
        if !args.verbose {
            eprint!("\rProgress: {}/{}", i + 1, args.count);
        }
    }
    if !args.verbose {
        eprintln!("\r\x1b[K");
    }

    report(seed, &tally, args.examples);
    if !tally.failures.is_empty() {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_boards_all_finish() {
        let engine = Engine::standard().unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut tally = Tally::default();
        for n in 1..=16 {
            let board = generate_random_board(n, &mut rng);
            bid_board(&engine, &board, n, &mut tally, false);
        }
        assert_eq!(tally.boards, 16);
        assert!(tally.failures.is_empty(), "{:?}", tally.failures);
        assert!(tally.calls >= 16 * 4);
        assert_eq!(tally.by_source.values().sum::<usize>(), tally.calls);
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(1, 4), 25.0);
        assert_eq!(pct(3, 0), 0.0);
    }
}
