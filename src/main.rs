//! Future City - Entry Point
//!
//! Terminal console for the city planner. Free text goes to the planner,
//! everything else drives the headless map view.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use tokio::runtime::Runtime;

use future_city::core::config::AppConfig;
use future_city::core::error::Result;
use future_city::core::types::LatLng;
use future_city::game::scores::{ScoreBoard, LEADERBOARD_SIZE};
use future_city::game::GameSession;
use future_city::llm::client::LlmClient;
use future_city::render::format::{
    compass_point, format_compact, format_compact_yen, format_money, group_thousands,
};
use future_city::render::RecordingSink;
use future_city::simulation::{MapView, StepReport, VisitorState};

#[derive(Parser, Debug)]
#[command(name = "future-city", about = "Chat-driven city planning console")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the high-score file is stored in
    #[arg(long)]
    scores_dir: Option<PathBuf>,

    /// Seed for the visitor simulation
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "future_city=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = args.scores_dir {
        config.storage.scores_dir = dir;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    tracing::info!(city = %config.city.name, "Future City starting...");

    // Runtime for planner calls
    let rt = Runtime::new()?;

    let llm_client = match LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "planner enabled");
            Some(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "running without the planner");
            None
        }
    };

    let mut session = GameSession::new(config.city.clone(), ScoreBoard::load(&config.storage))?;
    let mut view = MapView::mount(RecordingSink::new(), &config);
    view.set_items(session.items());

    let frame_ms = config.motion.frame_interval_ms as f64;
    let mut now_ms = 0.0;

    println!("\n=== FUTURE CITY: {} ===", config.city.name);
    println!("Grow the city to {} residents.", group_thousands(config.city.population_goal));
    println!();
    println!("Commands:");
    println!("  tick / t          - Advance the map by one frame");
    println!("  run <n>           - Advance the map by n frames");
    println!("  status / s        - Show city totals and visitors");
    println!("  items / i         - List places on the map");
    println!("  visitors / v      - List visitors and where they are headed");
    println!("  scores            - Show the leaderboard");
    println!("  register <name>   - Register the current population as a score");
    println!("  restart           - Start over with the initial map");
    println!("  quit / q          - Exit");
    if llm_client.is_some() {
        println!("  <any text>        - Ask the planner to change the map");
    }
    println!();

    loop {
        print!("[{} turns left] > ", session.remaining_turns());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        match input {
            "quit" | "q" => break,
            "tick" | "t" => {
                now_ms += frame_ms;
                let report = view.tick(now_ms);
                print_step(&report);
                continue;
            }
            "status" | "s" => {
                display_status(&session, &view);
                continue;
            }
            "items" | "i" => {
                display_items(&session, config.city.center);
                continue;
            }
            "visitors" | "v" => {
                display_visitors(&view);
                continue;
            }
            "scores" => {
                display_scores(&session);
                continue;
            }
            "restart" => {
                session.restart();
                view.set_items(session.items());
                println!("Map restored to its initial state.");
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("run ") {
            match rest.trim().parse::<u32>() {
                Ok(n) => {
                    let mut total = StepReport::default();
                    for _ in 0..n {
                        now_ms += frame_ms;
                        let report = view.tick(now_ms);
                        total.moved += report.moved;
                        total.arrived += report.arrived;
                        total.fidgets_started += report.fidgets_started;
                        total.fidgets_ended += report.fidgets_ended;
                    }
                    println!("Ran {} frames.", n);
                    print_step(&total);
                }
                Err(_) => println!("Usage: run <number>"),
            }
            continue;
        }

        if let Some(name) = input.strip_prefix("register ") {
            let name = name.trim();
            if name.is_empty() {
                println!("Usage: register <name>");
            } else {
                match session.register_score(name) {
                    Ok(entry) => println!(
                        "Registered {} with {} residents.",
                        entry.name,
                        group_thousands(entry.score)
                    ),
                    Err(e) => println!("Could not save score: {}", e),
                }
            }
            continue;
        }

        let Some(client) = &llm_client else {
            println!(
                "Unknown command. Available: tick, run <n>, status, items, visitors, scores, \
                 register <name>, restart, quit"
            );
            continue;
        };

        if session.is_game_over() {
            println!("No turns left. Register your score or restart.");
            continue;
        }

        match rt.block_on(session.send_message(client, input)) {
            Some(turn) => {
                println!();
                println!("Planner: {}", turn.reply);
                if turn.added + turn.removed + turn.updated > 0 {
                    println!(
                        "  (+{} added, -{} removed, {} updated)",
                        turn.added, turn.removed, turn.updated
                    );
                }
                let reconcile = view.set_items(session.items());
                tracing::debug!(?reconcile, "map reconciled after turn");
                if let Some(delta) = session.population_delta(Instant::now()) {
                    println!("  Population {:+}", delta);
                }
                if turn.game_over {
                    println!();
                    println!("=== GAME OVER ===");
                    display_status(&session, &view);
                    println!("Use 'register <name>' to save your score or 'restart' to play again.");
                }
            }
            None => println!("Message not sent."),
        }
    }

    let stats = session.stats();
    println!(
        "\nGoodbye! Final population: {} ({:.1}% of goal).",
        group_thousands(stats.population),
        stats.progress_percent
    );
    Ok(())
}

fn print_step(report: &StepReport) {
    println!(
        "moved {}, arrived {}, fidgets +{} / -{}",
        report.moved, report.arrived, report.fidgets_started, report.fidgets_ended
    );
}

fn display_status(session: &GameSession, view: &MapView<RecordingSink>) {
    let stats = session.stats();
    let visitors = &view.state().visitors;

    println!();
    println!("=== CITY STATUS ===");
    println!(
        "Population: {} ({})  Goal: {:.1}%",
        group_thousands(stats.population),
        format_compact(stats.population),
        stats.progress_percent
    );
    println!("Tax revenue: {}", format_compact_yen(stats.tax_revenue));
    if let Some(city) = session.closest_city_by_population() {
        println!("  Population is like {} {} ({})", city.emoji, city.name_ja, city.country);
    }
    if let Some(city) = session.closest_city_by_tax_revenue() {
        println!("  Tax revenue is like {} {} ({})", city.emoji, city.name_ja, city.country);
    }
    println!(
        "Places: {}  Markers: {}  Visitors: {} walking / {} arrived",
        session.items().len(),
        view.state().markers.len(),
        visitors.count_in_state(VisitorState::Walking),
        visitors.count_in_state(VisitorState::Arrived),
    );
    println!("Turns left: {}", session.remaining_turns());
    println!();
}

fn display_items(session: &GameSession, center: LatLng) {
    println!();
    for item in session.items() {
        let position = item.position();
        print!(
            "  {} {} [{}] {:.1} km {}",
            item.emoji,
            item.name,
            item.category.as_str(),
            center.distance_meters(&position) / 1000.0,
            compass_point(center.bearing_to(&position)),
        );
        if let Some(population) = item.population {
            print!(" pop {:+}", population);
        }
        if let Some(tax) = item.tax_revenue {
            print!(" tax {}", format_money(tax));
        }
        println!();
    }
    println!();
}

fn display_visitors(view: &MapView<RecordingSink>) {
    println!();
    for visitor in view.state().visitors.iter() {
        let state = match visitor.state() {
            VisitorState::Walking => "walking",
            VisitorState::Arrived if visitor.is_fidgeting() => "fidgeting",
            VisitorState::Arrived => "arrived",
        };
        println!(
            "  {} {} -> {} {:>9} {:.0} m",
            visitor.glyph(),
            visitor.color().to_hex(),
            visitor.target_id(),
            state,
            visitor.position().distance_meters(&visitor.target()),
        );
    }
    println!();
}

fn display_scores(session: &GameSession) {
    let top = session.scores().top(LEADERBOARD_SIZE);
    if top.is_empty() {
        println!("No scores yet.");
        return;
    }
    println!();
    println!("=== HIGH SCORES ===");
    for (rank, score) in top.iter().enumerate() {
        println!(
            "  {}. {:<16} {:>12}  {}",
            rank + 1,
            score.name,
            group_thousands(score.score),
            score.date
        );
    }
    println!();
}
