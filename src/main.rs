//! NoirGuess CLI
//!
//! Usage:
//!   noirguess                         # Interactive session
//!   noirguess --serve                 # HTTP API server
//!   noirguess --json                  # JSON view after every event
//!   noirguess --data-dir ~/.noirguess # Where the profile file lives

use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use noirguess::core::{run_server, JsonFileStore, PlaceholderImages, SessionEngine, SongLibrary};
use noirguess::types::{Feedback, FeedbackKind, GameMode, Phase, SessionView};
use noirguess::VERSION;

type CliEngine = SessionEngine<SongLibrary, PlaceholderImages, JsonFileStore>;

#[derive(Parser, Debug)]
#[command(
    name = "noirguess",
    version = VERSION,
    about = "NoirGuess - a noir-flavored song guessing game",
    long_about = "NoirGuess runs a single-player trivia session: guess the song\n\
                  from cryptic clues, earn XP, climb levels and ranks.\n\n\
                  Commands inside a session:\n  \
                  <text>         Submit a guess\n  \
                  /play [mode]   Start a session (solo, group, knockout, ladder)\n  \
                  /start         Start the game from a lobby\n  \
                  /clue          Reveal the next clue for free\n  \
                  /hint          Buy the next clue for 50 XP\n  \
                  /skip          Give up on the current song (-25 XP)\n  \
                  /next          Continue after a reveal or level-up\n  \
                  /menu          Abandon the round back to the menu\n  \
                  /profile       Show the saved profile\n  \
                  /save <name>   Persist progress under a username\n  \
                  /clear         Delete the saved profile\n  \
                  /status        Show the current session state\n  \
                  /quit          Exit"
)]
struct Args {
    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address (default: 127.0.0.1:3000)
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,

    /// Output the full session view as JSON after every event
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Directory for the profile file (default: ./data)
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    if args.serve {
        run_serve(&args).await;
    } else {
        run_interactive(&args).await;
    }
}

/// Run HTTP API server
async fn run_serve(args: &Args) {
    println!("NoirGuess v{} API server", VERSION);
    if let Err(e) = run_server(&args.addr).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Interactive session loop: plain input is a guess, slash input is a command
async fn run_interactive(args: &Args) {
    let store = JsonFileStore::new(args.data_dir.join("profile.json"));
    let mut engine = SessionEngine::new(SongLibrary::new(), PlaceholderImages, store);

    print_header(args.no_color);
    if let Some(profile) = engine.profile() {
        println!(
            "Welcome back, {}. {} XP, {}.",
            profile.username.bold(),
            profile.xp,
            profile.rank_name.cyan()
        );
    }
    println!("Type {} to begin, {} for commands.", "/play".bold(), "/help".bold());
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", format_prompt(&engine));
        let _ = stdout.flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => break,
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("/quit") || line.eq_ignore_ascii_case("/exit") {
            println!("Session ended. The night keeps your secrets.");
            break;
        }

        if let Err(e) = dispatch(&mut engine, line).await {
            println!("{}", format!("  {}", e).yellow());
            continue;
        }

        // Round loading happens implicitly between stages
        if matches!(engine.phase(), Phase::LoadingChallenge) {
            let _ = engine.load_next_challenge().await;
        }

        render(&engine, args);
    }
}

/// Route one input line to an engine event
async fn dispatch(
    engine: &mut CliEngine,
    line: &str,
) -> Result<(), noirguess::types::ValidationError> {
    if !line.starts_with('/') {
        engine.submit_guess(line).await?;
        return Ok(());
    }

    let mut parts = line.splitn(2, ' ');
    let command = parts.next().unwrap_or_default().to_ascii_lowercase();
    let rest = parts.next().unwrap_or("").trim();

    match command.as_str() {
        "/play" => {
            if matches!(engine.phase(), Phase::Landing) {
                engine.start_descent()?;
            }
            if matches!(engine.phase(), Phase::ProfileView) {
                engine.back_to_mode_select()?;
            }
            engine.start_session(parse_mode(rest))?;
        }
        "/start" => engine.start_lobby_game()?,
        "/clue" => {
            if !engine.reveal_next_clue()? {
                println!("  All clues are already on the table.");
            }
        }
        "/hint" => engine.use_hint()?,
        "/skip" => engine.skip_song().await?,
        "/next" => match engine.phase() {
            Phase::LevelUp { .. } => engine.continue_after_level_up()?,
            _ => engine.proceed_to_next_stage()?,
        },
        "/menu" => engine.return_to_menu()?,
        "/profile" => {
            if matches!(engine.phase(), Phase::Landing | Phase::ModeSelect) {
                engine.open_profile()?;
            }
            print_profile(engine);
        }
        "/back" => engine.back_to_mode_select()?,
        "/save" => engine.save_profile(rest)?,
        "/clear" => engine.clear_profile(),
        "/status" => {}
        "/help" => print_help(),
        other => println!("  Unknown command: {}", other),
    }
    Ok(())
}

fn print_help() {
    println!("  <text>         submit a guess");
    println!("  /play [mode]   start a session (solo, group, knockout, ladder)");
    println!("  /start         start the game from a lobby");
    println!("  /clue          reveal the next clue for free");
    println!("  /hint          buy the next clue for XP");
    println!("  /skip          give up on the current song");
    println!("  /next          continue after a reveal or level-up");
    println!("  /menu          abandon the round back to the menu");
    println!("  /profile       show the saved profile");
    println!("  /save <name>   persist progress");
    println!("  /clear         delete the saved profile");
    println!("  /status        show the current session state");
    println!("  /quit          exit");
}

fn parse_mode(arg: &str) -> GameMode {
    match arg.to_ascii_lowercase().as_str() {
        "group" | "group_challenge" => GameMode::GroupChallenge,
        "knockout" => GameMode::Knockout,
        "ladder" | "rank_ladder" => GameMode::RankLadder,
        _ => GameMode::Solo,
    }
}

fn print_header(no_color: bool) {
    if no_color {
        println!("========================================");
        println!("  NoirGuess v{}", VERSION);
        println!("========================================");
    } else {
        println!("{}", "========================================".bold());
        println!("{}", format!("  NoirGuess v{}", VERSION).bold());
        println!("{}", "========================================".bold());
    }
    println!();
}

fn format_prompt(engine: &CliEngine) -> String {
    let counters = engine.counters();
    format!(
        "[{} | {} XP | L{}] > ",
        engine.phase().name(),
        counters.xp(),
        counters.level
    )
}

fn print_profile(engine: &CliEngine) {
    match engine.profile() {
        Some(p) => {
            println!("  {}", p.username.bold());
            println!("  XP: {} | Level: {} | Rank: {}", p.xp, p.level, p.rank_name.cyan());
            println!("  Songs played: {}", p.played_titles.len());
        }
        None => println!("  No saved profile. Use /save <name> to create one."),
    }
}

/// Render the state after an event
fn render(engine: &CliEngine, args: &Args) {
    let view = engine.view();

    if args.json {
        match serde_json::to_string(&view) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("view serialization failed: {}", e),
        }
        return;
    }
    if args.no_color {
        println!("{}", view.to_parseable_string());
        if let Some(feedback) = &view.feedback {
            println!("  {}", feedback.message);
        }
        if let Some(error) = &view.error {
            println!("  ERROR: {}", error);
        }
        return;
    }

    if let Some(feedback) = &view.feedback {
        println!("{}", format_feedback(feedback));
    }

    match engine.phase() {
        Phase::ModeSelect => {
            println!("  Modes: {} (levels), group, knockout, ladder", "solo".bold());
        }
        Phase::Lobby(lobby) => {
            println!(
                "  Lobby for {}. Multiplayer is not wired up; {} plays at fixed difficulty.",
                lobby.mode,
                "/start".bold()
            );
        }
        Phase::Guessing(_) => print_clues(&view),
        Phase::Revealed(_) | Phase::SkippedRevealed(_) => {
            if let Some(answer) = &view.answer {
                println!("  The song was {}.", answer.bold().cyan());
            }
            if let Some(image) = &view.image {
                let tag = if image.placeholder { " (placeholder)" } else { "" };
                println!("  {} {}{}", "Visual:".dimmed(), image.url, tag);
            }
            println!("  {} to continue.", "/next".bold());
        }
        Phase::LevelUp { level } => {
            println!("{}", format!("  LEVEL {} UNLOCKED", level).green().bold());
            println!("  {} to keep climbing.", "/next".bold());
        }
        Phase::Error { message } => {
            println!("{}", format!("  {}", message).red());
            println!("  {} to return to the menu.", "/menu".bold());
        }
        _ => {}
    }

    println!("{}", view.to_parseable_string().dimmed());
}

fn print_clues(view: &SessionView) {
    for (i, clue) in view.revealed_clues.iter().enumerate() {
        println!("  {} {}", format!("Clue {}:", i + 1).bold(), clue.italic());
    }
    if view.revealed_clues.len() < view.total_clues {
        println!(
            "  {} more clue(s) hidden. {} is free, {} costs XP.",
            view.total_clues - view.revealed_clues.len(),
            "/clue".bold(),
            "/hint".bold()
        );
    }
}

fn format_feedback(feedback: &Feedback) -> String {
    let line = format!("  {}", feedback.message);
    match feedback.kind {
        FeedbackKind::Correct | FeedbackKind::Success => line.green().to_string(),
        FeedbackKind::Incorrect | FeedbackKind::Error => line.red().to_string(),
        FeedbackKind::Warning => line.yellow().to_string(),
        FeedbackKind::Skipped => line.magenta().to_string(),
        FeedbackKind::Info => line.cyan().to_string(),
    }
}
