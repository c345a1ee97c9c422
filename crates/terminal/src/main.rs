//! Terminal front end
//!
//! Play against a random mover from the command line. Typed moves go through
//! the same drag-start / drop / snap-end hooks a graphical board would use.
//!
//! ```bash
//! chess_terminal --seed 7 --delay-ms 400
//! RUST_LOG=chess_session=debug chess_terminal --human black
//! ```

mod commands;
mod glyphs;
mod scheduler;
mod view;

use anyhow::{Context, Result};
use chess_session::{Collaborators, DropOutcome, Session, SessionConfig, Side};
use clap::Parser;
use random_policy::RandomPolicy;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{Command, HELP};
use scheduler::{Event, TokioScheduler};
use view::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "chess_terminal")]
#[command(about = "Play chess against a random mover in the terminal", long_about = None)]
struct Cli {
    /// Session config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random mover; the same seed replays the same replies
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before the computer replies, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Side you play
    #[arg(long)]
    human: Option<Side>,

    /// Built-in status language ("en" or "ar")
    #[arg(long)]
    locale: Option<String>,

    /// Start from this FEN instead of the standard position
    #[arg(long)]
    fen: Option<String>,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    fn session_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(ms) = self.delay_ms {
            config.reply_delay_ms = ms;
        }
        if let Some(side) = self.human {
            config.human_side = side;
            config.board.orientation = side;
        }
        if let Some(locale) = &self.locale {
            config.locale_preset = Some(locale.clone());
        }
        if let Some(fen) = &self.fen {
            config.start_fen = Some(fen.clone());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Event-loop state around the session
struct Host {
    session: Session,
    /// Moves typed while a reply was pending, replayed once it lands
    backlog: VecDeque<Command>,
    input_open: bool,
}

impl Host {
    fn new(session: Session) -> Self {
        Self {
            session,
            backlog: VecDeque::new(),
            input_open: true,
        }
    }

    fn handle(&mut self, event: Event) -> Result<Flow> {
        match event {
            Event::Input(line) => {
                let Some(command) = parse_line(&line) else {
                    return Ok(Flow::Continue);
                };
                // Only moves wait for the reply; controls act on the spot
                let waiting = self.session.pending_reply().is_some() || !self.backlog.is_empty();
                if waiting && matches!(command, Command::Drop { .. }) {
                    self.backlog.push_back(command);
                    return Ok(Flow::Continue);
                }
                if self.run(command)? == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            }
            Event::Reply(ticket) => {
                if let Some(mv) = self.session.fire_reply(ticket) {
                    println!("Computer plays {mv}");
                }
            }
            Event::InputClosed => self.input_open = false,
        }

        while self.session.pending_reply().is_none() {
            let Some(command) = self.backlog.pop_front() else {
                break;
            };
            self.run(command)?;
        }

        let idle = self.session.pending_reply().is_none() && self.backlog.is_empty();
        if !self.input_open && idle {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn run(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Drop { from, to } => self.drop_piece(from, to),
            Command::Undo => {
                self.discard_backlog();
                if !self.session.undo_last_exchange() {
                    println!("Nothing to undo");
                }
            }
            Command::NewGame => {
                self.discard_backlog();
                self.session.reset();
            }
            Command::Resize => self.session.resize(),
            Command::Fen => println!("{}", self.session.fen()),
            Command::State => {
                let json = serde_json::to_string_pretty(&self.session.snapshot())
                    .context("failed to serialize session state")?;
                println!("{json}");
            }
            Command::Moves => {
                let moves: Vec<String> = self
                    .session
                    .legal_moves()
                    .iter()
                    .map(|mv| mv.to_string())
                    .collect();
                println!("{}", moves.join(" "));
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Queued moves were aimed at the position being undone or abandoned
    fn discard_backlog(&mut self) {
        if !self.backlog.is_empty() {
            println!("Dropped {} queued move(s)", self.backlog.len());
            self.backlog.clear();
        }
    }

    /// Replay the renderer's gesture sequence for a typed move
    fn drop_piece(&mut self, from: chess_session::Square, to: chess_session::Square) {
        let label = self.session.piece_at(from).map(|piece| piece.code());
        let picked_up = label
            .as_deref()
            .is_some_and(|label| self.session.on_drag_start(from, label));
        if !picked_up {
            println!("You can't move from {from} right now");
            return;
        }

        match self.session.on_drop(from, to) {
            DropOutcome::Accept => self.session.on_snap_end(),
            DropOutcome::Snapback => println!("Illegal move {from}{to}"),
        }
    }
}

/// `None` for blank lines and lines that were reported as errors
fn parse_line(line: &str) -> Option<Command> {
    match line.parse::<Command>() {
        Ok(command) => Some(command),
        Err(commands::CommandError::Empty) => None,
        Err(err) => {
            println!("{err}");
            None
        }
    }
}

fn init_tracing() {
    // Logs go to stderr so they never mix with the board on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn read_stdin(tx: UnboundedSender<Event>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Event::Input(line)).is_err() {
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(%err, "stdin read failed");
                break;
            }
        }
    }
    tx.send(Event::InputClosed).ok();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.session_config()?;
    let policy = match cli.seed {
        Some(seed) => RandomPolicy::seeded(seed),
        None => RandomPolicy::new(),
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    println!("{HELP}");

    let session = Session::new(
        &config,
        Collaborators {
            rules: Box::new(config.rules()?),
            view: Box::new(TerminalView::new()),
            policy: Box::new(policy),
            scheduler: Box::new(TokioScheduler::new(tx.clone())),
        },
    )?;
    info!(human = %config.human_side, delay_ms = config.reply_delay_ms, "ready");

    tokio::spawn(read_stdin(tx));

    let mut host = Host::new(session);
    while let Some(event) = rx.recv().await {
        if host.handle(event)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
