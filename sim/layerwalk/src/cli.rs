//! Parses the command line arguments.
//!
//! Basic usage for a UDP send with logging on:
//!
//! ```cargo run -- --protocol UDP --message "Hello, Server!" --log```

use crate::{playback::Playback, session::Session, SessionError};
use clap::{Parser, ValueEnum};
use layerwalk_core::{
    exchange::{ExchangeKind, ExchangeSimulator},
    impairment::{DEFAULT_COLLISION_PROBABILITY, DEFAULT_LOSS_PROBABILITY},
    rng::SimRng,
    LinkImpairment,
};
use std::{
    fs::{create_dir_all, OpenOptions},
    io,
    sync::Arc,
    time::Duration,
};
use thiserror::Error as ThisError;
use tracing_subscriber::FmtSubscriber;

/// Stores the different command line arguments.
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Walks a message down the network stack and back up")]
pub struct Args {
    /// Transport protocol: TCP, UDP, or ICMP
    #[arg(short, long, default_value = "TCP")]
    pub protocol: String,
    /// The application message to send
    #[arg(short, long, default_value = "Hello, world!")]
    pub message: String,
    /// The exchange to run. Chosen from the protocol when absent.
    #[arg(short, long, value_enum)]
    pub kind: Option<KindArg>,
    /// The client's initial sequence number for handshakes
    #[arg(long, default_value_t = 0)]
    pub isn: u32,
    /// Chance that a generic send is lost
    #[arg(long, default_value_t = DEFAULT_LOSS_PROBABILITY)]
    pub loss: f64,
    /// Chance that a generic send collides
    #[arg(long, default_value_t = DEFAULT_COLLISION_PROBABILITY)]
    pub collision: f64,
    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
    /// Milliseconds to pause on each event that carries a frame
    #[arg(long, default_value_t = 500)]
    pub step_ms: u64,
    /// Logging flag. Used to turn logging on or off.
    #[arg(short, long)]
    pub log: bool,
}

/// The exchange kinds as they are spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Handshake,
    Echo,
    Generic,
}

impl From<KindArg> for ExchangeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Handshake => ExchangeKind::Handshake,
            KindArg::Echo => ExchangeKind::Echo,
            KindArg::Generic => ExchangeKind::Generic,
        }
    }
}

/// Parses the process arguments and runs them.
pub async fn initialize_from_arguments() -> Result<(), CliError> {
    let args = Args::parse();
    if args.log {
        initialize_logging()?;
    }
    run(&args, &mut io::stdout()).await
}

/// Runs one send on the LAN and plays it back to `out`.
pub async fn run(args: &Args, out: &mut impl io::Write) -> Result<(), CliError> {
    let simulator = ExchangeSimulator::new()
        .impairment(LinkImpairment::new(args.loss, args.collision).map_err(SessionError::from)?)
        .initial_sequence(args.isn);
    let mut rng = match args.seed {
        Some(seed) => SimRng::seeded(seed),
        None => SimRng::from_entropy(),
    };

    let mut session = Session::lan(simulator)?;
    let events = session.send(
        &args.message,
        &args.protocol,
        args.kind.map(ExchangeKind::from),
        &mut rng,
    )?;
    Playback::new(Duration::from_millis(args.step_ms))
        .play(events, out)
        .await?;
    Ok(())
}

/// Initializes the event protocol. Only should be called once when the sim starts.
/// Allows for event! to be called and writes to a log file in ./logs.
/// During Tests -- cargo test -- logs will not be generated for the time being
pub fn initialize_logging() -> Result<(), CliError> {
    let main_path = "./logs";
    create_dir_all(main_path)?;
    let file_path = format!(
        "{}/debug-{}.log",
        main_path,
        chrono::offset::Local::now().format("%y-%m-%d_%H-%M-%S")
    );
    let file = OpenOptions::new()
        .write(true)
        .append(true)
        .create(true)
        .open(file_path)?;
    let subscriber = FmtSubscriber::builder()
        .with_writer(Arc::new(file))
        .with_max_level(tracing::Level::TRACE)
        .json()
        .finish();
    // set the global default so all events/logs go to the same subscriber and
    // subsequently the same file
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("Could not write output or logs: {0}")]
    Io(#[from] io::Error),
    #[error("Logging was already initialized")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}
