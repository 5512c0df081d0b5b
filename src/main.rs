//! LockGate host runner
//!
//! Runs one door controller level against a console-backed trusted peer.
//!
//! # Examples
//!
//! ```bash
//! # Plaintext level with the default secret
//! echo sUperS3cr3t | lockgate tutorial
//!
//! # Checksum level; embedded NULs pass through stdin
//! printf 'a\x00\x00\x94\n' | lockgate no-hardcoded-password
//!
//! # HSM levels overrun their buffer unless told to emulate it
//! echo letmein | lockgate --legacy-overrun --hsm-secret letmein hsm1
//! ```
//!
//! Exit status is 0 whether access was granted or denied. It is 1 when a
//! hazard (buffer overflow, trust boundary violation, missing trap
//! service) stopped the attempt, and 2 for an invalid `--secret`.
//!
//! Logs go to stderr. `-v` raises the default level; `RUST_LOG` overrides it.

mod host;

use std::io;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use log::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lockgate::config::{self, LockConfig, Secret};
use lockgate::syscall::BoundsPolicy;
use lockgate::{login, Error, Level, TrapDispatcher};

use crate::host::HostPeer;

/// LockGate - trap-dispatched door lock controller
#[derive(Parser)]
#[command(name = "lockgate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Controller program to run
    #[arg(value_enum)]
    level: LevelArg,

    /// Let HSM reads overrun their declared 10 byte buffer into the frame
    #[arg(long)]
    legacy_overrun: bool,

    /// Secret for the tutorial level (11 visible characters)
    #[arg(long, env = "LOCKGATE_SECRET")]
    secret: Option<String>,

    /// Password the simulated HSM accepts
    #[arg(long, env = "LOCKGATE_HSM_SECRET")]
    hsm_secret: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    Tutorial,
    NoHardcodedPassword,
    Hsm1,
    Hsm2,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Tutorial => Level::Tutorial,
            LevelArg::NoHardcodedPassword => Level::NoHardcodedPassword,
            LevelArg::Hsm1 => Level::Hsm1,
            LevelArg::Hsm2 => Level::Hsm2,
        }
    }
}

/// Route `log` records from the library to stderr so stdout carries only
/// the console. `RUST_LOG` overrides the `-v` default.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "lockgate=warn",
        1 => "lockgate=info",
        2 => "lockgate=debug",
        _ => "lockgate=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_ansi(false))
        .init();
}

/// Hazards exit 1; caller mistakes caught before any trap exit 2
fn exit_for(context: &str, e: &Error) -> ExitCode {
    if e.is_fatal() {
        error!("[MAIN] {} halted (code {}): {}", context, e.code(), e);
        ExitCode::FAILURE
    } else {
        error!("[MAIN] {} rejected (code {}): {}", context, e.code(), e);
        ExitCode::from(2)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let lock_config = match cli.secret.as_deref().map(Secret::new).transpose() {
        Ok(secret) => LockConfig::new(secret.unwrap_or(Secret::DEFAULT)),
        Err(e) => return exit_for("--secret", &e),
    };
    config::init(lock_config);

    let policy = if cli.legacy_overrun {
        BoundsPolicy::LegacyOverrun
    } else {
        BoundsPolicy::Strict
    };
    let level = Level::from(cli.level);
    let profile = level.profile(policy);

    let peer = HostPeer::new(io::stdin().lock(), io::stdout().lock(), cli.hsm_secret);
    let mut dispatcher = TrapDispatcher::new(peer);

    let result = login(&mut dispatcher, &profile);
    info!(
        "[MAIN] {}: actuator fired {} time(s)",
        level.name(),
        dispatcher.handler().unlocks()
    );
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => exit_for(level.name(), &e),
    }
}
