mod export;
mod render;

use anyhow::Context;
use clap::{Parser, Subcommand};
use roulette_core::{
    derive_hash_hex, Clock, FrameQueue, ManualClock, Roulette, RouletteConfig, SeededStream,
    SystemClock, WheelItems,
};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::export::SpinRecord;

const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "roulette", about = "Spin a wheel of items in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Comma-separated wheel items; defaults to "Item 1".."Item 6"
    #[arg(long, global = true, env = "ROULETTE_ITEMS")]
    items: Option<String>,
    /// JSON config file
    #[arg(long, global = true, env = "ROULETTE_CONFIG")]
    config: Option<PathBuf>,
    /// Secret server seed; a random one is generated when omitted
    #[arg(long, global = true, env = "ROULETTE_SERVER_SEED")]
    server_seed: Option<String>,
    #[arg(long, global = true, default_value = "cli")]
    client_seed: String,
    /// Nonce the spin stream starts from
    #[arg(long, global = true, default_value_t = 0)]
    nonce: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin the wheel and print the history
    Spin {
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        /// Write settled spins to a CSV file
        #[arg(long)]
        export_csv: Option<PathBuf>,
        /// Skip the animation and settle each spin immediately
        #[arg(long)]
        instant: bool,
    },
    /// Print the generated wedge colors
    Palette,
    /// Recompute a session from its seeds and print each result
    Replay {
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
}

struct Session {
    items: WheelItems,
    config: RouletteConfig,
    server_seed: String,
    client_seed: String,
    nonce: u64,
}

impl Session {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let items = match &cli.items {
            Some(raw) => WheelItems::parse_csv(raw)?,
            None => WheelItems::default(),
        };
        let config = match &cli.config {
            Some(path) => RouletteConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RouletteConfig::default(),
        };
        let server_seed = cli.server_seed.clone().unwrap_or_else(fresh_seed);
        Ok(Self {
            items,
            config,
            server_seed,
            client_seed: cli.client_seed.clone(),
            nonce: cli.nonce,
        })
    }

    fn roulette<C: Clock>(&self, clock: C) -> Roulette<C, FrameQueue, SeededStream> {
        Roulette::new(
            self.items.clone(),
            self.config.clone(),
            clock,
            FrameQueue::new(),
            SeededStream::new(&self.server_seed, &self.client_seed, self.nonce),
            SeededStream::new(
                &self.server_seed,
                format!("{}:palette", self.client_seed),
                self.nonce,
            ),
        )
    }

    fn print_commitment(&self) {
        println!(
            "server_seed_hash={} client_seed={} nonce={}",
            derive_hash_hex(self.server_seed.as_bytes()),
            self.client_seed,
            self.nonce
        );
    }
}

fn fresh_seed() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    derive_hash_hex(format!("{nanos}:{}", std::process::id()).as_bytes())
}

/// Spins with the real clock, one frame per display refresh. Ctrl-C tears
/// the wheel down mid-spin.
async fn spin_animated(session: &Session, rounds: u32) -> anyhow::Result<Vec<SpinRecord>> {
    let mut roulette = session.roulette(SystemClock::new());
    let mut records = Vec::new();
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    for _ in 0..rounds {
        roulette.spin()?;
        render::draw_frame(&roulette)?;
        'frames: loop {
            tokio::select! {
                _ = interval.tick() => {
                    for token in roulette.scheduler_mut().take_due() {
                        if let Some((outcome, entry)) = roulette.on_frame(token) {
                            records.push(SpinRecord::new(&outcome, entry));
                            render::draw_frame(&roulette)?;
                            println!();
                            break 'frames;
                        }
                    }
                    render::draw_frame(&roulette)?;
                }
                _ = &mut ctrl_c => {
                    roulette.teardown();
                    println!();
                    warn!("interrupted, wheel torn down");
                    render::print_history(roulette.history());
                    return Ok(records);
                }
            }
        }
    }
    render::print_history(roulette.history());
    Ok(records)
}

/// Spins on a simulated clock; each spin settles without waiting.
fn spin_instant(session: &Session, rounds: u32) -> anyhow::Result<Vec<SpinRecord>> {
    let clock = ManualClock::new();
    let mut roulette = session.roulette(clock.clone());
    let mut records = Vec::new();
    for _ in 0..rounds {
        roulette.spin()?;
        'frames: while !roulette.scheduler_mut().is_empty() {
            clock.advance(FRAME_INTERVAL);
            for token in roulette.scheduler_mut().take_due() {
                if let Some((outcome, entry)) = roulette.on_frame(token) {
                    println!("{:>3}. {} (rotation {:.4})", entry.index + 1, entry.item, outcome.rotation);
                    records.push(SpinRecord::new(&outcome, entry));
                    break 'frames;
                }
            }
        }
    }
    render::print_history(roulette.history());
    Ok(records)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = Session::from_cli(&cli)?;

    match cli.command {
        Commands::Spin {
            rounds,
            export_csv,
            instant,
        } => {
            session.print_commitment();
            let records = if instant {
                spin_instant(&session, rounds)?
            } else {
                spin_animated(&session, rounds).await?
            };
            if let Some(path) = export_csv {
                export::write_csv(&path, &records)?;
                info!("exported {} spins to {}", records.len(), path.display());
            }
        }
        Commands::Palette => {
            let roulette = session.roulette(ManualClock::new());
            render::print_palette(roulette.items(), roulette.palette());
        }
        Commands::Replay { rounds } => {
            session.print_commitment();
            println!("server_seed={}", session.server_seed);
            spin_instant(&session, rounds)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(nonce: u64) -> Session {
        Session {
            items: WheelItems::parse_csv("A,B,C").unwrap(),
            config: RouletteConfig::default(),
            server_seed: "server".into(),
            client_seed: "client".into(),
            nonce,
        }
    }

    #[test]
    fn replay_reproduces_a_session() {
        let first = spin_instant(&session(3), 4).unwrap();
        let again = spin_instant(&session(3), 4).unwrap();
        assert_eq!(first.len(), 4);
        for (a, b) in first.iter().zip(&again) {
            assert_eq!((a.seq, a.index, &a.item), (b.seq, b.index, &b.item));
            assert_eq!(a.rotation, b.rotation);
        }
    }

    #[test]
    fn fresh_seeds_are_hex_digests() {
        let seed = fresh_seed();
        assert_eq!(seed.len(), 64);
        assert!(seed.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
