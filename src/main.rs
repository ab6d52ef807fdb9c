use std::net::SocketAddr;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use segframe::{Endpoint, Packet, Responder, ResponderConfig, DEFAULT_WINDOW, MAX_PAYLOAD};

const DEFAULT_ADDR: &str = "127.0.0.1:12000";

#[derive(Parser)]
#[command(version, about = "Send and acknowledge fixed-header segments over UDP")]
struct Args {
    /// Turn on logging to stderr
    #[arg(short, long, global = true)]
    log: bool,
    /// Log every packet (implies --log)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Acknowledge every packet received until interrupted
    Server {
        #[arg(short, long, default_value = DEFAULT_ADDR)]
        bind: SocketAddr,
        /// Window advertised in acknowledgments
        #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
        window: u16,
    },
    /// Send full data packets and wait for each acknowledgment
    Client {
        #[arg(short, long, default_value = DEFAULT_ADDR)]
        server: SocketAddr,
        #[arg(short, long, default_value_t = 5)]
        count: u32,
        #[arg(short, long, default_value_t = 500)]
        timeout_ms: u64,
    },
}

fn initialize_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("installing log subscriber")
}

fn run_server(bind: SocketAddr, window: u16) -> anyhow::Result<()> {
    let config = ResponderConfig {
        window,
        ..Default::default()
    };
    let responder = Responder::spawn(bind, config).context("starting responder")?;
    println!("acknowledging on {}", responder.local_addr());
    loop {
        thread::sleep(Duration::from_secs(1));
        let stats = responder.stats();
        info!(
            received = stats.received,
            acknowledged = stats.acknowledged,
            malformed = stats.malformed,
            "progress"
        );
    }
}

fn run_client(server: SocketAddr, count: u32, timeout: Duration) -> anyhow::Result<()> {
    let endpoint = Endpoint::bind("0.0.0.0:0")?;
    endpoint.set_read_timeout(Some(timeout))?;

    for seq in 1..=count {
        let packet = Packet::data(seq, vec![b'0'; MAX_PAYLOAD]);
        endpoint.send_packet(&packet, server)?;
        let (reply, _) = endpoint
            .recv_packet()
            .with_context(|| format!("waiting for ack of seq {}", seq))?;

        if !reply.header.ack() || reply.header.ack != seq {
            bail!("unexpected reply to seq {}: {:?}", seq, reply.header);
        }
        println!(
            "seq={} acked, window={} ({} bytes sent)",
            seq,
            reply.header.window,
            packet.wire_len()
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.log || args.verbose {
        initialize_logging(args.verbose)?;
    }

    match args.command {
        Command::Server { bind, window } => run_server(bind, window),
        Command::Client {
            server,
            count,
            timeout_ms,
        } => run_client(server, count, Duration::from_millis(timeout_ms)),
    }
}
