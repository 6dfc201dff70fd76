use std::net::Ipv4Addr;
use std::time::Duration;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use wping::{
    lookup_host_v4, PingResult, ProbeOutcome, ProbeReport, Session, SessionConfig, SessionStats,
};

#[derive(argh::FromArgs)]
/// Send ICMP echo requests to a host and measure round-trip times.
struct Args {
    /// reply timeout in milliseconds (default 1000)
    #[argh(option, short = 'w', default = "1000")]
    timeout: u64,

    /// number of payload bytes to send (default 32)
    #[argh(option, short = 'l', default = "32")]
    size: usize,

    /// number of echo requests to send (default 4)
    #[argh(option, short = 'n', default = "4")]
    count: u16,

    /// host name or IPv4 address to ping
    #[argh(positional)]
    target: String,
}

fn main() -> PingResult<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::WARN).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let args: Args = argh::from_env();
    if args.timeout == 0 {
        return Err("timeout must be greater than zero".into());
    }
    if args.count == 0 {
        return Err("count must be greater than zero".into());
    }

    let target = lookup_host_v4(&args.target)?;
    let config = SessionConfig {
        timeout: Duration::from_millis(args.timeout),
        payload_len: args.size,
        count: args.count,
        ..SessionConfig::default()
    };

    let mut session = Session::connect(target, config)?;
    let peer = session.peer();

    println!(
        "Pinging {} [{}] with {} bytes of data:",
        args.target, peer, args.size
    );
    session.run(|report| print_report(peer, report));
    print_summary(peer, session.stats());

    Ok(())
}

fn print_report(peer: Ipv4Addr, report: &ProbeReport) {
    match &report.outcome {
        ProbeOutcome::Reply(reply) => println!(
            "Reply from {}: bytes={} time={}ms TTL={}",
            peer,
            reply.bytes,
            reply.rtt.as_millis(),
            reply.ttl
        ),
        ProbeOutcome::Timeout => println!("Request timed out."),
        ProbeOutcome::SendError(e) => println!("Transmit failed: {e}."),
        ProbeOutcome::ReceiveError(e) => println!("Receive failed: {e}."),
    }
}

fn print_summary(peer: Ipv4Addr, stats: &SessionStats) {
    println!();
    println!("Ping statistics for {peer}:");
    println!(
        "    Packets: Sent = {}, Received = {}, Lost = {} ({:.0}% loss),",
        stats.sent(),
        stats.received(),
        stats.lost(),
        stats.loss_percent()
    );
    if let (Some(min), Some(max), Some(avg)) =
        (stats.min_rtt_ms(), stats.max_rtt_ms(), stats.avg_rtt_ms())
    {
        println!("Approximate round trip times in milli-seconds:");
        println!("    Minimum = {min}ms, Maximum = {max}ms, Average = {avg}ms");
    }
}
