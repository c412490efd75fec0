//! Capture a finger and search the library for it.
//!
//! Usage: identify <serial-port> [baud]

use r503::{SerialTransport, Session};

fn main() -> r503::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let port = args.next().unwrap_or_else(|| "/dev/ttyUSB0".into());
    let baud = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(57_600);

    let transport = SerialTransport::open(&port, baud)?;
    let mut session = Session::new(Box::new(transport));

    let code = session.verify_pw()?;
    if !code.is_success() {
        eprintln!("Handshake failed: {}", code);
        return Ok(());
    }

    println!("Place your finger on the sensor");
    let outcome = session.auto_identify(3, 0, 199, 1)?;

    match outcome.value {
        Some(hit) => println!("Matched page {} with score {}", hit.page_id, hit.score),
        None => println!("No match: {}", outcome.code),
    }
    Ok(())
}
