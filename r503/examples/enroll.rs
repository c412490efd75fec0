//! Enroll a finger at the next free library slot.
//!
//! Usage: enroll <serial-port> [baud]

use r503::{EnrollConfig, ManualEnroll, SerialTransport, Session, SystemClock};

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

    let location = match session.get_available_location()?.value.flatten() {
        Some(slot) => slot,
        None => {
            eprintln!("Fingerprint library is full");
            return Ok(());
        }
    };

    println!("Enrolling to page {}; place your finger on the sensor", location);
    let mut enroll = ManualEnroll::new(EnrollConfig::new(location));
    let state = enroll.run(&mut session, &SystemClock);

    println!(
        "Finished: {:?} after {} captures (last code {})",
        state,
        enroll.captures_done(),
        enroll.last_code()
    );
    Ok(())
}
