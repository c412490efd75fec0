//! Enrollment flows
//!
//! Two ways to register a finger: a host-driven state machine built from the
//! basic capture pipeline ([`ManualEnroll`]), and the module's own one-shot
//! AutoEnroll/AutoIdentify commands.
//!
//! The manual flow never blocks on the sensor: each [`ManualEnroll::poll`]
//! issues at most one capture attempt and returns, so callers embed it in
//! their own loop or hand it a [`Clock`] via [`ManualEnroll::run`]. Time is
//! injected, which keeps the timeout logic testable without hardware.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use r503_core::{ConfirmationCode, Instruction};
use r503_types::SearchHit;

use crate::error::Result;
use crate::session::{Outcome, Session};

/// Time source for the enrollment loop
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall-clock time and real thread sleeps
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Settings for a manual enrollment run
#[derive(Debug, Clone)]
pub struct EnrollConfig {
    /// Library page to store the finished model at
    pub location: u16,

    /// Character buffer the combined model is stored from
    pub store_buffer: u8,

    /// Number of fingerprint captures to take
    pub captures: u8,

    /// How long to wait for a finger before giving up. The window restarts
    /// after every successful capture.
    pub timeout: Duration,

    /// Delay between capture attempts in [`ManualEnroll::run`]
    pub poll_delay: Duration,
}

impl EnrollConfig {
    /// Defaults matching the module's own auto-enroll behavior: four
    /// captures, ten seconds per capture
    pub fn new(location: u16) -> Self {
        Self {
            location,
            store_buffer: 1,
            captures: 4,
            timeout: Duration::from_secs(10),
            poll_delay: Duration::from_millis(300),
        }
    }
}

/// Progress of a manual enrollment
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnrollState {
    /// Waiting for the first finger placement
    AwaitFinger,
    /// At least one capture taken, more to go
    Capturing,
    /// All captures taken; combining and storing the model
    Registering,
    /// Model stored at the configured location
    Done,
    /// The module refused to combine or store the model
    Failed,
    /// No finger arrived within the capture window
    TimedOut,
}

impl EnrollState {
    /// True once the run can make no further progress
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::TimedOut)
    }
}

/// Host-driven enrollment state machine.
///
/// Captures are taken one per poll; a capture whose character conversion
/// fails is retried without consuming a buffer slot. Once the configured
/// number of captures is in, the buffers are combined into a model and
/// stored.
#[derive(Debug)]
pub struct ManualEnroll {
    config: EnrollConfig,
    state: EnrollState,
    captures_done: u8,
    window_start: Option<Instant>,
    last_code: ConfirmationCode,
}

impl ManualEnroll {
    pub fn new(config: EnrollConfig) -> Self {
        Self {
            config,
            state: EnrollState::AwaitFinger,
            captures_done: 0,
            window_start: None,
            last_code: ConfirmationCode::Success,
        }
    }

    /// Current state
    pub fn state(&self) -> EnrollState {
        self.state
    }

    /// Captures taken so far
    pub fn captures_done(&self) -> u8 {
        self.captures_done
    }

    /// The confirmation code from the most recent device interaction
    pub fn last_code(&self) -> ConfirmationCode {
        self.last_code
    }

    /// Advance the state machine by at most one device interaction.
    ///
    /// Transport failures are folded into their legacy confirmation code and
    /// treated as a failed capture attempt, so a flaky line costs retries
    /// rather than aborting the run.
    pub fn poll(&mut self, session: &mut Session, clock: &dyn Clock) -> EnrollState {
        if self.state.is_terminal() {
            return self.state;
        }

        let window_start = *self.window_start.get_or_insert_with(|| clock.now());

        match self.state {
            EnrollState::AwaitFinger | EnrollState::Capturing => {
                let code = self.capture(session);
                self.last_code = code;

                if code.is_success() {
                    // A fresh capture restarts the finger-wait window
                    self.window_start = Some(clock.now());
                } else if clock.now().duration_since(window_start) > self.config.timeout {
                    warn!("Enrollment timed out after {} captures", self.captures_done);
                    self.state = EnrollState::TimedOut;
                }
            }
            EnrollState::Registering => {
                self.state = self.register(session);
            }
            _ => {}
        }

        self.state
    }

    /// Drive [`ManualEnroll::poll`] to a terminal state, sleeping the
    /// configured delay between attempts
    pub fn run(&mut self, session: &mut Session, clock: &dyn Clock) -> EnrollState {
        info!(
            "Enrolling to page {} ({} captures)",
            self.config.location, self.config.captures
        );

        loop {
            let state = self.poll(session, clock);
            if state.is_terminal() {
                return state;
            }
            clock.sleep(self.config.poll_delay);
        }
    }

    /// One capture attempt: image, then character conversion into the next
    /// buffer slot. Returns the image capture code.
    fn capture(&mut self, session: &mut Session) -> ConfirmationCode {
        let image = session
            .get_image_ex()
            .unwrap_or_else(|e| e.confirmation());
        if !image.is_success() {
            return image;
        }

        let slot = self.captures_done + 1;
        let converted = session
            .img2tz(slot)
            .unwrap_or_else(|e| e.confirmation());

        if converted.is_success() {
            self.captures_done += 1;
            debug!(
                "Capture {}/{} taken",
                self.captures_done, self.config.captures
            );
            if self.captures_done >= self.config.captures {
                self.state = EnrollState::Registering;
            } else {
                self.state = EnrollState::Capturing;
            }
        } else {
            // Conversion failed; the slot is reused on the next attempt
            debug!("Character conversion failed: {}", converted);
        }

        image
    }

    fn register(&mut self, session: &mut Session) -> EnrollState {
        let combined = session.reg_model().unwrap_or_else(|e| e.confirmation());
        self.last_code = combined;
        if !combined.is_success() {
            warn!("Model combination failed: {}", combined);
            return EnrollState::Failed;
        }

        let stored = session
            .store(self.config.store_buffer, self.config.location)
            .unwrap_or_else(|e| e.confirmation());
        self.last_code = stored;
        if !stored.is_success() {
            warn!("Model store failed: {}", stored);
            return EnrollState::Failed;
        }

        info!("Enrolled at page {}", self.config.location);
        EnrollState::Done
    }
}

/// Knobs for the module-side AutoEnroll command. Every field is a 0/1 flag
/// as the module defines them; defaults enable them all.
#[derive(Debug, Clone)]
pub struct AutoEnrollPolicy {
    /// Reject fingers already enrolled at another location
    pub duplicate_check: u8,
    /// Report the duplicate's location when the check trips
    pub duplicate_status: u8,
    /// Report per-step registration status
    pub return_status: u8,
    /// Require the finger to leave the sensor between captures
    pub finger_leave: u8,
}

impl Default for AutoEnrollPolicy {
    fn default() -> Self {
        Self {
            duplicate_check: 1,
            duplicate_status: 1,
            return_status: 1,
            finger_leave: 1,
        }
    }
}

/// Timeout for the module-side interactive commands, which block until the
/// user has placed a finger
const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(10);

impl Session {
    /// Run the module's built-in enrollment at `location`. Blocks for up to
    /// ten seconds while the module guides the captures itself.
    pub fn auto_enroll(
        &mut self,
        location: u8,
        policy: &AutoEnrollPolicy,
    ) -> Result<ConfirmationCode> {
        let args = [
            location,
            policy.duplicate_check,
            policy.duplicate_status,
            policy.return_status,
            policy.finger_leave,
        ];
        Ok(self
            .transact_with(Instruction::AutoEnroll, &args, INTERACTIVE_TIMEOUT)?
            .code)
    }

    /// Run the module's built-in capture-and-search over library pages
    /// `start..=end` at the given security level. `retries` is the number
    /// of capture attempts the module makes on a poor image.
    pub fn auto_identify(
        &mut self,
        security_level: u8,
        start: u8,
        end: u8,
        retries: u8,
    ) -> Result<Outcome<SearchHit>> {
        let args = [security_level, start, end, 0, retries];
        let rsp = self.transact_with(Instruction::AutoIdentify, &args, INTERACTIVE_TIMEOUT)?;
        if !rsp.code.is_success() {
            return Ok(Outcome::failure(rsp.code));
        }

        let hit = SearchHit::parse_auto(&rsp.payload)?;
        Ok(Outcome::new(rsp.code, hit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use r503_core::constants::DEFAULT_ADDRESS;
    use r503_core::Frame;
    use std::cell::Cell;

    /// Deterministic clock: sleeps advance it, nothing else does
    struct FakeClock {
        base: Instant,
        offset: Cell<Duration>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Cell::new(Duration::ZERO),
            }
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }

        fn sleep(&self, duration: Duration) {
            self.offset.set(self.offset.get() + duration);
        }
    }

    fn instructions_sent(script: &ScriptedTransport) -> Vec<u8> {
        script
            .written()
            .iter()
            .filter_map(|buf| Frame::decode(buf).ok())
            .filter_map(|frame| frame.payload.first().copied())
            .collect()
    }

    #[test]
    fn test_enrollment_completes_after_configured_captures() {
        let mut script = ScriptedTransport::new();
        for _ in 0..4 {
            script = script
                .ack(DEFAULT_ADDRESS, 0x00, &[]) // image
                .ack(DEFAULT_ADDRESS, 0x00, &[]); // img2tz
        }
        script = script
            .ack(DEFAULT_ADDRESS, 0x00, &[]) // reg_model
            .ack(DEFAULT_ADDRESS, 0x00, &[]); // store

        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut enroll = ManualEnroll::new(EnrollConfig::new(7));

        let state = enroll.run(&mut session, &clock);
        assert_eq!(state, EnrollState::Done);
        assert_eq!(enroll.captures_done(), 4);

        let sent = instructions_sent(&script);
        assert_eq!(sent.iter().filter(|i| **i == 0x28).count(), 4);
        assert_eq!(sent.iter().filter(|i| **i == 0x05).count(), 1);

        // The store went to buffer 1, page 7
        let store = script.written().pop().unwrap();
        let frame = Frame::decode(&store).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0x06, 0x01, 0x00, 0x07]);
    }

    #[test]
    fn test_enrollment_walks_through_states() {
        let script = ScriptedTransport::new().ack_forever(DEFAULT_ADDRESS, 0x00, &[]);
        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut config = EnrollConfig::new(0);
        config.captures = 2;
        let mut enroll = ManualEnroll::new(config);

        assert_eq!(enroll.state(), EnrollState::AwaitFinger);
        assert_eq!(enroll.poll(&mut session, &clock), EnrollState::Capturing);
        assert_eq!(enroll.poll(&mut session, &clock), EnrollState::Registering);
        assert_eq!(enroll.poll(&mut session, &clock), EnrollState::Done);
    }

    #[test]
    fn test_enrollment_times_out_with_no_finger() {
        let script = ScriptedTransport::new().ack_forever(DEFAULT_ADDRESS, 0x02, &[]);
        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut enroll = ManualEnroll::new(EnrollConfig::new(0));

        let state = enroll.run(&mut session, &clock);
        assert_eq!(state, EnrollState::TimedOut);
        assert_eq!(enroll.captures_done(), 0);
        assert_eq!(enroll.last_code(), ConfirmationCode::NoFinger);

        // Never got as far as combining a model
        assert!(instructions_sent(&script).iter().all(|i| *i != 0x05));
    }

    #[test]
    fn test_failed_conversion_retries_same_slot() {
        let script = ScriptedTransport::new()
            .ack(DEFAULT_ADDRESS, 0x00, &[]) // image
            .ack(DEFAULT_ADDRESS, 0x06, &[]) // img2tz: disordered image
            .ack(DEFAULT_ADDRESS, 0x00, &[]) // image again
            .ack(DEFAULT_ADDRESS, 0x00, &[]) // img2tz
            .ack(DEFAULT_ADDRESS, 0x00, &[]) // reg_model
            .ack(DEFAULT_ADDRESS, 0x00, &[]); // store

        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut config = EnrollConfig::new(3);
        config.captures = 1;
        let mut enroll = ManualEnroll::new(config);

        let state = enroll.run(&mut session, &clock);
        assert_eq!(state, EnrollState::Done);

        // Both conversion attempts targeted buffer 1
        let buffers: Vec<u8> = script
            .written()
            .iter()
            .filter_map(|buf| Frame::decode(buf).ok())
            .filter(|frame| frame.payload.first() == Some(&0x02))
            .map(|frame| frame.payload[1])
            .collect();
        assert_eq!(buffers, vec![1, 1]);
    }

    #[test]
    fn test_register_refusal_fails_the_run() {
        let script = ScriptedTransport::new()
            .ack(DEFAULT_ADDRESS, 0x00, &[])
            .ack(DEFAULT_ADDRESS, 0x00, &[])
            .ack(DEFAULT_ADDRESS, 0x0A, &[]); // reg_model: combine failed

        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut config = EnrollConfig::new(0);
        config.captures = 1;
        let mut enroll = ManualEnroll::new(config);

        let state = enroll.run(&mut session, &clock);
        assert_eq!(state, EnrollState::Failed);
        assert_eq!(enroll.last_code(), ConfirmationCode::CombineFailed);
    }

    #[test]
    fn test_poll_on_terminal_state_is_inert() {
        let script = ScriptedTransport::new().ack_forever(DEFAULT_ADDRESS, 0x02, &[]);
        let mut session = Session::new(script.boxed());
        let clock = FakeClock::new();
        let mut enroll = ManualEnroll::new(EnrollConfig::new(0));

        enroll.run(&mut session, &clock);
        let writes_before = script.written().len();

        assert_eq!(enroll.poll(&mut session, &clock), EnrollState::TimedOut);
        assert_eq!(script.written().len(), writes_before);
    }

    #[test]
    fn test_auto_enroll_payload_layout() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x00, &[]);
        let mut session = Session::new(script.boxed());

        let code = session.auto_enroll(5, &AutoEnrollPolicy::default()).unwrap();
        assert_eq!(code, ConfirmationCode::Success);

        let frame = Frame::decode(&script.written()[0]).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0x31, 0x05, 0x01, 0x01, 0x01, 0x01]);
    }

    #[test]
    fn test_auto_identify_decodes_hit() {
        let script =
            ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x00, &[0x05, 0x00, 0x0C, 0x00, 0x90]);
        let mut session = Session::new(script.boxed());

        let outcome = session.auto_identify(3, 0, 199, 1).unwrap();
        let hit = outcome.value.unwrap();
        assert_eq!(hit.page_id, 12);
        assert_eq!(hit.score, 144);

        let frame = Frame::decode(&script.written()[0]).unwrap();
        assert_eq!(frame.payload.as_ref(), &[0x32, 0x03, 0x00, 0xC7, 0x00, 0x01]);
    }

    #[test]
    fn test_auto_identify_not_found() {
        let script = ScriptedTransport::new().ack(DEFAULT_ADDRESS, 0x09, &[]);
        let mut session = Session::new(script.boxed());

        let outcome = session.auto_identify(3, 0, 199, 1).unwrap();
        assert_eq!(outcome.code, ConfirmationCode::NotFound);
        assert!(outcome.value.is_none());
    }
}
