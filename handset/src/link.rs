//! Radio link to the vehicle, as seen by the pages.

use crate::config::LinkConfig;
use rand::Rng;
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// RSSI reported while no peer is connected.
pub const RSSI_FLOOR: i8 = -100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LinkSnapshot {
    pub connected: bool,
    pub paired: bool,
    /// Pairing has been started and is not finished yet.
    pub pairing: bool,
    /// Signal strength in dBm.
    pub rssi: i8,
    pub last_packet_age: Option<Duration>,
    /// Control packets sent per second.
    pub send_rate: u16,
    pub peer: Option<[u8; 6]>,
}

/// Read-only link state plus the pairing trigger. Polled by pages.
pub trait WirelessLink {
    fn snapshot(&self) -> LinkSnapshot;

    fn start_pairing(&self);

    fn disconnect(&self);
}

/// Signal strength as a percentage: -100 dBm is 0 %, -50 dBm and above 100 %.
#[must_use]
pub fn rssi_percent(rssi: i8) -> u8 {
    let percent = (i16::from(rssi) + 100).clamp(0, 50) * 2;
    u8::try_from(percent).unwrap_or(100)
}

#[must_use]
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[derive(Debug, Default)]
struct LinkState {
    paired: bool,
    pairing_since: Option<Instant>,
    connected: bool,
}

/// Link that pairs after a fixed delay and then reports a jittery but
/// healthy signal.
pub struct SimulatedLink {
    config: LinkConfig,
    state: RefCell<LinkState>,
}

impl SimulatedLink {
    #[must_use]
    pub fn new(config: &LinkConfig) -> Self {
        let state = LinkState {
            paired: config.auto_pair,
            pairing_since: None,
            connected: config.auto_pair,
        };
        Self {
            config: config.clone(),
            state: RefCell::new(state),
        }
    }

    /// State as of `now`. Completes a pending pairing once its delay has passed.
    pub fn snapshot_at(&self, now: Instant) -> LinkSnapshot {
        let mut state = self.state.borrow_mut();
        if let Some(since) = state.pairing_since
            && now.saturating_duration_since(since) >= Duration::from_millis(self.config.pairing_ms)
        {
            log::info!("Link: paired with {}", format_mac(&self.config.peer_mac));
            state.pairing_since = None;
            state.paired = true;
            state.connected = true;
        }

        if !state.connected {
            return LinkSnapshot {
                paired: state.paired,
                pairing: state.pairing_since.is_some(),
                rssi: RSSI_FLOOR,
                peer: state.paired.then_some(self.config.peer_mac),
                ..LinkSnapshot::default()
            };
        }

        let mut rng = rand::rng();
        let jitter = rng.random_range(-3..=3);
        LinkSnapshot {
            connected: true,
            paired: true,
            pairing: false,
            rssi: self.config.base_rssi.saturating_add(jitter).min(0),
            last_packet_age: Some(Duration::from_millis(rng.random_range(0..40))),
            send_rate: self.config.send_rate,
            peer: Some(self.config.peer_mac),
        }
    }
}

impl WirelessLink for SimulatedLink {
    fn snapshot(&self) -> LinkSnapshot {
        self.snapshot_at(Instant::now())
    }

    fn start_pairing(&self) {
        let mut state = self.state.borrow_mut();
        if state.pairing_since.is_none() {
            log::info!("Link: pairing started");
            state.pairing_since = Some(Instant::now());
            state.connected = false;
        }
    }

    fn disconnect(&self) {
        let mut state = self.state.borrow_mut();
        log::info!("Link: disconnected");
        state.connected = false;
        state.pairing_since = None;
    }
}

/// Link whose state is set by the test.
#[cfg(test)]
#[derive(Default)]
pub struct StaticLink {
    pub state: std::cell::Cell<LinkSnapshot>,
    pub pairing_requests: std::cell::Cell<usize>,
}

#[cfg(test)]
impl StaticLink {
    pub fn connected(rssi: i8) -> Self {
        let link = Self::default();
        link.state.set(LinkSnapshot {
            connected: true,
            paired: true,
            rssi,
            last_packet_age: Some(Duration::from_millis(12)),
            send_rate: 50,
            peer: Some([0x24, 0x6F, 0x28, 0x0A, 0xB1, 0x3C]),
            ..LinkSnapshot::default()
        });
        link
    }
}

#[cfg(test)]
impl WirelessLink for StaticLink {
    fn snapshot(&self) -> LinkSnapshot {
        self.state.get()
    }

    fn start_pairing(&self) {
        self.pairing_requests.set(self.pairing_requests.get() + 1);
    }

    fn disconnect(&self) {
        let mut state = self.state.get();
        state.connected = false;
        self.state.set(state);
    }
}
