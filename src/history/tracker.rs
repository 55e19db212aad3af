//! Turns periodic link samples into connection events

use super::{ConnectionEvent, EventKind};
use crate::wifi::LinkInfo;
use chrono::{DateTime, Utc};

/// Remembers the last association between polls
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    current: Option<(LinkInfo, DateTime<Utc>)>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&LinkInfo> {
        self.current.as_ref().map(|(link, _)| link)
    }

    /// Feed the latest link state. A BSSID change yields a disconnect for
    /// the old BSSID followed by a connect for the new one.
    pub fn observe(&mut self, link: Option<&LinkInfo>, now: DateTime<Utc>) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();

        match (self.current.take(), link) {
            (Some((previous, since)), Some(link)) if previous.bssid == link.bssid => {
                self.current = Some((link.clone(), since));
            }
            (previous, Some(link)) => {
                if let Some((previous, since)) = previous {
                    events.push(disconnect(&previous, since, now));
                }
                events.push(ConnectionEvent::new(
                    now,
                    link.bssid,
                    EventKind::Connect,
                    link.signal,
                ));
                self.current = Some((link.clone(), now));
            }
            (Some((previous, since)), None) => {
                events.push(disconnect(&previous, since, now));
            }
            (None, None) => {}
        }

        events
    }
}

fn disconnect(previous: &LinkInfo, since: DateTime<Utc>, now: DateTime<Utc>) -> ConnectionEvent {
    let duration = (now - since).num_milliseconds() as f64 / 1000.0;
    ConnectionEvent::new(now, previous.bssid, EventKind::Disconnect, previous.signal)
        .with_duration(duration.max(0.0))
}
