//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the serial logger. The MQTT adapter implements the same trait for the
//! remote side; the main loop chains the two.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { state } => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::UvActivated {
                distance_cm,
                current_ma,
            } => match current_ma {
                Some(ma) => {
                    info!("LAMP  | on, avg={:.1}cm, draw={:.1}mA", distance_cm, ma);
                }
                None => info!("LAMP  | on, avg={:.1}cm, draw=n/a", distance_cm),
            },
            AppEvent::UvTimeoutRelease { current_ma } => match current_ma {
                Some(ma) => info!("LAMP  | off (timeout), draw={:.1}mA", ma),
                None => info!("LAMP  | off (timeout), draw=n/a"),
            },
            AppEvent::SensorFault { kind } => {
                warn!("FAULT | sensor, kind={:?}", kind);
            }
            AppEvent::Heartbeat {
                uptime_secs,
                free_heap_bytes,
            } => {
                info!(
                    "BEAT  | uptime={}s, free_heap={}B, restarting",
                    uptime_secs, free_heap_bytes
                );
            }
        }
    }
}
