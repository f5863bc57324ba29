//! UVSentry Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-period control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter     LogEventSink      MqttEventSink     │
//! │  (Sensor+Actuator)   (EventSink)       (EventSink)       │
//! │  Esp32TimeAdapter                                        │
//! │                                                          │
//! │  ───────────── Port Trait Boundary ───────────────       │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  NoiseFilter · FSM                             │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  RestartWatchdog (scheduled full restart)                │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use uvsentry::adapters::hardware::HardwareAdapter;
use uvsentry::adapters::log_sink::LogEventSink;
use uvsentry::adapters::mqtt::{EspMqttTransport, MqttEventSink};
use uvsentry::adapters::time::Esp32TimeAdapter;
use uvsentry::app::events::AppEvent;
use uvsentry::app::ports::EventSink;
use uvsentry::app::service::AppService;
use uvsentry::config::SystemConfig;
use uvsentry::diagnostics;
use uvsentry::drivers::hw_init;
use uvsentry::drivers::uvc::UvcDriver;
use uvsentry::pins;
use uvsentry::sensors::current::CurrentSensor;
use uvsentry::sensors::ultrasonic::UltrasonicSensor;
use uvsentry::watchdog::{RestartDecision, RestartWatchdog};

// ── Fan-out sink ──────────────────────────────────────────────
//
// Every event goes to the serial log first, then to the broker. The
// MQTT side is lossy by contract, so the local log is the record of
// truth.

struct TeeSink<A: EventSink, B: EventSink> {
    local: A,
    remote: B,
}

impl<A: EventSink, B: EventSink> EventSink for TeeSink<A, B> {
    fn emit(&mut self, event: &AppEvent) {
        self.local.emit(event);
        self.remote.emit(event);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  UVSentry v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = SystemConfig::default();
    let time_adapter = Esp32TimeAdapter::new();

    // ── 3. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        UltrasonicSensor::new(pins::ULTRASONIC_TRIG_GPIO, pins::ULTRASONIC_ECHO_GPIO),
        CurrentSensor::new(pins::CURRENT_ADC_GPIO),
        UvcDriver::new(),
    );

    let mut sink = TeeSink {
        local: LogEventSink::new(),
        remote: MqttEventSink::new(EspMqttTransport::new(&config), &config),
    };

    // ── 4. Construct app service + restart watchdog ───────────
    let mut app = AppService::new(config.clone());
    let restart_watchdog =
        RestartWatchdog::new(config.watchdog_interval_ms, time_adapter.uptime_ms());

    app.start(&mut sink);
    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time_adapter.uptime_ms();
        app.tick(now_ms, &mut hw, &mut sink);

        if restart_watchdog.check(now_ms) == RestartDecision::Restart {
            sink.emit(&AppEvent::Heartbeat {
                uptime_secs: time_adapter.uptime_secs(),
                free_heap_bytes: diagnostics::free_heap_bytes(),
            });
            // Give the heartbeat publish a moment on the wire.
            esp_idf_hal::delay::FreeRtos::delay_ms(250);
            diagnostics::restart();
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(config.loop_period_ms);
    }
}
