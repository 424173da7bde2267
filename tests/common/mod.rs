#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use vehicle_light_engine::{
    Animation, AnimationManager, AnimationParameters, Duration, EngineConfig, OutputDriver, Rgb,
    SharedTelemetry, SpeedScaling, SpeedType, Telemetry, TelemetryError,
};

pub type Mutex = CriticalSectionRawMutex;

pub const LEDS: usize = 8;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        grace_period: Duration::from_millis(5),
        stop_timeout: Some(Duration::from_secs(2)),
        speed_scaling: SpeedScaling::MultiplyFirst,
    }
}

pub fn manager() -> AnimationManager<Mutex> {
    init_logger();
    AnimationManager::new(test_config())
}

pub fn parameters(animation: Animation, speed_type: SpeedType) -> AnimationParameters {
    AnimationParameters {
        animation,
        custom_color: Rgb::new(255, 0, 0),
        speed_type,
        user_defined_speed: 255,
        brightness: 128,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure { led_count: usize, brightness: u8 },
    Frame(Vec<Rgb>),
    Reset,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverError;

/// Output driver recording every call, cloneable so tests can inspect the
/// log while the render task borrows the driver.
#[derive(Clone, Default)]
pub struct RecordingDriver {
    events: Rc<RefCell<Vec<Event>>>,
    fail_writes: Rc<Cell<bool>>,
    fail_resets: Rc<Cell<bool>>,
}

impl RecordingDriver {
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn frames(&self) -> Vec<Vec<Rgb>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Frame(frame) => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Failed resets are not recorded
    pub fn set_fail_resets(&self, fail: bool) {
        self.fail_resets.set(fail);
    }

    /// The strip was reset and released after the last frame
    pub fn is_dark(&self) -> bool {
        let events = self.events.borrow();
        let last_frame = events.iter().rposition(|e| matches!(e, Event::Frame(_)));
        let last_reset = events.iter().rposition(|e| *e == Event::Reset);
        match (last_frame, last_reset) {
            (_, None) => false,
            (None, Some(_)) => events.last() == Some(&Event::Release),
            (Some(frame), Some(reset)) => reset > frame && events.last() == Some(&Event::Release),
        }
    }

    /// Split the log into runs, each starting at `Configure`
    ///
    /// Panics if a run is configured while the previous one still holds the strip.
    pub fn runs(&self) -> Vec<Vec<Event>> {
        let mut runs: Vec<Vec<Event>> = Vec::new();
        let mut open = false;
        for event in self.events.borrow().iter() {
            match event {
                Event::Configure { .. } => {
                    assert!(!open, "strip configured while another run holds it");
                    open = true;
                    runs.push(vec![event.clone()]);
                }
                Event::Release => {
                    open = false;
                    runs.last_mut().expect("release without configure").push(event.clone());
                }
                other => {
                    assert!(open, "driver used outside of a run: {other:?}");
                    runs.last_mut().expect("event without configure").push(other.clone());
                }
            }
        }
        runs
    }
}

impl OutputDriver for RecordingDriver {
    type Error = DriverError;

    fn configure(&mut self, led_count: usize, brightness: u8) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(Event::Configure {
            led_count,
            brightness,
        });
        Ok(())
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        if self.fail_writes.get() {
            return Err(DriverError);
        }
        self.events.borrow_mut().push(Event::Frame(colors.to_vec()));
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        if self.fail_resets.get() {
            return Err(DriverError);
        }
        self.events.borrow_mut().push(Event::Reset);
        Ok(())
    }

    fn release(&mut self) {
        self.events.borrow_mut().push(Event::Release);
    }
}

/// Telemetry provider counting polling requests
#[derive(Default)]
pub struct CountingTelemetry {
    pub speed: Cell<Option<u32>>,
    pub rpm: Cell<Option<u32>>,
    pub starts: Cell<usize>,
    pub stops: Cell<usize>,
    pub polling: Cell<bool>,
}

impl CountingTelemetry {
    pub fn with_speed(speed: u32) -> Self {
        let telemetry = Self::default();
        telemetry.speed.set(Some(speed));
        telemetry
    }
}

impl Telemetry for CountingTelemetry {
    type Error = TelemetryError;

    async fn vehicle_speed(&self) -> Result<u32, Self::Error> {
        self.speed.get().ok_or(TelemetryError::Unavailable)
    }

    async fn engine_rpm(&self) -> Result<u32, Self::Error> {
        self.rpm.get().ok_or(TelemetryError::Unavailable)
    }

    fn start_polling(&self) {
        self.starts.set(self.starts.get() + 1);
        self.polling.set(true);
    }

    fn stop_polling(&self) {
        self.stops.set(self.stops.get() + 1);
        self.polling.set(false);
    }
}

pub fn shared(telemetry: CountingTelemetry) -> SharedTelemetry<Mutex, CountingTelemetry> {
    SharedTelemetry::new(telemetry)
}

/// Telemetry provider whose readings never arrive
#[derive(Default)]
pub struct StalledTelemetry {
    pub starts: Cell<usize>,
    pub stops: Cell<usize>,
}

impl Telemetry for StalledTelemetry {
    type Error = TelemetryError;

    async fn vehicle_speed(&self) -> Result<u32, Self::Error> {
        core::future::pending().await
    }

    async fn engine_rpm(&self) -> Result<u32, Self::Error> {
        core::future::pending().await
    }

    fn start_polling(&self) {
        self.starts.set(self.starts.get() + 1);
    }

    fn stop_polling(&self) {
        self.stops.set(self.stops.get() + 1);
    }
}
