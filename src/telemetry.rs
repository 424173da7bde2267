//! Telemetry provider interface
//!
//! The engine only consumes cached vehicle readings. Acquisition (polling the
//! diagnostics adapter) happens elsewhere and is switched on and off through
//! [`Telemetry::start_polling`] / [`Telemetry::stop_polling`].

use core::cell::Cell;
use core::fmt::Debug;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, info};

use crate::error::TelemetryError;

/// Source of live vehicle readings.
///
/// Reads return the latest cached value and must not wait on the
/// underlying transport. Polling control must be idempotent.
#[allow(async_fn_in_trait)]
pub trait Telemetry {
    type Error: Debug;

    /// Current vehicle speed in km/h
    async fn vehicle_speed(&self) -> Result<u32, Self::Error>;

    /// Current engine speed in revolutions per minute
    async fn engine_rpm(&self) -> Result<u32, Self::Error>;

    fn start_polling(&self);

    fn stop_polling(&self);
}

/// Reference counted polling control over a shared provider
///
/// Every render run that paces from telemetry holds a [`Subscription`].
/// The provider starts polling on the first subscription and stops when the
/// last one is dropped, however runs overlap.
pub struct SharedTelemetry<M: RawMutex, T> {
    inner: T,
    subscribers: Mutex<M, Cell<usize>>,
}

impl<M: RawMutex, T: Telemetry> SharedTelemetry<M, T> {
    pub const fn new(inner: T) -> Self {
        Self {
            inner,
            subscribers: Mutex::new(Cell::new(0)),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Number of live subscriptions
    pub fn subscribers(&self) -> usize {
        self.subscribers.lock(Cell::get)
    }

    /// Subscribe to polling; it stays active until the returned guard drops.
    pub fn subscribe(&self) -> Subscription<'_, M, T> {
        let first = self.subscribers.lock(|count| {
            let current = count.get();
            count.set(current + 1);
            current == 0
        });
        if first {
            debug!("telemetry: first subscriber, starting polling");
            self.inner.start_polling();
        }
        Subscription { shared: self }
    }

    fn unsubscribe(&self) {
        let last = self.subscribers.lock(|count| match count.get() {
            0 => false,
            current => {
                count.set(current - 1);
                current == 1
            }
        });
        if last {
            debug!("telemetry: last subscriber gone, stopping polling");
            self.inner.stop_polling();
        }
    }
}

/// Active polling subscription, released on drop
#[must_use = "polling stops as soon as the subscription is dropped"]
pub struct Subscription<'a, M: RawMutex, T: Telemetry> {
    shared: &'a SharedTelemetry<M, T>,
}

impl<M: RawMutex, T: Telemetry> Drop for Subscription<'_, M, T> {
    fn drop(&mut self) {
        self.shared.unsubscribe();
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Readings {
    speed: Option<u32>,
    rpm: Option<u32>,
    polling: bool,
}

/// Latest telemetry readings, written by an external poller
///
/// The poller should only query the adapter while [`is_polling`](Self::is_polling)
/// is set and record `None` when a query fails.
pub struct TelemetryCache<M: RawMutex> {
    readings: Mutex<M, Cell<Readings>>,
}

impl<M: RawMutex> TelemetryCache<M> {
    pub const fn new() -> Self {
        Self {
            readings: Mutex::new(Cell::new(Readings {
                speed: None,
                rpm: None,
                polling: false,
            })),
        }
    }

    pub fn is_polling(&self) -> bool {
        self.readings.lock(|readings| readings.get().polling)
    }

    pub fn record_speed(&self, speed: Option<u32>) {
        self.update(|readings| readings.speed = speed);
    }

    pub fn record_rpm(&self, rpm: Option<u32>) {
        self.update(|readings| readings.rpm = rpm);
    }

    /// Apply `f` and return whether the polling flag changed
    fn update(&self, f: impl FnOnce(&mut Readings)) -> bool {
        self.readings.lock(|cell| {
            let mut readings = cell.get();
            let was_polling = readings.polling;
            f(&mut readings);
            cell.set(readings);
            was_polling != readings.polling
        })
    }
}

impl<M: RawMutex> Default for TelemetryCache<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> Telemetry for TelemetryCache<M> {
    type Error = TelemetryError;

    async fn vehicle_speed(&self) -> Result<u32, Self::Error> {
        self.readings
            .lock(|readings| readings.get().speed)
            .ok_or(TelemetryError::Unavailable)
    }

    async fn engine_rpm(&self) -> Result<u32, Self::Error> {
        self.readings
            .lock(|readings| readings.get().rpm)
            .ok_or(TelemetryError::Unavailable)
    }

    fn start_polling(&self) {
        if self.update(|readings| readings.polling = true) {
            info!("telemetry: polling started");
        }
    }

    fn stop_polling(&self) {
        if self.update(|readings| readings.polling = false) {
            info!("telemetry: polling stopped");
        }
    }
}
