//! Animation lifecycle
//!
//! [`AnimationManager`] guarantees that at most one animation renders at a
//! time. Requests ([`start`](AnimationManager::start),
//! [`stop`](AnimationManager::stop)) are serialized by an async mutex and
//! handed to the single render task ([`run`](AnimationManager::run)), which
//! owns the output driver.
//!
//! ```ignore
//! static MANAGER: AnimationManager<CriticalSectionRawMutex> =
//!     AnimationManager::new(EngineConfig::DEFAULT);
//!
//! #[embassy_executor::task]
//! async fn render_task(driver: StripDriver, telemetry: &'static SharedTelemetry<..>) {
//!     let mut driver = driver;
//!     MANAGER.run::<_, _, DEFAULT_LED_COUNT>(&mut driver, telemetry).await;
//! }
//!
//! // From the request handler
//! MANAGER.start(parameters).await?;
//! MANAGER.stop().await;
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer, with_timeout};
use log::{debug, error, info, warn};

use crate::OutputDriver;
use crate::cancel::CancellationToken;
use crate::error::LifecycleError;
use crate::pacing::{FramePacer, SpeedScaling};
use crate::parameters::AnimationParameters;
use crate::renderer::{Renderer, RunOutcome};
use crate::telemetry::{SharedTelemetry, Telemetry};

/// Pause after a run has stopped, before the strip is handed to the next one.
///
/// Lets the output hardware settle after its reset.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(50);

/// Upper bound on waiting for the previous run to stop
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the animation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pause between a run stopping and the next one starting
    pub grace_period: Duration,
    /// How long `start` waits for the previous run, `None` waits forever
    pub stop_timeout: Option<Duration>,
    /// How telemetry readings map onto the speed scale
    pub speed_scaling: SpeedScaling,
}

impl EngineConfig {
    pub const DEFAULT: Self = Self {
        grace_period: DEFAULT_GRACE_PERIOD,
        stop_timeout: Some(DEFAULT_STOP_TIMEOUT),
        speed_scaling: SpeedScaling::MultiplyFirst,
    };
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Work handed from the request side to the render task
#[derive(Debug, Clone, Copy)]
enum RunCommand {
    Start(AnimationParameters),
    Clear,
}

struct LifecycleState {
    /// A command was handed to the render task and its outcome is not collected yet
    outstanding: bool,
}

/// Owner of the currently running animation
pub struct AnimationManager<M: RawMutex> {
    config: EngineConfig,
    state: Mutex<M, LifecycleState>,
    cancel: CancellationToken<M>,
    commands: Signal<M, RunCommand>,
    completion: Signal<M, RunOutcome>,
    current: BlockingMutex<M, Cell<AnimationParameters>>,
}

impl<M: RawMutex> AnimationManager<M> {
    /// Create a manager with no animation running
    pub const fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LifecycleState { outstanding: false }),
            cancel: CancellationToken::new(),
            commands: Signal::new(),
            completion: Signal::new(),
            current: BlockingMutex::new(Cell::new(AnimationParameters::OFF)),
        }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parameters of the animation started last
    ///
    /// Reports [`AnimationParameters::OFF`] until the first start and keeps
    /// the last started parameters after a stop.
    pub fn current_parameters(&self) -> AnimationParameters {
        self.current.lock(Cell::get)
    }

    /// Replace the running animation with one rendering `parameters`
    ///
    /// Waits for the previous run to finish and for the grace period before
    /// handing the new parameters to the render task. Concurrent callers are
    /// served one at a time.
    pub async fn start(&self, parameters: AnimationParameters) -> Result<(), LifecycleError> {
        let mut state = self.state.lock().await;
        self.halt(&mut state).await?;

        self.cancel.reset();
        self.current.lock(|current| current.set(parameters));
        self.commands.signal(RunCommand::Start(parameters));
        state.outstanding = true;

        info!(
            "lifecycle: started {} at brightness {}",
            parameters.animation.as_str(),
            parameters.brightness
        );
        Ok(())
    }

    /// Stop the running animation, if any, and switch the strip off
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let Err(err) = self.halt(&mut state).await {
            error!("lifecycle: cannot clear the strip: {err}");
            return;
        }
        self.commands.signal(RunCommand::Clear);
        state.outstanding = true;
        let outcome = self.collect(&mut state).await;
        if outcome != Ok(RunOutcome::Completed) {
            warn!("lifecycle: clearing the strip ended with {outcome:?}");
        }
        info!("lifecycle: stopped");
    }

    /// Render task body
    ///
    /// Owns `driver` for the lifetime of the manager and executes one command
    /// at a time. Never returns.
    pub async fn run<D, T, const N: usize>(
        &self,
        driver: &mut D,
        telemetry: &SharedTelemetry<M, T>,
    ) where
        D: OutputDriver,
        T: Telemetry,
    {
        let pacer = FramePacer::new(self.config.speed_scaling);
        loop {
            let command = self.commands.wait().await;
            let mut renderer = Renderer::<M, D, T, N>::new(driver, telemetry, &self.cancel, pacer);
            let outcome = match command {
                RunCommand::Start(parameters) => renderer.run(&parameters).await,
                RunCommand::Clear => renderer.clear(),
            };
            self.completion.signal(outcome);
        }
    }

    /// Cancel the outstanding run, wait for it to finish and for the grace period
    async fn halt(&self, state: &mut LifecycleState) -> Result<(), LifecycleError> {
        if state.outstanding {
            self.cancel.cancel();
            match self.collect(state).await? {
                RunOutcome::Cancelled | RunOutcome::Completed => {
                    debug!("lifecycle: previous run finished");
                }
                RunOutcome::Failed => {
                    warn!("lifecycle: previous run failed, continuing");
                }
            }
        }
        Timer::after(self.config.grace_period).await;
        Ok(())
    }

    /// Wait for the outcome of the outstanding command
    async fn collect(&self, state: &mut LifecycleState) -> Result<RunOutcome, LifecycleError> {
        let outcome = match self.config.stop_timeout {
            Some(timeout) => with_timeout(timeout, self.completion.wait())
                .await
                .map_err(|_| {
                    error!("lifecycle: previous run did not stop within {timeout:?}");
                    LifecycleError::StartFailed
                })?,
            None => self.completion.wait().await,
        };
        state.outstanding = false;
        Ok(outcome)
    }
}
