use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;
use log::{debug, error, info};

use crate::OutputDriver;
use crate::animation::WHEEL_STEPS;
use crate::cancel::CancellationToken;
use crate::color::{BLACK, Rgb};
use crate::pacing::FramePacer;
use crate::parameters::AnimationParameters;
use crate::telemetry::{SharedTelemetry, Telemetry};

/// Brightness used when the strip is only configured to be cleared
const CLEAR_BRIGHTNESS: u8 = u8::MAX;

/// How a render run or clear request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run observed its cancellation token
    Cancelled,
    /// A clear request finished
    Completed,
    /// The output driver reported an error
    Failed,
}

/// Renders one animation run onto an exclusively borrowed output driver
///
/// The renderer borrows the driver for the whole run, so no other run can
/// write to the strip until it returns.
pub struct Renderer<'a, M: RawMutex, D: OutputDriver, T: Telemetry, const N: usize> {
    // External dependencies
    driver: &'a mut D,
    telemetry: &'a SharedTelemetry<M, T>,
    cancel: &'a CancellationToken<M>,
    pacer: FramePacer,

    frame_buffer: [Rgb; N],
}

impl<'a, M: RawMutex, D: OutputDriver, T: Telemetry, const N: usize> Renderer<'a, M, D, T, N> {
    pub fn new(
        driver: &'a mut D,
        telemetry: &'a SharedTelemetry<M, T>,
        cancel: &'a CancellationToken<M>,
        pacer: FramePacer,
    ) -> Self {
        Self {
            driver,
            telemetry,
            cancel,
            pacer,
            frame_buffer: [BLACK; N],
        }
    }

    /// Render `parameters` until the cancellation token fires
    ///
    /// Telemetry polling is held for the duration of the run when the speed
    /// type needs it. The strip is reset and released on every exit path.
    pub async fn run(&mut self, parameters: &AnimationParameters) -> RunOutcome {
        info!(
            "render: starting {} with {:?} pacing on {} leds",
            parameters.animation.as_str(),
            parameters.speed_type,
            N
        );

        if let Err(err) = self.driver.configure(N, parameters.brightness) {
            error!("render: failed to configure output: {err:?}");
            self.driver.release();
            return RunOutcome::Failed;
        }

        let telemetry = self.telemetry;
        let subscription = parameters
            .speed_type
            .uses_telemetry()
            .then(|| telemetry.subscribe());

        let rendered = self.render_frames(parameters).await;
        drop(subscription);
        let reset = self.shutdown();

        match (rendered, reset) {
            (Ok(()), Ok(())) => {
                debug!("render: {} cancelled", parameters.animation.as_str());
                RunOutcome::Cancelled
            }
            (Err(err), _) => {
                error!("render: output failed while rendering: {err:?}");
                RunOutcome::Failed
            }
            (Ok(()), Err(err)) => {
                error!("render: failed to reset output: {err:?}");
                RunOutcome::Failed
            }
        }
    }

    /// Switch every LED off
    pub fn clear(&mut self) -> RunOutcome {
        if let Err(err) = self.driver.configure(N, CLEAR_BRIGHTNESS) {
            error!("render: failed to configure output for clearing: {err:?}");
            self.driver.release();
            return RunOutcome::Failed;
        }
        match self.shutdown() {
            Ok(()) => RunOutcome::Completed,
            Err(err) => {
                error!("render: failed to clear output: {err:?}");
                RunOutcome::Failed
            }
        }
    }

    async fn render_frames(&mut self, parameters: &AnimationParameters) -> Result<(), D::Error> {
        loop {
            for step in 0..WHEEL_STEPS {
                // The frame timer may win a tie against cancellation
                if self.cancel.is_cancelled() {
                    return Ok(());
                }

                #[allow(clippy::cast_possible_truncation)]
                let step = step as u8;
                parameters
                    .animation
                    .render(parameters.custom_color, step, &mut self.frame_buffer);
                self.driver.write(&self.frame_buffer)?;

                // Skip the delay when cancelled while rendering
                if self.cancel.is_cancelled() {
                    return Ok(());
                }

                let delay = match select(
                    self.pacer.frame_delay(parameters, self.telemetry.inner()),
                    self.cancel.cancelled(),
                )
                .await
                {
                    Either::First(delay) => delay,
                    Either::Second(()) => return Ok(()),
                };

                if let Either::Second(()) =
                    select(Timer::after(delay), self.cancel.cancelled()).await
                {
                    return Ok(());
                }
            }
        }
    }

    /// Reset the strip to all-off and release it
    fn shutdown(&mut self) -> Result<(), D::Error> {
        let reset = self.driver.reset();
        self.driver.release();
        reset
    }
}
