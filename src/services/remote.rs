//! Cancellation- and timeout-guarded access to a [`SwitchDevice`].
//!
//! Every device round-trip and every scripted delay goes through [`Remote`]:
//! - cancellation is checked before the call is issued
//! - the call races the cancellation token, so an in-flight operation is
//!   abandoned as soon as the session is cancelled
//! - the call is bounded by its expected duration plus configured slack

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::errors::{DeviceError, DeviceResult, SessionError, SessionResult};
use crate::domain::models::{
    Button, DeviceConfig, EncounterEntity, Stick, TimingConfig, TrainerInfo,
};
use crate::domain::ports::SwitchDevice;

/// Hold time used to neutralize the left stick.
pub const STICK_RESET_DURATION: Duration = Duration::from_millis(500);

/// Guarded handle to the device owned by one session.
#[derive(Clone)]
pub struct Remote {
    device: Arc<dyn SwitchDevice>,
    token: CancellationToken,
    slack: Duration,
    program_timeout: Duration,
    timing: TimingConfig,
}

impl Remote {
    pub fn new(
        device: Arc<dyn SwitchDevice>,
        token: CancellationToken,
        config: &DeviceConfig,
        timing: TimingConfig,
    ) -> Self {
        Self {
            device,
            token,
            slack: Duration::from_millis(config.command_slack_ms),
            program_timeout: Duration::from_millis(config.program_timeout_ms),
            timing,
        }
    }

    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    async fn guard<T, F>(&self, operation: &'static str, budget: Duration, call: F) -> SessionResult<T>
    where
        F: Future<Output = DeviceResult<T>> + Send,
    {
        if self.token.is_cancelled() {
            return Err(SessionError::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                debug!(operation, "device operation abandoned on cancellation");
                Err(SessionError::Cancelled)
            }
            result = tokio::time::timeout(budget, call) => match result {
                Ok(inner) => inner.map_err(SessionError::from),
                Err(_) => Err(DeviceError::Timeout { operation, after: budget }.into()),
            },
        }
    }

    /// Scripted delay that ends early on cancellation.
    pub async fn pause(&self, duration: Duration) -> SessionResult<()> {
        if self.token.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(SessionError::Cancelled),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    pub async fn click(&self, button: Button, delay: Duration) -> SessionResult<()> {
        self.guard("click", delay + self.slack, self.device.click(button, delay))
            .await
    }

    pub async fn press_and_hold(
        &self,
        button: Button,
        hold: Duration,
        delay: Duration,
    ) -> SessionResult<()> {
        self.guard(
            "press_and_hold",
            hold + delay + self.slack,
            self.device.press_and_hold(button, hold, delay),
        )
        .await
    }

    /// Move the left stick.
    pub async fn set_stick(&self, x: i16, y: i16, duration: Duration) -> SessionResult<()> {
        self.guard(
            "set_stick",
            duration + self.slack,
            self.device.set_stick(Stick::Left, x, y, duration),
        )
        .await
    }

    /// Center the left stick in case an aborted sequence left it tilted.
    pub async fn reset_stick(&self) -> SessionResult<()> {
        self.set_stick(0, 0, STICK_RESET_DURATION).await
    }

    /// Read an encounter, discarding zeroed or otherwise invalid snapshots.
    pub async fn read_entity(
        &self,
        offset: u32,
        timeout: Duration,
        interval: Duration,
    ) -> SessionResult<Option<EncounterEntity>> {
        let read = self
            .guard(
                "read_until_present",
                timeout + self.slack,
                self.device.read_until_present(offset, timeout, interval),
            )
            .await?;

        Ok(read.filter(|entity| {
            let valid = entity.is_valid();
            if !valid {
                debug!(offset = %format!("{offset:#010X}"), "discarding invalid encounter read");
            }
            valid
        }))
    }

    pub async fn read_until_changed(
        &self,
        offset: u32,
        expected: &[u8],
        timeout: Duration,
        interval: Duration,
        exact: bool,
    ) -> SessionResult<bool> {
        self.guard(
            "read_until_changed",
            timeout + self.slack,
            self.device
                .read_until_changed(offset, expected, timeout, interval, exact),
        )
        .await
    }

    pub async fn is_in_battle(&self) -> SessionResult<bool> {
        self.guard("is_in_battle", self.slack, self.device.is_in_battle())
            .await
    }

    pub async fn close_program(&self) -> SessionResult<()> {
        self.guard(
            "close_program",
            self.program_timeout,
            self.device.close_program(&self.timing),
        )
        .await
    }

    pub async fn start_program(&self) -> SessionResult<()> {
        self.guard(
            "start_program",
            self.program_timeout,
            self.device.start_program(&self.timing),
        )
        .await
    }

    pub async fn start_program_slow(&self) -> SessionResult<()> {
        self.guard(
            "start_program_slow",
            self.program_timeout,
            self.device.start_program_slow(&self.timing),
        )
        .await
    }

    pub async fn identify_trainer(&self) -> SessionResult<TrainerInfo> {
        self.guard("identify_trainer", self.slack, self.device.identify_trainer())
            .await
    }

    /// Neutralize the stick and release the controller.
    ///
    /// Runs even after cancellation; each step is bounded and failures are
    /// only logged.
    pub async fn cleanup(&self) {
        let reset = tokio::time::timeout(
            STICK_RESET_DURATION + self.slack,
            self.device.set_stick(Stick::Left, 0, 0, STICK_RESET_DURATION),
        )
        .await;
        if let Err(e) = flatten(reset, "set_stick", STICK_RESET_DURATION + self.slack) {
            warn!(error = %e, "failed to reset stick during cleanup");
        }

        let detach = tokio::time::timeout(self.slack, self.device.detach_controller()).await;
        if let Err(e) = flatten(detach, "detach_controller", self.slack) {
            warn!(error = %e, "failed to detach controller during cleanup");
        }
    }
}

fn flatten<T>(
    result: Result<DeviceResult<T>, tokio::time::error::Elapsed>,
    operation: &'static str,
    after: Duration,
) -> DeviceResult<T> {
    result.unwrap_or(Err(DeviceError::Timeout { operation, after }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SimulationConfig;
    use crate::infrastructure::device::{DeviceCall, SimulatedDevice};

    fn remote_for(device: &Arc<SimulatedDevice>, token: CancellationToken) -> Remote {
        Remote::new(
            Arc::clone(device) as Arc<dyn SwitchDevice>,
            token,
            &DeviceConfig::default(),
            TimingConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_blocks_new_operations() {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        let token = CancellationToken::new();
        let remote = remote_for(&device, token.clone());

        token.cancel();
        let result = remote.click(Button::A, Duration::from_millis(250)).await;

        assert!(matches!(result, Err(SessionError::Cancelled)));
        assert!(device.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_abandons_in_flight_operation() {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        let token = CancellationToken::new();
        let remote = remote_for(&device, token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let result = remote.set_stick(0, 30_000, Duration::from_secs(10)).await;

        assert!(matches!(result, Err(SessionError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_reads_are_discarded() {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        device.queue_reads([Some(EncounterEntity {
            species: 0,
            ivs: [0; 6],
            shiny: false,
            raw: vec![0; 8],
        })]);
        let remote = remote_for(&device, CancellationToken::new());

        let read = remote
            .read_entity(0x10, Duration::from_millis(500), Duration::from_millis(200))
            .await
            .unwrap();
        assert!(read.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_runs_after_cancellation() {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        let token = CancellationToken::new();
        let remote = remote_for(&device, token.clone());

        token.cancel();
        remote.cleanup().await;

        assert_eq!(
            device.calls(),
            vec![DeviceCall::SetStick { x: 0, y: 0 }, DeviceCall::DetachController]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_errors_propagate() {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        device.disconnect_after(0);
        let remote = remote_for(&device, CancellationToken::new());

        let result = remote.is_in_battle().await;
        assert!(matches!(
            result,
            Err(SessionError::Device(DeviceError::Disconnected(_)))
        ));
    }
}
