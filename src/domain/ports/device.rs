use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::DeviceResult;
use crate::domain::models::{Button, EncounterEntity, Stick, TimingConfig, TrainerInfo};

/// Port for a console that accepts controller input and memory reads.
///
/// Implementations own the transport (socket, USB, simulator). Every method
/// is a suspension point; the session bounds each call with a timeout and a
/// cancellation check, so implementations do not need to.
///
/// Exactly one session drives a device at a time.
#[async_trait]
pub trait SwitchDevice: Send + Sync {
    /// Press and release `button`, then wait `delay`.
    async fn click(&self, button: Button, delay: Duration) -> DeviceResult<()>;

    /// Hold `button` for `hold`, release it, then wait `delay`.
    async fn press_and_hold(&self, button: Button, hold: Duration, delay: Duration)
        -> DeviceResult<()>;

    /// Set `stick` to `(x, y)` and keep it there for `duration`.
    async fn set_stick(&self, stick: Stick, x: i16, y: i16, duration: Duration)
        -> DeviceResult<()>;

    /// Poll `offset` every `interval` until an entity decodes or `timeout`
    /// elapses.
    ///
    /// # Returns
    /// * `Ok(Some(entity))` once something decoded (may still be invalid)
    /// * `Ok(None)` if nothing decoded before the timeout
    async fn read_until_present(
        &self,
        offset: u32,
        timeout: Duration,
        interval: Duration,
    ) -> DeviceResult<Option<EncounterEntity>>;

    /// Poll `offset` every `interval` until its bytes match `expected`
    /// (`exact`) or differ from it (`!exact`), or `timeout` elapses.
    ///
    /// # Returns
    /// * `Ok(true)` if the condition was observed before the timeout
    async fn read_until_changed(
        &self,
        offset: u32,
        expected: &[u8],
        timeout: Duration,
        interval: Duration,
        exact: bool,
    ) -> DeviceResult<bool>;

    /// Whether the console is currently in a battle.
    async fn is_in_battle(&self) -> DeviceResult<bool>;

    /// Close the running game.
    async fn close_program(&self, timing: &TimingConfig) -> DeviceResult<()>;

    /// Start the game and wait until the overworld is loaded.
    async fn start_program(&self, timing: &TimingConfig) -> DeviceResult<()>;

    /// Like [`start_program`](Self::start_program) with longer load waits.
    async fn start_program_slow(&self, timing: &TimingConfig) -> DeviceResult<()>;

    /// Read the host console's trainer data.
    async fn identify_trainer(&self) -> DeviceResult<TrainerInfo>;

    /// Release the virtual controller.
    async fn detach_controller(&self) -> DeviceResult<()>;
}
