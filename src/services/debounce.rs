//! Debounced confirmation of flickery memory flags.
//!
//! Right after a state transition the battle menu flag can flicker between
//! its old and new value. A single matching read is not trusted: the flag
//! has to be confirmed on several consecutive samples, and each sample itself
//! polls the device until it matches or times out.

use std::time::Duration;

use tracing::debug;

use crate::domain::errors::SessionResult;
use crate::domain::models::{DebounceConfig, OffsetsConfig};
use crate::services::remote::Remote;

/// Battle menu flag value once the menu accepts input.
pub const BATTLE_MENU_READY: [u8; 4] = [0, 0, 0, 255];

/// Reusable debounced reader for one memory flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebouncedReader {
    offset: u32,
    expected: Vec<u8>,
    samples: u32,
    timeout: Duration,
    interval: Duration,
}

impl DebouncedReader {
    pub fn new(
        offset: u32,
        expected: impl Into<Vec<u8>>,
        samples: u32,
        timeout: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            offset,
            expected: expected.into(),
            samples: samples.max(1),
            timeout,
            interval,
        }
    }

    /// Reader for the battle menu ready flag.
    pub fn battle_menu(offsets: &OffsetsConfig, config: &DebounceConfig) -> Self {
        Self::new(
            offsets.battle_menu,
            BATTLE_MENU_READY,
            config.samples,
            Duration::from_millis(config.timeout_ms),
            Duration::from_millis(config.interval_ms),
        )
    }

    pub const fn samples(&self) -> u32 {
        self.samples
    }

    /// Whether the flag matched on every one of the consecutive samples.
    ///
    /// Stops at the first sample that does not confirm.
    pub async fn confirm(&self, remote: &Remote) -> SessionResult<bool> {
        for sample in 1..=self.samples {
            let matched = remote
                .read_until_changed(self.offset, &self.expected, self.timeout, self.interval, true)
                .await?;
            if !matched {
                debug!(sample, samples = self.samples, "flag flickered, not confirmed");
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{DeviceConfig, SimulationConfig, TimingConfig};
    use crate::domain::ports::SwitchDevice;
    use crate::infrastructure::device::{DeviceCall, SimulatedDevice};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    fn setup() -> (Arc<SimulatedDevice>, Remote, DebouncedReader) {
        let device = Arc::new(SimulatedDevice::new(SimulationConfig::default()));
        let remote = Remote::new(
            Arc::clone(&device) as Arc<dyn SwitchDevice>,
            CancellationToken::new(),
            &DeviceConfig::default(),
            TimingConfig::default(),
        );
        let reader = DebouncedReader::battle_menu(&OffsetsConfig::default(), &DebounceConfig::default());
        (device, remote, reader)
    }

    fn menu_reads(device: &SimulatedDevice) -> usize {
        device
            .calls()
            .iter()
            .filter(|call| matches!(call, DeviceCall::ReadUntilChanged(_)))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_consecutive_samples_confirm() {
        let (device, remote, reader) = setup();
        device.queue_menu_samples([true, true, true]);

        assert!(reader.confirm(&remote).await.unwrap());
        assert_eq!(menu_reads(&device), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_followed_by_mismatch_is_not_confirmed() {
        let (device, remote, reader) = setup();
        device.queue_menu_samples([true, false, true]);

        assert!(!reader.confirm(&remote).await.unwrap());
        assert_eq!(menu_reads(&device), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_samples_floor_at_one() {
        let reader = DebouncedReader::new(0, BATTLE_MENU_READY, 0, Duration::ZERO, Duration::ZERO);
        assert_eq!(reader.samples(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_battle_menu_offset() {
        let (device, remote, reader) = setup();
        device.queue_menu_samples([true, true, true]);
        reader.confirm(&remote).await.unwrap();

        let offset = OffsetsConfig::default().battle_menu;
        assert!(device
            .calls()
            .iter()
            .all(|call| *call == DeviceCall::ReadUntilChanged(offset)));
    }
}
