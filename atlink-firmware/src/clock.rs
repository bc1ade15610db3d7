//! Monotonic and wall-clock time

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use atlink_hal::Clock;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use esp_idf_svc::sntp::{EspSntp, SyncStatus};
use log::{info, warn};

/// Milliseconds since boot
pub struct BootClock {
    start: Instant,
}

impl BootClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for BootClock {
    fn now_ms(&self) -> u32 {
        // Truncation is the documented wrap of the clock
        self.start.elapsed().as_millis() as u32
    }
}

/// SNTP-synchronized local time for the status panel
pub struct WallClock {
    sntp: EspSntp<'static>,
    offset: FixedOffset,
    synced: bool,
}

impl WallClock {
    /// Start SNTP with the default pool servers
    pub fn start(utc_offset_s: i32) -> Result<Self> {
        let sntp = EspSntp::new_default()?;
        let offset = FixedOffset::east_opt(utc_offset_s).unwrap_or_else(|| {
            warn!(target: "time", "UTC offset {utc_offset_s}s out of range, using UTC");
            Utc.fix()
        });
        Ok(Self {
            sntp,
            offset,
            synced: false,
        })
    }

    /// Date (`YYYY-MM-DD`) and time (`HH:MM:SS`), `None` until synchronized
    pub fn local_texts(&mut self) -> Option<(String, String)> {
        if self.sntp.get_sync_status() != SyncStatus::Completed {
            return None;
        }
        if !self.synced {
            self.synced = true;
            info!(target: "time", "clock synchronized");
        }

        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
        let utc = DateTime::from_timestamp(i64::try_from(since_epoch.as_secs()).ok()?, 0)?;
        let local = utc.with_timezone(&self.offset);
        Some((
            local.format("%Y-%m-%d").to_string(),
            local.format("%H:%M:%S").to_string(),
        ))
    }
}
