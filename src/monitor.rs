//! Throughput accounting for multi-channel scans.

use core::fmt;
use core::time::Duration;

use crate::constants::DataRate;

/// Notified after every completed scan.
pub trait AcquisitionObserver {
    fn on_scan(&mut self, samples: usize);
}

impl AcquisitionObserver for () {
    fn on_scan(&mut self, _samples: usize) {}
}

/// Counts acquired samples and compares the achieved rate to the
/// configured data rate.
///
/// The monitor has no clock of its own; pass the elapsed wall time to
/// [`PerformanceMonitor::report`].
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    theoretical_sps: f64,
    total_samples: u64,
    total_scans: u64,
}

impl PerformanceMonitor {
    pub fn new(data_rate: DataRate) -> Self {
        log::debug!(
            "Performance monitor started, theoretical max {} SPS",
            data_rate.sps()
        );
        PerformanceMonitor {
            theoretical_sps: data_rate.sps(),
            total_samples: 0,
            total_scans: 0,
        }
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn total_scans(&self) -> u64 {
        self.total_scans
    }

    pub fn reset(&mut self) {
        self.total_samples = 0;
        self.total_scans = 0;
    }

    pub fn report(&self, elapsed: Duration) -> PerformanceReport {
        let seconds = elapsed.as_secs_f64();
        let mut report = PerformanceReport {
            runtime: elapsed,
            total_samples: self.total_samples,
            total_scans: self.total_scans,
            theoretical_sps: self.theoretical_sps,
            total_sps: 0.0,
            per_channel_sps: 0.0,
            efficiency_percent: 0.0,
        };
        if seconds <= 0.0 || self.total_samples == 0 || self.theoretical_sps <= 0.0 {
            return report;
        }

        report.total_sps = self.total_samples as f64 / seconds;
        report.per_channel_sps = if self.total_scans > 0 {
            let channels_per_scan = self.total_samples as f64 / self.total_scans as f64;
            report.total_sps / channels_per_scan
        } else {
            report.total_sps
        };
        report.efficiency_percent = report.per_channel_sps / self.theoretical_sps * 100.0;
        report
    }
}

impl AcquisitionObserver for PerformanceMonitor {
    fn on_scan(&mut self, samples: usize) {
        self.total_samples += samples as u64;
        self.total_scans += 1;
    }
}

/// Snapshot produced by [`PerformanceMonitor::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub runtime: Duration,
    pub total_samples: u64,
    pub total_scans: u64,
    /// Configured data rate, i.e. the best case for one channel.
    pub theoretical_sps: f64,
    /// All samples over wall time.
    pub total_sps: f64,
    /// Rate at which each scanned channel was refreshed.
    pub per_channel_sps: f64,
    pub efficiency_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    NoData,
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceReport {
    pub fn rating(&self) -> Rating {
        match self.efficiency_percent {
            _ if self.total_samples == 0 => Rating::NoData,
            e if e > 90.0 => Rating::Excellent,
            e if e > 75.0 => Rating::Good,
            e if e > 50.0 => Rating::Fair,
            _ => Rating::Poor,
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runtime: {:.2} s", self.runtime.as_secs_f64())?;
        writeln!(f, "samples: {}", self.total_samples)?;
        writeln!(f, "scans: {}", self.total_scans)?;
        writeln!(f, "theoretical SPS: {:.0}", self.theoretical_sps)?;
        writeln!(f, "total SPS: {:.1}", self.total_sps)?;
        writeln!(f, "per-channel SPS: {:.1}", self.per_channel_sps)?;
        write!(
            f,
            "efficiency: {:.1}% ({:?})",
            self.efficiency_percent,
            self.rating()
        )
    }
}
