//! End-of-run report: console summary and timestamped text file.

use crate::config::ReportConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Metrics stamped with the time the run finished
#[derive(Clone, Debug)]
pub struct RunReport {
    pub metrics: Metrics,
    pub finished_at: DateTime<Local>,
    /// Wheel radius for the meters estimate, 0 = omit
    pub wheel_radius: f32,
}

impl RunReport {
    pub fn new(metrics: Metrics, wheel_radius: f32) -> Self {
        Self {
            metrics,
            finished_at: Local::now(),
            wheel_radius,
        }
    }

    /// `<prefix>_YYYYMMDD_HHMMSS.txt`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}.txt", prefix, self.finished_at.format("%Y%m%d_%H%M%S"))
    }

    /// Write the report as `Label: value` lines
    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let m = &self.metrics;
        writeln!(out, "Timestamp: {}", self.finished_at.to_rfc3339())?;
        writeln!(out, "Elapsed Time: {:.3}", m.elapsed_secs)?;
        writeln!(out, "Distance: {:.3}", m.distance)?;
        if self.wheel_radius > 0.0 {
            writeln!(out, "Distance (m): {:.3}", m.distance_meters(self.wheel_radius))?;
        }
        writeln!(out, "Collisions: {}", m.collisions)?;
        writeln!(out, "Goal Reached: {}", m.goal_reached)?;
        writeln!(out, "Final Status: {}", m.final_status)?;
        Ok(())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        writeln!(f, "=== Run Summary ===")?;
        writeln!(f, "  Elapsed time: {:.2} s", m.elapsed_secs)?;
        if self.wheel_radius > 0.0 {
            writeln!(
                f,
                "  Distance:     {:.2} rad ({:.3} m)",
                m.distance,
                m.distance_meters(self.wheel_radius)
            )?;
        } else {
            writeln!(f, "  Distance:     {:.2} rad", m.distance)?;
        }
        writeln!(f, "  Collisions:   {}", m.collisions)?;
        writeln!(f, "  Goal reached: {}", m.goal_reached)?;
        write!(f, "  Final status: {}", m.final_status)
    }
}

/// Prints and persists run reports
pub struct ReportSink {
    config: ReportConfig,
}

impl ReportSink {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Print the summary and, if enabled, write the report file.
    ///
    /// A failed file write is logged and does not fail the run. Returns the
    /// path written, if any.
    pub fn emit(&self, metrics: &Metrics) -> Option<PathBuf> {
        let report = RunReport::new(metrics.clone(), self.config.wheel_radius);
        println!("{}", report);

        if !self.config.write_file {
            return None;
        }
        match self.write_file(&report) {
            Ok(path) => {
                tracing::info!("Report saved to {:?}", path);
                Some(path)
            }
            Err(e) => {
                tracing::error!("Failed to write report: {}", e);
                None
            }
        }
    }

    fn write_file(&self, report: &RunReport) -> Result<PathBuf> {
        let dir = Path::new(&self.config.output_dir);
        fs::create_dir_all(dir)?;
        let path = dir.join(report.file_name(&self.config.file_prefix));
        let mut file = File::create(&path)?;
        report.write_to(&mut file)?;
        file.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::FinalStatus;

    fn metrics() -> Metrics {
        Metrics {
            elapsed_secs: 12.8,
            distance: 40.5,
            collisions: 3,
            goal_reached: false,
            final_status: FinalStatus::Stuck,
        }
    }

    #[test]
    fn test_file_name_format() {
        let report = RunReport::new(metrics(), 0.0);
        let name = report.file_name("run_report");
        assert!(name.starts_with("run_report_"));
        assert!(name.ends_with(".txt"));
        // run_report_ + YYYYMMDD_HHMMSS + .txt
        assert_eq!(name.len(), "run_report_".len() + 15 + 4);
    }

    #[test]
    fn test_report_lines() {
        let report = RunReport::new(metrics(), 0.0205);
        let mut buf = Vec::new();
        report.write_to(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Elapsed Time: 12.800\n"));
        assert!(text.contains("Distance: 40.500\n"));
        assert!(text.contains("Distance (m): 0.830\n"));
        assert!(text.contains("Collisions: 3\n"));
        assert!(text.contains("Goal Reached: false\n"));
        assert!(text.contains("Final Status: Stuck\n"));
        for line in text.lines() {
            assert!(line.contains(": "), "line without label: {}", line);
        }
    }

    #[test]
    fn test_summary_display() {
        let summary = RunReport::new(metrics(), 0.0).to_string();
        assert!(summary.contains("Collisions:   3"));
        assert!(summary.contains("Final status: Stuck"));
        assert!(!summary.contains(" m)"));
    }
}
