//! Dashboard and system-monitoring models.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Headline numbers for the dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_sessions: u64,
    pub total_connections_today: u64,
    pub system_uptime: String,
    pub disk_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub cpu_usage_percent: f64,
    pub network_status: String,
    pub security_alerts: u64,
}

/// One host metrics sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    #[serde(default)]
    pub id: String,
    pub timestamp: Timestamp,
    /// Percent.
    pub cpu_usage: f64,
    /// Celsius.
    #[serde(default)]
    pub cpu_temperature: Option<f64>,
    /// MB.
    pub memory_total: u64,
    pub memory_used: u64,
    /// GB.
    pub disk_total: u64,
    pub disk_used: u64,
    /// KB/s.
    pub network_upload_speed: f64,
    pub network_download_speed: f64,
    /// GB.
    pub network_total_sent: f64,
    pub network_total_received: f64,
    #[serde(default)]
    pub active_connections: u64,
}

impl SystemMetrics {
    pub fn memory_percent(&self) -> f64 {
        percent(self.memory_used as f64, self.memory_total as f64)
    }

    pub fn disk_percent(&self) -> f64 {
        percent(self.disk_used as f64, self.disk_total as f64)
    }
}

fn percent(used: f64, total: f64) -> f64 {
    if total <= 0.0 { 0.0 } else { used / total * 100.0 }
}

/// `GET /dashboard/metrics/history` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsHistory {
    pub metrics: Vec<SystemMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SystemMetrics {
        serde_json::from_value(serde_json::json!({
            "timestamp": "2024-01-01T00:00:00",
            "cpu_usage": 12.5,
            "memory_total": 2048,
            "memory_used": 512,
            "disk_total": 0,
            "disk_used": 0,
            "network_upload_speed": 1.0,
            "network_download_speed": 2.0,
            "network_total_sent": 0.5,
            "network_total_received": 0.25
        }))
        .unwrap()
    }

    #[test]
    fn memory_percent_is_ratio_of_used() {
        assert_eq!(sample().memory_percent(), 25.0);
    }

    #[test]
    fn zero_total_disk_is_zero_percent() {
        assert_eq!(sample().disk_percent(), 0.0);
    }
}
