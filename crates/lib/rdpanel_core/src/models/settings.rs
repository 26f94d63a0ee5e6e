//! Panel settings models. Defaults mirror the backend's.

use serde::{Deserialize, Serialize};

use super::Timestamp;
use super::logs::LogLevel;
use super::rdp::{DEFAULT_RDP_PORT, RdpQuality};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    /// Minutes.
    pub auto_lock_timeout: u32,
    pub require_two_factor: bool,
    pub allowed_ips: Vec<String>,
    pub vpn_required: bool,
    pub encryption_level: String,
    pub max_failed_logins: u32,
    /// Minutes.
    pub lockout_duration: u32,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            auto_lock_timeout: 30,
            require_two_factor: true,
            allowed_ips: Vec::new(),
            vpn_required: true,
            encryption_level: "AES-256".to_string(),
            max_failed_logins: 5,
            lockout_duration: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RdpSettings {
    pub default_port: u16,
    pub default_quality: RdpQuality,
    pub audio_redirection: bool,
    pub clipboard_sync: bool,
    /// Seconds.
    pub connection_timeout: u32,
}

impl Default for RdpSettings {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_RDP_PORT,
            default_quality: RdpQuality::High,
            audio_redirection: true,
            clipboard_sync: true,
            connection_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// MB.
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
    pub quarantine_files: bool,
    pub encrypt_uploads: bool,
    pub scan_for_malware: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            max_file_size: 100,
            allowed_extensions: ["pdf", "doc", "docx", "txt", "jpg", "png", "zip"]
                .into_iter()
                .map(String::from)
                .collect(),
            quarantine_files: true,
            encrypt_uploads: true,
            scan_for_malware: true,
        }
    }
}

impl FileSettings {
    /// Whether `file_name` has one of the allowed extensions.
    pub fn allows(&self, file_name: &str) -> bool {
        let Some((_, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub login_alerts: bool,
    #[serde(default)]
    pub file_transfer_alerts: bool,
    #[serde(default = "default_true")]
    pub system_alerts: bool,
    pub notification_email: String,
}

impl NotificationSettings {
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email_notifications: true,
            login_alerts: true,
            file_transfer_alerts: false,
            system_alerts: true,
            notification_email: email.into(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSettings {
    pub log_level: LogLevel,
    pub log_retention_days: u32,
    pub auto_backup: bool,
    pub backup_interval_hours: u32,
    pub maintenance_mode: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_retention_days: 30,
            auto_backup: true,
            backup_interval_hours: 24,
            maintenance_mode: false,
        }
    }
}

/// Full settings document (`GET/PUT /settings/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub rdp: RdpSettings,
    #[serde(default)]
    pub files: FileSettings,
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub system: SystemSettings,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_by: String,
}

/// Settings backup as produced by `GET /settings/backup` and accepted by
/// `POST /settings/restore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsBackup {
    #[serde(default)]
    pub backup_timestamp: Option<String>,
    #[serde(default)]
    pub backup_by: Option<String>,
    pub settings: AppSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_fill_missing_fields_with_defaults() {
        let settings: AppSettings = serde_json::from_value(serde_json::json!({
            "notifications": {"notification_email": "ops@example.com"},
            "rdp": {"default_port": 3390, "stealth_mode": true}
        }))
        .unwrap();
        assert_eq!(settings.rdp.default_port, 3390);
        assert!(settings.rdp.clipboard_sync);
        assert_eq!(settings.security.max_failed_logins, 5);
        assert!(settings.notifications.login_alerts);
        assert_eq!(settings.system.log_level, LogLevel::Info);
    }

    #[test]
    fn file_settings_check_extension() {
        let files = FileSettings::default();
        assert!(files.allows("report.PDF"));
        assert!(!files.allows("payload.exe"));
        assert!(!files.allows("README"));
    }
}
