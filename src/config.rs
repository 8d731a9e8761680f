use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::errors::ConfigError;

#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPolicy {
    Relative,
    Absolute,
}

/// Panel tracking modes as understood by the CBase forecast request
#[derive(Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Tracking {
    FixedAngle,
    YAxis,
    XAxis,
    YxAxis,
}

impl Tracking {
    /// Integer code of the tracking mode on the wire, a contract with the
    /// provider api
    pub fn wire_code(&self) -> u8 {
        match self {
            Tracking::FixedAngle => 0,
            Tracking::YAxis => 1,
            Tracking::XAxis => 2,
            Tracking::YxAxis => 3,
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    #[serde(default)]
    pub offline_mode: bool,
    #[serde(default)]
    pub offline_file: String,
}

#[derive(Deserialize, Clone)]
pub struct ScheduleParameters {
    pub interval_policy: IntervalPolicy,
    pub interval_millis: i64,
    pub absolute_start_hour: u32,
    pub timeout_millis: u64,
    pub rate_limit_per_hour: u32,
}

#[derive(Deserialize, Clone)]
pub struct SiteParameters {
    pub lat: f64,
    pub long: f64,
    pub panel_qty: u32,
    pub panel_out: u32,
    pub inv_cap: Option<f64>,
    pub tracking: Tracking,
    pub slope: i32,
    pub azimuth: i32,
    pub api_key: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseParameters {
    pub enabled: bool,
    pub connection_string: String,
    pub table_name: String,
}

#[derive(Deserialize, Clone)]
pub struct Config {
    pub general: General,
    pub schedule: ScheduleParameters,
    pub site: SiteParameters,
    pub database: DatabaseParameters,
}

impl General {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !self.log_to_stdout && self.log_path.is_empty() {
            violations.push("either log_to_stdout or a log_path must be configured".to_string());
        }
        if self.offline_mode && self.offline_file.is_empty() {
            violations.push("offline_file must be set when offline_mode is enabled".to_string());
        }

        violations
    }
}

impl ScheduleParameters {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.interval_millis < 60_000 {
            violations.push("interval_millis must be at least 60000 (one minute)".to_string());
        }
        if self.interval_policy == IntervalPolicy::Absolute && self.absolute_start_hour > 23 {
            violations.push("absolute_start_hour must be between 0 and 23".to_string());
        }
        if self.rate_limit_per_hour < 1 {
            violations.push("rate_limit_per_hour must be at least 1".to_string());
        }

        violations
    }
}

impl SiteParameters {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !(-90.0..=90.0).contains(&self.lat) {
            violations.push("lat must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.long) {
            violations.push("long must be between -180 and 180".to_string());
        }
        if self.panel_qty < 1 {
            violations.push("panel_qty must be greater than 0".to_string());
        }
        if self.panel_out < 1 {
            violations.push("panel_out must be greater than 0".to_string());
        }
        if self.inv_cap.is_some_and(|c| c < 0.0) {
            violations.push("inv_cap must be greater than or equal to 0".to_string());
        }
        if self.api_key.trim().is_empty() {
            violations.push("api_key must be provided".to_string());
        }

        // slope and azimuth only matter for the modes that send them
        let needs_slope = matches!(self.tracking, Tracking::FixedAngle | Tracking::XAxis);
        let needs_azimuth = matches!(self.tracking, Tracking::FixedAngle | Tracking::YAxis);
        if needs_slope && !(0..=90).contains(&self.slope) {
            violations.push("slope must be between 0 and 90".to_string());
        }
        if needs_azimuth && !(0..=360).contains(&self.azimuth) {
            violations.push("azimuth must be between 0 and 360".to_string());
        }

        violations
    }
}

impl DatabaseParameters {
    pub fn validate(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if self.enabled && self.connection_string.is_empty() {
            violations.push("connection_string must be set when the database is enabled".to_string());
        }
        let valid_table = !self.table_name.is_empty()
            && self.table_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid_table {
            violations.push("table_name must be a plain sql identifier".to_string());
        }

        violations
    }
}

impl Config {
    /// Validates the full configuration and returns the list of violations,
    /// which is empty for a valid configuration
    pub fn validate(&self) -> Vec<String> {
        let mut violations = self.general.validate();
        violations.extend(self.schedule.validate());
        violations.extend(self.site.validate());
        violations.extend(self.database.validate());
        violations
    }
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            general: General {
                log_path: String::new(),
                log_level: LevelFilter::Info,
                log_to_stdout: true,
                offline_mode: false,
                offline_file: String::new(),
            },
            schedule: ScheduleParameters {
                interval_policy: IntervalPolicy::Absolute,
                interval_millis: 10_800_000,
                absolute_start_hour: 0,
                timeout_millis: 60_000,
                rate_limit_per_hour: 10,
            },
            site: SiteParameters {
                lat: 61.5,
                long: 23.75,
                panel_qty: 24,
                panel_out: 405,
                inv_cap: None,
                tracking: Tracking::FixedAngle,
                slope: 30,
                azimuth: 180,
                api_key: "secret".to_string(),
            },
            database: DatabaseParameters {
                enabled: true,
                connection_string: "host=localhost user=pvlogger".to_string(),
                table_name: "pv_forecast".to_string(),
            },
        }
    }

    #[test]
    fn valid_configuration_has_no_violations() {
        assert!(valid_config().validate().is_empty());
    }

    #[test]
    fn out_of_range_site_values_are_reported() {
        let mut config = valid_config();
        config.site.lat = 91.0;
        config.site.panel_qty = 0;
        config.site.api_key = "  ".to_string();

        let violations = config.validate();
        assert_eq!(violations.len(), 3);
        assert!(violations[0].contains("lat"));
    }

    #[test]
    fn slope_and_azimuth_are_mode_conditional() {
        let mut config = valid_config();
        config.site.slope = 120;
        config.site.azimuth = 400;

        assert_eq!(config.validate().len(), 2);

        // dual-axis tracking sends neither angle, so neither is validated
        config.site.tracking = Tracking::YxAxis;
        assert!(config.validate().is_empty());

        config.site.tracking = Tracking::YAxis;
        assert_eq!(config.validate(), vec!["azimuth must be between 0 and 360".to_string()]);
    }

    #[test]
    fn sub_minute_interval_is_rejected() {
        let mut config = valid_config();
        config.schedule.interval_millis = 6_000;

        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn offline_mode_requires_a_file() {
        let mut config = valid_config();
        config.general.offline_mode = true;

        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn dubious_table_name_is_rejected() {
        let mut config = valid_config();
        config.database.table_name = "pv_forecast; drop table".to_string();

        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn tracking_wire_codes_match_the_provider_contract() {
        assert_eq!(Tracking::FixedAngle.wire_code(), 0);
        assert_eq!(Tracking::YAxis.wire_code(), 1);
        assert_eq!(Tracking::XAxis.wire_code(), 2);
        assert_eq!(Tracking::YxAxis.wire_code(), 3);
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml = r#"
            [general]
            log_path = ""
            log_level = "info"
            log_to_stdout = true

            [schedule]
            interval_policy = "absolute"
            interval_millis = 10800000
            absolute_start_hour = 0
            timeout_millis = 60000
            rate_limit_per_hour = 10

            [site]
            lat = 61.5
            long = 23.75
            panel_qty = 24
            panel_out = 405
            tracking = "fixed_angle"
            slope = 30
            azimuth = 180
            api_key = "secret"

            [database]
            enabled = false
            connection_string = ""
            table_name = "pv_forecast"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.schedule.interval_policy, IntervalPolicy::Absolute);
        assert_eq!(config.site.tracking, Tracking::FixedAngle);
        assert!(config.validate().is_empty());
    }
}
