pub mod errors;
pub mod rate_limit;

use std::fs;
use std::time::Duration;
use chrono::Utc;
use log::{debug, info, warn};
use ureq::Agent;
use crate::cancel::CancelToken;
use crate::config::{General, ScheduleParameters, SiteParameters, Tracking};
use crate::manager_cbase::errors::CBaseError;
use crate::manager_cbase::rate_limit::{Acquire, RateLimit};

const API_ENDPOINT: &str = "https://www.cbase.fi/api/pvfcst_request";

/// Network timeout for a single forecast request
const NETWORK_TIMEOUT: Duration = Duration::from_secs(30);

/// Struct for managing photovoltaic production forecasts from CBase
pub struct CBase {
    agent: Agent,
    site: SiteParameters,
    limiter: RateLimit,
    offline_file: Option<String>,
}

impl CBase {
    /// Returns a CBase struct ready for fetching forecast csv documents.
    ///
    /// The http timeout is the fixed 30 second network timeout, capped by
    /// the configured per-cycle fetch budget when that is smaller.
    ///
    /// # Arguments
    ///
    /// * 'site' - pv site parameters sent as query parameters
    /// * 'schedule' - schedule parameters holding rate limit and timeout
    /// * 'general' - general parameters holding the offline mode switch
    pub fn new(site: &SiteParameters, schedule: &ScheduleParameters, general: &General) -> CBase {
        let timeout = NETWORK_TIMEOUT.min(Duration::from_millis(schedule.timeout_millis));
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        let agent = config.into();

        let offline_file = general.offline_mode.then(|| general.offline_file.clone());

        CBase {
            agent,
            site: site.clone(),
            limiter: RateLimit::new(schedule.rate_limit_per_hour),
            offline_file,
        }
    }

    /// Retrieves one raw forecast csv document.
    ///
    /// Returns Ok(None) when the hourly rate limit denies the attempt, in
    /// which case the call waits until the start of the next hour (bounded
    /// by the cancellation token) so the following cycle can try again.
    /// Transport and status failures are returned as errors and there is no
    /// retry within the call, the next scheduled cycle is the retry.
    ///
    /// In offline mode the document is read from a local file instead and
    /// the rate limiter is left untouched.
    ///
    /// # Arguments
    ///
    /// * 'cancel' - token bounding the rate limit denial wait
    pub fn get_forecast_csv(&mut self, cancel: &CancelToken) -> Result<Option<String>, CBaseError> {
        if let Some(file) = &self.offline_file {
            debug!("reading forecast csv from offline file {}", file);
            return Ok(Some(fs::read_to_string(file)?));
        }

        match self.limiter.try_acquire(Utc::now()) {
            Acquire::Denied { wait_until } => {
                warn!("request limit exceeded, waiting until the next hour to send more requests");
                cancel.sleep_until(wait_until);
                Ok(None)
            }
            Acquire::Granted => {
                let url = format!("{}?{}", API_ENDPOINT, build_query(&self.site));
                debug!("fetching new photovoltaic production forecast data from {}", url);

                let body = self.agent
                    .get(&url)
                    .call()?
                    .body_mut()
                    .read_to_string()?;

                info!("new photovoltaic production forecast fetched at {}", Utc::now());

                Ok(Some(body))
            }
        }
    }
}

/// Builds the request query string from the site parameters.
///
/// Slope and azimuth are mode-conditional: fixed angle sends both, y-axis
/// tracking sends azimuth only, x-axis tracking sends slope only and
/// dual-axis tracking sends neither. The api key goes last.
///
/// # Arguments
///
/// * 'site' - the pv site parameters
fn build_query(site: &SiteParameters) -> String {
    let mut parameters = vec![
        format!("lat={}", site.lat),
        format!("lon={}", site.long),
        format!("panel_qty={}", site.panel_qty),
        format!("panel_out={}", site.panel_out),
        format!("inv_cap={}", site.inv_cap.unwrap_or(0.0)),
        format!("tracking={}", site.tracking.wire_code()),
    ];

    match site.tracking {
        Tracking::FixedAngle => {
            parameters.push(format!("slope={}", site.slope));
            parameters.push(format!("azi={}", site.azimuth));
        }
        Tracking::YAxis => {
            parameters.push(format!("azi={}", site.azimuth));
        }
        Tracking::XAxis => {
            parameters.push(format!("slope={}", site.slope));
        }
        Tracking::YxAxis => {}
    }

    parameters.push(format!("apikey={}", site.api_key));

    parameters.join("&")
}
