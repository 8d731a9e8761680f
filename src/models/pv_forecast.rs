use chrono::{DateTime, Utc};

/// Name of the timestamp column in the CBase csv document
pub const TIME_COLUMN: &str = "time.utc";

/// Metric columns in the CBase csv document, in the order they are stored
/// in the database table. Matching against csv headers is case-insensitive
/// (the provider emits `pv_T` for panel temperature).
pub const METRIC_COLUMNS: [&str; 21] = [
    "temp_avg",
    "wind_avg",
    "cl_tot",
    "cl_low",
    "cl_med",
    "cl_high",
    "prec_amt",
    "s_glob",
    "s_dif",
    "s_dir_hor",
    "s_dir",
    "s_sw_net",
    "solar_angle_vs_panel",
    "albedo",
    "s_glob_pv",
    "s_ground_dif_pv",
    "s_dir_pv",
    "s_dif_pv",
    "pv_po",
    "pv_t",
    "pv_eta",
];

/// One row of the photovoltaic production forecast.
///
/// The hourly averages refer to the hour preceding the timestamp unless
/// otherwise stated. A metric the provider reported as `NA` is `None`,
/// never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PvForecastEntry {
    /// Timestamp (UTC), the unique key of the entry
    pub time: DateTime<Utc>,
    /// Air temperature, average of two consecutive instantaneous hourly readings (C)
    pub temp_avg: Option<f32>,
    /// Wind speed, average of two consecutive instantaneous hourly readings (m/s)
    pub wind_avg: Option<f32>,
    /// Total cloudiness at the moment of the timestamp (%)
    pub cl_tot: Option<f32>,
    /// Low clouds at the moment of the timestamp (%)
    pub cl_low: Option<f32>,
    /// Medium clouds at the moment of the timestamp (%)
    pub cl_med: Option<f32>,
    /// High clouds at the moment of the timestamp (%)
    pub cl_high: Option<f32>,
    /// Precipitation amount accumulated over the forecast period (mm)
    pub prec_amt: Option<f32>,
    /// Global radiation on a horizontal surface (W/m2)
    pub s_glob: Option<f32>,
    /// Diffuse radiation on a horizontal surface (W/m2)
    pub s_dif: Option<f32>,
    /// Direct radiation on a horizontal surface (W/m2)
    pub s_dir_hor: Option<f32>,
    /// Direct normal irradiance (W/m2)
    pub s_dir: Option<f32>,
    /// Shortwave net radiation (W/m2)
    pub s_sw_net: Option<f32>,
    /// Angle between the panel normal and the sun at the midpoint of the previous hour (degrees)
    pub solar_angle_vs_panel: Option<f32>,
    /// Ground albedo
    pub albedo: Option<f32>,
    /// Global radiation on the panel surface (W/m2)
    pub s_glob_pv: Option<f32>,
    /// Radiation reflected from the ground onto the panel surface (W/m2)
    pub s_ground_dif_pv: Option<f32>,
    /// Direct radiation on the panel surface (W/m2)
    pub s_dir_pv: Option<f32>,
    /// Diffuse radiation on the panel surface (W/m2)
    pub s_dif_pv: Option<f32>,
    /// PV system production (W)
    pub pv_po: Option<f32>,
    /// Temperature of the PV panels (C)
    pub pv_t: Option<f32>,
    /// Nominal efficiency of the PV system compared to STC conditions
    pub pv_eta: Option<f32>,
}

impl PvForecastEntry {
    /// Builds an entry from metric values given in `METRIC_COLUMNS` order
    ///
    /// # Arguments
    ///
    /// * 'time' - the timestamp of the entry
    /// * 'metrics' - metric values in `METRIC_COLUMNS` order
    pub fn from_columns(time: DateTime<Utc>, metrics: [Option<f32>; 21]) -> Self {
        Self {
            time,
            temp_avg: metrics[0],
            wind_avg: metrics[1],
            cl_tot: metrics[2],
            cl_low: metrics[3],
            cl_med: metrics[4],
            cl_high: metrics[5],
            prec_amt: metrics[6],
            s_glob: metrics[7],
            s_dif: metrics[8],
            s_dir_hor: metrics[9],
            s_dir: metrics[10],
            s_sw_net: metrics[11],
            solar_angle_vs_panel: metrics[12],
            albedo: metrics[13],
            s_glob_pv: metrics[14],
            s_ground_dif_pv: metrics[15],
            s_dir_pv: metrics[16],
            s_dif_pv: metrics[17],
            pv_po: metrics[18],
            pv_t: metrics[19],
            pv_eta: metrics[20],
        }
    }

    /// Returns the metric values in `METRIC_COLUMNS` order, used when
    /// binding database parameters
    pub fn metrics(&self) -> [Option<f32>; 21] {
        [
            self.temp_avg,
            self.wind_avg,
            self.cl_tot,
            self.cl_low,
            self.cl_med,
            self.cl_high,
            self.prec_amt,
            self.s_glob,
            self.s_dif,
            self.s_dir_hor,
            self.s_dir,
            self.s_sw_net,
            self.solar_angle_vs_panel,
            self.albedo,
            self.s_glob_pv,
            self.s_ground_dif_pv,
            self.s_dir_pv,
            self.s_dif_pv,
            self.pv_po,
            self.pv_t,
            self.pv_eta,
        ]
    }
}
