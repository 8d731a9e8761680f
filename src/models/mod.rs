pub mod pv_forecast;
