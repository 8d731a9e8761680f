use std::{env, thread};
use anyhow::Result;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use crate::cancel::CancelToken;

mod cancel;
mod config;
mod errors;
mod forecast_csv;
mod initialization;
mod manager_cbase;
mod manager_timescale;
mod models;
mod scheduler;

fn main() -> Result<()> {
    let config_path = env::var("PVLOGGER_CONFIG")
        .ok()
        .or_else(|| env::args().nth(1))
        .unwrap_or("config.toml".to_string());

    let config = config::load_config(&config_path)?;
    initialization::init_logging(&config)?;

    let cancel = CancelToken::new();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    {
        let cancel = cancel.clone();
        thread::spawn(move || {
            if signals.forever().next().is_some() {
                cancel.cancel();
            }
        });
    }

    let mut mgr = initialization::init(&config)?;
    scheduler::run(&config, &mut mgr, &cancel);

    Ok(())
}
