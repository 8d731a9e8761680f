use log::info;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::Config;
use crate::errors::InitError;
use crate::manager_cbase::CBase;
use crate::manager_timescale::Timescale;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}";

/// Managers performing the steps of a cycle
pub struct Mgr {
    pub cbase: CBase,
    pub store: Timescale,
}

/// Validates the configuration and returns the managers ready for running
///
/// # Arguments
///
/// * 'config' - the full configuration
pub fn init(config: &Config) -> Result<Mgr, InitError> {
    let violations = config.validate();
    if !violations.is_empty() {
        return Err(InitError(violations.join("; ")));
    }

    info!("pvlogger version: {}", env!("CARGO_PKG_VERSION"));
    if config.general.offline_mode {
        info!("running in offline mode, forecasts are read from {}", config.general.offline_file);
    }

    Ok(Mgr {
        cbase: CBase::new(&config.site, &config.schedule, &config.general),
        store: Timescale::new(&config.database),
    })
}

/// Sets up log4rs with a console and/or file appender according to the
/// general configuration section
///
/// # Arguments
///
/// * 'config' - the full configuration
pub fn init_logging(config: &Config) -> Result<(), InitError> {
    let mut builder = log4rs::Config::builder();
    let mut root = Root::builder();

    if config.general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    if !config.general.log_path.is_empty() {
        let file = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build(&config.general.log_path)?;
        builder = builder.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    let log_config = builder.build(root.build(config.general.log_level))?;
    log4rs::init_config(log_config)?;

    Ok(())
}
