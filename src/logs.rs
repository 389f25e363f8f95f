use log::LevelFilter;
use log4rs::{
    Config,
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            RollingFileAppender,
            policy::compound::{
                CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
            },
        },
    },
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};
use thiserror::Error;

const LOG_SIZE_LIMIT: u64 = 10 * 1024 * 1024; // 10 MB

const LOG_FILE_COUNT: u32 = 3;

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("invalid log archive pattern: {0}")]
    Roller(String),
    #[error("cannot open log file: {0}")]
    Appender(#[from] std::io::Error),
    #[error("invalid logger config: {0}")]
    Config(#[from] log4rs::config::runtime::ConfigErrors),
    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub file_path: String,
    pub archive_pattern: String,
    pub stderr_level: LevelFilter,
    pub file_level: LevelFilter,
}

impl LogSettings {
    pub fn from_env() -> Result<Self, LogInitError> {
        let var = |name: &'static str| {
            std::env::var(name).map_err(|_| LogInitError::MissingVar(name))
        };
        Ok(Self {
            file_path: var("LOG_FILE_PATH")?,
            archive_pattern: var("LOG_ARCHIVE_PATTERN")?,
            stderr_level: LevelFilter::Info,
            file_level: LevelFilter::Debug,
        })
    }
}

fn build_config(settings: &LogSettings) -> Result<Config, LogInitError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} {t} - {m}{n}")))
        .build();

    let trigger = SizeTrigger::new(LOG_SIZE_LIMIT);
    let roller = FixedWindowRoller::builder()
        .build(&settings.archive_pattern, LOG_FILE_COUNT)
        .map_err(|e| LogInitError::Roller(e.to_string()))?;
    let policy = CompoundPolicy::new(Box::new(trigger), Box::new(roller));

    let logfile = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} {t} - {m}{n}")))
        .build(&settings.file_path, Box::new(policy))?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.file_level)))
                .build("logfile", Box::new(logfile)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(settings.stderr_level)))
                .build("stderr", Box::new(stderr)),
        )
        .build(
            Root::builder()
                .appender("logfile")
                .appender("stderr")
                .build(LevelFilter::Trace),
        )?;
    Ok(config)
}

pub fn init_logger(settings: &LogSettings) -> Result<(), LogInitError> {
    let config = build_config(settings)?;
    let _handle = log4rs::init_config(config)?;
    Ok(())
}
