use anyhow::{anyhow, Result};
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::{
    roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy,
};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::fs;
use std::path::Path;

/// Size at which the log file is rolled (10MB)
const LOG_FILE_SIZE_LIMIT: u64 = 10 * 1024 * 1024;

/// Number of compressed rolled files to keep
const LOG_FILE_COUNT: u32 = 3;

/// Console logging, plus a rolling file under `log_dir/logs` when a directory is known
pub fn setup_logging(log_dir: Option<&Path>, level: LevelFilter) -> Result<()> {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{h({l})} {d(%Y-%m-%d %H:%M:%S)} {M} - {m}{n}",
        )))
        .build();

    let mut config = Config::builder().appender(Appender::builder().build("stdout", Box::new(stdout)));
    let mut root = Root::builder().appender("stdout");

    if let Some(log_dir) = log_dir {
        let logs = log_dir.join("logs");
        fs::create_dir_all(&logs)?;

        let roller_pattern = logs.join("sync.{}.log.gz");
        let roller = FixedWindowRoller::builder().base(1).build(
            roller_pattern
                .to_str()
                .ok_or_else(|| anyhow!("Log directory is not valid UTF-8"))?,
            LOG_FILE_COUNT,
        )?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(LOG_FILE_SIZE_LIMIT)),
            Box::new(roller),
        );

        let file = RollingFileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} {l} {M} - {m}{n}")))
            .build(logs.join("sync.log"), Box::new(policy))?;

        config = config.appender(Appender::builder().build("file", Box::new(file)));
        root = root.appender("file");
    }

    let config = config.build(root.build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}
