use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Once;

use crate::config::{LogFormat, LogMode, LoggingSettings};

static INIT: Once = Once::new();

/// Install the global logger once, according to `settings`.
///
/// The default filter is `info`; `RUST_LOG` overrides it. Output goes to
/// stderr so it does not interleave with the command prompt on stdout, or to
/// an append-mode file when `mode = "file"`. Problems opening the log file are
/// reported as warnings once the logger is up.
pub fn init(settings: &LoggingSettings) {
    INIT.call_once(|| {
        let mut init_warnings = Vec::new();
        let format = settings.format;
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

        builder.format(move |buf, record| {
            let ts = buf.timestamp_millis();
            match format {
                LogFormat::Json => {
                    let obj = serde_json::json!({
                        "ts": ts.to_string(),
                        "level": record.level().to_string(),
                        "target": record.target(),
                        "msg": record.args().to_string(),
                    });
                    writeln!(buf, "{}", obj)
                }
                LogFormat::Text => {
                    writeln!(
                        buf,
                        "{} {} {} {}",
                        ts,
                        record.level(),
                        record.target(),
                        record.args()
                    )
                }
            }
        });

        match settings.mode {
            LogMode::Stderr => {
                builder.target(env_logger::Target::Stderr);
            }
            LogMode::File => {
                let dir = settings.dir.as_deref().unwrap_or(".");
                if let Err(err) = std::fs::create_dir_all(dir) {
                    init_warnings.push(format!("[logging] failed to create log dir: {}", err));
                }
                let path = std::path::Path::new(dir).join(&settings.file_name);
                match OpenOptions::new().create(true).append(true).open(&path) {
                    Ok(file) => {
                        builder.target(env_logger::Target::Pipe(Box::new(file)));
                    }
                    Err(err) => {
                        init_warnings.push(format!(
                            "[logging] failed to open log file ({}): {}",
                            path.display(),
                            err
                        ));
                        builder.target(env_logger::Target::Stderr);
                    }
                }
            }
        }

        let _ = builder.try_init();
        for warning in init_warnings {
            log::warn!("{}", warning);
        }
    });
}
