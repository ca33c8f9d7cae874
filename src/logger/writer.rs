//! Log file handling

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use crate::logger::config::FileConfig;
use crate::logger::error::LoggerError;

/// Open the log file described by `config`, creating parent directories
///
/// The returned `Mutex<File>` is usable directly as a `MakeWriter`.
pub(crate) fn open_log_writer(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    Ok(Mutex::new(open_log_file(&config.path, config.append)?))
}

fn open_log_file(path: &Path, append: bool) -> Result<File, LoggerError> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    Ok(options.open(path)?)
}
