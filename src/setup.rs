// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Program setup functions.

use std::{
  io::{self, BufRead, Write},
  path::PathBuf,
};

use env_logger::Builder;
use log::LevelFilter;

/// Sets up `env_logger` with the format "LEVEL\tmessage" (e.g. "WARN\tsomething
/// went wrong").
///
/// Log levels:
/// Error: Per-image failures, and fatal errors.
/// Warn: Skipped archive entries and ambiguous sidecar matches.
/// Info: General program flow and progress.
/// Debug: Per-file operations.
/// Trace: Per-tag detail.
pub fn configure_logging(verbosity: u8) {
  let level = match verbosity {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };

  Builder::new()
    .filter_level(level)
    .format(|buf, record| {
      let level = record.level();
      let style = buf.default_level_style(level);
      writeln!(buf, "{style}{level}{style:#}\t{}", record.args())
    })
    .init();
}

/// Asks for the archive directory on stdin, for when it isn't given as an
/// argument.
pub fn prompt_archive_dir() -> Result<PathBuf, String> {
  let stdin = io::stdin();
  let mut stdout = io::stdout();

  read_archive_dir(&mut stdin.lock(), &mut stdout)
}

fn read_archive_dir(input: &mut impl BufRead, output: &mut impl Write) -> Result<PathBuf, String> {
  write!(output, "Enter the path to the folder with the Takeout ZIP files: ")
    .and_then(|()| output.flush())
    .map_err(|e| format!("Failed to write prompt ({e})."))?;

  let mut line = String::new();
  input
    .read_line(&mut line)
    .map_err(|e| format!("Failed to read archive directory ({e})."))?;

  let path = PathBuf::from(line.trim());
  if path.as_os_str().is_empty() {
    return Err("No archive directory given.".to_string());
  }
  if !path.is_dir() {
    return Err(format!("{}: Archive directory does not exist.", path.display()));
  }

  Ok(path)
}
