// Copyright 2023-5 Seth Pendergrass. See LICENSE.

//! Restores capture time, location and description to the images of a Google
//! Photos Takeout export, from the JSON sidecars Takeout writes next to them.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::{config::Config, prim::MatchMode};

mod commands;
mod config;
mod io;
mod prim;
mod scan;
mod setup;
mod unpack;

#[derive(Parser)]
struct Args {
  /// Directory containing the Takeout zip files. Prompted for if omitted.
  archives: Option<PathBuf>,

  /// Where to unpack archives and edit images. Unpacking is skipped if it
  /// already exists. [default: ARCHIVES/takeout_unpacked]
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// How image names are matched to sidecar names.
  #[arg(short, long, value_enum, default_value_t)]
  match_mode: MatchMode,

  /// Match and translate metadata, but don't write images.
  #[arg(short = 'n', long)]
  dry_run: bool,

  /// Verbosity level. Max: 2.
  #[arg(short, action = ArgAction::Count)]
  verbose: u8,
}

fn main() {
  let args = Args::parse();
  setup::configure_logging(args.verbose);

  let archive_dir = match args.archives.map_or_else(setup::prompt_archive_dir, Ok) {
    Ok(path) => path,
    Err(e) => {
      log::error!("{e}");
      std::process::exit(1);
    }
  };

  let config = Config::new(&archive_dir, args.output, args.match_mode, args.dry_run);
  match commands::restore(&config) {
    Ok(summary) => {
      log::info!(
        "Edited {} images: {} matched a sidecar, {} updated, {} failed.",
        summary.images,
        summary.matched,
        summary.updated,
        summary.failed
      );
      if summary.failed == 0 {
        println!("All images have been edited and contain their metadata again!");
      } else {
        println!(
          "Images have been edited, but {} could not be updated. See errors above.",
          summary.failed
        );
      }
    }
    Err(e) => {
      log::error!("{e}");
      std::process::exit(1);
    }
  }
}
