use log::{error, info};
use std::{env, process};

use moons_trainer::training::{self, TrainingConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.json]", args[0]);
        process::exit(1);
    }

    let config = match args.get(1) {
        Some(path) => match TrainingConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e:#}");
                process::exit(1);
            }
        },
        None => TrainingConfig::default(),
    };

    info!("training with {config:?}");

    if let Err(e) = training::run(&config) {
        error!("training failed: {e:#}");
        process::exit(1);
    }
}
