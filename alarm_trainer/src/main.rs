use std::env;

use anyhow::Context;
use log::{error, info};

use alarm_trainer::configs;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = configs::resolve(env::args().skip(1), |key| env::var(key).ok())
        .context("could not build the training configuration")?;
    let labeler = config.labeler();
    info!("training with {config:?}");

    match alarm_trainer::train(&config, &labeler) {
        Ok(report) => print!("{report}"),
        Err(e) => {
            error!("{e}");
            println!("\nSVM model training failed or was skipped: {e}");
            if let Some(advice) = e.advice() {
                println!("Hint: {advice}");
            }
        }
    }

    Ok(())
}
