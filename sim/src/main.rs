use std::{
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use common::{config::SessionConfig, time::format_elapsed};
use sim::run::{self, SimOptions};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maze_sim=info,sim=info,common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .expect("error setting Ctrl-C handler");

    let config = match SessionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };
    let options = match SimOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    match run::run(config, &options, &running) {
        Ok(reports) => {
            for report in reports {
                println!(
                    "  Session {}: {} in {} ({} ticks)",
                    report.generation,
                    report.outcome,
                    format_elapsed(report.elapsed),
                    report.ticks
                );
            }
        }
        Err(e) => {
            tracing::error!("Simulation failed: {}", e);
            process::exit(1);
        }
    }
}
