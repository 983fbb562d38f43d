use clap::Parser;
use log::error;
use std::process;

use flowlog_converter::application_state::{init_config, ApplicationState};
use flowlog_converter::cli::Args;

fn main() {
    // Setup logger
    let env = env_logger::Env::default();
    env_logger::init_from_env(env);

    let args = Args::parse();

    let state = match init_config(&args.config) {
        Ok(s) => s,
        Err(e) => {
            error!("configuration init failed: {:?}", e);
            process::exit(2);
        }
    };

    let mut config = match state.config() {
        Ok(c) => c,
        Err(e) => {
            error!(
                "invalid configuration in [{}]: {:?}",
                state.config.path().display(),
                e
            );
            process::exit(2);
        }
    };

    args.apply(&mut config);

    let components = match ApplicationState::init_components(config) {
        Ok(c) => c,
        Err(e) => {
            error!("unable to initialize components: {:?}", e);
            process::exit(2);
        }
    };

    if let Err(e) = components.run() {
        error!("conversion run failed: {:?}", e);
        process::exit(1);
    }
}
