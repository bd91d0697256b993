use log::{error, info};

use majeur_frontend::config;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site interactions");
    if let Err(err) = majeur_frontend::start() {
        error!("Site interactions unavailable: {}", err);
    }
}
