use ember_eph::client::EmberClient;
use ember_eph::config::{self, Config};
use log::{error, info};

fn run() -> Result<(), String> {
    // 1) Load config
    let cfg = Config::from_env()?;
    info!("Config loaded (api_base_url={})", cfg.api_base_url);

    // 2) Authenticate
    let client = EmberClient::with_base_url(cfg.api_base_url.as_str());
    client
        .login(&cfg.username, &cfg.password)
        .map_err(|e| format!("login failed: {}", e))?;
    info!("Authenticated to the Ember service");

    // 3) Discover homes
    let homes = client.list_homes().map_err(|e| format!("list_homes failed: {}", e))?;
    info!("Discovered {} home(s)", homes.len());

    // 4) Poll and report zones per home
    println!("Found the following homes:");
    for home in &homes {
        println!("Home ID: {} ({})", home.gateway_id.0, home.name);
        let zones = client
            .get_zones(&home.gateway_id)
            .map_err(|e| format!("get_zones({}) failed: {}", home.gateway_id.0, e))?;
        for zone in &zones {
            println!(
                " -- Zone: '{}' - {:.1}°C - On: {}",
                zone.name,
                zone.current_temperature,
                zone.is_on()
            );
        }
    }

    Ok(())
}

fn main() {
    // Load .env before logger init so RUST_LOG from .env is respected.
    let loaded_env = config::load_dotenv();

    let default_filter = env_logger::Env::default().default_filter_or("info");
    env_logger::Builder::from_env(default_filter)
        .format_timestamp_secs()
        .init();

    match loaded_env {
        Ok(true) => info!("Environment loaded from .env file"),
        Ok(false) => {}
        Err(e) => {
            error!("fatal: {}", e);
            std::process::exit(1);
        }
    }

    info!(
        "ember-eph {} (git {}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME_GIT_HASH")
    );
    if let Err(e) = run() {
        error!("fatal: {}", e);
        std::process::exit(1);
    }
}
