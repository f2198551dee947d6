use clap::Parser;

mod config;
mod constants;
mod error;
mod handlers;
mod http;
mod logging;
mod server;


#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::parse();

    config::validate_config(&cfg)?;

    logging::setup_logging(&cfg.log_level)?;

    let debug_enabled =
        cfg.log_level.eq_ignore_ascii_case("debug") || cfg.log_level.eq_ignore_ascii_case("trace");
    logging::LogConfig::init(debug_enabled);

    let environment = config::Environment::from_process_env();

    let server = server::HandlerServer::new(cfg, environment)?;
    server.run().await
}
