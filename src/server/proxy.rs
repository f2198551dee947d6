use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use warp::Filter;

use crate::config::{Config, Environment};
use crate::constants::ENV_GEMINI_API_KEY;
use crate::http::GeminiClient;
use crate::logging::LogConfig;
use crate::server::handle_rejection;
use crate::server::routes::create_routes;

pub struct HandlerServer {
    pub gemini: GeminiClient,
    pub environment: Environment,
    pub config: Config,
}

impl HandlerServer {
    pub fn new(config: Config, environment: Environment) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        let gemini = GeminiClient::new(client, config.gemini_url.clone());

        Ok(Self {
            gemini,
            environment,
            config,
        })
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr: SocketAddr = self.config.listen.parse()?;
        let server = Arc::new(self);

        let routes = create_routes(server.clone()).recover(handle_rejection);

        if LogConfig::get().debug_enabled {
            log::info!("starting task router on {} (debug mode)", addr);
        } else {
            log::info!("starting task router on {}", addr);
        }
        log::info!(
            "Gemini backend: {} (model: {})",
            server.config.gemini_url,
            server.environment.model_name()
        );
        if server.environment.api_key().is_none() {
            log::warn!("{} not set; only the ping task will succeed", ENV_GEMINI_API_KEY);
        }
        if server.environment.has_affiliate_ids() {
            log::info!("affiliate instructions enabled for deal-assassin");
        }

        warp::serve(routes).run(addr).await;

        Ok(())
    }
}
