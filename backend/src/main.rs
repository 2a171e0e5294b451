//! Backend entry-point: wires adapters, REST endpoints, and OpenAPI docs.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use orderflow::ApiDoc;
use orderflow::Trace;
use orderflow::domain::ports::Mailer;
use orderflow::inbound::http::health::HealthState;
use orderflow::inbound::http::state::CronConfig;
use orderflow::outbound::email::{DisabledMailer, LettreMailer};
use orderflow::outbound::persistence::{DbPool, PoolConfig};
use orderflow::server::{ServerConfig, build_http_state, configure_app, session_middleware};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;

    let pool = DbPool::new(PoolConfig::new(config.database_url.clone()))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => Arc::new(
            LettreMailer::new(smtp).map_err(|err| std::io::Error::other(err.to_string()))?,
        ),
        None => {
            warn!("SMTP is not configured; outbound mail is disabled");
            Arc::new(DisabledMailer)
        }
    };

    let http_state = build_http_state(&pool, mailer);
    let cron_config = CronConfig {
        secret: config.cron_secret.clone(),
    };
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays reachable.
    let server_health_state = health_state.clone();
    let key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        #[cfg_attr(not(debug_assertions), expect(unused_mut, reason = "swagger only in debug"))]
        let mut app = App::new().wrap(Trace).configure(|cfg| {
            configure_app(
                cfg,
                &http_state,
                &cron_config,
                &server_health_state,
                session_middleware(key.clone(), cookie_secure),
            );
        });

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
