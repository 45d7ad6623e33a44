//! Local reference implementation of the remote job service, for development
//! and for exercising the HTTP client end to end.

pub mod handlers;
pub mod health;
pub mod shutdown;
pub mod store;
pub mod validation;

use actix_web::{dev::Server, web, App, HttpServer};
use std::net::SocketAddr;
use tracing::info;

pub use store::{JobStore, StoreError};

use self::shutdown::ShutdownCoordinator;

/// Registers every route and extractor config on an app
pub fn configure_app(cfg: &mut web::ServiceConfig, store: web::Data<JobStore>, max_payload_size: usize) {
    cfg.app_data(store)
        .app_data(web::PayloadConfig::default().limit(max_payload_size))
        .app_data(validation::json_config().limit(max_payload_size))
        .app_data(validation::plain_json_config().limit(max_payload_size))
        .configure(health::health_config)
        .configure(handlers::job_config);
}

/// Binds the server without starting it. Returns the bound addresses so callers can use port 0.
pub fn bind(
    addr: &str,
    store: web::Data<JobStore>,
    max_payload_size: usize,
) -> std::io::Result<(Server, Vec<SocketAddr>)> {
    let server = HttpServer::new(move || {
        let store = store.clone();
        App::new().configure(move |cfg| configure_app(cfg, store, max_payload_size))
    })
    .bind(addr)?;

    let addrs = server.addrs();
    Ok((server.run(), addrs))
}

/// Serves the reference API until CTRL+C or SIGTERM
pub async fn serve(addr: &str, max_payload_size: usize) -> std::io::Result<()> {
    let store = web::Data::new(JobStore::new());
    let (server, addrs) = bind(addr, store.clone(), max_payload_size)?;

    for addr in &addrs {
        info!("Reference job service listening on http://{}/api/jobs", addr);
    }

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, store)
        .wait_for_shutdown()
        .await
}
