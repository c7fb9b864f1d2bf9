//! Keep-alive/status HTTP endpoint. Unrelated to moderation; it exists so a
//! hosting platform's health checks see the process as alive.

use std::time::Instant;

use warp::Filter;

use crate::utils::detect_local_ipv4;

/// Serve `GET /health` until the process exits.
pub async fn serve(bot_name: String, port: u16) {
    let started = Instant::now();
    let health = warp::path("health").and(warp::get()).map(move || {
        warp::reply::json(&serde_json::json!({
            "status": "ok",
            "bot": bot_name,
            "uptimeSeconds": started.elapsed().as_secs(),
        }))
    });

    match detect_local_ipv4() {
        Some(ip) => log::info!("keep-alive endpoint on {ip}, port {port}"),
        None => log::info!("keep-alive endpoint on port {port}"),
    }
    warp::serve(health).run(([0, 0, 0, 0], port)).await;
}
