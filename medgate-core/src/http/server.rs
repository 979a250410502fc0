//! HTTP serve loop (tokio + hyper http1)

use super::error::bad_request;
use super::router::ApiRouter;
use anyhow::{Context, Result};
use http::Request;
use http_body_util::BodyExt;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept connections on `addr` until the process is stopped
pub async fn serve(addr: &str, router: Arc<ApiRouter>) -> Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind to {}", addr))?;

    log::info!("Permission server listening on http://{}", addr);

    loop {
        let (stream, remote_addr) = listener.accept().await?;
        let router = router.clone();

        tokio::spawn(async move {
            let io = TokioIo::new(stream);

            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let router = router.clone();
                async move {
                    let (parts, body) = req.into_parts();
                    let response = match body.collect().await {
                        Ok(collected) => {
                            router.handle(Request::from_parts(parts, collected.to_bytes())).await
                        }
                        Err(e) => {
                            log::debug!("Failed to read request body: {}", e);
                            bad_request("Unreadable request body")
                        }
                    };
                    Ok::<_, Infallible>(response)
                }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::error!("Connection error from {}: {}", remote_addr, err);
            }
        });
    }
}
