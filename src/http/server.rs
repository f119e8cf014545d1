//! HTTP server setup and the proxy request path.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing)
//! - Bind plain or TLS-terminating listener
//! - Answer CORS preflights before routing
//! - Resolve prefix routes and forward to the fixed backend host
//! - Relay downstream responses with the CORS set overlaid
//! - Synthesize 502 responses when the backend is unreachable

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{HOST, ORIGIN},
        HeaderName, HeaderValue, Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::cors::CorsPolicy;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::upstream::{build_forward_headers, build_target_url, UpstreamAddr};

/// Application state injected into the proxy handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub cors: Arc<CorsPolicy>,
    pub upstream: Arc<UpstreamAddr>,
    pub client: Client<HttpConnector, Body>,
    pub client_ip_header: HeaderName,
    pub service_name: String,
}

/// Body of the self-describing diagnostic response served for paths that
/// match no configured prefix.
#[derive(Debug, Serialize)]
struct DiagnosticBody {
    status: &'static str,
    worker: String,
    services: Vec<String>,
    usage: String,
}

/// Body of the synthesized 502 when forwarding fails.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
}

/// HTTP server for the edge proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given (validated) configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let table = Arc::new(RouteTable::from_config(&config.services));
        let cors = Arc::new(CorsPolicy::from_config(&config.cors));
        let upstream = Arc::new(UpstreamAddr::from_config(&config.backend));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let client_ip_header = HeaderName::from_bytes(config.forward.client_ip_header.as_bytes())
            .unwrap_or_else(|_| HeaderName::from_static("cf-connecting-ip"));

        let state = AppState {
            table,
            cors,
            upstream,
            client,
            client_ip_header,
            service_name: config.name.clone(),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until the shutdown signal fires.
    ///
    /// With TLS configured the listener terminates the caller's secure
    /// connection; forwarding to the backend is always plain HTTP.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let HttpServer { router, config } = self;

        match &config.listener.tls {
            Some(tls) => {
                tracing::info!(address = %addr, "HTTPS server starting");

                let rustls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    &tls.cert_path,
                    &tls.key_path,
                )
                .await?;

                let handle = axum_server::Handle::new();
                let drain = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    drain.graceful_shutdown(Some(Duration::from_secs(30)));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, rustls_config)
                    .handle(handle)
                    .serve(router.into_make_service())
                    .await?;
            }
            None => {
                tracing::info!(address = %addr, "HTTP server starting");

                axum::serve(listener, router.into_make_service())
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                    })
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler.
///
/// Every request takes exactly one of four exits, and every exit carries
/// the CORS header set: preflight (204), diagnostic (200), relayed
/// downstream response, or synthesized 502.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let origin = state.cors.resolve_origin(request.headers().get(ORIGIN));
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    // Preflights never reach routing or forwarding.
    if method == Method::OPTIONS {
        metrics::record_request(method.as_str(), 204, "preflight", start_time);
        return state.cors.preflight(&origin);
    }

    let Some(matched) = state.table.match_path(&path) else {
        // No configured prefix matched. The proxy doubles as a
        // self-describing root endpoint, so this is a 200, not an error.
        tracing::debug!(
            request_id = %request_id,
            path = %path,
            "No service prefix matched, serving diagnostic payload"
        );
        metrics::record_request(method.as_str(), 200, "none", start_time);
        let body = DiagnosticBody {
            status: "ok",
            worker: state.service_name.clone(),
            services: state.table.prefixes(),
            usage: state.table.usage_hint(),
        };
        return (StatusCode::OK, state.cors.headers(&origin), Json(body)).into_response();
    };

    let service = matched.route.name.clone();
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        service = %service,
        stripped_path = %matched.stripped_path,
        "Proxying request"
    );

    let target = match build_target_url(
        &state.upstream.host,
        matched.route.port,
        &matched.stripped_path,
        request.uri().query(),
    ) {
        Ok(url) => url,
        Err(e) => {
            metrics::record_request(method.as_str(), 502, &service, start_time);
            return bad_gateway(&state, &origin, e.to_string());
        }
    };

    let (parts, body) = request.into_parts();
    let mut forward_headers = build_forward_headers(
        &parts.headers,
        &state.client_ip_header,
        state.upstream.host_header.as_ref(),
    );

    // The outbound request is addressed by the target URL, never by the
    // caller's Host. Without a configured override, Host is the target
    // authority itself.
    if !forward_headers.contains_key(HOST) {
        if let Some(authority) = target.authority() {
            if let Ok(value) = HeaderValue::from_str(authority.as_str()) {
                forward_headers.insert(HOST, value);
            }
        }
    }

    // GET and HEAD are forwarded bodyless rather than with an empty stream.
    let outbound_body = if method == Method::GET || method == Method::HEAD {
        Body::empty()
    } else {
        body
    };

    let mut builder = Request::builder().method(method.clone()).uri(target);
    if let Some(headers) = builder.headers_mut() {
        *headers = forward_headers;
    }
    let outbound = match builder.body(outbound_body) {
        Ok(outbound) => outbound,
        Err(e) => {
            metrics::record_request(method.as_str(), 502, &service, start_time);
            return bad_gateway(&state, &origin, e.to_string());
        }
    };

    match state.client.request(outbound).await {
        Ok(response) => {
            let status = response.status();
            metrics::record_request(method.as_str(), status.as_u16(), &service, start_time);

            let (mut response_parts, response_body) = response.into_parts();
            state.cors.apply(&mut response_parts.headers, &origin);
            Response::from_parts(response_parts, Body::new(response_body))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                service = %service,
                error = %e,
                "Backend unreachable"
            );
            metrics::record_request(method.as_str(), 502, &service, start_time);
            bad_gateway(&state, &origin, e.to_string())
        }
    }
}

/// Synthesize the uniform 502 for a failed forward.
fn bad_gateway(state: &AppState, origin: &HeaderValue, detail: String) -> Response {
    let body = ErrorBody {
        error: "Backend unreachable",
        detail,
    };
    (
        StatusCode::BAD_GATEWAY,
        state.cors.headers(origin),
        Json(body),
    )
        .into_response()
}
