use axum::{
    Json,
    extract::{ConnectInfo, FromRequestParts, State},
    http::{Method, Uri, header::USER_AGENT, request::Parts},
};
use chrono::Utc;
use devinfo_core::UNKNOWN_PLACEHOLDER;
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::{debug, info};

use super::dto::{HEALTHY, HealthResponse, IndexResponse, RuntimeInfo, TIMEZONE_UTC};
use super::errors::ApiError;
use super::router::AppState;
use crate::domain::{RequestContext, ServiceInfo, iso_timestamp, known_endpoints};

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());

        Ok(RequestContext {
            client_ip,
            user_agent,
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
        })
    }
}

/// `GET /`：服务、主机、运行时与请求信息
pub async fn index(
    State(state): State<AppState>,
    request: RequestContext,
) -> Result<Json<IndexResponse>, ApiError> {
    info!("GET / from {}", request.client_ip);

    let now = Utc::now();
    let system = state.reporter.system_facts().await?;
    let uptime = state.reporter.uptime_at(now);

    Ok(Json(IndexResponse {
        service: ServiceInfo::current(),
        system,
        runtime: RuntimeInfo {
            uptime_seconds: uptime.seconds,
            uptime_human: uptime.human,
            current_time: iso_timestamp(now),
            timezone: TIMEZONE_UTC.to_string(),
        },
        request,
        endpoints: known_endpoints(),
    }))
}

/// `GET /health`：存活探针，不检查任何依赖
pub async fn health(State(state): State<AppState>, request: RequestContext) -> Json<HealthResponse> {
    debug!("GET /health from {}", request.client_ip);

    let now = Utc::now();
    Json(HealthResponse {
        status: HEALTHY.to_string(),
        timestamp: iso_timestamp(now),
        uptime_seconds: state.reporter.uptime_at(now).seconds,
    })
}

/// 未匹配的路径
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound {
        path: uri.path().to_string(),
    }
}

/// 已知路径上的非 GET 方法
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
