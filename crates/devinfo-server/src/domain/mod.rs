//! 领域模型：运行时长、主机信息、请求上下文与接口描述

pub mod models;

pub use models::{
    EndpointInfo, ProcessClock, RequestContext, ServiceInfo, SystemFacts, UptimeReport,
    format_uptime, iso_timestamp, known_endpoints,
};
