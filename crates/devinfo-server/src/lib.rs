//! devinfo server
//!
//! 通过 HTTP 报告服务自身状态：服务元数据、主机信息、运行时长与请求回显，
//! 以及一个无条件返回 healthy 的存活探针。

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod interface;
