use async_trait::async_trait;
use devinfo_core::error::Result;

use crate::domain::SystemFacts;

/// 系统信息收集器接口
///
/// 单个字段无法获取时由实现方填入占位值，只有采集本身失败才返回错误。
#[async_trait]
pub trait FactCollectorPort: Send + Sync {
    /// 收集系统信息
    async fn collect(&self) -> Result<SystemFacts>;
}
