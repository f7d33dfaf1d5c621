use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 组件配置 trait
///
/// 所有组件的配置都应该实现这个 trait，以支持统一的配置加载和验证。
pub trait ComponentConfig: Serialize + for<'de> Deserialize<'de> + Default {
    /// 业务规则验证
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// 获取配置摘要（不包含敏感值）
    fn summary(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }
}
