//! 交给外部部署引擎的清单文档

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::resources::ResourceSpec;
use crate::stack::Stack;

#[derive(Debug, Clone, Serialize)]
pub struct ManifestResource {
    pub name: String,
    #[serde(rename = "type")]
    pub type_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub depends_on: Vec<String>,
    pub properties: ResourceSpec,
}

/// 资源按依赖顺序排列；输出以插值字符串呈现
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub config: BTreeMap<String, String>,
    pub resources: Vec<ManifestResource>,
    pub outputs: BTreeMap<String, String>,
}

impl Manifest {
    pub fn from_stack(stack: &Stack) -> Result<Self> {
        stack.validate()?;

        let resources = stack
            .graph
            .topological_order()?
            .into_iter()
            .map(|r| ManifestResource {
                name: r.name.clone(),
                type_token: r.spec.type_token().to_string(),
                provider: r.provider.clone(),
                depends_on: r.dependencies(),
                properties: r.spec.clone(),
            })
            .collect();

        let outputs = stack
            .outputs
            .iter()
            .map(|o| (o.name.clone(), o.value.render()))
            .collect();

        Ok(Self {
            config: stack.config.clone(),
            resources,
            outputs,
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
