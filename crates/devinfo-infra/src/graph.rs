//! 资源依赖图
//!
//! 资源按声明顺序保存；拓扑排序时同一层的资源按声明顺序输出，结果确定。

use std::collections::HashMap;

use crate::error::{InfraError, Result};
use crate::resources::Resource;

#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加资源，逻辑名重复时拒绝
    pub fn add(&mut self, resource: Resource) -> Result<()> {
        if self.index.contains_key(&resource.name) {
            return Err(InfraError::DuplicateResource {
                name: resource.name,
            });
        }
        self.index.insert(resource.name.clone(), self.resources.len());
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.index.get(name).map(|&i| &self.resources[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// 按声明顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// 直接依赖；未知资源返回空
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.get(name).map(Resource::dependencies).unwrap_or_default()
    }

    /// 所有引用指向已声明资源，且不存在环
    pub fn validate(&self) -> Result<()> {
        self.topological_order().map(|_| ())
    }

    /// Kahn 算法；就绪资源中总是先取声明顺序靠前的
    pub fn topological_order(&self) -> Result<Vec<&Resource>> {
        let n = self.resources.len();
        let mut in_degree = vec![0usize; n];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (i, resource) in self.resources.iter().enumerate() {
            for dep in resource.dependencies() {
                let Some(&j) = self.index.get(&dep) else {
                    return Err(InfraError::UnknownReference {
                        from: resource.name.clone(),
                        to: dep,
                    });
                };
                in_degree[i] += 1;
                dependents[j].push(i);
            }
        }

        let mut ordered = Vec::with_capacity(n);
        let mut emitted = vec![false; n];
        while let Some(next) = (0..n).find(|&i| !emitted[i] && in_degree[i] == 0) {
            emitted[next] = true;
            ordered.push(&self.resources[next]);
            for &d in &dependents[next] {
                in_degree[d] -= 1;
            }
        }

        if ordered.len() < n {
            let involved = (0..n)
                .filter(|&i| !emitted[i])
                .map(|i| self.resources[i].name.clone())
                .collect();
            return Err(InfraError::Cycle { involved });
        }

        Ok(ordered)
    }
}
