//! 类型化资源声明
//!
//! 每个资源由逻辑名、所属 provider 与具体规格组成；规格中对其他资源的引用
//! 构成隐式依赖边，序列化时渲染为 `${resource.attribute}` 插值。

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// 对另一个资源属性的引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub resource: String,
    pub attribute: String,
}

impl Reference {
    pub fn new(resource: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            attribute: attribute.into(),
        }
    }

    pub fn id(resource: impl Into<String>) -> Self {
        Self::new(resource, "id")
    }

    pub fn render(&self) -> String {
        format!("${{{}.{}}}", self.resource, self.attribute)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Reference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// 指向引擎侧密钥配置项的引用，从不携带明文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretRef {
    pub secret: String,
}

impl SecretRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { secret: key.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSpec {
    pub token: SecretRef,
    pub cloud_id: String,
    pub folder_id: String,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSpec {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    pub name: String,
    pub zone: String,
    pub network_id: Reference,
    pub v4_cidr_blocks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ingress,
    Egress,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ingress => write!(f, "ingress"),
            Direction::Egress => write!(f, "egress"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Any,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Any => write!(f, "ANY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRule {
    pub description: String,
    pub direction: Direction,
    /// `None` 表示所有端口
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub protocol: Protocol,
    pub v4_cidr_blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupSpec {
    pub name: String,
    pub network_id: Reference,
    pub rules: Vec<SecurityRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceResources {
    pub cores: u32,
    pub core_fraction: u32,
    /// GB
    pub memory: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub image_id: String,
    #[serde(rename = "type")]
    pub disk_type: String,
    /// GB
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootDisk {
    pub initialize_params: InitializeParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub subnet_id: Reference,
    pub nat: bool,
    pub security_group_ids: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    pub name: String,
    pub platform_id: String,
    pub zone: String,
    pub resources: InstanceResources,
    pub boot_disk: BootDisk,
    pub network_interfaces: Vec<NetworkInterface>,
    pub metadata: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,
}

/// 资源规格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceSpec {
    Provider(ProviderSpec),
    Network(NetworkSpec),
    Subnet(SubnetSpec),
    SecurityGroup(SecurityGroupSpec),
    Instance(InstanceSpec),
}

impl ResourceSpec {
    /// 引擎侧的资源类型标识
    pub fn type_token(&self) -> &'static str {
        match self {
            ResourceSpec::Provider(_) => "pulumi:providers:yandex",
            ResourceSpec::Network(_) => "yandex:index/vpcNetwork:VpcNetwork",
            ResourceSpec::Subnet(_) => "yandex:index/vpcSubnet:VpcSubnet",
            ResourceSpec::SecurityGroup(_) => "yandex:index/vpcSecurityGroup:VpcSecurityGroup",
            ResourceSpec::Instance(_) => "yandex:index/computeInstance:ComputeInstance",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResourceSpec::Provider(_) => "provider",
            ResourceSpec::Network(_) => "network",
            ResourceSpec::Subnet(_) => "subnet",
            ResourceSpec::SecurityGroup(_) => "security-group",
            ResourceSpec::Instance(_) => "instance",
        }
    }

    /// 规格中出现的全部引用，按字段顺序
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            ResourceSpec::Provider(_) | ResourceSpec::Network(_) => Vec::new(),
            ResourceSpec::Subnet(s) => vec![&s.network_id],
            ResourceSpec::SecurityGroup(sg) => vec![&sg.network_id],
            ResourceSpec::Instance(i) => i
                .network_interfaces
                .iter()
                .flat_map(|nic| std::iter::once(&nic.subnet_id).chain(nic.security_group_ids.iter()))
                .collect(),
        }
    }
}

/// 已声明的资源
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    /// 绑定的 provider 逻辑名；provider 自身为 `None`
    pub provider: Option<String>,
    pub spec: ResourceSpec,
}

impl Resource {
    pub fn new(name: impl Into<String>, spec: ResourceSpec) -> Self {
        Self {
            name: name.into(),
            provider: None,
            spec,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// 直接依赖：provider 在前，其后为规格引用（去重，保持首次出现顺序）
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        let refs = self.spec.references().into_iter().map(|r| r.resource.as_str());
        for name in self.provider.as_deref().into_iter().chain(refs) {
            if !deps.iter().any(|d| d == name) {
                deps.push(name.to_string());
            }
        }
        deps
    }
}
