//! 实验环境栈：provider、网络、子网、安全组与一台虚拟机

use devinfo_core::config::ComponentConfig;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::config::InfraConfig;
use crate::error::{InfraError, Result};
use crate::graph::ResourceGraph;
use crate::outputs::{Output, OutputPart};
use crate::resources::{
    BootDisk, Direction, InitializeParams, InstanceResources, InstanceSpec, NetworkInterface,
    NetworkSpec, Protocol, ProviderSpec, Reference, Resource, ResourceSpec, SecretRef,
    SecurityGroupSpec, SecurityRule, SubnetSpec,
};

pub const PROVIDER_NAME: &str = "yandex-provider";
pub const TOKEN_CONFIG_KEY: &str = "yc_token";
pub const SUBNET_CIDR: &str = "10.10.0.0/24";
pub const PLATFORM_ID: &str = "standard-v2";
/// Ubuntu 22.04 LTS
pub const BOOT_IMAGE_ID: &str = "fd8073pi3afqvtb46mu5";
pub const ANY_ADDRESS: &str = "0.0.0.0/0";
pub const APPLICATION_PORT: u16 = 5000;

const NAT_IP_ATTRIBUTE: &str = "networkInterfaces[0].natIpAddress";
const INTERNAL_IP_ATTRIBUTE: &str = "networkInterfaces[0].ipAddress";

/// 已声明的栈
#[derive(Debug, Clone)]
pub struct Stack {
    pub graph: ResourceGraph,
    pub outputs: Vec<Output>,
    /// 非敏感配置摘要
    pub config: BTreeMap<String, String>,
}

impl Stack {
    /// 图校验，并确认输出只引用已声明资源
    pub fn validate(&self) -> Result<()> {
        self.graph.validate()?;
        for output in &self.outputs {
            for r in output.value.references() {
                if !self.graph.contains(&r.resource) {
                    return Err(InfraError::UnknownOutputReference {
                        output: output.name.clone(),
                        to: r.resource.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name == name)
    }
}

/// 读取 SSH 公钥：展开 `~`，去除首尾空白；文件缺失或为空时报错
pub fn read_public_key(path: &str) -> Result<String> {
    let expanded = shellexpand::tilde(path).into_owned();
    let content = std::fs::read_to_string(Path::new(&expanded)).map_err(|source| {
        InfraError::SshKey {
            path: expanded.clone(),
            source,
        }
    })?;

    let key = content.trim();
    if key.is_empty() {
        return Err(InfraError::EmptySshKey { path: expanded });
    }
    debug!(path = %expanded, "SSH public key loaded");
    Ok(key.to_string())
}

fn rule(description: &str, direction: Direction, protocol: Protocol, port: Option<u16>) -> SecurityRule {
    SecurityRule {
        description: description.to_string(),
        direction,
        port,
        protocol,
        v4_cidr_blocks: vec![ANY_ADDRESS.to_string()],
    }
}

/// 构建资源图与输出并校验
pub fn declare_stack(config: &InfraConfig, public_key: &str) -> Result<Stack> {
    let prefix = &config.resource_prefix;
    let network_name = format!("{}-network", prefix);
    let subnet_name = format!("{}-subnet", prefix);
    let group_name = format!("{}-security-group", prefix);
    let instance_name = prefix.clone();

    let mut graph = ResourceGraph::new();

    graph.add(Resource::new(
        PROVIDER_NAME,
        ResourceSpec::Provider(ProviderSpec {
            token: SecretRef::new(TOKEN_CONFIG_KEY),
            cloud_id: config.yc_cloud_id.clone(),
            folder_id: config.yc_folder_id.clone(),
            zone: config.yc_zone.clone(),
        }),
    ))?;

    graph.add(
        Resource::new(
            &network_name,
            ResourceSpec::Network(NetworkSpec {
                name: network_name.clone(),
            }),
        )
        .with_provider(PROVIDER_NAME),
    )?;

    graph.add(
        Resource::new(
            &subnet_name,
            ResourceSpec::Subnet(SubnetSpec {
                name: subnet_name.clone(),
                zone: config.yc_zone.clone(),
                network_id: Reference::id(&network_name),
                v4_cidr_blocks: vec![SUBNET_CIDR.to_string()],
            }),
        )
        .with_provider(PROVIDER_NAME),
    )?;

    graph.add(
        Resource::new(
            &group_name,
            ResourceSpec::SecurityGroup(SecurityGroupSpec {
                name: group_name.clone(),
                network_id: Reference::id(&network_name),
                rules: vec![
                    rule("SSH", Direction::Ingress, Protocol::Tcp, Some(22)),
                    rule("HTTP", Direction::Ingress, Protocol::Tcp, Some(80)),
                    rule(
                        "Custom application port",
                        Direction::Ingress,
                        Protocol::Tcp,
                        Some(APPLICATION_PORT),
                    ),
                    rule("All outgoing traffic", Direction::Egress, Protocol::Any, None),
                ],
            }),
        )
        .with_provider(PROVIDER_NAME),
    )?;

    let metadata = BTreeMap::from([(
        "ssh-keys".to_string(),
        format!("{}:{}", config.vm_username, public_key),
    )]);
    let labels = BTreeMap::from([
        ("environment".to_string(), "lab4".to_string()),
        ("purpose".to_string(), "devops-course".to_string()),
    ]);

    graph.add(
        Resource::new(
            &instance_name,
            ResourceSpec::Instance(InstanceSpec {
                name: config.vm_name.clone(),
                platform_id: PLATFORM_ID.to_string(),
                zone: config.yc_zone.clone(),
                resources: InstanceResources {
                    cores: config.instance_cores,
                    core_fraction: config.core_fraction,
                    memory: config.instance_memory,
                },
                boot_disk: BootDisk {
                    initialize_params: InitializeParams {
                        image_id: BOOT_IMAGE_ID.to_string(),
                        disk_type: config.disk_type.clone(),
                        size: config.disk_size,
                    },
                },
                network_interfaces: vec![NetworkInterface {
                    subnet_id: Reference::id(&subnet_name),
                    nat: true,
                    security_group_ids: vec![Reference::id(&group_name)],
                }],
                metadata,
                labels,
            }),
        )
        .with_provider(PROVIDER_NAME),
    )?;

    let outputs = vec![
        Output::reference("vm_name", Reference::new(&instance_name, "name")),
        Output::reference("vm_external_ip", Reference::new(&instance_name, NAT_IP_ATTRIBUTE)),
        Output::reference(
            "vm_internal_ip",
            Reference::new(&instance_name, INTERNAL_IP_ATTRIBUTE),
        ),
        Output::concat(
            "ssh_connection_string",
            vec![
                OutputPart::Literal("ssh ".to_string()),
                OutputPart::Literal(config.vm_username.clone()),
                OutputPart::Literal("@".to_string()),
                OutputPart::Ref(Reference::new(&instance_name, NAT_IP_ATTRIBUTE)),
            ],
        ),
        Output::reference("network_name", Reference::new(&network_name, "name")),
        Output::reference("subnet_name", Reference::new(&subnet_name, "name")),
        Output::reference("security_group_name", Reference::new(&group_name, "name")),
    ];

    let stack = Stack {
        graph,
        outputs,
        config: config.summary(),
    };
    stack.validate()?;

    debug!(
        resources = stack.graph.len(),
        outputs = stack.outputs.len(),
        "stack declared"
    );
    Ok(stack)
}
