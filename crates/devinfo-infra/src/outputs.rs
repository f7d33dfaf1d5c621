//! 栈输出：引用单个属性，或由字面量与引用拼接而成

use serde::{Serialize, Serializer};

use crate::resources::Reference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPart {
    Literal(String),
    Ref(Reference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputExpr {
    Ref(Reference),
    Concat(Vec<OutputPart>),
}

impl OutputExpr {
    pub fn references(&self) -> Vec<&Reference> {
        match self {
            OutputExpr::Ref(r) => vec![r],
            OutputExpr::Concat(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    OutputPart::Ref(r) => Some(r),
                    OutputPart::Literal(_) => None,
                })
                .collect(),
        }
    }

    /// 渲染为插值字符串，如 `ssh user@${vm.networkInterfaces[0].natIpAddress}`
    pub fn render(&self) -> String {
        match self {
            OutputExpr::Ref(r) => r.render(),
            OutputExpr::Concat(parts) => parts
                .iter()
                .map(|p| match p {
                    OutputPart::Literal(s) => s.clone(),
                    OutputPart::Ref(r) => r.render(),
                })
                .collect(),
        }
    }
}

impl Serialize for OutputExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    pub name: String,
    pub value: OutputExpr,
}

impl Output {
    pub fn reference(name: impl Into<String>, reference: Reference) -> Self {
        Self {
            name: name.into(),
            value: OutputExpr::Ref(reference),
        }
    }

    pub fn concat(name: impl Into<String>, parts: Vec<OutputPart>) -> Self {
        Self {
            name: name.into(),
            value: OutputExpr::Concat(parts),
        }
    }
}
