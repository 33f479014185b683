use std::fmt;

use serde::{Deserialize, Serialize};

/// A zone as selected in the resource tree.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Zone {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Zone {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Kind of system VM, as reported in the `type` field of `listSystemVms`.
///
/// Values we have no special handling for are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SystemVmType {
    ConsoleProxy,
    SecondaryStorageVm,
    Other(String),
}

impl SystemVmType {
    pub fn as_str(&self) -> &str {
        match self {
            SystemVmType::ConsoleProxy => "consoleproxy",
            SystemVmType::SecondaryStorageVm => "secondarystoragevm",
            SystemVmType::Other(other) => other.as_str(),
        }
    }

    /// Human readable label shown in list rows and the create form.
    pub fn label(&self) -> &str {
        match self {
            SystemVmType::ConsoleProxy => "Console Proxy VM",
            SystemVmType::SecondaryStorageVm => "Secondary Storage VM",
            SystemVmType::Other(other) => other.as_str(),
        }
    }
}

impl From<String> for SystemVmType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "consoleproxy" => SystemVmType::ConsoleProxy,
            "secondarystoragevm" => SystemVmType::SecondaryStorageVm,
            _ => SystemVmType::Other(value),
        }
    }
}

impl From<&str> for SystemVmType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SystemVmType> for String {
    fn from(value: SystemVmType) -> Self {
        match value {
            SystemVmType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SystemVmType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converter applied to raw system VM type strings before display.
pub fn system_vm_type_label(raw: &str) -> String {
    SystemVmType::from(raw).label().to_string()
}

/// An entry of the `listSystemVms` response. Fields we do not use are ignored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SystemVm {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub ty: SystemVmType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoneid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zonename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publicip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privateip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_labels() {
        assert_eq!(system_vm_type_label("consoleproxy"), "Console Proxy VM");
        assert_eq!(
            system_vm_type_label("secondarystoragevm"),
            "Secondary Storage VM"
        );
        assert_eq!(system_vm_type_label("domainrouter"), "domainrouter");
        assert_eq!(system_vm_type_label(""), "");
    }

    #[test]
    fn parse_list_entry() {
        let vm: SystemVm = serde_json::from_str(
            r#"{
                "id": "5c1a3f0e-7a1b-4c7e-9d61-2f6b7c0d9e11",
                "name": "s-1-VM",
                "type": "secondarystoragevm",
                "state": "Running",
                "zoneid": "z1",
                "activeviewersessions": 0
            }"#,
        )
        .unwrap();

        assert_eq!(vm.name, "s-1-VM");
        assert_eq!(vm.ty, SystemVmType::SecondaryStorageVm);
        assert_eq!(vm.state.as_deref(), Some("Running"));
        assert_eq!(vm.hostname, None);

        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(value["type"], "secondarystoragevm");
    }

    #[test]
    fn unknown_type_is_kept() {
        let vm: SystemVm =
            serde_json::from_str(r#"{"id": "1", "name": "r-4-VM", "type": "domainrouter"}"#)
                .unwrap();
        assert_eq!(vm.ty, SystemVmType::Other("domainrouter".to_string()));
        assert_eq!(vm.ty.to_string(), "domainrouter");
    }
}
