use serde::{Deserialize, Serialize};

use proxmox_schema::api;

#[api]
/// Kind of diagnostics data to collect from a system VM.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum DiagnosticsType {
    /// Log files.
    #[serde(rename = "LOGFILES")]
    LogFiles,
    /// Firewall rules.
    #[serde(rename = "IPTABLES")]
    IpTables,
    /// Service configuration files.
    #[serde(rename = "CONFIGURATIONFILES")]
    ConfigurationFiles,
    /// Network interface configuration.
    #[serde(rename = "IFCONFIG")]
    IfConfig,
    /// Agent property files.
    #[serde(rename = "PROPERTYFILES")]
    PropertyFiles,
    /// DHCP server files.
    #[serde(rename = "DHCPFILES")]
    DhcpFiles,
    /// User data.
    #[serde(rename = "USERDATA")]
    UserData,
    /// Load balancer configuration.
    #[serde(rename = "LB")]
    Lb,
    /// VPN configuration.
    #[serde(rename = "VPN")]
    Vpn,
    /// Current firewall rules, dumped on the system VM.
    #[serde(rename = "IPTABLESretrieve")]
    IpTablesRetrieve,
    /// Current interface state, dumped on the system VM.
    #[serde(rename = "IFCONFIGretrieve")]
    IfConfigRetrieve,
    /// Current routing table, dumped on the system VM.
    #[serde(rename = "ROUTEretrieve")]
    RouteRetrieve,
}

serde_plain::derive_display_from_serialize!(DiagnosticsType);
serde_plain::derive_fromstr_from_deserialize!(DiagnosticsType);

impl DiagnosticsType {
    /// Every diagnostics type, in the order offered to the user.
    pub const ALL: [DiagnosticsType; 12] = [
        DiagnosticsType::LogFiles,
        DiagnosticsType::IpTables,
        DiagnosticsType::ConfigurationFiles,
        DiagnosticsType::IfConfig,
        DiagnosticsType::PropertyFiles,
        DiagnosticsType::DhcpFiles,
        DiagnosticsType::UserData,
        DiagnosticsType::Lb,
        DiagnosticsType::Vpn,
        DiagnosticsType::IpTablesRetrieve,
        DiagnosticsType::IfConfigRetrieve,
        DiagnosticsType::RouteRetrieve,
    ];
}

/// A request for a diagnostics bundle from one system VM.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DiagnosticsRequest {
    #[serde(rename = "systemvmtype")]
    pub system_vm_id: String,

    #[serde(rename = "diagnosticstype")]
    pub diagnostics_type: DiagnosticsType,

    /// Free text qualifier, passed to the server as is.
    #[serde(default)]
    pub detail: String,
}

impl DiagnosticsRequest {
    pub fn new(system_vm_id: impl Into<String>, diagnostics_type: DiagnosticsType) -> Self {
        Self {
            system_vm_id: system_vm_id.into(),
            diagnostics_type,
            detail: String::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// The additional files named in `detail`.
    ///
    /// The server reads `detail` as a comma separated list, entries are trimmed and empty ones
    /// skipped.
    pub fn detail_files(&self) -> Vec<&str> {
        self.detail
            .split(',')
            .map(str::trim)
            .filter(|file| !file.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_in_order() {
        let names: Vec<String> = DiagnosticsType::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            [
                "LOGFILES",
                "IPTABLES",
                "CONFIGURATIONFILES",
                "IFCONFIG",
                "PROPERTYFILES",
                "DHCPFILES",
                "USERDATA",
                "LB",
                "VPN",
                "IPTABLESretrieve",
                "IFCONFIGretrieve",
                "ROUTEretrieve",
            ]
        );
    }

    #[test]
    fn parse_type() {
        let ty: DiagnosticsType = "ROUTEretrieve".parse().unwrap();
        assert_eq!(ty, DiagnosticsType::RouteRetrieve);

        assert!("logfiles".parse::<DiagnosticsType>().is_err());
        assert!("ROUTE".parse::<DiagnosticsType>().is_err());
    }

    #[test]
    fn detail_files() {
        let request = DiagnosticsRequest::new("i-2-3-VM", DiagnosticsType::LogFiles)
            .with_detail(" /var/log/cloud.log, ,dnsmasq.conf,");
        assert_eq!(
            request.detail_files(),
            ["/var/log/cloud.log", "dnsmasq.conf"]
        );

        let request = DiagnosticsRequest::new("i-2-3-VM", DiagnosticsType::LogFiles);
        assert!(request.detail_files().is_empty());
    }

    #[test]
    fn form_field_names() {
        let request: DiagnosticsRequest = serde_json::from_str(
            r#"{"systemvmtype": "v-2-VM", "diagnosticstype": "IPTABLES"}"#,
        )
        .unwrap();
        assert_eq!(request.system_vm_id, "v-2-VM");
        assert_eq!(request.diagnostics_type, DiagnosticsType::IpTables);
        assert_eq!(request.detail, "");
    }
}
