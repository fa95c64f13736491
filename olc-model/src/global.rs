//! The `cn=config` entry and its TLS settings.

use crate::entry::{ConfigEntry, ConfigNode};
use olc_types::{Attribute, Entry, OBJECT_CLASS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

/// DN of the global configuration entry.
pub const GLOBAL_DN: &str = "cn=config";

const LOG_LEVEL: &str = "olcLogLevel";
const ALLOWS: &str = "olcAllows";
const DISALLOWS: &str = "olcDisallows";
const PID_FILE: &str = "olcPidFile";
const ARGS_FILE: &str = "olcArgsFile";
const AUTHZ_REGEXP: &str = "olcAuthzRegexp";

const DEFAULT_PID_FILE: &str = "/var/run/slapd/slapd.pid";
const DEFAULT_ARGS_FILE: &str = "/var/run/slapd/slapd.args";
/// Maps the local root user, authenticated over `ldapi://` with SASL
/// EXTERNAL, to the config rootdn.
const ROOT_AUTHZ_REGEXP: &str =
    "gidNumber=0\\+uidNumber=0,cn=peercred,cn=external,cn=auth dn:cn=config";

const TLS_CRL_CHECK: &str = "olcTLSCRLCheck";
const TLS_VERIFY_CLIENT: &str = "olcTLSVerifyClient";
const TLS_CA_CERT_DIR: &str = "olcTLSCACertificatePath";
const TLS_CA_CERT_FILE: &str = "olcTLSCACertificateFile";
const TLS_CERT_FILE: &str = "olcTLSCertificateFile";
const TLS_CERT_KEY_FILE: &str = "olcTLSCertificateKeyFile";
const TLS_CRL_FILE: &str = "olcTLSCRLFile";

/// Server-wide options stored in `cn=config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    entry: ConfigEntry,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalConfig {
    /// A fresh `cn=config` entry with only its object class and name.
    pub fn new() -> Self {
        let entry = Entry::with_attributes(
            GLOBAL_DN,
            [
                Attribute::single(OBJECT_CLASS, "olcGlobal"),
                Attribute::single("cn", "config"),
            ],
        );
        Self {
            entry: ConfigEntry::new_entry(entry),
        }
    }

    pub fn from_entry(entry: Entry) -> Self {
        Self {
            entry: ConfigEntry::from_entry(entry),
        }
    }

    /// Sets the pid file, args file and the root SASL mapping a freshly
    /// installed server needs.
    pub fn init_defaults(&mut self) {
        self.entry.set_string_value(PID_FILE, DEFAULT_PID_FILE);
        self.entry.set_string_value(ARGS_FILE, DEFAULT_ARGS_FILE);
        self.entry.set_string_value(AUTHZ_REGEXP, ROOT_AUTHZ_REGEXP);
    }

    /// Symbolic log levels. Values starting with an integer (`256`, `-1`,
    /// `0x100`) are numeric and skipped.
    #[must_use]
    pub fn log_levels(&self) -> Vec<String> {
        self.entry
            .string_values(LOG_LEVEL)
            .iter()
            .filter(|v| {
                let numeric = starts_with_integer(v);
                trace!("log level {} numeric={}", v, numeric);
                !numeric
            })
            .cloned()
            .collect()
    }

    pub fn set_log_levels(&mut self, levels: Vec<String>) {
        self.entry.set_string_values(LOG_LEVEL, levels);
    }

    pub fn add_log_level(&mut self, level: &str) {
        self.entry.add_string_value(LOG_LEVEL, level);
    }

    #[must_use]
    pub fn allow_features(&self) -> &[String] {
        self.entry.string_values(ALLOWS)
    }

    pub fn set_allow_features(&mut self, features: Vec<String>) {
        self.entry.set_string_values(ALLOWS, features);
    }

    #[must_use]
    pub fn disallow_features(&self) -> &[String] {
        self.entry.string_values(DISALLOWS)
    }

    pub fn set_disallow_features(&mut self, features: Vec<String>) {
        self.entry.set_string_values(DISALLOWS, features);
    }

    /// Reads the TLS options. Unknown enum values read as unset.
    #[must_use]
    pub fn tls(&self) -> TlsSettings {
        let text = |name: &str| self.entry.string_value(name).map(str::to_string);
        TlsSettings {
            crl_check: self
                .entry
                .string_value(TLS_CRL_CHECK)
                .and_then(|v| v.parse().ok()),
            verify_client: self
                .entry
                .string_value(TLS_VERIFY_CLIENT)
                .and_then(|v| v.parse().ok()),
            ca_cert_dir: text(TLS_CA_CERT_DIR),
            ca_cert_file: text(TLS_CA_CERT_FILE),
            cert_file: text(TLS_CERT_FILE),
            cert_key_file: text(TLS_CERT_KEY_FILE),
            crl_file: text(TLS_CRL_FILE),
        }
    }

    /// Writes the TLS options. Unset paths remove their attribute; the CRL
    /// check and client verification are only written when set.
    pub fn set_tls(&mut self, tls: &TlsSettings) {
        debug!("applying tls settings");
        if let Some(check) = tls.crl_check {
            self.entry.set_string_value(TLS_CRL_CHECK, check.as_str());
        }
        if let Some(verify) = tls.verify_client {
            self.entry.set_string_value(TLS_VERIFY_CLIENT, verify.as_str());
        }
        let paths = [
            (TLS_CA_CERT_DIR, &tls.ca_cert_dir),
            (TLS_CA_CERT_FILE, &tls.ca_cert_file),
            (TLS_CERT_FILE, &tls.cert_file),
            (TLS_CERT_KEY_FILE, &tls.cert_key_file),
            (TLS_CRL_FILE, &tls.crl_file),
        ];
        for (name, value) in paths {
            self.entry
                .set_string_value(name, value.as_deref().unwrap_or_default());
        }
    }
}

impl ConfigNode for GlobalConfig {
    fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    fn entry_mut(&mut self) -> &mut ConfigEntry {
        &mut self.entry
    }
}

/// `olcTLSCRLCheck` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrlCheck {
    None,
    Peer,
    All,
}

impl CrlCheck {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Peer => "peer",
            Self::All => "all",
        }
    }
}

impl fmt::Display for CrlCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrlCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "peer" => Ok(Self::Peer),
            "all" => Ok(Self::All),
            _ => Err(format!("unknown crl check: {s}")),
        }
    }
}

/// `olcTLSVerifyClient` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyClient {
    Never,
    Allow,
    Try,
    Demand,
}

impl VerifyClient {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Allow => "allow",
            Self::Try => "try",
            Self::Demand => "demand",
        }
    }
}

impl fmt::Display for VerifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerifyClient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "never" => Ok(Self::Never),
            "allow" => Ok(Self::Allow),
            "try" => Ok(Self::Try),
            "demand" => Ok(Self::Demand),
            _ => Err(format!("unknown client verification: {s}")),
        }
    }
}

/// Detached copy of the TLS options of a [`GlobalConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsSettings {
    pub crl_check: Option<CrlCheck>,
    pub verify_client: Option<VerifyClient>,
    pub ca_cert_dir: Option<String>,
    pub ca_cert_file: Option<String>,
    pub cert_file: Option<String>,
    pub cert_key_file: Option<String>,
    pub crl_file: Option<String>,
}

fn starts_with_integer(value: &str) -> bool {
    let value = value.trim_start();
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    digits.starts_with(|c: char| c.is_ascii_digit())
}
