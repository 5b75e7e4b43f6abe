//! Resource table.
//!
//! One [`ResourceSpec`] per RIPS REST resource. Parent ids fill the `{}`
//! placeholders from left to right.

use crate::resource::ResourceSpec;

pub const APPLICATIONS: ResourceSpec = ResourceSpec::form("applications", "application");
pub const SCANS: ResourceSpec = ResourceSpec::form("applications/{}/scans", "scan");
pub const ISSUES: ResourceSpec = ResourceSpec::form("applications/{}/scans/{}/issues", "issue");
pub const COMMENTS: ResourceSpec =
    ResourceSpec::form("applications/{}/scans/{}/issues/{}/comments", "comment");
/// Source files collected by a scan.
pub const SCAN_SOURCES: ResourceSpec =
    ResourceSpec::json("applications/{}/scans/{}/sources", "source");
pub const SCAN_EXPORTS: ResourceSpec =
    ResourceSpec::json("applications/{}/scans/{}/exports", "export");

/// Custom rule profiles of an application.
pub const CUSTOMS: ResourceSpec = ResourceSpec::form("applications/{}/customs", "custom");
pub const CUSTOM_IGNORES: ResourceSpec =
    ResourceSpec::form("applications/{}/customs/{}/ignores", "ignore");
pub const CUSTOM_SANITISERS: ResourceSpec =
    ResourceSpec::json("applications/{}/customs/{}/sanitisers", "sanitiser");
pub const CUSTOM_SINKS: ResourceSpec =
    ResourceSpec::json("applications/{}/customs/{}/sinks", "sink");
pub const CUSTOM_SOURCES: ResourceSpec =
    ResourceSpec::json("applications/{}/customs/{}/sources", "source");
pub const CUSTOM_VALIDATORS: ResourceSpec =
    ResourceSpec::json("applications/{}/customs/{}/validators", "validator");

pub const LOGS: ResourceSpec = ResourceSpec::form("logs", "log");
pub const USERS: ResourceSpec = ResourceSpec::form("users", "user");
pub const TEAMS: ResourceSpec = ResourceSpec::form("teams", "team");
pub const ORGS: ResourceSpec = ResourceSpec::form("organisations", "organisation");
pub const LICENSES: ResourceSpec = ResourceSpec::json("licenses", "license");
pub const QUOTAS: ResourceSpec = ResourceSpec::form("quotas", "quota");
pub const SETTINGS: ResourceSpec = ResourceSpec::form("settings", "setting");
pub const OAUTH2_CLIENTS: ResourceSpec = ResourceSpec::json("oauth2/clients", "client");
pub const STATUS: ResourceSpec = ResourceSpec::json("status", "status");

/// Every resource by its CLI name.
pub const TABLE: &[(&str, ResourceSpec)] = &[
    ("applications", APPLICATIONS),
    ("scans", SCANS),
    ("issues", ISSUES),
    ("comments", COMMENTS),
    ("scan-sources", SCAN_SOURCES),
    ("customs", CUSTOMS),
    ("ignores", CUSTOM_IGNORES),
    ("sanitisers", CUSTOM_SANITISERS),
    ("sinks", CUSTOM_SINKS),
    ("sources", CUSTOM_SOURCES),
    ("validators", CUSTOM_VALIDATORS),
    ("logs", LOGS),
    ("users", USERS),
    ("teams", TEAMS),
    ("orgs", ORGS),
    ("licenses", LICENSES),
    ("quotas", QUOTAS),
    ("settings", SETTINGS),
    ("oauth2-clients", OAUTH2_CLIENTS),
];

/// Look up a resource by name. Singular names are accepted too.
pub fn lookup(name: &str) -> Option<ResourceSpec> {
    let name = name.to_ascii_lowercase();
    TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .or_else(|| TABLE.iter().find(|(n, _)| n.strip_suffix('s') == Some(name.as_str())))
        .map(|(_, spec)| *spec)
}
