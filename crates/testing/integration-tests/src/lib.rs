//! Integration test utilities for the Coral region checker

use cr_driver::{CheckReport, DriverError};
use cr_regionck::{JoinPolicy, RegionckConfig};

/// Checks a JSON fixture with the default configuration.
///
/// # Errors
///
/// Returns the driver error if the fixture fails to lower or check
pub fn check(json: &str) -> Result<CheckReport, DriverError> {
    cr_driver::check_fixture(json, RegionckConfig::default())
}

/// Checks a JSON fixture with a configuration given as TOML.
///
/// # Errors
///
/// Returns the driver error if the configuration or the fixture is invalid
pub fn check_with_toml(json: &str, toml: &str) -> Result<CheckReport, DriverError> {
    let config = RegionckConfig::from_toml_str(toml)?;
    cr_driver::check_fixture(json, config)
}

/// Checks a JSON fixture under the given join policy.
///
/// # Errors
///
/// Returns the driver error if the fixture fails to lower or check
pub fn check_with_join(json: &str, join_policy: JoinPolicy) -> Result<CheckReport, DriverError> {
    let config = RegionckConfig {
        join_policy,
        ..RegionckConfig::default()
    };
    cr_driver::check_fixture(json, config)
}

/// Loans in scope at every node, as `node: [L0, L1]` lines.
#[must_use]
pub fn in_scope_table(report: &CheckReport) -> String {
    report
        .nodes
        .iter()
        .map(|node| format!("{}: [{}]\n", node.id, node.in_scope_loans.join(", ")))
        .collect()
}
