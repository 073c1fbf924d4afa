//! Canonical test configurations.

/// Empty file: every section defaulted.
pub const MINIMAL_TOML: &str = "";

/// Every section set to a non-default value.
pub const FULL_TOML: &str = r#"
[database]
path = "reports.db"
pool_size = 3

[server]
bind = "0.0.0.0:9000"

[logging]
level = "debug"
format = "json"
"#;
