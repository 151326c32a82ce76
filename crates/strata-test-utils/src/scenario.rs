//! Ready-made configuration roots.

use crate::ConfigFixture;

/// The database example: `default` and `development` YAML plus a `local`
/// override.
///
/// Resolving `development` with local loading enabled yields
/// `{database: {host: dev.db, port: 3306, user: otheruser, debug: true}}`.
pub fn database() -> ConfigFixture {
    ConfigFixture::new()
        .with_file(
            "default",
            "database.yaml",
            "host: default.db\nport: 3306\nuser: dbuser\n",
        )
        .with_file("development", "database.json", r#"{"host": "dev.db", "debug": true}"#)
        .with_file("local", "database.toml", "user = \"otheruser\"\n")
}

/// One file per supported data format, each a top-level key named after it.
pub fn all_formats() -> ConfigFixture {
    ConfigFixture::new()
        .with_file("default", "json.json", r#"{"format": "json"}"#)
        .with_file("default", "json5.json5", "{ format: \"json5\", }")
        .with_file("default", "jsonc.jsonc", "// comment\n{\"format\": \"jsonc\"}")
        .with_file("default", "toml.toml", "format = \"toml\"\n")
        .with_file("default", "yaml.yaml", "format: yaml\n")
        .with_file("default", "yml.yml", "format: yml\n")
}
