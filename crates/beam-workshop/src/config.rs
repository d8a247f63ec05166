//! The workshop configuration bundle.
//!
//! Everything version-shaped lives here, so bumping the consumer
//! application does not mean editing declarations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Values that vary between workshop deployments.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkshopConfig {
    /// Release of the kinesis replay tool baked into the dev environment.
    pub kinesis_replay_version: String,
    /// Release of the Beam consumer application the build pipeline fetches.
    pub beam_application_version: String,
    /// File name of the bundled consumer jar inside the build output.
    pub beam_application_jar_file: String,
    /// Name of the Kinesis Data Analytics application the termination
    /// lambda stops.
    pub application_name: String,
    /// Source file embedded into the enrichment lambda.
    pub enrich_lambda_source: PathBuf,
    /// Source file embedded into the termination lambda.
    pub stop_lambda_source: PathBuf,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        WorkshopConfig {
            kinesis_replay_version: "0.1.0".to_owned(),
            beam_application_version: "1.0".to_owned(),
            beam_application_jar_file: "beam-taxi-count-bundled-1.0.jar".to_owned(),
            application_name: "beam-workshop".to_owned(),
            enrich_lambda_source: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/lambda/enrich-trip-events.js"
            )),
            stop_lambda_source: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/lambda/stop-beam-application.py"
            )),
        }
    }
}

impl WorkshopConfig {
    /// Read a configuration bundle from a TOML file.
    ///
    /// A bundle that was asked for but cannot be read or parsed is fatal.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config {path:?}"))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("could not parse config {path:?}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_partial_bundle() {
        let config: WorkshopConfig = toml::from_str(
            r#"
            beam_application_version = "2.0"
            beam_application_jar_file = "beam-taxi-count-bundled-2.0.jar"
            "#,
        )
        .unwrap();
        assert_eq!("2.0", &config.beam_application_version);
        // Unlisted fields fall back to the defaults.
        assert_eq!("beam-workshop", &config.application_name);
        assert_eq!("0.1.0", &config.kinesis_replay_version);
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = toml::from_str::<WorkshopConfig>("beam_version = \"2.0\"\n");
        assert!(result.is_err());
    }
}
