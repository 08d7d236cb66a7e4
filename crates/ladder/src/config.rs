// CurriculumConfig: curriculum description loaded from TOML
//
// Example:
//
//   corpus = "notes.txt"
//
//   [pipeline]
//   batch_size = 4
//   shuffle_buffer = 256
//   seed = 42
//
//   [[phases]]
//   name = "short"
//   window_length = 8
//   steps = 3

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use ladder_core::{Error, Result};
use ladder_data::PipelineConfig;

use crate::curriculum::Phase;

/// TOML integers are signed 64-bit.
const TOML_INT_MAX: usize = i64::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumConfig {
    /// Text file to window; relative paths resolve against the config file.
    pub corpus: Option<PathBuf>,
    pub pipeline: PipelineConfig,
    pub phases: Vec<Phase>,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            corpus: None,
            pipeline: PipelineConfig::default(),
            phases: vec![
                Phase::new("short", 8, 3),
                Phase::new("medium", 16, 3),
                Phase::new("long", 32, 3),
            ],
        }
    }
}

impl CurriculumConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;

        if let (Some(corpus), Some(dir)) = (config.corpus.as_ref(), path.parent()) {
            if corpus.is_relative() {
                config.corpus = Some(dir.join(corpus));
            }
        }
        debug!(path = %path.display(), phases = config.phases.len(), "loaded curriculum config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Replace the phases with one per window length, each `steps` long.
    pub fn with_lengths(mut self, lengths: &[usize], steps: usize) -> Self {
        self.phases = lengths
            .iter()
            .enumerate()
            .map(|(i, &len)| Phase::new(format!("phase-{}-len{}", i + 1, len), len, steps))
            .collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.phases.is_empty() {
            return Err(Error::Config("at least one phase is required".into()));
        }
        let mut names = HashSet::new();
        for phase in &self.phases {
            if phase.window_length == 0 {
                return Err(Error::Config(format!(
                    "phase '{}' has window_length 0",
                    phase.name
                )));
            }
            if phase.steps > TOML_INT_MAX {
                return Err(Error::Config(format!(
                    "phase '{}' has {} steps, more than a TOML integer holds",
                    phase.name, phase.steps
                )));
            }
            if !names.insert(phase.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate phase name '{}'",
                    phase.name
                )));
            }
        }
        if let Some(seed) = self.pipeline.seed {
            if seed > i64::MAX as u64 {
                return Err(Error::Config(format!(
                    "seed {seed} is larger than a TOML integer holds ({})",
                    i64::MAX
                )));
            }
        }
        self.pipeline
            .validate()
            .map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let c = CurriculumConfig::default();
        assert!(c.validate().is_ok());
        let lengths: Vec<usize> = c.phases.iter().map(|p| p.window_length).collect();
        assert_eq!(lengths, vec![8, 16, 32]);
    }

    #[test]
    fn parses_full_document() {
        let c = CurriculumConfig::from_toml_str(
            r#"
            corpus = "text.txt"

            [pipeline]
            batch_size = 4
            shuffle_buffer = 64
            seed = 7
            repeat = 2

            [[phases]]
            name = "a"
            window_length = 5
            steps = 2

            [[phases]]
            name = "b"
            window_length = 10
            "#,
        )
        .unwrap();
        assert_eq!(c.corpus, Some(PathBuf::from("text.txt")));
        assert_eq!(c.pipeline.batch_size, 4);
        assert_eq!(c.pipeline.seed, Some(7));
        assert_eq!(c.pipeline.repeat, Some(2));
        assert!(c.pipeline.shuffle);
        assert_eq!(c.phases[0], Phase::new("a", 5, 2));
        assert_eq!(c.phases[1].steps, 1);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let c = CurriculumConfig::from_toml_str("").unwrap();
        assert_eq!(c, CurriculumConfig::default());
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(matches!(
            CurriculumConfig::from_toml_str("phases = []"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CurriculumConfig::from_toml_str(
                "[[phases]]\nname = \"x\"\nwindow_length = 0\n"
            ),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CurriculumConfig::from_toml_str(
                "[[phases]]\nname = \"x\"\nwindow_length = 3\n\
                 [[phases]]\nname = \"x\"\nwindow_length = 4\n"
            ),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CurriculumConfig::from_toml_str("[pipeline]\nbatch_size = 0\n"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            CurriculumConfig::from_toml_str("phases = 3"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn rejects_values_toml_cannot_write() {
        let mut c = CurriculumConfig::default();
        c.pipeline.seed = Some(i64::MAX as u64 + 1);
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.pipeline.seed = Some(i64::MAX as u64);
        assert!(c.validate().is_ok());
        assert!(c.to_toml_string().is_ok());

        let huge = CurriculumConfig::default().with_lengths(&[4, 8], usize::MAX);
        assert!(matches!(huge.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn toml_round_trip() {
        let c = CurriculumConfig::default().with_lengths(&[4, 12], 5);
        let text = c.to_toml_string().unwrap();
        assert_eq!(CurriculumConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn with_lengths_names_phases() {
        let c = CurriculumConfig::default().with_lengths(&[4, 12], 5);
        assert_eq!(c.phases[0], Phase::new("phase-1-len4", 4, 5));
        assert_eq!(c.phases[1], Phase::new("phase-2-len12", 12, 5));
    }
}
