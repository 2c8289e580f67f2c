//! CLI failures and their process exit codes.
//!
//! | code | meaning |
//! |------|---------|
//! | 0    | success |
//! | 2    | argument parse error, reported by clap before `run` |
//! | 10   | generation failed (bad canvas size, broken component outline) |
//! | 11   | output could not be produced or written |
//! | 12   | unusable input (palette, component, policy, `--params`) |
//! | 13   | JSON report could not be encoded |

use std::path::{Path, PathBuf};

use facet_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Raised by facet-core or facet-render; the exit code depends on the variant.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// The renderer could not obtain a surface of this size.
    #[error("no {width}x{height} surface available")]
    Surface { width: u32, height: u32 },

    #[error("{0}")]
    Input(String),

    #[error("cannot encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Wraps a failed write to `path`.
    pub fn write(path: &Path, reason: impl ToString) -> Self {
        CliError::Write {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(EngineError::Io(_)) => 11,
            CliError::Engine(
                EngineError::UnknownPalette(_)
                | EngineError::UnknownComponent(_)
                | EngineError::UnknownPolicy(_)
                | EngineError::InvalidColor(_)
                | EngineError::InvalidPalette(_),
            ) => 12,
            CliError::Engine(_) => 10,
            CliError::Write { .. } | CliError::Surface { .. } => 11,
            CliError::Input(_) => 12,
            CliError::Json(_) => 13,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_failures_exit_10() {
        let err = CliError::from(EngineError::InvalidDimensions);
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("width"));

        let err = CliError::from(EngineError::InvalidPath {
            component: "lt".into(),
            reason: "bad arc".into(),
        });
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn output_failures_exit_11() {
        let err = CliError::write(Path::new("out/facet.png"), "permission denied");
        assert_eq!(err.exit_code(), 11);
        assert_eq!(err.to_string(), "cannot write out/facet.png: permission denied");

        let err = CliError::Surface {
            width: 0,
            height: 4500,
        };
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("0x4500"));

        let err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn unknown_names_exit_12() {
        for engine in [
            EngineError::UnknownPalette("sunset".into()),
            EngineError::UnknownComponent("zz".into()),
            EngineError::UnknownPolicy("greedy".into()),
        ] {
            let err = CliError::from(engine);
            assert_eq!(err.exit_code(), 12, "{err}");
        }
        assert_eq!(CliError::Input("--params must be a JSON object".into()).exit_code(), 12);
    }

    #[test]
    fn engine_messages_pass_through() {
        let err = CliError::from(EngineError::UnknownPalette("sunset".into()));
        assert_eq!(err.to_string(), "unknown palette: sunset");
    }

    #[test]
    fn json_failures_exit_13() {
        let Err(json) = serde_json::from_str::<serde_json::Value>("{invalid") else {
            panic!("malformed JSON parsed");
        };
        let err = CliError::from(json);
        assert_eq!(err.exit_code(), 13);
        assert!(err.to_string().starts_with("cannot encode JSON output"));
    }
}
