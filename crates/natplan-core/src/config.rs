use std::path::PathBuf;

/// Settings for one evaluation run.
///
/// Built by the caller and passed to [`crate::driver::run`]; nothing is read
/// from process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Dataset file to score.
    pub data_path: PathBuf,
    /// Name of the record field holding the candidate text.
    pub pred_field: String,
    /// Where to write per-example results, if anywhere.
    pub output: Option<PathBuf>,
    /// List every failing example in the report.
    pub verbose: bool,
}

impl EvalConfig {
    /// The prediction column populated by the benchmark's reference runs.
    pub const DEFAULT_PRED_FIELD: &str = "pred_5shot_pro";

    /// Create a config for `data_path` with defaults for everything else.
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            pred_field: Self::DEFAULT_PRED_FIELD.to_owned(),
            output: None,
            verbose: false,
        }
    }

    pub fn pred_field(mut self, field: impl Into<String>) -> Self {
        self.pred_field = field.into();
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
