//! Interactive prompts for run parameters not supplied elsewhere.

use std::io::{BufRead, Write};

use crate::adapters::map_config_adapter::MapConfigAdapter;
use crate::domain::config_validation::SECTION;
use crate::domain::error::DcaError;
use crate::ports::config_port::ConfigPort;

const PROMPTS: [(&str, &str); 5] = [
    ("ticker", "Enter the ticker symbol of the asset (e.g., AAPL for Apple): "),
    ("amount", "Enter the amount you want to invest every week (in USD): "),
    ("start_date", "Enter the start date (YYYY-MM-DD): "),
    ("end_date", "Enter the end date (YYYY-MM-DD): "),
    (
        "custom_interval",
        "Enter custom DCA interval (e.g., 2W for two weeks, 3M for three months): ",
    ),
];

pub struct PromptAdapter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptAdapter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prompt for every run key `known` does not already provide.
    ///
    /// Stops at end of input; anything left unanswered is reported by
    /// validation afterwards.
    pub fn collect_missing(&mut self, known: &dyn ConfigPort) -> Result<MapConfigAdapter, DcaError> {
        let mut answers = MapConfigAdapter::new();

        for (key, prompt) in PROMPTS {
            if known.get_string(SECTION, key).is_some() {
                continue;
            }
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                tracing::debug!(key, "input closed before all prompts were answered");
                break;
            }
            answers.set(SECTION, key, line.trim());
        }

        Ok(answers)
    }
}
