//! One-shot `suggest` command.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use serde::Serialize;
use storefront_search::{
    CandidateProvider, FetchOutcome, SuggestConfig, SuggestionFetcher, SuggestionList,
    trailing_word,
};
use tracing::{debug, info};

/// How suggestions are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One suggestion per line.
    #[default]
    Plain,
    /// The list markup a page would render.
    Html,
    /// `{"query": ..., "suggestions": [...]}`.
    Json,
}

#[derive(Debug, Args)]
pub struct SuggestCommand {
    /// Input text; words are joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Output format.
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    suggestions: Vec<&'a str>,
}

impl SuggestCommand {
    /// Full input value.
    pub fn input(&self) -> String {
        self.text.join(" ")
    }

    /// Look up the trailing word and print the rendered list to `out`.
    ///
    /// A trailing word below the threshold prints nothing.
    pub async fn run(
        &self,
        provider: Arc<dyn CandidateProvider>,
        config: &SuggestConfig,
        out: &mut impl Write,
    ) -> Result<()> {
        let input = self.input();
        let word = trailing_word(&input);
        if !config.qualifies(word) {
            debug!(word, "trailing word below threshold, nothing to look up");
            return Ok(());
        }

        let mut fetcher = SuggestionFetcher::new(provider);
        let lookup = fetcher.dispatch(word);
        let (ticket, result) = lookup.run().await;

        let mut list = SuggestionList::new(config.max_rendered);
        match fetcher.complete(&ticket, result) {
            FetchOutcome::Accepted(suggestions) => list.show(&suggestions),
            FetchOutcome::Stale => {}
            FetchOutcome::Failed(e) => bail!(e),
        }
        info!(query = word, count = list.entries().len(), "suggestions ready");

        match self.format {
            OutputFormat::Plain => {
                for entry in list.entries() {
                    writeln!(out, "{}", entry.value())?;
                }
            }
            OutputFormat::Html => {
                if list.is_visible() {
                    writeln!(out, "{}", list.to_html())?;
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    query: word,
                    suggestions: list.entries().iter().map(|e| e.value()).collect(),
                };
                writeln!(out, "{}", serde_json::to_string(&output)?)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use storefront_search::{SuggestError, SuggestResult};

    #[derive(Default)]
    struct RecordingProvider {
        payload: Option<Value>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CandidateProvider for RecordingProvider {
        async fn autocomplete(&self, query: &str) -> SuggestResult<Value> {
            self.queries.lock().unwrap().push(query.to_string());
            self.payload
                .clone()
                .ok_or_else(|| SuggestError::lookup("unavailable"))
        }
    }

    fn command(text: &[&str], format: OutputFormat) -> SuggestCommand {
        SuggestCommand {
            text: text.iter().map(|s| s.to_string()).collect(),
            format,
        }
    }

    async fn run_to_string(
        cmd: &SuggestCommand,
        provider: Arc<RecordingProvider>,
    ) -> Result<String> {
        let mut out = Vec::new();
        cmd.run(provider, &SuggestConfig::default(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_plain_output_queries_trailing_word() {
        let provider = Arc::new(RecordingProvider {
            payload: Some(json!(["cheese", "cheddar"])),
            ..Default::default()
        });
        let out = run_to_string(&command(&["milk", "and", "che"], OutputFormat::Plain), provider.clone())
            .await
            .unwrap();
        assert_eq!(out, "cheese\ncheddar\n");
        assert_eq!(*provider.queries.lock().unwrap(), vec!["che".to_string()]);
    }

    #[tokio::test]
    async fn test_html_output_is_escaped() {
        let provider = Arc::new(RecordingProvider {
            payload: Some(json!(["<b>"])),
            ..Default::default()
        });
        let out = run_to_string(&command(&["<b"], OutputFormat::Html), provider)
            .await
            .unwrap();
        assert!(out.contains("data-text=\"&lt;b&gt;\""));
        assert!(!out.contains("<b>"));
    }

    #[tokio::test]
    async fn test_json_output_is_capped() {
        let many: Vec<String> = (0..12).map(|i| format!("bread{i}")).collect();
        let provider = Arc::new(RecordingProvider {
            payload: Some(json!(many)),
            ..Default::default()
        });
        let out = run_to_string(&command(&["bre"], OutputFormat::Json), provider)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["query"], "bre");
        assert_eq!(parsed["suggestions"].as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_short_word_prints_nothing() {
        let provider = Arc::new(RecordingProvider::default());
        let out = run_to_string(&command(&["milk", "c"], OutputFormat::Json), provider.clone())
            .await
            .unwrap();
        assert_eq!(out, "");
        assert!(provider.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_an_error() {
        let provider = Arc::new(RecordingProvider::default());
        let result = run_to_string(&command(&["milk"], OutputFormat::Plain), provider).await;
        assert!(result.unwrap_err().to_string().contains("unavailable"));
    }
}
