use crate::core::collector::ResultCollector;
use crate::core::correlation::{correlate, Completion, NameIndex, ResponseSummary};
use crate::core::sequence::{ProbeRequest, RequestSequence};
use crate::domain::model::{InstitutionRecord, ProbeOutcome};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Response};
use std::fmt::Write;

pub const PROGRESS_BAR_WIDTH: usize = 20;

/// Dispatches probe requests with bounded concurrency and collects the
/// outcomes in completion order.
pub struct ProbeEngine {
    client: Client,
    endpoint: String,
    concurrency: usize,
    show_progress: bool,
}

impl ProbeEngine {
    pub fn new(client: Client, endpoint: impl Into<String>, concurrency: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            concurrency: concurrency.max(1),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Number of completions a run over `record_count` records will consume.
    pub fn planned_total(record_count: usize, limit: Option<usize>) -> usize {
        match limit {
            Some(limit) => limit.min(record_count),
            None => record_count,
        }
    }

    pub async fn run(
        &self,
        records: &[InstitutionRecord],
        limit: Option<usize>,
    ) -> Result<ResultCollector> {
        let sequence = RequestSequence::new(records);
        let names = NameIndex::new(records);
        let total = Self::planned_total(sequence.len(), limit);
        let mut results = ResultCollector::new();

        if total == 0 {
            tracing::info!("Nothing to probe");
            return Ok(results);
        }

        tracing::info!(
            "Probing {} of {} institutions at {} ({} in flight)",
            total,
            sequence.len(),
            self.endpoint,
            self.concurrency
        );

        let progress = self.progress_bar(total)?;
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let mut completions = stream::iter(sequence.iter())
            .map(move |request| dispatch(client.clone(), endpoint.clone(), request))
            .buffer_unordered(self.concurrency);

        let mut completed = 0usize;
        while let Some(completion) = completions.next().await {
            completed += 1;
            // logging while the bar is drawn would tear the line
            let outcome = progress.suspend(|| {
                let outcome = correlate(&names, completion);
                tracing::debug!("{}/{} {}", completed, total, status_line(&outcome));
                outcome
            });
            progress.set_message(status_line(&outcome));
            progress.set_position(completed as u64);
            results.push(outcome);

            if completed >= total {
                // Dropping the stream abandons anything still in flight.
                break;
            }
        }

        progress.finish();
        tracing::info!("Completed {} probes", results.len());
        Ok(results)
    }

    fn progress_bar(&self, total: usize) -> Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        Ok(ProgressBar::new(total as u64).with_style(progress_style()?))
    }
}

/// `Completed i/total [bar] pct%  status`, with the bar filled to
/// `i * width / total` cells and the percentage truncated, not rounded.
fn progress_style() -> Result<ProgressStyle> {
    let template = format!(
        "Completed {{pos:>4}}/{{len:<4}} [{{bar:{}}}] {{pct}}%  {{msg}}",
        PROGRESS_BAR_WIDTH
    );
    let style = ProgressStyle::default_bar()
        .template(&template)?
        .with_key("pct", |state: &ProgressState, w: &mut dyn Write| {
            let len = state.len().filter(|&len| len > 0).unwrap_or(1);
            let _ = write!(w, "{}", state.pos() * 100 / len);
        })
        .progress_chars("= ");
    Ok(style)
}

async fn dispatch(client: Client, endpoint: String, request: ProbeRequest) -> Completion {
    let http_request = match client.post(&endpoint).form(request.fields()).build() {
        Ok(http_request) => http_request,
        Err(e) => {
            return Completion {
                submitted_body: Some(request.encode().into_bytes()),
                response: Err(e),
            }
        }
    };

    // Correlation reads the identifier back from exactly what goes on the wire.
    let submitted_body = http_request
        .body()
        .and_then(|body| body.as_bytes())
        .map(<[u8]>::to_vec);

    let response = client
        .execute(http_request)
        .await
        .map(|response| summarize(&response));

    Completion {
        submitted_body,
        response,
    }
}

/// Status and declared size only; the body is never read.
fn summarize(response: &Response) -> ResponseSummary {
    let content_length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|len| len.to_str().ok())
        .and_then(|len| len.parse::<u64>().ok())
        .or_else(|| response.content_length());

    ResponseSummary {
        status_code: response.status().as_u16(),
        content_length,
    }
}

fn status_line(outcome: &ProbeOutcome) -> String {
    let display = |value: Option<String>| value.unwrap_or_else(|| "None".to_string());
    format!(
        "{} ({}): Response<{}> content-length:{}",
        display(outcome.name.clone()),
        display(outcome.identifier.map(|id| id.to_string())),
        display(outcome.status_code.map(|code| code.to_string())),
        display(outcome.content_length.map(|len| len.to_string())),
    )
}
