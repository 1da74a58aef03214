//! Background execution of the summary pipeline.
//!
//! A [`SummaryWorker`] owns one tokio task that receives [`SummaryRequest`]s
//! over a channel and answers each with exactly one [`SummaryReply`]. The
//! pipeline itself runs on a blocking thread so a large file never stalls the
//! async runtime, and any error or panic inside it comes back as a failure
//! reply.

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info};

use crate::parser::parse_records;
use crate::record::RawObservation;
use crate::summary::aggregate::aggregate_rows;
use crate::summary::labels::LabelMapping;
use crate::summary::rank::rank_all;
use crate::summary::reshape::reshape;
use crate::summary::types::SiteIndex;

const INBOX_CAPACITY: usize = 16;

/// Observation rows handed to the worker, either already parsed or as the
/// raw CSV bytes to parse inside the task.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Records(Vec<RawObservation>),
    Csv(Vec<u8>),
}

/// One unit of work.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub body: RequestBody,
    pub label_mapping: LabelMapping,
}

impl SummaryRequest {
    pub fn from_records(records: Vec<RawObservation>, label_mapping: LabelMapping) -> Self {
        Self {
            body: RequestBody::Records(records),
            label_mapping,
        }
    }

    pub fn from_csv(bytes: Vec<u8>, label_mapping: LabelMapping) -> Self {
        Self {
            body: RequestBody::Csv(bytes),
            label_mapping,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// The single reply produced for a request.
///
/// `min_year`/`max_year` are `None` when no numeric year was seen and both
/// `Some(0)` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReply {
    pub status: Status,
    pub min_year: Option<i64>,
    pub max_year: Option<i64>,
    pub sites: SiteIndex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryReply {
    pub fn success(min_year: Option<i64>, max_year: Option<i64>, sites: SiteIndex) -> Self {
        Self {
            status: Status::Success,
            min_year,
            max_year,
            sites,
            error: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Failure,
            min_year: Some(0),
            max_year: Some(0),
            sites: SiteIndex::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

/// Smallest and largest year key that parses as an integer.
pub fn year_bounds<'a>(years: impl IntoIterator<Item = &'a str>) -> (Option<i64>, Option<i64>) {
    let numeric = years.into_iter().filter_map(|y| y.trim().parse::<i64>().ok());
    numeric.fold((None, None), |(min, max), y| {
        (
            Some(min.map_or(y, |m: i64| m.min(y))),
            Some(max.map_or(y, |m: i64| m.max(y))),
        )
    })
}

/// Runs aggregate, rank and reshape synchronously on the calling thread.
#[tracing::instrument(skip_all, fields(labels = request.label_mapping.len()))]
pub fn summarize(request: SummaryRequest) -> Result<SummaryReply> {
    let rows = match request.body {
        RequestBody::Records(rows) => rows,
        RequestBody::Csv(bytes) => parse_records(&bytes)?,
    };

    let mut aggregation = aggregate_rows(rows, &request.label_mapping);
    let (min_year, max_year) = year_bounds(aggregation.years.keys().map(String::as_str));

    rank_all(&mut aggregation.years);
    let sites = reshape(aggregation.years);

    info!(
        sites = sites.len(),
        skipped = aggregation.skipped,
        min_year,
        max_year,
        "Summary built"
    );
    Ok(SummaryReply::success(min_year, max_year, sites))
}

/// Runs `job` on the blocking pool and folds every way it can go wrong into
/// a failure reply.
async fn run_blocking<F>(job: F) -> SummaryReply
where
    F: FnOnce() -> Result<SummaryReply> + Send + 'static,
{
    let parent_span = tracing::Span::current();
    let outcome = tokio::task::spawn_blocking(move || {
        let _guard = parent_span.enter();
        job()
    })
    .await;

    match outcome {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            error!(error = %e, "Summary job failed");
            SummaryReply::failure(format!("{e:#}"))
        }
        Err(e) => {
            error!(error = %e, "Summary job panicked");
            SummaryReply::failure("summary job panicked")
        }
    }
}

struct Job {
    request: SummaryRequest,
    reply: oneshot::Sender<SummaryReply>,
}

/// Handle to a running background summary task.
///
/// Must be started from within a tokio runtime. Requests are processed one
/// at a time in arrival order; separate workers share nothing.
pub struct SummaryWorker {
    inbox: mpsc::Sender<Job>,
    handle: JoinHandle<()>,
}

impl SummaryWorker {
    pub fn start() -> Self {
        let (inbox, mut jobs) = mpsc::channel::<Job>(INBOX_CAPACITY);

        let handle = tokio::spawn(
            async move {
                debug!("Summary worker started");
                while let Some(job) = jobs.recv().await {
                    let request = job.request;
                    let reply = run_blocking(move || summarize(request)).await;
                    if job.reply.send(reply).is_err() {
                        debug!("Caller went away before the reply was sent");
                    }
                }
                debug!("Summary worker stopped");
            }
            .instrument(tracing::info_span!("summary_worker")),
        );

        Self { inbox, handle }
    }

    /// Sends one request and waits for its reply.
    ///
    /// Always resolves to a reply; a worker that has stopped yields a
    /// failure.
    pub async fn submit(&self, request: SummaryRequest) -> SummaryReply {
        let (reply, answer) = oneshot::channel();

        if self.inbox.send(Job { request, reply }).await.is_err() {
            return SummaryReply::failure("summary worker is not running");
        }

        answer
            .await
            .unwrap_or_else(|_| SummaryReply::failure("summary worker dropped the request"))
    }

    /// Closes the inbox and waits for queued requests to drain.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.inbox);
        self.handle.await?;
        Ok(())
    }
}

/// Starts a worker for a single request and stops it afterwards.
pub async fn run_once(request: SummaryRequest) -> SummaryReply {
    let worker = SummaryWorker::start();
    let reply = worker.submit(request).await;
    if let Err(e) = worker.shutdown().await {
        error!(error = %e, "Summary worker did not shut down cleanly");
    }
    reply
}
