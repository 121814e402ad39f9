//! Fixed-period publish-due scanner.
//!
//! Each pass captures wall-clock time once, judges every cached post
//! against that single instant, and publishes due posts sequentially in
//! list order. Passes are serialized by an in-progress guard: a tick that
//! fires while the previous pass is still in flight is skipped, so a post
//! can never be published twice by overlapping passes.
//!
//! Events are delivered via a `tokio::sync::mpsc` channel so the daemon
//! loop can react (log, surface the auth URL).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::backend::{PostPublisher, PostStore};
use crate::models::post::PostStatus;
use crate::scheduler::cache::ScheduleCache;
use crate::scheduler::reconciler::Reconciler;
use crate::session::Session;
use crate::AppError;

/// Events emitted by the scanner for daemon-loop handling.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// No LinkedIn access token was available; the pass was aborted before
    /// evaluating any post. The operator must visit `auth_url` and deliver
    /// the returned token via `postpilot auth`.
    AuthRequired {
        /// Browser redirect target for obtaining an access token.
        auth_url: String,
    },
    /// A due post was delivered and marked `published`.
    Published {
        /// Post that was delivered.
        post_id: String,
    },
    /// A due post failed to publish; remaining posts were still attempted.
    PublishFailed {
        /// Post that failed.
        post_id: String,
        /// Rendered failure cause.
        reason: String,
    },
    /// A post was skipped because its date or time would not parse.
    Skipped {
        /// Post that was skipped.
        post_id: String,
        /// Rendered parse failure.
        reason: String,
    },
}

/// Summary of a single scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass ran to completion.
    Completed {
        /// Posts judged due at the captured instant.
        due: usize,
        /// Due posts delivered and transitioned.
        published: usize,
        /// Due posts whose publish or transition failed.
        failed: usize,
    },
    /// Aborted before evaluating any post: no LinkedIn token.
    AuthAborted,
    /// Skipped: the previous pass was still in flight.
    Overlapped,
}

/// Publish-due scanner over the schedule cache.
pub struct Scanner {
    store: Arc<dyn PostStore>,
    publisher: Arc<dyn PostPublisher>,
    cache: Arc<ScheduleCache>,
    reconciler: Reconciler,
    session: Session,
    auth_url: String,
    event_tx: mpsc::Sender<ScanEvent>,
    in_progress: AtomicBool,
}

impl Scanner {
    /// Wire a scanner to its collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn PostStore>,
        publisher: Arc<dyn PostPublisher>,
        cache: Arc<ScheduleCache>,
        session: Session,
        auth_url: String,
        event_tx: mpsc::Sender<ScanEvent>,
    ) -> Self {
        let reconciler = Reconciler::new(Arc::clone(&store), Arc::clone(&cache));
        Self {
            store,
            publisher,
            cache,
            reconciler,
            session,
            auth_url,
            event_tx,
            in_progress: AtomicBool::new(false),
        }
    }

    /// Spawn the recurring scan task; cancelled via the token on shutdown.
    ///
    /// The cache is synced once up front so the first tick judges a fresh
    /// list.
    #[must_use]
    pub fn spawn(self: Arc<Self>, period: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.cache.reload(self.store.as_ref()).await;
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        info!("scanner shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let outcome = self.run_pass().await;
                        debug!(?outcome, "scan pass finished");
                    }
                }
            }
        })
    }

    /// Run one pass against the current wall-clock time.
    pub async fn run_pass(&self) -> PassOutcome {
        self.pass_at(Local::now().naive_local()).await
    }

    /// Run one pass judging every post against the given instant.
    ///
    /// Exposed separately so tests can pin the clock.
    pub async fn pass_at(&self, now: NaiveDateTime) -> PassOutcome {
        if self.in_progress.swap(true, Ordering::SeqCst) {
            warn!("scan tick overlapped an in-flight pass; skipping");
            return PassOutcome::Overlapped;
        }
        let outcome = self.scan(now).await;
        self.in_progress.store(false, Ordering::SeqCst);
        outcome
    }

    async fn scan(&self, now: NaiveDateTime) -> PassOutcome {
        // Without a token no post can be published, so the whole pass
        // aborts rather than failing post by post.
        if !self.session.has_linkedin_token().await {
            warn!("no linkedin token; aborting pass");
            let _ = self
                .event_tx
                .send(ScanEvent::AuthRequired {
                    auth_url: self.auth_url.clone(),
                })
                .await;
            return PassOutcome::AuthAborted;
        }

        self.cache.reload(self.store.as_ref()).await;

        let posts = self.cache.snapshot().await;
        let mut due = 0usize;
        let mut published = 0usize;
        let mut failed = 0usize;

        for post in &posts {
            if post.status != PostStatus::Planned {
                continue;
            }
            let moment = match post.publish_moment() {
                Ok(moment) => moment,
                Err(err) => {
                    warn!(post_id = post.id, %err, "unparseable schedule; skipping post");
                    let _ = self
                        .event_tx
                        .send(ScanEvent::Skipped {
                            post_id: post.id.clone(),
                            reason: err.to_string(),
                        })
                        .await;
                    continue;
                }
            };
            if now < moment {
                continue;
            }

            due += 1;
            match self.publish_one(post).await {
                Ok(()) => {
                    published += 1;
                    let _ = self
                        .event_tx
                        .send(ScanEvent::Published {
                            post_id: post.id.clone(),
                        })
                        .await;
                }
                Err(err) => {
                    failed += 1;
                    warn!(post_id = post.id, %err, "publish failed");
                    if matches!(err, AppError::Auth(_)) {
                        // Rejected token: fail this post per contract, and
                        // drop the token so the next pass aborts up front.
                        self.session.clear_linkedin_token().await;
                    }
                    let _ = self
                        .event_tx
                        .send(ScanEvent::PublishFailed {
                            post_id: post.id.clone(),
                            reason: err.to_string(),
                        })
                        .await;
                }
            }
        }

        if due > 0 {
            info!(due, published, failed, "scan pass published due posts");
        }
        PassOutcome::Completed {
            due,
            published,
            failed,
        }
    }

    /// Deliver one post, then transition it to `published`.
    ///
    /// No transaction spans the two calls: a crash between them leaves the
    /// post `planned` and the next pass retries it. The backend owns any
    /// dedup story.
    async fn publish_one(&self, post: &crate::models::post::ScheduledPost) -> crate::Result<()> {
        self.publisher.publish(post).await?;
        self.reconciler
            .set_status(&post.id, PostStatus::Published)
            .await
    }
}
