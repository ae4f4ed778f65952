//! The refresh orchestrator.
//!
//! One refresh:
//! ```text
//! Discover goals → Fetch counts → Compute progress → Render → Persist
//! ```
//! Refreshes never overlap. When discovery or the counter fetch fails, the
//! last good image (from this run, else the newest on disk) is served again
//! and marked stale.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use habitboard_core::{CounterRef, Goal, Period};
use habitboard_progress::ProgressEngine;
use habitboard_render::{Renderer, Size};
use habitboard_sources::{
    parse_count, CounterSource, CountsFile, GoalDiscovery, HomeAssistantSource, RawState, RegistryFile,
    SourceError,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, SourceKind};
use crate::error::{DashboardError, Result};
use crate::store::{ImageStore, RenderArtifact};

/// Result of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Image to serve
    pub artifact: RenderArtifact,
    /// Whether the image predates this refresh
    pub stale: bool,
}

/// Goals with fresh progress for one instant.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    /// Period containing the instant
    pub period: Period,
    /// Goals with their snapshots filled in
    pub goals: Vec<Goal>,
}

/// Coordinates discovery, counting, rendering and persistence.
pub struct Orchestrator {
    discovery: Arc<dyn GoalDiscovery>,
    source: Arc<dyn CounterSource>,
    engine: ProgressEngine,
    renderer: Renderer,
    store: ImageStore,
    size: Size,
    fetch_timeout: Duration,
    last_good: Mutex<Option<RenderArtifact>>,
}

impl Orchestrator {
    /// Create an orchestrator with default engine, layout and size.
    pub fn new(discovery: Arc<dyn GoalDiscovery>, source: Arc<dyn CounterSource>, store: ImageStore) -> Self {
        Self {
            discovery,
            source,
            engine: ProgressEngine::new(),
            renderer: Renderer::default(),
            store,
            size: Size::new(800, 480),
            fetch_timeout: Duration::from_secs(10),
            last_good: Mutex::new(None),
        }
    }

    /// Build everything from the application config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source_config = &config.source;
        let discovery: Arc<dyn GoalDiscovery> = Arc::new(RegistryFile::new(&source_config.registry_path));
        let source: Arc<dyn CounterSource> = match source_config.kind {
            SourceKind::HomeAssistant => {
                let url = source_config.url.clone().ok_or(DashboardError::MissingSetting("source.url"))?;
                let token = source_config
                    .token
                    .clone()
                    .ok_or(DashboardError::MissingSetting("source.token"))?;
                Arc::new(HomeAssistantSource::new(url, token, source_config.timeout()))
            }
            SourceKind::File => {
                let path = source_config
                    .counts_path
                    .as_ref()
                    .ok_or(DashboardError::MissingSetting("source.counts_path"))?;
                Arc::new(CountsFile::new(path))
            }
        };

        let store = ImageStore::new(&config.output.dir).with_retention(config.output.keep_images);
        Ok(Self::new(discovery, source, store)
            .with_engine(ProgressEngine::new().with_config(config.progress))
            .with_renderer(Renderer::new(config.layout.clone()))
            .with_size(config.output.size())
            .with_fetch_timeout(source_config.timeout()))
    }

    /// Set the progress engine.
    pub fn with_engine(mut self, engine: ProgressEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Set the renderer.
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Set the image size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the upper bound for discovery plus counter fetch.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// The image store.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    async fn fetch(&self) -> std::result::Result<(Vec<Goal>, HashMap<CounterRef, RawState>), SourceError> {
        let goals = self.discovery.discover_goals().await?;
        if goals.is_empty() {
            return Ok((goals, HashMap::new()));
        }
        let counters: Vec<CounterRef> = goals.iter().map(|g| g.counter.clone()).collect();
        let counts = self.source.fetch_counts(&counters).await?;
        Ok((goals, counts))
    }

    /// Discover goals, fetch their counts and compute progress at `now`.
    pub async fn progress(&self, now: NaiveDateTime) -> Result<ProgressReport> {
        let (mut goals, counts) = tokio::time::timeout(self.fetch_timeout, self.fetch())
            .await
            .map_err(|_| DashboardError::Timeout(self.fetch_timeout))??;

        let period = self.engine.period_at(now);
        for goal in &mut goals {
            let raw = counts.get(&goal.counter);
            if let Some(name) = raw.and_then(|r| r.friendly_name.as_deref()).filter(|n| !n.is_empty()) {
                goal.display_name = name.to_string();
            }

            let count = match raw.and_then(|r| r.value.as_deref()).and_then(parse_count) {
                Some(count) => count,
                None => {
                    warn!("No usable count for {}, using 0", goal.counter);
                    0
                }
            };

            self.engine.update(goal, &period, count, now);
            let p = &goal.progress;
            info!(
                "{}: {}/{:.1} (expected {:.2}, {}, {} days left)",
                goal.display_name, p.current_count, p.period_target, p.expected_by_now, p.status, p.days_remaining
            );
        }

        Ok(ProgressReport { period, goals })
    }

    /// Run one refresh for `now`.
    ///
    /// Upstream failures fall back to the last good image when there is one.
    /// Encoding and persistence failures are returned.
    pub async fn refresh(&self, now: NaiveDateTime) -> Result<RefreshOutcome> {
        let mut last_good = self.last_good.lock().await;
        info!("Refreshing dashboard");

        let report = match self.progress(now).await {
            Ok(report) => report,
            Err(e) => {
                // A fresh process has nothing in memory; fall back to disk.
                if last_good.is_none() {
                    *last_good = self.store.latest().await.unwrap_or_else(|list_err| {
                        warn!("Could not list stored images: {}", list_err);
                        None
                    });
                }
                return match last_good.as_ref() {
                    Some(artifact) => {
                        warn!("Refresh failed ({}), serving stale {}", e, artifact.file_name);
                        Ok(RefreshOutcome {
                            artifact: artifact.clone(),
                            stale: true,
                        })
                    }
                    None => Err(e),
                };
            }
        };

        let bitmap = self.renderer.render(&report.goals, &report.period, now, self.size);
        let png = bitmap.to_png()?;
        let artifact = self.store.save(&png, now).await?;
        info!("Saved dashboard to {}", artifact.path.display());

        *last_good = Some(artifact.clone());
        Ok(RefreshOutcome { artifact, stale: false })
    }

    /// Refresh every `every`, stopping after `max_refreshes` when given.
    ///
    /// Failures are logged and retried on the next tick.
    pub async fn watch(&self, every: Duration, max_refreshes: Option<usize>, clock: impl Fn() -> NaiveDateTime) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut refreshes = 0usize;

        loop {
            ticker.tick().await;
            match self.refresh(clock()).await {
                Ok(outcome) if outcome.stale => debug!("Serving stale {}", outcome.artifact.file_name),
                Ok(_) => {}
                Err(e) => error!("Refresh failed: {}", e),
            }

            refreshes += 1;
            if max_refreshes.is_some_and(|max| refreshes >= max) {
                break;
            }
        }
    }
}
