use crate::assemble::ReportAssembler;
use crate::config::Settings;
use crate::error::{ReportError, Result};
use crate::hierarchy::{IdGenerator, RandomIds};
use crate::model::MindMap;
use annomap_client::{Annotation, ApiClient, Reference};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything needed to fetch one reference and its notes
pub struct ReportOptions {
    pub reference_id: String,
    pub auth_token: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub show_progress: bool,
}

/// Values given on the command line, taking precedence over saved settings
#[derive(Debug, Clone, Default)]
pub struct ReportOverrides {
    pub reference_id: Option<String>,
    pub auth_token: Option<String>,
    pub base_url: Option<String>,
}

/// Callback for reporting fetch progress
pub type ReportProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ReportOptions {
    pub fn from_settings(settings: &Settings, overrides: ReportOverrides) -> Result<Self> {
        let auth_token = non_blank(overrides.auth_token)
            .or_else(|| non_blank(settings.auth_token.clone()))
            .ok_or_else(ReportError::missing_token)?;
        let reference_id = non_blank(overrides.reference_id)
            .or_else(|| non_blank(settings.reference_id.clone()))
            .ok_or_else(ReportError::missing_reference)?;

        Ok(Self {
            reference_id,
            auth_token,
            base_url: non_blank(overrides.base_url),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress: false,
        })
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// Fetches the reference metadata and its notes. Both requests must succeed.
pub async fn fetch_report_inputs(options: &ReportOptions) -> Result<(Reference, Vec<Annotation>)> {
    let mut client = ApiClient::with_timeout(options.auth_token.clone(), options.timeout_secs)?;
    if let Some(base_url) = &options.base_url {
        client = client.with_base_url(base_url)?;
    }

    Ok(client
        .fetch_reference_with_notes(&options.reference_id)
        .await?)
}

/// Builds a mind map from already fetched inputs.
pub fn build_report<I: IdGenerator>(
    reference: &Reference,
    notes: &[Annotation],
    ids: I,
) -> Result<MindMap> {
    Ok(ReportAssembler::new(ids).assemble(reference, notes)?)
}

/// Fetches and assembles the mind map for `options.reference_id`.
pub async fn execute_report(
    options: ReportOptions,
    progress_callback: Option<ReportProgressCallback>,
) -> Result<MindMap> {
    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Fetching reference {}...", options.reference_id));
        Some(pb)
    } else {
        None
    };

    let report = |msg: String| {
        if let Some(ref callback) = progress_callback {
            callback(msg);
        }
    };

    report(format!("Fetching reference {}", options.reference_id));
    let fetched = fetch_report_inputs(&options).await;

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let (reference, notes) = fetched?;
    info!(
        "Fetched reference {} with {} notes",
        options.reference_id,
        notes.len()
    );
    report(format!("Building mind map from {} notes", notes.len()));

    build_report(&reference, &notes, RandomIds)
}
