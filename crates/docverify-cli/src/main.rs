//! docverify - review AI-extracted document entities against the review service.

mod display;

use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use docverify_core::config::{DEFAULT_API_URL, DEFAULT_VERIFIER};
use docverify_core::geometry::DEFAULT_RENDER_SCALE;
use docverify_core::{AnnotationId, DocumentApprover, DocumentId, ReviewConfig, ServiceError};
use docverify_review::{AnnotationReview, ReviewPhase, ValidationReview};
use docverify_sync::ReviewClient;
use futures::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use display::Notes;

#[derive(Parser, Debug)]
#[command(name = "docverify", version, about, long_about = None)]
struct Cli {
    /// Base URL of the review service
    #[arg(long, env = "DOCVERIFY_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    /// Name recorded as the verifier
    #[arg(long, env = "DOCVERIFY_VERIFIED_BY", default_value = DEFAULT_VERIFIER, global = true)]
    verified_by: String,

    /// Scale from native page coordinates to render space
    #[arg(long, env = "DOCVERIFY_RENDER_SCALE", default_value_t = DEFAULT_RENDER_SCALE, global = true)]
    render_scale: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the annotation overlay and entity panel for one document page
    Review {
        document_id: DocumentId,

        /// Document file path as stored by the service, e.g. `uploads/coi.pdf`
        #[arg(long)]
        path: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Highlight an annotation
        #[arg(long)]
        select: Option<AnnotationId>,

        /// Verify these annotations (repeatable; requests run concurrently)
        #[arg(long = "verify")]
        verify: Vec<AnnotationId>,

        /// Approve the document once every entity is verified
        #[arg(long)]
        approve: bool,
    },
    /// Show the whole-document validation result
    Validation {
        document_id: DocumentId,

        /// Verify and approve the document
        #[arg(long)]
        submit: bool,

        /// Reviewer notes sent with --submit
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Approval sink for the terminal host: the approval is reported, not forwarded.
struct ConsoleApprover;

#[async_trait]
impl DocumentApprover for ConsoleApprover {
    async fn approve(&self, document_id: DocumentId) -> Result<(), ServiceError> {
        info!(document_id, "document approved");
        println!("Document {document_id} approved.");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ReviewConfig::new(&cli.api_url, &cli.verified_by, cli.render_scale)
        .context("invalid configuration")?;
    info!(api_url = %config.api_url, verified_by = %config.verified_by, "docverify v{}", env!("CARGO_PKG_VERSION"));

    let client = Arc::new(ReviewClient::from_config(&config));

    match cli.command {
        Command::Review {
            document_id,
            path,
            page,
            select,
            verify,
            approve,
        } => {
            cmd_review(
                &config,
                client,
                document_id,
                path.as_deref(),
                page,
                select,
                &verify,
                approve,
            )
            .await
        }
        Command::Validation {
            document_id,
            submit,
            notes,
        } => cmd_validation(&config, client, document_id, submit, notes).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_review(
    config: &ReviewConfig,
    client: Arc<ReviewClient>,
    document_id: DocumentId,
    path: Option<&str>,
    page: u32,
    select: Option<AnnotationId>,
    verify: &[AnnotationId],
    approve: bool,
) -> anyhow::Result<()> {
    let review = AnnotationReview::open(document_id, path, client).await;
    match review.phase() {
        ReviewPhase::Ready => {}
        ReviewPhase::InvalidInput(msg) => bail!("cannot open document {document_id}: {msg}"),
        ReviewPhase::Error(msg) => bail!("failed to load annotations: {msg}"),
        other => bail!("unexpected session state: {}", other.as_str()),
    }

    if let Some(url) = review.document_url(&config.api_url) {
        println!("Document: {url}");
        println!();
    }

    if !verify.is_empty() {
        let session = &review;
        let outcomes = join_all(
            verify
                .iter()
                .map(|&id| async move { (id, session.verify(id, &config.verified_by).await) }),
        )
        .await;
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => println!("Verified annotation {id}"),
                Err(e) if e.is_benign() => {}
                Err(e) if e.is_fatal() => return Err(e).context("session lost while verifying"),
                Err(e) => warn!(annotation_id = id, error = %e, "verification failed"),
            }
        }
        println!();
    }

    review.select(select);
    display::print_overlay(page, &review.overlay(page, config.render_scale));
    display::print_entity_panel(&review.cards(), review.progress(), &review.approval_action());

    if approve {
        review
            .approve(&ConsoleApprover)
            .await
            .context("cannot approve document")?;
    }

    review.close();
    Ok(())
}

async fn cmd_validation(
    config: &ReviewConfig,
    client: Arc<ReviewClient>,
    document_id: DocumentId,
    submit: bool,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let review = ValidationReview::load(document_id, client)
        .await
        .context("failed to load validation result")?;

    let result = review.result();
    display::print_validation(
        review.status_badge(),
        review.overall_percent(),
        &review.processing_time_secs(),
        &review.rows(),
        &Notes {
            issues: &result.issues,
            warnings: &result.warnings,
            recommendations: &result.recommendations,
        },
    );

    if submit {
        if let Some(notes) = notes {
            review.set_notes(notes);
        }
        review
            .submit_verification(&config.verified_by)
            .await
            .context("verification was not recorded")?;
        println!("Document {document_id} verified and approved.");
    } else {
        review.close();
    }
    Ok(())
}
