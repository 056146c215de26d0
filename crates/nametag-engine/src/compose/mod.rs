//! Batch composition: from a request to a finished PDF
//!
//! This module drives the whole run:
//! 1. Validate the request and plan the shared grid
//! 2. Queue roster entries followed by blank fillers
//! 3. Rasterize each batch in parallel, then place results in entry order
//! 4. Report progress per badge and check for cancellation per batch
//! 5. Finalize the document

mod listener;
mod queue;

pub use listener::{BatchListener, CancelToken, ProgressFn};
pub use queue::{QueuedEntry, build_entry_queue, reference_template};

use crate::assemble::DocumentAssembler;
use crate::constants::BATCH_SIZE;
use crate::layout::{BadgePlacement, LayoutPlan, place_entry, plan_layout};
use crate::options::GenerationRequest;
use crate::render::{
    FontBook, RenderContext, RenderedNametag, raster_size, render_nametag, render_template_only,
};
use crate::role::{RoleContext, resolve_header_color, resolve_template};
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;

/// Raster size used when a badge's own size cannot be rasterized
const FALLBACK_RASTER: (u32, u32) = (800, 480);

/// Outcome of one run
#[derive(Clone, PartialEq)]
pub struct GenerationReport {
    pub pdf_bytes: Vec<u8>,
    pub page_count: usize,
    /// Roster entries rendered
    pub entry_count: usize,
    /// Blank fillers rendered
    pub blank_count: usize,
    /// Badges that fell back to a template-only rendering
    pub degraded_entries: usize,
    pub per_page: usize,
}

impl std::fmt::Debug for GenerationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationReport")
            .field("pdf_bytes", &format_args!("<{} bytes>", self.pdf_bytes.len()))
            .field("page_count", &self.page_count)
            .field("entry_count", &self.entry_count)
            .field("blank_count", &self.blank_count)
            .field("degraded_entries", &self.degraded_entries)
            .field("per_page", &self.per_page)
            .finish()
    }
}

/// A badge ready for placement
struct EncodedBadge {
    placement: BadgePlacement,
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
    degraded: bool,
}

/// Generate the document on a blocking thread.
pub async fn generate<L>(
    request: GenerationRequest,
    fonts: FontBook,
    listener: L,
    cancel: CancelToken,
) -> Result<GenerationReport>
where
    L: BatchListener + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut listener = listener;
        compose_document(&request, &fonts, &mut listener, &cancel)
    })
    .await?
}

/// Generate the document and write it to `path`.
pub async fn generate_pdf<L>(
    request: GenerationRequest,
    fonts: FontBook,
    listener: L,
    cancel: CancelToken,
    path: impl AsRef<Path>,
) -> Result<GenerationReport>
where
    L: BatchListener + Send + 'static,
{
    let report = generate(request, fonts, listener, cancel).await?;
    tokio::fs::write(path, &report.pdf_bytes).await?;
    Ok(report)
}

/// Run the whole pipeline synchronously.
pub fn compose_document(
    request: &GenerationRequest,
    fonts: &FontBook,
    listener: &mut dyn BatchListener,
    cancel: &CancelToken,
) -> Result<GenerationReport> {
    request.validate()?;

    let roles = RoleContext::from_request(request).ok_or(NametagError::NoTemplate)?;
    let reference = reference_template(request).ok_or(NametagError::NoTemplate)?;
    let export = request.export();
    let plan = plan_layout(export, reference.aspect_ratio())?;

    let queue = build_entry_queue(request);
    let total = queue.len();
    let blank_count = queue.iter().filter(|q| q.is_blank).count();

    log::info!(
        "Generating {} badges ({} blank) on {} {} pages, {} per page",
        total,
        blank_count,
        plan.page_count(total),
        export.paper.name(),
        plan.per_page()
    );
    if fonts.is_empty() {
        log::warn!("No fonts registered; badge text will not be drawn");
    }

    let render_ctx = RenderContext {
        text_fields: &request.settings.text_fields,
        legacy_text: &request.settings.legacy_text,
        design: &request.settings.default_template,
        fonts,
    };

    let (page_width_mm, page_height_mm) = export.paper.dimensions_mm();
    let mut assembler = DocumentAssembler::new(page_width_mm, page_height_mm)
        .with_crop_marks(export.crop_marks)
        .with_watermark(export.watermark.clone());
    assembler.ensure_pages(plan.page_count(total));

    let mut completed = 0;
    let mut degraded_entries = 0;

    for (batch_index, batch) in queue.chunks(BATCH_SIZE).enumerate() {
        if cancel.is_cancelled() {
            log::info!("Generation cancelled after {} of {} badges", completed, total);
            return Err(NametagError::Cancelled { completed });
        }

        let start = batch_index * BATCH_SIZE;
        let badges: Vec<Result<EncodedBadge>> = batch
            .par_iter()
            .enumerate()
            .map(|(offset, queued)| render_badge(start + offset, queued, &plan, &roles, &render_ctx))
            .collect();

        for badge in badges {
            let badge = badge?;
            if badge.degraded {
                degraded_entries += 1;
            }
            assembler.place_jpeg(
                badge.placement.slot.page_index,
                badge.jpeg,
                badge.width,
                badge.height,
                &badge.placement.rect,
            )?;
            completed += 1;
            listener.on_progress(completed, total);
        }

        log::debug!("Batch {} complete: {}/{} badges", batch_index + 1, completed, total);
        listener.on_batch_complete(completed, total);
    }

    let page_count = assembler.page_count();
    let pdf_bytes = assembler.finish_bytes()?;

    if degraded_entries > 0 {
        log::warn!("{} badges were rendered without text", degraded_entries);
    }
    log::info!("Generated {} pages ({} bytes)", page_count, pdf_bytes.len());

    Ok(GenerationReport {
        pdf_bytes,
        page_count,
        entry_count: total - blank_count,
        blank_count,
        degraded_entries,
        per_page: plan.per_page(),
    })
}

/// Resolve, rasterize and encode one badge.
///
/// Render failures are recovered here; only encoding failures escape.
fn render_badge(
    index: usize,
    queued: &QueuedEntry<'_>,
    plan: &LayoutPlan,
    roles: &RoleContext<'_>,
    ctx: &RenderContext<'_>,
) -> Result<EncodedBadge> {
    let entry = queued.entry.as_ref();
    let template = resolve_template(entry, roles);
    let header_color = resolve_header_color(entry, template, roles);
    let placement = place_entry(plan, index, template.aspect_ratio());
    let badge_size = (placement.rect.width, placement.rect.height);

    let attempt = if queued.is_blank {
        render_template_only(template, header_color, badge_size, ctx)
    } else {
        render_nametag(entry, template, header_color, badge_size, ctx)
    };

    let (rendered, degraded) = match attempt {
        Ok(rendered) => (rendered, false),
        Err(e) => {
            log::warn!(
                "Badge {} ('{}') failed to render with template '{}': {}",
                index + 1,
                entry.id,
                template.id,
                e
            );
            let fallback = render_template_only(template, header_color, badge_size, ctx)
                .unwrap_or_else(|_| {
                    let (w, h) = raster_size(badge_size.0, badge_size.1).unwrap_or(FALLBACK_RASTER);
                    RenderedNametag::placeholder(w, h)
                });
            (fallback, true)
        }
    };

    let jpeg = rendered.encode_jpeg().map_err(|e| {
        NametagError::Assembly(format!("Badge {} could not be encoded: {}", index + 1, e))
    })?;

    Ok(EncodedBadge {
        placement,
        jpeg,
        width: rendered.width(),
        height: rendered.height(),
        degraded,
    })
}
