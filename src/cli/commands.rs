use crate::augment::augment::SemanticAugmenter;
use crate::cli::config::AppConfig;
use crate::context::compute::compute_context;
use crate::dom::snapshot::{LoadedPage, PageSnapshot};
use crate::locator::locator_model::LocatorResult;
use crate::locator::synthesizer::locate_interactive;
use crate::selection::selection::SelectionHandler;
use crate::selection::selection_model::{
    LocatedElement, LocatorSource, SelectionMode, SelectionOutcome,
};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::RunHeader;

fn load_page(snapshot: &str, verbose: u8) -> Result<LoadedPage, Box<dyn std::error::Error>> {
    let page = PageSnapshot::load(snapshot)?.into_page()?;
    if verbose > 0 {
        eprintln!(
            "Loaded {} ({} elements)",
            page.url.as_deref().unwrap_or(snapshot),
            page.document.elements().len()
        );
    }
    Ok(page)
}

fn begin_trace(run: &str, snapshot: &str, page: &LoadedPage, tracer: &TraceLogger) {
    if tracer.is_enabled() {
        tracer.begin_run(&RunHeader::new(
            run,
            snapshot,
            &page.document.fingerprint(),
            page.document.elements().len(),
        ));
    }
}

// ============================================================================
// locate subcommand
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_locate(
    snapshot: &str,
    index: Option<usize>,
    interactive: bool,
    prefer_identifier: bool,
    format: &str,
    config: &AppConfig,
    tracer: &TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(snapshot, verbose)?;
    begin_trace("locate", snapshot, &page, tracer);

    if interactive {
        let located = locate_interactive(&page.document, &config.synthesis_options());
        if format == "json" {
            let rows: Vec<_> = located
                .iter()
                .map(|(id, locator)| {
                    serde_json::json!({
                        "tag": page.document.tag(*id).unwrap_or(""),
                        "locator": locator,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            for (id, locator) in &located {
                println!("{}\t{}", page.document.tag(*id).unwrap_or(""), locator);
            }
        }
        return Ok(());
    }

    let target = page.target(index)?;
    let handler = SelectionHandler::new(config.selection_options(prefer_identifier));
    let mode = SelectionMode {
        active: true,
        ai_enabled: false,
    };
    print_outcome(handler.handle(mode, target, &page.document, tracer), format)
}

// ============================================================================
// context subcommand
// ============================================================================

pub fn cmd_context(
    snapshot: &str,
    index: Option<usize>,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(snapshot, verbose)?;
    let target = page.target(index)?;
    let context = compute_context(target, &page.document);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

// ============================================================================
// suggest subcommand
// ============================================================================

pub fn cmd_suggest(
    snapshot: &str,
    index: Option<usize>,
    format: &str,
    config: &AppConfig,
    tracer: &TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let page = load_page(snapshot, verbose)?;
    begin_trace("suggest", snapshot, &page, tracer);
    let target = page.target(index)?;

    let backend = config.gemini_backend();
    let ai_enabled = backend.is_configured();
    if !ai_enabled && verbose > 0 {
        eprintln!("Text model not configured; using the synthesizer only");
    }

    let handler = SelectionHandler::new(config.selection_options(true))
        .with_augmenter(SemanticAugmenter::new(Box::new(backend)));
    let mode = SelectionMode {
        active: true,
        ai_enabled,
    };
    print_outcome(handler.handle(mode, target, &page.document, tracer), format)
}

// ============================================================================
// Output
// ============================================================================

fn print_outcome(outcome: SelectionOutcome, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        SelectionOutcome::Located(located) => {
            if let Some(e) = &located.augmentation_error {
                eprintln!("Warning: {}", e);
            }
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&located)?);
            } else {
                println!("{}", format_located(&located));
            }
            Ok(())
        }
        SelectionOutcome::OverlayClick => Err("selected element belongs to the locator overlay".into()),
        SelectionOutcome::Inactive => Err("selection mode is not active".into()),
    }
}

/// Plain-text rendering of a located element.
pub fn format_located(located: &LocatedElement) -> String {
    let summary = &located.summary;
    let mut lines = vec![format!("Element: {}", summary.tag)];
    if let Some(id) = &summary.id {
        lines.push(format!("ID: {}", id));
    }
    if !summary.text.is_empty() {
        lines.push(format!("Text: \"{}\"", summary.text));
    }

    let source = match located.source {
        LocatorSource::Synthesized => "",
        LocatorSource::Augmented => " (AI)",
    };
    match &located.result {
        LocatorResult::Identifier(id) => lines.push(format!("Identifier{}: {}", source, id)),
        LocatorResult::Locator(xpath) => lines.push(format!("XPath{}: {}", source, xpath)),
    }
    lines.join("\n")
}
