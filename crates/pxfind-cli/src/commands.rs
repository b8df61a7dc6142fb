//! `index` and `search` command implementations.

use pxfind_core::date::to_px_date;
use pxfind_core::{Error, Result};
use pxfind_fts::{IndexBuilder, IndexStats, SearchConfig, SearchOutcome, SearchStatus, Searcher};

use crate::cli::{IndexArgs, OutputFormat, SearchArgs};
use crate::config::{resolve_catalogue_path, resolve_index_path};

/// Build or refresh the index from the catalogue.
pub async fn cmd_index(config: &SearchConfig, args: &IndexArgs) -> Result<IndexStats> {
    let catalogue_path = resolve_catalogue_path(args.catalogue.as_deref(), config)?;
    let index_path = resolve_index_path(args.index.as_deref(), config)?;

    let mut builder = IndexBuilder::new(config);
    if let Some(size) = args.batch_size {
        builder = builder.with_batch_size(size);
    }
    if args.force {
        builder = builder.force_rebuild();
    }

    builder.build(&catalogue_path, &index_path).await
}

/// Run a query against the index.
pub fn cmd_search(config: &SearchConfig, args: &SearchArgs) -> Result<SearchOutcome> {
    let index_path = resolve_index_path(args.index.as_deref(), config)?;

    let mut searcher = Searcher::open(&index_path, config)?;
    if let Some(operator) = args.operator {
        searcher.set_default_operator(operator);
    }

    let limit = args.limit.unwrap_or(config.default_limit);
    searcher.search(&args.query, args.fields.as_deref(), limit)
}

/// Render index statistics for the terminal.
pub fn format_stats(stats: &IndexStats) -> String {
    if stats.skipped_fresh {
        return format!(
            "Index is up to date ({} tables)\n",
            stats.documents_indexed
        );
    }
    format!(
        "Indexed {} tables from {} files ({} incomplete, {} errors)\n",
        stats.documents_indexed, stats.files_processed, stats.documents_skipped, stats.errors
    )
}

/// Render a search outcome in the requested format.
pub fn format_outcome(outcome: &SearchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(outcome)
            .map(|s| s + "\n")
            .map_err(|e| Error::operation(format!("Failed to serialize results: {e}"))),
        OutputFormat::Text => {
            if outcome.status == SearchStatus::NotIndexed {
                return Ok("Index not found\n".to_string());
            }
            if outcome.items.is_empty() {
                return Ok("No matches\n".to_string());
            }

            let mut out = String::new();
            for item in &outcome.items {
                let published = item
                    .published
                    .as_ref()
                    .map(to_px_date)
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!(
                    "{:>8.3}  {}/{}  {}  [{}]\n",
                    item.score, item.path, item.table, item.title, published
                ));
            }
            Ok(out)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
