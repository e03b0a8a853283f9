use super::ui;
use crate::core::config::SearchConfig;
use crate::core::debounce::Debouncer;
use crate::core::history::RecentSearches;
use crate::core::{Catalog, CategoryFilter, SearchableEntry, search};
use anyhow::Result;
use comfy_table::Cell;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Parses a `--category` argument. `all` is accepted in any letter case here;
/// other categories must match exactly.
pub fn parse_category(arg: &str) -> CategoryFilter {
    let arg = arg.trim();
    if arg.eq_ignore_ascii_case("all") {
        CategoryFilter::All
    } else {
        CategoryFilter::from(arg)
    }
}

/// Last line handed to the debouncer. A query the debouncer already emitted
/// can still be waiting in the channel when a newer line arrives; such stale
/// queries are skipped.
#[derive(Debug, Default)]
struct LatestQuery(Option<String>);

impl LatestQuery {
    fn set(&mut self, line: &str) {
        self.0 = Some(line.to_string());
    }

    fn is_current(&self, query: &str) -> bool {
        self.0.as_deref() == Some(query)
    }
}

pub fn run(catalog: &Catalog, query: &str, category: &CategoryFilter, json: bool) -> Result<()> {
    let results = search(query, category, catalog.entries());
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", display_results(query, category, &results));
    }
    Ok(())
}

pub fn display_results(
    query: &str,
    category: &CategoryFilter,
    results: &[SearchableEntry],
) -> String {
    if results.is_empty() {
        return ui::style_text(
            &format!("No results for '{}' in {category}", query.trim()),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Title"),
        ui::header_cell("Category"),
        ui::header_cell("Go to"),
        ui::header_cell("Score"),
    ]);
    for result in results {
        table.add_row(vec![
            Cell::new(format!(
                "{}\n{}",
                result.title,
                ui::style_text(&result.description, ui::StyleType::Subtle)
            )),
            Cell::new(&result.category),
            Cell::new(&result.url),
            ui::number_cell(result.relevance.to_string()),
        ]);
    }

    format!(
        "{} {}\n{table}",
        ui::style_text("Results for", ui::StyleType::TotalLabel),
        ui::style_text(&format!("'{}'", query.trim()), ui::StyleType::Title)
    )
}

fn display_recent(history: &RecentSearches) -> String {
    if history.is_empty() {
        return ui::style_text("No recent searches", ui::StyleType::Subtle);
    }
    let mut output = ui::style_text("Recent searches", ui::StyleType::TotalLabel);
    for (i, query) in history.iter().enumerate() {
        output.push_str(&format!("\n  {}. {query}", i + 1));
    }
    output
}

/// Interactive search-as-you-type over lines of `input`.
///
/// Each line replaces the pending query; a query is only searched after the
/// configured quiet period, so a burst of lines runs one search for the last
/// of them. Lines starting with `:` are commands and run immediately:
/// `:recent`, `:clear` and `:q`. Returns the history built up in the session.
pub async fn browse<R>(
    input: R,
    catalog: &Catalog,
    category: &CategoryFilter,
    config: &SearchConfig,
) -> Result<RecentSearches>
where
    R: AsyncBufRead + Unpin,
{
    info!(debounce_ms = config.debounce_ms, "Starting interactive search");
    println!(
        "{}",
        ui::style_text(
            "Type to search. Commands: :recent, :clear, :q",
            ui::StyleType::Subtle
        )
    );

    let (debouncer, mut queries) = Debouncer::new(config.debounce());
    let mut debouncer = Some(debouncer);
    let mut history = RecentSearches::new(config.history_limit);
    let mut latest = LatestQuery::default();
    let mut lines = input.lines();

    loop {
        tokio::select! {
            line = lines.next_line(), if debouncer.is_some() => {
                let Some(line) = line? else {
                    debug!("Input closed, flushing pending query");
                    debouncer = None;
                    continue;
                };
                match line.trim() {
                    ":q" | ":quit" => break,
                    ":recent" => println!("{}", display_recent(&history)),
                    ":clear" => {
                        history.clear();
                        println!(
                            "{}",
                            ui::style_text("Cleared recent searches", ui::StyleType::Subtle)
                        );
                    }
                    _ => {
                        if let Some(debouncer) = debouncer.as_mut() {
                            latest.set(&line);
                            debouncer.push(line);
                        }
                    }
                }
            }
            query = queries.recv() => {
                let Some(query) = query else { break };
                if !latest.is_current(&query) {
                    debug!(%query, "Skipping superseded query");
                    continue;
                }
                if query.trim().is_empty() {
                    continue;
                }
                let results = search(&query, category, catalog.entries());
                println!("{}", display_results(&query, category, &results));
                history.record(&query);
            }
        }
    }

    Ok(history)
}
