use std::future::Future;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::clipboard::copy_to_clipboard;
use crate::config::{GlobalArgs, Settings};
use crate::logging::{LogTarget, init_logging};
use crate::models::{Category, PromptDetail, PromptSummary, SearchResult};
use crate::provider::{DataProvider, MIN_QUERY_LEN, searchable_query};
use crate::tui::run_interactive;
use crate::utils::{single_line, strip_ansi_codes};

#[derive(Parser)]
#[command(name = "prompt-catalog")]
#[command(version)]
#[command(about = "Browse, search and copy prompt templates from a catalog", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive browser (default)
    Browse,
    /// List categories
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// List the prompts in a category
    List {
        category_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Show a prompt's full detail
    Show {
        prompt_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Search prompt titles, descriptions and tags across all categories
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Copy a prompt's content to the clipboard
    Copy { prompt_id: String },
    /// Show statistics about the catalog
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli.global)?;
    let command = cli.command.unwrap_or(Commands::Browse);

    let target = match (&command, &settings.log_file) {
        (Commands::Browse, Some(path)) => LogTarget::File(path.clone()),
        (Commands::Browse, None) => LogTarget::Off,
        _ => LogTarget::Stderr,
    };
    if let Err(e) = init_logging(&target, settings.verbose) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    let mut out = io::stdout().lock();
    let open = || settings.open_provider();

    match command {
        Commands::Browse => run_interactive(&settings),
        Commands::Categories { json } => {
            let categories = block_on(open()?.list_categories())??;
            print_categories(&mut out, &categories, json)
        }
        Commands::List { category_id, json } => {
            let prompts = block_on(open()?.list_prompts_by_category(&category_id))??;
            print_prompts(&mut out, &prompts, json)
        }
        Commands::Show { prompt_id, json } => {
            let detail = block_on(open()?.get_prompt_detail(&prompt_id))??;
            print_detail(&mut out, &detail, json)
        }
        Commands::Search { query, json } => {
            if searchable_query(&query).is_none() && !json {
                eprintln!("Queries shorter than {} characters match nothing", MIN_QUERY_LEN);
            }
            let results = block_on(open()?.search(&query))??;
            print_search_results(&mut out, &results, json)
        }
        Commands::Copy { prompt_id } => {
            let detail = block_on(open()?.get_prompt_detail(&prompt_id))??;
            copy_to_clipboard(&detail.content)?;
            writeln!(out, "Copied \"{}\" to clipboard", single_line(&detail.summary.title))?;
            Ok(())
        }
        Commands::Stats => show_stats(&mut out, open()?.as_ref(), &settings),
    }
}

/// Drive one provider call to completion on a throwaway runtime
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

fn print_categories(out: &mut impl Write, categories: &[Category], json: bool) -> Result<()> {
    if json {
        return print_json(out, categories);
    }
    if categories.is_empty() {
        writeln!(out, "No categories available")?;
    }
    for category in categories {
        writeln!(
            out,
            "{:<24} {:<32} {:>4} prompts",
            single_line(&category.id),
            single_line(&category.name),
            category.prompt_count
        )?;
    }
    Ok(())
}

fn print_prompts(out: &mut impl Write, prompts: &[PromptSummary], json: bool) -> Result<()> {
    if json {
        return print_json(out, prompts);
    }
    if prompts.is_empty() {
        writeln!(out, "This category has no prompts yet")?;
    }
    for prompt in prompts {
        writeln!(out, "{:<24} {}", single_line(&prompt.id), single_line(&prompt.title))?;
    }
    Ok(())
}

fn print_detail(out: &mut impl Write, detail: &PromptDetail, json: bool) -> Result<()> {
    if json {
        return print_json(out, detail);
    }

    let summary = &detail.summary;
    writeln!(out, "{}", single_line(&summary.title))?;
    writeln!(out, "{}", "=".repeat(summary.title.chars().count().clamp(3, 80)))?;
    writeln!(out, "ID: {}", single_line(&summary.id))?;
    writeln!(out, "Category: {}", single_line(&summary.category_id))?;
    if !summary.tags.is_empty() {
        let tags: Vec<String> = summary.tags.iter().map(|t| single_line(t)).collect();
        writeln!(out, "Tags: {}", tags.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "{}", strip_ansi_codes(&summary.description))?;
    if !detail.full_description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", strip_ansi_codes(&detail.full_description))?;
    }
    writeln!(out)?;
    writeln!(out, "--- Content ---")?;
    writeln!(out, "{}", strip_ansi_codes(&detail.content))?;
    Ok(())
}

fn print_search_results(out: &mut impl Write, results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        return print_json(out, results);
    }
    if results.is_empty() {
        writeln!(out, "No prompts match your search")?;
    }
    for result in results {
        writeln!(
            out,
            "{:<24} {} [{}]",
            single_line(&result.prompt.id),
            single_line(&result.prompt.title),
            single_line(&result.category_name)
        )?;
    }
    Ok(())
}

fn show_stats(out: &mut impl Write, provider: &dyn DataProvider, settings: &Settings) -> Result<()> {
    let (categories, counts) = block_on(async {
        let categories = provider.list_categories().await?;
        let mut counts = Vec::with_capacity(categories.len());
        for category in &categories {
            counts.push(provider.list_prompts_by_category(&category.id).await?.len());
        }
        Ok::<_, crate::provider::ProviderError>((categories, counts))
    })??;

    let total: usize = counts.iter().sum();

    writeln!(out, "Prompt Catalog Statistics")?;
    writeln!(out, "=========================")?;
    writeln!(out, "Categories: {}", categories.len())?;
    writeln!(out, "Total prompts: {}", total)?;
    for (category, count) in categories.iter().zip(&counts) {
        writeln!(out, "  {}: {}", single_line(&category.name), count)?;
    }
    writeln!(out)?;
    writeln!(out, "Source: {}", settings.source)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> PromptSummary {
        PromptSummary {
            id: "code-review".to_string(),
            category_id: "coding".to_string(),
            title: "Code \x1b[31mReview\x1b[0m".to_string(),
            description: "Checklist for reviews".to_string(),
            tags: vec!["rust".to_string(), "quality".to_string()],
        }
    }

    fn output(write: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["prompt-catalog", "list", "coding", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List { ref category_id, json: true }) if category_id == "coding"
        ));

        let cli = Cli::try_parse_from(["prompt-catalog"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["prompt-catalog", "stats", "--data-dir", "/srv/prompts", "-vv"])
                .unwrap();

        assert_eq!(cli.global.data_dir, Some(std::path::PathBuf::from("/srv/prompts")));
        assert_eq!(cli.global.verbose, 2);
    }

    #[test]
    fn test_print_prompts_strips_escapes() {
        let text = output(|out| print_prompts(out, &[summary()], false));

        assert!(text.contains("code-review"));
        assert!(text.contains("Code Review"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_print_prompts_json_keeps_raw_fields() {
        let text = output(|out| print_prompts(out, &[summary()], true));
        let parsed: Vec<PromptSummary> = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, vec![summary()]);
    }

    #[test]
    fn test_print_empty_search() {
        let text = output(|out| print_search_results(out, &[], false));
        assert_eq!(text, "No prompts match your search\n");
    }

    #[test]
    fn test_print_detail_sections() {
        let detail = PromptDetail {
            summary: summary(),
            full_description: "Use on every pull request".to_string(),
            content: "Review {{diff}}".to_string(),
        };

        let text = output(|out| print_detail(out, &detail, false));

        assert!(text.contains("Tags: rust, quality"));
        assert!(text.contains("Use on every pull request"));
        assert!(text.contains("--- Content ---\nReview {{diff}}"));
    }
}
