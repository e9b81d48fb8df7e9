// tcg-proxies: lay out proxy cards from a print list and write a PDF

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tcg_companion::models::PrintListItem;
use tcg_companion::{CompanionClient, CompanionError, LayoutParams, PageLayout, PrintList, ProxySheetWriter};

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate printable proxy card sheets")]
struct Args {
    /// Print list file (JSON array of items). Defaults to the session print list.
    input: Option<PathBuf>,

    /// Output filename (defaults to proxy-cards-{date}.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Margin on all four sides, in inches
    #[arg(short, long, default_value = "0.5")]
    margin: f64,

    #[arg(long)]
    margin_top: Option<f64>,

    #[arg(long)]
    margin_right: Option<f64>,

    #[arg(long)]
    margin_bottom: Option<f64>,

    #[arg(long)]
    margin_left: Option<f64>,

    /// Space between cards, in inches
    #[arg(short, long, default_value = "0.0")]
    gap: f64,

    /// Backend base URL (defaults to $TCG_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "TCG_API_TOKEN")]
    token: Option<String>,

    /// Treat card URLs as local image files instead of fetching them
    #[arg(long)]
    local_images: bool,

    /// Print the page layout and exit without writing a PDF
    #[arg(long)]
    layout_only: bool,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CompanionError> {
    let args = Args::parse();

    let params = LayoutParams::default()
        .margin_each(
            args.margin_top.unwrap_or(args.margin),
            args.margin_right.unwrap_or(args.margin),
            args.margin_bottom.unwrap_or(args.margin),
            args.margin_left.unwrap_or(args.margin),
        )
        .gap(args.gap);

    let mut builder = CompanionClient::builder();
    if let Some(url) = &args.base_url {
        builder = builder.base_url(url);
    }
    if let Some(token) = &args.token {
        builder = builder.auth_token(token);
    }
    let client = builder.build()?;

    let list = match &args.input {
        Some(path) => {
            let items: Vec<PrintListItem> = serde_json::from_str(&fs::read_to_string(path)?)?;
            PrintList::from_items(items)
        }
        None => client.print_list()?,
    };

    let layout = PageLayout::compute(&params, list.total_copies())?;
    println!(
        "{} cards, {} x {} per page, {} pages",
        layout.total_items, layout.cards_per_row, layout.cards_per_column, layout.total_pages
    );
    if args.layout_only {
        for page in 0..layout.total_pages {
            println!("  page {}: {} cards", page + 1, layout.cards_on_page(page));
        }
        return Ok(());
    }

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(tcg_companion::pdf::default_proxy_filename()));

    let report = if args.local_images {
        let items = list.flatten();
        ProxySheetWriter::new(params).write(
            &items,
            |item| Ok(image::open(&item.card_url)?),
            &output,
        )?
    } else {
        client.generate_proxy_pdf(&list, &params, &output)?
    };

    println!("Generated: {}", output.display());
    if !report.placeholders.is_empty() {
        println!("  {} placeholders: {}", report.placeholders.len(), report.placeholders.join(", "));
    }
    Ok(())
}
