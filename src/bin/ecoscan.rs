//! ecoscan - classify one image file against a live Classifier Service
//!
//! Reads a JPEG from disk, ships it to the service, and prints the
//! composed guidance (or the raw insight as JSON with --json),
//! including overlay geometry for the requested viewport.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use ecosort_kernel::{
    compute_overlay, config, insight, place_panel, CapturedImage, ClassifierService,
    HttpClassifier, HttpClassifierConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Image file to classify (JPEG).
    image: PathBuf,
    /// Classifier Service base URL.
    #[arg(long, env = "ECOSORT_SERVICE_URL", default_value = "http://127.0.0.1:8000")]
    service_url: String,
    /// Bearer token for the service, if required.
    #[arg(long, env = "ECOSORT_SERVICE_TOKEN")]
    token: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 20)]
    timeout_secs: u64,
    /// Viewport for overlay geometry, as WIDTHxHEIGHT.
    #[arg(long, default_value = "390x844")]
    viewport: String,
    /// Print the composed insight as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let viewport = config::parse_viewport(&args.viewport)?;

    let jpeg = std::fs::read(&args.image)
        .with_context(|| format!("read image {}", args.image.display()))?;
    let capture = CapturedImage { jpeg }.encode();

    let mut classifier = HttpClassifier::new(HttpClassifierConfig {
        base_url: args.service_url.clone(),
        token: args.token.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    })?;

    log::info!("classifying {} via {}", args.image.display(), args.service_url);
    let response = classifier.classify(&capture)?;
    let insight = insight::compose(&response);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&insight)?);
        return Ok(());
    }

    println!("{}", insight.callout_text);
    println!("item:       {}", insight.display_item_name);
    println!("material:   {}", insight.material_label);
    println!("confidence: {}%", insight.confidence_percent);
    println!("impact:     {}", insight.co2_impact_label);
    println!("footprint:  {}", insight.carbon_footprint);
    println!("summary:    {}", insight.summary);
    println!("steps:      {}", insight.steps_text);
    println!("centers:    {}", insight.center_prompt);
    if insight.used_fallback_model {
        println!("model:      fallback");
    }

    match compute_overlay(insight.bounding_box, viewport) {
        Some(rect) => println!(
            "overlay:    ({:.0},{:.0}) {:.0}x{:.0}, label anchor ({:.0},{:.0})",
            rect.left, rect.top, rect.width, rect.height, rect.label_anchor.x, rect.label_anchor.y
        ),
        None => {
            let panel = place_panel(None, viewport, 280.0);
            println!(
                "overlay:    none; centered panel at ({:.0},{:.0}) width {:.0}",
                panel.left, panel.top, panel.width
            );
        }
    }

    Ok(())
}
