//! scan_demo - end-to-end synthetic run of the scan pipeline
//!
//! Drives full scan cycles against the stub camera and stub
//! classifier:
//! 1. Request a capture and take a synthetic still
//! 2. Dispatch classification and deliver the outcome
//! 3. Compose the insight, project overlay geometry, journal the scan
//! 4. Rescan and repeat

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use clap::Parser;

use ecosort_kernel::{
    config, overlay, CaptureGate, CaptureSource, ClassifierService, ScanHistory, ScanLifecycle,
    ScanState, StubCamera, StubClassifier,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of scan cycles to run.
    #[arg(long, default_value_t = 4)]
    scans: u64,
    /// History database path (":memory:" keeps the journal ephemeral).
    #[arg(long, default_value = ":memory:")]
    db: String,
    /// Simulated viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "390x844")]
    viewport: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.scans == 0 {
        return Err(anyhow!("scans must be >= 1"));
    }
    let viewport = config::parse_viewport(&args.viewport)?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
    }

    let mut camera = StubCamera::new();
    let mut classifier = StubClassifier::new();
    let mut history = ScanHistory::open(&args.db)?;
    let mut lifecycle = ScanLifecycle::new(Instant::now());

    for cycle in 1..=args.scans {
        if stop.load(Ordering::SeqCst) {
            log::info!("interrupted, stopping after {} scans", cycle - 1);
            break;
        }

        log::info!("--- scan cycle {cycle} ---");
        if lifecycle.begin_capture() != CaptureGate::Accepted {
            return Err(anyhow!("capture request rejected in state {:?}", lifecycle.state()));
        }

        let still = camera.capture_still()?;
        let Some(ticket) = lifecycle.capture_succeeded() else {
            continue;
        };

        let outcome = classifier.classify(&still.encode());
        lifecycle.finish_classification(ticket, outcome, Instant::now());

        match lifecycle.state() {
            ScanState::Result(_) => {
                let insight = lifecycle.insight().expect("result state holds an insight");
                println!("{}: {}", insight.display_item_name, insight.callout_text);
                println!("  {}", insight.summary);
                println!("  steps: {}", insight.steps_text);
                println!(
                    "  confidence {}%, {}",
                    insight.confidence_percent, insight.co2_impact_label
                );

                match lifecycle.overlay_for(viewport) {
                    Some(rect) => println!(
                        "  overlay at ({:.0},{:.0}) {:.0}x{:.0}, label anchor ({:.0},{:.0})",
                        rect.left,
                        rect.top,
                        rect.width,
                        rect.height,
                        rect.label_anchor.x,
                        rect.label_anchor.y
                    ),
                    None => {
                        let panel = overlay::place_panel(None, viewport, 280.0);
                        println!(
                            "  no bounding box; centered panel at ({:.0},{:.0}) width {:.0}",
                            panel.left, panel.top, panel.width
                        );
                    }
                }

                history.record(insight)?;
            }
            ScanState::Failed(failure) => {
                println!("scan failed: {}", failure.alert_text());
            }
            other => {
                return Err(anyhow!("unexpected post-classification state {other:?}"));
            }
        }

        lifecycle.rescan(Instant::now());
    }

    println!("journalled {} scans", history.count()?);
    Ok(())
}
