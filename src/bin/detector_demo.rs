//! Walks through the four detection strategies on canned and synthetic
//! streams.

use rand::Rng;
use std::error::Error;
use tracing::info;
use via_detect::{
    DetectionResult, DetectionStrategy, Detector, DetectorConfig, LogReaction, ReactionError,
    reaction_fn,
};

fn threshold_walkthrough() -> Result<(), Box<dyn Error>> {
    println!("=== Threshold ===");
    let mut detector = Detector::new(DetectorConfig::threshold(10.0))?;

    for value in [5.0, 7.0, 9.0, 12.0, 15.0, 8.0, 11.0, 6.0] {
        let result = detector.ingest(value)?;
        let status = if result.detected() { "DETECTED" } else { "normal" };
        println!("value {:6.1} -> {:<10} (confidence {:.2})", value, status, result.confidence());
    }
    println!("statistics: {}\n", serde_json::to_string(&detector.statistics())?);
    Ok(())
}

fn pattern_walkthrough() -> Result<(), Box<dyn Error>> {
    println!("=== Pattern ===");
    let config = DetectorConfig::new(DetectionStrategy::Pattern).with_window_size(5);
    let mut detector = Detector::new(config)?;

    for run in [[1.0, 2.0, 3.0, 4.0, 5.0], [10.0, 8.0, 6.0, 4.0, 2.0]] {
        for value in run {
            let result = detector.ingest(value)?;
            let pattern = result.metadata().pattern().map(|p| p.as_str()).unwrap_or("n/a");
            println!("value {:4.1} -> pattern {}", value, pattern);
        }
        detector.reset();
        println!();
    }
    Ok(())
}

fn anomaly_walkthrough() -> Result<(), Box<dyn Error>> {
    println!("=== Anomaly ===");
    let config = DetectorConfig::new(DetectionStrategy::Anomaly)
        .with_sensitivity(2.0)
        .with_window_size(10)
        .with_reaction(LogReaction);
    let mut detector = Detector::new(config)?;

    let mut rng = rand::rng();
    for _ in 0..10 {
        let value = 10.0 + rng.random_range(-1.0..1.0);
        let result = detector.ingest(value)?;
        println!("value {:6.2} -> detected {}", value, result.detected());
    }

    let result = detector.ingest(50.0)?;
    println!("value {:6.2} -> detected {}", 50.0, result.detected());
    println!("metadata: {}\n", serde_json::Value::Object(result.metadata().to_map()));
    Ok(())
}

fn change_walkthrough() -> Result<(), Box<dyn Error>> {
    println!("=== Change ===");
    let config = DetectorConfig::new(DetectionStrategy::Change).with_sensitivity(0.3);
    let mut detector = Detector::new(config)?;

    for value in [10.0, 11.0, 10.5, 15.0, 14.8, 20.0] {
        let result = detector.ingest(value)?;
        match result.metadata().get("relative_change").and_then(|v| v.as_f64()) {
            Some(change) => {
                let status = if result.detected() { "SIGNIFICANT" } else { "normal" };
                println!("value {:5.1} (change {:5.1}%) -> {}", value, change * 100.0, status);
            }
            None => println!("value {:5.1} (first value)", value),
        }
    }
    println!();
    Ok(())
}

fn reaction_walkthrough() -> Result<(), Box<dyn Error>> {
    println!("=== Reaction ===");
    let mut alerts = 0usize;
    let alert = reaction_fn(move |result: &DetectionResult| {
        alerts += 1;
        println!("  ALERT #{}: confidence {:.2}", alerts, result.confidence());
        Ok::<(), ReactionError>(())
    });
    let config = DetectorConfig::threshold(15.0).with_reaction(alert);
    let mut detector = Detector::new(config)?;

    for value in [10.0, 12.0, 18.0, 14.0, 20.0, 13.0, 16.0] {
        println!("adding {}", value);
        detector.ingest(value)?;
    }
    println!("positive detections: {}\n", detector.statistics().positive_detections);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    info!("Running detector walkthrough.");

    threshold_walkthrough()?;
    pattern_walkthrough()?;
    anomaly_walkthrough()?;
    change_walkthrough()?;
    reaction_walkthrough()?;

    info!("Walkthrough complete.");
    Ok(())
}
