use cpt_core::analysis::CptAnalysis;
use cpt_core::config::{AnalysisConfig, LoadConfig};
use cpt_core::profile::RawSample;
use cpt_core::settlement::{consolidation_times, settlement_at_time};

fn main() {
    println!("=== CPT Settlement Analysis ===\n");

    let s = "-".repeat(60);

    println!("Profile: sand over soft clay over dense sand");
    println!("{}", s);

    // Synthetic sounding, readings every 0.25 m
    let mut raw = Vec::new();
    let mut depth = 0.25;
    while depth < 3.1 {
        raw.push(RawSample::new(depth, 8000.0, 80.0, 0.0));
        depth += 0.25;
    }
    while depth < 7.1 {
        raw.push(RawSample::new(depth, 300.0, 15.0, 60.0));
        depth += 0.25;
    }
    while depth < 12.1 {
        raw.push(RawSample::new(depth, 10000.0, 100.0, 0.0));
        depth += 0.25;
    }

    let config = AnalysisConfig::default();
    let analysis = CptAnalysis::run(&raw, &config).expect("valid configuration");

    println!("Samples: {}", analysis.samples.len());
    println!("Layers:  {}\n", analysis.layers.len());

    for (i, correlated) in analysis.layers.iter().enumerate() {
        let layer = &correlated.layer;
        let p = &correlated.parameters;
        println!(
            "Layer {}: {:.2}-{:.2} m  {}",
            i + 1,
            layer.top,
            layer.bottom,
            layer.soil_type
        );
        println!(
            "  E = {:.0} kPa, M = {:.0} kPa, Cc = {:.3}, Cr = {:.4}, OCR = {:.2}",
            p.youngs_modulus, p.constrained_modulus, p.compression_index,
            p.recompression_index, p.ocr
        );
        match (p.friction_angle, p.undrained_strength) {
            (Some(phi), _) => println!("  phi = {:.1} deg", phi),
            (_, Some(su)) => println!("  Su = {:.1} kPa", su),
            _ => {}
        }
        for warning in &correlated.warnings {
            println!(
                "  warning: {} clamped from {:.3} to {:.3}",
                warning.parameter, warning.computed, warning.applied
            );
        }
    }

    println!("\nSettlement: 1000 kN on a 2 m x 2 m footing at 1 m depth");
    println!("{}", s);

    let load = LoadConfig::new(1000.0, 2.0, 2.0, 1.0).expect("valid load");
    let result = analysis.settlement(&load).expect("valid load");

    for ls in &result.layers {
        println!(
            "Layer {}: dSigma = {:.1} kPa, immediate = {:.1} mm, consolidation = {:.1} mm",
            ls.layer_index + 1,
            ls.stress_increase,
            ls.immediate,
            ls.consolidation
        );
    }
    println!(
        "\nTotal: {:.1} mm ({:.1} mm immediate + {:.1} mm consolidation)",
        result.total, result.immediate, result.consolidation
    );

    println!("\nTime rate of consolidation");
    println!("{}", s);

    for years in [0.1, 1.0, 5.0, 20.0] {
        println!(
            "After {:>5.1} years: {:.1} mm",
            years,
            settlement_at_time(&analysis.layers, &load, years)
        );
    }

    for entry in consolidation_times(&analysis.layers, 0.90) {
        if entry.time_years > 0.0 {
            println!(
                "Layer {} reaches 90% consolidation after {:.1} years",
                entry.layer_index + 1,
                entry.time_years
            );
        }
    }
}
