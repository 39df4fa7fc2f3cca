//! Read-only exports of analysis results
//!
//! Consumers get the correlated layer table as CSV and full results as
//! JSON; nothing here feeds back into the pipeline.

use std::io::Write;
use std::path::Path;

use crate::analysis::CptAnalysis;
use crate::correlation::CorrelatedLayer;
use crate::io::IoError;
use crate::settlement::SettlementResult;

/// Write the correlated layer table as CSV.
pub fn write_layers_csv<W: Write>(
    writer: W,
    layers: &[CorrelatedLayer],
) -> Result<(), IoError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "layer",
        "top_m",
        "bottom_m",
        "thickness_m",
        "soil_type",
        "avg_qc_kpa",
        "avg_ic",
        "E_kpa",
        "M_kpa",
        "Cc",
        "Cr",
        "OCR",
        "phi_deg",
        "Su_kpa",
        "k_m_s",
        "gamma_kn_m3",
    ])?;

    for (i, correlated) in layers.iter().enumerate() {
        let layer = &correlated.layer;
        let p = &correlated.parameters;
        csv_writer.write_record([
            (i + 1).to_string(),
            format!("{:.2}", layer.top),
            format!("{:.2}", layer.bottom),
            format!("{:.2}", layer.thickness()),
            layer.soil_type.to_string(),
            format!("{:.1}", layer.avg_qc),
            format!("{:.2}", layer.avg_ic),
            format!("{:.0}", p.youngs_modulus),
            format!("{:.0}", p.constrained_modulus),
            format!("{:.3}", p.compression_index),
            format!("{:.4}", p.recompression_index),
            format!("{:.2}", p.ocr),
            p.friction_angle
                .map(|phi| format!("{:.1}", phi))
                .unwrap_or_default(),
            p.undrained_strength
                .map(|su| format!("{:.1}", su))
                .unwrap_or_default(),
            format!("{:.2e}", p.permeability),
            format!("{:.1}", p.unit_weight),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the correlated layer table to a CSV file on disk.
pub fn write_layers_csv_file(
    path: impl AsRef<Path>,
    layers: &[CorrelatedLayer],
) -> Result<(), IoError> {
    write_layers_csv(std::fs::File::create(path)?, layers)
}

/// Serialize a full analysis (samples, layers, issues) as pretty JSON.
pub fn analysis_to_json(analysis: &CptAnalysis) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// Serialize a settlement result as pretty JSON.
pub fn settlement_to_json(result: &SettlementResult) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(result)?)
}
