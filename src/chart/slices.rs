//! Slice assembly: fetched rows + chart options -> labelled pie slices

use serde::Serialize;
use serde_json::Value;

use super::PieChartOptions;
use crate::fetch::Row;
use crate::format::{format_number, FormatOptions};

/// One wedge of the pie, ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
    /// Percent of the total, 0-100
    pub share: f64,
    /// Value formatted with the chart's number format
    pub label: String,
    /// Colour override from `valuesOptions`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PieSlice {
    /// Share rendered for tooltips, e.g. `"37.50%"`
    pub fn share_label(&self) -> String {
        format_number(Some(self.share), &FormatOptions::percent())
    }
}

/// Build slices from rows using the configured x/y columns
///
/// Rows missing either column, or whose value is not a finite number (or
/// numeric string), are skipped. Row order is kept.
pub fn build_slices(rows: &[Row], options: &PieChartOptions) -> Vec<PieSlice> {
    let (Some(x_column), Some(y_column)) = (options.x_column.as_deref(), options.y_column.as_deref())
    else {
        tracing::debug!("Chart has no x/y columns configured, no slices");
        return Vec::new();
    };

    let points: Vec<(String, f64)> = rows
        .iter()
        .filter_map(|row| {
            let name = cell_text(row.get(x_column)?)?;
            let value = cell_number(row.get(y_column)?)?;
            Some((name, value))
        })
        .collect();

    if points.len() < rows.len() {
        tracing::debug!(
            skipped = rows.len() - points.len(),
            "Skipped rows without a name or numeric value"
        );
    }

    let total: f64 = points.iter().map(|(_, value)| value).sum();
    let label_options = FormatOptions {
        format: options.number_format.clone(),
        ..FormatOptions::default()
    };

    points
        .into_iter()
        .map(|(name, value)| {
            let share = if total == 0.0 { 0.0 } else { value / total * 100.0 };
            PieSlice {
                label: format_number(Some(value), &label_options),
                color: options.color_for(&name).map(str::to_string),
                name,
                value,
                share,
            }
        })
        .collect()
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Value) -> Option<f64> {
    let number = match cell {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
