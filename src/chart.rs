//! Pure chart geometry, kept separate from egui so it can be tested
//! head-less. The painter in `render` turns these numbers into shapes.

use crate::schema::Row;
use serde_json::Value;
use std::f32::consts::TAU;

/// Value range plotted on the Y axis. Always includes the zero baseline so
/// bars have somewhere to grow from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn span(&self) -> f64 {
        (self.max - self.min).max(f64::EPSILON)
    }
}

/// Extract one series column. Missing or non-numeric cells become `None`
/// rather than failing the chart.
pub fn series_values(data: &[Row], key: &str) -> Vec<Option<f64>> {
    data.iter().map(|row| numeric(row.get(key))).collect()
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

/// Bounds over every plotted series, zero-anchored. Empty data gets a
/// nominal 0..1 range so the axis still draws.
pub fn value_bounds(data: &[Row], keys: &[&str]) -> Bounds {
    let mut min = 0.0f64;
    let mut max = 0.0f64;
    let mut any = false;
    for key in keys {
        for value in series_values(data, key).into_iter().flatten() {
            min = min.min(value);
            max = max.max(value);
            any = true;
        }
    }
    if !any || (max - min).abs() < f64::EPSILON {
        return Bounds {
            min: 0.0,
            max: 1.0,
        };
    }
    Bounds { min, max }
}

/// Round `span / target` up to a 1/2/5 × 10^k step.
fn nice_step(span: f64, target: usize) -> f64 {
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let factor = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Tick positions covering the bounds, at most `target + 2` of them.
pub fn nice_ticks(bounds: Bounds, target: usize) -> Vec<f64> {
    let step = nice_step(bounds.span(), target);
    let first = (bounds.min / step).floor() * step;
    let mut ticks = Vec::new();
    let mut tick = first;
    while tick <= bounds.max + step * 0.5 {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

/// Screen X centers for `count` categorical slots across `[left, right]`.
pub fn x_positions(count: usize, left: f32, right: f32) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let width = (right - left) / count as f32;
    (0..count)
        .map(|i| left + width * (i as f32 + 0.5))
        .collect()
}

/// Map a value into `[top, bottom]` screen space (Y grows downward).
pub fn y_to_screen(value: f64, bounds: Bounds, top: f32, bottom: f32) -> f32 {
    let t = ((value - bounds.min) / bounds.span()) as f32;
    bottom - t.clamp(0.0, 1.0) * (bottom - top)
}

/// One pie slice, angles in radians from 12 o'clock, clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f32,
    pub end_angle: f32,
}

/// Build slices from the rows' `value_key` column, labelled by `label_key`.
/// Rows with missing or non-positive values are skipped.
pub fn pie_slices(data: &[Row], value_key: &str, label_key: &str) -> Vec<PieSlice> {
    let entries: Vec<(String, f64)> = data
        .iter()
        .filter_map(|row| {
            let value = numeric(row.get(value_key))?;
            if value <= 0.0 {
                return None;
            }
            let label = row
                .get(label_key)
                .map(|v| crate::format::display_scalar(v))
                .unwrap_or_default();
            Some((label, value))
        })
        .collect();
    let total: f64 = entries.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut angle = 0.0f32;
    entries
        .into_iter()
        .map(|(label, value)| {
            let fraction = value / total;
            let sweep = fraction as f32 * TAU;
            let slice = PieSlice {
                label,
                value,
                fraction,
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: &[(&str, f64)]) -> Vec<Row> {
        values
            .iter()
            .map(|(name, v)| {
                let mut row = Row::new();
                row.insert("name".into(), json!(name));
                row.insert("sales".into(), json!(v));
                row
            })
            .collect()
    }

    #[test]
    fn bounds_are_zero_anchored() {
        let data = rows(&[("a", 50.0), ("b", 120.0)]);
        let b = value_bounds(&data, &["sales"]);
        assert_eq!(b.min, 0.0);
        assert_eq!(b.max, 120.0);
    }

    #[test]
    fn bounds_without_values_are_nominal() {
        let data = rows(&[("a", 1.0)]);
        let b = value_bounds(&data, &["missing"]);
        assert_eq!(b, Bounds { min: 0.0, max: 1.0 });
    }

    #[test]
    fn missing_cells_become_none() {
        let mut data = rows(&[("a", 3.0)]);
        data.push({
            let mut row = Row::new();
            row.insert("name".into(), json!("b"));
            row
        });
        assert_eq!(series_values(&data, "sales"), vec![Some(3.0), None]);
    }

    #[test]
    fn ticks_use_round_steps() {
        let ticks = nice_ticks(Bounds { min: 0.0, max: 97.0 }, 5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn pie_fractions_sum_to_one() {
        let data = rows(&[("a", 1.0), ("b", 3.0)]);
        let slices = pie_slices(&data, "sales", "name");
        assert_eq!(slices.len(), 2);
        assert!((slices[0].fraction - 0.25).abs() < 1e-9);
        assert!((slices[1].fraction - 0.75).abs() < 1e-9);
        assert!((slices[1].end_angle - TAU).abs() < 1e-4);
    }

    #[test]
    fn pie_skips_unusable_rows() {
        let data = rows(&[("a", 5.0), ("b", -2.0)]);
        let slices = pie_slices(&data, "sales", "name");
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].label, "a");
    }
}
