use crate::config::ReadoutConfig;

use super::commands::{Pos, Rect, RegionPainter, Rgba};

/// Format `value` truncated toward zero to `decimals` places.
///
/// Non-finite values, and values too large to scale, render as `--`.
pub fn format_truncated(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "--".to_string();
    }
    let scale = 10f64.powi(decimals.min(12) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return "--".to_string();
    }
    let mut v = scaled.trunc() / scale;
    if v == 0.0 {
        v = 0.0; // no "-0"
    }
    format!("{:.*}", decimals, v)
}

/// Box of readout line `line` for a chart of width `chart_width`, chart-local.
pub fn readout_rect(cfg: &ReadoutConfig, chart_width: f32, line: usize) -> Rect {
    Rect::new(
        chart_width - cfg.width,
        cfg.line_height * line as f32,
        cfg.width,
        cfg.line_height,
    )
}

/// Clear the readout box opaquely, then draw `text` anchored at its bottom-right.
pub fn draw_readout(
    painter: &mut RegionPainter<'_>,
    cfg: &ReadoutConfig,
    chart_width: f32,
    line: usize,
    text: String,
    color: Rgba,
    background: Rgba,
) {
    let rect = readout_rect(cfg, chart_width, line);
    painter.clear(rect, background);
    let anchor = Pos::new(rect.x + rect.width, rect.y + rect.height);
    painter.text(anchor, text, cfg.text_size, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawCommand;

    #[test]
    fn truncates_like_an_integer_cast() {
        assert_eq!(format_truncated(0.25, 0), "0");
        assert_eq!(format_truncated(0.25, 2), "0.25");
        assert_eq!(format_truncated(24.99, 1), "24.9");
        assert_eq!(format_truncated(-0.3, 0), "0");
        assert_eq!(format_truncated(f64::NAN, 1), "--");
        assert_eq!(format_truncated(f64::MAX / 2.0, 3), "--");
    }

    #[test]
    fn readout_clears_before_text() {
        let mut out = Vec::new();
        let mut p = RegionPainter::new(Pos::new(0.0, 0.0), &mut out);
        let cfg = ReadoutConfig::default();
        draw_readout(&mut p, &cfg, 400.0, 1, "12".into(), Rgba::WHITE, Rgba::BLACK);
        assert_eq!(
            out[0],
            DrawCommand::ClearRegion {
                rect: Rect::new(200.0, 50.0, 200.0, 50.0),
                color: Rgba::BLACK,
            }
        );
        assert!(matches!(&out[1], DrawCommand::Text { anchor, text, .. }
            if *anchor == Pos::new(400.0, 100.0) && text == "12"));
    }
}
