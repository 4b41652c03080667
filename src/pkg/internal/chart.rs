use std::path::Path;
use std::sync::OnceLock;

use plotters::coord::ranged1d::SegmentedCoord;
use plotters::coord::types::RangedCoordi32;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{register_font, FontStyle};

use crate::conf::Settings;
use crate::pkg::internal::adaptors::records::spec::{ScoredDataset, CI_SCORE, PRODUCT};
use crate::prelude::{AppError, Result};

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const TITLE: &str = "CI Scores for Different Products";
const TICK_LABEL_GAP: i32 = 8;

static FONT_LOADED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn from_scored(dataset: &ScoredDataset) -> Self {
        BarChart {
            title: TITLE.into(),
            x_desc: PRODUCT.into(),
            y_desc: CI_SCORE.into(),
            bars: dataset
                .rows
                .iter()
                .map(|r| Bar {
                    label: r.product().to_string(),
                    value: r.ci_score,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Always contains zero, and is never empty.
    fn value_range(&self) -> (f64, f64) {
        let finite = self.bars.iter().map(|b| b.value).filter(|v| v.is_finite());
        let (lo, hi) = finite.fold((0f64, 0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if lo == hi {
            return (0.0, 1.0);
        }
        let pad = (hi - lo) * 0.05;
        (if lo < 0.0 { lo - pad } else { lo }, if hi > 0.0 { hi + pad } else { hi })
    }
}

/// Registers the TTF at `path` as the sans-serif face. Only the first call in a process has effect.
pub fn load_font(path: &Path) -> bool {
    *FONT_LOADED.get_or_init(|| {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("chart font {} unavailable: {}", path.display(), e);
                return false;
            }
        };
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        match register_font("sans-serif", FontStyle::Normal, bytes) {
            Ok(()) => {
                tracing::info!("registered chart font {}", path.display());
                true
            }
            Err(_) => {
                tracing::warn!("chart font {} is not a valid TTF", path.display());
                false
            }
        }
    })
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    pub width: u32,
    pub height: u32,
    /// Draw caption, axis descriptions and tick labels; needs a registered font.
    pub labelled: bool,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32, labelled: bool) -> Self {
        ChartRenderer {
            width,
            height,
            labelled,
        }
    }

    pub fn from_settings(s: &Settings) -> Self {
        let labelled = load_font(Path::new(&s.chart_font));
        if !labelled {
            tracing::warn!("no chart font, charts will be drawn without text");
        }
        Self::new(s.chart_width, s.chart_height, labelled)
    }

    pub fn render(&self, chart: &BarChart, path: &Path) -> Result<()> {
        self.draw_png(chart, path)
            .map_err(|e| AppError::Chart(format!("{}: {}", path.display(), e)))?;
        tracing::debug!("chart with {} bars written to {}", chart.len(), path.display());
        Ok(())
    }

    fn draw_png(&self, chart: &BarChart, path: &Path) -> RenderResult {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw(chart, &root)?;
        root.present()?;
        Ok(())
    }

    fn draw<DB>(&self, chart: &BarChart, root: &DrawingArea<DB, Shift>) -> RenderResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;

        let n = chart.len();
        let (lo, hi) = chart.value_range();
        let mut builder = ChartBuilder::on(root);
        builder.margin(20);
        if self.labelled {
            builder
                .caption(&chart.title, ("sans-serif", 28))
                .x_label_area_size(110)
                .y_label_area_size(70);
        }
        let mut ctx = builder.build_cartesian_2d(x_axis(n), lo..hi)?;

        if self.labelled {
            // Ticks only; the mesh centres rotated labels on the axis, so they are drawn below.
            let no_label = |_: &SegmentValue<i32>| String::new();
            ctx.configure_mesh()
                .disable_x_mesh()
                .x_labels(n.max(1))
                .x_label_formatter(&no_label)
                .x_desc(chart.x_desc.as_str())
                .y_desc(chart.y_desc.as_str())
                .axis_desc_style(("sans-serif", 18))
                .draw()?;
        }

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let value = if bar.value.is_finite() { bar.value } else { 0.0 };
            let (start, end) = bar_span(i, n);
            let mut rect = Rectangle::new([(start, 0.0), (end, value)], SKY_BLUE.filled());
            rect.set_margin(0, 0, 4, 4);
            rect
        }))?;

        if self.labelled {
            let style = TextStyle::from(("sans-serif", 14).into_font())
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Left, VPos::Center));
            for (i, bar) in chart.bars.iter().enumerate() {
                let (x, y) = ctx.backend_coord(&(SegmentValue::CenterOf(i as i32), lo));
                root.draw_text(&bar.label, &style, (x, y + TICK_LABEL_GAP))?;
            }
        }
        Ok(())
    }
}

type RenderResult = core::result::Result<(), Box<dyn std::error::Error>>;

/// One slot per bar. Discrete i32 ranges include their end, so n bars sit on `0..n-1`.
fn x_axis(n: usize) -> SegmentedCoord<RangedCoordi32> {
    (0..(n as i32 - 1).max(0)).into_segmented()
}

/// The last bar closes on the right edge of the plot.
fn bar_span(i: usize, n: usize) -> (SegmentValue<i32>, SegmentValue<i32>) {
    let end = if i + 1 >= n {
        SegmentValue::Last
    } else {
        SegmentValue::Exact(i as i32 + 1)
    };
    (SegmentValue::Exact(i as i32), end)
}
