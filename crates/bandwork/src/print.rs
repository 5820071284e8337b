//! Print pass: pagination and evaluation of a design against data
//!
//! Rows are split into pages before anything is evaluated, so page
//! aggregates (`PAGESUM` and friends) always see the complete page.
//! Pages are then produced in order; inside a page the header bands come
//! first, then every detail band once per row, then summary and footer
//! bands.
//!
//! A failing formula never aborts the render. Missing fields fall back to
//! the object's own text and other errors to [`RenderOptions::error_text`];
//! both are counted in [`RenderStats`].
//!
//! # Example
//!
//! ```rust
//! use bandwork::prelude::*;
//!
//! let detail = Band::new("d", "Detail", BandKind::Detail, 0.0, 20.0)
//!     .with_object(ControlObject::field("f", Frame::new(0.0, 0.0, 80.0, 20.0), "amount"));
//! let summary = Band::new("s", "Summary", BandKind::Summary, 20.0, 20.0)
//!     .with_object(ControlObject::calculated("t", Frame::new(0.0, 20.0, 80.0, 20.0), "SUM({amount})"));
//! let design = Design::new(vec![detail, summary]);
//!
//! let rows = vec![record([("amount", Scalar::from(2))]), record([("amount", Scalar::from(3))])];
//! let engine = FormulaEngine::new();
//! let report = ReportRenderer::new(&engine).render(&design, &Record::new(), &rows);
//!
//! assert_eq!(report.pages.len(), 1);
//! assert_eq!(report.pages[0].bands.last().unwrap().objects[0].text, "5");
//! ```

use std::cell::RefCell;
use std::fmt;
use std::ops::Range;

use ahash::AHashMap;
use bandwork_core::{
    Band, BandKind, Color, ControlKind, ControlObject, Design, FormatType, Record, Scalar,
    SummaryDisplayMode, ValueFormat,
};
use bandwork_formula::functions::date::{as_date, format_date, DEFAULT_DATE_PATTERN};
use bandwork_formula::functions::format::{
    format_currency, format_fixed, to_chinese_upper, DEFAULT_CURRENCY_SYMBOL,
};
use bandwork_formula::{
    resolve_variable, Clock, EvaluationContext, Expr, FormulaEngine, FormulaError, FormulaResult,
    SystemClock,
};
use bandwork_geometry::{display_box, Rect};
use log::{debug, warn};
use serde::Serialize;

static SYSTEM_CLOCK: SystemClock = SystemClock;

/// Decimals used by numeric formats when the object sets none
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Most decimals a numeric format prints
pub const MAX_DECIMAL_PLACES: u32 = 20;

/// Options for a print pass
///
/// Explicit values here override the design's own settings.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Fixed number of detail rows per page
    pub rows_per_page: Option<usize>,
    /// Height available to detail rows on one page
    pub page_body_height: Option<f64>,
    /// Text shown for missing fields instead of the object's own text
    pub missing_field_text: Option<String>,
    /// Placeholder for objects whose formula failed (default: empty)
    pub error_text: String,
}

/// Statistics from a print pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    pub pages: usize,
    pub bands_rendered: usize,
    pub objects_rendered: usize,
    /// Formulas evaluated, band formulas included
    pub formulas_evaluated: usize,
    /// Objects that fell back to their default text
    pub missing_fields: usize,
    /// Objects or band formulas that failed with any other error
    pub errors: usize,
    /// Objects skipped because they are not printed
    pub hidden_objects: usize,
}

/// Why an object shows fallback text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum Degradation {
    MissingField(String),
    Error(String),
}

/// One printed object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub z_index: i32,
    /// Display box relative to the band's top edge
    pub bounds: Rect,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Degradation>,
}

/// One printed band instance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedBand {
    pub band_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BandKind,
    /// Global detail row index, for detail bands
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    pub height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    /// Printable objects, bottom-most first
    pub objects: Vec<RenderedObject>,
}

/// One printed page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// 1-based page number
    pub number: usize,
    /// Rows of the dataset on this page
    pub rows: Range<usize>,
    pub bands: Vec<RenderedBand>,
}

impl RenderedPage {
    pub fn height(&self) -> f64 {
        self.bands.iter().map(|b| b.height).sum()
    }
}

/// Result of a print pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub pages: Vec<RenderedPage>,
    pub stats: RenderStats,
}

impl fmt::Display for RenderedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.pages.len();
        for page in &self.pages {
            writeln!(f, "--- Page {} of {} ---", page.number, total)?;
            for band in &page.bands {
                let texts: Vec<&str> = band
                    .objects
                    .iter()
                    .map(|o| o.text.as_str())
                    .filter(|t| !t.is_empty())
                    .collect();
                match band.row_index {
                    Some(row) => write!(f, "[{} #{}]", band.name, row)?,
                    None => write!(f, "[{}]", band.name)?,
                }
                if !texts.is_empty() {
                    write!(f, " {}", texts.join(" | "))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Format a value the way a field or calculated object prints it
///
/// Values the format cannot interpret print as-is.
pub fn format_value(value: &Scalar, format: &ValueFormat) -> String {
    let decimals = format
        .decimal_places
        .unwrap_or(DEFAULT_DECIMAL_PLACES)
        .min(MAX_DECIMAL_PLACES) as usize;
    let number = match value {
        Scalar::Null => return String::new(),
        Scalar::Number(n) => Some(*n),
        Scalar::String(_) => value.as_number(),
        _ => None,
    };

    match (format.format_type, number) {
        (FormatType::General, _) => value.to_string(),
        (FormatType::Number, Some(n)) => format_fixed(n, decimals, false),
        (FormatType::Currency, Some(n)) => format_currency(n, DEFAULT_CURRENCY_SYMBOL, decimals),
        (FormatType::Percent, Some(n)) => format!("{}%", format_fixed(n * 100.0, decimals, false)),
        (FormatType::ChineseUpper, Some(n)) => {
            to_chinese_upper(n).unwrap_or_else(|| value.to_string())
        }
        (FormatType::Date, _) => match as_date(value) {
            Some(date) => format_date(&date, DEFAULT_DATE_PATTERN),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

/// Page split plus the per-row heights it was computed from
struct Layout {
    pages: Vec<Range<usize>>,
    /// `detail_heights[row][n]` is the height of the n-th detail band
    detail_heights: Vec<Vec<f64>>,
}

/// Evaluates a design against data, page by page
pub struct ReportRenderer<'e> {
    engine: &'e FormulaEngine,
    options: RenderOptions,
    clock: &'e dyn Clock,
    parsed: RefCell<AHashMap<String, FormulaResult<Expr>>>,
}

impl<'e> ReportRenderer<'e> {
    pub fn new(engine: &'e FormulaEngine) -> Self {
        Self {
            engine,
            options: RenderOptions::default(),
            clock: &SYSTEM_CLOCK,
            parsed: RefCell::new(AHashMap::new()),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Clock for `NOW()`, `TODAY()` and the date variables
    pub fn with_clock(mut self, clock: &'e dyn Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Split `rows` into page ranges; there is always at least one page
    pub fn paginate(&self, design: &Design, master: &Record, rows: &[Record]) -> Vec<Range<usize>> {
        let mut stats = RenderStats::default();
        self.layout(design, master, rows, &mut stats).pages
    }

    /// Run the full print pass
    pub fn render(&self, design: &Design, master: &Record, rows: &[Record]) -> RenderedReport {
        self.parsed.borrow_mut().clear();
        let mut stats = RenderStats::default();
        let layout = self.layout(design, master, rows, &mut stats);
        let total_pages = layout.pages.len();
        let last_page = total_pages.saturating_sub(1);

        let mut pages = Vec::with_capacity(total_pages);
        for (page_index, range) in layout.pages.iter().enumerate() {
            let page_rows = &rows[range.clone()];
            let page_ctx = EvaluationContext::new(master)
                .with_rows(rows, page_rows)
                .with_position(range.start, page_index + 1, total_pages)
                .with_clock(self.clock);

            let mut bands = Vec::new();
            for band in design.bands_of_kind(BandKind::Header) {
                bands.push(self.render_band(band, &page_ctx, None, None, &mut stats));
            }

            for row_index in range.clone() {
                let row_ctx = page_ctx
                    .for_row(&rows[row_index])
                    .with_position(row_index, page_index + 1, total_pages);
                for (n, band) in design.bands_of_kind(BandKind::Detail).enumerate() {
                    let height = layout.detail_heights[row_index].get(n).copied();
                    bands.push(self.render_band(band, &row_ctx, Some(row_index), height, &mut stats));
                }
            }

            for band in design.bands_of_kind(BandKind::Summary) {
                let printed = match band.summary_mode() {
                    SummaryDisplayMode::EveryPage => true,
                    SummaryDisplayMode::LastPage => page_index == last_page,
                };
                if printed {
                    bands.push(self.render_band(band, &page_ctx, None, None, &mut stats));
                }
            }

            for band in design.bands_of_kind(BandKind::Footer) {
                bands.push(self.render_band(band, &page_ctx, None, None, &mut stats));
            }

            pages.push(RenderedPage {
                number: page_index + 1,
                rows: range.clone(),
                bands,
            });
        }

        stats.pages = pages.len();
        debug!(
            "rendered {} pages, {} bands, {} objects ({} missing, {} errors)",
            stats.pages, stats.bands_rendered, stats.objects_rendered, stats.missing_fields, stats.errors
        );
        RenderedReport { pages, stats }
    }

    /// Evaluate a formula through the per-render parse cache
    fn evaluate(
        &self,
        formula: &str,
        ctx: &EvaluationContext<'_>,
        stats: &mut RenderStats,
    ) -> FormulaResult<Scalar> {
        stats.formulas_evaluated += 1;
        let mut parsed = self.parsed.borrow_mut();
        let entry = parsed
            .entry(formula.to_string())
            .or_insert_with(|| self.engine.parse(formula));
        match entry {
            Ok(expr) => self.engine.evaluate(expr, ctx),
            Err(e) => Err(e.clone()),
        }
    }

    fn layout(&self, design: &Design, master: &Record, rows: &[Record], stats: &mut RenderStats) -> Layout {
        let detail_heights: Vec<Vec<f64>> = rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                // page rows are not known yet
                let ctx = EvaluationContext::new(master)
                    .with_rows(rows, &[])
                    .with_detail_row(row)
                    .with_position(row_index, 1, 1)
                    .with_clock(self.clock);
                design
                    .bands_of_kind(BandKind::Detail)
                    .map(|band| self.band_height(band, &ctx, stats))
                    .collect()
            })
            .collect();

        let rows_per_page = self
            .options
            .rows_per_page
            .or(design.settings.rows_per_page)
            .filter(|n| *n > 0);
        let body_height = self
            .options
            .page_body_height
            .or(design.settings.page_body_height)
            .filter(|h| *h > 0.0);

        let pages = if rows.is_empty() {
            vec![0..0]
        } else if let Some(per_page) = rows_per_page {
            (0..rows.len())
                .step_by(per_page)
                .map(|start| start..(start + per_page).min(rows.len()))
                .collect()
        } else if let Some(body) = body_height {
            let mut pages = Vec::new();
            let mut start = 0;
            let mut used = 0.0;
            for (i, heights) in detail_heights.iter().enumerate() {
                let height: f64 = heights.iter().sum();
                if i > start && used + height > body {
                    pages.push(start..i);
                    start = i;
                    used = 0.0;
                }
                used += height;
            }
            pages.push(start..rows.len());
            pages
        } else {
            vec![0..rows.len()]
        };

        debug!("paginated {} rows into {} pages", rows.len(), pages.len());
        Layout {
            pages,
            detail_heights,
        }
    }

    /// Band height from its row-height formula, or the designed height
    fn band_height(&self, band: &Band, ctx: &EvaluationContext<'_>, stats: &mut RenderStats) -> f64 {
        let Some(formula) = band.row_height_formula.as_deref() else {
            return band.height();
        };
        match self.evaluate(formula, ctx, stats) {
            Ok(value) => match value.as_number().filter(|h| h.is_finite()) {
                Some(height) => height.max(0.0),
                None => band.height(),
            },
            Err(e) => {
                debug!("row height of band {} falls back: {}", band.id, e);
                band.height()
            }
        }
    }

    fn background(&self, band: &Band, ctx: &EvaluationContext<'_>, stats: &mut RenderStats) -> Option<Color> {
        let formula = band.background_color_formula.as_deref()?;
        match self.evaluate(formula, ctx, stats) {
            Ok(value) => {
                let text = value.to_string();
                let color = text.parse::<Color>().ok();
                if color.is_none() && !text.is_empty() {
                    debug!("band {} background '{}' is not a color", band.id, text);
                }
                color
            }
            Err(e) => {
                debug!("background of band {} failed: {}", band.id, e);
                None
            }
        }
    }

    fn render_band(
        &self,
        band: &Band,
        ctx: &EvaluationContext<'_>,
        row_index: Option<usize>,
        height: Option<f64>,
        stats: &mut RenderStats,
    ) -> RenderedBand {
        let height = match height {
            Some(h) => h,
            None => self.band_height(band, ctx, stats),
        };
        let background = self.background(band, ctx, stats);

        let mut painted: Vec<&ControlObject> = band.objects.iter().collect();
        painted.sort_by_key(|o| o.z_index);

        let mut objects = Vec::with_capacity(painted.len());
        for object in painted {
            if !object.print_visible {
                stats.hidden_objects += 1;
                continue;
            }
            objects.push(self.render_object(band, object, ctx, stats));
        }

        stats.bands_rendered += 1;
        RenderedBand {
            band_id: band.id.clone(),
            name: band.name.clone(),
            kind: band.kind,
            row_index,
            height,
            background,
            objects,
        }
    }

    fn render_object(
        &self,
        band: &Band,
        object: &ControlObject,
        ctx: &EvaluationContext<'_>,
        stats: &mut RenderStats,
    ) -> RenderedObject {
        let (value, format, fallback) = match &object.kind {
            ControlKind::Text(t) => (Ok(Scalar::string(t.text.as_str())), ValueFormat::default(), ""),
            ControlKind::Field(f) => (
                resolve_variable(&f.field_name, ctx),
                f.format,
                f.text.as_str(),
            ),
            ControlKind::Calculated(c) => {
                (self.evaluate(&c.formula, ctx, stats), c.format, c.text.as_str())
            }
            ControlKind::Image(i) => (Ok(Scalar::string(i.source.as_str())), ValueFormat::default(), ""),
            ControlKind::Barcode(b) => (Ok(Scalar::string(b.data.as_str())), ValueFormat::default(), ""),
            ControlKind::Shape(_) | ControlKind::Line(_) => {
                (Ok(Scalar::Null), ValueFormat::default(), "")
            }
        };

        let (text, degraded) = match value {
            Ok(v) => (format_value(&v, &format), None),
            Err(FormulaError::MissingField(name)) => {
                stats.missing_fields += 1;
                debug!("object {} in band {}: missing field {}", object.id, band.id, name);
                let text = self
                    .options
                    .missing_field_text
                    .clone()
                    .unwrap_or_else(|| fallback.to_string());
                (text, Some(Degradation::MissingField(name)))
            }
            Err(e) => {
                stats.errors += 1;
                warn!("object {} in band {} failed: {}", object.id, band.id, e);
                (self.options.error_text.clone(), Some(Degradation::Error(e.to_string())))
            }
        };

        let display = display_box(object);
        stats.objects_rendered += 1;
        RenderedObject {
            id: object.id.clone(),
            kind: object.type_name(),
            z_index: object.z_index,
            bounds: Rect::new(display.x, display.y - band.top, display.width, display.height),
            text,
            degraded,
        }
    }
}
