//! # Style System
//!
//! The already-resolved CSS properties a table box can carry. Cascade and
//! inheritance happen upstream; by the time a table reaches the layout engine
//! every value here is either set explicitly or left to its initial value.
//!
//! Only the properties that influence table geometry are modeled: the box
//! model, borders, the table-specific switches (layout mode, border model,
//! spacing, vertical alignment), and the break policy used by pagination.

use crate::model::Edges;
use serde::{Deserialize, Serialize};

/// The complete set of style properties for a table box.
///
/// The same struct is used for tables, column groups, columns, row groups,
/// rows, cells, and captions. Properties that do not apply to a box are
/// ignored for it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // ── Box Model ──────────────────────────────────────────────
    /// Explicit width. Tables size their border box, cells their content box.
    pub width: Option<Dimension>,
    /// Explicit height.
    pub height: Option<Dimension>,
    /// Minimum width.
    pub min_width: Option<Dimension>,
    /// Maximum width.
    pub max_width: Option<Dimension>,

    /// Padding inside the border.
    #[serde(default)]
    pub padding: Option<Edges>,
    /// Margin outside the border. `Auto` margins center the table.
    #[serde(default)]
    pub margin: Option<EdgeValues<Dimension>>,

    // ── Border ─────────────────────────────────────────────────
    /// Border width for all sides.
    pub border_width: Option<EdgeValues<f64>>,
    /// Border style for all sides. Sides with a width and no style are solid.
    pub border_style: Option<EdgeValues<BorderStyle>>,
    /// Border color for all sides.
    pub border_color: Option<EdgeValues<Color>>,

    // ── Table ──────────────────────────────────────────────────
    /// Column width algorithm.
    pub table_layout: Option<LayoutMode>,
    /// Separated or collapsed borders.
    pub border_collapse: Option<BorderCollapse>,
    /// Gap between cells (separated borders only).
    pub border_spacing: Option<BorderSpacing>,
    /// Vertical position of cell content inside its row.
    pub vertical_align: Option<VerticalAlign>,

    // ── Page Behavior ──────────────────────────────────────────
    /// Whether a table or row group may be split across pages.
    pub break_inside: Option<BreakInside>,
}

/// A dimension that can be points, percentage, or auto.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Fixed size in points (1/72 inch).
    Pt(f64),
    /// Percentage of the containing dimension.
    Percent(f64),
    /// Size determined by content.
    Auto,
}

impl Dimension {
    /// Resolve this dimension given a parent size.
    /// Returns None for Auto.
    pub fn resolve(&self, parent_size: f64) -> Option<f64> {
        match self {
            Dimension::Pt(v) => Some(*v),
            Dimension::Percent(p) => Some(parent_size * p / 100.0),
            Dimension::Auto => None,
        }
    }

    /// The length in points, if this is a length.
    pub fn points(&self) -> Option<f64> {
        match self {
            Dimension::Pt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }
}

/// `table-layout`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Content-aware, two-pass widths.
    #[default]
    Auto,
    /// Widths from columns and the first row only.
    Fixed,
}

/// `border-collapse`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

/// `border-spacing` as a (horizontal, vertical) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderSpacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl BorderSpacing {
    pub fn uniform(v: f64) -> Self {
        Self {
            horizontal: v,
            vertical: v,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
    /// The initial value.
    #[default]
    Baseline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakInside {
    #[default]
    Auto,
    Avoid,
}

/// Which side of the table a caption sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionSide {
    #[default]
    Top,
    Bottom,
}

/// Border line styles, listed from strongest to weakest for collapsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BorderStyle {
    Hidden,
    Double,
    #[default]
    Solid,
    Dashed,
    Dotted,
    Ridge,
    Outset,
    Groove,
    Inset,
    None,
}

impl BorderStyle {
    /// Precedence when two collapsed borders have the same width.
    /// Higher wins. `Hidden` is handled before ranking.
    pub fn rank(&self) -> u8 {
        match self {
            BorderStyle::Hidden => 10,
            BorderStyle::Double => 9,
            BorderStyle::Solid => 8,
            BorderStyle::Dashed => 7,
            BorderStyle::Dotted => 6,
            BorderStyle::Ridge => 5,
            BorderStyle::Outset => 4,
            BorderStyle::Groove => 3,
            BorderStyle::Inset => 2,
            BorderStyle::None => 0,
        }
    }

    /// `none` and `hidden` draw nothing and take no space.
    pub fn is_visible(&self) -> bool {
        !matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0) as f64 / 255.0;
        match hex.len() {
            3 => Self::rgb(
                channel(&hex[0..1].repeat(2)),
                channel(&hex[1..2].repeat(2)),
                channel(&hex[2..3].repeat(2)),
            ),
            6 => Self::rgb(channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
            _ => Color::BLACK,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Values for each edge (top, right, bottom, left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeValues<T: Copy> {
    pub top: T,
    pub right: T,
    pub bottom: T,
    pub left: T,
}

impl<T: Copy> EdgeValues<T> {
    pub fn uniform(v: T) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// Apply `f` to every edge.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> EdgeValues<U> {
        EdgeValues {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

/// One side of a border after style resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderSide {
    pub width: f64,
    pub style: BorderStyle,
    pub color: Color,
}

impl BorderSide {
    pub const NONE: BorderSide = BorderSide {
        width: 0.0,
        style: BorderStyle::None,
        color: Color::BLACK,
    };

    /// The space this border takes in the box model.
    pub fn used_width(&self) -> f64 {
        if self.style.is_visible() {
            self.width.max(0.0)
        } else {
            0.0
        }
    }
}

impl Default for BorderSide {
    fn default() -> Self {
        BorderSide::NONE
    }
}

/// Resolved style: every property has a concrete value.
///
/// Sizes stay as `Dimension` because table percentages resolve against the
/// final table width, which is only known after column resolution.
#[derive(Debug, Clone)]
pub struct ResolvedStyle {
    // Box model
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub max_width: Dimension,
    pub padding: Edges,
    pub margin: EdgeValues<Dimension>,
    pub border: EdgeValues<BorderSide>,

    // Table
    pub table_layout: LayoutMode,
    pub border_collapse: BorderCollapse,
    pub border_spacing: BorderSpacing,
    pub vertical_align: VerticalAlign,

    // Page behavior
    pub avoid_break_inside: bool,
}

impl ResolvedStyle {
    /// Used border widths, with `none` and `hidden` sides counted as zero.
    pub fn border_widths(&self) -> Edges {
        Edges {
            top: self.border.top.used_width(),
            right: self.border.right.used_width(),
            bottom: self.border.bottom.used_width(),
            left: self.border.left.used_width(),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.border_collapse == BorderCollapse::Collapse
    }
}

impl Style {
    /// Resolve this style into concrete values, filling in initial values.
    pub fn resolve(&self) -> ResolvedStyle {
        let widths = self.border_width.unwrap_or(EdgeValues::uniform(0.0));
        let styles = self
            .border_style
            .unwrap_or(EdgeValues::uniform(BorderStyle::Solid));
        let colors = self
            .border_color
            .unwrap_or(EdgeValues::uniform(Color::BLACK));
        let side = |width: f64, style: BorderStyle, color: Color| BorderSide {
            width: if style.is_visible() { width.max(0.0) } else { 0.0 },
            style,
            color,
        };

        ResolvedStyle {
            width: self.width.unwrap_or(Dimension::Auto),
            height: self.height.unwrap_or(Dimension::Auto),
            min_width: self.min_width.unwrap_or(Dimension::Auto),
            max_width: self.max_width.unwrap_or(Dimension::Auto),
            padding: self.padding.unwrap_or_default(),
            margin: self.margin.unwrap_or(EdgeValues::uniform(Dimension::Pt(0.0))),
            border: EdgeValues {
                top: side(widths.top, styles.top, colors.top),
                right: side(widths.right, styles.right, colors.right),
                bottom: side(widths.bottom, styles.bottom, colors.bottom),
                left: side(widths.left, styles.left, colors.left),
            },
            table_layout: self.table_layout.unwrap_or_default(),
            border_collapse: self.border_collapse.unwrap_or_default(),
            border_spacing: self.border_spacing.unwrap_or_default(),
            vertical_align: self.vertical_align.unwrap_or_default(),
            avoid_break_inside: self.break_inside == Some(BreakInside::Avoid),
        }
    }
}
