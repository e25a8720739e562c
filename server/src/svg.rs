use std::sync::Arc;

use itertools::Itertools;
use num_format::{Locale, ToFormattedString};
use rocket::FromFormField;
use shared::{ContributionDay, ContributionSequence, DayOfWeek, GridPosition, Level, DAYS_PER_WEEK};
use usvg::{fontdb, Options, Tree};
use utoipa::ToSchema;

const FONT_FAMILY: &str = "Inter, -apple-system, Segoe UI, Helvetica, Arial, sans-serif";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromFormField, ToSchema)]
pub enum Mode {
    Dark,
    #[default]
    Light,
}

impl Mode {
    pub const fn palette(self) -> [&'static str; 5] {
        match self {
            Mode::Light => ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
            Mode::Dark => ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"],
        }
    }

    pub const fn color(self, level: Level) -> &'static str {
        self.palette()[level.value() as usize]
    }

    const fn background(self) -> &'static str {
        match self {
            Mode::Light => "#ffffff",
            Mode::Dark => "#0d1117",
        }
    }

    const fn text(self) -> &'static str {
        match self {
            Mode::Light => "#57606a",
            Mode::Dark => "#8b949e",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromFormField, ToSchema)]
pub enum View {
    #[default]
    Flat,
    Isometric,
}

pub fn generate_heatmap_svg(
    username: &str,
    sequence: &ContributionSequence,
    mode: Mode,
    view: View,
) -> shared::Result<String> {
    if sequence.is_empty() {
        return Err(shared::Error::EmptyInput("cannot render a heatmap without days"));
    }

    let header = format!(
        "{} contributions in the last {} days",
        sequence.total_contributions().to_formatted_string(&Locale::en),
        sequence.len().to_formatted_string(&Locale::en),
    );

    Ok(match view {
        View::Flat => flat(username, sequence, mode, &header),
        View::Isometric => isometric(username, sequence, mode, &header),
    })
}

pub fn generate_heatmap_png(svg: &str, fontdb: Arc<fontdb::Database>) -> anyhow::Result<Vec<u8>> {
    let tree = Tree::from_str(
        svg,
        &Options {
            fontdb,
            ..Default::default()
        },
    )?;

    let pixmap_size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(pixmap_size.width(), pixmap_size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to create pixmap"))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap.encode_png()?)
}

fn tooltip(day: &ContributionDay) -> String {
    let noun = if day.count == 1 {
        "contribution"
    } else {
        "contributions"
    };
    format!("<title>{} {noun} on {}</title>", day.count, day.date)
}

fn open_svg(width: f64, height: f64, username: &str, mode: Mode) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{width:.0}' height='{height:.0}' \
         viewBox='0 0 {width:.0} {height:.0}' font-family='{FONT_FAMILY}'>\
         <desc>Contribution heatmap for {username}</desc>\
         <rect width='100%' height='100%' fill='{}'/>",
        mode.background()
    )
}

// Approximate advance of a glyph, used to keep text inside the canvas.
fn text_width(content: &str, size: u32) -> f64 {
    content.chars().count() as f64 * f64::from(size) * 0.6
}

fn header_width(header: &str) -> f64 {
    MARGIN + text_width(header, HEADER_SIZE) + MARGIN
}

fn text(x: f64, y: f64, size: u32, fill: &str, anchor: &str, content: &str) -> String {
    format!(
        "<text x='{x:.1}' y='{y:.1}' font-size='{size}' fill='{fill}' text-anchor='{anchor}'>{content}</text>"
    )
}

const CELL: f64 = 10.0;
const PITCH: f64 = 13.0;
const LEFT: f64 = 36.0;
const TOP: f64 = 44.0;
const MARGIN: f64 = 12.0;
const HEADER_SIZE: u32 = 14;
const LEGEND_SIZE: u32 = 9;
// Room right of the last legend square for the "More" label.
const LEGEND_TAIL: f64 = 30.0;

fn flat(username: &str, sequence: &ContributionSequence, mode: Mode, header: &str) -> String {
    let width = (LEFT + sequence.week_count() as f64 * PITCH + MARGIN)
        .max(header_width(header))
        .max(MARGIN + legend_width() + MARGIN);
    let grid_bottom = TOP + DAYS_PER_WEEK as f64 * PITCH;
    let height = grid_bottom + 28.0;
    let muted = mode.text();

    let mut svg = open_svg(width, height, username, mode);
    svg.push_str(&text(MARGIN, 18.0, HEADER_SIZE, muted, "start", header));

    for label in sequence.month_labels() {
        let x = LEFT + label.week as f64 * PITCH;
        svg.push_str(&text(x, TOP - 6.0, 10, muted, "start", &label.name));
    }

    // Rows are positional, so their labels follow whatever weekday the window opens on.
    for (row, day) in sequence.iter().take(DAYS_PER_WEEK).enumerate() {
        let weekday = DayOfWeek::of(day.date);
        if matches!(weekday, DayOfWeek::Monday | DayOfWeek::Wednesday | DayOfWeek::Friday) {
            let y = TOP + row as f64 * PITCH + CELL - 1.0;
            svg.push_str(&text(LEFT - 6.0, y, 9, muted, "end", weekday.short_name()));
        }
    }

    for (GridPosition { week, day: row }, day) in sequence.positioned() {
        svg.push_str(&format!(
            "<rect x='{:.1}' y='{:.1}' width='{CELL}' height='{CELL}' rx='2' ry='2' fill='{}'>{}</rect>",
            LEFT + week as f64 * PITCH,
            TOP + row as f64 * PITCH,
            mode.color(day.level()),
            tooltip(day),
        ));
    }

    svg.push_str(&legend(width - MARGIN, grid_bottom + 16.0, mode));
    svg.push_str("</svg>");
    svg
}

/// Horizontal extent of the legend, measured from its right edge.
fn legend_width() -> f64 {
    LEGEND_TAIL + 5.0 * PITCH + 4.0 + text_width("Less", LEGEND_SIZE)
}

fn legend(right: f64, y: f64, mode: Mode) -> String {
    let muted = mode.text();
    let squares_start = right - LEGEND_TAIL - 5.0 * PITCH;
    let mut legend = text(squares_start - 4.0, y + CELL - 1.0, LEGEND_SIZE, muted, "end", "Less");
    for (index, color) in mode.palette().iter().enumerate() {
        legend.push_str(&format!(
            "<rect x='{:.1}' y='{y:.1}' width='{CELL}' height='{CELL}' rx='2' ry='2' fill='{color}'/>",
            squares_start + index as f64 * PITCH,
        ));
    }
    legend.push_str(&text(right, y + CELL - 1.0, LEGEND_SIZE, muted, "end", "More"));
    legend
}

// Isometric projection: a week steps right and down, a weekday steps left and down.
const ISO_DX: f64 = 8.0;
const ISO_DY: f64 = 4.0;
const ISO_HW: f64 = 7.2;
const ISO_HH: f64 = 3.6;
const UNIT: f64 = 10.0;

pub fn cube_height(count: u32) -> f64 {
    f64::from(count) * 0.3 + 0.1
}

fn isometric(username: &str, sequence: &ContributionSequence, mode: Mode, header: &str) -> String {
    let weeks = sequence.week_count() as f64;
    let rows = (DAYS_PER_WEEK - 1) as f64;
    let tallest = cube_height(sequence.max_count()) * UNIT;

    let origin_x = MARGIN + rows * ISO_DX + ISO_HW;
    let origin_y = TOP + tallest + ISO_HH;
    let width = (origin_x + (weeks - 1.0) * ISO_DX + ISO_HW + MARGIN).max(header_width(header));
    let height = origin_y + (weeks - 1.0 + rows) * ISO_DY + ISO_HH + MARGIN;

    let mut svg = open_svg(width, height, username, mode);
    svg.push_str(&text(MARGIN, 18.0, HEADER_SIZE, mode.text(), "start", header));

    let cubes = sequence
        .positioned()
        .sorted_by_key(|(position, _)| (position.week + position.day, position.week));
    for (position, day) in cubes {
        let x = origin_x + (position.week as f64 - position.day as f64) * ISO_DX;
        let y = origin_y + (position.week + position.day) as f64 * ISO_DY;
        svg.push_str(&cube(x, y, day, mode));
    }

    svg.push_str("</svg>");
    svg
}

fn cube(x: f64, y: f64, day: &ContributionDay, mode: Mode) -> String {
    let top_y = y - cube_height(day.count) * UNIT;
    let color = mode.color(day.level());

    let top = [
        (x, top_y - ISO_HH),
        (x + ISO_HW, top_y),
        (x, top_y + ISO_HH),
        (x - ISO_HW, top_y),
    ];
    let left = [
        (x - ISO_HW, top_y),
        (x, top_y + ISO_HH),
        (x, y + ISO_HH),
        (x - ISO_HW, y),
    ];
    let right = [
        (x, top_y + ISO_HH),
        (x + ISO_HW, top_y),
        (x + ISO_HW, y),
        (x, y + ISO_HH),
    ];

    format!(
        "<g>{}{}{}{}</g>",
        tooltip(day),
        polygon(&left, &shade(color, 0.75)),
        polygon(&right, &shade(color, 0.6)),
        polygon(&top, color),
    )
}

fn polygon(points: &[(f64, f64)], fill: &str) -> String {
    let points = points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .join(" ");
    format!("<polygon points='{points}' fill='{fill}'/>")
}

/// Darkens a `#rrggbb` color, returning the input unchanged if it isn't one.
fn shade(color: &str, factor: f64) -> String {
    let Some(hex) = color.strip_prefix('#').filter(|hex| hex.len() == 6) else {
        return color.to_string();
    };
    let channels: Option<Vec<u8>> = (0..3)
        .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
        .collect();
    match channels {
        Some(channels) => format!(
            "#{}",
            channels
                .into_iter()
                .map(|c| format!("{:02x}", (f64::from(c) * factor).round() as u8))
                .join("")
        ),
        None => color.to_string(),
    }
}
