//! Markdown → [`TravelInfo`] extraction.
//!
//! The backend is asked for a fixed layout (see [`crate::prompt`]) but the
//! answer is free-form model output, so every rule here is lenient: anything
//! that does not match is skipped and the corresponding field keeps its
//! default. [`parse_travel_info`] never fails.
//!
//! When the same section appears more than once, weather and AQI fields are
//! overwritten only by labels the later section actually contains, while the
//! clothing and places lists are replaced by the last section of that kind.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::model::{AqiData, Place, TravelInfo, WeatherData};

static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-[ \t]*|[*+][ \t]+)").expect("valid bullet regex"));

/// `1. **Name:** description`, `1. **Name**: description` or `1. Name: description`,
/// anywhere in the line.
static PLACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\d+\.\s+(?:\*\*(?P<bold>.+?)(?::\*\*|\*\*:)|(?P<plain>[^:]*?):)\s*(?P<desc>.*)$",
    )
    .expect("valid place line regex")
});

/// Top-level sections the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Weather,
    AirQuality,
    Clothing,
    Places,
    /// Anything else the model decided to add.
    Unknown,
}

impl SectionKind {
    const PREFIXES: [(&'static str, SectionKind); 4] = [
        ("Weather", SectionKind::Weather),
        ("Air Quality Index", SectionKind::AirQuality),
        ("Recommended Clothing", SectionKind::Clothing),
        ("Places to Visit", SectionKind::Places),
    ];

    /// Classify a section by its (trimmed) header, case-sensitive prefix match.
    pub fn classify(header: &str) -> Self {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| header.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(SectionKind::Unknown)
    }
}

/// One `# ` delimited fragment of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub header: &'a str,
    pub body: Vec<&'a str>,
}

impl Section<'_> {
    pub fn kind(&self) -> SectionKind {
        SectionKind::classify(self.header)
    }
}

fn header_marker_rest(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        None => Some(rest),
        _ => None,
    }
}

/// Split a document on top-level header lines.
///
/// Text before the first header forms a fragment of its own; its first
/// non-blank line acts as the header. Blank fragments are discarded.
pub fn split_sections(markdown: &str) -> Vec<Section<'_>> {
    let mut fragments: Vec<Vec<&str>> = vec![Vec::new()];

    for line in markdown.lines() {
        match header_marker_rest(line) {
            Some(rest) => fragments.push(vec![rest]),
            None => {
                if let Some(current) = fragments.last_mut() {
                    current.push(line);
                }
            }
        }
    }

    fragments
        .into_iter()
        .filter_map(|lines| {
            let mut lines = lines.into_iter().skip_while(|l| l.trim().is_empty());
            let header = lines.next()?.trim();
            Some(Section {
                header,
                body: lines.collect(),
            })
        })
        .collect()
}

/// `**Label:** value` or `**Label**: value`, value running to end of line.
fn labeled_field(label: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"\*\*{}(?::\*\*|\*\*:)[ \t]*([^\n]*)",
        regex::escape(label)
    ))
    .ok()
}

/// First value for `label` written as a bold label, trimmed.
///
/// Each label is searched on its own, so several labels may share a line.
/// Returns `None` when the label is absent or its value is empty.
pub fn extract_labeled(lines: &[&str], label: &str) -> Option<String> {
    let pattern = labeled_field(label)?;
    lines
        .iter()
        .find_map(|line| pattern.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .filter(|value| !value.is_empty())
}

fn set_if_present(target: &mut String, lines: &[&str], label: &str) {
    if let Some(value) = extract_labeled(lines, label) {
        *target = value;
    }
}

pub fn apply_weather(weather: &mut WeatherData, lines: &[&str]) {
    set_if_present(&mut weather.temperature, lines, "Temperature");
    set_if_present(&mut weather.condition, lines, "Condition");
    set_if_present(&mut weather.humidity, lines, "Humidity");
    set_if_present(&mut weather.wind_speed, lines, "Wind Speed");
}

pub fn apply_aqi(aqi: &mut AqiData, lines: &[&str]) {
    set_if_present(&mut aqi.value, lines, "AQI Value");
    set_if_present(&mut aqi.category, lines, "Category");
}

/// Strip one bullet marker from a clothing line; `None` if nothing is left.
pub fn parse_clothing_item(line: &str) -> Option<String> {
    let line = line.trim();
    let item = BULLET_MARKER.replace(line, "");
    let item = item.trim();
    (!item.is_empty()).then(|| item.to_string())
}

/// Parse a numbered `Name: description` line. Bold names win over plain.
pub fn parse_place_line(line: &str) -> Option<Place> {
    let caps = PLACE_LINE.captures(line)?;

    let name = caps
        .name("bold")
        .or_else(|| caps.name("plain"))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();
    let description = caps
        .name("desc")
        .map(|m| m.as_str().trim())
        .unwrap_or_default();

    if name.is_empty() || description.is_empty() {
        return None;
    }

    Some(Place {
        name: name.to_string(),
        description: description.to_string(),
    })
}

/// Parse the backend's markdown into a fully populated [`TravelInfo`].
pub fn parse_travel_info(markdown: &str) -> TravelInfo {
    let mut info = TravelInfo::default();
    let sections = split_sections(markdown);
    debug!(sections = sections.len(), "parsing travel brief");

    for section in &sections {
        let mut lines = Vec::with_capacity(section.body.len() + 1);
        lines.push(section.header);
        lines.extend_from_slice(&section.body);

        match section.kind() {
            SectionKind::Weather => apply_weather(&mut info.weather, &lines),
            SectionKind::AirQuality => apply_aqi(&mut info.aqi, &lines),
            SectionKind::Clothing => {
                info.clothing = section
                    .body
                    .iter()
                    .copied()
                    .filter_map(parse_clothing_item)
                    .collect();
            }
            SectionKind::Places => {
                info.places_to_visit = section
                    .body
                    .iter()
                    .copied()
                    .filter_map(parse_place_line)
                    .collect();
            }
            SectionKind::Unknown => trace!(header = section.header, "ignoring section"),
        }
    }

    info
}
