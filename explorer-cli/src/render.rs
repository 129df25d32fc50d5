use std::fmt::Write;

use chrono::Local;
use explorer_core::{TravelBrief, TravelInfo};

pub fn travel_info(info: &TravelInfo) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_info(&mut out, info);
    out
}

pub fn brief(brief: &TravelBrief, with_sources: bool) -> String {
    let mut out = String::new();
    let _ = write_brief(&mut out, brief, with_sources);
    out
}

fn write_brief(out: &mut String, brief: &TravelBrief, with_sources: bool) -> std::fmt::Result {
    let fetched = brief.fetched_at.with_timezone(&Local);
    writeln!(
        out,
        "Travel brief for {} ({})\n",
        brief.location,
        fetched.format("%Y-%m-%d %H:%M")
    )?;
    write_info(out, &brief.info)?;

    if with_sources {
        writeln!(out, "\nSources")?;
        if brief.sources.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for chunk in &brief.sources {
            let source = chunk.source();
            writeln!(out, "  [{}] {} - {}", chunk.kind(), source.title, source.uri)?;
        }
    }

    Ok(())
}

fn write_info(out: &mut String, info: &TravelInfo) -> std::fmt::Result {
    writeln!(out, "Weather")?;
    writeln!(out, "  Temp:      {}", info.weather.temperature)?;
    writeln!(out, "  Condition: {}", info.weather.condition)?;
    writeln!(out, "  Humidity:  {}", info.weather.humidity)?;
    writeln!(out, "  Wind:      {}", info.weather.wind_speed)?;

    writeln!(out, "\nAir Quality")?;
    writeln!(out, "  AQI Value: {}", info.aqi.value)?;
    writeln!(out, "  Category:  {}", info.aqi.category)?;

    writeln!(out, "\nWhat to Wear")?;
    if info.clothing.is_empty() {
        writeln!(out, "  No suggestions available.")?;
    }
    for item in &info.clothing {
        writeln!(out, "  - {item}")?;
    }

    writeln!(out, "\nPlaces to Visit")?;
    if info.places_to_visit.is_empty() {
        writeln!(out, "  No places found.")?;
    }
    for (i, place) in info.places_to_visit.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, place.name)?;
        writeln!(out, "     {}", place.description)?;
    }

    Ok(())
}
