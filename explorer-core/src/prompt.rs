//! Instruction text sent to the search-grounded backend.
//!
//! The section headers and bold labels here are exactly what
//! [`crate::parser`] looks for; change them together.

pub const WEATHER_HEADER: &str = "Weather";
pub const AQI_HEADER: &str = "Air Quality Index (AQI)";
pub const CLOTHING_HEADER: &str = "Recommended Clothing";
pub const PLACES_HEADER: &str = "Places to Visit";

/// Build the travel brief instruction for `location`.
pub fn build_prompt(location: &str) -> String {
    format!(
        r#"Provide a comprehensive travel guide for "{location}". Use Google Search to find the most up-to-date information for all sections.

Your response MUST be in Markdown format and STRICTLY follow this structure, including the exact headers:

# {WEATHER_HEADER}
- **Temperature:** [Current temperature in Celsius]
- **Condition:** [e.g., Sunny, Cloudy, Rain]
- **Humidity:** [Percentage]
- **Wind Speed:** [in km/h]

# {AQI_HEADER}
- **AQI Value:** [Numeric value]
- **Category:** [e.g., Good, Moderate, Unhealthy]

# {CLOTHING_HEADER}
- [Clothing item 1]
- [Clothing item 2]
- [Clothing item 3]

# {PLACES_HEADER}
1. **[Place Name 1]:** [Direct Google Maps link]
2. **[Place Name 2]:** [Direct Google Maps link]
3. **[Place Name 3]:** [Direct Google Maps link]

Ensure all information is current and accurate. Do not add any introductory or concluding text outside of this structure.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_location() {
        let prompt = build_prompt("Kyoto, Japan");
        assert!(prompt.contains("travel guide for \"Kyoto, Japan\""));
    }

    #[test]
    fn prompt_lists_sections_in_order() {
        let prompt = build_prompt("Lisbon");

        let positions: Vec<usize> = [
            "# Weather",
            "# Air Quality Index (AQI)",
            "# Recommended Clothing",
            "# Places to Visit",
        ]
        .iter()
        .map(|h| prompt.find(h).expect("header present"))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prompt_uses_labels_the_parser_expects() {
        let prompt = build_prompt("Lisbon");

        for label in [
            "**Temperature:**",
            "**Condition:**",
            "**Humidity:**",
            "**Wind Speed:**",
            "**AQI Value:**",
            "**Category:**",
        ] {
            assert!(prompt.contains(label), "missing {label}");
        }
        assert!(prompt.contains("1. **[Place Name 1]:**"));
    }
}
