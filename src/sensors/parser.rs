//! Classification of the station's text output.
//!
//! The device prints one measurement per line, e.g.
//!
//! ```text
//! Hava Sıcaklığı: 23.5C
//! Hava Nemi: 45%
//! Basınç: 1013.2hPa
//! ```
//!
//! Each line is matched against [`LINE_PATTERNS`] in order; the first prefix
//! that matches decides the target field.

use super::models::SensorField;

/// A recognised line shape: prefix, destination field and optional unit suffix.
#[derive(Debug, Clone, Copy)]
pub struct LinePattern {
    pub prefix: &'static str,
    pub field: SensorField,
    pub unit: Option<&'static str>,
}

/// Ordered; first match wins.
///
/// `Sulama` carries no colon in its prefix, so any line starting with that
/// word is routed to irrigation.
#[rustfmt::skip]
pub const LINE_PATTERNS: &[LinePattern] = &[
    LinePattern { prefix: "Hava Sıcaklığı:",   field: SensorField::Temperature,     unit: Some("C") },
    LinePattern { prefix: "Hava Nemi:",        field: SensorField::Humidity,        unit: Some("%") },
    LinePattern { prefix: "Basınç:",           field: SensorField::Pressure,        unit: Some("hPa") },
    LinePattern { prefix: "Toprak Nemi:",      field: SensorField::SoilMoisture,    unit: None },
    LinePattern { prefix: "Toprak Sıcaklığı:", field: SensorField::SoilTemperature, unit: Some("C") },
    LinePattern { prefix: "SU SEVİYESİ:",      field: SensorField::WaterLevel,      unit: Some("%") },
    LinePattern { prefix: "Rüzgar:",           field: SensorField::Wind,            unit: None },
    LinePattern { prefix: "Sulama",            field: SensorField::Irrigation,      unit: None },
];

/// A successfully classified line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub field: SensorField,
    pub value: String,
}

/// Classify a raw line. Returns `None` for anything unrecognised.
pub fn parse_line(raw: &str) -> Option<ParsedLine> {
    let line = raw.trim();
    let pattern = LINE_PATTERNS.iter().find(|p| line.starts_with(p.prefix))?;

    // Everything after the first colon; a prefix match without one (only
    // possible for "Sulama") has no value to extract.
    let (_, rest) = line.split_once(':')?;
    let mut value = rest.trim();
    if let Some(unit) = pattern.unit {
        value = value.strip_suffix(unit).unwrap_or(value).trim_end();
    }

    Some(ParsedLine {
        field: pattern.field,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(field: SensorField, value: &str) -> Option<ParsedLine> {
        Some(ParsedLine {
            field,
            value: value.to_owned(),
        })
    }

    #[test]
    fn temperature_strips_celsius_unit() {
        assert_eq!(
            parse_line("Hava Sıcaklığı: 23.5C"),
            parsed(SensorField::Temperature, "23.5")
        );
    }

    #[test]
    fn every_known_prefix_is_classified() {
        let cases = [
            ("Hava Nemi: 45.2%", SensorField::Humidity, "45.2"),
            ("Basınç: 1013.25hPa", SensorField::Pressure, "1013.25"),
            ("Toprak Nemi: Kuru", SensorField::SoilMoisture, "Kuru"),
            ("Toprak Sıcaklığı: 18.1 C", SensorField::SoilTemperature, "18.1"),
            ("SU SEVİYESİ: 70%", SensorField::WaterLevel, "70"),
            ("Rüzgar: 12 km/h", SensorField::Wind, "12 km/h"),
            ("Sulama: Açık", SensorField::Irrigation, "Açık"),
        ];

        for (line, field, value) in cases {
            assert_eq!(parse_line(line), parsed(field, value), "line: {line}");
        }
    }

    #[test]
    fn surrounding_whitespace_and_carriage_return_are_ignored() {
        assert_eq!(
            parse_line("  Hava Nemi: 50%\r"),
            parsed(SensorField::Humidity, "50")
        );
    }

    #[test]
    fn fields_without_unit_keep_their_suffix() {
        // Only listed units are stripped; "C" at the end of a wind reading stays.
        assert_eq!(parse_line("Rüzgar: NNC"), parsed(SensorField::Wind, "NNC"));
    }

    #[test]
    fn value_is_everything_after_the_first_colon() {
        assert_eq!(
            parse_line("Sulama: 06:30 başladı"),
            parsed(SensorField::Irrigation, "06:30 başladı")
        );
    }

    #[test]
    fn irrigation_prefix_matches_without_colon_directly_after_it() {
        assert_eq!(
            parse_line("Sulama durumu: Kapalı"),
            parsed(SensorField::Irrigation, "Kapalı")
        );
    }

    #[test]
    fn irrigation_without_colon_is_unrecognised() {
        assert_eq!(parse_line("Sulama başladı"), None);
    }

    #[test]
    fn unknown_and_empty_lines_are_unrecognised() {
        assert_eq!(parse_line("Sistem hazır"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn prefixes_are_case_sensitive() {
        assert_eq!(parse_line("hava nemi: 40%"), None);
    }

    #[test]
    fn empty_value_is_kept() {
        assert_eq!(
            parse_line("Hava Sıcaklığı: C"),
            parsed(SensorField::Temperature, "")
        );
    }
}
