// Feed body parsing - newline-delimited timestamped samples
use crate::domain::reading::Reading;

/// Extract the most recent valid reading from a raw feed body.
///
/// Data lines start with a 4-digit-year ISO date; everything else
/// (column headers, blank lines) is ignored. Feeds are chronologically
/// ordered, so the last surviving line is the most recent sample. A body
/// with nothing parseable yields `None`, which is "no reading", not an
/// error.
pub fn latest_reading(body: &str) -> Option<Reading> {
    let line = body
        .lines()
        .map(str::trim)
        .filter(|line| has_iso_date_prefix(line))
        .last()?;

    let mut fields = line.split(',');
    let timestamp = fields.next()?.trim();
    let value: f64 = fields.next()?.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    // The timestamp is not validated here. A malformed one still reaches
    // the caller, where staleness checking treats it as stale.
    Some(Reading::new(timestamp, value))
}

/// True when the line starts like "2025-": four ASCII digits and a dash.
fn has_iso_date_prefix(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(|b| b.is_ascii_digit()) && bytes[4] == b'-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_data_line_wins() {
        // Last in file, not first and not the maximum value.
        let body = "2025-01-01T00:00:00.000Z,3.4\n\
                    2025-01-01T12:00:00.000Z,9.9\n\
                    2025-01-02T00:00:00.000Z,3.6";
        let reading = latest_reading(body).expect("should parse");
        assert_eq!(reading.value, 3.6);
        assert_eq!(reading.timestamp, "2025-01-02T00:00:00.000Z");
    }

    #[test]
    fn test_headers_and_blank_lines_are_ignored() {
        let body = "Timestamp,Turbidity (FNU)\n\
                    \n\
                    #disclaimer: provisional data\n\
                    2025-01-02T00:00:00.000Z,3.6\n\
                    \n";
        let reading = latest_reading(body).expect("should parse");
        assert_eq!(reading.value, 3.6);
    }

    #[test]
    fn test_no_matching_line_yields_no_reading() {
        assert_eq!(latest_reading(""), None);
        assert_eq!(latest_reading("Timestamp,Value\nno data today"), None);
        assert_eq!(latest_reading("spring sample,3.6"), None);
    }

    #[test]
    fn test_too_few_fields_yields_no_reading() {
        assert_eq!(latest_reading("2025-01-02T00:00:00.000Z"), None);
    }

    #[test]
    fn test_non_numeric_value_yields_no_reading() {
        assert_eq!(latest_reading("2025-01-02T00:00:00.000Z,n/a"), None);
    }

    #[test]
    fn test_non_finite_value_yields_no_reading() {
        // "NaN" and "inf" parse as f64 but are not usable samples.
        assert_eq!(latest_reading("2025-01-02T00:00:00.000Z,NaN"), None);
        assert_eq!(latest_reading("2025-01-02T00:00:00.000Z,inf"), None);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let reading =
            latest_reading("2025-01-02T00:00:00.000Z,3.6,P,logger-07").expect("should parse");
        assert_eq!(reading.value, 3.6);
    }

    #[test]
    fn test_crlf_line_endings_are_trimmed() {
        let reading =
            latest_reading("2025-01-01T00:00:00.000Z,3.4\r\n2025-01-02T00:00:00.000Z,3.6\r\n")
                .expect("should parse");
        assert_eq!(reading.value, 3.6);
    }

    #[test]
    fn test_malformed_timestamp_passes_through() {
        // The prefix matches, so the line is taken; the bogus timestamp
        // is the staleness checker's problem, not a parse failure.
        let reading = latest_reading("2025-99-99T99:99:99,3.6").expect("should parse");
        assert_eq!(reading.timestamp, "2025-99-99T99:99:99");
        assert_eq!(reading.value, 3.6);
    }
}
