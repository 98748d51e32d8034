//! GGA field extraction.
//!
//! The parser walks a captured sentence once, splitting on `,` and routing the
//! characters of each token through [`FIELD_MAP`]. Tokens missing from the map
//! (fix quality, HDOP, the DGPS fields) are skipped.
//!
//! ## Token layout
//!
//! ```text
//! $GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47
//!        1      2        3 4         5 6 7  8   9     10 11  12
//! ```

use crate::consts::{FIELD_DELIMITER, SENTENCE_END, SENTENCE_PREFIX_LEN};
use crate::fix::{FixField, TelemetryFix};
use crate::sentence::LatestReading;

/// Token index to fix field. Token 1 is the first field after the sentence type.
pub const FIELD_MAP: [(u8, FixField); 10] = [
    (1, FixField::Time),
    (2, FixField::Latitude),
    (3, FixField::LatitudeDir),
    (4, FixField::Longitude),
    (5, FixField::LongitudeDir),
    (7, FixField::Satellites),
    (9, FixField::Altitude),
    (10, FixField::AltitudeUnit),
    (11, FixField::GeoidSeparation),
    (12, FixField::GeoidSeparationUnit),
];

/// Highest token index present in [`FIELD_MAP`]; scanning stops after it.
pub const LAST_MAPPED_TOKEN: u8 = 12;

/// Looks up the destination of token `index`.
pub fn field_for(index: u8) -> Option<FixField> {
    FIELD_MAP
        .iter()
        .find(|(token, _)| *token == index)
        .map(|&(_, field)| field)
}

/// Extracts the fields of `sentence` into a new fix.
///
/// Bytes after `*` and bytes that are not printable ASCII are ignored.
pub fn parse_sentence(sentence: &[u8]) -> TelemetryFix {
    let mut fix = TelemetryFix::default();
    let mut token: u8 = 1;

    for &byte in sentence.iter().skip(SENTENCE_PREFIX_LEN) {
        match byte {
            SENTENCE_END => break,
            FIELD_DELIMITER => {
                token += 1;
                if token > LAST_MAPPED_TOKEN {
                    break;
                }
            }
            b if b.is_ascii_graphic() => {
                if let Some(field) = field_for(token) {
                    fix.apply(field, char::from(b));
                }
            }
            _ => {}
        }
    }

    fix
}

/// Parses the latest reading into `fix` if it has not been parsed yet.
///
/// The whole fix is replaced by the new sentence's fields and the reading is
/// marked parsed. Returns `false` without touching `fix` when there was nothing
/// new to parse.
pub fn parse(latest: &mut LatestReading, fix: &mut TelemetryFix) -> bool {
    if latest.is_parsed() {
        return false;
    }
    *fix = parse_sentence(latest.bytes());
    latest.mark_parsed();
    trace!("fix parsed, {} satellites", fix.satellites.as_str());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::{SentenceFilter, SentenceSync};

    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    fn capture(bytes: &[u8]) -> LatestReading {
        let mut sync = SentenceSync::new(SentenceFilter::GGA);
        let mut latest = LatestReading::new();
        for &b in bytes {
            let _ = sync.feed(b, &mut latest);
        }
        latest
    }

    #[test]
    fn test_reference_sentence_fields() {
        let fix = parse_sentence(GGA);
        assert_eq!(fix.time, "123519");
        assert_eq!(fix.latitude, "4807.038");
        assert_eq!(fix.latitude_dir, "N");
        assert_eq!(fix.longitude, "01131.000");
        assert_eq!(fix.longitude_dir, "E");
        assert_eq!(fix.satellites, "08");
        assert_eq!(fix.altitude, "545.4");
        assert_eq!(fix.altitude_unit, "M");
        assert_eq!(fix.geoid_separation, "46.9");
        assert_eq!(fix.geoid_separation_unit, "M");
    }

    #[test]
    fn test_skipped_tokens_are_discarded() {
        assert_eq!(field_for(6), None);
        assert_eq!(field_for(8), None);
        assert_eq!(field_for(13), None);
        assert_eq!(field_for(9), Some(FixField::Altitude));
    }

    #[test]
    fn test_parse_sets_flag_once() {
        let mut latest = capture(GGA);
        let mut fix = TelemetryFix::default();

        assert!(!latest.is_parsed());
        assert!(parse(&mut latest, &mut fix));
        assert!(latest.is_parsed());
        assert_eq!(fix.altitude, "545.4");

        fix.altitude.clear();
        assert!(!parse(&mut latest, &mut fix));
        assert!(fix.altitude.is_empty());
    }

    #[test]
    fn test_no_fix_sentence_replaces_previous_fix() {
        let mut fix = parse_sentence(GGA);
        let mut latest = capture(b"$GNGGA,235959.00,,,,,0,00,99.99,,,,,,*7B\r\n");
        assert!(parse(&mut latest, &mut fix));
        assert_eq!(fix.time, "235959.00");
        assert!(fix.latitude.is_empty());
        assert!(fix.altitude_unit.is_empty());
        assert_eq!(fix.satellites, "00");
    }

    #[test]
    fn test_truncated_sentence_keeps_what_arrived() {
        let fix = parse_sentence(b"$GPGGA,123519,4807.0");
        assert_eq!(fix.time, "123519");
        assert_eq!(fix.latitude, "4807.0");
        assert!(fix.longitude.is_empty());
    }

    #[test]
    fn test_noise_bytes_dropped() {
        let fix = parse_sentence(b"$GPGGA,12\x0035\xff19,*");
        assert_eq!(fix.time, "123519");
    }
}
