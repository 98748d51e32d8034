//! The latest navigation fix, kept as raw ASCII.
//!
//! Fields are stored exactly as they appeared in the sentence, never converted to
//! numbers, so the downlink carries the receiver's own formatting. Capacities
//! follow the widest value a GGA sentence produces for each field; anything
//! longer is cut at the capacity.

use heapless::String;

/// Capacity of the UTC time field (`hhmmss.ss`).
pub const TIME_LEN: usize = 9;
/// Capacity of the latitude field (`ddmm.mmmmm`).
pub const LATITUDE_LEN: usize = 10;
/// Capacity of the longitude field (`dddmm.mmmm`).
pub const LONGITUDE_LEN: usize = 10;
/// Capacity of the satellite count field.
pub const SATELLITES_LEN: usize = 2;
/// Capacity of the altitude field.
pub const ALTITUDE_LEN: usize = 7;
/// Capacity of the geoidal separation field.
pub const GEOID_SEPARATION_LEN: usize = 7;
/// Capacity of single-letter fields (directions and units).
pub const LETTER_LEN: usize = 1;

/// One navigation solution as reported by the receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TelemetryFix {
    /// UTC time of the fix.
    pub time: String<TIME_LEN>,
    /// Latitude.
    pub latitude: String<LATITUDE_LEN>,
    /// `N` or `S`.
    pub latitude_dir: String<LETTER_LEN>,
    /// Longitude.
    pub longitude: String<LONGITUDE_LEN>,
    /// `E` or `W`.
    pub longitude_dir: String<LETTER_LEN>,
    /// Number of satellites in use.
    pub satellites: String<SATELLITES_LEN>,
    /// Altitude above mean sea level.
    pub altitude: String<ALTITUDE_LEN>,
    /// Altitude unit, normally `M`.
    pub altitude_unit: String<LETTER_LEN>,
    /// Geoidal separation.
    pub geoid_separation: String<GEOID_SEPARATION_LEN>,
    /// Geoidal separation unit, normally `M`.
    pub geoid_separation_unit: String<LETTER_LEN>,
}

/// Destination of a token in the field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixField {
    /// [`TelemetryFix::time`]
    Time,
    /// [`TelemetryFix::latitude`]
    Latitude,
    /// [`TelemetryFix::latitude_dir`]
    LatitudeDir,
    /// [`TelemetryFix::longitude`]
    Longitude,
    /// [`TelemetryFix::longitude_dir`]
    LongitudeDir,
    /// [`TelemetryFix::satellites`]
    Satellites,
    /// [`TelemetryFix::altitude`]
    Altitude,
    /// [`TelemetryFix::altitude_unit`]
    AltitudeUnit,
    /// [`TelemetryFix::geoid_separation`]
    GeoidSeparation,
    /// [`TelemetryFix::geoid_separation_unit`]
    GeoidSeparationUnit,
}

impl TelemetryFix {
    /// Adds one character to `field`.
    ///
    /// Multi-character fields accumulate up to their capacity; single-letter
    /// fields are overwritten so the last letter of the token wins.
    pub fn apply(&mut self, field: FixField, ch: char) {
        match field {
            FixField::Time => append(&mut self.time, ch),
            FixField::Latitude => append(&mut self.latitude, ch),
            FixField::LatitudeDir => overwrite(&mut self.latitude_dir, ch),
            FixField::Longitude => append(&mut self.longitude, ch),
            FixField::LongitudeDir => overwrite(&mut self.longitude_dir, ch),
            FixField::Satellites => append(&mut self.satellites, ch),
            FixField::Altitude => append(&mut self.altitude, ch),
            FixField::AltitudeUnit => overwrite(&mut self.altitude_unit, ch),
            FixField::GeoidSeparation => append(&mut self.geoid_separation, ch),
            FixField::GeoidSeparationUnit => overwrite(&mut self.geoid_separation_unit, ch),
        }
    }
}

fn append<const N: usize>(field: &mut String<N>, ch: char) {
    // Past capacity the character is dropped.
    let _ = field.push(ch);
}

fn overwrite(field: &mut String<LETTER_LEN>, ch: char) {
    field.clear();
    let _ = field.push(ch);
}
