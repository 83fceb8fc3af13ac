//! Sky positions and the parsing of their textual forms
//!
//! Right ascension is accepted as decimal degrees, as `10h00m26.358s`,
//! `10:00:26.358` or `10 00 26.358` (hours), or as `150.1d` (degrees).
//! Declination is accepted as decimal degrees, as `+02d15m26.923s`,
//! `+02:15:26.923` or `+02 15 26.923`.

use std::str::FromStr;

use crate::error::Error;
use crate::utils;
use crate::LonLat;

/// A position on the celestial sphere, ICRS, expressed in degrees.
///
/// Right ascension is kept in `[0, 360)` and declination in `[-90, 90]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyPosition {
    ra: f64,
    dec: f64,
}

impl SkyPosition {
    /// Build a position from a (ra, dec) tuple given in degrees
    pub fn from_degrees(ra: f64, dec: f64) -> Result<Self, Error> {
        if !ra.is_finite() || !dec.is_finite() {
            return Err(Error::CoordinateParse(
                format!("({}, {})", ra, dec),
                "coordinates must be finite",
            ));
        }
        if !(-90.0..=90.0).contains(&dec) {
            return Err(Error::CoordinateParse(
                dec.to_string(),
                "declination must lie in [-90, 90] degrees",
            ));
        }

        Ok(SkyPosition {
            ra: ra.rem_euclid(360.0),
            dec,
        })
    }

    /// For compiled-in values already known to be in range
    pub(crate) const fn from_catalog(ra: f64, dec: f64) -> Self {
        SkyPosition { ra, dec }
    }

    /// Parse a position from its right ascension and declination strings
    pub fn parse(ra: &str, dec: &str) -> Result<Self, Error> {
        let ra = parse_ra(ra)?;
        let dec = parse_dec(dec)?;
        Self::from_degrees(ra, dec)
    }

    /// Right ascension in degrees
    pub fn ra(&self) -> f64 {
        self.ra
    }

    /// Declination in degrees
    pub fn dec(&self) -> f64 {
        self.dec
    }

    /// The same position as a mapproj (lon, lat) tuple in radians
    pub fn to_lonlat(&self) -> LonLat {
        LonLat::new(self.ra.to_radians(), self.dec.to_radians())
    }

    /// Great-circle separation to `other`, in degrees
    pub fn separation(&self, other: &SkyPosition) -> f64 {
        utils::angular_dist(&self.to_lonlat(), &other.to_lonlat()).to_degrees()
    }

    /// IAU-style designation, e.g. `J100026.36+021526.92`
    ///
    /// Both coordinates are truncated to hundredths of a second after rounding,
    /// so carries propagate into minutes and hours.
    pub fn iau_designation(&self) -> String {
        const CS_PER_DAY: i64 = 24 * 3600 * 100;

        let ra_cs = ((self.ra / 15.0 * 3600.0 * 100.0).round() as i64).rem_euclid(CS_PER_DAY);
        let (h, m, s) = (ra_cs / 360_000, (ra_cs / 6000) % 60, ra_cs % 6000);

        let dec_cs = (self.dec.abs() * 3600.0 * 100.0).round() as i64;
        let (d, am, asec) = (dec_cs / 360_000, (dec_cs / 6000) % 60, dec_cs % 6000);
        let sign = if self.dec < 0.0 { '-' } else { '+' };

        format!(
            "J{:02}{:02}{:02}.{:02}{}{:02}{:02}{:02}.{:02}",
            h,
            m,
            s / 100,
            s % 100,
            sign,
            d,
            am,
            asec / 100,
            asec % 100
        )
    }
}

/// Parse a single string holding both coordinates.
///
/// The two coordinates are separated by whitespace or a comma. Six
/// whitespace-separated fields are read as two sexagesimal triples.
impl FromStr for SkyPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>();

        match fields.len() {
            2 => SkyPosition::parse(fields[0], fields[1]),
            6 => SkyPosition::parse(&fields[..3].join(" "), &fields[3..].join(" ")),
            _ => Err(Error::CoordinateParse(
                s.to_string(),
                "expected a right ascension and a declination",
            )),
        }
    }
}

impl TryFrom<(f64, f64)> for SkyPosition {
    type Error = Error;

    fn try_from((ra, dec): (f64, f64)) -> Result<Self, Self::Error> {
        SkyPosition::from_degrees(ra, dec)
    }
}

/// Parse a right ascension into degrees
pub fn parse_ra(s: &str) -> Result<f64, Error> {
    let t = s.trim();
    let is_hours = t.contains(['h', ':']) || t.contains(char::is_whitespace);
    let is_sexagesimal_deg = t.contains(['d', '°']);

    let ra = if is_hours {
        let hours = parse_sexagesimal(s)?;
        if !(0.0..24.0).contains(&hours) {
            return Err(Error::CoordinateParse(s.to_string(), "hours must lie in [0, 24)"));
        }
        hours * 15.0
    } else if is_sexagesimal_deg {
        parse_sexagesimal(s)?
    } else {
        parse_decimal(s)?
    };

    Ok(ra)
}

/// Parse a declination into degrees
pub fn parse_dec(s: &str) -> Result<f64, Error> {
    let t = s.trim();
    let dec = if is_sexagesimal(t) {
        parse_sexagesimal(s)?
    } else {
        parse_decimal(s)?
    };

    if !(-90.0..=90.0).contains(&dec) {
        return Err(Error::CoordinateParse(
            s.to_string(),
            "declination must lie in [-90, 90] degrees",
        ));
    }
    Ok(dec)
}

fn is_sexagesimal(t: &str) -> bool {
    t.contains(['h', 'd', 'm', 's', ':', '°', '\'', '"']) || t.contains(char::is_whitespace)
}

fn parse_decimal(s: &str) -> Result<f64, Error> {
    let v = s
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::CoordinateParse(s.to_string(), "not a number"))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(Error::CoordinateParse(s.to_string(), "coordinates must be finite"))
    }
}

/// Parse up to three sexagesimal fields into a value expressed in the unit of
/// the leading field. The sign applies to the whole value.
fn parse_sexagesimal(s: &str) -> Result<f64, Error> {
    let t = s.trim();
    let (negative, body) = match t.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, t.strip_prefix('+').unwrap_or(t)),
    };

    let fields = body
        .split(|c: char| "hdms:°'\"".contains(c) || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .map(|f| {
            f.parse::<f64>()
                .map_err(|_| Error::CoordinateParse(s.to_string(), "not a sexagesimal value"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.is_empty() || fields.len() > 3 {
        return Err(Error::CoordinateParse(
            s.to_string(),
            "expected one to three sexagesimal fields",
        ));
    }
    if fields.iter().any(|f| !f.is_finite() || *f < 0.0) {
        return Err(Error::CoordinateParse(s.to_string(), "sign is only allowed in front"));
    }
    if fields[1..].iter().any(|f| *f >= 60.0) {
        return Err(Error::CoordinateParse(
            s.to_string(),
            "minutes and seconds must be below 60",
        ));
    }

    let value = fields
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(f, div)| f / div)
        .sum::<f64>();

    Ok(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_and_dms() {
        let p = SkyPosition::parse("10h00m26.358s", "+02d15m26.92300s").unwrap();
        assert_delta!(p.ra(), 150.109825, 1e-9);
        assert_delta!(p.dec(), 2.257478611111111, 1e-9);

        let q = SkyPosition::parse("10:00:26.358", "+02:15:26.923").unwrap();
        assert_delta!(p.ra(), q.ra(), 1e-12);
        assert_delta!(p.dec(), q.dec(), 1e-12);
    }

    #[test]
    fn negative_declination_keeps_sign_on_all_fields() {
        assert_delta!(parse_dec("-00:30:00").unwrap(), -0.5, 1e-12);
        assert_delta!(parse_dec("-01d30m").unwrap(), -1.5, 1e-12);
    }

    #[test]
    fn decimal_and_degree_suffix() {
        assert_delta!(parse_ra("150.1").unwrap(), 150.1, 1e-12);
        assert_delta!(parse_ra("150.1d").unwrap(), 150.1, 1e-12);
        assert_delta!(parse_dec("2.2").unwrap(), 2.2, 1e-12);
    }

    #[test]
    fn combined_string() {
        let p: SkyPosition = "10h00m26.358s +02d15m26.92300s".parse().unwrap();
        let q: SkyPosition = "150.109825, 2.2574786111".parse().unwrap();
        let r: SkyPosition = "10 00 26.358 +02 15 26.923".parse().unwrap();
        assert!(p.separation(&q) < 1e-7);
        assert!(p.separation(&r) < 1e-9);
    }

    #[test]
    fn ra_wraps() {
        let p = SkyPosition::from_degrees(-10.0, 0.0).unwrap();
        assert_delta!(p.ra(), 350.0, 1e-12);
        let p = SkyPosition::from_degrees(720.5, 0.0).unwrap();
        assert_delta!(p.ra(), 0.5, 1e-12);
    }

    #[test]
    fn malformed_input() {
        for (ra, dec) in [
            ("abc", "2.0"),
            ("150.0", "north"),
            ("25h00m00s", "0"),
            ("10h61m00s", "0"),
            ("150.0", "95.0"),
            ("10:00:00:00", "0"),
            ("NaN", "0"),
            ("", "0"),
            ("10h-5m", "0"),
        ] {
            assert!(
                matches!(SkyPosition::parse(ra, dec), Err(Error::CoordinateParse(..))),
                "({}, {}) should not parse",
                ra,
                dec
            );
        }
        assert!("150.0".parse::<SkyPosition>().is_err());
        assert!(SkyPosition::from_degrees(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn designations() {
        let p = SkyPosition::from_degrees(150.109825, 2.257478611111111).unwrap();
        assert_eq!(p.iau_designation(), "J100026.36+021526.92");
        let p = SkyPosition::from_degrees(150.2613374, 2.3162508).unwrap();
        assert_eq!(p.iau_designation(), "J100102.72+021858.50");
        // rounding carries into the next day
        let p = SkyPosition::from_degrees(359.99999999, -0.5).unwrap();
        assert_eq!(p.iau_designation(), "J000000.00-003000.00");
    }
}
