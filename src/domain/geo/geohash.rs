//! Geohash encoding, decoding and neighbor lookup
//!
//! Keys are produced by alternately bisecting the longitude and latitude
//! ranges (longitude first) and packing every 5 bits into one base-32
//! character. Nearby points frequently share a prefix, but points either
//! side of a cell boundary do not; the cache layer accepts that
//! approximation.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;

use crate::domain::DomainError;
use crate::domain::geo::{GeoBounds, GeoPoint};

/// The 32-symbol geohash alphabet.
const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Reverse lookup: ASCII byte -> symbol value, -1 for bytes outside the alphabet.
static DECODE_TABLE: Lazy<[i8; 256]> = Lazy::new(|| {
    let mut table = [-1i8; 256];
    for (value, &byte) in ALPHABET.iter().enumerate() {
        table[byte as usize] = value as i8;
    }
    table
});

/// Direction for neighbor lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Top,
    Bottom,
}

// Neighbor and border tables keyed by direction and the parity of the hash
// length (index 0: even number of characters, index 1: odd). Standard
// geohash adjacency tables.
const NEIGHBOR_RIGHT: [&str; 2] = [
    "bc01fg45238967deuvhjyznpkmstqrwx",
    "p0r21436x8zb9dcf5h7kjnmqesgutwvy",
];
const NEIGHBOR_LEFT: [&str; 2] = [
    "238967debc01fg45kmstqrwxuvhjyznp",
    "14365h7k9dcfesgujnmqp0r2twvyx8zb",
];
const NEIGHBOR_TOP: [&str; 2] = [
    "p0r21436x8zb9dcf5h7kjnmqesgutwvy",
    "bc01fg45238967deuvhjyznpkmstqrwx",
];
const NEIGHBOR_BOTTOM: [&str; 2] = [
    "14365h7k9dcfesgujnmqp0r2twvyx8zb",
    "238967debc01fg45kmstqrwxuvhjyznp",
];

const BORDER_RIGHT: [&str; 2] = ["bcfguvyz", "prxz"];
const BORDER_LEFT: [&str; 2] = ["0145hjnp", "028b"];
const BORDER_TOP: [&str; 2] = ["prxz", "bcfguvyz"];
const BORDER_BOTTOM: [&str; 2] = ["028b", "0145hjnp"];

fn neighbor_table(direction: Direction) -> &'static [&'static str; 2] {
    match direction {
        Direction::Right => &NEIGHBOR_RIGHT,
        Direction::Left => &NEIGHBOR_LEFT,
        Direction::Top => &NEIGHBOR_TOP,
        Direction::Bottom => &NEIGHBOR_BOTTOM,
    }
}

fn border_table(direction: Direction) -> &'static [&'static str; 2] {
    match direction {
        Direction::Right => &BORDER_RIGHT,
        Direction::Left => &BORDER_LEFT,
        Direction::Top => &BORDER_TOP,
        Direction::Bottom => &BORDER_BOTTOM,
    }
}

/// Encodes a point into a geohash of `precision` characters.
pub fn encode(point: &GeoPoint, precision: usize) -> Result<String, DomainError> {
    if precision == 0 {
        return Err(DomainError::validation("geohash precision must be > 0"));
    }

    let mut lat_range = (-90.0f64, 90.0f64);
    let mut lon_range = (-180.0f64, 180.0f64);

    let mut hash = String::with_capacity(precision);
    let mut bits = 0u8;
    let mut value = 0usize;
    let mut even_bit = true; // longitude first

    while hash.len() < precision {
        if even_bit {
            let mid = (lon_range.0 + lon_range.1) / 2.0;
            if point.lon() >= mid {
                value = (value << 1) | 1;
                lon_range.0 = mid;
            } else {
                value <<= 1;
                lon_range.1 = mid;
            }
        } else {
            let mid = (lat_range.0 + lat_range.1) / 2.0;
            if point.lat() >= mid {
                value = (value << 1) | 1;
                lat_range.0 = mid;
            } else {
                value <<= 1;
                lat_range.1 = mid;
            }
        }

        even_bit = !even_bit;
        bits += 1;

        if bits == 5 {
            hash.push(ALPHABET[value] as char);
            bits = 0;
            value = 0;
        }
    }

    Ok(hash)
}

/// Decodes a geohash into the bounding box of its cell.
pub fn decode(hash: &str) -> Result<GeoBounds, DomainError> {
    if hash.is_empty() {
        return Err(DomainError::validation("empty geohash"));
    }

    let mut lat_range = (-90.0f64, 90.0f64);
    let mut lon_range = (-180.0f64, 180.0f64);
    let mut even_bit = true;

    for c in hash.chars() {
        let value = symbol_value(c)
            .ok_or_else(|| DomainError::validation(format!("invalid geohash character '{}'", c)))?;

        for shift in (0..5).rev() {
            let bit = (value >> shift) & 1;
            if even_bit {
                let mid = (lon_range.0 + lon_range.1) / 2.0;
                if bit == 1 {
                    lon_range.0 = mid;
                } else {
                    lon_range.1 = mid;
                }
            } else {
                let mid = (lat_range.0 + lat_range.1) / 2.0;
                if bit == 1 {
                    lat_range.0 = mid;
                } else {
                    lat_range.1 = mid;
                }
            }
            even_bit = !even_bit;
        }
    }

    GeoBounds::new(lat_range.0, lat_range.1, lon_range.0, lon_range.1)
}

/// Returns the adjacent geohash in the given direction.
///
/// Recurses into the parent hash when the last character lies on that
/// direction's border. Fails on invalid input, or when the hash sits on
/// the edge of the coordinate space and has no parent to recurse into.
pub fn neighbor(hash: &str, direction: Direction) -> Result<String, DomainError> {
    if !is_valid(hash) {
        return Err(DomainError::validation(format!(
            "invalid geohash '{}'",
            hash
        )));
    }

    let last = hash
        .chars()
        .next_back()
        .ok_or_else(|| DomainError::validation("empty geohash"))?;
    let parent = &hash[..hash.len() - 1];
    let parity = hash.len() % 2; // 0 = even length, 1 = odd

    let mut base = parent.to_string();
    if border_table(direction)[parity].contains(last) {
        if parent.is_empty() {
            return Err(DomainError::validation(format!(
                "geohash '{}' has no {:?} neighbor",
                hash, direction
            )));
        }
        base = neighbor(parent, direction)?;
    }

    let position = neighbor_table(direction)[parity]
        .find(last)
        .ok_or_else(|| DomainError::internal("neighbor table lookup failed"))?;

    base.push(ALPHABET[position] as char);
    Ok(base)
}

/// Covers a bounding box with geohash cells by sampling a fixed 4x4 grid.
///
/// This is a sampling approximation, not a minimal exact cover: very large
/// or oddly shaped boxes can have interior cells that no sample point hits.
/// At the cache's default precision (~5 km cells) gaps are rare for typical
/// viewport sizes.
pub fn cover_bounds(bounds: &GeoBounds, precision: usize) -> Result<BTreeSet<String>, DomainError> {
    const GRID: usize = 4;

    let mut cells = BTreeSet::new();
    for i in 0..GRID {
        for j in 0..GRID {
            let frac_lat = i as f64 / (GRID - 1) as f64;
            let frac_lon = j as f64 / (GRID - 1) as f64;
            let lat = bounds.lat_min + (bounds.lat_max - bounds.lat_min) * frac_lat;
            let lon = bounds.lon_min + (bounds.lon_max - bounds.lon_min) * frac_lon;

            let point = GeoPoint::new(lat, lon)?;
            cells.insert(encode(&point, precision)?);
        }
    }

    Ok(cells)
}

/// True when non-empty and every character is in the geohash alphabet.
pub fn is_valid(hash: &str) -> bool {
    !hash.is_empty() && hash.chars().all(|c| symbol_value(c).is_some())
}

fn symbol_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    let value = DECODE_TABLE[c as usize];
    (value >= 0).then_some(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_encode_known_vectors() {
        assert_eq!(
            encode(&point(57.64911, 10.40744), 11).unwrap(),
            "u4pruydqqvj"
        );
        assert_eq!(encode(&point(42.605, -5.603), 5).unwrap(), "ezs42");
        assert_eq!(encode(&point(55.95, -3.19), 5).unwrap(), "gcvwr");
    }

    #[test]
    fn test_encode_rejects_zero_precision() {
        let err = encode(&point(0.0, 0.0), 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_nearby_points_share_a_cell() {
        // Two Edinburgh points inside the same ~5 km cell
        let a = encode(&point(55.95, -3.19), 5).unwrap();
        let b = encode(&point(55.955, -3.188), 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_known_bounds() {
        let bounds = decode("ezs42").unwrap();

        assert!((bounds.lat_min - 42.5830078125).abs() < 1e-9);
        assert!((bounds.lat_max - 42.626953125).abs() < 1e-9);
        assert!((bounds.lon_min - -5.625).abs() < 1e-9);
        assert!((bounds.lon_max - -5.5810546875).abs() < 1e-9);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(decode("").is_err());
        assert!(decode("gcvwa!").is_err());
        assert!(decode("gcvwi").is_err()); // 'i' is not in the alphabet
    }

    #[test]
    fn test_round_trip_containment() {
        let samples = [
            (57.64911, 10.40744),
            (55.95, -3.19),
            (-33.8688, 151.2093),
            (0.0, 0.0),
            (89.9, -179.9),
            (-89.9, 179.9),
        ];

        for (lat, lon) in samples {
            for precision in [1, 3, 5, 8, 12] {
                let p = point(lat, lon);
                let hash = encode(&p, precision).unwrap();
                let bounds = decode(&hash).unwrap();
                assert!(
                    bounds.contains(&p),
                    "decode(encode({}, {}, {})) does not contain the point",
                    lat,
                    lon,
                    precision
                );
            }
        }
    }

    #[test]
    fn test_neighbor_known_values() {
        assert_eq!(neighbor("gcvwr", Direction::Right).unwrap(), "gcvy2");
        assert_eq!(neighbor("gcvwr", Direction::Left).unwrap(), "gcvwq");
        assert_eq!(neighbor("gcvwr", Direction::Top).unwrap(), "gcvwx");
        assert_eq!(neighbor("gcvwr", Direction::Bottom).unwrap(), "gcvwp");
    }

    #[test]
    fn test_neighbor_border_recursion() {
        // 'z' sits on the top border, so the parent advances too
        assert_eq!(neighbor("9q8zz", Direction::Top).unwrap(), "9qbbp");
    }

    #[test]
    fn test_neighbor_symmetry() {
        for hash in ["gcvwr", "u4pru", "ezs42", "9q8zz", "u4pruydqqvj"] {
            let right = neighbor(hash, Direction::Right).unwrap();
            assert_eq!(neighbor(&right, Direction::Left).unwrap(), hash);

            let top = neighbor(hash, Direction::Top).unwrap();
            assert_eq!(neighbor(&top, Direction::Bottom).unwrap(), hash);
        }
    }

    #[test]
    fn test_neighbor_rejects_invalid() {
        assert!(neighbor("", Direction::Left).is_err());
        assert!(neighbor("abi", Direction::Left).is_err());
    }

    #[test]
    fn test_cover_bounds_small_viewport() {
        // A viewport around a single cell covers that cell and its surroundings
        let bounds = GeoBounds::new(55.93, 55.97, -3.22, -3.15).unwrap();
        let cells = cover_bounds(&bounds, 5).unwrap();

        assert!(cells.contains("gcvwr"));
        assert!(!cells.is_empty() && cells.len() <= 16);
        for cell in &cells {
            assert!(is_valid(cell));
        }
    }

    #[test]
    fn test_cover_bounds_degenerate_point() {
        let bounds = GeoBounds::new(55.95, 55.95, -3.19, -3.19).unwrap();
        let cells = cover_bounds(&bounds, 5).unwrap();

        assert_eq!(cells.len(), 1);
        assert!(cells.contains("gcvwr"));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("gcvwr"));
        assert!(is_valid("0"));
        assert!(!is_valid(""));
        assert!(!is_valid("gcvwR")); // uppercase is outside the alphabet
        assert!(!is_valid("gcvw a"));
    }
}
