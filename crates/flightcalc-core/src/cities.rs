use crate::coordinate::Coordinate;
use crate::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn city(name: &'static str, lat: f64, lon: f64) -> City {
    City {
        name,
        coordinate: Coordinate::trusted(lat, lon),
    }
}

/// Built-in places, all at four-decimal precision.
pub const CITIES: [City; 8] = [
    city("Valladolid", 41.6528, -4.7244),
    city("León", 42.5987, -5.5671),
    city("Madrid", 40.4168, -3.7038),
    city("Sevilla", 37.3886, -5.9823),
    city("Gijón", 43.5453, -5.6615),
    city("Cádiz", 36.5271, -6.2886),
    city("Barcelona", 41.3874, 2.1686),
    city("Segovia", 40.9429, -4.1088),
];

/// Lowercases and strips Spanish accents so "cadiz" finds "Cádiz".
fn fold(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

pub fn find_city(name: &str) -> Result<&'static City, CatalogError> {
    let wanted = fold(name);
    CITIES
        .iter()
        .find(|c| fold(c.name) == wanted)
        .ok_or_else(|| CatalogError::UnknownCity(name.trim().to_string()))
}

/// Name of the catalogued place at exactly `coordinate`, if any.
pub fn city_name(coordinate: &Coordinate) -> Option<&'static str> {
    CITIES
        .iter()
        .find(|c| c.coordinate == *coordinate)
        .map(|c| c.name)
}
