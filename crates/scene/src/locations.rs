/// A named place on the globe, in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub lat_deg: f64,
    pub lng_deg: f64,
    /// The home country gets its own marker treatment.
    pub is_home: bool,
}

const fn city(name: &'static str, lat_deg: f64, lng_deg: f64) -> Location {
    Location {
        name,
        lat_deg,
        lng_deg,
        is_home: false,
    }
}

pub const HOME: Location = Location {
    name: "India",
    lat_deg: 20.5937,
    lng_deg: 78.9629,
    is_home: true,
};

pub static LOCATIONS: [Location; 15] = [
    HOME,
    city("San Francisco", 37.7749, -122.4194),
    city("New York", 40.7128, -74.006),
    city("London", 51.5074, -0.1278),
    city("Tokyo", 35.6762, 139.6503),
    city("Sydney", -33.8688, 151.2093),
    city("Shanghai", 31.2304, 121.4737),
    city("Singapore", 1.3521, 103.8198),
    city("Dubai", 25.2048, 55.2708),
    city("Berlin", 52.52, 13.405),
    city("São Paulo", -23.5505, -46.6333),
    city("Toronto", 43.6532, -79.3832),
    city("Paris", 48.8566, 2.3522),
    city("Moscow", 55.7558, 37.6173),
    city("Cape Town", -33.9249, 18.4241),
];
