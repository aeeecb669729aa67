use std::fmt;

pub const DEFAULT_BASE_URL: &str = "https://india-data.vercel.app";

/// Depth in the administrative hierarchy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Level {
    State,
    District,
    SubDistrict,
    Village,
}

impl Level {
    /// User-facing message shown when a list at this level fails to load.
    pub fn failure_message(self) -> &'static str {
        match self {
            Level::State => "Failed to fetch states",
            Level::District => "Failed to fetch districts",
            Level::SubDistrict => "Failed to fetch sub-districts",
            Level::Village => "Failed to fetch villages",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::State => "state",
            Level::District => "district",
            Level::SubDistrict => "sub-district",
            Level::Village => "village",
        })
    }
}

/// One listing request. Each variant carries the ancestors it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    States,
    Districts {
        state: String,
    },
    SubDistricts {
        state: String,
        district: String,
    },
    Villages {
        state: String,
        district: String,
        sub_district: String,
    },
}

impl Endpoint {
    /// The level of the names this endpoint lists.
    pub fn level(&self) -> Level {
        match self {
            Endpoint::States => Level::State,
            Endpoint::Districts { .. } => Level::District,
            Endpoint::SubDistricts { .. } => Level::SubDistrict,
            Endpoint::Villages { .. } => Level::Village,
        }
    }

    pub fn path(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).into_owned();
        match self {
            Endpoint::States => "/api/states".to_string(),
            Endpoint::Districts { state } => format!("/api/districts/{}", enc(state)),
            Endpoint::SubDistricts { state, district } => {
                format!("/api/subdistricts/{}/{}", enc(state), enc(district))
            }
            Endpoint::Villages {
                state,
                district,
                sub_district,
            } => format!(
                "/api/villages/{}/{}/{}",
                enc(state),
                enc(district),
                enc(sub_district)
            ),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{DEFAULT_BASE_URL, Endpoint, Level};

    #[test]
    fn paths_percent_encode_segments() {
        let ep = Endpoint::Villages {
            state: "Andhra Pradesh".into(),
            district: "Y.S.R.".into(),
            sub_district: "Kadapa/North".into(),
        };
        assert_eq!(
            ep.path(),
            "/api/villages/Andhra%20Pradesh/Y.S.R./Kadapa%2FNorth"
        );
        assert_eq!(ep.level(), Level::Village);
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        assert_eq!(
            Endpoint::States.url(DEFAULT_BASE_URL),
            "https://india-data.vercel.app/api/states"
        );
        assert_eq!(
            Endpoint::Districts { state: "Goa".into() }.url("http://localhost:3000/"),
            "http://localhost:3000/api/districts/Goa"
        );
    }
}
