use log::warn;

use crate::endpoint::{Endpoint, Level};
use crate::error::DirectoryError;

/// Cascading state/district/sub-district selection and the lists loaded for it.
///
/// Selecting at one level clears everything below it. Every selection hands
/// back the [`Endpoint`] to fetch next; the caller performs the request and
/// feeds the outcome to [`Selection::apply`], which drops responses that no
/// longer match the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    states: Vec<String>,
    districts: Vec<String>,
    sub_districts: Vec<String>,
    villages: Vec<String>,
    state: Option<String>,
    district: Option<String>,
    sub_district: Option<String>,
    in_flight: Vec<Endpoint>,
    error: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_states(&mut self) -> Endpoint {
        self.issue(Endpoint::States)
    }

    pub fn select_state(&mut self, state: &str) -> Endpoint {
        self.state = Some(state.to_string());
        self.district = None;
        self.sub_district = None;
        self.districts.clear();
        self.sub_districts.clear();
        self.villages.clear();
        self.issue(Endpoint::Districts {
            state: state.to_string(),
        })
    }

    pub fn select_district(&mut self, district: &str) -> Result<Endpoint, DirectoryError> {
        let state = self
            .state
            .clone()
            .ok_or(DirectoryError::MissingSelection(Level::State))?;
        self.district = Some(district.to_string());
        self.sub_district = None;
        self.sub_districts.clear();
        self.villages.clear();
        Ok(self.issue(Endpoint::SubDistricts {
            state,
            district: district.to_string(),
        }))
    }

    pub fn select_sub_district(&mut self, sub_district: &str) -> Result<Endpoint, DirectoryError> {
        let state = self
            .state
            .clone()
            .ok_or(DirectoryError::MissingSelection(Level::State))?;
        let district = self
            .district
            .clone()
            .ok_or(DirectoryError::MissingSelection(Level::District))?;
        self.sub_district = Some(sub_district.to_string());
        self.villages.clear();
        Ok(self.issue(Endpoint::Villages {
            state,
            district,
            sub_district: sub_district.to_string(),
        }))
    }

    /// Apply the outcome of fetching `endpoint`. Returns `false` when the
    /// response is stale and was discarded.
    pub fn apply(
        &mut self,
        endpoint: &Endpoint,
        result: Result<Vec<String>, DirectoryError>,
    ) -> bool {
        if let Some(pos) = self.in_flight.iter().position(|e| e == endpoint) {
            self.in_flight.swap_remove(pos);
        }
        if !self.is_current(endpoint) {
            return false;
        }
        match result {
            Ok(names) => {
                *self.list_mut(endpoint.level()) = names;
                self.error = None;
            }
            Err(err) => {
                let message = endpoint.level().failure_message();
                warn!("{message}: {err}");
                self.error = Some(message.to_string());
            }
        }
        true
    }

    /// True while any issued request has not been applied yet. Repeated
    /// requests for the same endpoint are counted individually.
    pub fn loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn selected_district(&self) -> Option<&str> {
        self.district.as_deref()
    }

    pub fn selected_sub_district(&self) -> Option<&str> {
        self.sub_district.as_deref()
    }

    pub fn list(&self, level: Level) -> &[String] {
        match level {
            Level::State => &self.states,
            Level::District => &self.districts,
            Level::SubDistrict => &self.sub_districts,
            Level::Village => &self.villages,
        }
    }

    fn list_mut(&mut self, level: Level) -> &mut Vec<String> {
        match level {
            Level::State => &mut self.states,
            Level::District => &mut self.districts,
            Level::SubDistrict => &mut self.sub_districts,
            Level::Village => &mut self.villages,
        }
    }

    fn issue(&mut self, endpoint: Endpoint) -> Endpoint {
        self.in_flight.push(endpoint.clone());
        endpoint
    }

    fn is_current(&self, endpoint: &Endpoint) -> bool {
        let same = |want: &str, have: &Option<String>| have.as_deref() == Some(want);
        match endpoint {
            Endpoint::States => true,
            Endpoint::Districts { state } => same(state, &self.state),
            Endpoint::SubDistricts { state, district } => {
                same(state, &self.state) && same(district, &self.district)
            }
            Endpoint::Villages {
                state,
                district,
                sub_district,
            } => {
                same(state, &self.state)
                    && same(district, &self.district)
                    && same(sub_district, &self.sub_district)
            }
        }
    }
}
