use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fields the list can be narrowed by
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Company,
    Status,
    StartDate,
    EndDate,
}

impl FilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Company => "company",
            FilterField::Status => "status",
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "company" => Ok(FilterField::Company),
            "status" => Ok(FilterField::Status),
            "startdate" | "start-date" | "start_date" | "from" => Ok(FilterField::StartDate),
            "enddate" | "end-date" | "end_date" | "to" => Ok(FilterField::EndDate),
            other => Err(format!(
                "Unknown filter '{}'. Expected company, status, startDate or endDate",
                other
            )),
        }
    }
}

/// Active filter constraints. Blank values are never stored, so an absent
/// field always means "unconstrained".
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<FilterField, String>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSet::set`]
    pub fn with(mut self, field: FilterField, value: impl AsRef<str>) -> Self {
        self.set(field, value);
        self
    }

    /// Stores the trimmed value, or removes the field when the value is blank
    pub fn set(&mut self, field: FilterField, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if value.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, value.to_string());
        }
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Drops entries that slipped in blank, e.g. from a hand-written JSON body
    pub fn compacted(self) -> Self {
        self.0
            .into_iter()
            .fold(FilterSet::new(), |set, (field, value)| set.with(field, value))
    }
}

impl<V: AsRef<str>> FromIterator<(FilterField, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (FilterField, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FilterSet::new(), |set, (field, value)| set.with(field, value))
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        f.write_str(&parts.join(", "))
    }
}
