use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Status of a job application
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Invalid status '{}'. Expected one of: Applied, Interview, Offer, Rejected",
                    wanted
                )
            })
    }
}

/// A job application as stored by the remote service
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub company: String,
    pub role: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_link: Option<String>,
    #[serde(with = "applied_date")]
    pub applied_date: NaiveDate,
}

/// Payload for creating a job application
#[derive(Deserialize, Serialize, Debug, Validate, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[serde(default)]
    pub status: JobStatus,
    #[validate(url(message = "Job link must be a valid URL"))]
    #[serde(
        default,
        deserialize_with = "blank_link",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_link: Option<String>,
    #[serde(
        default,
        with = "optional_applied_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub applied_date: Option<NaiveDate>,
}

impl JobDraft {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.job_link = Some(link.into());
        self
    }

    pub fn with_applied_date(mut self, date: NaiveDate) -> Self {
        self.applied_date = Some(date);
        self
    }

    /// Trims text fields and drops a blank link so validation sees what the user meant
    pub fn normalized(mut self) -> Self {
        self.company = self.company.trim().to_string();
        self.role = self.role.trim().to_string();
        self.job_link = normalize_link(self.job_link);
        self
    }
}

/// Partial update; absent fields are left unchanged server-side
#[derive(Deserialize, Serialize, Debug, Validate, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[validate(length(min = 1, message = "Company cannot be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[validate(length(min = 1, message = "Role cannot be empty"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[validate(url(message = "Job link must be a valid URL"))]
    #[serde(
        default,
        deserialize_with = "blank_link",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_link: Option<String>,
    #[serde(
        default,
        with = "optional_applied_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub applied_date: Option<NaiveDate>,
}

impl JobPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn normalized(mut self) -> Self {
        self.company = self.company.map(|c| c.trim().to_string());
        self.role = self.role.map(|r| r.trim().to_string());
        self.job_link = normalize_link(self.job_link);
        self
    }

    /// Applies the present fields onto a record
    pub fn apply_to(&self, record: &mut JobRecord) {
        if let Some(company) = &self.company {
            record.company = company.clone();
        }
        if let Some(role) = &self.role {
            record.role = role.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(link) = &self.job_link {
            record.job_link = Some(link.clone());
        }
        if let Some(date) = self.applied_date {
            record.applied_date = date;
        }
    }
}

fn normalize_link(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}

// Forms send `"jobLink": ""` when no link was entered
fn blank_link<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(normalize_link)
}

/// Parses `YYYY-MM-DD`, falling back to the date part of an RFC 3339 timestamp
pub fn parse_applied_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
}

mod applied_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_applied_date(&raw).map_err(serde::de::Error::custom)
    }
}

mod optional_applied_date {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_applied_date(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
