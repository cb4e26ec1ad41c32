use crate::{ReportKind, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The signed-in staff member, as returned by `auth/me/` and `auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Permission codes granted through the user's roles.
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_staff: bool,
}

impl UserProfile {
    /// Staff accounts implicitly hold every permission.
    pub fn has_permission(&self, code: &str) -> bool {
        self.is_staff || self.permissions.iter().any(|p| p == code)
    }

    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColumn {
    /// Key into each row object.
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Tabular report data plus an optional series for the summary chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub kind: ReportKind,
    pub columns: Vec<ReportColumn>,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub chart: Vec<ChartPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn staff_hold_every_permission() {
        let mut profile: UserProfile = serde_json::from_value(json!({
            "id": 3,
            "username": "clerk",
            "permissions": ["products.view"],
        }))
        .unwrap();
        assert!(profile.has_permission("products.view"));
        assert!(!profile.has_permission("users.change"));
        assert_eq!(profile.display_name(), "clerk");

        profile.is_staff = true;
        assert!(profile.has_permission("users.change"));
    }

    #[test]
    fn report_rows_keep_arbitrary_values() {
        let report: Report = serde_json::from_value(json!({
            "kind": "sales",
            "columns": [{"key": "day", "label": "Day"}],
            "rows": [{"day": "2024-03-01", "total": 12.5, "paid": true}],
        }))
        .unwrap();
        assert_eq!(report.kind, ReportKind::Sales);
        assert_eq!(report.rows[0]["paid"], json!(true));
        assert!(report.chart.is_empty());
    }
}
