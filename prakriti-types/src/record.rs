use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed, persisted survey submission.
///
/// Field names match the `survey_responses` table. Records are created once
/// per successful submission and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    /// Tally summary, e.g. `"Vata: 15, Pitta: 3, Kapha: 2"`.
    pub scores: String,
    /// Classification label.
    pub result: String,
    pub description: String,
}

impl ResponseRecord {
    /// Values in export column order: Timestamp, Name, Gender, Phone, Email,
    /// City, Scores, Result, Description.
    pub fn columns(&self) -> [String; 9] {
        [
            self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.name.clone(),
            self.gender.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.city.clone(),
            self.scores.clone(),
            self.result.clone(),
            self.description.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn columns_in_export_order() {
        let record = ResponseRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            name: "Asha".into(),
            gender: "Female".into(),
            phone: "9876543210".into(),
            email: "asha@example.com".into(),
            city: "Surat".into(),
            scores: "Vata: 15, Pitta: 3, Kapha: 2".into(),
            result: "Vata".into(),
            description: "text".into(),
        };
        let columns = record.columns();
        assert_eq!(columns[0], "2024-03-01T09:30:00.000Z");
        assert_eq!(columns[1], "Asha");
        assert_eq!(columns[6], "Vata: 15, Pitta: 3, Kapha: 2");
        assert_eq!(columns[8], "text");
    }
}
