use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// One study session, joined with its subject name for display.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub subject: String,
    pub duration: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectSummary {
    pub subject: String,
    pub count: i64,
    pub sum: i64,
}

impl SubjectSummary {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub count: i64,
    pub sum: i64,
}

// Form fields arrive as strings; numeric parsing happens in the handlers so
// a bad value maps to a 400, not a rejection from the extractor.

#[derive(Debug, Deserialize)]
pub struct SaveSubjectForm {
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveLogForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_empty_summary_is_zero() {
        let summary = SubjectSummary {
            subject: "Math".to_string(),
            count: 0,
            sum: 0,
        };
        assert_eq!(summary.average(), 0.0);
    }

    #[test]
    fn average_divides_sum_by_count() {
        let summary = SubjectSummary {
            subject: "Math".to_string(),
            count: 4,
            sum: 10,
        };
        assert!((summary.average() - 2.5).abs() < f64::EPSILON);
    }
}
