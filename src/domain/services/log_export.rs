//! CSV rendering of medication logs.
//!
//! Output follows RFC 4180: CRLF line endings, and fields containing a comma,
//! quote or line break are quoted with inner quotes doubled.

use crate::domain::entities::MedicationLog;

pub const CSV_HEADER: [&str; 6] = [
    "id",
    "medication",
    "dosage",
    "taken_at",
    "notes",
    "feeling_after",
];

/// Quote a single field when needed.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line: Vec<String> = fields.into_iter().map(escape_field).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

/// Render logs as a CSV document with a header row.
pub fn logs_to_csv(logs: &[MedicationLog]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER);

    for log in logs {
        let id = log.id.to_string();
        let taken_at = log.taken_at.to_rfc3339();
        let (name, dosage) = log
            .medication
            .as_ref()
            .map(|m| (m.name.as_str(), m.dosage.as_str()))
            .unwrap_or(("", ""));

        push_record(
            &mut out,
            [
                id.as_str(),
                name,
                dosage,
                taken_at.as_str(),
                log.notes.as_deref().unwrap_or(""),
                log.feeling_after.as_deref().unwrap_or(""),
            ],
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Medication;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use uuid::Uuid;

    #[test_case("plain", "plain")]
    #[test_case("a,b", "\"a,b\"")]
    #[test_case("say \"hi\"", "\"say \"\"hi\"\"\"")]
    #[test_case("two\nlines", "\"two\nlines\"")]
    #[test_case("", "")]
    fn test_escape_field(input: &str, expected: &str) {
        assert_eq!(escape_field(input), expected);
    }

    #[test]
    fn test_empty_export_has_header_only() {
        assert_eq!(
            logs_to_csv(&[]),
            "id,medication,dosage,taken_at,notes,feeling_after\r\n"
        );
    }

    #[test]
    fn test_export_row() {
        let user_id = Uuid::nil();
        let mut med = Medication::new(user_id, "Ibuprofen".into(), "200mg".into());
        med.id = Uuid::nil();
        let taken_at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let mut log = MedicationLog::new(user_id, med.id, taken_at);
        log.id = Uuid::nil();
        log.notes = Some("after breakfast, with water".into());
        log.medication = Some(med);

        let csv = logs_to_csv(&[log]);
        let rows: Vec<&str> = csv.split("\r\n").collect();

        assert_eq!(
            rows[1],
            "00000000-0000-0000-0000-000000000000,Ibuprofen,200mg,2024-03-01T08:30:00+00:00,\"after breakfast, with water\","
        );
        assert_eq!(rows[2], "");
    }
}
