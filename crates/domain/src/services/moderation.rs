//! Moderation view logic: filtering, aggregate counts and CSV projection.
//!
//! All functions here are pure; they operate on an already-listed sequence
//! and never touch the store.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::registration::{
    Registration, RegistrationStats, RegistrationStatus, UnknownVariant,
};

/// Status filter for the moderation listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RegistrationStatus),
}

impl StatusFilter {
    pub fn matches(self, status: RegistrationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == wanted,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse::<RegistrationStatus>().map(StatusFilter::Only)
        }
    }
}

/// Filters a listed sequence by search text and status, preserving order.
///
/// The search is a case-insensitive substring match over name, home club,
/// designation and pass id. An empty search matches everything.
pub fn filter_registrations<'a>(
    records: &'a [Registration],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a Registration> {
    let needle = search.trim().to_lowercase();
    records
        .iter()
        .filter(|reg| status.matches(reg.status))
        .filter(|reg| needle.is_empty() || reg.matches_search(&needle))
        .collect()
}

/// Derives aggregate counts in a single pass.
pub fn stats(records: &[Registration]) -> RegistrationStats {
    records
        .iter()
        .fold(RegistrationStats::default(), |mut acc, reg| {
            acc.total += 1;
            match reg.status {
                RegistrationStatus::Pending => acc.pending += 1,
                RegistrationStatus::Verified => acc.verified += 1,
                RegistrationStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
}

/// Builds the CSV export of the verified subset.
///
/// Columns match the organizer spreadsheet: Pass ID, Name, Designation,
/// Home Club, Phone Number, Payment Method, Registration Date. Text fields
/// and the date are quoted; embedded quotes are doubled.
pub fn verified_csv(records: &[Registration]) -> String {
    let mut csv = String::new();
    csv.push_str("Pass ID,Name,Designation,Home Club,Phone Number,Payment Method,Registration Date\n");

    for reg in records
        .iter()
        .filter(|r| r.status == RegistrationStatus::Verified)
    {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            reg.pass_id,
            quote(&reg.name),
            quote(&reg.designation),
            quote(&reg.home_club),
            reg.phone_number,
            reg.payment_method,
            quote(&format_export_date(reg.created_at)),
        ));
    }

    csv
}

/// Filename for the CSV download, stamped with the export date.
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("approved_registrations_{}.csv", now.format("%Y-%m-%d"))
}

/// Registration date as shown in the export, e.g. `Jan 5, 2026, 04:30 PM`.
fn format_export_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %I:%M %p").to_string()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::PaymentMethod;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn reg(
        name: &str,
        home_club: &str,
        designation: &str,
        pass_id: &str,
        status: RegistrationStatus,
    ) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            name: name.to_string(),
            home_club: home_club.to_string(),
            designation: designation.to_string(),
            phone_number: "+977-9800000000".to_string(),
            payment_method: PaymentMethod::Cash,
            payment_screenshot: None,
            pass_id: pass_id.to_string(),
            qr_code: "{}".to_string(),
            created_at: Utc::now(),
            status,
        }
    }

    fn sample_records() -> Vec<Registration> {
        vec![
            reg(
                "Ram Shrestha",
                "Kathmandu Club",
                "President",
                "FF000001AAA",
                RegistrationStatus::Pending,
            ),
            reg(
                "Sita Rai",
                "Pokhara Club",
                "Secretary",
                "FF000002BBB",
                RegistrationStatus::Verified,
            ),
            reg(
                "Hari KC",
                "Lalitpur Club",
                "Treasurer",
                "FF000003CCC",
                RegistrationStatus::Rejected,
            ),
            reg(
                "Gita Katwal",
                "Biratnagar Club",
                "Member",
                "FF000004DDD",
                RegistrationStatus::Verified,
            ),
        ]
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "verified".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(RegistrationStatus::Verified)
        );
        assert!("everything".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_filter_by_search_case_insensitive() {
        let records = sample_records();
        let hits = filter_registrations(&records, "kath", StatusFilter::All);
        // "kath" matches Kathmandu Club and Gita Katwal, original order kept.
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "Ram Shrestha");
        assert_eq!(hits[1].name, "Gita Katwal");
    }

    #[test]
    fn test_filter_by_pass_id() {
        let records = sample_records();
        let hits = filter_registrations(&records, "ff000003", StatusFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Hari KC");
    }

    #[test]
    fn test_filter_by_status() {
        let records = sample_records();
        let hits = filter_registrations(
            &records,
            "",
            StatusFilter::Only(RegistrationStatus::Verified),
        );
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.status == RegistrationStatus::Verified));
    }

    #[test]
    fn test_filter_combines_search_and_status() {
        let records = sample_records();
        let hits = filter_registrations(
            &records,
            "club",
            StatusFilter::Only(RegistrationStatus::Rejected),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Hari KC");
    }

    #[test]
    fn test_filter_empty_search_matches_all() {
        let records = sample_records();
        let hits = filter_registrations(&records, "   ", StatusFilter::All);
        assert_eq!(hits.len(), records.len());
    }

    #[test]
    fn test_stats_single_pass_counts() {
        let records = sample_records();
        let counts = stats(&records);
        assert_eq!(
            counts,
            RegistrationStats {
                total: 4,
                pending: 1,
                verified: 2,
                rejected: 1,
            }
        );
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(stats(&[]), RegistrationStats::default());
    }

    #[test]
    fn test_verified_csv_contains_only_verified() {
        let records = sample_records();
        let csv = verified_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 verified rows
        assert!(lines[0].starts_with("Pass ID,Name,Designation"));
        assert!(lines[1].contains("FF000002BBB"));
        assert!(lines[1].contains("\"Sita Rai\""));
        assert!(lines[2].contains("FF000004DDD"));
        assert!(!csv.contains("Ram Shrestha"));
        assert!(!csv.contains("Hari KC"));
    }

    #[test]
    fn test_verified_csv_escapes_quotes() {
        let mut record = reg(
            "Ram \"RJ\" Shrestha",
            "Kathmandu Club",
            "President",
            "FF000009ZZZ",
            RegistrationStatus::Verified,
        );
        record.created_at = Utc.with_ymd_and_hms(2026, 1, 5, 16, 30, 0).unwrap();
        let csv = verified_csv(&[record]);
        assert!(csv.contains("\"Ram \"\"RJ\"\" Shrestha\""));
        assert!(csv.contains("\"Jan 5, 2026, 04:30 PM\""));
    }

    #[test]
    fn test_export_filename() {
        let at = Utc.with_ymd_and_hms(2026, 8, 5, 10, 0, 0).unwrap();
        assert_eq!(export_filename(at), "approved_registrations_2026-08-05.csv");
    }
}
