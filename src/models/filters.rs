use chrono::NaiveDate;

/// Donor directory query. Text fields match case-insensitively; `search`
/// is split on whitespace and every term must hit at least one column.
#[derive(Debug, Default, Clone)]
pub struct DonorFilter {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: Option<String>,
    pub search: Option<String>,
}
