//! Most recent filings.

use patentlens_features::{parse_date, NaiveDate};
use patentlens_model::{status_label, PatentRecord, RecentPatentView};

/// The `n` most recently filed records, newest first.
///
/// Ordering compares parsed dates, so compact and dashed forms mix freely.
/// Records with a malformed filing date cannot be placed and are left out.
/// Equal dates keep input order.
pub fn recent<'a, I>(records: I, n: usize) -> Vec<RecentPatentView>
where
    I: IntoIterator<Item = &'a PatentRecord>,
{
    let mut dated: Vec<(NaiveDate, &PatentRecord)> = records
        .into_iter()
        .filter_map(|r| parse_date(&r.application_date).ok().map(|d| (d, r)))
        .collect();

    dated.sort_by(|a, b| b.0.cmp(&a.0));

    dated
        .into_iter()
        .take(n)
        .map(|(date, record)| project(record, date))
        .collect()
}

fn project(record: &PatentRecord, date: NaiveDate) -> RecentPatentView {
    RecentPatentView {
        application_number: Some(record.application_number.clone()),
        title: record.title.clone(),
        applicant: record.applicant.clone(),
        date: date.format("%Y-%m-%d").to_string(),
        ipc: record.ipc_code().map(str::to_string),
        status: status_label(&record.status),
        is_favorite: false,
    }
}
