/// Pure filtering, ordering and aggregation over report collections.
/// Nothing here touches storage; callers supply the records.
use crate::domain::{CancellationTotals, Report, ReportFilter, Statistics};

/// Exact-match AND filter. Empty or absent clauses are wildcards.
pub fn filter_reports(reports: &[Report], filter: &ReportFilter) -> Vec<Report> {
    reports
        .iter()
        .filter(|r| {
            clause_matches(filter.airport.as_deref(), &r.airport)
                && clause_matches(filter.report_date.as_deref(), &r.report_date)
                && clause_matches(filter.report_time.as_deref(), &r.report_time)
        })
        .cloned()
        .collect()
}

fn clause_matches(clause: Option<&str>, value: &str) -> bool {
    match clause {
        Some(wanted) if !wanted.is_empty() => wanted == value,
        _ => true,
    }
}

/// Newest-first presentation order: stable sort on `(report_date,
/// report_time)` compared as strings, descending. Empty keys sort last.
pub fn sort_descending(reports: &mut [Report]) {
    reports.sort_by(|a, b| {
        (b.report_date.as_str(), b.report_time.as_str())
            .cmp(&(a.report_date.as_str(), a.report_time.as_str()))
    });
}

/// Headquarters aggregate over an already-filtered report set. Every
/// report contributes its counters; multiple reports for the same
/// airport and slot are not de-duplicated.
pub fn aggregate_statistics(reports: &[Report]) -> Statistics {
    let mut airports_with_snow: Vec<String> = Vec::new();
    let mut airports_with_warnings: Vec<String> = Vec::new();
    let mut international = 0_i64;
    let mut domestic = 0_i64;

    for report in reports {
        let weather = &report.weather;
        if !weather.snowfall_amount.is_empty() || !weather.cumulative_snowfall.is_empty() {
            push_distinct(&mut airports_with_snow, &report.airport);
        }
        if weather.preliminary_warning || weather.advisory || weather.warning {
            push_distinct(&mut airports_with_warnings, &report.airport);
        }

        international += report.flight_status.international.cancelled_total;
        domestic += report.flight_status.domestic.cancelled_total;
    }

    Statistics {
        total_reports: reports.len(),
        airports_with_snow,
        airports_with_warnings,
        total_cancellations: CancellationTotals {
            international,
            domestic,
            total: international + domestic,
        },
    }
}

/// Append keeping first-seen order; the collection stays small (15
/// airports at most).
fn push_distinct(seen: &mut Vec<String>, airport: &str) {
    if !seen.iter().any(|a| a == airport) {
        seen.push(airport.to_string());
    }
}
