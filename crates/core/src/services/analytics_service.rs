use std::collections::BTreeMap;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::models::analytics::{AnalyticsWindow, MonthlyTotal, SourceTotal};
use crate::models::domain::EntryDomain;
use crate::models::entry::EntryRecord;

use super::palette_service::PaletteService;

/// Read-only summaries over a fetched list of income or expense records.
///
/// Nothing here touches the network or the palette store; callers pass the
/// records they already hold (typically from `EntryService::list`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Records dated within `window` before `today`, both ends inclusive.
    /// Undated records are never included.
    pub fn by_period<'a>(
        &self,
        records: &'a [EntryRecord],
        window: AnalyticsWindow,
        today: NaiveDate,
    ) -> Vec<&'a EntryRecord> {
        let start = window_start(window, today);
        records
            .iter()
            .filter(|r| matches!(r.date, Some(date) if date >= start && date <= today))
            .collect()
    }

    /// Totals per calendar month, oldest first. Undated records are skipped.
    pub fn monthly_trends(&self, records: &[EntryRecord]) -> Vec<MonthlyTotal> {
        let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for record in records {
            if let Some(date) = record.date {
                *months.entry((date.year(), date.month())).or_insert(0.0) += record.amount;
            }
        }
        months
            .into_iter()
            .map(|((year, month), total)| MonthlyTotal {
                month: format!("{year}-{month}"),
                total,
            })
            .collect()
    }

    /// Totals per label, largest first. Ties keep first-seen order.
    pub fn by_source(&self, records: &[EntryRecord], domain: EntryDomain) -> Vec<SourceTotal> {
        let mut sources: Vec<SourceTotal> = Vec::new();
        for record in records {
            let source = record.label().unwrap_or(domain.unnamed_label());
            let color = record.color.as_deref().filter(|c| !c.is_empty());
            match sources.iter_mut().find(|s| s.source == source) {
                Some(existing) => {
                    existing.total += record.amount;
                    if existing.color.is_empty() {
                        existing.color = color.unwrap_or_default().to_string();
                    }
                }
                None => sources.push(SourceTotal {
                    source: source.to_string(),
                    total: record.amount,
                    color: color.unwrap_or_default().to_string(),
                }),
            }
        }

        let fallback = PaletteService::fallback_color(domain);
        for s in &mut sources {
            if s.color.is_empty() {
                s.color = fallback.to_string();
            }
        }
        sources.sort_by(|a, b| b.total.total_cmp(&a.total));
        sources
    }

    /// Expected total of recurring records over the next `months` months.
    /// A recurring record without a frequency counts as monthly.
    pub fn projected(&self, records: &[EntryRecord], months: u32) -> f64 {
        records
            .iter()
            .filter(|r| r.recurring)
            .map(|r| r.amount * r.frequency.unwrap_or_default().occurrences(months))
            .sum()
    }

    pub fn recurring<'a>(&self, records: &'a [EntryRecord]) -> Vec<&'a EntryRecord> {
        records.iter().filter(|r| r.recurring).collect()
    }
}

fn window_start(window: AnalyticsWindow, today: NaiveDate) -> NaiveDate {
    match window {
        AnalyticsWindow::Week => today - Duration::days(7),
        // checked_sub_months clamps to the last valid day (Mar 31 -> Feb 28).
        AnalyticsWindow::Month => today.checked_sub_months(Months::new(1)).unwrap_or(NaiveDate::MIN),
        AnalyticsWindow::Year => today.checked_sub_months(Months::new(12)).unwrap_or(NaiveDate::MIN),
    }
}
