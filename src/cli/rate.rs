use super::ui;
use crate::core::convert::format_rate;
use crate::core::response::{RateOutcome, STALE_WARNING};
use crate::core::service::RateService;
use anyhow::Result;
use comfy_table::Cell;

impl RateOutcome {
    pub fn display_as_table(&self, pair: &str) -> String {
        let record = self.record();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Pair"),
            ui::header_cell("Rate"),
            ui::header_cell("Date (UTC)"),
            ui::header_cell("Source"),
        ]);
        table.add_row(vec![
            Cell::new(pair),
            ui::number_cell(format_rate(record.rate)),
            Cell::new(record.date.to_string()),
            ui::source_cell(self.source_label()),
        ]);

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Exchange Rate", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        if let RateOutcome::Stale { cause, .. } = self {
            output.push_str(&format!(
                "\n\n{}\n{}",
                ui::style_text(STALE_WARNING, ui::StyleType::Warning),
                ui::style_text(&cause.to_string(), ui::StyleType::Subtle)
            ));
        }
        output
    }
}

/// Looks the rate up once and prints it.
pub async fn run(service: &RateService) -> Result<()> {
    let spinner = ui::new_spinner("Looking up exchange rate...");
    let result = service.get_rate().await;
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("{}", outcome.display_as_table(&service.pair().to_string()));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::rate::RateRecord;
    use chrono::NaiveDate;

    fn record() -> RateRecord {
        RateRecord::new(3912.456, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_table_shows_rate_and_source() {
        let output = RateOutcome::Fresh(record()).display_as_table("USD/COP");
        assert!(output.contains("USD/COP"));
        assert!(output.contains("3,912.46"));
        assert!(output.contains("2024-01-01"));
        assert!(output.contains("fresh"));
        assert!(!output.contains(STALE_WARNING));
    }

    #[test]
    fn test_stale_table_includes_warning() {
        let outcome = RateOutcome::Stale {
            record: record(),
            cause: FetchError::UpstreamUnavailable("connection reset".to_string()),
        };
        let output = outcome.display_as_table("USD/COP");
        assert!(output.contains("stale"));
        assert!(output.contains(STALE_WARNING));
        assert!(output.contains("connection reset"));
    }
}
