//! Daily Report Module
//!
//! Renders the sampled highlights into the HTML document of the daily report
//! and hands it to a [`ReportSink`]. Delivery (mail, file, anything else) lives
//! behind the sink.

mod sink;

pub use sink::{FileSink, ReportSink};

use crate::model::Highlight;
use anyhow::{Context, Result};
use askama::Template;
use chrono::NaiveDate;

pub const REPORT_TITLE: &str = "Recall Daily";
const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuote {
    pub text: String,
    /// Empty when the highlight carries no note.
    pub annotation: String,
    pub source: String,
}

impl From<&Highlight> for ReportQuote {
    fn from(highlight: &Highlight) -> Self {
        ReportQuote {
            text: highlight.text.clone(),
            annotation: highlight.annotation.clone().unwrap_or_default(),
            source: highlight.source.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "daily_report.html")]
pub struct DailyReport {
    title: &'static str,
    date: String,
    quotes: Vec<ReportQuote>,
}

impl DailyReport {
    pub fn new(date: NaiveDate, highlights: &[Highlight]) -> Self {
        DailyReport {
            title: REPORT_TITLE,
            date: date.format(DATE_FORMAT).to_string(),
            quotes: highlights.iter().map(ReportQuote::from).collect(),
        }
    }

    pub fn subject(&self) -> String {
        format!("Your {} Report - {}", REPORT_TITLE, self.date)
    }

    pub fn quotes(&self) -> &[ReportQuote] {
        &self.quotes
    }

    pub fn render_document(&self) -> Result<String> {
        self.render().context("failed to render daily report")
    }
}
