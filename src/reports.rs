//! The four report kinds and what each reads from the workbook

use std::fmt;

use clap::ValueEnum;

use crate::series::{ColumnSelection, DerivedSeries, TimeSeries};

pub const REGIONAL_SHEET: &str = "Antal per dag region";
pub const DEATHS_SHEET: &str = "Antal avlidna per dag";
pub const ICU_SHEET: &str = "Antal intensivvårdade per dag";

/// Column holding the national total in the regional sheet
pub const NATIONAL_TOTAL_COLUMN: &str = "Totalt_antal_fall";
pub const NATIONAL_TITLE: &str = "Sverige";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ReportKind {
    /// Daily cases per region, plus the national total
    Regional,
    /// Running total of deaths
    Deaths,
    /// Deaths per day
    DeathsPerDay,
    /// New ICU admissions per day
    IcuPerDay,
}

/// How the primary series of a chart is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Daily values as bars with the rolling mean on top
    DailyBars,
    /// The cumulative sum as a line with the rolling mean on top
    CumulativeLine,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Regional,
        ReportKind::Deaths,
        ReportKind::DeathsPerDay,
        ReportKind::IcuPerDay,
    ];

    pub fn sheet_label(self) -> &'static str {
        match self {
            ReportKind::Regional => REGIONAL_SHEET,
            ReportKind::Deaths | ReportKind::DeathsPerDay => DEATHS_SHEET,
            ReportKind::IcuPerDay => ICU_SHEET,
        }
    }

    pub fn date_column(self) -> &'static str {
        match self {
            ReportKind::Regional => "Statistikdatum",
            ReportKind::Deaths | ReportKind::DeathsPerDay => "Datum_avliden",
            ReportKind::IcuPerDay => "Datum_vårdstart",
        }
    }

    pub fn selection(self) -> ColumnSelection {
        match self {
            ReportKind::Regional => ColumnSelection::AllExceptDate,
            ReportKind::Deaths | ReportKind::DeathsPerDay => {
                ColumnSelection::only(["Antal_avlidna"])
            }
            ReportKind::IcuPerDay => ColumnSelection::only(["Antal_intensivvårdade"]),
        }
    }

    /// Columns that must exist for the report to run
    pub fn required_columns(self) -> Vec<&'static str> {
        match self {
            ReportKind::Regional => vec!["Statistikdatum"],
            ReportKind::Deaths | ReportKind::DeathsPerDay => vec!["Datum_avliden", "Antal_avlidna"],
            ReportKind::IcuPerDay => vec!["Datum_vårdstart", "Antal_intensivvårdade"],
        }
    }

    pub fn chart_style(self) -> ChartStyle {
        match self {
            ReportKind::Deaths => ChartStyle::CumulativeLine,
            _ => ChartStyle::DailyBars,
        }
    }

    /// Stable identifier, also the output sub-directory
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::Regional => "regional",
            ReportKind::Deaths => "deaths",
            ReportKind::DeathsPerDay => "deaths-per-day",
            ReportKind::IcuPerDay => "icu-per-day",
        }
    }

    /// Display title for a series read from `column`.
    ///
    /// The regional national-total column is shown as "Sverige"; every other
    /// column keeps its own name.
    pub fn display_title(self, column: &str) -> String {
        match self {
            ReportKind::Regional if column == NATIONAL_TOTAL_COLUMN => NATIONAL_TITLE.to_string(),
            _ => column.to_string(),
        }
    }

    pub fn caption(self, title: &str) -> String {
        match self {
            ReportKind::Regional => format!("Covid 19 Fall i {title}"),
            ReportKind::Deaths => "Covid 19 avlidna totalt".to_string(),
            ReportKind::DeathsPerDay => "Covid 19 avlidna per dag".to_string(),
            ReportKind::IcuPerDay => "Covid 19 intensivvårdade per dag".to_string(),
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            ReportKind::Regional => "Antal fall",
            ReportKind::Deaths | ReportKind::DeathsPerDay => "Antal avlidna",
            ReportKind::IcuPerDay => "Antal intensivvårdade",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Everything the rendering side receives for one series
#[derive(Debug, Clone, PartialEq)]
pub struct ReportChart {
    pub kind: ReportKind,
    /// Raw column name; identifies the output file
    pub name: String,
    pub title: String,
    pub series: TimeSeries,
    pub derived: DerivedSeries,
}

impl ReportChart {
    pub fn caption(&self) -> String {
        self.kind.caption(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_total_is_titled_sverige() {
        assert_eq!(ReportKind::Regional.display_title("Totalt_antal_fall"), "Sverige");
    }

    #[test]
    fn test_other_columns_keep_their_name() {
        assert_eq!(ReportKind::Regional.display_title("Stockholm"), "Stockholm");
        assert_eq!(
            ReportKind::Regional.display_title("Jämtland_Härjedalen"),
            "Jämtland_Härjedalen"
        );
    }

    #[test]
    fn test_renaming_only_applies_to_regional_report() {
        assert_eq!(
            ReportKind::DeathsPerDay.display_title("Totalt_antal_fall"),
            "Totalt_antal_fall"
        );
    }

    #[test]
    fn test_sheet_labels() {
        assert_eq!(ReportKind::Regional.sheet_label(), "Antal per dag region");
        assert_eq!(ReportKind::Deaths.sheet_label(), "Antal avlidna per dag");
        assert_eq!(ReportKind::DeathsPerDay.sheet_label(), "Antal avlidna per dag");
        assert_eq!(ReportKind::IcuPerDay.sheet_label(), "Antal intensivvårdade per dag");
    }

    #[test]
    fn test_cli_names_match_slugs() {
        for kind in ReportKind::ALL {
            let parsed = ReportKind::from_str(kind.slug(), false).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_regional_caption() {
        assert_eq!(ReportKind::Regional.caption("Sverige"), "Covid 19 Fall i Sverige");
    }

    #[test]
    fn test_chart_styles() {
        assert_eq!(ReportKind::Deaths.chart_style(), ChartStyle::CumulativeLine);
        assert_eq!(ReportKind::IcuPerDay.chart_style(), ChartStyle::DailyBars);
    }
}
