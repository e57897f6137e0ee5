use ansi_term::{Colour, Style};
use clap::Parser;

use crate::{
    aggregate::{wall_clock::format_duration, Aggregation},
    storage::catalog::CategoryCatalog,
    utils::percentage::Percentage,
};

use super::output::{analysis::PeriodReport, period::Period};

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(long, short, default_value_t = Period::Day, help = "Period containing the date")]
    pub period: Period,
    #[arg(long, help = "Also show categories without any time")]
    pub all: bool,
    #[arg(
        short = 'm',
        long = "min-percentage",
        help = "Hide categories below this share of tracked time",
        default_value_t = Percentage::ZERO
    )]
    pub min_percentage: Percentage,
}

/// A row of a report, everything a table or chart needs.
#[derive(Debug, PartialEq)]
pub struct ReportLine<'a> {
    pub label: &'a str,
    pub display_text: &'a str,
    pub hours: f64,
    pub percentage: Percentage,
}

/// Rows of an aggregation in display order.
pub fn report_lines<'a>(
    aggregation: &'a Aggregation,
    catalog: &'a CategoryCatalog,
    include_empty: bool,
    min_percentage: Percentage,
) -> Vec<ReportLine<'a>> {
    let mut entries = aggregation.ranked();
    if include_empty {
        entries.extend(
            aggregation
                .totals
                .iter()
                .filter(|(_, total)| total.total_minutes == 0)
                .map(|(key, total)| (key.as_str(), total)),
        );
    }
    entries
        .into_iter()
        .filter(|(_, total)| total.percentage >= min_percentage)
        .map(|(key, total)| ReportLine {
            label: catalog.label_for(key),
            display_text: &total.display_text,
            hours: total.fractional_hours(),
            percentage: total.percentage,
        })
        .collect()
}

pub fn print_report(report: &PeriodReport, catalog: &CategoryCatalog, command: &ReportCommand) {
    let title = Style::new().bold();
    println!(
        "{}",
        title.paint(format!("{} report: {}", report.period, report.range))
    );
    print_aggregation(&report.overall, catalog, command);

    for (bucket, aggregation) in &report.breakdown {
        if aggregation.total_tracked_minutes == 0 {
            continue;
        }
        println!();
        println!(
            "{}",
            Style::new().underline().paint(format!(
                "{} ({})",
                bucket.label,
                format_duration(aggregation.total_tracked_minutes)
            ))
        );
        print_aggregation(aggregation, catalog, command);
    }
}

fn print_aggregation(
    aggregation: &Aggregation,
    catalog: &CategoryCatalog,
    command: &ReportCommand,
) {
    println!(
        "Total {} ({:.1}h)",
        format_duration(aggregation.total_tracked_minutes),
        aggregation.total_tracked_minutes as f64 / 60.
    );
    for line in report_lines(aggregation, catalog, command.all, command.min_percentage) {
        println!(
            "{}\t{}\t{:.2}h\t{}",
            Colour::Green.paint(format!("{:>4}", line.percentage.to_string())),
            line.display_text,
            line.hours,
            line.label
        );
    }
    for rejected in &aggregation.rejected {
        println!(
            "{} block {} ({}-{}): {}",
            Colour::Yellow.paint("skipped"),
            rejected.block.id,
            rejected.block.start_time,
            rejected.block.end_time,
            rejected.reason
        );
    }
    if aggregation.unknown_category_blocks > 0 {
        println!(
            "{} {} blocks with unregistered categories",
            Colour::Yellow.paint("skipped"),
            aggregation.unknown_category_blocks
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        aggregate::{aggregate, AggregationPolicy},
        storage::entities::TimeBlock,
    };

    fn aggregation() -> Aggregation {
        let blocks = vec![
            TimeBlock::new("09:00", "12:00", "work"),
            TimeBlock::new("13:00", "14:30", "study"),
            TimeBlock::new("15:00", "15:10", "reading"),
        ];
        let catalog = CategoryCatalog::default();
        aggregate(&blocks, catalog.keys(), AggregationPolicy::default())
    }

    #[test]
    fn test_report_lines_ranked_with_labels() {
        let aggregation = aggregation();
        let catalog = CategoryCatalog::default();
        let lines = report_lines(&aggregation, &catalog, false, Percentage::ZERO);

        assert_eq!(
            lines,
            vec![
                ReportLine {
                    label: "업무",
                    display_text: "3시간",
                    hours: 3.,
                    percentage: "64".parse().unwrap(),
                },
                ReportLine {
                    label: "공부",
                    display_text: "1시간 30분",
                    hours: 1.5,
                    percentage: "32".parse().unwrap(),
                },
                ReportLine {
                    label: "reading",
                    display_text: "10분",
                    hours: 0.17,
                    percentage: "4".parse().unwrap(),
                },
            ]
        );
    }

    #[test]
    fn test_report_lines_include_empty_and_threshold() {
        let aggregation = aggregation();
        let catalog = CategoryCatalog::default();

        let all = report_lines(&aggregation, &catalog, true, Percentage::ZERO);
        assert_eq!(all.len(), 7);
        assert_eq!(all[3].display_text, "0분");

        let filtered = report_lines(&aggregation, &catalog, false, "10".parse().unwrap());
        assert_eq!(filtered.len(), 2);
    }
}
