use crate::engine::Estimate;
use crate::isdc::{BucketTotal, IsdcRollup};
use crate::projection::{CashflowProjection, SensitivityReport};
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_estimate(&mut self, estimate: &Estimate) -> anyhow::Result<()>;
    fn write_cashflow(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()>;
    fn write_sensitivity(&mut self, report: &SensitivityReport) -> anyhow::Result<()>;
    /// Push buffered output to the sink, surfacing write errors.
    fn flush(&mut self) -> anyhow::Result<()>;
}

/// Format an amount with thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once(".").unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_estimate(&mut self, estimate: &Estimate) -> anyhow::Result<()> {
        self.write_json(estimate)
    }

    fn write_cashflow(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()> {
        self.write_json(cashflow)
    }

    fn write_sensitivity(&mut self, report: &SensitivityReport) -> anyhow::Result<()> {
        self.write_json(report)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "# {title}")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer, "Version: {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_level(&mut self, heading: &str, buckets: &[&BucketTotal], rollup: &IsdcRollup) -> anyhow::Result<()> {
        if buckets.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## {heading}")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Code | Title | Items | Labour | Investment | Expenses | Contingency | Total | Share |"
        )?;
        writeln!(
            self.writer,
            "|------|-------|-------|--------|------------|----------|-------------|-------|-------|"
        )?;
        for bucket in buckets {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
                bucket.code,
                bucket.title.as_deref().unwrap_or("-"),
                bucket.item_count,
                format_amount(bucket.cost.labour),
                format_amount(bucket.cost.investment),
                format_amount(bucket.cost.expenses),
                format_amount(bucket.cost.contingency),
                format_amount(bucket.cost.total),
                format_percent(rollup.percent_of_total(bucket.cost.total)),
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_cashflow_table(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()> {
        writeln!(self.writer, "## Cashflow")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Year | Nominal | Inflated | Discounted | Cumulative |")?;
        writeln!(self.writer, "|------|---------|----------|------------|------------|")?;
        for year in &cashflow.years {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} |",
                year.year,
                format_amount(year.nominal),
                format_amount(year.inflated),
                format_amount(year.discounted),
                format_amount(year.cumulative),
            )?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "**NPV:** {}", format_amount(cashflow.npv))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_sensitivity_table(&mut self, report: &SensitivityReport) -> anyhow::Result<()> {
        writeln!(self.writer, "## Sensitivity")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Scenario | Total cost | NPV | Change |")?;
        writeln!(self.writer, "|----------|------------|-----|--------|")?;
        for scenario in &report.scenarios {
            writeln!(
                self.writer,
                "| {} | {} | {} | {} |",
                scenario.name,
                format_amount(scenario.total_cost),
                format_amount(scenario.npv),
                format_percent(scenario.percent_change_vs_base),
            )?;
        }
        writeln!(self.writer)?;
        if let Some(best) = report.best() {
            writeln!(self.writer, "**Best scenario:** {} (NPV {})", best.name, format_amount(best.npv))?;
            writeln!(self.writer)?;
        }
        for rejected in &report.rejected {
            writeln!(self.writer, "- Rejected `{}`: {}", rejected.parameter, rejected.error)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_estimate(&mut self, estimate: &Estimate) -> anyhow::Result<()> {
        let title = match &estimate.project_name {
            Some(name) => format!("Decommissioning Cost Estimate: {name}"),
            None => "Decommissioning Cost Estimate".to_string(),
        };
        self.write_header(&title)?;

        let rollup = &estimate.rollup;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Items priced | {} |", estimate.items.len())?;
        writeln!(self.writer, "| Items skipped | {} |", estimate.skipped.total)?;
        writeln!(self.writer, "| Labour | {} |", format_amount(rollup.grand_total.labour))?;
        writeln!(self.writer, "| Investment | {} |", format_amount(rollup.grand_total.investment))?;
        writeln!(self.writer, "| Expenses | {} |", format_amount(rollup.grand_total.expenses))?;
        writeln!(self.writer, "| Contingency | {} |", format_amount(rollup.grand_total.contingency))?;
        writeln!(self.writer, "| **Grand total** | **{}** |", format_amount(rollup.grand_total.total))?;
        writeln!(self.writer)?;

        let l1: Vec<_> = rollup.by_l1.values().collect();
        self.write_level("Principal Activities (L1)", &l1, rollup)?;
        let l2: Vec<_> = rollup.by_l2.values().collect();
        self.write_level("Activity Groups (L2)", &l2, rollup)?;
        if rollup.unassigned.item_count > 0 {
            self.write_level("Unassigned", &[&rollup.unassigned], rollup)?;
        }

        if let Some(cashflow) = &estimate.cashflow {
            self.write_cashflow_table(cashflow)?;
        }
        if let Some(sensitivity) = &estimate.sensitivity {
            self.write_sensitivity_table(sensitivity)?;
        }

        write_warnings_markdown(&mut self.writer, estimate)?;
        Ok(())
    }

    fn write_cashflow(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()> {
        self.write_header("Cashflow Projection")?;
        self.write_cashflow_table(cashflow)
    }

    fn write_sensitivity(&mut self, report: &SensitivityReport) -> anyhow::Result<()> {
        self.write_header("Sensitivity Analysis")?;
        self.write_sensitivity_table(report)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn write_warnings_markdown<W: Write>(writer: &mut W, estimate: &Estimate) -> anyhow::Result<()> {
    let has_warnings = !estimate.skipped.is_empty()
        || !estimate.missing_unit_factor_codes.is_empty()
        || !estimate.rejected_isdc_codes.is_empty()
        || !estimate.projection_errors.is_empty();
    if !has_warnings {
        return Ok(());
    }

    writeln!(writer, "## Warnings")?;
    writeln!(writer)?;
    if !estimate.skipped.is_empty() {
        writeln!(writer, "- {}", estimate.skipped.headline())?;
    }
    if !estimate.missing_unit_factor_codes.is_empty() {
        writeln!(
            writer,
            "- Categories without unit factor: {}",
            estimate.missing_unit_factor_codes.join(", ")
        )?;
    }
    for rejected in &estimate.rejected_isdc_codes {
        writeln!(writer, "- ISDC code `{}` rejected: {}", rejected.code, rejected.reason)?;
    }
    for error in &estimate.projection_errors {
        writeln!(writer, "- Projection failed: {error}")?;
    }
    Ok(())
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

fn amount_cell(value: f64) -> Cell {
    Cell::new(format_amount(value)).set_alignment(CellAlignment::Right)
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn level_table(buckets: &[&BucketTotal], rollup: &IsdcRollup) -> Table {
    let mut table = new_table(vec!["Code", "Title", "Items", "Labour", "Investment", "Expenses", "Contingency", "Total", "Share"]);
    for bucket in buckets {
        table.add_row(vec![
            Cell::new(&bucket.code),
            Cell::new(bucket.title.as_deref().unwrap_or("")),
            Cell::new(bucket.item_count).set_alignment(CellAlignment::Right),
            amount_cell(bucket.cost.labour),
            amount_cell(bucket.cost.investment),
            amount_cell(bucket.cost.expenses),
            amount_cell(bucket.cost.contingency),
            amount_cell(bucket.cost.total),
            Cell::new(format_percent(rollup.percent_of_total(bucket.cost.total)))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn cashflow_table(cashflow: &CashflowProjection) -> Table {
    let mut table = new_table(vec!["Year", "Nominal", "Inflated", "Discounted", "Cumulative"]);
    for year in &cashflow.years {
        table.add_row(vec![
            Cell::new(year.year),
            amount_cell(year.nominal),
            amount_cell(year.inflated),
            amount_cell(year.discounted),
            amount_cell(year.cumulative),
        ]);
    }
    table
}

fn sensitivity_table(report: &SensitivityReport) -> Table {
    let mut table = new_table(vec!["Scenario", "Total cost", "NPV", "Change"]);
    for scenario in report.ranked() {
        table.add_row(vec![
            Cell::new(&scenario.name),
            amount_cell(scenario.total_cost),
            amount_cell(scenario.npv),
            Cell::new(format_percent(scenario.percent_change_vs_base))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

impl<W: Write> TerminalWriter<W> {
    fn heading(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", title.bold().blue())?;
        writeln!(self.writer, "{}", "=".repeat(title.len()).blue())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn section(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", title.bold())?;
        Ok(())
    }

    fn print_cashflow(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()> {
        self.section("Cashflow:")?;
        writeln!(self.writer, "{}", cashflow_table(cashflow))?;
        writeln!(self.writer, "  NPV: {}", format_amount(cashflow.npv).green())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_sensitivity(&mut self, report: &SensitivityReport) -> anyhow::Result<()> {
        self.section("Sensitivity (ranked by NPV):")?;
        writeln!(self.writer, "{}", sensitivity_table(report))?;
        if let Some(best) = report.best() {
            writeln!(
                self.writer,
                "  Best scenario: {} (NPV {})",
                best.name.green(),
                format_amount(best.npv)
            )?;
        }
        for rejected in &report.rejected {
            writeln!(
                self.writer,
                "  {} {}: {}",
                "Rejected".yellow(),
                rejected.parameter,
                rejected.error
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_warnings(&mut self, estimate: &Estimate) -> anyhow::Result<()> {
        if !estimate.skipped.is_empty() {
            writeln!(self.writer, "{} {}", "⚠".yellow(), estimate.skipped.report().trim_end())?;
        }
        if !estimate.missing_unit_factor_codes.is_empty() {
            writeln!(
                self.writer,
                "{} Categories without unit factor: {}",
                "⚠".yellow(),
                estimate.missing_unit_factor_codes.join(", ")
            )?;
        }
        for rejected in &estimate.rejected_isdc_codes {
            writeln!(
                self.writer,
                "{} ISDC code {} rejected: {}",
                "⚠".yellow(),
                rejected.code,
                rejected.reason
            )?;
        }
        for error in &estimate.projection_errors {
            writeln!(self.writer, "{} Projection failed: {}", "✗".red(), error)?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_estimate(&mut self, estimate: &Estimate) -> anyhow::Result<()> {
        let title = match &estimate.project_name {
            Some(name) => format!("Cost Estimate: {name}"),
            None => "Cost Estimate".to_string(),
        };
        self.heading(&title)?;

        let rollup = &estimate.rollup;
        self.section("Summary:")?;
        writeln!(self.writer, "  Items priced: {}", estimate.items.len())?;
        writeln!(self.writer, "  Items skipped: {}", estimate.skipped.total)?;
        writeln!(
            self.writer,
            "  Grand total: {}",
            format_amount(rollup.grand_total.total).bold().green()
        )?;
        writeln!(self.writer)?;

        if !rollup.by_l1.is_empty() {
            self.section("Principal activities (L1):")?;
            let l1: Vec<_> = rollup.by_l1.values().collect();
            writeln!(self.writer, "{}", level_table(&l1, rollup))?;
            writeln!(self.writer)?;
        }
        if rollup.unassigned.item_count > 0 {
            self.section("Unassigned:")?;
            writeln!(self.writer, "{}", level_table(&[&rollup.unassigned], rollup))?;
            writeln!(self.writer)?;
        }

        if let Some(cashflow) = &estimate.cashflow {
            self.print_cashflow(cashflow)?;
        }
        if let Some(sensitivity) = &estimate.sensitivity {
            self.print_sensitivity(sensitivity)?;
        }

        self.print_warnings(estimate)
    }

    fn write_cashflow(&mut self, cashflow: &CashflowProjection) -> anyhow::Result<()> {
        self.heading("Cashflow Projection")?;
        self.print_cashflow(cashflow)
    }

    fn write_sensitivity(&mut self, report: &SensitivityReport) -> anyhow::Result<()> {
        self.heading("Sensitivity Analysis")?;
        self.print_sensitivity(report)
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn create_writer<'a>(format: OutputFormat, sink: Box<dyn Write + 'a>) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(sink)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(sink)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, run_scenarios};

    fn render(format: OutputFormat, f: impl FnOnce(&mut dyn OutputWriter) -> anyhow::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        {
            let mut writer = create_writer(format, Box::new(&mut buffer));
            f(writer.as_mut()).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    struct FailingFlush;

    impl Write for FailingFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("disk full"))
        }
    }

    #[test]
    fn test_flush_errors_reach_the_caller() {
        let cashflow = project(1000.0, 2026, 2, 0.0, 0.0).unwrap();

        for format in [OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Terminal] {
            let mut writer = create_writer(format, Box::new(FailingFlush));
            writer.write_cashflow(&cashflow).unwrap();
            let err = writer.flush().unwrap_err();
            assert!(err.to_string().contains("disk full"), "{format:?}");
        }
    }

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.5), "999.50");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-6303.0), "-6,303.00");
        assert_eq!(format_amount(-0.001), "0.00");
    }

    #[test]
    fn test_json_cashflow_is_parseable() {
        let cashflow = project(1000.0, 2026, 4, 2.0, 3.0).unwrap();
        let out = render(OutputFormat::Json, |w| w.write_cashflow(&cashflow));

        let parsed: CashflowProjection = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.years.len(), 4);
    }

    #[test]
    fn test_markdown_sensitivity_lists_best() {
        let report = run_scenarios(1000.0, 3.0, &[0.8, 1.2], &[10]).unwrap();
        let out = render(OutputFormat::Markdown, |w| w.write_sensitivity(&report));

        assert!(out.starts_with("# Sensitivity Analysis"));
        assert!(out.contains("| Unit factors x0.8 |"));
        assert!(out.contains("**Best scenario:**"));
    }

    #[test]
    fn test_terminal_cashflow_table() {
        let cashflow = project(1_000_000.0, 2026, 3, 2.0, 3.0).unwrap();
        let out = render(OutputFormat::Terminal, |w| w.write_cashflow(&cashflow));

        assert!(out.contains("Cashflow Projection"));
        assert!(out.contains("2028"));
        assert!(out.contains("333,333.33"));
    }
}
