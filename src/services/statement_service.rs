use std::fmt::Write as _;
use std::io::BufWriter;

use chrono::NaiveDate;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::errors::AppError;
use crate::models::{EarningsSummary, PlannerSettings, Statement, StatementLine};
use crate::services::currency_service;

pub fn build_statement(settings: &PlannerSettings, summary: &EarningsSummary, generated_on: NaiveDate) -> Statement {
    let currency = summary.currency.clone();
    let line = |name: &str, amount: f64| StatementLine {
        name: name.to_string(),
        amount,
        formatted: currency_service::format(amount, &currency),
    };
    let b = &summary.breakdown;

    Statement {
        generated_on,
        working_days: b.working_days,
        bills: settings
            .bills
            .iter()
            .filter(|bill| bill.is_listed())
            .map(|bill| line(bill.name.trim(), bill.amount))
            .collect(),
        total_expenses: line("Total Expenses", b.total_expenses),
        profit: line("Desired Profit", b.profit),
        savings: line("Savings Goal", b.savings),
        daily_earnings: line("Required Daily Earnings", b.daily_earnings),
        currency,
    }
}

pub fn pdf_filename(date: NaiveDate) -> String {
    format!("financial-statement-{}.pdf", date.format("%Y-%m-%d"))
}

const TEXT_WIDTH: usize = 44;

/// Plain-text rendering for printing.
pub fn render_text(statement: &Statement) -> String {
    let rule = "-".repeat(TEXT_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{:^width$}", "FINANCIAL STATEMENT", width = TEXT_WIDTH);
    let _ = writeln!(
        out,
        "{:^width$}",
        format!("Summary for {}", statement.generated_on.format("%B %Y")),
        width = TEXT_WIDTH
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Currency: {}", statement.currency);
    let _ = writeln!(out, "Working Days: {}", statement.working_days);
    let _ = writeln!(out);

    let _ = writeln!(out, "Monthly Expenses");
    let _ = writeln!(out, "{}", rule);
    for bill in &statement.bills {
        push_row(&mut out, bill);
    }
    if statement.bills.is_empty() {
        let _ = writeln!(out, "(no bills)");
    }
    let _ = writeln!(out, "{}", rule);
    push_row(&mut out, &statement.total_expenses);
    let _ = writeln!(out);

    let _ = writeln!(out, "Goals");
    let _ = writeln!(out, "{}", rule);
    push_row(&mut out, &statement.profit);
    push_row(&mut out, &statement.savings);
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", rule);
    push_row(&mut out, &statement.daily_earnings);
    let _ = writeln!(out, "{:>width$}", "per working day", width = TEXT_WIDTH);

    out
}

fn push_row(out: &mut String, line: &StatementLine) {
    let name_width = TEXT_WIDTH.saturating_sub(line.formatted.chars().count() + 1);
    let name: String = line.name.chars().take(name_width).collect();
    let padding = TEXT_WIDTH.saturating_sub(name.chars().count() + line.formatted.chars().count());
    let _ = writeln!(out, "{}{}{}", name, " ".repeat(padding.max(1)), line.formatted);
}

fn push_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, x: f32, y: f32) {
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn push_rule(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(20.0), Mm(y)), false),
            (Point::new(Mm(190.0), Mm(y)), false),
        ],
        is_closed: false,
    });
}

/// Single A4 page with the statement. Amounts use ASCII currency labels.
pub fn render_pdf(statement: &Statement) -> Result<Vec<u8>, AppError> {
    let pdf_err = |e: printpdf::Error| AppError::Internal(format!("PDF rendering failed: {}", e));

    let (doc, page, layer) = PdfDocument::new("Financial Statement", Mm(210.0), Mm(297.0), "Statement");
    let layer = doc.get_page(page).get_layer(layer);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;

    let amount = |value: f64| currency_service::format_ascii(value, &statement.currency);
    let (x_name, x_amount) = (20.0, 150.0);
    let mut y: f32 = 272.0;

    push_text(&layer, &bold, "Financial Statement", 22.0, 20.0, y);
    y -= 8.0;
    push_text(
        &layer,
        &font,
        &format!("Summary for {}", statement.generated_on.format("%B %Y")),
        11.0,
        20.0,
        y,
    );
    y -= 12.0;
    push_text(&layer, &font, &format!("Currency: {}", statement.currency), 10.0, x_name, y);
    push_text(&layer, &font, &format!("Working Days: {}", statement.working_days), 10.0, 110.0, y);

    y -= 14.0;
    push_text(&layer, &bold, "Monthly Expenses", 14.0, x_name, y);
    y -= 3.0;
    push_rule(&layer, y);
    y -= 7.0;

    for bill in &statement.bills {
        // Leave room for the totals below.
        if y < 90.0 {
            push_text(&layer, &font, "...", 10.0, x_name, y);
            y -= 6.0;
            break;
        }
        push_text(&layer, &font, &pdf_safe(&bill.name), 10.0, x_name, y);
        push_text(&layer, &font, &amount(bill.amount), 10.0, x_amount, y);
        y -= 6.0;
    }

    push_rule(&layer, y + 3.0);
    y -= 3.0;
    push_text(&layer, &bold, &statement.total_expenses.name, 11.0, x_name, y);
    push_text(&layer, &bold, &amount(statement.total_expenses.amount), 11.0, x_amount, y);

    y -= 14.0;
    push_text(&layer, &bold, "Goals", 14.0, x_name, y);
    y -= 3.0;
    push_rule(&layer, y);
    y -= 7.0;
    for goal in [&statement.profit, &statement.savings] {
        push_text(&layer, &font, &goal.name, 10.0, x_name, y);
        push_text(&layer, &font, &amount(goal.amount), 10.0, x_amount, y);
        y -= 6.0;
    }

    y -= 10.0;
    push_text(&layer, &font, &statement.daily_earnings.name, 12.0, x_name, y);
    y -= 10.0;
    push_text(&layer, &bold, &amount(statement.daily_earnings.amount), 24.0, x_name, y);
    y -= 7.0;
    push_text(&layer, &font, "per working day", 11.0, x_name, y);

    push_text(
        &layer,
        &font,
        &format!("Generated on {}", statement.generated_on.format("%Y-%m-%d")),
        8.0,
        20.0,
        12.0,
    );

    let mut writer = BufWriter::new(Vec::<u8>::new());
    doc.save(&mut writer).map_err(pdf_err)?;
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("PDF buffer error: {}", e)))
}

/// Built-in fonts only cover Latin-1; anything else becomes '?'.
fn pdf_safe(text: &str) -> String {
    text.chars().map(|c| if (c as u32) < 0x100 { c } else { '?' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Bill;
    use crate::services::earnings_service;

    fn statement() -> Statement {
        let mut settings = PlannerSettings::default();
        settings.bills.push(Bill::new("", 40.0));
        settings.bills.push(Bill::new("Gym", 0.0));
        let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();
        let summary = earnings_service::summarize_settings(&settings, date);
        build_statement(&settings, &summary, date)
    }

    #[test]
    fn test_statement_lists_only_named_positive_bills() {
        let statement = statement();
        assert_eq!(statement.bills.len(), 4);
        assert_eq!(statement.bills[0].formatted, "$1,200.00");
        assert_eq!(statement.working_days, 22);
    }

    #[test]
    fn test_unlisted_bills_still_count_toward_totals() {
        let statement = statement();
        // 1485 listed + 40 from the unnamed bill
        assert_eq!(statement.total_expenses.amount, 1525.0);
        assert_eq!(statement.total_expenses.formatted, "$1,525.00");
        assert_eq!(statement.daily_earnings.formatted, "$137.50");
    }

    #[test]
    fn test_text_rendering() {
        let text = render_text(&statement());
        assert!(text.contains("FINANCIAL STATEMENT"));
        assert!(text.contains("September 2026"));
        assert!(text.contains("Monthly Rent"));
        assert!(text.contains("$1,525.00"));
        assert!(text.contains("$137.50"));
        assert!(text.contains("per working day"));
        assert!(!text.contains("Gym"));
    }

    #[test]
    fn test_pdf_rendering_produces_pdf_bytes() {
        let bytes = render_pdf(&statement()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_pdf_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(pdf_filename(date), "financial-statement-2026-10-16.pdf");
    }

    #[test]
    fn test_pdf_safe_replaces_wide_chars() {
        assert_eq!(pdf_safe("Café ₹"), "Café ?");
    }
}
