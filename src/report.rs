//! text rendering of credit summaries and payment schedules

use chrono::NaiveDate;

use crate::config::CreditRecord;
use crate::credit::Credit;
use crate::date::format_date;
use crate::decimal::Money;
use crate::errors::{CalculatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone)]
pub struct Column {
    pub title: &'static str,
    pub align: Align,
    /// drop the column when no row has a value in it
    pub hide_if_empty: bool,
}

impl Column {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            align: Align::Right,
            hide_if_empty: false,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn hide_if_empty(mut self) -> Self {
        self.hide_if_empty = true;
        self
    }
}

/// plain text table with per-column alignment
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// missing trailing cells render empty
    pub fn add_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn add_empty_row(&mut self) {
        self.add_row(Vec::new());
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn render(&self) -> String {
        let visible: Vec<usize> = (0..self.columns.len())
            .filter(|&i| {
                !self.columns[i].hide_if_empty || self.rows.iter().any(|row| !row[i].is_empty())
            })
            .collect();

        let widths: Vec<usize> = visible
            .iter()
            .map(|&i| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(self.columns[i].title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let titles: Vec<&str> = self.columns.iter().map(|c| c.title).collect();
        out.push_str(&self.render_line(&titles, &visible, &widths));
        out.push('\n');
        out.push_str(
            &widths
                .iter()
                .map(|&width| "-".repeat(width))
                .collect::<Vec<_>>()
                .join("  "),
        );
        out.push('\n');

        for row in &self.rows {
            let cells: Vec<&str> = row.iter().map(String::as_str).collect();
            out.push_str(&self.render_line(&cells, &visible, &widths));
            out.push('\n');
        }

        out
    }

    fn render_line(&self, cells: &[&str], visible: &[usize], widths: &[usize]) -> String {
        visible
            .iter()
            .zip(widths)
            .map(|(&i, &width)| pad(cells[i], width, self.columns[i].align))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    match align {
        Align::Left => format!("{}{}", cell, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), cell),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// include credits that ended before the info date
    pub show_all: bool,
    /// append the full payment schedule of every credit
    pub with_schedule: bool,
}

/// compute the credits to show, sorted by end date
pub fn select_credits(
    records: &[CreditRecord],
    info_date: NaiveDate,
    show_all: bool,
) -> Result<Vec<Credit>> {
    let mut credits = records
        .iter()
        .filter(|record| show_all || record.terms.end_date >= info_date)
        .map(|record| record.credit_info(info_date))
        .collect::<Result<Vec<_>>>()?;

    credits.sort_by_key(|credit| credit.end_date);
    Ok(credits)
}

/// summary table, with a totals row for the credits still open
pub fn summary_table(credits: &[Credit]) -> Table {
    let mut table = Table::new(vec![
        Column::new("Open date").centered(),
        Column::new("Close date").centered(),
        Column::new("Amount"),
        Column::new("Interest"),
        Column::new("Current amount"),
        Column::new("Month pay").hide_if_empty(),
        Column::new("Next payment").hide_if_empty(),
        Column::new("Closed").centered().hide_if_empty(),
    ]);

    let mut total_amount = Money::ZERO;
    let mut total_payment = Money::ZERO;

    for credit in credits {
        let closed = credit.is_closed();
        if !closed {
            total_amount += credit.current_amount;
            if let Some(payment) = credit.payment {
                total_payment += payment;
            }
        }

        table.add_row(vec![
            format_date(credit.start_date),
            format_date(credit.end_date),
            credit.amount.to_string(),
            credit.interest_rate.to_string(),
            credit.current_amount.to_string(),
            credit.payment.map(|p| p.to_string()).unwrap_or_default(),
            credit
                .next_payment
                .as_ref()
                .map(|p| format!("{} on {}", p.total_paid, format_date(p.date)))
                .unwrap_or_default(),
            if closed { "✓".to_string() } else { String::new() },
        ]);
    }

    if table.row_count() > 1 && (!total_amount.is_zero() || !total_payment.is_zero()) {
        let cell = |amount: Money| if amount.is_zero() { String::new() } else { amount.to_string() };

        table.add_empty_row();
        table.add_row(vec![
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            cell(total_amount),
            cell(total_payment),
        ]);
    }

    table
}

pub fn schedule_table(credit: &Credit) -> Table {
    let mut table = Table::new(vec![
        Column::new("Date").centered(),
        Column::new("Credit pay"),
        Column::new("Interest pay"),
        Column::new("Total"),
        Column::new("Credit"),
    ]);

    for payment in &credit.schedule.payments {
        table.add_row(vec![
            format_date(payment.date),
            payment.principal_paid.to_string(),
            payment.interest_paid.to_string(),
            payment.total_paid.to_string(),
            payment.remaining_balance.to_string(),
        ]);
    }

    table
}

/// full text report for the configured credits
pub fn render_report(
    records: &[CreditRecord],
    info_date: NaiveDate,
    options: ReportOptions,
) -> Result<String> {
    if records.is_empty() {
        return Ok("No credits specified.\n".to_string());
    }

    let credits = select_credits(records, info_date, options.show_all)?;
    if credits.is_empty() {
        return Ok("There are no active credits.\n".to_string());
    }

    let mut out = summary_table(&credits).render();

    if options.with_schedule {
        for credit in &credits {
            out.push_str(&format!(
                "\n\nPayment schedule for {} credit from {}:\n\n",
                credit.amount,
                format_date(credit.start_date)
            ));
            out.push_str(&schedule_table(credit).render());
        }
    }

    Ok(out)
}

/// the selected credits as pretty-printed JSON
pub fn render_json(records: &[CreditRecord], info_date: NaiveDate, show_all: bool) -> Result<String> {
    let credits = select_credits(records, info_date, show_all)?;
    serde_json::to_string_pretty(&credits).map_err(|e| CalculatorError::internal(e.to_string()))
}
