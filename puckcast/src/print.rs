use std::fmt::Display;

use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::calibration::{AccuracyBin, CalibrationBin, ConfidenceBin, GradeSummary};
use crate::compare::ModelMarketComparison;
use crate::ledger::{Bet, RunningState};
use crate::metrics::RoiMetrics;
use crate::simulate::FractionalKelly;

fn header(cells: &[&str]) -> Row {
    Row::new(
        Styles::default().with(Header(true)),
        cells.iter().map(|&cell| cell.into()).collect(),
    )
}

fn label_col() -> Col {
    Col::new(Styles::default().with(MinWidth(12)).with(Left))
}

fn value_col(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Right))
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn optional<T: Display>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(|| "-".into())
}

/// Side-by-side metrics, one column per labelled ledger.
pub fn tabulate_metrics(metrics: &[(&str, &RoiMetrics)]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(18))
                    .with(Left),
            )];
            cols.extend(metrics.iter().map(|_| value_col(12)));
            cols
        })
        .with_row({
            let mut header_cells = vec!["Metric".into()];
            header_cells.extend(metrics.iter().map(|(label, _)| (*label).into()));
            Row::new(Styles::default().with(Header(true)), header_cells)
        });

    let Some((_, first)) = metrics.first() else {
        return table;
    };
    for (row, (name, _)) in first.entries().iter().enumerate() {
        let mut row_cells = vec![(*name).into()];
        for (_, metrics) in metrics {
            let value = metrics.entries()[row].1;
            row_cells.push(format_metric(name, value).into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

fn format_metric(name: &str, value: f64) -> String {
    match name {
        "n_bets" => format!("{value:.0}"),
        "win_rate" => percent(value),
        "roi_percent" => format!("{value:.2}%"),
        "sharpe_ratio" => format!("{value:.3}"),
        _ => format!("{value:.2}"),
    }
}

pub fn tabulate_comparison(comparison: &ModelMarketComparison) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            value_col(10),
        ])
        .with_row(header(&["Measure", "Value"]));
    for (name, value) in comparison.entries() {
        table.push_row(Row::new(
            Styles::default(),
            vec![name.into(), format!("{value:.4}").into()],
        ));
    }
    table
}

pub fn tabulate_bets(bets: &[Bet]) -> Table {
    let kelly = matches!(
        bets.first().map(|bet| bet.running),
        Some(RunningState::Bankroll { .. })
    );
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![label_col()];
            cols.extend((0..9).map(|_| value_col(8)));
            if kelly {
                cols.push(value_col(8));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec![
                "Game", "Side", "Edge", "Model", "Market", "Odds", "Stake", "Outcome", "Profit",
            ];
            if kelly {
                header_cells.extend(["Bankroll", "ROI"]);
            } else {
                header_cells.push("Cumulative");
            }
            header(&header_cells)
        });

    for bet in bets {
        let mut row_cells = vec![
            bet.game_id.to_string().into(),
            bet.bet_on.to_string().into(),
            format!("{:.4}", bet.edge).into(),
            format!("{:.4}", bet.model_prob).into(),
            format!("{:.4}", bet.market_prob).into(),
            bet.odds.to_string().into(),
            format!("{:.2}", bet.bet_size).into(),
            bet.outcome.to_string().into(),
            format!("{:.2}", bet.profit).into(),
        ];
        match bet.running {
            RunningState::Cumulative { cumulative_profit } => {
                row_cells.push(format!("{cumulative_profit:.2}").into())
            }
            RunningState::Bankroll { bankroll, roi } => {
                row_cells.push(format!("{bankroll:.2}").into());
                row_cells.push(format!("{roi:.2}%").into());
            }
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_confidence_bins(bins: &[ConfidenceBin]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![label_col(), value_col(6), value_col(10), value_col(10)])
        .with_row(header(&["Confidence", "Games", "Home wins", "Accuracy"]));
    for bin in bins {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                bin.label.into(),
                bin.count.to_string().into(),
                percent(bin.home_win_rate).into(),
                percent(bin.accuracy).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_calibration(bins: &[CalibrationBin]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![value_col(12), value_col(6), value_col(10)])
        .with_row(header(&["Predicted", "Games", "Observed"]));
    for bin in bins {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                percent(bin.centre).into(),
                bin.count.to_string().into(),
                optional(bin.home_win_rate.map(percent)).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_accuracy(bins: &[AccuracyBin]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![value_col(12), value_col(6), value_col(10)])
        .with_row(header(&["Predicted", "Games", "Accuracy"]));
    for bin in bins {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                percent(bin.centre).into(),
                bin.count.to_string().into(),
                optional(bin.accuracy.map(percent)).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_grades(grades: &[GradeSummary]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![label_col(), value_col(6), value_col(10)])
        .with_row(header(&["Grade", "Games", "Accuracy"]));
    for summary in grades {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                summary.grade.to_string().into(),
                summary.count.to_string().into(),
                percent(summary.accuracy).into(),
            ],
        ));
    }
    table
}

/// Tallies of labelled categories, with each tally's share of the total.
pub fn tabulate_counts<L: Display>(title: &str, counts: &[(L, usize)]) -> Table {
    let total: usize = counts.iter().map(|(_, count)| count).sum();
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(20)).with(Left)),
            value_col(6),
            value_col(8),
        ])
        .with_row(header(&[title, "Games", "Share"]));
    for (label, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64
        };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                label.to_string().into(),
                count.to_string().into(),
                percent(share).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_sweep(results: &[(FractionalKelly, RoiMetrics, f64)]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            value_col(10),
            value_col(6),
            value_col(12),
            value_col(10),
            value_col(10),
            value_col(12),
            value_col(14),
        ])
        .with_row(header(&[
            "Fraction",
            "Bets",
            "Wagered",
            "ROI",
            "Sharpe",
            "Drawdown",
            "Final bankroll",
        ]));
    for (staking, metrics, final_bankroll) in results {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{:.3}", staking.kelly_fraction).into(),
                metrics.n_bets.to_string().into(),
                format!("{:.2}", metrics.total_wagered).into(),
                format!("{:.2}%", metrics.roi_percent).into(),
                format!("{:.3}", metrics.sharpe_ratio).into(),
                format!("{:.2}", metrics.max_drawdown).into(),
                format!("{final_bankroll:.2}").into(),
            ],
        ));
    }
    table
}
