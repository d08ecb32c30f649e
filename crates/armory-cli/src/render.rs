//! Console rendering of bundles, solutions and sweeps.

use armory_core::{DualityCheck, LotLine, ProcurementData, Sweep, WeaponLine};
use tabled::builder::Builder;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct LotRow {
    #[tabled(rename = "Lot")]
    lot: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Unit cost")]
    unit_cost: String,
    #[tabled(rename = "Total cost")]
    cost: String,
}

#[derive(Tabled)]
struct WeaponRow {
    #[tabled(rename = "Weapon type")]
    weapon: String,
    #[tabled(rename = "Unit price")]
    unit_price: String,
    #[tabled(rename = "Requirement")]
    requirement: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

#[derive(Tabled)]
struct SweepRow {
    #[tabled(rename = "Lot price")]
    price: i64,
    #[tabled(rename = "Total cost")]
    total_cost: String,
    #[tabled(rename = "Lots bought")]
    lots: String,
    #[tabled(rename = "Total profit")]
    total_profit: String,
    #[tabled(rename = "Unit prices")]
    prices: String,
}

/// Composition of every lot, one row per weapon type plus the cost row.
pub fn bundle_table(data: &ProcurementData) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Weapon type".to_string()];
    header.extend((1..=data.num_lots()).map(|j| format!("Lot {}", j)));
    builder.push_record(header);

    for (name, row) in data.weapons.iter().zip(&data.constraints) {
        let mut record = vec![name.clone()];
        record.extend(row.iter().map(|q| q.to_string()));
        builder.push_record(record);
    }

    let mut costs = vec!["Lot cost".to_string()];
    costs.extend(data.costs.iter().map(|c| c.to_string()));
    builder.push_record(costs);

    builder.build().to_string()
}

pub fn lot_table(lines: &[LotLine]) -> String {
    let rows = lines.iter().map(|line| LotRow {
        lot: format!("Lot {}", line.lot),
        quantity: format!("{:.4}", line.quantity),
        unit_cost: line.unit_cost.to_string(),
        cost: format!("{:.4}", line.cost),
    });
    Table::new(rows).to_string()
}

/// Unit prices are multiplied by `price_scale` for display; profits are not.
pub fn weapon_table(lines: &[WeaponLine], price_scale: f64) -> String {
    let rows = lines.iter().map(|line| WeaponRow {
        weapon: line.weapon.clone(),
        unit_price: format!("{:.5}", line.unit_price * price_scale),
        requirement: line.requirement.to_string(),
        profit: format!("{:.4}", line.profit),
    });
    Table::new(rows).to_string()
}

pub fn duality_summary(check: &DualityCheck) -> String {
    format!(
        "Minimal total cost (buyer):     {:.4}\nMaximal total profit (supplier): {:.4}\nGap: {:.2e} ({})",
        check.total_cost,
        check.total_profit,
        check.gap,
        if check.holds { "strong duality holds" } else { "MISMATCH" }
    )
}

pub fn sweep_table(sweep: &Sweep, price_scale: f64) -> String {
    let rows = sweep.points.iter().map(|point| SweepRow {
        price: point.price,
        total_cost: solved_value(point.total_cost, point.primal_solved),
        lots: join(&point.lots, 1.0, 2),
        total_profit: solved_value(point.total_profit, point.dual_solved),
        prices: join(&point.prices, price_scale, 5),
    });
    Table::new(rows).to_string()
}

pub fn sweep_csv(sweep: &Sweep) -> String {
    let mut out = String::from("price,total_cost,total_profit,primal_solved,dual_solved\n");
    for point in &sweep.points {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            point.price, point.total_cost, point.total_profit, point.primal_solved, point.dual_solved
        ));
    }
    out
}

/// Plot cost (`o`) and profit (`x`) against price; `*` where both land on the same cell.
pub fn sweep_chart(sweep: &Sweep, height: usize) -> String {
    if sweep.is_empty() || height < 2 {
        return String::new();
    }

    let costs = sweep.cost_trajectory();
    let profits = sweep.profit_trajectory();
    let top = costs.iter().chain(&profits).fold(0.0_f64, |acc, v| acc.max(*v));
    let level = |v: f64| {
        if top <= 0.0 {
            0
        } else {
            ((v / top) * (height - 1) as f64).round() as usize
        }
    };

    let mut grid = vec![vec![' '; sweep.len()]; height];
    for (col, (&cost, &profit)) in costs.iter().zip(&profits).enumerate() {
        let (c, p) = (level(cost), level(profit));
        if c == p {
            grid[c][col] = '*';
        } else {
            grid[c][col] = 'o';
            grid[p][col] = 'x';
        }
    }

    let mut out = String::new();
    for (row, cells) in grid.iter().enumerate().rev() {
        let label = top * row as f64 / (height - 1) as f64;
        out.push_str(&format!("{:>12.2} |{}\n", label, cells.iter().collect::<String>()));
    }
    out.push_str(&format!("{:>12} +{}\n", "", "-".repeat(sweep.len())));

    let prices = sweep.price_points();
    if let (Some(first), Some(last)) = (prices.first(), prices.last()) {
        out.push_str(&format!("{:>12}  price {} .. {}  (o cost, x profit, * both)\n", "", first, last));
    }
    out
}

fn solved_value(value: f64, solved: bool) -> String {
    if solved { format!("{:.4}", value) } else { "no solution".to_string() }
}

fn join(values: &[f64], scale: f64, precision: usize) -> String {
    values
        .iter()
        .map(|v| format!("{:.*}", precision, v * scale))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_core::{sensitivity_sweep, SweepPoint};

    fn sweep(points: &[(i64, f64)]) -> Sweep {
        Sweep {
            lot: 0,
            points: points
                .iter()
                .map(|&(price, total)| SweepPoint {
                    price,
                    total_cost: total,
                    total_profit: total,
                    lots: vec![total],
                    prices: vec![1.0],
                    primal_solved: true,
                    dual_solved: true,
                })
                .collect(),
        }
    }

    #[test]
    fn test_bundle_table_lists_weapons_and_costs() {
        let table = bundle_table(&ProcurementData::reference());

        assert!(table.contains("Lot 3"));
        assert!(table.contains("machine guns"));
        assert!(table.contains("Lot cost"));
        assert!(table.contains("2000"));
    }

    #[test]
    fn test_sweep_csv() {
        let csv = sweep_csv(&sweep(&[(1, 2.0), (2, 3.5)]));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "1,2,2,true,true");
        assert_eq!(lines[2], "2,3.5,3.5,true,true");
    }

    #[test]
    fn test_sweep_chart_shape() {
        let chart = sweep_chart(&sweep(&[(1, 0.0), (2, 5.0), (3, 10.0)]), 3);
        let lines: Vec<&str> = chart.lines().collect();

        // 3 levels, an axis and a legend
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("|  *"));
        assert!(lines[1].ends_with("| * "));
        assert!(lines[2].ends_with("|*  "));
    }

    #[test]
    fn test_sweep_table_marks_failures() {
        let mut failed = sweep(&[(1, 0.0)]);
        failed.points[0].primal_solved = false;

        assert!(sweep_table(&failed, 1.0).contains("no solution"));
    }

    #[test]
    fn test_reference_sweep_renders() {
        let sweep = sensitivity_sweep(&ProcurementData::reference(), 1..=3).unwrap();
        let table = sweep_table(&sweep, 1e6);

        assert!(table.contains("200.0000"));
        assert!(!sweep_chart(&sweep, 10).is_empty());
    }
}
