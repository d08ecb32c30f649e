mod entry;
mod render;

use std::path::{Path, PathBuf};

use armory_core::{
    compare, lot_breakdown, solve_dual, solve_primal, sweep_lot_cost, weapon_breakdown, ProcurementData,
    DUALITY_TOLERANCE,
};
use clap::{Parser, Subcommand};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "armory")]
#[command(about = "Least-cost procurement of armament lots, with its pricing dual", long_about = None)]
struct Cli {
    /// Log solver diagnostics at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the primal and dual problems for a data file
    Solve {
        /// JSON data bundle
        file: PathBuf,
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
        /// Show marginal costs and binding requirements
        #[arg(short, long)]
        analysis: bool,
        /// Multiplier applied to unit prices for display
        #[arg(long, default_value_t = 1.0)]
        price_scale: f64,
    },
    /// Vary the unit cost of one lot and re-solve at every integer price
    Sweep {
        /// JSON data bundle
        file: PathBuf,
        /// Lot whose cost varies (1-based)
        #[arg(long, default_value_t = 1)]
        lot: usize,
        /// First price (inclusive)
        #[arg(long, default_value_t = 1)]
        from: i64,
        /// Last price (inclusive)
        #[arg(long, default_value_t = 30)]
        to: i64,
        /// Output format (table, csv, json, chart)
        #[arg(short, long, default_value = "table")]
        format: String,
        /// Multiplier applied to unit prices for display
        #[arg(long, default_value_t = 1.0)]
        price_scale: f64,
    },
    /// Check a data file for errors
    Check {
        /// JSON data bundle
        file: PathBuf,
    },
    /// Enter a data bundle interactively and save it
    Enter {
        /// Where to write the bundle
        #[arg(short, long, default_value = "data/procurement.json")]
        output: PathBuf,
    },
    /// Solve and sweep the built-in 3-lot, 5-weapon scenario
    Demo,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            format,
            analysis,
            price_scale,
        } => {
            let data = load_or_exit(&file);
            if format == "json" {
                print_solution_json(&data);
            } else {
                print_solution(&data, analysis, price_scale);
            }
        }
        Commands::Sweep {
            file,
            lot,
            from,
            to,
            format,
            price_scale,
        } => {
            let data = load_or_exit(&file);
            if lot == 0 {
                eprintln!("Error: lots are numbered from 1");
                std::process::exit(1);
            }

            let sweep = match sweep_lot_cost(&data, lot - 1, from..=to) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            match format.as_str() {
                "csv" => print!("{}", render::sweep_csv(&sweep)),
                "json" => match serde_json::to_string_pretty(&sweep) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing sweep: {}", e);
                        std::process::exit(1);
                    }
                },
                "chart" => print!("{}", render::sweep_chart(&sweep, 20)),
                _ => {
                    println!("Sensitivity of lot {} unit cost, {} ..= {}", lot, from, to);
                    println!("{}", render::sweep_table(&sweep, price_scale));
                }
            }
        }
        Commands::Check { file } => {
            let data = load_or_exit(&file);
            println!("✓ {} is valid", file.display());
            println!("  {} lots", data.num_lots());
            println!("  {} weapon types", data.num_weapons());
            println!("{}", render::bundle_table(&data));
        }
        Commands::Enter { output } => {
            let stdin = std::io::stdin();
            let data = match entry::enter_data(stdin.lock(), std::io::stdout()) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            if let Err(e) = data.save(&output) {
                eprintln!("Error saving data: {}", e);
                std::process::exit(1);
            }
            println!("Data saved to {}", output.display());
        }
        Commands::Demo => {
            let data = ProcurementData::reference();
            // Costs are in millions, so prices read best per million
            print_solution(&data, true, 1e6);

            match armory_core::sensitivity_sweep(&data, 1..=29) {
                Ok(sweep) => {
                    println!();
                    println!("Sensitivity of lot 1 unit cost (prices x 1e6)");
                    println!("{}", render::sweep_table(&sweep, 1e6));
                    print!("{}", render::sweep_chart(&sweep, 15));
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_or_exit(file: &Path) -> ProcurementData {
    match ProcurementData::load(file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("✗ {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_solution(data: &ProcurementData, analysis: bool, price_scale: f64) {
    println!("{}", render::bundle_table(data));
    println!();

    let primal = solve_or_exit(solve_primal(data));
    let dual = solve_or_exit(solve_dual(data));

    match &primal {
        Some(primal) => {
            println!("Primal: minimal purchase cost");
            println!("{}", render::lot_table(&lot_breakdown(primal, &data.costs)));
            println!("Total cost: {:.4}", primal.total_cost);
        }
        None => println!("Primal: no optimal solution"),
    }
    println!();

    match &dual {
        Some(dual) => {
            println!("Dual: maximal supplier profit");
            println!("{}", render::weapon_table(&weapon_breakdown(dual, data), price_scale));
            println!("Total profit: {:.4}", dual.total_profit);
        }
        None => println!("Dual: no optimal solution"),
    }

    let (Some(primal), Some(dual)) = (primal, dual) else {
        std::process::exit(1);
    };

    println!();
    let check = compare(&primal, &dual, DUALITY_TOLERANCE);
    if !check.holds {
        warn!(gap = check.gap, "primal and dual optima disagree");
    }
    println!("{}", render::duality_summary(&check));

    if analysis {
        println!();
        println!("Marginal cost per extra unit required:");
        for (name, marginal) in data.weapons.iter().zip(&primal.marginal_costs) {
            if *marginal > 0.0 {
                println!("  {:20} {:.5}", name, marginal * price_scale);
            } else {
                println!("  {:20} not binding", name);
            }
        }
    }
}

fn print_solution_json(data: &ProcurementData) {
    let primal = solve_or_exit(solve_primal(data));
    let dual = solve_or_exit(solve_dual(data));
    let duality = match (&primal, &dual) {
        (Some(p), Some(d)) => Some(compare(p, d, DUALITY_TOLERANCE)),
        _ => None,
    };

    let report = serde_json::json!({
        "primal": primal,
        "dual": dual,
        "duality": duality,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing solution: {}", e);
            std::process::exit(1);
        }
    }
}

fn solve_or_exit<T>(result: Result<Option<T>, armory_core::FormulationError>) -> Option<T> {
    match result {
        Ok(solution) => solution,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
