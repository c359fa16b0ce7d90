use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use print_toolkit::estimate::{self, Charges, Estimate};
use print_toolkit::rates::{DEFAULT_RATE_FILE, RateBook, RateStore};
use print_toolkit::render;
use print_toolkit::{Dimension, JobRequest, SizeInput, Unit, plan_sheets, run_job};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "print_toolkit",
    about = "Sheet layout optimizer and price estimator for a print shop"
)]
struct Cli {
    /// Rate file used by the estimators
    #[arg(long, global = true, env = "PRINT_TOOLKIT_RATES", default_value = DEFAULT_RATE_FILE)]
    rates: PathBuf,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a finish size onto a sheet
    Optimize {
        /// Sheet size as WxH with optional unit (e.g. 330x483, 13x19in)
        #[arg(long, value_parser = parse_size)]
        sheet: SizeInput,

        /// Finish size as WxH with optional unit (e.g. 210x297mm, 3.5x2in)
        #[arg(long, value_parser = parse_size)]
        finish: SizeInput,

        /// Pieces to produce; prints a sheet plan
        #[arg(long)]
        qty: Option<u64>,

        /// Show ASCII layout of the sheet
        #[arg(long)]
        layout: bool,
    },
    /// Sheets needed for a quantity at a known per-sheet yield
    Plan {
        #[arg(long)]
        qty: u64,

        #[arg(long)]
        per_sheet: u64,
    },
    /// Visiting card estimate
    Card {
        #[arg(long)]
        finish: String,

        #[arg(long)]
        qty: u32,

        #[command(flatten)]
        charges: ChargeArgs,
    },
    /// Flex banner estimate
    Flex {
        #[arg(long)]
        kind: String,

        /// Banner size as WxH with optional unit (e.g. 72x36in)
        #[arg(long, value_parser = parse_size)]
        size: SizeInput,

        #[command(flatten)]
        charges: ChargeArgs,
    },
    /// Show or update the rate file
    #[command(subcommand)]
    Rates(RatesCommand),
}

#[derive(Subcommand)]
enum RatesCommand {
    Show,
    /// Set the price of a visiting card finish at a quantity
    SetCard {
        finish: String,
        qty: u32,
        price: f64,
    },
    /// Set the per square foot rate of a flex type
    SetFlex { kind: String, rate: f64 },
}

#[derive(Args)]
struct ChargeArgs {
    /// Design charges
    #[arg(long, default_value_t = 0.0)]
    design: f64,

    /// Extra/add-on charges
    #[arg(long, default_value_t = 0.0)]
    extra: f64,

    #[arg(long, default_value_t = 0.0)]
    discount: f64,

    /// Include 18% GST
    #[arg(long)]
    gst: bool,
}

impl From<ChargeArgs> for Charges {
    fn from(args: ChargeArgs) -> Self {
        Charges {
            design: args.design,
            extra: args.extra,
            discount: args.discount,
            include_gst: args.gst,
        }
    }
}

fn parse_size(s: &str) -> Result<SizeInput, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| c.is_ascii_alphabetic() && c != 'x')
        .unwrap_or(s.len());
    let (dims, unit) = s.split_at(split);
    let unit = if unit.is_empty() {
        Unit::Millimeter
    } else {
        unit.parse::<Unit>().map_err(|e| e.to_string())?
    };

    let parts: Vec<&str> = dims.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid size '{}', expected WxH", s));
    }
    let width = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return Err(format!("dimensions must be positive in '{}'", s));
    }
    Ok(SizeInput::new(width, height, unit))
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

fn print_estimate(est: &Estimate) {
    println!("Base rate:      {:>10.2}", est.base);
    if est.design > 0.0 {
        println!("Design:         {:>10.2}", est.design);
    }
    if est.extra > 0.0 {
        println!("Extra:          {:>10.2}", est.extra);
    }
    if est.discount > 0.0 {
        println!("Discount:       {:>10.2}", -est.discount);
    }
    println!("Subtotal:       {:>10.2}", est.subtotal);
    if est.gst > 0.0 {
        let (sgst, cgst) = est.sgst_cgst();
        println!("GST 18%:        {:>10.2}  (SGST {:.2} + CGST {:.2})", est.gst, sgst, cgst);
    }
    println!("Final estimate: {:>10.2}", est.total);
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let store: RateStore<RateBook> = RateStore::new(&cli.rates);

    match cli.command {
        Command::Optimize {
            sheet,
            finish,
            qty,
            layout,
        } => {
            let report = run_job(&JobRequest {
                sheet,
                finish,
                quantity: qty,
            })
            .unwrap_or_else(|e| fail(e));
            let best = &report.best;
            let l = &best.layout;

            println!("Best layout: {}", best.orientation);
            println!("Total finish sizes: {}", l.count);
            println!("Rows: {} | Columns: {}", l.rows, l.columns);
            println!("Used area: {:.1} mm x {:.1} mm", l.used_width, l.used_height);
            println!(
                "Remaining area: {:.1} mm x {:.1} mm",
                l.waste_width, l.waste_height
            );
            println!(
                "Waste: {:.1}% ({} in other orientation)",
                report.waste_percent, best.runner_up_count
            );
            if best.is_empty() {
                println!("Note: finish {} does not fit sheet {}", finish, sheet);
            }
            if let Some(plan) = report.plan {
                println!(
                    "Sheets needed: {} ({} pieces, {} surplus)",
                    plan.sheets_needed, plan.total_yield, plan.surplus
                );
            }
            if layout {
                print!("{}", render::render_layout(best));
            }
        }
        Command::Plan { qty, per_sheet } => {
            let plan = plan_sheets(qty, per_sheet).unwrap_or_else(|e| fail(e));
            println!(
                "Sheets needed: {} ({} pieces, {} surplus)",
                plan.sheets_needed, plan.total_yield, plan.surplus
            );
        }
        Command::Card {
            finish,
            qty,
            charges,
        } => {
            let book = store.load_or_default().unwrap_or_else(|e| fail(e));
            let est = estimate::card_estimate(&book.cards, &finish, qty, &charges.into())
                .unwrap_or_else(|e| fail(e));
            println!("{} {} visiting cards", qty, finish);
            print_estimate(&est);
        }
        Command::Flex {
            kind,
            size,
            charges,
        } => {
            let book = store.load_or_default().unwrap_or_else(|e| fail(e));
            let width = Dimension::new(size.width, size.unit);
            let height = Dimension::new(size.height, size.unit);
            let est = estimate::flex_estimate(&book.flex, &kind, width, height, &charges.into())
                .unwrap_or_else(|e| fail(e));
            let area = estimate::area_sq_ft(width, height).unwrap_or_else(|e| fail(e));
            println!("{} flex banner {} ({:.2} sq ft)", kind, size, area);
            print_estimate(&est);
        }
        Command::Rates(cmd) => {
            let mut book = store.load_or_default().unwrap_or_else(|e| fail(e));
            match cmd {
                RatesCommand::Show => {}
                RatesCommand::SetCard { finish, qty, price } => {
                    book.cards
                        .set_rate(&finish, qty, price)
                        .unwrap_or_else(|e| fail(e));
                    store.save(&book).unwrap_or_else(|e| fail(e));
                    println!("Rates updated.");
                }
                RatesCommand::SetFlex { kind, rate } => {
                    book.flex.set_rate(&kind, rate).unwrap_or_else(|e| fail(e));
                    store.save(&book).unwrap_or_else(|e| fail(e));
                    println!("Rates updated.");
                }
            }
            let json = serde_json::to_string_pretty(&book).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
    }
}
