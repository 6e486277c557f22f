use clap::Parser;
use color_eyre::eyre::{bail, ensure};
use log::info;

use mba_symbolic::dnf::Dnf;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Truth vector as a bit string, entry `i` first (e.g. `0111` for `x|y`).
    #[arg(value_name = "BITS")]
    truth: String,

    /// Variable names, one per variable. Defaults to `x0, x1, ...`.
    #[arg(short, long, value_name = "NAME", num_args = 1..)]
    names: Vec<String>,

    /// Print the prime implicants as ternary vectors.
    #[arg(long)]
    primes: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    info!("args = {:?}", args);

    let mut truth = Vec::with_capacity(args.truth.len());
    for c in args.truth.chars() {
        match c {
            '0' => truth.push(0),
            '1' => truth.push(1),
            _ => bail!("Truth vector may only contain 0 and 1, found {:?}", c),
        }
    }
    ensure!(
        truth.len().is_power_of_two(),
        "Truth vector length {} is not a power of two",
        truth.len()
    );
    let vnumber = truth.len().trailing_zeros() as usize;
    ensure!(vnumber < 32, "Too many variables: {}", vnumber);

    let names = if args.names.is_empty() {
        (0..vnumber).map(|i| format!("x{}", i)).collect()
    } else {
        args.names
    };
    ensure!(
        names.len() == vnumber,
        "Expected {} variable names, got {}",
        vnumber,
        names.len()
    );

    let time_total = std::time::Instant::now();
    let dnf = Dnf::new(vnumber, &truth);
    let time_total = time_total.elapsed();

    if args.primes {
        println!("{}", dnf);
    }
    println!("{}", dnf.to_expression_string(&names));
    info!("minimized in {:.3} ms", time_total.as_secs_f64() * 1000.0);

    Ok(())
}
