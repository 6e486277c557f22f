use clap::Parser;
use log::info;

use mba_symbolic::parser::{parse, ParseOptions};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Expressions to classify.
    #[arg(value_name = "EXPR", required = true)]
    exprs: Vec<String>,

    /// Bit width of the ring.
    #[arg(short, long, value_name = "INT", default_value = "64")]
    bits: u32,
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

    let options = ParseOptions::new(args.bits);
    for expr in &args.exprs {
        let tree = parse(expr, &options)?;
        let length = expr.chars().filter(|c| !c.is_whitespace()).count();
        println!("*** Expression {}", expr);
        println!("    parsed:      {}", tree);
        println!("    variables:   {}", tree.variables().len());
        println!("    length:      {}", length);
        println!("    nodes:       {}", tree.count_nodes());
        println!("    alternation: {}", tree.alternation());
    }

    Ok(())
}
