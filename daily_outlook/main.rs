use anyhow::Result;
use clap::Parser;
use daily_outlook::*;
use market_pulse::core::io::FilePriceSource;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Daily Outlook - Direction Model, Backtest and Key Levels\n");

    let args = Args::parse();
    let config = Config::load(&args)?;

    println!("Symbol: {}", config.market.symbol);
    println!("Data directory: {}", config.market.data_dir.display());
    println!("Test days: {}", config.model.test_days);

    let source = FilePriceSource::new(&config.market.data_dir);
    let outcome = run_pipeline(&config, &source)?;

    if let Some(m) = &outcome.report.training {
        println!("\n{}", "=".repeat(60));
        println!("Direction Model");
        println!("{}", "=".repeat(60));
        println!("Train accuracy: {:.2}% ({} rows)", m.train_accuracy * 100.0, m.train_size);
        println!("Test accuracy:  {:.2}% ({} rows)", m.test_accuracy * 100.0, m.test_size);
    }

    if let Some(b) = &outcome.report.backtest {
        println!("\n{}", "=".repeat(60));
        println!("Backtest");
        println!("{}", "=".repeat(60));
        println!("Initial capital: ${:.2}", b.initial_capital);
        println!("Final capital:   ${:.2}", b.final_capital);
        println!("Total return:    ${:.2} ({:.2}%)", b.total_return, b.return_pct);
        println!("Trades:          {}", b.num_trades);
    }

    println!("\n{}\n", outcome.text);
    println!("Report written to {}", outcome.report_path.display());
    if let Some(path) = &outcome.backtest_path {
        println!("Backtest results written to {}", path.display());
    }

    Ok(())
}
