use anyhow::Result;
use dcf_dashboard::models::{CompanyProfile, DcfAssumptions, ExitMultipleBasis, TerminalValueSpec};
use dcf_dashboard::services::format::{format_currency, format_price};
use dcf_dashboard::services::valuation::run_valuation;
use dotenv::dotenv;
use env_logger;
use log::info;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let profile = CompanyProfile::from_env();
    let assumptions = DcfAssumptions::default();

    info!(
        "Running DCF valuation for {} ({}) under default assumptions...",
        profile.name, profile.ticker
    );

    let gordon = run_valuation(&profile, &assumptions, &TerminalValueSpec::default());

    info!("Year | Revenue | NOPAT | FCF | PV");
    for projection in &gordon.projections {
        info!(
            "{} | {} | {} | {} | {}",
            projection.year,
            format_currency(projection.revenue),
            format_currency(projection.nopat),
            format_currency(projection.free_cash_flow),
            format_currency(projection.present_value)
        );
    }
    info!(
        "Terminal value (Gordon Growth): {}",
        format_currency(gordon.terminal_value)
    );
    info!(
        "Enterprise value: {}",
        format_currency(gordon.enterprise_value)
    );
    info!(
        "Fair value per share: {}",
        format_price(gordon.fair_value_per_share)
    );

    let exit = run_valuation(
        &profile,
        &assumptions,
        &TerminalValueSpec::multiple(18.0, ExitMultipleBasis::PriceToEarnings),
    );
    info!(
        "Fair value per share (18x P/E exit): {}",
        format_price(exit.fair_value_per_share)
    );

    println!("{}", serde_json::to_string_pretty(&gordon)?);

    Ok(())
}
