/// Pool Price Tool
///
/// Fetches one pool object once, prints the decoded state and the converted
/// price. Nothing is written to the database.
///
/// Usage: cargo run --bin tool_pool_price -- --pool <ADDRESS> --decimals-a 9 --decimals-b 6
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use poolcandles::{
    config::RpcConfig,
    logger::{self, LogTag},
    pool_price::{decode_pool_fields, PriceConverter},
    rpc::{PoolStateReader, SuiRpcClient},
};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    logger::init();

    let matches = Command::new("Pool Price Tool")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read a concentrated-liquidity pool and print its spot price")
        .arg(
            Arg::new("pool")
                .short('p')
                .long("pool")
                .value_name("POOL_ADDRESS")
                .help("Pool object address")
                .required(true),
        )
        .arg(
            Arg::new("decimals-a")
                .long("decimals-a")
                .value_name("DECIMALS")
                .help("Decimal precision of token A")
                .value_parser(clap::value_parser!(u8))
                .default_value("9"),
        )
        .arg(
            Arg::new("decimals-b")
                .long("decimals-b")
                .value_name("DECIMALS")
                .help("Decimal precision of token B")
                .value_parser(clap::value_parser!(u8))
                .default_value("9"),
        )
        .arg(
            Arg::new("rpc")
                .short('r')
                .long("rpc")
                .value_name("RPC_URL")
                .help("JSON-RPC endpoint (default: Sui mainnet full node)"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout (default: 10)")
                .value_parser(clap::value_parser!(u64)),
        )
        .get_matches();

    if let Err(e) = run(&matches).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        logger::flush();
        process::exit(1);
    }
    logger::flush();
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let pool = matches
        .get_one::<String>("pool")
        .context("--pool is required")?;
    let decimals_a = matches.get_one::<u8>("decimals-a").copied().unwrap_or(9);
    let decimals_b = matches.get_one::<u8>("decimals-b").copied().unwrap_or(9);
    let defaults = RpcConfig::default();
    let rpc_url = matches
        .get_one::<String>("rpc")
        .cloned()
        .unwrap_or(defaults.url);
    let timeout = matches
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(defaults.timeout_secs);

    logger::info(LogTag::Rpc, &format!("Fetching {} from {}", pool, rpc_url));

    let client = SuiRpcClient::new(&rpc_url, Duration::from_secs(timeout))?;
    let fields = client.get_object_state(pool).await?;
    let state = decode_pool_fields(&fields)?;

    println!("Pool:          {}", pool);
    println!("sqrt_price_x64 {}", state.sqrt_price_x64);
    println!("liquidity      {}", fmt_opt(state.liquidity));
    println!("tick_index     {}", fmt_opt(state.tick_index));
    println!("fee_growth_a   {}", fmt_opt(state.fee_growth_global_a));
    println!("fee_growth_b   {}", fmt_opt(state.fee_growth_global_b));

    let price = PriceConverter::convert(state.sqrt_price_x64, decimals_a, decimals_b)?;
    println!("price          {} (decimals {}/{})", price, decimals_a, decimals_b);

    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
