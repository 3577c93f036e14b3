mod args;
mod config;
mod reader;
mod writer;

use tse::{
    input::{Command, InputEvent},
    services::TradingService,
    FixedPriceOracle, Result,
};

fn main() -> Result {
    config::configure_app()?;

    log::debug!("Application configured. Beginning process...");

    let mut service = tse::build_trading_service();

    process_data(&mut service)?;

    log::debug!("Process complete. Beginning report...");

    report_to_std_out(&service)?;

    log::debug!("Application finished successfully!");

    Ok(())
}

/// Read input file and apply each command to the engine
fn process_data(service: &mut TradingService<FixedPriceOracle>) -> Result {
    let input_path = args::parse_input_arg()?;
    log::debug!("Found filepath as input arg: {input_path:?}");

    let mut rdr = reader::build_csv_reader(input_path)?;

    log::debug!("Deserializing reader...");
    for record in rdr.deserialize::<InputEvent>() {
        log::debug!("Parsing record into InputEvent: {record:?}");
        let input_event = match record {
            Ok(input_event) => input_event,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        log::debug!("Parsing input_event into Command: {input_event:?}");
        let command = match input_event.parse_command() {
            Ok(command) => command,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        log::debug!("Applying command: {command:?}");
        if let Err(e) = apply_command(service, command) {
            log::warn!("{e}");
        }
    }

    Ok(())
}

/// Every engine failure is retryable with corrected input, so rejected
/// commands are logged and the stream continues
fn apply_command(service: &mut TradingService<FixedPriceOracle>, command: Command) -> Result {
    match command {
        Command::Create {
            username,
            initial_deposit,
        } => {
            service.create_account(username, initial_deposit)?;
        }

        Command::Deposit { username, amount } => {
            let balance = service.deposit(&username, amount)?;
            log::debug!("Deposit applied, new balance: {balance}");
        }

        Command::Withdraw { username, amount } => {
            let balance = service.withdraw(&username, amount)?;
            log::debug!("Withdrawal applied, new balance: {balance}");
        }

        Command::Buy {
            username,
            symbol,
            quantity,
        } => {
            let (balance, owned) = service.buy(&username, &symbol, quantity)?;
            log::debug!("Buy applied, new balance: {balance}, holding: {owned}");
        }

        Command::Sell {
            username,
            symbol,
            quantity,
        } => {
            let (balance, owned) = service.sell(&username, &symbol, quantity)?;
            log::debug!("Sell applied, new balance: {balance}, holding: {owned}");
        }
    }

    Ok(())
}

/// Build report from engine state, and write report to stdout
fn report_to_std_out(service: &TradingService<FixedPriceOracle>) -> Result {
    let report = service.build_report()?;
    log::debug!("Successfully built reports for {} accounts", report.len());

    let mut wtr = writer::build_csv_writer();

    log::debug!("Serializing reports...");
    for account_report in report.iter() {
        log::debug!("Serializing report: {account_report:?}");
        wtr.serialize(account_report)?;
    }

    let output = writer::write_to_string(wtr)?;

    log::debug!("Writing to stdout: {output:?}");
    println!("{}", output);

    Ok(())
}
