//! Rentdesk - command-line client for the vehicle rental service

mod commands;
mod config;
mod display;
mod state;
mod telemetry;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use commands::fleet::RentArgs;
use commands::rental::ReturnArgs;
use config::AppConfig;
use rentdesk_core::date::parse_date;
use rentdesk_core::{ProfileUpdate, SignupRequest, Usd};
use rentdesk_engine::payments::parse_amount;
use state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "rentdesk",
    about = "Manage your vehicle rentals, balance and late fees",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and remember the session
    Signin {
        username: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account
    Signup(SignupCommand),
    /// Sign out, clearing the stored session
    Signout,
    /// Show who the stored session belongs to
    Whoami,
    /// Show or change the account balance
    Balance {
        #[command(subcommand)]
        command: Option<BalanceCommand>,
    },
    /// List or pay late fees
    LateFees {
        #[command(subcommand)]
        command: Option<LateFeeCommand>,
    },
    /// Estimate the late fee for a return date
    Estimate {
        /// Expected return date; defaults to the active rental's end date
        #[arg(long, value_parser = date_arg)]
        due: Option<NaiveDate>,
        /// Defaults to today
        #[arg(long = "on", value_parser = date_arg)]
        return_date: Option<NaiveDate>,
    },
    /// Return the active rental
    Return(ReturnCommand),
    /// Browse vehicles available to rent
    Fleet(PageArgs),
    /// Rent a vehicle from the fleet
    Rent(RentCommand),
    /// List past and current rentals
    Rentals(PageArgs),
    /// Update profile details; only the given fields change
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Starts at 1
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
}

#[derive(Args, Debug)]
struct SignupCommand {
    username: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    /// Prompted for (twice) when omitted
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zipcode: Option<String>,
    /// Driver's license number
    #[arg(long)]
    license: Option<String>,
    #[arg(long)]
    license_state: Option<String>,
    #[arg(long)]
    license_expiry: Option<String>,
    #[arg(long)]
    date_of_birth: Option<String>,
}

impl SignupCommand {
    fn into_request(self) -> (SignupRequest, Option<String>) {
        let request = SignupRequest {
            username: self.username.trim().to_string(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: String::new(),
            phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            zipcode: self.zipcode.unwrap_or_default(),
            license: self.license.unwrap_or_default(),
            license_state: self.license_state.unwrap_or_default(),
            license_expiry: self.license_expiry.unwrap_or_default(),
            date_of_birth: self.date_of_birth.unwrap_or_default(),
            current_balance: Usd::ZERO,
        };
        (request, self.password)
    }
}

#[derive(Args, Debug)]
struct RentCommand {
    vehicle_id: i64,
    #[arg(long, value_parser = date_arg)]
    from: NaiveDate,
    #[arg(long, value_parser = date_arg)]
    to: NaiveDate,
    #[arg(long)]
    notes: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[arg(long)]
    bio: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    headline: Option<String>,
    /// Picture URL
    #[arg(long)]
    picture: Option<String>,
}

#[derive(Subcommand, Debug)]
enum BalanceCommand {
    Show,
    Add(AmountArgs),
    Withdraw(AmountArgs),
}

#[derive(Args, Debug)]
struct AmountArgs {
    #[arg(value_parser = amount_arg)]
    amount: Usd,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Subcommand, Debug)]
enum LateFeeCommand {
    List {
        /// Hide fees that are fully paid
        #[arg(long)]
        unpaid: bool,
    },
    /// Pay the remaining amount of a late fee
    Pay { fee_id: i64 },
}

#[derive(Args, Debug)]
struct ReturnCommand {
    rental_id: i64,
    /// Defaults to today
    #[arg(long = "on", value_parser = date_arg)]
    return_date: Option<NaiveDate>,
    #[arg(long)]
    notes: Option<String>,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD)", value))
}

fn amount_arg(value: &str) -> Result<Usd, String> {
    parse_amount(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.log_level)?;
    tracing::debug!("Backend: {}", config.backend_url);

    let state = AppState::new(config)?;

    match cli.command {
        Command::Signin { username, password } => {
            commands::auth::sign_in(&state, username, password).await
        }
        Command::Signup(args) => {
            let (request, password) = args.into_request();
            commands::auth::sign_up(&state, request, password).await
        }
        Command::Signout => commands::auth::sign_out(&state).await,
        Command::Whoami => commands::auth::who_am_i(&state).await,
        Command::Balance { command } => match command.unwrap_or(BalanceCommand::Show) {
            BalanceCommand::Show => commands::balance::show(&state).await,
            BalanceCommand::Add(args) => {
                commands::balance::add(&state, args.amount, args.description).await
            }
            BalanceCommand::Withdraw(args) => {
                commands::balance::withdraw(&state, args.amount, args.description).await
            }
        },
        Command::LateFees { command } => {
            match command.unwrap_or(LateFeeCommand::List { unpaid: false }) {
                LateFeeCommand::List { unpaid } => commands::late_fees::list(&state, unpaid).await,
                LateFeeCommand::Pay { fee_id } => commands::late_fees::pay(&state, fee_id).await,
            }
        }
        Command::Estimate { due, return_date } => {
            commands::rental::estimate(&state, due, return_date).await
        }
        Command::Return(args) => {
            commands::rental::return_vehicle(
                &state,
                ReturnArgs {
                    rental_id: args.rental_id,
                    return_date: args.return_date,
                    notes: args.notes,
                    yes: args.yes,
                },
            )
            .await
        }
        Command::Fleet(args) => commands::fleet::list(&state, args.page, args.size).await,
        Command::Rent(args) => {
            commands::fleet::rent(
                &state,
                RentArgs {
                    vehicle_id: args.vehicle_id,
                    start_date: args.from,
                    end_date: args.to,
                    notes: args.notes,
                    yes: args.yes,
                },
            )
            .await
        }
        Command::Rentals(args) => commands::profile::rentals(&state, args.page, args.size).await,
        Command::Profile(args) => {
            let update = ProfileUpdate {
                bio: args.bio,
                city: args.city,
                country: args.country,
                headline: args.headline,
                picture: args.picture,
            };
            commands::profile::edit(&state, update).await
        }
    }
}
