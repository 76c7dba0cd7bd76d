use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use userform::cli::{Args, Command};
use userform::commands;
use userform::config::AppConfig;
use userform::context::AppContext;
use userform::interactive::run_form;
use userform::{Notice, UserId};

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "userform=debug" } else { "userform=warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn report(notice: &Notice) -> ExitCode {
    match notice {
        Notice::Success(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Notice::Failure(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = AppConfig::resolve(args.config.as_deref())?;
    info!("Using {:?}", config.storage);

    let mut ctx = AppContext::open(config)?;
    let session = &mut ctx.session;

    let code = match args.command {
        Command::Add { fields } => report(&commands::add_user(session, &fields)?),
        Command::Update { id, fields } => {
            report(&commands::update_user(session, UserId(id), &fields)?)
        }
        Command::Delete { id } => report(&commands::delete_user(session, UserId(id))?),
        Command::List => {
            print!("{}", commands::list_users(session));
            ExitCode::SUCCESS
        }
        Command::Show { id } => match commands::show_user(session, UserId(id)) {
            Ok(card) => {
                print!("{card}");
                ExitCode::SUCCESS
            }
            Err(notice) => report(&notice),
        },
        Command::Form => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            run_form(session, stdin.lock(), &mut stdout)?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
