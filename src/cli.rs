use std::path::PathBuf;

use clap::{Parser, Subcommand};

use abha_lib::document::DocumentNumber;

use crate::config::Settings;
use crate::error::{self, Context};
use crate::flow::Flow;
use crate::formatting::write_session_status;
use crate::screens;
use crate::session::SessionStore;

/// enrolls a new ABHA health account against the ABDM sandbox.
///
/// without a command the interactive wizard is started. it walks through
/// login, aadhaar verification, address selection and shows the created
/// account.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// a config file to load, can be given more than once
    ///
    /// yaml or json depending on the extension. later files override
    /// earlier ones
    #[arg(long)]
    config: Vec<PathBuf>,

    /// file that stores the gateway session
    ///
    /// overrides session.file from the config. if neither is given then
    /// "abha_session.json" in the current working directory is used
    #[arg(long)]
    session: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmds>,
}

#[derive(Debug, Subcommand)]
enum Cmds {
    /// obtain a gateway session and store it
    Login {
        /// client id to use, prompts when not given
        #[arg(long)]
        client_id: Option<String>,
    },

    /// remove the stored session
    Logout,

    /// show the stored session
    Status,

    /// print the masked form of an aadhaar number
    Mask {
        document: String,
    },
}

pub fn start() -> error::Result {
    let args = Cli::parse();
    let settings = Settings::load(args.config)?;

    let session_file = args.session.unwrap_or(settings.session.file.clone());
    let store = SessionStore::load(&session_file).context(format!(
        "failed to load session file \"{}\"", session_file.display()
    ))?;

    let client = settings.api_client()?;
    let mut flow = Flow::new(settings.flow_options(), store);

    match args.command {
        None => screens::run(&mut flow, &client),
        Some(Cmds::Login { client_id }) => screens::login::prompt_login(&mut flow, &client, client_id),
        Some(Cmds::Logout) => logout(&mut flow),
        Some(Cmds::Status) => status(&flow),
        Some(Cmds::Mask { document }) => mask(&document),
    }
}

fn logout(flow: &mut Flow) -> error::Result {
    if flow.logout().context("failed to remove session")? {
        println!("logged out");
    } else {
        println!("no session stored");
    }

    Ok(())
}

fn status(flow: &Flow) -> error::Result {
    let mut stdout = std::io::stdout();

    write_session_status(&mut stdout, flow.session(), flow.store().path())?;

    Ok(())
}

fn mask(document: &str) -> error::Result {
    let compact: String = document.split_whitespace().collect();
    let number: DocumentNumber = compact.parse()?;

    println!("{}", number.masked());

    Ok(())
}
