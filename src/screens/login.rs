use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, Gateway};
use crate::input;

use super::Outcome;

pub const CLIENT_ID_VAR: &str = "ABHA_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "ABHA_CLIENT_SECRET";

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum LoginCmd {
    /// exchange client credentials for a gateway session
    Login {
        /// client id to use, prompts when not given
        #[arg(long)]
        client_id: Option<String>,
    },

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W) -> std::io::Result<()>
where
    W: Write
{
    writeln!(out, "sign in with the client credentials issued for the sandbox")?;
    writeln!(out, "commands: login [--client-id ID] | quit")
}

/// collects credentials and logs in. the id and secret are taken from
/// ABHA_CLIENT_ID and ABHA_CLIENT_SECRET when set
pub fn prompt_login<G>(flow: &mut Flow, gateway: &G, client_id: Option<String>) -> error::Result
where
    G: Gateway + ?Sized
{
    let client_id = match client_id {
        Some(id) => id,
        None => input::env_or_prompt(CLIENT_ID_VAR, "client id: ")?,
    };
    let client_secret = input::env_or_secret(CLIENT_SECRET_VAR, "client secret: ")?;

    flow.login(gateway, &client_id, &client_secret)?;

    println!("logged in");

    Ok(())
}

pub fn handle<G>(flow: &mut Flow, gateway: &G, args: &[String]) -> error::Result<Outcome>
where
    G: Gateway + ?Sized
{
    match super::parse::<LoginCmd>(args)? {
        LoginCmd::Login { client_id } => {
            prompt_login(flow, gateway, client_id)?;

            Ok(Outcome::Stay)
        },
        LoginCmd::Quit => Ok(Outcome::Quit),
    }
}
