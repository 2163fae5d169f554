use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, Gateway};
use crate::formatting::write_session_status;
use crate::input;

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum DashboardCmd {
    /// create a new health account
    #[command(alias = "new")]
    Create,

    /// verify an existing health account
    Verify,

    /// show the stored session
    Status,

    /// replace the current session with a new one
    Login {
        /// client id to use, prompts when not given
        #[arg(long)]
        client_id: Option<String>,
    },

    /// drop the current session
    Logout,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W) -> std::io::Result<()>
where
    W: Write
{
    writeln!(out, "create a new ABHA number or verify an existing one")?;
    writeln!(out, "commands: create | verify | status | login | logout | quit")
}

pub fn handle<G>(flow: &mut Flow, gateway: &G, args: &[String]) -> error::Result<Outcome>
where
    G: Gateway + ?Sized
{
    match super::parse::<DashboardCmd>(args)? {
        DashboardCmd::Create => flow.create_new()?,
        DashboardCmd::Verify => flow.verify_existing()?,
        DashboardCmd::Status => {
            let mut stdout = std::io::stdout();

            write_session_status(&mut stdout, flow.session(), flow.store().path())?;
        },
        DashboardCmd::Login { client_id } => super::login::prompt_login(flow, gateway, client_id)?,
        DashboardCmd::Logout => {
            if input::read_yn("log out of the current session?")? {
                flow.logout()?;
            }
        },
        DashboardCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
