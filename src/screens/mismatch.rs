use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, VerificationContext};

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum MismatchCmd {
    /// return to the OTP screen
    Back,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W, context: &VerificationContext) -> std::io::Result<()>
where
    W: Write
{
    let mobile = context.contact_number.as_ref()
        .map(|c| c.linked())
        .unwrap_or_default();

    writeln!(out, "{mobile} is not the mobile number registered with this aadhaar")?;
    writeln!(out, "linking a different mobile number is not available yet")?;
    writeln!(out, "commands: back | quit")
}

pub fn handle(flow: &mut Flow, args: &[String]) -> error::Result<Outcome> {
    match super::parse::<MismatchCmd>(args)? {
        MismatchCmd::Back => flow.back()?,
        MismatchCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
