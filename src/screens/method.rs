use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, Method};

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum MethodCmd {
    /// verify with an aadhaar number
    #[command(alias = "document")]
    Aadhaar,

    /// verify with biometrics
    Biometric,

    /// verify with a driving license
    License,

    /// return to the dashboard
    Back,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W) -> std::io::Result<()>
where
    W: Write
{
    writeln!(out, "choose how to verify your identity")?;
    writeln!(out, "  aadhaar    aadhaar number and OTP")?;
    writeln!(out, "  biometric  (coming soon)")?;
    writeln!(out, "  license    (coming soon)")?;
    writeln!(out, "commands: aadhaar | biometric | license | back | quit")
}

pub fn handle(flow: &mut Flow, args: &[String]) -> error::Result<Outcome> {
    match super::parse::<MethodCmd>(args)? {
        MethodCmd::Aadhaar => flow.choose_method(Method::Document)?,
        MethodCmd::Biometric => flow.choose_method(Method::Biometric)?,
        MethodCmd::License => flow.choose_method(Method::License)?,
        MethodCmd::Back => flow.back()?,
        MethodCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
