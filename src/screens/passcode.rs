use std::io::Write;
use std::time::Instant;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, Gateway, PasscodeForm, Screen};

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum PasscodeCmd {
    /// set the 6-digit OTP
    Otp {
        #[arg(required = true, num_args = 1..)]
        digits: Vec<String>,
    },

    /// set the 10-digit mobile number
    Mobile {
        #[arg(required = true, num_args = 1..)]
        digits: Vec<String>,
    },

    /// verify the OTP and mobile number
    #[command(alias = "verify")]
    Submit,

    /// send the OTP again once the timer has run out
    Resend,

    /// show the current input and timer
    #[command(alias = "show")]
    Status,

    /// return to the aadhaar number
    Back,

    /// exit the wizard
    Quit,
}

pub fn render_at<W>(out: &mut W, form: &PasscodeForm, now: Instant) -> std::io::Result<()>
where
    W: Write
{
    let otp = form.passcode();
    let mobile = form.contact();

    writeln!(out, "enter the OTP sent to the mobile number linked with your aadhaar")?;

    if let Some(hint) = form.hint() {
        writeln!(out, "registered mobile ends with {hint}")?;
    }

    writeln!(out, "OTP:    [{}] {}/{}", otp.as_str(), otp.len(), otp.max())?;
    writeln!(out, "mobile: [{}] {}/{}", mobile.as_str(), mobile.len(), mobile.max())?;

    match form.cooldown_remaining(now) {
        Some(0) | None => writeln!(out, "didn't receive the OTP? use resend")?,
        Some(secs) => writeln!(out, "resend OTP in {secs}s")?,
    }

    writeln!(out, "commands: otp DIGITS | mobile DIGITS | submit | resend | status | back | quit")
}

pub fn render<W>(out: &mut W, form: &PasscodeForm) -> std::io::Result<()>
where
    W: Write
{
    render_at(out, form, Instant::now())
}

fn show(flow: &Flow) -> error::Result {
    if let Screen::Passcode(form) = flow.screen() {
        render(&mut std::io::stdout(), form)?;
    }

    Ok(())
}

pub fn handle<G>(flow: &mut Flow, gateway: &G, args: &[String]) -> error::Result<Outcome>
where
    G: Gateway + ?Sized
{
    match super::parse::<PasscodeCmd>(args)? {
        PasscodeCmd::Otp { digits } => flow.passcode_input(&digits.concat())?,
        PasscodeCmd::Mobile { digits } => flow.contact_input(&digits.concat())?,
        PasscodeCmd::Submit => {
            println!("verifying...");

            flow.submit_passcode()?;
        },
        PasscodeCmd::Resend => {
            flow.resend_otp(gateway, Instant::now())?;

            println!("OTP sent again");
        },
        PasscodeCmd::Status => show(flow)?,
        PasscodeCmd::Back => flow.back()?,
        PasscodeCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
