use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{DocumentForm, Flow, Gateway};

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum DocumentCmd {
    /// set the aadhaar number, anything but digits is ignored
    #[command(alias = "set")]
    Enter {
        #[arg(required = true, num_args = 1..)]
        digits: Vec<String>,
    },

    /// request an OTP for the entered number
    Submit,

    /// show the current input
    Show,

    /// return to method selection
    Back,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W, form: &DocumentForm) -> std::io::Result<()>
where
    W: Write
{
    let input = form.input();

    writeln!(out, "enter your 12-digit aadhaar number")?;
    writeln!(out, "aadhaar number: [{}] {}/{}", form.display(), input.len(), input.max())?;

    if form.can_submit() {
        writeln!(out, "commands: enter DIGITS | submit | back | quit")
    } else {
        writeln!(out, "commands: enter DIGITS | back | quit")
    }
}

fn show(flow: &Flow) -> error::Result {
    if let crate::flow::Screen::Document(form) = flow.screen() {
        render(&mut std::io::stdout(), form)?;
    }

    Ok(())
}

pub fn handle<G>(flow: &mut Flow, gateway: &G, args: &[String]) -> error::Result<Outcome>
where
    G: Gateway + ?Sized
{
    let cmd = match super::parse::<DocumentCmd>(args) {
        Ok(cmd) => cmd,
        // a bare number is taken as input
        Err(err) => if args.iter().any(|a| a.bytes().any(|b| b.is_ascii_digit())) {
            DocumentCmd::Enter { digits: args.to_vec() }
        } else {
            return Err(err);
        }
    };

    match cmd {
        DocumentCmd::Enter { digits } => {
            flow.document_input(&digits.concat())?;

            show(flow)?;
        },
        DocumentCmd::Submit => {
            println!("sending OTP...");

            if let Err(err) = flow.submit_document(gateway) {
                if err.needs_login() {
                    println!("return to the dashboard and login again");
                }

                return Err(err.into());
            }

            println!("OTP sent");
        },
        DocumentCmd::Show => show(flow)?,
        DocumentCmd::Back => flow.back()?,
        DocumentCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
