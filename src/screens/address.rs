use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{AddressForm, Flow, Screen};

use super::Outcome;

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum AddressCmd {
    /// list the suggested addresses
    #[command(alias = "ls")]
    List,

    /// select an address by its number in the list or by its value
    Select {
        choice: String,
    },

    /// create the account with the selected address
    #[command(alias = "create")]
    Submit,

    /// return to the OTP screen
    Back,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W, form: &AddressForm) -> std::io::Result<()>
where
    W: Write
{
    let selected = form.selected_index();

    writeln!(out, "choose your ABHA address")?;

    for (index, address) in form.candidates().iter().enumerate() {
        let mark = if selected == Some(index) { "*" } else { " " };

        writeln!(out, " {mark} {}. {address}", index + 1)?;
    }

    if form.can_submit() {
        writeln!(out, "commands: list | select N|ADDRESS | submit | back | quit")
    } else {
        writeln!(out, "commands: list | select N|ADDRESS | back | quit")
    }
}

fn show(flow: &Flow) -> error::Result {
    if let Screen::Address(form) = flow.screen() {
        render(&mut std::io::stdout(), form)?;
    }

    Ok(())
}

pub fn handle(flow: &mut Flow, args: &[String]) -> error::Result<Outcome> {
    match super::parse::<AddressCmd>(args)? {
        AddressCmd::List => show(flow)?,
        AddressCmd::Select { choice } => {
            match choice.trim().parse::<usize>() {
                Ok(number) if number > 0 => flow.select_address(number - 1)?,
                _ => flow.select_address_value(&choice)?,
            }

            show(flow)?;
        },
        AddressCmd::Submit => {
            println!("creating account...");

            flow.submit_address(&mut rand::thread_rng())?;
        },
        AddressCmd::Back => flow.back()?,
        AddressCmd::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Stay)
}
