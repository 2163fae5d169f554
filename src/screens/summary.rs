use std::io::Write;

use clap::{Parser, ValueEnum};

use abha_lib::account::AccountRecord;

use crate::error;
use crate::flow::{Flow, Screen};
use crate::formatting::{osc52_copy, write_summary};

use super::Outcome;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CopyField {
    Number,
    Address,
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub enum SummaryCmd {
    /// show the account details
    Show,

    /// copy the account number or address to the clipboard
    Copy {
        #[arg(value_enum)]
        field: CopyField,
    },

    /// download the account card
    Download,

    /// share the account details
    Share,

    /// return to the dashboard
    #[command(alias = "finish")]
    Done,

    /// return to address selection
    Back,

    /// exit the wizard
    Quit,
}

pub fn render<W>(out: &mut W, record: &AccountRecord) -> std::io::Result<()>
where
    W: Write
{
    write_summary(out, record)?;
    writeln!(out, "commands: show | copy number|address | download | share | done | back | quit")
}

/// writes the clipboard sequence followed by an acknowledgement
pub fn copy_field<W>(out: &mut W, record: &AccountRecord, field: CopyField) -> std::io::Result<()>
where
    W: Write
{
    let (label, value) = match field {
        CopyField::Number => ("account number", record.account_number.to_string()),
        CopyField::Address => ("account address", record.account_address.to_string()),
    };

    write!(out, "{}", osc52_copy(&value))?;
    writeln!(out, "{label} copied to clipboard")?;
    out.flush()
}

pub fn handle(flow: &mut Flow, args: &[String]) -> error::Result<Outcome> {
    let cmd = super::parse::<SummaryCmd>(args)?;
    let mut stdout = std::io::stdout();

    match cmd {
        SummaryCmd::Back => flow.back()?,
        SummaryCmd::Done => flow.finish()?,
        SummaryCmd::Quit => return Ok(Outcome::Quit),
        other => {
            let Screen::Summary(record) = flow.screen() else {
                return Ok(Outcome::Stay);
            };

            match other {
                SummaryCmd::Show => render(&mut stdout, record)?,
                SummaryCmd::Copy { field } => copy_field(&mut stdout, record, field)?,
                SummaryCmd::Download => println!("download started"),
                SummaryCmd::Share => println!("share link ready"),
                _ => {},
            }
        },
    }

    Ok(Outcome::Stay)
}
