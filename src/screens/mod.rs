//! terminal rendering of the wizard. every screen reads one command line at a
//! time, split with shell rules and parsed with that screen's command set.

use std::io::Write;

use clap::Parser;

use crate::error;
use crate::flow::{Flow, Gateway, Screen};
use crate::input;

pub mod login;
pub mod dashboard;
pub mod method;
pub mod document;
pub mod passcode;
pub mod mismatch;
pub mod address;
pub mod summary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stay,
    Quit,
}

/// parses a command line against a screen's commands
pub(crate) fn parse<C>(args: &[String]) -> error::Result<C>
where
    C: Parser
{
    Ok(C::try_parse_from(args)?)
}

pub fn render<W>(out: &mut W, flow: &Flow) -> std::io::Result<()>
where
    W: Write
{
    writeln!(out)?;
    writeln!(out, "== {} ==", flow.screen().name())?;

    if let Some(document) = flow.screen().context().and_then(|c| c.document_number.as_ref()) {
        writeln!(out, "aadhaar: {document}")?;
    }

    match flow.screen() {
        Screen::Login => login::render(out),
        Screen::Dashboard => dashboard::render(out),
        Screen::MethodSelect => method::render(out),
        Screen::Document(form) => document::render(out, form),
        Screen::Passcode(form) => passcode::render(out, form),
        Screen::MobileMismatch(context) => mismatch::render(out, context),
        Screen::Address(form) => address::render(out, form),
        Screen::Summary(record) => summary::render(out, record),
    }
}

fn dispatch<G>(flow: &mut Flow, gateway: &G, args: &[String]) -> error::Result<Outcome>
where
    G: Gateway + ?Sized
{
    match flow.screen() {
        Screen::Login => login::handle(flow, gateway, args),
        Screen::Dashboard => dashboard::handle(flow, gateway, args),
        Screen::MethodSelect => method::handle(flow, args),
        Screen::Document(_) => document::handle(flow, gateway, args),
        Screen::Passcode(_) => passcode::handle(flow, gateway, args),
        Screen::MobileMismatch(_) => mismatch::handle(flow, args),
        Screen::Address(_) => address::handle(flow, args),
        Screen::Summary(_) => summary::handle(flow, args),
    }
}

/// runs the wizard until the user quits or stdin is closed
pub fn run<G>(flow: &mut Flow, gateway: &G) -> error::Result
where
    G: Gateway + ?Sized
{
    let mut stdout = std::io::stdout();
    let mut shown: Option<(&'static str, usize)> = None;

    loop {
        let current = (flow.screen().name(), flow.history().len());

        if shown != Some(current) {
            render(&mut stdout, flow)?;
            shown = Some(current);
        }

        let Some(given) = input::read_line("> ")? else {
            return Ok(());
        };
        let trimmed = given.trim();

        if trimmed.is_empty() {
            continue;
        }

        let Ok(args) = shell_words::split(trimmed) else {
            println!("failed to parse command line args");
            continue;
        };

        match dispatch(flow, gateway, &args) {
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Stay) => {},
            Err(err) => println!("{}", err),
        }
    }
}
