use std::io::{BufRead, Write};

use anyhow::Result;

use crate::entries::Side;
use crate::session::{Outcome, Session};
use crate::statement;

/// Operator-facing front end over a [`Session`]. Events go to `out`,
/// rejections and warnings go to `err`.
pub struct Console<'s, 'a, O, E> {
    session: &'s mut Session<'a>,
    out: O,
    err: E,
}

impl<'s, 'a, O: Write, E: Write> Console<'s, 'a, O, E> {
    pub fn new(session: &'s mut Session<'a>, out: O, err: E) -> Self {
        Console { session, out, err }
    }

    fn report(&mut self, outcome: Outcome) -> Result<()> {
        for event in &outcome.events {
            writeln!(self.out, "{}", event)?;
        }
        if let Some(e) = outcome.store_error {
            writeln!(self.err, "warning: {} (changes are kept in memory only)", e)?;
        }
        Ok(())
    }

    /// submit records one ledger command; blank input is ignored
    pub fn submit(&mut self, raw: &str) -> Result<()> {
        match self.session.submit(raw) {
            Ok(outcome) => self.report(outcome),
            Err(e) if e.is_noop() => Ok(()),
            Err(e) => {
                writeln!(self.err, "rejected {:?}: {}", raw, e)?;
                Ok(())
            }
        }
    }

    pub fn settle(&mut self, side: Side) -> Result<()> {
        let outcome = self.session.declare(side)?;
        self.report(outcome)
    }

    pub fn reset(&mut self) -> Result<()> {
        let outcome = self.session.reset();
        self.report(outcome)
    }

    pub fn statement(&mut self) -> Result<()> {
        statement::write_statement(&mut self.out, self.session.ledger())
    }

    /// interact treats `settle <side>`, `reset` and `statement` as directives
    /// and every other line as a ledger command.
    pub fn interact<R: BufRead>(&mut self, input: R) -> Result<()> {
        for line in input.lines() {
            let line = line?;
            let mut words = line.split_whitespace();
            match words.next().map(str::to_ascii_lowercase).as_deref() {
                Some("settle") => match words.next().map(str::parse::<Side>) {
                    Some(Ok(side)) => self.settle(side)?,
                    Some(Err(e)) => writeln!(self.err, "{}", e)?,
                    None => writeln!(self.err, "usage: settle <A|B>")?,
                },
                Some("reset") => self.reset()?,
                Some("statement") => self.statement()?,
                _ => self.submit(&line)?,
            }
        }
        Ok(())
    }
}
