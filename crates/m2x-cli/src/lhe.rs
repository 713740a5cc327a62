//! Les Houches event files.
//!
//! Only the `<event>` blocks are interpreted. The first line of a block holds
//! the particle count `NUP`; each of the next `NUP` lines is
//! `IDUP ISTUP MOTHUP1 MOTHUP2 ICOLUP1 ICOLUP2 PX PY PZ E M VTIMUP SPINUP`.
//! Anything after the particle lines (weights, comments) is skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

use m2x_chain::RawParticle;
use m2x_core::errors::{ErrorInfo, M2xError};
use tracing::debug;

const PARTICLE_FIELDS: usize = 13;

/// Opens an event file for reading.
pub fn open(path: &Path) -> Result<LheReader<BufReader<File>>, M2xError> {
    let file = File::open(path).map_err(|err| {
        M2xError::Input(
            ErrorInfo::new("input-open", err.to_string()).with_context("path", path.display()),
        )
    })?;
    Ok(LheReader::new(BufReader::new(file)))
}

/// Pull-based iterator over the events of a Les Houches stream.
///
/// A malformed event yields a [`M2xError::Record`] and the reader moves on to
/// the next block. A failing read yields [`M2xError::Input`] and ends the
/// stream.
#[derive(Debug)]
pub struct LheReader<R> {
    reader: R,
    line_number: usize,
    events: usize,
    done: bool,
}

impl<R: BufRead> LheReader<R> {
    /// Wraps a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            events: 0,
            done: false,
        }
    }

    /// Number of `<event>` blocks seen so far.
    pub fn events_seen(&self) -> usize {
        self.events
    }

    fn next_line(&mut self) -> Result<Option<String>, M2xError> {
        let mut buf = String::new();
        let read = self.reader.read_line(&mut buf).map_err(|err| {
            M2xError::Input(
                ErrorInfo::new("input-read", err.to_string())
                    .with_context("file_line", self.line_number + 1),
            )
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(buf))
    }

    /// Collects the lines of the next block, without the enclosing tags.
    fn next_block(&mut self) -> Result<Option<(usize, Vec<String>)>, M2xError> {
        loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.trim_start().starts_with("<event") => break,
                Some(_) => {}
            }
        }
        let start = self.line_number;
        let mut body = Vec::new();
        loop {
            match self.next_line()? {
                None => {
                    return Err(record_error(
                        "unterminated-event",
                        "end of file inside an event block",
                    )
                    .with_context("file_line", start));
                }
                Some(line) if line.trim_start().starts_with("</event") => {
                    return Ok(Some((start, body)));
                }
                Some(line) => body.push(line),
            }
        }
    }
}

impl<R: BufRead> Iterator for LheReader<R> {
    type Item = Result<Vec<RawParticle>, M2xError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_block() {
            Ok(Some((start, body))) => {
                self.events += 1;
                Some(parse_block(&body).map_err(|err| err.with_context("file_line", start)))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

fn parse_block(body: &[String]) -> Result<Vec<RawParticle>, M2xError> {
    let mut lines = body.iter().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| record_error("missing-event-header", "event block is empty"))?;
    let count: usize = parse_field(header.split_whitespace().next(), "NUP")?;

    let mut particles = Vec::with_capacity(count);
    for index in 0..count {
        let line = lines.next().ok_or_else(|| {
            record_error("truncated-event", "fewer particle lines than declared")
                .with_context("declared", count)
                .with_context("found", index)
        })?;
        let particle = parse_particle(line).map_err(|err| err.with_context("particle", index + 1))?;
        particles.push(particle);
    }
    debug!(particles = particles.len(), "parsed event block");
    Ok(particles)
}

fn parse_particle(line: &str) -> Result<RawParticle, M2xError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < PARTICLE_FIELDS {
        return Err(record_error("short-particle-line", "particle line has too few fields")
            .with_context("fields", fields.len()));
    }
    let field = |index: usize| fields.get(index).copied();
    let momentum = [6, 7, 8, 9, 10]
        .into_iter()
        .map(|index| parse_field::<f64>(field(index), "PUP"))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawParticle {
        type_id: parse_field(field(0), "IDUP")?,
        status: parse_field(field(1), "ISTUP")?,
        parent_lines: (parse_field(field(2), "MOTHUP1")?, parse_field(field(3), "MOTHUP2")?),
        mass: momentum[4],
        momentum,
    })
}

fn parse_field<T: FromStr>(raw: Option<&str>, name: &str) -> Result<T, M2xError> {
    let raw = raw.ok_or_else(|| {
        record_error("missing-field", "field absent").with_context("field", name)
    })?;
    raw.parse().map_err(|_| {
        record_error("malformed-field", "field does not parse")
            .with_context("field", name)
            .with_context("value", raw)
    })
}

fn record_error(code: &str, message: &str) -> M2xError {
    M2xError::Record(ErrorInfo::new(code, message))
}

/// Writes one event as an `<event>` block.
///
/// Colour, lifetime and spin columns are written as zero, and the process
/// header line carries unit weight.
pub fn write_event<W: Write>(out: &mut W, particles: &[RawParticle]) -> io::Result<()> {
    writeln!(out, "<event>")?;
    writeln!(out, "{} 1 1.0 0.0 0.0 0.0", particles.len())?;
    for particle in particles {
        let [px, py, pz, e] =
            [0, 1, 2, 3].map(|i| particle.momentum.get(i).copied().unwrap_or_default());
        writeln!(
            out,
            "{} {} {} {} 0 0 {} {} {} {} {} 0 9",
            particle.type_id,
            particle.status,
            particle.parent_lines.0,
            particle.parent_lines.1,
            px,
            py,
            pz,
            e,
            particle.mass
        )?;
    }
    writeln!(out, "</event>")
}
