//! The eleven fault-provoking attempts, in run order.
//!
//! Every attempt is a free function with the [`Attempt`](crate::runner::Attempt) signature. None of
//! them share state; file handles and the async runtime are owned locals
//! released when the function returns, on the fault path too.

use crate::config::RunnerConfig;
use crate::fault::{Fault, FaultKind};
use crate::registry::{resolve_type, DynamicValue};
use crate::runner::Trial;
use sqlx::{Connection, MySqlConnection};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use tracing::debug;

pub const TRIALS: [Trial; 11] = [
    Trial::new(
        1,
        "read a line from a missing file",
        &[FaultKind::Io],
        read_line_from_missing_file,
    ),
    Trial::new(
        2,
        "open a missing file",
        &[FaultKind::FileNotFound, FaultKind::Io],
        open_missing_file,
    ),
    Trial::new(
        3,
        "read past the end of a file",
        &[FaultKind::EndOfInput, FaultKind::Io],
        read_past_end_of_file,
    ),
    Trial::new(
        4,
        "connect to an absent database",
        &[FaultKind::Database],
        connect_to_absent_database,
    ),
    Trial::new(
        5,
        "resolve an unknown type",
        &[FaultKind::TypeResolution],
        resolve_unknown_type,
    ),
    Trial::new(
        6,
        "divide by zero",
        &[FaultKind::Arithmetic],
        divide_by_zero,
    ),
    Trial::new(
        7,
        "use an absent value",
        &[FaultKind::NullReference],
        use_absent_value,
    ),
    Trial::new(
        8,
        "index past the end of an array",
        &[FaultKind::Bounds],
        index_out_of_bounds,
    ),
    Trial::new(
        9,
        "cast to an incompatible type",
        &[FaultKind::TypeMismatch],
        cast_to_incompatible_type,
    ),
    Trial::new(
        10,
        "square root of a negative number",
        &[FaultKind::IllegalArgument],
        sqrt_of_negative,
    ),
    Trial::new(
        11,
        "parse a malformed number",
        &[FaultKind::NumberFormat],
        parse_malformed_number,
    ),
];

fn io_fault(path: &Path) -> impl FnOnce(std::io::Error) -> Fault + '_ {
    move |source| Fault::io(path.display().to_string(), source)
}

pub fn read_line_from_missing_file(
    config: &RunnerConfig,
    _out: &mut dyn Write,
) -> Result<(), Fault> {
    let name = &config.missing_file;
    let file = File::open(config.resolve(name)).map_err(io_fault(name))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader.read_line(&mut line).map_err(io_fault(name))?;
    debug!(bytes = line.len(), "read first line");
    Ok(())
}

pub fn open_missing_file(config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let name = &config.another_missing_file;
    let file = File::open(config.resolve(name)).map_err(io_fault(name))?;
    debug!(?file, "opened");
    Ok(())
}

/// Writes exactly one byte, then asks for two.
pub fn read_past_end_of_file(config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let name = &config.scratch_file;
    let path = config.resolve(name);

    {
        let mut writer = File::create(&path).map_err(io_fault(name))?;
        writer.write_all(&[1]).map_err(io_fault(name))?;
    }

    let mut reader = File::open(&path).map_err(io_fault(name))?;
    let mut buffer = [0u8; 2];
    reader.read_exact(&mut buffer).map_err(io_fault(name))?;
    debug!(?buffer, "read two bytes");
    Ok(())
}

pub fn connect_to_absent_database(
    config: &RunnerConfig,
    _out: &mut dyn Write,
) -> Result<(), Fault> {
    let target = config.redacted_database_url();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| Fault::io("async runtime", source))?;

    debug!(%target, timeout = ?config.connect_timeout, "connecting");
    runtime.block_on(async move {
        let connect = MySqlConnection::connect(&config.database_url);
        match tokio::time::timeout(config.connect_timeout, connect).await {
            Ok(Ok(connection)) => connection
                .close()
                .await
                .map_err(|source| Fault::Database { target, source }),
            Ok(Err(source)) => Err(Fault::Database { target, source }),
            Err(_) => Err(Fault::ConnectTimeout {
                target,
                after: config.connect_timeout,
            }),
        }
    })
}

pub fn resolve_unknown_type(config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let constructor = resolve_type(&config.unknown_type_name)?;
    let value = constructor();
    debug!(type_name = value.type_name(), "constructed");
    Ok(())
}

pub fn divide_by_zero(_config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let dividend: i32 = 10;
    let divisor: i32 = 0;
    let quotient = dividend
        .checked_div(divisor)
        .ok_or(Fault::Arithmetic { operation: "divide" })?;
    debug!(quotient, "divided");
    Ok(())
}

/// Would print the length of a string, but there is no string.
pub fn use_absent_value(_config: &RunnerConfig, out: &mut dyn Write) -> Result<(), Fault> {
    let text: Option<String> = None;
    let len = text.as_deref().map(str::len).ok_or(Fault::NullReference {
        action: "read the length of a string",
    })?;
    writeln!(out, "{len}").map_err(|source| Fault::io("stdout", source))?;
    Ok(())
}

pub fn index_out_of_bounds(_config: &RunnerConfig, out: &mut dyn Write) -> Result<(), Fault> {
    let values = [1, 2, 3];
    let index = 5;
    let value = values.get(index).ok_or(Fault::Bounds {
        index,
        len: values.len(),
    })?;
    writeln!(out, "{value}").map_err(|source| Fault::io("stdout", source))?;
    Ok(())
}

pub fn cast_to_incompatible_type(
    _config: &RunnerConfig,
    _out: &mut dyn Write,
) -> Result<(), Fault> {
    let value = DynamicValue::new(10i32);
    let text: String = value.downcast()?;
    debug!(%text, "cast");
    Ok(())
}

/// Square root that rejects arguments outside its domain instead of
/// returning NaN.
pub fn checked_sqrt(value: f64) -> Result<f64, Fault> {
    if value.is_nan() || value < 0.0 {
        return Err(Fault::IllegalArgument {
            operation: "sqrt",
            value: value.to_string(),
            reason: "argument must be a non-negative number",
        });
    }
    Ok(value.sqrt())
}

pub fn sqrt_of_negative(_config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let argument = -1.0_f64;
    debug!(native = argument.sqrt(), "f64::sqrt does not fail on negative input");
    let root = checked_sqrt(argument)?;
    debug!(root, "square root");
    Ok(())
}

pub fn parse_malformed_number(_config: &RunnerConfig, _out: &mut dyn Write) -> Result<(), Fault> {
    let input = "abc";
    let number: i32 = input.parse().map_err(|source| Fault::NumberFormat {
        input: input.to_string(),
        source,
    })?;
    debug!(number, "parsed");
    Ok(())
}
