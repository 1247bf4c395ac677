//! Positional command-line arguments: `arena-engine [capacity [station_count]]`.
//!
//! Either argument, when present, overrides the config file.

use crate::error::EngineError;

/// Overrides taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArgOverrides {
    /// Maximum number of live participants.
    pub capacity: Option<usize>,
    /// Number of stations.
    pub station_count: Option<u32>,
}

impl ArgOverrides {
    /// Parse the arguments after the program name.
    pub fn parse<I, S>(args: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let capacity = args.next().map(|a| positive(a.as_ref())).transpose()?;
        let station_count = args
            .next()
            .map(|a| {
                let raw = a.as_ref();
                positive(raw).and_then(|n| {
                    u32::try_from(n).map_err(|e| EngineError::Args {
                        value: raw.to_owned(),
                        reason: e.to_string(),
                    })
                })
            })
            .transpose()?;
        Ok(Self {
            capacity,
            station_count,
        })
    }
}

fn positive(raw: &str) -> Result<usize, EngineError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(EngineError::Args {
            value: raw.to_owned(),
            reason: String::from("must be at least 1"),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(EngineError::Args {
            value: raw.to_owned(),
            reason: e.to_string(),
        }),
    }
}
