// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker-domain error taxonomy.
//!
//! A job's `result` column is one signed 32-bit number: `0` on success,
//! a negative [`Error`] code on broker failure, or a positive system
//! errno / plugin-domain code passed through unchanged. The broker never
//! rewrites an OS errno on the way up — it is captured immediately at
//! the failing syscall and returned as-is so callers can disambiguate
//! it from a broker code by sign.

use thiserror::Error;

/// Plugin-domain status codes occupy `[PLUGIN_DOMAIN_LO, PLUGIN_DOMAIN_HI]`.
pub const PLUGIN_DOMAIN_LO: i32 = 0x10000;
pub const PLUGIN_DOMAIN_HI: i32 = 0x10FFF;

/// Broker-domain error codes, in the original declaration order (their
/// negative rank is `-(1 + position)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("xcore - database connection error")]
    EdbConn,
    #[error("xcore - invalid record")]
    EInvRec,
    #[error("xcore - no processor found")]
    ENoProc,
    #[error("xcore - bad job status")]
    EBadJ,
    #[error("xcore - job environment setup error")]
    EEnvJ,
    #[error("xcore - error spawn job")]
    ESpawnJ,
    #[error("xcore - invalid job state")]
    EStatJ,
    #[error("xcore - processor error")]
    EProc,
    #[error("xcore - sub job error")]
    ESub,
    #[error("xcore - next job error")]
    ENext,
    #[error("xcore - plugin return error")]
    EPlug,
    #[error("xcore - job argument error")]
    EArg,
    #[error("xcore - configuration error")]
    EConf,
    #[error("xcore - invalid plugin param")]
    EInvPlug,
    #[error("xcore - ambiguous plugin choice")]
    EAmbiPlug,
    #[error("xcore - no plugin found for the job")]
    ENoPlug,
    #[error("xcore - incomplete argument")]
    EIncompArg,
    #[error("xcore - log processing error")]
    ELog,
    #[error("xcore - resource pool full")]
    EResPoolFul,
    #[error("xcore - operation not implemented")]
    ENoImpl,
    /// A captured system errno, passed through unrewritten.
    #[error("system error {0}")]
    Errno(i32),
    /// A plugin-domain status in `[0x10000, 0x10FFF]`.
    #[error("plugin error {0:#x}")]
    Plugin(i32),
}

impl Error {
    const TAXONOMY: [Error; 20] = [
        Error::EdbConn,
        Error::EInvRec,
        Error::ENoProc,
        Error::EBadJ,
        Error::EEnvJ,
        Error::ESpawnJ,
        Error::EStatJ,
        Error::EProc,
        Error::ESub,
        Error::ENext,
        Error::EPlug,
        Error::EArg,
        Error::EConf,
        Error::EInvPlug,
        Error::EAmbiPlug,
        Error::ENoPlug,
        Error::EIncompArg,
        Error::ELog,
        Error::EResPoolFul,
        Error::ENoImpl,
    ];

    /// The value stored in a job's `result` column: negative for broker
    /// codes, positive for errno/plugin codes unchanged, `0` never
    /// constructed here (success has no `Error`).
    pub fn code(self) -> i32 {
        match self {
            Error::Errno(n) => n,
            Error::Plugin(n) => n,
            other => {
                let rank = Self::TAXONOMY
                    .iter()
                    .position(|e| *e == other)
                    .expect("all non-passthrough variants are in TAXONOMY");
                -((rank as i32) + 1)
            }
        }
    }

    /// Reconstruct an [`Error`] from a stored `result` column value.
    /// Returns `None` for `0` (success has no error to report).
    pub fn from_code(code: i32) -> Option<Error> {
        if code == 0 {
            None
        } else if code > 0 {
            if (PLUGIN_DOMAIN_LO..=PLUGIN_DOMAIN_HI).contains(&code) {
                Some(Error::Plugin(code))
            } else {
                Some(Error::Errno(code))
            }
        } else {
            let rank = (-code - 1) as usize;
            Self::TAXONOMY.get(rank).copied()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        edb_conn = { Error::EdbConn },
        inv_rec = { Error::EInvRec },
        no_proc = { Error::ENoProc },
        no_impl = { Error::ENoImpl },
    )]
    fn code_round_trips_through_from_code(e: Error) {
        assert_eq!(Error::from_code(e.code()), Some(e));
    }

    #[test]
    fn broker_codes_are_negative() {
        assert!(Error::EdbConn.code() < 0);
        assert!(Error::ENoImpl.code() < 0);
    }

    #[test]
    fn errno_passes_through_unrewritten() {
        let e = Error::Errno(5);
        assert_eq!(e.code(), 5);
        assert_eq!(Error::from_code(5), Some(Error::Errno(5)));
    }

    #[test]
    fn plugin_domain_is_recognized_on_read_back() {
        let code = PLUGIN_DOMAIN_LO + 3;
        assert_eq!(Error::from_code(code), Some(Error::Plugin(code)));
    }

    #[test]
    fn zero_has_no_error() {
        assert_eq!(Error::from_code(0), None);
    }
}
