//! MessagePack timestamp extension (ext tag `0xff`).
//!
//! Unifies the three fixed-width MessagePack timestamp sub-formats into one
//! `Timestamp` that picks its own wire width, since callers of a dynamic
//! codec think in terms of "a timestamp", not "which of three sub-formats
//! to use".

use crate::Error;

/// Nanoseconds must not exceed this value.
pub const NANOS_MAX: u32 = 999_999_999;

/// A point in time: seconds since the Unix epoch (may be negative) plus a
/// sub-second nanosecond component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    seconds: i64,
    nanoseconds: u32,
}

impl Timestamp {
    /// Build a timestamp from its components.
    ///
    /// Fails with [`Error::Decode`] if `nanoseconds` is not in `[0, 1e9)`.
    pub fn from_components(seconds: i64, nanoseconds: u32) -> Result<Self, Error> {
        if nanoseconds > NANOS_MAX {
            return Err(Error::Decode {
                reason: "timestamp nanoseconds out of range",
            });
        }
        Ok(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Build a timestamp from fractional Unix seconds.
    pub fn from_unix(seconds: f64) -> Self {
        let whole = seconds.floor();
        let frac = seconds - whole;
        let nanos = (frac * 1_000_000_000.0).round().clamp(0.0, NANOS_MAX as f64) as u32;
        Self {
            seconds: whole as i64,
            nanoseconds: nanos,
        }
    }

    /// Convert back to fractional Unix seconds.
    pub fn to_unix(&self) -> f64 {
        self.seconds as f64 + (self.nanoseconds as f64 / 1_000_000_000.0)
    }

    /// Seconds since the Unix epoch.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanosecond component, in `[0, 1e9)`.
    pub fn nanoseconds(&self) -> u32 {
        self.nanoseconds
    }

    /// Encode this timestamp into its minimal-width ext payload.
    pub(crate) fn to_payload(self) -> Vec<u8> {
        const SECONDS_34BIT_MAX: u64 = (1 << 34) - 1;

        if self.nanoseconds == 0 && (0..=SECONDS_34BIT_MAX as i64).contains(&self.seconds) {
            return (self.seconds as u32).to_be_bytes().to_vec();
        }
        if (0..=SECONDS_34BIT_MAX as i64).contains(&self.seconds) {
            let packed = ((self.nanoseconds as u64) << 34) | (self.seconds as u64);
            return packed.to_be_bytes().to_vec();
        }
        let mut buf = Vec::with_capacity(12);
        buf.extend_from_slice(&self.nanoseconds.to_be_bytes());
        buf.extend_from_slice(&self.seconds.to_be_bytes());
        buf
    }

    /// Decode a timestamp from its 4/8/12-byte ext payload.
    pub(crate) fn from_payload(payload: &[u8]) -> Result<Self, Error> {
        const MALFORMED: Error = Error::Decode {
            reason: "timestamp payload must be 4, 8 or 12 bytes",
        };
        match payload.len() {
            4 => {
                let secs = u32::from_be_bytes(payload.try_into().map_err(|_| MALFORMED)?);
                Ok(Self {
                    seconds: secs as i64,
                    nanoseconds: 0,
                })
            }
            8 => {
                let packed = u64::from_be_bytes(payload.try_into().map_err(|_| MALFORMED)?);
                let nanoseconds = (packed >> 34) as u32;
                let seconds = (packed & ((1 << 34) - 1)) as i64;
                if nanoseconds > NANOS_MAX {
                    return Err(Error::Decode {
                        reason: "timestamp64 nanoseconds out of range",
                    });
                }
                Ok(Self {
                    seconds,
                    nanoseconds,
                })
            }
            12 => {
                let nanoseconds =
                    u32::from_be_bytes(payload[..4].try_into().map_err(|_| MALFORMED)?);
                let seconds = i64::from_be_bytes(payload[4..].try_into().map_err(|_| MALFORMED)?);
                if nanoseconds > NANOS_MAX {
                    return Err(Error::Decode {
                        reason: "timestamp96 nanoseconds out of range",
                    });
                }
                Ok(Self {
                    seconds,
                    nanoseconds,
                })
            }
            _ => Err(MALFORMED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 4)]
    #[case((1u64 << 34) as i64 - 1, 0, 4)]
    #[case(1, 1, 8)]
    #[case((1u64 << 34) as i64 - 1, 999_999_999, 8)]
    #[case(-1, 0, 12)]
    #[case(1 << 34, 0, 12)]
    #[case(i64::MIN, 999_999_999, 12)]
    fn roundtrips_through_minimal_width(
        #[case] seconds: i64,
        #[case] nanoseconds: u32,
        #[case] expected_width: usize,
    ) {
        let ts = Timestamp::from_components(seconds, nanoseconds).unwrap();
        let payload = ts.to_payload();
        assert_eq!(payload.len(), expected_width);
        let back = Timestamp::from_payload(&payload).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn rejects_out_of_range_nanoseconds() {
        assert!(Timestamp::from_components(0, 1_000_000_000).is_err());
    }

    #[test]
    fn from_unix_to_unix_roundtrips_approximately() {
        let ts = Timestamp::from_unix(1_700_000_000.5);
        assert!((ts.to_unix() - 1_700_000_000.5).abs() < 1e-6);
    }
}
