#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum GoldfishError {
    InvalidDataLength,
    SeedTooLong,
    InvalidSeedDerivation,
    AccountNotFound,
}

impl From<GoldfishError> for &'static str {
    fn from(value: GoldfishError) -> Self {
        match value {
            GoldfishError::InvalidDataLength => "Proof account data isn't exactly 8 bytes",
            GoldfishError::SeedTooLong => "Seed is longer than the maximum seed length",
            GoldfishError::InvalidSeedDerivation => "Couldn't derive an address from the seed",
            GoldfishError::AccountNotFound => "Error: cannot find the greeted account",
        }
    }
}

impl core::fmt::Display for GoldfishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str((*self).into())
    }
}

impl std::error::Error for GoldfishError {}

pub type GoldfishResult<T = ()> = Result<T, GoldfishError>;
