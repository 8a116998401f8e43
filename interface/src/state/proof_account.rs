use static_assertions::const_assert_eq;

use crate::{
    error::{
        GoldfishError,
        GoldfishResult,
    },
    state::{
        LeU32,
        U32_SIZE,
    },
};

pub const PROOF_ACCOUNT_SIZE: usize = 8;

/// The state stored in a goldfish proof account.
///
/// The layout is two little-endian `u32`s with no discriminant or padding, which is byte-for-byte
/// the borsh encoding of `{ counter: u32, level: u32 }`.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ProofAccount {
    /// The u32 number of upgrade attempts as LE bytes.
    counter: LeU32,
    /// The u32 fish level as LE bytes.
    level: LeU32,
}

const_assert_eq!(PROOF_ACCOUNT_SIZE, size_of::<ProofAccount>());
const_assert_eq!(align_of::<ProofAccount>(), 1);

impl ProofAccount {
    pub const LEN: usize = PROOF_ACCOUNT_SIZE;

    pub fn new(counter: u32, level: u32) -> Self {
        Self {
            counter: counter.to_le_bytes(),
            level: level.to_le_bytes(),
        }
    }

    #[inline(always)]
    pub fn counter(&self) -> u32 {
        u32::from_le_bytes(self.counter)
    }

    #[inline(always)]
    pub fn level(&self) -> u32 {
        u32::from_le_bytes(self.level)
    }

    pub fn pack(&self) -> [u8; PROOF_ACCOUNT_SIZE] {
        let mut dst = [0u8; PROOF_ACCOUNT_SIZE];
        dst[..U32_SIZE].copy_from_slice(&self.counter);
        dst[U32_SIZE..].copy_from_slice(&self.level);
        dst
    }

    /// Decodes account data. Anything other than exactly [`ProofAccount::LEN`] bytes is rejected.
    pub fn unpack(data: &[u8]) -> GoldfishResult<Self> {
        let bytes: &[u8; PROOF_ACCOUNT_SIZE] = data
            .try_into()
            .map_err(|_| GoldfishError::InvalidDataLength)?;

        let (counter, level) = bytes.split_at(U32_SIZE);
        Ok(Self {
            // Both halves are exactly `U32_SIZE` bytes after the length check above.
            counter: counter.try_into().map_err(|_| GoldfishError::InvalidDataLength)?,
            level: level.try_into().map_err(|_| GoldfishError::InvalidDataLength)?,
        })
    }
}

impl core::fmt::Debug for ProofAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProofAccount")
            .field("counter", &self.counter())
            .field("level", &self.level())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_data_is_the_initial_state() {
        let account = ProofAccount::unpack(&[0; 8]).unwrap();
        assert_eq!(account, ProofAccount::default());
        assert_eq!(account.counter(), 0);
        assert_eq!(account.level(), 0);
    }

    #[test]
    fn fields_are_little_endian() {
        let account = ProofAccount::unpack(&[1, 0, 0, 0, 0, 1, 0, 0]).unwrap();
        assert_eq!(account.counter(), 1);
        assert_eq!(account.level(), 256);
        assert_eq!(
            ProofAccount::new(0x0403_0201, 7).pack(),
            [1, 2, 3, 4, 7, 0, 0, 0]
        );
    }

    #[test]
    fn wrong_lengths_are_rejected() {
        for len in [0, 4, 7, 9, 16] {
            assert_eq!(
                ProofAccount::unpack(&vec![0; len]),
                Err(GoldfishError::InvalidDataLength)
            );
        }
    }
}
