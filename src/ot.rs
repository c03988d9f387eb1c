//! Inputs of oblivious transfer protocols.

use alloc::{boxed::Box, vec::Vec};

use serde::{Deserialize, Serialize};
use serde_encoded_bytes::{Hex, SliceLike};

/// Errors in the layout of OT inputs.
#[derive(displaydoc::Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// The number of transfers must be positive
    ZeroCount,
    /// A buffer of {len} bytes cannot be split into {num_ots} equal messages
    NotDivisible {
        /// The buffer length.
        len: usize,
        /// The number of transfers.
        num_ots: usize,
    },
}

impl std::error::Error for InputError {}

/// The sender's input to a batch of OT-extension transfers: for each transfer `i`,
/// the messages `x0[i]` and `x1[i]`, packed back to back into two buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtExtensionSenderInput {
    #[serde(with = "SliceLike::<Hex>")]
    x0: Box<[u8]>,
    #[serde(with = "SliceLike::<Hex>")]
    x1: Box<[u8]>,
    num_ots: usize,
}

impl OtExtensionSenderInput {
    /// Packs the sender's messages; the layout is checked by [`validate`](`Self::validate`).
    pub fn new(x0: Vec<u8>, x1: Vec<u8>, num_ots: usize) -> Self {
        Self {
            x0: x0.into(),
            x1: x1.into(),
            num_ots,
        }
    }

    /// The concatenated messages for the choice bit 0.
    pub fn x0(&self) -> &[u8] {
        &self.x0
    }

    /// The concatenated messages for the choice bit 1.
    pub fn x1(&self) -> &[u8] {
        &self.x1
    }

    /// The number of transfers.
    pub fn num_ots(&self) -> usize {
        self.num_ots
    }

    /// The size of a single message in [`x0`](`Self::x0`), or 0 if there are no transfers.
    pub fn x0_item_len(&self) -> usize {
        self.x0.len().checked_div(self.num_ots).unwrap_or(0)
    }

    /// The size of a single message in [`x1`](`Self::x1`), or 0 if there are no transfers.
    ///
    /// Not necessarily equal to [`x0_item_len`](`Self::x0_item_len`).
    pub fn x1_item_len(&self) -> usize {
        self.x1.len().checked_div(self.num_ots).unwrap_or(0)
    }

    /// Checks that both buffers split into `num_ots` equal messages.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.num_ots == 0 {
            return Err(InputError::ZeroCount);
        }
        for buffer in [&self.x0, &self.x1] {
            if buffer.len() % self.num_ots != 0 {
                return Err(InputError::NotDivisible {
                    len: buffer.len(),
                    num_ots: self.num_ots,
                });
            }
        }
        Ok(())
    }

    /// Iterates over the message pairs `(x0[i], x1[i])`.
    pub fn pairs(&self) -> Result<impl Iterator<Item = (&[u8], &[u8])>, InputError> {
        self.validate()?;
        let (x0_len, x1_len) = (self.x0_item_len(), self.x1_item_len());
        Ok((0..self.num_ots).map(move |index| (item(&self.x0, index, x0_len), item(&self.x1, index, x1_len))))
    }
}

/// The `index`-th message of `len` bytes; in range for a validated layout.
fn item(buffer: &[u8], index: usize, len: usize) -> &[u8] {
    buffer.get(index * len..(index + 1) * len).unwrap_or_default()
}
