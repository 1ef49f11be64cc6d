// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Persisted parameter record.
//!
//! ```text
//! "RMXK" | version u8 | name_len u8 | name | memory_bytes u64 | step_count u64
//!        | iteration_count u32 | output_bytes u32 | salt_len u32 | salt
//! ```
//!
//! Integers are little-endian. The record is written into a SecureBuffer
//! because it carries the salt.

use romix_buffer::SecureBuffer;

use crate::consts::{PERSISTED_MAGIC, PERSISTED_VERSION};
use crate::error::{DecodeError, KdfError};
use crate::hash::HashAlgorithm;
use crate::params::KdfParameters;

struct Writer {
    buffer: SecureBuffer,
    cursor: usize,
}

impl Writer {
    fn with_len(len: usize) -> Self {
        Self {
            buffer: SecureBuffer::create(len),
            cursor: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        self.buffer.as_mut_slice()[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
    }

    fn finish(self) -> SecureBuffer {
        debug_assert_eq!(self.cursor, self.buffer.len());
        self.buffer
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.bytes.len() - self.cursor;
        if len > remaining {
            return Err(DecodeError::Truncated {
                needed: len - remaining,
            });
        }

        let slice = &self.bytes[self.cursor..self.cursor + len];
        self.cursor += len;

        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take_array::<1>()?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    fn u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    fn usize_from_u64(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        usize::try_from(self.u64()?).map_err(|_| DecodeError::ValueOutOfRange(field))
    }

    fn usize_from_u32(&mut self, field: &'static str) -> Result<usize, DecodeError> {
        usize::try_from(self.u32()?).map_err(|_| DecodeError::ValueOutOfRange(field))
    }

    fn finish(self) -> Result<(), DecodeError> {
        match self.bytes.len() - self.cursor {
            0 => Ok(()),
            trailing => Err(DecodeError::TrailingBytes(trailing)),
        }
    }
}

impl KdfParameters {
    /// Serializes every field verbatim into a new buffer.
    ///
    /// # Errors
    ///
    /// [`DecodeError::ValueOutOfRange`] if the salt does not fit its `u32`
    /// length prefix.
    pub fn encode(&self) -> Result<SecureBuffer, KdfError> {
        let name = self.hash_name().as_bytes();
        let salt = self.salt().as_slice();

        let salt_len =
            u32::try_from(salt.len()).map_err(|_| DecodeError::ValueOutOfRange("salt_len"))?;
        let output_bytes = u32::try_from(self.output_bytes())
            .map_err(|_| KdfError::OutputTooLong(self.output_bytes()))?;

        // Names are short ASCII constants.
        debug_assert!(name.len() <= usize::from(u8::MAX));

        let len = PERSISTED_MAGIC.len() + 1 + 1 + name.len() + 8 + 8 + 4 + 4 + 4 + salt.len();
        let mut writer = Writer::with_len(len);

        writer.put(PERSISTED_MAGIC);
        writer.put(&[PERSISTED_VERSION, name.len() as u8]);
        writer.put(name);
        writer.put(&(self.memory_bytes() as u64).to_le_bytes());
        writer.put(&(self.step_count() as u64).to_le_bytes());
        writer.put(&self.iteration_count().to_le_bytes());
        writer.put(&output_bytes.to_le_bytes());
        writer.put(&salt_len.to_le_bytes());
        writer.put(salt);

        Ok(writer.finish())
    }

    /// Restores parameters written by [`encode`](KdfParameters::encode).
    ///
    /// The record must be consumed exactly; every invariant is re-checked.
    pub fn decode(bytes: &[u8]) -> Result<Self, KdfError> {
        let mut reader = Reader::new(bytes);

        if reader.take(PERSISTED_MAGIC.len())? != PERSISTED_MAGIC {
            return Err(DecodeError::BadMagic.into());
        }

        let version = reader.u8()?;
        if version != PERSISTED_VERSION {
            return Err(DecodeError::UnsupportedVersion(version).into());
        }

        let name_len = usize::from(reader.u8()?);
        let name =
            core::str::from_utf8(reader.take(name_len)?).map_err(|_| DecodeError::InvalidHashName)?;
        let hash_algorithm: HashAlgorithm = name.parse()?;

        let memory_bytes = reader.usize_from_u64("memory_bytes")?;
        let step_count = reader.usize_from_u64("step_count")?;
        let iteration_count = reader.u32()?;
        let output_bytes = reader.usize_from_u32("output_bytes")?;
        let salt_len = reader.usize_from_u32("salt_len")?;
        let salt = SecureBuffer::from_slice(reader.take(salt_len)?);

        reader.finish()?;

        KdfParameters::from_persisted(
            memory_bytes,
            step_count,
            iteration_count,
            salt,
            hash_algorithm,
            output_bytes,
        )
    }
}
