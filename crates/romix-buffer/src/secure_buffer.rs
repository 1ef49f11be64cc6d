// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! SecureBuffer - owning byte buffer over a LockedRegion.

use core::fmt;
use core::ops::{Add, Bound, RangeBounds};

use romix_rand::EntropySource;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::BufferError;
use crate::region::LockedRegion;

/// Byte buffer for secret material.
///
/// - Exclusively owned; `clone()` allocates an independent locked region.
/// - Non-empty buffers live in a region locked against swap-out (best effort).
/// - Every region the buffer gives up is zeroized first: on [`resize`],
///   on reassignment, on [`wipe_and_release`] and on drop.
/// - Equality is byte-for-byte and constant-time in the length of the data.
/// - `Debug` never prints the contents.
///
/// [`resize`]: SecureBuffer::resize
/// [`wipe_and_release`]: SecureBuffer::wipe_and_release
#[derive(Default)]
pub struct SecureBuffer {
    region: Option<LockedRegion>,
    len: usize,
}

impl SecureBuffer {
    /// Creates an empty buffer. No memory is allocated or locked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a zero-filled buffer of `len` bytes.
    pub fn create(len: usize) -> Self {
        let region = (len > 0).then(|| LockedRegion::new(len));

        Self { region, len }
    }

    /// Creates a buffer holding a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = Self::create(bytes.len());
        buffer.as_mut_slice().copy_from_slice(bytes);
        buffer
    }

    /// Moves `bytes` into a new buffer, zeroizing the source.
    ///
    /// ```rust
    /// use romix_buffer::SecureBuffer;
    ///
    /// let mut pin = *b"1234";
    /// let buffer = SecureBuffer::from_mut_slice(&mut pin);
    ///
    /// assert_eq!(pin, [0u8; 4]);
    /// assert_eq!(buffer.as_slice(), b"1234");
    /// ```
    pub fn from_mut_slice(bytes: &mut [u8]) -> Self {
        let buffer = Self::from_slice(bytes);
        bytes.zeroize();
        buffer
    }

    /// Creates a buffer of `len` bytes filled from `entropy`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::Entropy`] if the source fails. The partially
    /// filled region is zeroized on the way out.
    pub fn generate_random<E>(len: usize, entropy: &E) -> Result<Self, BufferError>
    where
        E: EntropySource + ?Sized,
    {
        let mut buffer = Self::create(len);
        entropy.fill_bytes(buffer.as_mut_slice())?;

        Ok(buffer)
    }

    /// Returns the length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the size of the backing region (0 when empty).
    pub fn capacity(&self) -> usize {
        self.region.as_ref().map_or(0, LockedRegion::capacity)
    }

    /// Returns true if the backing region is locked in RAM.
    ///
    /// Empty buffers own no region and report `false`.
    pub fn is_locked(&self) -> bool {
        self.region.as_ref().is_some_and(LockedRegion::is_locked)
    }

    /// Returns the contents.
    pub fn as_slice(&self) -> &[u8] {
        match &self.region {
            Some(region) => &region.as_slice()[..self.len],
            None => &[],
        }
    }

    /// Returns the contents mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len;

        match &mut self.region {
            Some(region) => &mut region.as_mut_slice()[..len],
            None => &mut [],
        }
    }

    /// Changes the length to `new_len`.
    ///
    /// The first `min(len, new_len)` bytes are preserved and new bytes are
    /// zero. Within the current capacity the change happens in place and
    /// the discarded tail is zeroized. Beyond it a new region is allocated
    /// and locked, and the old region is zeroized, unlocked and released.
    /// Resizing to 0 is [`wipe_and_release`](SecureBuffer::wipe_and_release).
    pub fn resize(&mut self, new_len: usize) {
        if new_len == self.len {
            return;
        }

        if new_len == 0 {
            self.wipe_and_release();
            return;
        }

        let fits = self
            .region
            .as_ref()
            .is_some_and(|region| new_len <= region.capacity());

        if fits {
            if new_len < self.len {
                let old_len = self.len;
                if let Some(region) = self.region.as_mut() {
                    region.as_mut_slice()[new_len..old_len].zeroize();
                }
            }

            self.len = new_len;
            return;
        }

        let keep = self.len.min(new_len);
        let mut next = LockedRegion::new(new_len);
        next.as_mut_slice()[..keep].copy_from_slice(&self.as_slice()[..keep]);

        // Dropping the previous region zeroizes, unlocks and unmaps it.
        self.region = Some(next);
        self.len = new_len;
    }

    /// Zeroizes, unlocks and releases the backing region now.
    ///
    /// Leaves an empty buffer. Idempotent.
    pub fn wipe_and_release(&mut self) {
        if let Some(mut region) = self.region.take() {
            region.scrub();
        }

        self.len = 0;
    }

    /// Appends a copy of `bytes`.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> &mut Self {
        if bytes.is_empty() {
            return self;
        }

        let old_len = self.len;
        self.resize(old_len + bytes.len());
        self.as_mut_slice()[old_len..].copy_from_slice(bytes);

        self
    }

    /// Appends a copy of `other`.
    pub fn append(&mut self, other: &SecureBuffer) -> &mut Self {
        self.extend_from_slice(other.as_slice())
    }

    /// Copies `range` into a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] if the range is inverted or
    /// extends past the end of the buffer.
    pub fn slice<R>(&self, range: R) -> Result<SecureBuffer, BufferError>
    where
        R: RangeBounds<usize>,
    {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len,
        };

        if start > end || end > self.len {
            return Err(BufferError::OutOfRange {
                start,
                end,
                len: self.len,
            });
        }

        Ok(Self::from_slice(&self.as_slice()[start..end]))
    }

    /// Lowercase hex encoding of the contents.
    ///
    /// Meant for non-secret data such as salts; the returned `String` is
    /// ordinary heap memory.
    pub fn to_hex(&self) -> String {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let mut hex = String::with_capacity(self.len * 2);
        for byte in self.as_slice() {
            hex.push(DIGITS[(byte >> 4) as usize] as char);
            hex.push(DIGITS[(byte & 0x0f) as usize] as char);
        }

        hex
    }
}

impl Clone for SecureBuffer {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }
}

impl PartialEq for SecureBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice().ct_eq(other.as_slice()).into()
    }
}

impl Eq for SecureBuffer {}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("len", &self.len)
            .field("locked", &self.is_locked())
            .finish_non_exhaustive()
    }
}

impl AsRef<[u8]> for SecureBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<&[u8]> for SecureBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_slice(bytes)
    }
}

impl From<&str> for SecureBuffer {
    fn from(text: &str) -> Self {
        Self::from_slice(text.as_bytes())
    }
}

impl From<Vec<u8>> for SecureBuffer {
    /// Copies the vector into locked memory and zeroizes the vector.
    fn from(mut bytes: Vec<u8>) -> Self {
        let buffer = Self::from_slice(&bytes);
        bytes.zeroize();
        buffer
    }
}

impl Add<&SecureBuffer> for &SecureBuffer {
    type Output = SecureBuffer;

    fn add(self, rhs: &SecureBuffer) -> SecureBuffer {
        let mut joined = SecureBuffer::create(self.len + rhs.len);
        joined.as_mut_slice()[..self.len].copy_from_slice(self.as_slice());
        joined.as_mut_slice()[self.len..].copy_from_slice(rhs.as_slice());
        joined
    }
}
