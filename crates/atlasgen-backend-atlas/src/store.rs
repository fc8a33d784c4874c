//! Growable storage of same-size image slots.
//!
//! All slots share one contiguous buffer laid out as
//! `capacity × height × width × channels`. Slots are addressed only by index;
//! no borrow of the buffer survives a [`SlotStore::grow`].

use crate::error::{AtlasError, AtlasResult};
use crate::raster::CHANNELS;

/// Index of a slot in a [`SlotStore`]. Slots are numbered from 0 in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(usize);

impl Slot {
    pub(crate) fn new(index: usize) -> Self {
        Slot(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl From<Slot> for usize {
    fn from(slot: Slot) -> usize {
        slot.0
    }
}

/// Append-only slot storage with capacity doubling.
#[derive(Debug, Clone)]
pub struct SlotStore {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    channels: usize,
    capacity: usize,
    count: usize,
}

impl SlotStore {
    /// Create a store for `width`×`height` RGBA images with room for one slot.
    pub fn new(width: u32, height: u32) -> AtlasResult<Self> {
        Self::with_capacity(width, height, 1)
    }

    /// Create a store with room for `capacity` slots (at least one).
    pub fn with_capacity(width: u32, height: u32, capacity: usize) -> AtlasResult<Self> {
        if width == 0 || height == 0 {
            return Err(AtlasError::ZeroDimensions { width, height });
        }
        let capacity = capacity.max(1);
        let slot_len = width as usize * height as usize * CHANNELS;
        Ok(Self {
            buffer: vec![0; slot_len * capacity],
            width,
            height,
            channels: CHANNELS,
            capacity,
            count: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of occupied slots.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of slots the buffer can hold before growing.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bytes per slot.
    pub fn slot_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels
    }

    /// Contents of an occupied slot.
    pub fn slot(&self, slot: Slot) -> Option<&[u8]> {
        if slot.0 >= self.count {
            return None;
        }
        let len = self.slot_len();
        let start = slot.0 * len;
        Some(&self.buffer[start..start + len])
    }

    /// Iterate occupied slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &[u8])> {
        self.buffer
            .chunks_exact(self.slot_len())
            .take(self.count)
            .enumerate()
            .map(|(i, data)| (Slot(i), data))
    }

    /// Double the capacity, carrying occupied slots into the new buffer.
    pub fn grow(&mut self) {
        let new_capacity = (self.capacity * 2).max(1);
        let len = self.slot_len();
        let used = self.count * len;

        let mut buffer = vec![0; len * new_capacity];
        buffer[..used].copy_from_slice(&self.buffer[..used]);

        self.buffer = buffer;
        self.capacity = new_capacity;
    }

    /// Claim the next free slot and return a writable view of it.
    ///
    /// Grows the store first when it is full.
    pub fn allocate(&mut self) -> AtlasResult<(Slot, &mut [u8])> {
        if self.count > self.capacity {
            return Err(AtlasError::SlotOverflow {
                count: self.count,
                capacity: self.capacity,
            });
        }
        if self.count == self.capacity {
            self.grow();
        }

        let slot = Slot(self.count);
        self.count += 1;

        let len = self.slot_len();
        let start = slot.0 * len;
        Ok((slot, &mut self.buffer[start..start + len]))
    }

    /// Release every slot from `count` onwards, zeroing their bytes.
    ///
    /// Capacity is kept. Has no effect if `count` is not below the current count.
    pub fn truncate(&mut self, count: usize) {
        if count >= self.count {
            return;
        }
        let len = self.slot_len();
        self.buffer[count * len..self.count * len].fill(0);
        self.count = count;
    }
}
