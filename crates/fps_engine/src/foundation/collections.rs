//! Specialized collection types
//!
//! [`DynamicArray`] is the growable sequence the event registry and the
//! renderer's live-object list are built on. Unlike `Vec` it has an explicit
//! lifecycle (`init` → use → `destroy`) and a fixed resize policy:
//!
//! - capacity doubles when a push finds the array full
//! - capacity halves when a pop leaves `len <= capacity / 2`
//! - capacity never shrinks past a slot that still holds an element
//!
//! Slots are `Option<T>` so callers may punch holes with [`DynamicArray::set`];
//! every slot at or above `len` is always empty.

use thiserror::Error;

/// Errors reported by [`DynamicArray`] operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayError {
    /// The array has no backing storage (never initialized, or destroyed)
    #[error("array storage is not initialized")]
    Uninitialized,

    /// `init` was called on an array that already owns storage or elements
    #[error("array already initialized (len = {len}, capacity = {capacity})")]
    AlreadyInitialized {
        /// Current length
        len: usize,
        /// Current capacity
        capacity: usize,
    },

    /// A capacity of zero was requested
    #[error("array capacity must be greater than zero")]
    ZeroCapacity,

    /// The allocator refused to provide storage
    #[error("failed to allocate storage for {requested} slots")]
    AllocationFailed {
        /// Requested slot count
        requested: usize,
    },

    /// Doubling the capacity would overflow `usize`
    #[error("capacity overflow growing from {capacity} slots")]
    CapacityOverflow {
        /// Capacity at the time of the failed growth
        capacity: usize,
    },

    /// Index at or past the current length
    #[error("index out of bounds (idx = {index}, len = {len})")]
    OutOfBounds {
        /// Requested index
        index: usize,
        /// Current length
        len: usize,
    },

    /// Pop on an empty array
    #[error("array is empty")]
    Empty,

    /// `len > capacity`; the array is corrupt
    #[error("array overflow (len = {len}, capacity = {capacity})")]
    Overflow {
        /// Current length
        len: usize,
        /// Current capacity
        capacity: usize,
    },

    /// Resize target equals the current capacity
    #[error("array is already sized to {0} slots")]
    AlreadySized(usize),

    /// Shrinking would drop an element that is still held
    #[error("shrinking to {capacity} slots would drop the element at index {index}")]
    ShrinkWouldDrop {
        /// Index of the first held slot past the new capacity
        index: usize,
        /// Requested capacity
        capacity: usize,
    },
}

/// Result type for array operations
pub type ArrayResult<T> = Result<T, ArrayError>;

/// Growable array with an explicit lifecycle and a halving shrink policy
#[derive(Debug)]
pub struct DynamicArray<T> {
    len: usize,
    slots: Option<Vec<Option<T>>>,
}

impl<T> DynamicArray<T> {
    /// Capacity used by [`DynamicArray::init`]
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Create an uninitialized array; call [`DynamicArray::init`] before use
    pub const fn new() -> Self {
        Self { len: 0, slots: None }
    }

    /// Create and initialize an array with the given capacity
    pub fn with_capacity(capacity: usize) -> ArrayResult<Self> {
        let mut array = Self::new();
        array.init_with_capacity(capacity)?;
        Ok(array)
    }

    /// Allocate storage for [`Self::DEFAULT_CAPACITY`] slots
    pub fn init(&mut self) -> ArrayResult<()> {
        self.init_with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Allocate storage for `capacity` empty slots
    ///
    /// Fails if the array already owns storage or elements, so a live array
    /// can never be silently re-initialized.
    pub fn init_with_capacity(&mut self, capacity: usize) -> ArrayResult<()> {
        if self.len != 0 || self.slots.is_some() {
            let err = ArrayError::AlreadyInitialized {
                len: self.len,
                capacity: self.capacity(),
            };
            log::error!("{err}");
            return Err(err);
        }

        if capacity == 0 {
            log::error!("refusing to initialize array with zero capacity");
            return Err(ArrayError::ZeroCapacity);
        }

        let mut slots = Vec::new();
        if slots.try_reserve_exact(capacity).is_err() {
            log::error!("failed to allocate memory for array ({capacity} slots)");
            return Err(ArrayError::AllocationFailed { requested: capacity });
        }
        slots.resize_with(capacity, || None);

        self.slots = Some(slots);
        self.len = 0;
        Ok(())
    }

    /// Whether the array currently owns storage
    pub const fn is_initialized(&self) -> bool {
        self.slots.is_some()
    }

    /// Number of occupied-or-holed slots below the end marker
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether `len() == 0`
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots (0 when uninitialized)
    pub fn capacity(&self) -> usize {
        self.slots.as_ref().map_or(0, Vec::len)
    }

    /// Append an element, doubling capacity if the array is full
    ///
    /// On failure the array is left exactly as it was.
    pub fn push(&mut self, elem: T) -> ArrayResult<()> {
        self.sanity_check()?;

        let capacity = self.capacity();
        if self.len == capacity {
            let doubled = capacity
                .checked_mul(2)
                .ok_or(ArrayError::CapacityOverflow { capacity })?;
            self.resize(doubled)?;
        }

        let len = self.len;
        self.storage_mut()?[len] = Some(elem);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last slot
    ///
    /// Returns `Ok(None)` when the last slot was a hole. After removal the
    /// capacity is halved if `len <= capacity / 2`; a refused shrink is logged
    /// and does not fail the pop.
    pub fn pop(&mut self) -> ArrayResult<Option<T>> {
        self.sanity_check()?;

        if self.len == 0 {
            log::error!("cannot pop: array length is 0");
            return Err(ArrayError::Empty);
        }

        self.len -= 1;
        let len = self.len;
        let elem = self.storage_mut()?[len].take();

        let capacity = self.capacity();
        let half = capacity / 2;
        if half > 0 && self.len <= half {
            if let Err(e) = self.resize(half) {
                log::error!("array shrink after pop failed: {e}");
            }
        }

        Ok(elem)
    }

    /// Borrow the slot at `idx`
    pub fn get(&self, idx: usize) -> ArrayResult<Option<&T>> {
        self.sanity_check()?;
        self.bounds_check(idx)?;
        Ok(self.storage()?[idx].as_ref())
    }

    /// Mutably borrow the slot at `idx`
    pub fn get_mut(&mut self, idx: usize) -> ArrayResult<Option<&mut T>> {
        self.sanity_check()?;
        self.bounds_check(idx)?;
        Ok(self.storage_mut()?[idx].as_mut())
    }

    /// Replace the slot at `idx`, returning what was there
    ///
    /// Passing `None` leaves a hole; the length does not change.
    pub fn set(&mut self, idx: usize, elem: Option<T>) -> ArrayResult<Option<T>> {
        self.sanity_check()?;
        self.bounds_check(idx)?;
        Ok(std::mem::replace(&mut self.storage_mut()?[idx], elem))
    }

    /// Change the capacity to exactly `capacity` slots
    ///
    /// Shrinking is refused if any slot at or past `capacity` still holds an
    /// element. Shrinking across trailing holes truncates the length.
    pub fn resize(&mut self, capacity: usize) -> ArrayResult<()> {
        self.sanity_check()?;

        let current = self.capacity();
        if capacity == current {
            log::error!("array is already the specified size ({capacity})");
            return Err(ArrayError::AlreadySized(capacity));
        }
        if capacity == 0 {
            log::error!("refusing to resize array to zero capacity");
            return Err(ArrayError::ZeroCapacity);
        }

        let slots = self.storage_mut()?;
        if capacity < current {
            if let Some(offset) = slots[capacity..].iter().position(Option::is_some) {
                let index = capacity + offset;
                log::error!(
                    "array has held data at idx {index} >= {capacity}; shrinking would leak it"
                );
                return Err(ArrayError::ShrinkWouldDrop { index, capacity });
            }
            slots.truncate(capacity);
            slots.shrink_to_fit();
        } else {
            if slots.try_reserve_exact(capacity - current).is_err() {
                log::error!("array failed to grow to {capacity} slots");
                return Err(ArrayError::AllocationFailed { requested: capacity });
            }
            slots.resize_with(capacity, || None);
        }

        self.len = self.len.min(capacity);
        Ok(())
    }

    /// Iterate the slots below `len`, holes included
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.slots
            .iter()
            .flat_map(|slots| slots[..self.len].iter().map(Option::as_ref))
    }

    /// Release the storage and hand every held element back to the caller
    ///
    /// Calling this on an uninitialized array is a no-op returning nothing.
    pub fn destroy(&mut self) -> Vec<T> {
        let Some(slots) = self.slots.take() else {
            log::debug!("destroy on uninitialized array ignored");
            return Vec::new();
        };
        let len = std::mem::replace(&mut self.len, 0);
        slots.into_iter().take(len).flatten().collect()
    }

    /// Release the storage and drop every held element
    ///
    /// Holes are skipped. Returns how many elements were released; calling
    /// this on an uninitialized array releases nothing.
    pub fn destroy_deep(&mut self) -> usize {
        let released = self.destroy();
        let count = released.len();
        drop(released);
        count
    }

    fn sanity_check(&self) -> ArrayResult<()> {
        let Some(slots) = self.slots.as_ref() else {
            log::error!("array storage is not initialized");
            return Err(ArrayError::Uninitialized);
        };

        if self.len > slots.len() {
            log::error!("array overflow! len = {}, capacity = {}", self.len, slots.len());
            return Err(ArrayError::Overflow {
                len: self.len,
                capacity: slots.len(),
            });
        }

        Ok(())
    }

    fn bounds_check(&self, idx: usize) -> ArrayResult<()> {
        if idx >= self.len {
            log::error!("idx is out of bounds (idx = {idx}, len = {})", self.len);
            return Err(ArrayError::OutOfBounds { index: idx, len: self.len });
        }
        Ok(())
    }

    fn storage(&self) -> ArrayResult<&Vec<Option<T>>> {
        self.slots.as_ref().ok_or(ArrayError::Uninitialized)
    }

    fn storage_mut(&mut self) -> ArrayResult<&mut Vec<Option<T>>> {
        self.slots.as_mut().ok_or(ArrayError::Uninitialized)
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}
