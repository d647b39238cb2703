// Serialization envelope: a protobuf byte buffer plus the function that frees it.
//
// Buffers created here live in libc heap memory so the native side can read
// them without knowing anything about Rust allocations. Buffers handed to us
// by the native side carry their own deallocator, which is run exactly once
// when the owning `Envelope` is dropped.

use super::status::{ErrorCode, TuneResult};
use prost::Message;
use std::alloc::Layout;
use std::ptr;

/// Frees the bytes referenced by a serialization and resets it.
pub type ProtobufDeallocator = unsafe extern "C" fn(*mut CProtobufSerialization);

/// Fixed-layout view of a serialized protobuf message.
///
/// ABI-stable; mirrors `TuningFork_CProtobufSerialization`.
#[repr(C)]
pub struct CProtobufSerialization {
    pub bytes: *mut u8,
    pub size: u32,
    pub dealloc: Option<ProtobufDeallocator>,
}

impl CProtobufSerialization {
    pub const fn empty() -> Self {
        Self {
            bytes: ptr::null_mut(),
            size: 0,
            dealloc: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_null() || self.size == 0
    }

    /// Borrow the referenced bytes.
    ///
    /// # Safety
    /// `bytes` must point to at least `size` readable bytes that stay valid
    /// for the lifetime of the returned slice.
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.is_empty() {
            return &[];
        }
        std::slice::from_raw_parts(self.bytes, self.size as usize)
    }

    /// Run the stored deallocator, then clear every field.
    ///
    /// Calling this again on the same value does nothing, because the
    /// deallocator reference is gone after the first call.
    pub fn dealloc(&mut self) {
        if let Some(free) = self.dealloc {
            // Safety: the deallocator was installed by whoever allocated `bytes`
            // and is only ever invoked once, since it is cleared right after.
            unsafe { free(self as *mut Self) };
        }
        self.bytes = ptr::null_mut();
        self.size = 0;
        self.dealloc = None;
    }
}

impl Default for CProtobufSerialization {
    fn default() -> Self {
        Self::empty()
    }
}

/// Deallocator for buffers allocated by [`Envelope::from_bytes`].
unsafe extern "C" fn free_libc_bytes(ser: *mut CProtobufSerialization) {
    if ser.is_null() {
        return;
    }
    let ser = &mut *ser;
    if !ser.bytes.is_null() {
        libc::free(ser.bytes as *mut libc::c_void);
    }
    ser.bytes = ptr::null_mut();
    ser.size = 0;
    ser.dealloc = None;
}

/// Outcome of decoding an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    /// Nothing was delivered (null pointer or zero size).
    Empty,
    /// Bytes decoded successfully.
    Message(T),
    /// Bytes were present but not a valid `T`.
    Malformed,
}

impl<T: Default> Parsed<T> {
    /// `Empty` becomes a default instance, `Malformed` becomes `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Parsed::Empty => Some(T::default()),
            Parsed::Message(m) => Some(m),
            Parsed::Malformed => None,
        }
    }

    pub fn or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> Parsed<T> {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Parsed::Malformed)
    }

    pub fn message(self) -> Option<T> {
        match self {
            Parsed::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        match self {
            Parsed::Empty => Parsed::Empty,
            Parsed::Message(m) => Parsed::Message(f(m)),
            Parsed::Malformed => Parsed::Malformed,
        }
    }
}

fn checked_wire_size(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

fn trim_trailing_zeros(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Decode `T` from a byte buffer that may carry zero padding at the end.
///
/// The untouched buffer is tried first; only if that fails is the trailing
/// zero run stripped, so a payload whose last encoded byte is legitimately
/// zero still decodes.
pub fn parse_bytes<T: Message + Default>(bytes: &[u8]) -> Parsed<T> {
    if bytes.is_empty() {
        return Parsed::Empty;
    }

    let first_err = match T::decode(bytes) {
        Ok(message) => return Parsed::Message(message),
        Err(e) => e,
    };

    let trimmed = trim_trailing_zeros(bytes);
    if trimmed.is_empty() {
        // All padding, nothing was written.
        return Parsed::Empty;
    }
    if trimmed.len() == bytes.len() {
        tracing::warn!(
            len = bytes.len(),
            type_name = std::any::type_name::<T>(),
            error = %first_err,
            "failed to parse protobuf payload"
        );
        return Parsed::Malformed;
    }

    match T::decode(trimmed) {
        Ok(message) => Parsed::Message(message),
        Err(e) => {
            tracing::warn!(
                len = bytes.len(),
                trimmed_len = trimmed.len(),
                type_name = std::any::type_name::<T>(),
                error = %e,
                "failed to parse protobuf payload"
            );
            Parsed::Malformed
        }
    }
}

/// Owns a [`CProtobufSerialization`] and frees it on drop.
///
/// The envelope must stay in place while a native call holds its pointer;
/// every binding call is synchronous, so borrowing it for the call suffices.
pub struct Envelope {
    pub(crate) raw: CProtobufSerialization,
}

impl Envelope {
    /// An envelope with no bytes, used as an out-parameter for native calls.
    pub fn empty() -> Self {
        Self {
            raw: CProtobufSerialization::empty(),
        }
    }

    /// Serialize `message` into natively addressable memory.
    ///
    /// # Panics
    /// If the encoding does not fit the 32-bit size field.
    pub fn create<M: Message>(message: &M) -> Self {
        Self::from_bytes(&message.encode_to_vec())
    }

    /// Like [`create`](Self::create), reporting an oversized encoding as
    /// `BadParameter`.
    pub fn try_create<M: Message>(message: &M) -> TuneResult<Self> {
        Self::try_from_bytes(&message.encode_to_vec())
    }

    /// Copy `bytes` into natively addressable memory.
    ///
    /// The pointer is non-null even for an empty slice.
    ///
    /// # Panics
    /// If `bytes` is longer than `u32::MAX`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match Self::try_from_bytes(bytes) {
            Ok(envelope) => envelope,
            Err(_) => panic!(
                "serialized message of {} bytes exceeds the 32-bit envelope size",
                bytes.len()
            ),
        }
    }

    /// Copy `bytes` into natively addressable memory, or fail with
    /// `BadParameter` if they are longer than the 32-bit size field allows.
    pub fn try_from_bytes(bytes: &[u8]) -> TuneResult<Self> {
        let Some(wire_size) = checked_wire_size(bytes.len()) else {
            tracing::warn!(len = bytes.len(), "payload too large for an envelope");
            return Err(ErrorCode::BadParameter);
        };
        let size = bytes.len();
        // malloc(0) may legally hand back null; always ask for at least one byte.
        let ptr = unsafe { libc::malloc(size.max(1)) as *mut u8 };
        if ptr.is_null() {
            std::alloc::handle_alloc_error(Layout::array::<u8>(size.max(1)).unwrap_or(Layout::new::<u8>()));
        }
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, size);
        }

        Ok(Self {
            raw: CProtobufSerialization {
                bytes: ptr,
                size: wire_size,
                dealloc: Some(free_libc_bytes),
            },
        })
    }

    /// Take ownership of a serialization filled in by the native side.
    ///
    /// # Safety
    /// `raw` must either be empty or reference `size` readable bytes that its
    /// `dealloc` (if any) is entitled to free, and no one else may free them.
    pub unsafe fn from_raw(raw: CProtobufSerialization) -> Self {
        Self { raw }
    }

    /// Give up ownership, e.g. to hand a buffer to the native side.
    /// The receiver becomes responsible for calling `dealloc`.
    pub fn into_raw(self) -> CProtobufSerialization {
        let this = std::mem::ManuallyDrop::new(self);
        CProtobufSerialization {
            bytes: this.raw.bytes,
            size: this.raw.size,
            dealloc: this.raw.dealloc,
        }
    }

    pub fn len(&self) -> usize {
        if self.raw.bytes.is_null() {
            0
        } else {
            self.raw.size as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        // Safety: `raw` is either ours (libc buffer of `size` bytes) or was
        // adopted under the contract of `from_raw`.
        unsafe { self.raw.as_slice() }
    }

    pub fn as_raw(&self) -> &CProtobufSerialization {
        &self.raw
    }

    /// Out-parameter for native calls that fill in a serialization.
    pub fn as_raw_mut(&mut self) -> &mut CProtobufSerialization {
        &mut self.raw
    }

    pub fn as_ptr(&self) -> *const CProtobufSerialization {
        &self.raw
    }

    pub fn as_mut_ptr(&mut self) -> *mut CProtobufSerialization {
        &mut self.raw
    }

    /// Whether a deallocator is still attached.
    pub fn owns_allocation(&self) -> bool {
        self.raw.dealloc.is_some()
    }

    pub fn parse<T: Message + Default>(&self) -> Parsed<T> {
        parse_bytes(self.bytes())
    }

    /// Free the bytes now instead of at drop.
    pub fn dealloc(&mut self) {
        self.raw.dealloc();
    }

}

impl Drop for Envelope {
    fn drop(&mut self) {
        self.raw.dealloc();
    }
}
