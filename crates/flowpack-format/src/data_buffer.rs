//! Little-endian writer for the assets payload.
//!
//! Objects referenced by offset are not written in place. The writer reserves
//! a u32 slot and queues a closure; [`DataBuffer::finalize`] drains the queue in
//! FIFO order, aligning each object, patching its slot with the object's start
//! offset and running the closure, which may queue further objects. Every
//! object therefore lands after the object that references it, breadth-first.
//!
//! Offsets are relative to the start of the buffer.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::FormatError;

/// Encoding of strings written with [`DataBuffer::write_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// NUL-terminated UTF-8.
    #[default]
    Utf8,
    /// UTF-16LE terminated by a zero code unit.
    Utf16,
}

type ObjectWriter<'a> = Box<dyn FnOnce(&mut DataBuffer<'a>) + 'a>;

struct PendingObject<'a> {
    slot: usize,
    align: usize,
    write: ObjectWriter<'a>,
}

pub struct DataBuffer<'a> {
    bytes: Vec<u8>,
    encoding: TextEncoding,
    pending: VecDeque<PendingObject<'a>>,
    finalized: bool,
    /// First fatal error, reported by every later read of the buffer.
    error: Option<FormatError>,
}

impl fmt::Debug for DataBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBuffer")
            .field("len", &self.bytes.len())
            .field("encoding", &self.encoding)
            .field("pending", &self.pending.len())
            .field("finalized", &self.finalized)
            .field("error", &self.error)
            .finish()
    }
}

impl<'a> DataBuffer<'a> {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            bytes: Vec::new(),
            encoding,
            pending: VecDeque::new(),
            finalized: false,
            error: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn fail(&mut self, error: FormatError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        if self.finalized {
            self.fail(FormatError::WriteAfterFinalize);
            return;
        }
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.put(&[value]);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_u16(&mut self, value: u16) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.put(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.put(&value.to_le_bytes());
    }

    /// Raw bytes, no length prefix.
    pub fn write_u8_array(&mut self, bytes: &[u8]) {
        self.put(bytes);
    }

    /// String in the buffer's [`TextEncoding`], including the terminator.
    pub fn write_string(&mut self, value: &str) {
        match self.encoding {
            TextEncoding::Utf8 => {
                self.put(value.as_bytes());
                self.write_u8(0);
            }
            TextEncoding::Utf16 => {
                for unit in value.encode_utf16() {
                    self.write_u16(unit);
                }
                self.write_u16(0);
            }
        }
    }

    /// Pad with zeros until the length is a multiple of `align`.
    pub fn align(&mut self, align: usize) {
        if align <= 1 {
            return;
        }
        let padding = (align - self.bytes.len() % align) % align;
        for _ in 0..padding {
            self.write_u8(0);
        }
    }

    /// u32 count followed by the items inline, each aligned to `align`.
    pub fn write_array<T>(&mut self, items: &[T], align: usize, mut write: impl FnMut(&mut Self, &T)) {
        self.write_u32(items.len() as u32);
        for item in items {
            self.align(align);
            write(self, item);
        }
    }

    /// Reserve a u32 slot for an object written later by `write`.
    ///
    /// The slot receives the object's start offset, aligned to `align`.
    pub fn write_object_offset(&mut self, align: usize, write: impl FnOnce(&mut DataBuffer<'a>) + 'a) {
        let slot = self.bytes.len();
        self.write_u32(0);
        if self.finalized {
            return;
        }
        self.pending.push_back(PendingObject {
            slot,
            align,
            write: Box::new(write),
        });
    }

    /// Offset of a string object.
    pub fn write_string_offset(&mut self, value: impl Into<String>) {
        let value = value.into();
        let align = match self.encoding {
            TextEncoding::Utf8 => 1,
            TextEncoding::Utf16 => 2,
        };
        self.write_object_offset(align, move |buf| buf.write_string(&value));
    }

    /// Offset of an inline [`write_array`](Self::write_array) object.
    pub fn write_array_offset<T: 'a>(
        &mut self,
        items: Vec<T>,
        align: usize,
        write: impl FnMut(&mut DataBuffer<'a>, &T) + 'a,
    ) {
        self.write_object_offset(4, move |buf| buf.write_array(&items, align, write));
    }

    /// u32 count and the offset of a table holding one object offset per item.
    ///
    /// An empty list is written as two zero words.
    pub fn write_list<T, F>(&mut self, items: Vec<T>, align: usize, write: F)
    where
        T: 'a,
        F: Fn(&mut DataBuffer<'a>, T) + 'a,
    {
        self.write_u32(items.len() as u32);
        if items.is_empty() {
            self.write_u32(0);
            return;
        }
        let write = Rc::new(write);
        self.write_object_offset(4, move |buf| {
            for item in items {
                let write = Rc::clone(&write);
                buf.write_object_offset(align, move |buf| (*write)(buf, item));
            }
        });
    }

    /// Write every queued object and freeze the buffer.
    ///
    /// Calling it again is a no-op that reports the same result.
    pub fn finalize(&mut self) -> Result<(), FormatError> {
        if !self.finalized {
            let mut objects = 0usize;
            while let Some(object) = self.pending.pop_front() {
                self.align(object.align);
                let Ok(offset) = u32::try_from(self.bytes.len()) else {
                    self.fail(FormatError::TooLarge);
                    break;
                };
                self.bytes[object.slot..object.slot + 4].copy_from_slice(&offset.to_le_bytes());
                (object.write)(self);
                objects += 1;
            }
            self.pending.clear();
            if u32::try_from(self.bytes.len()).is_err() {
                self.fail(FormatError::TooLarge);
            }
            self.finalized = true;
            log::trace!("data buffer finalized: {} bytes, {objects} objects", self.bytes.len());
        }
        self.check()
    }

    fn check(&self) -> Result<(), FormatError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        if !self.finalized {
            return Err(FormatError::NotFinalized);
        }
        Ok(())
    }

    /// Finalized bytes.
    pub fn as_bytes(&self) -> Result<&[u8], FormatError> {
        self.check()?;
        Ok(&self.bytes)
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, FormatError> {
        self.check()?;
        Ok(self.bytes)
    }

    /// LZ4 block compression of the finalized bytes.
    pub fn compress(&self) -> Result<Vec<u8>, FormatError> {
        crate::compress::compress(self.as_bytes()?)
    }
}
