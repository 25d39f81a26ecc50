//! Register bank exposed to the external register interface.
//!
//! The access direction of each field is part of its type: only [`Writable`] fields can be written by
//! the host, and [`ReadOnly`] fields are driven by the recorder alone.

use std::fmt::Debug;
use std::marker::PhantomData;

use linked_hash_map::LinkedHashMap;

use crate::*;

/// Access direction of a field, seen from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// Host writes, device reads.
    ReadWrite,
    /// Device writes, host reads.
    ReadOnly,
    /// Host writes a pulse that the device consumes on the next tick.
    Strobe,
}

/// Capability tag of a field.
pub trait Access: Debug {
    /// Access direction.
    const KIND: AccessKind;
}

/// Capability tag of fields the host may write.
pub trait Writable: Access {}

/// Tag of host-writable level fields.
#[derive(Debug, Clone, Copy)]
pub struct ReadWrite;

/// Tag of device-driven fields.
#[derive(Debug, Clone, Copy)]
pub struct ReadOnly;

/// Tag of self-clearing pulse fields.
#[derive(Debug, Clone, Copy)]
pub struct Strobe;

impl Access for ReadWrite {
    const KIND: AccessKind = AccessKind::ReadWrite;
}

impl Access for ReadOnly {
    const KIND: AccessKind = AccessKind::ReadOnly;
}

impl Access for Strobe {
    const KIND: AccessKind = AccessKind::Strobe;
}

impl Writable for ReadWrite {}

impl Writable for Strobe {}

/// Description of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Width in bits.
    pub width: usize,
    /// Access direction.
    pub access: AccessKind,
}

/// Register field.
#[derive(Debug)]
pub struct Field<A: Access> {
    name: &'static str,
    width: usize,
    value: u64,
    _marker: PhantomData<A>,
}

impl<A: Access> Field<A> {
    fn new(name: &'static str, width: usize, reset: u64) -> Self {
        Self { name, width, value: reset & mask(width), _marker: PhantomData }
    }

    /// Returns the value.
    pub fn read(&self) -> u64 { self.value }

    /// Returns the name.
    pub fn name(&self) -> &'static str { self.name }

    /// Returns the width in bits.
    pub fn width(&self) -> usize { self.width }

    /// Returns the description of the field.
    pub fn info(&self) -> FieldInfo { FieldInfo { width: self.width, access: A::KIND } }
}

impl<A: Writable> Field<A> {
    /// Writes the value, truncated to the field width.
    pub fn write(&mut self, value: u64) { self.value = value & mask(self.width); }
}

impl Field<ReadOnly> {
    pub(crate) fn drive(&mut self, value: u64) { self.value = value & mask(self.width); }
}

impl Field<Strobe> {
    /// Requests a pulse on the next tick.
    pub fn pulse(&mut self) { self.write(1); }

    /// Consumes the pending pulse.
    pub(crate) fn take(&mut self) -> bool { std::mem::take(&mut self.value) != 0 }
}

/// Register bank of a recorder.
#[derive(Debug)]
pub struct RecorderBank {
    /// Synchronous reset. Pending at power-up.
    pub rst: Field<Strobe>,
    /// Arm request.
    pub arm: Field<Strobe>,
    /// The sequencer is idle.
    pub done: Field<ReadOnly>,
    /// Window length.
    pub size: Field<ReadWrite>,
    /// Pre-trigger depth.
    pub offset: Field<ReadWrite>,
    /// Advances the read pointer.
    pub get: Field<Strobe>,
    /// Sample read by the last `get`.
    pub get_dat: Field<ReadOnly>,
    /// An arm request was rejected because of the window configuration.
    pub fault: Field<ReadOnly>,
}

impl RecorderBank {
    /// Creates the bank of a recorder, with fields at their reset values.
    pub fn new(config: &RecorderConfig) -> Self {
        let window_width = config.window_width();
        Self {
            rst: Field::new("rst", 1, 1),
            arm: Field::new("arm", 1, 0),
            done: Field::new("done", 1, 0),
            size: Field::new("size", window_width, 1),
            offset: Field::new("offset", window_width, 1),
            get: Field::new("get", 1, 0),
            get_dat: Field::new("get_dat", config.width, 0),
            fault: Field::new("fault", 1, 0),
        }
    }

    /// Returns the fields in address order.
    pub fn describe(&self) -> LinkedHashMap<&'static str, FieldInfo> {
        [
            (self.rst.name(), self.rst.info()),
            (self.arm.name(), self.arm.info()),
            (self.done.name(), self.done.info()),
            (self.size.name(), self.size.info()),
            (self.offset.name(), self.offset.info()),
            (self.get.name(), self.get.info()),
            (self.get_dat.name(), self.get_dat.info()),
            (self.fault.name(), self.fault.info()),
        ]
        .into_iter()
        .collect()
    }
}
