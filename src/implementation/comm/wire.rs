// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the layout of the frames exchanged between ranks.
//!
//! All fields are little endian and never padded. The selected items are
//! broadcast in two frames: first the count (`int32`), then `count` records
//! laid out as `{id: int32, value: float32, weight: float32}`, in item order.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{Item, WireError};

/// The size (in bytes) of one item record
pub const RECORD_LEN: usize = 12;

fn check_len(frame: &[u8], expected: usize) -> Result<(), WireError> {
    if frame.len() < expected {
        Err(WireError::Truncated { expected, actual: frame.len() })
    } else {
        Ok(())
    }
}

pub fn encode_f32(value: f32) -> Bytes {
    let mut buf = BytesMut::with_capacity(4);
    buf.put_f32_le(value);
    buf.freeze()
}
pub fn decode_f32(mut frame: &[u8]) -> Result<f32, WireError> {
    check_len(frame, 4)?;
    Ok(frame.get_f32_le())
}

pub fn encode_u64(value: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u64_le(value);
    buf.freeze()
}
pub fn decode_u64(mut frame: &[u8]) -> Result<u64, WireError> {
    check_len(frame, 8)?;
    Ok(frame.get_u64_le())
}

/// Encodes the number of items which are about to be broadcast
pub fn encode_count(count: usize) -> Result<Bytes, WireError> {
    let count = i32::try_from(count).map_err(|_| WireError::CountOverflow(count))?;
    let mut buf = BytesMut::with_capacity(4);
    buf.put_i32_le(count);
    Ok(buf.freeze())
}
pub fn decode_count(mut frame: &[u8]) -> Result<usize, WireError> {
    check_len(frame, 4)?;
    let count = frame.get_i32_le();
    usize::try_from(count).map_err(|_| WireError::NegativeCount(count))
}

/// Encodes the item records (without their count)
pub fn encode_records(items: &[Item]) -> Bytes {
    let mut buf = BytesMut::with_capacity(items.len() * RECORD_LEN);
    for item in items {
        buf.put_i32_le(item.id);
        buf.put_f32_le(item.value);
        buf.put_f32_le(item.weight);
    }
    buf.freeze()
}
/// Decodes `count` item records
pub fn decode_records(count: usize, mut frame: &[u8]) -> Result<Vec<Item>, WireError> {
    check_len(frame, count.saturating_mul(RECORD_LEN))?;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let id     = frame.get_i32_le();
        let value  = frame.get_f32_le();
        let weight = frame.get_f32_le();
        items.push(Item { id, value, weight });
    }
    Ok(items)
}
