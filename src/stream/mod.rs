//! Binary stream codec for the inspection protocol.
//!
//! All scalar values on the wire are fixed-width, in a single byte order
//! fixed at build time ([`NetOrder`]). Strings are an `i32` byte-length
//! prefix, the UTF-8 bytes, and one trailing NUL byte not counted by the
//! prefix. Points and vectors are 2 or 3 consecutive scalars; colors are
//! 4 consecutive `f32` (r, g, b, alpha).
//!
//! [`Stream`] is the abstract ordered byte channel the codec sits on;
//! [`SocketStream`] is its TCP implementation. A short read or write never
//! returns partial data: it either blocks until satisfied or fails with
//! [`Error::ConnectionClosed`](crate::util::Error::ConnectionClosed).

mod socket;

pub use socket::SocketStream;

use byteorder::ByteOrder;

use crate::types::{Color3f, Point2f, Point2i, Point3f, Point3i, Vec3f, Vec3i};
use crate::util::Result;

/// Byte order used for every scalar on the wire.
pub type NetOrder = byteorder::LittleEndian;

/// An ordered byte channel with the protocol's primitive codec on top.
///
/// Implementors provide blocking [`read`](Stream::read) and
/// [`write`](Stream::write); every other method is a fixed-width codec
/// composition on top of those two.
pub trait Stream {
    /// Fill `buf` completely from the channel.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Write all of `data` to the channel.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(&mut buf)?;
        Ok(buf[0])
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read(&mut buf)?;
        Ok(NetOrder::read_u16(&buf))
    }

    fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read(&mut buf)?;
        Ok(NetOrder::read_i16(&buf))
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(NetOrder::read_u32(&buf))
    }

    fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(NetOrder::read_i32(&buf))
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read(&mut buf)?;
        Ok(NetOrder::read_u64(&buf))
    }

    fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.read(&mut buf)?;
        Ok(NetOrder::read_i64(&buf))
    }

    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_f32(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(NetOrder::read_f32(&buf))
    }

    fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read(&mut buf)?;
        Ok(NetOrder::read_f64(&buf))
    }

    fn write_u8(&mut self, value: u8) -> Result<()> {
        self.write(&[value])
    }

    fn write_i8(&mut self, value: i8) -> Result<()> {
        self.write(&[value as u8])
    }

    fn write_u16(&mut self, value: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        NetOrder::write_u16(&mut buf, value);
        self.write(&buf)
    }

    fn write_i16(&mut self, value: i16) -> Result<()> {
        let mut buf = [0u8; 2];
        NetOrder::write_i16(&mut buf, value);
        self.write(&buf)
    }

    fn write_u32(&mut self, value: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        NetOrder::write_u32(&mut buf, value);
        self.write(&buf)
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        let mut buf = [0u8; 4];
        NetOrder::write_i32(&mut buf, value);
        self.write(&buf)
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        NetOrder::write_u64(&mut buf, value);
        self.write(&buf)
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        let mut buf = [0u8; 8];
        NetOrder::write_i64(&mut buf, value);
        self.write(&buf)
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(value as u8)
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        let mut buf = [0u8; 4];
        NetOrder::write_f32(&mut buf, value);
        self.write(&buf)
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        let mut buf = [0u8; 8];
        NetOrder::write_f64(&mut buf, value);
        self.write(&buf)
    }

    /// Read a length-prefixed, NUL-terminated UTF-8 string.
    fn read_string(&mut self) -> Result<String> {
        let len = self.read_i32()?.max(0) as usize;
        let mut bytes = vec![0u8; len];
        self.read(&mut bytes)?;
        let value = String::from_utf8(bytes)?;
        // trailing NUL, not counted by the length prefix
        self.read_u8()?;
        Ok(value)
    }

    /// Write a string as `i32` byte length, UTF-8 bytes, one NUL byte.
    fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_i32(value.len() as i32)?;
        self.write(value.as_bytes())?;
        self.write_u8(0)
    }

    /// Read `count` contiguous `f32` values.
    fn read_f32_array(&mut self, count: usize) -> Result<Vec<f32>> {
        let mut bytes = vec![0u8; count * 4];
        self.read(&mut bytes)?;
        let mut values = vec![0f32; count];
        NetOrder::read_f32_into(&bytes, &mut values);
        Ok(values)
    }

    /// Read `count` contiguous `i32` values.
    fn read_i32_array(&mut self, count: usize) -> Result<Vec<i32>> {
        let mut bytes = vec![0u8; count * 4];
        self.read(&mut bytes)?;
        let mut values = vec![0i32; count];
        NetOrder::read_i32_into(&bytes, &mut values);
        Ok(values)
    }

    /// Read and discard `count` bytes.
    fn skip(&mut self, count: usize) -> Result<()> {
        let mut scratch = [0u8; 256];
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(scratch.len());
            self.read(&mut scratch[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    fn read_point2f(&mut self) -> Result<Point2f> {
        let v = self.read_f32_array(2)?;
        Ok(Point2f::new(v[0], v[1]))
    }

    fn read_point2i(&mut self) -> Result<Point2i> {
        let v = self.read_i32_array(2)?;
        Ok(Point2i::new(v[0], v[1]))
    }

    fn read_point3f(&mut self) -> Result<Point3f> {
        let v = self.read_f32_array(3)?;
        Ok(Point3f::new(v[0], v[1], v[2]))
    }

    fn read_point3i(&mut self) -> Result<Point3i> {
        let v = self.read_i32_array(3)?;
        Ok(Point3i::new(v[0], v[1], v[2]))
    }

    fn read_vec3f(&mut self) -> Result<Vec3f> {
        self.read_point3f()
    }

    fn read_vec3i(&mut self) -> Result<Vec3i> {
        self.read_point3i()
    }

    /// Read a color as four `f32`: r, g, b, alpha.
    fn read_color3f(&mut self) -> Result<Color3f> {
        let v = self.read_f32_array(4)?;
        Ok(Color3f::new(v[0], v[1], v[2], v[3]))
    }

    fn write_point2f(&mut self, p: Point2f) -> Result<()> {
        self.write_f32(p.x)?;
        self.write_f32(p.y)
    }

    fn write_point2i(&mut self, p: Point2i) -> Result<()> {
        self.write_i32(p.x)?;
        self.write_i32(p.y)
    }

    fn write_point3f(&mut self, p: Point3f) -> Result<()> {
        self.write_f32(p.x)?;
        self.write_f32(p.y)?;
        self.write_f32(p.z)
    }

    fn write_point3i(&mut self, p: Point3i) -> Result<()> {
        self.write_i32(p.x)?;
        self.write_i32(p.y)?;
        self.write_i32(p.z)
    }

    fn write_vec3f(&mut self, v: Vec3f) -> Result<()> {
        self.write_point3f(v)
    }

    fn write_color3f(&mut self, c: Color3f) -> Result<()> {
        self.write_f32(c.r)?;
        self.write_f32(c.g)?;
        self.write_f32(c.b)?;
        self.write_f32(c.a)
    }
}
