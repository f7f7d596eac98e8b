/*
===============================================================================

  PROGRAMMERS:

    martin.isenburg@rapidlasso.com  -  http://rapidlasso.com
    uday.karan@gmail.com - Hobu, Inc.

  COPYRIGHT:

    (c) 2007-2014, martin isenburg, rapidlasso - tools to catch reality
    (c) 2014, Uday Verma, Hobu, Inc.
    (c) 2019, Thomas Montaigu

    This is free software; you can redistribute and/or modify it under the
    terms of the GNU Lesser General Licence as published by the Free Software
    Foundation. See the COPYING file for more information.

    This software is distributed WITHOUT ANY WARRANTY and without even the
    implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.

  CHANGE HISTORY:
    6 June 2019: Translated to Rust
===============================================================================
*/

//! Little-endian packing of the values that make up point records.
//!
//! Every multi-byte value is stored little-endian on the wire,
//! whatever the byte order of the host.

pub trait Packable: Sized {
    /// Reads a value from the first bytes of `input`.
    ///
    /// Panics if `input` is too short.
    fn unpack_from(input: &[u8]) -> Self;

    /// Writes the value in the first bytes of `output`.
    ///
    /// Panics if `output` is too short.
    fn pack_into(&self, output: &mut [u8]);
}

macro_rules! impl_packable_for_primitive {
    ($($t:ty),+) => {
        $(
            impl Packable for $t {
                #[inline]
                fn unpack_from(input: &[u8]) -> Self {
                    const N: usize = std::mem::size_of::<$t>();
                    assert!(
                        input.len() >= N,
                        concat!(stringify!($t), "::unpack_from expected a buffer of {} bytes"),
                        N
                    );
                    let mut bytes = [0u8; N];
                    bytes.copy_from_slice(&input[..N]);
                    <$t>::from_le_bytes(bytes)
                }

                #[inline]
                fn pack_into(&self, output: &mut [u8]) {
                    const N: usize = std::mem::size_of::<$t>();
                    assert!(
                        output.len() >= N,
                        concat!(stringify!($t), "::pack_into expected a buffer of {} bytes"),
                        N
                    );
                    output[..N].copy_from_slice(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_packable_for_primitive!(u16, i16, u32, i32, u64, i64, f32, f64);

impl Packable for u8 {
    #[inline]
    fn unpack_from(input: &[u8]) -> Self {
        input[0]
    }

    #[inline]
    fn pack_into(&self, output: &mut [u8]) {
        output[0] = *self;
    }
}

impl Packable for i8 {
    #[inline]
    fn unpack_from(input: &[u8]) -> Self {
        input[0] as i8
    }

    #[inline]
    fn pack_into(&self, output: &mut [u8]) {
        output[0] = *self as u8;
    }
}
