use crate::packers::Packable;

pub trait LasNIR {
    fn nir(&self) -> u16;
}

#[derive(Default, Copy, Clone, Debug, PartialOrd, PartialEq, Eq, Hash)]
pub struct Nir(pub u16);

impl LasNIR for Nir {
    fn nir(&self) -> u16 {
        self.0
    }
}

impl Nir {
    pub const SIZE: usize = 2;
}

impl Packable for Nir {
    fn unpack_from(input: &[u8]) -> Self {
        Nir(u16::unpack_from(input))
    }

    fn pack_into(&self, output: &mut [u8]) {
        self.0.pack_into(output)
    }
}
