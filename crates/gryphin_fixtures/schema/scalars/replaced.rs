pub type DateTime = u8;
