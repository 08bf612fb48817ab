pub type ID = u64;
