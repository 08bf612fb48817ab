pub type DateTime = i64;
