mod contact;

pub use contact::*;
