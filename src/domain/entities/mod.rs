pub mod bar;
pub mod screening;
pub mod signals;
