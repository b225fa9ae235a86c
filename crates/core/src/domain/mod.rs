pub mod advisory;
pub mod canvas;
pub mod contract;
pub mod market;
