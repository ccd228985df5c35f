//! Answer composition adapters

pub mod naive;

pub use naive::NaiveComposer;
