//! Reading silver tables, locating them on disk, and persisting gold tables.

pub mod discovery;
pub mod error;
pub mod gold_writer;
pub mod silver_reader;
