use std::error::Error;

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod kobo;
pub mod manual;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod sample;

#[cfg(test)]
mod testutil;

pub fn unpack_error(err: &(dyn Error)) -> String {
    let mut parts = Vec::new();
    parts.push(err.to_string());
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}
