// Per-record assembly and the batch run around it.
// All extraction goes through extraction::ai; no direct completion calls here.

pub mod assembler;
pub mod batch;
